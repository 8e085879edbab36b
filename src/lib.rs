//! Environment-aware configuration for the ANETA neuroevolution trading system.
//!
//! [`RootConfiguration`] resolves an [`EnvironmentProfile`], applies that
//! profile's overrides to the algorithm, market and persistence sections, and
//! makes sure the `data`, `models` and `logs` directories exist.

pub mod config;
pub mod error;

pub use config::{
    init_logging, AlgorithmParameters, ConfigManager, ConfigSection, EnvironmentProfile,
    LogSink, LoggingParameters, MarketParameters, PersistenceParameters, RootConfiguration,
};
pub use error::{AnetaError, Result};
