pub mod traits;
pub mod environment;
pub mod evolution;
pub mod market;
pub mod persistence;
pub mod overrides;
pub mod provisioner;
pub mod logging;
pub mod root;
pub mod manager;

pub use environment::EnvironmentProfile;
pub use evolution::AlgorithmParameters;
pub use logging::{init_logging, LogSink, LoggingParameters};
pub use manager::ConfigManager;
pub use market::MarketParameters;
pub use persistence::{CollectionRole, PersistenceParameters};
pub use root::RootConfiguration;
pub use traits::{ConfigSection, Overrides};
