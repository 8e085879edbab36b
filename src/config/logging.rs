use super::environment::EnvironmentProfile;
use super::root::RootConfiguration;
use crate::error::{AnetaError, Result};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

pub const LOG_FILE_NAME: &str = "aneta.log";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingParameters {
    pub level: LevelFilter,
    /// Write to `<logs_path>/aneta.log` instead of stderr
    pub log_to_file: bool,
}

impl LoggingParameters {
    pub fn for_profile(profile: EnvironmentProfile) -> Self {
        match profile {
            EnvironmentProfile::Development => Self {
                level: LevelFilter::Debug,
                log_to_file: false,
            },
            EnvironmentProfile::Testing => Self {
                level: LevelFilter::Warn,
                log_to_file: false,
            },
            EnvironmentProfile::Staging | EnvironmentProfile::Production => Self {
                level: LevelFilter::Info,
                log_to_file: true,
            },
        }
    }
}

/// Log file location for a configuration, if file logging is enabled.
pub fn log_file(config: &RootConfiguration) -> Option<PathBuf> {
    config
        .logging()
        .log_to_file
        .then(|| config.logs_path().join(LOG_FILE_NAME))
}

/// Log output that goes to stderr until a file is attached.
///
/// The logger has to exist before a `RootConfiguration` is assembled, but the
/// log directory only exists afterwards; the sink bridges the two.
#[derive(Debug, Clone, Default)]
pub struct LogSink {
    file: Arc<Mutex<Option<File>>>,
}

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&self, path: &Path) -> Result<()> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        *self.file.lock().unwrap_or_else(PoisonError::into_inner) = Some(file);
        Ok(())
    }

    /// Attaches the configuration's log file when its profile asks for one.
    pub fn attach_for(&self, config: &RootConfiguration) -> Result<Option<PathBuf>> {
        match log_file(config) {
            Some(path) => {
                self.attach(&path)?;
                Ok(Some(path))
            }
            None => Ok(None),
        }
    }

    pub fn is_attached(&self) -> bool {
        self.file
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

impl Write for LogSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut guard = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        match guard.as_mut() {
            Some(file) => file.write(buf),
            None => io::stderr().write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut guard = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        match guard.as_mut() {
            Some(file) => file.flush(),
            None => io::stderr().flush(),
        }
    }
}

/// Installs the global env_logger at the given level, writing through the
/// returned sink. With `from_env`, `RUST_LOG` is layered on top of the level.
/// Fails with `Logging` if a logger is already installed.
pub fn init_logging(params: &LoggingParameters, from_env: bool) -> Result<LogSink> {
    let sink = LogSink::new();
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(params.level)
        .target(env_logger::Target::Pipe(Box::new(sink.clone())));
    if from_env {
        builder.parse_default_env();
    }

    builder
        .try_init()
        .map_err(|e| AnetaError::Logging(e.to_string()))?;
    log::debug!("Logging initialised at level {}", params.level);
    Ok(sink)
}
