use super::environment::EnvironmentProfile;
use super::evolution::AlgorithmParameters;
use super::logging::LoggingParameters;
use super::market::MarketParameters;
use super::overrides::{overrides_for, section_overrides, Section};
use super::persistence::PersistenceParameters;
use super::provisioner::ensure_directories;
use super::traits::{ConfigManifest, ConfigSection, Overrides};
use crate::error::{AnetaError, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Install location of this crate; the default base for runtime directories.
pub fn default_base_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

/// Fully resolved configuration for one process. Built once, then shared read-only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RootConfiguration {
    environment: EnvironmentProfile,
    version: String,
    base_path: PathBuf,
    data_path: PathBuf,
    models_path: PathBuf,
    logs_path: PathBuf,
    algorithm: AlgorithmParameters,
    market: MarketParameters,
    persistence: PersistenceParameters,
    logging: LoggingParameters,
}

/// Per-section overrides layered on top of the environment table.
pub type FileOverrides = BTreeMap<String, Overrides>;

impl RootConfiguration {
    /// Assembles the configuration for `environment` with directories under
    /// the crate's install location.
    pub fn new(environment: &str) -> Result<Self> {
        Self::with_base_path(environment, default_base_path())
    }

    pub fn with_base_path(environment: &str, base_path: impl Into<PathBuf>) -> Result<Self> {
        Self::assemble(environment.parse()?, base_path.into(), &FileOverrides::new())
    }

    /// Like `with_base_path`, then applies the `[algorithm]`, `[market]` and
    /// `[persistence]` tables of a TOML file as a final override layer.
    pub fn from_file<P: AsRef<Path>>(
        environment: &str,
        base_path: impl Into<PathBuf>,
        path: P,
    ) -> Result<Self> {
        let profile: EnvironmentProfile = environment.parse()?;
        let layer = load_file_overrides(path.as_ref())?;
        log::info!(
            "Loaded {} override table(s) from {}",
            layer.len(),
            path.as_ref().display()
        );
        Self::assemble(profile, base_path.into(), &layer)
    }

    fn assemble(
        environment: EnvironmentProfile,
        base_path: PathBuf,
        layer: &FileOverrides,
    ) -> Result<Self> {
        if let Some(name) = layer.keys().find(|name| section_from_name(name).is_none()) {
            return Err(AnetaError::unknown_field("root", name));
        }

        let entries = overrides_for(environment);
        log::debug!(
            "Resolving {} configuration with {} environment override(s)",
            environment,
            entries.len()
        );

        let resolve = |section: Section| -> Overrides {
            let mut merged = section_overrides(entries, section);
            if let Some(extra) = layer.get(section.as_str()) {
                merged.extend(extra.clone());
            }
            merged
        };

        let algorithm = AlgorithmParameters::default().with_overrides(&resolve(Section::Algorithm))?;
        let market = MarketParameters::default().with_overrides(&resolve(Section::Market))?;
        let persistence =
            PersistenceParameters::default().with_overrides(&resolve(Section::Persistence))?;

        let base_path = if base_path.is_relative() {
            std::env::current_dir()?.join(base_path)
        } else {
            base_path
        };
        let data_path = base_path.join("data");
        let models_path = base_path.join("models");
        let logs_path = base_path.join("logs");

        ensure_directories(&[&base_path, &data_path, &models_path, &logs_path])?;

        log::info!(
            "Configuration v{} assembled for {} at {}",
            VERSION,
            environment,
            base_path.display()
        );

        Ok(Self {
            environment,
            version: VERSION.to_string(),
            base_path,
            data_path,
            models_path,
            logs_path,
            algorithm,
            market,
            persistence,
            logging: LoggingParameters::for_profile(environment),
        })
    }

    pub fn environment(&self) -> EnvironmentProfile {
        self.environment
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn algorithm(&self) -> &AlgorithmParameters {
        &self.algorithm
    }

    pub fn market(&self) -> &MarketParameters {
        &self.market
    }

    pub fn persistence(&self) -> &PersistenceParameters {
        &self.persistence
    }

    pub fn logging(&self) -> &LoggingParameters {
        &self.logging
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    pub fn models_path(&self) -> &Path {
        &self.models_path
    }

    pub fn logs_path(&self) -> &Path {
        &self.logs_path
    }

    pub fn manifests(&self) -> Result<Vec<ConfigManifest>> {
        Ok(vec![
            self.algorithm.to_manifest()?,
            self.market.to_manifest()?,
            self.persistence.to_manifest()?,
        ])
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| AnetaError::Serialization(e.to_string()))
    }

    /// Writes the effective configuration as TOML, e.g. next to a run's logs.
    pub fn save_snapshot<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }
}

fn section_from_name(name: &str) -> Option<Section> {
    [Section::Algorithm, Section::Market, Section::Persistence]
        .into_iter()
        .find(|s| s.as_str() == name)
}

fn load_file_overrides(path: &Path) -> Result<FileOverrides> {
    let source = ::config::Config::builder()
        .add_source(::config::File::from(path).format(::config::FileFormat::Toml))
        .build()?;
    Ok(source.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_development_uses_pure_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = RootConfiguration::with_base_path("development", tmp.path()).unwrap();

        assert_eq!(config.environment(), EnvironmentProfile::Development);
        assert_eq!(config.version(), "1.0.0");
        assert_eq!(config.algorithm(), &AlgorithmParameters::default());
        assert_eq!(config.market(), &MarketParameters::default());
        assert_eq!(config.persistence(), &PersistenceParameters::default());
    }

    #[test]
    fn test_paths_derive_from_base() {
        let tmp = TempDir::new().unwrap();
        let config = RootConfiguration::with_base_path("testing", tmp.path()).unwrap();

        assert_eq!(config.base_path(), tmp.path());
        assert_eq!(config.data_path(), tmp.path().join("data"));
        assert_eq!(config.models_path(), tmp.path().join("models"));
        assert_eq!(config.logs_path(), tmp.path().join("logs"));
    }

    #[test]
    fn test_unknown_file_table_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let mut layer = FileOverrides::new();
        layer.insert("broker".to_string(), Overrides::new());

        let err = RootConfiguration::assemble(
            EnvironmentProfile::Development,
            tmp.path().join("base"),
            &layer,
        )
        .unwrap_err();
        assert!(matches!(err, AnetaError::UnknownField { ref field, .. } if field == "broker"));
        assert!(!tmp.path().join("base").exists());
    }

    #[test]
    fn test_snapshot_is_valid_toml() {
        let tmp = TempDir::new().unwrap();
        let config = RootConfiguration::with_base_path("production", tmp.path()).unwrap();

        let text = config.to_toml().unwrap();
        let parsed: toml::Value = toml::from_str(&text).unwrap();
        assert_eq!(parsed["environment"].as_str(), Some("production"));
        assert_eq!(parsed["algorithm"]["pop_size"].as_integer(), Some(500));
        assert_eq!(
            parsed["persistence"]["collections"]["strategies"].as_str(),
            Some("evolved_strategies")
        );
    }
}
