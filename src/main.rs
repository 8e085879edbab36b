use anyhow::{Context, Result};
use aneta::config::root::default_base_path;
use aneta::{init_logging, ConfigManager, EnvironmentProfile, LoggingParameters, RootConfiguration};

fn main() -> Result<()> {
    // Usage: aneta [environment] [overrides.toml]
    let mut args = std::env::args().skip(1);
    let environment = args.next().unwrap_or_else(|| "development".to_string());
    let overrides = args.next();

    let profile: EnvironmentProfile = environment.parse()?;

    // Installed before assembly so construction logs reach stderr; the log
    // file is attached once the logs directory exists.
    let sink = init_logging(&LoggingParameters::for_profile(profile), true)
        .context("Failed to install logger")?;

    let config = match overrides {
        Some(path) => RootConfiguration::from_file(profile.as_str(), default_base_path(), &path)
            .with_context(|| format!("Failed to load configuration overrides from {}", path))?,
        None => RootConfiguration::new(profile.as_str())
            .with_context(|| format!("Failed to build {} configuration", profile))?,
    };

    if let Some(path) = sink.attach_for(&config)? {
        log::info!("Logging to {}", path.display());
    }

    let manager = ConfigManager::new(config);
    let current = manager.current();
    log::info!(
        "ANETA v{} ready ({}): population {}, {} symbols, data at {}",
        current.version(),
        current.environment(),
        current.algorithm().pop_size,
        current.market().symbols.len(),
        current.data_path().display()
    );

    println!("{}", current.to_toml()?);
    Ok(())
}
