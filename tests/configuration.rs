use aneta::config::persistence::CollectionRole;
use aneta::config::traits::Overrides;
use aneta::{
    AlgorithmParameters, AnetaError, ConfigSection, EnvironmentProfile, MarketParameters,
    PersistenceParameters, RootConfiguration,
};
use serde_json::json;
use std::fs;
use tempfile::TempDir;

fn overrides(value: serde_json::Value) -> Overrides {
    value.as_object().cloned().unwrap()
}

#[test]
fn test_every_profile_builds_a_valid_configuration() {
    for profile in EnvironmentProfile::ALL {
        let tmp = TempDir::new().unwrap();
        let config = RootConfiguration::with_base_path(profile.as_str(), tmp.path()).unwrap();

        assert_eq!(config.environment(), profile);
        config.algorithm().validate().unwrap();
        config.market().validate().unwrap();
        config.persistence().validate().unwrap();

        assert!(config.data_path().is_dir());
        assert!(config.models_path().is_dir());
        assert!(config.logs_path().is_dir());
    }
}

#[test]
fn test_profile_name_is_case_insensitive() {
    let upper = TempDir::new().unwrap();
    let lower = TempDir::new().unwrap();
    let a = RootConfiguration::with_base_path("PRODUCTION", upper.path()).unwrap();
    let b = RootConfiguration::with_base_path("production", lower.path()).unwrap();

    assert_eq!(a.environment(), b.environment());
    assert_eq!(a.algorithm(), b.algorithm());
    assert_eq!(a.market(), b.market());
    assert_eq!(a.persistence(), b.persistence());
}

#[test]
fn test_unknown_profile_creates_nothing() {
    let tmp = TempDir::new().unwrap();
    let base = tmp.path().join("aneta");

    let err = RootConfiguration::with_base_path("staging2", &base).unwrap_err();

    assert!(matches!(err, AnetaError::InvalidEnvironment { ref name } if name == "staging2"));
    assert!(!base.exists());
}

#[test]
fn test_environment_overrides_apply_on_top_of_defaults() {
    let tmp = TempDir::new().unwrap();

    let testing = RootConfiguration::with_base_path("testing", tmp.path()).unwrap();
    assert_eq!(testing.algorithm().pop_size, 20);
    assert_eq!(testing.algorithm().max_generations, 10);
    assert_eq!(testing.market().lookback_periods, 50);
    assert_eq!(testing.persistence().cache_ttl, 0);
    assert_eq!(testing.algorithm().crossover_rate, 0.75);

    let production = RootConfiguration::with_base_path("production", tmp.path()).unwrap();
    let defaults = MarketParameters::default();
    assert!(production.algorithm().pop_size > AlgorithmParameters::default().pop_size);
    assert!(production.market().risk.max_position_size < defaults.risk.max_position_size);
    assert!(production.market().risk.stop_loss_pct < defaults.risk.stop_loss_pct);
    assert_eq!(production.market().symbols, defaults.symbols);

    let staging = RootConfiguration::with_base_path("staging", tmp.path()).unwrap();
    assert!(staging.algorithm().pop_size < production.algorithm().pop_size);
    assert_eq!(
        staging.market().risk.max_daily_loss,
        production.market().risk.max_daily_loss
    );
}

#[test]
fn test_empty_overrides_are_a_noop() {
    let algorithm = AlgorithmParameters::default();
    assert_eq!(algorithm.with_overrides(&Overrides::new()).unwrap(), algorithm);

    let market = MarketParameters::default();
    assert_eq!(market.with_overrides(&Overrides::new()).unwrap(), market);

    let persistence = PersistenceParameters::default();
    assert_eq!(persistence.with_overrides(&Overrides::new()).unwrap(), persistence);
}

#[test]
fn test_population_override_changes_only_that_field() {
    let defaults = AlgorithmParameters::default();
    let updated = defaults.with_overrides(&overrides(json!({ "pop_size": 50 }))).unwrap();

    assert_eq!(updated.pop_size, 50);
    assert_eq!(
        AlgorithmParameters {
            pop_size: defaults.pop_size,
            ..updated
        },
        defaults
    );
}

#[test]
fn test_overrides_are_atomic() {
    let original = AlgorithmParameters::default();
    let snapshot = original.clone();

    let err = original
        .with_overrides(&overrides(json!({ "pop_size": 50, "crossover_rate": 1.5 })))
        .unwrap_err();
    assert!(matches!(err, AnetaError::InvalidValue { ref field, .. } if field == "crossover_rate"));
    assert_eq!(original, snapshot);

    let err = original
        .with_overrides(&overrides(json!({ "pop_size": 50, "population": 10 })))
        .unwrap_err();
    assert!(matches!(
        err,
        AnetaError::UnknownField { ref section, ref field } if section == "algorithm" && field == "population"
    ));
    assert_eq!(original, snapshot);
}

#[test]
fn test_type_mismatch_is_invalid_value() {
    let err = MarketParameters::default()
        .with_overrides(&overrides(json!({ "lookback_periods": "two hundred" })))
        .unwrap_err();
    assert!(matches!(err, AnetaError::InvalidValue { ref section, .. } if section == "market"));
}

#[test]
fn test_construction_is_idempotent_on_disk() {
    let tmp = TempDir::new().unwrap();
    let first = RootConfiguration::with_base_path("development", tmp.path()).unwrap();
    fs::write(first.models_path().join("champion.json"), "{}").unwrap();

    let second = RootConfiguration::with_base_path("development", tmp.path()).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        fs::read_to_string(second.models_path().join("champion.json")).unwrap(),
        "{}"
    );
}

#[test]
fn test_blocked_directory_aborts_construction() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("logs"), "").unwrap();

    let err = RootConfiguration::with_base_path("development", tmp.path()).unwrap_err();
    match err {
        AnetaError::DirectoryCreation { path, .. } => assert_eq!(path, tmp.path().join("logs")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_file_overrides_layer_over_environment() {
    let tmp = TempDir::new().unwrap();
    let file = tmp.path().join("overrides.toml");
    fs::write(
        &file,
        r#"
[algorithm]
pop_size = 64
hidden_layers = [32, 16]

[market]
symbols = ["BTC/USDT"]
timeframe = "15m"

[persistence.collections]
experiments = "exp"
strategies = "strat"
performances = "perf"
market_data = "md"
system_metrics = "metrics"
"#,
    )
    .unwrap();

    let config = RootConfiguration::from_file("testing", tmp.path().join("run"), &file).unwrap();

    assert_eq!(config.algorithm().pop_size, 64);
    assert_eq!(config.algorithm().max_generations, 10);
    assert_eq!(config.algorithm().topology.hidden_layers, vec![32, 16]);
    assert_eq!(config.market().symbols, vec!["BTC/USDT".to_string()]);
    assert_eq!(config.market().timeframe, "15m");
    assert_eq!(config.persistence().collection(CollectionRole::Strategies), Some("strat"));
    assert_eq!(config.persistence().cache_ttl, 0);
}

#[test]
fn test_small_population_file_override_under_testing() {
    let tmp = TempDir::new().unwrap();
    let file = tmp.path().join("overrides.toml");
    fs::write(
        &file,
        "[algorithm]\npop_size = 12\nactivation_functions = [\"relu\", \"swish\"]\n",
    )
    .unwrap();

    let config = RootConfiguration::from_file("testing", tmp.path().join("run"), &file).unwrap();

    assert_eq!(config.algorithm().pop_size, 12);
    assert_eq!(config.algorithm().novelty.k_nearest, 15);
    assert_eq!(
        config.algorithm().topology.activation_functions,
        vec!["relu", "swish"]
    );
}

#[test]
fn test_signed_indicator_settings_are_accepted() {
    let updated = MarketParameters::default()
        .with_overrides(&overrides(json!({ "indicators": { "macd_hist": { "offset": -1 } } })))
        .unwrap();
    assert!(updated.indicators.contains_key("macd_hist"));
}

#[test]
fn test_invalid_file_override_creates_nothing() {
    let tmp = TempDir::new().unwrap();
    let file = tmp.path().join("overrides.toml");
    fs::write(&file, "[market]\nstop_loss_pct = 2.0\n").unwrap();
    let base = tmp.path().join("run");

    let err = RootConfiguration::from_file("production", &base, &file).unwrap_err();

    assert!(matches!(err, AnetaError::InvalidValue { ref field, .. } if field == "stop_loss_pct"));
    assert!(!base.exists());
}

#[test]
fn test_snapshot_round_trips_through_file() {
    let tmp = TempDir::new().unwrap();
    let config = RootConfiguration::with_base_path("staging", tmp.path()).unwrap();
    let snapshot = config.logs_path().join("config.toml");

    config.save_snapshot(&snapshot).unwrap();

    let text = fs::read_to_string(&snapshot).unwrap();
    assert!(text.contains("aneta_experiments_staging"));
    assert!(text.contains("pop_size = 300"));
}
