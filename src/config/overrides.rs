//! Static environment override table.
//!
//! Each profile maps to a list of `(section, field, value)` entries that are
//! applied on top of section defaults through `ConfigSection::with_overrides`.
//! Adding environment-specific behaviour means adding rows here.

use super::environment::EnvironmentProfile;
use super::traits::Overrides;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Algorithm,
    Market,
    Persistence,
}

impl Section {
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Algorithm => "algorithm",
            Section::Market => "market",
            Section::Persistence => "persistence",
        }
    }
}

/// Literal override value, const-constructible so the table can be static.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Literal {
    Int(u64),
    Float(f64),
    Bool(bool),
    Str(&'static str),
}

impl Literal {
    pub fn to_value(self) -> Value {
        match self {
            Literal::Int(n) => Value::from(n),
            Literal::Float(x) => Value::from(x),
            Literal::Bool(b) => Value::Bool(b),
            Literal::Str(s) => Value::from(s),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverrideEntry {
    pub section: Section,
    pub field: &'static str,
    pub value: Literal,
}

const fn entry(section: Section, field: &'static str, value: Literal) -> OverrideEntry {
    OverrideEntry { section, field, value }
}

use Literal::{Float, Int, Str};
use Section::{Algorithm, Market, Persistence};

const DEVELOPMENT: &[OverrideEntry] = &[];

const TESTING: &[OverrideEntry] = &[
    entry(Algorithm, "pop_size", Int(20)),
    entry(Algorithm, "max_generations", Int(10)),
    entry(Market, "lookback_periods", Int(50)),
    entry(Persistence, "cache_ttl", Int(0)),
    entry(Persistence, "batch_size", Int(50)),
    entry(Persistence, "collection_name", Str("aneta_experiments_test")),
];

const STAGING: &[OverrideEntry] = &[
    entry(Algorithm, "pop_size", Int(300)),
    entry(Algorithm, "max_generations", Int(750)),
    entry(Market, "max_position_size", Float(0.1)),
    entry(Market, "stop_loss_pct", Float(0.03)),
    entry(Market, "max_daily_loss", Float(0.01)),
    entry(Persistence, "collection_name", Str("aneta_experiments_staging")),
];

const PRODUCTION: &[OverrideEntry] = &[
    entry(Algorithm, "pop_size", Int(500)),
    entry(Algorithm, "max_generations", Int(1000)),
    entry(Market, "max_position_size", Float(0.1)),
    entry(Market, "stop_loss_pct", Float(0.03)),
    entry(Market, "max_daily_loss", Float(0.01)),
    entry(Persistence, "cache_ttl", Int(600)),
];

pub fn overrides_for(profile: EnvironmentProfile) -> &'static [OverrideEntry] {
    match profile {
        EnvironmentProfile::Development => DEVELOPMENT,
        EnvironmentProfile::Testing => TESTING,
        EnvironmentProfile::Staging => STAGING,
        EnvironmentProfile::Production => PRODUCTION,
    }
}

/// Collects the entries for one section into a field map.
pub fn section_overrides(entries: &[OverrideEntry], section: Section) -> Overrides {
    entries
        .iter()
        .filter(|e| e.section == section)
        .map(|e| (e.field.to_string(), e.value.to_value()))
        .collect()
}
