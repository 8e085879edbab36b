use super::traits::{ConfigSection, FieldSpec, Rule};
use crate::error::{AnetaError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Logical role of a document collection in the remote store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CollectionRole {
    Experiments,
    Strategies,
    Performances,
    MarketData,
    SystemMetrics,
}

impl CollectionRole {
    pub const ALL: [CollectionRole; 5] = [
        CollectionRole::Experiments,
        CollectionRole::Strategies,
        CollectionRole::Performances,
        CollectionRole::MarketData,
        CollectionRole::SystemMetrics,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionRole::Experiments => "experiments",
            CollectionRole::Strategies => "strategies",
            CollectionRole::Performances => "performances",
            CollectionRole::MarketData => "market_data",
            CollectionRole::SystemMetrics => "system_metrics",
        }
    }
}

impl fmt::Display for CollectionRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Addressing and batching settings for the remote document store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistenceParameters {
    pub project_id: String,
    pub collection_name: String,
    /// Seconds; zero disables caching
    pub cache_ttl: u64,
    pub batch_size: usize,
    /// Keyed by `CollectionRole::as_str`
    pub collections: BTreeMap<String, String>,
}

const SCHEMA: &[FieldSpec] = &[
    FieldSpec::new("project_id", Rule::Text, "Remote project identifier"),
    FieldSpec::new("collection_name", Rule::Text, "Root collection for experiment documents"),
    FieldSpec::new("cache_ttl", Rule::Unsigned, "Seconds a cached document stays fresh"),
    FieldSpec::new("batch_size", Rule::Count, "Documents per batched write"),
    FieldSpec::new("collections", Rule::Table, "Collection role to physical collection name"),
];

impl PersistenceParameters {
    /// Physical collection name for a role.
    pub fn collection(&self, role: CollectionRole) -> Option<&str> {
        self.collections.get(role.as_str()).map(String::as_str)
    }
}

impl Default for PersistenceParameters {
    fn default() -> Self {
        let collections = [
            (CollectionRole::Experiments, "experiments"),
            (CollectionRole::Strategies, "evolved_strategies"),
            (CollectionRole::Performances, "strategy_performances"),
            (CollectionRole::MarketData, "market_data_cache"),
            (CollectionRole::SystemMetrics, "system_metrics"),
        ]
        .into_iter()
        .map(|(role, name)| (role.as_str().to_string(), name.to_string()))
        .collect();

        Self {
            project_id: "aneta-trading-system".to_string(),
            collection_name: "aneta_experiments".to_string(),
            cache_ttl: 300,
            batch_size: 500,
            collections,
        }
    }
}

impl ConfigSection for PersistenceParameters {
    fn section_name() -> &'static str {
        "persistence"
    }

    fn schema() -> &'static [FieldSpec] {
        SCHEMA
    }

    fn check_invariants(&self) -> Result<()> {
        if let Some(role) = self
            .collections
            .keys()
            .find(|key| !CollectionRole::ALL.iter().any(|r| r.as_str() == key.as_str()))
        {
            return Err(AnetaError::invalid_value(
                Self::section_name(),
                "collections",
                format!("unknown collection role '{}'", role),
            ));
        }
        for role in CollectionRole::ALL {
            match self.collection(role) {
                Some(name) if !name.trim().is_empty() => {}
                Some(_) => {
                    return Err(AnetaError::invalid_value(
                        Self::section_name(),
                        "collections",
                        format!("collection name for '{}' must not be empty", role),
                    ))
                }
                None => {
                    return Err(AnetaError::invalid_value(
                        Self::section_name(),
                        "collections",
                        format!("missing collection for role '{}'", role),
                    ))
                }
            }
        }
        Ok(())
    }
}
