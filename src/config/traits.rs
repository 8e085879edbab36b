use crate::error::{AnetaError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Partial field replacement for a single section, keyed by field name.
pub type Overrides = Map<String, Value>;

/// Validity predicate for a field. Each rule also pins the JSON type it accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Integer >= 1
    Count,
    /// Integer >= 0
    Unsigned,
    /// Float in [0, 1]
    Probability,
    /// Float in (0, 1)
    OpenFraction,
    /// Float in (0, 1]
    PositionFraction,
    /// Finite float >= 0
    NonNegative,
    /// Finite float > 0
    Positive,
    Flag,
    /// Non-empty string
    Text,
    /// Bar size such as "15m", "1h", "1d"
    Timeframe,
    /// List of integers >= 1 (may be empty)
    Widths,
    /// Non-empty list of unique, non-empty strings
    Names,
    /// Nested mapping, checked by the owning section
    Table,
}

impl Rule {
    pub fn check(&self, value: &Value) -> std::result::Result<(), String> {
        match self {
            Rule::Count => match value.as_u64() {
                Some(n) if n >= 1 => Ok(()),
                _ => Err(format!("expected a positive integer, got {}", value)),
            },
            Rule::Unsigned => value
                .as_u64()
                .map(|_| ())
                .ok_or_else(|| format!("expected a non-negative integer, got {}", value)),
            Rule::Probability => check_float(value, |x| (0.0..=1.0).contains(&x), "in [0, 1]"),
            Rule::OpenFraction => check_float(value, |x| x > 0.0 && x < 1.0, "in (0, 1)"),
            Rule::PositionFraction => check_float(value, |x| x > 0.0 && x <= 1.0, "in (0, 1]"),
            Rule::NonNegative => check_float(value, |x| x >= 0.0, ">= 0"),
            Rule::Positive => check_float(value, |x| x > 0.0, "> 0"),
            Rule::Flag => value
                .as_bool()
                .map(|_| ())
                .ok_or_else(|| format!("expected a boolean, got {}", value)),
            Rule::Text => match value.as_str() {
                Some(s) if !s.trim().is_empty() => Ok(()),
                _ => Err(format!("expected a non-empty string, got {}", value)),
            },
            Rule::Timeframe => match value.as_str() {
                Some(s) if is_timeframe(s) => Ok(()),
                _ => Err(format!("expected a timeframe like \"1h\" or \"15m\", got {}", value)),
            },
            Rule::Widths => {
                let items = value
                    .as_array()
                    .ok_or_else(|| format!("expected a list of positive integers, got {}", value))?;
                if items.iter().all(|v| v.as_u64().is_some_and(|n| n >= 1)) {
                    Ok(())
                } else {
                    Err(format!("expected a list of positive integers, got {}", value))
                }
            }
            Rule::Names => {
                let items = value
                    .as_array()
                    .ok_or_else(|| format!("expected a list of names, got {}", value))?;
                if items.is_empty() {
                    return Err("list must not be empty".to_string());
                }
                let mut seen = HashSet::new();
                for item in items {
                    let name = match item.as_str() {
                        Some(s) if !s.trim().is_empty() => s,
                        _ => return Err(format!("expected a non-empty string, got {}", item)),
                    };
                    if !seen.insert(name) {
                        return Err(format!("duplicate entry '{}'", name));
                    }
                }
                Ok(())
            }
            Rule::Table => value
                .as_object()
                .map(|_| ())
                .ok_or_else(|| format!("expected a table, got {}", value)),
        }
    }

    /// Numeric bounds for UI manifests. Open ends are reported as the boundary value.
    pub fn bounds(&self) -> (Option<f64>, Option<f64>) {
        match self {
            Rule::Count => (Some(1.0), None),
            Rule::Unsigned | Rule::NonNegative | Rule::Positive => (Some(0.0), None),
            Rule::Probability | Rule::OpenFraction | Rule::PositionFraction => {
                (Some(0.0), Some(1.0))
            }
            _ => (None, None),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Rule::Count | Rule::Unsigned => "integer",
            Rule::Probability
            | Rule::OpenFraction
            | Rule::PositionFraction
            | Rule::NonNegative
            | Rule::Positive => "float",
            Rule::Flag => "boolean",
            Rule::Text | Rule::Timeframe => "string",
            Rule::Widths => "integer_list",
            Rule::Names => "string_list",
            Rule::Table => "table",
        }
    }
}

fn check_float(
    value: &Value,
    ok: impl Fn(f64) -> bool,
    expectation: &str,
) -> std::result::Result<(), String> {
    match value.as_f64() {
        Some(x) if x.is_finite() && ok(x) => Ok(()),
        _ => Err(format!("expected a number {}, got {}", expectation, value)),
    }
}

fn is_timeframe(label: &str) -> bool {
    let Some(unit) = label.chars().last() else {
        return false;
    };
    let amount = &label[..label.len() - unit.len_utf8()];
    matches!(unit, 'm' | 'h' | 'd' | 'w' | 'M')
        && !amount.is_empty()
        && amount.chars().all(|c| c.is_ascii_digit())
        && amount.parse::<u32>().is_ok_and(|n| n > 0)
}

/// One entry of a section's static schema.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub rule: Rule,
    pub description: &'static str,
}

impl FieldSpec {
    pub const fn new(name: &'static str, rule: Rule, description: &'static str) -> Self {
        Self { name, rule, description }
    }
}

/// Trait for configuration sections
pub trait ConfigSection: Serialize + DeserializeOwned + Default + Clone {
    fn section_name() -> &'static str;

    /// Every overridable field, in serialized (flat) form.
    fn schema() -> &'static [FieldSpec];

    /// Section-specific checks that a per-field rule cannot express.
    fn check_invariants(&self) -> Result<()> {
        Ok(())
    }

    fn field(name: &str) -> Option<&'static FieldSpec> {
        Self::schema().iter().find(|spec| spec.name == name)
    }

    fn validate(&self) -> Result<()> {
        let fields = flatten(self)?;
        for spec in Self::schema() {
            let value = fields
                .get(spec.name)
                .ok_or_else(|| AnetaError::invalid_value(Self::section_name(), spec.name, "missing"))?;
            spec.rule
                .check(value)
                .map_err(|reason| AnetaError::invalid_value(Self::section_name(), spec.name, reason))?;
        }
        self.check_invariants()
    }

    /// Returns a copy with the given fields replaced. Nothing is applied unless
    /// every key is known and the resulting section validates.
    fn with_overrides(&self, overrides: &Overrides) -> Result<Self> {
        if overrides.is_empty() {
            return Ok(self.clone());
        }

        let section = Self::section_name();
        let mut fields = flatten(self)?;
        for (name, value) in overrides {
            let spec = Self::field(name).ok_or_else(|| AnetaError::unknown_field(section, name))?;
            spec.rule
                .check(value)
                .map_err(|reason| AnetaError::invalid_value(section, name, reason))?;
            fields.insert(name.clone(), value.clone());
        }

        let updated: Self = serde_json::from_value(Value::Object(fields)).map_err(|e| {
            let names: Vec<&str> = overrides.keys().map(String::as_str).collect();
            AnetaError::invalid_value(section, &names.join(","), e.to_string())
        })?;
        updated.validate()?;

        log::debug!("Applied {} override(s) to section '{}'", overrides.len(), section);
        Ok(updated)
    }

    fn to_manifest(&self) -> Result<ConfigManifest> {
        let fields = flatten(self)?;
        Ok(ConfigManifest {
            section: Self::section_name().to_string(),
            fields: Self::schema()
                .iter()
                .map(|spec| {
                    let (min, max) = spec.rule.bounds();
                    FieldManifest {
                        name: spec.name.to_string(),
                        field_type: spec.rule.type_name().to_string(),
                        default: fields.get(spec.name).cloned().unwrap_or(Value::Null),
                        min,
                        max,
                        description: spec.description.to_string(),
                    }
                })
                .collect(),
        })
    }
}

fn flatten<T: Serialize>(section: &T) -> Result<Map<String, Value>> {
    match serde_json::to_value(section)? {
        Value::Object(map) => Ok(map),
        other => Err(AnetaError::Serialization(format!(
            "section did not serialize to a table: {}",
            other
        ))),
    }
}

/// Configuration manifest for UI generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigManifest {
    pub section: String,
    pub fields: Vec<FieldManifest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldManifest {
    pub name: String,
    pub field_type: String,
    pub default: serde_json::Value,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub description: String,
}
