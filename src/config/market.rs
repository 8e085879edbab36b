use super::traits::{ConfigSection, FieldSpec, Rule};
use crate::error::{AnetaError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single indicator setting. Meaning and sign are up to each indicator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IndicatorValue {
    Integer(i64),
    Float(f64),
    Periods(Vec<i64>),
    Levels(Vec<f64>),
}

impl IndicatorValue {
    fn is_finite(&self) -> bool {
        match self {
            IndicatorValue::Integer(_) | IndicatorValue::Periods(_) => true,
            IndicatorValue::Float(x) => x.is_finite(),
            IndicatorValue::Levels(levels) => levels.iter().all(|x| x.is_finite()),
        }
    }
}

pub type IndicatorSettings = BTreeMap<String, IndicatorValue>;

/// Market universe, risk limits and transaction costs for trading and backtesting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketParameters {
    pub symbols: Vec<String>,
    pub timeframe: String,
    pub lookback_periods: usize,
    #[serde(flatten)]
    pub risk: RiskLimits,
    #[serde(flatten)]
    pub costs: TransactionCosts,
    pub indicators: BTreeMap<String, IndicatorSettings>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskLimits {
    pub initial_capital: f64,
    /// Fraction of capital a single position may use
    pub max_position_size: f64,
    pub stop_loss_pct: f64,
    pub take_profit_pct: f64,
    pub max_daily_loss: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionCosts {
    pub commission: f64,
    pub slippage: f64,
}

const SCHEMA: &[FieldSpec] = &[
    FieldSpec::new("symbols", Rule::Names, "Tradable symbols"),
    FieldSpec::new("timeframe", Rule::Timeframe, "Bar size"),
    FieldSpec::new("lookback_periods", Rule::Count, "Bars of history fed to each decision"),
    FieldSpec::new("initial_capital", Rule::Positive, "Starting account equity"),
    FieldSpec::new("max_position_size", Rule::PositionFraction, "Largest share of capital in one position"),
    FieldSpec::new("stop_loss_pct", Rule::OpenFraction, "Loss that closes a position"),
    FieldSpec::new("take_profit_pct", Rule::OpenFraction, "Gain that closes a position"),
    FieldSpec::new("max_daily_loss", Rule::OpenFraction, "Daily loss that halts trading"),
    FieldSpec::new("commission", Rule::NonNegative, "Commission per trade as a fraction of notional"),
    FieldSpec::new("slippage", Rule::NonNegative, "Expected slippage as a fraction of price"),
    FieldSpec::new("indicators", Rule::Table, "Indicator name to its settings"),
];

fn settings<const N: usize>(entries: [(&str, IndicatorValue); N]) -> IndicatorSettings {
    entries
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

impl Default for MarketParameters {
    fn default() -> Self {
        use IndicatorValue::{Integer, Periods};

        let indicators = [
            ("sma", settings([("periods", Periods(vec![20, 50, 200]))])),
            ("ema", settings([("periods", Periods(vec![12, 26]))])),
            ("rsi", settings([("period", Integer(14))])),
            (
                "macd",
                settings([("fast", Integer(12)), ("slow", Integer(26)), ("signal", Integer(9))]),
            ),
            ("bollinger", settings([("period", Integer(20)), ("std", Integer(2))])),
            ("atr", settings([("period", Integer(14))])),
            ("volume_profile", settings([("period", Integer(20))])),
        ]
        .into_iter()
        .map(|(name, s)| (name.to_string(), s))
        .collect();

        Self {
            symbols: vec![
                "BTC/USDT".to_string(),
                "ETH/USDT".to_string(),
                "SOL/USDT".to_string(),
            ],
            timeframe: "1h".to_string(),
            lookback_periods: 200,
            risk: RiskLimits {
                initial_capital: 10000.0,
                max_position_size: 0.2,
                stop_loss_pct: 0.05,
                take_profit_pct: 0.10,
                max_daily_loss: 0.02,
            },
            costs: TransactionCosts {
                commission: 0.001,
                slippage: 0.0005,
            },
            indicators,
        }
    }
}

impl ConfigSection for MarketParameters {
    fn section_name() -> &'static str {
        "market"
    }

    fn schema() -> &'static [FieldSpec] {
        SCHEMA
    }

    fn check_invariants(&self) -> Result<()> {
        for (name, settings) in &self.indicators {
            if name.trim().is_empty() {
                return Err(AnetaError::invalid_value(
                    Self::section_name(),
                    "indicators",
                    "indicator name must not be empty",
                ));
            }
            if let Some((key, value)) = settings.iter().find(|(_, v)| !v.is_finite()) {
                return Err(AnetaError::invalid_value(
                    Self::section_name(),
                    "indicators",
                    format!("{}.{} must be a finite number, got {:?}", name, key, value),
                ));
            }
        }
        Ok(())
    }
}
