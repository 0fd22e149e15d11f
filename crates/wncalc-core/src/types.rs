//! Core types shared by every calculator.
//!
//! - [`ScenarioId`]: the four calculator identifiers used on the wire
//! - [`Metric`]: one formatted result value, or the not-applicable sentinel
//! - [`CalculationResult`]: ordered metric name → value mapping
//! - [`CalcError`]: top-level error for the calculation pipeline

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::ConfigError;
use crate::validation::ValidationError;

/// Text rendered in place of a value whose formula is undefined for the input.
pub const NOT_APPLICABLE: &str = "N/A";

/// Calculator scenario identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioId {
    /// Processing-chain bit-rate pipeline
    WirelessComm,
    /// OFDM resource rates
    Ofdm,
    /// Link budget with path-loss model selection
    LinkBudget,
    /// Cellular system dimensioning
    CellularDesign,
}

impl ScenarioId {
    pub const ALL: [ScenarioId; 4] = [
        ScenarioId::WirelessComm,
        ScenarioId::Ofdm,
        ScenarioId::LinkBudget,
        ScenarioId::CellularDesign,
    ];

    /// Wire identifier (`wireless_comm`, `ofdm`, `link_budget`, `cellular_design`).
    pub fn as_str(&self) -> &'static str {
        match self {
            ScenarioId::WirelessComm => "wireless_comm",
            ScenarioId::Ofdm => "ofdm",
            ScenarioId::LinkBudget => "link_budget",
            ScenarioId::CellularDesign => "cellular_design",
        }
    }

    /// Human-readable title derived from the wire identifier ("Link Budget").
    pub fn title(&self) -> String {
        self.as_str()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScenarioId {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ScenarioId::ALL
            .into_iter()
            .find(|id| id.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CalcError::UnknownScenario(wanted.to_string()))
    }
}

/// One entry of a [`CalculationResult`].
#[derive(Debug, Clone, PartialEq)]
pub enum Metric {
    /// Numeric value rendered with a fixed number of decimals.
    Number { value: f64, decimals: usize },
    /// Classification label (PASS/FAIL, coverage-limited, ...).
    Label(String),
    /// Formula undefined for the given input.
    NotApplicable,
}

impl Metric {
    pub fn number(value: f64, decimals: usize) -> Self {
        Metric::Number { value, decimals }
    }

    pub fn count(value: u64) -> Self {
        Metric::Number {
            value: value as f64,
            decimals: 0,
        }
    }

    pub fn label(text: impl Into<String>) -> Self {
        Metric::Label(text.into())
    }

    /// Number when finite, [`Metric::NotApplicable`] otherwise.
    pub fn finite_or_na(value: f64, decimals: usize) -> Self {
        if value.is_finite() {
            Metric::number(value, decimals)
        } else {
            Metric::NotApplicable
        }
    }

    /// Number when present and finite, [`Metric::NotApplicable`] otherwise.
    pub fn optional(value: Option<f64>, decimals: usize) -> Self {
        match value {
            Some(v) => Metric::finite_or_na(v, decimals),
            None => Metric::NotApplicable,
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Metric::Number { value, .. } => Some(*value),
            _ => None,
        }
    }

    pub fn is_not_applicable(&self) -> bool {
        matches!(self, Metric::NotApplicable)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Number { value, decimals } => write!(f, "{:.*}", decimals, value),
            Metric::Label(text) => f.write_str(text),
            Metric::NotApplicable => f.write_str(NOT_APPLICABLE),
        }
    }
}

impl Serialize for Metric {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Ordered mapping from metric name to formatted value.
///
/// Produced once per submission by a calculator; serializes as a JSON object
/// whose values are the formatted strings.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculationResult {
    scenario: ScenarioId,
    metrics: Vec<(&'static str, Metric)>,
}

impl CalculationResult {
    pub fn new(scenario: ScenarioId) -> Self {
        Self {
            scenario,
            metrics: Vec::new(),
        }
    }

    /// Append a metric (builder style).
    pub fn with(mut self, name: &'static str, metric: Metric) -> Self {
        self.push(name, metric);
        self
    }

    /// Append a metric, replacing an earlier one with the same name.
    pub fn push(&mut self, name: &'static str, metric: Metric) {
        match self.metrics.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = metric,
            None => self.metrics.push((name, metric)),
        }
    }

    pub fn scenario(&self) -> ScenarioId {
        self.scenario
    }

    pub fn get(&self, name: &str) -> Option<&Metric> {
        self.metrics
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, m)| m)
    }

    /// Numeric value of a metric, `None` if absent, a label, or not-applicable.
    pub fn value(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Metric::value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Metric)> {
        self.metrics.iter().map(|(n, m)| (*n, m))
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}

impl Serialize for CalculationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.metrics.len()))?;
        for (name, metric) in &self.metrics {
            map.serialize_entry(name, metric)?;
        }
        map.end()
    }
}

/// Error type for the calculation pipeline.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CalcError {
    #[error("unknown scenario '{0}'. Expected one of: wireless_comm, ofdm, link_budget, cellular_design")]
    UnknownScenario(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("input was validated for {actual}, not {expected}")]
    ScenarioMismatch {
        expected: ScenarioId,
        actual: ScenarioId,
    },

    #[error("validated input for {scenario} is missing field '{field}'")]
    MissingField {
        scenario: ScenarioId,
        field: &'static str,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}
