//! Input Validation — raw form text to finite, typed values
//!
//! Every scenario declares its fields in a static table of [`FieldSpec`]s.
//! [`validate`] checks a [`ScenarioInput`] against that table, collects every
//! problem it finds, and only on a clean pass produces a [`ValidatedInput`].
//! A calculator never sees input that has not been through here.
//!
//! ## Example
//!
//! ```rust
//! use wncalc_core::validation::{validate, ScenarioInput};
//! use wncalc_core::ScenarioId;
//!
//! let raw: ScenarioInput = [
//!     ("transmitterPower", "30"),
//!     ("transmitterGain", "15"),
//!     ("receiverGain", "12"),
//!     ("frequency", "2.4"),
//!     ("distance", "5"),
//! ]
//! .into_iter()
//! .collect();
//!
//! let validated = validate(ScenarioId::LinkBudget, &raw).unwrap();
//! assert_eq!(validated.number("noiseFloor"), Some(-100.0)); // default filled in
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::types::ScenarioId;

// ---------------------------------------------------------------------------
// Raw and validated records
// ---------------------------------------------------------------------------

/// Raw text for one scenario, keyed by field name. Replaced on every edit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScenarioInput {
    fields: BTreeMap<String, String>,
}

impl ScenarioInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.fields.remove(name)
    }

    /// Raw value, `None` when absent or blank.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ScenarioInput {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// One validated field: a finite number or a categorical tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Tag(String),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(v) => write!(f, "{}", v),
            FieldValue::Tag(t) => f.write_str(t),
        }
    }
}

/// Immutable, validated snapshot of one submission.
///
/// Only [`validate`] constructs one, so every declared field is present
/// (explicitly or via its default) and every number is finite.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidatedInput {
    #[serde(skip)]
    scenario: ScenarioId,
    #[serde(flatten)]
    fields: BTreeMap<String, FieldValue>,
}

impl ValidatedInput {
    pub fn scenario(&self) -> ScenarioId {
        self.scenario
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        match self.fields.get(name)? {
            FieldValue::Number(v) => Some(*v),
            FieldValue::Tag(_) => None,
        }
    }

    pub fn tag(&self, name: &str) -> Option<&str> {
        match self.fields.get(name)? {
            FieldValue::Tag(t) => Some(t.as_str()),
            FieldValue::Number(_) => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Render back to raw text. Re-validating the result yields `self`.
    pub fn to_scenario_input(&self) -> ScenarioInput {
        self.fields
            .iter()
            .map(|(k, v)| (k.clone(), v.to_string()))
            .collect()
    }

    /// Copy with one numeric field replaced. Used to probe which fields a
    /// calculator actually reads.
    pub fn with_number(&self, name: &str, value: f64) -> Self {
        let mut copy = self.clone();
        if value.is_finite() && copy.fields.contains_key(name) {
            copy.fields.insert(name.to_string(), FieldValue::Number(value));
        }
        copy
    }
}

// ---------------------------------------------------------------------------
// Field tables
// ---------------------------------------------------------------------------

/// Numeric constraint applied after parsing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Constraint {
    /// Any finite value
    Finite,
    /// Strictly greater than zero
    Positive,
    /// Zero or greater
    NonNegative,
    /// Whole number of one or more
    PositiveInteger,
    /// 0 < x ≤ 1
    UnitInterval,
}

impl Constraint {
    fn accepts(&self, v: f64) -> bool {
        match self {
            Constraint::Finite => true,
            Constraint::Positive => v > 0.0,
            Constraint::NonNegative => v >= 0.0,
            Constraint::PositiveInteger => v >= 1.0 && v.fract() == 0.0,
            Constraint::UnitInterval => v > 0.0 && v <= 1.0,
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Finite => write!(f, "a finite number"),
            Constraint::Positive => write!(f, "greater than 0"),
            Constraint::NonNegative => write!(f, "0 or greater"),
            Constraint::PositiveInteger => write!(f, "a positive whole number"),
            Constraint::UnitInterval => write!(f, "greater than 0 and at most 1"),
        }
    }
}

/// Kind of value a field holds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    Number(Constraint),
    /// Categorical tag. `None` accepts any tag (the calculator applies its
    /// own fallback); `Some` restricts to the listed tags.
    Category(Option<&'static [&'static str]>),
}

/// Default applied when an optional field is absent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldDefault {
    Number(f64),
    Tag(&'static str),
}

/// Declaration of one input field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    /// `None` means the field is required.
    pub default: Option<FieldDefault>,
    /// An entered zero also takes the default.
    pub zero_is_unset: bool,
}

impl FieldSpec {
    const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            default: None,
            zero_is_unset: false,
        }
    }

    const fn optional(name: &'static str, kind: FieldKind, default: FieldDefault) -> Self {
        Self {
            name,
            kind,
            default: Some(default),
            zero_is_unset: false,
        }
    }

    const fn optional_nonzero(name: &'static str, kind: FieldKind, default: FieldDefault) -> Self {
        Self {
            name,
            kind,
            default: Some(default),
            zero_is_unset: true,
        }
    }

    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

use Constraint::*;
use FieldKind::{Category, Number};

/// Reuse cluster sizes accepted for the cellular scenario.
pub const REUSE_PATTERNS: &[&str] = &["3", "4", "7", "12"];

const WIRELESS_COMM_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("sourceDataRate", Number(Finite)),
    FieldSpec::required("samplingRate", Number(Positive)),
    FieldSpec::required("quantizationBits", Number(PositiveInteger)),
    FieldSpec::required("sourceCompressionRatio", Number(Positive)),
    FieldSpec::required("channelCodeRate", Number(UnitInterval)),
    FieldSpec::required("interleavingFactor", Number(Finite)),
    FieldSpec::required("burstOverhead", Number(NonNegative)),
];

const OFDM_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("subcarrierSpacing", Number(Positive)),
    FieldSpec::required("symbolDuration", Number(NonNegative)),
    FieldSpec::required("cyclicPrefixLength", Number(NonNegative)),
    FieldSpec::required("modulationScheme", Category(None)),
    FieldSpec::required("numSubcarriers", Number(NonNegative)),
    FieldSpec::required("numResourceBlocks", Number(NonNegative)),
    FieldSpec::required("subcarriersPerRB", Number(NonNegative)),
    FieldSpec::required("parallelRBs", Number(Finite)),
];

const LINK_BUDGET_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("transmitterPower", Number(Finite)),
    FieldSpec::required("transmitterGain", Number(Finite)),
    FieldSpec::required("receiverGain", Number(Finite)),
    FieldSpec::required("frequency", Number(Finite)),
    FieldSpec::required("distance", Number(Finite)),
    FieldSpec::optional("pathLossModel", Category(None), FieldDefault::Tag("freespace")),
    FieldSpec::optional("additionalLosses", Number(Finite), FieldDefault::Number(0.0)),
    FieldSpec::optional_nonzero("noiseFloor", Number(Finite), FieldDefault::Number(-100.0)),
    FieldSpec::optional_nonzero("requiredSNR", Number(Finite), FieldDefault::Number(10.0)),
];

const CELLULAR_DESIGN_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("coverageArea", Number(Positive)),
    FieldSpec::required("userDensity", Number(NonNegative)),
    FieldSpec::required("trafficPerUser", Number(NonNegative)),
    FieldSpec::required("frequencyBand", Number(Finite)),
    FieldSpec::required("channelBandwidth", Number(Positive)),
    FieldSpec::required("reusePattern", Category(Some(REUSE_PATTERNS))),
    FieldSpec::optional_nonzero("sectorization", Number(Finite), FieldDefault::Number(1.0)),
    FieldSpec::required("linkBudgetRange", Number(Positive)),
    FieldSpec::optional_nonzero("interferenceMargin", Number(Finite), FieldDefault::Number(3.0)),
    FieldSpec::optional_nonzero("fadingMargin", Number(Finite), FieldDefault::Number(8.0)),
];

/// Field table for a scenario.
pub fn fields(scenario: ScenarioId) -> &'static [FieldSpec] {
    match scenario {
        ScenarioId::WirelessComm => WIRELESS_COMM_FIELDS,
        ScenarioId::Ofdm => OFDM_FIELDS,
        ScenarioId::LinkBudget => LINK_BUDGET_FIELDS,
        ScenarioId::CellularDesign => CELLULAR_DESIGN_FIELDS,
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A single problem with one field.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FieldIssue {
    #[error("{field}: required")]
    Missing { field: &'static str },

    #[error("{field}: '{value}' is not a number")]
    NotNumeric { field: &'static str, value: String },

    #[error("{field}: '{value}' is not finite")]
    NotFinite { field: &'static str, value: String },

    #[error("{field}: {value} must be {constraint}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        constraint: Constraint,
    },

    #[error("{field}: '{value}' is not one of {allowed:?}")]
    NotAllowed {
        field: &'static str,
        value: String,
        allowed: &'static [&'static str],
    },

    #[error("{0}")]
    Inconsistent(&'static str),
}

impl FieldIssue {
    /// Field the issue refers to, if it concerns a single field.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            FieldIssue::Missing { field }
            | FieldIssue::NotNumeric { field, .. }
            | FieldIssue::NotFinite { field, .. }
            | FieldIssue::OutOfRange { field, .. }
            | FieldIssue::NotAllowed { field, .. } => Some(field),
            FieldIssue::Inconsistent(_) => None,
        }
    }
}

/// Input rejected before any calculator ran.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid {scenario} input: {}", join_issues(.issues))]
pub struct ValidationError {
    pub scenario: ScenarioId,
    pub issues: Vec<FieldIssue>,
}

fn join_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

// ---------------------------------------------------------------------------
// Validator
// ---------------------------------------------------------------------------

/// Validate raw input for `scenario`.
///
/// Fields not declared for the scenario are ignored. All issues are
/// collected before returning.
pub fn validate(scenario: ScenarioId, raw: &ScenarioInput) -> Result<ValidatedInput, ValidationError> {
    let specs = fields(scenario);
    let mut values = BTreeMap::new();
    let mut issues = Vec::new();

    for spec in specs {
        match check_field(spec, raw.get(spec.name)) {
            Ok(value) => {
                values.insert(spec.name.to_string(), value);
            }
            Err(issue) => issues.push(issue),
        }
    }

    if issues.is_empty() {
        issues.extend(check_consistency(scenario, &values));
    }

    for (name, _) in raw.iter() {
        if !specs.iter().any(|s| s.name == name) {
            tracing::debug!(scenario = %scenario, field = name, "ignoring undeclared field");
        }
    }

    if !issues.is_empty() {
        tracing::debug!(scenario = %scenario, count = issues.len(), "input rejected");
        return Err(ValidationError { scenario, issues });
    }

    Ok(ValidatedInput {
        scenario,
        fields: values,
    })
}

fn check_field(spec: &FieldSpec, raw: Option<&str>) -> Result<FieldValue, FieldIssue> {
    let Some(text) = raw else {
        return default_for(spec);
    };

    match spec.kind {
        FieldKind::Number(constraint) => {
            let value: f64 = text.parse().map_err(|_| FieldIssue::NotNumeric {
                field: spec.name,
                value: text.to_string(),
            })?;
            if !value.is_finite() {
                return Err(FieldIssue::NotFinite {
                    field: spec.name,
                    value: text.to_string(),
                });
            }
            if value == 0.0 && spec.zero_is_unset {
                return default_for(spec);
            }
            if !constraint.accepts(value) {
                return Err(FieldIssue::OutOfRange {
                    field: spec.name,
                    value,
                    constraint,
                });
            }
            Ok(FieldValue::Number(value))
        }
        FieldKind::Category(None) => Ok(FieldValue::Tag(text.to_string())),
        FieldKind::Category(Some(allowed)) => match_allowed(text, allowed)
            .map(|tag| FieldValue::Tag(tag.to_string()))
            .ok_or_else(|| FieldIssue::NotAllowed {
                field: spec.name,
                value: text.to_string(),
                allowed,
            }),
    }
}

fn default_for(spec: &FieldSpec) -> Result<FieldValue, FieldIssue> {
    match spec.default {
        Some(FieldDefault::Number(v)) => Ok(FieldValue::Number(v)),
        Some(FieldDefault::Tag(t)) => Ok(FieldValue::Tag(t.to_string())),
        None => Err(FieldIssue::Missing { field: spec.name }),
    }
}

/// Exact match first, then numeric equality so "7.0" selects "7".
fn match_allowed(text: &str, allowed: &'static [&'static str]) -> Option<&'static str> {
    if let Some(tag) = allowed.iter().find(|a| a.eq_ignore_ascii_case(text)) {
        return Some(*tag);
    }
    let wanted: f64 = text.parse().ok()?;
    allowed
        .iter()
        .find(|a| a.parse::<f64>().map(|v| v == wanted).unwrap_or(false))
        .copied()
}

fn check_consistency(scenario: ScenarioId, values: &BTreeMap<String, FieldValue>) -> Option<FieldIssue> {
    let number = |name: &str| match values.get(name) {
        Some(FieldValue::Number(v)) => *v,
        _ => 0.0,
    };

    match scenario {
        ScenarioId::Ofdm if number("symbolDuration") + number("cyclicPrefixLength") <= 0.0 => Some(
            FieldIssue::Inconsistent("symbolDuration + cyclicPrefixLength must be greater than 0"),
        ),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wireless_raw() -> ScenarioInput {
        [
            ("sourceDataRate", "1000000"),
            ("samplingRate", "8000"),
            ("quantizationBits", "8"),
            ("sourceCompressionRatio", "0.5"),
            ("channelCodeRate", "0.75"),
            ("interleavingFactor", "1.0"),
            ("burstOverhead", "10"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_valid_wireless_input() {
        let v = validate(ScenarioId::WirelessComm, &wireless_raw()).unwrap();
        assert_eq!(v.scenario(), ScenarioId::WirelessComm);
        assert_eq!(v.number("samplingRate"), Some(8000.0));
        assert_eq!(v.len(), 7);
    }

    #[test]
    fn test_missing_and_non_numeric_collected() {
        let mut raw = wireless_raw();
        raw.remove("samplingRate");
        raw.set("burstOverhead", "ten");
        let err = validate(ScenarioId::WirelessComm, &raw).unwrap_err();
        assert_eq!(err.issues.len(), 2);
        assert!(err.issues.contains(&FieldIssue::Missing { field: "samplingRate" }));
        assert!(matches!(
            err.issues.iter().find(|i| i.field() == Some("burstOverhead")),
            Some(FieldIssue::NotNumeric { .. })
        ));
    }

    #[test]
    fn test_blank_counts_as_missing() {
        let raw = wireless_raw().with("channelCodeRate", "   ");
        let err = validate(ScenarioId::WirelessComm, &raw).unwrap_err();
        assert_eq!(err.issues, vec![FieldIssue::Missing { field: "channelCodeRate" }]);
    }

    #[test]
    fn test_zero_code_rate_rejected() {
        let raw = wireless_raw().with("channelCodeRate", "0");
        let err = validate(ScenarioId::WirelessComm, &raw).unwrap_err();
        assert!(matches!(
            err.issues[0],
            FieldIssue::OutOfRange {
                field: "channelCodeRate",
                constraint: Constraint::UnitInterval,
                ..
            }
        ));
    }

    #[test]
    fn test_fractional_quantization_bits_rejected() {
        let raw = wireless_raw().with("quantizationBits", "7.5");
        assert!(validate(ScenarioId::WirelessComm, &raw).is_err());
    }

    #[test]
    fn test_non_finite_rejected() {
        let raw = wireless_raw().with("sourceDataRate", "inf");
        let err = validate(ScenarioId::WirelessComm, &raw).unwrap_err();
        assert!(matches!(err.issues[0], FieldIssue::NotFinite { .. }));
    }

    #[test]
    fn test_link_budget_defaults() {
        let raw: ScenarioInput = [
            ("transmitterPower", "30"),
            ("transmitterGain", "15"),
            ("receiverGain", "12"),
            ("frequency", "2.4"),
            ("distance", "5"),
        ]
        .into_iter()
        .collect();
        let v = validate(ScenarioId::LinkBudget, &raw).unwrap();
        assert_eq!(v.tag("pathLossModel"), Some("freespace"));
        assert_eq!(v.number("additionalLosses"), Some(0.0));
        assert_eq!(v.number("noiseFloor"), Some(-100.0));
        assert_eq!(v.number("requiredSNR"), Some(10.0));
    }

    #[test]
    fn test_zero_takes_default_for_margins_and_thresholds() {
        let raw: ScenarioInput = [
            ("transmitterPower", "0"),
            ("transmitterGain", "0"),
            ("receiverGain", "0"),
            ("frequency", "2.4"),
            ("distance", "0.5"),
            ("additionalLosses", "0"),
            ("noiseFloor", "0"),
            ("requiredSNR", "0"),
        ]
        .into_iter()
        .collect();
        let v = validate(ScenarioId::LinkBudget, &raw).unwrap();
        assert_eq!(v.number("noiseFloor"), Some(-100.0));
        assert_eq!(v.number("requiredSNR"), Some(10.0));
        assert_eq!(v.number("additionalLosses"), Some(0.0));
        assert_eq!(v.number("transmitterPower"), Some(0.0));

        let raw = raw.with("noiseFloor", "-0.0").with("requiredSNR", "-3");
        let v = validate(ScenarioId::LinkBudget, &raw).unwrap();
        assert_eq!(v.number("noiseFloor"), Some(-100.0));
        assert_eq!(v.number("requiredSNR"), Some(-3.0));
    }

    #[test]
    fn test_zero_cellular_margins_take_default() {
        let raw: ScenarioInput = [
            ("coverageArea", "100"),
            ("userDensity", "1000"),
            ("trafficPerUser", "0.025"),
            ("frequencyBand", "1.9"),
            ("channelBandwidth", "25"),
            ("reusePattern", "7"),
            ("linkBudgetRange", "5"),
            ("sectorization", "0"),
            ("interferenceMargin", "0"),
            ("fadingMargin", "0"),
        ]
        .into_iter()
        .collect();
        let v = validate(ScenarioId::CellularDesign, &raw).unwrap();
        assert_eq!(v.number("sectorization"), Some(1.0));
        assert_eq!(v.number("interferenceMargin"), Some(3.0));
        assert_eq!(v.number("fadingMargin"), Some(8.0));
    }

    #[test]
    fn test_reuse_pattern_allowed_set() {
        let base: ScenarioInput = [
            ("coverageArea", "100"),
            ("userDensity", "1000"),
            ("trafficPerUser", "0.025"),
            ("frequencyBand", "1.9"),
            ("channelBandwidth", "25"),
            ("linkBudgetRange", "5"),
        ]
        .into_iter()
        .collect();

        let ok = validate(ScenarioId::CellularDesign, &base.clone().with("reusePattern", "7.0")).unwrap();
        assert_eq!(ok.tag("reusePattern"), Some("7"));

        let err = validate(ScenarioId::CellularDesign, &base.with("reusePattern", "5")).unwrap_err();
        assert!(matches!(err.issues[0], FieldIssue::NotAllowed { field: "reusePattern", .. }));
    }

    #[test]
    fn test_ofdm_zero_total_symbol_time_rejected() {
        let raw: ScenarioInput = [
            ("subcarrierSpacing", "15"),
            ("symbolDuration", "0"),
            ("cyclicPrefixLength", "0"),
            ("modulationScheme", "QPSK"),
            ("numSubcarriers", "1200"),
            ("numResourceBlocks", "100"),
            ("subcarriersPerRB", "12"),
            ("parallelRBs", "50"),
        ]
        .into_iter()
        .collect();
        let err = validate(ScenarioId::Ofdm, &raw).unwrap_err();
        assert!(matches!(err.issues[0], FieldIssue::Inconsistent(_)));
    }

    #[test]
    fn test_revalidation_is_idempotent() {
        let first = validate(ScenarioId::WirelessComm, &wireless_raw().with("sourceCompressionRatio", "0.1")).unwrap();
        let second = validate(ScenarioId::WirelessComm, &first.to_scenario_input()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_error_message_lists_issues() {
        let err = validate(ScenarioId::Ofdm, &ScenarioInput::new()).unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with("invalid ofdm input"));
        assert!(msg.contains("subcarrierSpacing: required"));
        assert_eq!(err.issues.len(), OFDM_FIELDS.len());
    }
}
