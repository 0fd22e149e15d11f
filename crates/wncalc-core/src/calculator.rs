//! Scenario dispatch.
//!
//! Each calculator is a stateless unit struct implementing [`Calculator`].
//! [`run`] is the single entry point from raw text to a result: validate,
//! then compute. Nothing is cached between calls.

use crate::cellular_design::CellularDesignCalculator;
use crate::link_budget::LinkBudgetCalculator;
use crate::ofdm_rate::OfdmRateCalculator;
use crate::types::{CalcError, CalculationResult, ScenarioId};
use crate::validation::{validate, ScenarioInput, ValidatedInput};
use crate::wireless_chain::WirelessChainCalculator;

/// A pure function from validated input to a result.
pub trait Calculator: Send + Sync {
    fn scenario(&self) -> ScenarioId;

    /// Fields the formulas read. Any other validated field is carried for
    /// display and never changes the result.
    fn reads(&self) -> &'static [&'static str];

    fn calculate(&self, input: &ValidatedInput) -> Result<CalculationResult, CalcError>;
}

/// Calculator registered for a scenario.
pub fn calculator_for(scenario: ScenarioId) -> &'static dyn Calculator {
    match scenario {
        ScenarioId::WirelessComm => &WirelessChainCalculator,
        ScenarioId::Ofdm => &OfdmRateCalculator,
        ScenarioId::LinkBudget => &LinkBudgetCalculator,
        ScenarioId::CellularDesign => &CellularDesignCalculator,
    }
}

/// Validated input together with the result computed from it.
#[derive(Debug, Clone, PartialEq)]
pub struct Calculation {
    pub input: ValidatedInput,
    pub result: CalculationResult,
}

/// Validate `raw` for `scenario` and run the matching calculator.
pub fn run(scenario: ScenarioId, raw: &ScenarioInput) -> Result<Calculation, CalcError> {
    let input = validate(scenario, raw)?;
    let result = calculator_for(scenario).calculate(&input)?;
    tracing::debug!(scenario = %scenario, metrics = result.len(), "calculation complete");
    Ok(Calculation { input, result })
}

pub(crate) fn expect_scenario(input: &ValidatedInput, expected: ScenarioId) -> Result<(), CalcError> {
    if input.scenario() == expected {
        Ok(())
    } else {
        Err(CalcError::ScenarioMismatch {
            expected,
            actual: input.scenario(),
        })
    }
}

pub(crate) fn number(input: &ValidatedInput, field: &'static str) -> Result<f64, CalcError> {
    input.number(field).ok_or(CalcError::MissingField {
        scenario: input.scenario(),
        field,
    })
}

pub(crate) fn tag<'a>(input: &'a ValidatedInput, field: &'static str) -> Result<&'a str, CalcError> {
    input.tag(field).ok_or(CalcError::MissingField {
        scenario: input.scenario(),
        field,
    })
}
