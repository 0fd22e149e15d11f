//! Offline summary shown when no explanation service is used.

use super::{prompt, ExplanationRequest};
use crate::types::{CalculationResult, Metric, ScenarioId};
use crate::validation::ValidatedInput;

/// Short summary naming the scenario and counting inputs and results,
/// then the labelled listing, then design recommendations where the
/// scenario has them.
pub fn summary(request: &ExplanationRequest) -> String {
    let mut out = format!(
        "Scenario: {}\nInput Parameters: {} parameters provided\nCalculated Results: {} results generated\n",
        request.scenario().title(),
        request.inputs().len(),
        request.results().len(),
    );
    out.push('\n');
    out.push_str(&prompt::render(request));
    if let Some(advice) = recommendations(request.inputs(), request.results()) {
        out.push('\n');
        out.push_str(&advice);
    }
    out
}

/// Design recommendations for a cellular layout, keyed on its design limit.
///
/// `None` for other scenarios, or when the limit is not applicable.
pub fn recommendations(input: &ValidatedInput, result: &CalculationResult) -> Option<String> {
    if result.scenario() != ScenarioId::CellularDesign {
        return None;
    }
    let limit = match result.get("designLimit")? {
        Metric::Label(limit) => limit.as_str(),
        _ => return None,
    };

    let mut out = String::from("Design Recommendations:\n");
    match limit {
        "coverage-limited" => {
            out.push_str("Coverage-limited design:\n");
            out.push_str("- The system is primarily limited by coverage requirements.\n");
            out.push_str(
                "- Consider increasing base station power, antenna height, or using more sensitive receivers to extend range.\n",
            );
            out.push_str(
                "- Cell splitting might be necessary in areas with high user density to improve coverage and capacity.\n",
            );
        }
        _ => {
            out.push_str("Capacity-limited design:\n");
            out.push_str("- The system is primarily limited by traffic capacity.\n");
            out.push_str("- Implement more sectors per cell site to increase capacity within existing cells.\n");
            out.push_str(
                "- Consider using a smaller frequency reuse pattern (smaller N) if interference can be managed.\n",
            );
            out.push_str(
                "- Explore advanced techniques like CDMA or OFDMA to improve spectral efficiency and overall capacity.\n",
            );
        }
    }

    out.push_str("\nFrequency Planning:\n");
    if let (Some(n), Some(reuse)) = (input.tag("reusePattern"), result.get("reuseEfficiency")) {
        out.push_str(&format!(
            "- Reuse pattern N={} provides {}% frequency efficiency.\n",
            n, reuse
        ));
    }
    let sectors = input.number("sectorization").filter(|s| *s > 0.0).unwrap_or(1.0);
    if sectors > 1.0 {
        out.push_str(&format!(
            "- Sectorization ({} sectors) helps in reducing co-channel interference and improving capacity.\n",
            sectors
        ));
    } else {
        out.push_str("- Omnidirectional antennas are used, which might lead to higher interference.\n");
    }

    Some(out)
}
