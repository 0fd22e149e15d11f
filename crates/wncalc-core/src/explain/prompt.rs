//! Labelled parameter and result listings.
//!
//! Every field and metric has a display label and unit. The same listing
//! feeds the explanation prompt, the offline summary and the CLI report.

use std::fmt;

use super::ExplanationRequest;
use crate::types::{CalculationResult, ScenarioId, NOT_APPLICABLE};
use crate::validation::ValidatedInput;

/// Display name and unit suffix for one key. `suffix` includes any
/// separating space (`" bps"`, `"%"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Label {
    pub key: &'static str,
    pub label: &'static str,
    pub suffix: &'static str,
}

const fn label(key: &'static str, label: &'static str, suffix: &'static str) -> Label {
    Label { key, label, suffix }
}

const WIRELESS_COMM_INPUTS: &[Label] = &[
    label("sourceDataRate", "Source Data Rate", " bps"),
    label("samplingRate", "Sampling Rate", " Hz"),
    label("quantizationBits", "Quantization Bits", ""),
    label("sourceCompressionRatio", "Source Compression Ratio", ""),
    label("channelCodeRate", "Channel Code Rate", ""),
    label("interleavingFactor", "Interleaving Factor", ""),
    label("burstOverhead", "Burst Overhead", "%"),
];

const WIRELESS_COMM_RESULTS: &[Label] = &[
    label("samplerOutput", "Sampler Output", " bps"),
    label("quantizerOutput", "Quantizer Output", " bps"),
    label("sourceEncoderOutput", "Source Encoder Output", " bps"),
    label("channelEncoderOutput", "Channel Encoder Output", " bps"),
    label("interleaverOutput", "Interleaver Output", " bps"),
    label("burstFormatterOutput", "Burst Formatter Output", " bps"),
];

const OFDM_INPUTS: &[Label] = &[
    label("subcarrierSpacing", "Subcarrier Spacing", " kHz"),
    label("symbolDuration", "Symbol Duration", " μs"),
    label("cyclicPrefixLength", "Cyclic Prefix Length", " μs"),
    label("modulationScheme", "Modulation Scheme", ""),
    label("numSubcarriers", "Number of Subcarriers", ""),
    label("numResourceBlocks", "Number of Resource Blocks", ""),
    label("subcarriersPerRB", "Subcarriers per Resource Block", ""),
    label("parallelRBs", "Parallel Resource Blocks", ""),
];

const OFDM_RESULTS: &[Label] = &[
    label("resourceElementRate", "Resource Element Rate", " kbps"),
    label("ofdmSymbolRate", "OFDM Symbol Rate", " Mbps"),
    label("resourceBlockRate", "Resource Block Rate", " kbps"),
    label("maxTransmissionCapacity", "Maximum Transmission Capacity", " Mbps"),
    label("spectralEfficiency", "Spectral Efficiency", " bps/Hz"),
];

const LINK_BUDGET_INPUTS: &[Label] = &[
    label("transmitterPower", "Transmitter Power", " dBm"),
    label("transmitterGain", "Transmitter Antenna Gain", " dBi"),
    label("receiverGain", "Receiver Antenna Gain", " dBi"),
    label("frequency", "Operating Frequency", " GHz"),
    label("distance", "Distance", " km"),
    label("pathLossModel", "Path Loss Model", ""),
    label("additionalLosses", "Additional Losses", " dB"),
    label("noiseFloor", "Noise Floor", " dBm"),
    label("requiredSNR", "Required SNR", " dB"),
];

const LINK_BUDGET_RESULTS: &[Label] = &[
    label("transmittedPowerDbm", "Transmitted Power", " dBm"),
    label("pathLossDb", "Path Loss", " dB"),
    label("receivedPowerDbm", "Received Power", " dBm"),
    label("linkMarginDb", "Link Margin", " dB"),
    label("linkStatus", "Link Status", ""),
];

const CELLULAR_DESIGN_INPUTS: &[Label] = &[
    label("coverageArea", "Coverage Area", " km²"),
    label("userDensity", "User Density", " users/km²"),
    label("trafficPerUser", "Traffic per User", " Erlang"),
    label("frequencyBand", "Operating Frequency", " GHz"),
    label("channelBandwidth", "Total Bandwidth", " MHz"),
    label("reusePattern", "Frequency Reuse Pattern", ""),
    label("sectorization", "Sectorization", " sectors per cell"),
    label("linkBudgetRange", "Maximum Cell Range", " km"),
    label("interferenceMargin", "Interference Margin", " dB"),
    label("fadingMargin", "Fading Margin", " dB"),
];

const CELLULAR_DESIGN_RESULTS: &[Label] = &[
    label("numCells", "Number of Cells", ""),
    label("cellRadius", "Cell Radius", " km"),
    label("totalUsers", "Total Users", ""),
    label("totalTraffic", "Total Traffic", " Erlang"),
    label("channelsPerCell", "Channels per Cell", ""),
    label("capacityPerCell", "Capacity per Cell", " Erlang"),
    label("spectralEfficiency", "Spectral Efficiency", "%"),
    label("reuseEfficiency", "Reuse Efficiency", "%"),
    label("cellsForCoverage", "Cells for Coverage", ""),
    label("cellsForCapacity", "Cells for Capacity", ""),
    label("designLimit", "Design Limit", ""),
    label("interferenceMargin", "Interference Margin", " dB"),
    label("fadingMargin", "Fading Margin", " dB"),
];

pub fn input_labels(scenario: ScenarioId) -> &'static [Label] {
    match scenario {
        ScenarioId::WirelessComm => WIRELESS_COMM_INPUTS,
        ScenarioId::Ofdm => OFDM_INPUTS,
        ScenarioId::LinkBudget => LINK_BUDGET_INPUTS,
        ScenarioId::CellularDesign => CELLULAR_DESIGN_INPUTS,
    }
}

pub fn result_labels(scenario: ScenarioId) -> &'static [Label] {
    match scenario {
        ScenarioId::WirelessComm => WIRELESS_COMM_RESULTS,
        ScenarioId::Ofdm => OFDM_RESULTS,
        ScenarioId::LinkBudget => LINK_BUDGET_RESULTS,
        ScenarioId::CellularDesign => CELLULAR_DESIGN_RESULTS,
    }
}

/// One rendered `Label: value unit` line. The unit is dropped when the
/// value is not applicable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub label: String,
    pub value: String,
    pub suffix: &'static str,
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.value == NOT_APPLICABLE {
            write!(f, "{}: {}", self.label, self.value)
        } else {
            write!(f, "{}: {}{}", self.label, self.value, self.suffix)
        }
    }
}

fn result_line(labels: &[Label], key: &str, value: String) -> Line {
    let (label, suffix) = labels
        .iter()
        .find(|l| l.key == key)
        .map(|l| (l.label.to_string(), l.suffix))
        .unwrap_or_else(|| (key.to_string(), ""));
    Line { label, value, suffix }
}

/// Input lines in label-table order.
pub fn input_lines(input: &ValidatedInput) -> Vec<Line> {
    input_labels(input.scenario())
        .iter()
        .map(|l| Line {
            label: l.label.to_string(),
            value: input
                .get(l.key)
                .map(|v| v.to_string())
                .unwrap_or_else(|| NOT_APPLICABLE.to_string()),
            suffix: l.suffix,
        })
        .collect()
}

/// Result lines in the result's own order.
pub fn result_lines(result: &CalculationResult) -> Vec<Line> {
    let labels = result_labels(result.scenario());
    result
        .iter()
        .map(|(key, metric)| result_line(labels, key, metric.to_string()))
        .collect()
}

/// The labelled listing of a request, as sent for explanation.
pub fn render(request: &ExplanationRequest) -> String {
    let mut out = String::from("**Input Parameters:**\n");
    for l in input_lines(request.inputs()) {
        out.push_str(&format!("- {}\n", l));
    }
    out.push_str("\n**Calculated Results:**\n");
    for l in result_lines(request.results()) {
        out.push_str(&format!("- {}\n", l));
    }
    out
}
