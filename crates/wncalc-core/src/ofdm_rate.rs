//! OFDM Rate Calculator — resource element to carrier capacity
//!
//! Derives data rates at each level of the OFDM resource grid from the
//! modulation order and the total symbol time (useful symbol plus cyclic
//! prefix):
//!
//! ```text
//! T_total = T_s + T_cp
//! RE rate       = b / T_total
//! symbol rate   = N_sc · b / T_total
//! RB rate       = N_sc,rb · b / T_total
//! capacity      = N_rb · N_sc,rb · b / T_total
//! spectral eff. = b / (T_total · Δf)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use wncalc_core::ofdm_rate::{ModulationScheme, OfdmGrid};
//!
//! let rates = OfdmGrid::new()
//!     .subcarrier_spacing_khz(15.0)
//!     .symbol_duration_us(66.7)
//!     .cyclic_prefix_us(4.7)
//!     .modulation(ModulationScheme::Qpsk)
//!     .num_subcarriers(1200.0)
//!     .compute();
//!
//! assert!((rates.ofdm_symbol_rate_bps / 1e6 - 33.61).abs() < 0.01);
//! ```

use std::fmt;

use crate::calculator::{self, Calculator};
use crate::types::{CalcError, CalculationResult, Metric, ScenarioId};
use crate::validation::ValidatedInput;

// ---------------------------------------------------------------------------
// Modulation
// ---------------------------------------------------------------------------

/// Subcarrier modulation scheme.
///
/// Unrecognized tags map to [`ModulationScheme::Unrecognized`], which carries
/// the bits per symbol of [`ModulationScheme::FALLBACK`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModulationScheme {
    Bpsk,
    Qpsk,
    Qam16,
    Qam64,
    Qam256,
    /// Tag outside the known set
    Unrecognized,
}

impl ModulationScheme {
    pub const FALLBACK: ModulationScheme = ModulationScheme::Qpsk;

    /// Parse one of `BPSK`, `QPSK`, `16QAM`, `64QAM` or `256QAM`.
    ///
    /// Matching is exact; any other spelling is unrecognized.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "BPSK" => ModulationScheme::Bpsk,
            "QPSK" => ModulationScheme::Qpsk,
            "16QAM" => ModulationScheme::Qam16,
            "64QAM" => ModulationScheme::Qam64,
            "256QAM" => ModulationScheme::Qam256,
            _ => {
                tracing::warn!(tag, fallback = %Self::FALLBACK, "unrecognized modulation scheme");
                ModulationScheme::Unrecognized
            }
        }
    }

    pub fn bits_per_symbol(&self) -> u32 {
        match self {
            ModulationScheme::Bpsk => 1,
            ModulationScheme::Qpsk => 2,
            ModulationScheme::Qam16 => 4,
            ModulationScheme::Qam64 => 6,
            ModulationScheme::Qam256 => 8,
            ModulationScheme::Unrecognized => Self::FALLBACK.bits_per_symbol(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, ModulationScheme::Unrecognized)
    }
}

impl fmt::Display for ModulationScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ModulationScheme::Bpsk => "BPSK",
            ModulationScheme::Qpsk => "QPSK",
            ModulationScheme::Qam16 => "16QAM",
            ModulationScheme::Qam64 => "64QAM",
            ModulationScheme::Qam256 => "256QAM",
            ModulationScheme::Unrecognized => "unrecognized",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Grid rates
// ---------------------------------------------------------------------------

/// Rates in bits/s; spectral efficiency in bits/s/Hz.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OfdmRates {
    pub total_symbol_time_s: f64,
    pub resource_element_rate_bps: f64,
    pub ofdm_symbol_rate_bps: f64,
    pub resource_block_rate_bps: f64,
    pub max_capacity_bps: f64,
    pub spectral_efficiency: f64,
}

impl OfdmRates {
    /// kbps for per-element and per-block rates, Mbps for aggregates.
    pub fn to_result(&self) -> CalculationResult {
        CalculationResult::new(ScenarioId::Ofdm)
            .with("resourceElementRate", Metric::finite_or_na(self.resource_element_rate_bps / 1e3, 2))
            .with("ofdmSymbolRate", Metric::finite_or_na(self.ofdm_symbol_rate_bps / 1e6, 2))
            .with("resourceBlockRate", Metric::finite_or_na(self.resource_block_rate_bps / 1e3, 2))
            .with("maxTransmissionCapacity", Metric::finite_or_na(self.max_capacity_bps / 1e6, 2))
            .with("spectralEfficiency", Metric::finite_or_na(self.spectral_efficiency, 4))
    }
}

/// OFDM numerology and grid dimensions, stored in SI units.
#[derive(Debug, Clone, PartialEq)]
pub struct OfdmGrid {
    subcarrier_spacing_hz: f64,
    symbol_duration_s: f64,
    cyclic_prefix_s: f64,
    modulation: ModulationScheme,
    num_subcarriers: f64,
    num_resource_blocks: f64,
    subcarriers_per_rb: f64,
}

impl OfdmGrid {
    /// LTE 20 MHz normal-CP numerology with QPSK.
    pub fn new() -> Self {
        Self {
            subcarrier_spacing_hz: 15e3,
            symbol_duration_s: 66.7e-6,
            cyclic_prefix_s: 4.7e-6,
            modulation: ModulationScheme::Qpsk,
            num_subcarriers: 1200.0,
            num_resource_blocks: 100.0,
            subcarriers_per_rb: 12.0,
        }
    }

    pub fn subcarrier_spacing_khz(mut self, khz: f64) -> Self {
        self.subcarrier_spacing_hz = khz * 1e3;
        self
    }

    pub fn symbol_duration_us(mut self, us: f64) -> Self {
        self.symbol_duration_s = us * 1e-6;
        self
    }

    pub fn cyclic_prefix_us(mut self, us: f64) -> Self {
        self.cyclic_prefix_s = us * 1e-6;
        self
    }

    pub fn modulation(mut self, scheme: ModulationScheme) -> Self {
        self.modulation = scheme;
        self
    }

    pub fn num_subcarriers(mut self, n: f64) -> Self {
        self.num_subcarriers = n;
        self
    }

    pub fn num_resource_blocks(mut self, n: f64) -> Self {
        self.num_resource_blocks = n;
        self
    }

    pub fn subcarriers_per_rb(mut self, n: f64) -> Self {
        self.subcarriers_per_rb = n;
        self
    }

    pub fn from_input(input: &ValidatedInput) -> Result<Self, CalcError> {
        calculator::expect_scenario(input, ScenarioId::Ofdm)?;
        Ok(Self::new()
            .subcarrier_spacing_khz(calculator::number(input, "subcarrierSpacing")?)
            .symbol_duration_us(calculator::number(input, "symbolDuration")?)
            .cyclic_prefix_us(calculator::number(input, "cyclicPrefixLength")?)
            .modulation(ModulationScheme::from_tag(calculator::tag(input, "modulationScheme")?))
            .num_subcarriers(calculator::number(input, "numSubcarriers")?)
            .num_resource_blocks(calculator::number(input, "numResourceBlocks")?)
            .subcarriers_per_rb(calculator::number(input, "subcarriersPerRB")?))
    }

    pub fn compute(&self) -> OfdmRates {
        let b = f64::from(self.modulation.bits_per_symbol());
        let t_total = self.symbol_duration_s + self.cyclic_prefix_s;

        OfdmRates {
            total_symbol_time_s: t_total,
            resource_element_rate_bps: b / t_total,
            ofdm_symbol_rate_bps: self.num_subcarriers * b / t_total,
            resource_block_rate_bps: self.subcarriers_per_rb * b / t_total,
            max_capacity_bps: self.num_resource_blocks * self.subcarriers_per_rb * b / t_total,
            spectral_efficiency: b / (t_total * self.subcarrier_spacing_hz),
        }
    }
}

impl Default for OfdmGrid {
    fn default() -> Self {
        Self::new()
    }
}

/// Calculator for the `ofdm` scenario.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfdmRateCalculator;

impl OfdmRateCalculator {
    // parallelRBs is validated but unused
    pub const READS: &'static [&'static str] = &[
        "subcarrierSpacing",
        "symbolDuration",
        "cyclicPrefixLength",
        "modulationScheme",
        "numSubcarriers",
        "numResourceBlocks",
        "subcarriersPerRB",
    ];
}

impl Calculator for OfdmRateCalculator {
    fn scenario(&self) -> ScenarioId {
        ScenarioId::Ofdm
    }

    fn reads(&self) -> &'static [&'static str] {
        Self::READS
    }

    fn calculate(&self, input: &ValidatedInput) -> Result<CalculationResult, CalcError> {
        Ok(OfdmGrid::from_input(input)?.compute().to_result())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_lte_reference_grid() {
        let rates = OfdmGrid::new().compute();
        assert_relative_eq!(rates.total_symbol_time_s, 71.4e-6, epsilon = 1e-12);
        assert_relative_eq!(rates.resource_element_rate_bps, 28_011.204, epsilon = 0.01);
        assert_relative_eq!(rates.ofdm_symbol_rate_bps / 1e6, 33.6134, epsilon = 1e-3);
        assert_relative_eq!(rates.resource_block_rate_bps, 12.0 * 2.0 / 71.4e-6, epsilon = 1e-3);
        assert_relative_eq!(rates.max_capacity_bps, 1200.0 * 2.0 / 71.4e-6, epsilon = 1e-3);
        assert_relative_eq!(
            rates.spectral_efficiency,
            2.0 / (71.4e-6 * 15_000.0),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_result_units() {
        let result = OfdmGrid::new().compute().to_result();
        assert_eq!(result.get("resourceElementRate").unwrap().to_string(), "28.01");
        assert_eq!(result.get("ofdmSymbolRate").unwrap().to_string(), "33.61");
        assert_eq!(result.get("resourceBlockRate").unwrap().to_string(), "336.13");
        assert_eq!(result.get("maxTransmissionCapacity").unwrap().to_string(), "33.61");
        assert_eq!(result.get("spectralEfficiency").unwrap().to_string(), "1.8674");
    }

    #[test]
    fn test_modulation_bits() {
        let table = [
            ("BPSK", 1),
            ("QPSK", 2),
            ("16QAM", 4),
            ("64QAM", 6),
            ("256QAM", 8),
        ];
        for (tag, bits) in table {
            assert_eq!(ModulationScheme::from_tag(tag).bits_per_symbol(), bits, "{tag}");
            assert_eq!(ModulationScheme::from_tag(tag).to_string(), tag);
        }
    }

    #[test]
    fn test_modulation_tags_are_exact() {
        for tag in ["qpsk", "64-QAM", "QAM64", "256qam", " 16QAM"] {
            assert_eq!(ModulationScheme::from_tag(tag), ModulationScheme::Unrecognized, "{tag}");
        }
    }

    #[test]
    fn test_unknown_modulation_falls_back_to_qpsk() {
        let scheme = ModulationScheme::from_tag("8PSK");
        assert!(scheme.is_fallback());
        assert_eq!(scheme.bits_per_symbol(), 2);

        let known = OfdmGrid::new().modulation(ModulationScheme::Qpsk).compute();
        let fallback = OfdmGrid::new().modulation(scheme).compute();
        assert_eq!(known, fallback);
        assert!(fallback.max_capacity_bps.is_finite());
    }

    #[test]
    fn test_rate_scales_with_modulation_order() {
        let qpsk = OfdmGrid::new().compute();
        let qam64 = OfdmGrid::new().modulation(ModulationScheme::Qam64).compute();
        assert_relative_eq!(qam64.max_capacity_bps / qpsk.max_capacity_bps, 3.0, epsilon = 1e-12);
    }
}
