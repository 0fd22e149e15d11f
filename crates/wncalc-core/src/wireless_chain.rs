//! Wireless Chain Rate Calculator — bit rate through a transmit chain
//!
//! Follows a digitised source through six processing stages and reports the
//! bit rate at the output of each:
//!
//! ```text
//! Sampler → Quantizer → Source Encoder → Channel Encoder → Interleaver → Burst Formatter
//!   f_s      f_s·n        ·c                /r                (same)       ·(1 + o/100)
//! ```
//!
//! The interleaver permutes bits without adding any, so its rate equals the
//! channel encoder's.
//!
//! ## Example
//!
//! ```rust
//! use wncalc_core::wireless_chain::WirelessChain;
//!
//! let rates = WirelessChain::new()
//!     .sampling_rate_hz(8000.0)
//!     .quantization_bits(8.0)
//!     .compression_ratio(0.5)
//!     .code_rate(0.75)
//!     .burst_overhead_pct(10.0)
//!     .compute();
//!
//! assert_eq!(rates.quantizer_bps, 64_000.0);
//! ```

use crate::calculator::{self, Calculator};
use crate::types::{CalcError, CalculationResult, Metric, ScenarioId};
use crate::validation::ValidatedInput;

/// Output rate of each stage in bits/s.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainRates {
    pub sampler_bps: f64,
    pub quantizer_bps: f64,
    pub source_encoder_bps: f64,
    pub channel_encoder_bps: f64,
    pub interleaver_bps: f64,
    pub burst_formatter_bps: f64,
}

impl ChainRates {
    pub fn to_result(&self) -> CalculationResult {
        CalculationResult::new(ScenarioId::WirelessComm)
            .with("samplerOutput", Metric::number(self.sampler_bps, 2))
            .with("quantizerOutput", Metric::number(self.quantizer_bps, 2))
            .with("sourceEncoderOutput", Metric::number(self.source_encoder_bps, 2))
            .with("channelEncoderOutput", Metric::number(self.channel_encoder_bps, 2))
            .with("interleaverOutput", Metric::number(self.interleaver_bps, 2))
            .with("burstFormatterOutput", Metric::number(self.burst_formatter_bps, 2))
    }
}

/// Processing chain parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct WirelessChain {
    sampling_rate_hz: f64,
    quantization_bits: f64,
    compression_ratio: f64,
    code_rate: f64,
    burst_overhead_pct: f64,
}

impl WirelessChain {
    pub fn new() -> Self {
        Self {
            sampling_rate_hz: 8000.0,
            quantization_bits: 8.0,
            compression_ratio: 1.0,
            code_rate: 1.0,
            burst_overhead_pct: 0.0,
        }
    }

    pub fn sampling_rate_hz(mut self, f_s: f64) -> Self {
        self.sampling_rate_hz = f_s;
        self
    }

    pub fn quantization_bits(mut self, n: f64) -> Self {
        self.quantization_bits = n;
        self
    }

    pub fn compression_ratio(mut self, c: f64) -> Self {
        self.compression_ratio = c;
        self
    }

    /// Channel code rate, 0 < r ≤ 1.
    pub fn code_rate(mut self, r: f64) -> Self {
        self.code_rate = r;
        self
    }

    pub fn burst_overhead_pct(mut self, o: f64) -> Self {
        self.burst_overhead_pct = o;
        self
    }

    /// Build from validated input. Reads only [`WirelessChainCalculator::READS`].
    pub fn from_input(input: &ValidatedInput) -> Result<Self, CalcError> {
        calculator::expect_scenario(input, ScenarioId::WirelessComm)?;
        Ok(Self::new()
            .sampling_rate_hz(calculator::number(input, "samplingRate")?)
            .quantization_bits(calculator::number(input, "quantizationBits")?)
            .compression_ratio(calculator::number(input, "sourceCompressionRatio")?)
            .code_rate(calculator::number(input, "channelCodeRate")?)
            .burst_overhead_pct(calculator::number(input, "burstOverhead")?))
    }

    pub fn compute(&self) -> ChainRates {
        let sampler_bps = self.sampling_rate_hz;
        let quantizer_bps = sampler_bps * self.quantization_bits;
        let source_encoder_bps = quantizer_bps * self.compression_ratio;
        let channel_encoder_bps = source_encoder_bps / self.code_rate;
        let interleaver_bps = channel_encoder_bps;
        let burst_formatter_bps = interleaver_bps * (1.0 + self.burst_overhead_pct / 100.0);

        ChainRates {
            sampler_bps,
            quantizer_bps,
            source_encoder_bps,
            channel_encoder_bps,
            interleaver_bps,
            burst_formatter_bps,
        }
    }
}

impl Default for WirelessChain {
    fn default() -> Self {
        Self::new()
    }
}

/// Calculator for the `wireless_comm` scenario.
#[derive(Debug, Clone, Copy, Default)]
pub struct WirelessChainCalculator;

impl WirelessChainCalculator {
    // sourceDataRate and interleavingFactor are validated but unused
    pub const READS: &'static [&'static str] = &[
        "samplingRate",
        "quantizationBits",
        "sourceCompressionRatio",
        "channelCodeRate",
        "burstOverhead",
    ];
}

impl Calculator for WirelessChainCalculator {
    fn scenario(&self) -> ScenarioId {
        ScenarioId::WirelessComm
    }

    fn reads(&self) -> &'static [&'static str] {
        Self::READS
    }

    fn calculate(&self, input: &ValidatedInput) -> Result<CalculationResult, CalcError> {
        Ok(WirelessChain::from_input(input)?.compute().to_result())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn reference_chain() -> WirelessChain {
        WirelessChain::new()
            .sampling_rate_hz(8000.0)
            .quantization_bits(8.0)
            .compression_ratio(0.5)
            .code_rate(0.75)
            .burst_overhead_pct(10.0)
    }

    #[test]
    fn test_reference_rates() {
        let rates = reference_chain().compute();
        assert_eq!(rates.sampler_bps, 8000.0);
        assert_eq!(rates.quantizer_bps, 64_000.0);
        assert_eq!(rates.source_encoder_bps, 32_000.0);
        assert_relative_eq!(rates.channel_encoder_bps, 42_666.666_666, epsilon = 1e-3);
        assert_relative_eq!(rates.burst_formatter_bps, 46_933.333_333, epsilon = 1e-3);
    }

    #[test]
    fn test_interleaver_is_rate_invariant() {
        let rates = reference_chain().code_rate(0.5).compute();
        assert_eq!(rates.interleaver_bps, rates.channel_encoder_bps);
    }

    #[test]
    fn test_zero_overhead_passes_rate_through() {
        let rates = reference_chain().burst_overhead_pct(0.0).compute();
        assert_eq!(rates.burst_formatter_bps, rates.interleaver_bps);
    }

    #[test]
    fn test_formatted_result() {
        let result = reference_chain().compute().to_result();
        let formatted: Vec<String> = result.iter().map(|(_, m)| m.to_string()).collect();
        assert_eq!(
            formatted,
            ["8000.00", "64000.00", "32000.00", "42666.67", "42666.67", "46933.33"]
        );
        assert_eq!(result.scenario(), ScenarioId::WirelessComm);
    }
}
