//! # Wireless Network Calculator Core
//!
//! Four independent engineering calculators for wireless and mobile network
//! design, each a pure function from validated input to a formatted result:
//!
//! - **Wireless chain**: bit rate through sampler, quantizer, source encoder,
//!   channel encoder, interleaver and burst formatter
//! - **OFDM**: resource element, symbol and resource block rates, capacity,
//!   spectral efficiency
//! - **Link budget**: path loss (free space, two-ray, Okumura-Hata),
//!   received power, link margin, PASS/FAIL
//! - **Cellular design**: coverage- vs capacity-limited cell count, cell
//!   radius, spectral and reuse efficiency
//!
//! ## Data Flow
//!
//! ```text
//! ScenarioInput (raw text) → validate → ValidatedInput → Calculator → CalculationResult
//!                                                                   ↘ ExplanationRequest → service
//! ```
//!
//! ## Example
//!
//! ```rust
//! use wncalc_core::prelude::*;
//!
//! let raw: ScenarioInput = [
//!     ("samplingRate", "8000"),
//!     ("sourceDataRate", "64000"),
//!     ("quantizationBits", "8"),
//!     ("sourceCompressionRatio", "0.5"),
//!     ("channelCodeRate", "0.75"),
//!     ("interleavingFactor", "4"),
//!     ("burstOverhead", "10"),
//! ]
//! .into_iter()
//! .collect();
//!
//! let calc = run(ScenarioId::WirelessComm, &raw).unwrap();
//! assert_eq!(calc.result.get("burstFormatterOutput").unwrap().to_string(), "46933.33");
//! ```

pub mod calculator;
pub mod cellular_design;
pub mod config;
pub mod explain;
pub mod link_budget;
pub mod observe;
pub mod ofdm_rate;
pub mod path_loss;
pub mod types;
pub mod validation;
pub mod wireless_chain;

// Re-export main types
pub use calculator::{calculator_for, run, Calculation, Calculator};
pub use cellular_design::{CellularDesign, CellularDesignCalculator, DesignLimit, ReusePattern};
pub use config::{ConfigError, OutputFormat, WncalcConfig};
pub use explain::{Explanation, ExplanationRequest, ExplanationSession, ExplanationTransport, TransportError};
pub use link_budget::{LinkBudget, LinkBudgetCalculator, LinkStatus};
pub use ofdm_rate::{ModulationScheme, OfdmGrid, OfdmRateCalculator};
pub use path_loss::PathLossModel;
pub use types::{CalcError, CalculationResult, Metric, ScenarioId, NOT_APPLICABLE};
pub use validation::{validate, FieldIssue, ScenarioInput, ValidatedInput, ValidationError};
pub use wireless_chain::{WirelessChain, WirelessChainCalculator};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::calculator::{run, Calculation, Calculator};
    pub use crate::explain::{Explanation, ExplanationRequest, ExplanationSession};
    pub use crate::types::{CalcError, CalculationResult, Metric, ScenarioId};
    pub use crate::validation::{validate, ScenarioInput, ValidatedInput};
}
