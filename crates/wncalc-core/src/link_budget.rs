//! Link Budget Calculator — received power and margin over one hop
//!
//! Sums transmit power and antenna gains, subtracts the path loss of the
//! selected model and any additional losses, and compares the received power
//! against the noise floor plus the SNR the receiver needs:
//!
//! ```text
//! P_rx   = P_tx + G_tx + G_rx − PL − L_add
//! margin = P_rx − N_floor − SNR_req
//! status = PASS if margin > 0 else FAIL
//! ```
//!
//! When the path loss is undefined (distance outside the model's domain),
//! the loss, the received power, the margin and the status are all
//! not-applicable.
//!
//! ## Example
//!
//! ```rust
//! use wncalc_core::link_budget::{LinkBudget, LinkStatus};
//! use wncalc_core::path_loss::PathLossModel;
//!
//! let result = LinkBudget::new()
//!     .tx_power_dbm(30.0)
//!     .tx_antenna_gain_dbi(15.0)
//!     .rx_antenna_gain_dbi(12.0)
//!     .frequency_ghz(2.4)
//!     .distance_km(5.0)
//!     .model(PathLossModel::FreeSpace)
//!     .additional_losses_db(3.0)
//!     .compute();
//!
//! assert_eq!(result.status, LinkStatus::Pass);
//! ```

use std::fmt;

use crate::calculator::{self, Calculator};
use crate::path_loss::PathLossModel;
use crate::types::{CalcError, CalculationResult, Metric, ScenarioId, NOT_APPLICABLE};
use crate::validation::ValidatedInput;

/// Link classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    /// Positive margin
    Pass,
    /// Zero or negative margin
    Fail,
    /// Margin undefined
    NotApplicable,
}

impl LinkStatus {
    pub fn from_margin(margin_db: Option<f64>) -> Self {
        match margin_db {
            Some(m) if m > 0.0 => LinkStatus::Pass,
            Some(_) => LinkStatus::Fail,
            None => LinkStatus::NotApplicable,
        }
    }
}

impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkStatus::Pass => f.write_str("PASS"),
            LinkStatus::Fail => f.write_str("FAIL"),
            LinkStatus::NotApplicable => f.write_str(NOT_APPLICABLE),
        }
    }
}

/// Link budget result. `None` marks a not-applicable value.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkBudgetResult {
    /// Transmit power (dBm).
    pub transmitted_power_dbm: f64,
    /// Path loss (dB, positive value).
    pub path_loss_db: Option<f64>,
    /// Received power (dBm).
    pub received_power_dbm: Option<f64>,
    /// Margin above noise floor plus required SNR (dB).
    pub link_margin_db: Option<f64>,
    pub status: LinkStatus,
    pub model: PathLossModel,
}

impl LinkBudgetResult {
    pub fn to_result(&self) -> CalculationResult {
        let status = match self.status {
            LinkStatus::NotApplicable => Metric::NotApplicable,
            s => Metric::label(s.to_string()),
        };
        CalculationResult::new(ScenarioId::LinkBudget)
            .with("transmittedPowerDbm", Metric::number(self.transmitted_power_dbm, 2))
            .with("pathLossDb", Metric::optional(self.path_loss_db, 2))
            .with("receivedPowerDbm", Metric::optional(self.received_power_dbm, 2))
            .with("linkMarginDb", Metric::optional(self.link_margin_db, 2))
            .with("linkStatus", status)
    }
}

/// Link budget builder.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkBudget {
    tx_power_dbm: f64,
    tx_antenna_gain_dbi: f64,
    rx_antenna_gain_dbi: f64,
    frequency_hz: f64,
    distance_m: f64,
    model: PathLossModel,
    additional_losses_db: f64,
    noise_floor_dbm: f64,
    required_snr_db: f64,
}

impl LinkBudget {
    pub fn new() -> Self {
        Self {
            tx_power_dbm: 0.0,
            tx_antenna_gain_dbi: 0.0,
            rx_antenna_gain_dbi: 0.0,
            frequency_hz: 1e9,
            distance_m: 1000.0,
            model: PathLossModel::FreeSpace,
            additional_losses_db: 0.0,
            noise_floor_dbm: -100.0,
            required_snr_db: 10.0,
        }
    }

    pub fn tx_power_dbm(mut self, power: f64) -> Self {
        self.tx_power_dbm = power;
        self
    }

    pub fn tx_antenna_gain_dbi(mut self, gain: f64) -> Self {
        self.tx_antenna_gain_dbi = gain;
        self
    }

    pub fn rx_antenna_gain_dbi(mut self, gain: f64) -> Self {
        self.rx_antenna_gain_dbi = gain;
        self
    }

    pub fn frequency_ghz(mut self, ghz: f64) -> Self {
        self.frequency_hz = ghz * 1e9;
        self
    }

    pub fn distance_km(mut self, km: f64) -> Self {
        self.distance_m = km * 1000.0;
        self
    }

    pub fn model(mut self, model: PathLossModel) -> Self {
        self.model = model;
        self
    }

    pub fn additional_losses_db(mut self, loss: f64) -> Self {
        self.additional_losses_db = loss;
        self
    }

    pub fn noise_floor_dbm(mut self, floor: f64) -> Self {
        self.noise_floor_dbm = floor;
        self
    }

    pub fn required_snr_db(mut self, snr: f64) -> Self {
        self.required_snr_db = snr;
        self
    }

    pub fn from_input(input: &ValidatedInput) -> Result<Self, CalcError> {
        calculator::expect_scenario(input, ScenarioId::LinkBudget)?;
        Ok(Self::new()
            .tx_power_dbm(calculator::number(input, "transmitterPower")?)
            .tx_antenna_gain_dbi(calculator::number(input, "transmitterGain")?)
            .rx_antenna_gain_dbi(calculator::number(input, "receiverGain")?)
            .frequency_ghz(calculator::number(input, "frequency")?)
            .distance_km(calculator::number(input, "distance")?)
            .model(PathLossModel::from_tag(calculator::tag(input, "pathLossModel")?))
            .additional_losses_db(calculator::number(input, "additionalLosses")?)
            .noise_floor_dbm(calculator::number(input, "noiseFloor")?)
            .required_snr_db(calculator::number(input, "requiredSNR")?))
    }

    /// Compute the link budget.
    pub fn compute(&self) -> LinkBudgetResult {
        let path_loss_db = finite(self.model.path_loss_db(self.frequency_hz, self.distance_m));

        let received_power_dbm = path_loss_db
            .map(|pl| {
                self.tx_power_dbm + self.tx_antenna_gain_dbi + self.rx_antenna_gain_dbi
                    - pl
                    - self.additional_losses_db
            })
            .and_then(finite);

        let link_margin_db = received_power_dbm
            .map(|p_rx| p_rx - self.noise_floor_dbm - self.required_snr_db)
            .and_then(finite);

        if path_loss_db.is_none() {
            tracing::debug!(model = %self.model, distance_m = self.distance_m, "path loss not applicable");
        }

        LinkBudgetResult {
            transmitted_power_dbm: self.tx_power_dbm,
            path_loss_db,
            received_power_dbm,
            link_margin_db,
            status: LinkStatus::from_margin(link_margin_db),
            model: self.model,
        }
    }
}

impl Default for LinkBudget {
    fn default() -> Self {
        Self::new()
    }
}

fn finite(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}

/// Calculator for the `link_budget` scenario.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkBudgetCalculator;

impl LinkBudgetCalculator {
    pub const READS: &'static [&'static str] = &[
        "transmitterPower",
        "transmitterGain",
        "receiverGain",
        "frequency",
        "distance",
        "pathLossModel",
        "additionalLosses",
        "noiseFloor",
        "requiredSNR",
    ];
}

impl Calculator for LinkBudgetCalculator {
    fn scenario(&self) -> ScenarioId {
        ScenarioId::LinkBudget
    }

    fn reads(&self) -> &'static [&'static str] {
        Self::READS
    }

    fn calculate(&self, input: &ValidatedInput) -> Result<CalculationResult, CalcError> {
        Ok(LinkBudget::from_input(input)?.compute().to_result())
    }
}
