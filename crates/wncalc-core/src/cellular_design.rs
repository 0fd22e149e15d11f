//! Cellular Design Calculator — coverage vs capacity dimensioning
//!
//! Sizes a cellular layout twice, once for coverage (how many cells of the
//! link-budget radius tile the area) and once for capacity (how many cells
//! carry the offered traffic with the channels each cell gets under the
//! reuse pattern), and keeps the larger count.
//!
//! Fixed approximations:
//! - 200 kHz per voice channel
//! - 2% blocking, taken as 0.98 Erlang carried per channel
//! - 64 kbps per Erlang for spectral efficiency
//!
//! ## Example
//!
//! ```rust
//! use wncalc_core::cellular_design::{CellularDesign, DesignLimit, ReusePattern};
//!
//! let design = CellularDesign::new()
//!     .coverage_area_km2(100.0)
//!     .user_density(1000.0)
//!     .traffic_per_user_erl(0.025)
//!     .bandwidth_mhz(25.0)
//!     .reuse(ReusePattern::N7)
//!     .max_cell_range_km(5.0)
//!     .compute();
//!
//! assert_eq!(design.limit, Some(DesignLimit::CapacityLimited));
//! ```

use std::f64::consts::PI;
use std::fmt;

use crate::calculator::{self, Calculator};
use crate::types::{CalcError, CalculationResult, Metric, ScenarioId, NOT_APPLICABLE};
use crate::validation::ValidatedInput;

/// Bandwidth of one voice channel in Hz.
pub const VOICE_CHANNEL_BW_HZ: f64 = 200_000.0;

/// Erlang carried per channel at 2% blocking.
pub const ERLANG_PER_CHANNEL: f64 = 0.98;

/// Bit rate equivalent of one Erlang of voice traffic.
pub const BPS_PER_ERLANG: f64 = 64_000.0;

/// Frequency reuse cluster size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReusePattern {
    N3,
    N4,
    N7,
    N12,
}

impl ReusePattern {
    pub fn from_cluster_size(n: u32) -> Option<Self> {
        match n {
            3 => Some(ReusePattern::N3),
            4 => Some(ReusePattern::N4),
            7 => Some(ReusePattern::N7),
            12 => Some(ReusePattern::N12),
            _ => None,
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        tag.trim().parse::<u32>().ok().and_then(Self::from_cluster_size)
    }

    pub fn cluster_size(&self) -> u32 {
        match self {
            ReusePattern::N3 => 3,
            ReusePattern::N4 => 4,
            ReusePattern::N7 => 7,
            ReusePattern::N12 => 12,
        }
    }
}

impl fmt::Display for ReusePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "N={}", self.cluster_size())
    }
}

/// Which requirement fixed the cell count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DesignLimit {
    CoverageLimited,
    CapacityLimited,
}

impl DesignLimit {
    /// Final cell count and the requirement that set it.
    ///
    /// Coverage is compared first; capacity only wins on a strict excess, so
    /// equal counts are coverage-limited.
    pub fn dimension(cells_for_coverage: u64, cells_for_capacity: u64) -> (u64, DesignLimit) {
        if cells_for_capacity > cells_for_coverage {
            (cells_for_capacity, DesignLimit::CapacityLimited)
        } else {
            (cells_for_coverage, DesignLimit::CoverageLimited)
        }
    }
}

impl fmt::Display for DesignLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DesignLimit::CoverageLimited => f.write_str("coverage-limited"),
            DesignLimit::CapacityLimited => f.write_str("capacity-limited"),
        }
    }
}

/// Dimensioning outcome.
///
/// `cells_for_capacity` is `None` when traffic is offered but no cell can
/// carry any (fewer than one channel per reuse group); every value derived
/// from it is then `None` as well.
#[derive(Debug, Clone, PartialEq)]
pub struct CellularDesignResult {
    pub total_users: f64,
    pub total_traffic_erl: f64,
    pub cells_for_coverage: u64,
    pub total_channels: u64,
    pub channels_per_cell: f64,
    pub capacity_per_cell_erl: f64,
    pub cells_for_capacity: Option<u64>,
    pub final_cell_count: Option<u64>,
    pub final_cell_radius_km: Option<f64>,
    pub limit: Option<DesignLimit>,
    /// Carried traffic bit rate over system bandwidth (ratio, not percent).
    pub spectral_efficiency: f64,
    /// 1/N (ratio, not percent).
    pub reuse_efficiency: f64,
    pub sectors: f64,
    pub interference_margin_db: f64,
    pub fading_margin_db: f64,
}

impl CellularDesignResult {
    pub fn to_result(&self) -> CalculationResult {
        let limit = match self.limit {
            Some(l) => Metric::label(l.to_string()),
            None => Metric::NotApplicable,
        };
        CalculationResult::new(ScenarioId::CellularDesign)
            .with("numCells", count_or_na(self.final_cell_count))
            .with("cellRadius", Metric::optional(self.final_cell_radius_km, 2))
            .with("totalUsers", Metric::number(self.total_users, 0))
            .with("totalTraffic", Metric::number(self.total_traffic_erl, 2))
            .with("channelsPerCell", Metric::number(self.channels_per_cell, 2))
            .with("capacityPerCell", Metric::number(self.capacity_per_cell_erl, 2))
            .with("spectralEfficiency", Metric::finite_or_na(self.spectral_efficiency * 100.0, 2))
            .with("reuseEfficiency", Metric::number(self.reuse_efficiency * 100.0, 1))
            .with("cellsForCoverage", Metric::count(self.cells_for_coverage))
            .with("cellsForCapacity", count_or_na(self.cells_for_capacity))
            .with("designLimit", limit)
            .with("interferenceMargin", Metric::number(self.interference_margin_db, 1))
            .with("fadingMargin", Metric::number(self.fading_margin_db, 1))
    }

    /// "coverage-limited", "capacity-limited", or "N/A".
    pub fn limit_label(&self) -> String {
        self.limit
            .map(|l| l.to_string())
            .unwrap_or_else(|| NOT_APPLICABLE.to_string())
    }
}

fn count_or_na(value: Option<u64>) -> Metric {
    value.map(Metric::count).unwrap_or(Metric::NotApplicable)
}

/// Cellular dimensioning parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct CellularDesign {
    coverage_area_km2: f64,
    user_density: f64,
    traffic_per_user_erl: f64,
    bandwidth_hz: f64,
    reuse: ReusePattern,
    sectors: f64,
    max_cell_range_km: f64,
    interference_margin_db: f64,
    fading_margin_db: f64,
}

impl CellularDesign {
    pub fn new() -> Self {
        Self {
            coverage_area_km2: 100.0,
            user_density: 0.0,
            traffic_per_user_erl: 0.0,
            bandwidth_hz: 25e6,
            reuse: ReusePattern::N7,
            sectors: 1.0,
            max_cell_range_km: 5.0,
            interference_margin_db: 3.0,
            fading_margin_db: 8.0,
        }
    }

    pub fn coverage_area_km2(mut self, area: f64) -> Self {
        self.coverage_area_km2 = area;
        self
    }

    pub fn user_density(mut self, users_per_km2: f64) -> Self {
        self.user_density = users_per_km2;
        self
    }

    pub fn traffic_per_user_erl(mut self, erl: f64) -> Self {
        self.traffic_per_user_erl = erl;
        self
    }

    pub fn bandwidth_mhz(mut self, mhz: f64) -> Self {
        self.bandwidth_hz = mhz * 1e6;
        self
    }

    pub fn reuse(mut self, pattern: ReusePattern) -> Self {
        self.reuse = pattern;
        self
    }

    /// Sectors per cell. Non-positive values mean omnidirectional (1).
    pub fn sectors(mut self, sectors: f64) -> Self {
        self.sectors = if sectors > 0.0 { sectors } else { 1.0 };
        self
    }

    pub fn max_cell_range_km(mut self, range: f64) -> Self {
        self.max_cell_range_km = range;
        self
    }

    pub fn interference_margin_db(mut self, margin: f64) -> Self {
        self.interference_margin_db = margin;
        self
    }

    pub fn fading_margin_db(mut self, margin: f64) -> Self {
        self.fading_margin_db = margin;
        self
    }

    pub fn from_input(input: &ValidatedInput) -> Result<Self, CalcError> {
        calculator::expect_scenario(input, ScenarioId::CellularDesign)?;
        let reuse_tag = calculator::tag(input, "reusePattern")?;
        let reuse = ReusePattern::from_tag(reuse_tag).ok_or(CalcError::MissingField {
            scenario: ScenarioId::CellularDesign,
            field: "reusePattern",
        })?;
        Ok(Self::new()
            .coverage_area_km2(calculator::number(input, "coverageArea")?)
            .user_density(calculator::number(input, "userDensity")?)
            .traffic_per_user_erl(calculator::number(input, "trafficPerUser")?)
            .bandwidth_mhz(calculator::number(input, "channelBandwidth")?)
            .reuse(reuse)
            .sectors(calculator::number(input, "sectorization")?)
            .max_cell_range_km(calculator::number(input, "linkBudgetRange")?)
            .interference_margin_db(calculator::number(input, "interferenceMargin")?)
            .fading_margin_db(calculator::number(input, "fadingMargin")?))
    }

    pub fn compute(&self) -> CellularDesignResult {
        let n = f64::from(self.reuse.cluster_size());
        let area = self.coverage_area_km2;

        let total_users = area * self.user_density;
        let total_traffic_erl = total_users * self.traffic_per_user_erl;

        let cells_for_coverage = (area / (PI * self.max_cell_range_km.powi(2))).ceil() as u64;

        let total_channels = (self.bandwidth_hz / VOICE_CHANNEL_BW_HZ).floor() as u64;
        let channels_per_cell = total_channels as f64 / n;
        let capacity_per_cell_erl = channels_per_cell * ERLANG_PER_CHANNEL;

        let sector_capacity = capacity_per_cell_erl * self.sectors;
        let cells_for_capacity = if total_traffic_erl <= 0.0 {
            Some(0)
        } else if sector_capacity > 0.0 {
            Some((total_traffic_erl / sector_capacity).ceil() as u64)
        } else {
            tracing::debug!(total_channels, reuse = %self.reuse, "no capacity per cell");
            None
        };

        let dimensioned = cells_for_capacity.map(|cap| DesignLimit::dimension(cells_for_coverage, cap));
        let final_cell_count = dimensioned.map(|(count, _)| count);
        let limit = dimensioned.map(|(_, limit)| limit);
        let final_cell_radius_km = final_cell_count
            .filter(|&count| count > 0)
            .map(|count| (area / (count as f64 * PI)).sqrt());

        CellularDesignResult {
            total_users,
            total_traffic_erl,
            cells_for_coverage,
            total_channels,
            channels_per_cell,
            capacity_per_cell_erl,
            cells_for_capacity,
            final_cell_count,
            final_cell_radius_km,
            limit,
            spectral_efficiency: total_traffic_erl * BPS_PER_ERLANG / self.bandwidth_hz,
            reuse_efficiency: 1.0 / n,
            sectors: self.sectors,
            interference_margin_db: self.interference_margin_db,
            fading_margin_db: self.fading_margin_db,
        }
    }
}

impl Default for CellularDesign {
    fn default() -> Self {
        Self::new()
    }
}

/// Calculator for the `cellular_design` scenario.
#[derive(Debug, Clone, Copy, Default)]
pub struct CellularDesignCalculator;

impl CellularDesignCalculator {
    // frequencyBand is validated but unused
    pub const READS: &'static [&'static str] = &[
        "coverageArea",
        "userDensity",
        "trafficPerUser",
        "channelBandwidth",
        "reusePattern",
        "sectorization",
        "linkBudgetRange",
        "interferenceMargin",
        "fadingMargin",
    ];
}

impl Calculator for CellularDesignCalculator {
    fn scenario(&self) -> ScenarioId {
        ScenarioId::CellularDesign
    }

    fn reads(&self) -> &'static [&'static str] {
        Self::READS
    }

    fn calculate(&self, input: &ValidatedInput) -> Result<CalculationResult, CalcError> {
        Ok(CellularDesign::from_input(input)?.compute().to_result())
    }
}
