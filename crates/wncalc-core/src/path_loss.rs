//! Path-loss models for the link budget.
//!
//! Three closed-form models with fixed antenna heights (30 m base station,
//! 2 m mobile):
//!
//! - **Free space**: `32.45 + 20·log10(f_MHz) + 20·log10(d_km)`
//! - **Two-ray ground reflection**: `40·log10(d_m) − 20·log10(h_t) − 20·log10(h_r)`
//! - **Okumura-Hata**, urban medium city, valid beyond 20 m
//!
//! Outside a model's domain the loss is `f64::INFINITY`. Callers treat any
//! non-finite loss as not-applicable.
//!
//! # Example
//!
//! ```
//! use wncalc_core::path_loss::{PathLossModel, free_space_path_loss_db};
//!
//! let pl = free_space_path_loss_db(2.4e9, 5_000.0);
//! assert!((pl - 114.03).abs() < 0.01);
//!
//! let pl = PathLossModel::TwoRay.path_loss_db(2.4e9, 0.0);
//! assert!(pl.is_infinite());
//! ```

use std::fmt;

/// Base-station antenna height in metres.
pub const TX_HEIGHT_M: f64 = 30.0;

/// Mobile antenna height in metres.
pub const RX_HEIGHT_M: f64 = 2.0;

/// Shortest distance at which the Hata fit is used, in km.
pub const HATA_MIN_DISTANCE_KM: f64 = 0.02;

// ---------------------------------------------------------------------------
// Model selector
// ---------------------------------------------------------------------------

/// Path-loss model selector.
///
/// Unrecognized tags map to [`PathLossModel::Unrecognized`], which yields a
/// zero loss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathLossModel {
    FreeSpace,
    TwoRay,
    Hata,
    /// Tag outside the known set; zero loss
    Unrecognized,
}

impl PathLossModel {
    /// Parse one of the tags `freespace`, `tworay` or `hata`.
    ///
    /// Matching is exact; any other spelling is unrecognized.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "freespace" => PathLossModel::FreeSpace,
            "tworay" => PathLossModel::TwoRay,
            "hata" => PathLossModel::Hata,
            _ => {
                tracing::warn!(tag, "unrecognized path-loss model, assuming zero loss");
                PathLossModel::Unrecognized
            }
        }
    }

    /// Path loss in dB; `f64::INFINITY` when the model does not apply.
    pub fn path_loss_db(&self, frequency_hz: f64, distance_m: f64) -> f64 {
        match self {
            PathLossModel::FreeSpace => free_space_path_loss_db(frequency_hz, distance_m),
            PathLossModel::TwoRay => two_ray_path_loss_db(distance_m),
            PathLossModel::Hata => hata_urban_path_loss_db(frequency_hz, distance_m),
            PathLossModel::Unrecognized => 0.0,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, PathLossModel::Unrecognized)
    }
}

impl fmt::Display for PathLossModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PathLossModel::FreeSpace => "freespace",
            PathLossModel::TwoRay => "tworay",
            PathLossModel::Hata => "hata",
            PathLossModel::Unrecognized => "unrecognized",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Core model functions
// ---------------------------------------------------------------------------

/// Free-space path loss in dB.
///
/// FSPL = 32.45 + 20·log10(f_MHz) + 20·log10(d_km)
///
/// Zero distance or frequency gives negative infinity.
pub fn free_space_path_loss_db(frequency_hz: f64, distance_m: f64) -> f64 {
    let f_mhz = frequency_hz / 1e6;
    let d_km = distance_m / 1000.0;
    32.45 + 20.0 * f_mhz.log10() + 20.0 * d_km.log10()
}

/// Two-ray ground-reflection loss in dB (frequency independent).
///
/// PL = 40·log10(d) − (20·log10(h_t) + 20·log10(h_r))
pub fn two_ray_path_loss_db(distance_m: f64) -> f64 {
    if distance_m <= 0.0 {
        return f64::INFINITY;
    }
    40.0 * distance_m.log10() - (20.0 * TX_HEIGHT_M.log10() + 20.0 * RX_HEIGHT_M.log10())
}

/// Okumura-Hata urban loss in dB with the small/medium-city mobile
/// antenna correction.
pub fn hata_urban_path_loss_db(frequency_hz: f64, distance_m: f64) -> f64 {
    let f_mhz = frequency_hz / 1e6;
    let d_km = distance_m / 1000.0;
    if d_km <= HATA_MIN_DISTANCE_KM {
        return f64::INFINITY;
    }

    let log_f = f_mhz.log10();
    let a_hms = (1.1 * log_f - 0.7) * RX_HEIGHT_M - (1.56 * log_f - 0.8);

    69.55 + 26.16 * log_f - 13.82 * TX_HEIGHT_M.log10() - a_hms
        + (44.9 - 6.55 * TX_HEIGHT_M.log10()) * d_km.log10()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_fspl_known_value() {
        // 2.4 GHz at 5 km
        let pl = free_space_path_loss_db(2.4e9, 5000.0);
        let expected = 32.45 + 20.0 * 2400f64.log10() + 20.0 * 5f64.log10();
        assert_relative_eq!(pl, expected, epsilon = 1e-9);
        assert!((pl - 114.03).abs() < 0.01, "FSPL = {pl:.2}");
    }

    #[test]
    fn test_fspl_inverse_square() {
        let near = free_space_path_loss_db(900e6, 1000.0);
        let far = free_space_path_loss_db(900e6, 2000.0);
        assert_relative_eq!(far - near, 6.0206, epsilon = 1e-3);
    }

    #[test]
    fn test_fspl_zero_distance_not_finite() {
        assert!(!free_space_path_loss_db(900e6, 0.0).is_finite());
    }

    #[test]
    fn test_two_ray_40db_per_decade() {
        let a = two_ray_path_loss_db(1000.0);
        let b = two_ray_path_loss_db(10_000.0);
        assert_relative_eq!(b - a, 40.0, epsilon = 1e-9);
        // 40·3 − 20·log10(60)
        assert_relative_eq!(a, 120.0 - 20.0 * 60f64.log10(), epsilon = 1e-9);
    }

    #[test]
    fn test_two_ray_non_positive_distance() {
        assert_eq!(two_ray_path_loss_db(0.0), f64::INFINITY);
        assert_eq!(two_ray_path_loss_db(-5.0), f64::INFINITY);
    }

    #[test]
    fn test_hata_urban_value() {
        // 900 MHz at 5 km
        let pl = hata_urban_path_loss_db(900e6, 5000.0);
        let log_f = 900f64.log10();
        let a = (1.1 * log_f - 0.7) * 2.0 - (1.56 * log_f - 0.8);
        let expected = 69.55 + 26.16 * log_f - 13.82 * 30f64.log10() - a
            + (44.9 - 6.55 * 30f64.log10()) * 5f64.log10();
        assert_relative_eq!(pl, expected, epsilon = 1e-9);
        assert!((pl - 149.75).abs() < 0.05, "Hata = {pl:.2}");
    }

    #[test]
    fn test_hata_validity_floor() {
        assert!(hata_urban_path_loss_db(900e6, 20.0).is_infinite());
        assert!(hata_urban_path_loss_db(900e6, 0.0).is_infinite());
        assert!(hata_urban_path_loss_db(900e6, 21.0).is_finite());
    }

    #[test]
    fn test_hata_increasing_distance() {
        let mut prev = 0.0;
        for d in [100.0, 1000.0, 5000.0, 20_000.0] {
            let pl = hata_urban_path_loss_db(900e6, d);
            assert!(pl > prev);
            prev = pl;
        }
    }

    #[test]
    fn test_model_tags() {
        assert_eq!(PathLossModel::from_tag("freespace"), PathLossModel::FreeSpace);
        assert_eq!(PathLossModel::from_tag("tworay"), PathLossModel::TwoRay);
        assert_eq!(PathLossModel::from_tag("hata"), PathLossModel::Hata);
        assert_eq!(PathLossModel::from_tag("cost231"), PathLossModel::Unrecognized);
    }

    #[test]
    fn test_model_tags_are_exact() {
        for tag in ["Hata", "HATA", "fspl", "Free Space", "two_ray", "two-ray"] {
            let model = PathLossModel::from_tag(tag);
            assert_eq!(model, PathLossModel::Unrecognized, "{tag}");
            assert_eq!(model.path_loss_db(900e6, 5000.0), 0.0);
        }
    }

    #[test]
    fn test_unrecognized_model_is_zero_loss() {
        let model = PathLossModel::from_tag("okumura");
        assert!(model.is_fallback());
        assert_eq!(model.path_loss_db(2.4e9, 5000.0), 0.0);
    }

    #[test]
    fn test_dispatcher() {
        let f = 900e6;
        let d = 3000.0;
        assert_eq!(PathLossModel::FreeSpace.path_loss_db(f, d), free_space_path_loss_db(f, d));
        assert_eq!(PathLossModel::TwoRay.path_loss_db(f, d), two_ray_path_loss_db(d));
        assert_eq!(PathLossModel::Hata.path_loss_db(f, d), hata_urban_path_loss_db(f, d));
    }
}
