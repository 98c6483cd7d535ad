//! Axis grid planning: spacing selection, tic generation and label formatting.

use serde::{Deserialize, Serialize};

use crate::error::{PlotError, PlotResult};

/// Minimum number of major tics the chosen spacing must fit into a range.
const MIN_TICS_PER_RANGE: f64 = 4.0;

/// Upper bound on tics per call; anything above signals a broken zoom state.
pub const MAX_TICS_PER_AXIS: i64 = 100;

/// Fraction of the spacing by which a grid point may sit outside the range
/// and still count as a tic.
pub const TIC_BOUNDARY_TOLERANCE: f64 = 0.001;

/// Major and minor grid spacing of one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TicSpacing {
    pub major: f64,
    pub minor: f64,
}

/// One grid value of an axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tic {
    /// Data value at the grid point.
    pub value: f64,
    /// Integer multiple of the spacing; stable while the spacing is unchanged.
    pub quant: i64,
    /// Roundness rank; higher is more fundamental.
    pub decimation_level: u32,
}

impl Tic {
    #[must_use]
    pub fn new(value: f64, quant: i64) -> Self {
        Self {
            value,
            quant,
            decimation_level: decimation_level(quant),
        }
    }
}

/// Ranks a grid index by roundness.
///
/// Every factor of ten adds 3; a remaining factor of five adds 2, otherwise
/// a remaining factor of two adds 1. Index 0 outranks everything.
#[must_use]
pub fn decimation_level(quant: i64) -> u32 {
    if quant == 0 {
        return u32::MAX;
    }

    let mut rest = quant;
    let mut level = 0;
    while rest % 10 == 0 {
        level += 3;
        rest /= 10;
    }
    if rest % 5 == 0 {
        level + 2
    } else if rest % 2 == 0 {
        level + 1
    } else {
        level
    }
}

/// Picks the major and minor spacing for `[start, end]`.
///
/// Candidates `10^k`, `5·10^k` and `2·10^k` are scanned from coarse to fine;
/// the first two that fit more than four times into the range win. Within
/// one decade `2·10^k` is only tried when `5·10^k` does not fit.
#[must_use]
pub fn tic_spacing(start: f64, end: f64) -> TicSpacing {
    let range = (end - start).abs();
    if !range.is_finite() || range <= 0.0 {
        return TicSpacing {
            major: 0.0,
            minor: 0.0,
        };
    }

    let mut decade = 10f64.powi(range.log10().ceil() as i32);
    while decade < range {
        decade *= 10.0;
    }

    let mut picked: Vec<f64> = Vec::with_capacity(3);
    while picked.len() < 2 {
        if MIN_TICS_PER_RANGE * decade < range {
            picked.push(decade);
        }
        if MIN_TICS_PER_RANGE * decade * 0.5 < range {
            picked.push(decade * 0.5);
        } else if MIN_TICS_PER_RANGE * decade * 0.2 < range {
            picked.push(decade * 0.2);
        }
        decade /= 10.0;
        if decade == 0.0 {
            break;
        }
    }

    TicSpacing {
        major: picked.first().copied().unwrap_or(0.0),
        minor: picked.get(1).copied().unwrap_or(0.0),
    }
}

/// Generates every grid value of `spacing` inside `[start, end]`.
///
/// The range is widened by [`TIC_BOUNDARY_TOLERANCE`] of the spacing on both
/// ends so rounding cannot drop an endpoint. A zero spacing yields the single
/// tic at the origin. Returns [`PlotError::ExcessiveTicCount`] when the grid
/// would hold [`MAX_TICS_PER_AXIS`] or more points.
pub fn tic_values(start: f64, end: f64, spacing: f64) -> PlotResult<Vec<Tic>> {
    if spacing == 0.0 {
        return Ok(vec![Tic::new(0.0, 0)]);
    }
    if !start.is_finite() || !end.is_finite() || !spacing.is_finite() || start >= end {
        return Err(PlotError::InvalidData(
            "tic range must be finite and increasing".to_owned(),
        ));
    }

    let quant_start = (start / spacing).floor() as i64;
    let quant_end = (end / spacing).ceil() as i64;
    let count = quant_end.saturating_sub(quant_start);
    if count >= MAX_TICS_PER_AXIS {
        return Err(PlotError::ExcessiveTicCount { count });
    }

    let tolerance = TIC_BOUNDARY_TOLERANCE * spacing;
    let tics = (quant_start..=quant_end)
        .filter_map(|quant| {
            let value = spacing * quant as f64;
            if value < start - tolerance || value > end + tolerance {
                return None;
            }
            // exact zero at the origin, not a roundoff residue
            let value = if quant == 0 { 0.0 } else { value };
            Some(Tic::new(value, quant))
        })
        .collect();
    Ok(tics)
}

/// Number of fractional digits needed to tell tics `spacing` apart.
#[must_use]
pub fn tic_precision(spacing: f64) -> usize {
    let mut spacing = spacing.abs();
    let mut precision = 0;
    while precision < 18 && spacing <= 0.9999 {
        precision += 1;
        spacing *= 10.0;
    }
    precision
}

/// Formats tic values fixed-point with the precision implied by `spacing`.
#[must_use]
pub fn format_tic_values(tics: &[Tic], spacing: f64) -> Vec<String> {
    let precision = tic_precision(spacing);
    tics.iter()
        .map(|tic| format!("{:.*}", precision, tic.value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{decimation_level, format_tic_values, tic_spacing, tic_values};
    use crate::error::PlotError;

    #[test]
    fn spacing_for_unit_range() {
        let spacing = tic_spacing(0.0, 1.0);
        assert_eq!(spacing.major, 0.2);
        assert!((spacing.minor - 0.1).abs() < 1e-15);
    }

    #[test]
    fn spacing_for_range_of_hundred() {
        let spacing = tic_spacing(0.0, 100.0);
        assert_eq!(spacing.major, 20.0);
        assert_eq!(spacing.minor, 10.0);
    }

    #[test]
    fn spacing_prefers_half_decade_when_it_fits() {
        let spacing = tic_spacing(0.0, 30.0);
        assert_eq!(spacing.major, 5.0);
        assert_eq!(spacing.minor, 1.0);
    }

    #[test]
    fn tic_values_include_endpoints_within_tolerance() {
        let tics = tic_values(0.0, 1.0, 0.2).expect("tics");
        let quants: Vec<i64> = tics.iter().map(|tic| tic.quant).collect();
        assert_eq!(quants, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(tics[0].value, 0.0);
    }

    #[test]
    fn tic_values_exclude_points_outside_range() {
        let tics = tic_values(0.05, 0.95, 0.2).expect("tics");
        let quants: Vec<i64> = tics.iter().map(|tic| tic.quant).collect();
        assert_eq!(quants, vec![1, 2, 3, 4]);
    }

    #[test]
    fn origin_is_exact_zero() {
        let tics = tic_values(-0.3, 0.3, 0.1).expect("tics");
        let origin = tics.iter().find(|tic| tic.quant == 0).expect("origin tic");
        assert_eq!(origin.value.to_bits(), 0.0f64.to_bits());
    }

    #[test]
    fn excessive_tic_request_fails() {
        let err = tic_values(0.0, 1000.0, 1.0).expect_err("too many tics");
        assert!(matches!(err, PlotError::ExcessiveTicCount { count: 1000 }));
    }

    #[test]
    fn zero_spacing_yields_origin() {
        let tics = tic_values(0.0, 1.0, 0.0).expect("tics");
        assert_eq!(tics.len(), 1);
        assert_eq!(tics[0].decimation_level, u32::MAX);
    }

    #[test]
    fn decimation_levels_follow_roundness() {
        assert_eq!(decimation_level(0), u32::MAX);
        assert_eq!(decimation_level(1), 0);
        assert_eq!(decimation_level(2), 1);
        assert_eq!(decimation_level(5), 2);
        assert_eq!(decimation_level(10), 3);
        assert_eq!(decimation_level(-20), 4);
        assert_eq!(decimation_level(50), 5);
        assert_eq!(decimation_level(100), 6);
    }

    #[test]
    fn formatting_uses_spacing_precision() {
        let tics = tic_values(0.0, 1.0, 0.2).expect("tics");
        let labels = format_tic_values(&tics, 0.2);
        assert_eq!(labels, vec!["0.0", "0.2", "0.4", "0.6", "0.8", "1.0"]);

        let tics = tic_values(0.0, 100.0, 20.0).expect("tics");
        let labels = format_tic_values(&tics, 20.0);
        assert_eq!(labels[1], "20");
    }
}
