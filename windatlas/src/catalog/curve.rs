//! Power and thrust curves.

use serde::{Deserialize, Serialize};

/// Air density used for Cp-based power, kg/m³.
pub const AIR_DENSITY: f64 = 1.225;
/// Cut-in speed of the synthetic ramp, m/s.
pub const RAMP_CUT_IN: f64 = 3.0;
/// Rated speed of the synthetic ramp, m/s.
pub const RAMP_RATED_SPEED: f64 = 12.0;

/// Curve data as written in a catalog file; every series is optional
/// except the wind speeds.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CurveData {
    pub wind_speed: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cp: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ct: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power_kw: Option<Vec<f64>>,
}

/// A complete curve: power is always present.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PowerCurve {
    pub wind_speed: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cp: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ct: Option<Vec<f64>>,
    pub power_kw: Vec<f64>,
    /// True if `power_kw` was computed rather than read
    pub synthesized: bool,
}

/// Default wind speeds for entries without a curve: 0..=25 m/s.
pub fn default_wind_speeds() -> Vec<f64> {
    (0..=25).map(f64::from).collect()
}

/// Power from Cp: `min(cp · ½ρAv³ / 1000, rated)` in kW.
pub fn power_from_cp(wind_speeds: &[f64], cp: &[f64], radius_m: f64, rated_kw: f64) -> Vec<f64> {
    let area = std::f64::consts::PI * radius_m * radius_m;
    wind_speeds
        .iter()
        .zip(cp)
        .map(|(&v, &c)| {
            if c <= 0.0 {
                return 0.0;
            }
            let available = 0.5 * AIR_DENSITY * area * v.powi(3) / 1000.0;
            (c * available).min(rated_kw)
        })
        .collect()
}

/// Linear ramp from cut-in to rated speed, flat at rated power above it.
pub fn linear_ramp(wind_speeds: &[f64], rated_kw: f64) -> Vec<f64> {
    wind_speeds
        .iter()
        .map(|&v| {
            if v < RAMP_CUT_IN {
                0.0
            } else if v < RAMP_RATED_SPEED {
                (v - RAMP_CUT_IN) / (RAMP_RATED_SPEED - RAMP_CUT_IN) * rated_kw
            } else {
                rated_kw
            }
        })
        .collect()
}

impl PowerCurve {
    /// Complete curve data, synthesizing power if it is missing.
    ///
    /// Returns an error message if the series lengths disagree.
    pub fn resolve(
        data: Option<CurveData>,
        radius_m: f64,
        rated_kw: f64,
    ) -> Result<Self, String> {
        let data = data.unwrap_or_else(|| CurveData {
            wind_speed: default_wind_speeds(),
            ..CurveData::default()
        });
        let n = data.wind_speed.len();
        for (series, values) in [("cp", &data.cp), ("ct", &data.ct), ("power_kw", &data.power_kw)] {
            if let Some(values) = values {
                if values.len() != n {
                    return Err(format!(
                        "{} has {} values but wind_speed has {}",
                        series,
                        values.len(),
                        n
                    ));
                }
            }
        }

        let (power_kw, synthesized) = match (&data.power_kw, &data.cp) {
            (Some(power), _) => (power.clone(), false),
            (None, Some(cp)) => (power_from_cp(&data.wind_speed, cp, radius_m, rated_kw), true),
            (None, None) => (linear_ramp(&data.wind_speed, rated_kw), true),
        };

        Ok(Self {
            wind_speed: data.wind_speed,
            cp: data.cp,
            ct: data.ct,
            power_kw,
            synthesized,
        })
    }
}
