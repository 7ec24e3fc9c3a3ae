//! Electrorefining: anodic dissolution and selective deposition in a molten
//! salt electrorefiner.
//!
//! Three independent multiplicative terms: thermal and pressure (cubic fits
//! over the design ranges) and agitation (piecewise in anode rotation rate:
//! linear at or below 1 rpm, logarithmic above). The logarithmic branch is
//! rejected outright when it would exceed 1.
//!
//! The model also carries the inverse process-control hook
//! [`Refining::divert_temperature`], which numerically inverts the thermal
//! fit to find the operating temperature producing a shifted efficiency.
//! It is not used by the separation path.

use super::{StageError, cubic};
use serde::{Deserialize, Serialize};

const THERMAL: [f64; 4] = [4.7369e-9, -1.08337e-5, 0.008069, -0.9726];
const PRESSURE: [f64; 4] = [-7.17631e-10, 4.04545e-7, -8.06336e-5, 1.002];

/// Agitation fit below the 1 rpm threshold: `a0*rot + a1`.
const AGITATION_LINEAR: [f64; 2] = [0.032, 0.72];
/// Agitation fit above the threshold: `a2*ln(rot) + a3`.
const AGITATION_LOG: [f64; 2] = [0.0338396, 0.83667];

/// Bisection bracket half-width around the operating temperature (C).
const DIVERT_BRACKET_C: f64 = 100.0;
/// Bisection termination: bracket width at or below this is converged.
const DIVERT_TOL_C: f64 = 1e-6;

/// Electrorefining stage parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Refining {
    /// Salt temperature (C), design range 500-1000.
    pub temp_c: f64,
    /// Cell pressure (mTorr), design range 100-760.
    pub pressure_mtorr: f64,
    /// Anode rotation rate (rpm), design range 0-100.
    pub rotation_rpm: f64,
    /// Batch size (kg), design range 10-40.
    pub batch_kg: f64,
    /// Process time (hr), design range 1-4.
    pub time_hr: f64,
}

impl Refining {
    pub fn new(
        temp_c: f64,
        pressure_mtorr: f64,
        rotation_rpm: f64,
        batch_kg: f64,
        time_hr: f64,
    ) -> Self {
        Self {
            temp_c,
            pressure_mtorr,
            rotation_rpm,
            batch_kg,
            time_hr,
        }
    }

    /// Overall efficiency factor: thermal x pressure x agitation.
    pub fn efficiency(&self) -> Result<f64, StageError> {
        Ok(self.thermal() * self.pressure_eff() * self.agitation()?)
    }

    /// Thermal efficiency at the operating temperature.
    pub fn thermal(&self) -> f64 {
        self.thermal_at(self.temp_c)
    }

    fn thermal_at(&self, temp_c: f64) -> f64 {
        cubic(THERMAL, temp_c)
    }

    /// Pressure efficiency at the operating pressure.
    pub fn pressure_eff(&self) -> f64 {
        cubic(PRESSURE, self.pressure_mtorr)
    }

    /// Agitation efficiency. The logarithmic branch above 1 rpm crosses 1
    /// near 125 rpm; such rotation rates are a fatal configuration error.
    pub fn agitation(&self) -> Result<f64, StageError> {
        let rot = self.rotation_rpm;
        if rot <= 1.0 {
            Ok(AGITATION_LINEAR[0] * rot + AGITATION_LINEAR[1])
        } else {
            let agi = AGITATION_LOG[0] * rot.ln() + AGITATION_LOG[1];
            if agi > 1.0 {
                Err(StageError::AgitationAboveUnity {
                    efficiency: agi,
                    rotation_rpm: rot,
                })
            } else {
                Ok(agi)
            }
        }
    }

    /// Nominal batch throughput (kg per timestep).
    pub fn throughput(&self) -> f64 {
        self.batch_kg / self.time_hr
    }

    /// Find the temperature whose thermal efficiency equals the current one
    /// scaled by `(1 + shift)`. Bisection over the +/-100 C bracket around
    /// the operating temperature, converging when the bracket width is at
    /// or below 1e-6 C. Errors when the bracket does not straddle a root.
    pub fn divert_temperature(&self, shift: f64) -> Result<f64, StageError> {
        let target = self.thermal() * (1.0 + shift);
        let f = |t: f64| self.thermal_at(t) - target;

        let mut lo = self.temp_c - DIVERT_BRACKET_C;
        let mut hi = self.temp_c + DIVERT_BRACKET_C;
        if f(lo) * f(hi) > 0.0 {
            return Err(StageError::NoRootInBracket {
                lower: lo,
                upper: hi,
            });
        }
        while hi - lo > DIVERT_TOL_C {
            let mid = 0.5 * (lo + hi);
            if f(lo) * f(mid) <= 0.0 {
                hi = mid;
            } else {
                lo = mid;
            }
        }
        Ok(0.5 * (lo + hi))
    }
}

impl Default for Refining {
    fn default() -> Self {
        Self::new(900.0, 760.0, 0.0, 20.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_efficiency_in_unit_interval() {
        let eff = Refining::default().efficiency().unwrap();
        assert!(eff > 0.0 && eff < 1.0, "got {eff}");
    }

    #[test]
    fn reference_point_matches_fits() {
        let r = Refining::default();
        assert!((r.thermal() - 0.9674).abs() < 1e-4);
        assert!((r.pressure_eff() - 0.8594).abs() < 1e-4);
        assert!((r.agitation().unwrap() - 0.72).abs() < 1e-12);
    }

    #[test]
    fn agitation_linear_below_threshold() {
        let r = Refining::new(900.0, 760.0, 0.5, 20.0, 1.0);
        assert!((r.agitation().unwrap() - (0.032 * 0.5 + 0.72)).abs() < 1e-12);
    }

    #[test]
    fn agitation_log_above_threshold() {
        let r = Refining::new(900.0, 760.0, 100.0, 20.0, 1.0);
        let agi = r.agitation().unwrap();
        assert!(agi > 0.99 && agi < 1.0, "got {agi}");
    }

    #[test]
    fn agitation_above_unity_is_rejected() {
        // The log branch crosses 1 near 125 rpm.
        let r = Refining::new(900.0, 760.0, 130.0, 20.0, 1.0);
        assert!(matches!(
            r.agitation(),
            Err(StageError::AgitationAboveUnity { .. })
        ));
        assert!(r.efficiency().is_err());
    }

    #[test]
    fn throughput_is_batch_over_time() {
        let r = Refining::new(900.0, 760.0, 0.0, 30.0, 2.0);
        assert!((r.throughput() - 15.0).abs() < 1e-12);
    }

    #[test]
    fn divert_temperature_reproduces_shifted_efficiency() {
        // 550 C sits on the rising branch of the thermal fit, so the
        // +/-100 C bracket straddles exactly one root.
        let r = Refining::new(550.0, 760.0, 0.0, 20.0, 1.0);
        let shift = 0.01;
        let t = r.divert_temperature(shift).unwrap();

        let shifted = Refining::new(t, 760.0, 0.0, 20.0, 1.0);
        let target = r.thermal() * (1.0 + shift);
        assert!(
            (shifted.thermal() - target).abs() < 1e-6,
            "thermal at {t} C is {} vs target {target}",
            shifted.thermal()
        );
    }

    #[test]
    fn divert_temperature_zero_shift_returns_operating_point() {
        let r = Refining::new(550.0, 760.0, 0.0, 20.0, 1.0);
        let t = r.divert_temperature(0.0).unwrap();
        assert!((t - 550.0).abs() < 1e-3, "got {t}");
    }

    #[test]
    fn divert_temperature_unreachable_shift_errors() {
        // A +60% shift cannot be reached within +/-100 C of 550 C.
        let r = Refining::new(550.0, 760.0, 0.0, 20.0, 1.0);
        assert!(matches!(
            r.divert_temperature(0.6),
            Err(StageError::NoRootInBracket { .. })
        ));
    }
}
