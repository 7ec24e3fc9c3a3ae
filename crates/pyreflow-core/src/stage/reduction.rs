//! Electroreduction: electrolytic reduction of oxide feed to metal in a
//! molten LiCl / Li2O bath.

use super::coulombic_fit;
use serde::{Deserialize, Serialize};

/// Linear catalyst fit: efficiency gain per wt% of lithium oxide.
const CATALYST_SLOPE: f64 = 0.075;
const CATALYST_INTERCEPT: f64 = 0.775;

/// Electroreduction stage parameters.
///
/// The coulombic term is a quartic in applied current, valid only inside the
/// design current range; outside it the polynomial may yield an efficiency
/// above 1 or below 0. The model deliberately does not validate this:
/// the facility rejects such configurations at activation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reduction {
    /// Applied current (A), design range 4-10.
    pub current_a: f64,
    /// Lithium-oxide catalyst concentration (wt%), design range 1-3.
    pub li2o_wt_pct: f64,
    /// Chamber volume (m3), design range 1-10.
    pub volume_m3: f64,
    /// Residence time (hr), design range 1-4.
    pub time_hr: f64,
}

impl Reduction {
    pub fn new(current_a: f64, li2o_wt_pct: f64, volume_m3: f64, time_hr: f64) -> Self {
        Self {
            current_a,
            li2o_wt_pct,
            volume_m3,
            time_hr,
        }
    }

    /// Overall efficiency factor: coulombic x catalyst.
    pub fn efficiency(&self) -> f64 {
        self.coulombic() * self.catalyst()
    }

    /// Coulombic efficiency of the reduction cell.
    pub fn coulombic(&self) -> f64 {
        coulombic_fit(self.current_a)
    }

    /// Catalyst efficiency, linear in Li2O concentration.
    pub fn catalyst(&self) -> f64 {
        CATALYST_SLOPE * self.li2o_wt_pct + CATALYST_INTERCEPT
    }

    /// Nominal chamber throughput (kg per timestep).
    pub fn throughput(&self) -> f64 {
        self.volume_m3 / self.time_hr
    }
}

impl Default for Reduction {
    fn default() -> Self {
        Self::new(5.0, 2.0, 10.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_efficiency_in_unit_interval() {
        let eff = Reduction::default().efficiency();
        assert!(eff > 0.0 && eff < 1.0, "got {eff}");
    }

    #[test]
    fn reference_point_matches_fit() {
        // 5 A, 2 wt%: coulombic 0.6837, catalyst 0.925.
        let r = Reduction::default();
        assert!((r.coulombic() - 0.6837).abs() < 1e-4);
        assert!((r.catalyst() - 0.925).abs() < 1e-12);
        assert!((r.efficiency() - 0.6837 * 0.925).abs() < 1e-4);
    }

    #[test]
    fn below_design_current_goes_negative() {
        // The fit is not valid below ~4 A; the caller must reject this.
        assert!(Reduction::new(2.0, 2.0, 10.0, 1.0).efficiency() < 0.0);
    }

    #[test]
    fn catalyst_rises_with_li2o() {
        let lean = Reduction::new(5.0, 1.0, 10.0, 1.0).catalyst();
        let rich = Reduction::new(5.0, 3.0, 10.0, 1.0).catalyst();
        assert!(rich > lean);
    }

    #[test]
    fn throughput_is_volume_over_time() {
        let r = Reduction::new(5.0, 2.0, 8.0, 4.0);
        assert!((r.throughput() - 2.0).abs() < 1e-12);
    }
}
