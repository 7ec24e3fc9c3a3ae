//! Voloxidation: oxidative treatment of the feed at high temperature,
//! driving off volatile fission products ahead of the electrochemical
//! stages.

use super::cubic;
use serde::{Deserialize, Serialize};

/// Thermal release fraction, cubic fit over the 500-1000 C design range.
const THERMAL: [f64; 4] = [2.58333e-9, -8.05e-6, 8.34417e-3, -1.8825];

/// Exponent of the residence-time saturation term (per hour).
const TEMPORAL_RATE: f64 = 1.5;

/// Linear flow penalty per cm/s of feed rate.
const FLOW_PENALTY: f64 = 0.03;

/// Voloxidation stage parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Voloxidation {
    /// Chamber temperature (C), design range 500-1000.
    pub temp_c: f64,
    /// Residence time (hr), design range 1-4.
    pub time_hr: f64,
    /// Feed flow rate (cm/s), design range 0-4.5.
    pub flowrate: f64,
    /// Chamber volume (m3), design range 1-10.
    pub volume_m3: f64,
}

impl Voloxidation {
    pub fn new(temp_c: f64, time_hr: f64, flowrate: f64, volume_m3: f64) -> Self {
        Self {
            temp_c,
            time_hr,
            flowrate,
            volume_m3,
        }
    }

    /// Overall efficiency factor: thermal x temporal x flow.
    pub fn efficiency(&self) -> f64 {
        self.thermal() * self.temporal() * self.flow()
    }

    fn thermal(&self) -> f64 {
        cubic(THERMAL, self.temp_c)
    }

    fn temporal(&self) -> f64 {
        1.0 - (-TEMPORAL_RATE * self.time_hr).exp()
    }

    fn flow(&self) -> f64 {
        1.0 - FLOW_PENALTY * self.flowrate
    }

    /// Nominal chamber throughput (kg per timestep).
    pub fn throughput(&self) -> f64 {
        self.flowrate * self.volume_m3 / self.time_hr
    }
}

impl Default for Voloxidation {
    fn default() -> Self {
        Self::new(900.0, 2.0, 1.0, 5.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_efficiency_in_unit_interval() {
        let eff = Voloxidation::default().efficiency();
        assert!(eff > 0.0 && eff < 1.0, "got {eff}");
    }

    #[test]
    fn efficiency_rises_with_temperature() {
        let cold = Voloxidation::new(500.0, 2.0, 1.0, 5.0).efficiency();
        let hot = Voloxidation::new(1000.0, 2.0, 1.0, 5.0).efficiency();
        assert!(hot > cold);
    }

    #[test]
    fn efficiency_rises_with_residence_time() {
        let short = Voloxidation::new(900.0, 1.0, 1.0, 5.0).efficiency();
        let long = Voloxidation::new(900.0, 4.0, 1.0, 5.0).efficiency();
        assert!(long > short);
    }

    #[test]
    fn efficiency_falls_with_flowrate() {
        let slow = Voloxidation::new(900.0, 2.0, 0.5, 5.0).efficiency();
        let fast = Voloxidation::new(900.0, 2.0, 4.5, 5.0).efficiency();
        assert!(fast < slow);
    }

    #[test]
    fn throughput_scales_with_flow_and_volume() {
        let v = Voloxidation::new(900.0, 2.0, 2.0, 6.0);
        assert!((v.throughput() - 6.0).abs() < 1e-12);
    }

    #[test]
    fn design_range_stays_in_unit_interval() {
        for temp in [500.0, 700.0, 900.0, 1000.0] {
            for time in [1.0, 2.5, 4.0] {
                for flow in [0.0, 2.0, 4.5] {
                    let eff = Voloxidation::new(temp, time, flow, 5.0).efficiency();
                    assert!(
                        (0.0..=1.0).contains(&eff),
                        "temp {temp} time {time} flow {flow} gave {eff}"
                    );
                }
            }
        }
    }
}
