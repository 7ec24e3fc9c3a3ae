//! Electrowinning: recovery of dissolved actinides from the refiner salt
//! onto a solid cathode.
//!
//! Coefficient sources:
//! 1. M. M. Saleh et al., "Electrowinning of Nonnoble Metals with
//!    Simultaneous Hydrogen Evolution at Flow-Through Porous Electrodes III.
//!    Time Effects," J. Electrochem. Soc. 144(3), 1997.
//! 2. T.-J. Kim et al., "Development of an anode structure consisting of
//!    graphite tubes and a SiC shroud for the electrowinning process in
//!    molten salt," J. Radioanal. Nucl. Chem. 295(3), 2013.

use super::coulombic_fit;
use serde::{Deserialize, Serialize};

/// Temporal fit: `b0*ln(t) + b1` with t in hours.
const TEMPORAL: [f64; 2] = [0.2, 0.7];

/// Linear flow penalty per cm/s.
const FLOW_PENALTY: f64 = 0.04;

/// Faraday constant (C/mol).
const FARADAY: f64 = 96_485.332;
/// Molar mass of uranium (kg/mol), the dominant deposited species.
const MOLAR_MASS_U: f64 = 0.238029;
/// Deposition valence (U3+ in chloride melts).
const VALENCE: f64 = 3.0;

/// Electrowinning stage parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Winning {
    /// Applied current (A), design range 4-10.
    pub current_a: f64,
    /// Deposition time (hr), design range 1-4.
    pub time_hr: f64,
    /// Salt flow rate (cm/s), design range 0-4.5.
    pub flowrate: f64,
    /// Cell volume (m3), design range 1-10.
    pub volume_m3: f64,
}

impl Winning {
    pub fn new(current_a: f64, time_hr: f64, flowrate: f64, volume_m3: f64) -> Self {
        Self {
            current_a,
            time_hr,
            flowrate,
            volume_m3,
        }
    }

    /// Overall efficiency factor: coulombic x temporal x flow-rate.
    pub fn efficiency(&self) -> f64 {
        self.coulombic() * self.temporal() * self.rate_eff()
    }

    /// Coulombic efficiency of the winning cell.
    pub fn coulombic(&self) -> f64 {
        coulombic_fit(self.current_a)
    }

    /// Fraction of the dissolved inventory reachable in the allotted time.
    pub fn temporal(&self) -> f64 {
        TEMPORAL[0] * self.time_hr.ln() + TEMPORAL[1]
    }

    /// Deposition efficiency as a function of salt flow rate.
    pub fn rate_eff(&self) -> f64 {
        1.0 - FLOW_PENALTY * self.flowrate
    }

    /// Faraday-law deposition mass over one cycle, scaled by salt flow
    /// (kg per timestep).
    pub fn throughput(&self) -> f64 {
        self.current_a * self.time_hr * 3600.0 * MOLAR_MASS_U / (VALENCE * FARADAY)
            * self.flowrate
    }
}

impl Default for Winning {
    fn default() -> Self {
        Self::new(5.0, 1.0, 1.0, 5.0)
    }
}
