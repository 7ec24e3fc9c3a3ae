//! Stage efficiency models for the four pyroprocessing sub-processes.
//!
//! Each model is a pure function of its own stage's physical parameters and
//! produces a single dimensionless efficiency factor intended to lie in
//! [0, 1], plus a nominal mass throughput. The factor scales every configured
//! per-nuclide efficiency of the streams backed by that stage.
//!
//! The curve fits are empirical and valid only inside each stage's design
//! parameter range. Models do not clamp: a parameter set whose derived
//! efficiency falls outside [0, 1] is rejected loudly at facility
//! activation, never silently corrected. The one exception that can fail
//! inside the model itself is the refining agitation term, whose logarithmic
//! branch errors the moment it would exceed 1.

mod reduction;
mod refining;
mod volox;
mod winning;

pub use reduction::Reduction;
pub use refining::Refining;
pub use volox::Voloxidation;
pub use winning::Winning;

use serde::{Deserialize, Serialize};

/// Which physical sub-process scales a stream's configured efficiencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProcessKind {
    Voloxidation,
    Reduction,
    Refining,
    Winning,
}

/// Errors raised inside a stage model.
#[derive(Debug, thiserror::Error)]
pub enum StageError {
    #[error("agitation efficiency {efficiency} exceeds 1 at {rotation_rpm} rpm")]
    AgitationAboveUnity {
        efficiency: f64,
        rotation_rpm: f64,
    },
    #[error("thermal efficiency has no root in [{lower} C, {upper} C]")]
    NoRootInBracket { lower: f64, upper: f64 },
}

/// Evaluate `c[0]*x^3 + c[1]*x^2 + c[2]*x + c[3]`.
pub(crate) fn cubic(c: [f64; 4], x: f64) -> f64 {
    ((c[0] * x + c[1]) * x + c[2]) * x + c[3]
}

/// Coulombic efficiency of a flow-through porous electrode as a function of
/// applied current in amperes. Quartic fit from literature; shared by the
/// electroreduction and electrowinning stages. Valid roughly over 4-10 A;
/// outside that range the polynomial goes negative or rolls over, and
/// callers must reject the configuration.
pub(crate) fn coulombic_fit(current_a: f64) -> f64 {
    let c = current_a;
    ((((-0.00685 * c) + 0.20413) * c - 2.273) * c + 11.2046) * c - 19.7493
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cubic_matches_direct_evaluation() {
        let c = [2.0, -1.0, 0.5, 3.0];
        let x = 1.7_f64;
        let direct = 2.0 * x.powi(3) - x.powi(2) + 0.5 * x + 3.0;
        assert!((cubic(c, x) - direct).abs() < 1e-12);
    }

    #[test]
    fn coulombic_fit_peaks_inside_design_range() {
        // Negative below the design range, positive and below 1 inside it.
        assert!(coulombic_fit(2.0) < 0.0);
        for a in [5.0, 6.0, 7.0, 8.0, 9.0, 10.0] {
            let eff = coulombic_fit(a);
            assert!(eff > 0.0 && eff < 1.0, "current {a} gave {eff}");
        }
    }
}
