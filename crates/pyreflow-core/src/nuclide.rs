//! Nuclide and element identifiers in canonical ZZZAAASSSS form.
//!
//! Composition maps are keyed by [`NucId`]. An id either names a specific
//! nuclide (U-235 is `922350000`) or, with the isotope digits zeroed, the
//! parent element (elemental uranium is `920000000`). Stream efficiency maps
//! may use either form; separation resolves a nuclide against a map with
//! [`lookup_efficiency`], which prefers the exact nuclide entry and falls back
//! to the coarser element entry.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One element step in ZZZAAASSSS encoding: everything below this factor is
/// isotope-specific.
const ELEMENT_BASE: u32 = 10_000_000;

/// Identifies a nuclide or element. Cheap to copy and compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NucId(pub u32);

impl NucId {
    /// The coarser element aggregate: isotope-specific digits truncated.
    pub fn element(self) -> NucId {
        NucId((self.0 / ELEMENT_BASE) * ELEMENT_BASE)
    }

    /// True when this id carries no isotope-specific digits.
    pub fn is_element(self) -> bool {
        self == self.element()
    }
}

impl fmt::Display for NucId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-nuclide (or per-element) mass-separation efficiencies for one stream.
pub type EffMap = BTreeMap<NucId, f64>;

/// Two-level efficiency lookup: exact nuclide id first, then the coarser
/// element id. `None` means the map does not separate this nuclide at all.
pub fn lookup_efficiency(effs: &EffMap, nuc: NucId) -> Option<f64> {
    effs.get(&nuc)
        .or_else(|| effs.get(&nuc.element()))
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_truncates_isotope_digits() {
        assert_eq!(NucId(922350000).element(), NucId(920000000));
        assert_eq!(NucId(942390000).element(), NucId(940000000));
        assert_eq!(NucId(920000000).element(), NucId(920000000));
    }

    #[test]
    fn is_element_only_for_zeroed_isotope_digits() {
        assert!(NucId(920000000).is_element());
        assert!(!NucId(922350000).is_element());
    }

    #[test]
    fn lookup_prefers_exact_nuclide_over_element() {
        let mut effs = EffMap::new();
        effs.insert(NucId(920000000), 0.3);
        effs.insert(NucId(922350000), 0.9);

        assert_eq!(lookup_efficiency(&effs, NucId(922350000)), Some(0.9));
        // U-238 has no specific entry; falls back to elemental uranium.
        assert_eq!(lookup_efficiency(&effs, NucId(922380000)), Some(0.3));
    }

    #[test]
    fn lookup_unconfigured_nuclide_is_none() {
        let mut effs = EffMap::new();
        effs.insert(NucId(920000000), 0.3);
        assert_eq!(lookup_efficiency(&effs, NucId(551370000)), None);
    }
}
