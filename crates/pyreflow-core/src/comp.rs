//! Compositions: per-nuclide mass maps.
//!
//! A [`Composition`] maps nuclide ids to mass values. The same type serves
//! both roles the separation math needs: mass *fractions* (normalized so the
//! entries sum to 1) and absolute *masses* (normalized to a material
//! quantity). Non-positive entries are dropped on construction so iteration
//! only ever sees mass that actually exists.

use crate::nuclide::NucId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A mapping from nuclide (or element) id to a mass value in kg.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Composition {
    entries: BTreeMap<NucId, f64>,
}

impl Composition {
    /// An empty composition.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from per-nuclide masses, dropping non-positive entries.
    pub fn from_masses<I: IntoIterator<Item = (NucId, f64)>>(masses: I) -> Self {
        let entries = masses.into_iter().filter(|&(_, m)| m > 0.0).collect();
        Self { entries }
    }

    /// Set the mass for one nuclide. Non-positive values remove the entry.
    pub fn set(&mut self, nuc: NucId, mass: f64) {
        if mass > 0.0 {
            self.entries.insert(nuc, mass);
        } else {
            self.entries.remove(&nuc);
        }
    }

    /// Mass for one nuclide; zero when absent.
    pub fn get(&self, nuc: NucId) -> f64 {
        self.entries.get(&nuc).copied().unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (NucId, f64)> + '_ {
        self.entries.iter().map(|(&n, &m)| (n, m))
    }

    /// Sum of all entries.
    pub fn total(&self) -> f64 {
        self.entries.values().sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rescale so the entries sum to `to`. An empty (or zero-total)
    /// composition stays empty.
    pub fn normalized(&self, to: f64) -> Composition {
        let total = self.total();
        if total <= 0.0 || to <= 0.0 {
            return Composition::new();
        }
        let scale = to / total;
        Composition {
            entries: self.entries.iter().map(|(&n, &m)| (n, m * scale)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u235() -> NucId {
        NucId(922350000)
    }
    fn u238() -> NucId {
        NucId(922380000)
    }

    #[test]
    fn from_masses_drops_nonpositive() {
        let c = Composition::from_masses([(u235(), 2.0), (u238(), 0.0), (NucId(1), -1.0)]);
        assert_eq!(c.len(), 1);
        assert_eq!(c.get(u235()), 2.0);
        assert_eq!(c.get(u238()), 0.0);
    }

    #[test]
    fn normalized_rescales_to_target() {
        let c = Composition::from_masses([(u235(), 1.0), (u238(), 3.0)]);
        let n = c.normalized(100.0);
        assert!((n.get(u235()) - 25.0).abs() < 1e-12);
        assert!((n.get(u238()) - 75.0).abs() < 1e-12);
        assert!((n.total() - 100.0).abs() < 1e-12);
    }

    #[test]
    fn normalized_fractions_sum_to_one() {
        let c = Composition::from_masses([(u235(), 7.0), (u238(), 13.0)]);
        assert!((c.normalized(1.0).total() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn normalized_empty_stays_empty() {
        assert!(Composition::new().normalized(5.0).is_empty());
    }

    #[test]
    fn set_removes_on_nonpositive() {
        let mut c = Composition::from_masses([(u235(), 2.0)]);
        c.set(u235(), 0.0);
        assert!(c.is_empty());
    }
}
