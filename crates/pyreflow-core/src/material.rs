//! Materials: quantity plus composition.
//!
//! A [`Material`] is a value-like snapshot of a parcel of matter: a mass in
//! kg and the fractions of each nuclide in it. Separator outputs are
//! *untracked* materials used only for their composition and quantity; they
//! become real inventory when pushed into a buffer. Extraction operations
//! conserve mass: what is removed plus what remains equals what was there,
//! to floating-point tolerance.

use crate::comp::Composition;
use crate::nuclide::NucId;
use serde::{Deserialize, Serialize};

/// Resource quantity tolerance in kg. Parcels and differences below this are
/// treated as zero.
pub const EPS_QTY: f64 = 1e-6;

/// Errors from material extraction.
#[derive(Debug, thiserror::Error)]
pub enum MaterialError {
    #[error("extraction of {requested} kg exceeds the {available} kg available")]
    ExtractExceedsInventory { requested: f64, available: f64 },
    #[error("extraction wants {requested} kg of nuclide {nuc} but only {available} kg is present")]
    NuclideDeficit {
        nuc: NucId,
        requested: f64,
        available: f64,
    },
}

/// A parcel of matter: mass in kg plus nuclide mass fractions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    quantity: f64,
    /// Mass fractions, normalized so they sum to 1 (empty at zero quantity).
    comp: Composition,
}

impl Material {
    /// A parcel of `quantity` kg with the given composition (normalized
    /// internally; the absolute scale of `comp` does not matter).
    pub fn new(quantity: f64, comp: &Composition) -> Self {
        Self {
            quantity: quantity.max(0.0),
            comp: comp.normalized(1.0),
        }
    }

    /// An untracked parcel whose quantity is the sum of the given masses.
    pub fn from_masses(masses: Composition) -> Self {
        let quantity = masses.total();
        Self {
            quantity,
            comp: masses.normalized(1.0),
        }
    }

    pub fn quantity(&self) -> f64 {
        self.quantity
    }

    /// Mass fractions (sum to 1, or empty at zero quantity).
    pub fn composition(&self) -> &Composition {
        &self.comp
    }

    /// Per-nuclide masses: fractions scaled to the current quantity.
    pub fn masses(&self) -> Composition {
        self.comp.normalized(self.quantity)
    }

    pub fn mass_of(&self, nuc: NucId) -> f64 {
        self.comp.get(nuc) * self.quantity
    }

    /// Remove `qty` kg preserving this parcel's composition.
    pub fn extract_qty(&mut self, qty: f64) -> Result<Material, MaterialError> {
        if qty > self.quantity + EPS_QTY {
            return Err(MaterialError::ExtractExceedsInventory {
                requested: qty,
                available: self.quantity,
            });
        }
        let qty = qty.clamp(0.0, self.quantity);
        self.quantity -= qty;
        Ok(Material {
            quantity: qty,
            comp: self.comp.clone(),
        })
    }

    /// Remove `qty` kg with the given composition, subtracting per-nuclide
    /// masses from this parcel. Errors when any nuclide would be driven
    /// below zero past tolerance.
    pub fn extract_comp(&mut self, qty: f64, comp: &Composition) -> Result<Material, MaterialError> {
        if qty <= 0.0 {
            return Ok(Material::new(0.0, comp));
        }
        if qty > self.quantity + EPS_QTY {
            return Err(MaterialError::ExtractExceedsInventory {
                requested: qty,
                available: self.quantity,
            });
        }

        let removed = comp.normalized(qty);
        let mut remaining = self.masses();
        for (nuc, m) in removed.iter() {
            let have = remaining.get(nuc);
            if m > have + EPS_QTY {
                return Err(MaterialError::NuclideDeficit {
                    nuc,
                    requested: m,
                    available: have,
                });
            }
            remaining.set(nuc, have - m.min(have));
        }

        self.quantity = remaining.total();
        self.comp = remaining.normalized(1.0);
        Ok(Material {
            quantity: qty,
            comp: comp.normalized(1.0),
        })
    }

    /// Merge another parcel into this one.
    pub fn absorb(&mut self, other: Material) {
        let mut masses = self.masses();
        for (nuc, m) in other.masses().iter() {
            masses.set(nuc, masses.get(nuc) + m);
        }
        *self = Material::from_masses(masses);
    }
}
