//! Stream separation: efficiency map x feed material -> candidate parcel.
//!
//! [`separate`] computes what one stream *could* pull out of a feed parcel,
//! ignoring destination capacity. Capacity is resolved afterwards by the
//! allocator, which scales every stream's candidate uniformly.

use crate::comp::Composition;
use crate::material::Material;
use crate::nuclide::{EffMap, lookup_efficiency};

/// Compute the candidate separated material for one stream.
///
/// The feed composition is normalized to its current quantity; each nuclide
/// present is resolved against the efficiency map (exact nuclide id first,
/// then the coarser element id, else skipped), and its separated mass is
/// `feed_mass x configured_efficiency x stage_scalar`.
///
/// The result is an untracked material: composition and quantity only, not
/// bound to any buffer.
pub fn separate(effs: &EffMap, stage_scalar: f64, feed: &Material) -> Material {
    let mut separated = Composition::new();
    for (nuc, mass) in feed.masses().iter() {
        let Some(eff) = lookup_efficiency(effs, nuc) else {
            continue;
        };
        separated.set(nuc, mass * eff * stage_scalar);
    }
    Material::from_masses(separated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nuclide::NucId;

    fn u235() -> NucId {
        NucId(922350000)
    }
    fn u238() -> NucId {
        NucId(922380000)
    }
    fn uranium() -> NucId {
        NucId(920000000)
    }
    fn cs137() -> NucId {
        NucId(551370000)
    }

    fn feed() -> Material {
        // 100 kg: 20 kg U-235, 60 kg U-238, 20 kg Cs-137.
        Material::new(
            100.0,
            &Composition::from_masses([(u235(), 20.0), (u238(), 60.0), (cs137(), 20.0)]),
        )
    }

    #[test]
    fn separates_by_configured_efficiency() {
        let effs = EffMap::from([(u235(), 0.5)]);
        let out = separate(&effs, 1.0, &feed());
        assert!((out.quantity() - 10.0).abs() < 1e-9);
        assert!((out.mass_of(u235()) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn element_entry_covers_all_isotopes() {
        let effs = EffMap::from([(uranium(), 0.5)]);
        let out = separate(&effs, 1.0, &feed());
        // Half of all 80 kg of uranium, none of the caesium.
        assert!((out.quantity() - 40.0).abs() < 1e-9);
        assert!((out.mass_of(u235()) - 10.0).abs() < 1e-9);
        assert!((out.mass_of(u238()) - 30.0).abs() < 1e-9);
        assert_eq!(out.mass_of(cs137()), 0.0);
    }

    #[test]
    fn nuclide_entry_overrides_element_entry() {
        let effs = EffMap::from([(uranium(), 0.1), (u235(), 0.9)]);
        let out = separate(&effs, 1.0, &feed());
        assert!((out.mass_of(u235()) - 18.0).abs() < 1e-9);
        assert!((out.mass_of(u238()) - 6.0).abs() < 1e-9);
    }

    #[test]
    fn stage_scalar_multiplies_every_efficiency() {
        let effs = EffMap::from([(uranium(), 0.5), (cs137(), 0.8)]);
        let full = separate(&effs, 1.0, &feed());
        let half = separate(&effs, 0.5, &feed());
        assert!((half.quantity() - full.quantity() * 0.5).abs() < 1e-9);
        assert!((half.mass_of(cs137()) - 8.0).abs() < 1e-9);
    }

    #[test]
    fn unconfigured_feed_separates_nothing() {
        let effs = EffMap::from([(NucId(10010000), 1.0)]);
        let out = separate(&effs, 1.0, &feed());
        assert_eq!(out.quantity(), 0.0);
        assert!(out.composition().is_empty());
    }

    #[test]
    fn empty_feed_separates_nothing() {
        let effs = EffMap::from([(uranium(), 0.5)]);
        let out = separate(&effs, 1.0, &Material::new(0.0, &Composition::new()));
        assert_eq!(out.quantity(), 0.0);
    }
}
