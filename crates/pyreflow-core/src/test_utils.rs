//! Shared helpers for unit and integration tests.
//!
//! Only compiled for tests or with the `test-utils` feature enabled.

use crate::comp::Composition;
use crate::facility::{Facility, FacilityConfig, StreamSpec};
use crate::material::Material;
use crate::nuclide::{EffMap, NucId};
use crate::stage::ProcessKind;

// ---------------------------------------------------------------------------
// Nuclide ids
// ---------------------------------------------------------------------------

pub fn u235() -> NucId {
    NucId(92_235_0000)
}

pub fn u238() -> NucId {
    NucId(92_238_0000)
}

/// Elemental uranium, matching every uranium isotope.
pub fn uranium() -> NucId {
    NucId(92_000_0000)
}

pub fn pu239() -> NucId {
    NucId(94_239_0000)
}

/// Elemental plutonium.
pub fn plutonium() -> NucId {
    NucId(94_000_0000)
}

pub fn cs137() -> NucId {
    NucId(55_137_0000)
}

pub fn sr90() -> NucId {
    NucId(38_090_0000)
}

// ---------------------------------------------------------------------------
// Materials
// ---------------------------------------------------------------------------

/// A material of a single nuclide.
pub fn single_nuclide(qty: f64, nuc: NucId) -> Material {
    Material::new(qty, &Composition::from_masses([(nuc, 1.0)]))
}

/// A material from (nuclide, mass) pairs.
pub fn material(masses: impl IntoIterator<Item = (NucId, f64)>) -> Material {
    Material::from_masses(Composition::from_masses(masses))
}

// ---------------------------------------------------------------------------
// Streams and facilities
// ---------------------------------------------------------------------------

pub fn effs(pairs: &[(NucId, f64)]) -> EffMap {
    pairs.iter().copied().collect()
}

/// A pass-through stream (no backing sub-process).
pub fn stream(capacity: f64, efficiencies: &[(NucId, f64)]) -> StreamSpec {
    StreamSpec {
        capacity,
        process: None,
        efficiencies: effs(efficiencies),
    }
}

/// A stream backed by a physical sub-process.
pub fn process_stream(
    capacity: f64,
    process: ProcessKind,
    efficiencies: &[(NucId, f64)],
) -> StreamSpec {
    StreamSpec {
        capacity,
        process: Some(process),
        efficiencies: effs(efficiencies),
    }
}

fn config_with(streams: Vec<(&str, StreamSpec)>) -> FacilityConfig {
    FacilityConfig {
        streams: streams
            .into_iter()
            .map(|(name, spec)| (name.to_string(), spec))
            .collect(),
        ..FacilityConfig::default()
    }
}

/// A facility with default stage parameters and the given streams,
/// not yet activated.
pub fn facility(streams: Vec<(&str, StreamSpec)>) -> Facility {
    Facility::new(config_with(streams))
}

/// An activated facility with the given streams.
pub fn activated(streams: Vec<(&str, StreamSpec)>) -> Facility {
    activated_with(streams, |_| {})
}

/// An activated facility, with a configuration hook applied before
/// construction.
pub fn activated_with(
    streams: Vec<(&str, StreamSpec)>,
    adjust: impl FnOnce(&mut FacilityConfig),
) -> Facility {
    let mut config = config_with(streams);
    adjust(&mut config);
    let mut fac = Facility::new(config);
    crate::agent::Agent::activate(&mut fac).unwrap();
    fac
}

/// Put material straight into the feed buffer, bypassing the trade path.
pub fn push_feed(fac: &mut Facility, mat: Material) {
    fac.feed_buf_mut().push(mat).unwrap();
}
