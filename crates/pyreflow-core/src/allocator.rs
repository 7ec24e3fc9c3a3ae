//! Capacity-constrained allocation of staged separations.
//!
//! Each timestep produces one candidate parcel per stream (from the
//! separator) plus the feed parcel they were computed from. The allocator
//! finds the single scale factor, at most 1, that respects the most
//! capacity-constrained destination buffer, applies it uniformly to every
//! stream, returns the still-unprocessed feed fraction to the feed buffer,
//! and routes whatever no stream claimed to the leftover buffer.
//!
//! Mass is conserved exactly: popped feed = stream pushes + returned feed +
//! leftover, to floating-point tolerance.

use crate::buffer::{BufferError, MatBuf};
use crate::material::{EPS_QTY, Material, MaterialError};
use std::collections::BTreeMap;

/// Errors from allocation.
#[derive(Debug, thiserror::Error)]
pub enum AllocError {
    #[error("no buffer configured for stream {0:?}")]
    UnknownStream(String),
    #[error(transparent)]
    Material(#[from] MaterialError),
    #[error(transparent)]
    Buffer(#[from] BufferError),
}

/// What one allocation pass did with the popped feed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AllocationSummary {
    /// The limiting scale factor applied uniformly to every stream.
    pub scale: f64,
    /// Mass pushed into each stream buffer, in kg.
    pub separated: BTreeMap<String, f64>,
    /// Unprocessed feed returned to the feed buffer, in kg.
    pub returned_to_feed: f64,
    /// Unclaimed residue pushed to the leftover buffer, in kg.
    pub to_leftover: f64,
}

/// The single scale factor respecting every destination buffer.
///
/// For each stream, `frac = space / candidate_quantity`; zero-quantity
/// candidates are non-limiting. The result is `min(1, min frac)`.
pub fn limiting_scale(
    staged: &BTreeMap<String, Material>,
    streambufs: &BTreeMap<String, MatBuf>,
) -> Result<f64, AllocError> {
    let mut scale = 1.0_f64;
    for (name, candidate) in staged {
        if candidate.quantity() <= EPS_QTY {
            continue;
        }
        let buf = streambufs
            .get(name)
            .ok_or_else(|| AllocError::UnknownStream(name.clone()))?;
        let frac = buf.space() / candidate.quantity();
        if frac < scale {
            scale = frac;
        }
    }
    Ok(scale)
}

/// Apply one allocation pass.
///
/// `mat` is the feed parcel popped this timestep; `staged` the candidate
/// separations computed from it. Every stream with a positive candidate
/// receives `candidate x scale` (candidate composition preserved); when the
/// scale is below 1 the unprocessed fraction of the original feed quantity
/// goes back to the feed buffer, and the remaining unclaimed mass goes to
/// leftover.
pub fn allocate(
    mut mat: Material,
    staged: &BTreeMap<String, Material>,
    streambufs: &mut BTreeMap<String, MatBuf>,
    feed: &mut MatBuf,
    leftover: &mut MatBuf,
) -> Result<AllocationSummary, AllocError> {
    let orig_qty = mat.quantity();
    let scale = limiting_scale(staged, streambufs)?;

    let mut summary = AllocationSummary {
        scale,
        ..Default::default()
    };

    for (name, candidate) in staged {
        let qty = candidate.quantity() * scale;
        if qty <= EPS_QTY {
            continue;
        }
        let parcel = mat.extract_comp(qty, candidate.composition())?;
        let buf = streambufs
            .get_mut(name)
            .ok_or_else(|| AllocError::UnknownStream(name.clone()))?;
        buf.push(parcel)?;
        summary.separated.insert(name.clone(), qty);
    }

    if scale < 1.0 {
        let returned = mat.extract_qty((1.0 - scale) * orig_qty)?;
        summary.returned_to_feed = returned.quantity();
        feed.push(returned)?;
    }

    if mat.quantity() > EPS_QTY {
        summary.to_leftover = mat.quantity();
        leftover.push(mat)?;
    }

    Ok(summary)
}
