//! Facility events.
//!
//! Emitted on material movements during ticks and trades, buffered in the
//! facility, and drained by the host via `Facility::take_events`. Events
//! fire on movements, not every timestep: an idle tick emits nothing.

use serde::{Deserialize, Serialize};

/// Events emitted by a facility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FacilityEvent {
    /// Traded feed material arrived in the feed buffer.
    FeedAccepted { qty: f64 },
    /// A separated parcel was pushed into a stream buffer.
    StreamPushed { stream: String, qty: f64 },
    /// Output capacity limited this timestep; unprocessed feed was returned
    /// to the feed buffer for a later timestep.
    FeedDeferred { qty: f64, scale: f64 },
    /// Unclaimed residue was pushed to the leftover buffer.
    LeftoverPushed { qty: f64 },
    /// Material left a buffer to fulfill a matched trade.
    MaterialTraded { commodity: String, qty: f64 },
}
