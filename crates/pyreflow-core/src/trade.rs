//! Data types for the material-exchange boundary.
//!
//! The matching and clearing algorithm lives in the host simulator; the
//! facility only produces requests and bids and answers matched trades.
//! These are plain value types so the kernel side stays free to organize
//! its exchange however it likes.

use crate::comp::Composition;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default preference weight for feed requests.
pub const DEFAULT_PREF: f64 = 1.0;

/// Kernel-provided timing context, injected into lifecycle calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimContext {
    /// Current simulated time step.
    pub time: i64,
    /// Scheduled decommission time, if any.
    pub exit_time: Option<i64>,
}

impl SimContext {
    pub fn new(time: i64) -> Self {
        Self {
            time,
            exit_time: None,
        }
    }

    /// Time steps remaining before scheduled exit, if an exit is scheduled.
    pub fn remaining(&self) -> Option<i64> {
        self.exit_time.map(|exit| (exit - self.time).max(0))
    }
}

/// A request for material on one commodity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub commodity: String,
    /// Requested mass, in kg.
    pub quantity: f64,
    pub preference: f64,
    /// Target composition, when the requester cares.
    pub recipe: Option<Composition>,
}

/// A group of requests. Mutual requests are alternatives: filling any one
/// of them (pro rata) satisfies the portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestPortfolio {
    pub requests: Vec<Request>,
    pub mutual: bool,
}

/// An offer of material against a specific request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bid {
    pub commodity: String,
    /// Offered mass, in kg.
    pub quantity: f64,
}

/// A group of bids constrained by the total mass actually on hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BidPortfolio {
    pub bids: Vec<Bid>,
    /// Capacity constraint: the portfolio cannot clear more than this.
    pub capacity: f64,
}

/// A matched trade handed back by the exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub commodity: String,
    /// Matched mass, in kg.
    pub quantity: f64,
}

/// Open requests grouped by commodity, as seen by bidders.
pub type CommodRequests = BTreeMap<String, Vec<Request>>;

/// Errors from trade routing.
#[derive(Debug, thiserror::Error)]
pub enum TradeError {
    /// The exchange matched a commodity this facility does not produce.
    /// A wiring bug between facility and exchange, not recoverable.
    #[error("invalid commodity {commodity:?} on trade matched to facility {facility:?}")]
    InvalidCommodity { commodity: String, facility: String },
    #[error(transparent)]
    Buffer(#[from] crate::buffer::BufferError),
}
