//! The lifecycle interface between a facility and the simulation kernel.
//!
//! The kernel drives each agent strictly sequentially: `activate` once,
//! then per timestep `tick`, request/bid/trade callbacks, and `tock`.
//! Separation always completes (all buffer pushes included) before the same
//! timestep's bids are computed, and accepted feed trades land before the
//! next tick consumes feed. The kernel itself is an external collaborator;
//! this trait is the whole surface it needs.

use crate::buffer::BufferError;
use crate::facility::{ConfigError, RestoreError, TickError};
use crate::material::Material;
use crate::snapshot::Inventories;
use crate::trade::{BidPortfolio, CommodRequests, RequestPortfolio, SimContext, Trade, TradeError};

/// A simulated agent driven by an injected scheduler.
pub trait Agent {
    /// One-time entry validation. Configuration errors here are permanent:
    /// the agent never enters the simulation.
    fn activate(&mut self) -> Result<(), ConfigError>;

    /// Advance one timestep of internal processing.
    fn tick(&mut self, ctx: &SimContext) -> Result<(), TickError>;

    /// End-of-timestep hook.
    fn tock(&mut self, ctx: &SimContext) {
        let _ = ctx;
    }

    /// Requests for incoming material this timestep.
    fn material_requests(&self, ctx: &SimContext) -> Vec<RequestPortfolio>;

    /// Bids offering held material against open requests.
    fn bids(&self, requests: &CommodRequests) -> Vec<BidPortfolio>;

    /// Hand over material for matched outgoing trades.
    fn fulfill_trades(&mut self, trades: &[Trade]) -> Result<Vec<(Trade, Material)>, TradeError>;

    /// Receive material for matched incoming trades.
    fn accept_trades(&mut self, responses: Vec<(Trade, Material)>) -> Result<(), BufferError>;

    /// Whether the agent may leave the simulation.
    fn decommission_ready(&self) -> bool;

    /// Export buffer contents for external persistence, leaving the agent
    /// observably unchanged.
    fn snapshot_inventories(&mut self) -> Inventories;

    /// Refill buffers from persisted contents at reactivation.
    fn restore_inventories(&mut self, inv: Inventories) -> Result<(), RestoreError>;
}
