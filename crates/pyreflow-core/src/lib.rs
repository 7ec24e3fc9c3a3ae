//! Pyreflow Core -- a pyroprocessing separations facility for fuel-cycle
//! simulation.
//!
//! The facility converts one spent-fuel feed stream into several output
//! streams through four physically-modeled sub-processes (voloxidation,
//! electroreduction, electrorefining, electrowinning), each with an
//! efficiency derived from curve fits to published experimental data.
//!
//! # Tick Pipeline
//!
//! Each call to [`agent::Agent::tick`] advances the facility by one
//! timestep:
//!
//! 1. **Pop** -- Remove feed up to the throughput limit.
//! 2. **Separate** -- Compute one candidate parcel per configured stream
//!    from the feed composition, nuclide and element efficiencies scaled
//!    by the stream's backing sub-process.
//! 3. **Allocate** -- Find the single scale factor respecting the most
//!    capacity-constrained stream buffer, apply it uniformly, return the
//!    unprocessed fraction to the feed buffer, and push the unclaimed
//!    remainder to the leftover buffer.
//!
//! Mass is conserved exactly through every pass.
//!
//! # Key Types
//!
//! - [`facility::Facility`] -- Buffer ledger and lifecycle orchestrator.
//! - [`facility::FacilityConfig`] -- Streams, capacities, and stage
//!   parameters, fixed for the facility's lifetime.
//! - [`stage`] -- The four sub-process efficiency and throughput models.
//! - [`separator::separate`] -- The per-stream mass separation kernel.
//! - [`allocator::allocate`] -- Capacity-constrained min-ratio allocation.
//! - [`buffer::MatBuf`] -- FIFO material buffer with capacity tracking.
//! - [`agent::Agent`] -- The lifecycle interface a host kernel drives.
//! - [`trade`] -- Request/bid/trade value types for the exchange boundary.
//! - [`snapshot`] -- Versioned binary persistence via bitcode.

pub mod agent;
pub mod allocator;
pub mod buffer;
pub mod comp;
pub mod event;
pub mod facility;
pub mod material;
pub mod nuclide;
pub mod separator;
pub mod snapshot;
pub mod stage;
pub mod trade;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
