//! The pyroprocessing facility: buffer ledger plus lifecycle.
//!
//! A facility converts one feed stream into several physically-defined
//! output streams plus a leftover stream. Streams are fixed at
//! configuration time; buffer contents mutate continuously. Each tick:
//!
//! 1. Pop feed up to the throughput limit.
//! 2. Separate one candidate parcel per configured stream, scaled by the
//!    stream's backing sub-process efficiency.
//! 3. Allocate: one limiting scale factor across all streams, remainder to
//!    the feed buffer (capacity pressure) or the leftover buffer
//!    (unclaimed mass).
//!
//! The facility is a plain value type implementing [`crate::agent::Agent`];
//! the kernel that schedules it and the exchange that matches its trades
//! are external collaborators.

use crate::agent::Agent;
use crate::allocator::{AllocError, AllocationSummary, allocate};
use crate::buffer::{BufferError, MatBuf};
use crate::comp::Composition;
use crate::event::FacilityEvent;
use crate::material::{EPS_QTY, Material};
use crate::nuclide::{EffMap, NucId};
use crate::separator::separate;
use crate::snapshot::{FEED_INV_NAME, Inventories, LEFTOVER_INV_NAME};
use crate::stage::{ProcessKind, Reduction, Refining, StageError, Voloxidation, Winning};
use crate::trade::{
    Bid, BidPortfolio, CommodRequests, DEFAULT_PREF, Request, RequestPortfolio, SimContext, Trade,
    TradeError,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// One output separation stream.
///
/// The name under which the stream is keyed doubles as the commodity its
/// material trades on. Each configured nuclide/element efficiency is the
/// mass fraction of that component separated from the feed into this
/// stream, further scaled by the backing sub-process efficiency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamSpec {
    /// Buffer capacity in kg; negative means unbounded.
    pub capacity: f64,
    /// The physical sub-process backing this stream. `None` means a
    /// pass-through stream whose configured efficiencies apply unscaled.
    pub process: Option<ProcessKind>,
    /// Nuclide/element id to mass-separation efficiency (0-1).
    pub efficiencies: EffMap,
}

/// Facility configuration, fixed for the facility's lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityConfig {
    /// Facility name, used in error messages and trade routing.
    pub name: String,
    /// Ordered list of commodities on which to request feed material.
    pub feed_commods: Vec<String>,
    /// Request preferences matching `feed_commods` by position. Empty means
    /// every preference defaults to 1.0.
    pub feed_commod_prefs: Vec<f64>,
    /// Target composition for feed requests, when the facility cares.
    pub feed_recipe: Option<Composition>,
    /// Feed buffer capacity in kg.
    pub feed_capacity: f64,
    /// Maximum feed mass processed per timestep, in kg.
    pub throughput: f64,
    /// Commodity on which leftover material trades. Must not collide with
    /// any stream name.
    pub leftover_commod: String,
    /// Leftover buffer capacity in kg; negative means unbounded.
    pub leftover_capacity: f64,
    pub volox: Voloxidation,
    pub reduction: Reduction,
    pub refining: Refining,
    pub winning: Winning,
    /// Output streams keyed by commodity name.
    pub streams: BTreeMap<String, StreamSpec>,
}

impl Default for FacilityConfig {
    fn default() -> Self {
        Self {
            name: "pyre".to_string(),
            feed_commods: Vec::new(),
            feed_commod_prefs: Vec::new(),
            feed_recipe: None,
            feed_capacity: 1e299,
            throughput: 1e299,
            leftover_commod: "default-waste-stream".to_string(),
            leftover_capacity: 1e299,
            volox: Voloxidation::default(),
            reduction: Reduction::default(),
            refining: Refining::default(),
            winning: Winning::default(),
            streams: BTreeMap::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

fn fmt_nuclides(ids: &[NucId]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Fatal configuration errors, surfaced once at activation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(
        "in {facility}, the following nuclide(s) have a cumulative separation \
         efficiency greater than 1: {}",
        fmt_nuclides(.nuclides)
    )]
    CumulativeEfficiency {
        facility: String,
        nuclides: Vec<NucId>,
    },
    #[error("in {facility}, the {stage} stage efficiency {value} is outside [0, 1]")]
    StageEfficiencyOutOfRange {
        facility: String,
        stage: &'static str,
        value: f64,
    },
    #[error("in {facility}, {prefs} feed preference(s) given for {commods} feed commodities")]
    PreferenceCount {
        facility: String,
        prefs: usize,
        commods: usize,
    },
    #[error(transparent)]
    Stage(#[from] StageError),
}

/// Errors from the per-timestep tick.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    #[error("tick on a facility that was never activated")]
    NotActivated,
    #[error(transparent)]
    Alloc(#[from] AllocError),
    #[error(transparent)]
    Buffer(#[from] BufferError),
}

/// Errors from inventory restoration.
#[derive(Debug, thiserror::Error)]
pub enum RestoreError {
    #[error("unknown inventory {0:?} in restore")]
    UnknownInventory(String),
    #[error(transparent)]
    Buffer(#[from] BufferError),
}

// ---------------------------------------------------------------------------
// Stage scalars
// ---------------------------------------------------------------------------

/// The four sub-process efficiency factors, computed once at activation
/// (stage parameters are immutable for the facility's lifetime).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct StageScalars {
    volox: f64,
    reduction: f64,
    refining: f64,
    winning: f64,
}

impl StageScalars {
    fn get(&self, kind: ProcessKind) -> f64 {
        match kind {
            ProcessKind::Voloxidation => self.volox,
            ProcessKind::Reduction => self.reduction,
            ProcessKind::Refining => self.refining,
            ProcessKind::Winning => self.winning,
        }
    }
}

// ---------------------------------------------------------------------------
// Facility
// ---------------------------------------------------------------------------

/// A pyroprocessing facility: configuration plus exclusively-owned buffers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    config: FacilityConfig,
    feed: MatBuf,
    leftover: MatBuf,
    streambufs: BTreeMap<String, MatBuf>,
    /// `Some` once activated.
    scalars: Option<StageScalars>,
    events: Vec<FacilityEvent>,
}

impl Facility {
    /// Build a facility with empty buffers sized from the configuration.
    pub fn new(config: FacilityConfig) -> Self {
        let feed = MatBuf::with_capacity(config.feed_capacity);
        let leftover = MatBuf::with_capacity(config.leftover_capacity);
        let streambufs = config
            .streams
            .iter()
            .map(|(name, spec)| (name.clone(), MatBuf::with_capacity(spec.capacity)))
            .collect();
        Self {
            config,
            feed,
            leftover,
            streambufs,
            scalars: None,
            events: Vec::new(),
        }
    }

    pub fn config(&self) -> &FacilityConfig {
        &self.config
    }

    pub fn feed_buf(&self) -> &MatBuf {
        &self.feed
    }

    pub fn leftover_buf(&self) -> &MatBuf {
        &self.leftover
    }

    pub fn stream_buf(&self, name: &str) -> Option<&MatBuf> {
        self.streambufs.get(name)
    }

    /// The sub-process efficiency factor computed at activation.
    pub fn stage_scalar(&self, kind: ProcessKind) -> Option<f64> {
        self.scalars.map(|s| s.get(kind))
    }

    /// Drain buffered events.
    pub fn take_events(&mut self) -> Vec<FacilityEvent> {
        std::mem::take(&mut self.events)
    }

    /// Direct feed access for tests, bypassing the trade path.
    #[cfg(any(test, feature = "test-utils"))]
    pub fn feed_buf_mut(&mut self) -> &mut MatBuf {
        &mut self.feed
    }

    fn scalar_for(&self, process: Option<ProcessKind>) -> f64 {
        match (process, self.scalars) {
            (Some(kind), Some(scalars)) => scalars.get(kind),
            _ => 1.0,
        }
    }

    /// Run one separation pass over the feed buffer. Returns `None` when
    /// the feed buffer is empty.
    pub fn process_feed(&mut self) -> Result<Option<AllocationSummary>, TickError> {
        if self.scalars.is_none() {
            return Err(TickError::NotActivated);
        }
        if self.feed.count() == 0 {
            return Ok(None);
        }

        let pop_qty = self.config.throughput.min(self.feed.quantity());
        let mat = self.feed.pop_qty(pop_qty)?;

        let staged: BTreeMap<String, Material> = self
            .config
            .streams
            .iter()
            .map(|(name, spec)| {
                let scalar = self.scalar_for(spec.process);
                (name.clone(), separate(&spec.efficiencies, scalar, &mat))
            })
            .collect();

        let summary = allocate(
            mat,
            &staged,
            &mut self.streambufs,
            &mut self.feed,
            &mut self.leftover,
        )?;

        for (stream, &qty) in &summary.separated {
            self.events.push(FacilityEvent::StreamPushed {
                stream: stream.clone(),
                qty,
            });
        }
        if summary.returned_to_feed > 0.0 {
            self.events.push(FacilityEvent::FeedDeferred {
                qty: summary.returned_to_feed,
                scale: summary.scale,
            });
        }
        if summary.to_leftover > 0.0 {
            self.events.push(FacilityEvent::LeftoverPushed {
                qty: summary.to_leftover,
            });
        }

        Ok(Some(summary))
    }

    /// Per-id cumulative efficiencies across all streams.
    fn cumulative_efficiencies(&self) -> BTreeMap<NucId, f64> {
        let mut cumulative: BTreeMap<NucId, f64> = BTreeMap::new();
        for spec in self.config.streams.values() {
            for (&nuc, &eff) in &spec.efficiencies {
                *cumulative.entry(nuc).or_insert(0.0) += eff;
            }
        }
        cumulative
    }

    fn validated_scalar(&self, stage: &'static str, value: f64) -> Result<f64, ConfigError> {
        if (0.0..=1.0).contains(&value) {
            Ok(value)
        } else {
            Err(ConfigError::StageEfficiencyOutOfRange {
                facility: self.config.name.clone(),
                stage,
                value,
            })
        }
    }
}

impl Agent for Facility {
    fn activate(&mut self) -> Result<(), ConfigError> {
        let offenders: Vec<NucId> = self
            .cumulative_efficiencies()
            .into_iter()
            .filter(|&(_, total)| total > 1.0 + 1e-12)
            .map(|(nuc, _)| nuc)
            .collect();
        if !offenders.is_empty() {
            return Err(ConfigError::CumulativeEfficiency {
                facility: self.config.name.clone(),
                nuclides: offenders,
            });
        }

        if self.config.feed_commod_prefs.is_empty() {
            self.config.feed_commod_prefs = vec![DEFAULT_PREF; self.config.feed_commods.len()];
        } else if self.config.feed_commod_prefs.len() != self.config.feed_commods.len() {
            return Err(ConfigError::PreferenceCount {
                facility: self.config.name.clone(),
                prefs: self.config.feed_commod_prefs.len(),
                commods: self.config.feed_commods.len(),
            });
        }

        let scalars = StageScalars {
            volox: self.validated_scalar("voloxidation", self.config.volox.efficiency())?,
            reduction: self.validated_scalar("reduction", self.config.reduction.efficiency())?,
            refining: self.validated_scalar("refining", self.config.refining.efficiency()?)?,
            winning: self.validated_scalar("winning", self.config.winning.efficiency())?,
        };
        self.scalars = Some(scalars);
        Ok(())
    }

    fn tick(&mut self, _ctx: &SimContext) -> Result<(), TickError> {
        self.process_feed().map(|_| ())
    }

    fn material_requests(&self, ctx: &SimContext) -> Vec<RequestPortfolio> {
        if let Some(remaining) = ctx.remaining() {
            // Already holding enough feed for the remainder of life.
            if self.feed.quantity() >= remaining as f64 * self.config.throughput {
                return Vec::new();
            }
        }
        if self.feed.space() < EPS_QTY {
            return Vec::new();
        }

        let qty = self.feed.space();
        let requests = self
            .config
            .feed_commods
            .iter()
            .enumerate()
            .map(|(i, commod)| Request {
                commodity: commod.clone(),
                quantity: qty,
                preference: self
                    .config
                    .feed_commod_prefs
                    .get(i)
                    .copied()
                    .unwrap_or(DEFAULT_PREF),
                recipe: self.config.feed_recipe.clone(),
            })
            .collect();

        vec![RequestPortfolio {
            requests,
            mutual: true,
        }]
    }

    fn bids(&self, requests: &CommodRequests) -> Vec<BidPortfolio> {
        let sources = self
            .streambufs
            .iter()
            .map(|(name, buf)| (name.as_str(), buf))
            .chain([(self.config.leftover_commod.as_str(), &self.leftover)]);

        let mut portfolios = Vec::new();
        for (commod, buf) in sources {
            let Some(reqs) = requests.get(commod) else {
                continue;
            };
            if reqs.is_empty() || buf.quantity() < EPS_QTY {
                continue;
            }

            let mut bids = Vec::new();
            for req in reqs {
                let mut offered = 0.0;
                for parcel in buf.iter() {
                    offered += parcel.quantity();
                    // The exchange rejects non-positive bids; skip parcels
                    // below tolerance.
                    if parcel.quantity() > EPS_QTY {
                        bids.push(Bid {
                            commodity: commod.to_string(),
                            quantity: parcel.quantity(),
                        });
                    }
                    if offered >= req.quantity {
                        break;
                    }
                }
            }

            portfolios.push(BidPortfolio {
                bids,
                capacity: buf.quantity(),
            });
        }
        portfolios
    }

    fn fulfill_trades(&mut self, trades: &[Trade]) -> Result<Vec<(Trade, Material)>, TradeError> {
        let mut responses = Vec::with_capacity(trades.len());
        for trade in trades {
            let buf = if trade.commodity == self.config.leftover_commod {
                &mut self.leftover
            } else if let Some(buf) = self.streambufs.get_mut(&trade.commodity) {
                buf
            } else {
                return Err(TradeError::InvalidCommodity {
                    commodity: trade.commodity.clone(),
                    facility: self.config.name.clone(),
                });
            };

            let amt = trade.quantity.min(buf.quantity());
            let mat = buf.pop_qty(amt)?;
            self.events.push(FacilityEvent::MaterialTraded {
                commodity: trade.commodity.clone(),
                qty: mat.quantity(),
            });
            responses.push((trade.clone(), mat));
        }
        Ok(responses)
    }

    fn accept_trades(&mut self, responses: Vec<(Trade, Material)>) -> Result<(), BufferError> {
        for (_, mat) in responses {
            let qty = mat.quantity();
            self.feed.push(mat)?;
            self.events.push(FacilityEvent::FeedAccepted { qty });
        }
        Ok(())
    }

    fn decommission_ready(&self) -> bool {
        self.leftover.count() == 0 && self.streambufs.values().all(|buf| buf.count() == 0)
    }

    fn snapshot_inventories(&mut self) -> Inventories {
        let mut inv = Inventories::new();
        // These inventory names are intentionally convoluted so as to not
        // clash with the user-specified stream commodities used as the
        // stream inventory names.
        inv.insert(FEED_INV_NAME.to_string(), self.feed.snapshot());
        inv.insert(LEFTOVER_INV_NAME.to_string(), self.leftover.snapshot());
        for (name, buf) in &mut self.streambufs {
            inv.insert(name.clone(), buf.snapshot());
        }
        inv
    }

    fn restore_inventories(&mut self, inv: Inventories) -> Result<(), RestoreError> {
        for (name, mats) in inv {
            let buf = match name.as_str() {
                FEED_INV_NAME => &mut self.feed,
                LEFTOVER_INV_NAME => &mut self.leftover,
                _ => self
                    .streambufs
                    .get_mut(&name)
                    .ok_or_else(|| RestoreError::UnknownInventory(name.clone()))?,
            };
            buf.push_all(mats)?;
        }
        Ok(())
    }
}

// ===========================================================================
// Tests
// ===========================================================================
