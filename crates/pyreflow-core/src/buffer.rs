//! Bounded material buffers.
//!
//! A [`MatBuf`] is an ordered collection of [`Material`] parcels with a mass
//! capacity. Buffers are exclusively owned by one facility value; they are
//! filled by trades and separation pushes and drained by trades and
//! `pop_qty`. A negative configured capacity means unbounded, matching the
//! stream-definition convention.

use crate::comp::Composition;
use crate::material::{EPS_QTY, Material};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Errors from buffer operations.
#[derive(Debug, thiserror::Error)]
pub enum BufferError {
    #[error("push of {pushed} kg exceeds the {space} kg of space")]
    Overfill { pushed: f64, space: f64 },
    #[error("pop of {requested} kg exceeds the {available} kg held")]
    Underflow { requested: f64, available: f64 },
    #[error("capacity {capacity} kg is below the {held} kg already held")]
    CapacityBelowContents { capacity: f64, held: f64 },
}

/// An ordered, capacity-limited collection of material parcels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatBuf {
    capacity: f64,
    mats: VecDeque<Material>,
}

impl MatBuf {
    /// A buffer with no capacity limit.
    pub fn unbounded() -> Self {
        Self {
            capacity: f64::INFINITY,
            mats: VecDeque::new(),
        }
    }

    /// A buffer limited to `capacity` kg. Negative capacities configure an
    /// unbounded buffer.
    pub fn with_capacity(capacity: f64) -> Self {
        if capacity < 0.0 {
            Self::unbounded()
        } else {
            Self {
                capacity,
                mats: VecDeque::new(),
            }
        }
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    /// Tighten or widen the capacity. Fails when the buffer already holds
    /// more than the new limit.
    pub fn set_capacity(&mut self, capacity: f64) -> Result<(), BufferError> {
        let capacity = if capacity < 0.0 { f64::INFINITY } else { capacity };
        if capacity + EPS_QTY < self.quantity() {
            return Err(BufferError::CapacityBelowContents {
                capacity,
                held: self.quantity(),
            });
        }
        self.capacity = capacity;
        Ok(())
    }

    /// Total mass held, in kg.
    pub fn quantity(&self) -> f64 {
        self.mats.iter().map(Material::quantity).sum()
    }

    /// Remaining capacity, in kg.
    pub fn space(&self) -> f64 {
        (self.capacity - self.quantity()).max(0.0)
    }

    /// Number of parcels held.
    pub fn count(&self) -> usize {
        self.mats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mats.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Material> {
        self.mats.iter()
    }

    /// Append a parcel. Parcels below tolerance are silently dropped;
    /// pushes past capacity are an error.
    pub fn push(&mut self, mat: Material) -> Result<(), BufferError> {
        if mat.quantity() <= EPS_QTY {
            return Ok(());
        }
        if mat.quantity() > self.space() + EPS_QTY {
            return Err(BufferError::Overfill {
                pushed: mat.quantity(),
                space: self.space(),
            });
        }
        self.mats.push_back(mat);
        Ok(())
    }

    pub fn push_all(&mut self, mats: Vec<Material>) -> Result<(), BufferError> {
        for mat in mats {
            self.push(mat)?;
        }
        Ok(())
    }

    /// Extract `qty` kg as a single parcel, splitting the boundary parcel
    /// (composition preserved) when it straddles the requested amount.
    pub fn pop_qty(&mut self, qty: f64) -> Result<Material, BufferError> {
        let available = self.quantity();
        if qty > available + EPS_QTY {
            return Err(BufferError::Underflow {
                requested: qty,
                available,
            });
        }

        let mut acc = Material::new(0.0, &Composition::new());
        let mut need = qty.min(available);
        while need > EPS_QTY {
            let Some(front) = self.mats.pop_front() else {
                break;
            };
            if front.quantity() > need + EPS_QTY {
                let rest = Material::new(front.quantity() - need, front.composition());
                let taken = Material::new(need, front.composition());
                self.mats.push_front(rest);
                acc.absorb(taken);
                need = 0.0;
            } else {
                need -= front.quantity();
                acc.absorb(front);
            }
        }
        Ok(acc)
    }

    /// Drain every parcel, in order.
    pub fn pop_all(&mut self) -> Vec<Material> {
        self.mats.drain(..).collect()
    }

    /// Empty the buffer into a transport vector and immediately refill it
    /// from the same contents. The buffer is observably unchanged; the
    /// returned vector is what an external persistence layer records.
    pub fn snapshot(&mut self) -> Vec<Material> {
        let mats: Vec<Material> = self.mats.drain(..).collect();
        self.mats.extend(mats.iter().cloned());
        mats
    }
}

impl Default for MatBuf {
    fn default() -> Self {
        Self::unbounded()
    }
}
