//! Binary persistence for facility state.
//!
//! Two layers. [`Inventories`] is the host-facing exchange format for
//! buffer contents, keyed by inventory name, produced and consumed by
//! `Agent::snapshot_inventories` / `restore_inventories`. On top of that,
//! a whole facility (configuration, buffers, activation state) serializes
//! to a binary blob via `bitcode` with a versioned header, so a host can
//! park a facility and revive it in a later process.

use crate::facility::Facility;
use crate::material::Material;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Magic number identifying a pyreflow facility snapshot.
pub const SNAPSHOT_MAGIC: u32 = 0x9E7A_0001;

/// Current format version. Increment when breaking the wire format.
pub const FORMAT_VERSION: u32 = 1;

/// Inventory name for the feed buffer. Intentionally convoluted so it
/// cannot clash with a user-chosen stream commodity.
pub const FEED_INV_NAME: &str = "feed-inv-name";

/// Inventory name for the leftover buffer.
pub const LEFTOVER_INV_NAME: &str = "leftover-inv-name";

/// Named buffer contents, as exported by `Agent::snapshot_inventories`.
/// Stream buffers are keyed by their commodity name; the feed and leftover
/// buffers use [`FEED_INV_NAME`] and [`LEFTOVER_INV_NAME`].
pub type Inventories = BTreeMap<String, Vec<Material>>;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur during serialization.
#[derive(Debug, thiserror::Error)]
pub enum SerializeError {
    #[error("bitcode encoding failed: {0}")]
    Encode(String),
}

/// Errors that can occur during deserialization.
#[derive(Debug, thiserror::Error)]
pub enum DeserializeError {
    #[error("invalid magic number: expected 0x{:08X}, got 0x{:08X}", SNAPSHOT_MAGIC, .0)]
    InvalidMagic(u32),
    #[error("unsupported format version: expected {}, got {}", FORMAT_VERSION, .0)]
    UnsupportedVersion(u32),
    #[error("snapshot from future version {0} (this build supports up to {FORMAT_VERSION})")]
    FutureVersion(u32),
    #[error("bitcode decoding failed: {0}")]
    Decode(String),
}

// ---------------------------------------------------------------------------
// Snapshot header
// ---------------------------------------------------------------------------

/// Header prepended to every serialized snapshot. Enables format detection
/// and version checking before attempting to use the payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotHeader {
    /// Magic number for format detection.
    pub magic: u32,
    /// Format version for forward compatibility.
    pub version: u32,
    /// Simulated time at which the snapshot was taken.
    pub time: i64,
}

impl SnapshotHeader {
    /// Create a header for the current format version.
    pub fn new(time: i64) -> Self {
        Self {
            magic: SNAPSHOT_MAGIC,
            version: FORMAT_VERSION,
            time,
        }
    }

    /// Validate the header. Returns `Ok(())` if valid.
    pub fn validate(&self) -> Result<(), DeserializeError> {
        if self.magic != SNAPSHOT_MAGIC {
            return Err(DeserializeError::InvalidMagic(self.magic));
        }
        if self.version > FORMAT_VERSION {
            return Err(DeserializeError::FutureVersion(self.version));
        }
        if self.version < FORMAT_VERSION {
            return Err(DeserializeError::UnsupportedVersion(self.version));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Facility serialization
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
struct FacilitySnapshot {
    header: SnapshotHeader,
    facility: Facility,
}

/// Serialize a facility to a binary blob via bitcode.
pub fn serialize_facility(facility: &Facility, time: i64) -> Result<Vec<u8>, SerializeError> {
    let snapshot = FacilitySnapshot {
        header: SnapshotHeader::new(time),
        facility: facility.clone(),
    };
    bitcode::serialize(&snapshot).map_err(|e| SerializeError::Encode(e.to_string()))
}

/// Deserialize a facility from a binary blob.
///
/// Validates the snapshot header (magic number, version) before handing
/// back the payload. Returns an error, not a panic, on version mismatch.
pub fn deserialize_facility(data: &[u8]) -> Result<(Facility, i64), DeserializeError> {
    let snapshot: FacilitySnapshot =
        bitcode::deserialize(data).map_err(|e| DeserializeError::Decode(e.to_string()))?;
    snapshot.header.validate()?;
    Ok((snapshot.facility, snapshot.header.time))
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_validation() {
        let good = SnapshotHeader::new(42);
        assert!(good.validate().is_ok());

        let bad_magic = SnapshotHeader {
            magic: 0xDEAD_BEEF,
            version: FORMAT_VERSION,
            time: 0,
        };
        assert!(matches!(
            bad_magic.validate(),
            Err(DeserializeError::InvalidMagic(0xDEAD_BEEF))
        ));
    }

    #[test]
    fn future_version_is_an_error() {
        let header = SnapshotHeader {
            magic: SNAPSHOT_MAGIC,
            version: FORMAT_VERSION + 1,
            time: 0,
        };
        assert!(matches!(
            header.validate(),
            Err(DeserializeError::FutureVersion(_))
        ));
    }

    #[test]
    fn garbage_data_fails_to_decode() {
        let garbage = vec![0u8; 10];
        match deserialize_facility(&garbage) {
            Err(DeserializeError::Decode(_)) => {}
            other => panic!("expected Decode error, got: {other:?}"),
        }
    }
}
