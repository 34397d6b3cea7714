//! Fixed-layout parking space record written to the sequence file.

use std::mem::size_of;

/// Level value meaning "no level tag present"
pub const INVALID_LEVEL: f32 = f32::MAX;

/// Size in bytes of one encoded record
pub const RECORD_SIZE: usize = size_of::<ParkingSpaceRecord>();

const _: () = assert!(RECORD_SIZE == 32);

/// A single parking space node, as stored in `parking_space.bin`.
///
/// The layout is flat and padding-free so the sequence file is exactly
/// `N * RECORD_SIZE` bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParkingSpaceRecord {
    /// OSM node ID
    pub osm_id: u64,
    pub lat: f64,
    pub lon: f64,
    /// Parsed level, or [`INVALID_LEVEL`]
    pub level: f32,
    /// Digits after the decimal point in the original level text
    pub level_precision: f32,
}

impl ParkingSpaceRecord {
    /// Create a record with no level information
    pub fn new(osm_id: u64, lat: f64, lon: f64) -> Self {
        Self {
            osm_id,
            lat,
            lon,
            level: INVALID_LEVEL,
            level_precision: 0.0,
        }
    }

    /// Attach a parsed level and its precision
    pub fn with_level(mut self, level: f32, precision: u32) -> Self {
        self.level = level;
        self.level_precision = precision as f32;
        self
    }

    pub fn has_level(&self) -> bool {
        self.level != INVALID_LEVEL
    }

    /// Encode in native byte order
    pub fn to_bytes(&self) -> [u8; RECORD_SIZE] {
        let mut buf = [0u8; RECORD_SIZE];
        buf[0..8].copy_from_slice(&self.osm_id.to_ne_bytes());
        buf[8..16].copy_from_slice(&self.lat.to_ne_bytes());
        buf[16..24].copy_from_slice(&self.lon.to_ne_bytes());
        buf[24..28].copy_from_slice(&self.level.to_ne_bytes());
        buf[28..32].copy_from_slice(&self.level_precision.to_ne_bytes());
        buf
    }

    pub fn from_bytes(buf: &[u8; RECORD_SIZE]) -> Self {
        let mut u64_buf = [0u8; 8];
        let mut f32_buf = [0u8; 4];

        u64_buf.copy_from_slice(&buf[0..8]);
        let osm_id = u64::from_ne_bytes(u64_buf);
        u64_buf.copy_from_slice(&buf[8..16]);
        let lat = f64::from_ne_bytes(u64_buf);
        u64_buf.copy_from_slice(&buf[16..24]);
        let lon = f64::from_ne_bytes(u64_buf);
        f32_buf.copy_from_slice(&buf[24..28]);
        let level = f32::from_ne_bytes(f32_buf);
        f32_buf.copy_from_slice(&buf[28..32]);
        let level_precision = f32::from_ne_bytes(f32_buf);

        Self {
            osm_id,
            lat,
            lon,
            level,
            level_precision,
        }
    }
}
