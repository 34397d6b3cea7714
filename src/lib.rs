//! Parking spaces - extracts `amenity=parking_space` nodes from OSM data
//!
//! This library provides the extraction pipeline and the fixed-size record
//! sequence consumed by the graph correlation stage.

pub mod classify;
pub mod config;
pub mod correlate;
pub mod level;
pub mod models;
pub mod pipeline;
pub mod sequence;
pub mod source;

pub use config::Config;
pub use correlate::{Correlator, SummaryCorrelator};
pub use models::{ParkingSpaceRecord, INVALID_LEVEL, RECORD_SIZE};
pub use pipeline::{process_parking_spaces, process_points, ExtractOutcome};
