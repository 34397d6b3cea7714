//! Core data models for the parking space extractor.

pub mod parking_space;

pub use parking_space::{ParkingSpaceRecord, INVALID_LEVEL, RECORD_SIZE};
