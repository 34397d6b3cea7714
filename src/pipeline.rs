//! Parking space extraction pipeline.
//!
//! Streams nodes from an OSM extract, keeps those tagged
//! `amenity=parking_space`, and writes them to `parking_space.bin` in the
//! tile directory. When anything was found the sequence is handed to a
//! [`Correlator`].

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indicatif::ProgressBar;
use tracing::{info, warn};

use crate::classify::{classify, Classification};
use crate::config::Config;
use crate::correlate::Correlator;
use crate::sequence::{count_records, SequenceWriter};
use crate::source::{PbfPointSource, PointEntity};

pub const SEQUENCE_FILE_NAME: &str = "parking_space.bin";

/// Counters from a single extraction pass
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExtractStats {
    pub scanned: u64,
    /// Nodes with no tags at all
    pub untagged: u64,
    pub written: u64,
    /// Parking spaces dropped because of an unparseable level
    pub rejected: u64,
}

impl ExtractStats {
    pub fn found_any(&self) -> bool {
        self.written > 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractOutcome {
    /// No parking spaces; the sequence exists but is empty
    Empty { sequence: PathBuf },
    Correlated { sequence: PathBuf, count: u64 },
}

pub fn sequence_path(tile_dir: &Path) -> PathBuf {
    tile_dir.join(SEQUENCE_FILE_NAME)
}

/// Write every parking space in `points` to a fresh sequence at `path`.
///
/// The first stream error aborts the pass. The writer is flushed on every
/// exit path, so whatever was written before the error is on disk.
pub fn extract_parking_spaces<I>(
    points: I,
    path: &Path,
    progress: &ProgressBar,
) -> Result<ExtractStats>
where
    I: IntoIterator<Item = Result<PointEntity>>,
{
    let mut writer = SequenceWriter::create(path)
        .with_context(|| format!("Failed to create sequence {}", path.display()))?;
    let mut stats = ExtractStats::default();

    for point in points {
        let point = point?;
        stats.scanned += 1;
        progress.inc(1);

        // nothing to do
        if point.tags.is_empty() {
            stats.untagged += 1;
            continue;
        }

        match classify(&point) {
            Classification::Ignored => {}
            Classification::Rejected {
                osm_id,
                level_text,
                error,
            } => {
                warn!(
                    "Skipping parking space {} with level '{}': {}",
                    osm_id, level_text, error
                );
                stats.rejected += 1;
            }
            Classification::Accepted(record) => writer.push(&record)?,
        }
    }

    stats.written = writer.finish()?;

    Ok(stats)
}

/// Run the whole extraction for one OSM file.
pub fn process_parking_spaces<C: Correlator + ?Sized>(
    config: &Config,
    osm_file: &Path,
    correlator: &C,
) -> Result<ExtractOutcome> {
    process_parking_spaces_with_progress(config, osm_file, correlator, &ProgressBar::hidden())
}

pub fn process_parking_spaces_with_progress<C: Correlator + ?Sized>(
    config: &Config,
    osm_file: &Path,
    correlator: &C,
    progress: &ProgressBar,
) -> Result<ExtractOutcome> {
    let mut source = PbfPointSource::open(osm_file)?;
    let outcome = run(config, source.points(), correlator, progress);
    progress.finish_and_clear();
    outcome
}

/// Same as [`process_parking_spaces`], over an in-memory or custom stream
pub fn process_points<I, C>(config: &Config, points: I, correlator: &C) -> Result<ExtractOutcome>
where
    I: IntoIterator<Item = Result<PointEntity>>,
    C: Correlator + ?Sized,
{
    run(config, points, correlator, &ProgressBar::hidden())
}

fn run<I, C>(
    config: &Config,
    points: I,
    correlator: &C,
    progress: &ProgressBar,
) -> Result<ExtractOutcome>
where
    I: IntoIterator<Item = Result<PointEntity>>,
    C: Correlator + ?Sized,
{
    info!("Processing parking spaces...");
    let sequence = sequence_path(config.tile_dir()?);

    let stats = extract_parking_spaces(points, &sequence, progress)?;
    info!("Wrote sequence to {}", sequence.display());

    if !stats.found_any() {
        warn!(
            "Did not find any parking space nodes ({} nodes scanned)",
            stats.scanned
        );
        return Ok(ExtractOutcome::Empty { sequence });
    }

    // no count is stored in the file, so take it from the file size
    let count = count_records(&sequence)?;
    info!("Done parsing parking spaces, found {} nodes", count);
    if stats.rejected > 0 {
        warn!(
            "{} parking spaces skipped due to invalid level values",
            stats.rejected
        );
    }

    correlator.correlate(config, &sequence)?;

    Ok(ExtractOutcome::Correlated { sequence, count })
}
