//! Hand-off point to the graph correlation stage.
//!
//! Correlation itself (mapping parking spaces onto a tiled street graph)
//! lives outside this crate. Implementors reopen the sequence file on
//! their own; nothing is passed in memory.

use std::path::Path;

use anyhow::{Context, Result};
use hashbrown::HashMap;
use tracing::info;

use crate::config::Config;
use crate::sequence::SequenceReader;

pub trait Correlator {
    fn correlate(&self, config: &Config, sequence: &Path) -> Result<()>;
}

/// Read-only stand-in used when no graph store is linked in.
///
/// Reports what a correlator would receive without touching any tiles.
#[derive(Debug, Default, Clone, Copy)]
pub struct SummaryCorrelator;

/// Level breakdown of a sequence file
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LevelSummary {
    pub total: u64,
    pub without_level: u64,
    /// (level, count), sorted by level
    pub levels: Vec<(f32, u64)>,
}

pub fn summarize_levels(sequence: &Path) -> Result<LevelSummary> {
    let mut reader = SequenceReader::open(sequence)?;
    let mut summary = LevelSummary {
        total: reader.len(),
        ..Default::default()
    };

    let mut counts: HashMap<u32, u64> = HashMap::new();
    for record in reader.iter()? {
        let record = record?;
        if record.has_level() {
            *counts.entry(record.level.to_bits()).or_default() += 1;
        } else {
            summary.without_level += 1;
        }
    }

    summary.levels = counts
        .into_iter()
        .map(|(bits, n)| (f32::from_bits(bits), n))
        .collect();
    summary.levels.sort_by(|a, b| a.0.total_cmp(&b.0));

    Ok(summary)
}

impl Correlator for SummaryCorrelator {
    fn correlate(&self, _config: &Config, sequence: &Path) -> Result<()> {
        let summary = summarize_levels(sequence)
            .with_context(|| format!("Failed to read sequence {}", sequence.display()))?;

        info!(
            "{} parking spaces ready for correlation ({} without level)",
            summary.total, summary.without_level
        );
        for (level, n) in &summary.levels {
            info!("  level {}: {} spaces", level, n);
        }
        Ok(())
    }
}
