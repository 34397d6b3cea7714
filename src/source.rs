//! Point entity stream read from an OSM PBF extract.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use osmpbfreader::{Node, OsmObj, OsmPbfReader, Tags};

/// A single OSM node with its tags and position
#[derive(Debug, Clone)]
pub struct PointEntity {
    pub id: u64,
    pub lat: f64,
    pub lon: f64,
    pub tags: Tags,
}

impl From<Node> for PointEntity {
    fn from(node: Node) -> Self {
        Self {
            id: node.id.0 as u64,
            lat: node.lat(),
            lon: node.lon(),
            tags: node.tags,
        }
    }
}

/// Reads nodes out of a PBF file, ignoring ways and relations
pub struct PbfPointSource {
    reader: OsmPbfReader<BufReader<File>>,
}

impl PbfPointSource {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open PBF file {}", path.display()))?;
        Ok(Self {
            reader: OsmPbfReader::new(BufReader::new(file)),
        })
    }

    /// Lazily iterate over the nodes of the extract.
    ///
    /// Decode errors are yielded to the caller, not skipped.
    pub fn points(&mut self) -> impl Iterator<Item = Result<PointEntity>> + '_ {
        self.reader.iter().filter_map(|obj| match obj {
            Ok(OsmObj::Node(node)) => Some(Ok(PointEntity::from(node))),
            Ok(_) => None,
            Err(e) => Some(Err(anyhow::Error::new(e).context("Failed to decode PBF block"))),
        })
    }
}
