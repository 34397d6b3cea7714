//! Append-only binary sequence of fixed-size records.
//!
//! The file has no header, trailer or count: it is exactly
//! `len * RECORD_SIZE` bytes in native byte order.

use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, error};

use crate::models::{ParkingSpaceRecord, RECORD_SIZE};

#[derive(Error, Debug)]
pub enum SequenceError {
    #[error("Sequence I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(
        "Sequence {} is {size} bytes, not a multiple of the {} byte record size",
        .path.display(),
        RECORD_SIZE
    )]
    Truncated { path: PathBuf, size: u64 },

    #[error("Record index {index} out of bounds for sequence of {len}")]
    OutOfBounds { index: u64, len: u64 },
}

pub type Result<T> = std::result::Result<T, SequenceError>;

fn io_err(path: &Path) -> impl FnOnce(io::Error) -> SequenceError + '_ {
    move |source| SequenceError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Write-mode handle; truncates the target on creation.
pub struct SequenceWriter {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
    len: u64,
}

impl SequenceWriter {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .map_err(io_err(&path))?;

        debug!("Opened sequence {} for writing", path.display());

        Ok(Self {
            path,
            writer: Some(BufWriter::new(file)),
            len: 0,
        })
    }

    /// Append one record to the end of the sequence
    pub fn push(&mut self, record: &ParkingSpaceRecord) -> Result<()> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| SequenceError::Io {
                path: self.path.clone(),
                source: io::Error::new(io::ErrorKind::Other, "sequence already finished"),
            })?;
        writer
            .write_all(&record.to_bytes())
            .map_err(io_err(&self.path))?;
        self.len += 1;
        Ok(())
    }

    /// Flush and sync to disk, returning the number of records written
    pub fn finish(mut self) -> Result<u64> {
        self.flush_and_sync()?;
        Ok(self.len)
    }

    fn flush_and_sync(&mut self) -> Result<()> {
        if let Some(writer) = self.writer.take() {
            let file = writer
                .into_inner()
                .map_err(|e| SequenceError::Io {
                    path: self.path.clone(),
                    source: e.into_error(),
                })?;
            file.sync_all().map_err(io_err(&self.path))?;
        }
        Ok(())
    }
}

impl Drop for SequenceWriter {
    fn drop(&mut self) {
        if let Err(e) = self.flush_and_sync() {
            error!("Failed to flush sequence on drop: {}", e);
        }
    }
}

/// Read-only view over a finished sequence file
pub struct SequenceReader {
    path: PathBuf,
    reader: BufReader<File>,
    len: u64,
}

impl SequenceReader {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(io_err(&path))?;
        let size = file.metadata().map_err(io_err(&path))?.len();

        if size % RECORD_SIZE as u64 != 0 {
            return Err(SequenceError::Truncated { path, size });
        }

        Ok(Self {
            len: size / RECORD_SIZE as u64,
            reader: BufReader::new(file),
            path,
        })
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Random access to the record at `index`
    pub fn get(&mut self, index: u64) -> Result<ParkingSpaceRecord> {
        if index >= self.len {
            return Err(SequenceError::OutOfBounds {
                index,
                len: self.len,
            });
        }
        self.reader
            .seek(SeekFrom::Start(index * RECORD_SIZE as u64))
            .map_err(io_err(&self.path))?;
        self.read_next()
    }

    /// Iterate over all records in file order
    pub fn iter(&mut self) -> Result<SequenceIter<'_>> {
        self.reader
            .seek(SeekFrom::Start(0))
            .map_err(io_err(&self.path))?;
        Ok(SequenceIter {
            remaining: self.len,
            reader: self,
        })
    }

    fn read_next(&mut self) -> Result<ParkingSpaceRecord> {
        let mut buf = [0u8; RECORD_SIZE];
        self.reader
            .read_exact(&mut buf)
            .map_err(io_err(&self.path))?;
        Ok(ParkingSpaceRecord::from_bytes(&buf))
    }
}

pub struct SequenceIter<'a> {
    reader: &'a mut SequenceReader,
    remaining: u64,
}

impl Iterator for SequenceIter<'_> {
    type Item = Result<ParkingSpaceRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(self.reader.read_next())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining as usize;
        (n, Some(n))
    }
}

/// Count the records in a sequence file without reading them
pub fn count_records<P: AsRef<Path>>(path: P) -> Result<u64> {
    Ok(SequenceReader::open(path)?.len())
}
