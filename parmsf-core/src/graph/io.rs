//! Binary graph files.
//!
//! A file holds two machine words (vertex count, edge count) followed by the
//! canonical edge records, all in host byte order. Loading maps the file and
//! reinterprets the records in place.

use std::{
    fs::File,
    io::{BufWriter, Write},
    mem::size_of,
    path::Path,
};

use memmap2::Mmap;
use tracing::{debug, instrument};
use zerocopy::{AsBytes, FromBytes};

use super::{Edge, EdgeStorage, GraphStore};
use crate::error::GraphError;

const HEADER_BYTES: usize = 2 * size_of::<usize>();

/// Reinterprets the record section of a mapped graph file.
pub(super) fn records(bytes: &[u8]) -> Option<&[Edge]> {
    Edge::slice_from(bytes.get(HEADER_BYTES..)?)
}

fn read_header(bytes: &[u8]) -> Option<(usize, usize)> {
    let [vertices, edges] = <[usize; 2]>::read_from_prefix(bytes)?;
    Some((vertices, edges))
}

fn expected_len(edges: usize) -> Option<u64> {
    let body = edges.checked_mul(size_of::<Edge>())?;
    let total = body.checked_add(HEADER_BYTES)?;
    u64::try_from(total).ok()
}

impl GraphStore {
    /// Memory-maps a graph file written by [`GraphStore::write`].
    ///
    /// The records are validated once and then read in place. The returned
    /// graph has no adjacency index; call [`GraphStore::with_adjacency`] to
    /// build one.
    ///
    /// # Errors
    /// Returns [`GraphError::Io`] when the file cannot be opened or
    /// inspected, [`GraphError::NotRegularFile`] for directories and special
    /// files, [`GraphError::Map`] when mapping fails,
    /// [`GraphError::Truncated`] when the length disagrees with the header,
    /// [`GraphError::VertexCountTooLarge`] when the header's vertex count
    /// leaves no room for the adjacency offsets, and
    /// [`GraphError::UnsortedRecord`] or
    /// [`GraphError::VertexOutOfRange`] for malformed records.
    #[instrument(name = "graph.load", skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GraphError> {
        let path = path.as_ref();
        let io_error = |source| GraphError::Io {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(io_error)?;
        let metadata = file.metadata().map_err(io_error)?;
        if !metadata.is_file() {
            return Err(GraphError::NotRegularFile {
                path: path.to_path_buf(),
            });
        }
        let actual = metadata.len();
        let truncated = |expected| GraphError::Truncated {
            path: path.to_path_buf(),
            expected,
            actual,
        };
        if actual < HEADER_BYTES as u64 {
            return Err(truncated(HEADER_BYTES as u64));
        }

        // SAFETY: the mapping is read-only and the graph never hands out
        // mutable access. Graph files are written once and treated as
        // immutable inputs; concurrent modification by another process is
        // outside the supported contract.
        let map = unsafe { Mmap::map(&file) }.map_err(|source| GraphError::Map {
            path: path.to_path_buf(),
            source,
        })?;

        let (vertices, edge_count) =
            read_header(&map).ok_or_else(|| truncated(HEADER_BYTES as u64))?;
        if vertices == usize::MAX {
            return Err(GraphError::VertexCountTooLarge { vertices });
        }
        let expected = expected_len(edge_count).unwrap_or(u64::MAX);
        if expected != actual {
            return Err(truncated(expected));
        }
        let edges = records(&map).ok_or_else(|| truncated(expected))?;
        validate_records(path, vertices, edges)?;
        debug!(vertices, edges = edge_count, "mapped graph file");

        Ok(Self {
            vertices,
            storage: EdgeStorage::Mapped(map),
            adjacency: None,
        })
    }

    /// Writes the graph in the binary file layout read by
    /// [`GraphStore::load`].
    ///
    /// # Errors
    /// Returns [`GraphError::Io`] when the file cannot be created or written.
    #[instrument(name = "graph.write", skip_all, fields(path = %path.as_ref().display()))]
    pub fn write(&self, path: impl AsRef<Path>) -> Result<(), GraphError> {
        let path = path.as_ref();
        let io_error = |source| GraphError::Io {
            path: path.to_path_buf(),
            source,
        };
        let header = [self.vertex_count(), self.edge_count()];
        let mut writer = BufWriter::new(File::create(path).map_err(io_error)?);
        writer.write_all(header.as_bytes()).map_err(io_error)?;
        writer.write_all(self.edges().as_bytes()).map_err(io_error)?;
        writer.flush().map_err(io_error)?;
        debug!(
            vertices = self.vertex_count(),
            edges = self.edge_count(),
            "wrote graph file"
        );
        Ok(())
    }
}

fn validate_records(path: &Path, vertices: usize, edges: &[Edge]) -> Result<(), GraphError> {
    let unsorted = |index| GraphError::UnsortedRecord {
        path: path.to_path_buf(),
        index,
    };
    let mut previous: Option<(usize, usize)> = None;
    for (index, edge) in edges.iter().enumerate() {
        if !edge.is_canonical() {
            return Err(unsorted(index));
        }
        if edge.second() >= vertices {
            return Err(GraphError::VertexOutOfRange {
                vertex: edge.second(),
                vertex_count: vertices,
            });
        }
        if previous.is_some_and(|position| position >= edge.position()) {
            return Err(unsorted(index));
        }
        previous = Some(edge.position());
    }
    Ok(())
}
