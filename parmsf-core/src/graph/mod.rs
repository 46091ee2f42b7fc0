//! Immutable weighted undirected graphs.
//!
//! A [`GraphStore`] holds the canonical edge list (`first < second`, sorted
//! by `(first, second)`) either in an owned vector or in a read-only memory
//! map of a graph file. An optional adjacency index lists both directed
//! orientations of every edge grouped by source vertex so the Prim runner can
//! enumerate neighbours without searching.

mod adjacency;
mod builder;
mod io;

use std::cmp::Ordering;

use memmap2::Mmap;
use zerocopy::{AsBytes, FromBytes, FromZeroes};

use crate::error::GraphError;

use self::adjacency::Adjacency;

pub use self::builder::{EdgeBudget, GraphBuilder};

/// A weighted edge between two vertices.
///
/// The layout is three machine words, which is also the on-disk record
/// format of graph files.
#[repr(C)]
#[derive(AsBytes, Clone, Copy, Debug, Default, Eq, FromBytes, FromZeroes, Hash, PartialEq)]
pub struct Edge {
    first: usize,
    second: usize,
    weight: usize,
}

impl Edge {
    /// Creates an edge exactly as given, without canonicalising.
    #[must_use]
    pub const fn new(first: usize, second: usize, weight: usize) -> Self {
        Self {
            first,
            second,
            weight,
        }
    }

    /// Returns the first endpoint; the smaller one for canonical edges.
    #[must_use]
    #[rustfmt::skip]
    pub const fn first(&self) -> usize { self.first }

    /// Returns the second endpoint; the larger one for canonical edges.
    #[must_use]
    #[rustfmt::skip]
    pub const fn second(&self) -> usize { self.second }

    /// Returns the edge weight.
    #[must_use]
    #[rustfmt::skip]
    pub const fn weight(&self) -> usize { self.weight }

    /// Returns `true` when `first < second`.
    #[must_use]
    pub const fn is_canonical(&self) -> bool {
        self.first < self.second
    }

    /// Returns the edge with its endpoints ordered `first <= second`.
    #[must_use]
    pub const fn canonical(self) -> Self {
        if self.first <= self.second {
            self
        } else {
            self.reversed()
        }
    }

    /// Returns the edge with its endpoints swapped.
    #[must_use]
    pub const fn reversed(self) -> Self {
        Self::new(self.second, self.first, self.weight)
    }

    /// Key ordering canonical records inside a graph.
    pub(crate) const fn position(&self) -> (usize, usize) {
        (self.first, self.second)
    }

    /// Strict total order used wherever ties must break deterministically.
    pub(crate) fn cmp_by_weight(&self, other: &Self) -> Ordering {
        self.weight
            .cmp(&other.weight)
            .then_with(|| self.position().cmp(&other.position()))
    }
}

/// Backing memory of a graph's canonical edge array.
#[derive(Debug)]
pub enum EdgeStorage {
    /// Edges built in memory.
    Owned(Vec<Edge>),
    /// Read-only mapping of a graph file, header included.
    Mapped(Mmap),
}

impl EdgeStorage {
    /// Returns the edge records regardless of backing.
    #[must_use]
    pub fn as_slice(&self) -> &[Edge] {
        match self {
            Self::Owned(edges) => edges,
            // Alignment and length were validated when the file was loaded.
            Self::Mapped(map) => io::records(map).unwrap_or_default(),
        }
    }
}

/// Immutable graph with a sorted canonical edge list and an optional
/// adjacency index.
///
/// # Examples
/// ```
/// use parmsf_core::GraphStore;
///
/// let graph = GraphStore::from_edges(3, [(0, 1, 4), (2, 1, 7)], true)
///     .expect("edges are valid");
/// assert_eq!(graph.edge_count(), 2);
/// assert_eq!(graph.edge_weight(2, 1), Some(7));
/// assert_eq!(graph.neighbors(1).expect("index built").len(), 2);
/// ```
#[derive(Debug)]
pub struct GraphStore {
    vertices: usize,
    storage: EdgeStorage,
    adjacency: Option<Adjacency>,
}

impl GraphStore {
    /// Builds a graph from a pair source and a weight source.
    ///
    /// Consumes up to `edge_count` pairs, zipping each with the next weight.
    /// Pairs may arrive in either orientation and any order; they are
    /// canonicalised and sorted. The adjacency index is built when
    /// `adjacency` is `true`.
    ///
    /// # Errors
    /// Returns [`GraphError::MissingEdges`] or [`GraphError::MissingWeights`]
    /// when a source ends early, [`GraphError::SelfLoop`] and
    /// [`GraphError::VertexOutOfRange`] for malformed pairs,
    /// [`GraphError::DuplicateEdge`] when a pair repeats, and
    /// [`GraphError::VertexCountTooLarge`] when the requested index cannot be
    /// allocated.
    pub fn from_iters<P, W>(
        vertices: usize,
        edge_count: usize,
        pairs: P,
        weights: W,
        adjacency: bool,
    ) -> Result<Self, GraphError>
    where
        P: IntoIterator<Item = (usize, usize)>,
        W: IntoIterator<Item = usize>,
    {
        let mut weights = weights.into_iter();
        let mut edges = Vec::with_capacity(edge_count);
        for (first, second) in pairs.into_iter().take(edge_count) {
            let weight = weights.next().ok_or(GraphError::MissingWeights {
                expected: edge_count,
                produced: edges.len(),
            })?;
            edges.push(validate_pair(vertices, first, second, weight)?);
        }
        if edges.len() < edge_count {
            return Err(GraphError::MissingEdges {
                expected: edge_count,
                produced: edges.len(),
            });
        }

        edges.sort_unstable_by_key(Edge::position);
        let repeated = edges.windows(2).find_map(|pair| match pair {
            [left, right] if left.position() == right.position() => Some(*left),
            _ => None,
        });
        if let Some(edge) = repeated {
            return Err(GraphError::DuplicateEdge {
                first: edge.first,
                second: edge.second,
            });
        }

        let store = Self {
            vertices,
            storage: EdgeStorage::Owned(edges),
            adjacency: None,
        };
        if adjacency {
            store.with_adjacency()
        } else {
            Ok(store)
        }
    }

    /// Builds a graph from `(first, second, weight)` triples.
    ///
    /// # Errors
    /// Same as [`GraphStore::from_iters`].
    pub fn from_edges(
        vertices: usize,
        edges: impl IntoIterator<Item = (usize, usize, usize)>,
        adjacency: bool,
    ) -> Result<Self, GraphError> {
        let (pairs, weights): (Vec<_>, Vec<_>) = edges
            .into_iter()
            .map(|(first, second, weight)| ((first, second), weight))
            .unzip();
        Self::from_iters(vertices, pairs.len(), pairs, weights, adjacency)
    }

    /// Returns the number of vertices.
    #[must_use]
    #[rustfmt::skip]
    pub fn vertex_count(&self) -> usize { self.vertices }

    /// Returns the number of undirected edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges().len()
    }

    /// Returns the canonical edges sorted by `(first, second)`.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        self.storage.as_slice()
    }

    /// Returns the backing storage of the edge array.
    #[must_use]
    #[rustfmt::skip]
    pub fn storage(&self) -> &EdgeStorage { &self.storage }

    /// Returns `true` when the edges live in a file mapping.
    #[must_use]
    pub fn is_mapped(&self) -> bool {
        matches!(self.storage, EdgeStorage::Mapped(_))
    }

    /// Returns `true` when the adjacency index has been built.
    #[must_use]
    pub fn has_adjacency(&self) -> bool {
        self.adjacency.is_some()
    }

    /// Builds the adjacency index if it is missing.
    ///
    /// # Errors
    /// Returns [`GraphError::VertexCountTooLarge`] when the offsets array for
    /// `vertex_count() + 1` slots cannot be allocated.
    pub fn with_adjacency(mut self) -> Result<Self, GraphError> {
        if self.adjacency.is_none() {
            self.adjacency = Some(Adjacency::build(self.vertices, self.storage.as_slice())?);
        }
        Ok(self)
    }

    /// Returns the directed half-edges leaving `vertex`.
    ///
    /// Every returned edge has `first() == vertex`.
    ///
    /// # Errors
    /// Returns [`GraphError::AdjacencyNotBuilt`] when the index is missing and
    /// [`GraphError::VertexOutOfRange`] when `vertex >= vertex_count()`.
    pub fn neighbors(&self, vertex: usize) -> Result<&[Edge], GraphError> {
        let adjacency = self.adjacency.as_ref().ok_or(GraphError::AdjacencyNotBuilt)?;
        adjacency
            .neighbors(vertex)
            .ok_or(GraphError::VertexOutOfRange {
                vertex,
                vertex_count: self.vertices,
            })
    }

    /// Looks up the weight of the edge between `u` and `v` in either order.
    #[must_use]
    pub fn edge_weight(&self, u: usize, v: usize) -> Option<usize> {
        let key = (u.min(v), u.max(v));
        let edges = self.edges();
        edges
            .binary_search_by_key(&key, Edge::position)
            .ok()
            .and_then(|index| edges.get(index))
            .map(Edge::weight)
    }
}

fn validate_pair(
    vertices: usize,
    first: usize,
    second: usize,
    weight: usize,
) -> Result<Edge, GraphError> {
    if first == second {
        return Err(GraphError::SelfLoop { vertex: first });
    }
    let largest = first.max(second);
    if largest >= vertices {
        return Err(GraphError::VertexOutOfRange {
            vertex: largest,
            vertex_count: vertices,
        });
    }
    Ok(Edge::new(first, second, weight).canonical())
}
