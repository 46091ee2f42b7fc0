//! Error types for the parmsf core library.
//!
//! Each component reports its own error enum; [`MsfError`] wraps them for the
//! driver entry points. Every enum carries a stable machine-readable code so
//! callers can log and match failures without parsing display strings.

use std::{fmt, io, path::PathBuf};

use thiserror::Error;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? $( ( $($tuple:tt)* ) )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? $( ( $($tuple)* ) )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// An error produced while configuring a [`crate::MaxLenSequence`].
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum SequenceError {
    /// The sequence must cover at least one value.
    #[error("sequence range must be at least 1")]
    EmptyRange,
    /// The range needs a register wider than the tap table supports.
    #[error("sequence range {range} exceeds the widest supported shift register")]
    RangeTooLarge {
        /// The requested range.
        range: u64,
    },
}

define_error_codes! {
    /// Stable codes describing [`SequenceError`] variants.
    enum SequenceErrorCode for SequenceError {
        /// The sequence must cover at least one value.
        EmptyRange => EmptyRange => "SEQUENCE_EMPTY_RANGE",
        /// The range needs a register wider than the tap table supports.
        RangeTooLarge => RangeTooLarge { .. } => "SEQUENCE_RANGE_TOO_LARGE",
    }
}

/// An error produced while generating, building, loading, or writing a
/// [`crate::GraphStore`].
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum GraphError {
    /// Pair generation needs at least two vertices.
    #[error("a graph needs at least 2 vertices to draw edges (got {vertices})")]
    TooFewVertices {
        /// The vertex count supplied by the caller.
        vertices: usize,
    },
    /// `V * (V - 1)` does not fit in a machine word.
    #[error("pair space for {vertices} vertices overflows a machine word")]
    PairSpaceOverflow {
        /// The vertex count supplied by the caller.
        vertices: usize,
    },
    /// More edges were requested than distinct pairs exist.
    #[error("requested {requested} edges but only {available} distinct pairs exist")]
    TooManyEdges {
        /// Edge count requested by the caller.
        requested: usize,
        /// Number of distinct unordered pairs, `V * (V - 1) / 2`.
        available: usize,
    },
    /// Edge probability must lie in `[0, 1]`.
    #[error("edge probability {probability} is outside [0, 1]")]
    InvalidProbability {
        /// The rejected probability.
        probability: f64,
    },
    /// The pair iterator ended before the requested edge count was reached.
    #[error("expected {expected} edges but the pair source produced {produced}")]
    MissingEdges {
        /// Requested edge count.
        expected: usize,
        /// Edges actually produced.
        produced: usize,
    },
    /// The weight iterator ended before every edge had a weight.
    #[error("expected {expected} weights but the weight source produced {produced}")]
    MissingWeights {
        /// Requested edge count.
        expected: usize,
        /// Weights actually produced.
        produced: usize,
    },
    /// An edge connected a vertex to itself.
    #[error("edge ({vertex}, {vertex}) is a self-loop")]
    SelfLoop {
        /// The offending vertex.
        vertex: usize,
    },
    /// A vertex index was outside `[0, V)`.
    #[error("vertex {vertex} is out of range for a graph with {vertex_count} vertices")]
    VertexOutOfRange {
        /// The offending vertex.
        vertex: usize,
        /// Number of vertices in the graph.
        vertex_count: usize,
    },
    /// The same unordered pair appeared twice.
    #[error("edge ({first}, {second}) appears more than once")]
    DuplicateEdge {
        /// Smaller endpoint.
        first: usize,
        /// Larger endpoint.
        second: usize,
    },
    /// The vertex count leaves no room for the adjacency offsets.
    #[error("vertex count {vertices} is too large to index")]
    VertexCountTooLarge {
        /// The vertex count supplied by the caller or read from a file.
        vertices: usize,
    },
    /// Neighbour enumeration needs the adjacency index.
    #[error("adjacency index was not built for this graph")]
    AdjacencyNotBuilt,
    /// Opening, inspecting, or writing a graph file failed.
    #[error("i/o on graph file `{}` failed: {source}", path.display())]
    Io {
        /// File being accessed.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The path does not name a regular file.
    #[error("graph file `{}` is not a regular file", path.display())]
    NotRegularFile {
        /// The rejected path.
        path: PathBuf,
    },
    /// Memory-mapping the file failed.
    #[error("failed to map graph file `{}`: {source}", path.display())]
    Map {
        /// File being mapped.
        path: PathBuf,
        /// Underlying mapping failure.
        #[source]
        source: io::Error,
    },
    /// The file length disagrees with its header.
    #[error("graph file `{}` has {actual} bytes but its header implies {expected}", path.display())]
    Truncated {
        /// File being loaded.
        path: PathBuf,
        /// Byte length implied by the header.
        expected: u64,
        /// Byte length on disk.
        actual: u64,
    },
    /// A record was not canonical or not in `(first, second)` order.
    #[error("graph file `{}` record {index} is not canonical and sorted", path.display())]
    UnsortedRecord {
        /// File being loaded.
        path: PathBuf,
        /// Index of the first offending record.
        index: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`GraphError`] variants.
    enum GraphErrorCode for GraphError {
        /// Pair generation needs at least two vertices.
        TooFewVertices => TooFewVertices { .. } => "GRAPH_TOO_FEW_VERTICES",
        /// `V * (V - 1)` does not fit in a machine word.
        PairSpaceOverflow => PairSpaceOverflow { .. } => "GRAPH_PAIR_SPACE_OVERFLOW",
        /// More edges were requested than distinct pairs exist.
        TooManyEdges => TooManyEdges { .. } => "GRAPH_TOO_MANY_EDGES",
        /// Edge probability must lie in `[0, 1]`.
        InvalidProbability => InvalidProbability { .. } => "GRAPH_INVALID_PROBABILITY",
        /// The pair iterator ended early.
        MissingEdges => MissingEdges { .. } => "GRAPH_MISSING_EDGES",
        /// The weight iterator ended early.
        MissingWeights => MissingWeights { .. } => "GRAPH_MISSING_WEIGHTS",
        /// An edge connected a vertex to itself.
        SelfLoop => SelfLoop { .. } => "GRAPH_SELF_LOOP",
        /// A vertex index was outside `[0, V)`.
        VertexOutOfRange => VertexOutOfRange { .. } => "GRAPH_VERTEX_OUT_OF_RANGE",
        /// The same unordered pair appeared twice.
        DuplicateEdge => DuplicateEdge { .. } => "GRAPH_DUPLICATE_EDGE",
        /// The vertex count leaves no room for the adjacency offsets.
        VertexCountTooLarge => VertexCountTooLarge { .. } => "GRAPH_VERTEX_COUNT_TOO_LARGE",
        /// Neighbour enumeration needs the adjacency index.
        AdjacencyNotBuilt => AdjacencyNotBuilt => "GRAPH_ADJACENCY_NOT_BUILT",
        /// Opening, inspecting, or writing a graph file failed.
        Io => Io { .. } => "GRAPH_IO",
        /// The path does not name a regular file.
        NotRegularFile => NotRegularFile { .. } => "GRAPH_NOT_REGULAR_FILE",
        /// Memory-mapping the file failed.
        Map => Map { .. } => "GRAPH_MAP_FAILED",
        /// The file length disagrees with its header.
        Truncated => Truncated { .. } => "GRAPH_TRUNCATED",
        /// A record was not canonical or not sorted.
        UnsortedRecord => UnsortedRecord { .. } => "GRAPH_UNSORTED_RECORD",
    }
}

impl GraphError {
    /// Returns `true` for failures caused by the filesystem rather than by
    /// caller configuration or file contents.
    #[must_use]
    pub const fn is_io(&self) -> bool {
        matches!(
            self,
            Self::Io { .. } | Self::NotRegularFile { .. } | Self::Map { .. }
        )
    }
}

/// An error produced by [`crate::PartialForest`] operations.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum ForestError {
    /// A vertex index was outside the forest's capacity.
    #[error("vertex {vertex} is out of range for a forest of capacity {capacity}")]
    VertexOutOfRange {
        /// The offending vertex.
        vertex: usize,
        /// Capacity of the forest.
        capacity: usize,
    },
    /// The vertex is already committed and its parent is final.
    #[error("vertex {vertex} is already committed")]
    AlreadyCommitted {
        /// The offending vertex.
        vertex: usize,
    },
    /// `commit` was called on a vertex that was never staged.
    #[error("vertex {vertex} must be staged before it is committed")]
    NotStaged {
        /// The offending vertex.
        vertex: usize,
    },
    /// A parent query targeted a vertex that is not in the forest.
    #[error("vertex {vertex} is not committed to the forest")]
    NotCommitted {
        /// The offending vertex.
        vertex: usize,
    },
    /// Two forests with different capacities were merged.
    #[error("cannot merge forests with capacities {left} and {right}")]
    CapacityMismatch {
        /// Capacity of the receiving forest.
        left: usize,
        /// Capacity of the merged-in forest.
        right: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`ForestError`] variants.
    enum ForestErrorCode for ForestError {
        /// A vertex index was outside the forest's capacity.
        VertexOutOfRange => VertexOutOfRange { .. } => "FOREST_VERTEX_OUT_OF_RANGE",
        /// The vertex is already committed.
        AlreadyCommitted => AlreadyCommitted { .. } => "FOREST_ALREADY_COMMITTED",
        /// `commit` was called on a vertex that was never staged.
        NotStaged => NotStaged { .. } => "FOREST_NOT_STAGED",
        /// A parent query targeted a vertex that is not in the forest.
        NotCommitted => NotCommitted { .. } => "FOREST_NOT_COMMITTED",
        /// Two forests with different capacities were merged.
        CapacityMismatch => CapacityMismatch { .. } => "FOREST_CAPACITY_MISMATCH",
    }
}

/// Error type produced by the spanning-forest entry points.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum MsfError {
    /// Building, loading, or querying the graph failed.
    #[error(transparent)]
    Graph(#[from] GraphError),
    /// A forest operation was rejected.
    #[error(transparent)]
    Forest(#[from] ForestError),
    /// Worker count must be at least one.
    #[error("thread count must be at least 1 (got {got})")]
    InvalidThreadCount {
        /// The rejected thread count.
        got: usize,
    },
    /// The worker pool could not be created.
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[source] rayon::ThreadPoolBuildError),
    /// An internal invariant was violated, indicating a logic error.
    #[error("spanning forest invariant violated: {invariant} (vertex {vertex})")]
    InvariantViolation {
        /// Name of the violated invariant to assist debugging.
        invariant: &'static str,
        /// Vertex at which the violation was detected.
        vertex: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`MsfError`] variants.
    enum MsfErrorCode for MsfError {
        /// Building, loading, or querying the graph failed.
        GraphFailure => Graph(..) => "MSF_GRAPH_FAILURE",
        /// A forest operation was rejected.
        ForestFailure => Forest(..) => "MSF_FOREST_FAILURE",
        /// Worker count must be at least one.
        InvalidThreadCount => InvalidThreadCount { .. } => "MSF_INVALID_THREAD_COUNT",
        /// The worker pool could not be created.
        ThreadPool => ThreadPool(..) => "MSF_THREAD_POOL",
        /// An internal invariant was violated.
        InvariantViolation => InvariantViolation { .. } => "MSF_INVARIANT_VIOLATION",
    }
}

impl MsfError {
    /// Retrieve the inner [`GraphErrorCode`] when the error originated in the graph store.
    #[must_use]
    pub const fn graph_code(&self) -> Option<GraphErrorCode> {
        match self {
            Self::Graph(error) => Some(error.code()),
            _ => None,
        }
    }

    /// Retrieve the inner [`ForestErrorCode`] when the error originated in a forest.
    #[must_use]
    pub const fn forest_code(&self) -> Option<ForestErrorCode> {
        match self {
            Self::Forest(error) => Some(error.code()),
            _ => None,
        }
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, MsfError>;
