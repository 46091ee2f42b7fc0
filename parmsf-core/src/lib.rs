//! Parallel minimum spanning forest testbed.
//!
//! Generates large random weighted undirected graphs, persists them in a
//! fixed binary layout that loads through a memory map, and computes their
//! minimum spanning forest either with one Prim runner or with several
//! budgeted runners whose partial forests are merged and stitched.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod builder;
mod driver;
mod error;
mod forest;
mod gap;
mod graph;
#[cfg(feature = "logging")]
#[cfg_attr(docsrs, doc(cfg(feature = "logging")))]
pub mod logging;
mod msf;
mod pairs;
mod prim;
mod sequence;
#[cfg(test)]
mod test_utils;

pub use crate::{
    builder::{ExecutionStrategy, MsfBuilder},
    driver::{compute_msf_parallel, compute_mst, forest_weight, generate_graph},
    error::{
        ForestError, ForestErrorCode, GraphError, GraphErrorCode, MsfError, MsfErrorCode, Result,
        SequenceError, SequenceErrorCode,
    },
    forest::PartialForest,
    gap::GapDistribution,
    graph::{Edge, EdgeBudget, EdgeStorage, GraphBuilder, GraphStore},
    msf::MsfConfig,
    pairs::{RejectionPairs, UniquePairs, pair_count},
    prim::BoundedPrim,
    sequence::MaxLenSequence,
};
