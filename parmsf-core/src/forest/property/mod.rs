//! Property-based tests for partial forest merging.
//!
//! Generates pairs of valid forests with controlled overlap and checks that
//! every merge result is acyclic, commits the union of both inputs, and
//! keeps the receiving forest's parents. A fold property merges several
//! forests in random orders and checks the same invariants on the result.

mod helpers;
mod strategies;
mod structural;
mod types;
