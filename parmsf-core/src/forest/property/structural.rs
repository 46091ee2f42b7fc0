//! Structural checks on merge results.
//!
//! - **Acyclicity**: every committed vertex reaches a root.
//! - **Union coverage**: the result commits exactly the union of the inputs.
//! - **Receiver authority**: vertices the receiver already held keep their
//!   parents.

use proptest::test_runner::{TestCaseError, TestCaseResult};
use rand::{SeedableRng, rngs::SmallRng, seq::SliceRandom};

use crate::PartialForest;

use super::{
    helpers::root_of,
    types::{FoldConfig, MergeFixture},
};

/// Merges the second forest into the first and checks every invariant.
pub(super) fn run_pairwise_merge_property(fixture: &MergeFixture) -> TestCaseResult {
    let [left, right, ..] = fixture.forests.as_slice() else {
        return Err(TestCaseError::fail("fixture needs at least two forests"));
    };
    for (receiver, donor) in [(left, right), (right, left)] {
        let mut merged = receiver.clone();
        merged
            .merge(donor)
            .map_err(|err| TestCaseError::fail(format!("merge failed: {err}")))?;
        validate_acyclic(&merged, fixture)?;
        validate_union(&merged, &[receiver, donor])?;
        validate_receiver_parents(&merged, receiver)?;
    }
    Ok(())
}

/// Folds every forest in shuffled orders and checks acyclicity and coverage.
pub(super) fn run_fold_order_property(fixture: &MergeFixture, seed: u64) -> TestCaseResult {
    let config = FoldConfig::load();
    let mut rng = SmallRng::seed_from_u64(seed);
    let inputs: Vec<&PartialForest> = fixture.forests.iter().collect();
    for _ in 0..config.repetitions {
        let mut order = inputs.clone();
        order.shuffle(&mut rng);
        let mut folded = PartialForest::new(fixture.capacity);
        for forest in &order {
            folded
                .merge(forest)
                .map_err(|err| TestCaseError::fail(format!("merge failed: {err}")))?;
        }
        validate_acyclic(&folded, fixture)?;
        validate_union(&folded, &inputs)?;
        if let Some(first) = order.first() {
            validate_receiver_parents(&folded, first)?;
        }
    }
    Ok(())
}

fn validate_acyclic(merged: &PartialForest, fixture: &MergeFixture) -> TestCaseResult {
    for vertex in merged.vertices() {
        if root_of(merged, vertex).is_none() {
            return Err(TestCaseError::fail(format!(
                "vertex {vertex} does not reach a root (pattern={:?}, capacity={})\n{merged}",
                fixture.pattern, fixture.capacity,
            )));
        }
    }
    Ok(())
}

fn validate_union(merged: &PartialForest, inputs: &[&PartialForest]) -> TestCaseResult {
    for vertex in 0..merged.capacity() {
        let expected = inputs.iter().any(|forest| forest.contains(vertex));
        if merged.contains(vertex) != expected {
            return Err(TestCaseError::fail(format!(
                "vertex {vertex}: committed={} but union membership={expected}",
                merged.contains(vertex),
            )));
        }
    }
    Ok(())
}

fn validate_receiver_parents(merged: &PartialForest, receiver: &PartialForest) -> TestCaseResult {
    for vertex in receiver.vertices() {
        let before = receiver.parent_id(vertex).ok();
        let after = merged.parent_id(vertex).ok();
        if before != after {
            return Err(TestCaseError::fail(format!(
                "vertex {vertex}: receiver parent {before:?} became {after:?}",
            )));
        }
    }
    Ok(())
}
