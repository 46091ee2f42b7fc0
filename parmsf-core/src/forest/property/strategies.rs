//! Strategy builders for merge property tests.
//!
//! Forests are grown by visiting their vertex set in random order and
//! hanging each vertex from one visited earlier, or making it a new root.
//! Parents therefore always precede children, which keeps every generated
//! forest acyclic by construction.

use proptest::prelude::*;
use rand::{Rng, SeedableRng, rngs::SmallRng, seq::SliceRandom};

use crate::PartialForest;

use super::types::{MergeFixture, OverlapPattern};

const MIN_CAPACITY: usize = 1;
const MAX_CAPACITY: usize = 48;
const MAX_FORESTS: usize = 5;

/// Generates merge fixtures across every overlap pattern.
pub(super) fn merge_fixture_strategy() -> impl Strategy<Value = MergeFixture> {
    (
        prop_oneof![
            Just(OverlapPattern::Disjoint),
            Just(OverlapPattern::Partial),
            Just(OverlapPattern::Complete),
        ],
        any::<u64>(),
    )
        .prop_map(|(pattern, seed)| generate_fixture(pattern, &mut SmallRng::seed_from_u64(seed)))
}

/// Generates a fixture for a specific overlap pattern.
pub(super) fn generate_fixture(pattern: OverlapPattern, rng: &mut SmallRng) -> MergeFixture {
    let capacity = rng.gen_range(MIN_CAPACITY..=MAX_CAPACITY);
    let count = rng.gen_range(2..=MAX_FORESTS);
    let members = match pattern {
        OverlapPattern::Disjoint => disjoint_members(capacity, count, rng),
        OverlapPattern::Partial => (0..count)
            .map(|_| {
                let density = rng.gen_range(0.1..=0.9);
                (0..capacity).filter(|_| rng.gen_bool(density)).collect()
            })
            .collect(),
        OverlapPattern::Complete => (0..count).map(|_| (0..capacity).collect()).collect(),
    };
    let forests = members
        .into_iter()
        .map(|vertices| grow_forest(capacity, vertices, rng))
        .collect();
    MergeFixture {
        capacity,
        forests,
        pattern,
    }
}

/// Deals every vertex to at most one of `count` forests.
fn disjoint_members(capacity: usize, count: usize, rng: &mut SmallRng) -> Vec<Vec<usize>> {
    let mut members = vec![Vec::new(); count];
    for vertex in 0..capacity {
        let slot = rng.gen_range(0..=count);
        if let Some(bucket) = members.get_mut(slot) {
            bucket.push(vertex);
        }
    }
    members
}

/// Builds a valid forest committing exactly `vertices`.
pub(super) fn grow_forest(
    capacity: usize,
    mut vertices: Vec<usize>,
    rng: &mut SmallRng,
) -> PartialForest {
    vertices.shuffle(rng);
    let root_probability = rng.gen_range(0.05..=0.4);
    let mut forest = PartialForest::new(capacity);
    for (position, &vertex) in vertices.iter().enumerate() {
        let parent = if position == 0 || rng.gen_bool(root_probability) {
            vertex
        } else {
            vertices[rng.gen_range(0..position)]
        };
        forest
            .add(vertex, parent)
            .expect("generated vertices are distinct and in range");
    }
    forest
}
