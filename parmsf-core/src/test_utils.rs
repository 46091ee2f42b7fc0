//! Shared test utilities for `parmsf-core`.

use std::env;

use proptest::test_runner::Config as ProptestConfig;

use crate::{GraphStore, PartialForest, driver::union_find::DisjointSet};

/// Environment variable controlling proptest case counts.
pub(crate) const PROGTEST_CASES_ENV_KEY: &str = "PROGTEST_CASES";

/// Builds a standard proptest configuration honouring `PROGTEST_CASES`.
#[must_use]
pub(crate) fn suite_proptest_config(default_cases: u32) -> ProptestConfig {
    ProptestConfig {
        cases: read_env_or_default(PROGTEST_CASES_ENV_KEY, default_cases, parse_cases),
        ..ProptestConfig::default()
    }
}

/// Reads `key` through `parser`, falling back to `default` when the variable
/// is unset or malformed.
pub(crate) fn read_env_or_default<T, F>(key: &'static str, default: T, parser: F) -> T
where
    F: Fn(&str) -> Result<T, String>,
{
    match env::var(key) {
        Ok(raw) => match parser(&raw) {
            Ok(value) => value,
            Err(reason) => {
                tracing::warn!(
                    env = key,
                    raw = %raw,
                    reason = %reason,
                    "invalid test profile override; using default",
                );
                default
            }
        },
        Err(_) => default,
    }
}

fn parse_cases(raw: &str) -> Result<u32, String> {
    let parsed = raw
        .trim()
        .parse::<u32>()
        .map_err(|error| format!("parse error: {error}"))?;
    if parsed == 0 {
        return Err("cases must be > 0".to_owned());
    }
    Ok(parsed)
}

/// Summary of a reference minimum spanning forest.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct OracleForest {
    /// Sum of the chosen edge weights.
    pub total_weight: usize,
    /// Number of chosen edges.
    pub edge_count: usize,
    /// Number of connected components, isolated vertices included.
    pub component_count: usize,
}

/// Sequential Kruskal over the whole edge list.
pub(crate) fn kruskal_oracle(graph: &GraphStore) -> OracleForest {
    let mut edges = graph.edges().to_vec();
    edges.sort_unstable_by(|left, right| left.cmp_by_weight(right));
    let mut sets = DisjointSet::new(graph.vertex_count());
    let mut total_weight = 0;
    let mut edge_count = 0;
    for edge in edges {
        if sets
            .union(edge.first(), edge.second())
            .expect("edge endpoints are graph vertices")
        {
            total_weight += edge.weight();
            edge_count += 1;
        }
    }
    OracleForest {
        total_weight,
        edge_count,
        component_count: graph.vertex_count() - edge_count,
    }
}

/// Checks that `forest` is a spanning forest of `graph`: every vertex is
/// committed, every tree edge exists in the graph, and the trees partition
/// the vertices exactly like the graph's connected components.
pub(crate) fn verify_spanning_forest(
    forest: &PartialForest,
    graph: &GraphStore,
) -> Result<(), String> {
    if !forest.is_complete() {
        return Err(format!(
            "forest commits {} of {} vertices",
            forest.committed_count(),
            forest.capacity()
        ));
    }

    let mut trees = DisjointSet::new(forest.capacity());
    for (child, parent) in forest.edges() {
        if graph.edge_weight(child, parent).is_none() {
            return Err(format!("tree edge ({child}, {parent}) is not in the graph"));
        }
        if !trees.union(child, parent).map_err(|err| err.to_string())? {
            return Err(format!("tree edge ({child}, {parent}) closes a cycle"));
        }
    }

    let mut components = DisjointSet::new(graph.vertex_count());
    for edge in graph.edges() {
        components
            .union(edge.first(), edge.second())
            .map_err(|err| err.to_string())?;
    }
    for edge in graph.edges() {
        let left = trees.find(edge.first()).map_err(|err| err.to_string())?;
        let right = trees.find(edge.second()).map_err(|err| err.to_string())?;
        if left != right {
            return Err(format!(
                "vertices {} and {} share a component but not a tree",
                edge.first(),
                edge.second()
            ));
        }
    }

    let roots = forest.roots().count();
    let mut expected = 0;
    for vertex in 0..graph.vertex_count() {
        if components.find(vertex).map_err(|err| err.to_string())? == vertex {
            expected += 1;
        }
    }
    if roots != expected {
        return Err(format!("forest has {roots} roots for {expected} components"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{OracleForest, kruskal_oracle, parse_cases, verify_spanning_forest};
    use crate::{GraphStore, PartialForest};

    #[rstest]
    #[case::triangle(3, vec![(0, 1, 1), (1, 2, 2), (0, 2, 3)], 3, 2, 1)]
    #[case::square(4, vec![(0, 1, 1), (1, 2, 2), (2, 3, 3), (0, 3, 4)], 6, 3, 1)]
    #[case::disconnected(5, vec![(0, 1, 1), (2, 3, 2)], 3, 2, 3)]
    #[case::single_vertex(1, vec![], 0, 0, 1)]
    #[case::empty(0, vec![], 0, 0, 0)]
    fn oracle_summarises_the_minimum_forest(
        #[case] vertices: usize,
        #[case] edges: Vec<(usize, usize, usize)>,
        #[case] total_weight: usize,
        #[case] edge_count: usize,
        #[case] component_count: usize,
    ) {
        let graph = GraphStore::from_edges(vertices, edges, false).expect("valid graph");
        assert_eq!(
            kruskal_oracle(&graph),
            OracleForest {
                total_weight,
                edge_count,
                component_count,
            }
        );
    }

    #[test]
    fn verifier_rejects_forests_that_split_a_component() {
        let graph = GraphStore::from_edges(3, [(0, 1, 1), (1, 2, 1)], false).expect("valid graph");
        let mut forest = PartialForest::new(3);
        forest
            .add(0, 0)
            .and_then(|forest| forest.add(1, 0))
            .and_then(|forest| forest.add(2, 2))
            .expect("links are in range");
        assert!(verify_spanning_forest(&forest, &graph).is_err());
    }

    #[rstest]
    #[case("12", Ok(12))]
    #[case(" 7 ", Ok(7))]
    #[case("0", Err(()))]
    #[case("many", Err(()))]
    fn parse_cases_accepts_positive_counts(#[case] raw: &str, #[case] expected: Result<u32, ()>) {
        assert_eq!(parse_cases(raw).map_err(drop), expected);
    }
}
