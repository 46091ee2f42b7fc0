//! Helpers shared by the integration tests.

use parmsf_core::{EdgeBudget, GraphBuilder, GraphStore, PartialForest};

/// Builds a seeded random graph with its adjacency index.
pub fn random_graph(vertices: usize, probability: f64, seed: u64) -> GraphStore {
    GraphBuilder::new(vertices, EdgeBudget::Probability(probability))
        .with_seed(seed)
        .with_adjacency(true)
        .build()
        .expect("valid generator configuration")
}

/// Weight of a minimum spanning forest computed by sequential Kruskal.
pub fn kruskal_weight(graph: &GraphStore) -> usize {
    let mut edges = graph.edges().to_vec();
    edges.sort_unstable_by_key(|edge| (edge.weight(), edge.first(), edge.second()));
    let mut parent: Vec<usize> = (0..graph.vertex_count()).collect();
    let mut total = 0;
    for edge in edges {
        let left = find(&mut parent, edge.first());
        let right = find(&mut parent, edge.second());
        if left != right {
            parent[left] = right;
            total += edge.weight();
        }
    }
    total
}

fn find(parent: &mut [usize], mut vertex: usize) -> usize {
    while parent[vertex] != vertex {
        parent[vertex] = parent[parent[vertex]];
        vertex = parent[vertex];
    }
    vertex
}

/// Number of connected components, isolated vertices included.
pub fn component_count(graph: &GraphStore) -> usize {
    let mut parent: Vec<usize> = (0..graph.vertex_count()).collect();
    let mut components = graph.vertex_count();
    for edge in graph.edges() {
        let left = find(&mut parent, edge.first());
        let right = find(&mut parent, edge.second());
        if left != right {
            parent[left] = right;
            components -= 1;
        }
    }
    components
}

/// Sum of the graph weights along every tree edge of `forest`.
pub fn tree_weight(forest: &PartialForest, graph: &GraphStore) -> usize {
    forest
        .edges()
        .map(|(child, parent)| {
            graph
                .edge_weight(child, parent)
                .expect("tree edge must exist in the graph")
        })
        .sum()
}
