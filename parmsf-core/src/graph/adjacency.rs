//! CSR-style neighbour index over a canonical edge list.

use rayon::slice::ParallelSliceMut;

use super::Edge;
use crate::error::GraphError;

/// Half-edges grouped by source vertex.
///
/// `half_edges[offsets[v]..offsets[v + 1]]` holds every edge incident to `v`,
/// oriented so that `first == v` and ordered by the other endpoint.
#[derive(Debug)]
pub(super) struct Adjacency {
    offsets: Vec<usize>,
    half_edges: Vec<Edge>,
}

impl Adjacency {
    /// Indexes `edges` over `vertices` vertices.
    ///
    /// The offsets array is reserved fallibly, so a vertex count read from an
    /// untrusted header surfaces as an error instead of an allocation abort.
    pub(super) fn build(vertices: usize, edges: &[Edge]) -> Result<Self, GraphError> {
        let too_large = || GraphError::VertexCountTooLarge { vertices };
        let slots = vertices.checked_add(1).ok_or_else(too_large)?;
        let mut offsets = Vec::new();
        offsets.try_reserve_exact(slots).map_err(|_| too_large())?;
        offsets.resize(slots, 0_usize);

        for endpoint in edges.iter().flat_map(|edge| [edge.first(), edge.second()]) {
            let degree = endpoint
                .checked_add(1)
                .and_then(|slot| offsets.get_mut(slot))
                .ok_or(GraphError::VertexOutOfRange {
                    vertex: endpoint,
                    vertex_count: vertices,
                })?;
            *degree += 1;
        }
        let mut running = 0;
        for offset in &mut offsets {
            running += *offset;
            *offset = running;
        }

        let mut half_edges: Vec<Edge> = edges
            .iter()
            .flat_map(|edge| [*edge, edge.reversed()])
            .collect();
        half_edges.par_sort_unstable_by_key(Edge::position);

        Ok(Self {
            offsets,
            half_edges,
        })
    }

    pub(super) fn neighbors(&self, vertex: usize) -> Option<&[Edge]> {
        let start = *self.offsets.get(vertex)?;
        let end = *self.offsets.get(vertex.checked_add(1)?)?;
        self.half_edges.get(start..end)
    }
}
