//! Sequential and parallel minimum spanning forest drivers.
//!
//! The parallel driver splits the vertex range into one contiguous slice per
//! worker. Each worker runs a [`BoundedPrim`] on a private forest with a
//! budget of one slice, starting its trees inside its own slice. The
//! per-worker forests are folded together by merge in ascending worker
//! order and then stitched: the merged fragments seed a union-find, the
//! graph edges that cross between fragments are filtered and sorted in
//! parallel, and a Kruskal pass over those bridges joins the fragments. The
//! merged parents survive except along the paths a bridge re-roots.

pub(crate) mod union_find;

use std::{collections::VecDeque, mem, path::Path};

use fixedbitset::FixedBitSet;
use rayon::{ThreadPoolBuilder, prelude::*};
use tracing::{debug, info, instrument};

use crate::{
    BoundedPrim, Edge, GraphBuilder, GraphStore, PartialForest, Result, error::MsfError,
};

use self::union_find::DisjointSet;

/// Computes a minimum spanning forest with a single unbounded runner.
///
/// The graph must carry its adjacency index.
///
/// # Errors
/// Returns [`MsfError::Graph`] when the adjacency index is missing.
///
/// # Examples
/// ```
/// use parmsf_core::{GraphStore, compute_mst, forest_weight};
///
/// let graph = GraphStore::from_edges(4, [(0, 1, 3), (1, 2, 1), (0, 2, 2), (2, 3, 7)], true)?;
/// let forest = compute_mst(&graph)?;
/// assert_eq!(forest_weight(&forest, &graph)?, 10);
/// # Ok::<(), parmsf_core::MsfError>(())
/// ```
#[instrument(
    name = "msf.sequential",
    err,
    skip(graph),
    fields(vertices = graph.vertex_count(), edges = graph.edge_count()),
)]
pub fn compute_mst(graph: &GraphStore) -> Result<PartialForest> {
    let mut forest = PartialForest::new(graph.vertex_count());
    BoundedPrim::new(graph)?.run(&mut forest, usize::MAX, 0)?;
    if let Some(vertex) = forest.next_free_vertex(0) {
        return Err(MsfError::InvariantViolation {
            invariant: "unbounded run commits every vertex",
            vertex,
        });
    }
    info!(trees = forest.roots().count(), "sequential spanning forest complete");
    Ok(forest)
}

/// Computes a minimum spanning forest with `threads` concurrent runners.
///
/// The result commits every vertex, has one root per connected component,
/// each at the component's smallest vertex, and has the same weight as
/// [`compute_mst`].
///
/// # Errors
/// Returns [`MsfError::InvalidThreadCount`] when `threads == 0`,
/// [`MsfError::ThreadPool`] when the pool cannot be built, and
/// [`MsfError::Graph`] when the adjacency index is missing.
///
/// # Examples
/// ```
/// use parmsf_core::{EdgeBudget, GraphBuilder, compute_mst, compute_msf_parallel, forest_weight};
///
/// let graph = GraphBuilder::new(200, EdgeBudget::Probability(0.05))
///     .with_seed(1)
///     .with_adjacency(true)
///     .build()?;
/// let parallel = compute_msf_parallel(&graph, 4)?;
/// let sequential = compute_mst(&graph)?;
/// assert!(parallel.is_complete());
/// assert_eq!(forest_weight(&parallel, &graph)?, forest_weight(&sequential, &graph)?);
/// # Ok::<(), parmsf_core::MsfError>(())
/// ```
#[instrument(
    name = "msf.parallel",
    err,
    skip(graph),
    fields(vertices = graph.vertex_count(), edges = graph.edge_count()),
)]
pub fn compute_msf_parallel(graph: &GraphStore, threads: usize) -> Result<PartialForest> {
    if threads == 0 {
        return Err(MsfError::InvalidThreadCount { got: threads });
    }
    let vertices = graph.vertex_count();
    let chunk = vertices.div_ceil(threads);
    let pool = ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(MsfError::ThreadPool)?;

    let stitched = pool.install(|| {
        let forests = (0..threads)
            .into_par_iter()
            .map(|worker| run_worker(graph, worker, chunk))
            .collect::<Result<Vec<_>>>()?;
        let merged = fold_forests(vertices, &forests)?;
        debug!(committed = merged.committed_count(), "merged worker forests");
        stitch(graph, &merged)
    })?;
    info!(
        trees = stitched.roots().count(),
        "parallel spanning forest complete"
    );
    Ok(stitched)
}

fn run_worker(graph: &GraphStore, worker: usize, chunk: usize) -> Result<PartialForest> {
    let offset = worker.saturating_mul(chunk).min(graph.vertex_count());
    let mut forest = PartialForest::new(graph.vertex_count());
    let committed = BoundedPrim::new(graph)?.run(&mut forest, chunk, offset)?;
    debug!(worker, offset, committed, "worker finished");
    Ok(forest)
}

/// Merges `forests` into an empty forest in order.
fn fold_forests(vertices: usize, forests: &[PartialForest]) -> Result<PartialForest> {
    let mut merged = PartialForest::new(vertices);
    for forest in forests {
        merged.merge(forest)?;
    }
    Ok(merged)
}

/// Completes `merged` into the minimum spanning forest of `graph`.
///
/// Every edge of `merged` must be a tree edge of the minimum spanning
/// forest under the `(weight, first, second)` order, which holds for forests
/// grown by [`BoundedPrim`] and merged together. Each component is rooted at
/// its smallest vertex.
fn stitch(graph: &GraphStore, merged: &PartialForest) -> Result<PartialForest> {
    let vertices = graph.vertex_count();
    let mut sets = DisjointSet::new(vertices);
    let mut parents: Vec<usize> = (0..vertices)
        .map(|vertex| merged.parent_id(vertex).unwrap_or(vertex))
        .collect();
    for (child, parent) in merged.edges() {
        if !sets.union(child, parent)? {
            return Err(MsfError::InvariantViolation {
                invariant: "merged forest is acyclic",
                vertex: child,
            });
        }
    }

    let fragments = (0..vertices)
        .map(|vertex| sets.find(vertex))
        .collect::<Result<Vec<_>>>()?;
    let mut bridges: Vec<Edge> = graph
        .edges()
        .par_iter()
        .filter(|edge| fragments.get(edge.first()) != fragments.get(edge.second()))
        .copied()
        .collect();
    bridges.par_sort_unstable_by(Edge::cmp_by_weight);

    let mut crossings: Vec<Vec<(usize, usize)>> = vec![Vec::new(); vertices];
    let mut joined = 0_usize;
    for edge in &bridges {
        if !sets.union(edge.first(), edge.second())? {
            continue;
        }
        joined += 1;
        for (inside, outside) in [(edge.first(), edge.second()), (edge.second(), edge.first())] {
            let fragment = fragment_of(&fragments, inside)?;
            crossings
                .get_mut(fragment)
                .ok_or(unknown_vertex(fragment))?
                .push((inside, outside));
        }
    }
    debug!(candidates = bridges.len(), joined, "stitched fragments");

    orient(&fragments, &crossings, &mut parents)?;
    let mut forest = PartialForest::new(vertices);
    for (vertex, parent) in parents.into_iter().enumerate() {
        forest.add(vertex, parent)?;
    }
    Ok(forest)
}

const fn unknown_vertex(vertex: usize) -> MsfError {
    MsfError::InvariantViolation {
        invariant: "stitched vertex must be within the graph",
        vertex,
    }
}

fn fragment_of(fragments: &[usize], vertex: usize) -> Result<usize> {
    fragments.get(vertex).copied().ok_or(unknown_vertex(vertex))
}

/// Roots every component at its smallest vertex and hangs each fragment
/// from the bridge that joined it.
///
/// Scanning vertices in ascending order, the first vertex met in a
/// component not yet placed is that component's minimum.
fn orient(
    fragments: &[usize],
    crossings: &[Vec<(usize, usize)>],
    parents: &mut [usize],
) -> Result<()> {
    let mut placed = FixedBitSet::with_capacity(fragments.len());
    let mut queue = VecDeque::new();
    for (vertex, &fragment) in fragments.iter().enumerate() {
        if placed.contains(fragment) {
            continue;
        }
        placed.insert(fragment);
        reroot(parents, vertex, vertex)?;
        queue.push_back(fragment);
        while let Some(current) = queue.pop_front() {
            for &(inside, outside) in crossings.get(current).map_or(&[][..], Vec::as_slice) {
                let next = fragment_of(fragments, outside)?;
                if !placed.contains(next) {
                    placed.insert(next);
                    reroot(parents, outside, inside)?;
                    queue.push_back(next);
                }
            }
        }
    }
    Ok(())
}

/// Hangs `vertex` from `parent`, reversing the chain between `vertex` and
/// its old root so the rest of the fragment keeps its parents.
fn reroot(parents: &mut [usize], vertex: usize, parent: usize) -> Result<()> {
    let mut previous = parent;
    let mut current = vertex;
    loop {
        let slot = parents.get_mut(current).ok_or(unknown_vertex(current))?;
        let next = mem::replace(slot, previous);
        if next == current {
            return Ok(());
        }
        previous = current;
        current = next;
    }
}

/// Returns the summed weight of every tree edge of `forest`.
///
/// # Errors
/// Returns [`MsfError::InvariantViolation`] when a tree edge is missing from
/// `graph`.
pub fn forest_weight(forest: &PartialForest, graph: &GraphStore) -> Result<usize> {
    forest.edges().try_fold(0, |total, (child, parent)| {
        graph
            .edge_weight(child, parent)
            .map(|weight| total + weight)
            .ok_or(MsfError::InvariantViolation {
                invariant: "tree edges exist in the graph",
                vertex: child,
            })
    })
}

/// Draws a random graph from `builder` and writes it to `path`.
///
/// # Errors
/// Returns [`MsfError::Graph`] for invalid configurations and write failures.
#[instrument(name = "msf.generate", err, skip(builder, path), fields(path = %path.as_ref().display()))]
pub fn generate_graph(builder: &GraphBuilder, path: impl AsRef<Path>) -> Result<GraphStore> {
    let graph = builder.build()?;
    graph.write(path)?;
    Ok(graph)
}
