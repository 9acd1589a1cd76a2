//! Choosing which candidate edges become hallways
//!
//! A minimum spanning tree guarantees every room is reachable; a random
//! share of the remaining candidates adds loops.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::rng::GameRng;

use super::graph::{CandidateGraph, RoomEdge};

/// Why an edge was selected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeKind {
    /// Part of the minimum spanning tree
    Tree,
    /// Extra connection kept at random
    Loop,
}

/// An edge picked for carving
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectedEdge {
    pub edge: RoomEdge,
    pub kind: EdgeKind,
}

/// Result of edge selection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgeSelection {
    /// Minimum spanning tree (or forest) edges, in the order they were added
    pub mst: Vec<RoomEdge>,
    /// Non-tree candidates promoted to hallways, in candidate order
    pub promoted: Vec<RoomEdge>,
}

impl EdgeSelection {
    /// Every selected edge, tree edges first
    pub fn iter(&self) -> impl Iterator<Item = SelectedEdge> + '_ {
        let tree = self.mst.iter().map(|&edge| SelectedEdge {
            edge,
            kind: EdgeKind::Tree,
        });
        let loops = self.promoted.iter().map(|&edge| SelectedEdge {
            edge,
            kind: EdgeKind::Loop,
        });
        tree.chain(loops)
    }

    pub fn len(&self) -> usize {
        self.mst.len() + self.promoted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mst.is_empty() && self.promoted.is_empty()
    }
}

/// Heap entry for Prim's algorithm
#[derive(Debug, Clone, Copy)]
struct HeapEdge {
    weight: f64,
    from: usize,
    to: usize,
    index: usize,
}

impl PartialEq for HeapEdge {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapEdge {}

impl Ord for HeapEdge {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior
        other
            .weight
            .total_cmp(&self.weight)
            .then_with(|| other.from.cmp(&self.from))
            .then_with(|| other.to.cmp(&self.to))
    }
}

impl PartialOrd for HeapEdge {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Minimum spanning forest of the candidate graph
///
/// Returns indices into `graph.edges()`. The search starts from the lower
/// endpoint of the first candidate edge and restarts from the lowest
/// unvisited room whenever the heap runs dry.
pub fn minimum_spanning_tree(graph: &CandidateGraph) -> Vec<usize> {
    let n = graph.room_count();
    let edges = graph.edges();
    let Some(first) = edges.first() else {
        return Vec::new();
    };

    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (index, edge) in edges.iter().enumerate() {
        adjacency[edge.a].push(index);
        adjacency[edge.b].push(index);
    }

    let mut visited = vec![false; n];
    let mut tree = Vec::with_capacity(n.saturating_sub(1));
    let mut heap = BinaryHeap::new();
    let mut next_root = Some(first.a);

    while let Some(root) = next_root {
        visit(root, &adjacency, edges, &mut visited, &mut heap);

        while let Some(HeapEdge { to, index, .. }) = heap.pop() {
            if visited[to] {
                continue;
            }
            tree.push(index);
            visit(to, &adjacency, edges, &mut visited, &mut heap);
        }

        next_root = visited.iter().position(|v| !v);
    }
    tree
}

fn visit(
    room: usize,
    adjacency: &[Vec<usize>],
    edges: &[RoomEdge],
    visited: &mut [bool],
    heap: &mut BinaryHeap<HeapEdge>,
) {
    visited[room] = true;
    for &index in &adjacency[room] {
        let edge = &edges[index];
        let to = edge.other(room);
        if !visited[to] {
            heap.push(HeapEdge {
                weight: edge.weight,
                from: room,
                to,
                index,
            });
        }
    }
}

/// Pick the edges to carve: the spanning tree, plus each remaining candidate
/// with probability `loop_chance`
pub fn select_edges(graph: &CandidateGraph, loop_chance: f64, rng: &mut GameRng) -> EdgeSelection {
    let tree = minimum_spanning_tree(graph);
    let mut in_tree = vec![false; graph.len()];
    for &index in &tree {
        in_tree[index] = true;
    }

    let edges = graph.edges();
    let mst: Vec<RoomEdge> = tree.iter().map(|&i| edges[i]).collect();
    let promoted: Vec<RoomEdge> = edges
        .iter()
        .zip(&in_tree)
        .filter(|(_, tree_edge)| !**tree_edge)
        .filter_map(|(edge, _)| rng.chance(loop_chance).then_some(*edge))
        .collect();

    debug!(
        "selected {} tree edges and {} loop edges from {} candidates",
        mst.len(),
        promoted.len(),
        graph.len()
    );
    EdgeSelection { mst, promoted }
}
