//! Candidate connectivity graph between rooms
//!
//! Rooms that are natural neighbors in the Delaunay sense become candidate
//! hallway endpoints. The graph is always connected when two or more rooms
//! exist.

use std::collections::BTreeSet;

use log::debug;
use serde::{Deserialize, Serialize};

use super::corridor::ConnectivityTracker;
use super::triangulation::{Point, Tetrahedralization};
use super::Room;

/// Unordered pair of room indices with the distance between their centroids
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoomEdge {
    /// Lower room index
    pub a: usize,
    /// Higher room index
    pub b: usize,
    /// Euclidean distance between the room centroids
    pub weight: f64,
}

impl RoomEdge {
    /// Create an edge, normalizing the endpoint order
    pub fn new(a: usize, b: usize, weight: f64) -> Self {
        Self {
            a: a.min(b),
            b: a.max(b),
            weight,
        }
    }

    /// Create the edge between two rooms of a list
    pub fn between(rooms: &[Room], a: usize, b: usize) -> Self {
        Self::new(a, b, rooms[a].centroid_distance(&rooms[b]))
    }

    /// Endpoint pair as `(low, high)`
    pub fn key(&self) -> (usize, usize) {
        (self.a, self.b)
    }

    /// The endpoint that is not `room`
    pub fn other(&self, room: usize) -> usize {
        if room == self.a { self.b } else { self.a }
    }
}

/// Candidate edges over a room list, sorted by endpoint pair
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateGraph {
    room_count: usize,
    edges: Vec<RoomEdge>,
}

impl CandidateGraph {
    /// Wrap an edge list, sorting and deduplicating it
    pub fn from_edges(room_count: usize, mut edges: Vec<RoomEdge>) -> Self {
        edges.sort_by_key(RoomEdge::key);
        edges.dedup_by_key(|e| e.key());
        Self { room_count, edges }
    }

    pub fn room_count(&self) -> usize {
        self.room_count
    }

    pub fn edges(&self) -> &[RoomEdge] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Check whether every room is reachable from every other
    pub fn is_connected(&self) -> bool {
        let mut tracker = ConnectivityTracker::new(self.room_count);
        for edge in &self.edges {
            tracker.merge(edge.a, edge.b);
        }
        tracker.all_connected()
    }
}

/// Build the candidate graph for a room list
///
/// Edges come from a tetrahedralization of the room centroids. Whatever the
/// triangulation leaves disconnected (duplicate or tied input) is joined by
/// adding the closest pair of rooms across components until one component
/// remains.
pub fn build_candidate_graph(rooms: &[Room]) -> CandidateGraph {
    if rooms.len() < 2 {
        return CandidateGraph::from_edges(rooms.len(), Vec::new());
    }

    let points: Vec<Point> = rooms.iter().map(Room::doubled_centroid).collect();
    let mut pairs = Tetrahedralization::build(&points).edges();
    let stitched = stitch_components(&points, &mut pairs);
    if stitched > 0 {
        debug!("stitched {stitched} disconnected room groups");
    }

    let edges = pairs
        .into_iter()
        .map(|(a, b)| RoomEdge::between(rooms, a, b))
        .collect();
    let graph = CandidateGraph::from_edges(rooms.len(), edges);
    debug!(
        "candidate graph: {} rooms, {} edges",
        graph.room_count(),
        graph.len()
    );
    graph
}

/// Join components with closest-pair edges; returns the number added
fn stitch_components(points: &[Point], pairs: &mut BTreeSet<(usize, usize)>) -> usize {
    let mut tracker = ConnectivityTracker::new(points.len());
    for &(a, b) in pairs.iter() {
        tracker.merge(a, b);
    }

    let mut added = 0;
    while !tracker.all_connected() {
        let mut best: Option<(i64, usize, usize)> = None;
        for a in 0..points.len() {
            for b in (a + 1)..points.len() {
                if tracker.are_connected(a, b) {
                    continue;
                }
                let d = squared_distance(&points[a], &points[b]);
                if best.is_none_or(|(bd, _, _)| d < bd) {
                    best = Some((d, a, b));
                }
            }
        }
        let Some((_, a, b)) = best else { break };
        pairs.insert((a, b));
        tracker.merge(a, b);
        added += 1;
    }
    added
}

fn squared_distance(a: &Point, b: &Point) -> i64 {
    (0..3).map(|i| (a[i] - b[i]).pow(2)).sum()
}
