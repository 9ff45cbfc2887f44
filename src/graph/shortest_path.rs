use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use super::model::{Adjacency, VertexId, Weight};

/// Outcome of a single-pair query. An unreachable goal has an infinite
/// distance and no path.
#[derive(Clone, Debug, PartialEq)]
pub struct PathResult {
	pub distance: Weight,
	pub path: Option<Vec<VertexId>>,
}

impl PathResult {
	fn unreachable() -> Self {
		Self {
			distance: Weight::INFINITY,
			path: None,
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct FrontierEntry {
	distance: Weight,
	vertex: VertexId,
}

impl Eq for FrontierEntry {}

// Reversed so the max-heap pops the smallest tentative distance first.
impl Ord for FrontierEntry {
	fn cmp(&self, other: &Self) -> Ordering {
		other
			.distance
			.total_cmp(&self.distance)
			.then_with(|| other.vertex.cmp(&self.vertex))
	}
}

impl PartialOrd for FrontierEntry {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

/// Dijkstra from `start` to `goal` over non-negative weights.
///
/// Stops as soon as `goal` is finalized. Never touches the graph itself, only
/// the adjacency view it is handed.
pub fn shortest_path(adjacency: &Adjacency, start: VertexId, goal: VertexId) -> PathResult {
	let mut best: HashMap<VertexId, Weight> = HashMap::from([(start, 0.0)]);
	let mut prev: HashMap<VertexId, VertexId> = HashMap::new();
	let mut done: HashSet<VertexId> = HashSet::new();
	let mut frontier = BinaryHeap::from([FrontierEntry {
		distance: 0.0,
		vertex: start,
	}]);

	while let Some(FrontierEntry { distance, vertex }) = frontier.pop() {
		if !done.insert(vertex) {
			continue;
		}
		if vertex == goal {
			let mut path = vec![vertex];
			let mut cursor = vertex;
			while let Some(&p) = prev.get(&cursor) {
				path.push(p);
				cursor = p;
			}
			path.reverse();
			return PathResult {
				distance,
				path: Some(path),
			};
		}
		let Some(neighbors) = adjacency.get(&vertex) else {
			continue;
		};
		for (&next, &w) in neighbors {
			let candidate = distance + w;
			if candidate < best.get(&next).copied().unwrap_or(Weight::INFINITY) {
				best.insert(next, candidate);
				prev.insert(next, vertex);
				frontier.push(FrontierEntry {
					distance: candidate,
					vertex: next,
				});
			}
		}
	}
	PathResult::unreachable()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::Graph;

	fn triangle() -> (Graph, VertexId, VertexId, VertexId) {
		let mut graph = Graph::new(true);
		let a = graph.add_vertex(Some("A")).unwrap();
		let b = graph.add_vertex(Some("B")).unwrap();
		let c = graph.add_vertex(Some("C")).unwrap();
		graph.add_edge(a, b, 4.0).unwrap();
		graph.add_edge(b, c, 3.0).unwrap();
		graph.add_edge(a, c, 10.0).unwrap();
		(graph, a, b, c)
	}

	#[test]
	fn finds_cheaper_two_hop_route() {
		let (graph, a, b, c) = triangle();
		let result = shortest_path(graph.adjacency(), a, c);
		assert_eq!(result.distance, 7.0);
		assert_eq!(result.path, Some(vec![a, b, c]));
	}

	#[test]
	fn disconnected_goal_is_unreachable() {
		let (mut graph, a, _, _) = triangle();
		let lonely = graph.add_vertex(Some("D")).unwrap();
		let result = shortest_path(graph.adjacency(), a, lonely);
		assert!(result.distance.is_infinite());
		assert_eq!(result.path, None);
		assert!(result.path.is_none());
	}

	#[test]
	fn start_equal_to_goal_is_trivial() {
		let (graph, a, _, _) = triangle();
		let result = shortest_path(graph.adjacency(), a, a);
		assert_eq!(result.distance, 0.0);
		assert_eq!(result.path, Some(vec![a]));
	}

	#[test]
	fn respects_edge_direction() {
		let mut graph = Graph::new(false);
		let a = graph.add_vertex(None).unwrap();
		let b = graph.add_vertex(None).unwrap();
		graph.add_edge(a, b, 1.0).unwrap();
		assert!(shortest_path(graph.adjacency(), a, b).path.is_some());
		assert!(shortest_path(graph.adjacency(), b, a).path.is_none());
	}

	#[test]
	fn zero_weight_edges_are_usable() {
		let mut graph = Graph::new(true);
		let ids: Vec<VertexId> = (0..5).map(|_| graph.add_vertex(None).unwrap()).collect();
		graph.add_edge(ids[0], ids[1], 2.0).unwrap();
		graph.add_edge(ids[0], ids[2], 10.0).unwrap();
		graph.add_edge(ids[3], ids[1], 1.0).unwrap();
		graph.add_edge(ids[3], ids[4], 4.0).unwrap();
		graph.add_edge(ids[2], ids[4], 0.0).unwrap();

		let result = shortest_path(graph.adjacency(), ids[0], ids[4]);
		assert_eq!(result.distance, 7.0);
		assert_eq!(result.path, Some(vec![ids[0], ids[1], ids[3], ids[4]]));

		let result = shortest_path(graph.adjacency(), ids[2], ids[4]);
		assert_eq!(result.distance, 0.0);
	}

	#[test]
	fn unknown_start_is_unreachable() {
		let (graph, a, _, _) = triangle();
		let result = shortest_path(graph.adjacency(), 99, a);
		assert_eq!(result, PathResult::unreachable());
	}
}
