//! Whole-graph snapshots: vertices with their canvas positions plus a
//! deduplicated edge list, tagged with a format string.

use std::collections::HashSet;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::components::graph_canvas::types::{Interaction, Point};
use crate::components::graph_canvas::{GraphCanvasState, Scene};
use crate::error::SnapshotError;
use crate::graph::naming::next_index_after;
use crate::graph::{Graph, VertexId, Weight};

pub const SNAPSHOT_FORMAT: &str = "dijkstra_tk_v1";

fn default_undirected() -> bool {
	true
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
	pub format: String,
	#[serde(default = "default_undirected")]
	pub undirected: bool,
	#[serde(default)]
	pub vertices: Vec<VertexRecord>,
	#[serde(default)]
	pub edges: Vec<EdgeRecord>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VertexRecord {
	pub vid: VertexId,
	pub name: String,
	#[serde(default)]
	pub x: f64,
	#[serde(default)]
	pub y: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
	pub u: VertexId,
	pub v: VertexId,
	pub w: Weight,
}

impl Snapshot {
	/// Captures `graph` with each vertex at the position `position_of` reports,
	/// or the origin when it has none.
	pub fn capture(graph: &Graph, position_of: impl Fn(VertexId) -> Option<Point>) -> Self {
		let vertices = graph
			.vertices()
			.map(|vertex| {
				let at = position_of(vertex.id).unwrap_or_default();
				VertexRecord {
					vid: vertex.id,
					name: vertex.name.clone(),
					x: at.x,
					y: at.y,
				}
			})
			.collect();

		let mut seen = HashSet::new();
		let mut edges = Vec::new();
		for (&u, bucket) in graph.adjacency() {
			for (&v, &w) in bucket {
				let key = if graph.is_undirected() {
					(u.min(v), u.max(v))
				} else {
					(u, v)
				};
				if seen.insert(key) {
					edges.push(EdgeRecord {
						u: key.0,
						v: key.1,
						w,
					});
				}
			}
		}

		Self {
			format: SNAPSHOT_FORMAT.to_string(),
			undirected: graph.is_undirected(),
			vertices,
			edges,
		}
	}

	/// Checks the format tag before looking at anything else, so a foreign
	/// document reports `UnsupportedFormat` rather than a shape error.
	pub fn from_json(text: &str) -> Result<Self, SnapshotError> {
		let value: serde_json::Value = serde_json::from_str(text)?;
		let format = value.get("format").and_then(|f| f.as_str()).unwrap_or_default();
		if format != SNAPSHOT_FORMAT {
			return Err(SnapshotError::UnsupportedFormat(format.to_string()));
		}
		Ok(serde_json::from_value(value)?)
	}

	pub fn to_json(&self) -> Result<String, SnapshotError> {
		Ok(serde_json::to_string_pretty(self)?)
	}
}

impl GraphCanvasState {
	pub fn snapshot(&self) -> Snapshot {
		Snapshot::capture(&self.graph, |id| self.position(id))
	}

	/// Replaces the whole graph and canvas with `snapshot`.
	///
	/// The new graph is built aside and only installed once every vertex and
	/// edge has been accepted, so a failed load changes nothing.
	pub fn load_snapshot(&mut self, snapshot: Snapshot) -> Result<(), SnapshotError> {
		if snapshot.format != SNAPSHOT_FORMAT {
			return Err(SnapshotError::UnsupportedFormat(snapshot.format));
		}

		let mut graph = Graph::new(snapshot.undirected);
		let mut scene = Scene::new(self.scene.config().clone());
		for vertex in &snapshot.vertices {
			graph.add_vertex_explicit(vertex.vid, &vertex.name)?;
			scene.add_vertex(vertex.vid, &vertex.name, Point::new(vertex.x, vertex.y));
		}
		for edge in &snapshot.edges {
			if graph.has_edge(edge.u, edge.v) {
				continue;
			}
			graph.add_edge(edge.u, edge.v, edge.w)?;
			scene.upsert_edge(edge.u, edge.v, edge.w, snapshot.undirected);
		}

		info!(
			"loaded snapshot with {} vertices and {} edges",
			graph.vertex_count(),
			scene.edge_count()
		);
		self.name_seq = next_index_after(graph.vertices().map(|v| v.name.as_str()));
		self.graph = graph;
		self.scene = scene;
		self.highlighted.clear();
		self.interaction = Interaction::idle(self.interaction.mode());
		Ok(())
	}

	pub fn load_json(&mut self, text: &str) -> Result<(), SnapshotError> {
		let result = Snapshot::from_json(text).and_then(|snapshot| self.load_snapshot(snapshot));
		if let Err(err) = &result {
			warn!("snapshot rejected: {err}");
		}
		result
	}
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;

	use super::*;
	use crate::components::graph_canvas::types::{CanvasConfig, Mode, PointerOutcome};
	use crate::error::GraphError;

	fn dismiss(_: Option<Weight>) -> Option<Weight> {
		None
	}

	fn fixed(w: Weight) -> impl FnMut(Option<Weight>) -> Option<Weight> {
		move |_| Some(w)
	}

	fn editor() -> GraphCanvasState {
		GraphCanvasState::new(true, CanvasConfig::default())
	}

	fn built() -> GraphCanvasState {
		let mut state = editor();
		for (x, y) in [(10.0, 20.0), (110.0, 20.0), (60.0, 90.0)] {
			state.create_vertex_at(Point::new(x, y)).unwrap();
		}
		state.set_mode(Mode::AddEdge);
		for (u, v, w) in [(1, 2, 4.0), (2, 3, 3.0), (3, 1, 10.5)] {
			state.click_vertex(u, &mut dismiss).unwrap();
			state.click_vertex(v, &mut fixed(w)).unwrap();
		}
		state
	}

	fn canonical_edges(graph: &Graph) -> Vec<(VertexId, VertexId, Weight)> {
		let mut edges: Vec<_> = Snapshot::capture(graph, |_| None)
			.edges
			.into_iter()
			.map(|e| (e.u, e.v, e.w))
			.collect();
		edges.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));
		edges
	}

	#[test]
	fn undirected_edges_are_written_once() {
		let snapshot = built().snapshot();
		assert_eq!(snapshot.format, SNAPSHOT_FORMAT);
		assert!(snapshot.undirected);
		assert_eq!(snapshot.vertices.len(), 3);
		assert_eq!(
			snapshot.edges,
			vec![
				EdgeRecord { u: 1, v: 2, w: 4.0 },
				EdgeRecord { u: 1, v: 3, w: 10.5 },
				EdgeRecord { u: 2, v: 3, w: 3.0 },
			]
		);
		assert_eq!(
			snapshot.vertices[2],
			VertexRecord {
				vid: 3,
				name: "C".to_string(),
				x: 60.0,
				y: 90.0,
			}
		);
	}

	#[test]
	fn directed_edges_are_written_as_stored() {
		let mut graph = Graph::new(false);
		let a = graph.add_vertex(None).unwrap();
		let b = graph.add_vertex(None).unwrap();
		graph.add_edge(b, a, 1.0).unwrap();
		graph.add_edge(a, b, 2.0).unwrap();
		let snapshot = Snapshot::capture(&graph, |_| None);
		assert_eq!(
			snapshot.edges,
			vec![
				EdgeRecord { u: a, v: b, w: 2.0 },
				EdgeRecord { u: b, v: a, w: 1.0 },
			]
		);
		assert_eq!((snapshot.vertices[0].x, snapshot.vertices[0].y), (0.0, 0.0));
	}

	#[test]
	fn json_round_trip_preserves_graph_and_layout() {
		let saved = built();
		let text = saved.snapshot().to_json().unwrap();

		let mut restored = editor();
		restored.load_json(&text).unwrap();

		let ids: Vec<_> = restored.graph().vertices().map(|v| (v.id, v.name.clone())).collect();
		let expected: Vec<_> = saved.graph().vertices().map(|v| (v.id, v.name.clone())).collect();
		assert_eq!(ids, expected);
		for (id, _) in &ids {
			assert_eq!(restored.position(*id), saved.position(*id));
		}
		assert_eq!(canonical_edges(restored.graph()), canonical_edges(saved.graph()));
		assert_eq!(restored.scene().edge_count(), 3);
		assert_eq!(restored.scene().edge(3, 1).unwrap().weight_text, "10.5");
	}

	#[test]
	fn ids_and_names_continue_after_load() {
		let text = r#"{
			"format": "dijkstra_tk_v1",
			"undirected": true,
			"vertices": [
				{ "vid": 4, "name": "AB", "x": 1.0, "y": 2.0 },
				{ "vid": 9, "name": "hub", "x": 3.0, "y": 4.0 }
			],
			"edges": [ { "u": 4, "v": 9, "w": 2.5 } ]
		}"#;
		let mut state = editor();
		state.load_json(text).unwrap();
		state.set_mode(Mode::AddVertex);
		let outcome = state.pointer_down(Point::new(300.0, 300.0), &mut dismiss);
		assert_eq!(outcome, PointerOutcome::VertexCreated(10));
		assert_eq!(state.graph().vertex(10).unwrap().name, "AC");
	}

	#[test]
	fn names_restart_when_none_decode() {
		let text = r#"{"format":"dijkstra_tk_v1","vertices":[{"vid":1,"name":"start"}]}"#;
		let mut state = editor();
		state.load_json(text).unwrap();
		assert!(state.graph().is_undirected());
		assert_eq!(state.position(1), Some(Point::new(0.0, 0.0)));
		let id = state.create_vertex_at(Point::new(50.0, 50.0)).unwrap();
		assert_eq!(state.graph().vertex(id).unwrap().name, "A");
	}

	#[test]
	fn ids_without_a_successor_are_refused() {
		let mut state = built();
		let before = state.snapshot();
		let text = r#"{
			"format": "dijkstra_tk_v1",
			"vertices": [ { "vid": 1, "name": "A" }, { "vid": 4294967295, "name": "B" } ]
		}"#;
		assert!(matches!(
			state.load_json(text),
			Err(SnapshotError::Graph(GraphError::IdOutOfRange(id))) if id == VertexId::MAX
		));
		assert_eq!(state.snapshot(), before);

		let text = r#"{
			"format": "dijkstra_tk_v1",
			"vertices": [ { "vid": 1, "name": "A" }, { "vid": 4294967294, "name": "B" } ]
		}"#;
		state.load_json(text).unwrap();
		state.set_mode(Mode::AddVertex);
		for _ in 0..2 {
			assert_eq!(
				state.pointer_down(Point::new(300.0, 300.0), &mut dismiss),
				PointerOutcome::Rejected(GraphError::IdOutOfRange(VertexId::MAX))
			);
		}
		assert_eq!(state.graph().vertex(1).unwrap().name, "A");
		assert_eq!(state.graph().vertex_count(), 2);
	}

	#[test]
	fn repeated_edges_in_a_file_apply_once() {
		let text = r#"{
			"format": "dijkstra_tk_v1",
			"undirected": false,
			"vertices": [ { "vid": 1, "name": "A" }, { "vid": 2, "name": "B" } ],
			"edges": [
				{ "u": 1, "v": 2, "w": 1.0 },
				{ "u": 1, "v": 2, "w": 7.0 },
				{ "u": 2, "v": 1, "w": 3.0 }
			]
		}"#;
		let mut state = editor();
		state.load_json(text).unwrap();
		assert!(!state.graph().is_undirected());
		assert_eq!(state.graph().edge_weight(1, 2), Some(1.0));
		assert_eq!(state.graph().edge_weight(2, 1), Some(3.0));
		assert_eq!(state.scene().edge_count(), 1);
	}

	#[test]
	fn unknown_format_is_rejected_without_changes() {
		let mut state = built();
		let before = state.snapshot();
		let err = state
			.load_json(r#"{"format":"something_else","vertices":[]}"#)
			.unwrap_err();
		assert!(matches!(err, SnapshotError::UnsupportedFormat(f) if f == "something_else"));
		assert!(matches!(
			state.load_json(r#"{"vertices":[]}"#),
			Err(SnapshotError::UnsupportedFormat(_))
		));
		assert_eq!(state.snapshot(), before);
	}

	#[test]
	fn malformed_documents_leave_state_untouched() {
		let mut state = built();
		state.calculate_path("A", "C").unwrap();
		let before = state.snapshot();

		let missing_name = r#"{"format":"dijkstra_tk_v1","vertices":[{"vid":1}]}"#;
		assert!(matches!(state.load_json(missing_name), Err(SnapshotError::Malformed(_))));
		assert!(matches!(state.load_json("not json"), Err(SnapshotError::Malformed(_))));

		let dangling = r#"{
			"format": "dijkstra_tk_v1",
			"vertices": [ { "vid": 1, "name": "A" } ],
			"edges": [ { "u": 1, "v": 5, "w": 1.0 } ]
		}"#;
		assert!(matches!(
			state.load_json(dangling),
			Err(SnapshotError::Graph(GraphError::InvalidReference(5)))
		));

		let negative = r#"{
			"format": "dijkstra_tk_v1",
			"vertices": [ { "vid": 1, "name": "A" }, { "vid": 2, "name": "B" } ],
			"edges": [ { "u": 1, "v": 2, "w": -1.0 } ]
		}"#;
		assert!(matches!(
			state.load_json(negative),
			Err(SnapshotError::Graph(GraphError::InvalidWeight(_)))
		));

		assert_eq!(state.snapshot(), before);
		assert_eq!(state.highlighted_path().len(), 3);
	}

	#[test]
	fn load_discards_previous_interaction_state() {
		let mut state = built();
		state.calculate_path("A", "C").unwrap();
		state.set_mode(Mode::AddEdge);
		state.click_vertex(1, &mut dismiss).unwrap();

		let text = built().snapshot().to_json().unwrap();
		state.load_json(&text).unwrap();
		assert_eq!(state.mode(), Mode::AddEdge);
		assert_eq!(state.pending_edge_from(), None);
		assert!(state.highlighted_path().is_empty());
		assert!(state.scene().vertices().all(|v| !v.selected && !v.highlighted));
	}

	/// Builds an editor through the same calls the canvas makes: vertices
	/// placed, edges added by two clicks, some vertices deleted again.
	fn assemble(
		undirected: bool,
		points: &[(i32, i32)],
		edges: &[(usize, usize, Weight)],
		deleted: &[usize],
	) -> GraphCanvasState {
		let mut state = GraphCanvasState::new(undirected, CanvasConfig::default());
		let ids: Vec<VertexId> = points
			.iter()
			.map(|&(x, y)| state.create_vertex_at(Point::new(x as f64, y as f64)).unwrap())
			.collect();
		state.set_mode(Mode::AddEdge);
		for &(u, v, w) in edges {
			let (u, v) = (ids[u % ids.len()], ids[v % ids.len()]);
			state.click_vertex(u, &mut dismiss).unwrap();
			let _ = state.click_vertex(v, &mut fixed(w));
			state.cancel_pending_edge();
		}
		for &i in deleted {
			state.delete_vertex(ids[i % ids.len()]);
		}
		state
	}

	proptest! {
		#[test]
		fn any_editor_state_survives_a_save_and_load(
			undirected in any::<bool>(),
			points in proptest::collection::vec((0i32..800, 0i32..600), 1..12),
			edges in proptest::collection::vec(
				(0usize..12, 0usize..12, (0u32..400).prop_map(|w| w as f64 / 8.0)),
				0..30,
			),
			deleted in proptest::collection::vec(0usize..12, 0..4),
		) {
			let saved = assemble(undirected, &points, &edges, &deleted);
			let text = saved.snapshot().to_json().unwrap();

			let mut restored = editor();
			restored.load_json(&text).unwrap();
			prop_assert_eq!(restored.graph().is_undirected(), undirected);
			prop_assert_eq!(restored.graph().adjacency(), saved.graph().adjacency());
			prop_assert_eq!(restored.vertex_names(), saved.vertex_names());
			prop_assert_eq!(restored.snapshot(), saved.snapshot());
			prop_assert_eq!(restored.scene().edge_count(), saved.scene().edge_count());
		}

		#[test]
		fn every_accepted_weight_reloads(w in any::<f64>()) {
			let state = assemble(true, &[(0, 0), (100, 0)], &[(0, 1, w)], &[]);
			let text = state.snapshot().to_json().unwrap();
			let mut restored = editor();
			restored.load_json(&text).unwrap();
			prop_assert_eq!(restored.graph().has_edge(1, 2), state.graph().has_edge(1, 2));
		}
	}
}
