use log::{debug, info, warn};

use crate::error::GraphError;
use crate::graph::naming::column_name;
use crate::graph::{Graph, VertexId, Weight, shortest_path};

use super::scene::Scene;
use super::types::{
	CanvasConfig, ContextTarget, Drag, EdgeOutcome, Interaction, Mode, PathOutcome, Point,
	PointerOutcome, WeightPrompt,
};

/// Interaction controller for the graph canvas.
///
/// Owns the graph, the shape arena that mirrors it on screen and the current
/// [`Interaction`]. Every pointer or toolbar event runs to completion against
/// this value; the only thing it waits on is the [`WeightPrompt`] it is handed.
pub struct GraphCanvasState {
	pub(crate) graph: Graph,
	pub(crate) scene: Scene,
	pub(crate) interaction: Interaction,
	/// Index of the next generated column name.
	pub(crate) name_seq: usize,
	pub(crate) highlighted: Vec<VertexId>,
}

impl GraphCanvasState {
	pub fn new(undirected: bool, config: CanvasConfig) -> Self {
		Self {
			graph: Graph::new(undirected),
			scene: Scene::new(config),
			interaction: Interaction::idle(Mode::default()),
			name_seq: 0,
			highlighted: Vec::new(),
		}
	}

	pub fn graph(&self) -> &Graph {
		&self.graph
	}

	pub fn scene(&self) -> &Scene {
		&self.scene
	}

	pub fn mode(&self) -> Mode {
		self.interaction.mode()
	}

	pub fn pending_edge_from(&self) -> Option<VertexId> {
		match self.interaction {
			Interaction::AddEdge { pending_from } => pending_from,
			_ => None,
		}
	}

	pub fn dragging(&self) -> Option<Drag> {
		match self.interaction {
			Interaction::Move { drag } => drag,
			_ => None,
		}
	}

	pub fn position(&self, id: VertexId) -> Option<Point> {
		self.scene.position(id)
	}

	pub fn highlighted_path(&self) -> &[VertexId] {
		&self.highlighted
	}

	/// Vertex names in id order, for start/finish pickers.
	pub fn vertex_names(&self) -> Vec<String> {
		self.graph.vertices().map(|v| v.name.clone()).collect()
	}

	/// Switching modes drops any half-built edge and any active drag.
	pub fn set_mode(&mut self, mode: Mode) {
		self.cancel_pending_edge();
		self.interaction = Interaction::idle(mode);
		debug!("mode set to {:?}", mode);
	}

	pub fn cancel_pending_edge(&mut self) {
		if let Interaction::AddEdge { pending_from } = &mut self.interaction {
			if let Some(id) = pending_from.take() {
				self.scene.set_selected(id, false);
			}
		}
	}

	pub fn pointer_down(&mut self, at: Point, prompt: &mut impl WeightPrompt) -> PointerOutcome {
		let hit = self.scene.vertex_at(at);
		match (self.interaction, hit) {
			(Interaction::AddVertex, None) => match self.create_vertex_at(at) {
				Ok(id) => PointerOutcome::VertexCreated(id),
				Err(err) => PointerOutcome::Rejected(err),
			},
			(Interaction::AddEdge { .. }, Some(id)) => match self.click_vertex(id, prompt) {
				Ok(outcome) => PointerOutcome::Edge(outcome),
				Err(err) => {
					warn!("edge creation rejected: {err}");
					PointerOutcome::Rejected(err)
				}
			},
			(Interaction::Move { .. }, Some(id)) => {
				let Some(center) = self.scene.position(id) else {
					return PointerOutcome::Ignored;
				};
				self.interaction = Interaction::Move {
					drag: Some(Drag {
						vertex: id,
						offset: at.offset_from(center),
					}),
				};
				debug!("drag started on vertex {id}");
				PointerOutcome::DragStarted(id)
			}
			_ => PointerOutcome::Ignored,
		}
	}

	/// Returns whether a vertex moved.
	pub fn pointer_move(&mut self, at: Point) -> bool {
		let Some(drag) = self.dragging() else {
			return false;
		};
		self.scene.move_vertex(drag.vertex, at.offset_from(drag.offset))
	}

	pub fn pointer_up(&mut self) {
		if let Interaction::Move { drag } = &mut self.interaction {
			if let Some(drag) = drag.take() {
				debug!("drag ended on vertex {}", drag.vertex);
			}
		}
	}

	pub fn create_vertex_at(&mut self, at: Point) -> Result<VertexId, GraphError> {
		let name = column_name(self.name_seq);
		let id = self.graph.add_vertex(Some(&name)).inspect_err(|err| {
			warn!("vertex creation rejected: {err}");
		})?;
		self.name_seq += 1;
		self.scene.add_vertex(id, &name, at);
		info!("vertex {name} ({id}) placed at ({:.0}, {:.0})", at.x, at.y);
		Ok(id)
	}

	/// Primary click on a vertex while building an edge.
	pub fn click_vertex(
		&mut self,
		id: VertexId,
		prompt: &mut impl WeightPrompt,
	) -> Result<EdgeOutcome, GraphError> {
		let Interaction::AddEdge { pending_from } = self.interaction else {
			return Ok(EdgeOutcome::Cancelled);
		};
		let Some(from) = pending_from else {
			self.interaction = Interaction::AddEdge {
				pending_from: Some(id),
			};
			self.scene.set_selected(id, true);
			return Ok(EdgeOutcome::Pending(id));
		};
		if from == id {
			self.cancel_pending_edge();
			return Ok(EdgeOutcome::Cancelled);
		}

		let Some(weight) = prompt.ask_weight(None) else {
			return Ok(EdgeOutcome::PromptCancelled);
		};
		if self.graph.has_edge(from, id) {
			warn!("edge {from} -> {id} already exists");
			self.cancel_pending_edge();
			return Ok(EdgeOutcome::Duplicate { from, to: id });
		}
		if let Err(err) = self.graph.add_edge(from, id, weight) {
			self.cancel_pending_edge();
			return Err(err);
		}
		self.scene
			.upsert_edge(from, id, weight, self.graph.is_undirected());
		self.cancel_pending_edge();
		info!("edge {from} -> {id} added with weight {weight}");
		Ok(EdgeOutcome::Created {
			from,
			to: id,
			weight,
		})
	}

	/// Secondary-click target under `at`, regardless of mode. Edges come back
	/// in an orientation that is actually stored in the graph.
	pub fn context_target(&self, at: Point) -> Option<ContextTarget> {
		if let Some(id) = self.scene.vertex_at(at) {
			return Some(ContextTarget::Vertex(id));
		}
		self.scene.edge_at(at).map(|key| {
			if self.graph.has_edge(key.lo, key.hi) {
				ContextTarget::Edge(key.lo, key.hi)
			} else {
				ContextTarget::Edge(key.hi, key.lo)
			}
		})
	}

	/// Deletes a vertex with all of its edges. Returns the model's removed
	/// directed pairs.
	pub fn delete_vertex(&mut self, id: VertexId) -> Vec<(VertexId, VertexId)> {
		if self.pending_edge_from() == Some(id) {
			self.cancel_pending_edge();
		}
		if self.dragging().is_some_and(|drag| drag.vertex == id) {
			self.pointer_up();
		}
		if self.highlighted.contains(&id) {
			self.clear_highlight();
		}

		let removed = self.graph.remove_vertex(id);
		for &(u, v) in &removed {
			self.scene.remove_edge(u, v);
		}
		self.scene.remove_vertex(id);
		if self.graph.is_empty() {
			self.name_seq = 0;
		}
		info!("vertex {id} deleted, {} edge entries removed", removed.len());
		removed
	}

	/// Deletes the edge drawn between `u` and `v`, in the given orientation
	/// when the graph is directed.
	pub fn delete_edge(&mut self, u: VertexId, v: VertexId) {
		if self.scene.edge(u, v).is_none() {
			return;
		}
		let on_path = self
			.highlighted
			.windows(2)
			.any(|pair| (pair[0], pair[1]) == (u, v) || (pair[0], pair[1]) == (v, u));
		if on_path {
			self.clear_highlight();
		}

		self.graph.remove_edge(u, v);
		match self.graph.edge_weight(v, u) {
			Some(reverse) => {
				self.scene.drop_orientation(u, v);
				self.scene.set_edge_weight(u, v, reverse);
			}
			None => {
				self.scene.remove_edge(u, v);
			}
		}
		info!("edge {u} -> {v} deleted");
	}

	/// Re-asks the weight for an existing edge. `Ok(None)` when the prompt is
	/// dismissed.
	pub fn edit_edge_weight(
		&mut self,
		u: VertexId,
		v: VertexId,
		prompt: &mut impl WeightPrompt,
	) -> Result<Option<Weight>, GraphError> {
		let current = self.graph.edge_weight(u, v);
		let Some(weight) = prompt.ask_weight(current) else {
			return Ok(None);
		};
		self.graph.update_edge_weight(u, v, weight)?;
		self.scene.set_edge_weight(u, v, weight);
		info!("edge {u} -> {v} reweighted to {weight}");
		Ok(Some(weight))
	}

	pub fn highlight_path(&mut self, path: &[VertexId]) {
		self.clear_highlight();
		for &id in path {
			self.scene.highlight_vertex(id);
		}
		for pair in path.windows(2) {
			self.scene.highlight_edge(pair[0], pair[1]);
		}
		self.highlighted = path.to_vec();
	}

	pub fn clear_highlight(&mut self) {
		self.scene.clear_highlight();
		self.highlighted.clear();
	}

	/// Looks both endpoints up by name, runs the query and highlights the
	/// route when there is one.
	pub fn calculate_path(&mut self, start: &str, goal: &str) -> Result<PathOutcome, GraphError> {
		self.clear_highlight();
		if start.is_empty() || goal.is_empty() {
			return Ok(PathOutcome::MissingEndpoints);
		}
		if start == goal {
			return Ok(PathOutcome::SameEndpoints);
		}
		let lookup = |name: &str| {
			self.graph
				.vertex_id_by_name(name)
				.ok_or_else(|| GraphError::UnknownName(name.to_string()))
		};
		let (from, to) = (lookup(start)?, lookup(goal)?);

		let result = shortest_path(self.graph.adjacency(), from, to);
		let Some(path) = result.path else {
			info!("no route from {start} to {goal}");
			return Ok(PathOutcome::Unreachable);
		};
		self.highlight_path(&path);
		let names = path
			.iter()
			.filter_map(|id| self.graph.vertex(*id))
			.map(|v| v.name.clone())
			.collect();
		info!("route {start} -> {goal} has length {}", result.distance);
		Ok(PathOutcome::Found {
			distance: result.distance,
			path,
			names,
		})
	}

	/// Empties graph and canvas. The current mode is kept, idle.
	pub fn clear_all(&mut self) {
		let dropped = self.scene.vertex_count() + self.scene.edge_count();
		self.graph.clear();
		self.scene.clear();
		self.highlighted.clear();
		self.interaction = Interaction::idle(self.mode());
		self.name_seq = 0;
		info!("graph cleared, {dropped} shapes dropped");
	}
}
