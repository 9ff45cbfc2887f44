//! Arena of on-canvas shapes.
//!
//! Vertex and edge shapes live in slot vectors addressed by integer index, with
//! a side map from vertex id / canonical [`EdgeKey`] to slot. Slot order is
//! creation order and doubles as paint order, so the last live vertex slot
//! is the topmost one.

use std::collections::HashMap;
use std::hash::Hash;

use crate::graph::{VertexId, Weight};

use super::types::{CanvasConfig, EdgeKey, Point};

#[derive(Clone, Debug, PartialEq)]
pub struct VertexShape {
	pub id: VertexId,
	pub label: String,
	pub center: Point,
	pub selected: bool,
	pub highlighted: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EdgeShape {
	pub key: EdgeKey,
	/// Line from the `lo` vertex center to the `hi` vertex center.
	pub start: Point,
	pub end: Point,
	pub label_at: Point,
	pub weight_text: String,
	/// `lo -> hi` is stored in the model.
	pub forward: bool,
	/// `hi -> lo` is stored in the model.
	pub backward: bool,
	pub highlighted: bool,
}

impl EdgeShape {
	fn relayout(&mut self, start: Point, end: Point, label_offset: f64) {
		let mid = start.midpoint(end);
		self.start = start;
		self.end = end;
		self.label_at = Point::new(mid.x, mid.y - label_offset);
	}
}

pub fn weight_text(weight: Weight) -> String {
	format!("{weight}")
}

fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
	let (dx, dy) = (b.x - a.x, b.y - a.y);
	let len_sq = dx * dx + dy * dy;
	if len_sq < f64::EPSILON {
		return p.distance_to(a);
	}
	let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
	p.distance_to(Point::new(a.x + t * dx, a.y + t * dy))
}

/// Drops empty slots once they outnumber live ones, keeping paint order and
/// re-pointing `index` at the shifted slots.
fn compact<K, T>(slots: &mut Vec<Option<T>>, index: &mut HashMap<K, usize>, key_of: impl Fn(&T) -> K)
where
	K: Eq + Hash,
{
	if slots.len() - index.len() <= index.len() {
		return;
	}
	slots.retain(Option::is_some);
	for (slot, shape) in slots.iter().enumerate() {
		if let Some(shape) = shape {
			index.insert(key_of(shape), slot);
		}
	}
}

#[derive(Clone, Debug, Default)]
pub struct Scene {
	config: CanvasConfig,
	vertices: Vec<Option<VertexShape>>,
	vertex_slots: HashMap<VertexId, usize>,
	edges: Vec<Option<EdgeShape>>,
	edge_slots: HashMap<EdgeKey, usize>,
}

impl Scene {
	pub fn new(config: CanvasConfig) -> Self {
		Self {
			config,
			..Self::default()
		}
	}

	pub fn config(&self) -> &CanvasConfig {
		&self.config
	}

	pub fn clear(&mut self) {
		self.vertices.clear();
		self.vertex_slots.clear();
		self.edges.clear();
		self.edge_slots.clear();
	}

	/// Live vertex shapes in paint order.
	pub fn vertices(&self) -> impl Iterator<Item = &VertexShape> {
		self.vertices.iter().flatten()
	}

	pub fn edges(&self) -> impl Iterator<Item = &EdgeShape> {
		self.edges.iter().flatten()
	}

	pub fn vertex(&self, id: VertexId) -> Option<&VertexShape> {
		let slot = *self.vertex_slots.get(&id)?;
		self.vertices.get(slot)?.as_ref()
	}

	fn vertex_mut(&mut self, id: VertexId) -> Option<&mut VertexShape> {
		let slot = *self.vertex_slots.get(&id)?;
		self.vertices.get_mut(slot)?.as_mut()
	}

	pub fn edge(&self, u: VertexId, v: VertexId) -> Option<&EdgeShape> {
		let slot = *self.edge_slots.get(&EdgeKey::new(u, v))?;
		self.edges.get(slot)?.as_ref()
	}

	fn edge_mut(&mut self, key: EdgeKey) -> Option<&mut EdgeShape> {
		let slot = *self.edge_slots.get(&key)?;
		self.edges.get_mut(slot)?.as_mut()
	}

	pub fn position(&self, id: VertexId) -> Option<Point> {
		self.vertex(id).map(|shape| shape.center)
	}

	pub fn vertex_count(&self) -> usize {
		self.vertex_slots.len()
	}

	pub fn edge_count(&self) -> usize {
		self.edge_slots.len()
	}

	/// Places a vertex shape, replacing the one already drawn for `id`.
	pub fn add_vertex(&mut self, id: VertexId, label: &str, center: Point) {
		let shape = VertexShape {
			id,
			label: label.to_string(),
			center,
			selected: false,
			highlighted: false,
		};
		match self.vertex_slots.get(&id) {
			Some(&slot) => self.vertices[slot] = Some(shape),
			None => {
				self.vertex_slots.insert(id, self.vertices.len());
				self.vertices.push(Some(shape));
			}
		}
	}

	pub fn remove_vertex(&mut self, id: VertexId) -> Option<VertexShape> {
		let slot = self.vertex_slots.remove(&id)?;
		let shape = self.vertices.get_mut(slot)?.take();
		compact(&mut self.vertices, &mut self.vertex_slots, |shape| shape.id);
		shape
	}

	/// Moves a vertex and re-lays every edge that touches it.
	pub fn move_vertex(&mut self, id: VertexId, center: Point) -> bool {
		let Some(shape) = self.vertex_mut(id) else {
			return false;
		};
		shape.center = center;

		let label_offset = self.config.label_offset;
		let incident: Vec<EdgeKey> = self
			.edge_slots
			.keys()
			.filter(|key| key.touches(id))
			.copied()
			.collect();
		for key in incident {
			let (Some(start), Some(end)) = (self.position(key.lo), self.position(key.hi)) else {
				continue;
			};
			if let Some(edge) = self.edge_mut(key) {
				edge.relayout(start, end, label_offset);
			}
		}
		true
	}

	/// Draws `u -> v` (both orientations when `undirected`), reusing the shape
	/// already present for the pair in either orientation.
	pub fn upsert_edge(&mut self, u: VertexId, v: VertexId, weight: Weight, undirected: bool) -> bool {
		let key = EdgeKey::new(u, v);
		let (Some(start), Some(end)) = (self.position(key.lo), self.position(key.hi)) else {
			return false;
		};
		let label_offset = self.config.label_offset;
		let forward = undirected || u == key.lo;
		let backward = undirected || u == key.hi;

		if let Some(edge) = self.edge_mut(key) {
			edge.forward |= forward;
			edge.backward |= backward;
			edge.weight_text = weight_text(weight);
			edge.relayout(start, end, label_offset);
			return true;
		}

		let mut edge = EdgeShape {
			key,
			start,
			end,
			label_at: start,
			weight_text: weight_text(weight),
			forward,
			backward,
			highlighted: false,
		};
		edge.relayout(start, end, label_offset);
		self.edge_slots.insert(key, self.edges.len());
		self.edges.push(Some(edge));
		true
	}

	pub fn set_edge_weight(&mut self, u: VertexId, v: VertexId, weight: Weight) {
		if let Some(edge) = self.edge_mut(EdgeKey::new(u, v)) {
			edge.weight_text = weight_text(weight);
		}
	}

	/// Drops the `u -> v` orientation from a directed edge shape, leaving the
	/// reverse one drawn.
	pub fn drop_orientation(&mut self, u: VertexId, v: VertexId) {
		let key = EdgeKey::new(u, v);
		if let Some(edge) = self.edge_mut(key) {
			if u == key.lo {
				edge.forward = false;
			} else {
				edge.backward = false;
			}
		}
	}

	pub fn remove_edge(&mut self, u: VertexId, v: VertexId) -> Option<EdgeShape> {
		let slot = self.edge_slots.remove(&EdgeKey::new(u, v))?;
		let shape = self.edges.get_mut(slot)?.take();
		compact(&mut self.edges, &mut self.edge_slots, |edge| edge.key);
		shape
	}

	pub fn set_selected(&mut self, id: VertexId, selected: bool) {
		if let Some(shape) = self.vertex_mut(id) {
			shape.selected = selected;
		}
	}

	pub fn highlight_vertex(&mut self, id: VertexId) {
		if let Some(shape) = self.vertex_mut(id) {
			shape.highlighted = true;
		}
	}

	pub fn highlight_edge(&mut self, u: VertexId, v: VertexId) {
		if let Some(edge) = self.edge_mut(EdgeKey::new(u, v)) {
			edge.highlighted = true;
		}
	}

	pub fn clear_highlight(&mut self) {
		for shape in self.vertices.iter_mut().flatten() {
			shape.highlighted = false;
		}
		for edge in self.edges.iter_mut().flatten() {
			edge.highlighted = false;
		}
	}

	/// Topmost vertex whose disc contains `p`.
	pub fn vertex_at(&self, p: Point) -> Option<VertexId> {
		self.vertices
			.iter()
			.rev()
			.flatten()
			.find(|shape| shape.center.distance_to(p) <= self.config.vertex_radius)
			.map(|shape| shape.id)
	}

	/// Edge whose weight label or line lies under `p`; labels win over lines.
	pub fn edge_at(&self, p: Point) -> Option<EdgeKey> {
		let live = || self.edges.iter().rev().flatten();
		live()
			.find(|edge| {
				(p.x - edge.label_at.x).abs() <= self.config.label_half_width
					&& (p.y - edge.label_at.y).abs() <= self.config.label_half_height
			})
			.or_else(|| {
				live().find(|edge| {
					distance_to_segment(p, edge.start, edge.end) <= self.config.line_hit_tolerance
				})
			})
			.map(|edge| edge.key)
	}
}
