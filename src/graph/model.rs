use std::collections::{BTreeMap, HashMap};

use crate::error::GraphError;

pub type VertexId = u32;
pub type Weight = f64;

/// Neighbor id to edge weight, per source vertex.
pub type Adjacency = BTreeMap<VertexId, BTreeMap<VertexId, Weight>>;

const FIRST_ID: VertexId = 1;

#[derive(Clone, Debug, PartialEq)]
pub struct Vertex {
	pub id: VertexId,
	pub name: String,
}

/// Weighted graph keyed by monotonically assigned vertex ids.
///
/// Undirected graphs store every edge twice, once per orientation, and every
/// mutator writes or removes both entries together.
#[derive(Clone, Debug)]
pub struct Graph {
	undirected: bool,
	vertices: BTreeMap<VertexId, Vertex>,
	adjacency: Adjacency,
	by_name: HashMap<String, VertexId>,
	next_id: VertexId,
}

fn check_weight(w: Weight) -> Result<(), GraphError> {
	if w.is_finite() && w >= 0.0 {
		Ok(())
	} else {
		Err(GraphError::InvalidWeight(w))
	}
}

impl Graph {
	pub fn new(undirected: bool) -> Self {
		Self {
			undirected,
			vertices: BTreeMap::new(),
			adjacency: BTreeMap::new(),
			by_name: HashMap::new(),
			next_id: FIRST_ID,
		}
	}

	pub fn is_undirected(&self) -> bool {
		self.undirected
	}

	/// Adds a vertex under the next unused id. Fails once the id space is
	/// exhausted rather than handing out an id twice.
	pub fn add_vertex(&mut self, name: Option<&str>) -> Result<VertexId, GraphError> {
		let id = self.next_id;
		self.next_id = id.checked_add(1).ok_or(GraphError::IdOutOfRange(id))?;
		let name = match name {
			Some(name) => name.to_string(),
			None => format!("V{id}"),
		};
		self.insert_vertex(id, name);
		Ok(id)
	}

	/// Inserts a vertex under a caller-chosen id, as when restoring a snapshot.
	/// Later auto-assigned ids always land after `id`, so `VertexId::MAX` is
	/// refused.
	pub fn add_vertex_explicit(&mut self, id: VertexId, name: &str) -> Result<(), GraphError> {
		let after = id.checked_add(1).ok_or(GraphError::IdOutOfRange(id))?;
		self.insert_vertex(id, name.to_string());
		self.next_id = self.next_id.max(after);
		Ok(())
	}

	fn insert_vertex(&mut self, id: VertexId, name: String) {
		if let Some(old) = self.vertices.get(&id) {
			if self.by_name.get(&old.name) == Some(&id) {
				self.by_name.remove(&old.name);
			}
		}
		self.by_name.insert(name.clone(), id);
		self.vertices.insert(id, Vertex { id, name });
		self.adjacency.entry(id).or_default();
	}

	/// Writes `u -> v` (and `v -> u` when undirected), replacing any existing weight.
	pub fn add_edge(&mut self, u: VertexId, v: VertexId, w: Weight) -> Result<(), GraphError> {
		for id in [u, v] {
			if !self.vertices.contains_key(&id) {
				return Err(GraphError::InvalidReference(id));
			}
		}
		check_weight(w)?;
		self.adjacency.entry(u).or_default().insert(v, w);
		if self.undirected {
			self.adjacency.entry(v).or_default().insert(u, w);
		}
		Ok(())
	}

	pub fn has_edge(&self, u: VertexId, v: VertexId) -> bool {
		self.adjacency
			.get(&u)
			.is_some_and(|bucket| bucket.contains_key(&v))
	}

	pub fn edge_weight(&self, u: VertexId, v: VertexId) -> Option<Weight> {
		self.adjacency.get(&u)?.get(&v).copied()
	}

	pub fn update_edge_weight(
		&mut self,
		u: VertexId,
		v: VertexId,
		w: Weight,
	) -> Result<(), GraphError> {
		check_weight(w)?;
		if !self.has_edge(u, v) {
			return Err(GraphError::EdgeNotFound(u, v));
		}
		self.adjacency.entry(u).or_default().insert(v, w);
		if self.undirected {
			self.adjacency.entry(v).or_default().insert(u, w);
		}
		Ok(())
	}

	pub fn remove_edge(&mut self, u: VertexId, v: VertexId) {
		if let Some(bucket) = self.adjacency.get_mut(&u) {
			bucket.remove(&v);
		}
		if self.undirected {
			if let Some(bucket) = self.adjacency.get_mut(&v) {
				bucket.remove(&u);
			}
		}
	}

	/// Removes a vertex along with every edge touching it.
	///
	/// The returned list holds each removed directed entry, outgoing pairs
	/// `(id, v)` first and incoming pairs `(u, id)` after. An undirected edge
	/// therefore shows up twice, once per stored orientation.
	pub fn remove_vertex(&mut self, id: VertexId) -> Vec<(VertexId, VertexId)> {
		let Some(vertex) = self.vertices.remove(&id) else {
			return Vec::new();
		};
		if self.by_name.get(&vertex.name) == Some(&id) {
			self.by_name.remove(&vertex.name);
		}

		let mut removed: Vec<(VertexId, VertexId)> = self
			.adjacency
			.remove(&id)
			.map(|bucket| bucket.into_keys().map(|v| (id, v)).collect())
			.unwrap_or_default();

		for (&u, bucket) in self.adjacency.iter_mut() {
			if bucket.remove(&id).is_some() {
				removed.push((u, id));
			}
		}
		removed
	}

	pub fn vertex_id_by_name(&self, name: &str) -> Option<VertexId> {
		self.by_name.get(name).copied()
	}

	pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
		self.vertices.get(&id)
	}

	/// Live vertices in ascending id order.
	pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
		self.vertices.values()
	}

	pub fn vertex_count(&self) -> usize {
		self.vertices.len()
	}

	pub fn is_empty(&self) -> bool {
		self.vertices.is_empty()
	}

	pub fn adjacency(&self) -> &Adjacency {
		&self.adjacency
	}

	pub fn clear(&mut self) {
		self.vertices.clear();
		self.adjacency.clear();
		self.by_name.clear();
		self.next_id = FIRST_ID;
	}
}

impl Default for Graph {
	fn default() -> Self {
		Self::new(true)
	}
}
