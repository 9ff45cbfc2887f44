use crate::error::GraphError;
use crate::graph::{VertexId, Weight};

pub const VERTEX_RADIUS: f64 = 18.0;
pub const LABEL_OFFSET: f64 = 10.0;
pub const LINE_HIT_TOLERANCE: f64 = 5.0;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	pub fn offset_from(self, other: Point) -> Point {
		Point::new(self.x - other.x, self.y - other.y)
	}

	pub fn distance_to(self, other: Point) -> f64 {
		let (dx, dy) = (self.x - other.x, self.y - other.y);
		(dx * dx + dy * dy).sqrt()
	}

	pub fn midpoint(self, other: Point) -> Point {
		Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
	}
}

/// Which gesture a primary click on the canvas performs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
	#[default]
	AddVertex,
	AddEdge,
	Move,
}

impl Mode {
	pub const ALL: [Mode; 3] = [Mode::AddVertex, Mode::AddEdge, Mode::Move];

	pub fn label(self) -> &'static str {
		match self {
			Mode::AddVertex => "Add vertex",
			Mode::AddEdge => "Add edge",
			Mode::Move => "Move",
		}
	}

	pub fn hint(self) -> &'static str {
		match self {
			Mode::AddVertex => {
				"Vertex mode: click the canvas to place vertices. Right-click a vertex to delete it."
			}
			Mode::AddEdge => {
				"Edge mode: click two vertices, then enter a weight. Right-click an edge for its menu."
			}
			Mode::Move => "Move mode: drag vertices with the mouse.",
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Drag {
	pub vertex: VertexId,
	/// Pointer position minus vertex center at press time.
	pub offset: Point,
}

/// Mode plus the transient state that only makes sense inside it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Interaction {
	AddVertex,
	AddEdge { pending_from: Option<VertexId> },
	Move { drag: Option<Drag> },
}

impl Interaction {
	pub fn idle(mode: Mode) -> Self {
		match mode {
			Mode::AddVertex => Interaction::AddVertex,
			Mode::AddEdge => Interaction::AddEdge { pending_from: None },
			Mode::Move => Interaction::Move { drag: None },
		}
	}

	pub fn mode(&self) -> Mode {
		match self {
			Interaction::AddVertex => Mode::AddVertex,
			Interaction::AddEdge { .. } => Mode::AddEdge,
			Interaction::Move { .. } => Mode::Move,
		}
	}
}

/// Unordered vertex pair; both orientations of an edge map to the same key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey {
	pub lo: VertexId,
	pub hi: VertexId,
}

impl EdgeKey {
	pub fn new(u: VertexId, v: VertexId) -> Self {
		Self {
			lo: u.min(v),
			hi: u.max(v),
		}
	}

	pub fn touches(&self, id: VertexId) -> bool {
		self.lo == id || self.hi == id
	}
}

/// What a secondary click landed on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ContextTarget {
	Vertex(VertexId),
	Edge(VertexId, VertexId),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EdgeOutcome {
	/// First endpoint chosen.
	Pending(VertexId),
	/// Same vertex clicked twice.
	Cancelled,
	/// The weight prompt was dismissed; the first endpoint stays selected.
	PromptCancelled,
	Duplicate { from: VertexId, to: VertexId },
	Created {
		from: VertexId,
		to: VertexId,
		weight: Weight,
	},
}

#[derive(Clone, Debug, PartialEq)]
pub enum PointerOutcome {
	Ignored,
	VertexCreated(VertexId),
	Edge(EdgeOutcome),
	DragStarted(VertexId),
	/// The press asked for a change the graph refused; nothing was applied.
	Rejected(GraphError),
}

#[derive(Clone, Debug, PartialEq)]
pub enum PathOutcome {
	MissingEndpoints,
	SameEndpoints,
	Unreachable,
	Found {
		distance: Weight,
		path: Vec<VertexId>,
		names: Vec<String>,
	},
}

/// Source of edge weights, normally a modal dialog. `None` means the user
/// cancelled.
pub trait WeightPrompt {
	fn ask_weight(&mut self, current: Option<Weight>) -> Option<Weight>;
}

impl<F> WeightPrompt for F
where
	F: FnMut(Option<Weight>) -> Option<Weight>,
{
	fn ask_weight(&mut self, current: Option<Weight>) -> Option<Weight> {
		self(current)
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
	pub canvas_bg: String,
	pub node_fill: String,
	pub node_fill_active: String,
	pub node_border: String,
	pub node_text: String,
	pub select: String,
	pub edge: String,
	pub edge_text: String,
	pub accent: String,
}

impl Default for Palette {
	fn default() -> Self {
		Self {
			canvas_bg: "#1a1a2e".to_string(),
			node_fill: "#2b2d42".to_string(),
			node_fill_active: "#3d5a80".to_string(),
			node_border: "#8d99ae".to_string(),
			node_text: "#edf2f4".to_string(),
			select: "#ffd166".to_string(),
			edge: "rgba(100, 180, 255, 0.6)".to_string(),
			edge_text: "#c9d6ea".to_string(),
			accent: "#ef476f".to_string(),
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct CanvasConfig {
	pub vertex_radius: f64,
	/// Weight labels sit this far above the edge midpoint.
	pub label_offset: f64,
	pub line_hit_tolerance: f64,
	pub label_half_width: f64,
	pub label_half_height: f64,
	pub palette: Palette,
}

impl Default for CanvasConfig {
	fn default() -> Self {
		Self {
			vertex_radius: VERTEX_RADIUS,
			label_offset: LABEL_OFFSET,
			line_hit_tolerance: LINE_HIT_TOLERANCE,
			label_half_width: 14.0,
			label_half_height: 9.0,
			palette: Palette::default(),
		}
	}
}
