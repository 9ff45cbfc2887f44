//! Graph data model, vertex naming and the shortest-path engine. Nothing in
//! here touches the browser.

mod model;
pub mod naming;
mod shortest_path;

pub use model::{Graph, VertexId, Weight};
pub use shortest_path::shortest_path;
