mod component;
mod render;
mod scene;
mod state;
pub mod types;

pub use component::GraphEditor;
pub use scene::Scene;
pub use state::GraphCanvasState;
