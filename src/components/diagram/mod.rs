//! Interactive node diagram: nodes that can be dragged, edges that follow
//! them, and a pannable, zoomable view.

mod component;
pub mod drag;
pub mod edges;
mod render;
pub mod scene;
pub mod state;
pub mod store;
pub mod transform;
pub mod types;
pub mod view;

pub use component::DiagramCanvas;
pub use state::{DiagramEvent, DiagramState, Propagation};
pub use types::{DiagramConfig, DiagramData, DiagramLink, DiagramNode};
