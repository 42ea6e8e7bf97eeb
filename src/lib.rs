//! Force-directed layout for concept graphs: an overview of every concept,
//! and a radial focus view around one concept with its neighbors on rings.

pub mod config;
pub mod error;
pub mod focus;
pub mod geometry;
pub mod graph;
pub mod layout;
pub mod physics;
pub mod session;
pub mod source;

pub use config::{FocusAnchor, LayoutConfig, SpringConfig, SpringsByKind};
pub use error::LayoutError;
pub use focus::{Neighborhood, Ring, compute_neighborhood, is_visible};
pub use geometry::{Polar, Vec2, Viewport};
pub use graph::{ConceptGraph, ConceptNode, Edge, EdgeKind, LayoutNode, NodeKind};
pub use layout::{run_focus_layout, run_overview_layout};
pub use physics::{ForceParams, compute_forces};
pub use session::{LayoutSession, RunMode, create_layout_session};
pub use source::{load_graph, parse_graph};
