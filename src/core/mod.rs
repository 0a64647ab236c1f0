//! Core domain models and transformations for schema diagrams

pub mod auto_layout;
pub mod config;
pub mod diagram;
mod error;
pub mod export;
mod graph;
pub mod sample;
mod schema;
pub mod search;
mod validation;

pub use auto_layout::{
    Direction, LayoutConfig, LayoutResult, apply_layout, calculate_layered_layout,
    compute_layout, compute_layout_with_config,
};
pub use config::{Config, parse_spacing};
pub use diagram::build_diagram;
pub use error::{Error, Result};
pub use export::{ExportDocument, ExportLayout, NodePosition, export_file_name, export_path};
pub use graph::*;
pub use sample::sample_schema;
pub use schema::*;
pub use search::{HighlightState, NodeHighlight, search_nodes};
pub use validation::{ValidationResult, validate_schema};
