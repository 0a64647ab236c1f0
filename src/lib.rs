//! Schemaflow - database schema diagrams
//!
//! Turns a schema description (tables, fields, relations) into a node/edge
//! graph, validates it, and computes a layered layout for rendering.

pub mod core;

pub use crate::core::{
    Direction, Error, LayoutConfig, Result, Schema, SchemaGraph, ValidationResult,
    build_diagram, compute_layout, schema_to_graph, validate_schema,
};
