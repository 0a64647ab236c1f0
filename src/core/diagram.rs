//! Schema -> positioned diagram pipeline

use crate::core::auto_layout::{Direction, LayoutConfig, compute_layout_with_config};
use crate::core::error::Result;
use crate::core::graph::{SchemaGraph, try_schema_to_graph};
use crate::core::schema::Schema;
use crate::core::validation::validate_schema;

/// Validates the schema, builds its graph and lays it out.
///
/// Fails with [`Error::InvalidSchema`](crate::core::Error::InvalidSchema)
/// carrying every validation message, so nothing is built from a broken schema.
pub fn build_diagram(
    schema: &Schema,
    direction: Direction,
    config: &LayoutConfig,
) -> Result<SchemaGraph> {
    validate_schema(schema).into_result()?;

    let graph = try_schema_to_graph(schema)?;
    let nodes = compute_layout_with_config(&graph.nodes, &graph.edges, direction, config);

    tracing::info!(
        "Diagram ready for '{}': {} tables, {} relations, direction {}",
        schema.metadata.name,
        nodes.len(),
        graph.edges.len(),
        direction
    );

    Ok(SchemaGraph {
        nodes,
        edges: graph.edges,
    })
}
