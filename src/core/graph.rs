//! Conversion of a schema into diagram nodes and edges
//!
//! One node per table and one edge per relation, both in declaration order.
//! Nodes get a provisional grid position that the layout engine replaces.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::schema::{FieldMap, RelationKind, Schema};

/// Node type tag for tables
pub const TABLE_NODE_TYPE: &str = "table";

/// Edge type tag for relations
pub const RELATION_EDGE_TYPE: &str = "relation";

/// Columns of the provisional grid
const PLACEHOLDER_COLUMNS: usize = 3;
const PLACEHOLDER_X_STEP: f64 = 250.0;
const PLACEHOLDER_Y_STEP: f64 = 200.0;

/// Position on the canvas
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Payload rendered inside a table node
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct NodeData {
    pub label: String,
    pub fields: FieldMap,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Graph node - a table of the schema
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct GraphNode {
    /// Table name
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub data: NodeData,
    pub position: Position,
}

impl GraphNode {
    pub fn new(id: impl Into<String>, fields: FieldMap) -> Self {
        let id = id.into();
        Self {
            data: NodeData {
                label: id.clone(),
                fields,
                kind: TABLE_NODE_TYPE.to_string(),
                description: None,
            },
            id,
            node_type: TABLE_NODE_TYPE.to_string(),
            position: Position::default(),
        }
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.position = Position::new(x, y);
        self
    }
}

/// Relation details carried by an edge
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EdgeData {
    pub relation_type: RelationKind,
    pub source_field: String,
    pub target_field: String,
}

/// Graph edge - a relation between two tables
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub label: String,
    #[serde(rename = "type")]
    pub edge_type: String,
    pub data: EdgeData,
}

impl GraphEdge {
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
        relation_type: RelationKind,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            label: relation_type.to_string(),
            edge_type: RELATION_EDGE_TYPE.to_string(),
            data: EdgeData {
                relation_type,
                source_field: String::new(),
                target_field: String::new(),
            },
        }
    }
}

/// Nodes and edges produced from a schema
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct SchemaGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl SchemaGraph {
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn edge(&self, id: &str) -> Option<&GraphEdge> {
        self.edges.iter().find(|e| e.id == id)
    }
}

/// Provisional position for the table at `index`
pub fn placeholder_position(index: usize) -> Position {
    Position::new(
        PLACEHOLDER_X_STEP * (index % PLACEHOLDER_COLUMNS) as f64,
        PLACEHOLDER_Y_STEP * (index / PLACEHOLDER_COLUMNS) as f64,
    )
}

/// Builds the diagram graph of a schema.
///
/// Total over any schema: empty field sets and dangling relation endpoints
/// are carried into the graph as-is, so run
/// [`validate_schema`](crate::core::validate_schema) first. Repeated table
/// names produce colliding node ids; use [`try_schema_to_graph`] to reject them.
pub fn schema_to_graph(schema: &Schema) -> SchemaGraph {
    let nodes: Vec<GraphNode> = schema
        .tables
        .iter()
        .enumerate()
        .map(|(index, table)| GraphNode {
            id: table.name.clone(),
            node_type: TABLE_NODE_TYPE.to_string(),
            data: NodeData {
                label: table.label().to_string(),
                fields: table.fields.to_map(),
                kind: TABLE_NODE_TYPE.to_string(),
                description: table.description.clone(),
            },
            position: placeholder_position(index),
        })
        .collect();

    let mut ids = HashSet::new();
    for node in &nodes {
        if !ids.insert(node.id.as_str()) {
            tracing::warn!("Node id '{}' is used by more than one table", node.id);
        }
    }

    let edges: Vec<GraphEdge> = schema
        .relations
        .iter()
        .enumerate()
        .map(|(index, relation)| GraphEdge {
            id: format!("e{}", index),
            source: relation.source.clone(),
            target: relation.target.clone(),
            label: relation.label(),
            edge_type: RELATION_EDGE_TYPE.to_string(),
            data: EdgeData {
                relation_type: relation.kind,
                source_field: relation.source_field.clone(),
                target_field: relation.target_field.clone(),
            },
        })
        .collect();

    tracing::debug!(
        "Built graph for schema '{}': {} nodes, {} edges",
        schema.metadata.name,
        nodes.len(),
        edges.len()
    );

    SchemaGraph { nodes, edges }
}

/// Like [`schema_to_graph`] but fails with
/// [`Error::DuplicateTable`](crate::core::Error::DuplicateTable) when two
/// tables share a name
pub fn try_schema_to_graph(schema: &Schema) -> Result<SchemaGraph> {
    schema.ensure_unique_tables()?;
    Ok(schema_to_graph(schema))
}
