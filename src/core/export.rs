//! Export document: the schema plus the node positions of its diagram
//!
//! Shape: `{"schema": {...}, "layout": {"nodes": [{"id": ..., "position": {"x": ..., "y": ...}}]}}`

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::graph::{GraphNode, Position};
use crate::core::schema::Schema;

/// Saved position of one node
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct NodePosition {
    pub id: String,
    pub position: Position,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct ExportLayout {
    pub nodes: Vec<NodePosition>,
}

/// Exported diagram
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct ExportDocument {
    pub schema: Schema,
    pub layout: ExportLayout,
}

impl ExportDocument {
    pub fn new(schema: Schema, nodes: &[GraphNode]) -> Self {
        Self {
            schema,
            layout: ExportLayout {
                nodes: nodes
                    .iter()
                    .map(|node| NodePosition {
                        id: node.id.clone(),
                        position: node.position,
                    })
                    .collect(),
            },
        }
    }

    /// Pretty JSON with two-space indentation
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Restores saved positions onto `nodes` by id; ids missing from the
    /// document leave their node untouched
    pub fn apply_positions(&self, nodes: &mut [GraphNode]) {
        let saved: HashMap<&str, Position> = self
            .layout
            .nodes
            .iter()
            .map(|n| (n.id.as_str(), n.position))
            .collect();

        for node in nodes.iter_mut() {
            if let Some(position) = saved.get(node.id.as_str()) {
                node.position = *position;
            }
        }
    }
}

/// File name for an export of `source_id` made on `date`
pub fn export_file_name(source_id: &str, date: NaiveDate) -> String {
    format!("schemaflow-{}-{}.json", source_id, date.format("%Y-%m-%d"))
}

/// Where to write an export: inside `output` under [`export_file_name`] when
/// it is an existing directory, else `output` itself
pub fn export_path(output: &Path, source_id: &str, date: NaiveDate) -> PathBuf {
    if output.is_dir() {
        output.join(export_file_name(source_id, date))
    } else {
        output.to_path_buf()
    }
}
