//! Table and field search over diagram nodes

use serde::{Deserialize, Serialize};

use crate::core::graph::GraphNode;

/// How a node should be drawn for the current query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HighlightState {
    /// No search active
    Normal,
    /// Label, a field name or a field type contains the query
    Matched,
    /// Search active but nothing matched
    Dimmed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeHighlight {
    pub id: String,
    pub state: HighlightState,
}

/// Case-insensitive match against the label, field names and field types
pub fn node_matches(node: &GraphNode, query: &str) -> bool {
    let query = query.to_lowercase();
    node.data.label.to_lowercase().contains(&query)
        || node
            .data
            .fields
            .iter()
            .any(|(name, ty)| name.to_lowercase().contains(&query) || ty.to_lowercase().contains(&query))
}

/// Highlight state per node, in input order.
///
/// A blank query clears the search and leaves every node [`HighlightState::Normal`].
pub fn search_nodes(nodes: &[GraphNode], query: &str) -> Vec<NodeHighlight> {
    let blank = query.trim().is_empty();
    let highlights: Vec<NodeHighlight> = nodes
        .iter()
        .map(|node| {
            let state = if blank {
                HighlightState::Normal
            } else if node_matches(node, query) {
                HighlightState::Matched
            } else {
                HighlightState::Dimmed
            };
            NodeHighlight {
                id: node.id.clone(),
                state,
            }
        })
        .collect();

    if !blank {
        tracing::debug!(
            "Search '{}' matched {} of {} tables",
            query,
            highlights
                .iter()
                .filter(|h| h.state == HighlightState::Matched)
                .count(),
            nodes.len()
        );
    }

    highlights
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::graph::schema_to_graph;
    use crate::core::sample::sample_schema;

    fn states(query: &str) -> Vec<(String, HighlightState)> {
        let graph = schema_to_graph(&sample_schema());
        search_nodes(&graph.nodes, query)
            .into_iter()
            .map(|h| (h.id, h.state))
            .collect()
    }

    fn matched(query: &str) -> Vec<String> {
        states(query)
            .into_iter()
            .filter(|(_, state)| *state == HighlightState::Matched)
            .map(|(id, _)| id)
            .collect()
    }

    #[test]
    fn test_blank_query_is_normal() {
        assert!(states("   ").iter().all(|(_, s)| *s == HighlightState::Normal));
        assert_eq!(states("").len(), 5);
    }

    #[test]
    fn test_label_match_is_case_insensitive() {
        assert_eq!(matched("ROLES"), vec!["roles"]);
    }

    #[test]
    fn test_field_name_match() {
        assert_eq!(matched("user_id"), vec!["orders"]);
    }

    #[test]
    fn test_field_type_match() {
        assert_eq!(matched("json"), vec!["roles"]);
        assert_eq!(matched("datetime"), vec!["users", "orders"]);
    }

    #[test]
    fn test_non_matching_nodes_are_dimmed() {
        let result = states("permissions");
        assert_eq!(result[1], ("roles".to_string(), HighlightState::Matched));
        assert_eq!(result[0], ("users".to_string(), HighlightState::Dimmed));
    }
}
