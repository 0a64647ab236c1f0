//! Auto-layout module for automatic table arrangement
//!
//! Tables are arranged in levels by reachability along relations:
//! - **Roots**: tables that no relation points at (or the first table when
//!   every table has an incoming relation)
//! - **Levels**: depth-first discovery depth from the root that reaches a
//!   table first; every table is levelled at most once
//! - **Slots**: order of discovery within a level
//!
//! Levels become columns (`LR`) or rows (`TB`); siblings are stacked across
//! the other axis. Tables no root reaches keep the origin.

use std::collections::{HashMap, HashSet};
use std::str::FromStr;

use petgraph::Direction::{Incoming, Outgoing};
use petgraph::graphmap::DiGraphMap;
use serde::{Deserialize, Serialize};

use crate::core::error::Error;
use crate::core::graph::{GraphEdge, GraphNode, Position};

/// Axis along which levels advance
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    /// Left to right: levels are columns
    #[default]
    #[serde(rename = "LR")]
    Lr,
    /// Top to bottom: levels are rows
    #[serde(rename = "TB")]
    Tb,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Lr => write!(f, "LR"),
            Direction::Tb => write!(f, "TB"),
        }
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LR" => Ok(Direction::Lr),
            "TB" => Ok(Direction::Tb),
            _ => Err(Error::InvalidDirection(s.to_string())),
        }
    }
}

/// Layout configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Horizontal distance between neighbouring grid cells
    pub x_spacing: f64,
    /// Vertical distance between neighbouring grid cells
    pub y_spacing: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            x_spacing: 300.0,
            y_spacing: 150.0,
        }
    }
}

/// Result of auto-layout calculation
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayoutResult {
    /// Node ids per level, in discovery order
    pub levels: Vec<Vec<String>>,
    /// Positions of every levelled id
    pub positions: HashMap<String, Position>,
}

impl LayoutResult {
    pub fn level_of(&self, id: &str) -> Option<usize> {
        self.levels
            .iter()
            .position(|level| level.iter().any(|member| member == id))
    }

    pub fn position_of(&self, id: &str) -> Option<Position> {
        self.positions.get(id).copied()
    }
}

type Adjacency<'a> = DiGraphMap<&'a str, ()>;

/// Adjacency keyed by node id; outgoing neighbours keep edge order
fn build_adjacency<'a>(nodes: &'a [GraphNode], edges: &'a [GraphEdge]) -> Adjacency<'a> {
    let mut graph = Adjacency::new();
    for node in nodes {
        graph.add_node(node.id.as_str());
    }
    for edge in edges {
        graph.add_edge(edge.source.as_str(), edge.target.as_str(), ());
    }
    graph
}

/// Nodes with no incoming edge, in declaration order.
///
/// Falls back to the first node when every node has an incoming edge.
fn find_roots<'a>(nodes: &'a [GraphNode], adjacency: &Adjacency<'a>) -> Vec<&'a str> {
    let mut roots: Vec<&str> = nodes
        .iter()
        .map(|n| n.id.as_str())
        .filter(|id| adjacency.neighbors_directed(*id, Incoming).next().is_none())
        .collect();

    if roots.is_empty()
        && let Some(first) = nodes.first()
    {
        tracing::debug!("No root table found, starting from '{}'", first.id);
        roots.push(first.id.as_str());
    }

    roots
}

/// Depth-first level assignment from each root in turn
fn assign_levels<'a>(roots: &[&'a str], adjacency: &Adjacency<'a>) -> Vec<Vec<&'a str>> {
    let mut visited: HashSet<&str> = HashSet::new();
    let mut levels: Vec<Vec<&str>> = Vec::new();

    for &root in roots {
        let mut stack = vec![(root, 0usize)];

        while let Some((id, level)) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }

            if levels.len() <= level {
                levels.resize_with(level + 1, Vec::new);
            }
            levels[level].push(id);

            // Reverse so the first edge is explored first
            let children: Vec<&str> = adjacency.neighbors_directed(id, Outgoing).collect();
            stack.extend(children.into_iter().rev().map(|child| (child, level + 1)));
        }
    }

    levels
}

/// Computes levels and grid positions for a graph
pub fn calculate_layered_layout(
    nodes: &[GraphNode],
    edges: &[GraphEdge],
    direction: Direction,
    config: &LayoutConfig,
) -> LayoutResult {
    let adjacency = build_adjacency(nodes, edges);
    let roots = find_roots(nodes, &adjacency);
    let levels = assign_levels(&roots, &adjacency);

    let mut positions = HashMap::new();
    for (level, members) in levels.iter().enumerate() {
        for (slot, id) in members.iter().enumerate() {
            let (level, slot) = (level as f64, slot as f64);
            let position = match direction {
                Direction::Lr => Position::new(level * config.x_spacing, slot * config.y_spacing),
                Direction::Tb => Position::new(slot * config.x_spacing, level * config.y_spacing),
            };
            positions.insert(id.to_string(), position);
        }
    }

    let unplaced = nodes
        .iter()
        .filter(|n| !positions.contains_key(&n.id))
        .count();
    tracing::debug!(
        "Layered layout ({}): {} roots, {} levels, {} unreachable nodes",
        direction,
        roots.len(),
        levels.len(),
        unplaced
    );

    LayoutResult {
        levels: levels
            .into_iter()
            .map(|members| members.into_iter().map(str::to_string).collect())
            .collect(),
        positions,
    }
}

/// Applies the calculated layout; nodes without a level go to the origin
pub fn apply_layout(nodes: &mut [GraphNode], layout: &LayoutResult) {
    for node in nodes.iter_mut() {
        node.position = layout.position_of(&node.id).unwrap_or_default();
    }
}

/// Lays out a copy of `nodes` with the default spacing
pub fn compute_layout(
    nodes: &[GraphNode],
    edges: &[GraphEdge],
    direction: Direction,
) -> Vec<GraphNode> {
    compute_layout_with_config(nodes, edges, direction, &LayoutConfig::default())
}

/// Lays out a copy of `nodes` with custom spacing
pub fn compute_layout_with_config(
    nodes: &[GraphNode],
    edges: &[GraphEdge],
    direction: Direction,
    config: &LayoutConfig,
) -> Vec<GraphNode> {
    let layout = calculate_layered_layout(nodes, edges, direction, config);
    let mut laid_out = nodes.to_vec();
    apply_layout(&mut laid_out, &layout);
    laid_out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::graph::placeholder_position;
    use crate::core::schema::{FieldMap, RelationKind};

    fn nodes(ids: &[&str]) -> Vec<GraphNode> {
        ids.iter()
            .enumerate()
            .map(|(i, id)| {
                let p = placeholder_position(i);
                GraphNode::new(*id, FieldMap::new()).with_position(p.x, p.y)
            })
            .collect()
    }

    fn edges(pairs: &[(&str, &str)]) -> Vec<GraphEdge> {
        pairs
            .iter()
            .enumerate()
            .map(|(i, (s, t))| GraphEdge::new(format!("e{}", i), *s, *t, RelationKind::BelongsTo))
            .collect()
    }

    fn position(nodes: &[GraphNode], id: &str) -> (f64, f64) {
        let node = nodes.iter().find(|n| n.id == id).unwrap();
        (node.position.x, node.position.y)
    }

    fn shop() -> (Vec<GraphNode>, Vec<GraphEdge>) {
        (
            nodes(&["users", "roles", "products", "orders", "order_items"]),
            edges(&[
                ("users", "roles"),
                ("orders", "users"),
                ("order_items", "orders"),
                ("order_items", "products"),
            ]),
        )
    }

    #[test]
    fn test_empty_graph() {
        let result = calculate_layered_layout(&[], &[], Direction::Lr, &LayoutConfig::default());
        assert!(result.levels.is_empty());
        assert!(result.positions.is_empty());
        assert!(compute_layout(&[], &[], Direction::Tb).is_empty());
    }

    #[test]
    fn test_single_table() {
        let laid_out = compute_layout(&nodes(&["users"]), &[], Direction::Lr);
        assert_eq!(position(&laid_out, "users"), (0.0, 0.0));
    }

    #[test]
    fn test_layout_config_default() {
        let config = LayoutConfig::default();
        assert_eq!(config.x_spacing, 300.0);
        assert_eq!(config.y_spacing, 150.0);
    }

    #[test]
    fn test_shop_levels() {
        let (nodes, edges) = shop();
        let result = calculate_layered_layout(&nodes, &edges, Direction::Lr, &LayoutConfig::default());

        assert_eq!(
            result.levels,
            vec![
                vec!["order_items".to_string()],
                vec!["orders".to_string(), "products".to_string()],
                vec!["users".to_string()],
                vec!["roles".to_string()],
            ]
        );
        assert_eq!(result.level_of("roles"), Some(3));
    }

    #[test]
    fn test_shop_left_to_right() {
        let (nodes, edges) = shop();
        let laid_out = compute_layout(&nodes, &edges, Direction::Lr);

        assert_eq!(position(&laid_out, "order_items"), (0.0, 0.0));
        assert_eq!(position(&laid_out, "orders"), (300.0, 0.0));
        assert_eq!(position(&laid_out, "products"), (300.0, 150.0));
        assert_eq!(position(&laid_out, "users"), (600.0, 0.0));
        assert_eq!(position(&laid_out, "roles"), (900.0, 0.0));

        // Node order and payload are preserved
        let ids: Vec<_> = laid_out.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["users", "roles", "products", "orders", "order_items"]);
    }

    #[test]
    fn test_shop_top_to_bottom() {
        let (nodes, edges) = shop();
        let laid_out = compute_layout(&nodes, &edges, Direction::Tb);

        assert_eq!(position(&laid_out, "order_items"), (0.0, 0.0));
        assert_eq!(position(&laid_out, "orders"), (0.0, 150.0));
        assert_eq!(position(&laid_out, "products"), (300.0, 150.0));
        assert_eq!(position(&laid_out, "users"), (0.0, 300.0));
        assert_eq!(position(&laid_out, "roles"), (0.0, 450.0));
    }

    #[test]
    fn test_direction_swaps_axes_with_equal_spacing() {
        let (nodes, edges) = shop();
        let config = LayoutConfig {
            x_spacing: 200.0,
            y_spacing: 200.0,
        };
        let lr = compute_layout_with_config(&nodes, &edges, Direction::Lr, &config);
        let tb = compute_layout_with_config(&nodes, &edges, Direction::Tb, &config);

        for (a, b) in lr.iter().zip(tb.iter()) {
            assert_eq!(a.position.x, b.position.y, "node {}", a.id);
            assert_eq!(a.position.y, b.position.x, "node {}", a.id);
        }
    }

    #[test]
    fn test_no_relations_single_column() {
        let laid_out = compute_layout(&nodes(&["a", "b", "c"]), &[], Direction::Lr);
        assert_eq!(position(&laid_out, "a"), (0.0, 0.0));
        assert_eq!(position(&laid_out, "b"), (0.0, 150.0));
        assert_eq!(position(&laid_out, "c"), (0.0, 300.0));

        let laid_out = compute_layout(&nodes(&["a", "b", "c"]), &[], Direction::Tb);
        assert_eq!(position(&laid_out, "c"), (600.0, 0.0));
    }

    #[test]
    fn test_cycle_falls_back_to_first_node() {
        let laid_out = compute_layout(
            &nodes(&["a", "b", "c"]),
            &edges(&[("a", "b"), ("b", "c"), ("c", "a")]),
            Direction::Lr,
        );
        assert_eq!(position(&laid_out, "a"), (0.0, 0.0));
        assert_eq!(position(&laid_out, "b"), (300.0, 0.0));
        assert_eq!(position(&laid_out, "c"), (600.0, 0.0));
    }

    #[test]
    fn test_second_cyclic_component_stays_unlevelled() {
        let nodes = nodes(&["a", "b", "c", "d"]);
        let edges = edges(&[("a", "b"), ("b", "a"), ("c", "d"), ("d", "c")]);
        let result = calculate_layered_layout(&nodes, &edges, Direction::Lr, &LayoutConfig::default());

        assert_eq!(result.level_of("c"), None);
        assert_eq!(result.level_of("d"), None);

        let laid_out = compute_layout(&nodes, &edges, Direction::Lr);
        assert_eq!(position(&laid_out, "b"), (300.0, 0.0));
        assert_eq!(position(&laid_out, "c"), (0.0, 0.0));
        assert_eq!(position(&laid_out, "d"), (0.0, 0.0));
    }

    #[test]
    fn test_first_discovery_wins() {
        // c is reached at depth 2 via b before the direct a -> c edge
        let nodes = nodes(&["a", "b", "c"]);
        let edges = edges(&[("a", "b"), ("b", "c"), ("a", "c")]);
        let result = calculate_layered_layout(&nodes, &edges, Direction::Lr, &LayoutConfig::default());

        assert_eq!(result.level_of("b"), Some(1));
        assert_eq!(result.level_of("c"), Some(2));
    }

    #[test]
    fn test_later_root_skips_visited_nodes() {
        let nodes = nodes(&["a", "x", "shared", "leaf"]);
        let edges = edges(&[("a", "shared"), ("x", "shared"), ("x", "leaf")]);
        let result = calculate_layered_layout(&nodes, &edges, Direction::Lr, &LayoutConfig::default());

        assert_eq!(
            result.levels,
            vec![
                vec!["a".to_string(), "x".to_string()],
                vec!["shared".to_string(), "leaf".to_string()],
            ]
        );
    }

    #[test]
    fn test_dangling_target_takes_a_slot() {
        let nodes = nodes(&["a", "b"]);
        let edges = edges(&[("a", "ghost"), ("a", "b")]);
        let laid_out = compute_layout(&nodes, &edges, Direction::Lr);

        assert_eq!(laid_out.len(), 2);
        assert_eq!(position(&laid_out, "b"), (300.0, 150.0));
    }

    #[test]
    fn test_self_loop_is_not_a_root() {
        let nodes = nodes(&["a", "b"]);
        let edges = edges(&[("a", "a"), ("b", "a")]);
        let result = calculate_layered_layout(&nodes, &edges, Direction::Lr, &LayoutConfig::default());

        assert_eq!(result.level_of("b"), Some(0));
        assert_eq!(result.level_of("a"), Some(1));
    }

    #[test]
    fn test_custom_spacing() {
        let (nodes, edges) = shop();
        let config = LayoutConfig {
            x_spacing: 10.0,
            y_spacing: 5.0,
        };
        let laid_out = compute_layout_with_config(&nodes, &edges, Direction::Lr, &config);
        assert_eq!(position(&laid_out, "products"), (10.0, 5.0));
        assert_eq!(position(&laid_out, "roles"), (30.0, 0.0));
    }

    #[test]
    fn test_apply_layout_resets_unplaced_nodes() {
        let mut nodes = nodes(&["a", "b", "c", "d"]);
        let layout = LayoutResult {
            levels: vec![vec!["a".to_string()]],
            positions: HashMap::from([("a".to_string(), Position::new(500.0, 300.0))]),
        };

        apply_layout(&mut nodes, &layout);

        assert_eq!(position(&nodes, "a"), (500.0, 300.0));
        // d had a non-zero placeholder before
        assert_eq!(position(&nodes, "d"), (0.0, 0.0));
    }

    #[test]
    fn test_direction_parse() {
        assert_eq!("LR".parse::<Direction>().unwrap(), Direction::Lr);
        assert_eq!("tb".parse::<Direction>().unwrap(), Direction::Tb);
        assert!(matches!(
            "diagonal".parse::<Direction>(),
            Err(Error::InvalidDirection(_))
        ));
        assert_eq!(Direction::Tb.to_string(), "TB");
        assert_eq!(serde_json::to_string(&Direction::Lr).unwrap(), "\"LR\"");
    }
}
