//! Layered placement of a prerequisite graph.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::config::LayoutConfig;
use crate::TechGraph;

/// A placed tech.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TechNode {
    pub name: String,
    pub row: usize,
    pub column: usize,
    pub x: f64,
    pub y: f64,
}

/// A prerequisite relation: `from` must be researched before `to`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct TechEdge {
    pub from: String,
    pub to: String,
}

/// Line endpoints for drawing one edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EdgeAnchor {
    pub from: (f64, f64),
    pub to: (f64, f64),
}

/// Result of [`TechGraph::layout`].
#[derive(Debug, Clone, Serialize)]
pub struct TechLayout {
    /// Placed techs in placement order.
    pub nodes: Vec<TechNode>,
    /// One edge per prerequisite of every tech, including prerequisites that
    /// were never placed.
    pub edges: Vec<TechEdge>,
    /// Number of rows used.
    pub rows: usize,
    /// Techs whose prerequisites can never be satisfied (cycles or unknown
    /// techs), ascending by name. Empty for a complete layout.
    pub unplaced: Vec<String>,
    #[serde(skip)]
    index: BTreeMap<String, usize>,
    #[serde(skip)]
    config: LayoutConfig,
}

impl TechLayout {
    pub fn position(&self, name: &str) -> Option<&TechNode> {
        self.index.get(name).map(|&i| &self.nodes[i])
    }

    pub fn is_complete(&self) -> bool {
        self.unplaced.is_empty()
    }

    /// Total drawing height.
    pub fn height(&self) -> f64 {
        self.rows as f64 * self.config.row_height
    }

    /// Drawing endpoints for every edge whose ends were both placed, in edge
    /// order.
    pub fn edge_anchors(&self) -> Vec<EdgeAnchor> {
        let (dx, dy) = (self.config.anchor_offset_x, self.config.anchor_offset_y);
        self.edges
            .iter()
            .filter_map(|edge| {
                let from = self.position(&edge.from)?;
                let to = self.position(&edge.to)?;
                Some(EdgeAnchor {
                    from: (from.x + dx, from.y + dy),
                    to: (to.x + dx, to.y),
                })
            })
            .collect()
    }
}

impl TechGraph {
    /// Place every tech whose prerequisites can be satisfied.
    ///
    /// Each round takes every remaining tech whose prerequisites are all
    /// placed (in name order) and fills rows of `columns_per_row`. A layer
    /// always starts on a fresh row, so a tech's row is strictly greater
    /// than the rows of its prerequisites. Stops when a round finds nothing
    /// to place.
    pub fn layout(&self, config: &LayoutConfig) -> TechLayout {
        let columns = config.columns_per_row.max(1);
        let mut done: BTreeSet<&str> = BTreeSet::new();
        let mut remaining: BTreeSet<&str> = self.names().collect();
        let mut nodes = Vec::with_capacity(remaining.len());
        let mut row = 0;

        loop {
            let layer: Vec<&str> = remaining
                .iter()
                .copied()
                .filter(|name| {
                    self.prerequisites(name)
                        .into_iter()
                        .flatten()
                        .all(|p| done.contains(p.as_str()))
                })
                .collect();
            if layer.is_empty() {
                break;
            }

            for (i, &name) in layer.iter().enumerate() {
                let node_row = row + i / columns;
                let column = i % columns;
                let offset = if config.stagger && node_row % 2 == 1 { 0.5 } else { 0.0 };
                nodes.push(TechNode {
                    name: name.to_string(),
                    row: node_row,
                    column,
                    x: (column as f64 + offset) * config.column_width,
                    y: node_row as f64 * config.row_height,
                });
            }
            row += layer.len().div_ceil(columns);

            for name in layer {
                remaining.remove(name);
                done.insert(name);
            }
        }

        let unplaced: Vec<String> = remaining.into_iter().map(str::to_string).collect();
        if !unplaced.is_empty() {
            tracing::warn!(
                count = unplaced.len(),
                first = %unplaced[0],
                "tech layout stopped with unsatisfiable prerequisites"
            );
        }

        let index = nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (node.name.clone(), i))
            .collect();

        TechLayout {
            nodes,
            edges: self.edges(),
            rows: row,
            unplaced,
            index,
            config: config.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(techs: &[(&str, &[&str])]) -> TechGraph {
        let mut g = TechGraph::new();
        for (name, prereqs) in techs {
            g.insert(name, prereqs.iter().copied()).unwrap();
        }
        g
    }

    // -----------------------------------------------------------------------
    // Layering
    // -----------------------------------------------------------------------

    #[test]
    fn chain_takes_one_row_per_tech() {
        let g = graph(&[("c", &["b"]), ("b", &["a"]), ("a", &[])]);
        let l = g.layout(&LayoutConfig::default());
        assert!(l.is_complete());
        assert_eq!(l.rows, 3);
        assert_eq!(l.position("a").unwrap().row, 0);
        assert_eq!(l.position("b").unwrap().row, 1);
        assert_eq!(l.position("c").unwrap().row, 2);
    }

    #[test]
    fn layer_in_name_order() {
        let g = graph(&[("zeta", &[]), ("alpha", &[]), ("mid", &[])]);
        let l = g.layout(&LayoutConfig::default());
        let names: Vec<&str> = l.nodes.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "mid", "zeta"]);
        assert_eq!(l.position("zeta").unwrap().column, 2);
    }

    #[test]
    fn wide_layer_wraps_and_next_layer_starts_fresh() {
        let mut techs: Vec<(String, Vec<&str>)> =
            (0..8).map(|i| (format!("t{i}"), vec![])).collect();
        techs.push(("z".to_string(), vec!["t0"]));
        let mut g = TechGraph::new();
        for (name, prereqs) in &techs {
            g.insert(name, prereqs.iter().copied()).unwrap();
        }

        let l = g.layout(&LayoutConfig::default());
        assert_eq!(l.position("t5").unwrap().row, 0);
        assert_eq!(l.position("t6").unwrap().row, 1);
        assert_eq!(l.position("t6").unwrap().column, 0);
        assert_eq!(l.position("t7").unwrap().column, 1);
        // partial second row of the first layer still advances the row
        assert_eq!(l.position("z").unwrap().row, 2);
        assert_eq!(l.rows, 3);
    }

    #[test]
    fn odd_rows_are_staggered() {
        let g = graph(&[("a", &[]), ("b", &["a"])]);
        let l = g.layout(&LayoutConfig::default());
        let a = l.position("a").unwrap();
        let b = l.position("b").unwrap();
        assert_eq!((a.x, a.y), (0.0, 0.0));
        assert_eq!((b.x, b.y), (125.0, 300.0));

        let flat = g.layout(&LayoutConfig {
            stagger: false,
            ..LayoutConfig::default()
        });
        assert_eq!(flat.position("b").unwrap().x, 0.0);
    }

    #[test]
    fn empty_graph() {
        let l = TechGraph::new().layout(&LayoutConfig::default());
        assert!(l.nodes.is_empty());
        assert!(l.is_complete());
        assert_eq!(l.height(), 0.0);
    }

    // -----------------------------------------------------------------------
    // Partial layouts
    // -----------------------------------------------------------------------

    #[test]
    fn cycle_is_left_unplaced() {
        let g = graph(&[("root", &[]), ("x", &["y"]), ("y", &["x"]), ("after", &["root"])]);
        let l = g.layout(&LayoutConfig::default());
        assert!(!l.is_complete());
        assert_eq!(l.unplaced, vec!["x", "y"]);
        assert!(l.position("root").is_some());
        assert!(l.position("after").is_some());
        assert!(l.position("x").is_none());
    }

    #[test]
    fn unknown_prerequisite_is_left_unplaced() {
        let g = graph(&[("a", &["ghost"])]);
        let l = g.layout(&LayoutConfig::default());
        assert_eq!(l.unplaced, vec!["a"]);
        assert_eq!(l.rows, 0);
        assert_eq!(l.edges.len(), 1);
        assert!(l.edge_anchors().is_empty());
    }

    // -----------------------------------------------------------------------
    // Edges and geometry
    // -----------------------------------------------------------------------

    #[test]
    fn edges_and_anchors() {
        let g = graph(&[("a", &[]), ("b", &[]), ("c", &["a", "b"])]);
        let l = g.layout(&LayoutConfig::default());
        assert_eq!(
            l.edges,
            vec![
                TechEdge { from: "a".into(), to: "c".into() },
                TechEdge { from: "b".into(), to: "c".into() },
            ]
        );
        let anchors = l.edge_anchors();
        assert_eq!(anchors.len(), 2);
        assert_eq!(anchors[0].from, (64.0, 200.0));
        assert_eq!(anchors[0].to, (125.0 + 64.0, 300.0));
        assert_eq!(anchors[1].from, (250.0 + 64.0, 200.0));
    }

    #[test]
    fn height_counts_rows() {
        let g = graph(&[("a", &[]), ("b", &["a"])]);
        let l = g.layout(&LayoutConfig {
            row_height: 100.0,
            ..LayoutConfig::default()
        });
        assert_eq!(l.height(), 200.0);
    }
}
