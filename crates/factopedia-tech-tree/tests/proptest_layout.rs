//! Property-based tests for the tech tree layout.
//!
//! Generates random prerequisite graphs (acyclic, or with arbitrary extra
//! edges) and checks the layering invariants.

use factopedia_tech_tree::{LayoutConfig, TechGraph};
use proptest::prelude::*;
use std::collections::BTreeSet;

// ===========================================================================
// Generators
// ===========================================================================

/// A DAG over `t0..tn`: each tech may only require lower-numbered techs.
fn arb_dag(max_techs: usize) -> impl Strategy<Value = TechGraph> {
    (1..=max_techs).prop_flat_map(|n| {
        proptest::collection::vec(proptest::collection::vec(any::<prop::sample::Index>(), 0..4), n)
            .prop_map(move |picks| {
                let mut graph = TechGraph::new();
                for (i, picks) in picks.iter().enumerate() {
                    let prereqs: BTreeSet<String> = if i == 0 {
                        BTreeSet::new()
                    } else {
                        picks.iter().map(|p| format!("t{}", p.index(i))).collect()
                    };
                    graph
                        .insert(&format!("t{i}"), prereqs)
                        .expect("lower-numbered prerequisites are never self");
                }
                graph
            })
    })
}

/// Any graph over `t0..tn`, cycles allowed (self-edges excluded).
fn arb_graph(max_techs: usize) -> impl Strategy<Value = TechGraph> {
    (2..=max_techs).prop_flat_map(|n| {
        proptest::collection::vec(proptest::collection::vec(0..n, 0..3), n).prop_map(
            move |edges| {
                let mut graph = TechGraph::new();
                for (i, targets) in edges.iter().enumerate() {
                    let prereqs: BTreeSet<String> = targets
                        .iter()
                        .filter(|&&t| t != i)
                        .map(|t| format!("t{t}"))
                        .collect();
                    graph
                        .insert(&format!("t{i}"), prereqs)
                        .expect("self edges filtered");
                }
                graph
            },
        )
    })
}

fn arb_config() -> impl Strategy<Value = LayoutConfig> {
    (1usize..8, any::<bool>()).prop_map(|(columns_per_row, stagger)| LayoutConfig {
        columns_per_row,
        stagger,
        ..LayoutConfig::default()
    })
}

// ===========================================================================
// Properties
// ===========================================================================

proptest! {
    #[test]
    fn dag_places_everything(graph in arb_dag(40), config in arb_config()) {
        let layout = graph.layout(&config);
        prop_assert!(layout.is_complete());
        prop_assert_eq!(layout.nodes.len(), graph.len());
    }

    #[test]
    fn rows_increase_along_edges(graph in arb_graph(30), config in arb_config()) {
        let layout = graph.layout(&config);
        for node in &layout.nodes {
            for prereq in graph.prerequisites(&node.name).into_iter().flatten() {
                let p = layout.position(prereq);
                prop_assert!(p.is_some(), "placed {} has unplaced prerequisite {}", node.name, prereq);
                prop_assert!(p.is_some_and(|p| p.row < node.row));
            }
        }
    }

    #[test]
    fn roots_fill_the_first_rows(graph in arb_dag(40), config in arb_config()) {
        let layout = graph.layout(&config);
        let roots = graph
            .names()
            .filter(|n| graph.prerequisites(n).is_some_and(BTreeSet::is_empty))
            .count();
        let root_rows = roots.div_ceil(config.columns_per_row);
        for node in &layout.nodes {
            let is_root = graph.prerequisites(&node.name).is_some_and(BTreeSet::is_empty);
            prop_assert_eq!(is_root, node.row < root_rows);
        }
    }

    #[test]
    fn placed_and_unplaced_partition(graph in arb_graph(30), config in arb_config()) {
        let layout = graph.layout(&config);
        prop_assert_eq!(layout.nodes.len() + layout.unplaced.len(), graph.len());
        for name in &layout.unplaced {
            prop_assert!(layout.position(name).is_none());
        }
    }

    #[test]
    fn columns_stay_in_range(graph in arb_dag(40), config in arb_config()) {
        let layout = graph.layout(&config);
        for node in &layout.nodes {
            prop_assert!(node.column < config.columns_per_row);
            prop_assert_eq!(node.y, node.row as f64 * config.row_height);
        }
    }
}
