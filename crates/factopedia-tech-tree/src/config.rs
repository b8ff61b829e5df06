//! Layout geometry.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::TechTreeError;

/// Grid and drawing constants for the tech tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Techs per row before a layer wraps.
    pub columns_per_row: usize,
    pub column_width: f64,
    pub row_height: f64,
    /// Shift odd rows right by half a column.
    pub stagger: bool,
    /// Edge attachment point relative to a node's top-left corner. Edges
    /// leave a prerequisite at `(x, y) + (anchor_offset_x, anchor_offset_y)`
    /// and enter the dependent at `(x + anchor_offset_x, y)`.
    pub anchor_offset_x: f64,
    pub anchor_offset_y: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            columns_per_row: 6,
            column_width: 250.0,
            row_height: 300.0,
            stagger: true,
            anchor_offset_x: 64.0,
            anchor_offset_y: 200.0,
        }
    }
}

impl LayoutConfig {
    /// Read a layout config file (RON, TOML or JSON). Missing fields take
    /// their defaults.
    pub fn load(path: &Path) -> Result<Self, TechTreeError> {
        let config: Self = factopedia_data::loader::deserialize_file(path)?;
        if config.columns_per_row == 0 {
            return Err(TechTreeError::InvalidConfig("columns_per_row must be at least 1"));
        }
        Ok(config)
    }
}
