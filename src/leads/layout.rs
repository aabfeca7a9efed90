//! Fixed 12-lead sheet layout
//!
//! Splits the raster into a 4x3 grid. Rows 1-3 hold the limb and augmented
//! leads (I/II/III left, aVR/aVL/aVF middle, V1/V2/V3 right) and row 4 holds
//! V4, V5 and V6 in the left, middle and right thirds. This is the layout of
//! the printed sheets the tool accepts, not a general grid detector.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::layout::{GRID_COLUMNS, GRID_ROWS, LEAD_NAMES};
use crate::error::{AnalysisError, Result};

/// Standard ECG lead
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Lead {
    I,
    II,
    III,
    #[serde(rename = "aVR")]
    AVR,
    #[serde(rename = "aVL")]
    AVL,
    #[serde(rename = "aVF")]
    AVF,
    V1,
    V2,
    V3,
    V4,
    V5,
    V6,
}

impl Lead {
    /// All leads in reporting order
    pub const ALL: [Lead; 12] = [
        Lead::I,
        Lead::II,
        Lead::III,
        Lead::AVR,
        Lead::AVL,
        Lead::AVF,
        Lead::V1,
        Lead::V2,
        Lead::V3,
        Lead::V4,
        Lead::V5,
        Lead::V6,
    ];

    /// Conventional lead name ("aVR", "V4", ...)
    pub fn name(&self) -> &'static str {
        LEAD_NAMES[*self as usize]
    }

    /// Parse a conventional lead name
    pub fn from_name(name: &str) -> Option<Lead> {
        LEAD_NAMES
            .iter()
            .position(|candidate| *candidate == name)
            .map(|index| Lead::ALL[index])
    }

    /// (row, column) cell of this lead in the sheet grid
    pub fn grid_cell(&self) -> (u32, u32) {
        match self {
            Lead::I => (0, 0),
            Lead::II => (1, 0),
            Lead::III => (2, 0),
            Lead::AVR => (0, 1),
            Lead::AVL => (1, 1),
            Lead::AVF => (2, 1),
            Lead::V1 => (0, 2),
            Lead::V2 => (1, 2),
            Lead::V3 => (2, 2),
            Lead::V4 => (3, 0),
            Lead::V5 => (3, 1),
            Lead::V6 => (3, 2),
        }
    }
}

impl fmt::Display for Lead {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Rectangle of the raster holding one lead's trace
///
/// Rows `top..bottom` and columns `left..right` (half-open).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadRegion {
    pub lead: Lead,
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

impl LeadRegion {
    pub fn width(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    pub fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }

    /// Region covers no pixels
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }
}

/// The twelve lead regions of one raster
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadLayout {
    regions: [LeadRegion; 12],
}

impl LeadLayout {
    /// Region assigned to `lead`
    pub fn region(&self, lead: Lead) -> &LeadRegion {
        &self.regions[lead as usize]
    }

    /// Regions in reporting order
    pub fn regions(&self) -> &[LeadRegion] {
        &self.regions
    }
}

/// Maps the fixed sheet layout onto raster coordinates
#[derive(Debug, Clone, Default)]
pub struct LeadPartitioner;

impl LeadPartitioner {
    pub fn new() -> Self {
        Self
    }

    /// Partition a `width` x `height` raster into the twelve lead regions
    ///
    /// Row height is `height / 4` and column width is `width / 3` (integer
    /// division). The bottom row extends to the last raster row; columns end
    /// at `3 * column_width`, so up to two trailing raster columns belong to
    /// no lead.
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidDimensionsError` if either dimension is zero.
    pub fn partition(&self, width: u32, height: u32) -> Result<LeadLayout> {
        if width == 0 || height == 0 {
            return Err(AnalysisError::InvalidDimensionsError { width, height });
        }

        let row_height = height / GRID_ROWS;
        let column_width = width / GRID_COLUMNS;

        let regions = Lead::ALL.map(|lead| {
            let (row, column) = lead.grid_cell();
            let top = row * row_height;
            let bottom = if row + 1 == GRID_ROWS {
                height
            } else {
                (row + 1) * row_height
            };
            LeadRegion {
                lead,
                top,
                bottom,
                left: column * column_width,
                right: (column + 1) * column_width,
            }
        });

        log::debug!(
            "Partitioned {}x{} raster: row height {}, column width {}",
            width,
            height,
            row_height,
            column_width
        );

        Ok(LeadLayout { regions })
    }
}
