//! Street directory configuration.

use crate::{Cm, CoreError, CoreResult};

/// Build parameters for the street directory.
///
/// Typically assembled by the application and passed to
/// `StreetDirectory::init_with_config`.  The merge tolerances are empirical
/// values that make the source geometry connect; treat them as tunables.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DirectoryConfig {
    /// Grid cell width in cm.  Default: 100 000 (1 km).
    pub grid_width_cm: Cm,

    /// Grid cell height in cm.  Default: 80 000.
    pub grid_height_cm: Cm,

    /// Two synthetic driving vertices closer than this (on both axes) are
    /// merged.  Default: 50.
    pub driving_merge_tolerance_cm: Cm,

    /// Two walking vertices closer than this (on both axes) are merged.
    /// Coarse because sidewalk and crossing ends rarely coincide exactly;
    /// on narrow links this can join vertices that should stay apart.
    /// Default: 1 000.
    pub walking_merge_tolerance_cm: Cm,

    /// Collect `DirectoryStats` during init.
    pub keep_stats: bool,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            grid_width_cm:              100_000,
            grid_height_cm:             80_000,
            driving_merge_tolerance_cm: 50,
            walking_merge_tolerance_cm: 1_000,
            keep_stats:                 false,
        }
    }
}

impl DirectoryConfig {
    /// Default configuration with a custom grid cell size.
    pub fn with_grid(grid_width_cm: Cm, grid_height_cm: Cm) -> Self {
        Self { grid_width_cm, grid_height_cm, ..Self::default() }
    }

    /// Reject non-positive cell sizes and negative tolerances.
    pub fn validate(&self) -> CoreResult<()> {
        if self.grid_width_cm <= 0 || self.grid_height_cm <= 0 {
            return Err(CoreError::Config(format!(
                "grid cell size must be positive, got {} x {}",
                self.grid_width_cm, self.grid_height_cm
            )));
        }
        if self.driving_merge_tolerance_cm < 0 || self.walking_merge_tolerance_cm < 0 {
            return Err(CoreError::Config(format!(
                "merge tolerances must be non-negative, got driving={} walking={}",
                self.driving_merge_tolerance_cm, self.walking_merge_tolerance_cm
            )));
        }
        Ok(())
    }
}
