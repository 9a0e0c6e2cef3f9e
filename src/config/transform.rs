//! Transformation pipeline configuration.
//!
//! Limits applied before pixel work starts. The thumbnail bounding box
//! is fixed and not configurable.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_MAX_SOURCE_PIXELS;

fn default_max_source_pixels() -> u64 {
    DEFAULT_MAX_SOURCE_PIXELS
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformConfig {
    /// Maximum decoded source pixels, image bomb protection (default: 100 MP)
    #[serde(default = "default_max_source_pixels")]
    pub max_source_pixels: u64,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            max_source_pixels: default_max_source_pixels(),
        }
    }
}
