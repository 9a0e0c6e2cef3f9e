// Constants module - centralized default values for configuration
//
// This module defines all default values used throughout the codebase.
// Using constants instead of magic numbers improves maintainability
// and makes it easier to understand and modify defaults.

// =============================================================================
// Server defaults
// =============================================================================

/// Default bind address
pub const DEFAULT_ADDRESS: &str = "0.0.0.0";

/// Default listen port
pub const DEFAULT_PORT: u16 = 8080;

/// Default maximum request body size (10 MB)
pub const DEFAULT_MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

// =============================================================================
// Transformation defaults
// =============================================================================

/// Default maximum decoded source pixels (100 megapixels, image bomb protection)
pub const DEFAULT_MAX_SOURCE_PIXELS: u64 = 100_000_000;

/// Fixed bounding box for the thumbnail command (width, height)
pub const THUMBNAIL_SIZE: (u32, u32) = (50, 50);
