//! Error types for level layout generation

use thiserror::Error;

/// Errors that can occur while configuring or generating a layout
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    /// A grid was requested with a non-positive dimension
    #[error("invalid grid size: {width}x{height} (both dimensions must be positive)")]
    InvalidGridSize {
        /// Requested width
        width: i32,
        /// Requested height
        height: i32,
    },
    /// Configuration validation failed
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// A direction vector was not one of the four axis-aligned unit vectors
    #[error("invalid direction ({x}, {y}): expected an axis-aligned unit vector")]
    InvalidDirection {
        /// X component of the rejected vector
        x: f32,
        /// Y component of the rejected vector
        y: f32,
    },
}

/// Result type alias for layout operations
pub type Result<T> = std::result::Result<T, LayoutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = LayoutError::InvalidGridSize { width: 0, height: 4 };
        assert_eq!(
            err.to_string(),
            "invalid grid size: 0x4 (both dimensions must be positive)"
        );

        let err = LayoutError::InvalidConfig("cluster count".to_string());
        assert_eq!(err.to_string(), "invalid configuration: cluster count");
    }
}
