use thiserror::Error;

/// Contract violations. Malformed graph data is absorbed, never reported here.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LayoutError {
    #[error("viewport must have finite positive dimensions, got {width}x{height}")]
    InvalidViewport { width: f32, height: f32 },

    #[error("invalid layout config `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },
}
