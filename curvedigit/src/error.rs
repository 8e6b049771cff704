use curvedigit_common::Axis;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DigitizeError {
    #[error("Reference clicks coincide on the {axis} axis (both at {coordinate} px); pick two distinct points")]
    DegenerateCalibration { axis: Axis, coordinate: f64 },

    #[error("Reference length must be a finite number, got {0}")]
    InvalidReferenceLength(f64),

    #[error("Curve has no points; the first click is the origin")]
    EmptyCurve,

    #[error("Scale factor for the {axis} axis must be finite and non-zero, got {value}")]
    InvalidScale { axis: Axis, value: f64 },

    #[error("Cannot {operation} while {state}")]
    OutOfSequence {
        operation: &'static str,
        state: &'static str,
    },

    #[error("Expected {expected} axis input, got {got} axis input")]
    AxisMismatch { expected: Axis, got: Axis },

    #[error("Script error: {0}")]
    Script(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialize error: {0}")]
    TomlDe(#[from] toml::de::Error),
}

pub type DigitizeResult<T> = Result<T, DigitizeError>;
