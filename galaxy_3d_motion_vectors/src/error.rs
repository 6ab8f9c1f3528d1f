//! Error types for the Galaxy3D motion vector stage
//!
//! Errors are reserved for host misuse (out-of-order stage calls, malformed
//! meshes, unknown keys). Runtime degradations such as a first frame, a frame
//! gap, a preview camera or missing culling parameters are never errors.

use std::fmt;

/// Result type for motion vector operations
pub type Result<T> = std::result::Result<T, Error>;

/// Motion vector stage errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Invalid resource (mesh, material, deformation, render instance key, etc.)
    InvalidResource(String),

    /// Operation called in the wrong stage state (e.g. `end()` before `begin()`)
    InvalidState(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InvalidState(msg) => write!(f, "Invalid state: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
