//! Error types for coadd operations.

use std::io;
use std::path::PathBuf;

use common::Dimensions;
use common::file_format::FileExtensionError;
use thiserror::Error;

use crate::mask_planes::MASK_BITS;

/// Errors reported by accumulation, coverage stamping and session setup.
///
/// Every check runs before any plane is touched, so an `Err` always means the
/// inputs were left exactly as they were.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{plane} is {actual}, expected {expected}")]
    DimensionMismatch {
        plane: &'static str,
        expected: Dimensions,
        actual: Dimensions,
    },

    #[error("Weight must be finite and non-negative, got {weight}")]
    InvalidWeight { weight: f32 },

    #[error("Unknown mask plane '{name}'")]
    UnknownMaskPlane { name: String },

    #[error("No free mask bit left for plane '{name}'")]
    MaskPlanesExhausted { name: String },

    #[error("Mask plane '{name}' uses bit {bit}, mask pixels only have {} bits", MASK_BITS)]
    MaskBitOutOfRange { name: String, bit: u32 },

    #[error("Mask planes '{first}' and '{second}' both use bit {bit}")]
    DuplicateMaskBit {
        first: String,
        second: String,
        bit: u32,
    },

    #[error("No exposures provided for coadd")]
    EmptySequence,

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors raised while loading a [`CoaddConfig`](crate::CoaddConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Format(#[from] FileExtensionError),

    #[error("Invalid YAML config: {0}")]
    Yaml(#[from] serde_yml::Error),

    #[error("Invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Fail with [`Error::DimensionMismatch`] unless `actual == expected`.
#[inline]
pub(crate) fn ensure_dimensions(
    plane: &'static str,
    expected: Dimensions,
    actual: Dimensions,
) -> Result<()> {
    if actual == expected {
        Ok(())
    } else {
        Err(Error::DimensionMismatch {
            plane,
            expected,
            actual,
        })
    }
}
