//! Coadd - weighted, bitmask-aware accumulation of masked exposures.
//!
//! Each exposure is a signal, mask and variance plane already aligned to the
//! coadd grid. Accumulation adds signal and variance, ORs in the mask flags
//! and adds the exposure weight to a coverage map, skipping every pixel whose
//! mask intersects a bad-pixel mask. Once all exposures are in, pixels that
//! never received positive weight get an edge (no-data) flag.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use coadd::{CoaddBuilder, CoaddConfig};
//!
//! let config = CoaddConfig::from_file("coadd.yaml".as_ref())?;
//! let mut builder = CoaddBuilder::new(dimensions, &config)?;
//! for (exposure, weight) in &exposures {
//!     builder.add_exposure(exposure, *weight)?;
//! }
//! let result = builder.finish();
//! println!("{:.1}% covered", result.coverage_fraction() * 100.0);
//! ```

pub mod accumulate;
pub mod builder;
pub mod config;
pub mod coverage;
mod error;
pub mod mask_planes;
mod masked_image;

#[cfg(test)]
pub(crate) mod testing;

pub mod prelude;

// ============================================================================
// Core types
// ============================================================================

pub use common::{Dimensions, Plane, PlaneSizeError};
pub use error::{ConfigError, Error, Result};
pub use mask_planes::{MASK_BITS, MaskPlanes};
pub use masked_image::{MaskPixel, MaskedImage, PlanesMut};

// ============================================================================
// Operations
// ============================================================================

pub use accumulate::{AccumulateStats, Accumulated, add_to_coadd, added_to_coadd};
pub use coverage::{is_covered, set_coadd_edge_bits};

// ============================================================================
// Build session and configuration
// ============================================================================

pub use builder::{CoaddBuilder, CoaddResult, coadd_exposures};
pub use config::{CoaddConfig, ResolvedMasks};
