//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use coadd::prelude::*;
//! ```

pub use crate::{Dimensions, MaskPixel, MaskedImage, Plane};

pub use crate::{AccumulateStats, add_to_coadd, added_to_coadd, set_coadd_edge_bits};

pub use crate::{CoaddBuilder, CoaddConfig, CoaddResult, Error, MaskPlanes, coadd_exposures};
