//! Coadd configuration: which flags disqualify a pixel and which flag marks no-data.

use std::path::Path;

use common::FileFormat;
use common::bits::is_single_bit;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::mask_planes::{self, MaskPlanes};
use crate::masked_image::MaskPixel;

/// Configuration for a coadd build.
///
/// Flags are named rather than given as raw bits so the same file works with
/// any mask plane dictionary. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoaddConfig {
    /// Planes that exclude a source pixel from the coadd when set.
    pub bad_mask_planes: Vec<String>,
    /// Plane stamped onto coadd pixels that received no weight.
    pub edge_mask_plane: String,
    /// Name-to-bit dictionary used to resolve the two fields above.
    pub mask_planes: MaskPlanes,
}

impl Default for CoaddConfig {
    fn default() -> Self {
        Self {
            bad_mask_planes: vec![
                mask_planes::BAD.to_string(),
                mask_planes::SAT.to_string(),
                mask_planes::CR.to_string(),
            ],
            edge_mask_plane: mask_planes::EDGE.to_string(),
            mask_planes: MaskPlanes::default(),
        }
    }
}

/// Bit values resolved from a [`CoaddConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedMasks {
    /// Source pixels with any of these bits set do not contribute.
    pub bad_pixel_mask: MaskPixel,
    /// Bit(s) stamped onto coadd pixels with no positive weight.
    pub edge_bit: MaskPixel,
}

impl CoaddConfig {
    /// Replace the list of disqualifying planes.
    pub fn with_bad_mask_planes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.bad_mask_planes = names.into_iter().map(Into::into).collect();
        self
    }

    /// Set the plane used to flag pixels without coverage.
    pub fn with_edge_mask_plane(mut self, name: impl Into<String>) -> Self {
        self.edge_mask_plane = name.into();
        self
    }

    /// Replace the mask plane dictionary.
    pub fn with_mask_planes(mut self, mask_planes: MaskPlanes) -> Self {
        self.mask_planes = mask_planes;
        self
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        serde_yml::from_str(text).map_err(|e| ConfigError::Yaml(e).into())
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| ConfigError::Json(e).into())
    }

    /// Load from a `.yaml`/`.yml` or `.json` file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let format = FileFormat::from_path(path).map_err(ConfigError::from)?;
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        match format {
            FileFormat::Yaml => Self::from_yaml(&text),
            FileFormat::Json => Self::from_json(&text),
        }
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yml::to_string(self).map_err(|e| ConfigError::Yaml(e).into())
    }

    /// Look up every configured plane name in the dictionary.
    pub fn resolve(&self) -> Result<ResolvedMasks> {
        let bad_pixel_mask = self.mask_planes.bit_mask_of(&self.bad_mask_planes)?;
        let edge_bit = self.mask_planes.plane_bit_mask(&self.edge_mask_plane)?;

        if bad_pixel_mask & edge_bit != 0 {
            // Legal, but an exposure carrying the edge flag would then never
            // contribute anywhere it is set.
            tracing::warn!(
                edge_plane = %self.edge_mask_plane,
                "Edge plane is also listed as a bad mask plane"
            );
        }
        debug_assert!(is_single_bit(u64::from(edge_bit)));

        Ok(ResolvedMasks {
            bad_pixel_mask,
            edge_bit,
        })
    }
}
