//! A coadd build session: accumulate exposures, then finalize coverage once.


use common::{Dimensions, Plane};

use crate::accumulate::{AccumulateStats, add_to_coadd};
use crate::config::{CoaddConfig, ResolvedMasks};
use crate::coverage::stamp_edge_bits;
use crate::error::{Error, Result, ensure_dimensions};
use crate::masked_image::{MaskPixel, MaskedImage};

/// Owns the coadd planes and weight map for the duration of one build.
///
/// Accumulation takes `&mut self`, so a single builder is never written from
/// two places at once. [`finish`](Self::finish) consumes the builder; the
/// finalized mask cannot be accumulated into again.
#[derive(Debug)]
pub struct CoaddBuilder {
    coadd: MaskedImage,
    weight_map: Plane<f32>,
    masks: ResolvedMasks,
    exposure_count: usize,
    excluded_pixels: usize,
}

/// Finished coadd plus summary counts.
#[derive(Debug, Clone, PartialEq)]
pub struct CoaddResult {
    pub coadd: MaskedImage,
    pub weight_map: Plane<f32>,
    /// Exposures accumulated, including zero-weight ones.
    pub exposure_count: usize,
    /// Pixels stamped with the edge flag.
    pub no_data_pixels: usize,
    /// Source pixels skipped across all exposures.
    pub excluded_pixels: usize,
}

impl CoaddResult {
    /// Fraction of coadd pixels with positive weight. `1.0` for an empty plane.
    pub fn coverage_fraction(&self) -> f64 {
        let total = self.weight_map.len();
        if total == 0 {
            return 1.0;
        }
        (total - self.no_data_pixels) as f64 / total as f64
    }
}

impl CoaddBuilder {
    /// Start from a zeroed coadd and weight map.
    pub fn new(dimensions: Dimensions, config: &CoaddConfig) -> Result<Self> {
        Self::from_parts(
            MaskedImage::new(dimensions),
            Plane::new_default(dimensions),
            config,
        )
    }

    /// Resume from an existing coadd and weight map.
    pub fn from_parts(
        coadd: MaskedImage,
        weight_map: Plane<f32>,
        config: &CoaddConfig,
    ) -> Result<Self> {
        ensure_dimensions("weight map", coadd.dimensions(), weight_map.dimensions())?;
        let masks = config.resolve()?;

        tracing::debug!(
            dimensions = %coadd.dimensions(),
            bad_pixel_mask = format_args!("{:#06x}", masks.bad_pixel_mask),
            edge_bit = format_args!("{:#06x}", masks.edge_bit),
            "Starting coadd"
        );

        Ok(Self {
            coadd,
            weight_map,
            masks,
            exposure_count: 0,
            excluded_pixels: 0,
        })
    }

    pub fn dimensions(&self) -> Dimensions {
        self.coadd.dimensions()
    }

    pub fn masks(&self) -> ResolvedMasks {
        self.masks
    }

    pub fn exposure_count(&self) -> usize {
        self.exposure_count
    }

    /// Running coadd. The edge flag is not applied until [`finish`](Self::finish).
    pub fn coadd(&self) -> &MaskedImage {
        &self.coadd
    }

    pub fn weight_map(&self) -> &Plane<f32> {
        &self.weight_map
    }

    /// Accumulate an exposure using the configured bad-pixel mask.
    pub fn add_exposure(&mut self, exposure: &MaskedImage, weight: f32) -> Result<AccumulateStats> {
        self.add_exposure_with_mask(exposure, self.masks.bad_pixel_mask, weight)
    }

    /// Accumulate an exposure with a bad-pixel mask chosen for this call.
    pub fn add_exposure_with_mask(
        &mut self,
        exposure: &MaskedImage,
        bad_pixel_mask: MaskPixel,
        weight: f32,
    ) -> Result<AccumulateStats> {
        let stats = add_to_coadd(
            &mut self.coadd,
            &mut self.weight_map,
            exposure,
            bad_pixel_mask,
            weight,
        )?;
        self.exposure_count += 1;
        self.excluded_pixels += stats.excluded;
        Ok(stats)
    }

    /// Stamp the edge flag on uncovered pixels and hand back the planes.
    pub fn finish(self) -> CoaddResult {
        let Self {
            mut coadd,
            weight_map,
            masks,
            exposure_count,
            excluded_pixels,
        } = self;

        // Dimensions were checked on construction and planes never resize.
        let no_data_pixels = stamp_edge_bits(coadd.mask_mut(), &weight_map, masks.edge_bit);

        tracing::info!(
            dimensions = %coadd.dimensions(),
            exposure_count,
            no_data_pixels,
            excluded_pixels,
            "Coadd finished"
        );

        CoaddResult {
            coadd,
            weight_map,
            exposure_count,
            no_data_pixels,
            excluded_pixels,
        }
    }
}

/// Build a coadd from `(exposure, weight)` pairs in iteration order.
pub fn coadd_exposures<'a, I>(
    dimensions: Dimensions,
    config: &CoaddConfig,
    exposures: I,
) -> Result<CoaddResult>
where
    I: IntoIterator<Item = (&'a MaskedImage, f32)>,
{
    let mut builder = CoaddBuilder::new(dimensions, config)?;
    for (exposure, weight) in exposures {
        builder.add_exposure(exposure, weight)?;
    }
    if builder.exposure_count() == 0 {
        return Err(Error::EmptySequence);
    }
    Ok(builder.finish())
}
