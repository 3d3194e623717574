//! Weighted, bitmask-aware accumulation of one exposure into a coadd.
//!
//! For every pixel where `(exposure.mask & bad_pixel_mask) == 0`:
//!
//! - `coadd.image += exposure.image`
//! - `coadd.variance += exposure.variance`
//! - `coadd.mask |= exposure.mask`
//! - `weight_map += weight`
//!
//! Excluded pixels keep the exact bit pattern of all four planes. The work is
//! split into chunks processed in parallel, each by an SSE2 or scalar kernel.

mod cpu;
mod scalar;

#[cfg(target_arch = "x86_64")]
mod sse;


use common::Plane;
use common::parallel::{chunk_count, pixel_chunk_size};

use crate::error::{Error, Result, ensure_dimensions};
use crate::masked_image::{MaskPixel, MaskedImage};

/// Per-call pixel counts reported by the accumulator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccumulateStats {
    /// Pixels visited.
    pub pixels: usize,
    /// Pixels skipped because a bad-pixel flag was set.
    pub excluded: usize,
}

impl AccumulateStats {
    /// Pixels that were added to the coadd.
    #[inline]
    pub fn contributed(&self) -> usize {
        self.pixels - self.excluded
    }
}

/// Output of [`added_to_coadd`].
#[derive(Debug, Clone, PartialEq)]
pub struct Accumulated {
    pub coadd: MaskedImage,
    pub weight_map: Plane<f32>,
    pub stats: AccumulateStats,
}

/// Mutable coadd planes for one chunk of pixels. All slices have equal length.
#[derive(Debug)]
pub(crate) struct CoaddSlices<'a> {
    pub image: &'a mut [f32],
    pub mask: &'a mut [MaskPixel],
    pub variance: &'a mut [f32],
    pub weight: &'a mut [f32],
}

/// Exposure planes for one chunk of pixels. All slices have equal length.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ExposureSlices<'a> {
    pub image: &'a [f32],
    pub mask: &'a [MaskPixel],
    pub variance: &'a [f32],
}

impl CoaddSlices<'_> {
    #[inline]
    fn len(&self) -> usize {
        self.image.len()
    }

    #[inline]
    fn debug_assert_matches(&self, exposure: &ExposureSlices<'_>) {
        let len = self.len();
        debug_assert_eq!(self.mask.len(), len);
        debug_assert_eq!(self.variance.len(), len);
        debug_assert_eq!(self.weight.len(), len);
        debug_assert_eq!(exposure.image.len(), len);
        debug_assert_eq!(exposure.mask.len(), len);
        debug_assert_eq!(exposure.variance.len(), len);
    }
}

/// Add `exposure` into `coadd` and `weight_map` in place.
///
/// Dimensions and weight are validated before anything is written, so on
/// error both outputs are untouched.
pub fn add_to_coadd(
    coadd: &mut MaskedImage,
    weight_map: &mut Plane<f32>,
    exposure: &MaskedImage,
    bad_pixel_mask: MaskPixel,
    weight: f32,
) -> Result<AccumulateStats> {
    let dimensions = coadd.dimensions();
    ensure_dimensions("weight map", dimensions, weight_map.dimensions())?;
    ensure_dimensions("exposure", dimensions, exposure.dimensions())?;
    validate_weight(weight)?;

    let planes = coadd.planes_mut();
    let target = CoaddSlices {
        image: planes.image.pixels_mut(),
        mask: planes.mask.pixels_mut(),
        variance: planes.variance.pixels_mut(),
        weight: weight_map.pixels_mut(),
    };
    let source = ExposureSlices {
        image: exposure.image().pixels(),
        mask: exposure.mask().pixels(),
        variance: exposure.variance().pixels(),
    };

    let pixels = target.len();
    let chunk_size = pixel_chunk_size(pixels);
    let excluded = cpu::accumulate_parallel(target, source, bad_pixel_mask, weight, chunk_size);
    let stats = AccumulateStats { pixels, excluded };

    tracing::debug!(
        %dimensions,
        pixels,
        excluded,
        chunks = chunk_count(pixels, chunk_size),
        weight,
        bad_pixel_mask = format_args!("{bad_pixel_mask:#06x}"),
        "Accumulated exposure"
    );
    if pixels > 0 && excluded == pixels {
        tracing::warn!(
            pixels,
            bad_pixel_mask = format_args!("{bad_pixel_mask:#06x}"),
            "Every pixel of the exposure was excluded"
        );
    }
    if weight == 0.0 {
        tracing::warn!("Exposure accumulated with zero weight");
    }

    Ok(stats)
}

/// Like [`add_to_coadd`] but leaves the inputs untouched and returns the
/// updated coadd and weight map.
pub fn added_to_coadd(
    coadd: &MaskedImage,
    weight_map: &Plane<f32>,
    exposure: &MaskedImage,
    bad_pixel_mask: MaskPixel,
    weight: f32,
) -> Result<Accumulated> {
    // Validate before cloning so a rejected call allocates nothing.
    let dimensions = coadd.dimensions();
    ensure_dimensions("weight map", dimensions, weight_map.dimensions())?;
    ensure_dimensions("exposure", dimensions, exposure.dimensions())?;
    validate_weight(weight)?;

    let mut coadd = coadd.clone();
    let mut weight_map = weight_map.clone();
    let stats = add_to_coadd(&mut coadd, &mut weight_map, exposure, bad_pixel_mask, weight)?;
    Ok(Accumulated {
        coadd,
        weight_map,
        stats,
    })
}

/// Weights must be finite and non-negative. Zero is allowed.
#[inline]
pub(crate) fn validate_weight(weight: f32) -> Result<()> {
    if weight.is_finite() && weight >= 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidWeight { weight })
    }
}
