//! Scalar fallback implementation of the accumulation kernel.

use super::{CoaddSlices, ExposureSlices};
use crate::masked_image::MaskPixel;

/// Accumulate one chunk. Returns the number of excluded pixels.
///
/// Excluded pixels are skipped rather than added as zero, so `-0.0` and NaN
/// payloads in the coadd survive unchanged.
#[inline]
pub(super) fn accumulate_chunk(
    coadd: CoaddSlices<'_>,
    exposure: ExposureSlices<'_>,
    bad_pixel_mask: MaskPixel,
    weight: f32,
) -> usize {
    coadd.debug_assert_matches(&exposure);

    let mut excluded = 0;
    for i in 0..coadd.image.len() {
        let flags = exposure.mask[i];
        if flags & bad_pixel_mask != 0 {
            excluded += 1;
            continue;
        }
        coadd.image[i] += exposure.image[i];
        coadd.variance[i] += exposure.variance[i];
        coadd.mask[i] |= flags;
        coadd.weight[i] += weight;
    }
    excluded
}
