//! CPU dispatch for accumulation with SIMD support.

use rayon::prelude::*;

use super::{CoaddSlices, ExposureSlices, scalar};
use crate::masked_image::MaskPixel;

/// Accumulate the exposure into the coadd in parallel chunks.
/// Returns the total number of excluded pixels.
#[inline]
pub(super) fn accumulate_parallel(
    coadd: CoaddSlices<'_>,
    exposure: ExposureSlices<'_>,
    bad_pixel_mask: MaskPixel,
    weight: f32,
    chunk_size: usize,
) -> usize {
    coadd.debug_assert_matches(&exposure);

    (
        coadd.image.par_chunks_mut(chunk_size),
        coadd.mask.par_chunks_mut(chunk_size),
        coadd.variance.par_chunks_mut(chunk_size),
        coadd.weight.par_chunks_mut(chunk_size),
        exposure.image.par_chunks(chunk_size),
        exposure.mask.par_chunks(chunk_size),
        exposure.variance.par_chunks(chunk_size),
    )
        .into_par_iter()
        .map(|(image, mask, variance, weight_map, src_image, src_mask, src_variance)| {
            accumulate_chunk(
                CoaddSlices {
                    image,
                    mask,
                    variance,
                    weight: weight_map,
                },
                ExposureSlices {
                    image: src_image,
                    mask: src_mask,
                    variance: src_variance,
                },
                bad_pixel_mask,
                weight,
            )
        })
        .sum()
}

/// Accumulate a chunk, dispatching to best available implementation.
#[inline]
pub(super) fn accumulate_chunk(
    coadd: CoaddSlices<'_>,
    exposure: ExposureSlices<'_>,
    bad_pixel_mask: MaskPixel,
    weight: f32,
) -> usize {
    #[cfg(target_arch = "x86_64")]
    {
        if common::cpu_features::has_sse2() {
            return unsafe { super::sse::accumulate_chunk(coadd, exposure, bad_pixel_mask, weight) };
        }
    }

    scalar::accumulate_chunk(coadd, exposure, bad_pixel_mask, weight)
}
