//! SSE2 implementation of the accumulation kernel (x86_64).

use std::arch::x86_64::*;

use super::{CoaddSlices, ExposureSlices, scalar};
use crate::masked_image::MaskPixel;

/// Accumulate one chunk four pixels at a time. Returns the number of
/// excluded pixels.
///
/// Excluded lanes are restored with a bitwise select, never added as zero,
/// so the result is bit-identical to the scalar kernel.
///
/// # Safety
/// Caller must ensure SSE2 is available (checked via `common::cpu_features`).
#[target_feature(enable = "sse2")]
pub(super) unsafe fn accumulate_chunk(
    coadd: CoaddSlices<'_>,
    exposure: ExposureSlices<'_>,
    bad_pixel_mask: MaskPixel,
    weight: f32,
) -> usize {
    coadd.debug_assert_matches(&exposure);

    let len = coadd.len();
    let chunks = len / 4;
    let mut excluded = 0;

    unsafe {
        let zero = _mm_setzero_si128();
        let bad_vec = _mm_set1_epi32(i32::from(bad_pixel_mask));
        let weight_vec = _mm_set1_ps(weight);

        for i in 0..chunks {
            let idx = i * 4;

            // Four u16 flags in the low 64 bits, widened to i32 lanes.
            let flags16 = _mm_loadl_epi64(exposure.mask.as_ptr().add(idx) as *const __m128i);
            let flags32 = _mm_unpacklo_epi16(flags16, zero);
            let good_i = _mm_cmpeq_epi32(_mm_and_si128(flags32, bad_vec), zero);
            let good = _mm_castsi128_ps(good_i);

            let lanes = _mm_movemask_ps(good);
            if lanes == 0 {
                excluded += 4;
                continue;
            }
            excluded += 4 - lanes.count_ones() as usize;

            let img = _mm_loadu_ps(coadd.image.as_ptr().add(idx));
            let src = _mm_loadu_ps(exposure.image.as_ptr().add(idx));
            let img = select(good, _mm_add_ps(img, src), img);
            _mm_storeu_ps(coadd.image.as_mut_ptr().add(idx), img);

            let var = _mm_loadu_ps(coadd.variance.as_ptr().add(idx));
            let src = _mm_loadu_ps(exposure.variance.as_ptr().add(idx));
            let var = select(good, _mm_add_ps(var, src), var);
            _mm_storeu_ps(coadd.variance.as_mut_ptr().add(idx), var);

            let w = _mm_loadu_ps(coadd.weight.as_ptr().add(idx));
            let w = select(good, _mm_add_ps(w, weight_vec), w);
            _mm_storeu_ps(coadd.weight.as_mut_ptr().add(idx), w);

            // Narrow the lane mask back to u16 lanes (all-ones stays all-ones).
            let good16 = _mm_packs_epi32(good_i, good_i);
            let mask_ptr = coadd.mask.as_mut_ptr().add(idx) as *mut __m128i;
            let mask = _mm_loadl_epi64(mask_ptr);
            let mask = _mm_or_si128(mask, _mm_and_si128(flags16, good16));
            _mm_storel_epi64(mask_ptr, mask);
        }
    }

    let start = chunks * 4;
    let CoaddSlices {
        image,
        mask,
        variance,
        weight: weight_map,
    } = coadd;
    excluded
        + scalar::accumulate_chunk(
            CoaddSlices {
                image: &mut image[start..],
                mask: &mut mask[start..],
                variance: &mut variance[start..],
                weight: &mut weight_map[start..],
            },
            ExposureSlices {
                image: &exposure.image[start..],
                mask: &exposure.mask[start..],
                variance: &exposure.variance[start..],
            },
            bad_pixel_mask,
            weight,
        )
}

/// Per-lane `if mask { a } else { b }` on raw bits.
#[inline]
#[target_feature(enable = "sse2")]
unsafe fn select(mask: __m128, a: __m128, b: __m128) -> __m128 {
    unsafe { _mm_or_ps(_mm_and_ps(mask, a), _mm_andnot_ps(mask, b)) }
}
