//! Stamping the no-data flag onto coadd pixels that never received weight.


use common::Plane;
use common::bits::is_single_bit;
use common::parallel::pixel_chunk_size;
use rayon::prelude::*;

use crate::error::{Result, ensure_dimensions};
use crate::masked_image::MaskPixel;

/// A pixel counts as covered only when its accumulated weight is positive.
/// NaN compares false, so it is treated as uncovered.
#[inline]
pub fn is_covered(weight: f32) -> bool {
    weight > 0.0
}

/// Set `edge_bit` in `mask` wherever `weight_map` is not positive.
///
/// Only ever adds bits, so calling it again with the same weight map leaves
/// the mask unchanged. Returns the number of uncovered pixels, which is
/// reported even when `edge_bit` is `0` and nothing is written.
pub fn set_coadd_edge_bits(
    mask: &mut Plane<MaskPixel>,
    weight_map: &Plane<f32>,
    edge_bit: MaskPixel,
) -> Result<usize> {
    ensure_dimensions("weight map", mask.dimensions(), weight_map.dimensions())?;
    Ok(stamp_edge_bits(mask, weight_map, edge_bit))
}

/// [`set_coadd_edge_bits`] for planes already known to share dimensions.
pub(crate) fn stamp_edge_bits(
    mask: &mut Plane<MaskPixel>,
    weight_map: &Plane<f32>,
    edge_bit: MaskPixel,
) -> usize {
    debug_assert!(mask.same_dimensions(weight_map));

    if edge_bit != 0 && !is_single_bit(u64::from(edge_bit)) {
        tracing::debug!(
            edge_bit = format_args!("{edge_bit:#06x}"),
            "Edge mask has more than one bit set; all of them will be stamped"
        );
    }

    let chunk_size = pixel_chunk_size(mask.len());
    let uncovered: usize = mask
        .pixels_mut()
        .par_chunks_mut(chunk_size)
        .zip(weight_map.pixels().par_chunks(chunk_size))
        .map(|(mask_chunk, weight_chunk)| stamp_chunk(mask_chunk, weight_chunk, edge_bit))
        .sum();

    tracing::debug!(
        dimensions = %mask.dimensions(),
        uncovered,
        edge_bit = format_args!("{edge_bit:#06x}"),
        "Stamped coadd edge bits"
    );

    uncovered
}

#[inline]
fn stamp_chunk(mask: &mut [MaskPixel], weight_map: &[f32], edge_bit: MaskPixel) -> usize {
    debug_assert_eq!(mask.len(), weight_map.len());

    let mut uncovered = 0;
    for (m, &w) in mask.iter_mut().zip(weight_map) {
        if !is_covered(w) {
            *m |= edge_bit;
            uncovered += 1;
        }
    }
    uncovered
}
