//! Testing utilities for coadd.

#![allow(dead_code)]

use common::{Dimensions, Plane};
use rand::Rng;
use rand::rngs::StdRng;

use crate::masked_image::{MaskPixel, MaskedImage};

/// Initialize tracing subscriber for tests.
/// Safe to call multiple times - will only initialize once.
/// Respects RUST_LOG env var, defaults to "info".
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// Exposure with constant signal and variance and an empty mask.
pub fn uniform_exposure(dimensions: Dimensions, signal: f32, variance: f32) -> MaskedImage {
    MaskedImage::from_planes(
        Plane::new_filled(dimensions, signal),
        Plane::new_default(dimensions),
        Plane::new_filled(dimensions, variance),
    )
    .unwrap()
}

/// Exposure with random signal, non-negative variance and random flags.
///
/// Each mask bit is set independently with probability 1/8, so a typical
/// bad-pixel mask excludes some pixels but not most of them.
pub fn random_exposure(rng: &mut StdRng, dimensions: Dimensions) -> MaskedImage {
    let image = Plane::from_fn(dimensions, |_, _| rng.random_range(-50.0f32..500.0));
    let mask = Plane::from_fn(dimensions, |_, _| random_flags(rng));
    let variance = Plane::from_fn(dimensions, |_, _| rng.random_range(0.0f32..25.0));
    MaskedImage::from_planes(image, mask, variance).unwrap()
}

/// Coadd and weight map as they might look partway through a build.
pub fn random_coadd_state(rng: &mut StdRng, dimensions: Dimensions) -> (MaskedImage, Plane<f32>) {
    let coadd = random_exposure(rng, dimensions);
    let weight_map = Plane::from_fn(dimensions, |_, _| rng.random_range(0.0f32..4.0));
    (coadd, weight_map)
}

fn random_flags(rng: &mut StdRng) -> MaskPixel {
    (0..MaskPixel::BITS).fold(0, |acc, bit| {
        if rng.random_ratio(1, 8) {
            acc | (1 << bit)
        } else {
            acc
        }
    })
}

/// Straight per-pixel form of the accumulation rule, indexing by `(col, row)`.
pub fn reference_accumulate(
    coadd: &mut MaskedImage,
    weight_map: &mut Plane<f32>,
    exposure: &MaskedImage,
    bad_pixel_mask: MaskPixel,
    weight: f32,
) {
    let dimensions = coadd.dimensions();
    let planes = coadd.planes_mut();
    for row in 0..dimensions.height {
        for col in 0..dimensions.width {
            let flags = exposure.mask()[(col, row)];
            if flags & bad_pixel_mask != 0 {
                continue;
            }
            planes.image[(col, row)] += exposure.image()[(col, row)];
            planes.variance[(col, row)] += exposure.variance()[(col, row)];
            planes.mask[(col, row)] |= flags;
            weight_map[(col, row)] += weight;
        }
    }
}

/// Assert two f32 planes are bit-for-bit equal, naming the first differing pixel.
pub fn assert_planes_bit_equal(actual: &Plane<f32>, expected: &Plane<f32>, what: &str) {
    assert_eq!(actual.dimensions(), expected.dimensions(), "{what} dimensions");
    for (i, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
        assert_eq!(
            a.to_bits(),
            e.to_bits(),
            "{what} differs at index {i}: {a} vs {e}"
        );
    }
}
