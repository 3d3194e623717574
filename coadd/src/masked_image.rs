//! Co-registered signal, mask and variance planes.

use common::{Dimensions, Plane};

use crate::error::{Result, ensure_dimensions};

/// Sample type of the quality mask plane. Each bit is a named flag.
pub type MaskPixel = u16;

/// Signal, quality mask and variance planes sharing one set of dimensions.
///
/// Used both for the running coadd and for each contributing exposure.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskedImage {
    image: Plane<f32>,
    mask: Plane<MaskPixel>,
    variance: Plane<f32>,
}

/// Simultaneous mutable access to the three planes of a [`MaskedImage`].
#[derive(Debug)]
pub struct PlanesMut<'a> {
    pub image: &'a mut Plane<f32>,
    pub mask: &'a mut Plane<MaskPixel>,
    pub variance: &'a mut Plane<f32>,
}

impl MaskedImage {
    /// All-zero planes: no signal, no flags, no variance.
    pub fn new(dimensions: Dimensions) -> Self {
        Self {
            image: Plane::new_default(dimensions),
            mask: Plane::new_default(dimensions),
            variance: Plane::new_default(dimensions),
        }
    }

    /// Combine existing planes. Mask and variance must match the image's dimensions.
    pub fn from_planes(
        image: Plane<f32>,
        mask: Plane<MaskPixel>,
        variance: Plane<f32>,
    ) -> Result<Self> {
        let dimensions = image.dimensions();
        ensure_dimensions("mask plane", dimensions, mask.dimensions())?;
        ensure_dimensions("variance plane", dimensions, variance.dimensions())?;
        Ok(Self {
            image,
            mask,
            variance,
        })
    }

    #[inline]
    pub fn dimensions(&self) -> Dimensions {
        self.image.dimensions()
    }

    #[inline]
    pub fn image(&self) -> &Plane<f32> {
        &self.image
    }

    #[inline]
    pub fn mask(&self) -> &Plane<MaskPixel> {
        &self.mask
    }

    #[inline]
    pub fn variance(&self) -> &Plane<f32> {
        &self.variance
    }

    #[inline]
    pub fn mask_mut(&mut self) -> &mut Plane<MaskPixel> {
        &mut self.mask
    }

    /// Borrow all three planes mutably at once.
    ///
    /// Planes can be written but never resized, so the shared-dimension
    /// invariant survives whatever the caller does with them.
    #[inline]
    pub fn planes_mut(&mut self) -> PlanesMut<'_> {
        PlanesMut {
            image: &mut self.image,
            mask: &mut self.mask,
            variance: &mut self.variance,
        }
    }

    pub fn into_parts(self) -> (Plane<f32>, Plane<MaskPixel>, Plane<f32>) {
        (self.image, self.mask, self.variance)
    }
}
