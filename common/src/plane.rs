//! Owned, row-major 2D pixel planes.

use std::fmt;
use std::ops::{Index, IndexMut};
use std::slice;

use thiserror::Error;

/// Width and height of a raster, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Dimensions {
    pub width: usize,
    pub height: usize,
}

impl Dimensions {
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    #[inline]
    pub const fn pixel_count(&self) -> usize {
        self.width * self.height
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Returned when a pixel buffer does not hold exactly `width * height` samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("pixel buffer holds {len} samples but {dimensions} needs {}", .dimensions.pixel_count())]
pub struct PlaneSizeError {
    pub dimensions: Dimensions,
    pub len: usize,
}

/// A rectangular grid of samples addressed by `(col, row)`.
///
/// Storage is a single contiguous `Vec<T>` in row-major order. The dimensions
/// are fixed at construction; nothing on `Plane` can resize it.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane<T> {
    pixels: Vec<T>,
    dimensions: Dimensions,
}

impl<T> Plane<T> {
    /// Wrap an existing row-major buffer.
    pub fn from_vec(dimensions: Dimensions, pixels: Vec<T>) -> Result<Self, PlaneSizeError> {
        if pixels.len() != dimensions.pixel_count() {
            return Err(PlaneSizeError {
                dimensions,
                len: pixels.len(),
            });
        }
        Ok(Self { pixels, dimensions })
    }

    /// Build a plane by evaluating `f(col, row)` for every pixel.
    pub fn from_fn(dimensions: Dimensions, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut pixels = Vec::with_capacity(dimensions.pixel_count());
        for row in 0..dimensions.height {
            for col in 0..dimensions.width {
                pixels.push(f(col, row));
            }
        }
        Self { pixels, dimensions }
    }

    #[inline]
    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.dimensions.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.dimensions.height
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// True when `other` has the same width and height, whatever its sample type.
    #[inline]
    pub fn same_dimensions<U>(&self, other: &Plane<U>) -> bool {
        self.dimensions == other.dimensions
    }

    #[inline]
    pub fn linear_index(&self, col: usize, row: usize) -> usize {
        debug_assert!(col < self.dimensions.width && row < self.dimensions.height);
        row * self.dimensions.width + col
    }

    #[inline]
    pub fn get(&self, col: usize, row: usize) -> Option<&T> {
        if col < self.dimensions.width && row < self.dimensions.height {
            self.pixels.get(row * self.dimensions.width + col)
        } else {
            None
        }
    }

    #[inline]
    pub fn get_mut(&mut self, col: usize, row: usize) -> Option<&mut T> {
        if col < self.dimensions.width && row < self.dimensions.height {
            self.pixels.get_mut(row * self.dimensions.width + col)
        } else {
            None
        }
    }

    #[inline]
    pub fn pixels(&self) -> &[T] {
        &self.pixels
    }

    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [T] {
        &mut self.pixels
    }

    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.pixels.iter()
    }

    /// Iterate rows from top to bottom.
    pub fn rows(&self) -> slice::ChunksExact<'_, T> {
        // chunks_exact panics on 0; a zero-width plane has no pixels anyway.
        self.pixels.chunks_exact(self.dimensions.width.max(1))
    }

    #[inline]
    pub fn into_vec(self) -> Vec<T> {
        self.pixels
    }
}

impl<T: Clone> Plane<T> {
    pub fn new_filled(dimensions: Dimensions, value: T) -> Self {
        Self {
            pixels: vec![value; dimensions.pixel_count()],
            dimensions,
        }
    }

    #[inline]
    pub fn fill(&mut self, value: T) {
        self.pixels.fill(value);
    }
}

impl<T: Default + Clone> Plane<T> {
    pub fn new_default(dimensions: Dimensions) -> Self {
        Self::new_filled(dimensions, T::default())
    }
}

impl<T> Index<(usize, usize)> for Plane<T> {
    type Output = T;

    #[inline]
    fn index(&self, (col, row): (usize, usize)) -> &Self::Output {
        assert!(
            col < self.dimensions.width && row < self.dimensions.height,
            "pixel ({col}, {row}) outside {} plane",
            self.dimensions
        );
        &self.pixels[row * self.dimensions.width + col]
    }
}

impl<T> IndexMut<(usize, usize)> for Plane<T> {
    #[inline]
    fn index_mut(&mut self, (col, row): (usize, usize)) -> &mut Self::Output {
        assert!(
            col < self.dimensions.width && row < self.dimensions.height,
            "pixel ({col}, {row}) outside {} plane",
            self.dimensions
        );
        &mut self.pixels[row * self.dimensions.width + col]
    }
}

impl<'a, T> IntoIterator for &'a Plane<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.pixels.iter()
    }
}
