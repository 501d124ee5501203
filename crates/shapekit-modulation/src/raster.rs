//! Grayscale image sources for surface modulations.

use std::f64::consts::TAU;
use std::fmt;
use std::sync::Arc;

use crate::line::LineFn;
use crate::{clamp_ratio, ModulationError, Result};

/// A readable grayscale raster.
pub trait GrayscaleImage: Send + Sync {
    /// Width in pixels.
    fn width(&self) -> usize;
    /// Height in pixels.
    fn height(&self) -> usize;
    /// Pixel intensity in `[0, 1]`; `x < width`, `y < height`.
    fn grayscale(&self, x: usize, y: usize) -> f64;
}

/// Row-major in-memory grayscale raster.
#[derive(Debug, Clone, PartialEq)]
pub struct GrayscaleBuffer {
    width: usize,
    height: usize,
    values: Vec<f64>,
}

impl GrayscaleBuffer {
    /// Wrap `values`, row 0 first. Values are clamped to `[0, 1]` on read.
    pub fn new(width: usize, height: usize, values: Vec<f64>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(ModulationError::EmptyImage);
        }
        if values.len() != width * height {
            return Err(ModulationError::BufferSize {
                width,
                height,
                actual: values.len(),
            });
        }
        Ok(Self {
            width,
            height,
            values,
        })
    }

    /// Buffer filled by `f(x, y)`.
    pub fn from_fn<F>(width: usize, height: usize, f: F) -> Result<Self>
    where
        F: Fn(usize, usize) -> f64,
    {
        let values = (0..height)
            .flat_map(|y| (0..width).map(move |x| (x, y)))
            .map(|(x, y)| f(x, y))
            .collect();
        Self::new(width, height, values)
    }
}

impl GrayscaleImage for GrayscaleBuffer {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn grayscale(&self, x: usize, y: usize) -> f64 {
        self.values[y * self.width + x].clamp(0.0, 1.0)
    }
}

#[cfg(feature = "image")]
impl GrayscaleImage for ::image::GrayImage {
    fn width(&self) -> usize {
        ::image::GrayImage::width(self) as usize
    }

    fn height(&self) -> usize {
        ::image::GrayImage::height(self) as usize
    }

    fn grayscale(&self, x: usize, y: usize) -> f64 {
        f64::from(self.get_pixel(x as u32, y as u32).0[0]) / 255.0
    }
}

/// Image-sampled surface field.
///
/// The wrapped angle `phi / 2π` runs across the image columns and the ratio
/// down the rows, both spanning the full pixel range. Samples are bilinear
/// and pass through `mapping` to become physical values.
#[derive(Clone)]
pub struct ImageModulation {
    image: Arc<dyn GrayscaleImage>,
    mapping: LineFn,
}

impl ImageModulation {
    /// Sample `image`, turning intensity into a value with `mapping`.
    pub fn new<I, F>(image: I, mapping: F) -> Result<Self>
    where
        I: GrayscaleImage + 'static,
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        if image.width() == 0 || image.height() == 0 {
            return Err(ModulationError::EmptyImage);
        }
        Ok(Self {
            image: Arc::new(image),
            mapping: Arc::new(mapping),
        })
    }

    /// Map intensity linearly onto `[low, high]`.
    pub fn linear<I>(image: I, low: f64, high: f64) -> Result<Self>
    where
        I: GrayscaleImage + 'static,
    {
        Self::new(image, move |g| low + (high - low) * g)
    }

    /// Raw bilinear intensity at `(phi, ratio)`.
    pub fn intensity(&self, phi: f64, ratio: f64) -> f64 {
        let (w, h) = (self.image.width(), self.image.height());
        let u = phi.rem_euclid(TAU) / TAU;
        let x = u * (w - 1) as f64;
        let y = clamp_ratio(ratio) * (h - 1) as f64;

        let x0 = (x.floor() as usize).min(w - 1);
        let y0 = (y.floor() as usize).min(h - 1);
        let x1 = (x0 + 1).min(w - 1);
        let y1 = (y0 + 1).min(h - 1);
        let (tx, ty) = (x - x0 as f64, y - y0 as f64);

        let top = self.image.grayscale(x0, y0) * (1.0 - tx) + self.image.grayscale(x1, y0) * tx;
        let bottom = self.image.grayscale(x0, y1) * (1.0 - tx) + self.image.grayscale(x1, y1) * tx;
        top * (1.0 - ty) + bottom * ty
    }

    /// Mapped value at `(phi, ratio)`.
    pub fn evaluate(&self, phi: f64, ratio: f64) -> f64 {
        (self.mapping)(self.intensity(phi, ratio))
    }
}

impl fmt::Debug for ImageModulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageModulation")
            .field("width", &self.image.width())
            .field("height", &self.image.height())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn gradient() -> GrayscaleBuffer {
        // Intensity rises left to right: 0, 0.5, 1.
        GrayscaleBuffer::from_fn(3, 2, |x, _| x as f64 / 2.0).unwrap()
    }

    #[test]
    fn test_buffer_validation() {
        assert_eq!(
            GrayscaleBuffer::new(0, 3, vec![]).unwrap_err(),
            ModulationError::EmptyImage
        );
        assert_eq!(
            GrayscaleBuffer::new(2, 2, vec![0.0; 3]).unwrap_err(),
            ModulationError::BufferSize {
                width: 2,
                height: 2,
                actual: 3
            }
        );
    }

    #[test]
    fn test_bilinear_across_columns() {
        let m = ImageModulation::linear(gradient(), 1.0, 3.0).unwrap();
        assert_relative_eq!(m.intensity(0.0, 0.0), 0.0);
        assert_relative_eq!(m.intensity(PI, 0.5), 0.5, epsilon = 1e-12);
        assert_relative_eq!(m.intensity(PI / 2.0, 1.0), 0.25, epsilon = 1e-12);
        assert_relative_eq!(m.evaluate(PI, 0.0), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_phi_wraps() {
        let m = ImageModulation::linear(gradient(), 0.0, 1.0).unwrap();
        assert_relative_eq!(m.evaluate(PI + TAU, 0.3), m.evaluate(PI, 0.3), epsilon = 1e-12);
        assert_relative_eq!(m.evaluate(-PI, 0.3), m.evaluate(PI, 0.3), epsilon = 1e-12);
    }

    #[test]
    fn test_rows_interpolate() {
        let buf = GrayscaleBuffer::from_fn(2, 3, |_, y| y as f64 / 2.0).unwrap();
        let m = ImageModulation::linear(buf, 0.0, 10.0).unwrap();
        assert_relative_eq!(m.evaluate(0.0, 0.25), 2.5, epsilon = 1e-12);
        assert_relative_eq!(m.evaluate(0.0, 7.0), 10.0, epsilon = 1e-12);
    }

    #[test]
    fn test_buffer_clamps_values() {
        let buf = GrayscaleBuffer::new(1, 1, vec![4.0]).unwrap();
        assert_eq!(buf.grayscale(0, 0), 1.0);
    }

    #[cfg(feature = "image")]
    #[test]
    fn test_gray_image_provider() {
        let img = ::image::GrayImage::from_fn(4, 2, |x, _| ::image::Luma([(x * 85) as u8]));
        assert_eq!(GrayscaleImage::width(&img), 4);
        assert_relative_eq!(GrayscaleImage::grayscale(&img, 3, 1), 1.0);
        let m = ImageModulation::linear(img, 0.0, 1.0).unwrap();
        assert_relative_eq!(m.evaluate(0.0, 0.0), 0.0);
    }
}
