// THEORY:
// `PixelSource` is the seam between the histogram engine and whatever decoded the
// image. The engine only needs three things: the width, the height, and a pixel
// sample at an integer coordinate. Anything the `image` crate can view as RGBA8
// (`RgbaImage`, `DynamicImage`, sub-views) gets the trait for free.

pub mod image_source {
    use crate::core_modules::pixel::pixel::PixelSample;
    use crate::core_modules::tile::tile::Rectangle;
    use image::{GenericImageView, Rgba};

    /// Read-only access to the pixels of an image. Origin is the top-left corner.
    pub trait PixelSource {
        fn width(&self) -> u32;
        fn height(&self) -> u32;
        /// Sample at `(x, y)` with `x < width` and `y < height`.
        fn pixel_at(&self, x: u32, y: u32) -> PixelSample;

        fn pixel_count(&self) -> u64 {
            self.width() as u64 * self.height() as u64
        }

        /// Inclusive rectangle covering the whole image.
        fn full_rectangle(&self) -> Rectangle {
            Rectangle::covering(self.width(), self.height())
        }
    }

    impl<T> PixelSource for T
    where
        T: GenericImageView<Pixel = Rgba<u8>>,
    {
        fn width(&self) -> u32 {
            GenericImageView::width(self)
        }

        fn height(&self) -> u32 {
            GenericImageView::height(self)
        }

        #[inline]
        fn pixel_at(&self, x: u32, y: u32) -> PixelSample {
            PixelSample::from(self.get_pixel(x, y))
        }
    }
}
