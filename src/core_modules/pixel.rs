// THEORY:
// The `Pixel` module is the leaf of the histogram engine. It holds the single
// pixel sample handed to us by the image collaborator and knows exactly one
// trick: turning that sample into a rounded HSV triple. Everything above it
// (binning, tiling, aggregation) only ever sees the `Hsv` value.
//
// Key architectural principles:
// 1.  **Premultiplied Input**: Samples arrive as 16-bit premultiplied RGBA, so the
//     color channels are divided by alpha before any color math. A fully
//     transparent sample has no recoverable color and maps to (0, 0, 0).
// 2.  **Whole-Number Output**: H, S and V are rounded half away from zero. The
//     binner relies on these being whole numbers when it picks bands.
// 3.  **Stateless**: Conversion is a pure function of the sample, so any number
//     of tile workers can call it concurrently.

pub mod pixel {
    pub type Channel = u32;
    pub type Hue = f64;
    pub type Saturation = f64;
    pub type Value = f64;

    /// A single premultiplied RGBA sample with 16-bit channels.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct PixelSample {
        /// Red, already scaled by alpha (0..=alpha).
        pub red: Channel,
        /// Green, already scaled by alpha (0..=alpha).
        pub green: Channel,
        /// Blue, already scaled by alpha (0..=alpha).
        pub blue: Channel,
        /// Opacity (0..=0xffff).
        pub alpha: Channel,
    }

    /// A color in the HSV space, every component rounded to a whole number.
    #[derive(Debug, Clone, Copy, PartialEq, Default)]
    pub struct Hsv {
        /// Degrees on the color wheel, [0, 360].
        pub hue: Hue,
        /// Percentage, [0, 100].
        pub saturation: Saturation,
        /// Percentage, [0, 100].
        pub value: Value,
    }

    impl PixelSample {
        pub fn new(red: Channel, green: Channel, blue: Channel, alpha: Channel) -> Self {
            Self {
                red,
                green,
                blue,
                alpha,
            }
        }

        /// Builds a premultiplied sample from straight-alpha 8-bit channels.
        ///
        /// Channels are widened to 16 bits (`c * 0x101`) and scaled by alpha,
        /// which is the representation decoders for PNG/JPEG hand out.
        pub fn from_rgba8(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
            let alpha = alpha as Channel;
            let premultiply = |c: u8| (c as Channel * 0x101) * alpha / 0xff;
            Self {
                red: premultiply(red),
                green: premultiply(green),
                blue: premultiply(blue),
                alpha: alpha * 0x101,
            }
        }

        /// Converts the sample to HSV.
        ///
        /// Hue follows the usual piecewise formula; when several channels tie
        /// for the maximum, red wins over green and green over blue.
        pub fn to_hsv(&self) -> Hsv {
            if self.alpha == 0 {
                return Hsv::default();
            }

            let alpha = self.alpha as f64;
            let r = self.red as f64 / alpha;
            let g = self.green as f64 / alpha;
            let b = self.blue as f64 / alpha;

            let max = r.max(g.max(b));
            if max == 0.0 {
                return Hsv::default();
            }

            let min = r.min(g.min(b));
            let delta = max - min;

            // Achromatic, only V survives.
            if delta == 0.0 {
                return Hsv {
                    hue: 0.0,
                    saturation: 0.0,
                    value: (max * 100.0).round(),
                };
            }

            let mut hue = if max == r {
                60.0 * ((g - b) / delta)
            } else if max == g {
                60.0 * (((b - r) / delta) + 2.0)
            } else {
                60.0 * (((r - g) / delta) + 4.0)
            };
            if hue < 0.0 {
                hue += 360.0;
            }

            Hsv {
                hue: hue.round(),
                saturation: (100.0 * delta / max).round(),
                value: (max * 100.0).round(),
            }
        }
    }

    impl From<image::Rgba<u8>> for PixelSample {
        fn from(pixel: image::Rgba<u8>) -> Self {
            let [red, green, blue, alpha] = pixel.0;
            PixelSample::from_rgba8(red, green, blue, alpha)
        }
    }
}
