// THEORY:
// The `Binner` discretizes an `Hsv` value into a slot of a fixed-size histogram.
// Hue is cut into 8 bands and saturation into 4, giving the 32-bin layout
// `4 * hue_band + saturation_band`. The 64-bin layout adds a value band on top,
// so the second half of the vector is a 32-bin histogram of bright pixels.
//
// The band widths are literal constants rather than computed ratios. Hue uses
// 360/7 (not 360/8) so that a hue rounded up to 360 still lands in a band, and
// the saturation divisor sits just below 100/3 so that S = 100 lands in band 3.
// The value divisor sits just above 50 so that V = 50 stays in the dark band.
// Samples whose color channels exceed their alpha yield V above 100; every band
// index is clamped to its last band so such samples still land in the vector.
// Changing any of them changes every histogram this crate produces.

use crate::core_modules::pixel::pixel::Hsv;
use serde::{Deserialize, Serialize};

pub const HUE_BAND_WIDTH: f64 = 51.42857142857143;
pub const SATURATION_BAND_WIDTH: f64 = 33.33333333333333;
pub const VALUE_BAND_WIDTH: f64 = 50.0000000001;

/// Number of hue x saturation slots; also the offset of the bright half in 64-bin mode.
pub const HUE_SATURATION_BINS: usize = 32;

const LAST_HUE_BAND: usize = 7;
const LAST_SATURATION_BAND: usize = 3;
const LAST_VALUE_BAND: usize = 1;

/// Histogram layouts supported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resolution {
    /// Hue x saturation.
    Bins32,
    /// Hue x saturation x value (dark half first).
    Bins64,
}

impl Resolution {
    pub fn len(self) -> usize {
        match self {
            Resolution::Bins32 => HUE_SATURATION_BINS,
            Resolution::Bins64 => 2 * HUE_SATURATION_BINS,
        }
    }

    /// Maps a raw vector length back to its layout.
    pub fn from_len(len: usize) -> Option<Self> {
        match len {
            32 => Some(Resolution::Bins32),
            64 => Some(Resolution::Bins64),
            _ => None,
        }
    }

    /// Index of the slot `hsv` falls into.
    #[inline]
    pub fn bin_index(self, hsv: &Hsv) -> usize {
        let hue_bin = ((hsv.hue / HUE_BAND_WIDTH) as usize).min(LAST_HUE_BAND);
        let saturation_bin =
            ((hsv.saturation / SATURATION_BAND_WIDTH) as usize).min(LAST_SATURATION_BAND);
        let index = 4 * hue_bin + saturation_bin;

        match self {
            Resolution::Bins32 => index,
            Resolution::Bins64 => {
                let value_bin = ((hsv.value / VALUE_BAND_WIDTH) as usize).min(LAST_VALUE_BAND);
                index + HUE_SATURATION_BINS * value_bin
            }
        }
    }
}
