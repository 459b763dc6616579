// THEORY:
// The `Normalizer` turns raw pixel counts into whole-number percentages of the
// image. Rounding is a caller choice (closest, up or down), so the percentages
// are not guaranteed to add up to 100.
//
// The 64-bin layout gets special treatment. Rounding the dark and bright halves
// independently would let `hist64[i] + hist64[i + 32]` drift from the rounded
// percentage of their combined count, and the 64-bin histogram would no longer
// collapse into the 32-bin one. Instead the combined percentage is rounded once,
// the dark half is rounded on its own, and the bright half is whatever is left.

use crate::core_modules::binner::{HUE_SATURATION_BINS, Resolution};
use crate::error::{HistogramError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type Percentage = f64;

/// How a fractional percentage becomes a whole number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RoundingMode {
    /// Half away from zero.
    #[default]
    Nearest,
    /// Towards positive infinity.
    Up,
    /// Towards zero.
    Down,
}

impl RoundingMode {
    #[inline]
    pub fn apply(self, percentage: Percentage) -> Percentage {
        match self {
            RoundingMode::Nearest => percentage.round(),
            RoundingMode::Up => percentage.ceil(),
            RoundingMode::Down => percentage.trunc(),
        }
    }
}

/// Numeric codes: 0 closest, 1 up, 2 down.
impl TryFrom<u8> for RoundingMode {
    type Error = HistogramError;

    fn try_from(code: u8) -> Result<Self> {
        match code {
            0 => Ok(RoundingMode::Nearest),
            1 => Ok(RoundingMode::Up),
            2 => Ok(RoundingMode::Down),
            other => Err(HistogramError::InvalidRoundingMode {
                value: other.to_string(),
            }),
        }
    }
}

impl FromStr for RoundingMode {
    type Err = HistogramError;

    fn from_str(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "nearest" | "closest" | "round" => Ok(RoundingMode::Nearest),
            "up" | "ceil" => Ok(RoundingMode::Up),
            "down" | "trunc" | "floor" => Ok(RoundingMode::Down),
            _ => Err(HistogramError::InvalidRoundingMode {
                value: name.to_string(),
            }),
        }
    }
}

impl fmt::Display for RoundingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RoundingMode::Nearest => "nearest",
            RoundingMode::Up => "up",
            RoundingMode::Down => "down",
        };
        f.write_str(name)
    }
}

/// Converts raw counts into percentages of `pixel_count`.
///
/// `bins` must hold 32 or 64 entries. A `pixel_count` of zero has no
/// meaningful percentages and is rejected with `ZeroPixelCount`; the pipelines
/// catch empty images earlier and report their dimensions instead.
pub fn normalize(mode: RoundingMode, pixel_count: u64, bins: &[u64]) -> Result<Vec<Percentage>> {
    let resolution = Resolution::from_len(bins.len())
        .ok_or(HistogramError::UnsupportedBinCount { len: bins.len() })?;
    if pixel_count == 0 {
        return Err(HistogramError::ZeroPixelCount);
    }

    let pixels = pixel_count as f64;
    let percent = |count: u64| mode.apply(count as f64 * 100.0 / pixels);

    let normalized = match resolution {
        Resolution::Bins32 => bins.iter().map(|&count| percent(count)).collect(),
        Resolution::Bins64 => {
            let mut out = vec![0.0; bins.len()];
            for i in 0..HUE_SATURATION_BINS {
                let dark = bins[i];
                let bright = bins[i + HUE_SATURATION_BINS];
                let total = percent(dark + bright);
                let low = percent(dark);
                out[i] = low;
                out[i + HUE_SATURATION_BINS] = total - low;
            }
            out
        }
    };

    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::collection::vec;
    use proptest::prelude::*;

    const MODES: [RoundingMode; 3] = [RoundingMode::Nearest, RoundingMode::Up, RoundingMode::Down];

    #[test]
    fn rounding_modes() {
        assert_eq!(RoundingMode::Nearest.apply(2.5), 3.0);
        assert_eq!(RoundingMode::Nearest.apply(2.4999), 2.0);
        assert_eq!(RoundingMode::Up.apply(2.01), 3.0);
        assert_eq!(RoundingMode::Down.apply(2.99), 2.0);
    }

    #[test]
    fn numeric_codes_match_named_modes() {
        assert_eq!(RoundingMode::try_from(0), Ok(RoundingMode::Nearest));
        assert_eq!(RoundingMode::try_from(1), Ok(RoundingMode::Up));
        assert_eq!(RoundingMode::try_from(2), Ok(RoundingMode::Down));
        assert_eq!(
            RoundingMode::try_from(3),
            Err(HistogramError::InvalidRoundingMode {
                value: "3".to_string()
            })
        );
        assert_eq!("Closest".parse::<RoundingMode>(), Ok(RoundingMode::Nearest));
        assert_eq!("ceil".parse::<RoundingMode>(), Ok(RoundingMode::Up));
        assert!("sideways".parse::<RoundingMode>().is_err());
        assert_eq!(RoundingMode::Down.to_string().parse::<RoundingMode>(), Ok(RoundingMode::Down));
    }

    #[test]
    fn thirty_two_bins_round_each_entry() {
        let mut bins = vec![0u64; 32];
        bins[0] = 1;
        bins[3] = 2;
        let nearest = normalize(RoundingMode::Nearest, 3, &bins).unwrap();
        assert_eq!(nearest[0], 33.0);
        assert_eq!(nearest[3], 67.0);

        let up = normalize(RoundingMode::Up, 3, &bins).unwrap();
        assert_eq!(up[0], 34.0);
        assert_eq!(up[3], 67.0);
        assert_eq!(up[1], 0.0);
    }

    #[test]
    fn bright_half_is_the_remainder() {
        let mut bins = vec![0u64; 64];
        // 1 dark and 1 bright pixel out of 3: 33.3% + 33.3% = 66.7% combined.
        bins[5] = 1;
        bins[37] = 1;
        bins[0] = 1;
        let out = normalize(RoundingMode::Nearest, 3, &bins).unwrap();
        assert_eq!(out[5], 33.0);
        // Rounded independently this would be 33, but 67 - 33 = 34.
        assert_eq!(out[37], 34.0);
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(
            normalize(RoundingMode::Nearest, 10, &[1, 2, 3]),
            Err(HistogramError::UnsupportedBinCount { len: 3 })
        );
        assert_eq!(
            normalize(RoundingMode::Nearest, 0, &[0; 32]),
            Err(HistogramError::ZeroPixelCount)
        );
        assert!(HistogramError::ZeroPixelCount.is_input_error());
    }

    proptest! {
        #[test]
        fn sixty_four_bins_collapse_into_thirty_two(
            counts in vec(0u64..5_000, 64),
            mode_index in 0usize..3,
        ) {
            let mode = MODES[mode_index];
            let pixels: u64 = counts.iter().sum::<u64>().max(1);
            let merged: Vec<u64> = (0..32).map(|i| counts[i] + counts[i + 32]).collect();

            let hist64 = normalize(mode, pixels, &counts).unwrap();
            let hist32 = normalize(mode, pixels, &merged).unwrap();

            for i in 0..32 {
                prop_assert_eq!(hist32[i], hist64[i] + hist64[i + 32]);
            }
        }
    }
}
