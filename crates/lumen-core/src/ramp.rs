//! Hardware gamma ramp.
//!
//! A [`GammaRamp`] is the table a display driver consumes: 256 entries per
//! channel, 16-bit unsigned, red then green then blue. The layout is
//! `#[repr(C)]` so backends can hand a pointer straight to the platform API.
//!
//! Lumen only performs monochrome luminance remaps, so all three channels
//! carry the same values when a ramp is built. Ramps read back from a driver
//! may differ per channel.

/// Number of entries per channel.
pub const RAMP_LEN: usize = 256;

/// Largest representable ramp value.
pub const RAMP_MAX: u16 = u16::MAX;

/// Step between identity entries (`255 * 257 == 65535`).
const IDENTITY_STEP: u16 = 257;

/// Three 256-entry, 16-bit lookup tables.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GammaRamp {
    /// Red channel
    pub red: [u16; RAMP_LEN],
    /// Green channel
    pub green: [u16; RAMP_LEN],
    /// Blue channel
    pub blue: [u16; RAMP_LEN],
}

impl GammaRamp {
    /// All-zero ramp. Used as a read buffer and as the "never captured" value.
    pub const fn zeroed() -> Self {
        Self {
            red: [0; RAMP_LEN],
            green: [0; RAMP_LEN],
            blue: [0; RAMP_LEN],
        }
    }

    /// Linear ramp mapping entry `i` to `i * 257` (0 to 65535).
    ///
    /// ```rust
    /// use lumen_core::GammaRamp;
    ///
    /// let id = GammaRamp::identity();
    /// assert_eq!(id.red[0], 0);
    /// assert_eq!(id.red[255], 65535);
    /// ```
    pub fn identity() -> Self {
        let mut channel = [0u16; RAMP_LEN];
        for (i, v) in channel.iter_mut().enumerate() {
            *v = i as u16 * IDENTITY_STEP;
        }
        Self::from_channel(channel)
    }

    /// Builds a monochrome ramp by copying one channel into all three.
    #[inline]
    pub const fn from_channel(channel: [u16; RAMP_LEN]) -> Self {
        Self {
            red: channel,
            green: channel,
            blue: channel,
        }
    }

    /// Channels in red, green, blue order.
    #[inline]
    pub fn channels(&self) -> [&[u16; RAMP_LEN]; 3] {
        [&self.red, &self.green, &self.blue]
    }

    /// Mutable channels in red, green, blue order.
    #[inline]
    pub fn channels_mut(&mut self) -> [&mut [u16; RAMP_LEN]; 3] {
        [&mut self.red, &mut self.green, &mut self.blue]
    }

    /// Returns `true` if all three channels are identical.
    pub fn is_mono(&self) -> bool {
        self.red == self.green && self.red == self.blue
    }

    /// Returns `true` if every channel is strictly increasing.
    pub fn is_strictly_increasing(&self) -> bool {
        self.channels()
            .iter()
            .all(|ch| ch.windows(2).all(|w| w[0] < w[1]))
    }

    /// Largest absolute per-entry difference across all channels.
    pub fn max_difference(&self, other: &Self) -> u16 {
        self.channels()
            .iter()
            .zip(other.channels().iter())
            .flat_map(|(a, b)| a.iter().zip(b.iter()))
            .map(|(a, b)| a.abs_diff(*b))
            .max()
            .unwrap_or(0)
    }

    /// Returns `true` if every entry is within `tolerance` units of `other`.
    #[inline]
    pub fn matches_within(&self, other: &Self, tolerance: u16) -> bool {
        self.max_difference(other) <= tolerance
    }
}

impl Default for GammaRamp {
    fn default() -> Self {
        Self::zeroed()
    }
}
