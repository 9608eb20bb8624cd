//! Monotonicity enforcement.

use lumen_core::{GammaRamp, RAMP_LEN, RAMP_MAX};

/// Makes every channel of `ramp` strictly increasing.
///
/// Forward pass: any entry not above its predecessor becomes
/// `predecessor + 1`, capped at 65535. A curve that saturates early leaves a
/// flat run at 65535 after that, so a backward pass pulls the tail down to
/// `successor - 1`. 256 entries always fit in 16 bits, so the result is
/// strictly increasing for any input.
///
/// # Example
///
/// ```rust
/// use lumen_core::GammaRamp;
/// use lumen_ramp::enforce_monotonic;
///
/// let mut ramp = GammaRamp::from_channel([1000; 256]);
/// enforce_monotonic(&mut ramp);
/// assert!(ramp.is_strictly_increasing());
/// assert_eq!(ramp.red[1], 1001);
/// ```
pub fn enforce_monotonic(ramp: &mut GammaRamp) {
    for channel in ramp.channels_mut() {
        enforce_channel(channel);
    }
}

fn enforce_channel(ch: &mut [u16; RAMP_LEN]) {
    for i in 1..RAMP_LEN {
        if ch[i] <= ch[i - 1] {
            ch[i] = ch[i - 1].saturating_add(1).min(RAMP_MAX);
        }
    }

    for i in (0..RAMP_LEN - 1).rev() {
        if ch[i] >= ch[i + 1] {
            // ch[i + 1] >= 255 - i here, so this never underflows
            ch[i] = ch[i + 1] - 1;
        }
    }
}
