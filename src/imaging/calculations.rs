//! Pure calculation functions for image dimensions and pixel math.
//!
//! These functions contain no I/O and are fully unit-testable.

/// Fit `original` inside `bounds`, preserving aspect ratio.
///
/// Never enlarges: an image already inside the box is returned unchanged.
/// The free edge is rounded to whichever of floor/ceil keeps the aspect
/// ratio closest to the original, and is never smaller than 1.
pub fn fit_within(original: (u32, u32), bounds: (u32, u32)) -> (u32, u32) {
    let (orig_w, orig_h) = original;
    let (max_w, max_h) = bounds;

    if orig_w == 0 || orig_h == 0 || (max_w >= orig_w && max_h >= orig_h) {
        return original;
    }

    let aspect = orig_w as f64 / orig_h as f64;
    let box_aspect = max_w as f64 / max_h as f64;

    if box_aspect >= aspect {
        // Height-bound: derive width
        let width = round_aspect(max_h as f64 * aspect, |w| {
            (aspect - w / max_h as f64).abs()
        });
        (width, max_h)
    } else {
        // Width-bound: derive height
        let height = round_aspect(max_w as f64 / aspect, |h| {
            if h == 0.0 {
                0.0
            } else {
                (aspect - max_w as f64 / h).abs()
            }
        });
        (max_w, height)
    }
}

/// Choose floor or ceil of `value`, whichever minimizes `error`. Min 1.
fn round_aspect(value: f64, error: impl Fn(f64) -> f64) -> u32 {
    let floor = value.floor();
    let ceil = value.ceil();
    let best = if error(ceil) < error(floor) { ceil } else { floor };
    (best as u32).max(1)
}

/// Scale one 8-bit channel by `factor`, truncating and clipping to 0..=255.
pub fn scale_channel(value: u8, factor: f32) -> u8 {
    (value as f32 * factor).clamp(0.0, 255.0) as u8
}
