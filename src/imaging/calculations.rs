//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Fit `original` inside a `max_edge` × `max_edge` box, preserving aspect.
///
/// Images already within bound are returned unchanged (no upscaling).
/// Otherwise the longer edge becomes exactly `max_edge` and the shorter edge
/// is rounded to the nearest pixel, never below 1.
///
/// # Examples
/// ```
/// # use live_gal::imaging::bounded_dimensions;
/// assert_eq!(bounded_dimensions((3000, 2000), 1600), (1600, 1067));
/// assert_eq!(bounded_dimensions((800, 600), 1600), (800, 600));
/// ```
pub fn bounded_dimensions(original: (u32, u32), max_edge: u32) -> (u32, u32) {
    let (orig_w, orig_h) = original;
    let longer_edge = orig_w.max(orig_h);

    if longer_edge <= max_edge {
        return original;
    }

    let scale = |edge: u32| {
        let scaled = (edge as f64 * max_edge as f64 / longer_edge as f64).round() as u32;
        scaled.max(1)
    };

    if orig_w >= orig_h {
        // Landscape or square
        (max_edge, scale(orig_h))
    } else {
        // Portrait
        (scale(orig_w), max_edge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn landscape_over_bound_hits_max_edge() {
        let (w, h) = bounded_dimensions((3000, 2000), 1600);
        assert_eq!(w.max(h), 1600);
        assert_eq!((w, h), (1600, 1067));
        let ratio = w as f64 / h as f64;
        assert!((ratio - 1.5).abs() < 0.01);
    }

    #[test]
    fn portrait_over_bound_hits_max_edge() {
        // 3024x4032 phone portrait → 1200x1600
        assert_eq!(bounded_dimensions((3024, 4032), 1600), (1200, 1600));
    }

    #[test]
    fn square_over_bound() {
        assert_eq!(bounded_dimensions((2000, 2000), 1600), (1600, 1600));
    }

    #[test]
    fn within_bound_is_unchanged() {
        assert_eq!(bounded_dimensions((800, 600), 1600), (800, 600));
    }

    #[test]
    fn exactly_at_bound_is_unchanged() {
        assert_eq!(bounded_dimensions((1600, 900), 1600), (1600, 900));
    }

    #[test]
    fn extreme_panorama_keeps_one_pixel_short_edge() {
        // 20000x2 would round the short edge to 0
        assert_eq!(bounded_dimensions((20000, 2), 1600), (1600, 1));
    }

    #[test]
    fn rounds_to_nearest() {
        // 1601 * 1600 / 3201 = 800.25 → 800
        assert_eq!(bounded_dimensions((3201, 1601), 1600), (1600, 800));
        // 1603 * 1600 / 3200 = 801.5 → 802
        assert_eq!(bounded_dimensions((3200, 1603), 1600), (1600, 802));
    }
}
