//! Waterfall column assignment.
//!
//! [`distribute`] deals photos into columns round-robin: photo `i` of the
//! newest-first sequence lands in column `i % columns`. Placement needs no
//! rendered heights, so the same input always yields the same layout. The
//! price is visual balance: a column of tall portraits is not compensated.
//!
//! [`column_count_for_width`] carries the viewport breakpoints a front end
//! uses to pick the column count.

use std::num::NonZeroUsize;

/// Viewport breakpoints, widest first: `(min_width_px, columns)`.
const BREAKPOINTS: &[(u32, usize)] = &[(1280, 5), (1024, 4), (768, 3)];

/// Columns used below the narrowest breakpoint.
const MIN_COLUMNS: NonZeroUsize = NonZeroUsize::new(2).unwrap();

/// Deal `photos` into `columns` columns, round-robin.
///
/// Always returns exactly `columns` vectors; trailing ones are empty when
/// there are fewer photos than columns. Pure and deterministic.
pub fn distribute<T>(photos: &[T], columns: NonZeroUsize) -> Vec<Vec<&T>> {
    let count = columns.get();
    let mut cols: Vec<Vec<&T>> = (0..count)
        .map(|_| Vec::with_capacity(photos.len().div_ceil(count)))
        .collect();
    for (i, photo) in photos.iter().enumerate() {
        cols[i % count].push(photo);
    }
    cols
}

/// Column count for a viewport `width` in CSS pixels.
pub fn column_count_for_width(width: u32) -> NonZeroUsize {
    BREAKPOINTS
        .iter()
        .find(|(min_width, _)| width >= *min_width)
        .and_then(|(_, columns)| NonZeroUsize::new(*columns))
        .unwrap_or(MIN_COLUMNS)
}
