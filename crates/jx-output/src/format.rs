//! Coordinate text formatting.
//!
//! Values are rounded to six fractional digits, ties to even, on the exact
//! binary value, then printed in minimal form: trailing zeros are dropped but
//! one fractional digit always remains.
//!
//! | value          | text          |
//! |----------------|---------------|
//! | `35.690000`    | `35.69`       |
//! | `35.691234567` | `35.691235`   |
//! | `139.0`        | `139.0`       |
//! | `-0.0000001`   | `-0.0`        |

use jx_core::GeoPoint;

/// Fractional digits kept in junction files.
pub const DECIMALS: usize = 6;

/// Round `value` to [`DECIMALS`] places and render it minimally.
pub fn format_coord(value: f64) -> String {
    // `{:.N}` rounds the exact binary value half-to-even.
    let mut s = format!("{value:.DECIMALS$}");
    if let Some(dot) = s.find('.') {
        let significant = s.trim_end_matches('0').len();
        s.truncate(significant.max(dot + 2));
    }
    s
}

/// `"lat,lon"` with both parts formatted by [`format_coord`].
pub fn format_point(p: GeoPoint) -> String {
    format!("{},{}", format_coord(p.lat), format_coord(p.lon))
}
