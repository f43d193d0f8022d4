//! Linear scales and SVG path helpers shared by the chart and matrix builders.

use itertools::Itertools;
use serde::Serialize;

use crate::format::{finite_or_zero, format_coord};

/// Pixel-space coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// "x,y" with SVG friendly number formatting.
    pub fn to_svg(&self) -> String {
        format!("{},{}", format_coord(self.x), format_coord(self.y))
    }
}

/// Linear mapping from a domain onto a pixel range.
///
/// The domain span is clamped to a minimum of 1 so a degenerate domain (eg/ a single
/// category) never divides by zero. An inverted range (`range.0 > range.1`) gives the usual
/// SVG y-axis where larger values sit higher on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Scale over category indices `0..=len-1`.
    pub fn for_indices(len: usize, range: (f64, f64)) -> Self {
        Self::new((0.0, len.saturating_sub(1) as f64), range)
    }

    pub fn apply(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = (d1 - d0).max(1.0);
        r0 + (finite_or_zero(value) - d0) / span * (r1 - r0)
    }
}

/// "M x,y L x,y ..." through the points in order. Empty input gives an empty path.
pub fn line_path(points: &[Point]) -> String {
    points
        .iter()
        .enumerate()
        .map(|(index, point)| {
            let command = if index == 0 { 'M' } else { 'L' };
            format!("{command}{}", point.to_svg())
        })
        .join(" ")
}

/// Line path closed down to `baseline_y`, for gradient fills under a series.
pub fn area_path(points: &[Point], baseline_y: f64) -> String {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return String::new();
    };

    format!(
        "{} L{} L{} Z",
        line_path(points),
        Point::new(last.x, baseline_y).to_svg(),
        Point::new(first.x, baseline_y).to_svg(),
    )
}
