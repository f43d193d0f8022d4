//! Pixel-space geometry for the relative-strength chart and the strength matrix.

pub mod chart;
pub mod matrix;
pub mod scale;

pub use chart::{
    ChartDimensions, ChartGeometry, ChartScales, HorizontalLine, LastPoint, SeriesGeometry, XTick,
    YTick, build_chart, build_chart_with,
};
pub use matrix::{
    Direction, MatrixDimensions, MatrixGeometry, MatrixPointConfig, MatrixPointGeometry,
    MatrixScales, MatrixTick, Quadrant, QuadrantPosition, Rect, build_matrix, build_matrix_with,
};
pub use scale::{LinearScale, Point, area_path, line_path};
