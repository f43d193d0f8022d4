//! Strength matrix geometry: long-term strength on x, short-term strength on y.

use serde::{Deserialize, Serialize};

use super::scale::{LinearScale, Point};
use crate::format::{SCORE_MAX, SCORE_MIN, clamp_score, format_score};
use crate::instrument::{InstrumentCatalog, InstrumentId};

/// Tick values on both matrix axes.
pub const MATRIX_TICKS: [f64; 4] = [20.0, 40.0, 60.0, 80.0];

/// Score splitting the matrix into quadrants.
pub const MATRIX_PIVOT: f64 = 50.0;

/// Directional read of a matrix point.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[serde(alias = "Bullish")]
    Bullish,
    #[serde(alias = "Bearish")]
    Bearish,
    #[default]
    #[serde(alias = "Balancing")]
    Balancing,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Bullish => "Bullish",
            Direction::Bearish => "Bearish",
            Direction::Balancing => "Balancing",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Matrix point as it appears in the asset class config.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixPointConfig {
    pub instrument_id: InstrumentId,
    #[serde(default)]
    pub label: Option<String>,
    pub short_term: f64,
    pub long_term: f64,
    #[serde(default)]
    pub direction: Direction,
    #[serde(default)]
    pub conviction: f64,
}

/// Canvas dimensions of the strength matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MatrixDimensions {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
}

impl Default for MatrixDimensions {
    fn default() -> Self {
        Self {
            width: 360.0,
            height: 320.0,
            margin: 40.0,
        }
    }
}

impl MatrixDimensions {
    pub fn interior(&self) -> Rect {
        Rect {
            x: self.margin,
            y: self.margin,
            width: self.width - 2.0 * self.margin,
            height: self.height - 2.0 * self.margin,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// Scales mapping (long term, short term) scores onto the matrix interior.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatrixScales {
    x: LinearScale,
    y: LinearScale,
}

impl MatrixScales {
    pub fn new(dimensions: &MatrixDimensions) -> Self {
        let interior = dimensions.interior();
        Self {
            x: LinearScale::new((SCORE_MIN, SCORE_MAX), (interior.x, interior.right())),
            y: LinearScale::new((SCORE_MIN, SCORE_MAX), (interior.bottom(), interior.y)),
        }
    }

    pub fn to_x(&self, long_term: f64) -> f64 {
        self.x.apply(long_term)
    }

    pub fn to_y(&self, short_term: f64) -> f64 {
        self.y.apply(short_term)
    }

    pub fn center(&self) -> Point {
        Point::new(self.to_x(MATRIX_PIVOT), self.to_y(MATRIX_PIVOT))
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum QuadrantPosition {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl QuadrantPosition {
    /// Quadrant a (long term, short term) pair falls into. Scores on the pivot count as strong.
    pub fn of(long_term: f64, short_term: f64) -> Self {
        match (long_term >= MATRIX_PIVOT, short_term >= MATRIX_PIVOT) {
            (false, true) => QuadrantPosition::TopLeft,
            (true, true) => QuadrantPosition::TopRight,
            (false, false) => QuadrantPosition::BottomLeft,
            (true, false) => QuadrantPosition::BottomRight,
        }
    }

    /// Strong on both horizons reads bullish, weak on both bearish, mixed is balancing.
    pub fn tone(&self) -> Direction {
        match self {
            QuadrantPosition::TopRight => Direction::Bullish,
            QuadrantPosition::BottomLeft => Direction::Bearish,
            QuadrantPosition::TopLeft | QuadrantPosition::BottomRight => Direction::Balancing,
        }
    }
}

/// Background shading rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Quadrant {
    pub position: QuadrantPosition,
    pub tone: Direction,
    pub rect: Rect,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatrixTick {
    pub value: f64,
    pub label: String,
    pub position: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixPointGeometry {
    pub instrument_id: InstrumentId,
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub short_term: f64,
    pub long_term: f64,
    pub direction: Direction,
    pub conviction: f64,
    pub quadrant: QuadrantPosition,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixGeometry {
    pub dimensions: MatrixDimensions,
    pub center: Point,
    pub quadrants: [Quadrant; 4],
    pub points: Vec<MatrixPointGeometry>,
    pub x_ticks: Vec<MatrixTick>,
    pub y_ticks: Vec<MatrixTick>,
}

/// Build matrix geometry on the default canvas.
pub fn build_matrix(points: &[MatrixPointConfig], catalog: &InstrumentCatalog) -> MatrixGeometry {
    build_matrix_with(MatrixDimensions::default(), points, catalog)
}

/// Build matrix geometry on an explicit canvas.
pub fn build_matrix_with(
    dimensions: MatrixDimensions,
    points: &[MatrixPointConfig],
    catalog: &InstrumentCatalog,
) -> MatrixGeometry {
    let scales = MatrixScales::new(&dimensions);
    let center = scales.center();

    let points = points
        .iter()
        .map(|config| {
            let long_term = clamp_score(config.long_term);
            let short_term = clamp_score(config.short_term);
            MatrixPointGeometry {
                instrument_id: config.instrument_id.clone(),
                label: catalog.resolve_label(&config.instrument_id, config.label.as_deref()),
                x: scales.to_x(long_term),
                y: scales.to_y(short_term),
                short_term,
                long_term,
                direction: config.direction,
                conviction: clamp_score(config.conviction),
                quadrant: QuadrantPosition::of(long_term, short_term),
            }
        })
        .collect();

    let x_ticks = MATRIX_TICKS
        .iter()
        .map(|&value| MatrixTick {
            value,
            label: format_score(value),
            position: scales.to_x(value),
        })
        .collect();

    let y_ticks = MATRIX_TICKS
        .iter()
        .map(|&value| MatrixTick {
            value,
            label: format_score(value),
            position: scales.to_y(value),
        })
        .collect();

    MatrixGeometry {
        dimensions,
        center,
        quadrants: quadrants(&dimensions.interior(), center),
        points,
        x_ticks,
        y_ticks,
    }
}

/// Split the interior at `center` into four rectangles that tile it exactly.
fn quadrants(interior: &Rect, center: Point) -> [Quadrant; 4] {
    let left = center.x - interior.x;
    let right = interior.right() - center.x;
    let top = center.y - interior.y;
    let bottom = interior.bottom() - center.y;

    let quadrant = |position: QuadrantPosition, rect: Rect| Quadrant {
        position,
        tone: position.tone(),
        rect,
    };

    [
        quadrant(
            QuadrantPosition::TopLeft,
            Rect { x: interior.x, y: interior.y, width: left, height: top },
        ),
        quadrant(
            QuadrantPosition::TopRight,
            Rect { x: center.x, y: interior.y, width: right, height: top },
        ),
        quadrant(
            QuadrantPosition::BottomLeft,
            Rect { x: interior.x, y: center.y, width: left, height: bottom },
        ),
        quadrant(
            QuadrantPosition::BottomRight,
            Rect { x: center.x, y: center.y, width: right, height: bottom },
        ),
    ]
}
