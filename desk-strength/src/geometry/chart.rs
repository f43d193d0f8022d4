//! Relative-strength line chart geometry.
//!
//! Maps lookback labels and 0-100 strength series onto a fixed pixel canvas, producing line
//! and area paths, axis ticks, the 50 midline and a callout for each series' latest value.

use serde::Serialize;

use super::scale::{LinearScale, Point, area_path, line_path};
use crate::format::{SCORE_MAX, SCORE_MIN, format_score};
use crate::instrument::InstrumentId;
use crate::series::LabeledSeries;

/// Y-axis tick values.
pub const CHART_Y_TICKS: [f64; 5] = [20.0, 40.0, 60.0, 80.0, 100.0];

/// Value drawn as the horizontal midline.
pub const CHART_MIDLINE_VALUE: f64 = 50.0;

/// Canvas dimensions of the relative-strength chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartDimensions {
    pub width: f64,
    pub height: f64,
    pub margin_x: f64,
    pub margin_y: f64,
}

impl Default for ChartDimensions {
    fn default() -> Self {
        Self {
            width: 640.0,
            height: 280.0,
            margin_x: 48.0,
            margin_y: 32.0,
        }
    }
}

impl ChartDimensions {
    pub fn usable_width(&self) -> f64 {
        self.width - 2.0 * self.margin_x
    }

    pub fn usable_height(&self) -> f64 {
        self.height - 2.0 * self.margin_y
    }

    /// Pixel y of the value axis floor.
    pub fn baseline(&self) -> f64 {
        self.height - self.margin_y
    }
}

/// X and y scales for a chart with a given number of label categories.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartScales {
    x: LinearScale,
    y: LinearScale,
}

impl ChartScales {
    pub fn new(dimensions: &ChartDimensions, labels: usize) -> Self {
        Self {
            x: LinearScale::for_indices(
                labels,
                (dimensions.margin_x, dimensions.width - dimensions.margin_x),
            ),
            y: LinearScale::new(
                (SCORE_MIN, SCORE_MAX),
                (dimensions.baseline(), dimensions.margin_y),
            ),
        }
    }

    pub fn x(&self, index: usize) -> f64 {
        self.x.apply(index as f64)
    }

    pub fn y(&self, value: f64) -> f64 {
        self.y.apply(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct XTick {
    pub label: String,
    pub x: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YTick {
    pub value: f64,
    pub label: String,
    pub y: f64,
}

/// Horizontal line across the plot area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HorizontalLine {
    pub x1: f64,
    pub x2: f64,
    pub y: f64,
}

/// Callout for the most recent value of a series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LastPoint {
    pub x: f64,
    pub y: f64,
    pub value: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesGeometry {
    pub instrument_id: InstrumentId,
    pub label: String,
    pub points: Vec<Point>,
    pub line_path: String,
    pub area_path: String,
    pub last_point: Option<LastPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartGeometry {
    pub dimensions: ChartDimensions,
    pub series: Vec<SeriesGeometry>,
    pub x_ticks: Vec<XTick>,
    pub y_ticks: Vec<YTick>,
    pub midline: HorizontalLine,
}

/// Build chart geometry on the default canvas.
pub fn build_chart(labels: &[String], series: &[LabeledSeries]) -> ChartGeometry {
    build_chart_with(ChartDimensions::default(), labels, series)
}

/// Build chart geometry on an explicit canvas.
///
/// Each series is plotted by position against `labels`; values beyond the label count are
/// ignored (see [`LabeledSeries::aligned`]).
pub fn build_chart_with(
    dimensions: ChartDimensions,
    labels: &[String],
    series: &[LabeledSeries],
) -> ChartGeometry {
    let scales = ChartScales::new(&dimensions, labels.len());

    let series = series
        .iter()
        .map(|series| build_series_geometry(&dimensions, &scales, labels.len(), series))
        .collect();

    let x_ticks = labels
        .iter()
        .enumerate()
        .map(|(index, label)| XTick {
            label: label.clone(),
            x: scales.x(index),
        })
        .collect();

    let y_ticks = CHART_Y_TICKS
        .iter()
        .map(|&value| YTick {
            value,
            label: format_score(value),
            y: scales.y(value),
        })
        .collect();

    let midline = HorizontalLine {
        x1: dimensions.margin_x,
        x2: dimensions.width - dimensions.margin_x,
        y: scales.y(CHART_MIDLINE_VALUE),
    };

    ChartGeometry {
        dimensions,
        series,
        x_ticks,
        y_ticks,
        midline,
    }
}

fn build_series_geometry(
    dimensions: &ChartDimensions,
    scales: &ChartScales,
    labels: usize,
    series: &LabeledSeries,
) -> SeriesGeometry {
    let points: Vec<Point> = series
        .values
        .iter()
        .take(labels)
        .enumerate()
        .map(|(index, &value)| Point::new(scales.x(index), scales.y(value)))
        .collect();

    let last_point = points
        .iter()
        .zip(&series.values)
        .last()
        .map(|(point, &value)| LastPoint {
            x: point.x,
            y: point.y,
            value,
            label: format_score(value),
        });

    SeriesGeometry {
        instrument_id: series.instrument_id.clone(),
        label: series.label.clone(),
        line_path: line_path(&points),
        area_path: area_path(&points, dimensions.baseline()),
        points,
        last_point,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    fn series(values: Vec<f64>) -> LabeledSeries {
        LabeledSeries {
            instrument_id: "eur_usd".into(),
            label: "EURUSD".to_string(),
            values,
        }
    }

    #[test]
    fn test_x_scale_endpoints() {
        let dims = ChartDimensions::default();
        for n in 2..12 {
            let scales = ChartScales::new(&dims, n);
            assert_eq!(scales.x(0), dims.margin_x);
            assert!((scales.x(n - 1) - (dims.width - dims.margin_x)).abs() < 1e-9);
        }

        let scales = ChartScales::new(&dims, 1);
        assert_eq!(scales.x(0), dims.margin_x);
    }

    #[test]
    fn test_y_scale_endpoints_and_monotonic() {
        let dims = ChartDimensions::default();
        let scales = ChartScales::new(&dims, 3);

        assert_eq!(scales.y(0.0), dims.height - dims.margin_y);
        assert_eq!(scales.y(100.0), dims.margin_y);

        let mut previous = scales.y(0.0);
        for step in 1..=100 {
            let y = scales.y(step as f64);
            assert!(y < previous, "y must decrease as value increases");
            previous = y;
        }
    }

    #[test]
    fn test_three_week_scenario() {
        let dims = ChartDimensions::default();
        let chart = build_chart(&labels(&["W1", "W2", "W3"]), &[series(vec![20.0, 50.0, 80.0])]);

        let geometry = &chart.series[0];
        assert_eq!(geometry.points.len(), 3);

        let last = geometry.last_point.as_ref().unwrap();
        assert_eq!(last.label, "80");
        assert_eq!(last.value, 80.0);

        let expected_y =
            dims.height - dims.margin_y - (80.0 / 100.0) * (dims.height - 2.0 * dims.margin_y);
        assert!((last.y - expected_y).abs() < 1e-9);
        assert!((last.y - 75.2).abs() < 1e-9);
        assert_eq!(last.x, dims.width - dims.margin_x);

        assert_eq!(geometry.line_path, "M48,204.8 L320,140 L592,75.2");
        assert_eq!(
            geometry.area_path,
            "M48,204.8 L320,140 L592,75.2 L592,248 L48,248 Z"
        );
    }

    #[test]
    fn test_empty_values_produce_empty_paths() {
        let chart = build_chart(&labels(&["W1", "W2"]), &[series(vec![])]);
        let geometry = &chart.series[0];

        assert!(geometry.points.is_empty());
        assert_eq!(geometry.line_path, "");
        assert_eq!(geometry.area_path, "");
        assert!(geometry.last_point.is_none());
    }

    #[test]
    fn test_values_beyond_labels_are_not_plotted() {
        let chart = build_chart(&labels(&["W1", "W2"]), &[series(vec![10.0, 20.0, 30.0])]);
        let geometry = &chart.series[0];

        assert_eq!(geometry.points.len(), 2);
        assert_eq!(geometry.last_point.as_ref().unwrap().label, "20");
    }

    #[test]
    fn test_fractional_last_value_label() {
        let chart = build_chart(&labels(&["W1", "W2"]), &[series(vec![10.0, 62.46])]);
        assert_eq!(chart.series[0].last_point.as_ref().unwrap().label, "62.5");
    }

    #[test]
    fn test_ticks_and_midline() {
        let dims = ChartDimensions::default();
        let chart = build_chart(&labels(&["1M", "3M", "6M", "12M"]), &[]);

        assert_eq!(chart.x_ticks.len(), 4);
        assert_eq!(chart.x_ticks[0].x, dims.margin_x);
        assert_eq!(chart.x_ticks[3].label, "12M");

        let values: Vec<f64> = chart.y_ticks.iter().map(|tick| tick.value).collect();
        assert_eq!(values, vec![20.0, 40.0, 60.0, 80.0, 100.0]);
        assert_eq!(chart.y_ticks[4].y, dims.margin_y);
        assert_eq!(chart.y_ticks[0].label, "20");

        assert!((chart.midline.y - 140.0).abs() < 1e-9);
        assert_eq!(chart.midline.x1, dims.margin_x);
        assert_eq!(chart.midline.x2, dims.width - dims.margin_x);
    }

    #[test]
    fn test_single_label_chart() {
        let dims = ChartDimensions::default();
        let chart = build_chart(&labels(&["Now"]), &[series(vec![100.0])]);
        let last = chart.series[0].last_point.as_ref().unwrap();

        assert_eq!(last.x, dims.margin_x);
        assert_eq!(last.y, dims.margin_y);
    }
}
