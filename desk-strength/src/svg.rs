//! Standalone SVG documents for the relative-strength chart and the strength matrix.

use std::path::Path;

use tracing::info;

use crate::error::RenderError;
use crate::format::format_coord;
use crate::geometry::{ChartGeometry, Direction, MatrixGeometry};

/// Series stroke colours, cycled by series index.
pub const SERIES_PALETTE: [&str; 6] = [
    "#3b82f6", "#10b981", "#f59e0b", "#8b5cf6", "#ef4444", "#06b6d4",
];

const AXIS_COLOR: &str = "#6b7280";
const GRID_COLOR: &str = "#e5e7eb";
const MIDLINE_COLOR: &str = "#9ca3af";

/// Marker radius range for matrix points, scaled by conviction.
const MIN_MARKER_RADIUS: f64 = 4.0;
const MAX_MARKER_RADIUS: f64 = 10.0;

pub fn series_color(index: usize) -> &'static str {
    SERIES_PALETTE[index % SERIES_PALETTE.len()]
}

pub fn direction_color(direction: Direction) -> &'static str {
    match direction {
        Direction::Bullish => "#10b981",
        Direction::Bearish => "#ef4444",
        Direction::Balancing => "#f59e0b",
    }
}

/// Escape text for use in element content and attribute values.
pub fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

pub fn render_chart(chart: &ChartGeometry) -> String {
    let dims = &chart.dimensions;
    let left = format_coord(dims.margin_x);
    let right = format_coord(dims.width - dims.margin_x);
    let baseline = format_coord(dims.baseline());

    let mut defs = String::new();
    let mut grid = String::new();
    let mut labels = String::new();
    let mut series = String::new();

    for tick in &chart.y_ticks {
        let y = format_coord(tick.y);
        grid.push_str(&format!(
            r##"  <line x1="{left}" y1="{y}" x2="{right}" y2="{y}" stroke="{GRID_COLOR}" stroke-width="1"/>
"##
        ));
        labels.push_str(&format!(
            r##"  <text x="{}" y="{y}" text-anchor="end" dominant-baseline="middle" font-size="11" fill="{AXIS_COLOR}">{}</text>
"##,
            format_coord(dims.margin_x - 8.0),
            escape_text(&tick.label),
        ));
    }

    for tick in &chart.x_ticks {
        labels.push_str(&format!(
            r##"  <text x="{}" y="{}" text-anchor="middle" font-size="11" fill="{AXIS_COLOR}">{}</text>
"##,
            format_coord(tick.x),
            format_coord(dims.baseline() + 18.0),
            escape_text(&tick.label),
        ));
    }

    for (index, geometry) in chart.series.iter().enumerate() {
        let color = series_color(index);
        defs.push_str(&format!(
            r##"    <linearGradient id="area-{index}" x1="0" y1="0" x2="0" y2="1">
      <stop offset="0%" stop-color="{color}" stop-opacity="0.35"/>
      <stop offset="100%" stop-color="{color}" stop-opacity="0"/>
    </linearGradient>
"##
        ));

        if geometry.line_path.is_empty() {
            continue;
        }

        series.push_str(&format!(
            r##"  <g data-instrument="{}">
    <path d="{}" fill="url(#area-{index})" stroke="none"/>
    <path d="{}" fill="none" stroke="{color}" stroke-width="2" stroke-linejoin="round"/>
"##,
            escape_text(geometry.instrument_id.as_str()),
            geometry.area_path,
            geometry.line_path,
        ));

        if let Some(last) = &geometry.last_point {
            series.push_str(&format!(
                r##"    <circle cx="{x}" cy="{y}" r="4" fill="{color}"/>
    <text x="{}" y="{y}" dominant-baseline="middle" font-size="11" font-weight="600" fill="{color}">{} {}</text>
"##,
                format_coord(last.x + 8.0),
                escape_text(&geometry.label),
                escape_text(&last.label),
                x = format_coord(last.x),
                y = format_coord(last.y),
            ));
        }
        series.push_str("  </g>\n");
    }

    let midline = &chart.midline;
    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">
  <defs>
{defs}  </defs>
{grid}  <line x1="{}" y1="{mid}" x2="{}" y2="{mid}" stroke="{MIDLINE_COLOR}" stroke-width="1" stroke-dasharray="4 4"/>
  <line x1="{left}" y1="{baseline}" x2="{right}" y2="{baseline}" stroke="{AXIS_COLOR}" stroke-width="1"/>
{series}{labels}</svg>
"##,
        format_coord(midline.x1),
        format_coord(midline.x2),
        width = format_coord(dims.width),
        height = format_coord(dims.height),
        mid = format_coord(midline.y),
    )
}

pub fn render_matrix(matrix: &MatrixGeometry) -> String {
    let dims = &matrix.dimensions;
    let interior = dims.interior();

    let mut shading = String::new();
    for quadrant in &matrix.quadrants {
        shading.push_str(&format!(
            r##"  <rect x="{}" y="{}" width="{}" height="{}" fill="{}" fill-opacity="0.08"/>
"##,
            format_coord(quadrant.rect.x),
            format_coord(quadrant.rect.y),
            format_coord(quadrant.rect.width),
            format_coord(quadrant.rect.height),
            direction_color(quadrant.tone),
        ));
    }

    let mut axes = String::new();
    for tick in &matrix.x_ticks {
        axes.push_str(&format!(
            r##"  <text x="{}" y="{}" text-anchor="middle" font-size="11" fill="{AXIS_COLOR}">{}</text>
"##,
            format_coord(tick.position),
            format_coord(interior.bottom() + 16.0),
            escape_text(&tick.label),
        ));
    }
    for tick in &matrix.y_ticks {
        axes.push_str(&format!(
            r##"  <text x="{}" y="{}" text-anchor="end" dominant-baseline="middle" font-size="11" fill="{AXIS_COLOR}">{}</text>
"##,
            format_coord(interior.x - 8.0),
            format_coord(tick.position),
            escape_text(&tick.label),
        ));
    }

    let mut points = String::new();
    for point in &matrix.points {
        let radius = MIN_MARKER_RADIUS + (MAX_MARKER_RADIUS - MIN_MARKER_RADIUS) * point.conviction / 100.0;
        let color = direction_color(point.direction);
        points.push_str(&format!(
            r##"  <g data-instrument="{}">
    <circle cx="{x}" cy="{y}" r="{}" fill="{color}" fill-opacity="0.8"/>
    <text x="{}" y="{}" text-anchor="middle" font-size="11" fill="#374151">{}</text>
  </g>
"##,
            escape_text(point.instrument_id.as_str()),
            format_coord(radius),
            format_coord(point.x),
            format_coord(point.y - radius - 4.0),
            escape_text(&point.label),
            x = format_coord(point.x),
            y = format_coord(point.y),
        ));
    }

    let center = &matrix.center;
    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">
{shading}  <rect x="{}" y="{}" width="{}" height="{}" fill="none" stroke="{GRID_COLOR}" stroke-width="1"/>
  <line x1="{cx}" y1="{}" x2="{cx}" y2="{}" stroke="{MIDLINE_COLOR}" stroke-width="1" stroke-dasharray="4 4"/>
  <line x1="{}" y1="{cy}" x2="{}" y2="{cy}" stroke="{MIDLINE_COLOR}" stroke-width="1" stroke-dasharray="4 4"/>
{axes}{points}  <text x="{}" y="{}" text-anchor="middle" font-size="12" fill="{AXIS_COLOR}">Long term</text>
  <text x="12" y="{}" text-anchor="middle" font-size="12" fill="{AXIS_COLOR}" transform="rotate(-90, 12, {})">Short term</text>
</svg>
"##,
        format_coord(interior.x),
        format_coord(interior.y),
        format_coord(interior.width),
        format_coord(interior.height),
        format_coord(interior.y),
        format_coord(interior.bottom()),
        format_coord(interior.x),
        format_coord(interior.right()),
        format_coord(interior.x + interior.width / 2.0),
        format_coord(dims.height - 6.0),
        format_coord(interior.y + interior.height / 2.0),
        format_coord(interior.y + interior.height / 2.0),
        width = format_coord(dims.width),
        height = format_coord(dims.height),
        cx = format_coord(center.x),
        cy = format_coord(center.y),
    )
}

/// Write a rendered document to disk, creating parent directories as needed.
pub fn write_svg(path: impl AsRef<Path>, document: &str) -> Result<(), RenderError> {
    let path = path.as_ref();
    let write_error = |source| RenderError::Write {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_error)?;
    }
    std::fs::write(path, document).map_err(write_error)?;

    info!("Wrote {} ({} bytes)", path.display(), document.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{MatrixPointConfig, build_chart, build_matrix};
    use crate::instrument::InstrumentCatalog;
    use crate::series::{SeriesConfig, build_series};

    fn labels() -> Vec<String> {
        vec!["W1".to_string(), "W2".to_string(), "W3".to_string()]
    }

    #[test]
    fn test_escape_text() {
        assert_eq!(escape_text("S&P <500> \"x\" 'y'"), "S&amp;P &lt;500&gt; &quot;x&quot; &#39;y&#39;");
        assert_eq!(escape_text("EUR/USD"), "EUR/USD");
    }

    #[test]
    fn test_series_color_cycles() {
        assert_eq!(series_color(0), series_color(SERIES_PALETTE.len()));
        assert_ne!(series_color(0), series_color(1));
    }

    #[test]
    fn test_render_chart_contains_paths_and_callout() {
        let series = build_series(
            &labels(),
            &[SeriesConfig::new("eur_usd", vec![20.0, 50.0, 80.0]).with_label("EUR <> USD")],
            &InstrumentCatalog::new(),
        );
        let document = render_chart(&build_chart(&labels(), &series));

        assert!(document.starts_with("<svg"));
        assert!(document.trim_end().ends_with("</svg>"));
        assert!(document.contains(r#"d="M48,204.8 L320,140 L592,75.2""#));
        assert!(document.contains(r#"fill="url(#area-0)""#));
        assert!(document.contains("EUR &lt;&gt; USD 80"));
        assert!(document.contains(">W3</text>"));
        assert!(!document.contains("EUR <> USD"));
    }

    #[test]
    fn test_render_chart_skips_empty_series() {
        let series = build_series(
            &labels(),
            &[SeriesConfig::new("gbp_usd", vec![])],
            &InstrumentCatalog::new(),
        );
        let document = render_chart(&build_chart(&labels(), &series));

        assert!(!document.contains("data-instrument"));
        assert!(!document.contains("<circle"));
    }

    #[test]
    fn test_render_matrix_shades_quadrants_and_scales_markers() {
        let points = vec![MatrixPointConfig {
            instrument_id: "xau_usd".into(),
            label: Some("Gold".to_string()),
            short_term: 72.0,
            long_term: 66.0,
            direction: Direction::Bullish,
            conviction: 100.0,
        }];
        let document = render_matrix(&build_matrix(&points, &InstrumentCatalog::new()));

        assert_eq!(document.matches("fill-opacity=\"0.08\"").count(), 4);
        assert!(document.contains(r#"r="10""#));
        assert!(document.contains(">Gold</text>"));
        assert!(document.contains("Long term"));
    }

    #[test]
    fn test_write_svg_creates_parent_directories() {
        let dir = std::env::temp_dir().join(format!("desk-strength-svg-{}", std::process::id()));
        let path = dir.join("nested").join("chart.svg");

        write_svg(&path, "<svg></svg>").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<svg></svg>");

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
