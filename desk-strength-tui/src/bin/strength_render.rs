/// Strength Render - writes chart and matrix SVG documents
///
/// Renders every asset class named on the command line, or `DESK_ASSET_CLASS` when none is
/// given, into `<class>-chart.svg` and `<class>-matrix.svg` under `DESK_SVG_OUT_DIR`.
use std::error::Error;

use desk_strength::{
    DeskConfig, StrengthPanel,
    svg::{render_chart, render_matrix, write_svg},
};
use desk_strength_tui::{DeskSettings, init_logging};
use tracing::{info, warn};

fn main() -> Result<(), Box<dyn Error>> {
    init_logging();

    let settings = DeskSettings::from_env();
    let desk = DeskConfig::from_path(&settings.config_path)?;

    let mut asset_classes: Vec<String> = std::env::args().skip(1).collect();
    if asset_classes.is_empty() {
        asset_classes.push(settings.asset_class.clone());
    }

    for asset_class in &asset_classes {
        let panel = StrengthPanel::for_asset_class(&desk, asset_class)?;
        if panel.chart.series.is_empty() && panel.matrix.points.is_empty() {
            warn!("{} has no chart series or matrix points", asset_class);
        }

        write_svg(
            settings.svg_out_dir.join(format!("{asset_class}-chart.svg")),
            &render_chart(&panel.chart),
        )?;
        write_svg(
            settings.svg_out_dir.join(format!("{asset_class}-matrix.svg")),
            &render_matrix(&panel.matrix),
        )?;
    }

    info!(
        "Rendered {} asset classes to {}",
        asset_classes.len(),
        settings.svg_out_dir.display()
    );
    Ok(())
}
