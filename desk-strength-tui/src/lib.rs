/// Desk Strength TUI - Shared Library
///
/// Common functionality for the two binaries:
/// - strength-board: live market movers board with the strength table
/// - strength-render: writes chart and matrix SVG files for asset classes
pub mod logging;
pub mod settings;
pub mod widget;

pub use logging::{init_file_logging, init_logging};
pub use settings::DeskSettings;
pub use widget::{render_board, render_score_bar};
