/// Strength Board - live market movers in the terminal
///
/// - Market movers refreshed every minute and on every realtime change notification
/// - Strength table for the configured asset class
/// - Status line with realtime state, last refresh and the last feed error
///
/// Keys: `r` refresh now, `q`/`Esc` quit
use std::{
    error::Error,
    io,
    sync::Arc,
    time::{Duration, Instant},
};

use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use desk_strength::{
    DeskConfig, FeedConfig, HttpMomentumFeed, MomentumFeed, MomentumRefresher, RealtimeConfig,
    RealtimeNotifier, StrengthPanel,
};
use desk_strength_tui::{DeskSettings, init_file_logging, render_board};
use ratatui::{Terminal, backend::CrosstermBackend};
use rustls::crypto::ring::default_provider;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let _ = default_provider().install_default();

    let settings = DeskSettings::from_env();
    init_file_logging(&settings.log_path)?;

    let desk = DeskConfig::from_path(&settings.config_path)?;
    let asset_class = desk.asset_class(&settings.asset_class)?;
    let panel = StrengthPanel::build(asset_class, &desk.instruments);

    let feed_config = FeedConfig::from_env();
    let feed: Arc<dyn MomentumFeed> = Arc::new(HttpMomentumFeed::new(&feed_config)?);
    let notifier = RealtimeNotifier::new(RealtimeConfig::from_env())?;
    let realtime_status = notifier.status();

    info!(
        "Starting strength board for {} (feed {})",
        settings.asset_class, feed_config.url
    );

    let refresher = MomentumRefresher::spawn(
        &asset_class.market_movers.default_entries,
        feed,
        &notifier,
        feed_config.refresh_interval,
    );

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let draw_interval = Duration::from_millis(250);
    let mut last_draw: Option<Instant> = None;

    let result: Result<(), Box<dyn Error>> = loop {
        if event::poll(Duration::from_millis(5))? {
            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => break Ok(()),
                    KeyCode::Char('r') | KeyCode::Char('R') => {
                        info!("Manual refresh requested");
                        refresher.request_refresh();
                    }
                    _ => {}
                }
            }
        }

        if last_draw.is_none_or(|at| at.elapsed() >= draw_interval) {
            let board = refresher.board();
            let status = *realtime_status.borrow();

            terminal.draw(|f| {
                render_board(f, f.area(), &settings.asset_class, &panel, &board, status);
            })?;
            last_draw = Some(Instant::now());
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    };

    refresher.shutdown();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}
