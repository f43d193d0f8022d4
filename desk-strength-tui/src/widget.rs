//! Ratatui widgets for the strength board - movers on the left, strength table on the right

use desk_strength::{
    MomentumBoard, MomentumClassification, MomentumEntry, RealtimeStatus, Sentiment,
    StrengthEntry, StrengthPanel,
};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

const C_BUY: Color = Color::Rgb(100, 220, 100);
const C_BUY_SOFT: Color = Color::Rgb(150, 200, 150);
const C_SELL: Color = Color::Rgb(220, 100, 100);
const C_SELL_SOFT: Color = Color::Rgb(200, 150, 150);
const C_NEUTRAL: Color = Color::Rgb(180, 180, 100);
const C_DIM: Color = Color::Rgb(120, 120, 120);
const C_BRIGHT: Color = Color::Rgb(220, 220, 220);
const C_ACCENT: Color = Color::Rgb(100, 180, 220);

/// Width of the label column in both panels
const LABEL_WIDTH: usize = 10;

pub fn classification_color(classification: MomentumClassification) -> Color {
    match classification {
        MomentumClassification::VeryBullish => C_BUY,
        MomentumClassification::Bullish => C_BUY_SOFT,
        MomentumClassification::Bearish => C_SELL_SOFT,
        MomentumClassification::VeryBearish => C_SELL,
    }
}

pub fn sentiment_color(sentiment: Sentiment) -> Color {
    match sentiment {
        Sentiment::Bullish => C_BUY,
        Sentiment::Bearish => C_SELL,
        Sentiment::Neutral => C_NEUTRAL,
    }
}

/// Render the whole board: header, movers and strength side by side, status line
pub fn render_board(
    f: &mut Frame,
    area: Rect,
    asset_class: &str,
    panel: &StrengthPanel,
    board: &MomentumBoard,
    realtime: RealtimeStatus,
) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    let header = Line::from(vec![
        Span::styled(
            format!(" {} ", asset_class.to_uppercase()),
            Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD),
        ),
        Span::styled("market strength", Style::default().fg(C_DIM)),
    ]);
    f.render_widget(Paragraph::new(header), rows[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(rows[1]);

    render_movers_panel(f, columns[0], board, realtime);
    render_strength_panel(f, columns[1], &panel.entries);
    render_status_line(f, rows[2], board, realtime);
}

/// Market movers with a score bar per entry, centred on the 50 pivot
pub fn render_movers_panel(
    f: &mut Frame,
    area: Rect,
    board: &MomentumBoard,
    realtime: RealtimeStatus,
) {
    let border_color = match realtime {
        RealtimeStatus::Connected => C_ACCENT,
        _ => C_DIM,
    };

    let block = Block::default()
        .title(" MARKET MOVERS ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    let inner = block.inner(area);
    f.render_widget(block, area);

    if board.entries.is_empty() {
        let text = if board.loading { "Loading..." } else { "No movers" };
        f.render_widget(
            Paragraph::new(Line::from(Span::styled(text, Style::default().fg(C_DIM)))),
            inner,
        );
        return;
    }

    // label + space + bar + space + score + space + classification
    let bar_width = (inner.width as usize).saturating_sub(LABEL_WIDTH + 22).max(10);

    let lines: Vec<Line> = board
        .entries
        .iter()
        .map(|entry| mover_line(entry, bar_width))
        .collect();

    f.render_widget(Paragraph::new(lines), inner);
}

fn mover_line(entry: &MomentumEntry, bar_width: usize) -> Line<'static> {
    let color = classification_color(entry.classification);
    Line::from(vec![
        Span::styled(
            format!("{:<width$} ", truncate(&entry.display, LABEL_WIDTH), width = LABEL_WIDTH),
            Style::default().fg(C_BRIGHT),
        ),
        Span::styled(render_score_bar(entry.score, bar_width), Style::default().fg(color)),
        Span::styled(
            format!(" {:>5}", entry.formatted_score()),
            Style::default().fg(C_BRIGHT).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" {}", entry.classification), Style::default().fg(color)),
    ])
}

/// Strength scores with sentiment and day change
pub fn render_strength_panel(f: &mut Frame, area: Rect, entries: &[StrengthEntry]) {
    let block = Block::default()
        .title(" STRENGTH ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(C_ACCENT));

    let inner = block.inner(area);
    f.render_widget(block, area);

    let lines: Vec<Line> = entries
        .iter()
        .map(|entry| {
            let change_color = match entry.day_change_is_positive() {
                Some(true) => C_BUY,
                Some(false) => C_SELL,
                None => C_DIM,
            };
            Line::from(vec![
                Span::styled(
                    format!("{:<width$} ", truncate(&entry.label, LABEL_WIDTH), width = LABEL_WIDTH),
                    Style::default().fg(C_BRIGHT),
                ),
                Span::styled(
                    format!("{:>5}", entry.formatted_score()),
                    Style::default().fg(C_BRIGHT).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!(" {:<9}", entry.sentiment.as_str()),
                    Style::default().fg(sentiment_color(entry.sentiment)),
                ),
                Span::styled(format!(" {}", entry.day_change), Style::default().fg(change_color)),
            ])
        })
        .collect();

    f.render_widget(Paragraph::new(lines), inner);
}

/// Realtime status, last refresh time, last error and key help
pub fn render_status_line(f: &mut Frame, area: Rect, board: &MomentumBoard, realtime: RealtimeStatus) {
    let (live_text, live_color) = match realtime {
        RealtimeStatus::Connected => ("● LIVE", C_BUY),
        RealtimeStatus::Reconnecting => ("◐ RECONNECTING", C_NEUTRAL),
        RealtimeStatus::Disconnected => ("○ OFFLINE", C_DIM),
    };

    let refreshed = board
        .last_success
        .map(|at| at.format("%H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "--".to_string());

    let mut spans = vec![
        Span::styled(format!(" {live_text} "), Style::default().fg(live_color)),
        Span::styled(format!(" refreshed {refreshed} "), Style::default().fg(C_DIM)),
    ];
    if board.loading {
        spans.push(Span::styled(" loading ", Style::default().fg(C_NEUTRAL)));
    }
    if let Some(error) = &board.error {
        spans.push(Span::styled(
            format!(" ⚠ {error} "),
            Style::default().fg(C_SELL).add_modifier(Modifier::BOLD),
        ));
    }
    spans.push(Span::styled(" [r] refresh [q] quit", Style::default().fg(C_DIM)));

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render score bar: deviation from the 50 pivot on a 0..100 scale
/// Bar fills FROM CENTER to the current score position
pub fn render_score_bar(score: f64, width: usize) -> String {
    if width < 5 {
        return "".to_string();
    }

    let normalized = score.clamp(0.0, 100.0) / 100.0;
    let position = (normalized * width as f64).clamp(0.0, (width - 1) as f64) as usize;
    let center = width / 2;

    let mut bar = String::new();
    for i in 0..width {
        if i == center {
            bar.push('│');
        } else if position < center && i >= position && i < center {
            bar.push('█');
        } else if position > center && i > center && i <= position {
            bar.push('█');
        } else {
            bar.push('░');
        }
    }
    bar
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let mut truncated: String = text.chars().take(max.saturating_sub(1)).collect();
        truncated.push('…');
        truncated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use desk_strength::RawMomentumEntry;
    use ratatui::{Terminal, backend::TestBackend};

    #[test]
    fn test_score_bar_pivot_only_at_fifty() {
        let bar = render_score_bar(50.0, 11);
        assert_eq!(bar.chars().count(), 11);
        assert_eq!(bar.chars().filter(|&c| c == '█').count(), 0);
        assert_eq!(bar.chars().nth(5), Some('│'));
    }

    #[test]
    fn test_score_bar_fills_towards_score() {
        let strong = render_score_bar(100.0, 11);
        assert!(strong.starts_with("░░░░░│"));
        assert!(strong.ends_with("█████"));

        let weak = render_score_bar(0.0, 11);
        assert!(weak.starts_with("█████│"));
        assert!(weak.ends_with("░░░░░"));
    }

    #[test]
    fn test_score_bar_too_narrow() {
        assert_eq!(render_score_bar(80.0, 4), "");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("EUR/USD", 10), "EUR/USD");
        assert_eq!(truncate("Brent Crude Oil", 10), "Brent Cru…");
    }

    #[test]
    fn test_render_board_shows_movers_and_error() {
        let mut board = MomentumBoard::from_defaults(&[
            RawMomentumEntry::new("EURUSD", 72.0).with_display("EUR/USD"),
        ]);
        board.loading = false;
        board.error = Some("Unable to load market movers".to_string());

        let panel = StrengthPanel::build(&Default::default(), &Default::default());

        let mut terminal = Terminal::new(TestBackend::new(120, 12)).unwrap();
        terminal
            .draw(|f| {
                render_board(f, f.area(), "forex", &panel, &board, RealtimeStatus::Connected)
            })
            .unwrap();

        let rendered: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();

        assert!(rendered.contains("FOREX"));
        assert!(rendered.contains("EUR/USD"));
        assert!(rendered.contains("Very Bullish"));
        assert!(rendered.contains("Unable to load market movers"));
        assert!(rendered.contains("LIVE"));
    }
}
