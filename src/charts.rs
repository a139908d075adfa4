use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::Line,
    widgets::{Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame, Terminal,
};

use crate::models::{InsightReport, TopicStats, TrendEntry};

/// Raw mode for as long as the guard lives, restored on every exit path.
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

/// Opens the chart screen and blocks until the user presses `q` or `Esc`.
pub fn show(insights: &InsightReport) -> anyhow::Result<()> {
    let _raw = RawModeGuard::enable()?;
    execute!(io::stdout(), EnterAlternateScreen)?;

    let result = draw_until_closed(insights);

    execute!(io::stdout(), LeaveAlternateScreen)?;
    result
}

fn draw_until_closed(insights: &InsightReport) -> anyhow::Result<()> {
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
    let result = run_screen(&mut terminal, insights);
    terminal.show_cursor()?;
    result
}

fn run_screen(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    insights: &InsightReport,
) -> anyhow::Result<()> {
    loop {
        terminal.draw(|f| draw(f, insights))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press
                    && matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
                {
                    return Ok(());
                }
            }
        }
    }
}

pub fn draw(f: &mut Frame, insights: &InsightReport) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(50), // Topic accuracy
            Constraint::Min(0),         // Trend
            Constraint::Length(1),      // Help bar
        ])
        .split(f.area());

    draw_topic_accuracy(f, &insights.topic_stats, chunks[0]);
    draw_trend(f, &insights.trend_window, chunks[1]);

    let help = Paragraph::new("q/Esc: close charts").style(Style::default().fg(Color::DarkGray));
    f.render_widget(help, chunks[2]);
}

/// Mean accuracy per topic as whole percentages. Topics with no accuracy
/// data have no bar.
pub fn accuracy_bars(stats: &[TopicStats]) -> Vec<(String, u64)> {
    stats
        .iter()
        .filter(|row| !row.accuracy.is_nan())
        .map(|row| {
            let percent = (row.accuracy.clamp(0.0, 1.0) * 100.0).round() as u64;
            (row.topic.clone(), percent)
        })
        .collect()
}

/// (unix seconds, accuracy) pairs in time order. Entries without a parsed
/// time or an accuracy are left out.
pub fn trend_points(window: &[TrendEntry]) -> Vec<(f64, f64)> {
    let mut points: Vec<(f64, f64)> = window
        .iter()
        .filter_map(|entry| {
            let at = entry.submitted_at?;
            let accuracy = entry.accuracy()?;
            Some((at.timestamp() as f64, accuracy))
        })
        .collect();
    points.sort_by(|a, b| a.0.total_cmp(&b.0));
    points
}

fn draw_topic_accuracy(f: &mut Frame, stats: &[TopicStats], area: Rect) {
    let values = accuracy_bars(stats);
    let bars: Vec<Bar> = values
        .iter()
        .map(|(topic, percent)| {
            Bar::default()
                .label(Line::from(topic.as_str()))
                .value(*percent)
                .text_value(format!("{:.2}", *percent as f64 / 100.0))
                .style(Style::default().fg(Color::Green))
        })
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Average Accuracy by Topic "),
        )
        .data(BarGroup::default().bars(&bars))
        .bar_width(9)
        .bar_gap(2)
        .max(100)
        .value_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Green)
                .add_modifier(Modifier::BOLD),
        );

    f.render_widget(chart, area);
}

fn draw_trend(f: &mut Frame, window: &[TrendEntry], area: Rect) {
    let points = trend_points(window);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Recent Accuracy Trends ");

    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        let empty = Paragraph::new("No timestamped submissions to plot.").block(block);
        f.render_widget(empty, area);
        return;
    };

    let (mut start, mut end) = (first.0, last.0);
    if start == end {
        start -= 3600.0;
        end += 3600.0;
    }

    let datasets = vec![
        Dataset::default()
            .name("accuracy")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Blue))
            .data(&points),
        Dataset::default()
            .marker(symbols::Marker::Dot)
            .graph_type(GraphType::Scatter)
            .style(Style::default().fg(Color::Cyan))
            .data(&points),
    ];

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .title("submission time")
                .style(Style::default().fg(Color::Gray))
                .bounds([start, end])
                .labels([time_label(start), time_label(end)]),
        )
        .y_axis(
            Axis::default()
                .title("accuracy")
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, 1.0])
                .labels(["0.0", "0.5", "1.0"]),
        );

    f.render_widget(chart, area);
}

fn time_label(seconds: f64) -> String {
    chrono::DateTime::from_timestamp(seconds as i64, 0)
        .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::parse_timestamp;
    use crate::models::{Persona, Submission};
    use ratatui::backend::TestBackend;

    fn stats(topic: &str, accuracy: f64) -> TopicStats {
        TopicStats {
            topic: topic.to_string(),
            accuracy,
            difficulty: 1.0,
            score: 1.0,
        }
    }

    fn entry(time: Option<&str>, accuracy: Option<f64>) -> TrendEntry {
        TrendEntry {
            submission: Submission {
                topic: Some("T".to_string()),
                accuracy,
                submission_time: time.map(str::to_string),
                ..Submission::default()
            },
            submitted_at: time.and_then(parse_timestamp),
        }
    }

    fn screen_text(insights: &InsightReport) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|f| draw(f, insights)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn insights(window: Vec<TrendEntry>) -> InsightReport {
        InsightReport {
            current_count: 1,
            history_count: window.len(),
            topic_stats: vec![stats("Algebra", 0.8), stats("Optics", 0.45)],
            trend_window: window,
            weak_topics: vec![],
            improvements: vec![],
            persona: Persona::InsufficientData,
            recommendations: vec![],
        }
    }

    #[test]
    fn raw_mode_is_restored_when_guard_drops() {
        // Without a controlling terminal raw mode cannot be entered at all.
        let Ok(guard) = RawModeGuard::enable() else {
            return;
        };
        assert!(crossterm::terminal::is_raw_mode_enabled().unwrap());
        drop(guard);
        assert!(!crossterm::terminal::is_raw_mode_enabled().unwrap());
    }

    #[test]
    fn bars_skip_undefined_means() {
        let bars = accuracy_bars(&[stats("A", 0.456), stats("B", f64::NAN), stats("C", 1.2)]);
        assert_eq!(bars, vec![("A".to_string(), 46), ("C".to_string(), 100)]);
    }

    #[test]
    fn points_are_time_ordered_and_complete() {
        let window = vec![
            entry(Some("2024-01-03"), Some(0.3)),
            entry(Some("garbage"), Some(0.9)),
            entry(Some("2024-01-01"), Some(0.1)),
            entry(Some("2024-01-02"), None),
        ];

        let points = trend_points(&window);
        assert_eq!(points.len(), 2);
        assert!(points[0].0 < points[1].0);
        assert_eq!(points[0].1, 0.1);
        assert_eq!(points[1].1, 0.3);
    }

    #[test]
    fn both_charts_render() {
        let window = vec![
            entry(Some("2024-01-02 10:00:00"), Some(0.6)),
            entry(Some("2024-01-01 10:00:00"), Some(0.4)),
        ];

        let text = screen_text(&insights(window));
        assert!(text.contains("Average Accuracy by Topic"));
        assert!(text.contains("Recent Accuracy Trends"));
        assert!(text.contains("Algebra"));
    }

    #[test]
    fn trend_without_timestamps_shows_placeholder() {
        let text = screen_text(&insights(vec![entry(None, Some(0.5))]));
        assert!(text.contains("No timestamped submissions to plot."));
    }
}
