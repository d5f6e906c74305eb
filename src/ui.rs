use crate::app::App;
use crate::state::{Bound, Phase};
use crate::stats::{TrackStats, format_count, format_km, format_m};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, Gauge, GraphType, Paragraph},
};

/// Renders the entire UI.
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Body
            Constraint::Length(3), // Footer/help
        ])
        .split(frame.area());

    render_header(frame, chunks[0], app);
    match app.view.phase() {
        Phase::Empty => render_load_prompt(frame, chunks[1]),
        Phase::Loaded => match app.view.data_range() {
            Some(range) => render_profile(frame, chunks[1], app, range),
            None => render_no_span(frame, chunks[1]),
        },
    }
    render_footer(frame, chunks[2], app);
}

/// Renders the header with title, load state and whole-track figures.
fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let resource = app.view.source().name();

    let mut spans = vec![
        Span::styled(
            "trackview",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" │ "),
        Span::styled(resource, Style::default().fg(Color::White)),
    ];

    match &app.track_stats {
        Some(stats) => {
            spans.push(Span::raw(" │ "));
            spans.push(Span::styled(
                format!(
                    "{} samples, {}, +{} / -{}",
                    format_count(stats.samples),
                    format_km(stats.span_km()),
                    format_m(stats.ascent),
                    format_m(stats.descent)
                ),
                Style::default().fg(Color::DarkGray),
            ));
        }
        None => {
            spans.push(Span::raw(" │ "));
            spans.push(Span::styled("not loaded", Style::default().fg(Color::DarkGray)));
        }
    }

    if app.view.downsample() {
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled("1:100", Style::default().fg(Color::Magenta)));
    }

    if let Some((at, message)) = &app.status {
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled(
            format!("{} {}", at.format("%H:%M:%S"), message),
            Style::default().fg(Color::Yellow),
        ));
    }

    let header = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::BOTTOM));

    frame.render_widget(header, area);
}

/// Renders the prompt shown before a track is loaded.
fn render_load_prompt(frame: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "[ Load ]",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Press Enter to load the track",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let prompt = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Track"));
    frame.render_widget(prompt, area);
}

/// Renders the notice for a track whose distance does not advance.
fn render_no_span(frame: &mut Frame, area: Rect) {
    let notice = Paragraph::new("Track has no distance span to display")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL).title("Track"));
    frame.render_widget(notice, area);
}

/// Renders the altitude chart, selection figures and the two bound sliders.
fn render_profile(frame: &mut Frame, area: Rect, app: &App, range: (f64, f64)) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(6),    // Chart + selection
            Constraint::Length(3), // Start slider
            Constraint::Length(3), // End slider
        ])
        .split(area);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(75), Constraint::Percentage(25)])
        .split(rows[0]);

    let points = app.view.current_display_data();
    render_chart(frame, top[0], &points);
    render_selection(frame, top[1], &points);
    render_slider(frame, rows[1], app, Bound::Min, range);
    render_slider(frame, rows[2], app, Bound::Max, range);
}

/// Axis bounds for a series, padded so flat or single-sample data stays visible.
fn axis_bounds(values: impl Iterator<Item = f64>) -> [f64; 2] {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !min.is_finite() || !max.is_finite() {
        return [0.0, 1.0];
    }
    if (max - min).abs() < f64::EPSILON {
        let pad = min.abs().max(1.0) * 0.1;
        [min - pad, max + pad]
    } else {
        let pad = (max - min) * 0.1;
        [min - pad, max + pad]
    }
}

fn axis_labels<'a>(bounds: [f64; 2], format: fn(f64) -> String) -> Vec<Span<'a>> {
    let mid = (bounds[0] + bounds[1]) / 2.0;
    [bounds[0], mid, bounds[1]]
        .into_iter()
        .map(|v| Span::styled(format(v), Style::default().fg(Color::DarkGray)))
        .collect()
}

/// Renders the altitude line chart.
fn render_chart(frame: &mut Frame, area: Rect, points: &[(f64, f64)]) {
    let x_bounds = match (points.first(), points.last()) {
        (Some(first), Some(last)) if first.0 < last.0 => [first.0, last.0],
        _ => axis_bounds(points.iter().map(|p| p.0)),
    };
    let y_bounds = axis_bounds(points.iter().map(|p| p.1));

    let dataset = Dataset::default()
        .name("Altitude")
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Cyan))
        .data(points);

    let chart = Chart::new(vec![dataset])
        .block(Block::default().borders(Borders::ALL).title("Profile"))
        .x_axis(
            Axis::default()
                .title("Distance (km)")
                .style(Style::default().fg(Color::Gray))
                .bounds(x_bounds)
                .labels(axis_labels(x_bounds, |v| format!("{:.1}", v))),
        )
        .y_axis(
            Axis::default()
                .title("Altitude (m)")
                .style(Style::default().fg(Color::Gray))
                .bounds(y_bounds)
                .labels(axis_labels(y_bounds, |v| format!("{:.0}", v))),
        );

    frame.render_widget(chart, area);
}

/// Renders figures for the selected samples.
fn render_selection(frame: &mut Frame, area: Rect, points: &[(f64, f64)]) {
    let block = Block::default().borders(Borders::ALL).title("Selection");

    let Some(stats) = TrackStats::from_samples(points) else {
        let no_data = Paragraph::new("No samples")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(no_data, area);
        return;
    };

    let value = |label: &'static str, text: String| {
        Line::from(vec![
            Span::raw(label),
            Span::styled(text, Style::default().fg(Color::Cyan)),
        ])
    };

    let text = vec![
        value("Samples: ", format_count(stats.samples)),
        value("From: ", format_km(stats.start_km)),
        value("To: ", format_km(stats.end_km)),
        value("Length: ", format_km(stats.span_km())),
        value("Lowest: ", format_m(stats.min_altitude)),
        value("Highest: ", format_m(stats.max_altitude)),
        value("Ascent: ", format_m(stats.ascent)),
        value("Descent: ", format_m(stats.descent)),
    ];

    frame.render_widget(Paragraph::new(text).block(block), area);
}

/// Position of `value` within `range`, as a ratio in [0, 1].
fn slider_ratio(value: f64, range: (f64, f64)) -> f64 {
    let (lo, hi) = range;
    if hi <= lo {
        return 0.0;
    }
    ((value - lo) / (hi - lo)).clamp(0.0, 1.0)
}

/// Renders one bound as a horizontal slider.
fn render_slider(frame: &mut Frame, area: Rect, app: &App, bound: Bound, range: (f64, f64)) {
    let value = app.view.bound(bound);
    let title = match bound {
        Bound::Min => "Start",
        Bound::Max => "End",
    };
    let focused = app.focus == bound;

    let border_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let label = format!(
        "{}  ({} … {})",
        format_km(value),
        format_km(range.0),
        format_km(range.1)
    );

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(title),
        )
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio(slider_ratio(value, range))
        .label(label);

    frame.render_widget(gauge, area);
}

/// Renders the footer with help text.
fn render_footer(frame: &mut Frame, area: Rect, app: &App) {
    let spans = match app.view.phase() {
        Phase::Empty => vec![
            Span::styled("Enter", Style::default().fg(Color::Yellow)),
            Span::raw(" load  "),
            Span::styled("q", Style::default().fg(Color::Yellow)),
            Span::raw(" quit"),
        ],
        Phase::Loaded => vec![
            Span::styled("Tab", Style::default().fg(Color::Yellow)),
            Span::raw(" start/end  "),
            Span::styled("←/→", Style::default().fg(Color::Yellow)),
            Span::raw(format!(" move {}  ", format_km(app.step))),
            Span::styled("Home/End", Style::default().fg(Color::Yellow)),
            Span::raw(" jump  "),
            Span::styled("d", Style::default().fg(Color::Yellow)),
            Span::raw(" downsample  "),
            Span::styled("s", Style::default().fg(Color::Yellow)),
            Span::raw(" snapshot  "),
            Span::styled("q", Style::default().fg(Color::Yellow)),
            Span::raw(" quit"),
        ],
    };

    let help = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::TOP));

    frame.render_widget(help, area);
}
