use portal_core::{Bounds, Button, HistorySource, HistoryWindow, Scene, ViewKind};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use crate::layout::ScreenMap;
use crate::theme::Palette;

/// What the chart currently shows.
#[derive(Debug, Clone, Default)]
pub struct ChartFrame {
    pub points: Vec<f32>,
    pub range:  (f32, f32),
}

/// Draw one frame of the panel.
pub fn draw(
    frame: &mut Frame<'_>,
    scene: &Scene<'_>,
    chart: &ChartFrame,
    palette: Palette,
    map: &ScreenMap,
    chart_area: Bounds,
) {
    let base = Style::default().bg(palette.background).fg(palette.foreground);
    frame.render_widget(Block::default().style(base), map.area());

    for view in scene.views.views() {
        draw_button(frame, &view.tab, map, palette, TabStyle::Tab);
    }

    let tab_bottom = scene
        .views
        .views()
        .iter()
        .map(|v| v.tab.bounds.y.saturating_add(v.tab.bounds.height))
        .max()
        .unwrap_or(0);
    let screen = map.screen();
    let body = map.to_rect(Bounds::new(
        0,
        tab_bottom,
        screen.width,
        screen.height.saturating_sub(tab_bottom),
    ));

    match scene.views.current_view().kind {
        ViewKind::Feed => draw_feed(frame, scene, body, base),
        ViewKind::Chart => {
            draw_chart(frame, chart, map.to_rect(chart_area), palette);
            for b in scene.controls {
                draw_button(frame, b, map, palette, TabStyle::Control);
            }
            draw_chart_caption(frame, scene, body, base);
        }
        ViewKind::Info => draw_info(frame, scene, body, base),
    }
}

#[derive(Clone, Copy)]
enum TabStyle {
    /// Tab bar: `selected` marks the inactive tabs.
    Tab,
    /// Radio controls: `selected` marks the active choice.
    Control,
}

fn draw_button(frame: &mut Frame<'_>, b: &Button, map: &ScreenMap, palette: Palette, kind: TabStyle) {
    let active = match kind {
        TabStyle::Tab => !b.selected,
        TabStyle::Control => b.selected,
    };
    let style = if active {
        Style::default()
            .bg(palette.accent)
            .fg(palette.foreground)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().bg(palette.tab_fill).fg(palette.background)
    };

    let rect = map.to_rect(b.bounds);
    if rect.width == 0 || rect.height == 0 {
        return;
    }
    let label = Paragraph::new(b.label.as_str())
        .alignment(Alignment::Center)
        .style(style)
        .block(Block::default().borders(Borders::ALL).border_style(style));
    frame.render_widget(label, rect);
}

fn draw_feed(frame: &mut Frame<'_>, scene: &Scene<'_>, area: Rect, base: Style) {
    let s = scene.state;
    let value = s.feed_value.as_deref().unwrap_or("--");
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(value.to_string(), base.add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from(temperature_text(s.temperature)),
    ];
    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center).style(base),
        area,
    );
}

fn draw_chart(frame: &mut Frame<'_>, chart: &ChartFrame, area: Rect, palette: Palette) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let data: Vec<(f64, f64)> = chart
        .points
        .iter()
        .enumerate()
        .map(|(i, v)| (i as f64, f64::from(*v)))
        .collect();

    let (lo, hi) = axis_bounds(chart.range);
    let max_x = (data.len().saturating_sub(1)).max(1) as f64;

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(palette.foreground))
        .data(&data);

    let y_labels = vec![format!("{lo:.0}"), format!("{hi:.0}")];
    let widget = Chart::new(vec![dataset])
        .style(Style::default().bg(palette.background))
        .x_axis(Axis::default().bounds([0.0, max_x]))
        .y_axis(
            Axis::default()
                .style(Style::default().fg(palette.tab_fill))
                .labels(y_labels)
                .bounds([lo, hi]),
        );
    frame.render_widget(widget, area);
}

fn draw_chart_caption(frame: &mut Frame<'_>, scene: &Scene<'_>, body: Rect, base: Style) {
    let s = scene.state;
    let window = match s.window {
        HistoryWindow::Short => "short",
        HistoryWindow::Long => "long",
    };
    let source = match s.source {
        HistorySource::Remote => "feed",
        HistorySource::Local => "log",
    };
    let text = format!("{}  {window}/{source}", temperature_text(s.temperature));
    let line = Rect::new(body.x, body.bottom().saturating_sub(1), body.width, 1.min(body.height));
    frame.render_widget(Paragraph::new(text).alignment(Alignment::Right).style(base), line);
}

fn draw_info(frame: &mut Frame<'_>, scene: &Scene<'_>, area: Rect, base: Style) {
    let s = scene.state;
    let cpu = s
        .cpu_temp
        .map_or_else(|| "n/a".to_string(), |t| format!("{t:.1} °C"));
    let touch = s
        .last_touch
        .map_or_else(|| "none".to_string(), |p| format!("{}, {}", p.x, p.y));
    let reload = s
        .last_reload
        .map_or_else(|| "not yet".to_string(), |n| format!("{n} points"));

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            s.time.format("%H:%M:%S").to_string(),
            base.add_modifier(Modifier::BOLD),
        )),
        Line::from(s.time.format("%Y-%m-%d").to_string()),
        Line::from(""),
        Line::from(temperature_text(s.temperature)),
        Line::from(format!("CPU: {cpu}")),
        Line::from(format!("Sensor: {}", if s.sensor_ok { "ok" } else { "absent" })),
        Line::from(format!("Last touch: {touch}")),
        Line::from(format!("History: {reload}")),
    ];
    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center).style(base),
        area,
    );
}

fn temperature_text(t: Option<f32>) -> String {
    t.map_or_else(|| "Temperature: --".to_string(), |t| format!("Temperature: {t:.1} °C"))
}

/// Chart axis bounds.  A degenerate range is widened so the axis can draw.
fn axis_bounds((lo, hi): (f32, f32)) -> (f64, f64) {
    let (lo, hi) = (f64::from(lo), f64::from(hi));
    if hi > lo {
        (lo, hi)
    } else {
        (lo - 1.0, lo + 1.0)
    }
}
