use super::axis::{cell_offset, padded_bounds, tick_rows, ticks, time_bounds, value_range};
use super::state::{ChartView, ViewerState};
use equiplot_domain::services::chart::MarkerKind;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Context, Line as CanvasLine, Points};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

const LINE_COLOR: Color = Color::Blue;
const GRID_COLOR: Color = Color::DarkGray;
const ZERO_COLOR: Color = Color::Gray;
const LOG_PANEL_HEIGHT: u16 = 8;

/// One chart surface: a line series, optional markers, axes and legend.
struct Plot {
    title: String,
    series: Vec<(f64, f64)>,
    markers: Vec<(f64, f64, MarkerKind)>,
    legend: Vec<Span<'static>>,
    x: (f64, f64),
    y: (f64, f64),
    value_suffix: &'static str,
    zero_line: bool,
}

pub fn draw(frame: &mut Frame, state: &ViewerState) {
    let log_height = if state.show_logs { LOG_PANEL_HEIGHT } else { 0 };
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(8),
            Constraint::Length(4),
            Constraint::Length(log_height),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let plot = match state.view {
        ChartView::Equity => equity_plot(state),
        ChartView::Returns => returns_plot(state),
    };
    draw_plot(frame, rows[0], &plot, state);
    draw_summary(frame, rows[1], state);
    if state.show_logs {
        draw_logs(frame, rows[2], state);
    }
    draw_footer(frame, rows[3], state);
}

pub fn marker_color(kind: MarkerKind) -> Color {
    match kind {
        MarkerKind::Entry => Color::Green,
        MarkerKind::Exit => Color::Red,
    }
}

fn equity_plot(state: &ViewerState) -> Plot {
    let model = &state.chart.model;
    let series = model
        .line
        .iter()
        .map(|p| (p.timestamp_ms as f64, p.equity))
        .collect();
    let markers = model
        .markers
        .iter()
        .map(|m| (m.timestamp_ms as f64, m.price, m.kind))
        .collect();

    let mut legend = legend_entry("─", "Equity Curve", LINE_COLOR);
    for kind in [MarkerKind::Entry, MarkerKind::Exit] {
        if model.marker_count(kind) > 0 {
            legend.push(Span::raw("  "));
            legend.extend(legend_entry(kind.glyph(), kind.label(), marker_color(kind)));
        }
    }

    Plot {
        title: state.config.chart.title.clone(),
        series,
        markers,
        legend,
        x: time_bounds(model.time_bounds().map(|(lo, hi)| (lo as f64, hi as f64))),
        y: padded_bounds(model.value_bounds()),
        value_suffix: "",
        zero_line: false,
    }
}

fn returns_plot(state: &ViewerState) -> Plot {
    let series: Vec<(f64, f64)> = state
        .chart
        .returns
        .iter()
        .map(|(ts, pct)| (*ts as f64, *pct))
        .collect();
    let x = time_bounds(value_range(series.iter().map(|p| p.0)));
    // Zero stays in range so the baseline is always visible.
    let y = padded_bounds(value_range(
        series.iter().map(|p| p.1).chain(std::iter::once(0.0)),
    ));

    Plot {
        title: format!("{} · Returns (%)", state.config.chart.title),
        series,
        markers: Vec::new(),
        legend: legend_entry("─", "Returns (%)", LINE_COLOR),
        x,
        y,
        value_suffix: "%",
        zero_line: true,
    }
}

fn legend_entry(symbol: &'static str, label: &'static str, color: Color) -> Vec<Span<'static>> {
    vec![
        Span::styled(format!("{symbol} "), Style::default().fg(color)),
        Span::raw(label),
    ]
}

fn draw_plot(frame: &mut Frame, area: Rect, plot: &Plot, state: &ViewerState) {
    let chart_cfg = &state.config.chart;
    let block = Block::default().borders(Borders::ALL).title(
        Line::from(Span::styled(
            plot.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .centered(),
    );
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.width < 24 || inner.height < 6 {
        frame.render_widget(Paragraph::new("terminal too small"), inner);
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(2),
            Constraint::Length(2),
            Constraint::Length(1),
        ])
        .split(inner);

    let y_ticks = ticks(plot.y.0, plot.y.1, usize::from((rows[1].height / 3).clamp(2, 8)));
    let y_labels: Vec<String> = y_ticks
        .iter()
        .map(|v| format!("{v:.2}{}", plot.value_suffix))
        .collect();
    let gutter = y_labels.iter().map(|l| l.chars().count()).max().unwrap_or(0) as u16 + 1;
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(gutter), Constraint::Min(1)])
        .split(rows[1]);
    let canvas_area = cols[1];

    let zone = state.chart.model.zone;
    let sample_label = zone.format(plot.x.0.round() as i64, &chart_cfg.time_format);
    let label_width = sample_label
        .split_whitespace()
        .map(|part| part.chars().count())
        .max()
        .unwrap_or(1) as u16;
    let x_count = (canvas_area.width / (label_width + 3)).clamp(2, 6);
    let x_ticks = ticks(plot.x.0, plot.x.1, usize::from(x_count));
    let x_placements: Vec<(u16, String)> = x_ticks
        .iter()
        .map(|x| {
            (
                cell_offset(*x, plot.x.0, plot.x.1, canvas_area.width),
                zone.format(x.round() as i64, &chart_cfg.time_format),
            )
        })
        .collect();

    let axis_style = Style::default().fg(Color::Gray);
    frame.render_widget(
        Paragraph::new(Span::styled(chart_cfg.y_label.clone(), axis_style)),
        rows[0],
    );
    draw_legend(frame, rows[0], chart_cfg.y_label.chars().count(), &plot.legend);
    frame.render_widget(
        Paragraph::new(y_tick_column(&y_ticks, &y_labels, plot.y, canvas_area.height, gutter))
            .style(axis_style),
        cols[0],
    );

    let grid = chart_cfg.grid;
    let canvas = Canvas::default()
        .marker(Marker::Braille)
        .x_bounds([plot.x.0, plot.x.1])
        .y_bounds([plot.y.0, plot.y.1])
        .paint(|ctx| {
            if grid {
                for x in &x_ticks {
                    ctx.draw(&CanvasLine::new(*x, plot.y.0, *x, plot.y.1, GRID_COLOR));
                }
                for y in &y_ticks {
                    ctx.draw(&CanvasLine::new(plot.x.0, *y, plot.x.1, *y, GRID_COLOR));
                }
                ctx.layer();
            }
            if plot.zero_line {
                draw_dashed_zero(ctx, plot.x);
                ctx.layer();
            }
            draw_series(ctx, &plot.series);
            // Trades landing in the same cell share it; the later glyph is the
            // one shown and the summary strip keeps the exact counts.
            for (x, y, kind) in &plot.markers {
                ctx.print(
                    *x,
                    *y,
                    Span::styled(
                        kind.glyph(),
                        Style::default()
                            .fg(marker_color(*kind))
                            .add_modifier(Modifier::BOLD),
                    ),
                );
            }
            if plot.series.is_empty() && plot.markers.is_empty() {
                ctx.print(
                    (plot.x.0 + plot.x.1) / 2.0,
                    (plot.y.0 + plot.y.1) / 2.0,
                    Span::styled("no data", axis_style),
                );
            }
        });
    frame.render_widget(canvas, canvas_area);

    let (top, bottom) = tick_rows(&x_placements, canvas_area.width);
    let x_ticks_area = Rect {
        x: canvas_area.x,
        y: rows[2].y,
        width: canvas_area.width,
        height: rows[2].height,
    };
    frame.render_widget(
        Paragraph::new(vec![Line::from(top), Line::from(bottom)]).style(axis_style),
        x_ticks_area,
    );
    let x_label_area = Rect {
        x: canvas_area.x,
        y: rows[3].y,
        width: canvas_area.width,
        height: 1,
    };
    frame.render_widget(
        Paragraph::new(Span::styled(chart_cfg.x_label.clone(), axis_style))
            .alignment(Alignment::Center),
        x_label_area,
    );
}

fn y_tick_column(
    ticks: &[f64],
    labels: &[String],
    (min, max): (f64, f64),
    height: u16,
    gutter: u16,
) -> Vec<Line<'static>> {
    if height == 0 {
        return Vec::new();
    }
    let width = usize::from(gutter.saturating_sub(1));
    let mut rows = vec![String::new(); usize::from(height)];
    for (value, label) in ticks.iter().zip(labels) {
        let row = usize::from(height - 1 - cell_offset(*value, min, max, height));
        if rows[row].is_empty() {
            rows[row] = format!("{label:>width$}");
        }
    }
    rows.into_iter().map(Line::from).collect()
}

fn draw_series(ctx: &mut Context, series: &[(f64, f64)]) {
    if let [single] = series {
        ctx.draw(&Points {
            coords: &[*single],
            color: LINE_COLOR,
        });
        return;
    }
    for pair in series.windows(2) {
        let ((x1, y1), (x2, y2)) = (pair[0], pair[1]);
        if [x1, y1, x2, y2].iter().all(|v| v.is_finite()) {
            ctx.draw(&CanvasLine::new(x1, y1, x2, y2, LINE_COLOR));
        }
    }
}

fn draw_dashed_zero(ctx: &mut Context, (x_min, x_max): (f64, f64)) {
    let dash = (x_max - x_min) / 48.0;
    if !dash.is_finite() || dash <= 0.0 {
        return;
    }
    let mut x = x_min;
    while x < x_max {
        ctx.draw(&CanvasLine::new(x, 0.0, (x + dash).min(x_max), 0.0, ZERO_COLOR));
        x += dash * 2.0;
    }
}

/// Legend on the y-label row, right-aligned, so it never covers plotted data.
/// Dropped when it would run into the label.
fn draw_legend(frame: &mut Frame, row: Rect, label_width: usize, entries: &[Span<'static>]) {
    let legend = Line::from(entries.to_vec());
    if label_width + 2 + legend.width() > usize::from(row.width) {
        return;
    }
    frame.render_widget(Paragraph::new(legend).alignment(Alignment::Right), row);
}

fn draw_summary(frame: &mut Frame, area: Rect, state: &ViewerState) {
    let summary = &state.chart.summary;
    let model = &state.chart.model;

    let equity = match (
        summary.initial_equity,
        summary.final_equity,
        summary.total_return,
        summary.total_return_pct,
    ) {
        (Some(initial), Some(last), Some(ret), Some(pct)) => format!(
            "initial {initial:.2} · final {last:.2} · return {ret:+.2} ({pct:+.2}%) · {} points",
            summary.equity_points
        ),
        _ => "no equity points".to_string(),
    };

    let mut trades = format!(
        "trades {} · LONG {} · CLOSE {} · not charted {}",
        summary.total_trades,
        model.marker_count(MarkerKind::Entry),
        model.marker_count(MarkerKind::Exit),
        model.skipped.len()
    );
    if let Some(sharpe) = summary.sharpe_ratio {
        trades.push_str(&format!(" · sharpe {sharpe:.2}"));
    }
    if let Some(drawdown) = summary.max_drawdown {
        trades.push_str(&format!(" · max drawdown {drawdown:.4}"));
    }
    if let Some(win_rate) = summary.win_rate {
        trades.push_str(&format!(" · win rate {win_rate:.4}"));
    }
    trades.push_str(&format!(" · tz {}", model.zone.label()));

    frame.render_widget(
        Paragraph::new(vec![Line::from(equity), Line::from(trades)])
            .block(Block::default().title("Summary").borders(Borders::ALL)),
        area,
    );
}

fn draw_logs(frame: &mut Frame, area: Rect, state: &ViewerState) {
    let max_lines = usize::from(area.height.saturating_sub(2));
    let (lines, evicted) = {
        let logs = state.logs.lock();
        (logs.tail(max_lines), logs.evicted())
    };
    let title = if evicted > 0 {
        format!("Logs ({evicted} older lines dropped)")
    } else {
        "Logs".to_string()
    };
    let text: Vec<Line> = lines.into_iter().map(Line::from).collect();
    frame.render_widget(
        Paragraph::new(text).block(Block::default().title(title).borders(Borders::ALL)),
        area,
    );
}

fn draw_footer(frame: &mut Frame, area: Rect, state: &ViewerState) {
    let key = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let toggle = match state.view {
        ChartView::Equity => " returns  ",
        ChartView::Returns => " equity  ",
    };
    let logs = if state.show_logs { " hide logs" } else { " logs" };
    let mut spans = vec![
        Span::styled("q", key),
        Span::raw(" quit  "),
        Span::styled("r", key),
        Span::raw(toggle),
        Span::styled("l", key),
        Span::raw(logs),
        Span::raw(format!("  │ {}", state.chart.input.display())),
    ];
    if !state.artifacts.is_empty() {
        spans.push(Span::raw(format!("  │ wrote {} file(s)", state.artifacts.len())));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
