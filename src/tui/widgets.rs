//! Widget builders: each widget state becomes one ratatui widget.
//!
//! Builders only read state and never touch the terminal, so the render
//! module can draw the same bundle into a live frame or an off-screen buffer.

#![allow(missing_docs)]

use ratatui::layout::Rect as Area;
use ratatui::style::Style;
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Axis, Bar, BarChart, BarGroup, Block, Chart, Dataset, Gauge, GraphType, List, Paragraph,
};

use super::model::{
    BarChartState, Color, GaugeState, ListState, Marker, ParagraphState, PlotState, Rect,
};
use super::theme::ColorMode;

pub const BAR_WIDTH: u16 = 3;
pub const BAR_GAP: u16 = 1;

/// Screen area for a layout rectangle.
#[must_use]
pub fn to_area(rect: Rect) -> Area {
    Area::new(rect.x0, rect.y0, rect.width(), rect.height())
}

/// Largest finite value, or 1.0 when nothing positive is present.
#[must_use]
pub fn axis_max(values: &[f64]) -> f64 {
    let max = values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(0.0f64, f64::max);
    if max > 0.0 { max } else { 1.0 }
}

/// Fill ratio for a gauge. Saturates at 100%; the label keeps the raw value.
#[must_use]
pub fn gauge_ratio(percent: u64) -> f64 {
    f64::from(u8::try_from(percent.min(100)).unwrap_or(100)) / 100.0
}

/// `(index, value)` points for a line chart.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn plot_points(series: &[f64]) -> Vec<(f64, f64)> {
    series
        .iter()
        .enumerate()
        .map(|(i, v)| (i as f64, *v))
        .collect()
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn bar_value(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.round() as u64
    } else {
        0
    }
}

fn titled_block(title: &str, border: Style, title_style: Style) -> Block<'_> {
    Block::bordered()
        .title(title)
        .border_style(border)
        .title_style(title_style)
}

#[must_use]
pub fn paragraph(state: &ParagraphState, colors: ColorMode) -> Paragraph<'_> {
    let body = Paragraph::new(state.text.as_str()).style(colors.fg(state.text_fg));
    if state.border {
        body.block(titled_block(
            &state.title,
            colors.fg(state.border_fg),
            colors.fg(Color::White),
        ))
    } else {
        body
    }
}

/// Rows past the inner height are not shown; long rows are clipped.
#[must_use]
pub fn list(state: &ListState, colors: ColorMode) -> List<'_> {
    List::new(state.rows.iter().map(String::as_str))
        .style(colors.fg(state.text_fg))
        .block(titled_block(
            &state.title,
            colors.fg(Color::White),
            colors.fg(Color::White),
        ))
}

#[must_use]
pub fn gauge(state: &GaugeState, colors: ColorMode) -> Gauge<'_> {
    Gauge::default()
        .block(titled_block(
            &state.title,
            colors.fg(state.border_fg),
            colors.fg(state.title_fg),
        ))
        .gauge_style(colors.fg(state.bar_color))
        .ratio(gauge_ratio(state.percent))
        .label(format!("{}%", state.percent))
}

/// Line chart over `points`, which the caller builds with [`plot_points`].
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn chart<'a>(state: &'a PlotState, points: &'a [(f64, f64)], colors: ColorMode) -> Chart<'a> {
    let (marker, graph) = match state.marker {
        Marker::Dot => (symbols::Marker::Dot, GraphType::Scatter),
        Marker::Braille => (symbols::Marker::Braille, GraphType::Line),
    };
    let dataset = Dataset::default()
        .marker(marker)
        .graph_type(graph)
        .style(colors.fg(state.line_fg))
        .data(points);

    let x_max = points.len().saturating_sub(1).max(1) as f64;
    let y_max = axis_max(&state.series);
    let axes = colors.fg(state.axes_fg);

    Chart::new(vec![dataset])
        .block(titled_block(
            &state.title,
            colors.fg(Color::White),
            colors.fg(Color::White),
        ))
        .x_axis(
            Axis::default()
                .style(axes)
                .bounds([0.0, x_max])
                .labels(vec![Span::raw("0"), Span::raw(format!("{x_max:.0}"))]),
        )
        .y_axis(
            Axis::default()
                .style(axes)
                .bounds([0.0, y_max])
                .labels(vec![Span::raw("0.00"), Span::raw(format!("{y_max:.2}"))]),
        )
}

/// Bars are scaled to the tallest value. Values print inside each bar.
#[must_use]
pub fn bar_chart(state: &BarChartState, colors: ColorMode) -> BarChart<'_> {
    let bars: Vec<Bar<'_>> = state
        .bars
        .iter()
        .enumerate()
        .map(|(i, value)| {
            let bar = Bar::default().value(bar_value(*value));
            match state.labels.get(i) {
                Some(label) => bar.label(Line::from(label.as_str())),
                None => bar,
            }
        })
        .collect();

    BarChart::default()
        .block(titled_block(
            &state.title,
            colors.fg(Color::White),
            colors.fg(Color::White),
        ))
        .bar_width(BAR_WIDTH)
        .bar_gap(BAR_GAP)
        .bar_style(colors.fg(state.bar_color))
        .value_style(colors.fg_on(state.num_fg, state.bar_color))
        .label_style(colors.fg(Color::White))
        .data(BarGroup::default().bars(&bars))
}
