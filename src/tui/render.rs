//! Render surface for the dashboard.
//!
//! Two entrypoints:
//! - `render_frame()` draws a [`Widgets`] bundle into a live ratatui frame.
//! - `render_to_buffer()` draws the same bundle off-screen, for tests and
//!   headless checks that assert on cell contents.
//!
//! [`TerminalSurface`] owns the terminal. ratatui diffs each frame against the
//! previous one, so a tick only writes the cells that changed.

#![allow(missing_docs)]

use std::io::{self, IsTerminal, Stdout};

use ratatui::backend::CrosstermBackend;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect as Area;
use ratatui::widgets::Widget;
use ratatui::{Frame, Terminal};

use super::model::{Rect, Widgets};
use super::terminal_guard::TerminalGuard;
use super::theme::ColorMode;
use super::widgets::{bar_chart, chart, gauge, list, paragraph, plot_points, to_area};
use crate::core::errors::{DashError, Result};

/// Draw into a live frame.
pub fn render_frame(frame: &mut Frame<'_>, widgets: &Widgets, colors: ColorMode) {
    render_widgets(frame.buffer_mut(), widgets, colors);
}

/// Draw into a fresh `width` × `height` buffer.
#[must_use]
pub fn render_to_buffer(widgets: &Widgets, colors: ColorMode, width: u16, height: u16) -> Buffer {
    let mut buf = Buffer::empty(Area::new(0, 0, width, height));
    render_widgets(&mut buf, widgets, colors);
    buf
}

/// Text of every buffer row, one string per row.
#[must_use]
pub fn buffer_lines(buf: &Buffer) -> Vec<String> {
    let area = buf.area;
    (area.top()..area.bottom())
        .map(|y| (area.left()..area.right()).map(|x| buf[(x, y)].symbol()).collect())
        .collect()
}

/// Paint every widget in fixed order; later widgets overwrite earlier ones
/// where rectangles overlap.
pub fn render_widgets(buf: &mut Buffer, widgets: &Widgets, colors: ColorMode) {
    draw(buf, widgets.text.rect, paragraph(&widgets.text, colors));
    draw(buf, widgets.list.rect, list(&widgets.list, colors));
    draw(buf, widgets.gauge.rect, gauge(&widgets.gauge, colors));

    let points_a = plot_points(&widgets.plot_a.series);
    draw(buf, widgets.plot_a.rect, chart(&widgets.plot_a, &points_a, colors));

    draw(buf, widgets.bar_chart.rect, bar_chart(&widgets.bar_chart, colors));

    let points_b = plot_points(&widgets.plot_b.series);
    draw(buf, widgets.plot_b.rect, chart(&widgets.plot_b, &points_b, colors));

    draw(buf, widgets.panel.rect, paragraph(&widgets.panel, colors));
}

/// Render `widget` into the part of `rect` that is on screen.
fn draw<W: Widget>(buf: &mut Buffer, rect: Rect, widget: W) {
    let area = to_area(rect).intersection(buf.area);
    if !area.is_empty() {
        widget.render(area, buf);
    }
}

// ──────────────────── surfaces ────────────────────

/// Where widget bundles get drawn.
pub trait Surface {
    /// Draw one complete bundle.
    ///
    /// # Errors
    /// Returns [`DashError::Render`] when the output cannot be written.
    fn render(&mut self, widgets: &Widgets) -> Result<()>;

    /// Release the output device. Later renders are no-ops.
    ///
    /// # Errors
    /// Implementations may report teardown failures.
    fn close(&mut self) -> Result<()>;
}

/// Full-screen terminal surface.
pub struct TerminalSurface {
    // Dropped before the guard, which then restores the terminal.
    terminal: Option<Terminal<CrosstermBackend<Stdout>>>,
    guard: Option<TerminalGuard>,
    colors: ColorMode,
}

impl TerminalSurface {
    /// Take over the terminal.
    ///
    /// # Errors
    /// Returns [`DashError::RenderingBackendInit`] when stdout is not a
    /// terminal or raw mode and the alternate screen cannot be entered.
    pub fn open(colors: ColorMode) -> Result<Self> {
        if !io::stdout().is_terminal() {
            return Err(DashError::RenderingBackendInit {
                source: io::Error::other("stdout is not a terminal"),
            });
        }
        let guard = TerminalGuard::new().map_err(|source| DashError::RenderingBackendInit { source })?;
        let terminal = Terminal::new(CrosstermBackend::new(io::stdout()))
            .map_err(|source| DashError::RenderingBackendInit { source })?;
        Ok(Self {
            terminal: Some(terminal),
            guard: Some(guard),
            colors,
        })
    }
}

impl Surface for TerminalSurface {
    fn render(&mut self, widgets: &Widgets) -> Result<()> {
        let Some(terminal) = self.terminal.as_mut() else {
            return Ok(());
        };
        let colors = self.colors;
        terminal
            .draw(|frame| render_frame(frame, widgets, colors))
            .map_err(|source| DashError::Render { source })?;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.terminal.take();
        self.guard.take();
        Ok(())
    }
}
