//! Widget state model: per-widget display data held between refreshes.
//!
//! All display state lives in [`Widgets`]. The refresh cycle is the only
//! writer; the render backend only reads it. Each bundle carries the tick it
//! was last refreshed for, so a rendered frame always belongs to one tick.
//!
//! **Design invariant:** no I/O happens here.

// ──────────────────── colors ────────────────────

/// Backend-independent color identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    White,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
}

// ──────────────────── geometry ────────────────────

/// Half-open cell rectangle `[x0, x1) × [y0, y1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x0: u16,
    pub y0: u16,
    pub x1: u16,
    pub y1: u16,
}

impl Rect {
    #[must_use]
    pub const fn new(x0: u16, y0: u16, x1: u16, y1: u16) -> Self {
        Self { x0, y0, x1, y1 }
    }

    #[must_use]
    pub const fn width(self) -> u16 {
        self.x1.saturating_sub(self.x0)
    }

    #[must_use]
    pub const fn height(self) -> u16 {
        self.y1.saturating_sub(self.y0)
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Area left inside a one-cell border.
    #[must_use]
    pub const fn inner(self) -> Self {
        if self.width() < 2 || self.height() < 2 {
            return Self::new(self.x0, self.y0, self.x0, self.y0);
        }
        Self::new(self.x0 + 1, self.y0 + 1, self.x1 - 1, self.y1 - 1)
    }
}

/// Fixed dashboard layout. Not configurable.
pub mod layout {
    use super::Rect;

    pub const TEXT: Rect = Rect::new(0, 0, 50, 5);
    pub const LIST: Rect = Rect::new(0, 5, 50, 12);
    pub const GAUGE: Rect = Rect::new(0, 12, 50, 15);
    pub const PLOT_A: Rect = Rect::new(0, 15, 50, 25);
    pub const BAR_CHART: Rect = Rect::new(50, 0, 75, 10);
    pub const PANEL: Rect = Rect::new(50, 10, 75, 15);
    pub const PLOT_B: Rect = Rect::new(50, 15, 75, 25);

    /// Smallest terminal that shows every widget uncut.
    pub const MIN_COLS: u16 = 75;
    pub const MIN_ROWS: u16 = 25;
}

// ──────────────────── style rotation ────────────────────

/// Cosmetic panel style chosen from the tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelStyle {
    Mod2,
    Mod3,
    Mod5,
    Mod7,
}

impl PanelStyle {
    /// First matching modulus wins, checked in the order 2, 3, 5, 7.
    /// Ticks divisible by none of them keep the previous style.
    #[must_use]
    pub const fn for_tick(tick: u64) -> Option<Self> {
        if tick % 2 == 0 {
            Some(Self::Mod2)
        } else if tick % 3 == 0 {
            Some(Self::Mod3)
        } else if tick % 5 == 0 {
            Some(Self::Mod5)
        } else if tick % 7 == 0 {
            Some(Self::Mod7)
        } else {
            None
        }
    }

    #[must_use]
    pub const fn color(self) -> Color {
        match self {
            Self::Mod2 => Color::Cyan,
            Self::Mod3 => Color::Blue,
            Self::Mod5 => Color::Red,
            Self::Mod7 => Color::Yellow,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Mod2 => "mod2",
            Self::Mod3 => "mod3",
            Self::Mod5 => "mod5",
            Self::Mod7 => "mod7",
        }
    }
}

// ──────────────────── widget states ────────────────────

/// Static text, optionally boxed.
#[derive(Debug, Clone, PartialEq)]
pub struct ParagraphState {
    pub title: String,
    pub text: String,
    pub text_fg: Color,
    pub border_fg: Color,
    pub border: bool,
    pub rect: Rect,
}

impl ParagraphState {
    /// Paint border and text in one color.
    pub fn apply_style(&mut self, style: PanelStyle) {
        self.border_fg = style.color();
        self.text_fg = style.color();
    }
}

/// Scrolling list of rows.
#[derive(Debug, Clone, PartialEq)]
pub struct ListState {
    pub title: String,
    pub rows: Vec<String>,
    pub text_fg: Color,
    pub rect: Rect,
}

/// Horizontal progress gauge.
#[derive(Debug, Clone, PartialEq)]
pub struct GaugeState {
    pub title: String,
    /// Unclamped; values over 100 are kept as-is.
    pub percent: u64,
    pub bar_color: Color,
    pub border_fg: Color,
    pub title_fg: Color,
    pub rect: Rect,
}

/// How plot samples are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// One `•` per sample column.
    Dot,
    /// 2×4 braille dots per cell, joined by line segments.
    Braille,
}

/// Single-series line plot.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotState {
    pub title: String,
    pub series: Vec<f64>,
    pub axes_fg: Color,
    pub line_fg: Color,
    pub marker: Marker,
    pub rect: Rect,
}

/// Vertical bar chart.
#[derive(Debug, Clone, PartialEq)]
pub struct BarChartState {
    pub title: String,
    pub bars: Vec<f64>,
    pub labels: Vec<String>,
    pub bar_color: Color,
    pub num_fg: Color,
    pub rect: Rect,
}

/// Every widget on screen, refreshed together.
#[derive(Debug, Clone, PartialEq)]
pub struct Widgets {
    pub text: ParagraphState,
    pub list: ListState,
    pub gauge: GaugeState,
    pub plot_a: PlotState,
    pub bar_chart: BarChartState,
    pub plot_b: PlotState,
    pub panel: ParagraphState,
    /// Tick whose refresh produced the current contents. 0 before the first refresh.
    pub tick: u64,
}

impl Widgets {
    /// Initial widget set. `waveform` seeds both plots until the first refresh.
    #[must_use]
    pub fn new(waveform: &[f64]) -> Self {
        Self {
            text: ParagraphState {
                title: "Text".to_string(),
                text: "FLUBBER DEMO\nPress Q to quit.".to_string(),
                text_fg: Color::White,
                border_fg: Color::Cyan,
                border: true,
                rect: layout::TEXT,
            },
            list: ListState {
                title: "List".to_string(),
                rows: Vec::new(),
                text_fg: Color::Yellow,
                rect: layout::LIST,
            },
            gauge: GaugeState {
                title: "Gauge".to_string(),
                percent: 0,
                bar_color: Color::Red,
                border_fg: Color::White,
                title_fg: Color::Cyan,
                rect: layout::GAUGE,
            },
            plot_a: PlotState {
                title: "dot-marker Line Chart".to_string(),
                series: waveform.to_vec(),
                axes_fg: Color::White,
                line_fg: Color::Red,
                marker: Marker::Dot,
                rect: layout::PLOT_A,
            },
            bar_chart: BarChartState {
                title: "Bar Chart".to_string(),
                bars: Vec::new(),
                labels: (0..6).map(|i| format!("S{i}")).collect(),
                bar_color: Color::Green,
                num_fg: Color::Black,
                rect: layout::BAR_CHART,
            },
            plot_b: PlotState {
                title: "braille-mode Line Chart".to_string(),
                series: waveform.to_vec(),
                axes_fg: Color::White,
                line_fg: Color::Yellow,
                marker: Marker::Braille,
                rect: layout::PLOT_B,
            },
            panel: ParagraphState {
                title: String::new(),
                text: "Hey!\nI am a borderless block!".to_string(),
                text_fg: Color::Magenta,
                border_fg: Color::White,
                border: false,
                rect: layout::PANEL,
            },
            tick: 0,
        }
    }
}
