//! Convenience re-exports for library consumers.
//!
//! ```rust,no_run
//! use flubber_dashboard::prelude::*;
//! ```

// Core
pub use crate::core::config::{CliOverrides, Config};
pub use crate::core::errors::{DashError, ProviderFailure, Result};

// Provider
pub use crate::provider::{FileProvider, HttpProvider, Record, RecordSet, labels, total_size};

// Series
pub use crate::series::{SeriesBuffers, build_waveform, static_bars, window};

// Dashboard
pub use crate::tui::model::{PanelStyle, Widgets};
pub use crate::tui::render::{Surface, TerminalSurface, render_to_buffer, render_widgets};
pub use crate::tui::runtime::{DashboardRuntimeConfig, EventLoop, LoopState, run_dashboard};
pub use crate::tui::update::{RefreshCycle, RefreshOutcome, apply_refresh, percent_of};
