//! Terminal dashboard: widget model, refresh cycle, render surface, event loop.
//!
//! Seams follow model/update/render/runtime: `update` mutates the model for
//! one tick, `render` paints it, `runtime` sequences the two.

#![allow(missing_docs)]

pub mod input;
pub mod model;
pub mod render;
pub mod runtime;
pub mod terminal_guard;
pub mod theme;
pub mod update;
pub mod widgets;

pub use runtime::{DashboardRuntimeConfig, run_dashboard};
