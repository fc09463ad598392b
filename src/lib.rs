#![forbid(unsafe_code)]

//! Flubber Dashboard (flubdash): a live terminal view of a local file provider.
//!
//! Once per interval the dashboard fetches the provider's file list and shows:
//! 1. **List + gauge**: one row per file and the total size as a percentage
//! 2. **Plots + bar chart**: synthetic series scrolled by the tick counter
//! 3. **Style rotation**: the header panel recolors on a fixed tick schedule
//!
//! # Library usage
//!
//! Use the [`prelude`] for convenient access to the most common types:
//!
//! ```rust,no_run
//! use flubber_dashboard::prelude::*;
//! ```
//!
//! Individual modules can also be imported directly:
//!
//! ```rust,no_run
//! use flubber_dashboard::core::config::Config;
//! use flubber_dashboard::series::{SeriesBuffers, window};
//! ```

pub mod prelude;

pub mod core;
pub mod logger;
pub mod provider;
pub mod series;
pub mod tui;
