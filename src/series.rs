//! Static series buffers and the sliding windows cut from them each tick.
//!
//! Buffers are generated once at startup and never mutated. Every frame shows
//! a forward suffix of a buffer starting at a tick-derived offset; as the tick
//! grows the suffix shrinks, then the modulo snaps it back to the start, which
//! reads as scrolling on screen.

use std::sync::Arc;

/// Sample count of the reference waveform.
pub const WAVEFORM_LEN: usize = 220;

/// Offset domain of the bar chart window.
pub const BAR_WINDOW: usize = 10;

/// Fixed bar magnitudes.
pub const STATIC_BARS: [f64; 47] = [
    3.0, 2.0, 5.0, 3.0, 9.0, 5.0, 3.0, 2.0, 5.0, 8.0, 3.0, 2.0, 4.0, 5.0, 3.0, 2.0, 5.0, 7.0, 5.0,
    3.0, 2.0, 6.0, 7.0, 4.0, 6.0, 3.0, 6.0, 7.0, 8.0, 3.0, 6.0, 4.0, 5.0, 3.0, 2.0, 4.0, 6.0, 4.0,
    8.0, 5.0, 9.0, 4.0, 3.0, 6.0, 5.0, 3.0, 6.0,
];

/// `1 + sin(i / 5)` for `i` in `0..length`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn build_waveform(length: usize) -> Vec<f64> {
    (0..length).map(|i| 1.0 + (i as f64 / 5.0).sin()).collect()
}

#[must_use]
pub fn static_bars() -> Vec<f64> {
    STATIC_BARS.to_vec()
}

/// Suffix of `buffer` starting at `offset mod len`. Empty buffers yield an
/// empty window.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn window<T>(buffer: &[T], offset: u64) -> &[T] {
    if buffer.is_empty() {
        return buffer;
    }
    let start = (offset % buffer.len() as u64) as usize;
    &buffer[start..]
}

/// Suffix of `buffer` starting at `offset mod modulus`.
///
/// The modulus is decoupled from the buffer length; it is clamped to the
/// buffer length so the start index can never run past the end.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn window_with_modulus<T>(buffer: &[T], offset: u64, modulus: usize) -> &[T] {
    let effective = modulus.min(buffer.len());
    if effective == 0 {
        return &buffer[buffer.len()..];
    }
    let start = (offset % effective as u64) as usize;
    &buffer[start..]
}

/// Plot A scrolls one sample every two ticks.
#[must_use]
pub const fn plot_a_offset(tick: u64) -> u64 {
    tick / 2
}

/// Plot B scrolls two samples per tick. Reduced mod `len` before doubling so
/// large ticks cannot overflow.
#[must_use]
pub const fn plot_b_offset(tick: u64, len: usize) -> u64 {
    if len == 0 {
        return 0;
    }
    let len = len as u64;
    (tick % len) * 2 % len
}

/// Bar chart advances one bar every two ticks.
#[must_use]
pub const fn bar_offset(tick: u64) -> u64 {
    tick / 2
}

/// Immutable startup buffers shared by the refresh cycle.
#[derive(Debug, Clone)]
pub struct SeriesBuffers {
    waveform: Arc<[f64]>,
    bars: Arc<[f64]>,
    bar_window: usize,
}

impl SeriesBuffers {
    #[must_use]
    pub fn new(waveform: Vec<f64>, bars: Vec<f64>, bar_window: usize) -> Self {
        Self {
            waveform: waveform.into(),
            bars: bars.into(),
            bar_window,
        }
    }

    /// Reference buffers: 220-sample waveform, fixed bars, window of 10.
    #[must_use]
    pub fn reference() -> Self {
        Self::new(build_waveform(WAVEFORM_LEN), static_bars(), BAR_WINDOW)
    }

    #[must_use]
    pub fn waveform(&self) -> &[f64] {
        &self.waveform
    }

    #[must_use]
    pub fn bars(&self) -> &[f64] {
        &self.bars
    }

    #[must_use]
    pub const fn bar_window(&self) -> usize {
        self.bar_window
    }

    #[must_use]
    pub fn plot_a_window(&self, tick: u64) -> &[f64] {
        window(&self.waveform, plot_a_offset(tick))
    }

    #[must_use]
    pub fn plot_b_window(&self, tick: u64) -> &[f64] {
        window(&self.waveform, plot_b_offset(tick, self.waveform.len()))
    }

    #[must_use]
    pub fn bar_window_at(&self, tick: u64) -> &[f64] {
        window_with_modulus(&self.bars, bar_offset(tick), self.bar_window)
    }
}

impl Default for SeriesBuffers {
    fn default() -> Self {
        Self::reference()
    }
}
