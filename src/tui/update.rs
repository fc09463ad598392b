//! Refresh cycle: one tick's worth of state transition.
//!
//! `apply_refresh()` takes the widget bundle, a tick, and the records fetched
//! for that tick, and rewrites every tick-dependent field in one pass. It
//! performs zero I/O. [`RefreshCycle`] adds the provider call in front of it.

use crate::core::errors::DashError;
use crate::provider::{FileProvider, RecordSet, labels, total_size};
use crate::series::SeriesBuffers;

use super::model::{PanelStyle, Widgets};

/// Bytes per gauge step.
pub const BYTES_PER_STEP: u64 = 1_000_000;

/// `(total / 1_000_000) * 100` with truncating division. Not clamped: a
/// 2.5 MB total reads 200.
#[must_use]
pub const fn percent_of(total: u64) -> u64 {
    (total / BYTES_PER_STEP).saturating_mul(100)
}

/// Rewrite every tick-dependent widget field from `records` and `tick`.
pub fn apply_refresh(widgets: &mut Widgets, tick: u64, records: &RecordSet, series: &SeriesBuffers) {
    widgets.gauge.percent = percent_of(total_size(records));
    widgets.list.rows = labels(records);

    widgets.plot_a.series.clear();
    widgets
        .plot_a
        .series
        .extend_from_slice(series.plot_a_window(tick));
    widgets.plot_b.series.clear();
    widgets
        .plot_b
        .series
        .extend_from_slice(series.plot_b_window(tick));
    widgets.bar_chart.bars.clear();
    widgets
        .bar_chart
        .bars
        .extend_from_slice(series.bar_window_at(tick));

    if let Some(style) = PanelStyle::for_tick(tick) {
        widgets.text.apply_style(style);
    }

    widgets.tick = tick;
}

/// What one refresh saw. Handed to the runtime for logging; the widgets
/// never see the failure.
#[derive(Debug)]
pub struct RefreshOutcome {
    pub tick: u64,
    pub records: usize,
    pub total_size: u64,
    pub failure: Option<DashError>,
}

/// Provider + startup buffers, run once per tick.
#[derive(Debug)]
pub struct RefreshCycle<P> {
    provider: P,
    series: SeriesBuffers,
}

impl<P: FileProvider> RefreshCycle<P> {
    pub const fn new(provider: P, series: SeriesBuffers) -> Self {
        Self { provider, series }
    }

    pub const fn provider(&self) -> &P {
        &self.provider
    }

    pub const fn series(&self) -> &SeriesBuffers {
        &self.series
    }

    /// Fetch, then update every widget for `tick`. Never fails: an
    /// unreachable provider shows up as an empty list and a 0% gauge.
    pub fn refresh(&self, widgets: &mut Widgets, tick: u64) -> RefreshOutcome {
        let (records, failure) = match self.provider.try_fetch() {
            Ok(records) => (records, None),
            Err(err) => (RecordSet::empty(), Some(err)),
        };

        apply_refresh(widgets, tick, &records, &self.series);

        RefreshOutcome {
            tick,
            records: records.len(),
            total_size: total_size(&records),
            failure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::{ProviderFailure, Result};
    use crate::provider::Record;
    use crate::tui::model::Color;

    struct Fixed(Option<Vec<Record>>);

    impl FileProvider for Fixed {
        fn try_fetch(&self) -> Result<RecordSet> {
            self.0.clone().map(RecordSet::from).ok_or_else(|| {
                DashError::provider("test://files", ProviderFailure::Transport("refused".into()))
            })
        }

        fn endpoint(&self) -> &str {
            "test://files"
        }
    }

    fn two_records() -> Vec<Record> {
        vec![Record::new("a", 500_000), Record::new("b", 600_000)]
    }

    #[test]
    fn percent_truncates_and_is_unclamped() {
        assert_eq!(percent_of(0), 0);
        assert_eq!(percent_of(999_999), 0);
        assert_eq!(percent_of(1_000_000), 100);
        assert_eq!(percent_of(1_100_000), 100);
        assert_eq!(percent_of(2_500_000), 200);
        // Divides first, so the largest total cannot overflow.
        assert_eq!(percent_of(u64::MAX), 1_844_674_407_370_900);
    }

    #[test]
    fn refresh_populates_list_and_gauge() {
        let cycle = RefreshCycle::new(Fixed(Some(two_records())), SeriesBuffers::reference());
        let mut widgets = Widgets::new(cycle.series().waveform());

        let outcome = cycle.refresh(&mut widgets, 1);

        assert_eq!(widgets.list.rows, vec!["a    500000", "b    600000"]);
        assert_eq!(widgets.gauge.percent, 100);
        assert_eq!(widgets.tick, 1);
        assert_eq!(outcome.records, 2);
        assert_eq!(outcome.total_size, 1_100_000);
        assert!(outcome.failure.is_none());
    }

    #[test]
    fn unreachable_provider_yields_empty_rows_and_zero_percent() {
        let cycle = RefreshCycle::new(Fixed(Some(two_records())), SeriesBuffers::reference());
        let mut widgets = Widgets::new(cycle.series().waveform());
        cycle.refresh(&mut widgets, 1);

        let down = RefreshCycle::new(Fixed(None), SeriesBuffers::reference());
        let outcome = down.refresh(&mut widgets, 2);

        assert!(widgets.list.rows.is_empty());
        assert_eq!(widgets.gauge.percent, 0);
        assert_eq!(widgets.tick, 2);
        assert_eq!(outcome.records, 0);
        assert_eq!(outcome.failure.map(|e| e.code()), Some("FLB-2001"));
    }

    #[test]
    fn windows_follow_tick() {
        let series = SeriesBuffers::reference();
        let mut widgets = Widgets::new(series.waveform());
        apply_refresh(&mut widgets, 9, &RecordSet::empty(), &series);

        assert_eq!(widgets.plot_a.series.as_slice(), &series.waveform()[4..]);
        assert_eq!(widgets.plot_b.series.as_slice(), &series.waveform()[18..]);
        assert_eq!(widgets.bar_chart.bars.as_slice(), &series.bars()[4..]);
    }

    #[test]
    fn style_rotation_applies_and_persists_on_unmatched_ticks() {
        let series = SeriesBuffers::reference();
        let mut widgets = Widgets::new(series.waveform());

        apply_refresh(&mut widgets, 1, &RecordSet::empty(), &series);
        assert_eq!(widgets.text.border_fg, Color::Cyan);
        assert_eq!(widgets.text.text_fg, Color::White);

        apply_refresh(&mut widgets, 3, &RecordSet::empty(), &series);
        assert_eq!(widgets.text.border_fg, Color::Blue);
        assert_eq!(widgets.text.text_fg, Color::Blue);

        // 11 matches nothing: keeps the tick-3 style.
        apply_refresh(&mut widgets, 11, &RecordSet::empty(), &series);
        assert_eq!(widgets.text.text_fg, Color::Blue);

        apply_refresh(&mut widgets, 35, &RecordSet::empty(), &series);
        assert_eq!(widgets.text.text_fg, Color::Red);

        apply_refresh(&mut widgets, 49, &RecordSet::empty(), &series);
        assert_eq!(widgets.text.text_fg, Color::Yellow);
    }

    #[test]
    fn labels_are_recomputed_every_refresh() {
        let series = SeriesBuffers::reference();
        let mut widgets = Widgets::new(series.waveform());
        apply_refresh(
            &mut widgets,
            1,
            &RecordSet::from(vec![Record::new("old", 1)]),
            &series,
        );
        apply_refresh(
            &mut widgets,
            2,
            &RecordSet::from(vec![Record::new("new", 2)]),
            &series,
        );
        assert_eq!(widgets.list.rows, vec!["new    2"]);
    }
}
