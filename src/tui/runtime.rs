//! Dashboard event loop.
//!
//! One control flow merges two crossbeam channels: a fixed-interval timer and
//! terminal input forwarded by a reader thread. Each event runs to completion
//! before the next is taken, so widget state needs no locking: the loop owns
//! it, lends it mutably to the refresh cycle, then immutably to the surface.

#![allow(missing_docs)]

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, SendTimeoutError, bounded, select};
use crossterm::event::{self, Event};

use super::input::{InputAction, resolve_event};
use super::model::Widgets;
use super::render::{Surface, TerminalSurface};
use super::theme::ColorMode;
use super::update::{RefreshCycle, RefreshOutcome};
use crate::core::config::Config;
use crate::core::errors::{DashError, Result};
use crate::logger::activity::{ActivityEvent, ActivityLogger, ActivityLoggerHandle};
use crate::provider::{FileProvider, HttpProvider};
use crate::series::{SeriesBuffers, build_waveform, static_bars};

/// How long the reader thread waits for input before rechecking its stop flag.
const INPUT_POLL: Duration = Duration::from_millis(100);
const INPUT_CAPACITY: usize = 64;

/// Loop lifecycle. There is no pause or reconnect state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Terminated,
}

/// Last observed provider health. Only changes are reported.
#[derive(Debug, Default)]
struct ProviderHealth {
    last_ok: Option<bool>,
}

impl ProviderHealth {
    fn observe(&mut self, outcome: &RefreshOutcome, url: &str) -> Option<ActivityEvent> {
        let was_ok = self.last_ok.replace(outcome.failure.is_none());
        match (&outcome.failure, was_ok) {
            (Some(err), None | Some(true)) => {
                Some(ActivityEvent::unavailable(outcome.tick, url, err))
            }
            (None, Some(false)) => Some(ActivityEvent::ProviderRecovered {
                tick: outcome.tick,
                url: url.to_string(),
                records: outcome.records,
                total_size: outcome.total_size,
            }),
            _ => None,
        }
    }
}

/// The two-state dashboard loop over a provider and a surface.
pub struct EventLoop<P, S> {
    cycle: RefreshCycle<P>,
    surface: S,
    widgets: Widgets,
    tick: u64,
    state: LoopState,
    health: ProviderHealth,
    log: ActivityLoggerHandle,
}

impl<P: FileProvider, S: Surface> EventLoop<P, S> {
    pub fn new(cycle: RefreshCycle<P>, surface: S, log: ActivityLoggerHandle) -> Self {
        let widgets = Widgets::new(cycle.series().waveform());
        Self {
            cycle,
            surface,
            widgets,
            tick: 0,
            state: LoopState::Running,
            health: ProviderHealth::default(),
            log,
        }
    }

    #[must_use]
    pub const fn state(&self) -> LoopState {
        self.state
    }

    /// Tick of the most recent refresh; 0 before `start()`.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    #[must_use]
    pub const fn widgets(&self) -> &Widgets {
        &self.widgets
    }

    #[must_use]
    pub const fn surface(&self) -> &S {
        &self.surface
    }

    /// Eager refresh and render at tick 1, before any timer fires.
    ///
    /// # Errors
    /// Propagates render failures.
    pub fn start(&mut self) -> Result<()> {
        self.tick = 1;
        self.step()
    }

    /// Timer fired: advance the tick, refresh, render.
    ///
    /// # Errors
    /// Propagates render failures.
    pub fn on_tick(&mut self) -> Result<()> {
        if self.state == LoopState::Terminated {
            return Ok(());
        }
        self.tick += 1;
        self.step()
    }

    /// Route one input event. Quit releases the surface.
    ///
    /// # Errors
    /// Propagates surface teardown failures.
    pub fn on_input(&mut self, event: &Event) -> Result<LoopState> {
        if resolve_event(event) == InputAction::Quit {
            self.terminate()?;
        }
        Ok(self.state)
    }

    /// Start if needed, then process timer and input events until quit.
    /// Returns the final tick.
    ///
    /// # Errors
    /// Returns [`DashError::ChannelClosed`] if either source disconnects, or
    /// a render failure. The surface is closed in both cases.
    pub fn run(&mut self, ticks: &Receiver<Instant>, input: &Receiver<Event>) -> Result<u64> {
        if self.tick == 0 {
            self.start().inspect_err(|_| self.close_quietly())?;
        }
        while self.state == LoopState::Running {
            select! {
                recv(ticks) -> msg => {
                    if msg.is_err() {
                        return self.abort("timer");
                    }
                    self.on_tick().inspect_err(|_| self.close_quietly())?;
                }
                recv(input) -> msg => match msg {
                    Ok(event) => {
                        self.on_input(&event)?;
                    }
                    Err(_) => return self.abort("input"),
                },
            }
        }
        Ok(self.tick)
    }

    fn step(&mut self) -> Result<()> {
        let outcome = self.cycle.refresh(&mut self.widgets, self.tick);
        if let Some(event) = self.health.observe(&outcome, self.cycle.provider().endpoint()) {
            self.log.send(event);
        }
        self.surface.render(&self.widgets)
    }

    fn terminate(&mut self) -> Result<()> {
        if self.state == LoopState::Running {
            self.state = LoopState::Terminated;
            self.surface.close()?;
        }
        Ok(())
    }

    fn close_quietly(&mut self) {
        let _ = self.terminate();
    }

    fn abort(&mut self, component: &'static str) -> Result<u64> {
        self.close_quietly();
        Err(DashError::ChannelClosed { component })
    }
}

/// Forward terminal events until `stop` is set. The returned channel closes
/// when the thread exits.
///
/// # Errors
/// Returns [`DashError::RenderingBackendInit`] if the thread cannot be spawned.
pub fn spawn_input_reader(
    stop: Arc<AtomicBool>,
) -> Result<(Receiver<Event>, thread::JoinHandle<()>)> {
    let (tx, rx) = bounded::<Event>(INPUT_CAPACITY);
    let join = thread::Builder::new()
        .name("flubdash-input".to_string())
        .spawn(move || {
            while !stop.load(Ordering::Relaxed) {
                match event::poll(INPUT_POLL) {
                    Ok(true) => {}
                    Ok(false) => continue,
                    Err(_) => break,
                }
                let Ok(mut pending) = event::read() else {
                    break;
                };
                loop {
                    match tx.send_timeout(pending, INPUT_POLL) {
                        Ok(()) => break,
                        Err(SendTimeoutError::Timeout(back)) => {
                            if stop.load(Ordering::Relaxed) {
                                return;
                            }
                            pending = back;
                        }
                        Err(SendTimeoutError::Disconnected(_)) => return,
                    }
                }
            }
        })
        .map_err(|source| DashError::RenderingBackendInit { source })?;
    Ok((rx, join))
}

/// Everything `run_dashboard` needs, resolved from config and CLI flags.
#[derive(Debug, Clone)]
pub struct DashboardRuntimeConfig {
    pub provider_url: String,
    pub provider_timeout: Duration,
    pub refresh: Duration,
    pub waveform_len: usize,
    pub bar_window: usize,
    pub color: ColorMode,
    pub activity_log: Option<PathBuf>,
    pub config_hash: String,
}

impl DashboardRuntimeConfig {
    /// # Errors
    /// Returns a serialization error if the config hash cannot be computed.
    pub fn from_config(config: &Config, color: ColorMode) -> Result<Self> {
        Ok(Self {
            provider_url: config.provider.url.clone(),
            provider_timeout: config.provider.timeout(),
            refresh: config.refresh.interval(),
            waveform_len: config.refresh.waveform_len,
            bar_window: config.refresh.bar_window,
            color,
            activity_log: config.logging.activity_log.clone(),
            config_hash: config.stable_hash()?,
        })
    }

    #[must_use]
    pub fn series(&self) -> SeriesBuffers {
        SeriesBuffers::new(
            build_waveform(self.waveform_len),
            static_bars(),
            self.bar_window,
        )
    }
}

/// Run the live dashboard until the user quits. Returns the final tick.
///
/// # Errors
/// [`DashError::RenderingBackendInit`] when the terminal cannot be taken
/// over; the loop never starts in that case. Later failures come from
/// [`EventLoop::run`].
pub fn run_dashboard(config: &DashboardRuntimeConfig) -> Result<u64> {
    let surface = TerminalSurface::open(config.color)?;
    let logger = ActivityLogger::from_path(config.activity_log.clone())?;
    logger.handle.send(ActivityEvent::DashboardStarted {
        url: config.provider_url.clone(),
        interval_ms: u64::try_from(config.refresh.as_millis()).unwrap_or(u64::MAX),
        config_hash: config.config_hash.clone(),
    });

    let provider = HttpProvider::new(config.provider_url.clone(), config.provider_timeout);
    let cycle = RefreshCycle::new(provider, config.series());
    let mut event_loop = EventLoop::new(cycle, surface, logger.handle.clone());

    let stop = Arc::new(AtomicBool::new(false));
    let result = match spawn_input_reader(Arc::clone(&stop)) {
        Ok((input, reader)) => {
            let ticks = crossbeam_channel::tick(config.refresh);
            let result = event_loop.run(&ticks, &input);
            stop.store(true, Ordering::Relaxed);
            drop(input);
            let _ = reader.join();
            result
        }
        Err(err) => Err(err),
    };
    let ticks = event_loop.tick();
    // Dropping the loop drops the surface, which restores the terminal.
    drop(event_loop);

    logger.handle.send(ActivityEvent::DashboardStopped { ticks });
    logger.finish();
    result
}
