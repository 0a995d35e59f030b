// Copyright (c) 2026 rezky_nightky

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::error::Result;
use crate::field::ParticleField;
use crate::records::MonthRecord;
use crate::runtime::SpiralConfig;
use crate::scheduler::ActivationState;
use crate::trail::{render_frame, TrailPoint};

/// Shared stop flag. Signal handlers and the render sink set it; the driver
/// only ever reads it.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Where finished frames go.
///
/// Every `present_frame` call replaces whatever the previous call drew.
pub trait RenderSink {
    fn present_frame(&mut self, points: &[TrailPoint], caption: &str) -> Result<()>;

    /// Minimum gap between frames. Sinks that watch for a user close request
    /// do it here and publish it to their cancel token.
    fn pause(&mut self, interval: Duration) -> Result<()>;

    fn shutdown(&mut self) -> Result<()>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverState {
    Idle,
    Activating,
    Animating,
    Stopped,
}

/// Global frame index. Starts at zero and only moves forward, across month
/// boundaries too, so trajectories continue where the last month left off.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameClock {
    frame: u64,
}

impl FrameClock {
    pub fn current(&self) -> u64 {
        self.frame
    }

    /// Returns the index of the frame about to be drawn and moves past it.
    pub fn advance(&mut self) -> u64 {
        let f = self.frame;
        self.frame += 1;
        f
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub months: usize,
    pub frames: u64,
    pub points: u64,
    pub cancelled: bool,
}

pub struct AnimationDriver<'a, S: RenderSink + ?Sized> {
    cfg: &'a SpiralConfig,
    field: &'a ParticleField,
    sink: &'a mut S,
    cancel: CancelToken,
    activation: ActivationState,
    clock: FrameClock,
    state: DriverState,
    points: Vec<TrailPoint>,
}

impl<'a, S: RenderSink + ?Sized> AnimationDriver<'a, S> {
    pub fn new(
        cfg: &'a SpiralConfig,
        field: &'a ParticleField,
        sink: &'a mut S,
        cancel: CancelToken,
    ) -> Self {
        Self {
            cfg,
            field,
            sink,
            cancel,
            activation: ActivationState::new(field.particles.len()),
            clock: FrameClock::default(),
            state: DriverState::Idle,
            points: Vec::new(),
        }
    }

    #[allow(dead_code)]
    pub fn state(&self) -> DriverState {
        self.state
    }

    #[allow(dead_code)]
    pub fn activation(&self) -> &ActivationState {
        &self.activation
    }

    #[allow(dead_code)]
    pub fn clock(&self) -> FrameClock {
        self.clock
    }

    /// Plays up to `month_limit` records, then shuts the sink down.
    ///
    /// Cancellation is checked before every month and every frame; a frame
    /// that has started is always presented in full. Cancelling is a normal
    /// way to finish, reported through `RunSummary::cancelled`.
    pub fn run(&mut self, records: &[MonthRecord]) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        let limit = self.cfg.month_limit.min(records.len());

        let played = self.play(&records[..limit], &mut summary);
        self.state = DriverState::Stopped;
        let closed = self.sink.shutdown();
        played?;
        closed?;

        summary.cancelled = self.cancel.is_cancelled();
        log::info!(
            "stopped after {} months, {} frames, {} points{}",
            summary.months,
            summary.frames,
            summary.points,
            if summary.cancelled { " (cancelled)" } else { "" }
        );
        Ok(summary)
    }

    fn play(&mut self, records: &[MonthRecord], summary: &mut RunSummary) -> Result<()> {
        for rec in records {
            if self.cancel.is_cancelled() {
                break;
            }

            self.state = DriverState::Activating;
            let rain = rec.rain_norm(self.cfg)?;
            let added = self
                .activation
                .activate_for_month(rain, self.clock.current());
            let active = self.activation.active_indices();
            let caption = rec.caption();
            log::debug!(
                "{}: norm {:.3}, +{} particles, {} active",
                caption,
                rain.value(),
                added,
                self.activation.active_count()
            );

            self.state = DriverState::Animating;
            for _ in 0..self.cfg.frames_per_month {
                if self.cancel.is_cancelled() {
                    break;
                }
                let frame = self.clock.advance();
                render_frame(
                    self.field,
                    &self.activation,
                    frame,
                    &active,
                    rain,
                    self.cfg.tail_max,
                    &mut self.points,
                );
                self.sink.present_frame(&self.points, &caption)?;
                summary.frames += 1;
                summary.points += self.points.len() as u64;
                self.sink.pause(self.cfg.frame_interval)?;
            }

            summary.months += 1;
            self.state = DriverState::Idle;
        }
        Ok(())
    }
}
