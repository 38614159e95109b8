//! Frame driver: once per display refresh, sample progress and rebuild the scene.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::choreography::{Choreography, IdleInputs};
use crate::clock::Clock;
use crate::error::ConfigError;
use crate::params::{IdleSpin, SpinClock};
use crate::parts::PartRegistry;
use crate::progress::ProgressHandle;
use crate::stages::{clamp_progress, StageDisplay, StageSample};

/// Idle spin accumulated while the reveal/final stages are on screen
#[derive(Debug, Clone)]
pub struct SpinAccumulator {
    clock: SpinClock,
    angle: f32,
    last_ms: Option<f64>,
}

impl SpinAccumulator {
    pub fn new(clock: SpinClock) -> Self {
        Self {
            clock,
            angle: 0.0,
            last_ms: None,
        }
    }

    /// Total spin so far (radians)
    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn reset(&mut self) {
        self.angle = 0.0;
    }

    /// Advance to `now_ms`, spinning only if the active stage asks for it
    pub fn advance(&mut self, now_ms: f64, spin: Option<IdleSpin>) {
        let dt_s = self
            .last_ms
            .map(|last| ((now_ms - last) / 1000.0).max(0.0) as f32)
            .unwrap_or(0.0);
        self.last_ms = Some(now_ms);

        let Some(spin) = spin else {
            return;
        };
        match self.clock {
            SpinClock::WallClock { reference_fps } => {
                self.angle += spin.rad_per_frame * reference_fps * dt_s;
            }
            SpinClock::PerFrame => self.angle += spin.rad_per_frame,
        }
    }
}

/// Cancels the frame loop from anywhere (window close, navigation away)
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    stopped: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }
}

/// What one frame produced, for the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub frame: u64,
    pub progress: f32,
    pub sample: StageSample,
    pub display: StageDisplay,
    /// Display stage differs from the previous frame's
    pub stage_changed: bool,
}

/// Owns the registry and commits one evaluated scene per tick
pub struct FrameDriver<C: Clock> {
    choreography: Choreography,
    registry: PartRegistry,
    progress: ProgressHandle,
    clock: C,
    spin: SpinAccumulator,
    stop: StopHandle,
    frame: u64,
    last_display: Option<usize>,
}

impl<C: Clock> FrameDriver<C> {
    /// Pair a choreography with the registry it will drive
    ///
    /// Fails if the registry lacks a part or channel the stages write to.
    pub fn new(
        choreography: Choreography,
        registry: PartRegistry,
        progress: ProgressHandle,
        clock: C,
        spin_clock: SpinClock,
    ) -> Result<Self, ConfigError> {
        choreography.check_registry(&registry)?;
        Ok(Self {
            choreography,
            registry,
            progress,
            clock,
            spin: SpinAccumulator::new(spin_clock),
            stop: StopHandle::default(),
            frame: 0,
            last_display: None,
        })
    }

    /// Run one frame. Returns `None` once the loop has been stopped.
    pub fn tick(&mut self) -> Option<FrameReport> {
        if self.stop.is_stopped() {
            return None;
        }

        let progress = clamp_progress(self.progress.latest());
        let now_ms = self.clock.now_ms();

        if progress == 0.0 {
            self.spin.advance(now_ms, None);
            self.spin.reset();
        } else {
            let active = self.choreography.locate(progress);
            let idle_spin = self.choreography.stages()[active.index].idle_spin;
            self.spin.advance(now_ms, idle_spin);
        }

        let idle = IdleInputs {
            clock_ms: now_ms,
            spin_y: self.spin.angle(),
        };
        let sample = self
            .choreography
            .evaluate(progress, idle, &mut self.registry);
        let display = self.choreography.display(progress);

        let stage_changed = self.last_display != Some(display.index);
        if stage_changed {
            log::debug!(
                "Stage {} '{}' at {}%",
                display.index,
                display.label,
                display.percent
            );
            self.last_display = Some(display.index);
        }
        log::trace!(
            "frame {} progress {:.4} stage {} local {:.4} spin {:.4}",
            self.frame,
            progress,
            sample.index,
            sample.local,
            idle.spin_y
        );

        let report = FrameReport {
            frame: self.frame,
            progress,
            sample,
            display,
            stage_changed,
        };
        self.frame += 1;
        Some(report)
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn stop(&self) {
        self.stop.stop();
    }

    pub fn progress_handle(&self) -> ProgressHandle {
        self.progress.clone()
    }

    /// Registry state as of the last tick; read between frames only
    pub fn registry(&self) -> &PartRegistry {
        &self.registry
    }

    pub fn choreography(&self) -> &Choreography {
        &self.choreography
    }

    pub fn spin_angle(&self) -> f32 {
        self.spin.angle()
    }

    /// Viewport resize: updates the camera aspect ratio and nothing else
    pub fn resize(&mut self, width: u32, height: u32) {
        self.registry.camera_mut().resize(width, height);
    }
}
