//! Run-until-cancelled frame scheduling.
//!
//! The per-frame callback is a [`FrameTask`]. A [`FrameScheduler`] decides
//! *when* frames run: the browser's `requestAnimationFrame` (the
//! `web` module), winit redraw requests (the `viewer` module), or a
//! fixed-interval timer for headless targets ([`IntervalScheduler`]).
//! Every scheduler runs one frame to completion before starting the next.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::SphereError;
use crate::util::frame_timing::FrameTiming;

/// One unit of per-frame work.
pub trait FrameTask {
    /// Run a single frame.
    ///
    /// # Errors
    ///
    /// An error stops the scheduler driving this task.
    fn run_frame(&mut self) -> Result<(), SphereError>;
}

impl<T: FrameTask> FrameTask for Rc<RefCell<T>> {
    fn run_frame(&mut self) -> Result<(), SphereError> {
        self.borrow_mut().run_frame()
    }
}

/// Cloneable stop flag shared between a scheduler and whoever may stop it.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    /// Create a handle that is not cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request that no further frames run.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Whether [`cancel`](Self::cancel) has been called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Drives a [`FrameTask`] until it is cancelled or fails.
pub trait FrameScheduler {
    /// Start driving `task`. Blocking schedulers return when the task
    /// stops; event-driven ones return once the first frame is queued.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by the task or by the scheduler.
    fn schedule<T: FrameTask + 'static>(
        self,
        task: T,
        cancel: CancelHandle,
    ) -> Result<(), SphereError>;
}

/// Fixed-interval scheduler for targets without a display refresh signal.
///
/// Sleeps the calling thread between frames to hold the target frame rate
/// (0 = as fast as possible). An optional frame limit stops it after a set
/// number of frames.
#[derive(Debug, Clone)]
pub struct IntervalScheduler {
    timing: FrameTiming,
    frame_limit: Option<u64>,
}

impl IntervalScheduler {
    /// Create a scheduler pacing frames at `target_fps`.
    #[must_use]
    pub fn new(target_fps: u32) -> Self {
        Self {
            timing: FrameTiming::new(target_fps),
            frame_limit: None,
        }
    }

    /// Stop after `frames` frames.
    #[must_use]
    pub fn with_frame_limit(mut self, frames: u64) -> Self {
        self.frame_limit = Some(frames);
        self
    }

    /// Smoothed frames per second over the run so far.
    pub fn fps(&self) -> f32 {
        self.timing.fps()
    }

    /// Run `task` on this thread until cancelled, the frame limit is hit,
    /// or the task fails. Returns the number of frames run.
    ///
    /// # Errors
    ///
    /// Returns the task's error; frames already run are not rolled back.
    pub fn run(
        &mut self,
        task: &mut impl FrameTask,
        cancel: &CancelHandle,
    ) -> Result<u64, SphereError> {
        let mut frames = 0u64;
        while !cancel.is_cancelled() {
            if self.frame_limit.is_some_and(|limit| frames >= limit) {
                break;
            }
            let wait = self.timing.time_until_next_frame();
            if !wait.is_zero() {
                std::thread::sleep(wait);
            }
            task.run_frame()?;
            self.timing.end_frame();
            frames += 1;
        }
        log::debug!(
            "interval scheduler stopped after {frames} frames ({:.1} fps)",
            self.timing.fps()
        );
        Ok(frames)
    }
}

impl FrameScheduler for IntervalScheduler {
    fn schedule<T: FrameTask + 'static>(
        mut self,
        mut task: T,
        cancel: CancelHandle,
    ) -> Result<(), SphereError> {
        let _ = self.run(&mut task, &cancel)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counter {
        frames: u32,
        fail_at: Option<u32>,
        cancel_at: Option<(u32, CancelHandle)>,
    }

    impl FrameTask for Counter {
        fn run_frame(&mut self) -> Result<(), SphereError> {
            self.frames += 1;
            if self.fail_at == Some(self.frames) {
                return Err(SphereError::Viewer("boom".into()));
            }
            if let Some((at, handle)) = &self.cancel_at {
                if *at == self.frames {
                    handle.cancel();
                }
            }
            Ok(())
        }
    }

    #[test]
    fn frame_limit_runs_exact_number_of_frames() {
        let mut task = Counter::default();
        let mut scheduler = IntervalScheduler::new(0).with_frame_limit(7);
        let ran = scheduler.run(&mut task, &CancelHandle::new()).unwrap();
        assert_eq!(ran, 7);
        assert_eq!(task.frames, 7);
    }

    #[test]
    fn cancel_stops_after_current_frame() {
        let cancel = CancelHandle::new();
        let mut task = Counter {
            cancel_at: Some((3, cancel.clone())),
            ..Counter::default()
        };
        let ran = IntervalScheduler::new(0).run(&mut task, &cancel).unwrap();
        assert_eq!(ran, 3);
        assert!(cancel.is_cancelled());
    }

    #[test]
    fn cancelled_handle_runs_nothing() {
        let cancel = CancelHandle::new();
        cancel.cancel();
        let mut task = Counter::default();
        let ran = IntervalScheduler::new(0).run(&mut task, &cancel).unwrap();
        assert_eq!(ran, 0);
        assert_eq!(task.frames, 0);
    }

    #[test]
    fn task_error_stops_the_loop() {
        let mut task = Counter {
            fail_at: Some(2),
            ..Counter::default()
        };
        let result = IntervalScheduler::new(0)
            .with_frame_limit(10)
            .run(&mut task, &CancelHandle::new());
        assert!(result.is_err());
        assert_eq!(task.frames, 2);
    }

    #[test]
    fn shared_task_runs_through_rc() {
        let shared = Rc::new(RefCell::new(Counter::default()));
        IntervalScheduler::new(0)
            .with_frame_limit(4)
            .schedule(Rc::clone(&shared), CancelHandle::new())
            .unwrap();
        assert_eq!(shared.borrow().frames, 4);
    }

    #[test]
    fn capped_rate_paces_frames() {
        let mut task = Counter::default();
        let start = std::time::Instant::now();
        let _ = IntervalScheduler::new(100)
            .with_frame_limit(3)
            .run(&mut task, &CancelHandle::new())
            .unwrap();
        // First frame may run immediately; the next two wait ~10ms each
        assert!(start.elapsed() >= std::time::Duration::from_millis(15));
    }
}
