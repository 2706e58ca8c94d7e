//! Animation loop: binds a [`PathAnimator`] to a [`FrameScheduler`].
//!
//! The loop owns exactly one scheduled callback at a time. Each callback
//! carries the generation it was scheduled under; `stop` bumps the
//! generation, so a callback that still fires afterwards (a host kept a
//! reference to it, or cancellation raced the frame) finds a mismatch and
//! returns without touching state.

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, warn};

use crate::animator::{AnimationState, PathAnimator};
use crate::geometry::Point;
use crate::outputs::FrameSnapshot;
use crate::scheduler::FrameScheduler;

/// Called after every tick. No borrow of the loop is held during the call,
/// so the listener may `stop()`, `start()` or replace itself.
pub type FrameListener = Box<dyn FnMut(&FrameSnapshot)>;

struct LoopShared<H> {
    animator: PathAnimator,
    pending: Option<H>,
    generation: u64,
    running: bool,
    listener: Option<FrameListener>,
}

/// Drives a path animator once per display frame until stopped or dropped.
pub struct AnimationLoop<S: FrameScheduler + 'static> {
    shared: Rc<RefCell<LoopShared<S::Handle>>>,
    scheduler: Rc<S>,
}

impl<S: FrameScheduler + 'static> AnimationLoop<S> {
    pub fn new(animator: PathAnimator, scheduler: Rc<S>) -> Self {
        Self {
            shared: Rc::new(RefCell::new(LoopShared {
                animator,
                pending: None,
                generation: 0,
                running: false,
                listener: None,
            })),
            scheduler,
        }
    }

    /// Register the per-frame listener, replacing any previous one.
    pub fn on_frame(&self, listener: FrameListener) {
        self.shared.borrow_mut().listener = Some(listener);
    }

    /// Begin ticking on every frame. A second call while running is a no-op.
    pub fn start(&self) {
        let generation = {
            let mut shared = self.shared.borrow_mut();
            if shared.running {
                debug!("animation loop already running; start ignored");
                return;
            }
            shared.running = true;
            shared.generation += 1;
            shared.animator.forget_timestamp();
            shared.generation
        };
        debug!("animation loop started (generation {generation})");
        schedule_next(&self.shared, &self.scheduler, generation);
    }

    /// Cancel the pending frame. Idempotent; no state changes after return.
    pub fn stop(&self) {
        let pending = {
            let mut shared = self.shared.borrow_mut();
            if !shared.running {
                return;
            }
            shared.running = false;
            shared.generation += 1;
            shared.pending.take()
        };
        if let Some(handle) = pending {
            self.scheduler.cancel_frame(handle);
        }
        debug!("animation loop stopped");
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.shared.borrow().running
    }

    /// Handle of the frame callback currently queued, if any.
    #[inline]
    pub fn pending_handle(&self) -> Option<S::Handle> {
        self.shared.borrow().pending
    }

    #[inline]
    pub fn state(&self) -> AnimationState {
        self.shared.borrow().animator.state()
    }

    #[inline]
    pub fn segment_index(&self) -> usize {
        self.shared.borrow().animator.segment_index()
    }

    #[inline]
    pub fn progress(&self) -> f64 {
        self.shared.borrow().animator.progress()
    }

    #[inline]
    pub fn current_position(&self) -> Point {
        self.shared.borrow().animator.current_position()
    }

    /// Read access to the animator.
    pub fn with_animator<R>(&self, f: impl FnOnce(&PathAnimator) -> R) -> R {
        f(&self.shared.borrow().animator)
    }
}

impl<S: FrameScheduler + 'static> Drop for AnimationLoop<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

fn schedule_next<S: FrameScheduler + 'static>(
    shared: &Rc<RefCell<LoopShared<S::Handle>>>,
    scheduler: &Rc<S>,
    generation: u64,
) {
    let weak_shared = Rc::downgrade(shared);
    let weak_scheduler = Rc::downgrade(scheduler);
    let handle = scheduler.request_frame(Box::new(move |now: f64| {
        let Some(shared) = weak_shared.upgrade() else {
            return;
        };
        if !run_frame(&shared, generation, now) {
            return;
        }
        if let Some(scheduler) = weak_scheduler.upgrade() {
            schedule_next(&shared, &scheduler, generation);
        }
    }));
    let mut guard = shared.borrow_mut();
    match handle {
        Some(handle) => guard.pending = Some(handle),
        None => {
            warn!("frame request refused; animation loop stopped");
            guard.running = false;
            guard.generation += 1;
            guard.pending = None;
        }
    }
}

/// Tick once if `generation` is still current. Returns whether the loop
/// should keep going.
fn run_frame<H>(shared: &Rc<RefCell<LoopShared<H>>>, generation: u64, now: f64) -> bool {
    let (mut listener, snapshot) = {
        let mut guard = shared.borrow_mut();
        if !guard.running || guard.generation != generation {
            return false;
        }
        guard.pending = None;
        guard.animator.tick(now);
        let listener = guard.listener.take();
        let snapshot = listener.as_ref().map(|_| FrameSnapshot::of(&guard.animator));
        (listener, snapshot)
    };

    if let (Some(listener), Some(snapshot)) = (listener.as_mut(), snapshot.as_ref()) {
        listener(snapshot);
    }

    let mut guard = shared.borrow_mut();
    if guard.listener.is_none() {
        guard.listener = listener;
    }
    guard.running && guard.generation == generation
}
