//! Frame scheduling seam.
//!
//! Hosts supply a "run again before next repaint" primitive. The browser
//! adapter wraps `requestAnimationFrame`; [`ManualScheduler`] is a
//! deterministic stand-in for native hosts and tests.

use std::cell::RefCell;
use std::fmt::Debug;

/// One-shot frame callback; receives the frame timestamp in milliseconds.
pub type FrameCallback = Box<dyn FnOnce(f64)>;

/// Schedules one-shot callbacks for the next display frame.
///
/// Methods take `&self`: a callback reschedules itself while the host may
/// still be holding the scheduler.
pub trait FrameScheduler {
    type Handle: Copy + Eq + Debug;

    /// Queue `callback` for the next frame. `None` if the host refused;
    /// the callback is dropped unrun.
    fn request_frame(&self, callback: FrameCallback) -> Option<Self::Handle>;

    /// Drop a queued callback. Unknown or already-fired handles are ignored.
    fn cancel_frame(&self, handle: Self::Handle);
}

/// Frame scheduler driven by explicit [`ManualScheduler::run_frame`] calls.
#[derive(Default)]
pub struct ManualScheduler {
    next_handle: RefCell<u64>,
    queue: RefCell<Vec<(u64, FrameCallback)>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of callbacks waiting for the next frame.
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Fire every callback queued before this call with timestamp `now`.
    /// Callbacks queued while firing wait for the next frame. Returns how
    /// many callbacks ran.
    pub fn run_frame(&self, now: f64) -> usize {
        let due = std::mem::take(&mut *self.queue.borrow_mut());
        let count = due.len();
        for (_, callback) in due {
            callback(now);
        }
        count
    }

    /// Remove a queued callback without cancelling it through the owner,
    /// as if the host had kept a reference to it. Lets tests replay a
    /// callback that fires late.
    pub fn take_callback(&self, handle: u64) -> Option<FrameCallback> {
        let mut queue = self.queue.borrow_mut();
        let pos = queue.iter().position(|(h, _)| *h == handle)?;
        Some(queue.remove(pos).1)
    }
}

impl FrameScheduler for ManualScheduler {
    type Handle = u64;

    fn request_frame(&self, callback: FrameCallback) -> Option<u64> {
        let mut next = self.next_handle.borrow_mut();
        *next += 1;
        let handle = *next;
        self.queue.borrow_mut().push((handle, callback));
        Some(handle)
    }

    fn cancel_frame(&self, handle: u64) {
        self.queue.borrow_mut().retain(|(h, _)| *h != handle);
    }
}

impl Debug for ManualScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManualScheduler")
            .field("next_handle", &*self.next_handle.borrow())
            .field("pending", &self.pending())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn callbacks_queued_while_firing_wait_for_next_frame() {
        let sched = Rc::new(ManualScheduler::new());
        let hits = Rc::new(RefCell::new(Vec::new()));

        let s2 = Rc::clone(&sched);
        let h2 = Rc::clone(&hits);
        sched.request_frame(Box::new(move |t: f64| {
            h2.borrow_mut().push(t);
            let h3 = Rc::clone(&h2);
            s2.request_frame(Box::new(move |t: f64| h3.borrow_mut().push(t)));
        }));

        assert_eq!(sched.run_frame(1.0), 1);
        assert_eq!(*hits.borrow(), vec![1.0]);
        assert_eq!(sched.pending(), 1);
        assert_eq!(sched.run_frame(2.0), 1);
        assert_eq!(*hits.borrow(), vec![1.0, 2.0]);
    }

    #[test]
    fn cancel_removes_only_that_handle() {
        let sched = ManualScheduler::new();
        let a = sched.request_frame(Box::new(|_: f64| {})).unwrap();
        let _b = sched.request_frame(Box::new(|_: f64| {}));
        sched.cancel_frame(a);
        sched.cancel_frame(a);
        assert_eq!(sched.pending(), 1);
    }
}
