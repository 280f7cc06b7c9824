//! The running-session resource.
//!
//! A [`Session`] exists while the pet's frame loop is live. It owns the one
//! pending [`FrameRequest`] and, during a drag, the [`PointerCapture`].
//! [`Session::release`] hands both back to the host through a single path and
//! is safe to call any number of times.

use log::debug;

use crate::host::{FrameRequest, FrameScheduler, PointerCapture, PointerInput};

#[derive(Debug, Default)]
pub struct Session {
    frame: Option<FrameRequest>,
    pointer: Option<PointerCapture>,
}

impl Session {
    /// Start a session with its first frame already requested.
    pub fn start<S: FrameScheduler>(scheduler: &mut S) -> Self {
        let frame = scheduler.request_frame();
        debug!("Session started with {:?}", frame);
        Self {
            frame: Some(frame),
            pointer: None,
        }
    }

    /// Consume `request` if it is the pending one. A cancelled or foreign
    /// request returns false and must be ignored by the caller.
    pub fn frame_fired(&mut self, request: FrameRequest) -> bool {
        if self.frame == Some(request) {
            self.frame = None;
            true
        } else {
            false
        }
    }

    /// Request the next frame unless one is already pending.
    pub fn schedule_next<S: FrameScheduler>(&mut self, scheduler: &mut S) {
        if self.frame.is_none() {
            self.frame = Some(scheduler.request_frame());
        }
    }

    pub fn has_pending_frame(&self) -> bool {
        self.frame.is_some()
    }

    pub fn capture_pointer<P: PointerInput>(&mut self, input: &mut P) {
        if self.pointer.is_none() {
            self.pointer = Some(input.capture_pointer());
        }
    }

    pub fn release_pointer<P: PointerInput>(&mut self, input: &mut P) {
        if let Some(capture) = self.pointer.take() {
            input.release_pointer(capture);
        }
    }

    /// Cancel the pending frame and drop any pointer capture.
    pub fn release<H: FrameScheduler + PointerInput>(&mut self, host: &mut H) {
        if let Some(frame) = self.frame.take() {
            host.cancel_frame(frame);
        }
        self.release_pointer(host);
    }
}
