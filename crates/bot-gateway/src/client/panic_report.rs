//! Panic capture for the dispatch loop
//!
//! `catch_unwind` only returns after the stack has unwound, so the location
//! and backtrace of a handler panic are recorded by a process-wide panic hook
//! while the faulting frames are still live. The hook records panics raised
//! inside a [`CapturePanics`] poll and passes every other panic to the hook
//! that was installed before it.

use std::any::Any;
use std::backtrace::Backtrace;
use std::cell::{Cell, RefCell};
use std::future::Future;
use std::panic::{self, PanicHookInfo};
use std::pin::Pin;
use std::sync::Once;
use std::task::{Context, Poll};

struct Captured {
    location: Option<String>,
    backtrace: Backtrace,
}

thread_local! {
    static CAPTURING: Cell<bool> = const { Cell::new(false) };
    static CAPTURED: RefCell<Option<Captured>> = const { RefCell::new(None) };
}

static HOOK: Once = Once::new();

/// Install the recording hook; later calls are no-ops
pub(crate) fn install_hook() {
    HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info: &PanicHookInfo<'_>| {
            if CAPTURING.with(Cell::get) {
                let captured = Captured {
                    location: info.location().map(ToString::to_string),
                    backtrace: Backtrace::force_capture(),
                };
                CAPTURED.with(|slot| *slot.borrow_mut() = Some(captured));
            } else {
                previous(info);
            }
        }));
    });
}

/// Future wrapper marking its polls as recordable by the hook
pub(crate) struct CapturePanics<F> {
    inner: Pin<Box<F>>,
}

impl<F: Future> CapturePanics<F> {
    pub fn new(inner: F) -> Self {
        Self {
            inner: Box::pin(inner),
        }
    }
}

impl<F: Future> Future for CapturePanics<F> {
    type Output = F::Output;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let _guard = CaptureGuard::enter();
        self.inner.as_mut().poll(cx)
    }
}

struct CaptureGuard {
    previous: bool,
}

impl CaptureGuard {
    fn enter() -> Self {
        // A panic swallowed inside an earlier poll must not be reported later
        CAPTURED.with(|slot| slot.borrow_mut().take());
        Self {
            previous: CAPTURING.with(|flag| flag.replace(true)),
        }
    }
}

impl Drop for CaptureGuard {
    fn drop(&mut self) {
        CAPTURING.with(|flag| flag.set(self.previous));
    }
}

/// What is known about a caught panic
#[derive(Debug)]
pub(crate) struct PanicReport {
    pub message: String,
    /// `file:line:column` of the `panic!`
    pub location: Option<String>,
    pub backtrace: Option<Backtrace>,
}

impl PanicReport {
    /// Combine the caught payload with what the hook recorded on this thread
    ///
    /// Must run on the thread that caught the panic, before anything else is
    /// polled inside [`CapturePanics`].
    pub fn take(payload: &(dyn Any + Send)) -> Self {
        let captured = CAPTURED.with(|slot| slot.borrow_mut().take());
        let (location, backtrace) = match captured {
            Some(c) => (c.location, Some(c.backtrace)),
            None => (None, None),
        };
        Self {
            message: panic_message(payload),
            location,
            backtrace,
        }
    }

    pub fn location(&self) -> &str {
        self.location.as_deref().unwrap_or("unknown")
    }

    pub fn backtrace_text(&self) -> String {
        self.backtrace
            .as_ref()
            .map_or_else(|| "unavailable".to_string(), ToString::to_string)
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
