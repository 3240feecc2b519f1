//! Interrupt handling for the build pipeline (SIGINT/Ctrl-C)
//!
//! The cargo child shares the foreground process group and inherited
//! stdio, so an interrupt reaches it directly; the orchestrator's job is
//! only to notice that it happened and refuse to publish afterwards,
//! so a half-built library is never left at the canonical path.
//!
//! On double-interrupt: exit immediately without waiting for the child.

use std::process;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// Process exit code for interrupted builds (128 + SIGINT)
pub const EXIT_CODE_INTERRUPTED: i32 = 130;

/// Action to take after receiving a signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptAction {
    /// First signal: let the child terminate, then abort before publish
    AbortAfterChild,
    /// Second signal: exit immediately
    ImmediateExit,
    /// Third+ signal: ignore
    Ignore,
}

/// Interrupt bookkeeping, testable without installing any handler
#[derive(Debug, Default)]
pub struct InterruptState {
    signal_count: AtomicU8,
}

impl InterruptState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether at least one interrupt has been received
    pub fn is_interrupted(&self) -> bool {
        self.signal_count.load(Ordering::SeqCst) > 0
    }

    /// Record one signal and decide what to do about it
    pub fn handle_signal(&self) -> InterruptAction {
        match self.signal_count.fetch_add(1, Ordering::SeqCst) {
            0 => InterruptAction::AbortAfterChild,
            1 => InterruptAction::ImmediateExit,
            _ => InterruptAction::Ignore,
        }
    }
}

/// Installs the Ctrl-C handler and exposes the shared state
pub struct InterruptGuard {
    state: Arc<InterruptState>,
}

impl InterruptGuard {
    /// Install the handler; must be called at most once per process
    pub fn install() -> Result<Self, ctrlc::Error> {
        let state = Arc::new(InterruptState::new());
        let handler_state = Arc::clone(&state);

        ctrlc::set_handler(move || match handler_state.handle_signal() {
            InterruptAction::AbortAfterChild => {
                eprintln!("\nInterrupt received, waiting for the build to stop...");
            }
            InterruptAction::ImmediateExit => {
                eprintln!("\nSecond interrupt, exiting immediately");
                process::exit(EXIT_CODE_INTERRUPTED);
            }
            InterruptAction::Ignore => {}
        })?;

        Ok(Self { state })
    }

    /// Shared state for the pipeline to poll after the child exits
    pub fn state(&self) -> Arc<InterruptState> {
        Arc::clone(&self.state)
    }
}
