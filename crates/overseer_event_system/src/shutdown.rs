//! Shutdown coordination for the host session.
//!
//! The tick loop checks [`ShutdownState::is_shutdown_initiated`] before
//! raising new events; teardown of buses and surrogates waits for
//! [`ShutdownState::complete_shutdown`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone)]
pub struct ShutdownState {
    /// No new ticks should raise events
    shutdown_initiated: Arc<AtomicBool>,
    /// The in-flight tick finished and teardown may begin
    shutdown_complete: Arc<AtomicBool>,
}

impl ShutdownState {
    pub fn new() -> Self {
        Self {
            shutdown_initiated: Arc::new(AtomicBool::new(false)),
            shutdown_complete: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_shutdown_initiated(&self) -> bool {
        self.shutdown_initiated.load(Ordering::Acquire)
    }

    pub fn is_shutdown_complete(&self) -> bool {
        self.shutdown_complete.load(Ordering::Acquire)
    }

    pub fn initiate_shutdown(&self) {
        if !self.shutdown_initiated.swap(true, Ordering::AcqRel) {
            info!("🛑 Shutdown initiated - no new ticks will raise events");
        }
    }

    pub fn complete_shutdown(&self) {
        self.shutdown_complete.store(true, Ordering::Release);
        info!("✅ Last tick finished - ready to tear down buses and surrogates");
    }
}

impl Default for ShutdownState {
    fn default() -> Self {
        Self::new()
    }
}
