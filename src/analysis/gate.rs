//! Single-flight control for analysis requests: at most one request is in
//! flight per session, and a second request while busy is refused rather
//! than queued.

use std::sync::{Mutex, MutexGuard, PoisonError, TryLockError};

use serde::Serialize;

// ═══════════════════════════════════════════════════════════
// Types
// ═══════════════════════════════════════════════════════════

/// Snapshot of the analysis currently in flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveAnalysis {
    pub model: String,
    /// RFC 3339.
    pub started_at: String,
}

pub struct AnalysisGate {
    lock: Mutex<()>,
    current: Mutex<Option<ActiveAnalysis>>,
}

impl AnalysisGate {
    pub fn new() -> Self {
        Self {
            lock: Mutex::new(()),
            current: Mutex::new(None),
        }
    }

    /// Claim the gate without blocking. `None` while another analysis holds it.
    pub fn try_acquire(&self, model: &str) -> Option<AnalysisGuard<'_>> {
        let guard = match self.lock.try_lock() {
            Ok(guard) => guard,
            // A panic mid-analysis must not close the gate for good.
            Err(TryLockError::Poisoned(e)) => {
                tracing::warn!("Analysis gate recovered after a panicked request");
                e.into_inner()
            }
            Err(TryLockError::WouldBlock) => return None,
        };
        *self.current_slot() = Some(ActiveAnalysis {
            model: model.to_string(),
            started_at: chrono::Utc::now().to_rfc3339(),
        });
        Some(AnalysisGuard {
            _guard: guard,
            gate: self,
        })
    }

    pub fn is_analyzing(&self) -> bool {
        matches!(self.lock.try_lock(), Err(TryLockError::WouldBlock))
    }

    pub fn current(&self) -> Option<ActiveAnalysis> {
        self.current_slot().clone()
    }

    fn current_slot(&self) -> MutexGuard<'_, Option<ActiveAnalysis>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn clear(&self) {
        *self.current_slot() = None;
    }
}

impl Default for AnalysisGate {
    fn default() -> Self {
        Self::new()
    }
}

// ═══════════════════════════════════════════════════════════
// AnalysisGuard
// ═══════════════════════════════════════════════════════════

/// Held for the whole request; dropping it reopens the gate.
pub struct AnalysisGuard<'a> {
    _guard: MutexGuard<'a, ()>,
    gate: &'a AnalysisGate,
}

impl Drop for AnalysisGuard<'_> {
    fn drop(&mut self) {
        self.gate.clear();
    }
}
