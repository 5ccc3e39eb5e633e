//! PPT Invariant System: invariant enforcement with contract tracking.

// IMPORTANT: Only the harness and exporters assert invariants. Kernel loops
// run inside the timed region and must not take the log lock.

#[cfg(feature = "ppt")]
use lazy_static::lazy_static;
#[cfg(feature = "ppt")]
use std::collections::HashSet;
#[cfg(feature = "ppt")]
use std::sync::Mutex;

// Invariant IDs for contract tracking
pub const KERNEL_SUM_NONZERO: u32 = 1;
pub const LANE_ALIGNED_STRIDE: u32 = 2;
pub const EXPORT_LENGTH: u32 = 3;
pub const TIMING_FINITE: u32 = 4;
pub const BACKEND_RESOLVED: u32 = 5;
pub const EDGE_POLICY_APPLIED: u32 = 6;

#[cfg(feature = "ppt")]
lazy_static! {
    static ref INVARIANT_LOG: Mutex<HashSet<u32>> = Mutex::new(HashSet::new());
}

#[cfg(feature = "ppt")]
/// Assert an invariant: logs it and panics on failure.
pub(crate) fn assert_invariant(id: u32, condition: bool, message: &str, context: Option<&str>) {
    if !condition {
        let full_message = if let Some(ctx) = context {
            format!("Invariant {} failed: {} (context: {})", id, message, ctx)
        } else {
            format!("Invariant {} failed: {}", id, message)
        };
        tracing::error!("{}", full_message);
        panic!("{}", full_message);
    }
    // A poisoned log only means another thread panicked mid-insert.
    INVARIANT_LOG
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .insert(id);
}

#[cfg(not(feature = "ppt"))]
/// Assert an invariant: checks condition and panics on failure.
pub(crate) fn assert_invariant(_id: u32, condition: bool, message: &str, _context: Option<&str>) {
    if !condition {
        panic!("Invariant failed: {}", message);
    }
}

#[cfg(feature = "ppt")]
/// Contract test: checks that specified invariants were asserted.
pub fn contract_test(test_name: &str, required_invariants: &[u32]) {
    let log = INVARIANT_LOG
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    let missing: Vec<u32> = required_invariants
        .iter()
        .copied()
        .filter(|inv| !log.contains(inv))
        .collect();
    drop(log); // Drop the lock before panicking
    if !missing.is_empty() {
        panic!(
            "Contract test '{}' failed: invariants not enforced: {:?}",
            test_name, missing
        );
    }
}

#[cfg(not(feature = "ppt"))]
/// Contract test: no-op when PPT feature is disabled.
pub fn contract_test(_test_name: &str, _required_invariants: &[u32]) {}

#[cfg(feature = "ppt")]
/// Clear invariant log (for between test runs).
pub fn clear_invariant_log() {
    INVARIANT_LOG
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .clear();
}

#[cfg(not(feature = "ppt"))]
/// Clear invariant log: no-op when PPT feature is disabled.
pub fn clear_invariant_log() {}

/// Maps invariant ID to a readable name (diagnostics only).
pub const fn invariant_name(id: u32) -> &'static str {
    match id {
        KERNEL_SUM_NONZERO => "KERNEL_SUM_NONZERO",
        LANE_ALIGNED_STRIDE => "LANE_ALIGNED_STRIDE",
        EXPORT_LENGTH => "EXPORT_LENGTH",
        TIMING_FINITE => "TIMING_FINITE",
        BACKEND_RESOLVED => "BACKEND_RESOLVED",
        EDGE_POLICY_APPLIED => "EDGE_POLICY_APPLIED",
        _ => "UNKNOWN",
    }
}
