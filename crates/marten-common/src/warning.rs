//! Parser warnings with colored terminal output.
//!
//! Provides deduplication so a diagnostic that is reported repeatedly (the
//! same code at the same position) is printed once. The parser libraries never
//! print on their own; front ends route diagnostics through here.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use owo_colors::OwoColorize;

/// Global set of warnings we've already printed (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Whether warnings are printed at all.
static ENABLED: AtomicBool = AtomicBool::new(true);

/// Warn about a parse problem (prints once per unique message).
///
/// Returns `true` if the warning was printed, `false` if it was a duplicate
/// or warnings are disabled.
///
/// # Example
/// ```ignore
/// warn_once("html", "x-invalid-end-tag at 3:10");
/// ```
pub fn warn_once(component: &str, message: &str) -> bool {
    if !ENABLED.load(Ordering::Relaxed) {
        return false;
    }

    let key = format!("[{component}] {message}");
    let should_print = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if should_print {
        let label = format!("[marten {component}]");
        eprintln!("{} {}", label.yellow().bold(), message.yellow());
    }
    should_print
}

/// Enable or disable warning output for the whole process.
pub fn set_enabled(enabled: bool) {
    ENABLED.store(enabled, Ordering::Relaxed);
}

/// Clear all recorded warnings (call before parsing a new input).
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}
