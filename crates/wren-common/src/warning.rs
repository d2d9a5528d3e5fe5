//! Pipeline warnings with colored terminal output.
//!
//! Provides deduplication to avoid spamming the same warning multiple times.
//! Used by the tokenizer, tree builder, style parser and layout engine to
//! report input they had to repair or ignore.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use owo_colors::OwoColorize;

/// Global set of warnings we've already printed (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// When set, warnings are still recorded but never printed.
static QUIET: AtomicBool = AtomicBool::new(false);

fn key(component: &str, message: &str) -> String {
    format!("[{component}] {message}")
}

/// Warn about repaired or ignored input (prints once per unique message)
///
/// # Example
/// ```ignore
/// warn_once("CSS", "unrecognized color 'chartreuse'");
/// ```
pub fn warn_once(component: &str, message: &str) {
    let should_print = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key(component, message));

    if should_print && !QUIET.load(Ordering::Relaxed) {
        eprintln!("{}", format!("[wren {component}] ⚠ {message}").yellow());
    }
}

/// Returns true if this exact warning has been emitted since the last clear.
#[must_use]
pub fn has_warned(component: &str, message: &str) -> bool {
    WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
        .is_some_and(|set| set.contains(&key(component, message)))
}

/// Suppress (or re-enable) printing of warnings.
pub fn set_quiet(quiet: bool) {
    QUIET.store(quiet, Ordering::Relaxed);
}

/// Clear all recorded warnings (call before processing a new document)
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_is_recorded_once() {
        set_quiet(true);
        warn_once("Test", "recorded once");
        warn_once("Test", "recorded once");
        assert!(has_warned("Test", "recorded once"));
        assert!(!has_warned("Other", "recorded once"));
    }
}
