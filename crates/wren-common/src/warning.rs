//! Deduplicated diagnostics with colored terminal output.
//!
//! Nothing in the engine aborts on bad input. Dropped rules, rejected
//! declarations, malformed tables and unreadable images are reported here
//! instead, once per distinct message.

use std::collections::HashSet;
use std::sync::Mutex;

/// ANSI color codes for terminal output
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

/// Messages already printed, keyed by `[component] message`.
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Report a recoverable problem (prints once per unique message).
///
/// # Example
/// ```ignore
/// warn_once("layout", "table without tbody skipped");
/// ```
pub fn warn_once(component: &str, message: &str) {
    let key = format!("[{component}] {message}");
    let first_time = match WARNED.lock() {
        Ok(mut guard) => guard.get_or_insert_with(HashSet::new).insert(key),
        // A poisoned set only loses deduplication.
        Err(poisoned) => poisoned.into_inner().get_or_insert_with(HashSet::new).insert(key),
    };

    if first_time {
        eprintln!("{YELLOW}[wren {component}] {message}{RESET}");
    }
}

/// Forget every recorded warning (call before processing a new document).
pub fn clear_warnings() {
    let mut guard = match WARNED.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}
