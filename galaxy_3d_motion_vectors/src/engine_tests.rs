//! Unit tests for the Engine logging hub
//!
//! IMPORTANT: LOGGER is a global OnceLock shared across all tests.
//! All tests are marked with #[serial] to run sequentially.

use crate::galaxy3d::{Engine, Error};
use crate::galaxy3d::log::{Logger, LogEntry, LogSeverity};
use std::sync::{Arc, Mutex};
use serial_test::serial;

// ============================================================================
// TEST HELPERS
// ============================================================================

/// Test logger that captures log entries for verification
struct TestLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

/// Source used by every test here; other tests may log concurrently.
const SOURCE: &str = "galaxy3d::EngineTest";

impl TestLogger {
    fn install() -> Arc<Mutex<Vec<LogEntry>>> {
        let entries = Arc::new(Mutex::new(Vec::new()));
        Engine::set_logger(TestLogger { entries: Arc::clone(&entries) });
        entries
    }
}

impl Logger for TestLogger {
    fn log(&self, entry: &LogEntry) {
        if entry.source == SOURCE {
            self.entries.lock().unwrap().push(entry.clone());
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[test]
#[serial]
fn test_log_reaches_custom_logger() {
    let entries = TestLogger::install();

    Engine::log(LogSeverity::Debug, SOURCE, "hello".to_string());

    let captured = entries.lock().unwrap();
    assert_eq!(captured.len(), 1);
    assert_eq!(captured[0].severity, LogSeverity::Debug);
    assert_eq!(captured[0].message, "hello");
    assert!(captured[0].file.is_none());
    drop(captured);
    Engine::reset_logger();
}

#[test]
#[serial]
fn test_log_and_return_error() {
    let entries = TestLogger::install();

    let error = Engine::log_and_return_error(
        SOURCE,
        Error::InvalidState("end() called in state Idle".to_string()),
    );
    assert_eq!(error, Error::InvalidState("end() called in state Idle".to_string()));

    let captured = entries.lock().unwrap();
    assert_eq!(captured.len(), 1);
    assert_eq!(captured[0].severity, LogSeverity::Error);
        assert!(captured[0].message.contains("end() called in state Idle"));
    assert!(captured[0].line.is_some());
    drop(captured);
    Engine::reset_logger();
}

#[test]
#[serial]
fn test_macros_route_through_engine() {
    let entries = TestLogger::install();

    crate::engine_trace!(SOURCE, "t {}", 1);
    crate::engine_info!(SOURCE, "i {}", 2);
    crate::engine_warn!(SOURCE, "w {}", 3);

    let captured = entries.lock().unwrap();
    let severities: Vec<LogSeverity> = captured.iter().map(|e| e.severity).collect();
    assert_eq!(severities, vec![LogSeverity::Trace, LogSeverity::Info, LogSeverity::Warn]);
    assert_eq!(captured[2].message, "w 3");
    drop(captured);
    Engine::reset_logger();
}

#[test]
#[serial]
fn test_reset_logger_detaches_custom_logger() {
    let entries = TestLogger::install();
    Engine::reset_logger();

    Engine::log(LogSeverity::Trace, SOURCE, "not captured".to_string());
    assert!(entries.lock().unwrap().is_empty());
}
