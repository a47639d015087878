// ============================================================
// Layer 4 — Failure Reporting
// ============================================================
// Every utility operation follows the same failure policy:
//
//   1. log the full diagnostic report at error severity
//   2. hand the ORIGINAL error back to the caller
//
// Nothing is recovered, wrapped, or renamed here. The report is
// anyhow's `{:?}` form: the message, every `Caused by:` entry,
// and the backtrace when RUST_BACKTRACE / RUST_LIB_BACKTRACE is
// set. Callers can still `downcast_ref` the error to the type
// the collaborator produced (io::Error, serde_pickle::Error, ...).
//
// Reference: Rust Book §9 (Error Handling)
//            anyhow docs (Display vs Debug representations)

use anyhow::Result;

/// Observe-and-propagate adapters for `anyhow::Result`.
pub trait LogOnError<T> {
    /// Log an `Err` through `tracing::error!` and return it unchanged.
    fn log_on_error(self) -> Result<T>;

    /// Like [`log_on_error`](Self::log_on_error), and also write the
    /// report straight to the console (stderr).
    fn log_and_print_on_error(self) -> Result<T>;
}

impl<T> LogOnError<T> for Result<T> {
    fn log_on_error(self) -> Result<T> {
        if let Err(e) = &self {
            tracing::error!("{:?}", e);
        }
        self
    }

    fn log_and_print_on_error(self) -> Result<T> {
        if let Err(e) = &self {
            tracing::error!("{:?}", e);
            eprintln!("{:?}", e);
        }
        self
    }
}

// ─── Test Log Capture ─────────────────────────────────────────────────────────
// Runs a closure under a thread-local fmt subscriber that writes
// plain (no ANSI) lines into a buffer, and hands the text back.
#[cfg(test)]
pub(crate) mod capture {
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Buffer {
        fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(bytes);
            Ok(bytes.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
        let buffer = Buffer::default();
        let writer = buffer.clone();

        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::TRACE)
            .finish();

        let out  = tracing::subscriber::with_default(subscriber, f);
        let logs = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        (out, logs)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    fn not_found() -> Result<()> {
        Err(io::Error::new(io::ErrorKind::NotFound, "gone").into())
    }

    #[test]
    fn test_ok_passes_through() {
        let r: Result<u8> = Ok(7);
        assert_eq!(r.log_on_error().unwrap(), 7);
    }

    #[test]
    fn test_error_keeps_type_and_message() {
        let err = not_found().log_on_error().unwrap_err();
        let io_err = err.downcast_ref::<io::Error>().unwrap();
        assert_eq!(io_err.kind(), io::ErrorKind::NotFound);
        assert_eq!(err.to_string(), "gone");
    }

    #[test]
    fn test_error_is_logged_at_error_level() {
        let (res, logs) = capture::capture_logs(|| not_found().log_on_error());
        assert!(res.is_err());
        assert!(logs.contains("ERROR"), "logs: {logs}");
        assert!(logs.contains("gone"), "logs: {logs}");
    }

    #[test]
    fn test_ok_logs_nothing() {
        let (_, logs) = capture::capture_logs(|| Ok::<_, anyhow::Error>(1).log_on_error());
        assert!(logs.is_empty(), "logs: {logs}");
    }

    #[test]
    fn test_print_variant_keeps_type() {
        let err = not_found().log_and_print_on_error().unwrap_err();
        assert!(err.downcast_ref::<io::Error>().is_some());
    }
}
