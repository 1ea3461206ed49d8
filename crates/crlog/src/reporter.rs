use std::error::Error;

use tracing::error;

/// Receives handled errors alongside the log file, e.g. to forward them to a crash service.
///
/// Calls are fire-and-forget; the logger never looks at the outcome.
pub trait CrashReporter: Send + Sync {
    fn capture_message(&self, message: &str, info: Option<&str>);
    fn capture_error(&self, error: &dyn Error, info: Option<&str>);
}

/// Reporter that drops everything. Used when no backend is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopReporter;

impl CrashReporter for NoopReporter {
    fn capture_message(&self, _message: &str, _info: Option<&str>) {}
    fn capture_error(&self, _error: &dyn Error, _info: Option<&str>) {}
}

/// Reporter that turns captures into `tracing` error events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl CrashReporter for TracingReporter {
    fn capture_message(&self, message: &str, info: Option<&str>) {
        error!(info = info.unwrap_or_default(), "{message}");
    }

    fn capture_error(&self, err: &dyn Error, info: Option<&str>) {
        error!(
            info = info.unwrap_or_default(),
            error = ?err,
            "{}",
            display_string(err)
        );
    }
}

/// Human-readable text for `error`: its `Display` output, or its `Debug` output when the
/// `Display` impl writes nothing.
pub fn display_string(error: &dyn Error) -> String {
    let text = error.to_string();
    if text.is_empty() {
        format!("{error:?}")
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use tracing::{span, Event, Level, Metadata, Subscriber};

    use super::*;

    /// Counts error-level events seen while it is the default subscriber.
    #[derive(Clone, Default)]
    struct ErrorCounter(Arc<AtomicUsize>);

    impl Subscriber for ErrorCounter {
        fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
            true
        }

        fn new_span(&self, _span: &span::Attributes<'_>) -> span::Id {
            span::Id::from_u64(1)
        }

        fn record(&self, _span: &span::Id, _values: &span::Record<'_>) {}

        fn record_follows_from(&self, _span: &span::Id, _follows: &span::Id) {}

        fn event(&self, event: &Event<'_>) {
            if *event.metadata().level() == Level::ERROR {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }

        fn enter(&self, _span: &span::Id) {}

        fn exit(&self, _span: &span::Id) {}
    }

    #[derive(Debug, thiserror::Error)]
    #[error("disk full")]
    struct Described;

    #[derive(Debug, thiserror::Error)]
    #[error("")]
    struct Silent {
        code: u8,
    }

    #[test]
    fn display_string_prefers_display_text() {
        assert_eq!(display_string(&Described), "disk full");
    }

    #[test]
    fn display_string_falls_back_to_debug() {
        let err = Silent { code: 7 };
        assert_eq!(err.code, 7);
        assert_eq!(display_string(&err), "Silent { code: 7 }");
    }

    #[test]
    fn noop_reporter_accepts_everything() {
        let reporter = NoopReporter;
        reporter.capture_message("m", None);
        reporter.capture_error(&Described, Some("ctx"));
    }

    #[test]
    fn tracing_reporter_emits_one_error_event_per_capture() {
        let counter = ErrorCounter::default();
        tracing::subscriber::with_default(counter.clone(), || {
            let reporter = TracingReporter;
            reporter.capture_message("queue stalled", None);
            reporter.capture_error(&Described, Some("flush"));
            reporter.capture_error(&Silent { code: 3 }, None);
        });
        assert_eq!(counter.0.load(Ordering::SeqCst), 3);
    }
}
