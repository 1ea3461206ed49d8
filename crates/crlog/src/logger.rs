use std::{error::Error, fmt, sync::Arc};

use tracing::{debug, warn};

use crate::{
    config::LogFileConfig,
    error::SinkError,
    log_message::{merge_payload, LogMessage},
    message_id::MessageId,
    reporter::{display_string, CrashReporter, NoopReporter},
    sink::{FileSink, LineSink, NullSink},
    source_info::SourceInfo,
};

const EXPECTED_VALUE: &str = "Expected value for variable.";

/// Writes records to a [`LineSink`] and forwards handled errors to a [`CrashReporter`].
///
/// Cheap to clone; clones share the same sink and reporter.
#[derive(Clone)]
pub struct Logger {
    reporter: Arc<dyn CrashReporter>,
    sink: Arc<dyn LineSink>,
}

impl Logger {
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::default()
    }

    /// Logger appending to the file described by `config`, with no reporter.
    pub fn from_config(config: &LogFileConfig) -> Result<Self, SinkError> {
        let sink = FileSink::from_config(config)?;
        Ok(Self::builder().sink(Arc::new(sink)).build())
    }

    /// Encodes `message` and appends it, returning any sink failure.
    pub fn try_write(&self, message: &LogMessage) -> Result<(), SinkError> {
        if !message.is_lossless() {
            debug!(
                type_name = message.source().type_name(),
                "record will not decode to the same value"
            );
        }
        self.sink.append(&message.to_string())
    }

    /// Like [`Logger::try_write`], but a sink failure is only traced.
    pub fn write(&self, message: &LogMessage) {
        if let Err(err) = self.try_write(message) {
            warn!(error = %err, "failed to append log record");
        }
    }

    pub fn log(&self, source: &SourceInfo, message_id: MessageId, data: Option<&str>) {
        self.log_with_info(source, message_id, data, None);
    }

    /// Logs `data`, suffixed with `" - <info>"` when both are present.
    pub fn log_with_info(
        &self,
        source: &SourceInfo,
        message_id: MessageId,
        data: Option<&str>,
        info: Option<&str>,
    ) {
        let data = merge_payload(data, info);
        self.write(&LogMessage::from_parts(source.clone(), message_id, data));
    }

    pub fn instance_init(&self, source: &SourceInfo) {
        self.log(source, MessageId::InstanceInit, None);
    }

    pub fn instance_deinit(&self, source: &SourceInfo) {
        self.log(source, MessageId::InstanceDeinit, None);
    }

    pub fn log_and_report_exception(
        &self,
        source: &SourceInfo,
        error: &dyn Error,
        info: Option<&str>,
    ) {
        self.reporter.capture_error(error, info);
        let message = format!("Handled Exception: {}", display_string(error));
        self.log_with_info(source, MessageId::Error, Some(&message), info);
    }

    pub fn log_and_report_error(&self, source: &SourceInfo, error: &str, info: Option<&str>) {
        let message = format!("Handled Error: {error}");
        self.reporter.capture_message(&message, None);
        self.log_with_info(source, MessageId::Error, Some(&message), info);
    }

    pub fn log_and_report_fatal_exception(
        &self,
        source: &SourceInfo,
        error: &dyn Error,
        info: Option<&str>,
    ) {
        self.reporter.capture_error(error, info);
        let message = format!("Fatal Exception: {}", display_string(error));
        self.log_with_info(source, MessageId::Fatal, Some(&message), info);
    }

    /// Always records the separator, even without `info`.
    pub fn log_and_report_fatal_error(
        &self,
        source: &SourceInfo,
        error: &str,
        info: Option<&str>,
    ) {
        let message = format!("Fatal Error: {error}");
        self.reporter.capture_message(&message, info);
        let data = format!("{message} - {}", info.unwrap_or_default());
        self.log(source, MessageId::Fatal, Some(&data));
    }

    pub fn log_nil(&self, source: &SourceInfo, info: Option<&str>) {
        let message = format!("Unexpected nil {}", info.unwrap_or_default());
        self.log(source, MessageId::Error, Some(&message));
        self.reporter.capture_message(&message, None);
    }

    /// Runs `f`; a `None` result is logged and reported as an error.
    pub fn expect_or_log<T>(
        &self,
        source: &SourceInfo,
        f: impl FnOnce() -> Option<T>,
    ) -> Option<T> {
        let result = f();
        if result.is_none() {
            self.log_and_report_error(source, EXPECTED_VALUE, None);
        }
        result
    }

    /// Runs `f`; an error is logged and reported, and `None` returned in its place.
    pub fn try_or_log<T, E>(
        &self,
        source: &SourceInfo,
        f: impl FnOnce() -> Result<T, E>,
    ) -> Option<T>
    where
        E: Error,
    {
        self.try_or_log_inner(source, None, f)
    }

    pub fn try_or_log_with_info<T, E>(
        &self,
        source: &SourceInfo,
        info: &str,
        f: impl FnOnce() -> Result<T, E>,
    ) -> Option<T>
    where
        E: Error,
    {
        self.try_or_log_inner(source, Some(info), f)
    }

    /// Runs `f(&input)`; on error the `Debug` form of `input` is logged as context.
    pub fn try_or_log_input<I, T, E>(
        &self,
        source: &SourceInfo,
        input: I,
        f: impl FnOnce(&I) -> Result<T, E>,
    ) -> Option<T>
    where
        I: fmt::Debug,
        E: Error,
    {
        match f(&input) {
            Ok(value) => Some(value),
            Err(err) => {
                let info = format!("{input:?}");
                self.log_and_report_exception(source, &err, Some(&info));
                None
            }
        }
    }

    fn try_or_log_inner<T, E>(
        &self,
        source: &SourceInfo,
        info: Option<&str>,
        f: impl FnOnce() -> Result<T, E>,
    ) -> Option<T>
    where
        E: Error,
    {
        match f() {
            Ok(value) => Some(value),
            Err(err) => {
                self.log_and_report_exception(source, &err, info);
                None
            }
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger").finish_non_exhaustive()
    }
}

#[derive(Clone, Default)]
pub struct LoggerBuilder {
    reporter: Option<Arc<dyn CrashReporter>>,
    sink: Option<Arc<dyn LineSink>>,
}

impl LoggerBuilder {
    pub fn reporter(mut self, reporter: Arc<dyn CrashReporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    pub fn sink(mut self, sink: Arc<dyn LineSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn build(self) -> Logger {
        Logger {
            reporter: self.reporter.unwrap_or_else(|| Arc::new(NoopReporter)),
            sink: self.sink.unwrap_or_else(|| Arc::new(NullSink)),
        }
    }
}
