//! Structured logging for programs that drive graph generation and the
//! spanning forest solvers.
//!
//! The entry points (`graph.generate`, `graph.load`, `msf.sequential`,
//! `msf.parallel`, `msf.run`) are `tracing` spans. [`LogSettings`] decides how
//! those spans surface: as plain or JSON lines, and whether a span reports
//! its busy and idle time when it closes, which turns each entry point into
//! a timing checkpoint.
//!
//! | Variable              | Values                    | Default |
//! |-----------------------|---------------------------|---------|
//! | `PARMSF_LOG_FORMAT`   | `human`, `json`           | `human` |
//! | `PARMSF_LOG_TIMING`   | `off`, `close`, `full`    | `close` |
//! | `RUST_LOG`            | any `EnvFilter` directive | `info`  |

use std::{env, io, sync::OnceLock};

use thiserror::Error;
use tracing::Subscriber;
use tracing_log::LogTracer;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{MakeWriter, format::FmtSpan},
    layer::SubscriberExt,
    registry::LookupSpan,
};

const LOG_FORMAT_ENV: &str = "PARMSF_LOG_FORMAT";
const LOG_TIMING_ENV: &str = "PARMSF_LOG_TIMING";

static INSTALLED: OnceLock<()> = OnceLock::new();

/// Errors raised while configuring or installing logging.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// An environment variable held a value outside its accepted set.
    #[error("`{name}` must be one of {expected}, got `{provided}`")]
    UnsupportedValue {
        /// Name of the environment variable.
        name: &'static str,
        /// Raw value supplied by the user.
        provided: String,
        /// Accepted values, for the message.
        expected: &'static str,
    },
    /// An environment variable was not valid UTF-8.
    #[error("`{name}` is not valid UTF-8")]
    InvalidUnicode {
        /// Name of the environment variable.
        name: &'static str,
    },
    /// The `RUST_LOG` directives could not be parsed.
    #[error("invalid log filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),
    /// A global subscriber was already installed by someone else.
    #[error("failed to install tracing subscriber: {0}")]
    Install(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Line encoding of log output.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum LogFormat {
    /// Plain text for terminals.
    #[default]
    Human,
    /// One JSON object per line, with the enclosing span list.
    Json,
}

/// Which span lifecycle events are logged.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SpanTiming {
    /// Spans only annotate the events inside them.
    Off,
    /// A span logs its busy and idle time when it closes.
    #[default]
    Close,
    /// A span also logs when it opens.
    Full,
}

impl SpanTiming {
    fn span_events(self) -> FmtSpan {
        match self {
            Self::Off => FmtSpan::NONE,
            Self::Close => FmtSpan::CLOSE,
            Self::Full => FmtSpan::NEW | FmtSpan::CLOSE,
        }
    }
}

/// Validated logging configuration.
///
/// # Examples
/// ```
/// use parmsf_core::logging::{LogFormat, LogSettings, SpanTiming};
///
/// let settings = LogSettings::default()
///     .with_format(LogFormat::Json)
///     .with_timing(SpanTiming::Full);
/// assert_eq!(settings.format(), LogFormat::Json);
/// assert_eq!(settings.filter(), "info");
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LogSettings {
    format: LogFormat,
    timing: SpanTiming,
    filter: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            timing: SpanTiming::default(),
            filter: "info".to_owned(),
        }
    }
}

impl LogSettings {
    /// Reads `PARMSF_LOG_FORMAT`, `PARMSF_LOG_TIMING`, and `RUST_LOG`.
    ///
    /// # Errors
    /// Returns [`LoggingError::UnsupportedValue`] or
    /// [`LoggingError::InvalidUnicode`] for malformed variables.
    pub fn from_env() -> Result<Self, LoggingError> {
        Self::default().with_env()
    }

    /// Overrides each setting whose environment variable is present.
    ///
    /// # Errors
    /// Same as [`LogSettings::from_env`].
    pub fn with_env(mut self) -> Result<Self, LoggingError> {
        if let Some(raw) = read_var(LOG_FORMAT_ENV)? {
            self.format = parse_format(&raw)?;
        }
        if let Some(raw) = read_var(LOG_TIMING_ENV)? {
            self.timing = parse_timing(&raw)?;
        }
        if let Some(raw) = read_var(EnvFilter::DEFAULT_ENV)? {
            self.filter = raw;
        }
        Ok(self)
    }

    /// Sets the line encoding.
    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets which span lifecycle events are logged.
    #[must_use]
    pub fn with_timing(mut self, timing: SpanTiming) -> Self {
        self.timing = timing;
        self
    }

    /// Sets the `EnvFilter` directives.
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    /// Returns the line encoding.
    #[must_use]
    #[rustfmt::skip]
    pub fn format(&self) -> LogFormat { self.format }

    /// Returns the span timing mode.
    #[must_use]
    #[rustfmt::skip]
    pub fn timing(&self) -> SpanTiming { self.timing }

    /// Returns the filter directives.
    #[must_use]
    #[rustfmt::skip]
    pub fn filter(&self) -> &str { &self.filter }

    /// Builds a formatting layer writing through `writer`.
    ///
    /// The layer carries its own filter, so it can be stacked on any
    /// registry, including a scoped one in tests.
    ///
    /// # Errors
    /// Returns [`LoggingError::Filter`] when the directives do not parse.
    pub fn layer<S, W>(&self, writer: W) -> Result<Box<dyn Layer<S> + Send + Sync>, LoggingError>
    where
        S: Subscriber + for<'span> LookupSpan<'span> + 'static,
        W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
    {
        let filter = EnvFilter::try_new(&self.filter)?;
        let fmt = tracing_subscriber::fmt::layer()
            .with_span_events(self.timing.span_events())
            .with_ansi(false)
            .with_writer(writer);
        let layer = match self.format {
            LogFormat::Human => fmt.with_filter(filter).boxed(),
            LogFormat::Json => fmt
                .json()
                .with_current_span(true)
                .with_span_list(true)
                .with_filter(filter)
                .boxed(),
        };
        Ok(layer)
    }

    /// Installs these settings as the global subscriber writing to `stderr`
    /// and bridges `log` records into it.
    ///
    /// # Errors
    /// Returns [`LoggingError::Filter`] for bad directives and
    /// [`LoggingError::Install`] when another global subscriber exists.
    pub fn install(&self) -> Result<(), LoggingError> {
        let layer = self.layer(io::stderr)?;
        tracing::subscriber::set_global_default(tracing_subscriber::registry().with(layer))?;
        // Best effort: another logger may already own the `log` slot.
        let _ = LogTracer::init();
        Ok(())
    }
}

/// Installs logging configured from the environment, once per process.
///
/// Later calls return `Ok(())` without touching the subscriber. A subscriber
/// installed by the host program is left in place.
///
/// # Errors
/// Returns [`LoggingError`] when an environment variable is malformed.
pub fn init_logging() -> Result<(), LoggingError> {
    if INSTALLED.get().is_some() {
        return Ok(());
    }
    match LogSettings::from_env()?.install() {
        Ok(()) | Err(LoggingError::Install(_)) => {}
        Err(err) => return Err(err),
    }
    let _ = INSTALLED.set(());
    Ok(())
}

fn read_var(name: &'static str) -> Result<Option<String>, LoggingError> {
    match env::var(name) {
        Ok(raw) => Ok(Some(raw)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(_)) => Err(LoggingError::InvalidUnicode { name }),
    }
}

fn parse_format(raw: &str) -> Result<LogFormat, LoggingError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "human" => Ok(LogFormat::Human),
        "json" => Ok(LogFormat::Json),
        _ => Err(LoggingError::UnsupportedValue {
            name: LOG_FORMAT_ENV,
            provided: raw.to_owned(),
            expected: "`human` or `json`",
        }),
    }
}

fn parse_timing(raw: &str) -> Result<SpanTiming, LoggingError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "off" => Ok(SpanTiming::Off),
        "close" => Ok(SpanTiming::Close),
        "full" => Ok(SpanTiming::Full),
        _ => Err(LoggingError::UnsupportedValue {
            name: LOG_TIMING_ENV,
            provided: raw.to_owned(),
            expected: "`off`, `close`, or `full`",
        }),
    }
}
