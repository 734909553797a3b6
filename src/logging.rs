//! Logging setup
//!
//! A console subscriber is installed globally at startup. Each crawl target
//! then gets its own [`TargetLogger`]: a dispatcher writing to the console and
//! to `<logs_dir>/crawl_<filename>.log`. The logger is passed explicitly to
//! [`Coordinator::execute`](crate::crawler::Coordinator::execute), which routes
//! every event of that target's run to it.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;
use tracing::Dispatch;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Errors raised while setting up logging
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Failed to open log file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to install subscriber: {0}")]
    Install(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Returns the console filter directives for a verbosity level
pub fn console_directives(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        // Only show errors
        return "error";
    }

    match verbose {
        0 => "sumi_scribe=info,warn",
        1 => "sumi_scribe=debug,info",
        2 => "sumi_scribe=trace,debug",
        _ => "trace",
    }
}

/// Installs the global console subscriber
pub fn init_console(directives: &str) -> Result<(), LoggingError> {
    let subscriber = fmt()
        .with_env_filter(EnvFilter::new(directives))
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Logger for a single crawl target
pub struct TargetLogger {
    dispatch: Dispatch,
    path: PathBuf,
}

impl TargetLogger {
    /// Opens (appending) `<logs_dir>/crawl_<filename>.log`
    ///
    /// The file receives every event at INFO and above, without colours; the
    /// console receives what `console_directives` lets through.
    pub fn create(
        logs_dir: impl AsRef<Path>,
        filename: &str,
        console_directives: &str,
    ) -> Result<Self, LoggingError> {
        let logs_dir = logs_dir.as_ref();
        std::fs::create_dir_all(logs_dir).map_err(|source| LoggingError::Io {
            path: logs_dir.to_path_buf(),
            source,
        })?;

        let path = logs_dir.join(format!("crawl_{}.log", filename));
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| LoggingError::Io {
                path: path.clone(),
                source,
            })?;

        let file_layer = fmt::layer()
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_target(false)
            .with_filter(LevelFilter::INFO);

        let console_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_filter(EnvFilter::new(console_directives));

        let subscriber = tracing_subscriber::registry()
            .with(console_layer)
            .with(file_layer);

        Ok(Self {
            dispatch: Dispatch::new(subscriber),
            path,
        })
    }

    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    /// Path of the log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Runs `f` with this logger as the current dispatcher
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }
}
