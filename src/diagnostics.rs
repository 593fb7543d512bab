//! Diagnostics sink.
//!
//! ## Purpose
//!
//! The sink is the one place warnings leave the library as text. It owns the
//! output target, the warning cap, and the scoped redirection of that target.
//!
//! ## Output
//!
//! Each warning is written as its rendered [`Diagnostic`] followed by a blank
//! line. Errors are not written; they are returned as
//! [`MorphologyError`](crate::MorphologyError) and only logged through
//! `tracing`.
//!
//! ## Redirection
//!
//! | Call | Effect |
//! |------|--------|
//! | `sink.redirect(writer)` | Swap in `writer`, return a guard |
//! | guard dropped | Its own redirection removed, even on early return |
//!
//! Redirections form a stack over the base target. The current target is the
//! newest live redirection, or the base when none is live. Dropping a guard
//! removes only its own frame, so guards may be dropped in any order.

use parking_lot::Mutex;
use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::types::{Diagnostic, Locus};

/// Sentinel for "no warning cap".
const UNLIMITED: usize = usize::MAX;

/// Base target plus live redirections, newest last.
#[derive(Debug)]
struct Targets {
    base: OutputTarget,
    redirects: Vec<(u64, OutputTarget)>,
    next_id: u64,
}

impl Targets {
    fn current(&mut self) -> &mut OutputTarget {
        match self.redirects.last_mut() {
            Some((_, target)) => target,
            None => &mut self.base,
        }
    }
}

/// Where the sink writes warnings.
pub enum OutputTarget {
    /// Standard error.
    Stderr,
    /// Drop everything.
    Discard,
    /// Any writer.
    Writer(Box<dyn Write + Send>),
}

impl OutputTarget {
    fn write_diagnostic(&mut self, diagnostic: &Diagnostic) -> io::Result<()> {
        match self {
            Self::Stderr => writeln!(io::stderr().lock(), "{}\n", diagnostic),
            Self::Discard => Ok(()),
            Self::Writer(w) => {
                writeln!(w, "{}\n", diagnostic)?;
                w.flush()
            }
        }
    }
}

impl std::fmt::Debug for OutputTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stderr => write!(f, "Stderr"),
            Self::Discard => write!(f, "Discard"),
            Self::Writer(_) => write!(f, "Writer(..)"),
        }
    }
}

/// Collects and emits diagnostics for morphology construction.
///
/// Share it as `Arc<DiagnosticSink>` between readers. The warning cap applies
/// per construction: once a construction has written `max_warnings`
/// warnings, its further warnings are recorded on the morphology but not
/// written.
#[derive(Debug)]
pub struct DiagnosticSink {
    max_warnings: AtomicUsize,
    targets: Mutex<Targets>,
}

impl DiagnosticSink {
    /// Create a sink writing to stderr with no warning cap.
    pub fn new() -> Self {
        Self::with_target(OutputTarget::Stderr)
    }

    /// Create a sink that writes nothing.
    pub fn silent() -> Self {
        Self::with_target(OutputTarget::Discard)
    }

    /// Create a sink writing to `writer`.
    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self::with_target(OutputTarget::Writer(Box::new(writer)))
    }

    /// Create a sink with an explicit target.
    pub fn with_target(target: OutputTarget) -> Self {
        Self {
            max_warnings: AtomicUsize::new(UNLIMITED),
            targets: Mutex::new(Targets {
                base: target,
                redirects: Vec::new(),
                next_id: 0,
            }),
        }
    }

    /// Set the warning cap, builder style.
    pub fn with_max_warnings(self, max_warnings: Option<usize>) -> Self {
        self.set_max_warnings(max_warnings);
        self
    }

    /// Set the warning cap. `None` removes it, `Some(0)` silences warnings.
    pub fn set_max_warnings(&self, max_warnings: Option<usize>) {
        self.max_warnings
            .store(max_warnings.unwrap_or(UNLIMITED), Ordering::Relaxed);
    }

    /// Current warning cap.
    pub fn max_warnings(&self) -> Option<usize> {
        match self.max_warnings.load(Ordering::Relaxed) {
            UNLIMITED => None,
            n => Some(n),
        }
    }

    /// Redirect output to `writer` until the returned guard is dropped.
    pub fn redirect<W: Write + Send + 'static>(&self, writer: W) -> RedirectGuard<'_> {
        self.redirect_to(OutputTarget::Writer(Box::new(writer)))
    }

    /// Redirect output to `target` until the returned guard is dropped.
    pub fn redirect_to(&self, target: OutputTarget) -> RedirectGuard<'_> {
        let mut targets = self.targets.lock();
        let id = targets.next_id;
        targets.next_id += 1;
        targets.redirects.push((id, target));
        RedirectGuard { sink: self, id }
    }

    /// Write one diagnostic to the current target.
    pub fn emit(&self, diagnostic: &Diagnostic) {
        if let Err(e) = self.targets.lock().current().write_diagnostic(diagnostic) {
            tracing::debug!(error = %e, "Failed to write diagnostic");
        }
    }

    /// Start reporting for one construction.
    pub(crate) fn reporter<'a>(&'a self, source: &'a str) -> Reporter<'a> {
        Reporter {
            sink: self,
            source,
            written: 0,
            warnings: Vec::new(),
        }
    }
}

impl Default for DiagnosticSink {
    fn default() -> Self {
        Self::new()
    }
}

/// Removes its own redirection when dropped.
#[must_use = "the redirection ends when the guard is dropped"]
pub struct RedirectGuard<'a> {
    sink: &'a DiagnosticSink,
    id: u64,
}

impl Drop for RedirectGuard<'_> {
    fn drop(&mut self) {
        self.sink
            .targets
            .lock()
            .redirects
            .retain(|(id, _)| *id != self.id);
    }
}

/// Cloneable in-memory writer for capturing sink output.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }

    /// Drop everything written so far.
    pub fn clear(&self) {
        self.0.lock().clear();
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Per-construction view of a sink.
///
/// Counts written warnings against the cap and keeps every warning for the
/// finished morphology.
pub(crate) struct Reporter<'a> {
    sink: &'a DiagnosticSink,
    source: &'a str,
    written: usize,
    warnings: Vec<Diagnostic>,
}

impl Reporter<'_> {
    /// Locus of `line` in the current source.
    pub(crate) fn locus(&self, line: usize) -> Locus {
        Locus::new(self.source, line)
    }

    /// `<source>:<line>:<severity>` link for embedding in messages.
    pub(crate) fn link(&self, line: usize, severity: crate::types::Severity) -> String {
        self.locus(line).link(severity)
    }

    /// Record a warning and write it unless the cap is reached.
    pub(crate) fn warn(&mut self, line: usize, message: impl Into<String>) {
        let diagnostic = Diagnostic::warning(self.locus(line), message);
        tracing::warn!(
            source = %self.source,
            line = line,
            "{}",
            diagnostic.message.lines().next().unwrap_or_default()
        );

        let cap = self.sink.max_warnings().unwrap_or(usize::MAX);
        if self.written < cap {
            self.sink.emit(&diagnostic);
            self.written += 1;
        }
        self.warnings.push(diagnostic);
    }

    /// Build an error diagnostic at `line` and log it.
    pub(crate) fn error(&self, line: usize, message: impl Into<String>) -> Diagnostic {
        let diagnostic = Diagnostic::error(self.locus(line), message);
        tracing::error!(
            source = %self.source,
            line = line,
            "{}",
            diagnostic.message.lines().next().unwrap_or_default()
        );
        diagnostic
    }

    /// Warnings recorded so far.
    #[cfg(test)]
    pub(crate) fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    /// Finish reporting and hand back every warning.
    pub(crate) fn into_warnings(self) -> Vec<Diagnostic> {
        self.warnings
    }
}
