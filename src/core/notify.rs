//! Single-slot notification queue over an external toast display
//!
//! A [`NotificationQueue`] is owned by one session (one wizard run, one UI
//! window). It remembers the handle of the last message it displayed and
//! clears it before showing the next one, so at most one message is ever
//! visible. Duration and position come from [`ToastOptions`] and are fixed
//! for the lifetime of the queue.

use console::{measure_text_width, style, Term};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use std::str::FromStr;
use std::time::{Duration, Instant};

/// Default display duration in milliseconds
pub const DEFAULT_TOAST_DURATION_MS: u64 = 4000;

/// Kind of message being shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    #[default]
    Success,
    Error,
}

/// Screen corner or edge where messages appear
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToastPosition {
    #[default]
    TopRight,
    Top,
    TopLeft,
    BottomRight,
    Bottom,
    BottomLeft,
}

impl ToastPosition {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToastPosition::TopRight => "top-right",
            ToastPosition::Top => "top",
            ToastPosition::TopLeft => "top-left",
            ToastPosition::BottomRight => "bottom-right",
            ToastPosition::Bottom => "bottom",
            ToastPosition::BottomLeft => "bottom-left",
        }
    }
}

impl fmt::Display for ToastPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToastPosition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "top-right" => Ok(ToastPosition::TopRight),
            "top" => Ok(ToastPosition::Top),
            "top-left" => Ok(ToastPosition::TopLeft),
            "bottom-right" => Ok(ToastPosition::BottomRight),
            "bottom" => Ok(ToastPosition::Bottom),
            "bottom-left" => Ok(ToastPosition::BottomLeft),
            _ => Err(format!("Unknown toast position: {}", s)),
        }
    }
}

/// Process-wide display settings for every message of a queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToastOptions {
    pub duration: Duration,
    pub position: ToastPosition,
}

impl Default for ToastOptions {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(DEFAULT_TOAST_DURATION_MS),
            position: ToastPosition::default(),
        }
    }
}

/// External display service the queue drives
pub trait Toaster {
    /// Handle identifying a displayed message
    type Handle;

    /// Display a message and return its handle
    fn display(
        &mut self,
        message: &str,
        kind: ToastKind,
        options: &ToastOptions,
    ) -> io::Result<Self::Handle>;

    /// Remove every message currently on screen
    fn clear(&mut self) -> io::Result<()>;
}

/// At-most-one-visible-message gate
pub struct NotificationQueue<T: Toaster> {
    toaster: T,
    options: ToastOptions,
    active: Option<T::Handle>,
}

impl<T: Toaster> NotificationQueue<T> {
    pub fn new(toaster: T, options: ToastOptions) -> Self {
        Self {
            toaster,
            options,
            active: None,
        }
    }

    /// Show a message, clearing the previous one first
    pub fn show(&mut self, message: &str, kind: ToastKind) -> io::Result<()> {
        if self.active.take().is_some() {
            self.toaster.clear()?;
        }
        self.active = Some(self.toaster.display(message, kind, &self.options)?);
        Ok(())
    }

    /// Show a success message
    pub fn success(&mut self, message: &str) -> io::Result<()> {
        self.show(message, ToastKind::Success)
    }

    /// Show an error message
    pub fn error(&mut self, message: &str) -> io::Result<()> {
        self.show(message, ToastKind::Error)
    }

    /// Handle of the message currently shown, if any
    pub fn active(&self) -> Option<&T::Handle> {
        self.active.as_ref()
    }

    pub fn options(&self) -> &ToastOptions {
        &self.options
    }

    pub fn toaster(&self) -> &T {
        &self.toaster
    }

    pub fn toaster_mut(&mut self) -> &mut T {
        &mut self.toaster
    }
}

/// Toaster printing one styled line per message on stderr
///
/// Clearing erases the rows written by the last message, so the terminal
/// shows at most one notification at the bottom of the wizard output. A
/// message older than its display duration is erased at the next
/// [`settle`](ConsoleToaster::settle).
pub struct ConsoleToaster {
    term: Term,
    last_rows: usize,
    shown: u64,
    shown_at: Option<Instant>,
    duration: Duration,
}

impl ConsoleToaster {
    pub fn stderr() -> Self {
        Self {
            term: Term::stderr(),
            last_rows: 0,
            shown: 0,
            shown_at: None,
            duration: Duration::from_millis(DEFAULT_TOAST_DURATION_MS),
        }
    }

    /// Whether the current message has been up for its whole duration at `now`
    pub fn expired_at(&self, now: Instant) -> bool {
        self.shown_at
            .is_some_and(|at| now.saturating_duration_since(at) >= self.duration)
    }

    /// Fix the current message in place before other output follows
    ///
    /// An expired message is erased first; otherwise it stays on screen and
    /// the next message is printed below instead of replacing the lines above
    /// it. Returns whether the message had expired.
    pub fn settle(&mut self) -> io::Result<bool> {
        let expired = self.expired_at(Instant::now());
        if expired {
            self.clear()?;
        }
        self.last_rows = 0;
        self.shown_at = None;
        Ok(expired)
    }
}

impl Toaster for ConsoleToaster {
    type Handle = u64;

    fn display(&mut self, message: &str, kind: ToastKind, options: &ToastOptions) -> io::Result<u64> {
        let line = match kind {
            ToastKind::Success => format!("{} {}", style("✓").green(), message),
            ToastKind::Error => format!("{} {}", style("✗").red(), style(message).red()),
        };
        self.term.write_line(&line)?;
        self.last_rows = wrapped_rows(&line, usize::from(self.term.size().1));
        self.shown_at = Some(Instant::now());
        self.duration = options.duration;
        self.shown += 1;
        Ok(self.shown)
    }

    fn clear(&mut self) -> io::Result<()> {
        if self.term.is_term() && self.last_rows > 0 {
            self.term.clear_last_lines(self.last_rows)?;
        }
        self.last_rows = 0;
        self.shown_at = None;
        Ok(())
    }
}

/// Terminal rows `text` takes up once wrapped at `columns`
fn wrapped_rows(text: &str, columns: usize) -> usize {
    let columns = columns.max(1);
    text.lines()
        .map(|line| measure_text_width(line).div_ceil(columns).max(1))
        .sum::<usize>()
        .max(1)
}
