//! Core module - configuration, notifications and the pure helpers the
//! intake form relies on

pub mod config;
pub mod files;
pub mod notify;
pub mod timeslots;

pub use config::Config;
pub use files::{classify, format_file_size, FileCategory};
pub use notify::{ConsoleToaster, NotificationQueue, ToastKind, ToastOptions, ToastPosition, Toaster};
