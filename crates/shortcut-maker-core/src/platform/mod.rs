//! Platform abstraction layer.
//!
//! All `#[cfg]` blocks for OS-specific folder lookup and user notification
//! live here; shell link formats live in [`crate::link`].
//!
//! - `paths` - special-folder resolution and the link file extension
//! - `notify` - modal dialogs on Windows, stderr elsewhere

pub mod notify;
pub mod paths;

pub use notify::{platform_notifier, Notice, NoticeLevel, Notifier};
pub use paths::{shortcut_extension, PathResolver, SystemPathResolver};
