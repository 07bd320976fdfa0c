//! Shortcut Maker Core - send-to installer and Start Menu shortcut creation.
//!
//! Run without targets, the program installs itself into the file manager's
//! "send to" menu. Run with targets (as the "send to" entry does), it adds a
//! Start Menu Programs shortcut for each one.
//!
//! OS interaction goes through three seams so the flows can be exercised
//! against a sandbox:
//! - [`PathResolver`] - special-folder lookup
//! - [`LinkWriter`] - native shortcut files
//! - [`Notifier`] - user-facing messages
//!
//! # Example
//!
//! ```rust,ignore
//! use shortcut_maker_core::{platform_link_writer, platform_notifier, App, SystemPathResolver};
//!
//! let app = App::new(
//!     SystemPathResolver,
//!     platform_link_writer(),
//!     platform_notifier(),
//!     std::env::current_exe()?,
//! );
//! app.run(&std::env::args_os().skip(1).collect::<Vec<_>>());
//! ```
//!
//! # Known limitations
//!
//! Concurrent invocations are not coordinated: two simultaneous
//! self-installs race on the executable copy (last writer wins), and two
//! batches may pick the same disambiguated link name.

pub mod app;
pub mod config;
pub mod error;
pub mod install;
pub mod link;
pub mod platform;
pub mod shortcut;

pub use app::{App, BatchEntry, BatchReport, RunOutcome};
pub use config::{AppConfig, LinkConfig, MessageConfig};
pub use error::{Result, ShortcutError};
pub use install::{CopyOutcome, InstallOutcome, Installer};
pub use link::{platform_link_writer, LinkSpec, LinkWriter, ShowCommand};
pub use platform::{
    platform_notifier, Notice, NoticeLevel, Notifier, PathResolver, SystemPathResolver,
};
pub use shortcut::ShortcutCreator;
