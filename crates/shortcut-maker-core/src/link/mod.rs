//! Shortcut (link) file creation and inspection.
//!
//! Provides the [`LinkWriter`] seam used by the install and shortcut flows:
//! - Windows `.lnk` files through the shell's `IShellLinkW` COM object
//! - freedesktop `.desktop` entries everywhere else
//!
//! # Example
//!
//! ```rust,ignore
//! use shortcut_maker_core::link::{platform_link_writer, LinkSpec, LinkWriter};
//!
//! let writer = platform_link_writer();
//! let spec = LinkSpec::builder(r"C:\Tools\notes.txt")
//!     .working_dir(r"C:\Tools")
//!     .description("Notes")
//!     .build();
//! writer.create_or_overwrite(r"C:\Users\me\Desktop\notes.lnk".as_ref(), &spec)?;
//! ```

#[cfg(not(windows))]
mod desktop_entry;
#[cfg(windows)]
mod shell_link;

#[cfg(not(windows))]
pub use desktop_entry::{DesktopEntry, DesktopEntryWriter};
#[cfg(windows)]
pub use shell_link::ShellLinkWriter;

use crate::error::Result;
use std::path::{Path, PathBuf};

/// Initial window state of whatever the link launches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShowCommand {
    /// `SW_SHOWNORMAL`
    #[default]
    Normal,
}

impl ShowCommand {
    /// The Win32 `SW_*` value stored in the link.
    pub fn as_raw(self) -> i32 {
        match self {
            ShowCommand::Normal => 1,
        }
    }
}

/// Everything written into a link file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSpec {
    /// Path the link opens.
    pub target: PathBuf,
    /// Working directory for the launched target.
    pub working_dir: Option<PathBuf>,
    /// Description (tooltip / comment).
    pub description: Option<String>,
    /// File providing the icon.
    pub icon: Option<PathBuf>,
    /// Window state on launch.
    pub show_command: ShowCommand,
}

impl LinkSpec {
    /// Create a builder for a link to `target`.
    pub fn builder(target: impl Into<PathBuf>) -> LinkSpecBuilder {
        LinkSpecBuilder::new(target)
    }
}

/// Builder for [`LinkSpec`].
#[derive(Debug, Clone)]
pub struct LinkSpecBuilder {
    spec: LinkSpec,
}

impl LinkSpecBuilder {
    pub fn new(target: impl Into<PathBuf>) -> Self {
        Self {
            spec: LinkSpec {
                target: target.into(),
                working_dir: None,
                description: None,
                icon: None,
                show_command: ShowCommand::default(),
            },
        }
    }

    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.spec.working_dir = Some(dir.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.spec.description = Some(description.into());
        self
    }

    pub fn icon(mut self, icon: impl Into<PathBuf>) -> Self {
        self.spec.icon = Some(icon.into());
        self
    }

    pub fn show_command(mut self, show_command: ShowCommand) -> Self {
        self.spec.show_command = show_command;
        self
    }

    pub fn build(self) -> LinkSpec {
        self.spec
    }
}

/// Writes and reads native shortcut files.
pub trait LinkWriter {
    /// Write a link at `path`, replacing any existing file there.
    fn create_or_overwrite(&self, path: &Path, spec: &LinkSpec) -> Result<()>;

    /// Read the target path stored in the link at `path`.
    fn read_target(&self, path: &Path) -> Result<PathBuf>;
}

impl<W: LinkWriter + ?Sized> LinkWriter for Box<W> {
    fn create_or_overwrite(&self, path: &Path, spec: &LinkSpec) -> Result<()> {
        (**self).create_or_overwrite(path, spec)
    }

    fn read_target(&self, path: &Path) -> Result<PathBuf> {
        (**self).read_target(path)
    }
}

/// The link writer native to the current platform.
pub fn platform_link_writer() -> Box<dyn LinkWriter> {
    #[cfg(windows)]
    {
        Box::new(ShellLinkWriter)
    }
    #[cfg(not(windows))]
    {
        Box::new(DesktopEntryWriter)
    }
}
