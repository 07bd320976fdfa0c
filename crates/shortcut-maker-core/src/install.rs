//! Self-install into the "send to" menu.
//!
//! Copies the running executable into the per-user programs folder and
//! points a "send to" link at the copy. Running it again with an unchanged
//! executable writes nothing.

use crate::config::LinkConfig;
use crate::error::{Result, ShortcutError};
use crate::link::{LinkSpec, LinkWriter};
use crate::platform::{shortcut_extension, PathResolver};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Result of syncing the executable into the install directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    /// The copy was missing or older and has been written.
    Copied,
    /// The existing copy is at least as new as the source.
    UpToDate,
}

/// Result of a self-install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// The "send to" link was created or repointed.
    Installed {
        installed_exe: PathBuf,
        link_path: PathBuf,
        copy: CopyOutcome,
    },
    /// The "send to" link already pointed at the installed copy.
    AlreadyInstalled {
        installed_exe: PathBuf,
        link_path: PathBuf,
        copy: CopyOutcome,
    },
}

impl InstallOutcome {
    pub fn installed_exe(&self) -> &Path {
        match self {
            InstallOutcome::Installed { installed_exe, .. }
            | InstallOutcome::AlreadyInstalled { installed_exe, .. } => installed_exe,
        }
    }

    pub fn link_path(&self) -> &Path {
        match self {
            InstallOutcome::Installed { link_path, .. }
            | InstallOutcome::AlreadyInstalled { link_path, .. } => link_path,
        }
    }

    pub fn copy(&self) -> CopyOutcome {
        match self {
            InstallOutcome::Installed { copy, .. } | InstallOutcome::AlreadyInstalled { copy, .. } => {
                *copy
            }
        }
    }
}

/// Installs the running executable and its "send to" entry.
pub struct Installer<'a, R: ?Sized, W: ?Sized> {
    resolver: &'a R,
    writer: &'a W,
}

impl<'a, R, W> Installer<'a, R, W>
where
    R: PathResolver + ?Sized,
    W: LinkWriter + ?Sized,
{
    pub fn new(resolver: &'a R, writer: &'a W) -> Self {
        Self { resolver, writer }
    }

    /// Install `source_exe` and make sure the "send to" link targets the copy.
    ///
    /// No rollback: a failure after the copy leaves the copied executable
    /// in place.
    pub fn install(&self, source_exe: &Path) -> Result<InstallOutcome> {
        let file_name = source_exe
            .file_name()
            .ok_or_else(|| ShortcutError::InvalidInput {
                message: format!(
                    "Could not determine the executable name of {}",
                    source_exe.display()
                ),
            })?;

        let install_dir = self.resolver.install_dir()?;
        fs::create_dir_all(&install_dir)
            .map_err(|e| ShortcutError::io_with_path(e, &install_dir))?;

        let installed_exe = install_dir.join(file_name);
        let copy = copy_if_newer(source_exe, &installed_exe)?;

        let send_to_dir = self.resolver.send_to_dir()?;
        fs::create_dir_all(&send_to_dir)
            .map_err(|e| ShortcutError::io_with_path(e, &send_to_dir))?;

        let link_path = send_to_link_path(&send_to_dir);

        if link_path.is_file() {
            match self.writer.read_target(&link_path) {
                Ok(target) if paths_equal_ignore_case(&target, &installed_exe) => {
                    debug!("Send-to link already targets {:?}", installed_exe);
                    return Ok(InstallOutcome::AlreadyInstalled {
                        installed_exe,
                        link_path,
                        copy,
                    });
                }
                Ok(target) => {
                    info!("Repointing send-to link from {:?} to {:?}", target, installed_exe);
                }
                Err(e) => {
                    warn!("Existing send-to link is unreadable, replacing it: {}", e);
                }
            }
        }

        let mut spec = LinkSpec::builder(&installed_exe)
            .description(LinkConfig::SEND_TO_DESCRIPTION)
            .icon(&installed_exe);
        if let Some(parent) = installed_exe.parent() {
            spec = spec.working_dir(parent);
        }

        self.writer.create_or_overwrite(&link_path, &spec.build())?;
        info!("Installed send-to link {:?}", link_path);

        Ok(InstallOutcome::Installed {
            installed_exe,
            link_path,
            copy,
        })
    }
}

/// Full path of the "send to" link inside `send_to_dir`.
pub fn send_to_link_path(send_to_dir: &Path) -> PathBuf {
    send_to_dir.join(format!(
        "{}.{}",
        LinkConfig::SEND_TO_LINK_STEM,
        shortcut_extension()
    ))
}

/// Copy `source` over `dest` when `dest` is missing or strictly older.
pub fn copy_if_newer(source: &Path, dest: &Path) -> Result<CopyOutcome> {
    if dest.is_file() {
        let source_time = fs::metadata(source)
            .and_then(|m| m.modified())
            .map_err(|e| ShortcutError::io_with_path(e, source))?;
        let dest_time = fs::metadata(dest)
            .and_then(|m| m.modified())
            .map_err(|e| ShortcutError::io_with_path(e, dest))?;

        if source_time <= dest_time {
            debug!("Installed copy {:?} is up to date", dest);
            return Ok(CopyOutcome::UpToDate);
        }
    }

    fs::copy(source, dest).map_err(|e| ShortcutError::io_with_path(e, dest))?;
    info!("Copied {:?} to {:?}", source, dest);
    Ok(CopyOutcome::Copied)
}

/// Compare two paths the way the Windows shell does: ignoring case.
pub fn paths_equal_ignore_case(a: &Path, b: &Path) -> bool {
    a.to_string_lossy().to_lowercase() == b.to_string_lossy().to_lowercase()
}
