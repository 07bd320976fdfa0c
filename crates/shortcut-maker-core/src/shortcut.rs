//! Start Menu Programs shortcut creation.

use crate::config::LinkConfig;
use crate::error::{Result, ShortcutError};
use crate::link::{LinkSpec, LinkWriter, ShowCommand};
use crate::platform::{shortcut_extension, PathResolver};
use std::ffi::OsStr;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::info;

/// Creates one Programs-folder shortcut per target.
pub struct ShortcutCreator<'a, R: ?Sized, W: ?Sized> {
    resolver: &'a R,
    writer: &'a W,
}

impl<'a, R, W> ShortcutCreator<'a, R, W>
where
    R: PathResolver + ?Sized,
    W: LinkWriter + ?Sized,
{
    pub fn new(resolver: &'a R, writer: &'a W) -> Self {
        Self { resolver, writer }
    }

    /// Create a shortcut for `input` and return the link path.
    ///
    /// Existing links are never overwritten; a free ` (n)` suffix is picked
    /// instead.
    pub fn create(&self, input: &OsStr) -> Result<PathBuf> {
        let target = resolve_target(input)?;

        let programs_dir = self.resolver.start_menu_programs_dir()?;
        fs::create_dir_all(&programs_dir)
            .map_err(|e| ShortcutError::io_with_path(e, &programs_dir))?;

        let name = shortcut_base_name(&target);
        let link_path = unique_link_path(&programs_dir, &name, shortcut_extension());

        let mut spec = LinkSpec::builder(&target)
            .show_command(ShowCommand::Normal)
            .description(LinkConfig::PROGRAMS_DESCRIPTION)
            .icon(&target);
        if let Some(parent) = target.parent() {
            spec = spec.working_dir(parent);
        }

        self.writer.create_or_overwrite(&link_path, &spec.build())?;
        info!("Created shortcut {:?} -> {:?}", link_path, target);

        Ok(link_path)
    }
}

/// Validate a raw input and turn it into an absolute, existing path.
pub fn resolve_target(input: &OsStr) -> Result<PathBuf> {
    if input.to_string_lossy().trim().is_empty() {
        return Err(ShortcutError::InvalidInput {
            message: "Target path is empty.".to_string(),
        });
    }

    let absolute = std::path::absolute(input).map_err(|e| ShortcutError::io_with_path(e, input))?;
    let target = fold_dot_components(&absolute);

    if !target.exists() {
        return Err(ShortcutError::NotFound(target));
    }

    Ok(target)
}

/// Remove `.` and `..` components from an absolute path without touching
/// the filesystem. `..` at the root stays at the root.
fn fold_dot_components(path: &Path) -> PathBuf {
    let mut folded = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(folded.components().next_back(), Some(Component::Normal(_))) {
                    folded.pop();
                }
            }
            other => folded.push(other),
        }
    }
    folded
}

/// Shortcut name for `target`: its file name minus the last extension.
///
/// Falls back to [`LinkConfig::FALLBACK_NAME`] when nothing usable is left
/// (no file name, or a name like `.profile`).
pub fn shortcut_base_name(target: &Path) -> String {
    let file_name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let stem = match file_name.rfind('.') {
        Some(dot) => &file_name[..dot],
        None => file_name.as_str(),
    };

    if stem.trim().is_empty() {
        LinkConfig::FALLBACK_NAME.to_string()
    } else {
        stem.to_string()
    }
}

/// First `name.ext`, `name (1).ext`, `name (2).ext`, … not present in `dir`.
pub fn unique_link_path(dir: &Path, name: &str, extension: &str) -> PathBuf {
    let mut candidate = dir.join(format!("{}.{}", name, extension));
    let mut counter = 1u32;
    while candidate.exists() {
        candidate = dir.join(format!("{} ({}).{}", name, counter, extension));
        counter += 1;
    }
    candidate
}
