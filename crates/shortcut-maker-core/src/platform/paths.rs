//! Platform-specific path utilities.
//!
//! Special folders are reached through the [`PathResolver`] trait so the
//! install and shortcut flows can run against a sandbox in tests.

use crate::config::AppConfig;
use crate::error::{Result, ShortcutError};
use std::path::PathBuf;

/// Resolves the per-user folders the shortcut maker writes into.
pub trait PathResolver {
    /// Directory the executable is installed into.
    fn install_dir(&self) -> Result<PathBuf>;

    /// Directory whose entries appear in the file manager's "send to" menu.
    fn send_to_dir(&self) -> Result<PathBuf>;

    /// Directory whose entries appear in the application launcher.
    fn start_menu_programs_dir(&self) -> Result<PathBuf>;
}

/// Resolver backed by the OS special-folder APIs (`dirs`, plus the shell's
/// known folders on Windows).
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemPathResolver;

impl PathResolver for SystemPathResolver {
    /// # Platform Behavior
    /// - **Windows**: `%LOCALAPPDATA%/Programs/Start Menu Programs Shortcut Maker`
    /// - **Linux**: `~/.local/share/Programs/Start Menu Programs Shortcut Maker`
    fn install_dir(&self) -> Result<PathBuf> {
        let local_app_data =
            dirs::data_local_dir().ok_or_else(|| ShortcutError::missing_folder("LocalAppData"))?;
        Ok(local_app_data
            .join(AppConfig::PROGRAMS_DIR_NAME)
            .join(AppConfig::APP_NAME))
    }

    /// # Platform Behavior
    /// - **Windows**: the `SendTo` known folder
    /// - **Other**: `~/.local/share/applications`, where entries show up
    ///   under "Open With"
    fn send_to_dir(&self) -> Result<PathBuf> {
        #[cfg(windows)]
        let dir = known_folder::lookup(&known_folder::FOLDERID_SendTo);

        #[cfg(not(windows))]
        let dir = applications_dir();

        dir.ok_or_else(|| ShortcutError::missing_folder("'SendTo'"))
    }

    /// # Platform Behavior
    /// - **Windows**: the `Programs` known folder (Start Menu/Programs)
    /// - **Other**: `~/.local/share/applications` (XDG spec)
    fn start_menu_programs_dir(&self) -> Result<PathBuf> {
        #[cfg(windows)]
        let dir = known_folder::lookup(&known_folder::FOLDERID_Programs);

        #[cfg(not(windows))]
        let dir = applications_dir();

        dir.ok_or_else(|| ShortcutError::missing_folder("Start Menu"))
    }
}

#[cfg(not(windows))]
fn applications_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|data| data.join("applications"))
}

#[cfg(windows)]
#[allow(unsafe_code)]
mod known_folder {
    use std::ffi::OsString;
    use std::os::windows::ffi::OsStringExt;
    use std::path::PathBuf;
    use tracing::warn;
    use windows_sys::core::{GUID, PWSTR};
    use windows_sys::Win32::System::Com::CoTaskMemFree;
    use windows_sys::Win32::UI::Shell::{SHGetKnownFolderPath, KF_FLAG_DEFAULT};

    pub use windows_sys::Win32::UI::Shell::{FOLDERID_Programs, FOLDERID_SendTo};

    /// Current location of a known folder, following any redirection.
    pub fn lookup(id: &GUID) -> Option<PathBuf> {
        let mut raw: PWSTR = std::ptr::null_mut();
        // SAFETY: `id` outlives the call; a null token selects the current user.
        let hr = unsafe { SHGetKnownFolderPath(id, KF_FLAG_DEFAULT as _, std::ptr::null_mut(), &mut raw) };

        let path = if hr >= 0 && !raw.is_null() {
            // SAFETY: on success `raw` is a NUL-terminated UTF-16 string.
            let wide = unsafe {
                let len = (0..).take_while(|&i| *raw.add(i) != 0).count();
                std::slice::from_raw_parts(raw, len)
            };
            Some(PathBuf::from(OsString::from_wide(wide)))
        } else {
            warn!("SHGetKnownFolderPath failed (0x{:08X})", hr as u32);
            None
        };

        // SAFETY: the buffer belongs to us whether or not the call succeeded;
        // CoTaskMemFree accepts null.
        unsafe { CoTaskMemFree(raw as *const _) };

        path
    }
}

/// Get the file extension for shortcuts on the current platform.
///
/// # Platform Behavior
/// - **Windows**: `lnk` (Windows shortcut files)
/// - **Other**: `desktop` (freedesktop .desktop files)
pub fn shortcut_extension() -> &'static str {
    #[cfg(windows)]
    {
        "lnk"
    }
    #[cfg(not(windows))]
    {
        "desktop"
    }
}
