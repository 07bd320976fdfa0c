//! Centralized configuration for the shortcut maker.
//!
//! There is no configuration file; the product strings, folder names and
//! dialog texts are fixed and live here.

/// Application-level configuration.
pub struct AppConfig;

impl AppConfig {
    pub const APP_NAME: &'static str = "Start Menu Programs Shortcut Maker";
    /// Folder under the local app data directory that holds per-user programs.
    pub const PROGRAMS_DIR_NAME: &'static str = "Programs";
    /// Default log filter when `RUST_LOG` is unset.
    pub const DEFAULT_LOG_FILTER: &'static str = "warn";
}

/// Shortcut naming and metadata.
pub struct LinkConfig;

impl LinkConfig {
    /// File stem of the entry placed in the "send to" folder.
    pub const SEND_TO_LINK_STEM: &'static str = "Start Menu - Programs (create shortcut)";
    pub const SEND_TO_DESCRIPTION: &'static str =
        "Create a shortcut in Start Menu → Programs for the selected file.";
    pub const PROGRAMS_DESCRIPTION: &'static str =
        "Shortcut created via Send To → Start Menu/Programs";
    /// Name used when a target has no usable base name.
    pub const FALLBACK_NAME: &'static str = "Shortcut";
}

/// Dialog titles and texts.
pub struct MessageConfig;

impl MessageConfig {
    pub const INSTALLED_TITLE: &'static str = "Installed";
    pub const ALREADY_INSTALLED_TITLE: &'static str = "Already installed";
    pub const ERROR_TITLE: &'static str = "Error";

    pub const INSTALLED: &'static str =
        "The 'Send to → Start Menu - Programs (create shortcut)' entry has been installed successfully.\n\n\
         You can now delete this installer if you wish.";
    pub const ALREADY_INSTALLED: &'static str =
        "The 'Send to → Start Menu - Programs (create shortcut)' entry is already installed.";

    /// Text for a failed self-install.
    pub fn install_failed(reason: &str) -> String {
        format!("Failed to install into 'Send to' menu:\n\n{}", reason)
    }

    /// Text for a batch input that could not be processed.
    pub fn item_failed(input: &str, reason: &str) -> String {
        format!("Error processing '{}':\n\n{}", input, reason)
    }
}
