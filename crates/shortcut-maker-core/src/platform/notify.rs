//! User-facing notifications.
//!
//! # Platform Behavior
//! - **Windows**: modal `MessageBoxW` dialogs
//! - **Other**: one block of text per notice on stderr

use crate::config::MessageConfig;

/// Severity of a notice, which picks the dialog icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            title: title.into(),
            message: message.into(),
        }
    }

    /// An error notice with the standard "Error" title.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: MessageConfig::ERROR_TITLE.to_string(),
            message: message.into(),
        }
    }
}

/// Something that can put a notice in front of the user.
pub trait Notifier {
    fn notify(&self, notice: &Notice);
}

/// Prints notices to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: &Notice) {
        eprintln!("[{}] {}", notice.title, notice.message);
    }
}

#[cfg(windows)]
pub use message_box::MessageBoxNotifier;

#[cfg(windows)]
#[allow(unsafe_code)]
mod message_box {
    use super::{Notice, NoticeLevel, Notifier};
    use std::ffi::OsStr;
    use std::os::windows::ffi::OsStrExt;
    use windows_sys::Win32::UI::WindowsAndMessaging::{
        MessageBoxW, MB_ICONERROR, MB_ICONINFORMATION, MB_OK,
    };

    /// Shows each notice as a modal message box.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct MessageBoxNotifier;

    impl Notifier for MessageBoxNotifier {
        fn notify(&self, notice: &Notice) {
            let text = to_wide(&notice.message);
            let caption = to_wide(&notice.title);
            let icon = match notice.level {
                NoticeLevel::Info => MB_ICONINFORMATION,
                NoticeLevel::Error => MB_ICONERROR,
            };

            // SAFETY: both buffers are NUL-terminated UTF-16 and outlive the
            // call; a null owner window is allowed.
            unsafe {
                MessageBoxW(
                    std::ptr::null_mut(),
                    text.as_ptr(),
                    caption.as_ptr(),
                    MB_OK | icon,
                );
            }
        }
    }

    fn to_wide(s: &str) -> Vec<u16> {
        OsStr::new(s)
            .encode_wide()
            .map(|c| if c == 0 { u16::from(b' ') } else { c })
            .chain(std::iter::once(0))
            .collect()
    }
}

/// The notifier native to the current platform.
pub fn platform_notifier() -> Box<dyn Notifier> {
    #[cfg(windows)]
    {
        Box::new(MessageBoxNotifier)
    }
    #[cfg(not(windows))]
    {
        Box::new(ConsoleNotifier)
    }
}

impl<N: Notifier + ?Sized> Notifier for Box<N> {
    fn notify(&self, notice: &Notice) {
        (**self).notify(notice)
    }
}
