//! Desktop entry (.desktop file) links.
//!
//! Implements the parts of the XDG Desktop Entry Specification needed to
//! stand in for a shell link: a launcher that opens a target path.

use std::fmt::Write as FmtWrite;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::{LinkSpec, LinkWriter};
use crate::error::{Result, ShortcutError};
use tracing::debug;

/// Key holding the raw target path, read back by [`DesktopEntryWriter::read_target`].
const TARGET_KEY: &str = "X-Shortcut-Target";

/// Mime types that make an executable entry show up under "Open With".
const OPEN_WITH_MIME_TYPES: [&str; 2] = ["application/octet-stream", "inode/directory"];

/// A desktop entry representation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DesktopEntry {
    /// Entry name (shown in menus).
    pub name: String,
    /// Comment/description.
    pub comment: Option<String>,
    /// Executable command line.
    pub exec: String,
    /// Working directory.
    pub path: Option<String>,
    /// Icon name or path.
    pub icon: Option<String>,
    /// Mime types the entry accepts.
    pub mime_types: Vec<String>,
    /// Target the entry opens.
    pub target: String,
}

impl DesktopEntry {
    /// Build the entry that stands in for a link named `name`.
    ///
    /// Executable targets are launched directly and receive the selected
    /// files; anything else is opened with `xdg-open`.
    pub fn from_spec(name: &str, spec: &LinkSpec) -> Self {
        let target = spec.target.to_string_lossy().into_owned();
        let launches_target = is_executable_file(&spec.target);

        let (exec, mime_types) = if launches_target {
            (
                format!("{} %F", quote_exec_arg(&target)),
                OPEN_WITH_MIME_TYPES.iter().map(|m| m.to_string()).collect(),
            )
        } else {
            (format!("xdg-open {}", quote_exec_arg(&target)), Vec::new())
        };

        Self {
            name: name.to_string(),
            comment: spec.description.clone(),
            exec,
            path: spec
                .working_dir
                .as_ref()
                .map(|p| p.to_string_lossy().into_owned()),
            icon: spec.icon.as_ref().map(|p| p.to_string_lossy().into_owned()),
            mime_types,
            target,
        }
    }

    /// Generate the .desktop file content.
    pub fn to_string(&self) -> String {
        let mut content = String::new();

        // Writing into a String cannot fail.
        let _ = writeln!(content, "[Desktop Entry]");
        let _ = writeln!(content, "Type=Application");
        let _ = writeln!(content, "Name={}", escape_value(&self.name));

        if let Some(ref comment) = self.comment {
            let _ = writeln!(content, "Comment={}", escape_value(comment));
        }

        let _ = writeln!(content, "Exec={}", escape_value(&self.exec));

        if let Some(ref path) = self.path {
            let _ = writeln!(content, "Path={}", escape_value(path));
        }

        if let Some(ref icon) = self.icon {
            let _ = writeln!(content, "Icon={}", escape_value(icon));
        }

        let _ = writeln!(content, "Terminal=false");

        if !self.mime_types.is_empty() {
            let _ = writeln!(content, "MimeType={};", self.mime_types.join(";"));
        }

        let _ = writeln!(content, "{}={}", TARGET_KEY, escape_value(&self.target));

        content
    }

    /// Read the target recorded in desktop file content.
    pub fn parse_target(content: &str) -> Option<String> {
        let mut in_main_group = false;
        for line in content.lines() {
            let line = line.trim();
            if line.starts_with('[') {
                in_main_group = line == "[Desktop Entry]";
                continue;
            }
            if !in_main_group {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                if key.trim() == TARGET_KEY {
                    return Some(unescape_value(value.trim_start()));
                }
            }
        }
        None
    }

    /// Write the desktop entry to a file, replacing any existing one.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = self.to_string();
        let mut file = fs::File::create(path).map_err(|e| ShortcutError::Io {
            message: "create desktop file".to_string(),
            path: Some(path.to_path_buf()),
            source: Some(e),
        })?;

        file.write_all(content.as_bytes())
            .map_err(|e| ShortcutError::Io {
                message: "write desktop file".to_string(),
                path: Some(path.to_path_buf()),
                source: Some(e),
            })?;

        // Launchers must be executable to be trusted by file managers
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o755)).map_err(|e| {
                ShortcutError::Io {
                    message: "set permissions".to_string(),
                    path: Some(path.to_path_buf()),
                    source: Some(e),
                }
            })?;
        }

        debug!("Wrote desktop entry to {:?}", path);

        Ok(())
    }
}

/// [`LinkWriter`] producing freedesktop `.desktop` entries.
#[derive(Debug, Default, Clone, Copy)]
pub struct DesktopEntryWriter;

impl LinkWriter for DesktopEntryWriter {
    fn create_or_overwrite(&self, path: &Path, spec: &LinkSpec) -> Result<()> {
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        DesktopEntry::from_spec(&name, spec).write_to_file(path)
    }

    fn read_target(&self, path: &Path) -> Result<PathBuf> {
        let content =
            fs::read_to_string(path).map_err(|e| ShortcutError::io_with_path(e, path))?;
        DesktopEntry::parse_target(&content)
            .map(PathBuf::from)
            .ok_or_else(|| ShortcutError::Link {
                message: "Desktop entry has no shortcut target".to_string(),
                path: path.to_path_buf(),
            })
    }
}

fn is_executable_file(path: &Path) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::metadata(path)
            .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
            .unwrap_or(false)
    }
    #[cfg(not(unix))]
    {
        let _ = path;
        false
    }
}

/// Quote one Exec argument.
///
/// Inside double quotes, `"`, `` ` ``, `$` and `\` must be backslash-escaped.
fn quote_exec_arg(arg: &str) -> String {
    let mut quoted = String::with_capacity(arg.len() + 2);
    quoted.push('"');
    for c in arg.chars() {
        match c {
            '"' | '`' | '$' | '\\' => {
                quoted.push('\\');
                quoted.push(c);
            }
            // A bare `%` would start a field code.
            '%' => quoted.push_str("%%"),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

/// Escape a string value (`\s`, `\n`, `\t`, `\r`, `\\`).
fn escape_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for (i, c) in value.chars().enumerate() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\t' => escaped.push_str("\\t"),
            '\r' => escaped.push_str("\\r"),
            ' ' if i == 0 => escaped.push_str("\\s"),
            c => escaped.push(c),
        }
    }
    escaped
}

fn unescape_value(value: &str) -> String {
    let mut unescaped = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            unescaped.push(c);
            continue;
        }
        match chars.next() {
            Some('s') => unescaped.push(' '),
            Some('n') => unescaped.push('\n'),
            Some('t') => unescaped.push('\t'),
            Some('r') => unescaped.push('\r'),
            Some('\\') => unescaped.push('\\'),
            Some(other) => {
                unescaped.push('\\');
                unescaped.push(other);
            }
            None => unescaped.push('\\'),
        }
    }
    unescaped
}
