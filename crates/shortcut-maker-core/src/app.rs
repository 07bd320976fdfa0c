//! Invocation dispatch.
//!
//! The argument list picks the mode: none means self-install, anything
//! else is a batch of targets. Every error ends up as a [`Notice`].

use crate::config::MessageConfig;
use crate::error::{Result, ShortcutError};
use crate::install::{InstallOutcome, Installer};
use crate::link::LinkWriter;
use crate::platform::{Notice, Notifier, PathResolver};
use crate::shortcut::ShortcutCreator;
use std::ffi::OsString;
use std::path::PathBuf;
use tracing::{error, info, warn};

/// What a single batch input produced.
#[derive(Debug)]
pub struct BatchEntry {
    pub input: OsString,
    pub result: Result<PathBuf>,
}

/// Per-input results of a batch run, in input order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub entries: Vec<BatchEntry>,
    /// Set when an environment error stopped the batch before the last input.
    pub aborted: bool,
}

impl BatchReport {
    /// Links that were created.
    pub fn created(&self) -> Vec<&PathBuf> {
        self.entries
            .iter()
            .filter_map(|entry| entry.result.as_ref().ok())
            .collect()
    }

    /// Inputs that failed, with their errors.
    pub fn failed(&self) -> Vec<(&OsString, &ShortcutError)> {
        self.entries
            .iter()
            .filter_map(|entry| entry.result.as_ref().err().map(|e| (&entry.input, e)))
            .collect()
    }
}

/// Outcome of one program invocation.
#[derive(Debug)]
pub enum RunOutcome {
    Install(Result<InstallOutcome>),
    Batch(BatchReport),
}

/// The program, wired to its OS capabilities.
pub struct App<R, W, N> {
    resolver: R,
    writer: W,
    notifier: N,
    current_exe: PathBuf,
}

impl<R, W, N> App<R, W, N>
where
    R: PathResolver,
    W: LinkWriter,
    N: Notifier,
{
    /// # Arguments
    ///
    /// * `current_exe` - the executable to install in self-install mode
    pub fn new(resolver: R, writer: W, notifier: N, current_exe: impl Into<PathBuf>) -> Self {
        Self {
            resolver,
            writer,
            notifier,
            current_exe: current_exe.into(),
        }
    }

    /// Run in the mode selected by `inputs`.
    pub fn run(&self, inputs: &[OsString]) -> RunOutcome {
        if inputs.is_empty() {
            RunOutcome::Install(self.self_install())
        } else {
            RunOutcome::Batch(self.create_shortcuts(inputs))
        }
    }

    /// Install into the "send to" menu and tell the user how it went.
    pub fn self_install(&self) -> Result<InstallOutcome> {
        let result = Installer::new(&self.resolver, &self.writer).install(&self.current_exe);

        match &result {
            Ok(outcome @ InstallOutcome::Installed { .. }) => {
                info!("Installed {:?}", outcome.installed_exe());
                self.notifier.notify(&Notice::info(
                    MessageConfig::INSTALLED_TITLE,
                    MessageConfig::INSTALLED,
                ));
            }
            Ok(InstallOutcome::AlreadyInstalled { .. }) => {
                self.notifier.notify(&Notice::info(
                    MessageConfig::ALREADY_INSTALLED_TITLE,
                    MessageConfig::ALREADY_INSTALLED,
                ));
            }
            Err(e) => {
                error!("Self-install failed: {}", e);
                self.notifier
                    .notify(&Notice::error(MessageConfig::install_failed(&e.to_string())));
            }
        }

        result
    }

    /// Create one Programs shortcut per input.
    ///
    /// Item failures are reported and skipped; an environment failure
    /// (unresolvable folder) is reported once and ends the batch.
    pub fn create_shortcuts(&self, inputs: &[OsString]) -> BatchReport {
        let creator = ShortcutCreator::new(&self.resolver, &self.writer);
        let mut report = BatchReport::default();

        for (index, input) in inputs.iter().enumerate() {
            let result = creator.create(input);

            let stop = match &result {
                Ok(_) => false,
                Err(e) => {
                    let shown = input.to_string_lossy();
                    warn!("Failed to create shortcut for {:?}: {}", input, e);
                    self.notifier
                        .notify(&Notice::error(MessageConfig::item_failed(&shown, &e.to_string())));
                    !e.is_item_scoped()
                }
            };

            report.entries.push(BatchEntry {
                input: input.clone(),
                result,
            });

            if stop {
                report.aborted = index + 1 < inputs.len();
                break;
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_report_accessors() {
        let report = BatchReport {
            entries: vec![
                BatchEntry {
                    input: OsString::from("a.txt"),
                    result: Ok(PathBuf::from("a.lnk")),
                },
                BatchEntry {
                    input: OsString::from("b.txt"),
                    result: Err(ShortcutError::NotFound(PathBuf::from("b.txt"))),
                },
            ],
            aborted: false,
        };

        assert_eq!(report.created(), vec![&PathBuf::from("a.lnk")]);
        let failed = report.failed();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].0, &OsString::from("b.txt"));
    }
}
