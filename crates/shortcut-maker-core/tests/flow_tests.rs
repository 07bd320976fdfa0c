//! Integration tests for the self-install and batch shortcut flows.
//!
//! Each test runs against a temporary sandbox: folders come from a
//! resolver rooted in the sandbox, links are plain files recording their
//! target, and notices are collected instead of shown.

use shortcut_maker_core::platform::shortcut_extension;
use shortcut_maker_core::{
    platform_link_writer, App, CopyOutcome, InstallOutcome, LinkSpec, LinkWriter, Notice,
    NoticeLevel, Notifier, PathResolver, Result, RunOutcome, ShortcutCreator, ShortcutError,
};
use std::cell::{Cell, RefCell};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

/// Resolver whose folders live under a sandbox root.
struct SandboxResolver {
    root: PathBuf,
    unresolvable: Option<&'static str>,
}

impl SandboxResolver {
    fn lookup(&self, which: &'static str, name: &str) -> Result<PathBuf> {
        if self.unresolvable == Some(which) {
            return Err(ShortcutError::missing_folder(name));
        }
        Ok(self.root.join(which))
    }
}

impl PathResolver for SandboxResolver {
    fn install_dir(&self) -> Result<PathBuf> {
        self.lookup("install", "LocalAppData")
    }

    fn send_to_dir(&self) -> Result<PathBuf> {
        self.lookup("sendto", "'SendTo'")
    }

    fn start_menu_programs_dir(&self) -> Result<PathBuf> {
        self.lookup("programs", "Start Menu")
    }
}

/// Link writer storing each link's target as the file content.
#[derive(Clone, Default)]
struct RecordingLinkWriter {
    writes: Rc<Cell<usize>>,
    specs: Rc<RefCell<Vec<LinkSpec>>>,
}

impl LinkWriter for RecordingLinkWriter {
    fn create_or_overwrite(&self, path: &Path, spec: &LinkSpec) -> Result<()> {
        fs::write(path, spec.target.to_string_lossy().as_bytes())
            .map_err(|e| ShortcutError::io_with_path(e, path))?;
        self.writes.set(self.writes.get() + 1);
        self.specs.borrow_mut().push(spec.clone());
        Ok(())
    }

    fn read_target(&self, path: &Path) -> Result<PathBuf> {
        let content = fs::read_to_string(path).map_err(|e| ShortcutError::io_with_path(e, path))?;
        Ok(PathBuf::from(content))
    }
}

#[derive(Clone, Default)]
struct RecordingNotifier {
    notices: Rc<RefCell<Vec<Notice>>>,
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: &Notice) {
        self.notices.borrow_mut().push(notice.clone());
    }
}

struct Sandbox {
    temp_dir: TempDir,
    writer: RecordingLinkWriter,
    notifier: RecordingNotifier,
}

impl Sandbox {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let source_dir = temp_dir.path().join("downloads");
        fs::create_dir_all(&source_dir).unwrap();
        fs::write(source_dir.join("shortcut-maker.exe"), b"build 1").unwrap();

        Self {
            temp_dir,
            writer: RecordingLinkWriter::default(),
            notifier: RecordingNotifier::default(),
        }
    }

    fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    fn source_exe(&self) -> PathBuf {
        self.root().join("downloads").join("shortcut-maker.exe")
    }

    fn installed_exe(&self) -> PathBuf {
        self.root().join("install").join("shortcut-maker.exe")
    }

    fn send_to_link(&self) -> PathBuf {
        self.root().join("sendto").join(format!(
            "Start Menu - Programs (create shortcut).{}",
            shortcut_extension()
        ))
    }

    fn programs_dir(&self) -> PathBuf {
        self.root().join("programs")
    }

    fn app(&self) -> App<SandboxResolver, RecordingLinkWriter, RecordingNotifier> {
        self.app_with(None)
    }

    fn app_with(
        &self,
        unresolvable: Option<&'static str>,
    ) -> App<SandboxResolver, RecordingLinkWriter, RecordingNotifier> {
        App::new(
            SandboxResolver {
                root: self.root().to_path_buf(),
                unresolvable,
            },
            self.writer.clone(),
            self.notifier.clone(),
            self.source_exe(),
        )
    }

    fn notices(&self) -> Vec<Notice> {
        self.notifier.notices.borrow().clone()
    }

    /// Create a file (and its parents) inside the sandbox.
    fn touch(&self, relative: &str) -> PathBuf {
        let path = self.root().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, relative.as_bytes()).unwrap();
        path
    }

    fn link_name(name: &str) -> String {
        format!("{}.{}", name, shortcut_extension())
    }
}

fn set_mtime(path: &Path, time: SystemTime) {
    fs::File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_modified(time)
        .unwrap();
}

fn dir_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

// ---------------------------------------------------------------------------
// Self-install
// ---------------------------------------------------------------------------

#[test]
fn test_fresh_install_creates_copy_and_link() {
    let sandbox = Sandbox::new();

    let outcome = sandbox.app().self_install().unwrap();

    assert!(matches!(outcome, InstallOutcome::Installed { .. }));
    assert_eq!(outcome.copy(), CopyOutcome::Copied);
    assert_eq!(outcome.installed_exe(), sandbox.installed_exe());
    assert_eq!(fs::read(sandbox.installed_exe()).unwrap(), b"build 1");

    assert_eq!(
        dir_entries(&sandbox.root().join("sendto")),
        vec![Sandbox::link_name("Start Menu - Programs (create shortcut)")]
    );
    assert_eq!(sandbox.writer.writes.get(), 1);

    let specs = sandbox.writer.specs.borrow();
    assert_eq!(specs[0].target, sandbox.installed_exe());
    assert_eq!(specs[0].working_dir, Some(sandbox.root().join("install")));
    assert_eq!(specs[0].icon, Some(sandbox.installed_exe()));
    assert_eq!(
        specs[0].description.as_deref(),
        Some("Create a shortcut in Start Menu → Programs for the selected file.")
    );

    let notices = sandbox.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Info);
    assert_eq!(notices[0].title, "Installed");
}

#[test]
fn test_second_install_is_a_no_op() {
    let sandbox = Sandbox::new();
    let app = sandbox.app();

    app.self_install().unwrap();
    let installed_mtime = fs::metadata(sandbox.installed_exe())
        .unwrap()
        .modified()
        .unwrap();

    let outcome = app.self_install().unwrap();

    assert!(matches!(outcome, InstallOutcome::AlreadyInstalled { .. }));
    assert_eq!(outcome.copy(), CopyOutcome::UpToDate);
    assert_eq!(sandbox.writer.writes.get(), 1);
    assert_eq!(
        fs::metadata(sandbox.installed_exe())
            .unwrap()
            .modified()
            .unwrap(),
        installed_mtime
    );

    let notices = sandbox.notices();
    assert_eq!(notices.len(), 2);
    assert_eq!(notices[1].title, "Already installed");
    assert_eq!(
        notices[1].message,
        "The 'Send to → Start Menu - Programs (create shortcut)' entry is already installed."
    );
}

#[test]
fn test_newer_executable_overwrites_installed_copy() {
    let sandbox = Sandbox::new();
    let app = sandbox.app();
    app.self_install().unwrap();

    let now = SystemTime::now();
    set_mtime(&sandbox.installed_exe(), now - Duration::from_secs(3600));
    fs::write(sandbox.source_exe(), b"build 2").unwrap();
    set_mtime(&sandbox.source_exe(), now);

    let outcome = app.self_install().unwrap();

    assert_eq!(outcome.copy(), CopyOutcome::Copied);
    assert!(matches!(outcome, InstallOutcome::AlreadyInstalled { .. }));
    assert_eq!(fs::read(sandbox.installed_exe()).unwrap(), b"build 2");
}

#[test]
fn test_existing_link_matching_case_insensitively_is_kept() {
    let sandbox = Sandbox::new();
    fs::create_dir_all(sandbox.root().join("sendto")).unwrap();
    let shouted = sandbox.installed_exe().to_string_lossy().to_uppercase();
    fs::write(sandbox.send_to_link(), shouted.as_bytes()).unwrap();

    let outcome = sandbox.app().self_install().unwrap();

    assert!(matches!(outcome, InstallOutcome::AlreadyInstalled { .. }));
    assert_eq!(sandbox.writer.writes.get(), 0);
    assert_eq!(fs::read_to_string(sandbox.send_to_link()).unwrap(), shouted);
}

#[test]
fn test_existing_link_to_other_target_is_replaced() {
    let sandbox = Sandbox::new();
    fs::create_dir_all(sandbox.root().join("sendto")).unwrap();
    fs::write(sandbox.send_to_link(), b"/old/location/shortcut-maker.exe").unwrap();

    let outcome = sandbox.app().self_install().unwrap();

    assert!(matches!(outcome, InstallOutcome::Installed { .. }));
    assert_eq!(
        PathBuf::from(fs::read_to_string(sandbox.send_to_link()).unwrap()),
        sandbox.installed_exe()
    );
}

#[test]
fn test_unresolvable_install_dir_reports_config_error() {
    let sandbox = Sandbox::new();

    let err = sandbox.app_with(Some("install")).self_install().unwrap_err();

    assert!(matches!(err, ShortcutError::Config { .. }));
    assert!(!sandbox.root().join("sendto").exists());

    let notices = sandbox.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Error);
    assert_eq!(notices[0].title, "Error");
    assert_eq!(
        notices[0].message,
        "Failed to install into 'Send to' menu:\n\nCould not locate the LocalAppData folder."
    );
}

#[test]
fn test_unresolvable_send_to_keeps_copied_executable() {
    let sandbox = Sandbox::new();

    let err = sandbox.app_with(Some("sendto")).self_install().unwrap_err();

    assert_eq!(err.to_string(), "Could not locate the 'SendTo' folder.");
    assert!(sandbox.installed_exe().exists());
    assert_eq!(sandbox.writer.writes.get(), 0);
}

// ---------------------------------------------------------------------------
// Batch shortcuts
// ---------------------------------------------------------------------------

#[test]
fn test_run_without_arguments_installs() {
    let sandbox = Sandbox::new();

    match sandbox.app().run(&[]) {
        RunOutcome::Install(result) => assert!(result.is_ok()),
        RunOutcome::Batch(_) => panic!("expected self-install"),
    }
    assert!(sandbox.send_to_link().exists());
}

#[test]
fn test_shortcut_points_at_absolute_target() {
    let sandbox = Sandbox::new();
    let report_file = sandbox.touch("A/report.txt");

    let report = match sandbox.app().run(&[report_file.clone().into_os_string()]) {
        RunOutcome::Batch(report) => report,
        RunOutcome::Install(_) => panic!("expected batch"),
    };

    assert_eq!(
        report.created(),
        vec![&sandbox.programs_dir().join(Sandbox::link_name("report"))]
    );
    assert_eq!(
        dir_entries(&sandbox.programs_dir()),
        vec![Sandbox::link_name("report")]
    );

    let specs = sandbox.writer.specs.borrow();
    assert_eq!(specs[0].target, report_file);
    assert_eq!(specs[0].working_dir, Some(sandbox.root().join("A")));
    assert_eq!(specs[0].icon, Some(report_file.clone()));
    assert_eq!(specs[0].show_command.as_raw(), 1);
    assert_eq!(
        specs[0].description.as_deref(),
        Some("Shortcut created via Send To → Start Menu/Programs")
    );

    // Successful items are silent
    assert!(sandbox.notices().is_empty());
}

#[test]
fn test_relative_inputs_resolve_against_working_directory() {
    let sandbox = Sandbox::new();
    sandbox.touch("proj/report.txt");
    fs::create_dir_all(sandbox.root().join("proj/sub")).unwrap();

    // The only test that moves the process working directory; every other
    // test passes absolute paths.
    let previous_dir = std::env::current_dir().unwrap();
    std::env::set_current_dir(sandbox.root().join("proj")).unwrap();
    let proj = std::env::current_dir().unwrap();

    let inputs: Vec<OsString> = ["report.txt", "sub/../report.txt", "sub/.."]
        .iter()
        .map(OsString::from)
        .collect();
    let report = sandbox.app().create_shortcuts(&inputs);

    std::env::set_current_dir(previous_dir).unwrap();

    assert_eq!(report.created().len(), 3);
    assert_eq!(
        dir_entries(&sandbox.programs_dir()),
        vec![
            Sandbox::link_name("proj"),
            Sandbox::link_name("report (1)"),
            Sandbox::link_name("report"),
        ]
    );

    let specs = sandbox.writer.specs.borrow();
    let report_file = proj.join("report.txt");
    assert_eq!(specs[0].target, report_file);
    assert_eq!(specs[0].working_dir, Some(proj.clone()));
    assert_eq!(specs[1].target, report_file);
    assert_eq!(specs[1].working_dir, Some(proj.clone()));
    assert_eq!(specs[2].target, proj);
    assert_eq!(specs[2].working_dir, proj.parent().map(Path::to_path_buf));
}

#[test]
fn test_name_collisions_get_numbered() {
    let sandbox = Sandbox::new();
    let inputs: Vec<OsString> = ["A/Foo.txt", "B/Foo.txt", "C/Foo.md"]
        .iter()
        .map(|p| sandbox.touch(p).into_os_string())
        .collect();

    let report = sandbox.app().create_shortcuts(&inputs);

    assert_eq!(report.created().len(), 3);
    assert_eq!(
        dir_entries(&sandbox.programs_dir()),
        vec![
            Sandbox::link_name("Foo (1)"),
            Sandbox::link_name("Foo (2)"),
            Sandbox::link_name("Foo"),
        ]
    );
    assert_eq!(
        PathBuf::from(
            fs::read_to_string(sandbox.programs_dir().join(Sandbox::link_name("Foo (2)"))).unwrap()
        ),
        sandbox.root().join("C/Foo.md")
    );
}

#[test]
fn test_same_target_twice_adds_second_link() {
    let sandbox = Sandbox::new();
    let target = sandbox.touch("A/notes.txt").into_os_string();

    let report = sandbox.app().create_shortcuts(&[target.clone(), target]);

    assert_eq!(report.created().len(), 2);
    assert_eq!(
        dir_entries(&sandbox.programs_dir()),
        vec![Sandbox::link_name("notes (1)"), Sandbox::link_name("notes")]
    );
}

#[test]
fn test_missing_path_does_not_abort_batch() {
    let sandbox = Sandbox::new();
    let existing = sandbox.touch("A/report.txt");
    let missing = sandbox.root().join("B").join("missing.txt");
    let trailing = sandbox.touch("C/summary.txt");

    let inputs = vec![
        existing.into_os_string(),
        missing.clone().into_os_string(),
        trailing.into_os_string(),
    ];
    let report = sandbox.app().create_shortcuts(&inputs);

    assert!(!report.aborted);
    assert_eq!(report.entries.len(), 3);
    assert_eq!(report.created().len(), 2);

    let failed = report.failed();
    assert_eq!(failed.len(), 1);
    assert!(matches!(failed[0].1, ShortcutError::NotFound(p) if *p == missing));

    let notices = sandbox.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Error);
    assert!(notices[0]
        .message
        .starts_with(&format!("Error processing '{}':\n\n", missing.display())));
}

#[test]
fn test_blank_input_is_reported_per_item() {
    let sandbox = Sandbox::new();
    let existing = sandbox.touch("A/report.txt");

    let report = sandbox
        .app()
        .create_shortcuts(&[OsString::from("   "), existing.into_os_string()]);

    assert_eq!(report.created().len(), 1);
    let notices = sandbox.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].message, "Error processing '   ':\n\nTarget path is empty.");
}

#[test]
fn test_directory_target_gets_shortcut() {
    let sandbox = Sandbox::new();
    let dir = sandbox.root().join("Projects");
    fs::create_dir_all(&dir).unwrap();

    let report = sandbox.app().create_shortcuts(&[dir.into_os_string()]);

    assert_eq!(
        report.created(),
        vec![&sandbox.programs_dir().join(Sandbox::link_name("Projects"))]
    );
}

#[test]
fn test_unresolvable_programs_dir_stops_batch() {
    let sandbox = Sandbox::new();
    let first = sandbox.touch("A/one.txt");
    let second = sandbox.touch("A/two.txt");

    let report = sandbox
        .app_with(Some("programs"))
        .create_shortcuts(&[first.into_os_string(), second.into_os_string()]);

    assert!(report.aborted);
    assert_eq!(report.entries.len(), 1);
    assert!(matches!(
        report.entries[0].result,
        Err(ShortcutError::Config { .. })
    ));
    assert_eq!(sandbox.notices().len(), 1);
}

// ---------------------------------------------------------------------------
// Native link format
// ---------------------------------------------------------------------------

#[test]
fn test_platform_writer_round_trips_target() {
    let sandbox = Sandbox::new();
    let target = sandbox.touch("A/report.txt");
    let resolver = SandboxResolver {
        root: sandbox.root().to_path_buf(),
        unresolvable: None,
    };
    let writer = platform_link_writer();

    let link = ShortcutCreator::new(&resolver, &writer)
        .create(target.as_os_str())
        .unwrap();

    assert_eq!(link, sandbox.programs_dir().join(Sandbox::link_name("report")));
    let read_back = writer.read_target(&link).unwrap();
    assert!(read_back
        .to_string_lossy()
        .eq_ignore_ascii_case(&target.to_string_lossy()));
}
