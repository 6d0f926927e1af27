use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use hotbuild_app_core::{CommandDispatcher, CommandOutcome, CommandReport, FileOrchestrator};
use hotbuild_config::{
    clamp_watcher_interval, DEBUGGER_NOTIFY_TIMEOUT_MS, LOADED_STAMP_FILE_NAME,
};
use hotbuild_core::BuildCommand;
use hotbuild_infra::{
    find_solution, AssemblyStampGate, FallbackFolderProvisioner, FileHost, FsProjectProbe,
    HttpDebuggerBridge, ProcessBuildInvoker, WatcherTimer,
};

use crate::settings::{resolve_path, user_packages_dir, HostSettings, SettingsStore};
use crate::OutputFormat;

/// Solution path for a project: configured, discovered, or the conventional
/// `<dir>/<dir name>.sln` (which may not exist).
pub fn solution_path(root: &Utf8Path, settings: &HostSettings) -> Utf8PathBuf {
    if let Some(configured) = &settings.solution {
        return resolve_path(root, configured);
    }
    if let Some(found) = find_solution(root) {
        return found;
    }
    let name = root.file_name().unwrap_or("project");
    root.join(format!("{name}.sln"))
}

pub fn bundled_packages_dir(root: &Utf8Path, settings: &HostSettings) -> Utf8PathBuf {
    match &settings.bundled_packages {
        Some(dir) => resolve_path(root, dir),
        None => user_packages_dir().unwrap_or_else(|| root.join(".hotbuild/bundled")),
    }
}

pub fn build_orchestrator(root: &Utf8Path, settings: &HostSettings) -> FileOrchestrator {
    let solution = solution_path(root, settings);
    let state_dir = SettingsStore::new(root.to_path_buf()).state_dir();

    let provisioner = FallbackFolderProvisioner::new(
        bundled_packages_dir(root, settings),
        resolve_path(root, &settings.fallback_folder),
    );
    let invoker = ProcessBuildInvoker::new(solution.clone(), settings.build_template.clone());
    let host = FileHost::new(
        HttpDebuggerBridge::new(
            settings.debugger_endpoint.clone(),
            Duration::from_millis(DEBUGGER_NOTIFY_TIMEOUT_MS),
        ),
        WatcherTimer::new(Duration::from_millis(clamp_watcher_interval(
            settings.watcher_interval_ms,
        ))),
        AssemblyStampGate::new(
            resolve_path(root, &settings.assemblies_dir),
            state_dir.join(LOADED_STAMP_FILE_NAME),
        ),
    );

    FileOrchestrator::new(
        solution,
        settings.mode.clone(),
        FsProjectProbe,
        provisioner,
        invoker,
        host,
    )
}

fn load_orchestrator(root: &Utf8Path) -> Result<FileOrchestrator> {
    let settings = SettingsStore::new(root.to_path_buf()).load()?;
    Ok(build_orchestrator(root, &settings))
}

pub async fn cmd_run(
    root: Utf8PathBuf,
    command: BuildCommand,
    format: OutputFormat,
) -> Result<CommandReport> {
    let orchestrator = load_orchestrator(&root)?;
    if format == OutputFormat::Text {
        println!(":: {} {}", capitalize(command.as_str()), orchestrator.project_path());
        println!("   Mode: {}", orchestrator.mode());
    }

    let report = tokio::task::spawn_blocking(move || {
        let report = orchestrator.execute(command);
        flush_notifications(&orchestrator);
        report
    })
    .await
    .context("Build worker panicked")?;

    print_report(&report, format)?;
    Ok(report)
}

/// The process exits right after a command, so pending debugger requests
/// get their full timeout to go out first.
fn flush_notifications(orchestrator: &FileOrchestrator) {
    orchestrator
        .host()
        .flush(Duration::from_millis(DEBUGGER_NOTIFY_TIMEOUT_MS));
}

pub fn cmd_menu() {
    println!("{:<4} {:<20}", "ID", "ACTION");
    println!("{:-<4} {:-<20}", "", "");
    for (id, label) in FileDispatcher::menu() {
        println!("{:<4} {:<20}", id, label);
    }
}

type FileDispatcher = CommandDispatcher<
    FsProjectProbe,
    FallbackFolderProvisioner,
    ProcessBuildInvoker,
    FileHost,
>;

pub async fn cmd_select(root: Utf8PathBuf, id: i32, format: OutputFormat) -> Result<CommandReport> {
    let orchestrator = Arc::new(load_orchestrator(&root)?);
    let dispatcher = FileDispatcher::new(orchestrator.clone());

    let report = tokio::task::spawn_blocking(move || {
        let report = dispatcher.dispatch_id(id);
        flush_notifications(&orchestrator);
        report
    })
    .await
    .context("Build worker panicked")??;

    print_report(&report, format)?;
    Ok(report)
}

pub fn cmd_settings_show(root: Utf8PathBuf) -> Result<()> {
    let store = SettingsStore::new(root);
    let settings = store.load()?;
    println!(":: Settings ({})", store.settings_path());
    println!("{}", serde_json::to_string_pretty(&settings)?);
    println!(
        "   Solution: {}",
        solution_path(store.project_root(), &settings)
    );
    println!(
        "   Bundled packages: {}",
        bundled_packages_dir(store.project_root(), &settings)
    );
    Ok(())
}

pub fn cmd_settings_init(root: Utf8PathBuf, force: bool) -> Result<()> {
    let store = SettingsStore::new(root);
    let path = store.settings_path();
    if path.exists() && !force {
        anyhow::bail!("{path} already exists (use --force to overwrite)");
    }
    store.save(&HostSettings::default())?;
    println!(":: Wrote default settings to {path}");
    Ok(())
}

pub fn print_report(report: &CommandReport, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    if let Some(warning) = &report.provision_warning {
        println!("   Warning: {warning}");
    }

    match report.outcome {
        CommandOutcome::NoProject => println!("\n:: No solution to {}.", report.command),
        CommandOutcome::BuildFailed => println!("\n:: {} failed.", capitalize(report.command.as_str())),
        CommandOutcome::Built { reloaded } => {
            println!("\n:: {} succeeded.", capitalize(report.command.as_str()));
            if reloaded {
                println!("   Assemblies reloaded.");
            } else {
                println!("   Assemblies already current.");
            }
        }
        CommandOutcome::Cleaned(outcome) if outcome.succeeded => println!("\n:: Clean succeeded."),
        CommandOutcome::Cleaned(_) => println!("\n:: Clean failed."),
    }
    Ok(())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
