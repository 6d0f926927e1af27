use std::sync::Mutex;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use camino::{Utf8Path, Utf8PathBuf};
use filetime::FileTime;
use walkdir::WalkDir;

const ASSEMBLY_EXTENSION: &str = "dll";
const RELOAD_SCRIPTS_ROUTE: &str = "reload-scripts";

/// Tells a running instance, attached over its debug endpoint, to reload scripts.
pub struct HttpDebuggerBridge {
    endpoint: Option<String>,
    timeout: Duration,
}

impl HttpDebuggerBridge {
    pub fn new(endpoint: Option<String>, timeout: Duration) -> Self {
        let endpoint = endpoint
            .map(|e| e.trim().trim_end_matches('/').to_string())
            .filter(|e| !e.is_empty());
        Self { endpoint, timeout }
    }

    pub fn reload_url(&self) -> Option<String> {
        self.endpoint
            .as_ref()
            .map(|e| format!("{e}/{RELOAD_SCRIPTS_ROUTE}"))
    }

    /// Sends the notification from a detached thread. The handle is only useful to tests.
    pub fn notify(&self) -> Option<JoinHandle<()>> {
        let Some(url) = self.reload_url() else {
            tracing::debug!("No debugger endpoint configured; skipping script reload notice");
            return None;
        };
        let timeout = self.timeout;

        let spawn_res = std::thread::Builder::new()
            .name("hotbuild-debugger-notify".into())
            .spawn(move || {
                let client = match reqwest::blocking::Client::builder().timeout(timeout).build() {
                    Ok(c) => c,
                    Err(e) => {
                        tracing::debug!("Failed to build debugger client: {e}");
                        return;
                    }
                };
                match client.post(&url).send() {
                    Ok(resp) => tracing::debug!(status = %resp.status(), "Debugger notified"),
                    Err(e) => tracing::debug!("Debugger notification to {url} failed: {e}"),
                }
            });

        match spawn_res {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::warn!("Failed to start debugger notification thread: {e}");
                None
            }
        }
    }
}

/// Poll deadline of the hot-reload assembly watcher.
pub struct WatcherTimer {
    interval: Duration,
    deadline: Mutex<Instant>,
}

impl WatcherTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            deadline: Mutex::new(Instant::now() + interval),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Pushes the next poll one full interval out, so files the build just
    /// wrote do not trigger the watcher again.
    pub fn restart(&self) {
        if let Ok(mut guard) = self.deadline.lock() {
            *guard = Instant::now() + self.interval;
        }
    }

    pub fn remaining(&self) -> Duration {
        self.deadline
            .lock()
            .map(|d| d.saturating_duration_since(Instant::now()))
            .unwrap_or_default()
    }

    pub fn is_due(&self) -> bool {
        self.remaining().is_zero()
    }
}

/// Decides whether compiled assemblies are newer than what the host last loaded.
pub struct AssemblyStampGate {
    assemblies_dir: Utf8PathBuf,
    stamp_path: Utf8PathBuf,
}

impl AssemblyStampGate {
    pub fn new(assemblies_dir: Utf8PathBuf, stamp_path: Utf8PathBuf) -> Self {
        Self {
            assemblies_dir,
            stamp_path,
        }
    }

    pub fn stamp_path(&self) -> &Utf8Path {
        &self.stamp_path
    }

    fn newest_assembly(&self) -> Option<FileTime> {
        WalkDir::new(&self.assemblies_dir)
            .into_iter()
            .filter_map(|res| res.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| {
                entry
                    .path()
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e.eq_ignore_ascii_case(ASSEMBLY_EXTENSION))
            })
            .filter_map(|entry| entry.metadata().ok())
            .map(|meta| FileTime::from_last_modification_time(&meta))
            .max()
    }

    fn loaded_at(&self) -> Option<FileTime> {
        std::fs::metadata(&self.stamp_path)
            .ok()
            .map(|meta| FileTime::from_last_modification_time(&meta))
    }

    pub fn is_reload_needed(&self) -> bool {
        match (self.newest_assembly(), self.loaded_at()) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(built), Some(loaded)) => built > loaded,
        }
    }

    /// Records that the host loaded the current assemblies.
    pub fn reload_assemblies(&self, soft: bool) -> std::io::Result<()> {
        if let Some(parent) = self.stamp_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        if !self.stamp_path.exists() {
            std::fs::File::create(&self.stamp_path)?;
        }

        let now = FileTime::now();
        let loaded = self.newest_assembly().map_or(now, |built| built.max(now));
        filetime::set_file_mtime(&self.stamp_path, loaded)?;

        tracing::info!(soft, stamp = %self.stamp_path, "Assemblies reloaded");
        Ok(())
    }
}

/// The host-side services notified after a successful build.
pub struct FileHost {
    pub bridge: HttpDebuggerBridge,
    pub watcher: WatcherTimer,
    pub gate: AssemblyStampGate,
    pending: Mutex<Vec<JoinHandle<()>>>,
}

impl FileHost {
    pub fn new(bridge: HttpDebuggerBridge, watcher: WatcherTimer, gate: AssemblyStampGate) -> Self {
        Self {
            bridge,
            watcher,
            gate,
            pending: Mutex::new(Vec::new()),
        }
    }

    /// Starts a debugger notification without waiting on it. See [`FileHost::flush`].
    pub fn notify_debugger(&self) {
        let Some(handle) = self.bridge.notify() else {
            return;
        };
        match self.pending.lock() {
            Ok(mut pending) => {
                pending.retain(|h| !h.is_finished());
                pending.push(handle);
            }
            Err(_) => tracing::warn!("Pending notification list poisoned; not tracking request"),
        }
    }

    /// Gives in-flight debugger notifications up to `timeout` to complete.
    ///
    /// Short-lived hosts call this before exiting so a request that is still
    /// being sent is not dropped with the process. Returns `false` if some
    /// notification was still running when the timeout expired.
    pub fn flush(&self, timeout: Duration) -> bool {
        let handles = match self.pending.lock() {
            Ok(mut pending) => std::mem::take(&mut *pending),
            Err(_) => return false,
        };

        let deadline = Instant::now() + timeout;
        let mut all_done = true;
        for handle in handles {
            while !handle.is_finished() && Instant::now() < deadline {
                std::thread::sleep(Duration::from_millis(10));
            }
            if handle.is_finished() {
                if handle.join().is_err() {
                    tracing::warn!("Debugger notification thread panicked");
                }
            } else {
                tracing::warn!("Debugger notification still running after {timeout:?}");
                all_done = false;
            }
        }
        all_done
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate_in(root: &Utf8Path) -> AssemblyStampGate {
        AssemblyStampGate::new(root.join("bin"), root.join(".hotbuild/assemblies.loaded"))
    }

    fn utf8_tempdir() -> (tempfile::TempDir, Utf8PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        (dir, root)
    }

    #[test]
    fn no_assemblies_means_nothing_to_reload() {
        let (_dir, root) = utf8_tempdir();
        assert!(!gate_in(&root).is_reload_needed());
    }

    #[test]
    fn fresh_assemblies_without_stamp_need_reload_until_stamped() {
        let (_dir, root) = utf8_tempdir();
        std::fs::create_dir_all(root.join("bin")).unwrap();
        std::fs::write(root.join("bin/Game.dll"), b"il").unwrap();
        let gate = gate_in(&root);

        assert!(gate.is_reload_needed());
        gate.reload_assemblies(false).unwrap();
        assert!(!gate.is_reload_needed());
        assert!(gate.stamp_path().is_file());
    }

    #[test]
    fn assembly_newer_than_stamp_needs_reload() {
        let (_dir, root) = utf8_tempdir();
        std::fs::create_dir_all(root.join("bin")).unwrap();
        std::fs::create_dir_all(root.join(".hotbuild")).unwrap();
        let dll = root.join("bin/Game.dll");
        std::fs::write(&dll, b"il").unwrap();
        std::fs::write(root.join(".hotbuild/assemblies.loaded"), b"").unwrap();

        filetime::set_file_mtime(
            root.join(".hotbuild/assemblies.loaded"),
            FileTime::from_unix_time(1_000, 0),
        )
        .unwrap();
        filetime::set_file_mtime(&dll, FileTime::from_unix_time(2_000, 0)).unwrap();
        assert!(gate_in(&root).is_reload_needed());

        filetime::set_file_mtime(&dll, FileTime::from_unix_time(500, 0)).unwrap();
        assert!(!gate_in(&root).is_reload_needed());
    }

    #[test]
    fn non_assembly_files_are_ignored() {
        let (_dir, root) = utf8_tempdir();
        std::fs::create_dir_all(root.join("bin")).unwrap();
        std::fs::write(root.join("bin/Game.pdb"), b"symbols").unwrap();
        assert!(!gate_in(&root).is_reload_needed());
    }

    #[test]
    fn restart_pushes_deadline_a_full_interval_out() {
        let timer = WatcherTimer::new(Duration::from_secs(30));
        timer.restart();
        assert!(timer.remaining() > Duration::from_secs(29));
        assert!(!timer.is_due());

        let zero = WatcherTimer::new(Duration::ZERO);
        assert!(zero.is_due());
    }

    #[test]
    fn bridge_without_endpoint_sends_nothing() {
        let bridge = HttpDebuggerBridge::new(Some("   ".into()), Duration::from_secs(1));
        assert!(bridge.reload_url().is_none());
        assert!(bridge.notify().is_none());
    }

    #[test]
    fn flush_without_notifications_is_immediate() {
        let (_dir, root) = utf8_tempdir();
        let host = FileHost::new(
            HttpDebuggerBridge::new(None, Duration::from_secs(1)),
            WatcherTimer::new(Duration::from_secs(1)),
            gate_in(&root),
        );

        host.notify_debugger();
        assert!(host.flush(Duration::ZERO));
    }

    #[test]
    fn bridge_url_ignores_trailing_slash() {
        let bridge =
            HttpDebuggerBridge::new(Some("http://127.0.0.1:6007/".into()), Duration::from_secs(1));
        assert_eq!(
            bridge.reload_url().as_deref(),
            Some("http://127.0.0.1:6007/reload-scripts")
        );
    }
}
