//! Central configuration constants for build and reload defaults.

/// Build configuration passed to the build tool when none is configured.
pub const DEFAULT_BUILD_MODE: &str = "Debug";

/// Default build command template. `$SOLUTION`, `$MODE` and `$TARGETS` are substituted.
pub const DEFAULT_BUILD_TEMPLATE: &str =
    "dotnet msbuild \"$SOLUTION\" -restore -p:Configuration=$MODE $TARGETS";

/// Directory, relative to the project root, holding hotbuild's own state.
pub const STATE_DIR_NAME: &str = ".hotbuild";

/// Settings file name inside the state directory.
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Stamp touched whenever the host reloads its assemblies.
pub const LOADED_STAMP_FILE_NAME: &str = "assemblies.loaded";

/// Default offline package fallback folder, relative to the project root.
pub const DEFAULT_FALLBACK_FOLDER: &str = ".hotbuild/packages";

/// Default directory of compiled assemblies, relative to the project root.
pub const DEFAULT_ASSEMBLIES_DIR: &str = ".hotbuild/assemblies";

/// Default hot-reload watcher poll interval in milliseconds.
pub const DEFAULT_WATCHER_INTERVAL_MS: u64 = 500;

/// Minimum allowed watcher poll interval in milliseconds.
pub const MIN_WATCHER_INTERVAL_MS: u64 = 50;

/// Maximum allowed watcher poll interval in milliseconds.
pub const MAX_WATCHER_INTERVAL_MS: u64 = 60_000;

/// Timeout for the fire-and-forget debugger notification.
pub const DEBUGGER_NOTIFY_TIMEOUT_MS: u64 = 2_000;

/// Convenience function to clamp a watcher interval into the allowed range.
pub fn clamp_watcher_interval(ms: u64) -> u64 {
    ms.clamp(MIN_WATCHER_INTERVAL_MS, MAX_WATCHER_INTERVAL_MS)
}
