use camino::{Utf8Path, Utf8PathBuf};

const SOLUTION_EXTENSION: &str = "sln";

/// Filesystem check for the solution file a build targets.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsProjectProbe;

impl FsProjectProbe {
    pub fn exists(&self, path: &Utf8Path) -> bool {
        path.is_file()
    }
}

/// Picks the solution for a project directory: `<dir name>.sln` when present,
/// otherwise the first `*.sln` by name.
pub fn find_solution(project_dir: &Utf8Path) -> Option<Utf8PathBuf> {
    if let Some(name) = project_dir.file_name() {
        let preferred = project_dir.join(format!("{name}.{SOLUTION_EXTENSION}"));
        if preferred.is_file() {
            return Some(preferred);
        }
    }

    let mut candidates: Vec<Utf8PathBuf> = project_dir
        .read_dir_utf8()
        .ok()?
        .filter_map(|res| res.ok())
        .map(|entry| entry.into_path())
        .filter(|p| p.is_file() && p.extension() == Some(SOLUTION_EXTENSION))
        .collect();
    candidates.sort();
    candidates.into_iter().next()
}
