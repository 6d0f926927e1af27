use camino::Utf8PathBuf;

/// Failure to stage offline packages. Always recoverable from the caller's point of view.
#[derive(Debug, thiserror::Error)]
pub enum ProvisionError {
    #[error("bundled package source {0} does not exist")]
    MissingSource(Utf8PathBuf),
    #[error("failed to enumerate bundled packages: {0}")]
    Walk(String),
    #[error("failed to stage package {package}: {source}")]
    Stage {
        package: String,
        #[source]
        source: std::io::Error,
    },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    #[error("invalid build menu option: {0}")]
    InvalidMenuOption(i32),
}
