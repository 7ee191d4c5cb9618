use std::fmt;
use std::path::{Path, PathBuf};

/// One unit of fire-and-forget work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessingJob {
    /// Process every bundle in a definition file.
    ProcessBundleFile(PathBuf),
    /// Reprocess the bundles of `config` that consume `source`.
    SourceFileChanged { config: PathBuf, source: PathBuf },
    /// Minify one authored file.
    MinifySingleFile(PathBuf),
}

impl ProcessingJob {
    /// The coarse message shown to the user when this job fails.
    pub fn failure_message(&self) -> String {
        match self {
            Self::ProcessBundleFile(config) | Self::SourceFileChanged { config, .. } => format!(
                "There is an error in the {} file. This could be due to a change in the format after this tool was updated.",
                file_name(config)
            ),
            Self::MinifySingleFile(source) => {
                format!("There was a error minifying {}", file_name(source))
            }
        }
    }
}

impl fmt::Display for ProcessingJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProcessBundleFile(config) => write!(f, "bundle {}", config.display()),
            Self::SourceFileChanged { config, source } => {
                write!(f, "changed {} ({})", source.display(), config.display())
            }
            Self::MinifySingleFile(source) => write!(f, "minify {}", source.display()),
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
