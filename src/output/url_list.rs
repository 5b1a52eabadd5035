//! Line-delimited URL list for the downstream crawler

use crate::discovery::DiscoveryResult;
use crate::output::traits::{OutputError, OutputHandler, OutputResult};
use std::path::{Path, PathBuf};

/// Formats URLs one per line, with a trailing newline
pub fn format_url_list(urls: &[String]) -> String {
    let mut out = String::with_capacity(urls.iter().map(|u| u.len() + 1).sum());
    for url in urls {
        out.push_str(url);
        out.push('\n');
    }
    out
}

/// Writes URLs to `path`, one per line, overwriting the whole file
///
/// Parent directories are created as needed.
pub fn write_url_list(urls: &[String], path: &Path) -> OutputResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    std::fs::write(path, format_url_list(urls)).map_err(|source| OutputError::Write {
        path: path.display().to_string(),
        source,
    })
}

/// Writes the flattened URL list of a discovery run
#[derive(Debug, Clone)]
pub struct UrlListOutput {
    path: PathBuf,
}

impl UrlListOutput {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OutputHandler for UrlListOutput {
    fn name(&self) -> &str {
        "url list"
    }

    fn write(&self, result: &DiscoveryResult) -> OutputResult<()> {
        write_url_list(&result.urls, &self.path)
    }
}
