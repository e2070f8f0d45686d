//! Path resolution against the content root.
//!
//! Maps URL paths to files and directories under the configured root,
//! applying the dotfile-visibility and suffix-less lookup policies. All
//! checks operate on the decoded, sanitized path; `..` segments are
//! rejected outright so a request can never escape the root. Hidden
//! dotfiles resolve to not-found rather than forbidden, so filtered paths
//! are indistinguishable from absent ones.

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;

use crate::config::LOOKUP_SUFFIXES;

/// Read-only view of the content root with the lookup policies applied.
///
/// Cheap to clone; constructed once at assembly time and shared across all
/// concurrent requests.
#[derive(Debug, Clone)]
pub struct FileSystem {
    root: PathBuf,
    lookup_with_suffix: bool,
    hide_dot_files: bool,
}

/// Successful resolution of a URL path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    File(PathBuf),
    Directory(PathBuf),
}

/// Failure to resolve a URL path.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// No servable file or directory at this path.
    #[error("not found")]
    NotFound,
    /// The URL path could not be decoded or tries to climb out of the root.
    #[error("invalid path")]
    InvalidPath,
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl FileSystem {
    pub fn new(root: impl Into<PathBuf>, lookup_with_suffix: bool, hide_dot_files: bool) -> Self {
        Self {
            root: root.into(),
            lookup_with_suffix,
            hide_dot_files,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a URL path to a file or directory under the root.
    pub async fn resolve(&self, url_path: &str) -> Result<Resolved, ResolveError> {
        let segments = self.sanitize(url_path)?;
        let mut target = self.root.clone();
        for segment in &segments {
            target.push(segment);
        }

        match fs::metadata(&target).await {
            Ok(meta) if meta.is_dir() => return Ok(Resolved::Directory(target)),
            Ok(_) => return Ok(Resolved::File(target)),
            Err(err) if err.kind() != io::ErrorKind::NotFound => return Err(err.into()),
            Err(_) => {}
        }

        // Suffix-less lookup applies only to missing paths whose final
        // segment has no extension.
        if self.lookup_with_suffix && !url_path.ends_with('/') {
            if let Some(name) = segments.last().filter(|name| !name.contains('.')) {
                for suffix in LOOKUP_SUFFIXES {
                    let candidate = target.with_file_name(format!("{name}.{suffix}"));
                    match fs::metadata(&candidate).await {
                        Ok(meta) if meta.is_file() => return Ok(Resolved::File(candidate)),
                        Ok(_) => {}
                        Err(err) if err.kind() != io::ErrorKind::NotFound => {
                            return Err(err.into())
                        }
                        Err(_) => {}
                    }
                }
            }
        }

        Err(ResolveError::NotFound)
    }

    /// List a directory for presentation: dotfile entries dropped when
    /// hidden, directories first, then case-insensitive by name.
    pub async fn list_dir(&self, dir: &Path) -> io::Result<Vec<DirEntry>> {
        let mut entries = Vec::new();
        let mut reader = fs::read_dir(dir).await?;
        while let Some(entry) = reader.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            if self.hide_dot_files && name.starts_with('.') {
                continue;
            }
            let meta = entry.metadata().await?;
            entries.push(DirEntry {
                name,
                is_dir: meta.is_dir(),
                size: meta.len(),
            });
        }
        entries.sort_by(|a, b| {
            b.is_dir
                .cmp(&a.is_dir)
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        });
        Ok(entries)
    }

    /// Decode and split a URL path, enforcing the traversal and dotfile
    /// policies. Empty and `.` segments are dropped.
    fn sanitize(&self, url_path: &str) -> Result<Vec<String>, ResolveError> {
        let decoded = urlencoding::decode(url_path).map_err(|_| ResolveError::InvalidPath)?;
        let mut segments = Vec::new();
        for segment in decoded.split('/') {
            match segment {
                "" | "." => continue,
                ".." => return Err(ResolveError::InvalidPath),
                _ => {}
            }
            if self.hide_dot_files && segment.starts_with('.') {
                return Err(ResolveError::NotFound);
            }
            segments.push(segment.to_string());
        }
        Ok(segments)
    }
}

/// A single presentable directory entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
    pub size: u64,
}
