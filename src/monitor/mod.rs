//! Persistent set of identifiers still waiting to become available.
//!
//! The set lives in a plain UTF-8 text file, one identifier per line. It is
//! appended to by [`MonitoredSet::add`] and rewritten once per
//! [`MonitoredSet::sweep`], dropping every identifier that resolved.
//!
//! # Example
//!
//! ```ignore
//! use scimon_core::monitor::{AddOutcome, MonitoredSet};
//!
//! let set = MonitoredSet::new("/home/me/.scimon/doi_urls.txt");
//! if set.add("10.1000/xyz123").await? == AddOutcome::Added {
//!     println!("now monitoring");
//! }
//!
//! let report = set.sweep(&resolver, &observer).await?;
//! println!("{} resolved, {} pending", report.resolved.len(), report.pending.len());
//! ```

mod error;

pub use error::MonitorError;

use std::collections::HashSet;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument};

use crate::resolver::{Resolution, Resolver};

/// Result type for monitored-set operations.
pub type Result<T> = std::result::Result<T, MonitorError>;

/// Outcome of [`MonitoredSet::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// The identifier was appended.
    Added,
    /// The identifier was already monitored; the file is unchanged.
    AlreadyPresent,
}

/// Summary of one sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Distinct identifiers checked, in file order.
    pub checked: usize,
    /// Identifiers that resolved and were removed.
    pub resolved: Vec<String>,
    /// Identifiers written back to the file.
    pub pending: Vec<String>,
}

/// Callback invoked after each identifier is resolved during a sweep.
///
/// Reporting, notification and downloading hang off this hook; none of them
/// can abort the sweep.
#[async_trait]
pub trait SweepObserver: Send + Sync {
    /// Called once per distinct identifier, in file order.
    async fn on_resolved(&self, identifier: &str, resolution: &Resolution);
}

/// Observer that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

#[async_trait]
impl SweepObserver for NoopObserver {
    async fn on_resolved(&self, _identifier: &str, _resolution: &Resolution) {}
}

/// File-backed, deduplicated, insertion-ordered identifier list.
#[derive(Debug, Clone)]
pub struct MonitoredSet {
    path: PathBuf,
}

impl MonitoredSet {
    /// Creates a handle for the list at `path`. Nothing is touched until first use.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the list file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the monitored identifiers in file order.
    ///
    /// Empty lines are skipped and each line is trimmed. A missing file (and
    /// its parent directories) is created empty.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::Io`] if the file cannot be created or read.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub async fn load(&self) -> Result<Vec<String>> {
        let content = self.read_or_create().await?;
        let identifiers: Vec<String> = parse_lines(&content);
        debug!(count = identifiers.len(), "loaded monitored list");
        Ok(identifiers)
    }

    /// Adds `identifier` unless it is already monitored.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::EmptyIdentifier`] for a blank identifier and
    /// [`MonitorError::Io`] if the file cannot be read or appended to.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub async fn add(&self, identifier: &str) -> Result<AddOutcome> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Err(MonitorError::EmptyIdentifier);
        }

        let content = self.read_or_create().await?;
        if content.lines().map(str::trim).any(|line| line == identifier) {
            debug!(identifier, "already monitored");
            return Ok(AddOutcome::AlreadyPresent);
        }

        let mut entry = String::with_capacity(identifier.len() + 2);
        if !content.is_empty() && !content.ends_with('\n') {
            entry.push('\n');
        }
        entry.push_str(identifier);
        entry.push('\n');

        let mut file = fs::OpenOptions::new()
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| MonitorError::io(&self.path, e))?;
        file.write_all(entry.as_bytes())
            .await
            .map_err(|e| MonitorError::io(&self.path, e))?;
        file.flush()
            .await
            .map_err(|e| MonitorError::io(&self.path, e))?;

        info!(identifier, "identifier added to monitored list");
        Ok(AddOutcome::Added)
    }

    /// Resolves every monitored identifier and drops the ones now available.
    ///
    /// Identifiers are resolved one at a time in file order; duplicates in a
    /// hand-edited file are checked once. The file is replaced once at the end.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::Io`] if the list cannot be loaded, or
    /// [`MonitorError::Rewrite`] (carrying the pending identifiers) if it cannot
    /// be replaced.
    #[instrument(skip(self, resolver, observer), fields(path = %self.path.display()))]
    pub async fn sweep(
        &self,
        resolver: &dyn Resolver,
        observer: &dyn SweepObserver,
    ) -> Result<SweepReport> {
        let identifiers = dedup_preserving_order(self.load().await?);
        let mut report = SweepReport {
            checked: identifiers.len(),
            ..SweepReport::default()
        };

        for identifier in identifiers {
            let resolution = resolver.resolve(&identifier).await;
            observer.on_resolved(&identifier, &resolution).await;
            if resolution.available {
                report.resolved.push(identifier);
            } else {
                report.pending.push(identifier);
            }
        }

        if let Err(error) = self.write_atomically(&report.pending).await {
            return Err(MonitorError::rewrite(&self.path, report.pending, error));
        }

        info!(
            checked = report.checked,
            resolved = report.resolved.len(),
            pending = report.pending.len(),
            "sweep complete"
        );
        Ok(report)
    }

    /// Replaces the list with `identifiers`, each followed by a newline.
    ///
    /// The new content goes to a temporary sibling file that is then renamed
    /// over the list, so readers never see a half-written list.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::Rewrite`] carrying `identifiers` on failure.
    pub async fn rewrite(&self, identifiers: &[String]) -> Result<()> {
        self.write_atomically(identifiers)
            .await
            .map_err(|e| MonitorError::rewrite(&self.path, identifiers.to_vec(), e))
    }

    async fn read_or_create(&self) -> Result<String> {
        match fs::read_to_string(&self.path).await {
            Ok(content) => Ok(content),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                if let Some(parent) = self.parent_dir() {
                    fs::create_dir_all(parent)
                        .await
                        .map_err(|e| MonitorError::io(parent, e))?;
                }
                fs::File::create(&self.path)
                    .await
                    .map_err(|e| MonitorError::io(&self.path, e))?;
                debug!("created empty monitored list");
                Ok(String::new())
            }
            Err(error) => Err(MonitorError::io(&self.path, error)),
        }
    }

    async fn write_atomically(&self, identifiers: &[String]) -> std::io::Result<()> {
        if let Some(parent) = self.parent_dir() {
            fs::create_dir_all(parent).await?;
        }

        let mut content = String::new();
        for identifier in identifiers {
            content.push_str(identifier);
            content.push('\n');
        }

        let temp_path = self.temp_path();
        let mut file = fs::File::create(&temp_path).await?;
        let written = async {
            file.write_all(content.as_bytes()).await?;
            file.sync_all().await
        }
        .await;
        drop(file);

        if let Err(error) = written {
            let _ = fs::remove_file(&temp_path).await;
            return Err(error);
        }
        if let Err(error) = fs::rename(&temp_path, &self.path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(error);
        }
        debug!(count = identifiers.len(), "monitored list rewritten");
        Ok(())
    }

    fn parent_dir(&self) -> Option<&Path> {
        self.path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = OsString::from(".");
        name.push(self.path.file_name().unwrap_or(OsStr::new("monitored")));
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

fn parse_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn dedup_preserving_order(identifiers: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(identifiers.len());
    identifiers
        .into_iter()
        .filter(|identifier| seen.insert(identifier.clone()))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use tempfile::TempDir;

    use super::*;

    /// Resolver answering available for a fixed set of identifiers.
    struct FixedResolver {
        available: Vec<&'static str>,
        calls: Mutex<Vec<String>>,
    }

    impl FixedResolver {
        fn new(available: &[&'static str]) -> Self {
            Self {
                available: available.to_vec(),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Resolver for FixedResolver {
        async fn resolve(&self, identifier: &str) -> Resolution {
            self.calls.lock().unwrap().push(identifier.to_string());
            if self.available.contains(&identifier) {
                Resolution::available(format!("https://m.test/{identifier}.pdf"))
            } else {
                Resolution::unavailable()
            }
        }
    }

    #[derive(Default)]
    struct RecordingObserver(Mutex<Vec<(String, bool)>>);

    #[async_trait]
    impl SweepObserver for RecordingObserver {
        async fn on_resolved(&self, identifier: &str, resolution: &Resolution) {
            self.0
                .lock()
                .unwrap()
                .push((identifier.to_string(), resolution.available));
        }
    }

    fn set_in(dir: &TempDir) -> MonitoredSet {
        MonitoredSet::new(dir.path().join("doi_urls.txt"))
    }

    #[tokio::test]
    async fn test_load_creates_missing_file_and_parents() {
        let dir = TempDir::new().unwrap();
        let set = MonitoredSet::new(dir.path().join("nested/state/doi_urls.txt"));
        assert!(set.load().await.unwrap().is_empty());
        assert!(set.path().exists());
    }

    #[tokio::test]
    async fn test_load_skips_blank_lines_and_trims() {
        let dir = TempDir::new().unwrap();
        let set = set_in(&dir);
        std::fs::write(set.path(), "10.1/a\r\n\n   \n 10.1/b \n").unwrap();
        assert_eq!(set.load().await.unwrap(), vec!["10.1/a", "10.1/b"]);
    }

    #[tokio::test]
    async fn test_add_twice_yields_one_line() {
        let dir = TempDir::new().unwrap();
        let set = set_in(&dir);
        assert_eq!(set.add("10.1000/xyz").await.unwrap(), AddOutcome::Added);
        assert_eq!(
            set.add("10.1000/xyz").await.unwrap(),
            AddOutcome::AlreadyPresent
        );
        assert_eq!(
            std::fs::read_to_string(set.path()).unwrap(),
            "10.1000/xyz\n"
        );
    }

    #[tokio::test]
    async fn test_add_preserves_insertion_order() {
        let dir = TempDir::new().unwrap();
        let set = set_in(&dir);
        for id in ["10.1/c", "10.1/a", "10.1/b"] {
            set.add(id).await.unwrap();
        }
        assert_eq!(set.load().await.unwrap(), vec!["10.1/c", "10.1/a", "10.1/b"]);
    }

    #[tokio::test]
    async fn test_add_repairs_missing_trailing_newline() {
        let dir = TempDir::new().unwrap();
        let set = set_in(&dir);
        std::fs::write(set.path(), "10.1/a").unwrap();
        set.add("10.1/b").await.unwrap();
        assert_eq!(
            std::fs::read_to_string(set.path()).unwrap(),
            "10.1/a\n10.1/b\n"
        );
    }

    #[tokio::test]
    async fn test_add_rejects_blank_identifier() {
        let dir = TempDir::new().unwrap();
        let set = set_in(&dir);
        assert!(matches!(
            set.add("   ").await,
            Err(MonitorError::EmptyIdentifier)
        ));
    }

    #[tokio::test]
    async fn test_add_trims_before_comparing() {
        let dir = TempDir::new().unwrap();
        let set = set_in(&dir);
        set.add("10.1/a").await.unwrap();
        assert_eq!(
            set.add("  10.1/a\n").await.unwrap(),
            AddOutcome::AlreadyPresent
        );
    }

    #[tokio::test]
    async fn test_sweep_removes_resolved_and_keeps_order() {
        let dir = TempDir::new().unwrap();
        let set = set_in(&dir);
        std::fs::write(set.path(), "10.1/a\n10.1/b\n10.1/c\n10.1/d\n").unwrap();

        let resolver = FixedResolver::new(&["10.1/b", "10.1/d"]);
        let observer = RecordingObserver::default();
        let report = set.sweep(&resolver, &observer).await.unwrap();

        assert_eq!(report.checked, 4);
        assert_eq!(report.resolved, vec!["10.1/b", "10.1/d"]);
        assert_eq!(report.pending, vec!["10.1/a", "10.1/c"]);
        assert_eq!(
            std::fs::read_to_string(set.path()).unwrap(),
            "10.1/a\n10.1/c\n"
        );
        assert_eq!(
            *observer.0.lock().unwrap(),
            vec![
                ("10.1/a".to_string(), false),
                ("10.1/b".to_string(), true),
                ("10.1/c".to_string(), false),
                ("10.1/d".to_string(), true),
            ]
        );
    }

    #[tokio::test]
    async fn test_sweep_collapses_duplicates() {
        let dir = TempDir::new().unwrap();
        let set = set_in(&dir);
        std::fs::write(set.path(), "10.1/a\n10.1/b\n10.1/a\n").unwrap();

        let resolver = FixedResolver::new(&[]);
        let report = set.sweep(&resolver, &NoopObserver).await.unwrap();

        assert_eq!(report.checked, 2);
        assert_eq!(*resolver.calls.lock().unwrap(), vec!["10.1/a", "10.1/b"]);
        assert_eq!(
            std::fs::read_to_string(set.path()).unwrap(),
            "10.1/a\n10.1/b\n"
        );
    }

    #[tokio::test]
    async fn test_sweep_all_resolved_leaves_empty_file() {
        let dir = TempDir::new().unwrap();
        let set = set_in(&dir);
        std::fs::write(set.path(), "10.1/a\n").unwrap();

        let report = set
            .sweep(&FixedResolver::new(&["10.1/a"]), &NoopObserver)
            .await
            .unwrap();

        assert!(report.pending.is_empty());
        assert!(set.path().exists());
        assert_eq!(std::fs::read_to_string(set.path()).unwrap(), "");
    }

    #[tokio::test]
    async fn test_sweep_empty_list_is_noop() {
        let dir = TempDir::new().unwrap();
        let set = set_in(&dir);
        let resolver = FixedResolver::new(&[]);
        let report = set.sweep(&resolver, &NoopObserver).await.unwrap();
        assert_eq!(report, SweepReport::default());
        assert!(resolver.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rewrite_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let set = set_in(&dir);
        set.rewrite(&["10.1/x".to_string()]).await.unwrap();

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![OsString::from("doi_urls.txt")]);
        assert_eq!(std::fs::read_to_string(set.path()).unwrap(), "10.1/x\n");
    }

    #[tokio::test]
    async fn test_rewrite_failure_carries_pending() {
        let dir = TempDir::new().unwrap();
        // A directory at the list path makes the rename fail.
        let path = dir.path().join("doi_urls.txt");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("keep"), "x").unwrap();

        let set = MonitoredSet::new(&path);
        let err = set.rewrite(&["10.1/a".to_string()]).await.unwrap_err();
        assert_eq!(err.pending(), Some(&["10.1/a".to_string()][..]));
    }

    #[test]
    fn test_dedup_preserving_order_keeps_first_occurrence() {
        let input = ["b", "a", "b", "c", "a"].map(String::from).to_vec();
        assert_eq!(dedup_preserving_order(input), vec!["b", "a", "c"]);
    }
}
