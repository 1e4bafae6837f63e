//! # File I/O Module
//!
//! Reading and writing the JSON files of a foundation job:
//! - **Projects** (`.geo`): the whole job, schema-versioned
//! - **Coefficient sets**: standalone tables shared between jobs
//! - **Borehole files**: boring logs keyed by name, as exported by the
//!   field data-entry tool (legacy Portuguese keys accepted)
//!
//! Every write is atomic: JSON goes to a `.tmp` sibling, is synced to disk
//! and renamed over the target. Projects on shared drives are guarded by a
//! [`FileLock`] (OS lock plus a `.geo.lock` file naming the holder).
//!
//! ## Example
//!
//! ```rust,no_run
//! use pile_core::file_io::{save_project, load_project, FileLock};
//! use pile_core::project::Project;
//! use std::path::Path;
//!
//! let project = Project::new("Engineer", "25-001", "Client");
//! let path = Path::new("foundation.geo");
//!
//! let lock = FileLock::acquire(path, "engineer@company.com").unwrap();
//! save_project(&project, path).unwrap();
//! drop(lock);
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::borehole::BoreholeRegistry;
use crate::coefficients::CoefficientSet;
use crate::errors::{CalcError, CalcResult};
use crate::project::{Project, SCHEMA_VERSION};

/// Project file extension
pub const PROJECT_EXTENSION: &str = "geo";

/// Contents of a `.geo.lock` file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockInfo {
    /// User identifier (email or username)
    pub user_id: String,
    /// Machine name where lock was acquired
    pub machine: String,
    /// Process ID that holds the lock
    pub pid: u32,
    pub locked_at: DateTime<Utc>,
}

impl LockInfo {
    /// Lock info for the current process
    pub fn new(user_id: impl Into<String>) -> Self {
        LockInfo {
            user_id: user_id.into(),
            machine: hostname().unwrap_or_else(|| "unknown".to_string()),
            pid: std::process::id(),
            locked_at: Utc::now(),
        }
    }

    /// The holder's process is gone, or the lock is older than a day
    fn is_stale(&self) -> bool {
        if hostname().as_deref() == Some(self.machine.as_str()) && !process_alive(self.pid) {
            return true;
        }
        (Utc::now() - self.locked_at).num_hours() > 24
    }
}

fn hostname() -> Option<String> {
    #[cfg(windows)]
    {
        std::env::var("COMPUTERNAME").ok()
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOSTNAME").ok().or_else(|| std::env::var("HOST").ok())
    }
}

#[cfg(unix)]
fn process_alive(pid: u32) -> bool {
    Path::new(&format!("/proc/{}", pid)).exists()
}

#[cfg(windows)]
fn process_alive(pid: u32) -> bool {
    use std::process::Command;
    match Command::new("tasklist")
        .args(["/FI", &format!("PID eq {}", pid), "/NH"])
        .output()
    {
        Ok(output) => String::from_utf8_lossy(&output.stdout).contains(&pid.to_string()),
        Err(_) => true,
    }
}

#[cfg(not(any(unix, windows)))]
fn process_alive(_pid: u32) -> bool {
    true
}

/// Exclusive lock on a project file, released on drop.
pub struct FileLock {
    project_path: PathBuf,
    lock_path: PathBuf,
    /// Holds the OS-level lock
    _lock_file: File,
    pub info: LockInfo,
}

impl FileLock {
    /// Acquire an exclusive lock on a project file.
    ///
    /// A lock left behind by a dead process (or older than 24 h) is taken
    /// over.
    ///
    /// # Returns
    ///
    /// * `Ok(FileLock)` - Lock acquired
    /// * `Err(CalcError::FileLocked)` - Someone else holds the lock
    pub fn acquire(path: &Path, user_id: impl Into<String>) -> CalcResult<Self> {
        let lock_path = lock_path_for(path);
        if let Some(existing) = FileLock::check(path) {
            return Err(CalcError::file_locked(
                path.display().to_string(),
                format!("{} ({})", existing.user_id, existing.machine),
                existing.locked_at.to_rfc3339(),
            ));
        }

        let mut lock_file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&lock_path)
            .map_err(|e| io_error("create lock", &lock_path, e))?;

        lock_file.try_lock_exclusive().map_err(|_| {
            CalcError::file_locked(path.display().to_string(), "another process", "unknown")
        })?;

        let info = LockInfo::new(user_id);
        let lock_json = serde_json::to_string_pretty(&info)?;
        lock_file
            .write_all(lock_json.as_bytes())
            .and_then(|_| lock_file.sync_all())
            .map_err(|e| io_error("write lock", &lock_path, e))?;

        debug!(path = %path.display(), user = %info.user_id, "lock acquired");
        Ok(FileLock {
            project_path: path.to_path_buf(),
            lock_path,
            _lock_file: lock_file,
            info,
        })
    }

    /// Current holder of the lock, if any live one exists.
    pub fn check(path: &Path) -> Option<LockInfo> {
        let info: LockInfo = read_json(&lock_path_for(path), "read lock").ok()?;
        (!info.is_stale()).then_some(info)
    }

    pub fn project_path(&self) -> &Path {
        &self.project_path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.lock_path);
    }
}

/// `foundation.geo` -> `foundation.geo.lock`
fn lock_path_for(project_path: &Path) -> PathBuf {
    sibling_with_suffix(project_path, "lock")
}

fn sibling_with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let extension = path
        .extension()
        .map(|e| format!("{}.{}", e.to_string_lossy(), suffix))
        .unwrap_or_else(|| suffix.to_string());
    path.with_extension(extension)
}

fn io_error(operation: &str, path: &Path, e: std::io::Error) -> CalcError {
    CalcError::file_error(operation, path.display().to_string(), e.to_string())
}

/// Serialize `value` to `path` via tmp file, fsync and rename.
fn write_json_atomic<T: Serialize>(value: &T, path: &Path) -> CalcResult<()> {
    let json = serde_json::to_string_pretty(value)?;
    let tmp_path = sibling_with_suffix(path, "tmp");

    let mut tmp_file =
        File::create(&tmp_path).map_err(|e| io_error("create temp file", &tmp_path, e))?;
    tmp_file
        .write_all(json.as_bytes())
        .and_then(|_| tmp_file.sync_all())
        .map_err(|e| io_error("write temp file", &tmp_path, e))?;
    drop(tmp_file);

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        io_error("rename to final", path, e)
    })
}

fn read_json<T: DeserializeOwned>(path: &Path, operation: &str) -> CalcResult<T> {
    let contents = fs::read_to_string(path).map_err(|e| io_error(operation, path, e))?;
    serde_json::from_str(&contents).map_err(|e| CalcError::SerializationError {
        reason: format!("Invalid JSON in {}: {}", path.display(), e),
    })
}

/// Save a project with atomic write semantics.
pub fn save_project(project: &Project, path: &Path) -> CalcResult<()> {
    write_json_atomic(project, path)?;
    info!(
        path = %path.display(),
        items = project.item_count(),
        boreholes = project.boreholes.len(),
        "project saved"
    );
    Ok(())
}

/// Load a project from a file.
///
/// # Returns
///
/// * `Ok(Project)` - Successfully loaded project
/// * `Err(CalcError::VersionMismatch)` - File version is incompatible
/// * `Err(CalcError::SerializationError)` - Invalid JSON
/// * `Err(CalcError::FileError)` - I/O error
pub fn load_project(path: &Path) -> CalcResult<Project> {
    let project: Project = read_json(path, "open")?;
    validate_version(&project.meta.version)?;
    if let Err(e) = project.coefficients.validate() {
        warn!(path = %path.display(), error = %e, "project has invalid coefficients");
    }
    info!(
        path = %path.display(),
        job = %project.meta.job_id,
        items = project.item_count(),
        "project loaded"
    );
    Ok(project)
}

/// Load a project along with the current lock holder, if any.
///
/// A project locked by someone else is still returned, to be opened
/// read-only.
pub fn load_project_with_lock_check(path: &Path) -> CalcResult<(Project, Option<LockInfo>)> {
    let project = load_project(path)?;
    Ok((project, FileLock::check(path)))
}

/// Load a standalone coefficient set. Values are validated on load.
pub fn load_coefficients(path: &Path) -> CalcResult<CoefficientSet> {
    let set: CoefficientSet = read_json(path, "open")?;
    set.validate()?;
    debug!(
        path = %path.display(),
        aoki_velloso = set.aoki_velloso.len(),
        decourt_quaresma = set.decourt_quaresma.len(),
        "coefficients loaded"
    );
    Ok(set)
}

pub fn save_coefficients(set: &CoefficientSet, path: &Path) -> CalcResult<()> {
    write_json_atomic(set, path)
}

/// Load a borehole file (name -> record).
pub fn load_boreholes(path: &Path) -> CalcResult<BoreholeRegistry> {
    let registry: BoreholeRegistry = read_json(path, "open")?;
    debug!(path = %path.display(), boreholes = registry.len(), "boreholes loaded");
    Ok(registry)
}

pub fn save_boreholes(registry: &BoreholeRegistry, path: &Path) -> CalcResult<()> {
    write_json_atomic(registry, path)
}

/// Major must match; in 0.x a newer minor is also refused.
fn validate_version(file_version: &str) -> CalcResult<()> {
    let parse = |v: &str| -> Vec<u32> { v.split('.').filter_map(|p| p.parse().ok()).collect() };
    let file_parts = parse(file_version);
    let current_parts = parse(SCHEMA_VERSION);
    let mismatch = || CalcError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    let (Some(&file_major), Some(&current_major)) = (file_parts.first(), current_parts.first())
    else {
        return Err(mismatch());
    };
    if file_major != current_major {
        return Err(mismatch());
    }
    if current_major == 0 {
        if let (Some(file_minor), Some(current_minor)) = (file_parts.get(1), current_parts.get(1)) {
            if file_minor > current_minor {
                return Err(mismatch());
            }
        }
    }
    Ok(())
}
