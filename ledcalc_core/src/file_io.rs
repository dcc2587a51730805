//! # File I/O Module
//!
//! Project file operations:
//! - **Atomic saves**: write `.ledp.tmp`, fsync, rename over the target
//! - **File locking**: keep two planners from editing the same file on a
//!   shared drive
//! - **Version validation**: refuse files written by an incompatible schema
//!
//! ## File Format
//!
//! Projects are saved as `.ledp` files containing pretty-printed JSON.
//! Lock files sit next to them as `.ledp.lock` and record who holds the lock.
//!
//! ## Example
//!
//! ```rust,no_run
//! use ledcalc_core::file_io::{save_project, load_project, FileLock};
//! use ledcalc_core::project::Project;
//! use std::path::Path;
//!
//! let project = Project::new("Summer Festival", "ACME Events");
//! let path = Path::new("festival.ledp");
//!
//! let lock = FileLock::acquire(path, "planner@example.com").unwrap();
//! save_project(&project, path).unwrap();
//! drop(lock);
//!
//! let loaded = load_project(path).unwrap();
//! assert_eq!(loaded.config.event.event_name, "Summer Festival");
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::project::{Project, SCHEMA_VERSION};

/// Extension of project files
pub const PROJECT_EXTENSION: &str = "ledp";

/// Locks older than this are considered abandoned
const STALE_LOCK_HOURS: i64 = 24;

/// Contents of a `.ledp.lock` file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockInfo {
    /// Who holds the lock (email or username)
    pub user_id: String,
    /// Host the lock was taken on
    pub machine: String,
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

    /// `user (machine)` for messages
    pub fn holder(&self) -> String {
        format!("{} ({})", self.user_id, self.machine)
    }

    /// A lock is stale when its process is gone (same host only) or it
    /// is older than a day.
    pub fn is_stale(&self) -> bool {
        if hostname().as_deref() == Some(self.machine.as_str()) && !process_alive(self.pid) {
            return true;
        }
        (Utc::now() - self.locked_at).num_hours() > STALE_LOCK_HOURS
    }
}

fn hostname() -> Option<String> {
    #[cfg(windows)]
    {
        std::env::var("COMPUTERNAME").ok()
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOSTNAME")
            .ok()
            .or_else(|| std::env::var("HOST").ok())
    }
}

#[cfg(unix)]
fn process_alive(pid: u32) -> bool {
    Path::new(&format!("/proc/{}", pid)).exists()
}

#[cfg(windows)]
fn process_alive(pid: u32) -> bool {
    std::process::Command::new("tasklist")
        .args(["/FI", &format!("PID eq {}", pid), "/NH"])
        .output()
        .map(|out| String::from_utf8_lossy(&out.stdout).contains(&pid.to_string()))
        .unwrap_or(true)
}

#[cfg(not(any(unix, windows)))]
fn process_alive(_pid: u32) -> bool {
    true
}

/// Exclusive lock on a project file, released on drop.
///
/// Holds an OS-level lock (fs2) on the sidecar file and writes a
/// [`LockInfo`] into it so other users can see who is editing.
#[derive(Debug)]
pub struct FileLock {
    project_path: PathBuf,
    lock_path: PathBuf,
    _handle: File,
    pub info: LockInfo,
}

impl FileLock {
    /// Acquire the lock for `path`.
    ///
    /// Fails with `FileLocked` if a live lock exists; stale locks are
    /// taken over with a warning.
    ///
    /// ```rust,no_run
    /// use ledcalc_core::file_io::FileLock;
    /// use std::path::Path;
    ///
    /// let lock = FileLock::acquire(Path::new("show.ledp"), "planner@example.com")?;
    /// drop(lock);
    /// # Ok::<(), ledcalc_core::errors::CalcError>(())
    /// ```
    pub fn acquire(path: &Path, user_id: impl Into<String>) -> CalcResult<Self> {
        let lock_path = lock_path_for(path);

        let existing = read_lock_info(&lock_path).ok();
        if let Some(existing) = &existing {
            if !existing.is_stale() {
                return Err(CalcError::file_locked(
                    path.display().to_string(),
                    existing.holder(),
                    existing.locked_at.to_rfc3339(),
                ));
            }
            log::warn!(
                "taking over stale lock on {} held by {}",
                path.display(),
                existing.holder()
            );
        }

        let lock_err = |op: &str, e: std::io::Error| {
            CalcError::file_error(op, lock_path.display().to_string(), e.to_string())
        };

        let mut handle = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| lock_err("create lock", e))?;

        // The holder's info stays intact until the OS lock is ours
        handle.try_lock_exclusive().map_err(|_| match &existing {
            Some(info) => CalcError::file_locked(
                path.display().to_string(),
                info.holder(),
                info.locked_at.to_rfc3339(),
            ),
            None => CalcError::file_locked(path.display().to_string(), "another process", "unknown"),
        })?;

        handle.set_len(0).map_err(|e| lock_err("reset lock", e))?;
        handle
            .seek(SeekFrom::Start(0))
            .map_err(|e| lock_err("reset lock", e))?;

        let info = LockInfo::new(user_id);
        handle
            .write_all(to_json(&info)?.as_bytes())
            .map_err(|e| lock_err("write lock", e))?;
        handle.sync_all().map_err(|e| lock_err("sync lock", e))?;

        log::debug!("locked {} for {}", path.display(), info.holder());
        Ok(FileLock {
            project_path: path.to_path_buf(),
            lock_path,
            _handle: handle,
            info,
        })
    }

    /// Current holder of a live lock, if any, without taking it.
    pub fn check(path: &Path) -> Option<LockInfo> {
        read_lock_info(&lock_path_for(path))
            .ok()
            .filter(|info| !info.is_stale())
    }

    /// The locked project file
    pub fn project_path(&self) -> &Path {
        &self.project_path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.lock_path);
    }
}

/// `show.ledp` -> `show.ledp.lock`
fn lock_path_for(project_path: &Path) -> PathBuf {
    sidecar_path(project_path, "lock")
}

/// `show.ledp` -> `show.ledp.<suffix>`
fn sidecar_path(project_path: &Path, suffix: &str) -> PathBuf {
    let mut path = project_path.to_path_buf();
    let extension = match project_path.extension() {
        Some(ext) => format!("{}.{}", ext.to_string_lossy(), suffix),
        None => suffix.to_string(),
    };
    path.set_extension(extension);
    path
}

fn read_lock_info(lock_path: &Path) -> CalcResult<LockInfo> {
    let contents = read_to_string(lock_path, "read lock")?;
    serde_json::from_str(&contents).map_err(|e| CalcError::SerializationError {
        reason: e.to_string(),
    })
}

fn read_to_string(path: &Path, operation: &str) -> CalcResult<String> {
    let mut file = File::open(path)
        .map_err(|e| CalcError::file_error(operation, path.display().to_string(), e.to_string()))?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| CalcError::file_error(operation, path.display().to_string(), e.to_string()))?;
    Ok(contents)
}

fn to_json<T: Serialize>(value: &T) -> CalcResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| CalcError::SerializationError {
        reason: e.to_string(),
    })
}

/// Save a project with atomic write semantics.
///
/// The JSON goes to `<path>.tmp` first, is synced to disk, then renamed
/// over `path`. An interrupted save leaves the previous file intact.
///
/// ```rust,no_run
/// use ledcalc_core::file_io::save_project;
/// use ledcalc_core::project::Project;
/// use std::path::Path;
///
/// save_project(&Project::default(), Path::new("show.ledp"))?;
/// # Ok::<(), ledcalc_core::errors::CalcError>(())
/// ```
pub fn save_project(project: &Project, path: &Path) -> CalcResult<()> {
    let json = to_json(project)?;
    let tmp_path = sidecar_path(path, "tmp");
    let tmp_err = |op: &str, e: std::io::Error| {
        CalcError::file_error(op, tmp_path.display().to_string(), e.to_string())
    };

    let mut tmp_file = File::create(&tmp_path).map_err(|e| tmp_err("create temp file", e))?;
    tmp_file
        .write_all(json.as_bytes())
        .map_err(|e| tmp_err("write temp file", e))?;
    tmp_file.sync_all().map_err(|e| tmp_err("sync temp file", e))?;
    drop(tmp_file);

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        CalcError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    log::debug!("saved project to {}", path.display());
    Ok(())
}

/// Load a project file.
///
/// # Errors
///
/// * `FileError` - the file cannot be read
/// * `SerializationError` - the file is not a valid project
/// * `VersionMismatch` - written by an incompatible schema
/// * `InvalidInput` - the stored configuration fails validation
pub fn load_project(path: &Path) -> CalcResult<Project> {
    let contents = read_to_string(path, "read")?;
    let project: Project = serde_json::from_str(&contents).map_err(|e| CalcError::SerializationError {
        reason: format!("Invalid project file {}: {}", path.display(), e),
    })?;

    validate_version(&project.meta.version)?;
    project.config.validate()?;

    log::debug!(
        "loaded {} ({} modules in catalog)",
        path.display(),
        project.catalog.len()
    );
    Ok(project)
}

/// Load a project and report whether someone else holds its lock.
///
/// `Some(LockInfo)` means the caller should treat the project as read-only.
pub fn load_project_with_lock_check(path: &Path) -> CalcResult<(Project, Option<LockInfo>)> {
    let project = load_project(path)?;
    Ok((project, FileLock::check(path)))
}

/// Check a file's schema version against [`SCHEMA_VERSION`].
///
/// The major version must match. While the schema is 0.x, files with a
/// newer minor version are rejected as well.
pub fn validate_version(file_version: &str) -> CalcResult<()> {
    let mismatch = || CalcError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };
    let parse = |v: &str| -> Option<(u32, u32)> {
        let mut parts = v.split('.').map(|p| p.parse::<u32>());
        let major = parts.next()?.ok()?;
        let minor = parts.next().and_then(|p| p.ok()).unwrap_or(0);
        Some((major, minor))
    };

    let (file_major, file_minor) = parse(file_version).ok_or_else(mismatch)?;
    let (major, minor) = parse(SCHEMA_VERSION).ok_or_else(mismatch)?;

    if file_major != major || (major == 0 && file_minor > minor) {
        return Err(mismatch());
    }
    Ok(())
}
