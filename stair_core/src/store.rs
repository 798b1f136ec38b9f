//! # Project Store
//!
//! Owns the list of saved [`StairProject`]s and the single file that
//! persists it. The list is newest-first by save order; the project `date`
//! plays no part in ordering.
//!
//! Every mutation rewrites the whole file before returning. Read problems
//! (corrupt content, unknown schema) are logged and replaced by an empty
//! list. Write problems are logged and recorded, and the in-memory list is
//! kept as is: after a failed write [`ProjectStore::is_synced`] is `false`
//! until a later write succeeds.
//!
//! Mutating methods take `&mut self`. Share a store between threads with
//! `Arc<Mutex<ProjectStore>>`.
//!
//! ## Example
//!
//! ```rust,no_run
//! use chrono::Utc;
//! use stair_core::calculations::CalculationInput;
//! use stair_core::project::StairProject;
//! use stair_core::store::ProjectStore;
//!
//! let mut store = ProjectStore::load("stair_projects.json");
//! store.save(StairProject::snapshot(CalculationInput::default(), Utc::now()));
//! assert_eq!(store.len(), 1);
//!
//! let removed = store.delete([0]);
//! assert_eq!(removed.len(), 1);
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::StoreConfig;
use crate::errors::{StairError, StairResult};
use crate::file_io::{read_optional, write_atomic, FileLock};
use crate::project::{decode_projects, encode_projects, StairProject};

/// Callback run with the current list after every mutation.
pub type ChangeListener = Box<dyn FnMut(&[StairProject]) + Send>;

/// Read the project list at `path`, surfacing every problem.
///
/// A missing file is an empty list, not an error.
pub fn try_load_projects(path: &Path) -> StairResult<Vec<StairProject>> {
    match read_optional(path)? {
        Some(contents) => decode_projects(&contents, &path.display().to_string()),
        None => Ok(Vec::new()),
    }
}

/// Read the project list at `path`, substituting an empty list on failure.
pub fn load_projects(path: &Path) -> Vec<StairProject> {
    match try_load_projects(path) {
        Ok(projects) => {
            log::debug!("Loaded {} project(s) from {}", projects.len(), path.display());
            projects
        }
        Err(e) if e.is_corrupt_data() => {
            log::error!("Discarding unreadable project list: {}", e);
            Vec::new()
        }
        Err(e) => {
            log::warn!("Starting with no projects: {}", e);
            Vec::new()
        }
    }
}

/// Owner of the saved project list and its file.
pub struct ProjectStore {
    path: PathBuf,
    projects: Vec<StairProject>,
    last_write_error: Option<StairError>,
    listeners: Vec<ChangeListener>,
    _lock: Option<FileLock>,
}

impl ProjectStore {
    /// Load the store at `path` without taking a file lock.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let projects = load_projects(&path);
        ProjectStore {
            path,
            projects,
            last_write_error: None,
            listeners: Vec::new(),
            _lock: None,
        }
    }

    /// Open a store from configuration.
    ///
    /// Fails only when `config.lock_file` is set and another process holds
    /// the lock; read problems still fall back to an empty list.
    pub fn open(config: &StoreConfig) -> StairResult<Self> {
        let lock = if config.lock_file {
            Some(FileLock::acquire(&config.path)?)
        } else {
            None
        };

        let mut store = ProjectStore::load(config.path.clone());
        store._lock = lock;
        Ok(store)
    }

    /// Replace the in-memory list with the file's current contents.
    pub fn reload(&mut self) {
        self.projects = load_projects(&self.path);
        self.last_write_error = None;
        self.notify();
    }

    /// Insert `project` at the front of the list, then persist.
    pub fn save(&mut self, project: StairProject) {
        log::debug!("Saving project {}", project.id());
        self.projects.insert(0, project);
        self.persist();
        self.notify();
    }

    /// Remove the projects at `positions`, then persist.
    ///
    /// Positions refer to the list before removal. Duplicates are collapsed
    /// and out-of-range positions are skipped. Returns the removed projects
    /// in list order.
    pub fn delete<I>(&mut self, positions: I) -> Vec<StairProject>
    where
        I: IntoIterator<Item = usize>,
    {
        let positions: BTreeSet<usize> = positions.into_iter().collect();
        let mut removed = Vec::with_capacity(positions.len());

        for &position in positions.iter().rev() {
            if position < self.projects.len() {
                removed.push(self.projects.remove(position));
            } else {
                log::warn!(
                    "Ignoring delete of position {} (list has {} project(s))",
                    position,
                    self.projects.len()
                );
            }
        }
        removed.reverse();

        self.persist();
        self.notify();
        removed
    }

    /// Write the current list to disk, returning the outcome.
    ///
    /// Mutations call this implicitly; call it directly to retry after a
    /// failed write.
    pub fn flush(&mut self) -> StairResult<()> {
        let result = encode_projects(&self.projects).and_then(|json| write_atomic(&self.path, &json));
        match &result {
            Ok(()) => {
                log::debug!("Wrote {} project(s) to {}", self.projects.len(), self.path.display());
                self.last_write_error = None;
            }
            Err(e) => {
                log::error!("Error saving projects: {}", e);
                self.last_write_error = Some(e.clone());
            }
        }
        result
    }

    /// Register a callback run after every mutation.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&[StairProject]) + Send + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    pub fn projects(&self) -> &[StairProject] {
        &self.projects
    }

    pub fn get(&self, position: usize) -> Option<&StairProject> {
        self.projects.get(position)
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `false` when the last write failed and memory differs from disk.
    pub fn is_synced(&self) -> bool {
        self.last_write_error.is_none()
    }

    pub fn last_write_error(&self) -> Option<&StairError> {
        self.last_write_error.as_ref()
    }

    fn persist(&mut self) {
        // Failure is logged and recorded by flush
        let _ = self.flush();
    }

    fn notify(&mut self) {
        for listener in &mut self.listeners {
            listener(&self.projects);
        }
    }
}

impl fmt::Debug for ProjectStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProjectStore")
            .field("path", &self.path)
            .field("projects", &self.projects.len())
            .field("synced", &self.is_synced())
            .field("listeners", &self.listeners.len())
            .field("locked", &self._lock.is_some())
            .finish()
    }
}
