//! JSON-document repository: one file per task inside a storage directory.

use async_trait::async_trait;
use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use std::io;
use std::sync::Arc;

use crate::task::{
    domain::{Task, TaskId},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

const EXTENSION: &str = ".json";

/// Filesystem-backed task repository.
///
/// Records are stored as `<task-id>.json`. Writes go through a temporary
/// file and a rename so a crash never leaves a half-written record.
#[derive(Debug, Clone)]
pub struct JsonFileTaskRepository {
    dir: Arc<Dir>,
}

impl JsonFileTaskRepository {
    /// Opens the storage directory, creating it when missing.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] when the directory cannot
    /// be created or opened.
    pub fn open(path: &Utf8Path) -> TaskRepositoryResult<Self> {
        std::fs::create_dir_all(path).map_err(TaskRepositoryError::persistence)?;
        let dir = Dir::open_ambient_dir(path, ambient_authority())
            .map_err(TaskRepositoryError::persistence)?;
        Ok(Self::from_dir(dir))
    }

    /// Wraps an already opened directory capability.
    #[must_use]
    pub fn from_dir(dir: Dir) -> Self {
        Self { dir: Arc::new(dir) }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&Dir) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let dir = Arc::clone(&self.dir);
        tokio::task::spawn_blocking(move || f(&dir))
            .await
            .map_err(TaskRepositoryError::persistence)?
    }
}

fn file_name(id: TaskId) -> String {
    format!("{id}{EXTENSION}")
}

#[async_trait]
impl TaskRepository for JsonFileTaskRepository {
    async fn save(&self, task: &Task) -> TaskRepositoryResult<()> {
        let name = file_name(task.id());
        let document = serde_json::to_vec_pretty(task).map_err(TaskRepositoryError::persistence)?;

        self.run_blocking(move |dir| {
            let staging = format!("{name}.tmp");
            dir.write(&staging, &document)
                .map_err(TaskRepositoryError::persistence)?;
            dir.rename(&staging, dir, &name)
                .map_err(TaskRepositoryError::persistence)
        })
        .await
    }

    async fn delete(&self, task: &Task) -> TaskRepositoryResult<()> {
        let id = task.id();
        self.run_blocking(move |dir| match dir.remove_file(file_name(id)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                Err(TaskRepositoryError::NotFound(id))
            }
            Err(err) => Err(TaskRepositoryError::persistence(err)),
        })
        .await
    }

    async fn load_all(&self) -> TaskRepositoryResult<Vec<Task>> {
        self.run_blocking(|dir| {
            let mut tasks = Vec::new();
            for item in dir.entries().map_err(TaskRepositoryError::persistence)? {
                let entry = item.map_err(TaskRepositoryError::persistence)?;
                let name = entry.file_name().map_err(TaskRepositoryError::persistence)?;
                if !name.ends_with(EXTENSION) {
                    continue;
                }
                let document = dir
                    .read_to_string(&name)
                    .map_err(TaskRepositoryError::persistence)?;
                let task: Task =
                    serde_json::from_str(&document).map_err(TaskRepositoryError::persistence)?;
                tasks.push(task);
            }
            Ok(tasks)
        })
        .await
    }
}
