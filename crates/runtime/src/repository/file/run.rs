//! File-based RunRepository implementation.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use rogue_core::ItemInstance;
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::repository::{
    RepositoryError, Result, RunId, RunProgress, RunRecord, RunRepository,
};

/// On-disk document of one run: the checkpoint plus its items.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RunDocument {
    #[serde(flatten)]
    record: RunRecord,
    #[serde(default)]
    items: Vec<ItemInstance>,
}

/// File-based implementation of RunRepository.
///
/// # File Format
///
/// Each run is stored as `run_{id}.json` holding the [`RunRecord`] wire shape
/// plus an `items` array. Writes go to a temp file first and are renamed
/// into place, so a crash never leaves a half-written checkpoint.
///
/// Callers must serialize writes per run; concurrent advances of the same
/// run are not guarded against.
pub struct FileRunRepository {
    base_dir: PathBuf,
}

impl FileRunRepository {
    /// Create a new file-based run repository.
    pub async fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir).await?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn run_path(&self, run_id: RunId) -> PathBuf {
        self.base_dir.join(format!("run_{}.json", run_id))
    }

    async fn read(&self, run_id: RunId) -> Result<RunDocument> {
        let path = self.run_path(run_id);
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(RepositoryError::RunNotFound(run_id));
            }
            Err(e) => return Err(e.into()),
        };
        let document: RunDocument = serde_json::from_slice(&bytes)?;
        if document.record.id != run_id {
            return Err(RepositoryError::CorruptedData(format!(
                "{} holds run {}",
                path.display(),
                document.record.id
            )));
        }
        Ok(document)
    }

    async fn write(&self, document: &RunDocument) -> Result<()> {
        let path = self.run_path(document.record.id);
        let temp_path = path.with_extension("json.tmp");

        let bytes = serde_json::to_vec_pretty(document)?;
        fs::write(&temp_path, bytes).await?;
        fs::rename(&temp_path, &path).await?;

        tracing::debug!(
            target: "runtime::repository",
            run_id = document.record.id,
            stage_number = document.record.progress.stage_number,
            "Saved run to {}",
            path.display()
        );
        Ok(())
    }

    /// Ids of every stored run, ascending.
    pub async fn list_run_ids(&self) -> Result<Vec<RunId>> {
        let mut ids = Vec::new();
        let mut entries = fs::read_dir(&self.base_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if let Some(filename) = path.file_name().and_then(|s| s.to_str())
                && let Some(id) = filename
                    .strip_prefix("run_")
                    .and_then(|s| s.strip_suffix(".json"))
                && let Ok(id) = id.parse::<RunId>()
            {
                ids.push(id);
            }
        }
        ids.sort_unstable();
        Ok(ids)
    }
}

#[async_trait]
impl RunRepository for FileRunRepository {
    async fn create_run(&self, seed: &str, progress: &RunProgress) -> Result<RunRecord> {
        let id = self.list_run_ids().await?.last().map_or(1, |last| last + 1);
        let document = RunDocument {
            record: RunRecord::new(id, seed, progress.clone()),
            items: Vec::new(),
        };
        self.write(&document).await?;
        Ok(document.record)
    }

    async fn fetch_active_run(&self) -> Result<Option<RunRecord>> {
        for id in self.list_run_ids().await?.into_iter().rev() {
            let document = self.read(id).await?;
            if document.record.is_active() {
                tracing::debug!(target: "runtime::repository", run_id = id, "Loaded active run");
                return Ok(Some(document.record));
            }
        }
        Ok(None)
    }

    async fn update_run_progress(
        &self,
        run_id: RunId,
        progress: &RunProgress,
    ) -> Result<RunRecord> {
        let mut document = self.read(run_id).await?;
        document.record.progress = progress.clone();
        self.write(&document).await?;
        Ok(document.record)
    }

    async fn list_run_items(&self, run_id: RunId) -> Result<Vec<ItemInstance>> {
        Ok(self.read(run_id).await?.items)
    }

    async fn replace_run_items(&self, run_id: RunId, items: &[ItemInstance]) -> Result<()> {
        let mut document = self.read(run_id).await?;
        document.items = items.to_vec();
        self.write(&document).await
    }
}

#[cfg(test)]
mod tests {
    use rogue_core::{GameConfig, Run, RunStatus};

    use super::*;

    fn progress(seed: &str) -> RunProgress {
        RunProgress::of(&Run::start(seed, &GameConfig::default()))
    }

    #[tokio::test]
    async fn survives_reopening() {
        let dir = tempfile::tempdir().unwrap();
        let created = {
            let repo = FileRunRepository::new(dir.path()).await.unwrap();
            let record = repo.create_run("disk", &progress("disk")).await.unwrap();
            repo.replace_run_items(record.id, &[ItemInstance::new("heart_gem", 3)])
                .await
                .unwrap();
            record
        };

        let repo = FileRunRepository::new(dir.path()).await.unwrap();
        assert_eq!(repo.fetch_active_run().await.unwrap(), Some(created.clone()));
        assert_eq!(
            repo.list_run_items(created.id).await.unwrap(),
            [ItemInstance::new("heart_gem", 3)]
        );
        assert!(!dir.path().join("run_1.json.tmp").exists());
    }

    #[tokio::test]
    async fn ids_increase_and_finished_runs_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileRunRepository::new(dir.path()).await.unwrap();
        let a = repo.create_run("a", &progress("a")).await.unwrap();
        let b = repo.create_run("b", &progress("b")).await.unwrap();
        assert_eq!((a.id, b.id), (1, 2));

        let mut failed = b.progress.clone();
        failed.status = RunStatus::Failed;
        repo.update_run_progress(b.id, &failed).await.unwrap();

        assert_eq!(repo.fetch_active_run().await.unwrap().map(|r| r.id), Some(1));
        assert_eq!(repo.list_run_ids().await.unwrap(), [1, 2]);
    }

    #[tokio::test]
    async fn missing_run_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileRunRepository::new(dir.path()).await.unwrap();
        let err = repo.list_run_items(4).await.unwrap_err();
        assert!(matches!(err, RepositoryError::RunNotFound(4)));
    }

    #[tokio::test]
    async fn corrupted_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileRunRepository::new(dir.path()).await.unwrap();
        std::fs::write(dir.path().join("run_1.json"), b"{ not json").unwrap();
        let err = repo.fetch_active_run().await.unwrap_err();
        assert!(matches!(err, RepositoryError::Json(_)));
    }
}
