use crate::base;
use crate::base::gateway::StoreError;

/// Stores receipts as a JSON-lines file.
///
/// Every write replaces the whole file through a rename, so a bulk update
/// either lands completely or not at all.
pub struct FileStore {
    path: std::path::PathBuf,
    lock: tokio::sync::Mutex<()>,
}

impl FileStore {
    pub fn new<P>(path: P) -> Self
    where
        P: Into<std::path::PathBuf>,
    {
        Self {
            path: path.into(),
            lock: tokio::sync::Mutex::new(()),
        }
    }

    fn io_error(&self, path: &std::path::Path, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    async fn load(&self) -> Result<base::Recordlist, StoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(s) => s
                .parse::<base::Recordlist>()
                .map_err(|e| StoreError::Parse(Box::new(e))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(base::Recordlist::new()),
            Err(e) => Err(self.io_error(&self.path, e)),
        }
    }

    async fn save(&self, rl: &base::Recordlist) -> Result<(), StoreError> {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = std::path::PathBuf::from(tmp);
        tokio::fs::write(&tmp, rl.to_string())
            .await
            .map_err(|e| self.io_error(&tmp, e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| self.io_error(&self.path, e))
    }
}

#[async_trait::async_trait]
impl base::Gateway for FileStore {
    fn backend_tag(&self) -> &'static str {
        "file"
    }

    #[tracing::instrument(name = "file_fetch_all", skip(self), fields(path = %self.path.display()))]
    async fn fetch_all(&self) -> Result<base::Recordlist, StoreError> {
        let _guard = self.lock.lock().await;
        let rl = self.load().await?;
        tracing::debug!(count = rl.len(), "loaded receipts");
        Ok(rl)
    }

    #[tracing::instrument(name = "file_insert", skip_all)]
    async fn insert(&self, receipt: base::Receipt) -> Result<base::ReceiptRecord, StoreError> {
        let _guard = self.lock.lock().await;
        let mut rl = self.load().await?;
        let id = base::RecordId(rl.max_id().map_or(1, |id| id.0 + 1));
        let record = base::ReceiptRecord::new(id, receipt, base::Timestamp::now());
        rl.insert(record.clone());
        self.save(&rl).await?;
        tracing::info!(%id, "inserted receipt");
        Ok(record)
    }

    #[tracing::instrument(name = "file_update_fields", skip(self, update), fields(n = ids.len()))]
    async fn update_fields(
        &self,
        ids: &[base::RecordId],
        update: &base::FieldUpdate,
    ) -> Result<(), StoreError> {
        if ids.is_empty() {
            return Err(StoreError::EmptyIdSet);
        }
        let _guard = self.lock.lock().await;
        let mut rl = self.load().await?;
        let mut unknown = ids
            .iter()
            .copied()
            .filter(|&id| !rl.contains(id))
            .collect::<Vec<_>>();
        if !unknown.is_empty() {
            unknown.sort();
            unknown.dedup();
            return Err(StoreError::UnknownIds(unknown));
        }
        let n = rl.update(ids, update);
        self.save(&rl).await?;
        tracing::info!(updated = n, "updated receipts");
        Ok(())
    }
}
