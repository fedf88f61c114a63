pub mod file;
pub mod rest;

use crate::base;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to access '{}'", path.display())]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse stored receipts")]
    Parse(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("record store request failed")]
    Http(#[from] reqwest::Error),
    #[error("record store responded with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("no receipt with id {}", join_ids(.0))]
    UnknownIds(Vec<base::RecordId>),
    #[error("record store updated {applied} of {requested} receipts")]
    PartialUpdate { requested: usize, applied: usize },
    #[error("no receipt ids given")]
    EmptyIdSet,
    #[error("record store returned no row for the inserted receipt")]
    MissingRow,
}

fn join_ids(ids: &[base::RecordId]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Typed access to the persistent receipt collection. The store is the only
/// source of truth; callers hold snapshots and refetch after writes.
#[async_trait::async_trait]
pub trait Gateway: Send + Sync {
    fn backend_tag(&self) -> &'static str;

    /// Returns every receipt, newest first.
    async fn fetch_all(&self) -> Result<base::Recordlist, StoreError>;

    /// Persists a new receipt. The store assigns its id and creation time.
    async fn insert(&self, receipt: base::Receipt) -> Result<base::ReceiptRecord, StoreError>;

    /// Applies `fields` to every receipt in `ids` in one write. `ids` must not
    /// be empty.
    async fn update_fields(
        &self,
        ids: &[base::RecordId],
        fields: &base::FieldUpdate,
    ) -> Result<(), StoreError>;
}

/// Returned by every successful write: the caller's snapshot is stale.
#[must_use = "snapshots are stale after a write; call `refetch`"]
#[derive(Debug, PartialEq, Eq)]
pub struct Refresh(());

impl Refresh {
    pub(crate) fn new() -> Self {
        Self(())
    }

    pub async fn refetch<G>(self, gateway: &G) -> Result<base::Recordlist, StoreError>
    where
        G: Gateway + ?Sized,
    {
        gateway.fetch_all().await
    }
}
