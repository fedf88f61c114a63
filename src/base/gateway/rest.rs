use crate::base;
use crate::base::gateway::StoreError;

/// Talks to a PostgREST-style HTTP endpoint, one table of receipts.
pub struct RestStore {
    client: reqwest::Client,
    url: String,
    table: String,
    api_key: String,
}

impl RestStore {
    pub fn new(url: impl Into<String>, table: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            table: table.into(),
            api_key: api_key.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/{}", self.url.trim_end_matches('/'), self.table)
    }

    fn request(&self, method: reqwest::Method) -> reqwest::RequestBuilder {
        self.client
            .request(method, self.endpoint())
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn rows(resp: reqwest::Response) -> Result<Vec<base::ReceiptRecord>, StoreError> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "record store request rejected");
            return Err(StoreError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(resp.json::<Vec<base::ReceiptRecord>>().await?)
    }
}

/// PostgREST filter value selecting the given ids, e.g. `in.(1,2,3)`.
fn id_filter(ids: &[base::RecordId]) -> String {
    let ids = ids.iter().map(|id| id.to_string()).collect::<Vec<_>>();
    format!("in.({})", ids.join(","))
}

/// Checks that every requested id came back from an update.
fn verify_applied(
    requested: &[base::RecordId],
    returned: &[base::ReceiptRecord],
) -> Result<(), StoreError> {
    let requested = requested
        .iter()
        .copied()
        .collect::<std::collections::BTreeSet<_>>();
    let applied = returned
        .iter()
        .map(|r| r.id())
        .filter(|id| requested.contains(id))
        .collect::<std::collections::BTreeSet<_>>();
    if applied.len() == requested.len() {
        Ok(())
    } else {
        Err(StoreError::PartialUpdate {
            requested: requested.len(),
            applied: applied.len(),
        })
    }
}

#[async_trait::async_trait]
impl base::Gateway for RestStore {
    fn backend_tag(&self) -> &'static str {
        "rest"
    }

    #[tracing::instrument(name = "rest_fetch_all", skip(self), fields(table = %self.table))]
    async fn fetch_all(&self) -> Result<base::Recordlist, StoreError> {
        let resp = self
            .request(reqwest::Method::GET)
            .query(&[("select", "*"), ("order", "receipt_time.desc")])
            .send()
            .await?;
        let rows = Self::rows(resp).await?;
        tracing::debug!(count = rows.len(), "fetched receipts");
        Ok(rows.into_iter().collect())
    }

    #[tracing::instrument(name = "rest_insert", skip_all, fields(table = %self.table))]
    async fn insert(&self, receipt: base::Receipt) -> Result<base::ReceiptRecord, StoreError> {
        let resp = self
            .request(reqwest::Method::POST)
            .header("Prefer", "return=representation")
            .json(&receipt)
            .send()
            .await?;
        let record = Self::rows(resp)
            .await?
            .into_iter()
            .next()
            .ok_or(StoreError::MissingRow)?;
        tracing::info!(id = %record.id(), "inserted receipt");
        Ok(record)
    }

    #[tracing::instrument(
        name = "rest_update_fields",
        skip(self, update),
        fields(table = %self.table, n = ids.len())
    )]
    async fn update_fields(
        &self,
        ids: &[base::RecordId],
        update: &base::FieldUpdate,
    ) -> Result<(), StoreError> {
        if ids.is_empty() {
            return Err(StoreError::EmptyIdSet);
        }
        let resp = self
            .request(reqwest::Method::PATCH)
            .query(&[("id", id_filter(ids))])
            .header("Prefer", "return=representation")
            .json(update)
            .send()
            .await?;
        let rows = Self::rows(resp).await?;
        verify_applied(ids, &rows)?;
        tracing::info!(updated = rows.len(), "updated receipts");
        Ok(())
    }
}
