use crate::base;

/// Rejections raised before anything is sent to the store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("select at least one receipt")]
    EmptySelection,
    #[error("category must not be empty")]
    EmptyCategory,
    #[error("receipt {0} is not in the current view")]
    NotVisible(base::RecordId),
    #[error("{0} must not be negative")]
    NegativeAmount(&'static str),
}

#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("failed to update receipts")]
    Store(#[from] base::StoreError),
}

/// Edits to a single receipt. Unset fields keep their persisted values.
///
/// There is no way to set tax or total: they follow from the amounts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Correction {
    pub vendor_name: Option<String>,
    pub receipt_number: Option<String>,
    pub subtotal: Option<base::Cents>,
    pub gst_hst: Option<base::Cents>,
    pub pst_qst: Option<base::Cents>,
    pub payment: Option<String>,
    pub chart_of_account: Option<String>,
    pub status: Option<base::Status>,
}

impl Correction {
    /// Merges the edited amounts over `current`.
    fn amounts(&self, current: &base::Receipt) -> Result<base::Amounts, ValidationError> {
        fn pick(
            field: &'static str,
            edit: Option<base::Cents>,
            current: base::Cents,
        ) -> Result<base::Cents, ValidationError> {
            match edit {
                Some(x) if x.is_negative() => Err(ValidationError::NegativeAmount(field)),
                Some(x) => Ok(x),
                None => Ok(current),
            }
        }
        Ok(base::Amounts {
            subtotal: pick("subtotal", self.subtotal, current.subtotal())?,
            gst_hst: pick("gst/hst", self.gst_hst, current.gst_hst())?,
            pst_qst: pick("pst/qst", self.pst_qst, current.pst_qst())?,
        })
    }

    fn to_update(&self, current: &base::Receipt) -> Result<base::FieldUpdate, ValidationError> {
        let mut update = base::FieldUpdate::new().with_amounts(self.amounts(current)?);
        if let Some(s) = &self.vendor_name {
            update = update.with_vendor_name(s.as_str());
        }
        if let Some(s) = &self.receipt_number {
            update = update.with_receipt_number(s.as_str());
        }
        if let Some(s) = &self.payment {
            update = update.with_payment(s.as_str());
        }
        if let Some(s) = &self.chart_of_account {
            update = update.with_chart_of_account(s.as_str());
        }
        if let Some(x) = self.status {
            update = update.with_status(x);
        }
        Ok(update)
    }
}

/// Applies `correction` to receipt `id`, which must be among `visible`.
///
/// Tax and total are recomputed from the merged amounts and always written,
/// so the stored record satisfies `tax = gst/hst + pst/qst` and
/// `total = subtotal + tax` afterwards.
#[tracing::instrument(name = "correct", skip(gateway, visible, correction), fields(%id))]
pub async fn correct<G>(
    gateway: &G,
    visible: &[&base::ReceiptRecord],
    id: base::RecordId,
    correction: &Correction,
) -> Result<base::Refresh, ReconcileError>
where
    G: base::Gateway + ?Sized,
{
    let current = visible
        .iter()
        .find(|r| r.id() == id)
        .ok_or(ValidationError::NotVisible(id))?;
    let update = correction.to_update(current)?;
    gateway.update_fields(&[id], &update).await?;
    tracing::info!("corrected receipt");
    Ok(base::Refresh::new())
}

/// Sets the chart of account of every selected receipt in one write. The
/// selection is cleared only if the write succeeds.
#[tracing::instrument(name = "batch_assign", skip(gateway, selection), fields(n = selection.len()))]
pub async fn batch_assign<G>(
    gateway: &G,
    selection: &mut base::Selection,
    category: &str,
) -> Result<base::Refresh, ReconcileError>
where
    G: base::Gateway + ?Sized,
{
    let category = category.trim();
    if category.is_empty() {
        return Err(ValidationError::EmptyCategory.into());
    }
    let update = base::FieldUpdate::new().with_chart_of_account(category);
    batch_write(gateway, selection, &update).await
}

/// Sets the status of every selected receipt in one write. The selection is
/// cleared only if the write succeeds.
#[tracing::instrument(name = "batch_status", skip(gateway, selection), fields(n = selection.len()))]
pub async fn batch_status<G>(
    gateway: &G,
    selection: &mut base::Selection,
    status: base::Status,
) -> Result<base::Refresh, ReconcileError>
where
    G: base::Gateway + ?Sized,
{
    let update = base::FieldUpdate::new().with_status(status);
    batch_write(gateway, selection, &update).await
}

async fn batch_write<G>(
    gateway: &G,
    selection: &mut base::Selection,
    update: &base::FieldUpdate,
) -> Result<base::Refresh, ReconcileError>
where
    G: base::Gateway + ?Sized,
{
    if selection.is_empty() {
        return Err(ValidationError::EmptySelection.into());
    }
    let ids = selection.ids();
    gateway.update_fields(&ids, update).await?;
    tracing::info!(updated = ids.len(), "batch update applied");
    selection.clear();
    Ok(base::Refresh::new())
}
