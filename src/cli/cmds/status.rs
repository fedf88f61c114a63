use crate::base;
use crate::cli;

/// Set the status of several receipts at once
#[derive(clap::Parser)]
pub struct SetStatus {
    status: base::Status,

    /// Ids of the receipts to update
    ids: Vec<base::RecordId>,
}

impl SetStatus {
    pub async fn run(&self, gateway: &dyn base::Gateway) -> anyhow::Result<cli::Output> {
        let mut selection = self.ids.iter().copied().collect::<base::Selection>();
        let n = selection.len();
        base::batch_status(gateway, &mut selection, self.status).await?;
        Ok(cli::Output::Str(format!(
            "Marked {} as {}.",
            cli::util::count_receipts(n),
            self.status
        )))
    }
}
