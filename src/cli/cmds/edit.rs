use crate::base;
use crate::cli;

/// Correct the fields of a receipt
///
/// Only the given fields change. Tax and total are recomputed from the
/// subtotal and the two tax components.
#[derive(clap::Parser)]
pub struct Edit {
    /// Receipt id, as shown by 'ls'
    id: base::RecordId,

    #[arg(long, value_name = "NAME")]
    vendor: Option<String>,

    #[arg(long, value_name = "NUMBER")]
    receipt_no: Option<String>,

    #[arg(long, value_name = "AMOUNT", allow_negative_numbers = true)]
    subtotal: Option<base::Cents>,

    #[arg(long, value_name = "AMOUNT", allow_negative_numbers = true)]
    gst_hst: Option<base::Cents>,

    #[arg(long, value_name = "AMOUNT", allow_negative_numbers = true)]
    pst_qst: Option<base::Cents>,

    #[arg(long, value_name = "METHOD")]
    payment: Option<String>,

    /// Chart of account
    #[arg(long)]
    category: Option<String>,

    #[arg(long)]
    status: Option<base::Status>,
}

impl Edit {
    fn correction(&self) -> base::Correction {
        base::Correction {
            vendor_name: self.vendor.clone(),
            receipt_number: self.receipt_no.clone(),
            subtotal: self.subtotal,
            gst_hst: self.gst_hst,
            pst_qst: self.pst_qst,
            payment: self.payment.clone(),
            chart_of_account: self.category.clone(),
            status: self.status,
        }
    }

    pub async fn run(
        &self,
        rl: &base::Recordlist,
        config: &base::Config,
        gateway: &dyn base::Gateway,
    ) -> anyhow::Result<cli::Output> {
        let visible = rl.iter().collect::<Vec<_>>();
        let rl = base::correct(gateway, &visible, self.id, &self.correction())
            .await?
            .refetch(gateway)
            .await?;
        let records = rl.get(self.id).into_iter().collect::<Vec<_>>();
        Ok(cli::Output::Listing {
            table: cli::util::receipt_table(&records, config.use_colored_output),
            footer: Some(format!("Updated receipt {}.", self.id)),
        })
    }
}
