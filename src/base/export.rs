use crate::base;

/// One flat CSV row. Field order is the column order.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Row<'a> {
    #[serde(rename = "Index")]
    pub index: usize,
    #[serde(rename = "Receipt Time")]
    pub receipt_time: String,
    #[serde(rename = "Vendor")]
    pub vendor: &'a str,
    #[serde(rename = "Receipt No")]
    pub receipt_number: &'a str,
    #[serde(rename = "Subtotal")]
    pub subtotal: String,
    #[serde(rename = "GST/HST")]
    pub gst_hst: String,
    #[serde(rename = "PST/QST")]
    pub pst_qst: String,
    #[serde(rename = "Tax")]
    pub tax: String,
    #[serde(rename = "Total")]
    pub total: String,
    #[serde(rename = "Status")]
    pub status: &'static str,
    #[serde(rename = "Payment")]
    pub payment: &'a str,
    #[serde(rename = "Chart of Account")]
    pub chart_of_account: &'a str,
}

impl<'a> Row<'a> {
    /// `index` is 1-based.
    pub fn new(index: usize, r: &'a base::Receipt) -> Self {
        Self {
            index,
            receipt_time: r.receipt_time().to_string(),
            vendor: r.vendor_name(),
            receipt_number: r.receipt_number(),
            subtotal: r.subtotal().to_string(),
            gst_hst: r.gst_hst().to_string(),
            pst_qst: r.pst_qst().to_string(),
            tax: r.tax().to_string(),
            total: r.total().to_string(),
            status: r.status().into(),
            payment: r.payment(),
            chart_of_account: r.chart_of_account(),
        }
    }
}

/// Rows for `records`, numbered from 1 in the given order.
pub fn rows<'a, I>(records: I) -> Vec<Row<'a>>
where
    I: IntoIterator<Item = &'a base::ReceiptRecord>,
{
    records
        .into_iter()
        .enumerate()
        .map(|(i, r)| Row::new(i + 1, r))
        .collect()
}

/// Writes a header line followed by one line per record. Fields containing
/// delimiters, quotes or newlines are quoted.
pub fn write_csv<'a, W, I>(w: W, records: I) -> Result<(), csv::Error>
where
    W: std::io::Write,
    I: IntoIterator<Item = &'a base::ReceiptRecord>,
{
    let mut writer = csv::Writer::from_writer(w);
    let rows = rows(records);
    if rows.is_empty() {
        writer.write_record(HEADERS)?;
    }
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

pub const HEADERS: [&str; 12] = [
    "Index",
    "Receipt Time",
    "Vendor",
    "Receipt No",
    "Subtotal",
    "GST/HST",
    "PST/QST",
    "Tax",
    "Total",
    "Status",
    "Payment",
    "Chart of Account",
];
