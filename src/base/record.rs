use crate::base;

/// Expense categories offered when assigning a chart of account. Labels
/// outside this list are accepted.
pub const SUGGESTED_CATEGORIES: &[&str] = &[
    "Office Supplies",
    "Meals & Entertainment",
    "Vehicle Expenses",
    "Travel",
    "Utilities",
    "Rent",
    "Professional Fees",
    "Advertising",
    "Telephone & Internet",
    "Insurance",
    "Repairs & Maintenance",
    "Other",
];

/// Store-assigned record identity.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    serde::Serialize,
    serde::Deserialize,
    derive_more::Display,
    derive_more::From,
    derive_more::FromStr,
)]
#[serde(transparent)]
pub struct RecordId(pub i64);

/// The independently editable currency fields of a receipt. Tax and total are
/// always derived from these.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Amounts {
    pub subtotal: base::Cents,
    pub gst_hst: base::Cents,
    pub pst_qst: base::Cents,
}

impl Amounts {
    pub fn tax(&self) -> base::Cents {
        self.gst_hst + self.pst_qst
    }

    pub fn total(&self) -> base::Cents {
        self.subtotal + self.tax()
    }
}

/// A receipt's content, without the identity fields the store assigns.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Receipt {
    receipt_time: base::Timestamp,
    #[serde(default, deserialize_with = "text")]
    vendor_name: String,
    #[serde(rename = "receipt_no", default, deserialize_with = "text")]
    receipt_number: String,
    #[serde(default)]
    subtotal: base::Cents,
    #[serde(default)]
    gst_hst: base::Cents,
    #[serde(default)]
    pst_qst: base::Cents,
    #[serde(default)]
    tax: base::Cents,
    #[serde(default)]
    total: base::Cents,
    #[serde(default)]
    status: base::Status,
    #[serde(default, deserialize_with = "text")]
    payment: String,
    #[serde(rename = "chart_of_acct", default, deserialize_with = "text")]
    chart_of_account: String,
    #[serde(rename = "image_url", default)]
    image_reference: Option<String>,
}

/// Deserializes a nullable text column, mapping `null` to an empty string.
fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = serde::Deserialize::deserialize(deserializer)?;
    Ok(s.unwrap_or_default())
}

impl Receipt {
    /// Creates a pending receipt with tax and total derived from `amounts`.
    pub fn new(receipt_time: base::Timestamp, amounts: Amounts) -> Self {
        Self {
            receipt_time,
            vendor_name: String::new(),
            receipt_number: String::new(),
            subtotal: amounts.subtotal,
            gst_hst: amounts.gst_hst,
            pst_qst: amounts.pst_qst,
            tax: amounts.tax(),
            total: amounts.total(),
            status: base::Status::Pending,
            payment: String::new(),
            chart_of_account: String::new(),
            image_reference: None,
        }
    }

    pub fn with_vendor_name(self, vendor_name: impl Into<String>) -> Self {
        Self {
            vendor_name: vendor_name.into(),
            ..self
        }
    }

    pub fn with_receipt_number(self, receipt_number: impl Into<String>) -> Self {
        Self {
            receipt_number: receipt_number.into(),
            ..self
        }
    }

    pub fn with_payment(self, payment: impl Into<String>) -> Self {
        Self {
            payment: payment.into(),
            ..self
        }
    }

    pub fn with_chart_of_account(self, chart_of_account: impl Into<String>) -> Self {
        Self {
            chart_of_account: chart_of_account.into(),
            ..self
        }
    }

    pub fn with_image_reference(self, image_reference: Option<String>) -> Self {
        Self {
            image_reference,
            ..self
        }
    }

    pub fn receipt_time(&self) -> base::Timestamp {
        self.receipt_time
    }

    pub fn vendor_name(&self) -> &str {
        &self.vendor_name
    }

    pub fn receipt_number(&self) -> &str {
        &self.receipt_number
    }

    pub fn subtotal(&self) -> base::Cents {
        self.subtotal
    }

    pub fn gst_hst(&self) -> base::Cents {
        self.gst_hst
    }

    pub fn pst_qst(&self) -> base::Cents {
        self.pst_qst
    }

    pub fn tax(&self) -> base::Cents {
        self.tax
    }

    pub fn total(&self) -> base::Cents {
        self.total
    }

    pub fn amounts(&self) -> Amounts {
        Amounts {
            subtotal: self.subtotal,
            gst_hst: self.gst_hst,
            pst_qst: self.pst_qst,
        }
    }

    pub fn status(&self) -> base::Status {
        self.status
    }

    pub fn payment(&self) -> &str {
        &self.payment
    }

    pub fn chart_of_account(&self) -> &str {
        &self.chart_of_account
    }

    pub fn image_reference(&self) -> Option<&str> {
        self.image_reference.as_deref()
    }

    pub(crate) fn apply(&mut self, update: &FieldUpdate) {
        if let Some(s) = &update.vendor_name {
            self.vendor_name.clone_from(s);
        }
        if let Some(s) = &update.receipt_number {
            self.receipt_number.clone_from(s);
        }
        if let Some(x) = update.subtotal {
            self.subtotal = x;
        }
        if let Some(x) = update.gst_hst {
            self.gst_hst = x;
        }
        if let Some(x) = update.pst_qst {
            self.pst_qst = x;
        }
        if let Some(x) = update.tax {
            self.tax = x;
        }
        if let Some(x) = update.total {
            self.total = x;
        }
        if let Some(x) = update.status {
            self.status = x;
        }
        if let Some(s) = &update.payment {
            self.payment.clone_from(s);
        }
        if let Some(s) = &update.chart_of_account {
            self.chart_of_account.clone_from(s);
        }
    }
}

/// A persisted receipt.
#[derive(
    Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize, derive_more::Deref,
)]
pub struct ReceiptRecord {
    id: RecordId,
    #[deref]
    #[serde(flatten)]
    receipt: Receipt,
    created_at: base::Timestamp,
}

impl ReceiptRecord {
    pub fn new(id: RecordId, receipt: Receipt, created_at: base::Timestamp) -> Self {
        Self {
            id,
            receipt,
            created_at,
        }
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn created_at(&self) -> base::Timestamp {
        self.created_at
    }

    pub fn receipt(&self) -> &Receipt {
        &self.receipt
    }

    pub(crate) fn apply(&mut self, update: &FieldUpdate) {
        self.receipt.apply(update)
    }
}

impl std::fmt::Display for ReceiptRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = serde_json::to_string(self).map_err(|_| std::fmt::Error)?;
        f.write_str(&s)
    }
}

impl std::str::FromStr for ReceiptRecord {
    type Err = serde_json::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(s)
    }
}

/// A partial record written by the store's update operation. Unset fields keep
/// their persisted values.
///
/// Tax and total can only be set together with their components, through
/// [`FieldUpdate::with_amounts`].
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct FieldUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    vendor_name: Option<String>,
    #[serde(rename = "receipt_no", skip_serializing_if = "Option::is_none")]
    receipt_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    subtotal: Option<base::Cents>,
    #[serde(skip_serializing_if = "Option::is_none")]
    gst_hst: Option<base::Cents>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pst_qst: Option<base::Cents>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tax: Option<base::Cents>,
    #[serde(skip_serializing_if = "Option::is_none")]
    total: Option<base::Cents>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<base::Status>,
    #[serde(skip_serializing_if = "Option::is_none")]
    payment: Option<String>,
    #[serde(rename = "chart_of_acct", skip_serializing_if = "Option::is_none")]
    chart_of_account: Option<String>,
}

impl FieldUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn with_vendor_name(self, vendor_name: impl Into<String>) -> Self {
        Self {
            vendor_name: Some(vendor_name.into()),
            ..self
        }
    }

    pub fn with_receipt_number(self, receipt_number: impl Into<String>) -> Self {
        Self {
            receipt_number: Some(receipt_number.into()),
            ..self
        }
    }

    /// Sets the three components and the tax and total derived from them.
    pub fn with_amounts(self, amounts: Amounts) -> Self {
        Self {
            subtotal: Some(amounts.subtotal),
            gst_hst: Some(amounts.gst_hst),
            pst_qst: Some(amounts.pst_qst),
            tax: Some(amounts.tax()),
            total: Some(amounts.total()),
            ..self
        }
    }

    pub fn with_status(self, status: base::Status) -> Self {
        Self {
            status: Some(status),
            ..self
        }
    }

    pub fn with_payment(self, payment: impl Into<String>) -> Self {
        Self {
            payment: Some(payment.into()),
            ..self
        }
    }

    pub fn with_chart_of_account(self, chart_of_account: impl Into<String>) -> Self {
        Self {
            chart_of_account: Some(chart_of_account.into()),
            ..self
        }
    }
}
