use crate::base;

/// Label substituted for receipts without a chart of account or payment method.
pub const OTHER: &str = "Other";

/// Label substituted for receipts without a vendor.
pub const UNKNOWN: &str = "Unknown";

/// Accumulated amounts for one group of receipts.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, derive_more::Add, derive_more::AddAssign,
)]
pub struct Bucket {
    pub total: base::Cents,
    pub tax: base::Cents,
    pub gst_hst: base::Cents,
    pub pst_qst: base::Cents,
    pub subtotal: base::Cents,
    pub count: usize,
}

impl Bucket {
    pub fn of(r: &base::Receipt) -> Self {
        Self {
            total: r.total(),
            tax: r.tax(),
            gst_hst: r.gst_hst(),
            pst_qst: r.pst_qst(),
            subtotal: r.subtotal(),
            count: 1,
        }
    }

    /// Mean total per receipt, or zero for an empty bucket.
    pub fn average(&self) -> base::Cents {
        self.total.div_round(self.count)
    }
}

/// Calendar month of a receipt time, displayed as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthKey {
    pub year: i32,
    pub month: u8,
}

impl MonthKey {
    pub fn of(ts: base::Timestamp) -> Self {
        Self {
            year: ts.year(),
            month: ts.month(),
        }
    }
}

impl std::fmt::Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = format!("{:04}-{:02}", self.year, self.month);
        f.pad(&s)
    }
}

/// One point of the tax-rate distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaxPoint {
    pub subtotal: base::Cents,
    pub rate: base::Rate,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub total_spending: base::Cents,
    pub total_tax: base::Cents,
    pub count: usize,
}

impl Summary {
    /// Average transaction, or 0 when there are no receipts.
    pub fn average(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total_spending.to_f64() / self.count as f64
        }
    }

    /// [`Summary::average`] rounded to the cent.
    pub fn average_cents(&self) -> base::Cents {
        self.total_spending.div_round(self.count)
    }
}

/// Every grouped view of a receipt collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Views<'a> {
    pub summary: Summary,
    /// Ascending by month.
    pub by_month: Vec<(MonthKey, Bucket)>,
    /// Daily totals, ascending by day.
    pub by_day: Vec<(base::Date, base::Cents)>,
    /// Running total of `by_day`.
    pub cumulative: Vec<(base::Date, base::Cents)>,
    /// Descending by total.
    pub by_category: Vec<(&'a str, Bucket)>,
    /// Descending by total.
    pub by_vendor: Vec<(&'a str, Bucket)>,
    pub by_status: Vec<(base::Status, usize)>,
    /// Descending by count.
    pub by_payment: Vec<(&'a str, usize)>,
    /// In input order. Receipts without a positive subtotal are left out.
    pub tax_rates: Vec<TaxPoint>,
}

impl<'a> Views<'a> {
    /// The `n` vendors with the largest totals.
    pub fn top_vendors(&self, n: usize) -> &[(&'a str, Bucket)] {
        &self.by_vendor[..n.min(self.by_vendor.len())]
    }
}

fn or_label<'a>(s: &'a str, label: &'static str) -> &'a str {
    if s.is_empty() { label } else { s }
}

/// Recomputes all views from scratch. Ties in descending orders are broken by
/// ascending key.
pub fn aggregate<'a, I>(records: I) -> Views<'a>
where
    I: IntoIterator<Item = &'a base::ReceiptRecord>,
{
    let mut months = base::Aggregate::<MonthKey, Bucket>::default();
    let mut days = base::Aggregate::<base::Date, base::Cents>::default();
    let mut categories = base::Aggregate::<&'a str, Bucket>::default();
    let mut vendors = base::Aggregate::<&'a str, Bucket>::default();
    let mut statuses = base::Aggregate::<base::Status, usize>::default();
    let mut payments = base::Aggregate::<&'a str, usize>::default();
    let mut tax_rates = Vec::new();

    for r in records {
        let bucket = Bucket::of(r);
        months.add(MonthKey::of(r.receipt_time()), bucket);
        days.add(r.receipt_time().date(), r.total());
        categories.add(or_label(r.chart_of_account(), OTHER), bucket);
        vendors.add(or_label(r.vendor_name(), UNKNOWN), bucket);
        statuses.add(r.status(), 1);
        payments.add(or_label(r.payment(), OTHER), 1);
        if r.subtotal() > base::Cents::ZERO {
            if let Some(rate) = base::Rate::of(r.tax(), r.subtotal()) {
                tax_rates.push(TaxPoint {
                    subtotal: r.subtotal(),
                    rate,
                });
            }
        }
    }

    let all = months.sum();
    let summary = Summary {
        total_spending: all.total,
        total_tax: all.tax,
        count: all.count,
    };

    let by_day = days.into_vec();
    let cumulative = by_day
        .iter()
        .scan(base::Cents::ZERO, |acc, &(dt, total)| {
            *acc += total;
            Some((dt, *acc))
        })
        .collect();

    let mut by_category = categories.into_vec();
    by_category.sort_by(|a, b| b.1.total.cmp(&a.1.total));
    let mut by_vendor = vendors.into_vec();
    by_vendor.sort_by(|a, b| b.1.total.cmp(&a.1.total));
    let mut by_payment = payments.into_vec();
    by_payment.sort_by(|a, b| b.1.cmp(&a.1));

    Views {
        summary,
        by_month: months.into_vec(),
        by_day,
        cumulative,
        by_category,
        by_vendor,
        by_status: statuses.into_vec(),
        by_payment,
        tax_rates,
    }
}
