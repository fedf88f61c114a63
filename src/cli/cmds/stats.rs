use crate::base;
use crate::cli;

use cli::util::Align;
use cli::util::Table;

/// Show spending statistics
#[derive(clap::Parser)]
pub struct Stats {
    #[command(flatten)]
    filter_opts: cli::sharedopts::FilterOpts,

    /// Number of vendors to list
    #[arg(long, value_name = "N", default_value_t = 10)]
    top: usize,
}

fn money(c: base::Cents) -> cli::util::Cell {
    c.grouped().to_string().into()
}

fn section(title: &str, table: Table) -> String {
    format!("{}\n{}", title, table)
}

fn summary(s: &base::analytics::Summary) -> Table {
    let mut t = Table::new(&[
        ("Receipts", Align::Right),
        ("Total", Align::Right),
        ("Tax", Align::Right),
        ("Average", Align::Right),
    ]);
    t.push(vec![
        s.count.to_string().into(),
        money(s.total_spending),
        money(s.total_tax),
        money(s.average_cents()),
    ]);
    t
}

fn by_month(views: &base::analytics::Views) -> Table {
    let mut t = Table::new(&[
        ("Month", Align::Left),
        ("Receipts", Align::Right),
        ("Subtotal", Align::Right),
        ("GST/HST", Align::Right),
        ("PST/QST", Align::Right),
        ("Tax", Align::Right),
        ("Total", Align::Right),
    ]);
    for (month, b) in &views.by_month {
        t.push(vec![
            month.to_string().into(),
            b.count.to_string().into(),
            money(b.subtotal),
            money(b.gst_hst),
            money(b.pst_qst),
            money(b.tax),
            money(b.total),
        ]);
    }
    t
}

fn by_day(views: &base::analytics::Views) -> Table {
    let mut t = Table::new(&[
        ("Date", Align::Left),
        ("Total", Align::Right),
        ("Cumulative", Align::Right),
    ]);
    for (&(dt, total), &(_, running)) in views.by_day.iter().zip(&views.cumulative) {
        t.push(vec![dt.to_string().into(), money(total), money(running)]);
    }
    t
}

fn by_category(views: &base::analytics::Views) -> Table {
    let mut t = Table::new(&[
        ("Category", Align::Left),
        ("Receipts", Align::Right),
        ("Total", Align::Right),
        ("Average", Align::Right),
    ]);
    for &(cat, b) in &views.by_category {
        t.push(vec![
            cat.into(),
            b.count.to_string().into(),
            money(b.total),
            money(b.average()),
        ]);
    }
    t
}

fn counts<K: ToString>(label: &'static str, rows: impl IntoIterator<Item = (K, usize)>) -> Table {
    let mut t = Table::new(&[(label, Align::Left), ("Receipts", Align::Right)]);
    for (k, n) in rows {
        t.push(vec![k.to_string().into(), n.to_string().into()]);
    }
    t
}

impl Stats {
    pub fn run(&self, rl: &base::Recordlist) -> anyhow::Result<cli::Output> {
        let filtered = self.filter_opts.to_filter().apply(rl);
        if filtered.is_empty() {
            return Ok(cli::Output::Str("No receipts.".to_string()));
        }
        let views = base::analytics::aggregate(filtered);
        tracing::debug!(receipts = views.summary.count, "aggregated");

        let mut vendors = Table::new(&[
            ("Vendor", Align::Left),
            ("Receipts", Align::Right),
            ("Total", Align::Right),
        ]);
        for &(vendor, b) in views.top_vendors(self.top) {
            vendors.push(vec![vendor.into(), b.count.to_string().into(), money(b.total)]);
        }

        let mut rates = Table::new(&[("Subtotal", Align::Right), ("Tax %", Align::Right)]);
        for p in &views.tax_rates {
            rates.push(vec![money(p.subtotal), p.rate.to_string().into()]);
        }

        let mut sections = vec![
            section("Summary", summary(&views.summary)),
            section("By month", by_month(&views)),
            section("By day", by_day(&views)),
            section("By category", by_category(&views)),
            section("Top vendors", vendors),
            section("By payment", counts("Payment", views.by_payment.iter().copied())),
            section("By status", counts("Status", views.by_status.iter().copied())),
        ];
        if !rates.is_empty() {
            sections.push(section("Tax rates", rates));
        }
        Ok(cli::Output::Str(sections.join("\n")))
    }
}
