use anyhow::Context;

use crate::base;

/// Builds the record store named by `config`.
pub fn gateway(config: &base::Config, fs: &base::Fs) -> anyhow::Result<Box<dyn base::Gateway>> {
    Ok(match &config.store {
        base::StoreConfig::File => Box::new(base::FileStore::new(fs.path::<base::Recordlist>())),
        base::StoreConfig::Rest {
            url,
            table,
            api_key_env,
        } => Box::new(base::RestStore::new(url, table, secret(api_key_env)?)),
    })
}

/// Reads a secret from the environment.
pub fn secret(var: &str) -> anyhow::Result<String> {
    std::env::var(var).with_context(|| format!("environment variable '{}' is not set", var))
}

pub async fn fetch(gateway: &dyn base::Gateway) -> anyhow::Result<base::Recordlist> {
    gateway
        .fetch_all()
        .await
        .context("failed to fetch receipts")
}

/// E.g. `1 receipt`, `3 receipts`.
pub fn count_receipts(n: usize) -> String {
    match n {
        1 => "1 receipt".to_string(),
        n => format!("{} receipts", n),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    text: String,
    color: Option<colored::Color>,
}

impl Cell {
    pub fn colored(text: impl Into<String>, color: colored::Color) -> Self {
        Self {
            text: text.into(),
            color: Some(color),
        }
    }
}

impl From<String> for Cell {
    fn from(text: String) -> Self {
        Self { text, color: None }
    }
}

impl From<&str> for Cell {
    fn from(text: &str) -> Self {
        text.to_string().into()
    }
}

/// Plain text table with padded columns separated by two spaces.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<(&'static str, Align)>,
    rows: Vec<Vec<Cell>>,
    colored: bool,
}

impl Table {
    pub fn new(columns: &[(&'static str, Align)]) -> Self {
        Self {
            columns: columns.to_vec(),
            rows: Vec::new(),
            colored: false,
        }
    }

    pub fn with_color(self, colored: bool) -> Self {
        Self { colored, ..self }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn push(&mut self, row: Vec<Cell>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row)
    }
}

fn pad(s: &str, align: Align, width: usize) -> String {
    match align {
        Align::Left => format!("{:<width$}", s),
        Align::Right => format!("{:>width$}", s),
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut widths = self
            .columns
            .iter()
            .map(|(h, _)| h.chars().count())
            .collect::<Vec<_>>();
        for row in &self.rows {
            for (w, cell) in widths.iter_mut().zip(row) {
                *w = (*w).max(cell.text.chars().count());
            }
        }

        let header = self
            .columns
            .iter()
            .zip(&widths)
            .map(|(&(h, align), &w)| pad(h, align, w))
            .collect::<Vec<_>>();
        writeln!(f, "{}", header.join("  ").trim_end())?;

        for row in &self.rows {
            let cells = row
                .iter()
                .zip(&self.columns)
                .zip(&widths)
                .map(|((cell, &(_, align)), &w)| {
                    let s = pad(&cell.text, align, w);
                    match cell.color {
                        Some(color) if self.colored => {
                            colored::Colorize::color(s.as_str(), color).to_string()
                        }
                        _ => s,
                    }
                })
                .collect::<Vec<_>>();
            writeln!(f, "{}", cells.join("  ").trim_end())?;
        }
        Ok(())
    }
}

pub fn status_color(status: base::Status) -> colored::Color {
    match status {
        base::Status::Pending => colored::Color::Yellow,
        base::Status::Verified => colored::Color::Green,
        base::Status::Exported => colored::Color::Blue,
    }
}

/// One row per receipt, in the given order.
pub fn receipt_table(records: &[&base::ReceiptRecord], colored: bool) -> Table {
    let mut table = Table::new(&[
        ("ID", Align::Right),
        ("Date", Align::Left),
        ("Vendor", Align::Left),
        ("Receipt No", Align::Left),
        ("Subtotal", Align::Right),
        ("GST/HST", Align::Right),
        ("PST/QST", Align::Right),
        ("Tax", Align::Right),
        ("Total", Align::Right),
        ("Status", Align::Left),
        ("Payment", Align::Left),
        ("Category", Align::Left),
    ])
    .with_color(colored);
    for r in records {
        table.push(vec![
            r.id().to_string().into(),
            r.receipt_time().date().to_string().into(),
            r.vendor_name().into(),
            r.receipt_number().into(),
            r.subtotal().grouped().to_string().into(),
            r.gst_hst().grouped().to_string().into(),
            r.pst_qst().grouped().to_string().into(),
            r.tax().grouped().to_string().into(),
            r.total().grouped().to_string().into(),
            Cell::colored(r.status().as_ref(), status_color(r.status())),
            r.payment().into(),
            r.chart_of_account().into(),
        ]);
    }
    table
}
