use anyhow::Context;

use crate::base;
use crate::cli;

/// Export receipts as CSV
///
/// Receipts are written newest first, one row each, after a header row.
#[derive(clap::Parser)]
pub struct Export {
    #[command(flatten)]
    filter_opts: cli::sharedopts::FilterOpts,

    /// Write to FILE instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<std::path::PathBuf>,
}

impl Export {
    pub fn run(&self, rl: &base::Recordlist) -> anyhow::Result<cli::Output> {
        let filtered = self.filter_opts.to_filter().apply(rl);
        let n = filtered.len();
        match &self.output {
            Some(path) => {
                let file = std::fs::File::create(path)
                    .with_context(|| format!("failed to create '{}'", path.display()))?;
                base::export::write_csv(std::io::BufWriter::new(file), filtered)
                    .with_context(|| format!("failed to write '{}'", path.display()))?;
                tracing::info!(path = %path.display(), rows = n, "exported csv");
                Ok(cli::Output::Str(format!(
                    "Exported {} to '{}'.",
                    cli::util::count_receipts(n),
                    path.display()
                )))
            }
            None => {
                let mut buf = Vec::new();
                base::export::write_csv(&mut buf, filtered)?;
                Ok(cli::Output::Str(String::from_utf8(buf)?))
            }
        }
    }
}
