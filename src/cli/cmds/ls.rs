use crate::base;
use crate::cli;

/// List receipts, newest first
#[derive(clap::Parser)]
pub struct Ls {
    #[command(flatten)]
    filter_opts: cli::sharedopts::FilterOpts,

    #[command(flatten)]
    page_opts: cli::sharedopts::PageOpts,
}

impl Ls {
    pub fn run(&self, rl: &base::Recordlist, config: &base::Config) -> anyhow::Result<cli::Output> {
        let filtered = self.filter_opts.to_filter().apply(rl);
        let page = self.page_opts.to_page(config);
        let n = filtered.len();
        let totals = base::Totals::of(&filtered, &base::Selection::new());
        let footer = format!(
            "Showing {} (page {} of {})\nSubtotal {}  Tax {}  Total {}  Categories {}",
            page.range_label(n),
            page.current(n),
            page.total_pages(n),
            totals.subtotal.grouped(),
            totals.tax.grouped(),
            totals.total.grouped(),
            totals.categories,
        );
        Ok(cli::Output::Listing {
            table: cli::util::receipt_table(page.slice(&filtered), config.use_colored_output),
            footer: Some(footer),
        })
    }
}
