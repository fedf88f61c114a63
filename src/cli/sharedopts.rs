use crate::base;

pub const INTERVAL_HELP: &str = "Receipt dates of interest";
pub const INTERVAL_HELP_LONG: &str = "Receipt dates of interest

Must be in the format 'A:B'. Each of 'A' or 'B' is either an ISO 8601 date (yyyy-mm-dd) or a relative date (see below). 'A' and 'B' are both optional, defaulting to 0000-01-01 and 9999-12-31 respectively. Both ends are inclusive.

A relative date is one of the following ('n' is optional and defaults to 0):
dn: n days from today
mn: first day of the nth month from today
Mn: last day of the nth month from today
yn: first day of the nth year from today
Yn: last day of the nth year from today

The following shorthands are also available:
dn = dn:dn
mn = mn:Mn
yn = yn:Yn";

#[derive(clap::Args)]
pub struct FilterOpts {
    #[arg(
        default_value = ":",
        hide_default_value = true,
        help = INTERVAL_HELP,
        long_help = INTERVAL_HELP_LONG,
    )]
    pub interval: base::Interval,

    /// Statuses to include
    ///
    /// Use commas to separate multiple statuses. All statuses are included if
    /// none are given.
    #[arg(short, long = "status", value_name = "STATUSES", value_delimiter = ',')]
    pub statuses: Vec<base::Status>,

    /// Ignore the start of the interval
    #[arg(short, long)]
    pub before_start: bool,

    /// Text to look for in vendor, receipt number or payment
    ///
    /// Matching is case-insensitive.
    #[arg(short, long, default_value_t, hide_default_value = true)]
    pub query: String,

    /// Wildcard patterns to match charts of account
    ///
    /// Use commas to separate multiple patterns. A receipt is included if its
    /// chart of account matches any pattern.
    #[arg(short, long, value_name = "PATTERNS", value_delimiter = ',')]
    pub categories: Vec<String>,
}

impl FilterOpts {
    pub fn to_filter(&self) -> base::Filter {
        base::Filter {
            statuses: self.statuses.clone(),
            interval: self.interval,
            include_before_start: self.before_start,
            query: self.query.clone(),
            categories: self.categories.clone(),
        }
    }
}

#[derive(clap::Args)]
pub struct PageOpts {
    /// Page to show, starting at 1
    #[arg(short, long, default_value_t = 1)]
    pub page: usize,

    /// Receipts per page [default: from config]
    #[arg(long, value_name = "N")]
    pub page_size: Option<usize>,
}

impl PageOpts {
    pub fn to_page(&self, config: &base::Config) -> base::Page {
        base::Page {
            number: self.page,
            size: self.page_size.unwrap_or(config.page_size),
        }
    }
}
