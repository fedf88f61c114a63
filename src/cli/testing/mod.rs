mod case;
mod resultmatcher;
mod state;

pub use case::Case;
pub use case::Invocation;
pub use case::MutCase;
pub(crate) use case::generate_testcases;
pub use resultmatcher::ResultMatcher;
pub use state::State;
pub use state::StrState;
pub use state::tempfs;

use crate::base;
use crate::cli;

/// Three receipts across two months and two categories, as stored by the file
/// store.
pub const SAMPLE_RL: &str = r#"
{"id":3,"receipt_time":"2026-02-01T09:00:00Z","vendor_name":"Paper Co","receipt_no":"P-77","subtotal":4.5,"gst_hst":0.3,"pst_qst":0.2,"tax":0.5,"total":5.0,"status":"pending","payment":"Visa","chart_of_acct":"Supplies","image_url":null,"created_at":"2026-02-01T09:30:00Z"}
{"id":2,"receipt_time":"2026-01-20T12:00:00Z","vendor_name":"Bistro","receipt_no":"B-2","subtotal":18.0,"gst_hst":2.0,"pst_qst":0.0,"tax":2.0,"total":20.0,"status":"verified","payment":"Cash","chart_of_acct":"Meals","image_url":null,"created_at":"2026-01-20T12:30:00Z"}
{"id":1,"receipt_time":"2026-01-05T10:00:00Z","vendor_name":"Bistro","receipt_no":"B-1","subtotal":9.0,"gst_hst":1.0,"pst_qst":0.0,"tax":1.0,"total":10.0,"status":"pending","payment":"Visa","chart_of_acct":"Meals","image_url":null,"created_at":"2026-01-05T10:30:00Z"}
"#;

/// Parses `args` and runs the command against `fs` to completion.
pub fn run(args: &[&str], fs: &base::Fs) -> anyhow::Result<cli::Output> {
    let root = match <cli::Root as clap::Parser>::try_parse_from(args) {
        Ok(cmd) => cmd,
        Err(e) => panic!("{}", e),
    };
    block_on(root.run(fs))
}

/// Drives `fut` on a fresh single-threaded runtime.
pub fn block_on<F: std::future::Future>(fut: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(fut)
}
