use crate::base;
use crate::cli;

/// Set the chart of account of several receipts at once
#[derive(clap::Parser)]
pub struct Assign {
    /// Chart of account, see 'cats' for suggestions
    category: String,

    /// Ids of the receipts to update
    ids: Vec<base::RecordId>,
}

impl Assign {
    pub async fn run(&self, gateway: &dyn base::Gateway) -> anyhow::Result<cli::Output> {
        let mut selection = self.ids.iter().copied().collect::<base::Selection>();
        let n = selection.len();
        base::batch_assign(gateway, &mut selection, &self.category).await?;
        Ok(cli::Output::Str(format!(
            "Assigned '{}' to {}.",
            self.category.trim(),
            cli::util::count_receipts(n)
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ASSIGNED_RL: &str = r#"
{"id":3,"receipt_time":"2026-02-01T09:00:00Z","vendor_name":"Paper Co","receipt_no":"P-77","subtotal":4.5,"gst_hst":0.3,"pst_qst":0.2,"tax":0.5,"total":5.0,"status":"pending","payment":"Visa","chart_of_acct":"Office Supplies","image_url":null,"created_at":"2026-02-01T09:30:00Z"}
{"id":2,"receipt_time":"2026-01-20T12:00:00Z","vendor_name":"Bistro","receipt_no":"B-2","subtotal":18.0,"gst_hst":2.0,"pst_qst":0.0,"tax":2.0,"total":20.0,"status":"verified","payment":"Cash","chart_of_acct":"Meals","image_url":null,"created_at":"2026-01-20T12:30:00Z"}
{"id":1,"receipt_time":"2026-01-05T10:00:00Z","vendor_name":"Bistro","receipt_no":"B-1","subtotal":9.0,"gst_hst":1.0,"pst_qst":0.0,"tax":1.0,"total":10.0,"status":"pending","payment":"Visa","chart_of_acct":"Office Supplies","image_url":null,"created_at":"2026-01-05T10:30:00Z"}
"#;

    cli::testing::generate_testcases![
        (
            assign_selected,
            cli::testing::MutCase {
                invocations: &[cli::testing::Invocation {
                    args: &["", "assign", " Office Supplies ", "3", "1", "3"],
                    res: cli::testing::ResultMatcher::OkExact(cli::Output::Str(
                        "Assigned 'Office Supplies' to 2 receipts.".to_string()
                    )),
                }],
                initial_state: cli::testing::StrState::new()
                    .with_config("{}")
                    .with_rl(cli::testing::SAMPLE_RL),
                final_state: cli::testing::State::new()
                    .with_config(base::Config::default())
                    .with_rl(ASSIGNED_RL),
            }
        ),
        (
            rejected,
            cli::testing::Case {
                invocations: &[
                    cli::testing::Invocation {
                        args: &["", "assign", "Travel"],
                        res: cli::testing::ResultMatcher::ErrGlob("select at least one receipt"),
                    },
                    cli::testing::Invocation {
                        args: &["", "assign", "  ", "1"],
                        res: cli::testing::ResultMatcher::ErrGlob("category must not be empty"),
                    },
                    cli::testing::Invocation {
                        args: &["", "assign", "Travel", "1", "8"],
                        res: cli::testing::ResultMatcher::ErrGlob("failed to update receipts"),
                    },
                ],
                initial_state: cli::testing::StrState::new()
                    .with_config("{}")
                    .with_rl(cli::testing::SAMPLE_RL),
            }
        ),
    ];
}
