use crate::base;
use crate::cli;

/// View suggested and used charts of account
///
/// Suggested categories come first, in their usual order, followed by any
/// other category found on a receipt.
#[derive(clap::Parser)]
pub struct Cats {
    /// Wildcard pattern to match categories of interest
    ///
    /// If multiple patterns are provided, include categories that match any
    /// pattern.
    #[arg(default_value = "*")]
    pub category: Vec<String>,
}

impl Cats {
    pub fn run(&self, rl: &base::Recordlist) -> anyhow::Result<cli::Output> {
        let patterns = self
            .category
            .iter()
            .map(|s| wildmatch::WildMatch::new(s))
            .collect::<Vec<_>>();
        let wanted = |cat: &str| patterns.iter().any(|p| p.matches(cat));

        let used = rl
            .iter()
            .map(|r| r.chart_of_account())
            .filter(|cat| !cat.is_empty())
            .map(|cat| (cat, 1))
            .collect::<base::Aggregate<&str, usize>>();
        let mut cats = base::SUGGESTED_CATEGORIES
            .iter()
            .map(|&cat| (cat, used.get(&cat).unwrap_or(0)))
            .collect::<Vec<_>>();
        cats.extend(
            used.iter()
                .map(|(&cat, n)| (cat, n))
                .filter(|(cat, _)| !base::SUGGESTED_CATEGORIES.contains(cat)),
        );
        cats.retain(|&(cat, _)| wanted(cat));

        if cats.is_empty() {
            return Ok(cli::Output::Str("No categories.".to_string()));
        }
        let mut table = cli::util::Table::new(&[
            ("Category", cli::util::Align::Left),
            ("Receipts", cli::util::Align::Right),
        ]);
        for (cat, n) in cats {
            table.push(vec![cat.into(), n.to_string().into()]);
        }
        Ok(cli::Output::Str(table.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;

    cli::testing::generate_testcases![
        (
            suggestions_without_receipts,
            cli::testing::Case {
                invocations: &[cli::testing::Invocation {
                    args: &["", "cats"],
                    res: cli::testing::ResultMatcher::OkStrGlob(
                        "category*receipts\noffice supplies*0\nmeals & entertainment*0\n*\nother*0"
                    ),
                }],
                initial_state: cli::testing::StrState::new().with_config("{}"),
            }
        ),
        (
            used_categories_follow_suggestions,
            cli::testing::Case {
                invocations: &[
                    cli::testing::Invocation {
                        args: &["", "cats"],
                        res: cli::testing::ResultMatcher::OkStrGlob(
                            "*\nother                         0\nmeals                         2\nsupplies                      1"
                        ),
                    },
                    cli::testing::Invocation {
                        args: &["", "cats", "M*"],
                        res: cli::testing::ResultMatcher::OkRendered(indoc! {"
                            Category               Receipts
                            Meals & Entertainment         0
                            Meals                         2
                        "}),
                    },
                    cli::testing::Invocation {
                        args: &["", "cats", "Fuel", "Parking*"],
                        res: cli::testing::ResultMatcher::OkRendered("No categories.\n"),
                    },
                ],
                initial_state: cli::testing::StrState::new()
                    .with_config("{}")
                    .with_rl(cli::testing::SAMPLE_RL),
            }
        ),
    ];
}
