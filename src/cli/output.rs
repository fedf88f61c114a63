use crate::cli;

/// Output of a successful command invocation, to be written to stdout.
#[derive(Debug, PartialEq)]
pub enum Output {
    Str(String),
    /// Receipt table followed by an optional summary line.
    Listing {
        table: cli::util::Table,
        footer: Option<String>,
    },
}

impl std::fmt::Display for Output {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Output::Str(s) => {
                if s.ends_with('\n') {
                    write!(f, "{}", s)
                } else {
                    writeln!(f, "{}", s)
                }
            }
            Output::Listing { table, footer } => {
                if table.is_empty() {
                    return writeln!(f, "No receipts.");
                }
                write!(f, "{}", table)?;
                match footer {
                    Some(s) => writeln!(f, "\n{}", s),
                    None => Ok(()),
                }
            }
        }
    }
}
