use crate::cli;

/// Helps check if a command returns the expected [`anyhow::Result<cli::Output>`].
pub enum ResultMatcher<'a> {
    /// Asserts result is `Ok` and its payload equals the given value.
    OkExact(cli::Output),

    /// Asserts result is `Ok` and its rendered text, without the trailing
    /// newline, matches the given glob pattern. Matching is case-insensitive.
    OkStrGlob(&'a str),

    /// Asserts result is `Ok` and its rendered text equals the given string
    /// exactly. Mismatches print a diff.
    OkRendered(&'a str),

    /// Asserts result is `Err` and that the error's `to_string()` matches the
    /// give glob pattern. Matching is case-insensitive.
    ErrGlob(&'a str),
}

fn print_diff_and_panic(want: &str, got: &str) -> ! {
    text_diff::print_diff(want, got, " ");
    panic!("diff between want (red) and got (green), see above");
}

impl ResultMatcher<'_> {
    pub fn assert_matches(&self, result: anyhow::Result<cli::Output>) {
        match self {
            ResultMatcher::OkExact(want_output) => {
                if let Ok(got_output) = &result {
                    if got_output == want_output {
                        return;
                    }
                    print_diff_and_panic(
                        format!("{:?}", want_output).as_str(),
                        format!("{:?}", got_output).as_str(),
                    );
                }
                panic!("\n\twant: {:?}\n\tgot: {:?}\n", want_output, result);
            }
            ResultMatcher::OkStrGlob(pattern) => {
                let pattern_obj = wildmatch::WildMatch::new(pattern.to_lowercase().as_str());
                let matches = matches!(
                    result,
                    Ok(ref got) if pattern_obj.matches(got.to_string().trim_end().to_lowercase().as_str()),
                );
                assert!(
                    matches,
                    "\n\twant matches: Ok({:?})\n\tgot: {:?}\n",
                    pattern,
                    result.map(|o| o.to_string())
                );
            }
            ResultMatcher::OkRendered(want) => match &result {
                Ok(got) => {
                    let got = got.to_string();
                    if got != *want {
                        print_diff_and_panic(want, &got);
                    }
                }
                Err(e) => panic!("\n\twant: Ok({:?})\n\tgot: Err({:?})\n", want, e),
            },
            ResultMatcher::ErrGlob(pattern) => {
                let pattern_obj = wildmatch::WildMatch::new(pattern.to_lowercase().as_str());
                let matches = matches!(
                    result,
                    Err(ref got_err) if pattern_obj.matches(got_err.to_string().to_lowercase().as_str()),
                );
                assert!(
                    matches,
                    "\n\twant matches: Err({:?})\n\tgot: {:?}\n",
                    pattern,
                    result.map(|o| o.to_string())
                );
            }
        }
    }
}
