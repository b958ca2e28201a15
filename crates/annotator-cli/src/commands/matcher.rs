//! Pattern evaluation
//!
//! Usage: annotator match <PATTERN> <CANDIDATE>

use annotator_core::matcher::matches;
use annotator_core::rules::validation::is_valid_pattern;
use clap::Args;

#[derive(Debug, Args)]
pub struct MatchArgs {
    /// Comma-separated glob entries, `!` negates (e.g. "!kube-*,default")
    pub pattern: String,

    /// Namespace or object name to test
    pub candidate: String,
}

/// Print `true` or `false`
pub fn execute(args: MatchArgs) -> Result<(), Box<dyn std::error::Error>> {
    if !is_valid_pattern(&args.pattern) {
        tracing::warn!(
            pattern = args.pattern.as_str(),
            "pattern would be rejected in a policy"
        );
    }
    println!("{}", matches(&args.pattern, &args.candidate));
    Ok(())
}
