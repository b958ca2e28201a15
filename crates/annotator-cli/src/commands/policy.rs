//! Policy validation command
//!
//! Usage: annotator policy validate <FILE> [--provenance-key KEY]

use std::path::PathBuf;

use annotator_core::reconcile::DEFAULT_PROVENANCE_KEY;
use annotator_core::RuleStore;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct PolicyArgs {
    #[command(subcommand)]
    pub command: PolicyCommand,
}

#[derive(Debug, Subcommand)]
pub enum PolicyCommand {
    /// Parse and validate a policy document (rule name -> rule)
    Validate(ValidateArgs),
}

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Path to the policy YAML file
    pub path: PathBuf,

    /// Annotation key rules may not set
    #[arg(long, default_value = DEFAULT_PROVENANCE_KEY)]
    pub provenance_key: String,
}

/// Execute policy command
pub fn execute(args: PolicyArgs) -> Result<(), Box<dyn std::error::Error>> {
    match args.command {
        PolicyCommand::Validate(validate_args) => execute_validate(validate_args),
    }
}

fn execute_validate(args: ValidateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(&args.path)?;

    let store = RuleStore::with_reserved_key(args.provenance_key);
    store.update(&text)?;

    let rules = store.get();
    println!("✓ {} valid ({} rules)", args.path.display(), rules.len());
    for rule in rules.iter() {
        println!(
            "  {}: namespace={:?} name={:?} annotations={}",
            rule.name(),
            rule.namespace_pattern().as_str(),
            rule.name_pattern().as_str(),
            rule.annotations().len()
        );
    }
    Ok(())
}
