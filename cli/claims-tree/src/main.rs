#![forbid(unsafe_code)]

use clap::{ArgAction, Parser, Subcommand};

mod build_tree;
mod logging;
mod proof;
mod verify;

#[derive(Parser, Debug)]
#[command(name = "claims-tree")]
#[command(about = "Merkle claim trees for token distributions", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the tree from a record list and write the claims and verification files
    BuildTree(build_tree::Cli),
    /// Look up the claim and proof for one address
    Proof(proof::Cli),
    /// Check a verification file or the claims in a claims file against their root
    Verify(verify::Cli),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    match cli.command {
        Commands::BuildTree(args) => build_tree::run(&args)?,
        Commands::Proof(args) => proof::run(&args)?,
        Commands::Verify(args) => verify::run(&args)?,
    }

    Ok(())
}
