use anyhow::{Context, Result};
use clap::Args;
use std::fs;
use std::path::PathBuf;
use tracing::info;

use claims_tree::claims::{export, CLAIMS_FILE_NAME, VERIFICATION_FILE_NAME};
use claims_tree::{hex_encode, load_records};

#[derive(Args, Debug)]
pub struct Cli {
    /// Record list: CSV lines `address,index,amount`, or a JSON array when the file ends in .json
    #[arg(short, long)]
    input: PathBuf,

    /// Directory for merkle-tree-data.json and merkle-tree-verification.json
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,
}

pub fn run(cli: &Cli) -> Result<()> {
    info!(input = ?cli.input, "reading records");
    let records = load_records(&cli.input)
        .with_context(|| format!("Failed to load records from {:?}", cli.input))?;
    info!(count = records.len(), "loaded records");

    let export = export(records).context("Failed to build Merkle tree")?;

    fs::create_dir_all(&cli.out_dir).context("Failed to create output directory")?;

    let claims_path = cli.out_dir.join(CLAIMS_FILE_NAME);
    export
        .claims
        .save(&claims_path)
        .context("Failed to write claims file")?;
    info!(path = ?claims_path, "wrote claims file");

    let verification_path = cli.out_dir.join(VERIFICATION_FILE_NAME);
    export
        .verification
        .save(&verification_path)
        .context("Failed to write verification file")?;
    info!(path = ?verification_path, "wrote verification file");

    println!("Merkle root: {}", hex_encode(export.tree.root()));
    println!("Leaves: {}", export.tree.len());
    println!("Depth: {}", export.tree.depth());

    Ok(())
}
