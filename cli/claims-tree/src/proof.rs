use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use tracing::{info, warn};

use claims_tree::{ClaimLookup, ClaimsFile, Error};

#[derive(Args, Debug)]
pub struct Cli {
    /// Claims file written by build-tree
    #[arg(short, long)]
    claims: PathBuf,

    /// Address to look up (0x followed by 40 hex characters)
    #[arg(short, long)]
    address: String,

    /// Directory for the proof-<address prefix>.json file
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,
}

fn display_claim(lookup: &ClaimLookup) {
    println!("Claim Details:");
    println!("Address: {}", lookup.address);
    println!("Index:   {}", lookup.index);
    println!("Amount:  {} (in wei)", lookup.amount);
    println!("Proof:");
    for (i, hash) in lookup.proof.iter().enumerate() {
        println!("  [{i}] {hash}");
    }
}

pub fn run(cli: &Cli) -> Result<()> {
    info!(path = ?cli.claims, "loading claims file");
    let claims = ClaimsFile::load(&cli.claims).context("Failed to load claims file")?;

    let lookup = match claims.lookup(&cli.address) {
        Ok(lookup) => lookup,
        Err(Error::NotFound(address)) => {
            warn!(%address, "no claim for address");
            anyhow::bail!("No claim found for this address: {address}");
        }
        Err(e) => return Err(e).context("Invalid address"),
    };

    let root = claims.root().context("Invalid Merkle root in claims file")?;
    if !lookup.verify(&root).context("Malformed claim")? {
        anyhow::bail!("Claim for {} does not verify against the root", lookup.address);
    }

    display_claim(&lookup);

    let path = cli.out_dir.join(lookup.file_name());
    lookup.save(&path).context("Failed to write proof file")?;
    println!("Proof saved to {}", path.display());

    Ok(())
}
