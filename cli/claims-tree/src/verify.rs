use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use claims_tree::{hex_encode, ClaimsFile, VerificationFile};

#[derive(Args, Debug)]
#[command(group = clap::ArgGroup::new("source").required(true).args(["replay", "claims"]))]
pub struct Cli {
    /// Verification file: rebuild the tree from its values and compare roots
    #[arg(short, long)]
    replay: Option<PathBuf>,

    /// Claims file: check each claim's proof against its root
    #[arg(short, long)]
    claims: Option<PathBuf>,

    /// Only check this address (with --claims)
    #[arg(short, long, requires = "claims")]
    address: Option<String>,
}

fn replay(path: &Path) -> Result<()> {
    let file = VerificationFile::load(path).context("Failed to load verification file")?;
    let tree = file.replay().context("Verification file does not reproduce its root")?;
    println!("Root verified: {} ({} leaves)", hex_encode(tree.root()), tree.len());
    Ok(())
}

fn check_claims(path: &Path, address: Option<&str>) -> Result<()> {
    let claims = ClaimsFile::load(path).context("Failed to load claims file")?;

    let addresses: Vec<String> = match address {
        Some(address) => vec![address.to_string()],
        None => claims.claims.keys().cloned().collect(),
    };

    let mut failed = 0usize;
    for address in &addresses {
        let ok = claims
            .verify_claim(address)
            .with_context(|| format!("Failed to check claim for {address}"))?;
        if ok {
            info!(%address, "claim verified");
        } else {
            warn!(%address, "claim does not verify");
            failed += 1;
        }
    }

    println!(
        "{} of {} claims verified against {}",
        addresses.len() - failed,
        addresses.len(),
        claims.merkle_root
    );
    if failed > 0 {
        anyhow::bail!("{failed} claims failed verification");
    }
    Ok(())
}

pub fn run(cli: &Cli) -> Result<()> {
    if let Some(path) = &cli.replay {
        replay(path)?;
    }
    if let Some(path) = &cli.claims {
        check_claims(path, cli.address.as_deref())?;
    }
    Ok(())
}
