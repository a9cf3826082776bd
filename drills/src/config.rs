use clap::{Parser, Subcommand};
use tn_stellar::{BaseSeed, SeedDeriver, StellarNetwork};

/// Testnet drills: deterministic identities, payments, trust lines and
/// account options.
#[derive(Debug, Parser)]
#[command(name = "tn-drills", disable_help_subcommand = true)]
pub struct Cli {
    /// Base seed shared by every drill identity (8 to 24 bytes)
    #[arg(long, env = "DRILL_BASE_SEED")]
    pub base_seed: String,
    /// testnet or mainnet
    #[arg(long, env = "DRILL_NETWORK", default_value = "testnet")]
    pub network: String,
    /// Verify that counterpart accounts exist before submitting
    #[arg(long)]
    pub check: bool,
    /// Label of an extra signer, repeat for each one
    #[arg(long = "cosign", global = true)]
    pub cosign: Vec<String>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print seed and address of each label
    Keys { labels: Vec<String> },
    /// Fund the account through friendbot
    Fund { label: String },
    /// Print balances and signers
    Balance { label: String },
    /// Print a data entry of the account
    Data { label: String, key: String },
    /// Decode a base64 transaction envelope
    Decode { xdr: String },
    Pay {
        from: String,
        to: String,
        amount: String,
        /// Asset code, native when omitted
        #[arg(long, default_value = "")]
        asset: String,
        /// Label of the issuer, defaults to the sender
        #[arg(long)]
        issuer: Option<String>,
    },
    Trust {
        holder: String,
        issuer: String,
        code: String,
        limit: String,
    },
    AllowTrust {
        issuer: String,
        trustor: String,
        code: String,
        #[arg(long)]
        revoke: bool,
    },
    /// Set account options, e.g. `HomeDomain=x.com SetFlags=0x3`
    SetOptions {
        label: String,
        #[arg(required = true)]
        options: Vec<String>,
    },
}

pub struct Config {
    pub deriver: SeedDeriver,
    pub network: StellarNetwork,
    pub check: bool,
    pub cosigners: Vec<String>,
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Result<Self, tn_stellar::Error> {
        let base = BaseSeed::new(&cli.base_seed)?;
        Ok(Config {
            deriver: SeedDeriver::new(base),
            network: cli.network.parse()?,
            check: cli.check,
            cosigners: cli.cosign.clone(),
        })
    }
}
