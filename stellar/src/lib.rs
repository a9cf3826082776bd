use log::debug;
use stellar_base::crypto::KeyPair;
pub use stellar_base::{Network, Operation, PublicKey, Transaction};

pub mod error;
pub mod ledger;
pub mod network;
pub mod ops;
pub mod options;
pub mod seed;

pub use error::{Error, Result};
pub use ledger::{signed_transaction, Ledger, Submitted};
pub use network::StellarNetwork;
pub use options::{encode, encode_typed, OptionValue, OptionsRequest, SetOption, SetOptions};
pub use seed::{BaseSeed, DerivedSeed, SeedDeriver};

pub struct Client {
    pub kp: KeyPair,
    pub network: StellarNetwork,
}

impl Client {
    pub fn new(seed: &str, network: StellarNetwork) -> Result<Self> {
        let kp = KeyPair::from_secret_seed(seed)?;
        Ok(Client { kp, network })
    }

    /// Client for the drill identity `label`.
    pub fn from_label(deriver: &SeedDeriver, label: &str, network: StellarNetwork) -> Result<Self> {
        let kp = deriver
            .keypair(label)
            .ok_or_else(|| Error::InvalidLabel(label.to_string()))?;
        Ok(Client { kp, network })
    }

    pub fn address(&self) -> String {
        self.kp.public_key().account_id()
    }

    pub fn secret_seed(&self) -> String {
        self.kp.secret_key().secret_seed()
    }

    pub fn sign(&self, tx: &mut Transaction) -> Result<()> {
        Ok(tx.sign(&self.kp, &self.network.to_stellar_network())?)
    }
}

/// Random keypair for throwaway accounts.
pub fn random_keypair() -> Result<KeyPair> {
    sodiumoxide::init().map_err(|_| Error::Ledger("sodium init failed".to_string()))?;
    let kp = KeyPair::random()?;
    debug!("generated random address {}", kp.public_key().account_id());
    Ok(kp)
}
