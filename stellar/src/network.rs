use crate::error::Error;
use std::fmt;
use std::str::FromStr;
pub use stellar_base::Network;

const HORIZON_URL: &str = "https://horizon.stellar.org";
const HORIZON_TEST_URL: &str = "https://horizon-testnet.stellar.org";
const FRIENDBOT_TEST_URL: &str = "https://friendbot.stellar.org";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StellarNetwork {
    #[default]
    Testnet,
    Mainnet,
}

impl StellarNetwork {
    pub fn to_network_url(self) -> &'static str {
        match self {
            StellarNetwork::Testnet => HORIZON_TEST_URL,
            StellarNetwork::Mainnet => HORIZON_URL,
        }
    }

    /// Friendbot only funds accounts on the test network.
    pub fn to_friendbot_url(self) -> Option<&'static str> {
        match self {
            StellarNetwork::Testnet => Some(FRIENDBOT_TEST_URL),
            StellarNetwork::Mainnet => None,
        }
    }

    pub fn to_stellar_network(self) -> Network {
        match self {
            StellarNetwork::Mainnet => Network::new_public(),
            StellarNetwork::Testnet => Network::new_test(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            StellarNetwork::Testnet => "testnet",
            StellarNetwork::Mainnet => "mainnet",
        }
    }
}

impl FromStr for StellarNetwork {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "testnet" | "test" => Ok(StellarNetwork::Testnet),
            "mainnet" | "public" => Ok(StellarNetwork::Mainnet),
            other => Err(Error::UnknownNetwork(other.to_string())),
        }
    }
}

impl fmt::Display for StellarNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
