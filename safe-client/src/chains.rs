// Ideally we would reuse ethers' Chain type, but we want conversions scoped
// to the networks the comptroller pair actually deploys to, plus name-based
// parsing so configuration files can refer to chains by name rather than ID.

use std::{fmt, str::FromStr};

use ethers_core::types::U256;

use crate::err::SafeClientError;

// Trimmed to the chains a comptroller pair is deployed across: an origin
// chain (Ethereum) and a secondary rollup (Optimism or Arbitrum), with their
// testnets.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
#[repr(u64)]
pub enum Chain {
    Ethereum = 1,
    Goerli = 5,

    Optimism = 10,
    OptimismGoerli = 420,

    Arbitrum = 42161,
    ArbitrumGoerli = 421613,
}

impl From<Chain> for u64 {
    fn from(chain: Chain) -> Self {
        chain as u64
    }
}

impl From<Chain> for U256 {
    fn from(chain: Chain) -> Self {
        u64::from(chain).into()
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "{:?}", self)
    }
}

impl FromStr for Chain {
    type Err = SafeClientError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mainnet" | "ethereum" => Ok(Chain::Ethereum),
            "goerli" => Ok(Chain::Goerli),
            "optimism" => Ok(Chain::Optimism),
            "optimismgoerli" => Ok(Chain::OptimismGoerli),
            "arbitrum" => Ok(Chain::Arbitrum),
            "arbitrumgoerli" => Ok(Chain::ArbitrumGoerli),
            _ => Err(SafeClientError::UnknownChain(s.to_string())),
        }
    }
}
