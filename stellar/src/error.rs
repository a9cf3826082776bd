use stellar_horizon::horizon_error::HorizonErrorExtras;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("seed length out of [8,24]: got {0}")]
    Configuration(usize),
    #[error("unknown network {0}, expected testnet or mainnet")]
    UnknownNetwork(String),
    #[error("wrong option: {0}")]
    InvalidOption(String),
    #[error("option {name} given more than once")]
    DuplicateOption { name: String },
    #[error("option {name} expects {expected}")]
    InvalidOptionValue { name: String, expected: &'static str },
    #[error("home domain is {0} bytes, at most 32 allowed")]
    HomeDomainTooLong(usize),
    #[error("unknown signer key type: {0}")]
    UnknownSignerKeyType(i32),
    #[error("invalid account label: {0:?}")]
    InvalidLabel(String),
    #[error("friendbot is not available on {0}")]
    NoFriendbot(&'static str),
    #[error("ledger error: {0}")]
    Ledger(String),
    #[error("horizon error: {0}")]
    Horizon(#[from] stellar_horizon::error::Error),
    #[error("unexpected response: {0}")]
    Response(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl From<stellar_base::error::Error> for Error {
    fn from(e: stellar_base::error::Error) -> Self {
        Error::Ledger(e.to_string())
    }
}

impl Error {
    /// Transaction and operation result codes of a failed submission,
    /// e.g. `("tx_failed", ["op_no_trust"])`.
    pub fn result_codes(&self) -> Option<(String, Vec<String>)> {
        match self {
            Error::Horizon(stellar_horizon::error::Error::HorizonRequestError(problem)) => {
                match &problem.extras {
                    Some(HorizonErrorExtras::TransactionFailed(failed)) => Some((
                        failed.result_codes.transaction.clone(),
                        failed.result_codes.operations.clone(),
                    )),
                    _ => None,
                }
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stellar_horizon::horizon_error::HorizonError;

    fn failed_submission() -> Error {
        let problem: HorizonError = serde_json::from_value(serde_json::json!({
            "type": "https://stellar.org/horizon-errors/transaction_failed",
            "title": "Transaction Failed",
            "status": 400,
            "detail": "The transaction failed when submitted to the stellar network.",
            "extras": {
                "envelope_xdr": "AAAA",
                "result_codes": {
                    "transaction": "tx_failed",
                    "operations": ["op_no_trust"]
                },
                "result_xdr": "AAAA"
            }
        }))
        .unwrap();
        Error::Horizon(stellar_horizon::error::Error::HorizonRequestError(problem))
    }

    #[test]
    fn result_codes_of_failed_transaction() {
        let (tx, ops) = failed_submission().result_codes().unwrap();
        assert_eq!(tx, "tx_failed");
        assert_eq!(ops, vec!["op_no_trust".to_string()]);
    }

    #[test]
    fn other_errors_have_no_result_codes() {
        assert!(Error::Configuration(3).result_codes().is_none());
        assert!(Error::InvalidOption("Weight".to_string())
            .result_codes()
            .is_none());
    }
}
