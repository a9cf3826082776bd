use crate::error::{Error, Result};
use crate::network::StellarNetwork;
use crate::ops;
use crate::options::SetOptions;
use crate::Client;
use base64::{engine::general_purpose, Engine as _};
use log::{debug, error, info};
use stellar_base::amount::Stroops;
use stellar_base::{Operation, PublicKey, Transaction};
use stellar_horizon::api::{accounts, transactions};
use stellar_horizon::client::{HorizonClient, HorizonHttpClient};
use stellar_horizon::error::Error as HorizonError;
use stellar_horizon::resources::{Account, Signer};

pub const BASE_FEE: i64 = 100;

/// Result of a transaction accepted by the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submitted {
    pub hash: String,
    pub ledger: String,
}

// Logs the problem document the way a failed submission is inspected by hand.
fn horizon_err(e: HorizonError) -> Error {
    match &e {
        HorizonError::HorizonRequestError(problem) => {
            error!("Horizon Problem status {}", problem.status);
            error!("- type: {}", problem.type_);
            error!("- title: {}", problem.title);
            error!("- detail: {}", problem.detail);
        }
        other => error!("Horizon Problem: {}", other),
    }
    let err = Error::Horizon(e);
    if let Some((tx, ops)) = err.result_codes() {
        error!("..failure txCode {} opCodes {:?}", tx, ops);
    }
    err
}

fn client_err<E: std::fmt::Display>(e: E) -> Error {
    error!("Horizon client: {}", e);
    Error::Response(e.to_string())
}

/// Builds a transaction with `source` as source account and signs it with
/// the source and every cosigner, in order.
pub fn signed_transaction(
    source: &Client,
    cosigners: &[&Client],
    sequence: i64,
    operations: Vec<Operation>,
) -> Result<Transaction> {
    let mut builder = Transaction::builder(
        source.kp.public_key().clone(),
        sequence,
        Stroops::new(BASE_FEE),
    );
    for op in operations {
        builder = builder.add_operation(op);
    }
    let mut tx = builder.into_transaction()?;
    source.sign(&mut tx)?;
    for cosigner in cosigners {
        debug!("cosigning with {}", cosigner.address());
        cosigner.sign(&mut tx)?;
    }
    Ok(tx)
}

pub struct Ledger {
    network: StellarNetwork,
    horizon: HorizonHttpClient,
}

impl Ledger {
    pub fn new(network: StellarNetwork) -> Result<Self> {
        let horizon = HorizonHttpClient::new(network.to_network_url()).map_err(client_err)?;
        Ok(Ledger { network, horizon })
    }

    pub fn network(&self) -> StellarNetwork {
        self.network
    }

    pub async fn load_account(&self, address: &str) -> Result<Account> {
        let public = PublicKey::from_account_id(address)?;
        let request = accounts::single(&public);
        let resp = self.horizon.request(request).await.map_err(horizon_err)?;
        Ok(resp.1)
    }

    pub async fn signers(&self, address: &str) -> Result<Vec<Signer>> {
        Ok(self.load_account(address).await?.signers)
    }

    // horizon reports the sequence as a decimal string
    pub async fn sequence(&self, address: &str) -> Result<i64> {
        let account = self.load_account(address).await?;
        account
            .sequence
            .to_string()
            .parse::<i64>()
            .map_err(|e| Error::Response(format!("bad sequence for {}: {}", address, e)))
    }

    /// Reads a data entry of the account, decoded as utf-8.
    pub async fn data_entry(&self, address: &str, key: &str) -> Result<Option<String>> {
        let mut account = self.load_account(address).await?;
        let value = match account.data.remove(key) {
            Some(d) => {
                let raw = general_purpose::STANDARD
                    .decode(d)
                    .map_err(|e| Error::Response(format!("data entry {}: {}", key, e)))?;
                Some(
                    String::from_utf8(raw)
                        .map_err(|e| Error::Response(format!("data entry {}: {}", key, e)))?,
                )
            }
            None => None,
        };
        Ok(value)
    }

    /// Asks friendbot to create and fund `address`.
    pub async fn fund(&self, address: &str) -> Result<()> {
        let url = self
            .network
            .to_friendbot_url()
            .ok_or(Error::NoFriendbot(self.network.name()))?;

        info!("Requesting funding for {}", address);
        let resp = reqwest::get(format!("{}/?addr={}", url, address)).await?;
        let status = resp.status();
        let body = resp.text().await?;
        debug!("friendbot answered {}: {}", status, body);
        if !status.is_success() {
            return Err(Error::Response(format!("friendbot returned {}", status)));
        }
        Ok(())
    }

    /// Builds a transaction from `operations` with the client as source,
    /// signs it and submits it.
    pub async fn submit(&self, client: &Client, operations: Vec<Operation>) -> Result<Submitted> {
        self.submit_with(client, &[], operations).await
    }

    /// Like [`Ledger::submit`], with extra signatures from `cosigners` for
    /// accounts that need more than the source's weight.
    pub async fn submit_with(
        &self,
        source: &Client,
        cosigners: &[&Client],
        operations: Vec<Operation>,
    ) -> Result<Submitted> {
        let sequence = self.sequence(&source.address()).await? + 1;
        let tx = signed_transaction(source, cosigners, sequence, operations)?;
        debug!("submitting with {} signatures", tx.signatures().len());

        let request = transactions::submit(&tx.into_envelope()).map_err(client_err)?;
        let (_, resp) = self.horizon.request(request).await.map_err(horizon_err)?;

        let submitted = Submitted {
            hash: resp.hash.to_string(),
            ledger: resp.ledger.to_string(),
        };
        info!("..successful ledger {} hash {}", submitted.ledger, submitted.hash);
        Ok(submitted)
    }

    // Makes sure the account exists so no fee is paid for a missing one.
    async fn check_exists(&self, address: &str) -> Result<()> {
        self.load_account(address).await.map(|_| ())
    }

    /// Pays `amount` of `code` (native when empty) to `destination`. Credit
    /// assets are issued by `issuer`, or by the source account when `None`.
    pub async fn pay(
        &self,
        source: &Client,
        cosigners: &[&Client],
        destination: &str,
        code: &str,
        amount: &str,
        issuer: Option<&str>,
        check_dest: bool,
    ) -> Result<Submitted> {
        if check_dest {
            self.check_exists(destination).await?;
        }
        let issuer = match issuer {
            Some(i) => PublicKey::from_account_id(i)?,
            None => source.kp.public_key().clone(),
        };
        let asset = ops::asset(code, &issuer)?;
        let op = ops::payment(&PublicKey::from_account_id(destination)?, asset, amount)?;

        info!(
            "Payment Transaction {} {} from {} to {}",
            code,
            amount,
            source.address(),
            destination
        );
        self.submit_with(source, cosigners, vec![op]).await
    }

    pub async fn trust(
        &self,
        holder: &Client,
        cosigners: &[&Client],
        code: &str,
        issuer: &str,
        limit: &str,
        check_issuer: bool,
    ) -> Result<Submitted> {
        if check_issuer {
            self.check_exists(issuer).await?;
        }
        let op = ops::trust(code, &PublicKey::from_account_id(issuer)?, limit)?;

        info!(
            "Trust Transaction {} {} from {} to {}",
            code,
            limit,
            holder.address(),
            issuer
        );
        self.submit_with(holder, cosigners, vec![op]).await
    }

    pub async fn allow_trust(
        &self,
        issuer: &Client,
        cosigners: &[&Client],
        code: &str,
        trustor: &str,
        authorize: bool,
        check_trustor: bool,
    ) -> Result<Submitted> {
        if check_trustor {
            self.check_exists(trustor).await?;
        }
        let op = ops::allow_trust(&PublicKey::from_account_id(trustor)?, code, authorize)?;

        info!(
            "AllowTrust Transaction {} authorize {} from {} to {}",
            code,
            authorize,
            issuer.address(),
            trustor
        );
        self.submit_with(issuer, cosigners, vec![op]).await
    }

    pub async fn set_options(
        &self,
        client: &Client,
        cosigners: &[&Client],
        so: &SetOptions,
    ) -> Result<Submitted> {
        let op = ops::set_options(so)?;
        info!("SetOptions Transaction addr {}", client.address());
        debug!("options: {:?}", so);
        self.submit_with(client, cosigners, vec![op]).await
    }
}
