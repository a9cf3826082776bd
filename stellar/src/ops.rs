//! Operations submitted by the drills.

use crate::error::{Error, Result};
use crate::options::{SetOptions, SignerKeyType, SignerSpec};
use std::str::FromStr;
use stellar_base::account::{AccountFlags, TrustLineFlags};
use stellar_base::amount::Amount;
use stellar_base::asset::{Asset, CreditAssetType};
use stellar_base::operations::Operation;
use stellar_base::signature::{HashX, PreAuthTxHash, Signer, SignerKey};
use stellar_base::xdr::XDRDeserialize;
use stellar_base::transaction::TransactionEnvelope;
use stellar_base::PublicKey;

const MAX_ASSET_CODE_LEN: usize = 12;
const SHORT_ASSET_CODE_LEN: usize = 4;

/// Native asset for an empty code, otherwise a credit asset of `issuer`.
pub fn asset(code: &str, issuer: &PublicKey) -> Result<Asset> {
    if code.is_empty() {
        return Ok(Asset::new_native());
    }
    check_asset_code(code)?;
    Ok(Asset::new_credit(code, issuer.clone())?)
}

fn check_asset_code(code: &str) -> Result<()> {
    if code.is_empty()
        || code.len() > MAX_ASSET_CODE_LEN
        || !code.bytes().all(|b| b.is_ascii_alphanumeric())
    {
        return Err(Error::Ledger(format!("invalid asset code {:?}", code)));
    }
    Ok(())
}

fn amount(amount: &str) -> Result<Amount> {
    Ok(Amount::from_str(amount)?)
}

pub fn payment(destination: &PublicKey, asset: Asset, amt: &str) -> Result<Operation> {
    Ok(Operation::new_payment()
        .with_destination(destination.clone())
        .with_amount(amount(amt)?)?
        .with_asset(asset)
        .build()?)
}

pub fn trust(code: &str, issuer: &PublicKey, limit: &str) -> Result<Operation> {
    let asset = asset(code, issuer)?;
    Ok(Operation::new_change_trust()
        .with_asset(asset.into())
        .with_limit(Some(amount(limit)?))?
        .build()?)
}

/// Authorizes (or revokes) the trust line `trustor` holds for `code`.
pub fn allow_trust(trustor: &PublicKey, code: &str, authorize: bool) -> Result<Operation> {
    check_asset_code(code)?;
    let flags = if authorize {
        TrustLineFlags::AUTHORIZED
    } else {
        TrustLineFlags::empty()
    };
    Ok(Operation::new_allow_trust()
        .with_trustor(trustor.clone())
        .with_asset(credit_asset_type(code))
        .with_authorize_flags(flags)
        .build()?)
}

fn credit_asset_type(code: &str) -> CreditAssetType {
    if code.len() <= SHORT_ASSET_CODE_LEN {
        CreditAssetType::CreditAlphaNum4(code.to_string())
    } else {
        CreditAssetType::CreditAlphaNum12(code.to_string())
    }
}

pub fn set_options(so: &SetOptions) -> Result<Operation> {
    let mut op = Operation::new_set_options()
        .with_inflation_destination(so.inflation_dest.clone())
        .with_clear_flags(account_flags(so.clear_flags)?)
        .with_set_flags(account_flags(so.set_flags)?)
        .with_master_weight(so.master_weight)
        .with_low_threshold(so.low_threshold)
        .with_medium_threshold(so.med_threshold)
        .with_high_threshold(so.high_threshold)
        .with_signer(so.signer.as_ref().map(signer).transpose()?)
        .build()?;
    // the builder has no home domain setter
    if let Operation::SetOptions(ref mut o) = op {
        *o.home_domain_mut() = so.home_domain.clone();
    }
    Ok(op)
}

fn account_flags(bits: Option<u32>) -> Result<Option<AccountFlags>> {
    match bits {
        None => Ok(None),
        Some(b) => AccountFlags::from_bits(b)
            .map(Some)
            .ok_or_else(|| Error::Ledger(format!("invalid account flags {:#x}", b))),
    }
}

fn signer(spec: &SignerSpec) -> Result<Signer> {
    let key = match spec.key_type {
        SignerKeyType::Ed25519 => SignerKey::Ed25519(PublicKey::from_slice(&spec.key)?),
        SignerKeyType::PreAuthTx => SignerKey::PreAuthTx(PreAuthTxHash::new(spec.key.to_vec())?),
        SignerKeyType::HashX => SignerKey::HashX(HashX::new(spec.key.to_vec())?),
    };
    Ok(Signer::new(key, spec.weight))
}

/// Decodes a base64 XDR transaction envelope, e.g. one copied from a
/// failed submission.
pub fn decode_envelope(xdr: &str) -> Result<TransactionEnvelope> {
    Ok(TransactionEnvelope::from_xdr_base64(xdr.trim())?)
}
