//! Set-options payloads.
//!
//! Options can be given either as typed [`SetOption`] values or as a
//! name-keyed [`OptionsRequest`], where every value is checked against the
//! type its option expects. Either way the whole request is validated before
//! a [`SetOptions`] is returned.

use crate::error::{Error, Result};
use log::debug;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use stellar_base::PublicKey;

pub const HOME_DOMAIN_MAX_LEN: usize = 32;
pub const KEY_LEN: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OptionName {
    InflationDest,
    ClearFlags,
    SetFlags,
    MasterWeight,
    LowThreshold,
    MedThreshold,
    HighThreshold,
    HomeDomain,
    Signer,
}

impl OptionName {
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionName::InflationDest => "InflationDest",
            OptionName::ClearFlags => "ClearFlags",
            OptionName::SetFlags => "SetFlags",
            OptionName::MasterWeight => "MasterWeight",
            OptionName::LowThreshold => "LowThreshold",
            OptionName::MedThreshold => "MedThreshold",
            OptionName::HighThreshold => "HighThreshold",
            OptionName::HomeDomain => "HomeDomain",
            OptionName::Signer => "Signer",
        }
    }
}

impl FromStr for OptionName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let name = match s {
            "InflationDest" => OptionName::InflationDest,
            "ClearFlags" => OptionName::ClearFlags,
            "SetFlags" => OptionName::SetFlags,
            "MasterWeight" => OptionName::MasterWeight,
            "LowThreshold" => OptionName::LowThreshold,
            "MedThreshold" => OptionName::MedThreshold,
            "HighThreshold" => OptionName::HighThreshold,
            "HomeDomain" => OptionName::HomeDomain,
            "Signer" => OptionName::Signer,
            other => return Err(Error::InvalidOption(other.to_string())),
        };
        Ok(name)
    }
}

impl fmt::Display for OptionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Discriminant of the signer key, as used on the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignerKeyType {
    Ed25519,
    PreAuthTx,
    HashX,
}

impl TryFrom<i32> for SignerKeyType {
    type Error = Error;

    fn try_from(value: i32) -> Result<Self> {
        match value {
            0 => Ok(SignerKeyType::Ed25519),
            1 => Ok(SignerKeyType::PreAuthTx),
            2 => Ok(SignerKeyType::HashX),
            other => Err(Error::UnknownSignerKeyType(other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignerSpec {
    pub key_type: SignerKeyType,
    pub key: [u8; KEY_LEN],
    pub weight: u32,
}

impl SignerSpec {
    pub fn new(key_type: i32, key: [u8; KEY_LEN], weight: u32) -> Result<Self> {
        Ok(SignerSpec {
            key_type: SignerKeyType::try_from(key_type)?,
            key,
            weight,
        })
    }
}

/// Dynamically typed option value, as found in a name-keyed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    Uint(u32),
    Text(String),
    Key([u8; KEY_LEN]),
    Signer(SignerSpec),
}

impl OptionValue {
    fn kind(&self) -> &'static str {
        match self {
            OptionValue::Uint(_) => "an unsigned integer",
            OptionValue::Text(_) => "a string",
            OptionValue::Key(_) => "32 bytes of key material",
            OptionValue::Signer(_) => "a signer",
        }
    }
}

impl From<u32> for OptionValue {
    fn from(v: u32) -> Self {
        OptionValue::Uint(v)
    }
}

impl From<&str> for OptionValue {
    fn from(v: &str) -> Self {
        OptionValue::Text(v.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(v: String) -> Self {
        OptionValue::Text(v)
    }
}

impl From<[u8; KEY_LEN]> for OptionValue {
    fn from(v: [u8; KEY_LEN]) -> Self {
        OptionValue::Key(v)
    }
}

impl From<SignerSpec> for OptionValue {
    fn from(v: SignerSpec) -> Self {
        OptionValue::Signer(v)
    }
}

/// A single option with its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetOption {
    InflationDest([u8; KEY_LEN]),
    ClearFlags(u32),
    SetFlags(u32),
    MasterWeight(u32),
    LowThreshold(u32),
    MedThreshold(u32),
    HighThreshold(u32),
    HomeDomain(String),
    Signer(SignerSpec),
}

impl SetOption {
    pub fn name(&self) -> OptionName {
        match self {
            SetOption::InflationDest(_) => OptionName::InflationDest,
            SetOption::ClearFlags(_) => OptionName::ClearFlags,
            SetOption::SetFlags(_) => OptionName::SetFlags,
            SetOption::MasterWeight(_) => OptionName::MasterWeight,
            SetOption::LowThreshold(_) => OptionName::LowThreshold,
            SetOption::MedThreshold(_) => OptionName::MedThreshold,
            SetOption::HighThreshold(_) => OptionName::HighThreshold,
            SetOption::HomeDomain(_) => OptionName::HomeDomain,
            SetOption::Signer(_) => OptionName::Signer,
        }
    }

    /// Pairs a name with a dynamically typed value. Values are never
    /// coerced: a mismatch is an [`Error::InvalidOptionValue`].
    pub fn from_named(name: &str, value: OptionValue) -> Result<Self> {
        let name: OptionName = name.parse()?;
        let opt = match (name, value) {
            (OptionName::InflationDest, OptionValue::Key(k)) => SetOption::InflationDest(k),
            (OptionName::ClearFlags, OptionValue::Uint(v)) => SetOption::ClearFlags(v),
            (OptionName::SetFlags, OptionValue::Uint(v)) => SetOption::SetFlags(v),
            (OptionName::MasterWeight, OptionValue::Uint(v)) => SetOption::MasterWeight(v),
            (OptionName::LowThreshold, OptionValue::Uint(v)) => SetOption::LowThreshold(v),
            (OptionName::MedThreshold, OptionValue::Uint(v)) => SetOption::MedThreshold(v),
            (OptionName::HighThreshold, OptionValue::Uint(v)) => SetOption::HighThreshold(v),
            (OptionName::HomeDomain, OptionValue::Text(s)) => SetOption::HomeDomain(s),
            (OptionName::Signer, OptionValue::Signer(s)) => SetOption::Signer(s),
            (name, value) => {
                debug!("rejected {} for option {}", value.kind(), name);
                return Err(Error::InvalidOptionValue {
                    name: name.to_string(),
                    expected: expected_kind(name),
                });
            }
        };
        Ok(opt)
    }
}

fn expected_kind(name: OptionName) -> &'static str {
    match name {
        OptionName::InflationDest => "32 bytes of key material",
        OptionName::HomeDomain => "a string",
        OptionName::Signer => "a signer",
        _ => "an unsigned integer",
    }
}

/// Structured set-options payload. `None` leaves the account field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetOptions {
    pub inflation_dest: Option<PublicKey>,
    pub clear_flags: Option<u32>,
    pub set_flags: Option<u32>,
    pub master_weight: Option<u32>,
    pub low_threshold: Option<u32>,
    pub med_threshold: Option<u32>,
    pub high_threshold: Option<u32>,
    pub home_domain: Option<String>,
    pub signer: Option<SignerSpec>,
}

impl SetOptions {
    pub fn is_empty(&self) -> bool {
        *self == SetOptions::default()
    }

    fn apply(&mut self, opt: SetOption) -> Result<()> {
        match opt {
            SetOption::InflationDest(key) => {
                self.inflation_dest = Some(PublicKey::from_slice(&key)?);
            }
            SetOption::ClearFlags(v) => self.clear_flags = Some(v),
            SetOption::SetFlags(v) => self.set_flags = Some(v),
            SetOption::MasterWeight(v) => self.master_weight = Some(v),
            SetOption::LowThreshold(v) => self.low_threshold = Some(v),
            SetOption::MedThreshold(v) => self.med_threshold = Some(v),
            SetOption::HighThreshold(v) => self.high_threshold = Some(v),
            SetOption::HomeDomain(domain) => {
                if domain.len() > HOME_DOMAIN_MAX_LEN {
                    return Err(Error::HomeDomainTooLong(domain.len()));
                }
                self.home_domain = Some(domain);
            }
            SetOption::Signer(s) => self.signer = Some(s),
        }
        Ok(())
    }
}

/// Name-keyed request. A map key can only appear once, so every option is
/// set at most once.
pub type OptionsRequest = BTreeMap<String, OptionValue>;

/// Encodes a name-keyed request. Any unknown name or mistyped value fails
/// the whole request.
pub fn encode(request: &OptionsRequest) -> Result<SetOptions> {
    let options = request
        .iter()
        .map(|(name, value)| SetOption::from_named(name, value.clone()))
        .collect::<Result<Vec<_>>>()?;
    encode_typed(options)
}

/// Encodes typed options. Giving the same option twice is rejected.
pub fn encode_typed<I>(options: I) -> Result<SetOptions>
where
    I: IntoIterator<Item = SetOption>,
{
    let mut seen = Vec::new();
    let mut so = SetOptions::default();
    for opt in options {
        let name = opt.name();
        if seen.contains(&name) {
            return Err(Error::DuplicateOption {
                name: name.to_string(),
            });
        }
        seen.push(name);
        so.apply(opt)?;
    }
    Ok(so)
}

/// Parses a `Name=value` command line assignment. The value is read as the
/// type the named option expects: a `u32`, a hex encoded 32 byte key, a
/// `type:key:weight` signer triple, or plain text for the home domain.
pub fn parse_assignment(arg: &str) -> Result<(String, OptionValue)> {
    let (name, raw) = arg
        .split_once('=')
        .ok_or_else(|| Error::InvalidOption(arg.to_string()))?;
    let option: OptionName = name.parse()?;
    let invalid = || Error::InvalidOptionValue {
        name: option.to_string(),
        expected: expected_kind(option),
    };

    let value = match option {
        OptionName::HomeDomain => OptionValue::Text(raw.to_string()),
        OptionName::InflationDest => OptionValue::Key(parse_key(raw).ok_or_else(invalid)?),
        OptionName::Signer => {
            let mut parts = raw.splitn(3, ':');
            let (key_type, key, weight) = match (parts.next(), parts.next(), parts.next()) {
                (Some(t), Some(k), Some(w)) => (t, k, w),
                _ => return Err(invalid()),
            };
            let key_type = key_type.parse::<i32>().map_err(|_| invalid())?;
            let key = parse_key(key).ok_or_else(invalid)?;
            let weight = weight.parse::<u32>().map_err(|_| invalid())?;
            OptionValue::Signer(SignerSpec::new(key_type, key, weight)?)
        }
        _ => OptionValue::Uint(parse_u32(raw).ok_or_else(invalid)?),
    };
    Ok((name.to_string(), value))
}

/// Collects `Name=value` assignments into a request. Naming an option twice
/// is an error rather than last-one-wins.
pub fn parse_assignments<I, S>(args: I) -> Result<OptionsRequest>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut request = OptionsRequest::new();
    for arg in args {
        let (name, value) = parse_assignment(arg.as_ref())?;
        if request.contains_key(&name) {
            return Err(Error::DuplicateOption { name });
        }
        request.insert(name, value);
    }
    Ok(request)
}

fn parse_key(raw: &str) -> Option<[u8; KEY_LEN]> {
    let mut key = [0u8; KEY_LEN];
    hex::decode_to_slice(raw, &mut key).ok()?;
    Some(key)
}

// flags are usually written in hex
fn parse_u32(raw: &str) -> Option<u32> {
    match raw.strip_prefix("0x") {
        Some(digits) => u32::from_str_radix(digits, 16).ok(),
        None => raw.parse().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request<const N: usize>(entries: [(&str, OptionValue); N]) -> OptionsRequest {
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    #[test]
    fn empty_request_leaves_everything_unset() {
        let so = encode(&OptionsRequest::new()).unwrap();
        assert!(so.is_empty());
        assert_eq!(so, SetOptions::default());
    }

    #[test]
    fn home_domain() {
        let so = encode(&request([("HomeDomain", "x.com".into())])).unwrap();
        assert_eq!(so.home_domain.as_deref(), Some("x.com"));
        assert_eq!(so.set_flags, None);
    }

    #[test]
    fn home_domain_too_long() {
        let long = "a".repeat(33);
        let err = encode(&request([("HomeDomain", long.into())])).unwrap_err();
        assert!(matches!(err, Error::HomeDomainTooLong(33)));

        let exact = "a".repeat(32);
        assert!(encode(&request([("HomeDomain", exact.into())])).is_ok());
    }

    #[test]
    fn unknown_option_fails_whole_request() {
        let err = encode(&request([("UnknownKey", 1u32.into())])).unwrap_err();
        assert!(matches!(err, Error::InvalidOption(ref n) if n == "UnknownKey"));

        let err = encode(&request([
            ("HomeDomain", "x.com".into()),
            ("Weight", 1u32.into()),
        ]))
        .unwrap_err();
        assert!(matches!(err, Error::InvalidOption(_)));
    }

    #[test]
    fn mistyped_value_is_rejected() {
        let err = encode(&request([("MasterWeight", "ten".into())])).unwrap_err();
        match err {
            Error::InvalidOptionValue { name, expected } => {
                assert_eq!(name, "MasterWeight");
                assert_eq!(expected, "an unsigned integer");
            }
            e => panic!("unexpected error: {}", e),
        }

        let err = encode(&request([("HomeDomain", 3u32.into())])).unwrap_err();
        assert!(matches!(err, Error::InvalidOptionValue { .. }));
    }

    #[test]
    fn flags_weights_and_thresholds() {
        let so = encode(&request([
            ("SetFlags", (0x01u32 | 0x02).into()),
            ("ClearFlags", 0x04u32.into()),
            ("MasterWeight", 1u32.into()),
            ("LowThreshold", 1u32.into()),
            ("MedThreshold", 2u32.into()),
            ("HighThreshold", 3u32.into()),
        ]))
        .unwrap();
        assert_eq!(so.set_flags, Some(0x03));
        assert_eq!(so.clear_flags, Some(0x04));
        assert_eq!(so.master_weight, Some(1));
        assert_eq!(so.low_threshold, Some(1));
        assert_eq!(so.med_threshold, Some(2));
        assert_eq!(so.high_threshold, Some(3));
        assert!(so.home_domain.is_none());
    }

    #[test]
    fn signer_entry() {
        let spec = SignerSpec::new(0, [7; KEY_LEN], 1).unwrap();
        let so = encode(&request([("Signer", spec.into())])).unwrap();
        let signer = so.signer.unwrap();
        assert_eq!(signer.key_type, SignerKeyType::Ed25519);
        assert_eq!(signer.key, [7; KEY_LEN]);
        assert_eq!(signer.weight, 1);

        assert!(matches!(
            SignerSpec::new(9, [0; KEY_LEN], 1),
            Err(Error::UnknownSignerKeyType(9))
        ));
    }

    #[test]
    fn inflation_dest_becomes_account() {
        let key = [3; KEY_LEN];
        let so = encode(&request([("InflationDest", key.into())])).unwrap();
        let expected = PublicKey::from_slice(&key).unwrap();
        assert_eq!(so.inflation_dest, Some(expected));
    }

    #[test]
    fn typed_duplicates_are_rejected() {
        let err = encode_typed(vec![SetOption::SetFlags(1), SetOption::SetFlags(2)]).unwrap_err();
        assert!(matches!(err, Error::DuplicateOption { .. }));

        let so = encode_typed(vec![
            SetOption::HomeDomain("example.org".to_string()),
            SetOption::HighThreshold(3),
        ])
        .unwrap();
        assert_eq!(so.home_domain.as_deref(), Some("example.org"));
        assert_eq!(so.high_threshold, Some(3));
    }

    #[test]
    fn assignments_from_command_line() {
        let (name, value) = parse_assignment("SetFlags=0x3").unwrap();
        assert_eq!(name, "SetFlags");
        assert_eq!(value, OptionValue::Uint(3));

        let (_, value) = parse_assignment("HomeDomain=subdomain.domain.com").unwrap();
        assert_eq!(value, OptionValue::Text("subdomain.domain.com".to_string()));

        let key = "07".repeat(KEY_LEN);
        let (_, value) = parse_assignment(&format!("Signer=0:{}:2", key)).unwrap();
        assert_eq!(
            value,
            OptionValue::Signer(SignerSpec::new(0, [7; KEY_LEN], 2).unwrap())
        );

        assert!(matches!(
            parse_assignment("MasterWeight=ten"),
            Err(Error::InvalidOptionValue { .. })
        ));
        assert!(matches!(
            parse_assignment("InflationDest=abcd"),
            Err(Error::InvalidOptionValue { .. })
        ));
        assert!(matches!(
            parse_assignment("Bogus=1"),
            Err(Error::InvalidOption(_))
        ));
        assert!(matches!(
            parse_assignment("MasterWeight"),
            Err(Error::InvalidOption(_))
        ));
    }

    #[test]
    fn repeated_assignment_is_rejected() {
        let request = parse_assignments(["HomeDomain=x.com", "MasterWeight=1"]).unwrap();
        assert_eq!(request.len(), 2);
        assert!(matches!(
            parse_assignments(["SetFlags=1", "SetFlags=2"]),
            Err(Error::DuplicateOption { .. })
        ));
    }
}
