//! Accounts, networks and payloads exchanged with the wallet providers.
//!
//! Field names follow the camelCase (or snake_case for transaction payloads)
//! naming of the Aptos wallet APIs so these types can be handed over to the
//! providers as is.

use std::{fmt, str::FromStr};

/// Public key(s) of an account. Multi-signer wallets (MSafe) return one key
/// per owner.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Deserialize, serde::Serialize)]
#[serde(untagged)]
pub enum PublicKey {
    Single(String),
    Multi(Vec<String>),
}

/// Account as reported by a wallet provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    pub address: String,
    pub public_key: PublicKey,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_keys_required: Option<u32>,
}

/// The adapter's record of the connected account.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Session {
    pub address: String,
    pub public_key: PublicKey,
    pub auth_key: Option<String>,
    /// only set for multi-signer accounts
    pub min_keys_required: Option<u32>,
    pub is_connected: bool,
}

impl Session {
    pub(crate) fn connected(account: AccountInfo) -> Self {
        Self {
            address: account.address,
            public_key: account.public_key,
            auth_key: account.auth_key,
            min_keys_required: account.min_keys_required,
            is_connected: true,
        }
    }

    /// apply an account change notification. Optional fields missing from
    /// the notification keep their current value.
    pub(crate) fn update(&mut self, account: AccountInfo) {
        self.address = account.address;
        self.public_key = account.public_key;
        if account.auth_key.is_some() {
            self.auth_key = account.auth_key;
        }
        if account.min_keys_required.is_some() {
            self.min_keys_required = account.min_keys_required;
        }
    }
}

/// Public view of the connected account; every field is `None` while
/// disconnected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountKeys {
    pub address: Option<String>,
    pub public_key: Option<PublicKey>,
    pub auth_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_keys_required: Option<u32>,
}

impl From<&Session> for AccountKeys {
    fn from(session: &Session) -> Self {
        Self {
            address: Some(session.address.clone()),
            public_key: Some(session.public_key.clone()),
            auth_key: session.auth_key.clone(),
            min_keys_required: session.min_keys_required,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub enum Network {
    Mainnet,
    Testnet,
    Devnet,
    Custom(String),
}

impl FromStr for Network {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "mainnet" => Self::Mainnet,
            "testnet" => Self::Testnet,
            "devnet" => Self::Devnet,
            _ => Self::Custom(s.to_owned()),
        })
    }
}

impl From<&str> for Network {
    fn from(name: &str) -> Self {
        match name.parse() {
            Ok(network) => network,
            Err(never) => match never {},
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mainnet => write!(f, "mainnet"),
            Self::Testnet => write!(f, "testnet"),
            Self::Devnet => write!(f, "devnet"),
            Self::Custom(name) => write!(f, "{name}"),
        }
    }
}

impl serde::Serialize for Network {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for Network {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Ok(Self::from(name.as_str()))
    }
}

/// Network the wallet is connected to. Absent fields are unknown: they are
/// never guessed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInfo {
    pub name: Option<Network>,
    pub chain_id: Option<String>,
    pub api: Option<String>,
}

/// Entry function call to sign.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct TransactionPayload {
    #[serde(rename = "type")]
    pub kind: String,
    /// fully qualified function name: `0x1::coin::transfer`
    pub function: String,
    pub type_arguments: Vec<String>,
    pub arguments: Vec<serde_json::Value>,
}

impl TransactionPayload {
    pub const ENTRY_FUNCTION: &'static str = "entry_function_payload";

    pub fn entry_function(
        function: impl Into<String>,
        type_arguments: impl IntoIterator<Item = impl Into<String>>,
        arguments: impl IntoIterator<Item = serde_json::Value>,
    ) -> Self {
        Self {
            kind: Self::ENTRY_FUNCTION.to_owned(),
            function: function.into(),
            type_arguments: type_arguments.into_iter().map(Into::into).collect(),
            arguments: arguments.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, serde::Deserialize, serde::Serialize)]
pub struct TransactionOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_gas_amount: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_unit_price: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_timestamp_secs: Option<u64>,
}

/// Transaction accepted by the wallet for submission.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Deserialize, serde::Serialize)]
pub struct PendingTransaction {
    /// `0x` prefixed hexadecimal transaction hash
    pub hash: String,
}

impl PendingTransaction {
    pub fn from_hash_bytes(bytes: impl AsRef<[u8]>) -> Self {
        Self {
            hash: format!("0x{}", hex::encode(bytes)),
        }
    }
}

/// Message the user is asked to sign. The boolean flags select which
/// information the wallet prepends to the signed message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignMessagePayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<bool>,
    pub message: String,
    pub nonce: String,
}

impl SignMessagePayload {
    pub fn new(message: impl Into<String>, nonce: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            nonce: nonce.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Deserialize, serde::Serialize)]
#[serde(untagged)]
pub enum Signature {
    Single(String),
    /// one signature per signing owner of a multi-signer account
    Multi(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignMessageResponse {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub application: Option<String>,
    #[serde(default)]
    pub chain_id: Option<u64>,
    /// the message actually signed, with the prefixes selected in the payload
    pub full_message: String,
    pub message: String,
    pub nonce: String,
    /// always `"APTOS"`
    pub prefix: String,
    pub signature: Signature,
}
