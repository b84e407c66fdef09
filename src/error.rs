use crate::{ReadyState, driver::Feature};

/// Numeric error codes reported by Aptos wallet providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, thiserror::Error)]
pub enum ProviderErrorCode {
    #[error("The wallet has no account.")]
    NoAccounts,
    #[error("The user rejected the request.")]
    UserRejected,
    /// The dApp is not authorised, it may need to connect again.
    #[error("The request is not authorised.")]
    Unauthorized,
    #[error("The wallet does not support this request.")]
    Unsupported,
    #[error("An error occured inside the wallet.")]
    InternalError,
    #[error("Unknown error code `{0}'")]
    Unknown(i64),
}

impl From<i64> for ProviderErrorCode {
    fn from(code: i64) -> Self {
        match code {
            4000 => Self::NoAccounts,
            4001 => Self::UserRejected,
            4100 => Self::Unauthorized,
            4200 => Self::Unsupported,
            -30001 => Self::InternalError,
            unknown => Self::Unknown(unknown),
        }
    }
}

/// Failure reported by a wallet provider, whether it was thrown, rejected or
/// returned as an error shaped object (`{ code, message }`).
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, thiserror::Error, serde::Deserialize,
)]
#[error("{message}")]
pub struct ProviderError {
    #[serde(default)]
    pub code: Option<ProviderErrorCode>,
    #[serde(default)]
    pub name: Option<String>,
    pub message: String,
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            name: None,
            message: message.into(),
        }
    }

    pub fn with_code(code: i64, message: impl Into<String>) -> Self {
        Self {
            code: Some(ProviderErrorCode::from(code)),
            ..Self::new(message)
        }
    }
}

/// Errors raised by a [`WalletAdapter`]. There is one kind per operation
/// family; the provider failure is kept as the payload.
///
/// Every error is also broadcast as a [`WalletEvent::Error`] before being
/// returned.
///
/// [`WalletAdapter`]: crate::WalletAdapter
/// [`WalletEvent::Error`]: crate::WalletEvent::Error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WalletError {
    #[error("Wallet is not ready (current state: {0}).")]
    NotReady(ReadyState),
    #[error("Wallet is not connected.")]
    NotConnected,
    #[error("Failed to connect the wallet: {0}")]
    Connection(#[source] ProviderError),
    #[error("Failed to disconnect the wallet: {0}")]
    Disconnection(#[source] ProviderError),
    #[error("Failed to query the wallet network: {0}")]
    GetNetwork(#[source] ProviderError),
    #[error("Failed to follow the account change: {0}")]
    AccountChange(#[source] ProviderError),
    #[error("Failed to follow the network change: {0}")]
    NetworkChange(#[source] ProviderError),
    #[error("Failed to sign the transaction: {0}")]
    SignTransaction(#[source] ProviderError),
    #[error("Failed to sign and submit the transaction: {0}")]
    SignAndSubmit(#[source] ProviderError),
    #[error("Failed to sign the message: {0}")]
    SignMessage(#[source] ProviderError),
    #[error("{wallet} does not support {feature}.")]
    Unsupported { wallet: String, feature: Feature },
}

impl WalletError {
    /// the provider failure carried by this error, if any
    pub fn provider_error(&self) -> Option<&ProviderError> {
        match self {
            Self::Connection(error)
            | Self::Disconnection(error)
            | Self::GetNetwork(error)
            | Self::AccountChange(error)
            | Self::NetworkChange(error)
            | Self::SignTransaction(error)
            | Self::SignAndSubmit(error)
            | Self::SignMessage(error) => Some(error),
            Self::NotReady(_) | Self::NotConnected | Self::Unsupported { .. } => None,
        }
    }
}

impl<'de> serde::Deserialize<'de> for ProviderErrorCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct Visitor;
        impl serde::de::Visitor<'_> for Visitor {
            type Value = ProviderErrorCode;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(formatter, "Expecting an integer ProviderErrorCode")
            }

            fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(ProviderErrorCode::from(v))
            }

            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                i64::try_from(v)
                    .map(ProviderErrorCode::from)
                    .map_err(|_| E::custom(format!("error code out of range: {v}")))
            }

            // javascript numbers
            fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                if v.fract() == 0.0 && v >= i64::MIN as f64 && v <= i64::MAX as f64 {
                    Ok(ProviderErrorCode::from(v as i64))
                } else {
                    Err(E::custom(format!("error code is not an integer: {v}")))
                }
            }
        }

        deserializer.deserialize_i64(Visitor)
    }
}
