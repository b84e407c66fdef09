use crate::probe::ProbeConfig;
use std::time::Duration;

/// Settings shared by every [`WalletAdapter`].
///
/// It can be loaded from the JSON configuration of the web application,
/// durations are expressed in milliseconds:
///
/// ```
/// # use aptos_wallet_adapter::AdapterConfig;
/// # use std::time::Duration;
/// let config: AdapterConfig = serde_json::from_str(r#"{
///     "connectTimeout": 5000,
///     "probe": { "interval": 250, "maxAttempts": 8 }
/// }"#).unwrap();
///
/// assert_eq!(config.connect_timeout, Some(Duration::from_secs(5)));
/// assert_eq!(config.probe.max_attempts, 8);
/// ```
///
/// [`WalletAdapter`]: crate::WalletAdapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Deserialize, serde::Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AdapterConfig {
    /// Deadline for the whole connection exchange with the wallet (including
    /// the time the user takes to approve it). `None` waits forever.
    #[serde(with = "optional_millis")]
    pub connect_timeout: Option<Duration>,
    /// How to poll for injected wallets.
    pub probe: ProbeConfig,
}

impl AdapterConfig {
    pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    pub fn with_connect_timeout(self, connect_timeout: Option<Duration>) -> Self {
        Self {
            connect_timeout,
            ..self
        }
    }

    pub fn with_probe(self, probe: ProbeConfig) -> Self {
        Self { probe, ..self }
    }
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Some(Self::DEFAULT_CONNECT_TIMEOUT),
            probe: ProbeConfig::default(),
        }
    }
}

pub(crate) mod millis {
    use serde::{Deserialize as _, Deserializer, Serializer};
    use std::time::Duration;

    pub(crate) fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

pub(crate) mod optional_millis {
    use serde::{Deserialize as _, Deserializer, Serializer};
    use std::time::Duration;

    pub(crate) fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(duration) => serializer.serialize_some(&(duration.as_millis() as u64)),
            None => serializer.serialize_none(),
        }
    }

    pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<u64>::deserialize(deserializer).map(|millis| millis.map(Duration::from_millis))
    }
}
