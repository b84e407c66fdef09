//! The capabilities a wallet has to provide to be driven by a
//! [`WalletAdapter`].
//!
//! A wallet integration supplies two things:
//!
//! - a [`Locator`]: knows whether the host can run the wallet at all and
//!   where to find its provider object;
//! - a [`WalletDriver`]: the provider handle itself, proxying the calls and
//!   translating its answers (and failures) into this crate's types.
//!
//! [`WalletAdapter`]: crate::WalletAdapter

use crate::{
    AccountInfo, NetworkInfo, PendingTransaction, ProviderError, SignMessagePayload,
    SignMessageResponse, TransactionOptions, TransactionPayload, probe::ProbeConfig,
};
use async_trait::async_trait;
use std::{fmt, rc::Rc};

/// Optional provider capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Feature {
    AccountChange,
    NetworkChange,
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AccountChange => write!(f, "account change notifications"),
            Self::NetworkChange => write!(f, "network change notifications"),
        }
    }
}

pub type AccountListener = Rc<dyn Fn(Result<AccountInfo, ProviderError>)>;
pub type NetworkListener = Rc<dyn Fn(Result<NetworkInfo, ProviderError>)>;

/// How the provider object becomes available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Discovery {
    /// injected by a browser extension at an unknown time: poll
    /// [`Locator::locate`]
    Poll(ProbeConfig),
    /// reachable after a one time handshake: await [`Locator::handshake`]
    Handshake,
}

/// Access to the host environment a wallet lives in.
#[async_trait(?Send)]
pub trait Locator: 'static {
    type Driver: WalletDriver;

    /// wallet display name
    fn name(&self) -> &str;

    /// install or information link
    fn url(&self) -> String;

    /// image to display (URL or data URI)
    fn icon(&self) -> &str;

    /// `false` if this host cannot run the wallet at all
    fn is_supported(&self) -> bool;

    /// `probe` is the adapter's default polling configuration
    fn discovery(&self, probe: ProbeConfig) -> Discovery {
        Discovery::Poll(probe)
    }

    /// look up the provider, `None` if it is not there (yet)
    fn locate(&self) -> Option<Self::Driver>;

    async fn handshake(&self) -> Result<Self::Driver, ProviderError> {
        Err(ProviderError::new(format!(
            "{} is not discovered through a handshake",
            self.name()
        )))
    }
}

/// The calls a wallet provider has to support.
///
/// Implementations convert every provider failure (thrown, rejected or
/// returned as an error object) into a [`ProviderError`].
#[async_trait(?Send)]
pub trait WalletDriver: Clone + 'static {
    async fn is_connected(&self) -> Result<bool, ProviderError>;

    /// ask the user to connect. Providers answering with the account return
    /// it, the others return `None` and the account is then read with
    /// [`WalletDriver::account`].
    async fn connect(&self) -> Result<Option<AccountInfo>, ProviderError>;

    async fn account(&self) -> Result<AccountInfo, ProviderError>;

    async fn network(&self) -> Result<NetworkInfo, ProviderError>;

    async fn disconnect(&self) -> Result<(), ProviderError>;

    /// returns the BCS serialized signed transaction
    async fn sign_transaction(
        &self,
        payload: &TransactionPayload,
        options: Option<&TransactionOptions>,
    ) -> Result<Vec<u8>, ProviderError>;

    async fn sign_and_submit_transaction(
        &self,
        payload: &TransactionPayload,
        options: Option<&TransactionOptions>,
    ) -> Result<PendingTransaction, ProviderError>;

    async fn sign_message(
        &self,
        payload: &SignMessagePayload,
    ) -> Result<SignMessageResponse, ProviderError>;

    fn supports(&self, feature: Feature) -> bool {
        let _ = feature;
        false
    }

    /// only called if [`WalletDriver::supports`] the [`Feature::AccountChange`]
    fn on_account_change(&self, listener: AccountListener) -> Result<(), ProviderError> {
        let _ = listener;
        Err(ProviderError::new(format!(
            "{} are not supported",
            Feature::AccountChange
        )))
    }

    /// only called if [`WalletDriver::supports`] the [`Feature::NetworkChange`]
    fn on_network_change(&self, listener: NetworkListener) -> Result<(), ProviderError> {
        let _ = listener;
        Err(ProviderError::new(format!(
            "{} are not supported",
            Feature::NetworkChange
        )))
    }
}
