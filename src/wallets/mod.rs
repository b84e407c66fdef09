//! The supported Aptos wallets.
//!
//! The constructors below start looking for the wallet right away, on the
//! browser's event loop. Listen to [`WalletEvent::ReadyStateChange`] (or
//! check [`WalletAdapter::ready_state`]) before connecting.
//!
//! [`WalletEvent::ReadyStateChange`]: crate::WalletEvent::ReadyStateChange

pub mod clover;
pub mod msafe;
pub mod okx;

pub use self::{
    clover::{Clover, CloverDriver},
    msafe::{MSafe, MSafeDriver},
    okx::{Okx, OkxDriver},
};
use crate::{AdapterConfig, WalletAdapter};

pub type OkxWalletAdapter = WalletAdapter<Okx>;
pub type CloverWalletAdapter = WalletAdapter<Clover>;
pub type MSafeWalletAdapter = WalletAdapter<MSafe>;

pub fn okx() -> OkxWalletAdapter {
    okx_with_config(AdapterConfig::default())
}

pub fn okx_with_config(config: AdapterConfig) -> OkxWalletAdapter {
    detecting(WalletAdapter::with_config(Okx, config))
}

pub fn clover() -> CloverWalletAdapter {
    clover_with_config(AdapterConfig::default())
}

pub fn clover_with_config(config: AdapterConfig) -> CloverWalletAdapter {
    detecting(WalletAdapter::with_config(Clover, config))
}

/// MSafe adapter accepting the given MSafe websites, see [`MSafe::new`]
pub fn msafe<I>(origins: I) -> MSafeWalletAdapter
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    msafe_with_config(origins, AdapterConfig::default())
}

/// [`msafe`] with the given settings
pub fn msafe_with_config<I>(origins: I, config: AdapterConfig) -> MSafeWalletAdapter
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    detecting(WalletAdapter::with_config(MSafe::new(origins), config))
}

fn detecting<L: crate::driver::Locator>(adapter: WalletAdapter<L>) -> WalletAdapter<L> {
    adapter.spawn_detection();
    adapter
}
