/*!

# Aptos wallet adapters

This library is meant to be used by web applications that need to interact
with Aptos browser wallets. Every wallet is driven through the same
[`WalletAdapter`] surface whatever its provider looks like.

## Features

- Detect the wallet provider once the browser extension injected it
- Connect and disconnect the user's account
- Sign transactions and messages, or sign and submit transactions
- Follow account and network changes
- Supported wallets: OKX, Clover and MSafe

## Usage

Create the adapter of the wallet. It starts looking for the wallet provider
in the page right away:

```no_run
use aptos_wallet_adapter::{EventKind, WalletEvent, wallets};

let okx = wallets::okx();

okx.on(EventKind::ReadyStateChange, |event| {
    if let WalletEvent::ReadyStateChange(state) = event {
        println!("OKX Wallet is {state}");
    }
});
```

Once the [`ReadyState`] is [`ReadyState::Installed`] (or
[`ReadyState::Loadable`]) the user can be asked to connect:

```no_run
# use aptos_wallet_adapter::wallets;
#
# async fn test() -> anyhow::Result<()> {
# let okx = wallets::okx();
okx.connect().await?;

println!("connected: {:?}", okx.public_account().address);
# Ok(()) }
```

Then transactions can be signed and submitted:

```no_run
# use aptos_wallet_adapter::{TransactionPayload, wallets};
#
# async fn test() -> anyhow::Result<()> {
# let okx = wallets::okx();
let payload = TransactionPayload::entry_function(
    "0x1::coin::transfer",
    ["0x1::aptos_coin::AptosCoin"],
    [serde_json::json!("0x2"), serde_json::json!("1000")],
);
let pending = okx.sign_and_submit_transaction(&payload, None).await?;

println!("submitted {}", pending.hash);
# Ok(()) }
```

Every failure is returned as a [`WalletError`] and also emitted as a
[`WalletEvent::Error`]. The library logs through [`tracing`], it is up to
the application to install a subscriber.

Other wallets can be supported by implementing [`driver::Locator`] and
[`driver::WalletDriver`].

*/

mod adapter;
mod config;
pub mod driver;
pub mod error;
mod events;
pub mod ffi;
pub mod probe;
mod ready_state;
mod types;
pub mod wallets;

pub use self::{
    adapter::WalletAdapter,
    config::AdapterConfig,
    driver::{Feature, Locator, WalletDriver},
    error::{ProviderError, ProviderErrorCode, WalletError},
    events::{EventKind, ListenerId, WalletEvent},
    probe::ProbeConfig,
    ready_state::ReadyState,
    types::{
        AccountInfo, AccountKeys, Network, NetworkInfo, PendingTransaction, PublicKey, Session,
        SignMessagePayload, SignMessageResponse, Signature, TransactionOptions,
        TransactionPayload,
    },
};
