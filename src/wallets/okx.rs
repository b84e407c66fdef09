use crate::{
    AccountInfo, Network, NetworkInfo, PendingTransaction, ProviderError, SignMessagePayload,
    SignMessageResponse, TransactionOptions, TransactionPayload,
    driver::{AccountListener, Feature, Locator, NetworkListener, WalletDriver},
    ffi::{self, OkxAptosProvider},
};
use async_trait::async_trait;
use tracing::trace;
use wasm_bindgen::{JsCast as _, prelude::*};

pub const NAME: &str = "OKX Wallet";
pub const URL: &str = "https://okx.com/web3/";
pub const ICON: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAADAAAAAwCAYAAABXAvmHAAAACXBIWXMAAAsTAAALEwEAmpwYAAAAAXNSR0IArs4c6QAAAARnQU1BAACxjwv8YQUAAAJDSURBVHgB7Zq9jtpAEMfHlhEgQLiioXEkoAGECwoKxMcTRHmC5E3IoyRPkPAEkI7unJYmTgEFTYwA8a3NTKScLnCHN6c9r1e3P2llWQy7M/s1Gv1twCP0ej37dDq9x+Zut1t3t9vZjDEHIiSRSPg4ZpDL5fxkMvn1cDh8m0wmfugfO53OoFQq/crn8wxfY9EymQyrVCqMfHvScZx1p9ls3pFxXBy/bKlUipGPrVbLuQqAfsCliq3zl0H84zwtjQrOw4Mt1W63P5LvBm2d+Xz+YzqdgkqUy+WgWCy+Mc/nc282m4FqLBYL+3g8fjDxenq72WxANZbLJeA13zDX67UDioL5ybXwafMYu64Ltn3bdDweQ5R97fd7GyhBQMipx4POeEDHIu2LfDdBIGGz+hJ9CQ1ABjoA2egAZPM6AgiCAEQhsi/C4jHyPA/6/f5NG3Ks2+3CYDC4aTccDrn6ojG54MnEvG00GoVmWLIRNZ7wTCwDHYBsdACy0QHIhiuRETxlICWpMMhGZHmqS8qH6JLyGegAZKMDkI0uKf8X4SWlaZo+Pp1bRrwlJU8ZKLIvUjKh0WiQ3sRUbNVq9c5Ebew7KEo2m/1p4jJ4qAmDaqDQBzj5XyiAT4VCQezJigAU+IDU+z8vJFnGWeC+bKQV/5VZ71FV6L7PA3gg3tXrdQ+DgLhC+75Wq3no69P3MC0NFQpx2lL04Ql9gHK1bRDjsSBIvScBnDTk1WrlGIZBorIDEYJj+rhdgnQ67VmWRe0zlplXl81vcyEt0rSoYDUAAAAASUVORK5CYII=";

/// The OKX browser extension, injected as `window.okxwallet`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Okx;

#[derive(Debug, Clone, PartialEq)]
pub struct OkxDriver {
    provider: OkxAptosProvider,
}

#[async_trait(?Send)]
impl Locator for Okx {
    type Driver = OkxDriver;

    fn name(&self) -> &str {
        NAME
    }

    fn url(&self) -> String {
        URL.to_owned()
    }

    fn icon(&self) -> &str {
        ICON
    }

    fn is_supported(&self) -> bool {
        ffi::has_document()
    }

    fn locate(&self) -> Option<OkxDriver> {
        let wallet = ffi::global("okxwallet")?;
        let provider = ffi::property(&wallet, "aptos")?;

        Some(OkxDriver {
            provider: provider.unchecked_into(),
        })
    }
}

/// OKX only reports the network name, the chain id is derived from it.
fn network_info(name: &str) -> NetworkInfo {
    let name = Network::from(name);
    let chain_id = (name == Network::Mainnet).then(|| "1".to_owned());

    NetworkInfo {
        name: Some(name),
        chain_id,
        api: None,
    }
}

async fn connect(provider: &OkxAptosProvider) -> Result<JsValue, ProviderError> {
    let response = provider.connect().await.map_err(ffi::provider_error)?;
    ffi::required(response, "No connect response")
}

fn account_change_handler(
    provider: OkxAptosProvider,
    listener: AccountListener,
) -> impl FnMut(JsValue) + 'static {
    move |account: JsValue| {
        if ffi::property(&account, "publicKey").is_some() {
            listener(ffi::decode(account));
            return;
        }

        // a locked wallet reports the change without keys: ask again
        trace!(wallet = NAME, "account changed without public key, reconnecting");
        let provider = provider.clone();
        let listener = listener.clone();
        wasm_bindgen_futures::spawn_local(async move {
            listener(connect(&provider).await.and_then(ffi::decode));
        });
    }
}

#[async_trait(?Send)]
impl WalletDriver for OkxDriver {
    async fn is_connected(&self) -> Result<bool, ProviderError> {
        let connected = self
            .provider
            .is_connected()
            .await
            .map_err(ffi::provider_error)?;
        Ok(connected.is_truthy())
    }

    async fn connect(&self) -> Result<Option<AccountInfo>, ProviderError> {
        trace!(wallet = NAME, "connect");
        connect(&self.provider).await?;
        // the connect answer may be partial, the account is read afterwards
        Ok(None)
    }

    async fn account(&self) -> Result<AccountInfo, ProviderError> {
        let account = self.provider.account().await.map_err(ffi::provider_error)?;
        ffi::decode(ffi::required(account, "OKX Wallet Account Error")?)
    }

    async fn network(&self) -> Result<NetworkInfo, ProviderError> {
        let network = self.provider.network().await.map_err(ffi::provider_error)?;
        let name: String = ffi::decode(network)?;
        Ok(network_info(&name))
    }

    async fn disconnect(&self) -> Result<(), ProviderError> {
        self.provider
            .disconnect()
            .await
            .map(|_| ())
            .map_err(ffi::provider_error)
    }

    async fn sign_transaction(
        &self,
        payload: &TransactionPayload,
        options: Option<&TransactionOptions>,
    ) -> Result<Vec<u8>, ProviderError> {
        let response = self
            .provider
            .sign_transaction(ffi::to_js(payload)?, ffi::optional_to_js(options)?)
            .await
            .map_err(ffi::provider_error)?;
        ffi::bytes(ffi::reject_error_shape(response)?)
    }

    async fn sign_and_submit_transaction(
        &self,
        payload: &TransactionPayload,
        options: Option<&TransactionOptions>,
    ) -> Result<PendingTransaction, ProviderError> {
        let response = self
            .provider
            .sign_and_submit_transaction(ffi::to_js(payload)?, ffi::optional_to_js(options)?)
            .await
            .map_err(ffi::provider_error)?;
        ffi::decode(ffi::reject_error_shape(response)?)
    }

    async fn sign_message(
        &self,
        payload: &SignMessagePayload,
    ) -> Result<SignMessageResponse, ProviderError> {
        if payload.nonce.is_empty() {
            return Err(ProviderError::new("Invalid signMessage Payload"));
        }

        let response = self
            .provider
            .sign_message(ffi::to_js(payload)?)
            .await
            .map_err(ffi::provider_error)?;
        ffi::decode(ffi::required(response, "Sign Message failed")?)
    }

    fn supports(&self, _feature: Feature) -> bool {
        true
    }

    fn on_account_change(&self, listener: AccountListener) -> Result<(), ProviderError> {
        let closure = Closure::<dyn FnMut(JsValue)>::new(account_change_handler(
            self.provider.clone(),
            listener,
        ));

        self.provider
            .on_account_change(&closure)
            .map_err(ffi::provider_error)?;
        closure.forget();
        Ok(())
    }

    fn on_network_change(&self, listener: NetworkListener) -> Result<(), ProviderError> {
        let closure = Closure::<dyn FnMut(JsValue)>::new(move |network: JsValue| {
            let update = ffi::property(&network, "networkName")
                .ok_or_else(|| ProviderError::new("Network change without network name"))
                .and_then(ffi::decode::<String>)
                .map(|name| network_info(&name));
            listener(update);
        });

        self.provider
            .on_network_change(&closure)
            .map_err(ffi::provider_error)?;
        closure.forget();
        Ok(())
    }
}
