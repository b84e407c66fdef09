use crate::{
    AccountInfo, NetworkInfo, PendingTransaction, ProviderError, SignMessagePayload,
    SignMessageResponse, TransactionOptions, TransactionPayload,
    driver::{Locator, WalletDriver},
    ffi::{self, CloverProvider},
};
use async_trait::async_trait;
use wasm_bindgen::JsCast as _;

pub const NAME: &str = "Clover";
pub const URL: &str =
    "https://chrome.google.com/webstore/detail/clv-wallet/nhnkbkgjikgcigadomkphalanndcapjk";
pub const ICON: &str =
    "https://raw.githubusercontent.com/clover-network/clv-network-token-lists/main/assets/clover.png";

/// The CLV browser extension, injected as `window.clover_aptos`.
///
/// Clover does not report its network nor notify account or network
/// changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Clover;

#[derive(Debug, Clone, PartialEq)]
pub struct CloverDriver {
    provider: CloverProvider,
}

#[async_trait(?Send)]
impl Locator for Clover {
    type Driver = CloverDriver;

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

    fn locate(&self) -> Option<CloverDriver> {
        ffi::global("clover_aptos").map(|provider| CloverDriver {
            provider: provider.unchecked_into(),
        })
    }
}

#[async_trait(?Send)]
impl WalletDriver for CloverDriver {
    async fn is_connected(&self) -> Result<bool, ProviderError> {
        let connected = self
            .provider
            .is_connected()
            .await
            .map_err(ffi::provider_error)?;
        Ok(connected.is_truthy())
    }

    async fn connect(&self) -> Result<Option<AccountInfo>, ProviderError> {
        let response = self.provider.connect().await.map_err(ffi::provider_error)?;
        if response.as_bool().is_some() {
            return Ok(None);
        }
        ffi::decode(ffi::required(response, "No connect response")?).map(Some)
    }

    async fn account(&self) -> Result<AccountInfo, ProviderError> {
        let account = self.provider.account().await.map_err(ffi::provider_error)?;
        ffi::decode(ffi::required(account, "Clover Account Error")?)
    }

    async fn network(&self) -> Result<NetworkInfo, ProviderError> {
        Ok(NetworkInfo::default())
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
        let response = self
            .provider
            .sign_message(ffi::to_js(payload)?)
            .await
            .map_err(ffi::provider_error)?;
        ffi::decode(ffi::required(response, "Sign Message failed")?)
    }
}
