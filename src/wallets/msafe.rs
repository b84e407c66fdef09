use crate::{
    AccountInfo, Network, NetworkInfo, PendingTransaction, ProviderError, SignMessagePayload,
    SignMessageResponse, TransactionOptions, TransactionPayload,
    driver::{AccountListener, Discovery, Feature, Locator, NetworkListener, WalletDriver},
    ffi::{self, MSafeWallet},
    probe::ProbeConfig,
};
use async_trait::async_trait;
use tracing::trace;
use wasm_bindgen::prelude::*;

pub const NAME: &str = "MSafe";
pub const ICON: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAIQAAACECAMAAABmmnOVAAAABGdBTUEAALGPC/xhBQAAAAFzUkdCAK7OHOkAAAB4UExURUxpcUe0pke1pke1p0W2oUi1p0e0pk68sEe1pj++q0e0pke1p0e1pke1p0e1p0e1p0e1p0m1qUe0pke1p0e1p0e1p0e1p0e1p0e1pke1p0e1pke1p0e0pka3pEi1p0i2qEq6rEu9rkm4qk3Cs0zAsU7Ftk3Bsk3DtOZUHKYAAAAedFJOUwD4J3kF+/sC/QQb1POTP+wyEVnhvqqdTHDItoVlDC8DDKsAAAdVSURBVHja7VrbQuM6DLTb+NYLlN4oBeLc8/9/eBzookbjNiennKeNHliWTGJFlkcjtWKyySabbLLJJptssskmm2yyvpmkM2f+Fcz8Lx7Q4s6Ye7g/v5jfD0L4sXj9mJ+2m4RWQgsXXrbv6/ePWfj9l30wIvnYr/KmbKpid9wIkcSBifhcr6om4Px587teGCFel21VWK21slmbHWbxBZyY7epCd2bLYiuSX/VhXeVS2/TLrLSt3QoX8+FlV8oLTGbZRiS/uBeHWsn0x7yVRfURWcCJdS1/UDJfGvFb2ZmIeS2tT69N++xJJLgZq8ISSLZrwjzqw8anNmUms+eFcNyJU6tTMpuSpw8nxFulUzDZnsNFBl23soepaEMe3YxSpRGT7UkkzIn3VvYx9TthHvFhJouoE9anM5H0sa+5tT1MWvzGCTHiXMo0aqp6C9fZCc10P4EJ80ggtrQZ4EU556FYlzqCeTQOL8+ZveWELfRlQ2jvtLcMowLmwUAcS+nTWyabfXC0j28UYsxjPjxlnCJY9vdPiBEz5dkNugVyfYwicENkn7KSjrg9w6wWwjwQiBM792C6OQtjWBL1/fa6OQj33wOxWBU6vW+22rLcPJWaY3LCjHfi0PKstJaHItu9CHd9k1nmLDdVvvscEQvgP/5OWWEhN9fCAG0CZrQT9EqWx3X5XPC/2fypt4ITh0ZxTEaYBwuXLexiW6uUB3vZIwsnFpJ56gkzylykcOlAweLM2cvLNpRKLoJSdkJaYu+RWQmbIUz3mhoCdGFm2shKxjCjA4HpZfNXkbjuCHJOrIi9ITcBM4Yrl7lmUe94qbuyr3godHNhZlLGDceoMmDGZmWrGfumQcGbr0ppeXlQ2fNLPxSB5hAzhr3jD5HtQZjvi+8t5GZ9FI7zJuTvGPaOh9OnQaj9bJUCZua6OpQ+H8mpURXc8mg2hz+VyomnHC6zRseJTZZCYu8SYUZUcDhiaUGvarp6DVKvTxYugtEtYYYD8dFKCDcJVhS0SAQB87nLYUs9ae9hXRmyEskyuZa/FUd8n2BxH3NXe4Nk9iBerttKY8S5UhxCRAAYaJiGW88CdaW9tJ5UWRSUUyILwIyTesCIsB93ilR5HCpk6ZDUo61UNuJE957u2lcsUpaacMCMIQsTSWrqbR12A0gWgEGpZ4YC8V7Hux3V307juvwFR+dfjhLmyDDwMhFzkepE9WHdI4JLhwhkYQYwvhgY6zlxoGMF5i93U/ZoBoiQRcMxXaNuRghsrkv6KwQiaKTn2b8VCWD4KUKygJ7hllmW2UbMdJQsXA9jo2SR3Gv7uHTD7B8ggkAWrpcWMUxXkW+3fawuMdPEuhg5mtgBRt8OKWblkUkmZCw6piA8aGInBjFMWTA0rMslGpdxgQg8kkWCGJzqjRxGkAEzx8hCz4RDDCqLqJSpIBCQpvpH3JAA0jDVo5kFDd84Zk8YNv6DauPBi4blptg3MjazGBhDqtiE3nVFA2K/h0BqNtMO8oMRAc4jElAWUJWBVMjZpZi3CgrQkTHzOwUb5hHQ4cNzgF6x0wgKZ2DWYESygzlGSkWKtSow14CiAUftk6ajvQI0cK+XrEhFjr/X+RL7XwvK+JvJIVV4a+twtuURc2Q6BWYWYalGx+iXGiEoUkD3gAFCUTgEJYwTi2f+FF0GCXMR397GrmHhw0J2X7tqai2jbZ3NulP2J/sHOikg21gh61L/TiEz1GmAOIlnvyzP0V4Fuy326Q0UsmUiDB5PlGkh+4nPuY/UtbUSihTlJhu8YCHrFoF4fwlWyn4+sVOsFnedArbIXUcGMwtcyOHxRFkesp9PEz1ryKKql/KXzSx4sfs+nnxeyRqULpAyphMHRo7ebnBmEc9NbLmwCoolf08FWpLIAo8gbRoO35fdUvSWqAdQouEMi5RFo2PjnaHhe+BNYjKeLPhZGLuZvaahYhfB0PBde9CtUBtA/4FEgxNELWQxgDE4m/RdoXyrFCcQRzfekWiy/WClOPZCJ8KQHASlJ/0NKgXB0UrmxFo4LpUbjjnynSU5SHwiNPOdZf119hcq5sQ9GSe7XotjsHcUu8zeLsGY/TiMwE/hMBJc6rFaySiZFwVeBn1fnhkceF1jPFEv+wCBzby3paQ/sPDhhliC0hc0AEOOVuBoV3Kvg29VwIh9vUr95cGs14QT0ih7gWrbvAoXxWjrmaLGkdTqAvF2FTAiqKpaShtMyay90S2T+FlJ27kvfQi0MXGMDJhgStbsGy/UqNcr++2mrfdJ59firWyyosiq1p7Yg3HL67zwqc9qfwr/j2OOdVWkaQc6COFufSUss1or2+Rr02GCI9vzbrV63s8XzAdcITntn21hd8cZQcGL7dsqLbzdzcEHmr7Pd3nZlMX+6YLpfiSLxacQ+GBcQbzMNrPguItCL89YzDZfoJuYsOLTfD3f0JLGGfrnnhHmLjRcHAIZRx7TH4MNrE9QB1hcwznE4FdHnZhssskmm2yyySabbLLJJvt77B/GCxK9lvuH1wAAAABJRU5ErkJggg==";

/// The MSafe multi-signer wallet. Only available to pages running inside
/// the MSafe app store iframe.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct MSafe {
    origins: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MSafeDriver {
    wallet: MSafeWallet,
}

impl MSafe {
    /// `origins` restricts the MSafe websites (or network names such as
    /// `"Mainnet"`) allowed to embed the page. Empty accepts all of them.
    pub fn new<I>(origins: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            origins: origins.into_iter().map(Into::into).collect(),
        }
    }

    pub fn origins(&self) -> &[String] {
        &self.origins
    }

    fn origins_js(&self) -> Result<JsValue, ProviderError> {
        match self.origins.as_slice() {
            [] => Ok(JsValue::UNDEFINED),
            [origin] => Ok(JsValue::from_str(origin)),
            origins => ffi::to_js(origins),
        }
    }
}

#[async_trait(?Send)]
impl Locator for MSafe {
    type Driver = MSafeDriver;

    fn name(&self) -> &str {
        NAME
    }

    fn url(&self) -> String {
        MSafeWallet::app_url(self.origins.first().cloned())
    }

    fn icon(&self) -> &str {
        ICON
    }

    fn is_supported(&self) -> bool {
        ffi::has_document() && MSafeWallet::in_msafe_wallet()
    }

    fn discovery(&self, _probe: ProbeConfig) -> Discovery {
        Discovery::Handshake
    }

    /// only reachable through the handshake
    fn locate(&self) -> Option<MSafeDriver> {
        None
    }

    async fn handshake(&self) -> Result<MSafeDriver, ProviderError> {
        let wallet = MSafeWallet::open(self.origins_js()?)
            .await
            .map_err(ffi::provider_error)?;
        Ok(MSafeDriver { wallet })
    }
}

/// chain ids come back as numbers or strings
fn chain_id(value: JsValue) -> Result<String, ProviderError> {
    if let Some(id) = value.as_f64() {
        return Ok(format!("{id}"));
    }
    value
        .as_string()
        .ok_or_else(|| ProviderError::new(format!("Unexpected chain id: {value:?}")))
}

async fn network_info(wallet: &MSafeWallet, name: JsValue) -> Result<NetworkInfo, ProviderError> {
    let name: String = ffi::decode(name)?;
    let id = wallet.chain_id().await.map_err(ffi::provider_error)?;

    Ok(NetworkInfo {
        name: Some(Network::from(name.as_str())),
        chain_id: Some(chain_id(id)?),
        api: None,
    })
}

#[async_trait(?Send)]
impl WalletDriver for MSafeDriver {
    async fn is_connected(&self) -> Result<bool, ProviderError> {
        let connected = self
            .wallet
            .is_connected()
            .await
            .map_err(ffi::provider_error)?;
        Ok(connected.is_truthy())
    }

    async fn connect(&self) -> Result<Option<AccountInfo>, ProviderError> {
        let response = self.wallet.connect().await.map_err(ffi::provider_error)?;
        ffi::required(response, "No connect response")?;
        Ok(None)
    }

    async fn account(&self) -> Result<AccountInfo, ProviderError> {
        let account = self.wallet.account().await.map_err(ffi::provider_error)?;
        ffi::decode(ffi::required(account, "MSafe Account Error")?)
    }

    async fn network(&self) -> Result<NetworkInfo, ProviderError> {
        let name = self.wallet.network().await.map_err(ffi::provider_error)?;
        network_info(&self.wallet, name).await
    }

    async fn disconnect(&self) -> Result<(), ProviderError> {
        self.wallet
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
            .wallet
            .sign_transaction(ffi::to_js(payload)?, ffi::optional_to_js(options)?)
            .await
            .map_err(ffi::provider_error)?;
        ffi::bytes(ffi::required(response, "No response")?)
    }

    async fn sign_and_submit_transaction(
        &self,
        payload: &TransactionPayload,
        options: Option<&TransactionOptions>,
    ) -> Result<PendingTransaction, ProviderError> {
        let response = self
            .wallet
            .sign_and_submit(ffi::to_js(payload)?, ffi::optional_to_js(options)?)
            .await
            .map_err(ffi::provider_error)?;
        let hash = ffi::bytes(ffi::required(response, "No response")?)?;
        Ok(PendingTransaction::from_hash_bytes(hash))
    }

    async fn sign_message(
        &self,
        payload: &SignMessagePayload,
    ) -> Result<SignMessageResponse, ProviderError> {
        let response = self
            .wallet
            .sign_message(ffi::to_js(payload)?)
            .await
            .map_err(ffi::provider_error)?;
        ffi::decode(ffi::required(response, "Sign Message failed")?)
    }

    fn supports(&self, _feature: Feature) -> bool {
        true
    }

    fn on_account_change(&self, listener: AccountListener) -> Result<(), ProviderError> {
        let closure = Closure::<dyn FnMut(JsValue)>::new(move |account: JsValue| {
            listener(ffi::decode(account));
        });

        self.wallet
            .on_change_account(&closure)
            .map_err(ffi::provider_error)?;
        closure.forget();
        Ok(())
    }

    fn on_network_change(&self, listener: NetworkListener) -> Result<(), ProviderError> {
        let wallet = self.wallet.clone();
        let closure = Closure::<dyn FnMut(JsValue)>::new(move |name: JsValue| {
            trace!(wallet = NAME, "network changed, reading the chain id");
            let wallet = wallet.clone();
            let listener = listener.clone();
            wasm_bindgen_futures::spawn_local(async move {
                listener(network_info(&wallet, name).await);
            });
        });

        self.wallet
            .on_change_network(&closure)
            .map_err(ffi::provider_error)?;
        closure.forget();
        Ok(())
    }
}
