use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    /// `window.okxwallet.aptos`
    #[derive(Debug, Clone, PartialEq)]
    pub type OkxAptosProvider;

    #[wasm_bindgen(method, catch, js_name = "isConnected")]
    pub async fn is_connected(this: &OkxAptosProvider) -> Result<JsValue, JsValue>;

    /// prompts the user, resolves with `{ address, publicKey, authKey? }`
    #[wasm_bindgen(method, catch)]
    pub async fn connect(this: &OkxAptosProvider) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, catch)]
    pub async fn account(this: &OkxAptosProvider) -> Result<JsValue, JsValue>;

    /// resolves with the network name (`"Mainnet"`, ...)
    #[wasm_bindgen(method, catch)]
    pub async fn network(this: &OkxAptosProvider) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, catch)]
    pub async fn disconnect(this: &OkxAptosProvider) -> Result<JsValue, JsValue>;

    /// resolves with the signed transaction bytes or `{ code, message }`
    #[wasm_bindgen(method, catch, js_name = "signTransaction")]
    pub async fn sign_transaction(
        this: &OkxAptosProvider,
        transaction: JsValue,
        options: JsValue,
    ) -> Result<JsValue, JsValue>;

    /// resolves with `{ hash }` or `{ code, message }`
    #[wasm_bindgen(method, catch, js_name = "signAndSubmitTransaction")]
    pub async fn sign_and_submit_transaction(
        this: &OkxAptosProvider,
        transaction: JsValue,
        options: JsValue,
    ) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, catch, js_name = "signMessage")]
    pub async fn sign_message(this: &OkxAptosProvider, message: JsValue)
    -> Result<JsValue, JsValue>;

    /// `listener` receives the new `{ address, publicKey, authKey? }`,
    /// without `publicKey` if the wallet got locked
    #[wasm_bindgen(method, catch, js_name = "onAccountChange")]
    pub fn on_account_change(
        this: &OkxAptosProvider,
        listener: &Closure<dyn FnMut(JsValue)>,
    ) -> Result<JsValue, JsValue>;

    /// `listener` receives `{ networkName }`
    #[wasm_bindgen(method, catch, js_name = "onNetworkChange")]
    pub fn on_network_change(
        this: &OkxAptosProvider,
        listener: &Closure<dyn FnMut(JsValue)>,
    ) -> Result<JsValue, JsValue>;
}
