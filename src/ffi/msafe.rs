use wasm_bindgen::prelude::*;

#[wasm_bindgen(module = "@msafe/aptos-wallet")]
extern "C" {
    /// Connection to the MSafe application embedding the page in an iframe.
    #[derive(Debug, Clone, PartialEq)]
    pub type MSafeWallet;

    /// `true` if the page runs inside the MSafe app store iframe
    #[wasm_bindgen(static_method_of = MSafeWallet, js_name = "inMSafeWallet")]
    pub fn in_msafe_wallet() -> bool;

    /// Handshake with the embedding MSafe application.
    ///
    /// `origins` is an allow-list of MSafe website URLs or network names
    /// (`"Mainnet"`, `"Testnet"`): a string, an array of strings or
    /// `undefined` to accept every MSafe website.
    #[wasm_bindgen(static_method_of = MSafeWallet, catch, js_name = "new")]
    pub async fn open(origins: JsValue) -> Result<MSafeWallet, JsValue>;

    /// URL of the MSafe application for the given origin
    #[wasm_bindgen(static_method_of = MSafeWallet, js_name = "getAppUrl")]
    pub fn app_url(origin: Option<String>) -> String;

    #[wasm_bindgen(method, catch, js_name = "isConnected")]
    pub async fn is_connected(this: &MSafeWallet) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, catch)]
    pub async fn connect(this: &MSafeWallet) -> Result<JsValue, JsValue>;

    /// resolves with `{ address, publicKey: [...], authKey, minKeysRequired }`
    #[wasm_bindgen(method, catch)]
    pub async fn account(this: &MSafeWallet) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, catch)]
    pub async fn network(this: &MSafeWallet) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, catch, js_name = "chainId")]
    pub async fn chain_id(this: &MSafeWallet) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, catch)]
    pub async fn disconnect(this: &MSafeWallet) -> Result<JsValue, JsValue>;

    /// resolves with the signed transaction bytes
    #[wasm_bindgen(method, catch, js_name = "signTransaction")]
    pub async fn sign_transaction(
        this: &MSafeWallet,
        transaction: JsValue,
        options: JsValue,
    ) -> Result<JsValue, JsValue>;

    /// resolves with the transaction hash bytes
    #[wasm_bindgen(method, catch, js_name = "signAndSubmit")]
    pub async fn sign_and_submit(
        this: &MSafeWallet,
        transaction: JsValue,
        options: JsValue,
    ) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, catch, js_name = "signMessage")]
    pub async fn sign_message(this: &MSafeWallet, message: JsValue) -> Result<JsValue, JsValue>;

    /// `listener` receives the new account
    #[wasm_bindgen(method, catch, js_name = "onChangeAccount")]
    pub fn on_change_account(
        this: &MSafeWallet,
        listener: &Closure<dyn FnMut(JsValue)>,
    ) -> Result<JsValue, JsValue>;

    /// `listener` receives the new network name
    #[wasm_bindgen(method, catch, js_name = "onChangeNetwork")]
    pub fn on_change_network(
        this: &MSafeWallet,
        listener: &Closure<dyn FnMut(JsValue)>,
    ) -> Result<JsValue, JsValue>;
}
