use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    /// `window.clover_aptos`
    #[derive(Debug, Clone, PartialEq)]
    pub type CloverProvider;

    #[wasm_bindgen(method, catch, js_name = "isConnected")]
    pub async fn is_connected(this: &CloverProvider) -> Result<JsValue, JsValue>;

    /// resolves with `{ address, publicKey }` or, on some versions, with a
    /// boolean
    #[wasm_bindgen(method, catch)]
    pub async fn connect(this: &CloverProvider) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, catch)]
    pub async fn account(this: &CloverProvider) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, catch)]
    pub async fn disconnect(this: &CloverProvider) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, catch, js_name = "signTransaction")]
    pub async fn sign_transaction(
        this: &CloverProvider,
        transaction: JsValue,
        options: JsValue,
    ) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, catch, js_name = "signAndSubmitTransaction")]
    pub async fn sign_and_submit_transaction(
        this: &CloverProvider,
        transaction: JsValue,
        options: JsValue,
    ) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, catch, js_name = "signMessage")]
    pub async fn sign_message(this: &CloverProvider, message: JsValue) -> Result<JsValue, JsValue>;
}
