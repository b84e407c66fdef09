//! Raw bindings to the wallet providers and the conversions between their
//! JavaScript values and this crate's types.

pub mod clover;
pub mod msafe;
pub mod okx;

pub use self::{clover::CloverProvider, msafe::MSafeWallet, okx::OkxAptosProvider};
use crate::{ProviderError, ProviderErrorCode};
use serde::{Serialize, de::DeserializeOwned};
use wasm_bindgen::{JsCast as _, prelude::*};

/// `true` if running in a browser page
pub(crate) fn has_document() -> bool {
    web_sys::window().and_then(|window| window.document()).is_some()
}

/// read `globalThis[name]` now, `None` if not set (yet)
pub(crate) fn global(name: &str) -> Option<JsValue> {
    property(&js_sys::global(), name)
}

pub(crate) fn property(object: &JsValue, name: &str) -> Option<JsValue> {
    js_sys::Reflect::get(object, &JsValue::from_str(name))
        .ok()
        .filter(|value| !value.is_undefined() && !value.is_null())
}

/// Convert whatever a provider threw or rejected with.
pub(crate) fn provider_error(error: JsValue) -> ProviderError {
    if let Some(message) = error.as_string() {
        return ProviderError::new(message);
    }
    if let Ok(error) = serde_wasm_bindgen::from_value::<ProviderError>(error.clone()) {
        return error;
    }
    if let Some(error) = error.dyn_ref::<js_sys::Error>() {
        return ProviderError {
            name: error.name().as_string(),
            ..ProviderError::new(String::from(error.message()))
        };
    }
    // error shaped objects the decoder rejects, `{ code: "4001", message }`
    if let Some(message) = property(&error, "message").and_then(|message| message.as_string()) {
        let code = property(&error, "code")
            .and_then(|code| code.as_string())
            .and_then(|code| code.parse::<i64>().ok());
        return ProviderError {
            code: code.map(ProviderErrorCode::from),
            name: property(&error, "name").and_then(|name| name.as_string()),
            message,
        };
    }
    ProviderError::new(format!("Unexpected wallet error: {error:?}"))
}

/// Some providers resolve with `{ code, message }` instead of rejecting.
pub(crate) fn reject_error_shape(value: JsValue) -> Result<JsValue, ProviderError> {
    match property(&value, "code") {
        Some(code) if value.is_object() && code.is_truthy() => Err(provider_error(value)),
        _ => Ok(value),
    }
}

/// `null` or `undefined` answers become `error`
pub(crate) fn required(value: JsValue, error: &str) -> Result<JsValue, ProviderError> {
    if value.is_undefined() || value.is_null() {
        Err(ProviderError::new(error))
    } else {
        Ok(value)
    }
}

pub(crate) fn decode<T: DeserializeOwned>(value: JsValue) -> Result<T, ProviderError> {
    serde_wasm_bindgen::from_value(value).map_err(|decode_error| {
        ProviderError::new(format!(
            "Couldn't decode the wallet response: {decode_error}"
        ))
    })
}

/// Plain JSON objects, as the providers expect them (no `Map`, no `BigInt`).
pub(crate) fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, ProviderError> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|error| ProviderError::new(format!("Couldn't encode the request: {error}")))
}

pub(crate) fn optional_to_js<T: Serialize>(value: Option<&T>) -> Result<JsValue, ProviderError> {
    value.map_or(Ok(JsValue::UNDEFINED), to_js)
}

/// accepts a `Uint8Array` or a plain array of numbers
pub(crate) fn bytes(value: JsValue) -> Result<Vec<u8>, ProviderError> {
    match value.dyn_into::<js_sys::Uint8Array>() {
        Ok(array) => Ok(array.to_vec()),
        Err(value) => decode(value),
    }
}
