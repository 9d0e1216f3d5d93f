//! WebAssembly boundary.
//!
//! Four stateless exports for the browser front end. Results cross the
//! boundary as plain JS objects (optional fields absent, never `null`), so
//! the caller can read `result.valid` or overwrite `request.headers`
//! directly. Hard failures are thrown as `JsError` with a readable message.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::lifecycle::startup;
use crate::simulation::{self, engine};

/// Serialize through serde_json and hand the text to `JSON.parse`, so the
/// object has exactly the shape of the JSON wire format.
fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsError> {
    let json = serde_json::to_string(value)?;
    js_sys::JSON::parse(&json).map_err(|_| JsError::new("failed to convert result to a JS object"))
}

/// Validate configuration text. Throws on text that does not parse.
#[wasm_bindgen]
pub fn validate(config: &str) -> Result<JsValue, JsError> {
    let result = engine::validate(config).map_err(|e| JsError::new(&e.to_string()))?;
    to_js(&result)
}

/// Simulate a request given as JSON text (`JSON.stringify` of the object
/// `create_sample_request` returns). Throws on parse, validation or request
/// errors.
#[wasm_bindgen]
pub fn simulate(config: &str, request_json: &str) -> Result<JsValue, JsError> {
    let result =
        engine::simulate(config, request_json).map_err(|e| JsError::new(&e.to_string()))?;
    to_js(&result)
}

/// Request template with empty headers; the caller fills in `headers`.
#[wasm_bindgen]
pub fn create_sample_request(method: &str, host: &str, path: &str) -> Result<JsValue, JsError> {
    to_js(&simulation::create_sample_request(method, host, path))
}

/// One-time setup; safe to call repeatedly.
#[wasm_bindgen]
pub fn init_panic_hook() {
    startup::init_panic_hook();
}
