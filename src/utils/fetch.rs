//! Network utilities with timeout support.
//!
//! - [`race_with_timeout`] races a raw JavaScript promise against a timer
//! - [`post_json`] sends a JSON POST through `gloo-net` with a deadline

use std::pin::pin;

use futures::future::{Either, select};
use gloo_net::http::Request;
use gloo_timers::future::TimeoutFuture;
use js_sys::{Array, Promise};
use serde::{Serialize, de::DeserializeOwned};
use tokenscope_core::ApiError;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;

// =============================================================================
// Promise Racing Utilities
// =============================================================================

/// Result of a promise race with timeout.
#[derive(Debug)]
pub enum RaceResult {
    /// The promise completed before timeout.
    Completed(JsValue),
    /// Timeout occurred before promise completed.
    TimedOut,
    /// Promise rejected; carries the rejection value.
    Error(JsValue),
}

/// Race a promise against a timeout.
///
/// The timeout promise resolves to `undefined`, so a promise that itself
/// resolves to `undefined` is reported as [`RaceResult::TimedOut`].
pub async fn race_with_timeout(promise: Promise, timeout_ms: i32) -> RaceResult {
    let Some(window) = web_sys::window() else {
        return RaceResult::Error(JsValue::from_str("Window not available"));
    };

    let timeout_promise = Promise::new(&mut |resolve, _| {
        let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, timeout_ms);
    });

    let race_array = Array::new();
    race_array.push(&promise);
    race_array.push(&timeout_promise);
    let race_promise = Promise::race(&race_array);

    match JsFuture::from(race_promise).await {
        Ok(result) if result.is_undefined() => RaceResult::TimedOut,
        Ok(result) => RaceResult::Completed(result),
        Err(e) => RaceResult::Error(e),
    }
}

// =============================================================================
// JSON POST
// =============================================================================

/// POST `body` as JSON and decode a JSON response.
///
/// Non-2xx statuses become [`ApiError::Http`] without reading the body.
pub async fn post_json<B, T>(url: &str, body: &B, timeout_ms: u32) -> Result<T, ApiError>
where
    B: Serialize,
    T: DeserializeOwned,
{
    let request = Request::post(url)
        .json(body)
        .map_err(|e| ApiError::Network(e.to_string()))?;

    let send = pin!(request.send());
    let timer = pin!(TimeoutFuture::new(timeout_ms));
    let response = match select(send, timer).await {
        Either::Left((result, _)) => result.map_err(|e| ApiError::Network(e.to_string()))?,
        Either::Right(_) => return Err(ApiError::Timeout),
    };

    if !response.ok() {
        return Err(ApiError::Http(response.status()));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}
