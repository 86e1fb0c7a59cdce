//! Browser build of the container runtime bridge.
//!
//! Web bundles link this in place of the device library; the core is built
//! with the `browser` feature, so the platform adapter underneath is the
//! mock: in-memory storage, fetch-backed requests, no self-originated
//! events. The call surface matches the device bindings so application code
//! does not change between builds.

use std::{collections::HashMap, sync::Arc};

use dynamics_bridge_core::{
    EventHandler, EventPayload, HandlerId, RequestOptions, Runtime, RuntimeBuilder, RuntimeEvent,
};
use log::debug;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct BrowserRuntime {
    inner: Arc<Runtime>,
}

struct JsEventHandler(js_sys::Function);

// SAFETY: the browser build targets single-threaded wasm; handlers are
// registered and invoked on the one JS thread and never cross another.
unsafe impl Send for JsEventHandler {}
unsafe impl Sync for JsEventHandler {}

impl EventHandler for JsEventHandler {
    fn on_event(&self, event: RuntimeEvent) {
        let serializer = serde_wasm_bindgen::Serializer::json_compatible();
        let payload = serde::Serialize::serialize(&event, &serializer).unwrap_or(JsValue::NULL);
        if let Err(e) = self.0.call1(&JsValue::NULL, &payload) {
            debug!("event handler threw: {e:?}");
        }
    }
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsError> {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    Ok(value.serialize(&serializer)?)
}

#[wasm_bindgen]
impl BrowserRuntime {
    /// Builds an idle runtime. `params` is an optional plain object of
    /// activation parameters, kept for surface parity with device builds.
    #[wasm_bindgen(constructor)]
    pub fn new(app_id: String, params: JsValue) -> Result<BrowserRuntime, JsError> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Debug);

        let builder = RuntimeBuilder::new();
        builder.set_app_id(app_id);

        let params: Option<HashMap<String, String>> = serde_wasm_bindgen::from_value(params)?;
        for (key, value) in params.unwrap_or_default() {
            builder.set_param(key, value);
        }

        let inner = builder.build()?;
        Ok(BrowserRuntime { inner })
    }

    /// Starts the runtime. Under the mock adapter this always succeeds.
    pub async fn start(&self) -> Result<(), JsError> {
        Ok(self.inner.start().await?)
    }

    #[wasm_bindgen(js_name = "isReady")]
    pub fn is_ready(&self) -> bool {
        self.inner.is_ready()
    }

    pub fn status(&self) -> Result<JsValue, JsError> {
        to_js(&self.inner.status())
    }

    pub fn shutdown(&self) {
        self.inner.shutdown()
    }

    /// Registers `callback` for `event` and returns a registration id for
    /// [BrowserRuntime::off].
    pub fn on(&self, event: String, callback: js_sys::Function) -> HandlerId {
        self.inner.on(event, Box::new(JsEventHandler(callback)))
    }

    /// Removes one registration by id, or every handler for `event` when no
    /// id is given.
    pub fn off(&self, event: String, id: Option<HandlerId>) {
        self.inner.off(event, id)
    }

    /// Fires an event at registered handlers. The mock adapter never emits
    /// on its own, so this is how test harnesses drive subscriptions.
    #[wasm_bindgen(js_name = "dispatchEvent")]
    pub fn dispatch_event(&self, name: String, payload: JsValue) -> Result<(), JsError> {
        let payload = if payload.is_undefined() || payload.is_null() {
            EventPayload::Empty
        } else {
            serde_wasm_bindgen::from_value(payload)?
        };
        self.inner.dispatch_event(RuntimeEvent { name, payload });
        Ok(())
    }

    #[wasm_bindgen(js_name = "sendRequest")]
    pub async fn send_request(&self, options: JsValue) -> Result<JsValue, JsError> {
        let options: RequestOptions = serde_wasm_bindgen::from_value(options)?;
        let response = self.inner.send_request(options).await?;
        to_js(&response)
    }

    #[wasm_bindgen(js_name = "httpGet")]
    pub async fn http_get(&self, url: String, headers: JsValue) -> Result<JsValue, JsError> {
        let headers: Option<HashMap<String, String>> = serde_wasm_bindgen::from_value(headers)?;
        let response = self.inner.http_get(url, headers).await?;
        to_js(&response)
    }

    #[wasm_bindgen(js_name = "httpPost")]
    pub async fn http_post(
        &self,
        url: String,
        body: String,
        headers: JsValue,
    ) -> Result<JsValue, JsError> {
        let headers: Option<HashMap<String, String>> = serde_wasm_bindgen::from_value(headers)?;
        let response = self.inner.http_post(url, body, headers).await?;
        to_js(&response)
    }

    #[wasm_bindgen(js_name = "secureGet")]
    pub async fn secure_get(&self, key: String) -> Result<Option<String>, JsError> {
        Ok(self.inner.secure_get(key).await?)
    }

    #[wasm_bindgen(js_name = "secureSet")]
    pub async fn secure_set(&self, key: String, value: String) -> Result<(), JsError> {
        Ok(self.inner.secure_set(key, value).await?)
    }

    #[wasm_bindgen(js_name = "secureRemove")]
    pub async fn secure_remove(&self, key: String) -> Result<(), JsError> {
        Ok(self.inner.secure_remove(key).await?)
    }

    #[wasm_bindgen(js_name = "secureGetAll")]
    pub async fn secure_get_all(&self) -> Result<JsValue, JsError> {
        let all = self.inner.secure_get_all().await?;
        to_js(&all)
    }
}
