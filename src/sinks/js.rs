use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::JsValue;
use web_sys::js_sys::{Date, Function};

use super::{AnalyticsEvent, AnalyticsSink, SinkError, SoundEffect, SoundSink};

fn callback_error(error: JsValue) -> SinkError {
    SinkError::Callback(format!("{error:?}"))
}

/// Hands sound ids to a page-side `(sound: string) => void` callback.
pub struct JsSoundSink {
    callback: Function,
}

impl JsSoundSink {
    pub fn new(callback: Function) -> Self {
        Self { callback }
    }
}

impl SoundSink for JsSoundSink {
    fn play(&self, sound: SoundEffect) -> Result<(), SinkError> {
        self.callback
            .call1(&JsValue::NULL, &JsValue::from_str(sound.as_str()))
            .map(|_| ())
            .map_err(callback_error)
    }
}

/// Forwards analytics to a page-side `(event: string, properties: object) => void`
/// callback, stamping each payload with the current time.
pub struct JsAnalyticsSink {
    callback: Function,
}

impl JsAnalyticsSink {
    pub fn new(callback: Function) -> Self {
        Self { callback }
    }
}

impl AnalyticsSink for JsAnalyticsSink {
    fn track(&self, event: &AnalyticsEvent) -> Result<(), SinkError> {
        let mut properties = event.properties();
        let timestamp: String = Date::new_0().to_iso_string().into();
        properties.insert("timestamp".into(), Value::String(timestamp));

        let payload = Value::Object(properties)
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|err| SinkError::Encode(err.to_string()))?;
        self.callback
            .call2(&JsValue::NULL, &JsValue::from_str(event.name()), &payload)
            .map(|_| ())
            .map_err(callback_error)
    }
}
