use greeksurf::{DiffUnavailable, GreekSurfError};
use wasm_bindgen::JsValue;

pub(crate) fn to_js_err(e: GreekSurfError) -> JsValue {
    match e {
        GreekSurfError::Config { message } => JsValue::from_str(&format!("config: {message}")),
        _ => JsValue::from_str(&format!("{e}")),
    }
}

pub(crate) fn json_err(e: serde_json::Error) -> JsValue {
    JsValue::from_str(&e.to_string())
}

pub(crate) fn unavailable_reason(reason: DiffUnavailable) -> String {
    match reason {
        DiffUnavailable::NoBaseline => "no_baseline".to_string(),
        DiffUnavailable::ShapeMismatch { .. } => "shape_mismatch".to_string(),
    }
}
