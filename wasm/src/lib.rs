use wasm_bindgen::prelude::*;

mod error;
mod lab;
mod types;

pub use lab::WasmSurfaceLab;
pub use types::WasmOptionType;

#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Names accepted wherever a metric string is expected.
#[wasm_bindgen]
pub fn metric_names() -> Vec<String> {
    greeksurf::SurfaceMetric::ALL
        .iter()
        .map(|m| m.as_str().to_string())
        .collect()
}
