use greeksurf::OptionType;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WasmOptionType {
    Call,
    Put,
}

impl From<WasmOptionType> for OptionType {
    fn from(v: WasmOptionType) -> Self {
        match v {
            WasmOptionType::Call => OptionType::Call,
            WasmOptionType::Put => OptionType::Put,
        }
    }
}
