use greeksurf::mesh::Mesh;
use greeksurf::{DiffOutcome, LabConfig, OptionParameters, SurfaceLab, SurfaceMetric, SurfaceRequest};
use wasm_bindgen::prelude::*;

use crate::error::{json_err, to_js_err, unavailable_reason};
use crate::types::WasmOptionType;

/// Surface session driven by raw slider values.
#[wasm_bindgen]
pub struct WasmSurfaceLab {
    inner: SurfaceLab,
    last_mesh: Option<Mesh>,
    last_diff_mesh: Option<Mesh>,
    diff_status: String,
}

#[wasm_bindgen]
impl WasmSurfaceLab {
    /// `config_json` may be omitted for the default configuration.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<WasmSurfaceLab, JsValue> {
        let config = match config_json.as_deref() {
            Some(text) => LabConfig::from_json(text).map_err(to_js_err)?,
            None => LabConfig::default(),
        };
        let inner = SurfaceLab::new(config).map_err(to_js_err)?;
        Ok(Self {
            inner,
            last_mesh: None,
            last_diff_mesh: None,
            diff_status: "no_baseline".to_string(),
        })
    }

    /// Generate the surface and its mesh; returns the row-major heights.
    #[allow(clippy::too_many_arguments)]
    pub fn generate_surface(
        &mut self,
        spot: f64,
        strike: f64,
        time: f64,
        volatility: f64,
        rate: f64,
        dividend: f64,
        option_type: WasmOptionType,
        metric: &str,
        spot_steps: usize,
        time_steps: usize,
        time_max: f64,
    ) -> Result<Vec<f32>, JsValue> {
        let request = self.request(
            spot, strike, time, volatility, rate, dividend, option_type, metric, spot_steps,
            time_steps, time_max,
        )?;
        let surface = self.inner.generate_surface(&request).map_err(to_js_err)?;
        self.last_mesh = Some(self.inner.generate_mesh(&surface.height_map));
        Ok(surface.height_map.heights().to_vec())
    }

    /// Spot axis of the current surface.
    pub fn s_axis(&self) -> Vec<f64> {
        self.inner
            .current_grid()
            .map(|g| g.s_axis().to_vec())
            .unwrap_or_default()
    }

    /// Time axis of the current surface.
    pub fn t_axis(&self) -> Vec<f64> {
        self.inner
            .current_grid()
            .map(|g| g.t_axis().to_vec())
            .unwrap_or_default()
    }

    pub fn mesh_positions(&self) -> Vec<f32> {
        self.last_mesh.as_ref().map(Mesh::positions_flat).unwrap_or_default()
    }

    pub fn mesh_normals(&self) -> Vec<f32> {
        self.last_mesh.as_ref().map(Mesh::normals_flat).unwrap_or_default()
    }

    pub fn mesh_indices(&self) -> Vec<u32> {
        self.last_mesh
            .as_ref()
            .map(|m| m.indices().to_vec())
            .unwrap_or_default()
    }

    /// Selection JSON for the picked point, or `undefined` before the first
    /// surface.
    pub fn inspect(&self, x: f64, z: f64) -> Result<Option<String>, JsValue> {
        match self.inner.inspect(x, z).map_err(to_js_err)? {
            Some(hit) => serde_json::to_string(&hit).map(Some).map_err(json_err),
            None => Ok(None),
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn save_baseline(
        &mut self,
        spot: f64,
        strike: f64,
        time: f64,
        volatility: f64,
        rate: f64,
        dividend: f64,
        option_type: WasmOptionType,
        metric: &str,
        spot_steps: usize,
        time_steps: usize,
        time_max: f64,
    ) -> Result<(), JsValue> {
        let request = self.request(
            spot, strike, time, volatility, rate, dividend, option_type, metric, spot_steps,
            time_steps, time_max,
        )?;
        self.inner.save_baseline(&request).map_err(to_js_err)
    }

    /// Normalized difference heights, or `undefined` when there is no
    /// baseline or its shape differs. See [`diff_status`](Self::diff_status).
    #[allow(clippy::too_many_arguments)]
    pub fn diff_heights(
        &mut self,
        spot: f64,
        strike: f64,
        time: f64,
        volatility: f64,
        rate: f64,
        dividend: f64,
        option_type: WasmOptionType,
        metric: &str,
        spot_steps: usize,
        time_steps: usize,
        time_max: f64,
    ) -> Result<Option<Vec<f32>>, JsValue> {
        let request = self.request(
            spot, strike, time, volatility, rate, dividend, option_type, metric, spot_steps,
            time_steps, time_max,
        )?;
        match self.inner.diff_against_baseline(&request).map_err(to_js_err)? {
            DiffOutcome::Ready(map) => {
                self.last_diff_mesh = Some(self.inner.generate_mesh(&map));
                self.diff_status = "ready".to_string();
                Ok(Some(map.heights().to_vec()))
            }
            DiffOutcome::Unavailable(reason) => {
                self.last_diff_mesh = None;
                self.diff_status = unavailable_reason(reason);
                Ok(None)
            }
        }
    }

    /// `"ready"`, `"no_baseline"` or `"shape_mismatch"` for the last diff.
    #[wasm_bindgen(getter)]
    pub fn diff_status(&self) -> String {
        self.diff_status.clone()
    }

    pub fn diff_mesh_positions(&self) -> Vec<f32> {
        self.last_diff_mesh
            .as_ref()
            .map(Mesh::positions_flat)
            .unwrap_or_default()
    }

    pub fn diff_mesh_indices(&self) -> Vec<u32> {
        self.last_diff_mesh
            .as_ref()
            .map(|m| m.indices().to_vec())
            .unwrap_or_default()
    }

    #[wasm_bindgen(getter)]
    pub fn has_baseline(&self) -> bool {
        self.inner.has_baseline()
    }

    pub fn reset(&mut self) {
        self.inner.reset();
        self.last_mesh = None;
        self.last_diff_mesh = None;
        self.diff_status = "no_baseline".to_string();
    }

    pub fn config_json(&self) -> Result<String, JsValue> {
        self.inner.config().to_json().map_err(to_js_err)
    }
}

impl WasmSurfaceLab {
    #[allow(clippy::too_many_arguments)]
    fn request(
        &self,
        spot: f64,
        strike: f64,
        time: f64,
        volatility: f64,
        rate: f64,
        dividend: f64,
        option_type: WasmOptionType,
        metric: &str,
        spot_steps: usize,
        time_steps: usize,
        time_max: f64,
    ) -> Result<SurfaceRequest, JsValue> {
        let metric: SurfaceMetric = metric.parse().map_err(to_js_err)?;
        let params = OptionParameters::new(
            spot,
            strike,
            time,
            volatility,
            rate,
            dividend,
            option_type.into(),
        );
        let raw = SurfaceRequest::new(params, metric)
            .with_steps(spot_steps, time_steps)
            .with_time_max(time_max);
        Ok(self.inner.config().bounds.clamp(&raw))
    }
}
