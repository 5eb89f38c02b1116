//! Integration tests for the greeksurf pipeline.
//!
//! Exercises the full path from option parameters through grid generation,
//! normalization, meshing, inspection and baseline diffs, through the
//! `SurfaceLab` facade and through the individual stages.

use std::sync::Arc;
use std::thread;

use approx::assert_abs_diff_eq;
use greeksurf::baseline::{BaselineStore, DiffUnavailable};
use greeksurf::mesh::{Footprint, GridGeometry, HeightNormalizer, MeshBuilder};
use greeksurf::surface::GridBuilder;
use greeksurf::{
    DiffOutcome, GreekSurfError, LabConfig, OptionParameters, OptionType, SurfaceLab,
    SurfaceMetric, SurfaceRequest,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn request(metric: SurfaceMetric, steps: usize) -> SurfaceRequest {
    SurfaceRequest::new(OptionParameters::default(), metric).with_steps(steps, steps)
}

// ---------------------------------------------------------------------------
// Full pipeline
// ---------------------------------------------------------------------------

#[test]
fn pipeline_every_metric() {
    let lab = SurfaceLab::default();
    for metric in SurfaceMetric::ALL {
        let surface = lab.generate_surface(&request(metric, 20)).unwrap();
        assert_eq!(surface.grid.metric(), metric);
        assert_abs_diff_eq!(surface.height_map.max_abs(), 0.1, epsilon = 1e-6);

        let mesh = lab.generate_mesh(&surface.height_map);
        assert_eq!(mesh.vertex_count(), 400);
        assert_eq!(mesh.indices().len(), 6 * 19 * 19);
        assert!(mesh.positions().iter().all(|p| p.coords.iter().all(|c| c.is_finite())));
        assert!(mesh.indices().iter().all(|&k| (k as usize) < mesh.vertex_count()));
    }
}

#[test]
fn stages_compose_without_facade() {
    let base = OptionParameters::new(100.0, 95.0, 0.75, 0.25, 0.03, 0.02, OptionType::Put);
    let grid = GridBuilder::new()
        .steps(15, 12)
        .metric(SurfaceMetric::Theta)
        .build(&base)
        .unwrap();
    let heights = HeightNormalizer::new(0.2).unwrap().normalize(&grid);
    let footprint = Footprint::new(0.4, 0.3).unwrap();
    let mesh = MeshBuilder::new(footprint).build(&heights);

    // Vertex y is the normalized metric at the same cell.
    let k = 7 * 12 + 5;
    assert_eq!(mesh.positions()[k].y, heights.height(7, 5).unwrap());
    assert_abs_diff_eq!(
        f64::from(mesh.positions()[k].y),
        grid.value(7, 5).unwrap() * heights.scale(),
        epsilon = 1e-6
    );

    // Picking that vertex resolves to the same cell.
    let p = mesh.positions()[k];
    let hit = greeksurf::inspect::inspect(f64::from(p.x), f64::from(p.z), &grid, footprint, &base)
        .unwrap();
    assert_eq!((hit.row, hit.col), (7, 5));
}

#[test]
fn inspection_reports_exact_values() {
    let lab = SurfaceLab::default();
    let surface = lab.generate_surface(&request(SurfaceMetric::Gamma, 25)).unwrap();
    let footprint = lab.config().footprint;
    let geometry = GridGeometry::new(surface.grid.shape(), footprint);

    let (x, z) = geometry.cell_position(3, 21);
    let hit = lab.inspect(x, z).unwrap().unwrap();
    assert_eq!(hit.gamma, surface.grid.value(3, 21).unwrap());
    assert_eq!(hit.spot, surface.s_axis()[3]);
    assert_eq!(hit.time, surface.t_axis()[21]);

    // The rendered height is display-scaled; the inspected value is not.
    let height = surface.height_map.height(3, 21).unwrap();
    assert!((f64::from(height) - hit.gamma).abs() > 1e-6);
}

#[test]
fn inspection_outside_footprint_clamps() {
    let lab = SurfaceLab::default();
    lab.generate_surface(&request(SurfaceMetric::Price, 10)).unwrap();
    let corner = lab.inspect(-10.0, 10.0).unwrap().unwrap();
    assert_eq!((corner.row, corner.col), (9, 0));
}

#[test]
fn inspect_before_generate_is_none() {
    let lab = SurfaceLab::default();
    assert!(lab.inspect(0.0, 0.0).unwrap().is_none());
    assert!(lab.selection().is_none());
}

// ---------------------------------------------------------------------------
// Baseline and diff
// ---------------------------------------------------------------------------

#[test]
fn identical_regeneration_diffs_to_zero() {
    let lab = SurfaceLab::default();
    let req = request(SurfaceMetric::Delta, 30);
    lab.save_baseline(&req).unwrap();
    let outcome = lab.diff_against_baseline(&req).unwrap();
    let map = outcome.into_height_map().unwrap();
    assert!(map.is_flat());
    assert_eq!(map.scale(), 0.0);
}

#[test]
fn diff_normalizes_independently() {
    let lab = SurfaceLab::default();
    let before = request(SurfaceMetric::Price, 16);
    let after = SurfaceRequest {
        params: OptionParameters {
            volatility: 0.22,
            ..before.params
        },
        ..before
    };
    lab.save_baseline(&before).unwrap();
    let main = lab.generate_surface(&after).unwrap();
    let diff = lab.diff_against_baseline(&after).unwrap().into_height_map().unwrap();

    // Both peak at the target even though the raw diff is far smaller.
    assert_abs_diff_eq!(diff.max_abs(), 0.1, epsilon = 1e-6);
    assert!(diff.peak() < main.height_map.peak() / 5.0);
}

#[test]
fn mismatched_shape_is_unavailable_not_error() {
    let lab = SurfaceLab::default();
    lab.save_baseline(&request(SurfaceMetric::Price, 10)).unwrap();
    let outcome = lab.diff_against_baseline(&request(SurfaceMetric::Price, 12)).unwrap();
    match outcome {
        DiffOutcome::Unavailable(DiffUnavailable::ShapeMismatch { baseline, current }) => {
            assert_eq!((baseline.rows, current.rows), (10, 12));
        }
        other => panic!("expected shape mismatch, got {other:?}"),
    }
}

#[test]
fn reset_clears_everything() {
    let lab = SurfaceLab::default();
    let req = request(SurfaceMetric::Price, 8);
    lab.generate_surface(&req).unwrap();
    lab.inspect(0.0, 0.0).unwrap();
    lab.save_baseline(&req).unwrap();

    lab.reset();
    assert!(!lab.has_baseline());
    assert!(lab.selection().is_none());
    assert!(lab.inspect(0.0, 0.0).unwrap().is_none());
    assert_eq!(
        lab.diff_against_baseline(&req).unwrap(),
        DiffOutcome::Unavailable(DiffUnavailable::NoBaseline)
    );
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[test]
fn invalid_parameters_never_reach_a_mesh() {
    let lab = SurfaceLab::default();
    for params in [
        OptionParameters { volatility: 0.0, ..OptionParameters::default() },
        OptionParameters { volatility: f64::NAN, ..OptionParameters::default() },
        OptionParameters { spot: -1.0, ..OptionParameters::default() },
        OptionParameters { strike: 0.0, ..OptionParameters::default() },
        OptionParameters { rate: f64::INFINITY, ..OptionParameters::default() },
    ] {
        let err = lab
            .generate_surface(&SurfaceRequest::new(params, SurfaceMetric::Price))
            .unwrap_err();
        assert!(matches!(err, GreekSurfError::InvalidParameter { .. }), "{err}");
    }
    assert!(lab.current_grid().is_none());
}

#[test]
fn non_positive_horizon_rejected() {
    let lab = SurfaceLab::default();
    let err = lab
        .generate_surface(&request(SurfaceMetric::Price, 10).with_time_max(0.0))
        .unwrap_err();
    assert!(matches!(err, GreekSurfError::InvalidParameter { .. }));
}

#[test]
fn single_sample_axes_are_valid() {
    let lab = SurfaceLab::default();
    let surface = lab
        .generate_surface(&request(SurfaceMetric::Delta, 1).with_steps(1, 6))
        .unwrap();
    let mesh = lab.generate_mesh(&surface.height_map);
    assert_eq!(mesh.vertex_count(), 6);
    assert!(mesh.indices().is_empty());
    // The lone spot row sits on the centre line.
    assert!(mesh.positions().iter().all(|p| p.z == 0.0));
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[test]
fn configured_lab_uses_footprint_and_target() {
    let config = LabConfig::from_json(
        r#"{
            "grid": { "spot_min_factor": 0.8, "spot_max_factor": 1.2 },
            "display": { "target_height": 0.5 },
            "footprint": { "width": 1.0, "depth": 2.0 }
        }"#,
    )
    .unwrap();
    let lab = SurfaceLab::new(config).unwrap();
    let surface = lab.generate_surface(&request(SurfaceMetric::Vega, 11)).unwrap();
    assert_abs_diff_eq!(surface.s_axis()[0], 80.0, epsilon = 1e-12);
    assert_abs_diff_eq!(surface.s_axis()[10], 120.0, epsilon = 1e-9);
    assert_abs_diff_eq!(surface.height_map.max_abs(), 0.5, epsilon = 1e-6);

    let mesh = lab.generate_mesh(&surface.height_map);
    assert_abs_diff_eq!(mesh.positions()[0].x, -0.5, epsilon = 1e-6);
    assert_abs_diff_eq!(mesh.positions()[0].z, -1.0, epsilon = 1e-6);

    let hit = lab.inspect(0.5, 1.0).unwrap().unwrap();
    assert_eq!((hit.row, hit.col), (10, 10));
}

// ---------------------------------------------------------------------------
// Concurrency
// ---------------------------------------------------------------------------

#[test]
fn concurrent_grid_generation() {
    let base = Arc::new(OptionParameters::default());
    let handles: Vec<_> = SurfaceMetric::ALL
        .into_iter()
        .map(|metric| {
            let base = Arc::clone(&base);
            thread::spawn(move || GridBuilder::new().steps(20, 20).metric(metric).build(&base))
        })
        .collect();
    for (h, metric) in handles.into_iter().zip(SurfaceMetric::ALL) {
        let grid = h.join().unwrap().unwrap();
        let expected = GridBuilder::new().steps(20, 20).metric(metric).build(&base).unwrap();
        assert_eq!(grid, expected);
    }
}

#[test]
fn concurrent_save_and_diff() {
    let store = Arc::new(BaselineStore::new());
    let grid = GridBuilder::new().steps(12, 12).build(&OptionParameters::default()).unwrap();
    let normalizer = HeightNormalizer::default();

    let handles: Vec<_> = (0..8)
        .map(|k| {
            let store = Arc::clone(&store);
            let grid = grid.clone();
            thread::spawn(move || {
                if k % 2 == 0 {
                    store.save(grid);
                    None
                } else {
                    Some(store.diff_heights(&grid, &normalizer))
                }
            })
        })
        .collect();

    for h in handles {
        // Every diff either sees no baseline yet or an identical one.
        if let Some(outcome) = h.join().unwrap() {
            match outcome {
                DiffOutcome::Ready(map) => assert!(map.is_flat()),
                DiffOutcome::Unavailable(reason) => assert_eq!(reason, DiffUnavailable::NoBaseline),
            }
        }
    }
    assert!(store.has_baseline());
}

#[test]
fn shared_lab_across_threads() {
    let lab = Arc::new(SurfaceLab::default());
    let handles: Vec<_> = (0..4)
        .map(|k| {
            let lab = Arc::clone(&lab);
            thread::spawn(move || {
                let req = request(SurfaceMetric::ALL[k], 10);
                lab.generate_surface(&req).unwrap();
                lab.inspect(0.0, 0.0).unwrap()
            })
        })
        .collect();
    for h in handles {
        assert!(h.join().unwrap().is_some());
    }
    assert!(lab.current_grid().is_some());
}
