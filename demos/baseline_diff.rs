//! Compare a surface against a saved baseline.
//!
//! Saves a price surface, bumps volatility and shows where the price
//! moved the most. The difference surface is normalized on its own, so
//! even a small change fills the display height.
//!
//! Run with: `cargo run --example baseline_diff`

use greeksurf::{
    DiffOutcome, LabConfig, OptionParameters, SurfaceLab, SurfaceMetric, SurfaceRequest,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = LabConfig::from_json(r#"{ "display": { "target_height": 0.15 } }"#)?;
    let lab = SurfaceLab::new(config)?;

    let before = SurfaceRequest::new(OptionParameters::default(), SurfaceMetric::Price)
        .with_steps(30, 30);
    lab.save_baseline(&before)?;
    println!("Baseline saved at vol {:.2}", before.params.volatility);

    for vol in [0.2, 0.25, 0.35] {
        let after = SurfaceRequest {
            params: OptionParameters {
                volatility: vol,
                ..before.params
            },
            ..before
        };
        match lab.diff_against_baseline(&after)? {
            DiffOutcome::Ready(map) => {
                let grid = lab.generate_surface(&after)?.grid;
                let (k, _) = map
                    .heights()
                    .iter()
                    .enumerate()
                    .fold((0, 0.0_f32), |best, (k, h)| {
                        if h.abs() > best.1 { (k, h.abs()) } else { best }
                    });
                let cols = grid.shape().cols;
                println!(
                    "vol {vol:.2}: max |dPrice| = {:.4} at S={:.1}, T={:.3} (scale {:.4})",
                    map.peak(),
                    grid.s_axis()[k / cols],
                    grid.t_axis()[k % cols],
                    map.scale()
                );
            }
            DiffOutcome::Unavailable(reason) => println!("vol {vol:.2}: no diff ({reason})"),
        }
    }

    // A different resolution cannot be compared.
    let resized = before.with_steps(20, 30);
    if let DiffOutcome::Unavailable(reason) = lab.diff_against_baseline(&resized)? {
        println!("\nResized request: {reason}");
    }

    lab.reset();
    println!("After reset, baseline present: {}", lab.has_baseline());
    Ok(())
}
