//! Generate a Greek surface, mesh it and inspect a point.
//!
//! Demonstrates the core workflow:
//!   1. Describe the option and the plotted metric
//!   2. Generate the (spot, time) grid and its normalized heights
//!   3. Triangulate the heights into a mesh
//!   4. Pick a point on the mesh and read back exact model values
//!
//! Run with: `cargo run --example basic_surface`

use greeksurf::mesh::GridGeometry;
use greeksurf::{OptionParameters, OptionType, SurfaceLab, SurfaceMetric, SurfaceRequest};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ---------------------------------------------------------------
    // 1. At-the-money six-month call, plotting gamma
    // ---------------------------------------------------------------

    let params = OptionParameters::new(100.0, 100.0, 0.5, 0.2, 0.01, 0.0, OptionType::Call);
    let request = SurfaceRequest::new(params, SurfaceMetric::Gamma)
        .with_steps(40, 40)
        .with_time_max(1.0);

    // ---------------------------------------------------------------
    // 2. Generate the surface
    // ---------------------------------------------------------------

    let lab = SurfaceLab::default();
    let surface = lab.generate_surface(&request)?;
    let shape = surface.grid.shape();
    println!("Surface built: {} spots x {} times", shape.rows, shape.cols);
    println!(
        "Raw gamma peak {:.5}, display scale {:.4}\n",
        surface.height_map.peak(),
        surface.height_map.scale()
    );

    println!("--- Gamma (spot x time) ---\n");
    print!("{:>8}", "S\\T");
    let cols: Vec<usize> = (0..shape.cols).step_by(8).collect();
    for &j in &cols {
        print!("{:>10.3}", surface.t_axis()[j]);
    }
    println!();
    println!("{}", "-".repeat(8 + 10 * cols.len()));
    for i in (0..shape.rows).step_by(6) {
        print!("{:>8.1}", surface.s_axis()[i]);
        for &j in &cols {
            print!("{:>10.5}", surface.grid.value(i, j).unwrap_or(f64::NAN));
        }
        println!();
    }

    // ---------------------------------------------------------------
    // 3. Mesh
    // ---------------------------------------------------------------

    let mesh = lab.generate_mesh(&surface.height_map);
    println!(
        "\nMesh: {} vertices, {} triangles",
        mesh.vertex_count(),
        mesh.triangle_count()
    );

    // ---------------------------------------------------------------
    // 4. Inspect the vertex nearest the strike at the shortest expiry
    // ---------------------------------------------------------------

    let geometry = GridGeometry::new(shape, lab.config().footprint);
    let (x, z) = geometry.cell_position(shape.rows / 2, 0);
    if let Some(hit) = lab.inspect(x, z)? {
        println!("\n--- Inspection at ({x:.3}, {z:.3}) ---\n");
        println!("{}", serde_json::to_string_pretty(&hit)?);
    }

    Ok(())
}
