//! Build a small batch of parts and report their meshes.
//!
//! Run with `RUST_LOG=shapekit_shapes=debug cargo run --example vase` to see
//! per-shape construction events. Parts that fail to build are logged and
//! skipped.

use std::f64::consts::PI;

use shapekit::prelude::*;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// One unit of work: a named part builder.
type Part = (&'static str, Box<dyn Fn(&KernelSettings) -> shapekit::Result<TriangleMesh>>);

fn vase(settings: &KernelSettings) -> shapekit::Result<TriangleMesh> {
    // Bulging profile, revolved with fluted walls.
    let profile: Vec<Point3> = (0..=24)
        .map(|i| {
            let t = i as f64 / 24.0;
            Point3::new(20.0 + 8.0 * (PI * t).sin() - 6.0 * t, 0.0, 80.0 * t)
        })
        .collect();
    let frames = Frames::with_target_x(&profile, &Vec3::x(), settings.sampling())?;
    let outer = SurfaceModulation::constant(2.0)
        .add(SurfaceModulation::from_fn(|phi, _| 0.6 * (12.0 * phi).cos()));
    let shape = BaseRevolve::new(LocalFrame::default(), frames, SurfaceModulation::constant(0.0), outer)
        .with_steps(settings.length_steps * 2, settings.polar_steps * 4, settings.radial_steps);
    settings.construct(&shape)
}

fn twisted_bar(settings: &KernelSettings) -> shapekit::Result<TriangleMesh> {
    let frames = settings.extrude(&LocalFrame::default(), 60.0)?;
    let shape = BaseBox::from_frames(
        frames,
        LineModulation::from_fn(|l| 12.0 - 4.0 * l),
        LineModulation::constant(6.0),
    )
    .with_steps(settings.length_steps, settings.radial_steps, settings.radial_steps)
    .with_transform(std::sync::Arc::new(|p: Point3| {
        let turn = p.z / 60.0 * PI / 2.0;
        let (s, c) = turn.sin_cos();
        Point3::new(p.x * c - p.y * s, p.x * s + p.y * c, p.z)
    }));
    settings.construct(&shape)
}

fn bead(settings: &KernelSettings) -> shapekit::Result<TriangleMesh> {
    let shape = BaseRing::new(LocalFrame::new(Point3::new(0.0, 0.0, 90.0)), 12.0, 4.0)?
        .with_tube_radius(SurfaceModulation::from_fn(|alpha, _| 4.0 + 0.5 * (3.0 * alpha).sin()))
        .with_steps(settings.polar_steps * 2, settings.polar_steps);
    settings.construct(&shape)
}

fn broken_lens(settings: &KernelSettings) -> shapekit::Result<TriangleMesh> {
    // Inner radius beyond the outer radius: rejected at construction.
    let shape = BaseLens::new(LocalFrame::default(), 3.0, 15.0, 10.0)?;
    settings.construct(&shape)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .with(filter)
        .init();
}

fn main() -> shapekit::Result<()> {
    init_tracing();

    let settings = KernelSettings::from_toml_str(
        r#"
        length_steps = 40
        polar_steps = 48
        frame_spacing = 1.0
        "#,
    )?;

    let parts: Vec<Part> = vec![
        ("vase", Box::new(vase)),
        ("twisted bar", Box::new(twisted_bar)),
        ("bead", Box::new(bead)),
        ("broken lens", Box::new(broken_lens)),
    ];

    let mut built = 0;
    for (name, build) in &parts {
        match build(&settings) {
            Ok(mesh) => {
                built += 1;
                info!(
                    part = *name,
                    triangles = mesh.num_triangles(),
                    closed = mesh.is_closed(),
                    volume = mesh.volume(),
                    "built"
                );
            }
            Err(err) => error!(part = *name, %err, "skipping part"),
        }
    }
    info!(built, total = parts.len(), "done");
    Ok(())
}
