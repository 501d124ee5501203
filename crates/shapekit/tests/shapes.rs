//! End-to-end checks across frames, modulations, shapes, and meshes.

use std::f64::consts::PI;

use approx::assert_relative_eq;
use shapekit::prelude::*;

fn frame() -> LocalFrame {
    LocalFrame::default()
}

fn every_shape() -> Vec<Box<dyn BaseShape>> {
    let profile = Frames::with_target_x(
        &[Point3::new(8.0, 0.0, 0.0), Point3::new(12.0, 0.0, 15.0)],
        &Vec3::x(),
        Sampling::Count(8),
    )
    .unwrap();
    vec![
        Box::new(BaseBox::new(&frame(), 20.0, 10.0, 15.0).unwrap()),
        Box::new(BaseCylinder::new(&frame(), 20.0, 5.0).unwrap()),
        Box::new(BasePipe::new(&frame(), 20.0, 3.0, 5.0).unwrap()),
        Box::new(
            BasePipeSegment::new(&frame(), 20.0, 3.0, 5.0, PipeSegmentRange::start_end(0.0, PI))
                .unwrap(),
        ),
        Box::new(BaseLens::new(frame(), 2.0, 0.0, 10.0).unwrap()),
        Box::new(BaseRing::new(frame(), 10.0, 2.0).unwrap()),
        Box::new(BaseSphere::new(frame(), 10.0).unwrap()),
        Box::new(BaseRevolve::new(
            frame(),
            profile,
            SurfaceModulation::constant(0.0),
            SurfaceModulation::constant(1.5),
        )),
    ]
}

#[test]
fn every_default_shape_is_closed_and_outward() {
    for shape in every_shape() {
        let mesh = shape.construct();
        assert!(mesh.is_closed(), "{} is not closed", shape.name());
        assert!(mesh.volume() > 0.0, "{} has non-positive volume", shape.name());
        assert_eq!(mesh.normals.len(), mesh.vertices.len());
    }
}

#[test]
fn box_bounds_match_dimensions() {
    let mesh = BaseBox::new(&frame(), 20.0, 10.0, 15.0).unwrap().construct();
    let (min, max) = mesh.bounding_box().unwrap();
    assert_relative_eq!(min, Point3::new(-5.0, -7.5, 0.0), epsilon = 1e-5);
    assert_relative_eq!(max, Point3::new(5.0, 7.5, 20.0), epsilon = 1e-5);
}

#[test]
fn sphere_equator_on_x() {
    let sphere = BaseSphere::new(frame(), 10.0).unwrap();
    assert_relative_eq!(sphere.surface_point(0.0, 0.5, 1.0), Point3::new(10.0, 0.0, 0.0), epsilon = 1e-9);
}

#[test]
fn pipe_segment_modes_agree() {
    let a = BasePipeSegment::new(&frame(), 20.0, 3.0, 5.0, PipeSegmentRange::start_end(0.0, PI))
        .unwrap()
        .construct();
    let b = BasePipeSegment::new(&frame(), 20.0, 3.0, 5.0, PipeSegmentRange::mid_range(PI / 2.0, PI))
        .unwrap()
        .construct();
    assert_eq!(a, b);
    for i in 0..a.num_vertices() {
        let v = a.vertex(i);
        let phi = v.y.atan2(v.x);
        assert!((-1e-6..=PI + 1e-6).contains(&phi));
    }
}

#[test]
fn modulated_cylinder_along_helix() {
    let spine: Vec<Point3> = (0..=40)
        .map(|i| {
            let t = i as f64 / 40.0 * 2.0 * PI;
            Point3::new(25.0 * t.cos(), 25.0 * t.sin(), 4.0 * t)
        })
        .collect();
    let frames = Frames::with_policy(&spine, FramePolicy::Cylindrical, Sampling::Spacing(1.0)).unwrap();
    let radius = SurfaceModulation::constant(3.0)
        .add(SurfaceModulation::from_fn(|phi, _| 0.4 * (5.0 * phi).cos()))
        .add(SurfaceModulation::along_ratio(LineModulation::from_fn(|l| l)));
    let cyl = BaseCylinder::from_frames(frames, radius).with_steps(60, 30, 5);

    for (l, p) in [(0.0, 0.0), (0.3, 0.2), (1.0, 0.75)] {
        let expected = 3.0 + 0.4 * (5.0 * 2.0 * PI * p).cos() + l;
        let d = (cyl.surface_point(l, p, 1.0) - cyl.frames().spine_at(l)).norm();
        assert_relative_eq!(d, expected, epsilon = 1e-9);
    }
    let mesh = cyl.construct();
    assert!(mesh.is_closed());
}

#[test]
fn settings_drive_construction_identically_with_and_without_pool() {
    let shape = BaseRing::new(frame(), 10.0, 3.0).unwrap();
    let parallel = KernelSettings::default();
    let serial = KernelSettings {
        parallel: false,
        ..KernelSettings::default()
    };
    assert_eq!(parallel.construct(&shape).unwrap(), serial.construct(&shape).unwrap());
}

#[test]
fn lattice_manifold_from_settings() {
    let settings = KernelSettings::from_toml_str("overhang_angle = 40.0").unwrap();
    let horizontal = LocalFrame::with_z(Point3::origin(), Vec3::y()).unwrap();
    let frames = Frames::extrude(&horizontal, 30.0, settings.sampling()).unwrap();
    let manifold = LatticeManifold::new(frames, LineModulation::constant(2.0), settings.overhang_radians())
        .unwrap()
        .with_steps(7)
        .with_tips(TipMode::Double);
    let lattice = settings.construct_lattice(&manifold).unwrap();
    assert_eq!(lattice.beams.len(), 6 + 14);
    let (min, max) = lattice.bounding_box().unwrap();
    let tip = 2.0 / 40f64.to_radians().sin();
    assert!(max.z >= tip - 1e-9);
    assert!(min.z <= -tip + 1e-9);
}

#[test]
fn mesh_transform_moves_volume_unchanged() {
    let mut mesh = BaseSphere::new(frame(), 5.0).unwrap().construct();
    let before = mesh.volume();
    mesh.apply_transform(&Transform::translation(10.0, -4.0, 2.0));
    assert_relative_eq!(mesh.volume(), before, max_relative = 1e-5);
    let (min, _) = mesh.bounding_box().unwrap();
    assert_relative_eq!(min.z, -3.0, epsilon = 1e-4);
}

#[test]
fn implicit_providers_share_the_trait() {
    let fields: Vec<Box<dyn SignedDistance>> = vec![
        Box::new(ImplicitSphere::new(Point3::origin(), 5.0).unwrap()),
        Box::new(ImplicitSuperEllipsoid::new(Point3::origin(), Vec3::repeat(5.0), 1.0, 1.0).unwrap()),
        Box::new(|p: &Point3| p.coords.norm() - 5.0),
    ];
    for field in &fields {
        assert!(field.contains(&Point3::new(1.0, 1.0, 1.0)));
        assert!(!field.contains(&Point3::new(6.0, 0.0, 0.0)));
    }
}
