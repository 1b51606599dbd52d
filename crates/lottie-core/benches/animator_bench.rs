use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glam::Vec2;
use kurbo::BezPath;
use lottie_core::{Easing, KeyFrames, Linear, Property, Segment, Spatial, Transform, TransformData};
use lottie_data::model::PathData;

fn ease() -> Option<Arc<Easing>> {
    Some(Arc::new(Easing::new(Vec2::new(0.42, 0.0), Vec2::new(0.58, 1.0))))
}

fn scalar_track(segments: usize) -> KeyFrames<Linear<f32>> {
    let mut track = KeyFrames::new();
    for i in 0..segments {
        let start = (i * 10) as f32;
        track
            .push(Segment::new(start, start + 10.0, ease(), Linear::new(start, start + 10.0)))
            .expect("segments are ordered");
    }
    track
}

fn animated_transform() -> Transform {
    let mut data = TransformData::default();
    data.rotation
        .animation_mut()
        .push(Segment::new(0.0, 60.0, ease(), Linear::new(0.0, 360.0)))
        .expect("single segment");
    data.position
        .animation_mut()
        .push(Segment::new(
            0.0,
            60.0,
            ease(),
            Spatial::with_tangents(
                Vec2::ZERO,
                Vec2::new(200.0, 200.0),
                Vec2::new(100.0, 0.0),
                Vec2::new(0.0, -100.0),
            ),
        ))
        .expect("single segment");
    let mut transform = Transform::new(data);
    transform.cache();
    transform
}

fn morphing_path() -> Property<PathData> {
    let shape = |r: f32| {
        let points = (0..=36)
            .map(|i| {
                let a = (i as f32 * 10.0).to_radians();
                Vec2::new(a.cos() * r, a.sin() * r)
            })
            .collect();
        PathData::new(points, true)
    };
    let mut p = Property::<PathData>::default();
    p.animation_mut()
        .push(Segment::new(0.0, 60.0, ease(), Linear::new(shape(10.0), shape(50.0))))
        .expect("single segment");
    p
}

fn criterion_benchmark(c: &mut Criterion) {
    let track = scalar_track(64);
    c.bench_function("keyframe_lookup_64", |b| {
        b.iter(|| {
            for frame in (0..640).step_by(7) {
                black_box(track.value(black_box(frame)));
            }
        })
    });

    let transform = animated_transform();
    c.bench_function("transform_matrix_auto_orient", |b| {
        b.iter(|| black_box(transform.matrix(black_box(31), true)))
    });

    let path = morphing_path();
    let mut out = BezPath::new();
    c.bench_function("path_lerp_into_buffer", |b| {
        b.iter(|| {
            path.path_at(black_box(30), &mut out);
            black_box(out.elements().len());
        })
    });
}

criterion_group!(animator, criterion_benchmark);
criterion_main!(animator);
