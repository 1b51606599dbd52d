//! One-time passes run by `CompositionBuilder::build`.

use std::sync::Arc;

use lottie_core::{
    Asset, AssetType, CompositionBuilder, Easing, Ellipse, Fill, Group, Layer, LayerInfo,
    LayerType, Linear, Object, ObjectId, Property, Rect, Repeater, RoundedCorner, Segment, Stats,
    Transform, TransformData,
};
use lottie_data::CompositionConfig;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn builder() -> CompositionBuilder {
    init_tracing();
    CompositionBuilder::new(CompositionConfig {
        start_frame: 0,
        end_frame: 60,
        frame_rate: 30.0,
        width: 512,
        height: 512,
        ..Default::default()
    })
    .unwrap()
}

fn animated(from: f32, to: f32) -> Property<f32> {
    let mut property: Property<f32> = Property::new(from);
    property
        .animation_mut()
        .push(Segment::new(
            0.0,
            60.0,
            Some(Arc::new(Easing::linear())),
            Linear::new(from, to),
        ))
        .unwrap();
    property
}

fn group(builder: &mut CompositionBuilder, children: Vec<ObjectId>) -> ObjectId {
    builder.alloc(Object::new(Group {
        children,
        transform: None,
    }))
}

fn layer(builder: &mut CompositionBuilder, name: &str, layer: Layer) -> ObjectId {
    builder.alloc(Object::named(name, layer))
}

#[test]
fn animation_marks_every_ancestor_dynamic() {
    let mut b = builder();
    let rect = b.alloc(Object::new(Rect::default()));
    let fill = b.alloc(Object::new(Fill::default()));
    let still_group = group(&mut b, vec![rect, fill]);
    let still = layer(
        &mut b,
        "still",
        Layer {
            children: vec![still_group],
            ..Layer::new(LayerType::Shape)
        },
    );

    let fading_fill = b.alloc(Object::new(Fill {
        opacity: animated(100.0, 0.0),
        ..Default::default()
    }));
    let fading_group = group(&mut b, vec![fading_fill]);
    let moving_transform = b.alloc(Object::new(Transform::new(TransformData {
        rotation: animated(0.0, 90.0),
        ..Default::default()
    })));
    let moving_group = group(&mut b, Vec::new());
    let moving = layer(
        &mut b,
        "moving",
        Layer {
            children: vec![fading_group, moving_group],
            transform: Some(moving_transform),
            ..Layer::new(LayerType::Shape)
        },
    );
    let root = layer(
        &mut b,
        "root",
        Layer {
            children: vec![still, moving],
            ..Layer::new(LayerType::Precomp)
        },
    );
    b.set_root_layer(root).unwrap();

    let comp = b.build();
    let is_static = |id| comp.arena().get(id).unwrap().is_static();
    assert!(is_static(rect));
    assert!(is_static(fill));
    assert!(is_static(still_group));
    assert!(is_static(still));
    assert!(is_static(moving_group));

    assert!(!is_static(fading_fill));
    assert!(!is_static(fading_group));
    assert!(!is_static(moving_transform));
    assert!(!is_static(moving));
    assert!(!is_static(root));
}

#[test]
fn animated_rounded_corner_makes_its_rect_dynamic() {
    let mut b = builder();
    let corner = b.alloc(Object::new(RoundedCorner {
        radius: animated(0.0, 12.0),
    }));
    let rect = b.alloc(Object::new(Rect {
        roundness: Property::new(4.0),
        rounded_corner: Some(corner),
        ..Default::default()
    }));
    let root = layer(
        &mut b,
        "root",
        Layer {
            children: vec![rect, corner],
            ..Layer::new(LayerType::Shape)
        },
    );
    b.set_root_layer(root).unwrap();

    let comp = b.build();
    let arena = comp.arena();
    assert!(!arena.get(rect).unwrap().is_static());

    let rect = arena.rect(rect).unwrap();
    assert_eq!(rect.roundness(0, arena), 0.0);
    assert_eq!(rect.roundness(60, arena), 12.0);
    assert!(rect.roundness_changed(0, 30, arena));
}

#[test]
fn link_cycles_terminate() {
    let mut b = builder();
    let looping = group(&mut b, Vec::new());
    b.arena_mut().group_mut(looping).unwrap().children.push(looping);
    let root = layer(
        &mut b,
        "root",
        Layer {
            children: vec![looping],
            ..Layer::new(LayerType::Shape)
        },
    );
    b.set_root_layer(root).unwrap();

    let comp = b.build();
    assert!(comp.arena().get(looping).unwrap().is_static());
    assert!(comp.arena().get(root).unwrap().is_static());
}

#[test]
fn repeater_takes_the_shapes_before_it() {
    let mut b = builder();
    let rect = b.alloc(Object::new(Rect::default()));
    let fill = b.alloc(Object::new(Fill::default()));
    let repeater = b.alloc(Object::new(Repeater::default()));
    let ellipse = b.alloc(Object::new(Ellipse::default()));
    let container = group(&mut b, vec![rect, fill, repeater, ellipse]);

    let comp = b.build();
    let arena = comp.arena();
    assert_eq!(arena.group(container).unwrap().children, vec![repeater, ellipse]);

    let repeater = arena.repeater(repeater).unwrap();
    assert!(repeater.processed);
    let content = repeater.content.unwrap();
    assert_eq!(arena.group(content).unwrap().children, vec![rect, fill]);
}

#[test]
fn nested_repeaters_are_grouped_innermost_last() {
    let mut b = builder();
    let rect = b.alloc(Object::new(Rect::default()));
    let inner = b.alloc(Object::new(Repeater::default()));
    let fill = b.alloc(Object::new(Fill::default()));
    let outer = b.alloc(Object::new(Repeater::default()));
    let root = layer(
        &mut b,
        "root",
        Layer {
            children: vec![rect, inner, fill, outer],
            ..Layer::new(LayerType::Shape)
        },
    );
    b.set_root_layer(root).unwrap();

    let comp = b.build();
    let arena = comp.arena();
    assert_eq!(arena.layer(root).unwrap().children, vec![outer]);

    let outer_content = arena.repeater(outer).unwrap().content.unwrap();
    assert_eq!(arena.group(outer_content).unwrap().children, vec![inner, fill]);

    let inner = arena.repeater(inner).unwrap();
    assert!(inner.processed);
    let inner_content = inner.content.unwrap();
    assert_eq!(arena.group(inner_content).unwrap().children, vec![rect]);
}

#[test]
fn stats_count_layers_through_precomp_assets() {
    let mut b = builder();
    let solid = layer(&mut b, "solid", Layer::new(LayerType::Solid));
    let null = layer(&mut b, "null", Layer::new(LayerType::Null));
    let mut asset = Asset::new(AssetType::Precomp, "comp_0");
    asset.layers = vec![solid, null];
    b.add_asset(asset);

    let mut precomp = Layer::new(LayerType::Precomp);
    precomp.extra_mut().ref_id = "comp_0".into();
    let precomp = layer(&mut b, "precomp", precomp);
    let shape = layer(&mut b, "shape", Layer::new(LayerType::Shape));
    let text = layer(&mut b, "text", Layer::new(LayerType::Text));
    let root = layer(
        &mut b,
        "root",
        Layer {
            children: vec![precomp, shape, text],
            ..Layer::new(LayerType::Precomp)
        },
    );
    b.set_root_layer(root).unwrap();

    let comp = b.build();
    assert_eq!(
        comp.stats(),
        Stats {
            precomp_layer_count: 2,
            solid_layer_count: 1,
            shape_layer_count: 1,
            image_layer_count: 0,
            null_layer_count: 1,
        }
    );
    assert!(comp.asset("comp_0").unwrap().is_static());
    assert!(comp.asset("missing").is_none());
}

#[test]
fn precomp_with_animated_asset_is_dynamic() {
    let mut b = builder();
    let fading = b.alloc(Object::new(Fill {
        opacity: animated(100.0, 0.0),
        ..Default::default()
    }));
    let inner = layer(
        &mut b,
        "inner",
        Layer {
            children: vec![fading],
            ..Layer::new(LayerType::Shape)
        },
    );
    let mut asset = Asset::new(AssetType::Precomp, "comp_0");
    asset.layers = vec![inner];
    b.add_asset(asset);

    let still = layer(&mut b, "still", Layer::new(LayerType::Solid));
    let mut still_asset = Asset::new(AssetType::Precomp, "comp_1");
    still_asset.layers = vec![still];
    b.add_asset(still_asset);

    let mut precomp = Layer::new(LayerType::Precomp);
    precomp.extra_mut().ref_id = "comp_0".into();
    let precomp = layer(&mut b, "precomp", precomp);
    let mut still_precomp = Layer::new(LayerType::Precomp);
    still_precomp.extra_mut().ref_id = "comp_1".into();
    let still_precomp = layer(&mut b, "still precomp", still_precomp);
    let root = layer(
        &mut b,
        "root",
        Layer {
            children: vec![precomp, still_precomp],
            ..Layer::new(LayerType::Precomp)
        },
    );
    b.set_root_layer(root).unwrap();

    let comp = b.build();
    let is_static = |id| comp.arena().get(id).unwrap().is_static();
    assert!(!is_static(inner));
    assert!(!comp.asset("comp_0").unwrap().is_static());
    assert!(!is_static(precomp));
    assert!(!is_static(root));

    assert!(comp.asset("comp_1").unwrap().is_static());
    assert!(is_static(still_precomp));
}

#[test]
fn layer_info_and_parent_lookup() {
    let mut b = builder();
    let intro = layer(
        &mut b,
        "intro",
        Layer {
            id: Some(1),
            in_frame: 0,
            out_frame: 30,
            ..Layer::new(LayerType::Null)
        },
    );
    let body = layer(
        &mut b,
        "a layer name longer than inline",
        Layer {
            id: Some(2),
            parent_id: Some(1),
            in_frame: 15,
            out_frame: 60,
            ..Layer::new(LayerType::Shape)
        },
    );
    let root = layer(
        &mut b,
        "root",
        Layer {
            children: vec![intro, body],
            ..Layer::new(LayerType::Precomp)
        },
    );
    b.set_root_layer(root).unwrap();

    let comp = b.build();
    assert_eq!(
        comp.layer_info_list(),
        vec![
            LayerInfo {
                name: "intro".into(),
                in_frame: 0,
                out_frame: 30,
            },
            LayerInfo {
                name: "a layer name longer than inline".into(),
                in_frame: 15,
                out_frame: 60,
            },
        ]
    );

    let siblings = &comp.root_layer().unwrap().children;
    let parent_id = comp.arena().layer(body).unwrap().parent_id.unwrap();
    assert_eq!(comp.find_layer(siblings, parent_id), Some(intro));
    assert_eq!(comp.find_layer(siblings, 7), None);
}

#[test]
fn composition_reports_its_timeline() {
    let comp = builder().build();
    assert_eq!(comp.total_frame(), 61);
    assert_eq!(comp.duration(), 2.0);
    assert_eq!(comp.frame_at_pos(0.5), 30);
    assert_eq!(comp.frame_at_time(1.5), 45);
    assert_eq!(comp.size(), glam::UVec2::new(512, 512));
    assert!(comp.root_layer().is_none());
    assert!(comp.layer_info_list().is_empty());
}

#[test]
fn config_fixture_from_json() {
    init_tracing();
    let config: CompositionConfig = serde_json::from_value(serde_json::json!({
        "version": "5.7.4",
        "width": 100,
        "height": 50,
        "end_frame": 90,
        "frame_rate": 30.0
    }))
    .unwrap();
    let comp = CompositionBuilder::new(config).unwrap().build();
    assert_eq!(comp.version(), "5.7.4");
    assert_eq!(comp.duration(), 3.0);
    assert_eq!(comp.size(), glam::UVec2::new(100, 50));

    let invalid: CompositionConfig =
        serde_json::from_value(serde_json::json!({ "start_frame": 10, "end_frame": 5 })).unwrap();
    assert!(CompositionBuilder::new(invalid).is_err());
}
