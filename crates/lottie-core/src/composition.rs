//! The composition: arena owner, timeline and document-level tables.
//!
//! A [`CompositionBuilder`] collects nodes and tables from the document
//! decoder. [`CompositionBuilder::build`] runs the one-time passes (repeater
//! grouping, tangent caches, static propagation, stats) and hands back an
//! immutable [`Composition`] that any number of threads can evaluate
//! concurrently.

use std::collections::{HashMap, HashSet};

use glam::UVec2;
use kurbo::BezPath;
use lottie_data::model::{BlendMode, Marker};
use lottie_data::CompositionConfig;
use tracing::{debug, debug_span, warn};

use crate::error::ModelError;
use crate::layer::{Layer, LayerType};
use crate::object::{Arena, Object, ObjectId, ObjectKind};
use crate::shapes::Group;

/// Frame/time conversions of a composition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timeline {
    pub start_frame: i32,
    pub end_frame: i32,
    pub frame_rate: f32,
}

impl Timeline {
    pub fn new(config: &CompositionConfig) -> Self {
        Self {
            start_frame: config.start_frame,
            end_frame: config.end_frame,
            frame_rate: config.frame_rate,
        }
    }

    /// Length of the frame range, `end - start`.
    pub fn frame_duration(&self) -> i32 {
        self.end_frame - self.start_frame
    }

    /// Number of frames including both ends.
    pub fn total_frame(&self) -> i32 {
        self.frame_duration() + 1
    }

    /// Seconds.
    pub fn duration(&self) -> f64 {
        f64::from(self.frame_duration()) / f64::from(self.frame_rate)
    }

    /// Frame offset at `pos`, a fraction of the duration clamped to `[0, 1]`.
    pub fn frame_at_pos(&self, pos: f64) -> i32 {
        let pos = pos.clamp(0.0, 1.0);
        (pos * f64::from(self.frame_duration())).round() as i32
    }

    pub fn frame_at_time(&self, seconds: f64) -> i32 {
        let duration = self.duration();
        if duration <= 0.0 {
            return 0;
        }
        self.frame_at_pos(seconds / duration)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AssetType {
    #[default]
    Precomp,
    Image,
    Char,
}

/// A precomposition, image or glyph asset. Image pixels are not decoded here.
#[derive(Debug, Clone, Default)]
pub struct Asset {
    pub asset_type: AssetType,
    pub ref_id: String,
    pub layers: Vec<ObjectId>,
    pub width: u32,
    pub height: u32,
    is_static: bool,
}

impl Asset {
    pub fn new(asset_type: AssetType, ref_id: impl Into<String>) -> Self {
        Self {
            asset_type,
            ref_id: ref_id.into(),
            ..Default::default()
        }
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FontInfo {
    pub name: String,
    pub family: String,
    pub style: String,
    pub ascent: f64,
}

#[derive(Debug, Clone, Default)]
pub struct Glyph {
    pub code_point: u32,
    pub style: String,
    pub family: String,
    pub size: f64,
    pub width: f64,
    pub outline: BezPath,
}

/// Fonts and pre-outlined glyphs embedded in the document.
#[derive(Debug, Clone, Default)]
pub struct FontDb {
    pub fonts: Vec<FontInfo>,
    pub glyphs: Vec<Glyph>,
}

impl FontDb {
    pub fn font(&self, name: &str) -> Option<&FontInfo> {
        self.fonts.iter().find(|f| f.name == name)
    }

    /// Glyph for `code_point` at `size` in the family of font `font_name`.
    pub fn load(&self, code_point: u32, size: i32, font_name: &str) -> Option<&Glyph> {
        if self.glyphs.is_empty() {
            return None;
        }
        let family = &self.font(font_name)?.family;
        self.glyphs.iter().find(|g| {
            g.size as i32 == size && g.code_point == code_point && &g.family == family
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub precomp_layer_count: u16,
    pub solid_layer_count: u16,
    pub shape_layer_count: u16,
    pub image_layer_count: u16,
    pub null_layer_count: u16,
}

impl Stats {
    fn collect(arena: &Arena, assets: &HashMap<String, Asset>, root: Option<ObjectId>) -> Self {
        let mut stats = Stats::default();
        let mut seen = HashSet::new();
        let mut pending: Vec<ObjectId> = root.into_iter().collect();

        while let Some(id) = pending.pop() {
            if !seen.insert(id) {
                continue;
            }
            let Ok(layer) = arena.layer(id) else {
                continue;
            };
            let counter = match layer.layer_type {
                LayerType::Precomp => &mut stats.precomp_layer_count,
                LayerType::Solid => &mut stats.solid_layer_count,
                LayerType::Shape => &mut stats.shape_layer_count,
                LayerType::Image => &mut stats.image_layer_count,
                LayerType::Null => &mut stats.null_layer_count,
                LayerType::Text => {
                    continue;
                }
            };
            *counter = counter.saturating_add(1);

            pending.extend(layer.children.iter().copied());
            if let Some(asset) = layer.ref_id().and_then(|r| assets.get(r)) {
                pending.extend(asset.layers.iter().copied());
            }
        }
        stats
    }
}

/// Name and active frame range of a top-level layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerInfo {
    pub name: String,
    pub in_frame: i32,
    pub out_frame: i32,
}

/// Collects the nodes of one composition before it is frozen.
#[derive(Debug)]
pub struct CompositionBuilder {
    config: CompositionConfig,
    arena: Arena,
    root_layer: Option<ObjectId>,
    assets: HashMap<String, Asset>,
    markers: Vec<Marker>,
    fonts: FontDb,
}

impl CompositionBuilder {
    pub fn new(config: CompositionConfig) -> Result<Self, ModelError> {
        config.validate()?;
        let arena = Arena::with_capacity(config.arena_capacity);
        Ok(Self {
            config,
            arena,
            root_layer: None,
            assets: HashMap::new(),
            markers: Vec::new(),
            fonts: FontDb::default(),
        })
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn arena_mut(&mut self) -> &mut Arena {
        &mut self.arena
    }

    pub fn alloc(&mut self, object: Object) -> ObjectId {
        self.arena.alloc(object)
    }

    pub fn set_root_layer(&mut self, id: ObjectId) -> Result<(), ModelError> {
        self.arena.layer(id)?;
        self.root_layer = Some(id);
        Ok(())
    }

    pub fn add_asset(&mut self, asset: Asset) {
        if let Some(previous) = self.assets.insert(asset.ref_id.clone(), asset) {
            warn!(ref_id = %previous.ref_id, "duplicate asset ref id, keeping the last one");
        }
    }

    pub fn add_marker(&mut self, marker: Marker) {
        self.markers.push(marker);
    }

    pub fn font_db_mut(&mut self) -> &mut FontDb {
        &mut self.fonts
    }

    pub fn build(mut self) -> Composition {
        let _span = debug_span!("build_composition", nodes = self.arena.len()).entered();

        let grouped = process_repeaters(&mut self.arena);
        debug!(repeaters = grouped, "grouped repeater content");

        for object in self.arena.objects_mut() {
            object.kind_mut().cache();
        }
        debug!("resolved property caches");

        let animated = propagate_static(&mut self.arena, &mut self.assets);
        debug!(animated, total = self.arena.len(), "propagated static flags");

        let stats = Stats::collect(&self.arena, &self.assets, self.root_layer);
        debug!(?stats, "collected layer stats");

        Composition {
            config: self.config,
            arena: self.arena,
            root_layer: self.root_layer,
            assets: self.assets,
            markers: self.markers,
            fonts: self.fonts,
            stats,
        }
    }
}

/// Moves the shapes that precede each repeater in its container into a new
/// group and links that group as the repeater's content. Returns the number
/// of repeaters grouped.
fn process_repeaters(arena: &mut Arena) -> usize {
    let mut grouped = 0;
    // The arena grows while this runs; new content groups are visited too.
    let mut index = 0;
    while index < arena.len() {
        let Some((container, position)) = pending_repeater(arena, index) else {
            index += 1;
            continue;
        };

        let children = match arena.get_mut(container).map(Object::kind_mut) {
            Ok(ObjectKind::Layer(layer)) => &mut layer.children,
            Ok(ObjectKind::Group(group)) => &mut group.children,
            _ => {
                index += 1;
                continue;
            }
        };
        let moved: Vec<ObjectId> = children.drain(..position).collect();
        let repeater_id = children[0];

        let content = arena.alloc(Object::new(Group {
            children: moved,
            transform: None,
        }));
        match arena.repeater_mut(repeater_id) {
            // Revisit the container; earlier repeaters now live in `content`.
            Ok(repeater) => {
                repeater.content = Some(content);
                repeater.processed = true;
                grouped += 1;
            }
            Err(_) => index += 1,
        }
    }
    grouped
}

/// The container at `index` and the position of its last unprocessed
/// repeater child, if it has one.
fn pending_repeater(arena: &Arena, index: usize) -> Option<(ObjectId, usize)> {
    let id = arena.id_at(index)?;
    let object = arena.get(id).ok()?;
    let children = match object.kind() {
        ObjectKind::Layer(layer) => &layer.children,
        ObjectKind::Group(group) => &group.children,
        _ => return None,
    };
    let position = children
        .iter()
        .rposition(|child| arena.repeater(*child).is_ok_and(|r| !r.processed))?;
    Some((id, position))
}

#[derive(Debug, Clone, Copy)]
enum Mark {
    Unvisited,
    InProgress,
    Done(bool),
}

/// Marks every node static unless it, or anything it links to, is animated.
/// Precomp layers also link to the layers of their asset. Returns the number
/// of animated nodes.
fn propagate_static(arena: &mut Arena, assets: &mut HashMap<String, Asset>) -> usize {
    let mut marks = vec![Mark::Unvisited; arena.len()];
    for index in 0..arena.len() {
        if let Some(id) = arena.id_at(index) {
            resolve_static(arena, assets, id, &mut marks);
        }
    }
    for asset in assets.values_mut() {
        asset.is_static = asset
            .layers
            .iter()
            .all(|id| matches!(marks.get(id.index()), Some(Mark::Done(true)) | None));
    }

    let mut animated = 0;
    for (object, mark) in arena.objects_mut().zip(&marks) {
        let is_static = matches!(mark, Mark::Done(true));
        if !is_static {
            animated += 1;
        }
        object.set_static(is_static);
    }
    animated
}

fn resolve_static(
    arena: &Arena,
    assets: &HashMap<String, Asset>,
    id: ObjectId,
    marks: &mut [Mark],
) -> bool {
    let Ok(object) = arena.get(id) else {
        warn!(?id, "link to an object outside the arena");
        return true;
    };
    match marks[id.index()] {
        Mark::Done(is_static) => return is_static,
        // A cycle adds nothing the first visit does not already see.
        Mark::InProgress => return true,
        Mark::Unvisited => {}
    }
    marks[id.index()] = Mark::InProgress;

    let mut is_static = object.kind().has_static_properties();
    let mut visit = |link: ObjectId| {
        if !resolve_static(arena, assets, link, marks) {
            is_static = false;
        }
    };
    object.kind().for_each_link(&mut visit);
    if let ObjectKind::Layer(layer) = object.kind() {
        if let Some(asset) = layer.ref_id().and_then(|r| assets.get(r)) {
            asset.layers.iter().copied().for_each(&mut visit);
        }
    }

    marks[id.index()] = Mark::Done(is_static);
    is_static
}

/// A built, immutable composition.
///
/// Only shared access to the arena is handed out, so no property can be
/// promoted from static to animated once the composition is built:
///
/// ```compile_fail
/// use lottie_core::{CompositionBuilder, Fill, Object};
/// use lottie_data::CompositionConfig;
///
/// let mut builder = CompositionBuilder::new(CompositionConfig::default()).unwrap();
/// let fill = builder.alloc(Object::new(Fill::default()));
/// let comp = builder.build();
/// comp.arena().fill_mut(fill).unwrap().opacity.animation_mut();
/// ```
#[derive(Debug)]
pub struct Composition {
    config: CompositionConfig,
    arena: Arena,
    root_layer: Option<ObjectId>,
    assets: HashMap<String, Asset>,
    markers: Vec<Marker>,
    fonts: FontDb,
    stats: Stats,
}

impl Composition {
    pub fn config(&self) -> &CompositionConfig {
        &self.config
    }

    pub fn version(&self) -> &str {
        &self.config.version
    }

    pub fn size(&self) -> UVec2 {
        UVec2::new(self.config.width, self.config.height)
    }

    pub fn blend_mode(&self) -> BlendMode {
        self.config.blend_mode
    }

    pub fn timeline(&self) -> Timeline {
        Timeline::new(&self.config)
    }

    pub fn start_frame(&self) -> i32 {
        self.config.start_frame
    }

    pub fn end_frame(&self) -> i32 {
        self.config.end_frame
    }

    pub fn frame_rate(&self) -> f32 {
        self.config.frame_rate
    }

    pub fn duration(&self) -> f64 {
        self.timeline().duration()
    }

    pub fn frame_at_pos(&self, pos: f64) -> i32 {
        self.timeline().frame_at_pos(pos)
    }

    pub fn frame_at_time(&self, seconds: f64) -> i32 {
        self.timeline().frame_at_time(seconds)
    }

    pub fn total_frame(&self) -> i32 {
        self.timeline().total_frame()
    }

    pub fn frame_duration(&self) -> i32 {
        self.timeline().frame_duration()
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn root_layer_id(&self) -> Option<ObjectId> {
        self.root_layer
    }

    pub fn root_layer(&self) -> Option<&Layer> {
        self.root_layer.and_then(|id| self.arena.layer(id).ok())
    }

    pub fn asset(&self, ref_id: &str) -> Option<&Asset> {
        self.assets.get(ref_id)
    }

    pub fn assets(&self) -> impl Iterator<Item = &Asset> {
        self.assets.values()
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn font_db(&self) -> &FontDb {
        &self.fonts
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    /// Name and frame range of each direct child layer of the root.
    pub fn layer_info_list(&self) -> Vec<LayerInfo> {
        let Some(root) = self.root_layer() else {
            return Vec::new();
        };
        root.children
            .iter()
            .filter_map(|id| {
                let object = self.arena.get(*id).ok()?;
                let layer = self.arena.layer(*id).ok()?;
                Some(LayerInfo {
                    name: object.name().to_owned(),
                    in_frame: layer.in_frame,
                    out_frame: layer.out_frame,
                })
            })
            .collect()
    }

    /// The layer among `siblings` whose document id is `layer_id`, used to
    /// resolve parent links.
    pub fn find_layer(&self, siblings: &[ObjectId], layer_id: i32) -> Option<ObjectId> {
        siblings
            .iter()
            .copied()
            .find(|id| self.arena.layer(*id).is_ok_and(|l| l.id == Some(layer_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timeline(start: i32, end: i32, rate: f32) -> Timeline {
        Timeline {
            start_frame: start,
            end_frame: end,
            frame_rate: rate,
        }
    }

    #[test]
    fn timeline_conversions() {
        let t = timeline(10, 70, 30.0);
        assert_eq!(t.frame_duration(), 60);
        assert_eq!(t.total_frame(), 61);
        assert_eq!(t.duration(), 2.0);
        assert_eq!(t.frame_at_pos(0.5), 30);
        assert_eq!(t.frame_at_pos(-1.0), 0);
        assert_eq!(t.frame_at_pos(3.0), 60);
        assert_eq!(t.frame_at_time(1.0), 30);
        assert_eq!(t.frame_at_time(99.0), 60);
    }

    #[test]
    fn empty_timeline_maps_every_time_to_zero() {
        assert_eq!(timeline(5, 5, 60.0).frame_at_time(3.0), 0);
    }

    #[test]
    fn font_lookup_goes_through_the_family() {
        let db = FontDb {
            fonts: vec![FontInfo {
                name: "Sans-Bold".into(),
                family: "Sans".into(),
                style: "Bold".into(),
                ascent: 72.0,
            }],
            glyphs: vec![Glyph {
                code_point: u32::from('A'),
                family: "Sans".into(),
                size: 12.0,
                width: 8.0,
                ..Default::default()
            }],
        };
        assert!(db.load(u32::from('A'), 12, "Sans-Bold").is_some());
        assert!(db.load(u32::from('A'), 14, "Sans-Bold").is_none());
        assert!(db.load(u32::from('B'), 12, "Sans-Bold").is_none());
        assert!(db.load(u32::from('A'), 12, "Sans").is_none());
        assert!(FontDb::default().load(u32::from('A'), 12, "Sans-Bold").is_none());
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let config = CompositionConfig {
            frame_rate: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            CompositionBuilder::new(config),
            Err(ModelError::Config(_))
        ));
    }

    #[test]
    fn root_layer_must_be_a_layer() {
        let mut builder = CompositionBuilder::new(CompositionConfig::default()).unwrap();
        let group = builder.alloc(Object::new(Group::default()));
        assert!(builder.set_root_layer(group).is_err());
        let layer = builder.alloc(Object::new(Layer::new(LayerType::Precomp)));
        assert!(builder.set_root_layer(layer).is_ok());
        assert_eq!(builder.build().root_layer_id(), Some(layer));
    }
}
