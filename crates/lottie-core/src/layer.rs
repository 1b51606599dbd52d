use glam::{IVec2, Mat4};
use lottie_data::model::{BlendMode, Color, MatteType};

use crate::composition::{FontDb, Timeline};
use crate::object::{Arena, ObjectId};
use crate::property::Property;
use crate::shapes::Mask;
use crate::text::{TextData, TextLayerData};
use crate::transform::Transform;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayerType {
    Precomp = 0,
    Solid = 1,
    Image = 2,
    #[default]
    Null = 3,
    Shape = 4,
    Text = 5,
}

/// Layer data that only some layer types carry.
#[derive(Debug, Clone, Default)]
pub struct LayerExtra {
    pub solid_color: Color,
    /// Asset ref id of a precomp or image layer.
    pub ref_id: String,
    /// Remapped time in seconds; static means no remapping.
    pub time_remap: Property<f32>,
    pub masks: Vec<Mask>,
    pub text: Option<Box<TextLayerData>>,
}

#[derive(Debug, Clone)]
pub struct Layer {
    pub layer_type: LayerType,
    pub matte_type: MatteType,
    pub blend_mode: BlendMode,
    pub has_rounded_corner: bool,
    pub has_path_operator: bool,
    pub has_mask: bool,
    pub has_repeater: bool,
    pub has_gradient: bool,
    pub auto_orient: bool,
    pub size: IVec2,
    /// Id other layers use to name this one as their parent.
    pub id: Option<i32>,
    pub parent_id: Option<i32>,
    pub time_stretch: f32,
    pub in_frame: i32,
    pub out_frame: i32,
    pub start_frame: i32,
    pub children: Vec<ObjectId>,
    pub transform: Option<ObjectId>,
    pub extra: Option<Box<LayerExtra>>,
}

impl Default for Layer {
    fn default() -> Self {
        Self {
            layer_type: LayerType::Null,
            matte_type: MatteType::None,
            blend_mode: BlendMode::Normal,
            has_rounded_corner: false,
            has_path_operator: false,
            has_mask: false,
            has_repeater: false,
            has_gradient: false,
            auto_orient: false,
            size: IVec2::ZERO,
            id: None,
            parent_id: None,
            time_stretch: 1.0,
            in_frame: 0,
            out_frame: 0,
            start_frame: 0,
            children: Vec::new(),
            transform: None,
            extra: None,
        }
    }
}

impl Layer {
    pub fn new(layer_type: LayerType) -> Self {
        Self {
            layer_type,
            ..Default::default()
        }
    }

    /// The extra block, allocated on first use.
    pub fn extra_mut(&mut self) -> &mut LayerExtra {
        self.extra.get_or_insert_with(Box::default)
    }

    /// The text data of a text layer, allocated on first use.
    pub fn text_mut(&mut self) -> &mut TextLayerData {
        self.extra_mut().text.get_or_insert_with(Box::default)
    }

    pub fn has_parent(&self) -> bool {
        self.parent_id.is_some()
    }

    pub fn is_precomp(&self) -> bool {
        self.layer_type == LayerType::Precomp
    }

    pub fn solid_color(&self) -> Color {
        self.extra.as_ref().map_or_else(Color::default, |e| e.solid_color)
    }

    pub fn ref_id(&self) -> Option<&str> {
        self.extra
            .as_ref()
            .map(|e| e.ref_id.as_str())
            .filter(|id| !id.is_empty())
    }

    pub fn masks(&self) -> &[Mask] {
        self.extra.as_ref().map_or(&[][..], |e| e.masks.as_slice())
    }

    pub fn text(&self) -> Option<&TextLayerData> {
        self.extra.as_ref().and_then(|e| e.text.as_deref())
    }

    fn transform_node<'a>(&self, arena: &'a Arena) -> Option<&'a Transform> {
        self.transform.and_then(|id| arena.transform(id).ok())
    }

    /// Layer-to-parent matrix; identity for layers without a transform.
    pub fn matrix(&self, frame: i32, arena: &Arena) -> Mat4 {
        self.transform_node(arena)
            .map_or(Mat4::IDENTITY, |t| t.matrix(frame, self.auto_orient))
    }

    pub fn opacity(&self, frame: i32, arena: &Arena) -> f32 {
        self.transform_node(arena).map_or(1.0, |t| t.opacity(frame))
    }

    /// Maps a composition frame to this layer's local frame.
    ///
    /// Without time remapping the layer start is subtracted. A remapped layer
    /// reads its time in seconds and converts it through the composition
    /// timeline; the start offset is already part of the remap curve. Time
    /// stretch applies in both cases.
    pub fn time_remap(&self, frame: i32, timeline: &Timeline) -> i32 {
        let local = match self.extra.as_deref() {
            Some(extra) if !extra.time_remap.is_static() => {
                timeline.frame_at_time(f64::from(extra.time_remap.value_at(frame)))
            }
            _ => frame - self.start_frame,
        };
        (local as f32 / self.time_stretch) as i32
    }

    /// Text snapshot at `frame` with the ascent of the document's font.
    pub fn text_data(&self, frame: i32, fonts: &FontDb) -> Option<TextData> {
        let text = self.text()?;
        let mut data = text.get_text_data(frame);
        if let Some(font) = text.text_document(frame).and_then(|d| fonts.font(&d.font)) {
            data.ascent = font.ascent as f32;
        }
        Some(data)
    }

    /// Whether the layer's own channels are constant. The transform and the
    /// children are separate nodes.
    pub(crate) fn has_static_properties(&self) -> bool {
        let Some(extra) = self.extra.as_deref() else {
            return true;
        };
        extra.time_remap.is_static()
            && extra.masks.iter().all(Mask::is_static)
            && extra.text.as_ref().map_or(true, |t| t.is_static())
    }

    pub(crate) fn cache(&mut self) {
        if let Some(extra) = self.extra.as_deref_mut() {
            extra.time_remap.cache();
            extra.masks.iter_mut().for_each(Mask::cache);
            if let Some(text) = extra.text.as_deref_mut() {
                text.cache();
            }
        }
    }
}
