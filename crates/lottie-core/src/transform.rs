use glam::{Mat4, Vec2, Vec3};

use crate::keyframes::Spatial;
use crate::property::Property;

/// Transform channels that only some documents use.
#[derive(Debug, Clone, Default)]
pub struct TransformExtra {
    pub rotation_x: Property<f32>,
    pub rotation_y: Property<f32>,
    pub rotation_z: Property<f32>,
    pub separate_x: Property<f32>,
    pub separate_y: Property<f32>,
    /// Position comes from `separate_x`/`separate_y` instead of the combined
    /// channel.
    pub separate: bool,
    /// Rotation comes from the three per-axis channels.
    pub three_d: bool,
}

impl TransformExtra {
    pub fn is_static(&self) -> bool {
        self.rotation_x.is_static()
            && self.rotation_y.is_static()
            && self.rotation_z.is_static()
            && self.separate_x.is_static()
            && self.separate_y.is_static()
    }
}

#[derive(Debug, Clone)]
pub struct TransformData {
    /// Degrees.
    pub rotation: Property<f32>,
    /// Percent per axis.
    pub scale: Property<Vec2>,
    pub position: Property<Vec2, Spatial>,
    pub anchor: Property<Vec2>,
    /// 0 to 100.
    pub opacity: Property<f32>,
    pub extra: Option<Box<TransformExtra>>,
}

impl Default for TransformData {
    fn default() -> Self {
        Self {
            rotation: Property::new(0.0),
            scale: Property::new(Vec2::splat(100.0)),
            position: Property::default(),
            anchor: Property::default(),
            opacity: Property::new(100.0),
            extra: None,
        }
    }
}

impl TransformData {
    /// The extra channels, allocated on first use.
    pub fn extra_mut(&mut self) -> &mut TransformExtra {
        self.extra.get_or_insert_with(Box::default)
    }

    pub fn is_static(&self) -> bool {
        self.rotation.is_static()
            && self.scale.is_static()
            && self.position.is_static()
            && self.anchor.is_static()
            && self.opacity.is_static()
            && self.extra.as_ref().map_or(true, |e| e.is_static())
    }

    fn position_at(&self, frame: i32) -> Vec2 {
        match &self.extra {
            Some(extra) if extra.separate => Vec2::new(
                extra.separate_x.value_at(frame),
                extra.separate_y.value_at(frame),
            ),
            _ => self.position.value_at(frame),
        }
    }

    /// Maps layer content into parent space: anchor to the origin, scale,
    /// rotate, then move to the position. With `auto_orient` the rotation also
    /// follows the direction the position is travelling in.
    pub fn matrix(&self, frame: i32, auto_orient: bool) -> Mat4 {
        let position = self.position_at(frame);
        let orient = if auto_orient {
            self.position.angle(frame)
        } else {
            0.0
        };
        let scale = self.scale.value_at(frame) / 100.0;
        let anchor = self.anchor.value_at(frame);

        let rotation = match &self.extra {
            Some(extra) if extra.three_d => {
                Mat4::from_rotation_z((extra.rotation_z.value_at(frame) + orient).to_radians())
                    * Mat4::from_rotation_y(extra.rotation_y.value_at(frame).to_radians())
                    * Mat4::from_rotation_x(extra.rotation_x.value_at(frame).to_radians())
            }
            _ => Mat4::from_rotation_z((self.rotation.value_at(frame) + orient).to_radians()),
        };

        Mat4::from_translation(position.extend(0.0))
            * rotation
            * Mat4::from_scale(Vec3::new(scale.x, scale.y, 1.0))
            * Mat4::from_translation((-anchor).extend(0.0))
    }

    /// Opacity normalised to `[0, 1]`.
    pub fn opacity(&self, frame: i32) -> f32 {
        (self.opacity.value_at(frame) / 100.0).clamp(0.0, 1.0)
    }

    pub fn cache(&mut self) {
        self.rotation.cache();
        self.scale.cache();
        self.position.cache();
        self.anchor.cache();
        self.opacity.cache();
        if let Some(extra) = &mut self.extra {
            extra.rotation_x.cache();
            extra.rotation_y.cache();
            extra.rotation_z.cache();
            extra.separate_x.cache();
            extra.separate_y.cache();
        }
    }
}

/// A transform node. Transforms with no animated channel are frozen into a
/// single matrix and opacity when the node is created.
#[derive(Debug, Clone)]
pub enum Transform {
    Static { matrix: Mat4, opacity: f32 },
    Animated(TransformData),
}

impl Default for Transform {
    fn default() -> Self {
        Transform::Static {
            matrix: Mat4::IDENTITY,
            opacity: 1.0,
        }
    }
}

impl Transform {
    pub fn new(data: TransformData) -> Self {
        if data.is_static() {
            Transform::Static {
                matrix: data.matrix(0, false),
                opacity: data.opacity(0),
            }
        } else {
            Transform::Animated(data)
        }
    }

    pub fn is_static(&self) -> bool {
        matches!(self, Transform::Static { .. })
    }

    pub fn data(&self) -> Option<&TransformData> {
        match self {
            Transform::Static { .. } => None,
            Transform::Animated(data) => Some(data),
        }
    }

    pub fn matrix(&self, frame: i32, auto_orient: bool) -> Mat4 {
        match self {
            Transform::Static { matrix, .. } => *matrix,
            Transform::Animated(data) => data.matrix(frame, auto_orient),
        }
    }

    pub fn opacity(&self, frame: i32) -> f32 {
        match self {
            Transform::Static { opacity, .. } => *opacity,
            Transform::Animated(data) => data.opacity(frame),
        }
    }

    pub fn cache(&mut self) {
        if let Transform::Animated(data) = self {
            data.cache();
        }
    }
}
