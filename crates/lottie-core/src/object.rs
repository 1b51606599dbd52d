//! Scene nodes and the arena that owns them.
//!
//! Every node of a composition lives in one [`Arena`] and is addressed by an
//! [`ObjectId`]. Nodes refer to each other only through ids; the arena is the
//! sole owner and everything is dropped together with the composition.

use arrayvec::ArrayString;

use crate::error::ModelError;
use crate::gradient::{GradientFill, GradientStroke};
use crate::layer::Layer;
use crate::shapes::{Ellipse, Fill, Group, PathShape, Polystar, Rect, Repeater, RoundedCorner, Stroke};
use crate::transform::Transform;
use crate::trim::Trim;

/// Names up to this many bytes are stored without a heap allocation.
pub const INLINE_NAME_CAPACITY: usize = 14;

/// Index of a node in its composition's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u32);

impl ObjectId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectName {
    Inline(ArrayString<INLINE_NAME_CAPACITY>),
    Heap(Box<str>),
}

impl ObjectName {
    pub fn new(name: &str) -> Self {
        match ArrayString::from(name) {
            Ok(inline) => ObjectName::Inline(inline),
            Err(_) => ObjectName::Heap(name.into()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ObjectName::Inline(s) => s.as_str(),
            ObjectName::Heap(s) => s,
        }
    }

    pub fn is_inline(&self) -> bool {
        matches!(self, ObjectName::Inline(_))
    }
}

impl Default for ObjectName {
    fn default() -> Self {
        ObjectName::Inline(ArrayString::new())
    }
}

impl From<&str> for ObjectName {
    fn from(name: &str) -> Self {
        ObjectName::new(name)
    }
}

/// Declares the node variants once and derives the tag enum, the payload
/// conversions and the typed arena accessors from that list.
macro_rules! define_objects {
    ($($variant:ident($payload:ty) => $get:ident, $get_mut:ident;)*) => {
        /// Type tag of a node.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum ObjectType {
            $($variant,)*
        }

        /// Payload of a node. The variant is fixed when the node is created.
        #[derive(Debug, Clone)]
        pub enum ObjectKind {
            $($variant($payload),)*
        }

        impl ObjectKind {
            pub fn object_type(&self) -> ObjectType {
                match self {
                    $(ObjectKind::$variant(_) => ObjectType::$variant,)*
                }
            }
        }

        $(
            impl From<$payload> for ObjectKind {
                fn from(payload: $payload) -> Self {
                    ObjectKind::$variant(payload)
                }
            }
        )*

        impl Arena {
            $(
                pub fn $get(&self, id: ObjectId) -> Result<&$payload, ModelError> {
                    match &self.get(id)?.kind {
                        ObjectKind::$variant(payload) => Ok(payload),
                        other => Err(ModelError::TypeMismatch {
                            id,
                            expected: ObjectType::$variant,
                            actual: other.object_type(),
                        }),
                    }
                }

                pub fn $get_mut(&mut self, id: ObjectId) -> Result<&mut $payload, ModelError> {
                    match &mut self.get_mut(id)?.kind {
                        ObjectKind::$variant(payload) => Ok(payload),
                        other => Err(ModelError::TypeMismatch {
                            id,
                            expected: ObjectType::$variant,
                            actual: other.object_type(),
                        }),
                    }
                }
            )*
        }
    };
}

define_objects! {
    Layer(Layer) => layer, layer_mut;
    Group(Group) => group, group_mut;
    Transform(Transform) => transform, transform_mut;
    Fill(Fill) => fill, fill_mut;
    Stroke(Stroke) => stroke, stroke_mut;
    GradientFill(GradientFill) => gradient_fill, gradient_fill_mut;
    GradientStroke(GradientStroke) => gradient_stroke, gradient_stroke_mut;
    Rect(Rect) => rect, rect_mut;
    Ellipse(Ellipse) => ellipse, ellipse_mut;
    Path(PathShape) => path, path_mut;
    Polystar(Polystar) => polystar, polystar_mut;
    Trim(Trim) => trim, trim_mut;
    Repeater(Repeater) => repeater, repeater_mut;
    RoundedCorner(RoundedCorner) => rounded_corner, rounded_corner_mut;
}

impl ObjectKind {
    /// Whether the node's own properties are all constant. Containers are
    /// also static only when everything they link to is.
    pub(crate) fn has_static_properties(&self) -> bool {
        match self {
            ObjectKind::Layer(layer) => layer.has_static_properties(),
            ObjectKind::Group(_) => true,
            ObjectKind::Transform(t) => t.is_static(),
            ObjectKind::Fill(f) => f.is_static(),
            ObjectKind::Stroke(s) => s.is_static(),
            ObjectKind::GradientFill(g) => g.is_static(),
            ObjectKind::GradientStroke(g) => g.is_static(),
            ObjectKind::Rect(r) => r.is_static(),
            ObjectKind::Ellipse(e) => e.is_static(),
            ObjectKind::Path(p) => p.is_static(),
            ObjectKind::Polystar(p) => p.is_static(),
            ObjectKind::Trim(t) => t.is_static(),
            ObjectKind::Repeater(r) => r.is_static(),
            ObjectKind::RoundedCorner(r) => r.is_static(),
        }
    }

    /// Calls `f` for every node this one links to.
    pub(crate) fn for_each_link(&self, mut f: impl FnMut(ObjectId)) {
        match self {
            ObjectKind::Layer(layer) => {
                layer.children.iter().copied().for_each(&mut f);
                layer.transform.into_iter().for_each(f);
            }
            ObjectKind::Group(group) => {
                group.children.iter().copied().for_each(&mut f);
                group.transform.into_iter().for_each(f);
            }
            ObjectKind::Rect(rect) => rect.rounded_corner.into_iter().for_each(f),
            ObjectKind::Repeater(repeater) => repeater.content.into_iter().for_each(f),
            _ => {}
        }
    }

    pub(crate) fn cache(&mut self) {
        match self {
            ObjectKind::Layer(layer) => layer.cache(),
            ObjectKind::Group(_) => {}
            ObjectKind::Transform(t) => t.cache(),
            ObjectKind::Fill(f) => f.cache(),
            ObjectKind::Stroke(s) => s.cache(),
            ObjectKind::GradientFill(g) => g.cache(),
            ObjectKind::GradientStroke(g) => g.cache(),
            ObjectKind::Rect(r) => r.cache(),
            ObjectKind::Ellipse(e) => e.cache(),
            ObjectKind::Path(p) => p.cache(),
            ObjectKind::Polystar(p) => p.cache(),
            ObjectKind::Trim(t) => t.cache(),
            ObjectKind::Repeater(r) => r.cache(),
            ObjectKind::RoundedCorner(r) => r.cache(),
        }
    }
}

/// A node of the scene tree.
#[derive(Debug, Clone)]
pub struct Object {
    name: ObjectName,
    is_static: bool,
    pub hidden: bool,
    kind: ObjectKind,
}

impl Object {
    pub fn new(kind: impl Into<ObjectKind>) -> Self {
        Self {
            name: ObjectName::default(),
            is_static: true,
            hidden: false,
            kind: kind.into(),
        }
    }

    pub fn named(name: &str, kind: impl Into<ObjectKind>) -> Self {
        Self {
            name: ObjectName::new(name),
            ..Self::new(kind)
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = ObjectName::new(name);
    }

    pub fn object_name(&self) -> &ObjectName {
        &self.name
    }

    pub fn object_type(&self) -> ObjectType {
        self.kind.object_type()
    }

    pub fn kind(&self) -> &ObjectKind {
        &self.kind
    }

    /// Set when the composition is built: `true` when neither this node nor
    /// anything below it is animated.
    pub fn is_static(&self) -> bool {
        self.is_static
    }

    pub(crate) fn set_static(&mut self, is_static: bool) {
        self.is_static = is_static;
    }

    pub(crate) fn kind_mut(&mut self) -> &mut ObjectKind {
        &mut self.kind
    }
}

/// Owner of every node of one composition.
#[derive(Debug, Clone, Default)]
pub struct Arena {
    objects: Vec<Object>,
}

impl Arena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            objects: Vec::with_capacity(capacity),
        }
    }

    pub fn alloc(&mut self, object: Object) -> ObjectId {
        let id = ObjectId(self.objects.len() as u32);
        self.objects.push(object);
        id
    }

    pub fn get(&self, id: ObjectId) -> Result<&Object, ModelError> {
        self.objects
            .get(id.index())
            .ok_or(ModelError::UnknownObject(id))
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Result<&mut Object, ModelError> {
        self.objects
            .get_mut(id.index())
            .ok_or(ModelError::UnknownObject(id))
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Id of the `index`-th allocated node.
    pub fn id_at(&self, index: usize) -> Option<ObjectId> {
        (index < self.objects.len()).then(|| ObjectId(index as u32))
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &Object)> {
        self.objects
            .iter()
            .enumerate()
            .map(|(i, object)| (ObjectId(i as u32), object))
    }

    pub(crate) fn objects_mut(&mut self) -> impl Iterator<Item = &mut Object> {
        self.objects.iter_mut()
    }
}
