use mapbridge_core::{CodecError, Mapping};
use serde_json::Value;

use crate::circle::Circle;
use crate::config::EntityDefaults;
use crate::ground_overlay::GroundOverlay;
use crate::handle::Handle;
use crate::kind::EntityKind;
use crate::marker::Marker;
use crate::polygon::Polygon;
use crate::polyline::Polyline;
use crate::tile_overlay::TileOverlay;

/// A concrete entity variant.
///
/// Implementations own their styling state; the identifier is fixed at
/// creation and every other field changes only through [`MapEntity::apply`].
pub trait MapEntity: Sized + Send + Sync + 'static {
    const KIND: EntityKind;

    type Options: EntityOptions;

    /// A fresh entity carrying `defaults`, before any request fields apply.
    fn create(id: &str, defaults: &EntityDefaults) -> Self;

    fn id(&self) -> &str;

    /// Overwrites every field present in `options`; absent fields are kept.
    fn apply(&mut self, options: &Self::Options);

    /// Renders the full state as a mapping that `to_entity` accepts.
    fn to_value(&self) -> Value;

    fn into_entity(handle: Handle<Self>) -> Entity;

    fn from_entity(entity: &Entity) -> Option<Handle<Self>>;
}

/// Parsed, not yet applied, request fields for one entity kind.
pub trait EntityOptions: Sized {
    fn from_mapping(map: &Mapping) -> Result<Self, CodecError>;

    /// The geometry field a new entity cannot be created without, if these
    /// options lack it.
    fn missing_for_create(&self) -> Option<&'static str>;
}

/// A live entity of any kind.
#[derive(Debug, Clone)]
pub enum Entity {
    Marker(Handle<Marker>),
    Polygon(Handle<Polygon>),
    Polyline(Handle<Polyline>),
    Circle(Handle<Circle>),
    GroundOverlay(Handle<GroundOverlay>),
    TileOverlay(Handle<TileOverlay>),
}

macro_rules! each_entity {
    ($entity:expr, $h:ident => $body:expr) => {
        match $entity {
            Entity::Marker($h) => $body,
            Entity::Polygon($h) => $body,
            Entity::Polyline($h) => $body,
            Entity::Circle($h) => $body,
            Entity::GroundOverlay($h) => $body,
            Entity::TileOverlay($h) => $body,
        }
    };
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Marker(_) => EntityKind::Marker,
            Entity::Polygon(_) => EntityKind::Polygon,
            Entity::Polyline(_) => EntityKind::Polyline,
            Entity::Circle(_) => EntityKind::Circle,
            Entity::GroundOverlay(_) => EntityKind::GroundOverlay,
            Entity::TileOverlay(_) => EntityKind::TileOverlay,
        }
    }

    pub fn id(&self) -> String {
        each_entity!(self, h => h.read().id().to_string())
    }

    /// Identity comparison: true only for two references to one live entity.
    pub fn ptr_eq(&self, other: &Entity) -> bool {
        match (self, other) {
            (Entity::Marker(a), Entity::Marker(b)) => a.ptr_eq(b),
            (Entity::Polygon(a), Entity::Polygon(b)) => a.ptr_eq(b),
            (Entity::Polyline(a), Entity::Polyline(b)) => a.ptr_eq(b),
            (Entity::Circle(a), Entity::Circle(b)) => a.ptr_eq(b),
            (Entity::GroundOverlay(a), Entity::GroundOverlay(b)) => a.ptr_eq(b),
            (Entity::TileOverlay(a), Entity::TileOverlay(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    pub fn holders(&self) -> usize {
        each_entity!(self, h => h.holders())
    }

    pub fn to_value(&self) -> Value {
        each_entity!(self, h => h.read().to_value())
    }

    pub fn render(&self) -> String {
        self.to_value().to_string()
    }

    pub fn downcast<T: MapEntity>(&self) -> Option<Handle<T>> {
        T::from_entity(self)
    }

    pub fn as_marker(&self) -> Option<&Handle<Marker>> {
        match self {
            Entity::Marker(h) => Some(h),
            _ => None,
        }
    }
}
