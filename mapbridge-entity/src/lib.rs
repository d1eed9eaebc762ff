//! Map entities, the identity cache, and the entity half of the codec.
//!
//! A request from the scripting layer names an entity by kind and id.
//! [`to_entity`] parses the request's fields, looks the entity up in the
//! [`IdentityCache`] (creating it on first use) and applies the fields in
//! place. Entities are shared between the cache and the rendering layer
//! through [`Handle`]s; an entity lives until its last handle is dropped.

pub mod cache;
pub mod circle;
pub mod cluster;
pub mod codec;
pub mod config;
pub mod entity;
pub mod event;
pub mod ground_overlay;
pub mod handle;
pub mod kind;
pub mod marker;
pub mod polygon;
pub mod polyline;
pub mod stroke;
pub mod tile_overlay;

pub use cache::{EntityKey, IdentityCache, Release};
pub use circle::Circle;
pub use cluster::ClusterItem;
pub use codec::{parse_entity, to_cluster_item_sequence, to_entity};
pub use config::{BridgeConfig, ConfigError, EntityDefaults, load_config};
pub use entity::{Entity, EntityOptions, MapEntity};
pub use event::{CameraMoveReason, MapEvent, render_event};
pub use ground_overlay::{GroundOverlay, Placement};
pub use handle::{Handle, WeakHandle};
pub use kind::EntityKind;
pub use marker::{Marker, MarkerIcon};
pub use polygon::Polygon;
pub use polyline::Polyline;
pub use stroke::{Cap, JointType};
pub use tile_overlay::{Gradient, Heatmap, TileOverlay, WeightedCoordinate};
