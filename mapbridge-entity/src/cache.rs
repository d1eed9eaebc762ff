use indexmap::IndexMap;
use tracing::debug;

use crate::circle::Circle;
use crate::config::EntityDefaults;
use crate::entity::{Entity, MapEntity};
use crate::ground_overlay::GroundOverlay;
use crate::handle::Handle;
use crate::kind::EntityKind;
use crate::marker::Marker;
use crate::polygon::Polygon;
use crate::polyline::Polyline;
use crate::tile_overlay::TileOverlay;

/// Cache key: identifiers are unique per kind, not globally.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityKey {
    pub kind: EntityKind,
    pub id: String,
}

impl EntityKey {
    pub fn new(kind: EntityKind, id: impl Into<String>) -> Self {
        EntityKey {
            kind,
            id: id.into(),
        }
    }
}

/// What happened to an entity when the cache let go of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Release {
    /// The cache held the last reference; the entity is gone.
    Dropped,
    /// Other holders (usually the rendering layer) keep it alive.
    Shared { holders: usize },
}

/// Keyed store of live entities, one per (kind, identifier).
///
/// Responsibilities:
/// - Identity: repeated lookups of a key return the same entity
/// - Construction: missing entities are built from the configured defaults
///
/// The cache is one holder among several; removing an entry drops only the
/// cache's reference. Mutation goes through `&mut self`, so two lookups of the
/// same key can never race to create two entities.
#[derive(Debug)]
pub struct IdentityCache {
    entries: IndexMap<EntityKey, Entity>,
    defaults: EntityDefaults,
}

impl IdentityCache {
    pub fn new() -> Self {
        Self::with_defaults(EntityDefaults::default())
    }

    pub fn with_defaults(defaults: EntityDefaults) -> Self {
        IdentityCache {
            entries: IndexMap::new(),
            defaults,
        }
    }

    pub fn defaults(&self) -> &EntityDefaults {
        &self.defaults
    }

    /// Returns the entity stored under (`kind`, `id`), creating it first if
    /// absent.
    pub fn resolve_or_create(&mut self, kind: EntityKind, id: &str) -> Entity {
        match kind {
            EntityKind::Marker => Entity::Marker(self.resolve_or_create_as::<Marker>(id)),
            EntityKind::Polygon => Entity::Polygon(self.resolve_or_create_as::<Polygon>(id)),
            EntityKind::Polyline => Entity::Polyline(self.resolve_or_create_as::<Polyline>(id)),
            EntityKind::Circle => Entity::Circle(self.resolve_or_create_as::<Circle>(id)),
            EntityKind::GroundOverlay => {
                Entity::GroundOverlay(self.resolve_or_create_as::<GroundOverlay>(id))
            }
            EntityKind::TileOverlay => {
                Entity::TileOverlay(self.resolve_or_create_as::<TileOverlay>(id))
            }
        }
    }

    /// Typed form of [`resolve_or_create`](Self::resolve_or_create).
    pub fn resolve_or_create_as<T: MapEntity>(&mut self, id: &str) -> Handle<T> {
        let key = EntityKey::new(T::KIND, id);

        if let Some(existing) = self.entries.get(&key) {
            if let Some(handle) = T::from_entity(existing) {
                debug!(kind = %T::KIND, id, "reusing cached entity");
                return handle;
            }
            // Variant mismatch under a kind key cannot come from this API;
            // replace the entry.
        }

        let handle = Handle::new(T::create(id, &self.defaults));
        self.entries.insert(key, T::into_entity(handle.clone()));
        debug!(kind = %T::KIND, id, "created entity");
        handle
    }

    pub fn get(&self, kind: EntityKind, id: &str) -> Option<Entity> {
        self.entries.get(&EntityKey::new(kind, id)).cloned()
    }

    pub fn get_as<T: MapEntity>(&self, id: &str) -> Option<Handle<T>> {
        self.entries
            .get(&EntityKey::new(T::KIND, id))
            .and_then(T::from_entity)
    }

    pub fn contains(&self, kind: EntityKind, id: &str) -> bool {
        self.entries.contains_key(&EntityKey::new(kind, id))
    }

    /// Drops the cache's reference to (`kind`, `id`).
    ///
    /// Returns `None` if nothing was cached under that key.
    pub fn remove(&mut self, kind: EntityKind, id: &str) -> Option<Release> {
        let entity = self.entries.shift_remove(&EntityKey::new(kind, id))?;
        let others = entity.holders() - 1;
        drop(entity);
        let release = if others == 0 {
            Release::Dropped
        } else {
            Release::Shared { holders: others }
        };
        debug!(%kind, id, ?release, "removed entity");
        Some(release)
    }

    /// Releases every cached entity; used when the map view is torn down.
    pub fn clear(&mut self) {
        let count = self.entries.len();
        self.entries.clear();
        debug!(count, "cleared identity cache");
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cached entities in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&EntityKey, &Entity)> {
        self.entries.iter()
    }
}

impl Default for IdentityCache {
    fn default() -> Self {
        Self::new()
    }
}
