use mapbridge_core::{CodecError, Mapping, MappingExt, parse_mapping, parse_sequence};
use tracing::{Span, debug, field, instrument};

use crate::cache::IdentityCache;
use crate::circle::Circle;
use crate::cluster::ClusterItem;
use crate::entity::{Entity, EntityOptions, MapEntity};
use crate::ground_overlay::GroundOverlay;
use crate::kind::EntityKind;
use crate::marker::Marker;
use crate::polygon::Polygon;
use crate::polyline::Polyline;
use crate::tile_overlay::TileOverlay;

/// Resolves the entity described by `map` and applies its fields.
///
/// An existing entity under the same kind and `id` is updated in place;
/// otherwise a new one is created. All fields are parsed before the cache is
/// touched, so a failed request leaves both the cache and any existing entity
/// unchanged.
#[instrument(skip(map, cache), fields(kind = field::Empty, id = field::Empty))]
pub fn to_entity(map: &Mapping, cache: &mut IdentityCache) -> Result<Entity, CodecError> {
    let kind: EntityKind = map.require_str("kind")?.parse()?;
    let id = map.require_str("id")?;
    Span::current()
        .record("kind", kind.as_str())
        .record("id", id);

    match kind {
        EntityKind::Marker => resolve_and_apply::<Marker>(map, id, cache),
        EntityKind::Polygon => resolve_and_apply::<Polygon>(map, id, cache),
        EntityKind::Polyline => resolve_and_apply::<Polyline>(map, id, cache),
        EntityKind::Circle => resolve_and_apply::<Circle>(map, id, cache),
        EntityKind::GroundOverlay => resolve_and_apply::<GroundOverlay>(map, id, cache),
        EntityKind::TileOverlay => resolve_and_apply::<TileOverlay>(map, id, cache),
    }
}

/// Text form of [`to_entity`].
pub fn parse_entity(text: &str, cache: &mut IdentityCache) -> Result<Entity, CodecError> {
    to_entity(&parse_mapping(text)?, cache)
}

fn resolve_and_apply<T: MapEntity>(
    map: &Mapping,
    id: &str,
    cache: &mut IdentityCache,
) -> Result<Entity, CodecError> {
    let options = T::Options::from_mapping(map)?;
    if !cache.contains(T::KIND, id) {
        if let Some(field) = options.missing_for_create() {
            return Err(CodecError::missing(field));
        }
    }
    let handle = cache.resolve_or_create_as::<T>(id);
    handle.write().apply(&options);
    debug!("applied entity fields");
    Ok(T::into_entity(handle))
}

/// Parses `text` as a sequence of marker mappings and wraps each resolved
/// marker in a [`ClusterItem`].
///
/// `kind` may be omitted; any other kind, known or not, is a `TypeMismatch`
/// at `[i].kind`.
#[instrument(skip_all)]
pub fn to_cluster_item_sequence(
    text: &str,
    cache: &mut IdentityCache,
) -> Result<Vec<ClusterItem>, CodecError> {
    let items = parse_sequence(text)?;
    let mut out = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let at = format!("[{i}]");
        let map = item
            .as_object()
            .ok_or_else(|| CodecError::mismatch(at.clone(), "mapping"))?;
        if let Some(kind) = map.opt_str("kind").map_err(|e| e.within(&at))? {
            if kind.parse::<EntityKind>().ok() != Some(EntityKind::Marker) {
                return Err(CodecError::mismatch(format!("{at}.kind"), "Marker"));
            }
        }
        let id = map.require_str("id").map_err(|e| e.within(&at))?;
        let entity = resolve_and_apply::<Marker>(map, id, cache).map_err(|e| e.within(&at))?;
        let marker = entity
            .downcast::<Marker>()
            .ok_or_else(|| CodecError::mismatch(format!("{at}.kind"), "Marker"))?;
        out.push(ClusterItem::new(marker));
    }
    debug!(count = out.len(), "resolved cluster items");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(v: serde_json::Value) -> Mapping {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn unknown_kind() {
        let mut cache = IdentityCache::new();
        let err = to_entity(&map(json!({"kind": "Balloon", "id": "b"})), &mut cache).unwrap_err();
        assert!(matches!(err, CodecError::UnknownEntityKind(ref k) if k == "Balloon"));
        assert!(cache.is_empty());
    }

    #[test]
    fn missing_discriminator_or_id() {
        let mut cache = IdentityCache::new();
        let err = to_entity(&map(json!({"id": "m"})), &mut cache).unwrap_err();
        assert!(matches!(err, CodecError::MissingField(ref f) if f == "kind"));
        let err = to_entity(&map(json!({"kind": "Marker"})), &mut cache).unwrap_err();
        assert!(matches!(err, CodecError::MissingField(ref f) if f == "id"));
    }

    #[test]
    fn create_without_geometry_inserts_nothing() {
        let mut cache = IdentityCache::new();
        let err = to_entity(&map(json!({"kind": "Circle", "id": "c", "radius": 5})), &mut cache)
            .unwrap_err();
        assert!(matches!(err, CodecError::MissingField(ref f) if f == "center"));
        assert!(cache.is_empty());
    }

    #[test]
    fn update_without_geometry_is_allowed() {
        let mut cache = IdentityCache::new();
        let created = to_entity(
            &map(json!({"kind": "Circle", "id": "c", "center": {"lat": 1, "lng": 1}})),
            &mut cache,
        )
        .unwrap();
        let updated =
            to_entity(&map(json!({"kind": "circle", "id": "c", "radius": 25})), &mut cache)
                .unwrap();
        assert!(created.ptr_eq(&updated));
        assert_eq!(created.downcast::<Circle>().unwrap().read().radius, 25.0);
    }

    #[test]
    fn failed_update_leaves_entity_untouched() {
        let mut cache = IdentityCache::new();
        let entity = to_entity(
            &map(json!({"kind": "Marker", "id": "m", "position": {"lat": 1, "lng": 1}, "title": "a"})),
            &mut cache,
        )
        .unwrap();
        let err = to_entity(
            &map(json!({"kind": "Marker", "id": "m", "title": "b", "alpha": "opaque"})),
            &mut cache,
        )
        .unwrap_err();
        assert!(matches!(err, CodecError::TypeMismatch { ref field, .. } if field == "alpha"));
        assert_eq!(entity.as_marker().unwrap().read().title, "a");
    }

    #[test]
    fn cluster_rejects_other_kinds() {
        let mut cache = IdentityCache::new();
        let text = r#"[
            {"id": "a", "position": {"lat": 0, "lng": 0}},
            {"kind": "Polygon", "id": "b", "points": []}
        ]"#;
        let err = to_cluster_item_sequence(text, &mut cache).unwrap_err();
        assert!(matches!(err, CodecError::TypeMismatch { ref field, .. } if field == "[1].kind"));

        let text = r#"[
            {"kind": "marker", "id": "a"},
            {"id": "b", "position": {"lat": 0, "lng": 0}},
            {"kind": "Balloon", "id": "c"}
        ]"#;
        let err = to_cluster_item_sequence(text, &mut cache).unwrap_err();
        assert!(matches!(err, CodecError::TypeMismatch { ref field, .. } if field == "[2].kind"));
    }

    #[test]
    fn cluster_error_paths() {
        let mut cache = IdentityCache::new();
        let err = to_cluster_item_sequence(r#"[{"position": {"lat": 0, "lng": 0}}]"#, &mut cache)
            .unwrap_err();
        assert!(matches!(err, CodecError::MissingField(ref f) if f == "[0].id"));

        let err = to_cluster_item_sequence(r#"[{"id": "a", "position": {"lat": 0}}]"#, &mut cache)
            .unwrap_err();
        assert!(matches!(err, CodecError::MissingField(ref f) if f == "[0].position.lng"));

        let err = to_cluster_item_sequence(r#"[1]"#, &mut cache).unwrap_err();
        assert!(matches!(err, CodecError::TypeMismatch { ref field, .. } if field == "[0]"));
    }
}
