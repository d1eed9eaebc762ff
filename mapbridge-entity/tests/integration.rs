//! End-to-end flows: text request in, cached entity out, rendered state back.

use mapbridge_core::{CodecError, Coordinate, parse_mapping};
use mapbridge_entity::{
    BridgeConfig, Circle, Entity, EntityKind, GroundOverlay, IdentityCache, MapEntity, MapEvent,
    Marker, Polygon, Polyline, Release, TileOverlay, parse_entity, render_event,
    to_cluster_item_sequence, to_entity,
};

#[test]
fn marker_request_creates_then_mutates() {
    let mut cache = IdentityCache::new();

    let first = parse_entity(
        r#"{"kind":"Marker","id":"m1","position":{"lat":10.0,"lng":20.0}}"#,
        &mut cache,
    )
    .unwrap();
    let marker = first.as_marker().unwrap();
    assert_eq!(marker.read().id(), "m1");
    assert_eq!(marker.read().position, Coordinate::new(10.0, 20.0));

    let second = parse_entity(
        r#"{"kind":"Marker","id":"m1","position":{"lat":11.5,"lng":-3.0}}"#,
        &mut cache,
    )
    .unwrap();
    assert!(first.ptr_eq(&second));
    assert_eq!(marker.read().position, Coordinate::new(11.5, -3.0));
    assert_eq!(cache.len(), 1);
}

#[test]
fn malformed_request_is_rejected() {
    let mut cache = IdentityCache::new();
    let err = parse_entity(r#"{"kind":"Marker","id":"#, &mut cache).unwrap_err();
    assert!(matches!(err, CodecError::MalformedPayload(_)));

    let err = parse_entity(r#"["Marker","m1"]"#, &mut cache).unwrap_err();
    assert!(matches!(err, CodecError::TypeMismatch { ref field, .. } if field == "$"));
    assert!(cache.is_empty());
}

fn assert_roundtrip<T: MapEntity + Clone + PartialEq + std::fmt::Debug>(request: &str) {
    let mut cache = IdentityCache::new();
    let entity = parse_entity(request, &mut cache).unwrap();
    let before = entity.downcast::<T>().unwrap().read().clone();

    let rendered = parse_mapping(&entity.render()).unwrap();
    let mut fresh = IdentityCache::new();
    let copy = to_entity(&rendered, &mut fresh).unwrap();
    assert_eq!(*copy.downcast::<T>().unwrap().read(), before);
}

#[test]
fn entities_roundtrip_through_rendering() {
    assert_roundtrip::<Marker>(
        r#"{"kind":"Marker","id":"m","position":{"lat":1.25,"lng":2.5},"title":"t",
            "snippet":"s","draggable":true,"rotation":45.5,"alpha":0.8,"anchorU":0.1,
            "icon":"/a/pin.png","iconAssetName":"pin.png","iconScale":2}"#,
    );
    assert_roundtrip::<Marker>(
        r#"{"kind":"marker","id":"hue","position":{"lat":0,"lng":0},"iconHue":120.5}"#,
    );
    assert_roundtrip::<Polyline>(
        r#"{"kind":"Polyline","id":"l","points":[{"lat":0,"lng":0},{"lat":1,"lng":1}],
            "color":{"r":0.2,"g":0.4,"b":0.6,"a":0.5},"width":3.5,"geodesic":true}"#,
    );
    assert_roundtrip::<Polyline>(
        r#"{"kind":"Polyline","id":"capped","points":[{"lat":0,"lng":0}],"startCap":"square",
            "endCap":{"type":"custom","image":"/a/arrow.png","refWidth":6.5},"jointType":"round"}"#,
    );
    assert_roundtrip::<Polygon>(
        r#"{"kind":"Polygon","id":"p",
            "points":[{"lat":0,"lng":0},{"lat":0,"lng":5},{"lat":5,"lng":0}],
            "holes":[[{"lat":1,"lng":1},{"lat":1,"lng":2},{"lat":2,"lng":1}]],
            "fillColor":{"r":1,"a":0.3},"clickable":true,"strokeJointType":2}"#,
    );
    assert_roundtrip::<Circle>(
        r#"{"kind":"Circle","id":"c","center":{"lat":-1,"lng":-2},"radius":150.5,
            "strokeWidth":2,"fillColor":{"b":1,"a":0.25}}"#,
    );
    assert_roundtrip::<GroundOverlay>(
        r#"{"kind":"GroundOverlay","id":"g","image":"/a/map.png","bearing":30,
            "bounds":{"southwest":{"lat":0,"lng":0},"northeast":{"lat":1,"lng":1}}}"#,
    );
    assert_roundtrip::<GroundOverlay>(
        r#"{"kind":"GroundOverlay","id":"g2","position":{"lat":3,"lng":4},"zoomLevel":12}"#,
    );
    assert_roundtrip::<GroundOverlay>(
        r#"{"kind":"GroundOverlay","id":"g3","position":{"lat":3,"lng":4},"width":120.5}"#,
    );
    assert_roundtrip::<GroundOverlay>(
        r#"{"kind":"GroundOverlay","id":"g4","position":{"lat":3,"lng":4},"width":80,"height":40}"#,
    );
    assert_roundtrip::<TileOverlay>(
        r#"{"kind":"TileOverlay","id":"h","fadeIn":false,"tileProvider":{
            "weightedData":[{"lat":1,"lng":1,"intensity":3},{"lat":2,"lng":2}],
            "radius":25,"opacity":0.5,
            "gradient":{"colors":[{"g":1},{"r":1}],"startPoints":[0.1,0.9],"colorMapSize":256}}}"#,
    );
}

#[test]
fn same_id_different_kind_is_distinct() {
    let mut cache = IdentityCache::new();
    let marker = parse_entity(
        r#"{"kind":"Marker","id":"x","position":{"lat":0,"lng":0}}"#,
        &mut cache,
    )
    .unwrap();
    let polygon = parse_entity(r#"{"kind":"Polygon","id":"x","points":[]}"#, &mut cache).unwrap();
    assert!(!marker.ptr_eq(&polygon));
    assert_eq!(cache.len(), 2);
}

#[test]
fn cluster_items_share_cached_markers() {
    let mut cache = IdentityCache::new();
    let text = r#"[
        {"id":"a","position":{"lat":1,"lng":1},"title":"A"},
        {"kind":"Marker","id":"b","position":{"lat":2,"lng":2},"snippet":"B"}
    ]"#;
    let items = to_cluster_item_sequence(text, &mut cache).unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].key(), "a");
    assert_eq!(items[0].title(), "A");
    assert_eq!(items[1].snippet(), "B");
    assert_eq!(items[1].position(), Coordinate::new(2.0, 2.0));

    // Re-sending an id without a position reuses the cached marker.
    let again = to_cluster_item_sequence(r#"[{"id":"a","title":"A2"}]"#, &mut cache).unwrap();
    assert!(again[0].same_item(&items[0]));
    assert_eq!(items[0].title(), "A2");
    assert_eq!(cache.len(), 2);
}

#[test]
fn removal_follows_last_holder() {
    let mut cache = IdentityCache::new();
    let displayed = parse_entity(
        r#"{"kind":"Circle","id":"c","center":{"lat":0,"lng":0}}"#,
        &mut cache,
    )
    .unwrap();
    let weak = displayed.downcast::<Circle>().unwrap().downgrade();

    assert_eq!(
        cache.remove(EntityKind::Circle, "c"),
        Some(Release::Shared { holders: 1 })
    );
    assert!(!weak.is_released());
    drop(displayed);
    assert!(weak.is_released());
}

#[test]
fn configured_defaults_apply_to_new_entities() {
    let config = BridgeConfig::from_toml_str(
        r#"
        [defaults]
        polyline_width = 2.0
        heatmap_radius = 40
        "#,
    )
    .unwrap();
    let mut cache = IdentityCache::with_defaults(config.defaults);

    let line = parse_entity(r#"{"kind":"Polyline","id":"l","points":[]}"#, &mut cache).unwrap();
    assert_eq!(line.downcast::<Polyline>().unwrap().read().width, 2.0);

    let heat = parse_entity(
        r#"{"kind":"TileOverlay","id":"h","tileProvider":{"weightedData":[{"lat":0,"lng":0}]}}"#,
        &mut cache,
    )
    .unwrap();
    assert_eq!(heat.downcast::<TileOverlay>().unwrap().read().heatmap.radius, 40);
}

#[test]
fn entity_click_event_reports_state() {
    let mut cache = IdentityCache::new();
    let entity: Entity = parse_entity(
        r#"{"kind":"Polyline","id":"route","points":[{"lat":0,"lng":0}]}"#,
        &mut cache,
    )
    .unwrap();
    let text = render_event(&MapEvent::EntityClick(entity));
    let map = parse_mapping(&text).unwrap();
    assert_eq!(map["event"], "entityClick");
    assert_eq!(map["kind"], "Polyline");
    assert_eq!(map["entity"]["id"], "route");
    assert_eq!(map["entity"]["points"][0]["lat"], 0.0);
}

#[test]
fn heatmap_gradient_tolerates_bad_colors() {
    let mut cache = IdentityCache::new();
    let heat = parse_entity(
        r#"{"kind":"TileOverlay","id":"h","tileProvider":{
            "weightedData":[{"lat":0,"lng":0}],
            "gradient":{"colors":[{"g":1},"skip-me",{"r":1}],"startPoints":[0.2,0.5,1.0]}}}"#,
        &mut cache,
    )
    .unwrap();
    let overlay = heat.downcast::<TileOverlay>().unwrap();
    let overlay = overlay.read();
    assert_eq!(overlay.heatmap.gradient.colors().len(), 2);
    assert_eq!(overlay.heatmap.gradient.start_points(), &[0.2, 1.0]);
}

#[test]
fn out_of_range_float_fails_the_request() {
    let mut cache = IdentityCache::new();
    let err = parse_entity(
        r#"{"kind":"Circle","id":"c","center":{"lat":0,"lng":0},"strokeWidth":1e39}"#,
        &mut cache,
    )
    .unwrap_err();
    assert!(matches!(err, CodecError::InvalidValue { ref field, .. } if field == "strokeWidth"));
    assert!(cache.is_empty());
}
