//! Outbound events reported by the map view to the scripting layer.

use mapbridge_core::codec::{camera_state_to_value, coordinate_to_value, location_to_value};
use mapbridge_core::{CameraState, Coordinate, Location};
use serde_json::{Value, json};

use crate::entity::Entity;

/// Why the camera started moving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMoveReason {
    Gesture,
    ApiAnimation,
    DeveloperAnimation,
}

impl CameraMoveReason {
    /// Maps the SDK's numeric reason code.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(CameraMoveReason::Gesture),
            2 => Some(CameraMoveReason::ApiAnimation),
            3 => Some(CameraMoveReason::DeveloperAnimation),
            _ => None,
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            CameraMoveReason::Gesture => 1,
            CameraMoveReason::ApiAnimation => 2,
            CameraMoveReason::DeveloperAnimation => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CameraMoveReason::Gesture => "gesture",
            CameraMoveReason::ApiAnimation => "apiAnimation",
            CameraMoveReason::DeveloperAnimation => "developerAnimation",
        }
    }
}

#[derive(Debug, Clone)]
pub enum MapEvent {
    MapClick(Coordinate),
    MapLongClick(Coordinate),
    CameraMoveStarted(CameraMoveReason),
    CameraIdle(CameraState),
    /// Click on any entity; the rendered state is captured when the event is
    /// rendered, not when it is constructed.
    EntityClick(Entity),
    InfoWindowClick { marker_id: String },
    LocationUpdate(Location),
}

impl MapEvent {
    pub fn name(&self) -> &'static str {
        match self {
            MapEvent::MapClick(_) => "mapClick",
            MapEvent::MapLongClick(_) => "mapLongClick",
            MapEvent::CameraMoveStarted(_) => "cameraMoveStarted",
            MapEvent::CameraIdle(_) => "cameraIdle",
            MapEvent::EntityClick(_) => "entityClick",
            MapEvent::InfoWindowClick { .. } => "infoWindowClick",
            MapEvent::LocationUpdate(_) => "locationUpdate",
        }
    }

    pub fn to_value(&self) -> Value {
        let name = self.name();
        match self {
            MapEvent::MapClick(point) | MapEvent::MapLongClick(point) => json!({
                "event": name,
                "point": coordinate_to_value(point),
            }),
            MapEvent::CameraMoveStarted(reason) => json!({
                "event": name,
                "reason": reason.as_str(),
                "reasonCode": reason.code(),
            }),
            MapEvent::CameraIdle(camera) => json!({
                "event": name,
                "camera": camera_state_to_value(camera),
            }),
            MapEvent::EntityClick(entity) => json!({
                "event": name,
                "kind": entity.kind().as_str(),
                "entity": entity.to_value(),
            }),
            MapEvent::InfoWindowClick { marker_id } => json!({
                "event": name,
                "id": marker_id,
            }),
            MapEvent::LocationUpdate(location) => json!({
                "event": name,
                "location": location_to_value(location),
            }),
        }
    }
}

pub fn render_event(event: &MapEvent) -> String {
    event.to_value().to_string()
}
