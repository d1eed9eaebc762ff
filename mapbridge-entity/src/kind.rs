use std::fmt;
use std::str::FromStr;

use mapbridge_core::CodecError;

/// Discriminator for the entity variants the bridge manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    Marker,
    Polygon,
    Polyline,
    Circle,
    GroundOverlay,
    TileOverlay,
}

impl EntityKind {
    pub const ALL: [EntityKind; 6] = [
        EntityKind::Marker,
        EntityKind::Polygon,
        EntityKind::Polyline,
        EntityKind::Circle,
        EntityKind::GroundOverlay,
        EntityKind::TileOverlay,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Marker => "Marker",
            EntityKind::Polygon => "Polygon",
            EntityKind::Polyline => "Polyline",
            EntityKind::Circle => "Circle",
            EntityKind::GroundOverlay => "GroundOverlay",
            EntityKind::TileOverlay => "TileOverlay",
        }
    }
}

impl FromStr for EntityKind {
    type Err = CodecError;

    /// Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityKind::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| CodecError::UnknownEntityKind(s.to_string()))
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
