//! Geometry and styling value types.

use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in degrees.
///
/// The codec shapes the pair without range checks; use [`Coordinate::normalized`]
/// where the SDK's clamping behavior is wanted.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Coordinate {
            latitude,
            longitude,
        }
    }

    /// Clamps latitude to [-90, 90] and wraps longitude into [-180, 180).
    pub fn normalized(latitude: f64, longitude: f64) -> Self {
        let latitude = latitude.clamp(-90.0, 90.0);
        let longitude = if (-180.0..180.0).contains(&longitude) {
            longitude
        } else {
            ((longitude - 180.0) % 360.0 + 360.0) % 360.0 - 180.0
        };
        Coordinate {
            latitude,
            longitude,
        }
    }
}

/// Ordered vertex list.
pub type Path = Vec<Coordinate>;

/// Axis-aligned latitude/longitude rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub southwest: Coordinate,
    pub northeast: Coordinate,
}

impl Bounds {
    pub const fn new(southwest: Coordinate, northeast: Coordinate) -> Self {
        Bounds {
            southwest,
            northeast,
        }
    }

    /// Returns true if the bounds cross the antimeridian.
    pub fn crosses_antimeridian(&self) -> bool {
        self.southwest.longitude > self.northeast.longitude
    }

    pub fn contains(&self, point: Coordinate) -> bool {
        let lat_ok =
            self.southwest.latitude <= point.latitude && point.latitude <= self.northeast.latitude;
        lat_ok && self.contains_longitude(point.longitude)
    }

    fn contains_longitude(&self, lng: f64) -> bool {
        if self.crosses_antimeridian() {
            self.southwest.longitude <= lng || lng <= self.northeast.longitude
        } else {
            self.southwest.longitude <= lng && lng <= self.northeast.longitude
        }
    }

    /// Smallest bounds containing both `self` and `point`.
    ///
    /// Longitude is extended in whichever direction adds less width.
    pub fn including(&self, point: Coordinate) -> Bounds {
        let south = self.southwest.latitude.min(point.latitude);
        let north = self.northeast.latitude.max(point.latitude);
        let mut west = self.southwest.longitude;
        let mut east = self.northeast.longitude;
        let lng = point.longitude;
        if !self.contains_longitude(lng) {
            if westward_distance(west, lng) < eastward_distance(east, lng) {
                west = lng;
            } else {
                east = lng;
            }
        }
        Bounds::new(Coordinate::new(south, west), Coordinate::new(north, east))
    }

    pub fn center(&self) -> Coordinate {
        let lat = (self.southwest.latitude + self.northeast.latitude) / 2.0;
        let west = self.southwest.longitude;
        let mut east = self.northeast.longitude;
        if west > east {
            east += 360.0;
        }
        Coordinate::normalized(lat, (west + east) / 2.0)
    }
}

fn westward_distance(west: f64, lng: f64) -> f64 {
    (west - lng + 360.0) % 360.0
}

fn eastward_distance(east: f64, lng: f64) -> f64 {
    (lng - east + 360.0) % 360.0
}

/// Camera target plus zoom, bearing and tilt.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CameraState {
    pub target: Coordinate,
    pub zoom: f32,
    pub bearing: f32,
    pub tilt: f32,
}

impl CameraState {
    pub fn new(target: Coordinate, zoom: f32, bearing: f32, tilt: f32) -> Self {
        CameraState {
            target,
            zoom,
            bearing,
            tilt,
        }
    }
}

/// RGBA color with channels in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const CLEAR: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Color { r, g, b, a }
    }

    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color::rgba(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    /// Packs the color as a 32-bit ARGB integer.
    pub fn to_argb(&self) -> u32 {
        let byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u32;
        (byte(self.a) << 24) | (byte(self.r) << 16) | (byte(self.g) << 8) | byte(self.b)
    }

    pub fn from_argb(argb: u32) -> Self {
        Color::from_rgba8(
            ((argb >> 16) & 0xFF) as u8,
            ((argb >> 8) & 0xFF) as u8,
            (argb & 0xFF) as u8,
            ((argb >> 24) & 0xFF) as u8,
        )
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

/// A device location fix reported to the scripting layer.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Location {
    pub coordinate: Coordinate,
    /// Seconds since the Unix epoch.
    pub timestamp: i64,
    /// Metres; negative when unknown.
    pub horizontal_accuracy: f64,
    /// Metres per second; negative when unknown.
    pub speed: f32,
    /// Degrees clockwise from north; negative when unknown.
    pub course: f32,
}

impl Location {
    pub fn has_accuracy(&self) -> bool {
        self.horizontal_accuracy > 0.0
    }

    pub fn has_speed(&self) -> bool {
        self.speed >= 0.0
    }

    pub fn has_course(&self) -> bool {
        self.course >= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_clamps_and_wraps() {
        let c = Coordinate::normalized(95.0, 190.0);
        assert_eq!(c.latitude, 90.0);
        assert!((c.longitude - -170.0).abs() < 1e-9);

        let c = Coordinate::normalized(-91.0, -181.0);
        assert_eq!(c.latitude, -90.0);
        assert!((c.longitude - 179.0).abs() < 1e-9);

        let c = Coordinate::normalized(10.0, 20.0);
        assert_eq!(c, Coordinate::new(10.0, 20.0));
    }

    #[test]
    fn bounds_contains() {
        let b = Bounds::new(Coordinate::new(0.0, 0.0), Coordinate::new(10.0, 10.0));
        assert!(b.contains(Coordinate::new(5.0, 5.0)));
        assert!(b.contains(Coordinate::new(0.0, 10.0)));
        assert!(!b.contains(Coordinate::new(11.0, 5.0)));
        assert!(!b.contains(Coordinate::new(5.0, -1.0)));
    }

    #[test]
    fn bounds_across_antimeridian() {
        let b = Bounds::new(Coordinate::new(-10.0, 170.0), Coordinate::new(10.0, -170.0));
        assert!(b.crosses_antimeridian());
        assert!(b.contains(Coordinate::new(0.0, 180.0)));
        assert!(b.contains(Coordinate::new(0.0, -175.0)));
        assert!(!b.contains(Coordinate::new(0.0, 0.0)));
        let center = b.center();
        assert!((center.longitude.abs() - 180.0).abs() < 1e-9);
    }

    #[test]
    fn bounds_including() {
        let b = Bounds::new(Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 1.0));
        let grown = b.including(Coordinate::new(2.0, 3.0));
        assert_eq!(grown.southwest, Coordinate::new(0.0, 0.0));
        assert_eq!(grown.northeast, Coordinate::new(2.0, 3.0));

        let grown = b.including(Coordinate::new(-1.0, -2.0));
        assert_eq!(grown.southwest, Coordinate::new(-1.0, -2.0));
        assert_eq!(grown.northeast, Coordinate::new(1.0, 1.0));

        // Already inside: unchanged.
        assert_eq!(b.including(Coordinate::new(0.5, 0.5)), b);
    }

    #[test]
    fn color_argb() {
        let c = Color::from_rgba8(102, 225, 0, 255);
        assert_eq!(c.to_argb(), 0xFF66E100);
        assert_eq!(Color::from_argb(0xFF66E100), c);
        assert_eq!(Color::BLACK.to_argb(), 0xFF000000);
        assert_eq!(Color::CLEAR.to_argb(), 0);
    }

    #[test]
    fn default_color_is_opaque_black() {
        assert_eq!(Color::default(), Color::BLACK);
    }
}
