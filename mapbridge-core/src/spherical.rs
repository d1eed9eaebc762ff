//! Great-circle helpers on a spherical earth.
//!
//! Angles in and out are degrees; distances and areas are metres and square
//! metres.

use crate::geometry::Coordinate;

pub const EARTH_RADIUS: f64 = 6_371_009.0;

fn wrap(n: f64, min: f64, max: f64) -> f64 {
    if n >= min && n < max {
        n
    } else {
        ((n - min) % (max - min) + (max - min)) % (max - min) + min
    }
}

fn hav(x: f64) -> f64 {
    let s = (x * 0.5).sin();
    s * s
}

fn arc_hav(x: f64) -> f64 {
    2.0 * x.sqrt().asin()
}

fn hav_distance(lat1: f64, lat2: f64, d_lng: f64) -> f64 {
    hav(lat1 - lat2) + hav(d_lng) * lat1.cos() * lat2.cos()
}

fn distance_radians(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    arc_hav(hav_distance(lat1, lat2, lng1 - lng2))
}

fn radians(c: &Coordinate) -> (f64, f64) {
    (c.latitude.to_radians(), c.longitude.to_radians())
}

/// Heading from `from` to `to`, degrees clockwise from north in [-180, 180).
pub fn compute_heading(from: Coordinate, to: Coordinate) -> f64 {
    let (from_lat, from_lng) = radians(&from);
    let (to_lat, to_lng) = radians(&to);
    let d_lng = to_lng - from_lng;
    let heading = (d_lng.sin() * to_lat.cos()).atan2(
        from_lat.cos() * to_lat.sin() - from_lat.sin() * to_lat.cos() * d_lng.cos(),
    );
    wrap(heading.to_degrees(), -180.0, 180.0)
}

/// Point reached by travelling `distance` metres from `from` along `heading`.
pub fn compute_offset(from: Coordinate, distance: f64, heading: f64) -> Coordinate {
    let distance = distance / EARTH_RADIUS;
    let heading = heading.to_radians();
    let (from_lat, from_lng) = radians(&from);
    let cos_distance = distance.cos();
    let sin_distance = distance.sin();
    let sin_from_lat = from_lat.sin();
    let cos_from_lat = from_lat.cos();
    let sin_lat = cos_distance * sin_from_lat + sin_distance * cos_from_lat * heading.cos();
    let d_lng = (sin_distance * cos_from_lat * heading.sin())
        .atan2(cos_distance - sin_from_lat * sin_lat);
    Coordinate::new(sin_lat.asin().to_degrees(), (from_lng + d_lng).to_degrees())
}

/// Inverse of [`compute_offset`]: the origin from which travelling `distance`
/// metres along `heading` arrives at `to`. `None` when no such point exists.
pub fn compute_offset_origin(to: Coordinate, distance: f64, heading: f64) -> Option<Coordinate> {
    let heading = heading.to_radians();
    let distance = distance / EARTH_RADIUS;
    let n1 = distance.cos();
    let n2 = distance.sin() * heading.cos();
    let n3 = distance.sin() * heading.sin();
    let n4 = to.latitude.to_radians().sin();
    let n12 = n1 * n1;
    let discriminant = n2 * n2 * n12 + n12 * n12 - n12 * n4 * n4;
    if discriminant < 0.0 {
        return None;
    }
    let mut b = n2 * n4 + discriminant.sqrt();
    b /= n1 * n1 + n2 * n2;
    let a = (n4 - n2 * b) / n1;
    let mut from_lat_radians = a.atan2(b);
    if !(-std::f64::consts::FRAC_PI_2..=std::f64::consts::FRAC_PI_2).contains(&from_lat_radians) {
        b = n2 * n4 - discriminant.sqrt();
        b /= n1 * n1 + n2 * n2;
        from_lat_radians = a.atan2(b);
    }
    if !(-std::f64::consts::FRAC_PI_2..=std::f64::consts::FRAC_PI_2).contains(&from_lat_radians) {
        return None;
    }
    let from_lng_radians = to.longitude.to_radians()
        - n3.atan2(n1 * from_lat_radians.cos() - n2 * from_lat_radians.sin());
    Some(Coordinate::new(
        from_lat_radians.to_degrees(),
        from_lng_radians.to_degrees(),
    ))
}

/// Point at `fraction` of the way along the great circle from `from` to `to`.
pub fn interpolate(from: Coordinate, to: Coordinate, fraction: f64) -> Coordinate {
    let (from_lat, from_lng) = radians(&from);
    let (to_lat, to_lng) = radians(&to);
    let cos_from_lat = from_lat.cos();
    let cos_to_lat = to_lat.cos();

    let angle = distance_radians(from_lat, from_lng, to_lat, to_lng);
    let sin_angle = angle.sin();
    if sin_angle < 1e-6 {
        return Coordinate::new(
            from.latitude + fraction * (to.latitude - from.latitude),
            from.longitude + fraction * (to.longitude - from.longitude),
        );
    }
    let a = ((1.0 - fraction) * angle).sin() / sin_angle;
    let b = (fraction * angle).sin() / sin_angle;

    let x = a * cos_from_lat * from_lng.cos() + b * cos_to_lat * to_lng.cos();
    let y = a * cos_from_lat * from_lng.sin() + b * cos_to_lat * to_lng.sin();
    let z = a * from_lat.sin() + b * to_lat.sin();

    let lat = z.atan2((x * x + y * y).sqrt());
    let lng = y.atan2(x);
    Coordinate::new(lat.to_degrees(), lng.to_degrees())
}

pub fn compute_distance_between(from: Coordinate, to: Coordinate) -> f64 {
    let (lat1, lng1) = radians(&from);
    let (lat2, lng2) = radians(&to);
    distance_radians(lat1, lng1, lat2, lng2) * EARTH_RADIUS
}

/// Length of an open path.
pub fn compute_length(path: &[Coordinate]) -> f64 {
    path.windows(2)
        .map(|w| compute_distance_between(w[0], w[1]))
        .sum()
}

/// Area enclosed by a closed path.
pub fn compute_area(path: &[Coordinate]) -> f64 {
    compute_signed_area(path).abs()
}

/// Signed area of a closed path; counter-clockwise is positive.
pub fn compute_signed_area(path: &[Coordinate]) -> f64 {
    signed_area_on_radius(path, EARTH_RADIUS)
}

fn signed_area_on_radius(path: &[Coordinate], radius: f64) -> f64 {
    let Some(last) = path.last() else {
        return 0.0;
    };
    if path.len() < 3 {
        return 0.0;
    }
    let mut total = 0.0;
    let mut prev_tan_lat = ((std::f64::consts::FRAC_PI_2 - last.latitude.to_radians()) / 2.0).tan();
    let mut prev_lng = last.longitude.to_radians();
    for point in path {
        let tan_lat = ((std::f64::consts::FRAC_PI_2 - point.latitude.to_radians()) / 2.0).tan();
        let lng = point.longitude.to_radians();
        total += polar_triangle_area(tan_lat, lng, prev_tan_lat, prev_lng);
        prev_tan_lat = tan_lat;
        prev_lng = lng;
    }
    total * radius * radius
}

fn polar_triangle_area(tan1: f64, lng1: f64, tan2: f64, lng2: f64) -> f64 {
    let delta_lng = lng1 - lng2;
    let t = tan1 * tan2;
    2.0 * (t * delta_lng.sin()).atan2(1.0 + t * delta_lng.cos())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-6;

    fn near(a: Coordinate, b: Coordinate) -> bool {
        (a.latitude - b.latitude).abs() < EPS && (a.longitude - b.longitude).abs() < EPS
    }

    #[test]
    fn heading_cardinal() {
        let origin = Coordinate::new(0.0, 0.0);
        assert!((compute_heading(origin, Coordinate::new(10.0, 0.0))).abs() < EPS);
        assert!((compute_heading(origin, Coordinate::new(0.0, 10.0)) - 90.0).abs() < EPS);
        assert!((compute_heading(origin, Coordinate::new(-10.0, 0.0)) + 180.0).abs() < EPS);
        assert!((compute_heading(origin, Coordinate::new(0.0, -10.0)) + 90.0).abs() < EPS);
    }

    #[test]
    fn quarter_meridian() {
        let quarter = std::f64::consts::PI * EARTH_RADIUS / 2.0;
        let d = compute_distance_between(Coordinate::new(0.0, 0.0), Coordinate::new(90.0, 0.0));
        assert!((d - quarter).abs() < 1e-3);

        let north = compute_offset(Coordinate::new(0.0, 0.0), quarter, 0.0);
        assert!((north.latitude - 90.0).abs() < EPS);
    }

    #[test]
    fn offset_origin_inverts_offset() {
        let from = Coordinate::new(10.0, 20.0);
        let to = compute_offset(from, 50_000.0, 45.0);
        let origin = compute_offset_origin(to, 50_000.0, 45.0).unwrap();
        assert!(near(origin, from));
    }

    #[test]
    fn interpolate_endpoints_and_midpoint() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(0.0, 90.0);
        assert!(near(interpolate(a, b, 0.0), a));
        assert!(near(interpolate(a, b, 1.0), b));
        assert!(near(interpolate(a, b, 0.5), Coordinate::new(0.0, 45.0)));
        // Identical points fall back to linear interpolation.
        assert!(near(interpolate(a, a, 0.3), a));
    }

    #[test]
    fn length_sums_segments() {
        let path = [
            Coordinate::new(0.0, 0.0),
            Coordinate::new(0.0, 1.0),
            Coordinate::new(0.0, 2.0),
        ];
        let direct = compute_distance_between(path[0], path[2]);
        assert!((compute_length(&path) - direct).abs() < 1e-6);
        assert_eq!(compute_length(&path[..1]), 0.0);
    }

    #[test]
    fn signed_area_orientation() {
        // One octant of the sphere, counter-clockwise seen from outside.
        let ccw = [
            Coordinate::new(0.0, 0.0),
            Coordinate::new(0.0, 90.0),
            Coordinate::new(90.0, 0.0),
        ];
        let octant = 4.0 * std::f64::consts::PI * EARTH_RADIUS * EARTH_RADIUS / 8.0;
        let signed = compute_signed_area(&ccw);
        assert!((signed - octant).abs() / octant < 1e-9);

        let mut cw = ccw;
        cw.reverse();
        assert!((compute_signed_area(&cw) + octant).abs() / octant < 1e-9);
        assert!((compute_area(&cw) - octant).abs() / octant < 1e-9);
    }

    #[test]
    fn degenerate_area() {
        assert_eq!(compute_area(&[]), 0.0);
        assert_eq!(
            compute_area(&[Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 1.0)]),
            0.0
        );
    }
}
