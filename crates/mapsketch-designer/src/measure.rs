//! Geodesic measurement in the working projection.
//!
//! Geometries are drawn in spherical mercator (EPSG:3857). Lengths and areas
//! are measured on the sphere: coordinates are unprojected to longitude and
//! latitude first, then measured with `geo`'s haversine and spherical area
//! algorithms. Planar mercator distances are never shown to the user; they
//! grow with latitude.

use geo::{ChamberlainDuquetteArea, Destination, Distance, Haversine, LineString, Polygon};
use mapsketch_core::{GeometryError, Point};

/// Sphere radius of the web mercator projection, in metres
pub const MERCATOR_RADIUS_M: f64 = 6_378_137.0;

/// Half the width of the square web mercator world, in metres
pub const MERCATOR_EXTENT_M: f64 = std::f64::consts::PI * MERCATOR_RADIUS_M;

/// Latitude at which web mercator becomes square
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_6;

/// Length tolerance of a rescaled segment, in metres
pub const RESCALE_TOLERANCE_M: f64 = 1e-9;

/// Doublings of the scale allowed while bracketing a target length
const MAX_BRACKET_STEPS: usize = 64;

/// Bisection steps; the interval collapses to float resolution well before this
const MAX_BISECTION_STEPS: usize = 200;

/// Project longitude/latitude degrees into the working projection
pub fn from_lon_lat(lon: f64, lat: f64) -> Point {
    let lat = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE);
    let x = MERCATOR_RADIUS_M * lon.to_radians();
    let y = MERCATOR_RADIUS_M * (std::f64::consts::FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln();
    Point::new(x, y)
}

/// Unproject a working-projection coordinate to `[longitude, latitude]` degrees
pub fn to_lon_lat(p: Point) -> [f64; 2] {
    let lon = (p.x / MERCATOR_RADIUS_M).to_degrees();
    let lat = (2.0 * (p.y / MERCATOR_RADIUS_M).exp().atan() - std::f64::consts::FRAC_PI_2)
        .to_degrees();
    [lon, lat]
}

fn geo_point(p: Point) -> geo::Point {
    let [lon, lat] = to_lon_lat(p);
    geo::Point::new(lon, lat)
}

/// Haversine distance between two `[longitude, latitude]` pairs, in metres
pub fn haversine_m(a: [f64; 2], b: [f64; 2]) -> f64 {
    Haversine.distance(geo::Point::new(a[0], a[1]), geo::Point::new(b[0], b[1]))
}

/// Great-circle length of the segment between two working-projection points
pub fn segment_length(c1: Point, c2: Point) -> f64 {
    Haversine.distance(geo_point(c1), geo_point(c2))
}

/// Sum of the segment lengths along an open chain
pub fn path_length(points: &[Point]) -> f64 {
    points
        .windows(2)
        .map(|w| segment_length(w[0], w[1]))
        .sum()
}

/// Midpoint of a segment in the working projection
pub fn midpoint(c1: Point, c2: Point) -> Point {
    Point::new((c1.x + c2.x) / 2.0, (c1.y + c2.y) / 2.0)
}

/// Screen-aligned angle of a segment in degrees, measured from +x towards +y
pub fn bearing_degrees(c1: Point, c2: Point) -> f64 {
    (c2.y - c1.y).atan2(c2.x - c1.x).to_degrees()
}

/// Spherical area enclosed by a ring, in square metres
///
/// The ring may be open or closed. Fewer than three vertices enclose nothing.
pub fn ring_area(ring: &[Point]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }

    let exterior: LineString = ring
        .iter()
        .map(|p| {
            let [lon, lat] = to_lon_lat(*p);
            (lon, lat)
        })
        .collect();
    Polygon::new(exterior, vec![]).chamberlain_duquette_unsigned_area()
}

/// Point reached by travelling `distance_m` from `origin` along a compass bearing
///
/// `bearing_deg` is clockwise from north.
pub fn destination(origin: Point, bearing_deg: f64, distance_m: f64) -> Point {
    let p = Haversine.destination(geo_point(origin), bearing_deg, distance_m);
    from_lon_lat(p.x(), p.y())
}

/// Largest scale keeping `c1 + (c2 - c1) * scale` inside the mercator square
///
/// Never below 1: the drawn vertex itself is always reachable.
fn ray_limit(c1: Point, c2: Point) -> f64 {
    let axis = |origin: f64, delta: f64| {
        if delta > 0.0 {
            (MERCATOR_EXTENT_M - origin) / delta
        } else if delta < 0.0 {
            (-MERCATOR_EXTENT_M - origin) / delta
        } else {
            f64::INFINITY
        }
    };
    axis(c1.x, c2.x - c1.x)
        .min(axis(c1.y, c2.y - c1.y))
        .max(1.0)
}

/// Move the far vertex of a segment so the segment measures `target_m`
///
/// The vertex slides along the projected ray from `c1` through `c2`:
/// `c2' = c1 + (c2 - c1) * scale`, with the ray clipped to the mercator
/// square. Great-circle length is not linear in `scale`, so the scale is
/// bracketed from the linear estimate and then bisected until the measured
/// length is within tolerance of the target.
///
/// Segments shorter than `min_segment_m` have no direction to scale along and
/// are rejected, as are targets that are not finite and positive. Targets
/// longer than anything the clipped ray reaches fail with
/// [`GeometryError::UnreachableLength`].
pub fn rescale_segment(
    c1: Point,
    c2: Point,
    target_m: f64,
    min_segment_m: f64,
) -> Result<Point, GeometryError> {
    if !target_m.is_finite() || target_m <= 0.0 {
        return Err(GeometryError::InvalidLength { value: target_m });
    }

    let current = segment_length(c1, c2);
    if !current.is_finite() || current < min_segment_m {
        return Err(GeometryError::DegenerateSegment {
            length_m: current,
            min_m: min_segment_m,
        });
    }

    if (current - target_m).abs() <= RESCALE_TOLERANCE_M {
        return Ok(c2);
    }

    let along = |scale: f64| Point::new(c1.x + (c2.x - c1.x) * scale, c1.y + (c2.y - c1.y) * scale);
    let length_at = |scale: f64| segment_length(c1, along(scale));
    let limit = ray_limit(c1, c2);

    // Invariant: length_at(lo) < target_m <= length_at(hi)
    let (mut lo, mut lo_len) = (0.0, 0.0);
    let mut hi = (target_m / current).min(limit);
    let mut hi_len = length_at(hi);
    let mut steps = 0;
    while hi_len < target_m {
        if hi >= limit || hi_len <= lo_len || steps == MAX_BRACKET_STEPS {
            return Err(GeometryError::UnreachableLength {
                target_m,
                max_m: hi_len.max(lo_len),
            });
        }
        lo = hi;
        lo_len = hi_len;
        hi = (hi * 2.0).min(limit);
        hi_len = length_at(hi);
        steps += 1;
    }

    let tolerance = RESCALE_TOLERANCE_M.max(target_m * 4.0 * f64::EPSILON);
    let (mut best, mut best_err) = (hi, hi_len - target_m);
    for _ in 0..MAX_BISECTION_STEPS {
        if best_err.abs() <= tolerance {
            break;
        }
        let mid = lo + (hi - lo) / 2.0;
        if mid <= lo || mid >= hi {
            break;
        }
        let err = length_at(mid) - target_m;
        if err < 0.0 {
            lo = mid;
        } else {
            hi = mid;
        }
        if err.abs() < best_err.abs() {
            best = mid;
            best_err = err;
        }
    }

    let candidate = along(best);
    if !candidate.is_finite() {
        return Err(GeometryError::NonFinite {
            x: candidate.x,
            y: candidate.y,
        });
    }
    Ok(candidate)
}

/// Pointer readout as `"lon, lat"` with five decimals
pub fn format_coordinate(p: Point) -> String {
    let [lon, lat] = to_lon_lat(p);
    format!("{:.5}, {:.5}", lon, lat)
}
