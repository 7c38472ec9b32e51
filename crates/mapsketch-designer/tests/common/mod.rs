use mapsketch_core::{DrawTool, Point};
use mapsketch_designer::{measure, MapSession};
use mapsketch_settings::Config;

pub fn map() -> MapSession {
    MapSession::new(&Config::default()).unwrap()
}

pub fn origin() -> Point {
    measure::from_lon_lat(0.0, 0.0)
}

pub fn north_of(p: Point, distance_m: f64) -> Point {
    measure::destination(p, 0.0, distance_m)
}

pub fn east_of(p: Point, distance_m: f64) -> Point {
    measure::destination(p, 90.0, distance_m)
}

/// Draw `points` with `tool` without finishing
pub fn sketch(map: &mut MapSession, tool: DrawTool, points: &[Point]) {
    map.select_tool(tool);
    for p in points {
        map.click(*p).unwrap();
    }
}
