//! Endpoint canonicalization and the geometric predicates the engine needs
//!
//! Node identity in the network graph is always a [`NodeKey`] produced here:
//! endpoint coordinates rounded to a configured number of decimals and scaled
//! to integers, so coincident-but-jittered endpoints compare equal.

use geo::{Area, EuclideanLength, Intersects, Relate};
use geo_types::{Coord, LineString, MultiLineString, Point, Polygon};

use crate::core::{Cycle, NodeKey};

/// Round a coordinate to `precision` decimals and scale to an integer key
pub fn canonical_key(coord: Coord, precision: u32) -> NodeKey {
    let scale = 10f64.powi(precision as i32);
    NodeKey {
        x: (coord.x * scale).round() as i64,
        y: (coord.y * scale).round() as i64,
    }
}

/// First and last vertex of a line, if it has any
pub fn endpoint_coords(line: &LineString) -> Option<(Coord, Coord)> {
    let first = *line.0.first()?;
    let last = *line.0.last()?;
    Some((first, last))
}

/// Canonicalized (start, end) node keys of a segment geometry. A segment
/// whose canonical start equals its canonical end is, by definition, a
/// 1-cycle.
pub fn canonical_endpoints(line: &LineString, precision: u32) -> Option<(NodeKey, NodeKey)> {
    let (first, last) = endpoint_coords(line)?;
    Some((
        canonical_key(first, precision),
        canonical_key(last, precision),
    ))
}

/// Euclidean length of a line
pub fn line_length(line: &LineString) -> f64 {
    line.euclidean_length()
}

/// A geometry the engine must skip: fewer than two vertices, or any
/// non-finite coordinate
pub fn is_degenerate(line: &LineString) -> bool {
    line.0.len() < 2 || line.0.iter().any(|c| !c.x.is_finite() || !c.y.is_finite())
}

/// True when `line` lies entirely within the dissolved line-work
pub fn line_work_covers(line_work: &MultiLineString, line: &LineString) -> bool {
    line_work.relate(line).is_covers()
}

/// True when `line` lies within the ring polygon (interior or boundary)
pub fn ring_covers(ring: &Polygon, line: &LineString) -> bool {
    ring.relate(line).is_covers()
}

/// True when `line` passes through `point`, including mid-span contact
pub fn touches_point(line: &LineString, point: Coord) -> bool {
    line.intersects(&Point::from(point))
}

/// Orient a line so its canonical first vertex equals `start`
pub fn oriented(line: &LineString, start: NodeKey, precision: u32) -> LineString {
    let mut out = line.clone();
    if let Some((first, _)) = endpoint_coords(line)
        && canonical_key(first, precision) != start
    {
        out.0.reverse();
    }
    out
}

/// Append `next` to `base`, dropping the duplicated joint vertex
pub fn extend_line(base: &mut LineString, next: &LineString) {
    let skip_joint = match (base.0.last(), next.0.first()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    };
    let tail = if skip_joint { &next.0[1..] } else { &next.0[..] };
    base.0.extend_from_slice(tail);
}

/// The closed ring polygon enclosed by a cycle walk, or `None` when the walk
/// encloses no area (degenerate slivers, exactly overlapping parallels)
pub fn cycle_ring(cycle: &Cycle, precision: u32) -> Option<Polygon> {
    if cycle.edges.is_empty() {
        return None;
    }

    let n = cycle.nodes.len();
    let mut ring = LineString::new(Vec::new());
    for (i, edge) in cycle.edges.iter().enumerate() {
        let start = cycle.nodes[i % n];
        let chained = oriented(&edge.line, start, precision);
        if ring.0.is_empty() {
            ring.0.extend_from_slice(&chained.0);
        } else {
            extend_line(&mut ring, &chained);
        }
    }

    // Close the ring explicitly
    if let (Some(&first), Some(&last)) = (ring.0.first(), ring.0.last())
        && first != last
    {
        ring.0.push(first);
    }

    if ring.0.len() < 4 {
        return None;
    }

    let polygon = Polygon::new(ring, Vec::new());
    if polygon.unsigned_area() > 0.0 {
        Some(polygon)
    } else {
        None
    }
}
