//! Planar polygons with holes and point containment.

/// A ring of `(lon, lat)` vertices. The closing vertex may be repeated.
pub type Ring = Vec<[f64; 2]>;

/// A polygon: one exterior ring and any number of holes.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    exterior: Ring,
    holes: Vec<Ring>,
}

impl Polygon {
    pub fn new(exterior: Ring, holes: Vec<Ring>) -> Self {
        Self { exterior, holes }
    }

    /// Bounding box as `(min, max)` corners.
    pub fn bounds(&self) -> ([f64; 2], [f64; 2]) {
        let mut min = [f64::INFINITY, f64::INFINITY];
        let mut max = [f64::NEG_INFINITY, f64::NEG_INFINITY];
        for v in &self.exterior {
            min[0] = min[0].min(v[0]);
            min[1] = min[1].min(v[1]);
            max[0] = max[0].max(v[0]);
            max[1] = max[1].max(v[1]);
        }
        (min, max)
    }

    /// True if the point is inside or on the boundary.
    ///
    /// Points on a hole's edge lie on the polygon boundary and count as
    /// contained.
    pub fn contains(&self, point: [f64; 2]) -> bool {
        if on_ring(&self.exterior, point) {
            return true;
        }
        if !inside_ring(&self.exterior, point) {
            return false;
        }
        for hole in &self.holes {
            if on_ring(hole, point) {
                return true;
            }
            if inside_ring(hole, point) {
                return false;
            }
        }
        true
    }
}

fn edges(ring: &Ring) -> impl Iterator<Item = ([f64; 2], [f64; 2])> + '_ {
    let n = ring.len();
    (0..n).map(move |i| (ring[i], ring[(i + 1) % n]))
}

/// Even-odd ray cast towards +x.
fn inside_ring(ring: &Ring, p: [f64; 2]) -> bool {
    let mut inside = false;
    for (a, b) in edges(ring) {
        if (a[1] > p[1]) != (b[1] > p[1]) {
            let x = a[0] + (p[1] - a[1]) * (b[0] - a[0]) / (b[1] - a[1]);
            if p[0] < x {
                inside = !inside;
            }
        }
    }
    inside
}

fn on_ring(ring: &Ring, p: [f64; 2]) -> bool {
    edges(ring).any(|(a, b)| on_segment(a, b, p))
}

fn on_segment(a: [f64; 2], b: [f64; 2], p: [f64; 2]) -> bool {
    let cross = (b[0] - a[0]) * (p[1] - a[1]) - (b[1] - a[1]) * (p[0] - a[0]);
    let scale = (b[0] - a[0]).abs().max((b[1] - a[1]).abs()).max(1.0);
    if cross.abs() > 1e-12 * scale {
        return false;
    }
    p[0] >= a[0].min(b[0])
        && p[0] <= a[0].max(b[0])
        && p[1] >= a[1].min(b[1])
        && p[1] <= a[1].max(b[1])
}
