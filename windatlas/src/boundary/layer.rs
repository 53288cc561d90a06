//! Named boundary polygons with a bounding-box prefilter.

use rstar::{RTree, RTreeObject, AABB};

use super::polygon::Polygon;

/// One named feature of a boundary dataset (a country or an EEZ).
#[derive(Debug, Clone)]
pub struct BoundaryFeature {
    pub name: String,
    /// Position of the feature in the source file
    pub file_order: usize,
    pub polygons: Vec<Polygon>,
}

struct PolygonBox {
    /// Feature slot in name order
    slot: usize,
    polygon: usize,
    env: AABB<[f64; 2]>,
}

impl RTreeObject for PolygonBox {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.env
    }
}

/// A boundary dataset ready for containment queries.
///
/// Features are kept in `(name, file order)` order; when several features
/// contain a point (shared borders, overlapping claims) the first in that
/// order is returned.
pub struct BoundaryLayer {
    kind: &'static str,
    features: Vec<BoundaryFeature>,
    boxes: RTree<PolygonBox>,
}

impl BoundaryLayer {
    pub fn new(kind: &'static str, mut features: Vec<BoundaryFeature>) -> Self {
        features.sort_by(|a, b| a.name.cmp(&b.name).then(a.file_order.cmp(&b.file_order)));

        let mut boxes = Vec::new();
        for (slot, feature) in features.iter().enumerate() {
            for (polygon, poly) in feature.polygons.iter().enumerate() {
                let (min, max) = poly.bounds();
                if min[0].is_finite() && max[0].is_finite() {
                    boxes.push(PolygonBox {
                        slot,
                        polygon,
                        env: AABB::from_corners(min, max),
                    });
                }
            }
        }

        Self {
            kind,
            features,
            boxes: RTree::bulk_load(boxes),
        }
    }

    /// Which dataset this is ("land" or "eez"); used in log output.
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Feature names in resolution order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.features.iter().map(|f| f.name.as_str())
    }

    /// Name of the first feature (in name order) containing the point.
    pub fn locate(&self, point: [f64; 2]) -> Option<&str> {
        let mut candidates: Vec<(usize, usize)> = self
            .boxes
            .locate_in_envelope_intersecting(&AABB::from_point(point))
            .map(|b| (b.slot, b.polygon))
            .collect();
        candidates.sort_unstable();

        candidates
            .into_iter()
            .find(|(slot, polygon)| self.features[*slot].polygons[*polygon].contains(point))
            .map(|(slot, _)| self.features[slot].name.as_str())
    }
}
