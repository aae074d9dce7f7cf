use geo::{BoundingRect, Contains, Coord, MultiPolygon, Point, Rect};
use rstar::{AABB, RTree, RTreeObject};

/// A bounding box in an R-tree, associated with a region shape by index.
#[derive(Debug, Clone)]
struct BoundingBox {
    idx: usize,
    bbox: Rect<f64>,
}

impl RTreeObject for BoundingBox {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.bbox.min().into(), self.bbox.max().into())
    }
}

/// Point lookup over projected region shapes: R-tree on bounding boxes, then exact containment.
#[derive(Default)]
pub(super) struct HitIndex {
    rtree: RTree<BoundingBox>,
}

impl HitIndex {
    pub(super) fn new<'a>(shapes: impl IntoIterator<Item = &'a MultiPolygon<f64>>) -> Self {
        Self {
            rtree: RTree::bulk_load(
                shapes.into_iter().enumerate()
                    .filter_map(|(idx, shape)| shape.bounding_rect().map(|bbox| BoundingBox { idx, bbox }))
                    .collect()
            ),
        }
    }

    /// Index of the first shape (lowest index) containing `point`. `shape` resolves indices.
    pub(super) fn locate<'a>(&self, point: Coord<f64>, shape: impl Fn(usize) -> &'a MultiPolygon<f64>) -> Option<usize> {
        let envelope = AABB::from_point([point.x, point.y]);
        self.rtree.locate_in_envelope_intersecting(&envelope)
            .map(|candidate| candidate.idx)
            .filter(|&idx| shape(idx).contains(&Point::from(point)))
            .min()
    }
}

#[cfg(test)]
mod tests {
    use geo::polygon;

    use super::*;

    #[test]
    fn finds_containing_shape_not_just_bbox() {
        // A triangle whose bounding box covers (9, 1) but whose area does not.
        let shapes = vec![
            MultiPolygon::new(vec![polygon![(x: 0.0, y: 0.0), (x: 10.0, y: 0.0), (x: 0.0, y: 10.0)]]),
            MultiPolygon::new(vec![polygon![(x: 20.0, y: 0.0), (x: 30.0, y: 0.0), (x: 30.0, y: 10.0), (x: 20.0, y: 10.0)]]),
        ];
        let index = HitIndex::new(&shapes);

        assert_eq!(index.locate(Coord { x: 1.0, y: 1.0 }, |i| &shapes[i]), Some(0));
        assert_eq!(index.locate(Coord { x: 9.0, y: 9.0 }, |i| &shapes[i]), None);
        assert_eq!(index.locate(Coord { x: 25.0, y: 5.0 }, |i| &shapes[i]), Some(1));
        assert_eq!(index.locate(Coord { x: 15.0, y: 5.0 }, |i| &shapes[i]), None);
    }

    #[test]
    fn empty_shapes_are_never_hit() {
        let shapes = vec![MultiPolygon::new(vec![])];
        let index = HitIndex::new(&shapes);
        assert_eq!(index.locate(Coord { x: 0.0, y: 0.0 }, |i| &shapes[i]), None);
    }
}
