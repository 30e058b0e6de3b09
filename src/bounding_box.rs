use crate::block_position::BlockPosition;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Axis-aligned integer box, inclusive on all six faces.
///
/// The default box is "empty": its minimums sit at `i32::MAX` and its maximums at
/// `i32::MIN`, so it contains nothing and is the identity for [`BoundingBox::union`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: (i32, i32, i32),
    pub max: (i32, i32, i32),
}

impl Default for BoundingBox {
    fn default() -> Self {
        BoundingBox {
            min: (i32::MAX, i32::MAX, i32::MAX),
            max: (i32::MIN, i32::MIN, i32::MIN),
        }
    }
}

impl BoundingBox {
    pub fn new(min: (i32, i32, i32), max: (i32, i32, i32)) -> Self {
        BoundingBox { min, max }
    }

    /// Box spanning two arbitrary corners, normalized so `min <= max`.
    pub fn from_corners(a: BlockPosition, b: BlockPosition) -> Self {
        BoundingBox {
            min: (a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: (a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.min.0 > self.max.0 || self.min.1 > self.max.1 || self.min.2 > self.max.2
    }

    pub fn contains(&self, pos: BlockPosition) -> bool {
        self.contains_xyz(pos.x, pos.y, pos.z)
    }

    pub fn contains_xyz(&self, x: i32, y: i32, z: i32) -> bool {
        x >= self.min.0
            && x <= self.max.0
            && y >= self.min.1
            && y <= self.max.1
            && z >= self.min.2
            && z <= self.max.2
    }

    /// Smallest box enclosing both `self` and `other`.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min: (
                self.min.0.min(other.min.0),
                self.min.1.min(other.min.1),
                self.min.2.min(other.min.2),
            ),
            max: (
                self.max.0.max(other.max.0),
                self.max.1.max(other.max.1),
                self.max.2.max(other.max.2),
            ),
        }
    }

    /// Grows the box by the given deltas on both sides of each axis.
    /// Negative deltas shrink it.
    pub fn adjust_size(&mut self, dx: i32, dy: i32, dz: i32) {
        self.min.0 = self.min.0.saturating_sub(dx);
        self.min.1 = self.min.1.saturating_sub(dy);
        self.min.2 = self.min.2.saturating_sub(dz);
        self.max.0 = self.max.0.saturating_add(dx);
        self.max.1 = self.max.1.saturating_add(dy);
        self.max.2 = self.max.2.saturating_add(dz);
    }

    /// Extent along each axis in blocks. Spans are computed in `i64`, so a box
    /// covering the whole `i32` range does not overflow.
    pub fn dimensions(&self) -> (u64, u64, u64) {
        if self.is_empty() {
            return (0, 0, 0);
        }
        let span = |min: i32, max: i32| (max as i64 - min as i64 + 1) as u64;
        (
            span(self.min.0, self.max.0),
            span(self.min.1, self.max.1),
            span(self.min.2, self.max.2),
        )
    }

    /// Number of blocks inside the box, saturating at `u64::MAX`.
    pub fn volume(&self) -> u64 {
        let (w, h, l) = self.dimensions();
        w.saturating_mul(h).saturating_mul(l)
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Bound{{minX={}, minY={}, minZ={}, maxX={}, maxY={}, maxZ={}}}",
            self.min.0, self.min.1, self.min.2, self.max.0, self.max.1, self.max.2
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bb(min: (i32, i32, i32), max: (i32, i32, i32)) -> BoundingBox {
        BoundingBox::new(min, max)
    }

    #[test]
    fn test_contains_is_inclusive() {
        let b = bb((0, 0, 0), (15, 255, 15));
        assert!(b.contains(BlockPosition::new(0, 0, 0)));
        assert!(b.contains(BlockPosition::new(15, 255, 15)));
        assert!(b.contains(BlockPosition::new(3, 10, 3)));
        assert!(!b.contains(BlockPosition::new(16, 10, 3)));
        assert!(!b.contains(BlockPosition::new(3, -1, 3)));
    }

    #[test]
    fn test_empty_is_union_identity() {
        let b = bb((-4, 2, 9), (10, 20, 30));
        assert!(BoundingBox::empty().is_empty());
        assert_eq!(BoundingBox::empty().union(&b), b);
        assert_eq!(b.union(&BoundingBox::empty()), b);
        assert!(!BoundingBox::empty().contains(BlockPosition::new(0, 0, 0)));
    }

    #[test]
    fn test_union_encloses_both() {
        let a = bb((0, 0, 0), (5, 5, 5));
        let b = bb((10, -3, 2), (12, 1, 8));
        let u = a.union(&b);
        assert_eq!(u, bb((0, -3, 0), (12, 5, 8)));
        assert_eq!(u, b.union(&a));

        for pos in [
            BlockPosition::new(0, 0, 0),
            BlockPosition::new(5, 5, 5),
            BlockPosition::new(10, -3, 2),
            BlockPosition::new(12, 1, 8),
        ] {
            assert!(a.contains(pos) || b.contains(pos));
            assert!(u.contains(pos));
        }
    }

    #[test]
    fn test_union_is_associative() {
        let a = bb((0, 0, 0), (1, 1, 1));
        let b = bb((-5, 3, 2), (0, 4, 2));
        let c = bb((7, -7, 7), (8, -6, 9));
        assert_eq!(a.union(&b).union(&c), a.union(&b.union(&c)));
    }

    #[test]
    fn test_adjust_size() {
        let mut b = bb((0, 0, 0), (10, 10, 10));
        b.adjust_size(2, 1, 0);
        assert_eq!(b, bb((-2, -1, 0), (12, 11, 10)));
        b.adjust_size(-2, -1, 0);
        assert_eq!(b, bb((0, 0, 0), (10, 10, 10)));
    }

    #[test]
    fn test_from_corners_normalizes() {
        let b = BoundingBox::from_corners(BlockPosition::new(5, 0, -2), BlockPosition::new(1, 8, 3));
        assert_eq!(b, bb((1, 0, -2), (5, 8, 3)));
        assert_eq!(b.dimensions(), (5, 9, 6));
        assert_eq!(b.volume(), 270);
    }

    #[test]
    fn test_full_range_dimensions() {
        let wide = BoundingBox::new((i32::MIN, 0, 0), (i32::MAX, 0, 0));
        assert_eq!(wide.dimensions(), (1u64 << 32, 1, 1));
        assert_eq!(wide.volume(), 1u64 << 32);

        let mut everything = BoundingBox::new((0, 0, 0), (0, 0, 0));
        everything.adjust_size(i32::MAX, i32::MAX, i32::MAX);
        assert_eq!(everything.min, (-i32::MAX, -i32::MAX, -i32::MAX));
        assert_eq!(everything.max, (i32::MAX, i32::MAX, i32::MAX));
        assert_eq!(everything.volume(), u64::MAX);
        assert_eq!(BoundingBox::empty().dimensions(), (0, 0, 0));
    }
}
