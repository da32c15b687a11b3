/// Axis-aligned bounding boxes: the only collision shape in the game.

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Aabb {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Aabb {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Aabb { x, y, width, height }
    }
}

/// True iff the rectangles share non-zero area (edges touching do not count).
#[inline]
pub fn overlaps(a: Aabb, b: Aabb) -> bool {
    a.x < b.x + b.width
        && a.x + a.width > b.x
        && a.y < b.y + b.height
        && a.y + a.height > b.y
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlapping_boxes() {
        let a = Aabb::new(0.0, 0.0, 10.0, 10.0);
        let b = Aabb::new(5.0, 5.0, 10.0, 10.0);
        assert!(overlaps(a, b));
        assert!(overlaps(b, a));
    }

    #[test]
    fn touching_edges_do_not_overlap() {
        let a = Aabb::new(0.0, 0.0, 10.0, 10.0);
        let right = Aabb::new(10.0, 0.0, 10.0, 10.0);
        let below = Aabb::new(0.0, 10.0, 10.0, 10.0);
        assert!(!overlaps(a, right));
        assert!(!overlaps(a, below));
    }

    #[test]
    fn containment_overlaps() {
        let outer = Aabb::new(0.0, 0.0, 100.0, 100.0);
        let inner = Aabb::new(40.0, 40.0, 5.0, 5.0);
        assert!(overlaps(outer, inner));
        assert!(overlaps(inner, outer));
    }

    #[test]
    fn separated_on_one_axis_only() {
        let a = Aabb::new(0.0, 0.0, 10.0, 10.0);
        // x ranges overlap, y ranges do not
        let b = Aabb::new(5.0, 20.0, 10.0, 10.0);
        assert!(!overlaps(a, b));
    }
}
