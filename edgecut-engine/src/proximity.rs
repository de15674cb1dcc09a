//! 连接判断使用的距离工具。曼哈顿距离只用于相对比较与容差判断。

use edgecut_core::geometry::Point;

/// `|dx| + |dy|`，饱和加法避免极端坐标溢出。
#[inline]
pub fn manhattan_distance(a: Point, b: Point) -> u64 {
    a.x().abs_diff(b.x()).saturating_add(a.y().abs_diff(b.y()))
}

#[inline]
pub fn close_enough(a: Point, b: Point, tolerance: u64) -> bool {
    manhattan_distance(a, b) <= tolerance
}

/// `first` 至少与 `second` 一样接近 `reference` 时返回 true。
#[inline]
pub fn closer_endpoint(reference: Point, first: Point, second: Point) -> bool {
    manhattan_distance(reference, first) <= manhattan_distance(reference, second)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manhattan_distance_sums_axes() {
        assert_eq!(manhattan_distance(Point::new(0, 0), Point::new(3, -4)), 7);
        assert_eq!(
            manhattan_distance(Point::new(i64::MIN, 0), Point::new(i64::MAX, i64::MAX)),
            u64::MAX
        );
    }

    #[test]
    fn tolerance_is_inclusive() {
        assert!(close_enough(Point::new(0, 0), Point::new(1, 1), 2));
        assert!(!close_enough(Point::new(0, 0), Point::new(1, 1), 1));
        assert!(close_enough(Point::new(5, 5), Point::new(5, 5), 0));
    }

    #[test]
    fn ties_prefer_first_endpoint() {
        let reference = Point::new(0, 0);
        assert!(closer_endpoint(reference, Point::new(1, 0), Point::new(0, 1)));
        assert!(!closer_endpoint(reference, Point::new(5, 0), Point::new(0, 1)));
    }
}
