//! 结果多边形的边级校验：重复边与自相交。

use edgecut_core::geometry::Point;
use edgecut_core::polygon::PolygonWithHoles;
use tracing::warn;

use crate::errors::OutlineError;

type Edge = (Point, Point);

/// 两两比较全部边。闭合轮廓包含首尾相连的边，零长度边跳过。
///
/// 同向重复边与真相交总是致命；反向重复边默认致命，`allow_reverse_duplicates`
/// 为 true 时仅记录警告。
pub fn validate_polygon(
    polygon: &PolygonWithHoles,
    allow_reverse_duplicates: bool,
) -> Result<(), OutlineError> {
    let edges: Vec<Edge> = polygon
        .contours()
        .flat_map(|contour| contour.segments())
        .filter(|(a, b)| a != b)
        .collect();

    for (i, first) in edges.iter().enumerate() {
        for second in &edges[i + 1..] {
            if first == second {
                warn!(x = first.0.x(), y = first.0.y(), "轮廓存在重复边");
                return Err(OutlineError::DuplicateEdge { location: first.0 });
            }
            if first.0 == second.1 && first.1 == second.0 {
                if allow_reverse_duplicates {
                    warn!(x = first.0.x(), y = first.0.y(), "轮廓存在反向重复边，已忽略");
                    continue;
                }
                warn!(x = first.0.x(), y = first.0.y(), "轮廓存在反向重复边");
                return Err(OutlineError::DuplicateEdge { location: first.0 });
            }
            if let Some(location) = segment_intersection(*first, *second) {
                warn!(x = location.x(), y = location.y(), "轮廓自相交");
                return Err(OutlineError::SelfIntersection { location });
            }
        }
    }
    Ok(())
}

fn cross(ax: i128, ay: i128, bx: i128, by: i128) -> i128 {
    ax * by - ay * bx
}

/// 两条线段的真交点。平行（含共线）返回 None；两条线段都只在端点处接触时
/// 同样返回 None。交点坐标四舍五入到整数。
pub fn segment_intersection(first: Edge, second: Edge) -> Option<Point> {
    let (a, b) = first;
    let (c, d) = second;
    let (ex, ey) = ((b.x() - a.x()) as i128, (b.y() - a.y()) as i128);
    let (fx, fy) = ((d.x() - c.x()) as i128, (d.y() - c.y()) as i128);
    let (acx, acy) = ((c.x() - a.x()) as i128, (c.y() - a.y()) as i128);

    let mut denom = cross(ex, ey, fx, fy);
    if denom == 0 {
        return None;
    }
    // t = p / denom 为第一条线段上的参数，s = q / denom 为第二条线段上的参数。
    let mut p = cross(acx, acy, fx, fy);
    let mut q = cross(acx, acy, ex, ey);
    if denom < 0 {
        denom = -denom;
        p = -p;
        q = -q;
    }

    if (p == 0 || p == denom) && (q == 0 || q == denom) {
        return None;
    }
    if p < 0 || p > denom || q < 0 || q > denom {
        return None;
    }

    let t = p as f64 / denom as f64;
    Some(Point::new(
        a.x() + (ex as f64 * t).round() as i64,
        a.y() + (ey as f64 * t).round() as i64,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use edgecut_core::polygon::Contour;

    fn contour(points: &[(i64, i64)]) -> Contour {
        Contour::from_points(points.iter().map(|&(x, y)| Point::new(x, y)))
    }

    fn single(points: &[(i64, i64)]) -> PolygonWithHoles {
        let mut polygon = PolygonWithHoles::new();
        polygon.add_outline(contour(points));
        polygon
    }

    #[test]
    fn crossing_point_is_reported() {
        let hit = segment_intersection(
            (Point::new(0, 0), Point::new(10, 10)),
            (Point::new(10, 0), Point::new(0, 10)),
        );
        assert_eq!(hit, Some(Point::new(5, 5)));

        let rounded = segment_intersection(
            (Point::new(0, 0), Point::new(3, 3)),
            (Point::new(0, 3), Point::new(3, 0)),
        );
        assert_eq!(rounded, Some(Point::new(2, 2)));
    }

    #[test]
    fn shared_endpoints_and_parallel_segments_are_ignored() {
        assert!(
            segment_intersection(
                (Point::new(0, 0), Point::new(10, 0)),
                (Point::new(10, 0), Point::new(10, 10)),
            )
            .is_none()
        );
        assert!(
            segment_intersection(
                (Point::new(0, 0), Point::new(10, 0)),
                (Point::new(5, 0), Point::new(15, 0)),
            )
            .is_none()
        );
        assert!(
            segment_intersection(
                (Point::new(0, 0), Point::new(10, 0)),
                (Point::new(0, 5), Point::new(10, 5)),
            )
            .is_none()
        );
    }

    #[test]
    fn endpoint_touching_interior_counts_as_crossing() {
        let hit = segment_intersection(
            (Point::new(0, 0), Point::new(10, 0)),
            (Point::new(5, 0), Point::new(5, 10)),
        );
        assert_eq!(hit, Some(Point::new(5, 0)));
    }

    #[test]
    fn simple_square_passes() {
        let polygon = single(&[(0, 0), (10, 0), (10, 10), (0, 10)]);
        assert_eq!(validate_polygon(&polygon, false), Ok(()));
    }

    #[test]
    fn bowtie_is_rejected_at_crossing() {
        let polygon = single(&[(0, 0), (10, 10), (10, 0), (0, 10)]);
        assert_eq!(
            validate_polygon(&polygon, false),
            Err(OutlineError::SelfIntersection {
                location: Point::new(5, 5)
            })
        );
    }

    #[test]
    fn reverse_duplicates_follow_option() {
        // 外轮廓与孔共享一条反向的边。
        let mut polygon = single(&[(0, 0), (10, 0), (10, 10), (0, 10)]);
        polygon.add_hole(0, contour(&[(10, 0), (0, 0), (5, -5)]));

        assert_eq!(
            validate_polygon(&polygon, false),
            Err(OutlineError::DuplicateEdge {
                location: Point::new(0, 0)
            })
        );
        assert_eq!(validate_polygon(&polygon, true), Ok(()));
    }

    #[test]
    fn identical_edges_are_always_rejected() {
        let mut polygon = single(&[(0, 0), (10, 0), (10, 10), (0, 10)]);
        polygon.add_hole(0, contour(&[(0, 0), (10, 0), (5, -5)]));
        assert_eq!(
            validate_polygon(&polygon, true),
            Err(OutlineError::DuplicateEdge {
                location: Point::new(0, 0)
            })
        );
    }

    #[test]
    fn open_contour_skips_closing_edge() {
        // Z 字形：只有首尾相连的边 (10,0)->(0,10) 会与对角边相交。
        let zigzag = [(0, 10), (10, 10), (0, 0), (10, 0)];
        assert_eq!(
            validate_polygon(&single(&zigzag), false),
            Err(OutlineError::SelfIntersection {
                location: Point::new(5, 5)
            })
        );

        let mut open = contour(&zigzag);
        open.set_closed(false);
        let mut polygon = PolygonWithHoles::new();
        polygon.add_outline(open);
        assert_eq!(validate_polygon(&polygon, false), Ok(()));
    }
}
