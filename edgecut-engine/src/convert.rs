//! 图元集合到带孔多边形的转换入口。

use edgecut_core::geometry::Point;
use edgecut_core::polygon::PolygonWithHoles;
use edgecut_core::shape::Primitive;
use tracing::{debug, warn};

use crate::chain::ChainWalker;
use crate::errors::{ErrorReport, OutlineError};
use crate::flatten::DEFAULT_CHORD_ERROR;
use crate::pool::WorkingPool;
use crate::validate::validate_polygon;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertOptions {
    /// 端点连接容差（曼哈顿距离，内部单位）。
    pub tolerance: u64,
    /// 容差为零时圆弧折线化使用的弦高误差。
    pub chord_error: u64,
    pub allow_reverse_duplicates: bool,
}

impl ConvertOptions {
    pub fn with_tolerance(tolerance: u64) -> Self {
        Self {
            tolerance,
            ..Self::default()
        }
    }

    /// 折线化误差：容差为正时与容差一致，否则退回弦高误差。
    pub fn flattening_error(&self) -> u64 {
        if self.tolerance > 0 {
            self.tolerance
        } else {
            self.chord_error.max(1)
        }
    }
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            tolerance: 0,
            chord_error: DEFAULT_CHORD_ERROR,
            allow_reverse_duplicates: false,
        }
    }
}

/// 转换结果。`complete` 为 false 时多边形可能缺失部分轮廓或含开放轮廓。
#[derive(Debug, Clone)]
pub struct OutlineConversion {
    pub polygon: PolygonWithHoles,
    pub complete: bool,
    pub errors: Vec<OutlineError>,
}

impl OutlineConversion {
    /// 首个带坐标的错误位置。
    pub fn error_location(&self) -> Option<Point> {
        self.errors.iter().find_map(OutlineError::location)
    }

    pub fn report(&self) -> Option<ErrorReport> {
        ErrorReport::from_errors(&self.errors)
    }

    /// 结果完整且至少有一个外轮廓。
    pub fn is_usable(&self) -> bool {
        self.complete && !self.polygon.is_empty()
    }
}

pub fn convert_outline_to_polygon(primitives: &[&Primitive], tolerance: u64) -> OutlineConversion {
    convert_outline_to_polygon_with(primitives, &ConvertOptions::with_tolerance(tolerance))
}

/// 将图元串接为带孔多边形。
///
/// 最左参考点所在的图元作为外轮廓种子；外轮廓完成后，剩余图元按原有顺序
/// 逐个取出构建孔。轮廓链中出现闭合图形时立即中止并跳过校验；
/// 其余情况即使结果不完整也会执行边校验。
pub fn convert_outline_to_polygon_with(
    primitives: &[&Primitive],
    options: &ConvertOptions,
) -> OutlineConversion {
    let mut pool = WorkingPool::new(primitives.iter().copied());
    let mut conversion = OutlineConversion {
        polygon: PolygonWithHoles::new(),
        complete: true,
        errors: Vec::new(),
    };

    let max_error = options.flattening_error() as f64;
    let Some(seed) = pool.leftmost(max_error).and_then(|index| pool.take(index)) else {
        debug!("没有可用的轮廓图元");
        return conversion;
    };
    debug!(
        kind = %seed.kind(),
        x = seed.position().x(),
        y = seed.position().y(),
        total = pool.len() + 1,
        "选定外轮廓起始图元"
    );

    let mut walker = ChainWalker::new(&mut pool, options.tolerance, max_error);
    let outer = walker.build(seed);
    let outline = conversion.polygon.add_outline(outer.contour);
    if let Some(fault) = outer.fault {
        if record_fault(&mut conversion, fault) {
            return conversion;
        }
    }

    let mut holes = 0usize;
    while let Some(seed) = pool.pop_front() {
        let hole = ChainWalker::new(&mut pool, options.tolerance, max_error).build(seed);
        conversion.polygon.add_hole(outline, hole.contour);
        holes += 1;
        if let Some(fault) = hole.fault {
            if record_fault(&mut conversion, fault) {
                return conversion;
            }
        }
    }
    debug!(
        holes,
        points = conversion.polygon.point_count(),
        complete = conversion.complete,
        "轮廓构建结束"
    );

    if let Err(error) = validate_polygon(&conversion.polygon, options.allow_reverse_duplicates) {
        conversion.complete = false;
        conversion.errors.push(error);
    }
    conversion
}

/// 记录故障并清除完整标记；返回 true 表示应立即中止。
fn record_fault(conversion: &mut OutlineConversion, fault: OutlineError) -> bool {
    conversion.complete = false;
    let abort = matches!(fault, OutlineError::UnsupportedPrimitive { .. });
    if abort {
        warn!(error = %fault, "轮廓转换中止");
    }
    conversion.errors.push(fault);
    abort
}

#[cfg(test)]
mod tests {
    use super::*;
    use edgecut_core::shape::ShapeKind;
    use std::f64::consts::PI;

    const LAYER: &str = "Edge.Cuts";

    fn segment(ax: i64, ay: i64, bx: i64, by: i64) -> Primitive {
        Primitive::segment(Point::new(ax, ay), Point::new(bx, by), LAYER)
    }

    fn square(x: i64, y: i64, size: i64) -> Vec<Primitive> {
        vec![
            segment(x, y, x + size, y),
            segment(x + size, y, x + size, y + size),
            segment(x + size, y + size, x, y + size),
            segment(x, y + size, x, y),
        ]
    }

    fn refs(primitives: &[Primitive]) -> Vec<&Primitive> {
        primitives.iter().collect()
    }

    #[test]
    fn closed_square_gives_single_complete_outline() {
        let primitives = square(0, 0, 10);
        let conversion = convert_outline_to_polygon(&refs(&primitives), 0);

        assert!(conversion.complete);
        assert!(conversion.errors.is_empty());
        assert_eq!(conversion.polygon.outline_count(), 1);
        assert_eq!(conversion.polygon.hole_count(0), 0);
        let outline = conversion.polygon.outline(0).expect("outline");
        assert_eq!(outline.contour.len(), 4);
        assert!((outline.contour.area() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn gap_reports_incomplete_at_break() {
        let primitives = vec![
            segment(0, 0, 10, 0),
            segment(10, 0, 10, 10),
            segment(10, 10, 0, 10),
            segment(0, 10, 0, 1),
        ];
        let conversion = convert_outline_to_polygon(&refs(&primitives), 0);

        assert!(!conversion.complete);
        assert_eq!(conversion.error_location(), Some(Point::new(0, 0)));
        let report = conversion.report().expect("report");
        assert!(report.message.contains("unable to find edge"));
        assert_eq!(report.location, Some(Point::new(0, 0)));
        assert!(!conversion.polygon.is_fully_closed());
    }

    #[test]
    fn rectangle_with_circle_becomes_outline_with_hole() {
        let rectangle = Primitive::rectangle(Point::new(0, 0), Point::new(100, 100), LAYER);
        let circle = Primitive::circle(Point::new(50, 50), 10, LAYER);
        let conversion = convert_outline_to_polygon(&[&rectangle, &circle], 0);

        assert!(conversion.complete, "{:?}", conversion.errors);
        assert_eq!(conversion.polygon.outline_count(), 1);
        let outline = conversion.polygon.outline(0).expect("outline");
        assert_eq!(outline.contour.len(), 4);
        assert_eq!(outline.holes.len(), 1);
        assert_eq!(outline.holes[0].len(), 8);
        assert_eq!(outline.holes[0].first(), Some(Point::new(60, 50)));
    }

    #[test]
    fn bowtie_is_rejected_at_crossing() {
        let primitives = vec![
            segment(0, 0, 10, 10),
            segment(10, 10, 10, 0),
            segment(10, 0, 0, 10),
            segment(0, 10, 0, 0),
        ];
        let conversion = convert_outline_to_polygon(&refs(&primitives), 0);
        assert!(!conversion.complete);
        assert_eq!(
            conversion.errors,
            vec![OutlineError::SelfIntersection {
                location: Point::new(5, 5)
            }]
        );
    }

    #[test]
    fn nested_square_becomes_hole_with_matching_points() {
        let mut primitives = square(0, 0, 100);
        primitives.extend(square(40, 40, 20));
        let conversion = convert_outline_to_polygon(&refs(&primitives), 0);

        assert!(conversion.complete);
        assert_eq!(conversion.polygon.outline_count(), 1);
        assert_eq!(conversion.polygon.hole_count(0), 1);
        let outline = conversion.polygon.outline(0).expect("outline");
        assert_eq!(outline.holes[0].len(), 4);
        assert!(conversion.polygon.contains(Point::new(10, 10)));
        assert!(!conversion.polygon.contains(Point::new(50, 50)));
    }

    #[test]
    fn arcs_chain_into_rounded_outline() {
        // 跑道形：两条直线加两个半圆。
        let r = 1_000_000;
        let primitives = vec![
            segment(0, -r, 4 * r, -r),
            Primitive::arc(Point::new(4 * r, 0), Point::new(4 * r, -r), PI, LAYER),
            segment(4 * r, r, 0, r),
            Primitive::arc(Point::new(0, 0), Point::new(0, r), PI, LAYER),
        ];
        let conversion = convert_outline_to_polygon(&refs(&primitives), 0);

        assert!(conversion.complete, "{:?}", conversion.errors);
        assert_eq!(conversion.polygon.outline_count(), 1);
        let contour = &conversion.polygon.outline(0).expect("outline").contour;
        assert!(contour.len() > 10);
        let expected = 8.0 * (r as f64).powi(2) + PI * (r as f64).powi(2);
        assert!((contour.area() - expected).abs() / expected < 0.01);
        let bounds = contour.bounds();
        assert_eq!(bounds.min().x(), -r);
        assert_eq!(bounds.max().x(), 5 * r);
    }

    #[test]
    fn curves_participate_in_chains() {
        let primitives = vec![
            segment(0, 0, 1_000, 0),
            Primitive::curve(
                Point::new(1_000, 0),
                Point::new(1_500, 500),
                Point::new(1_500, 500),
                Point::new(1_000, 1_000),
                0,
                LAYER,
            ),
            segment(1_000, 1_000, 0, 1_000),
            segment(0, 1_000, 0, 0),
        ];
        let conversion = convert_outline_to_polygon(&refs(&primitives), 0);
        assert!(conversion.complete, "{:?}", conversion.errors);
        let contour = &conversion.polygon.outline(0).expect("outline").contour;
        assert!(contour.len() > 4);
        assert!(contour.bounds().max().x() > 1_000);
    }

    #[test]
    fn closed_shape_inside_chain_aborts_without_validation() {
        let primitives = vec![
            segment(0, 0, 10, 0),
            segment(0, 0, 20, 10),
            Primitive::circle(Point::new(20, 10), 5, LAYER),
            segment(10, 0, 30, 30),
        ];
        let conversion = convert_outline_to_polygon(&refs(&primitives), 0);

        assert!(!conversion.complete);
        assert_eq!(
            conversion.errors,
            vec![OutlineError::UnsupportedPrimitive {
                kind: ShapeKind::Circle,
                location: Point::new(20, 10)
            }]
        );
        assert_eq!(conversion.polygon.hole_count(0), 0);
    }

    #[test]
    fn degenerate_circle_is_ignored() {
        let mut primitives = square(0, 0, 10);
        primitives.push(Primitive::circle(Point::new(5, 5), 0, LAYER));
        let conversion = convert_outline_to_polygon(&refs(&primitives), 0);
        assert!(conversion.complete);
        assert_eq!(conversion.polygon.hole_count(0), 0);
    }

    #[test]
    fn empty_input_is_complete_and_empty() {
        let conversion = convert_outline_to_polygon(&[], 0);
        assert!(conversion.complete);
        assert!(conversion.polygon.is_empty());
        assert!(conversion.report().is_none());
        assert!(!conversion.is_usable());
    }

    #[test]
    fn unclosed_hole_keeps_outer_outline() {
        let mut primitives = square(0, 0, 100);
        primitives.push(segment(60, 40, 40, 40));
        primitives.push(segment(60, 40, 60, 60));
        let conversion = convert_outline_to_polygon(&refs(&primitives), 0);

        assert!(!conversion.complete);
        assert_eq!(conversion.polygon.outline_count(), 1);
        assert_eq!(conversion.polygon.hole_count(0), 1);
        let outline = conversion.polygon.outline(0).expect("outline");
        assert!(outline.contour.is_closed());
        assert!(!outline.holes[0].is_closed());
        assert!(matches!(
            conversion.errors[0],
            OutlineError::UnclosedChain { .. }
        ));
    }

    #[test]
    fn closed_shape_inside_hole_chain_aborts() {
        let mut primitives = square(0, 0, 100);
        primitives.push(segment(40, 40, 60, 40));
        primitives.push(Primitive::circle(Point::new(40, 40), 5, LAYER));
        let conversion = convert_outline_to_polygon(&refs(&primitives), 0);

        assert!(!conversion.complete);
        assert_eq!(
            conversion.errors,
            vec![OutlineError::UnsupportedPrimitive {
                kind: ShapeKind::Circle,
                location: Point::new(40, 40)
            }]
        );
        let outline = conversion.polygon.outline(0).expect("outline");
        assert!(outline.contour.is_closed());
        assert_eq!(outline.contour.len(), 4);
        assert_eq!(outline.holes.len(), 1);
        assert!(!outline.holes[0].is_closed());
        assert_eq!(
            outline.holes[0].points(),
            &[Point::new(60, 40), Point::new(40, 40)][..]
        );
    }

    #[test]
    fn flattening_error_follows_tolerance() {
        assert_eq!(ConvertOptions::default().flattening_error(), DEFAULT_CHORD_ERROR);
        assert_eq!(ConvertOptions::with_tolerance(42).flattening_error(), 42);
    }
}
