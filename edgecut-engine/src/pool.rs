//! 串接过程中逐步消耗的图元工作池。

use edgecut_core::geometry::Point;
use edgecut_core::shape::{Primitive, Shape};
use tracing::warn;

use crate::flatten::{arc_points, steps_for_tolerance};
use crate::proximity::manhattan_distance;

/// 借用外部图元的有序引用列表。移除保持顺序，平局时总是先出现者优先。
#[derive(Debug, Default)]
pub struct WorkingPool<'a> {
    items: Vec<&'a Primitive>,
}

impl<'a> WorkingPool<'a> {
    /// 构建工作池，丢弃半径非正的退化圆。
    pub fn new<I>(primitives: I) -> Self
    where
        I: IntoIterator<Item = &'a Primitive>,
    {
        let items = primitives
            .into_iter()
            .filter(|primitive| match &primitive.shape {
                Shape::Circle(circle) if circle.is_degenerate() => {
                    warn!(
                        x = circle.center.x(),
                        y = circle.center.y(),
                        radius = circle.radius,
                        "跳过半径非正的退化圆"
                    );
                    false
                }
                _ => true,
            })
            .collect();
        Self { items }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &'a Primitive> + '_ {
        self.items.iter().copied()
    }

    /// 移除并返回指定位置的图元。
    pub fn take(&mut self, index: usize) -> Option<&'a Primitive> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    #[inline]
    pub fn pop_front(&mut self) -> Option<&'a Primitive> {
        self.take(0)
    }

    /// 查找端点最接近 `reference` 的图元并移出工作池。
    ///
    /// 端点完全重合时立即返回（池内顺序靠前者优先）；否则仅当最近距离不超过
    /// `tolerance` 时返回。未找到时工作池保持不变。
    pub fn find_nearest(&mut self, reference: Point, tolerance: u64) -> Option<&'a Primitive> {
        let mut best: Option<(usize, u64)> = None;
        for (index, primitive) in self.items.iter().enumerate() {
            let (start, end) = primitive.endpoints();
            for candidate in [start, end] {
                let distance = manhattan_distance(reference, candidate);
                if best.is_none_or(|(_, min)| distance < min) {
                    best = Some((index, distance));
                }
            }
            if matches!(best, Some((_, 0))) {
                break;
            }
        }

        match best {
            Some((index, distance)) if distance <= tolerance => self.take(index),
            _ => None,
        }
    }

    /// 所有图元参考点中 x 最小者所属的图元序号（严格小于，先出现者优先）。
    ///
    /// 圆弧与曲线使用折线化后的点，圆使用最左点，多边形使用摆放后的顶点。
    /// 这是启发式规则：包含最左点的轮廓被视为外轮廓。
    pub fn leftmost(&self, max_error: f64) -> Option<usize> {
        let mut min_x = i64::MAX;
        let mut found = None;
        for (index, primitive) in self.items.iter().enumerate() {
            let mut consider = |point: Point| {
                if point.x() < min_x {
                    min_x = point.x();
                    found = Some(index);
                }
            };
            match &primitive.shape {
                Shape::Segment(segment) => {
                    consider(segment.start);
                    consider(segment.end);
                }
                Shape::Rectangle(rect) => {
                    for corner in rect.corners() {
                        consider(corner);
                    }
                }
                Shape::Arc(arc) => {
                    let steps = steps_for_tolerance(arc.radius(), max_error, arc.sweep_degrees());
                    for point in arc_points(arc.center, arc.start, arc.sweep, steps, arc.end()) {
                        consider(point);
                    }
                }
                Shape::Circle(circle) => {
                    if !circle.is_degenerate() {
                        consider(Point::new(
                            circle.center.x() - circle.radius,
                            circle.center.y(),
                        ));
                    }
                }
                Shape::Curve(curve) => {
                    for point in curve.flattened() {
                        consider(*point);
                    }
                }
                Shape::Polygon(polygon) => {
                    for point in polygon.placed_outline() {
                        consider(point);
                    }
                }
            }
        }
        found
    }
}
