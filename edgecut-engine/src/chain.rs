//! 端点串接：从种子图元出发，反复取最近的图元，直到回到起点或无路可走。

use edgecut_core::geometry::Point;
use edgecut_core::polygon::Contour;
use edgecut_core::shape::{Arc, Primitive, Shape};
use tracing::{debug, warn};

use crate::errors::OutlineError;
use crate::flatten::{arc_points, circle_ring, steps_for_tolerance};
use crate::pool::WorkingPool;
use crate::proximity::{close_enough, closer_endpoint};

/// 单条轮廓的构建结果。`fault` 为 `UnclosedChain` 时轮廓被标记为开放，
/// 为 `UnsupportedPrimitive` 时整个转换应当中止。
#[derive(Debug, Clone)]
pub struct ChainWalk {
    pub contour: Contour,
    pub fault: Option<OutlineError>,
}

pub struct ChainWalker<'p, 'a> {
    pool: &'p mut WorkingPool<'a>,
    tolerance: u64,
    max_error: f64,
}

impl<'p, 'a> ChainWalker<'p, 'a> {
    pub fn new(pool: &'p mut WorkingPool<'a>, tolerance: u64, max_error: f64) -> Self {
        Self {
            pool,
            tolerance,
            max_error,
        }
    }

    /// 由种子图元构建一条轮廓：闭合图形直接输出，其余图元按端点串接。
    pub fn build(&mut self, seed: &'a Primitive) -> ChainWalk {
        if seed.kind().is_closed_shape() {
            ChainWalk {
                contour: closed_shape_contour(seed, self.max_error),
                fault: None,
            }
        } else {
            self.walk(seed)
        }
    }

    /// 从种子的终点出发串接。种子的另一端留待最后闭合判断。
    pub fn walk(&mut self, seed: &'a Primitive) -> ChainWalk {
        let start_point = seed.end();
        let mut current = start_point;
        let mut contour = Contour::new();
        contour.push(start_point);

        let mut primitive = seed;
        let mut consumed = 0usize;
        loop {
            match &primitive.shape {
                Shape::Segment(segment) => {
                    current = if closer_endpoint(current, segment.start, segment.end) {
                        segment.end
                    } else {
                        segment.start
                    };
                    contour.push(current);
                }
                Shape::Arc(arc) => {
                    current = self.emit_arc(arc, current, &mut contour);
                }
                Shape::Curve(curve) => {
                    let points = curve.flattened();
                    if closer_endpoint(current, curve.start(), curve.end()) {
                        contour.extend(points.iter().copied());
                        current = curve.end();
                    } else {
                        contour.extend(points.iter().rev().copied());
                        current = curve.start();
                    }
                }
                Shape::Circle(_) | Shape::Rectangle(_) | Shape::Polygon(_) => {
                    let location = primitive.position();
                    warn!(
                        kind = %primitive.kind(),
                        x = location.x(),
                        y = location.y(),
                        "轮廓链中出现不支持的闭合图元"
                    );
                    contour.set_closed(false);
                    return ChainWalk {
                        contour,
                        fault: Some(OutlineError::UnsupportedPrimitive {
                            kind: primitive.kind(),
                            location,
                        }),
                    };
                }
            }
            consumed += 1;

            match self.pool.find_nearest(current, self.tolerance) {
                Some(next) => primitive = next,
                None => break,
            }
        }

        if close_enough(start_point, current, self.tolerance) {
            contour.close();
            debug!(primitives = consumed, points = contour.len(), "轮廓链已闭合");
            ChainWalk {
                contour,
                fault: None,
            }
        } else {
            warn!(
                x = current.x(),
                y = current.y(),
                primitives = consumed,
                "轮廓链未能闭合"
            );
            contour.set_closed(false);
            ChainWalk {
                contour,
                fault: Some(OutlineError::UnclosedChain { location: current }),
            }
        }
    }

    /// 将圆弧折线化后追加到轮廓；若终点更接近当前点则反向遍历。返回新的当前点。
    fn emit_arc(&self, arc: &Arc, current: Point, contour: &mut Contour) -> Point {
        let arc_end = arc.end();
        let (from, to, sweep) = if closer_endpoint(current, arc.start, arc_end) {
            (arc.start, arc_end, arc.sweep)
        } else {
            (arc_end, arc.start, -arc.sweep)
        };
        let steps = steps_for_tolerance(arc.radius(), self.max_error, arc.sweep_degrees());
        contour.extend(arc_points(arc.center, from, sweep, steps, to));
        to
    }
}

/// 圆、矩形与多边形直接转换为闭合轮廓，不参与容差判断。
pub fn closed_shape_contour(primitive: &Primitive, max_error: f64) -> Contour {
    let mut contour = match &primitive.shape {
        Shape::Circle(circle) => Contour::from_points(circle_ring(circle, max_error)),
        Shape::Rectangle(rect) => Contour::from_points(rect.corners()),
        Shape::Polygon(polygon) => Contour::from_points(polygon.placed_outline()),
        Shape::Segment(_) | Shape::Arc(_) | Shape::Curve(_) => {
            let (start, end) = primitive.endpoints();
            let mut open = Contour::from_points([start, end]);
            open.set_closed(false);
            return open;
        }
    };
    contour.close();
    contour
}
