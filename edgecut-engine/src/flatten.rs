//! 圆弧与圆的折线化。

use std::f64::consts::TAU;

use edgecut_core::geometry::Point;
use edgecut_core::shape::Circle;

/// 容差为零时使用的弦高误差（内部单位，约 0.005 mm）。
pub const DEFAULT_CHORD_ERROR: u64 = 5_000;

const MIN_SEGMENTS_PER_CIRCLE: f64 = 8.0;
const MAX_SEGMENTS_PER_CIRCLE: f64 = 4_096.0;

/// 以最大弦高误差 `max_error` 逼近半径 `radius`、扫掠 `sweep_degrees` 度的圆弧所需的段数。
///
/// 每整圆至少 8 段；半径或误差非正时退化为最少段数。扫掠角按整圆封顶，结果至少为 1。
pub fn steps_for_tolerance(radius: f64, max_error: f64, sweep_degrees: f64) -> usize {
    let max_increment = 360.0 / MIN_SEGMENTS_PER_CIRCLE;
    let increment = if radius <= 0.0 || max_error <= 0.0 {
        max_increment
    } else {
        let relative = (max_error / radius).min(1.0);
        (2.0 * (1.0 - relative).acos().to_degrees())
            .clamp(360.0 / MAX_SEGMENTS_PER_CIRCLE, max_increment)
    };
    let sweep = sweep_degrees.abs().min(360.0);
    let steps = (sweep / increment).round() as usize;
    steps.max(1)
}

/// 从 `from` 绕 `center` 旋转 `sweep` 弧度，生成第 1..=steps 个点；最后一个点精确落在 `to`。
pub fn arc_points(center: Point, from: Point, sweep: f64, steps: usize, to: Point) -> Vec<Point> {
    let steps = steps.max(1);
    (1..=steps)
        .map(|step| {
            if step == steps {
                to
            } else {
                from.rotated_about(center, sweep * step as f64 / steps as f64)
            }
        })
        .collect()
}

/// 从角度 0 开始的圆周点环；退化圆返回空。
pub fn circle_ring(circle: &Circle, max_error: f64) -> Vec<Point> {
    if circle.is_degenerate() {
        return Vec::new();
    }
    let steps = steps_for_tolerance(circle.radius as f64, max_error, 360.0);
    let start = circle.rim_point();
    (0..steps)
        .map(|step| start.rotated_about(circle.center, TAU * step as f64 / steps as f64))
        .collect()
}
