pub mod units {
    /// 内部单位为纳米，与板框坐标保持整数精度。
    pub const IU_PER_MM: f64 = 1_000_000.0;

    #[inline]
    pub fn mm_to_iu(mm: f64) -> i64 {
        (mm * IU_PER_MM).round() as i64
    }

    #[inline]
    pub fn iu_to_mm(iu: i64) -> f64 {
        iu as f64 / IU_PER_MM
    }
}

pub mod geometry {
    use glam::{DVec2, I64Vec2};
    use serde::{Deserialize, Serialize};

    /// 二维整数点，内部以 `glam::I64Vec2` 表示。相等判断是精确的，邻近判断交给容差。
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Point(pub I64Vec2);

    impl Point {
        #[inline]
        pub fn new(x: i64, y: i64) -> Self {
            Self(I64Vec2::new(x, y))
        }

        #[inline]
        pub fn from_vec(vec: I64Vec2) -> Self {
            Self(vec)
        }

        /// 由浮点坐标四舍五入得到整数点。
        #[inline]
        pub fn from_dvec2_rounded(vec: DVec2) -> Self {
            Self::new(vec.x.round() as i64, vec.y.round() as i64)
        }

        #[inline]
        pub fn x(self) -> i64 {
            self.0.x
        }

        #[inline]
        pub fn y(self) -> i64 {
            self.0.y
        }

        #[inline]
        pub fn translate(self, offset: Vector) -> Self {
            Self(self.0 + offset.0)
        }

        #[inline]
        pub fn vector_to(self, other: Point) -> Vector {
            Vector(other.0 - self.0)
        }

        #[inline]
        pub fn as_vec(self) -> I64Vec2 {
            self.0
        }

        #[inline]
        pub fn as_dvec2(self) -> DVec2 {
            DVec2::new(self.0.x as f64, self.0.y as f64)
        }

        /// 绕原点旋转（弧度，逆时针为正）。
        #[inline]
        pub fn rotated(self, angle: f64) -> Self {
            self.rotated_about(Point::new(0, 0), angle)
        }

        /// 绕指定中心旋转，结果取最近的整数坐标。
        pub fn rotated_about(self, center: Point, angle: f64) -> Self {
            if angle == 0.0 {
                return self;
            }
            let (sin, cos) = angle.sin_cos();
            let d = self.as_dvec2() - center.as_dvec2();
            let rotated = DVec2::new(d.x * cos - d.y * sin, d.x * sin + d.y * cos);
            Self::new(
                center.x() + rotated.x.round() as i64,
                center.y() + rotated.y.round() as i64,
            )
        }

        /// 欧氏距离，仅用于半径等几何量，连接判断使用曼哈顿距离。
        #[inline]
        pub fn distance(self, other: Point) -> f64 {
            self.as_dvec2().distance(other.as_dvec2())
        }
    }

    impl From<I64Vec2> for Point {
        fn from(value: I64Vec2) -> Self {
            Self::from_vec(value)
        }
    }

    /// 二维整数向量，用于平移与偏移量。
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Vector(pub I64Vec2);

    impl Vector {
        #[inline]
        pub fn new(x: i64, y: i64) -> Self {
            Self(I64Vec2::new(x, y))
        }

        #[inline]
        pub fn zero() -> Self {
            Self(I64Vec2::ZERO)
        }

        #[inline]
        pub fn x(self) -> i64 {
            self.0.x
        }

        #[inline]
        pub fn y(self) -> i64 {
            self.0.y
        }

        #[inline]
        pub fn as_dvec2(self) -> DVec2 {
            DVec2::new(self.0.x as f64, self.0.y as f64)
        }
    }

    impl From<I64Vec2> for Vector {
        fn from(value: I64Vec2) -> Self {
            Self(value)
        }
    }

    /// 轴对齐整数包围盒。
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Bounds {
        min: Point,
        max: Point,
    }

    impl Bounds {
        #[inline]
        pub fn new(min: Point, max: Point) -> Self {
            Self { min, max }
        }

        #[inline]
        pub fn empty() -> Self {
            Self {
                min: Point::new(i64::MAX, i64::MAX),
                max: Point::new(i64::MIN, i64::MIN),
            }
        }

        #[inline]
        pub fn is_empty(&self) -> bool {
            self.min.x() > self.max.x() || self.min.y() > self.max.y()
        }

        #[inline]
        pub fn min(&self) -> Point {
            self.min
        }

        #[inline]
        pub fn max(&self) -> Point {
            self.max
        }

        pub fn include_point(&mut self, point: Point) {
            if self.is_empty() {
                self.min = point;
                self.max = point;
                return;
            }
            self.min = Point::from_vec(self.min.as_vec().min(point.as_vec()));
            self.max = Point::from_vec(self.max.as_vec().max(point.as_vec()));
        }

        pub fn include_bounds(&mut self, other: &Bounds) {
            if other.is_empty() {
                return;
            }
            self.include_point(other.min);
            self.include_point(other.max);
        }

        #[inline]
        pub fn width(&self) -> i64 {
            if self.is_empty() {
                0
            } else {
                self.max.x() - self.min.x()
            }
        }

        #[inline]
        pub fn height(&self) -> i64 {
            if self.is_empty() {
                0
            } else {
                self.max.y() - self.min.y()
            }
        }

        /// 空盒或面积为零的盒子视为退化。
        #[inline]
        pub fn is_degenerate(&self) -> bool {
            self.is_empty() || self.width() == 0 || self.height() == 0
        }

        /// 向四周扩张 `margin`，空盒以原点为中心扩张。
        pub fn inflate(&self, margin: i64) -> Bounds {
            let (min, max) = if self.is_empty() {
                (Point::new(0, 0), Point::new(0, 0))
            } else {
                (self.min, self.max)
            };
            Bounds {
                min: Point::new(min.x() - margin, min.y() - margin),
                max: Point::new(max.x() + margin, max.y() + margin),
            }
        }

        /// 依次返回原点、(原点.x, 终点.y)、终点、(终点.x, 原点.y)。
        pub fn corners(&self) -> [Point; 4] {
            [
                self.min,
                Point::new(self.min.x(), self.max.y()),
                self.max,
                Point::new(self.max.x(), self.min.y()),
            ]
        }
    }

    /// 父级摆放：先绕原点旋转，再平移。
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct Placement {
        pub offset: Vector,
        pub rotation: f64,
    }

    impl Placement {
        #[inline]
        pub fn new(offset: Vector, rotation: f64) -> Self {
            Self { offset, rotation }
        }

        #[inline]
        pub fn identity() -> Self {
            Self::new(Vector::zero(), 0.0)
        }

        #[inline]
        pub fn apply(&self, point: Point) -> Point {
            point.rotated(self.rotation).translate(self.offset)
        }
    }

    impl Default for Placement {
        fn default() -> Self {
            Self::identity()
        }
    }

}

pub mod shape {
    use std::sync::OnceLock;
    use std::f64::consts::{FRAC_PI_2, PI, TAU};
    use std::fmt;

    use serde::{Deserialize, Serialize};

    use crate::geometry::{Bounds, Placement, Point};

    /// 贝塞尔曲线离散化时的均匀采样数。
    const CURVE_SAMPLES: usize = 32;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub enum ShapeKind {
        Segment,
        Arc,
        Circle,
        Rectangle,
        Curve,
        Polygon,
    }

    impl ShapeKind {
        pub fn name(self) -> &'static str {
            match self {
                ShapeKind::Segment => "segment",
                ShapeKind::Arc => "arc",
                ShapeKind::Circle => "circle",
                ShapeKind::Rectangle => "rectangle",
                ShapeKind::Curve => "curve",
                ShapeKind::Polygon => "polygon",
            }
        }

        /// 圆、矩形与多边形天然闭合，不参与端点串接。
        #[inline]
        pub fn is_closed_shape(self) -> bool {
            matches!(
                self,
                ShapeKind::Circle | ShapeKind::Rectangle | ShapeKind::Polygon
            )
        }
    }

    impl fmt::Display for ShapeKind {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.name())
        }
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Segment {
        pub start: Point,
        pub end: Point,
    }

    /// 圆弧：由圆心、起点和扫掠角（弧度，逆时针为正）定义，终点由起点旋转得到。
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Arc {
        pub center: Point,
        pub start: Point,
        pub sweep: f64,
    }

    impl Arc {
        #[inline]
        pub fn end(&self) -> Point {
            self.start.rotated_about(self.center, self.sweep)
        }

        #[inline]
        pub fn radius(&self) -> f64 {
            self.start.distance(self.center)
        }

        #[inline]
        pub fn sweep_degrees(&self) -> f64 {
            self.sweep.to_degrees()
        }
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Circle {
        pub center: Point,
        pub radius: i64,
    }

    impl Circle {
        /// 角度 0 处的圆周点。
        #[inline]
        pub fn rim_point(&self) -> Point {
            Point::new(self.center.x() + self.radius, self.center.y())
        }

        #[inline]
        pub fn is_degenerate(&self) -> bool {
            self.radius <= 0
        }
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Rectangle {
        pub start: Point,
        pub end: Point,
    }

    impl Rectangle {
        pub fn corners(&self) -> [Point; 4] {
            [
                self.start,
                Point::new(self.end.x(), self.start.y()),
                self.end,
                Point::new(self.start.x(), self.end.y()),
            ]
        }
    }

    /// 三次贝塞尔曲线。离散化结果缓存在实体内部，修改定义参数时失效。
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct BezierCurve {
        start: Point,
        control1: Point,
        control2: Point,
        end: Point,
        width: i64,
        #[serde(skip)]
        flattened: OnceLock<Vec<Point>>,
    }

    impl BezierCurve {
        pub fn new(start: Point, control1: Point, control2: Point, end: Point, width: i64) -> Self {
            Self {
                start,
                control1,
                control2,
                end,
                width,
                flattened: OnceLock::new(),
            }
        }

        #[inline]
        pub fn start(&self) -> Point {
            self.start
        }

        #[inline]
        pub fn end(&self) -> Point {
            self.end
        }

        #[inline]
        pub fn controls(&self) -> (Point, Point) {
            (self.control1, self.control2)
        }

        #[inline]
        pub fn width(&self) -> i64 {
            self.width
        }

        pub fn set_start(&mut self, start: Point) {
            self.start = start;
            self.flattened = OnceLock::new();
        }

        pub fn set_end(&mut self, end: Point) {
            self.end = end;
            self.flattened = OnceLock::new();
        }

        pub fn set_controls(&mut self, control1: Point, control2: Point) {
            self.control1 = control1;
            self.control2 = control2;
            self.flattened = OnceLock::new();
        }

        pub fn set_width(&mut self, width: i64) {
            self.width = width;
            self.flattened = OnceLock::new();
        }

        /// 返回离散化后的折线点，首尾与原始端点一致。重复调用返回同一结果。
        pub fn flattened(&self) -> &[Point] {
            self.flattened.get_or_init(|| self.flatten())
        }

        fn flatten(&self) -> Vec<Point> {
            let p0 = self.start.as_dvec2();
            let p1 = self.control1.as_dvec2();
            let p2 = self.control2.as_dvec2();
            let p3 = self.end.as_dvec2();
            let min_len = self.width.max(0) as f64;

            let mut points = vec![self.start];
            let mut previous = p0;
            for step in 1..CURVE_SAMPLES {
                let t = step as f64 / CURVE_SAMPLES as f64;
                let u = 1.0 - t;
                let vertex =
                    p0 * (u * u * u) + p1 * (3.0 * u * u * t) + p2 * (3.0 * u * t * t) + p3 * (t * t * t);
                if vertex.distance(previous) > min_len {
                    let point = Point::from_dvec2_rounded(vertex);
                    if points.last() != Some(&point) {
                        points.push(point);
                    }
                    previous = vertex;
                }
            }
            if points.last() != Some(&self.end) {
                points.push(self.end);
            }
            points
        }
    }

    /// 已闭合的多边形，可附带父级摆放；读取时先旋转再平移。
    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    pub struct PolygonShape {
        pub outline: Vec<Point>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        pub holes: Vec<Vec<Point>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub placement: Option<Placement>,
    }

    impl PolygonShape {
        pub fn new(outline: Vec<Point>) -> Self {
            Self {
                outline,
                holes: Vec::new(),
                placement: None,
            }
        }

        pub fn with_placement(outline: Vec<Point>, placement: Placement) -> Self {
            Self {
                outline,
                holes: Vec::new(),
                placement: Some(placement),
            }
        }

        #[inline]
        pub fn place(&self, point: Point) -> Point {
            match &self.placement {
                Some(placement) => placement.apply(point),
                None => point,
            }
        }

        pub fn placed_outline(&self) -> Vec<Point> {
            self.outline.iter().map(|point| self.place(*point)).collect()
        }
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub enum Shape {
        Segment(Segment),
        Arc(Arc),
        Circle(Circle),
        Rectangle(Rectangle),
        Curve(BezierCurve),
        Polygon(PolygonShape),
    }

    /// 轮廓层上的图元：公共的图层字段加上具体形状。
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Primitive {
        pub layer: String,
        pub shape: Shape,
    }

    impl Primitive {
        pub fn new(layer: impl Into<String>, shape: Shape) -> Self {
            Self {
                layer: layer.into(),
                shape,
            }
        }

        pub fn segment(start: Point, end: Point, layer: impl Into<String>) -> Self {
            Self::new(layer, Shape::Segment(Segment { start, end }))
        }

        pub fn arc(center: Point, start: Point, sweep: f64, layer: impl Into<String>) -> Self {
            Self::new(
                layer,
                Shape::Arc(Arc {
                    center,
                    start,
                    sweep,
                }),
            )
        }

        pub fn circle(center: Point, radius: i64, layer: impl Into<String>) -> Self {
            Self::new(layer, Shape::Circle(Circle { center, radius }))
        }

        pub fn rectangle(start: Point, end: Point, layer: impl Into<String>) -> Self {
            Self::new(layer, Shape::Rectangle(Rectangle { start, end }))
        }

        pub fn curve(
            start: Point,
            control1: Point,
            control2: Point,
            end: Point,
            width: i64,
            layer: impl Into<String>,
        ) -> Self {
            Self::new(
                layer,
                Shape::Curve(BezierCurve::new(start, control1, control2, end, width)),
            )
        }

        pub fn polygon(polygon: PolygonShape, layer: impl Into<String>) -> Self {
            Self::new(layer, Shape::Polygon(polygon))
        }

        #[inline]
        pub fn layer_name(&self) -> &str {
            &self.layer
        }

        pub fn kind(&self) -> ShapeKind {
            match &self.shape {
                Shape::Segment(_) => ShapeKind::Segment,
                Shape::Arc(_) => ShapeKind::Arc,
                Shape::Circle(_) => ShapeKind::Circle,
                Shape::Rectangle(_) => ShapeKind::Rectangle,
                Shape::Curve(_) => ShapeKind::Curve,
                Shape::Polygon(_) => ShapeKind::Polygon,
            }
        }

        /// 名义位置，用于错误报告中的标记坐标。
        pub fn position(&self) -> Point {
            match &self.shape {
                Shape::Segment(segment) => segment.start,
                Shape::Arc(arc) => arc.center,
                Shape::Circle(circle) => circle.center,
                Shape::Rectangle(rect) => rect.start,
                Shape::Curve(curve) => curve.start(),
                Shape::Polygon(polygon) => match polygon.outline.first() {
                    Some(first) => polygon.place(*first),
                    None => polygon
                        .placement
                        .map(|placement| Point::new(0, 0).translate(placement.offset))
                        .unwrap_or(Point::new(0, 0)),
                },
            }
        }

        /// 最近端点搜索时参考的两个点。闭合图形也会给出名义端点，
        /// 因此可能在串接过程中被选中并报告为不支持。
        pub fn endpoints(&self) -> (Point, Point) {
            match &self.shape {
                Shape::Segment(segment) => (segment.start, segment.end),
                Shape::Arc(arc) => (arc.start, arc.end()),
                Shape::Circle(circle) => (circle.center, circle.rim_point()),
                Shape::Rectangle(rect) => (rect.start, rect.end),
                Shape::Curve(curve) => (curve.start(), curve.end()),
                Shape::Polygon(_) => {
                    let position = self.position();
                    (position, position)
                }
            }
        }

        #[inline]
        pub fn start(&self) -> Point {
            self.endpoints().0
        }

        #[inline]
        pub fn end(&self) -> Point {
            self.endpoints().1
        }

        pub fn bounds(&self) -> Bounds {
            let mut bounds = Bounds::empty();
            match &self.shape {
                Shape::Segment(segment) => {
                    bounds.include_point(segment.start);
                    bounds.include_point(segment.end);
                }
                Shape::Arc(arc) => arc_bounds(arc, &mut bounds),
                Shape::Circle(circle) => {
                    let radius = circle.radius.abs();
                    let center = circle.center;
                    bounds.include_point(Point::new(center.x() - radius, center.y() - radius));
                    bounds.include_point(Point::new(center.x() + radius, center.y() + radius));
                }
                Shape::Rectangle(rect) => {
                    bounds.include_point(rect.start);
                    bounds.include_point(rect.end);
                }
                Shape::Curve(curve) => {
                    for point in curve.flattened() {
                        bounds.include_point(*point);
                    }
                }
                Shape::Polygon(polygon) => {
                    for point in polygon.placed_outline() {
                        bounds.include_point(point);
                    }
                }
            }
            bounds
        }
    }

    fn normalize_angle(angle: f64) -> f64 {
        let mut result = angle % TAU;
        if result < 0.0 {
            result += TAU;
        }
        result
    }

    fn arc_bounds(arc: &Arc, bounds: &mut Bounds) {
        let start_point = arc.start;
        let end_point = arc.end();
        bounds.include_point(start_point);
        bounds.include_point(end_point);

        let radius = arc.radius();
        if radius <= f64::EPSILON || arc.sweep == 0.0 {
            return;
        }

        let offset = arc.center.vector_to(arc.start).as_dvec2();
        let start_angle = offset.y.atan2(offset.x);
        let (from, span) = if arc.sweep >= 0.0 {
            (normalize_angle(start_angle), arc.sweep.min(TAU))
        } else {
            (normalize_angle(start_angle + arc.sweep), (-arc.sweep).min(TAU))
        };
        let to = from + span;

        const QUADRANTS: [f64; 4] = [0.0, FRAC_PI_2, PI, FRAC_PI_2 * 3.0];
        for base in QUADRANTS {
            let mut candidate = base;
            while candidate < from {
                candidate += TAU;
            }
            if candidate <= to {
                let point = Point::new(
                    arc.center.x() + (radius * candidate.cos()).round() as i64,
                    arc.center.y() + (radius * candidate.sin()).round() as i64,
                );
                bounds.include_point(point);
            }
        }
    }

}

pub mod polygon {
    use serde::{Deserialize, Serialize};

    use crate::geometry::{Bounds, Point};

    /// 单条轮廓。闭合是隐式的：起点不会在末尾重复出现。
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Contour {
        points: Vec<Point>,
        closed: bool,
    }

    impl Contour {
        pub fn new() -> Self {
            Self {
                points: Vec::new(),
                closed: true,
            }
        }

        pub fn from_points(points: impl IntoIterator<Item = Point>) -> Self {
            let mut contour = Self::new();
            contour.extend(points);
            contour
        }

        /// 追加一个点；与上一个点相同时忽略。
        pub fn push(&mut self, point: Point) {
            if self.points.last() != Some(&point) {
                self.points.push(point);
            }
        }

        pub fn extend(&mut self, points: impl IntoIterator<Item = Point>) {
            for point in points {
                self.push(point);
            }
        }

        /// 闭合时去掉与起点重复的末尾点。
        pub fn close(&mut self) {
            self.closed = true;
            if self.points.len() > 1 && self.points.first() == self.points.last() {
                self.points.pop();
            }
        }

        #[inline]
        pub fn set_closed(&mut self, closed: bool) {
            self.closed = closed;
        }

        #[inline]
        pub fn is_closed(&self) -> bool {
            self.closed
        }

        #[inline]
        pub fn points(&self) -> &[Point] {
            &self.points
        }

        #[inline]
        pub fn len(&self) -> usize {
            self.points.len()
        }

        #[inline]
        pub fn is_empty(&self) -> bool {
            self.points.is_empty()
        }

        #[inline]
        pub fn first(&self) -> Option<Point> {
            self.points.first().copied()
        }

        #[inline]
        pub fn last(&self) -> Option<Point> {
            self.points.last().copied()
        }

        /// 按顺序返回所有边；闭合轮廓包含末点到起点的隐式边。
        pub fn segments(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
            let count = match self.points.len() {
                0 | 1 => 0,
                n if self.closed => n,
                n => n - 1,
            };
            (0..count).map(move |i| (self.points[i], self.points[(i + 1) % self.points.len()]))
        }

        /// 鞋带公式求得的面积（绝对值）。
        pub fn area(&self) -> f64 {
            let n = self.points.len();
            if n < 3 {
                return 0.0;
            }
            let mut twice: i128 = 0;
            for i in 0..n {
                let a = self.points[i];
                let b = self.points[(i + 1) % n];
                twice += a.x() as i128 * b.y() as i128 - b.x() as i128 * a.y() as i128;
            }
            (twice as f64 / 2.0).abs()
        }

        pub fn bounds(&self) -> Bounds {
            let mut bounds = Bounds::empty();
            for point in &self.points {
                bounds.include_point(*point);
            }
            bounds
        }

        /// 奇偶规则判断点是否在轮廓内，落在边上视为在内。
        pub fn contains(&self, point: Point) -> bool {
            let n = self.points.len();
            if n == 0 {
                return false;
            }
            for i in 0..n {
                let a = self.points[i];
                let b = self.points[(i + 1) % n];
                if on_segment(point, a, b) {
                    return true;
                }
            }
            if n < 3 {
                return false;
            }

            let (px, py) = (point.x() as f64, point.y() as f64);
            let mut inside = false;
            let mut j = n - 1;
            for i in 0..n {
                let (xi, yi) = (self.points[i].x() as f64, self.points[i].y() as f64);
                let (xj, yj) = (self.points[j].x() as f64, self.points[j].y() as f64);
                if ((yi > py) != (yj > py)) && (px < (xj - xi) * (py - yi) / (yj - yi) + xi) {
                    inside = !inside;
                }
                j = i;
            }
            inside
        }
    }

    impl Default for Contour {
        fn default() -> Self {
            Self::new()
        }
    }

    fn on_segment(p: Point, a: Point, b: Point) -> bool {
        let cross = (b.x() - a.x()) as i128 * (p.y() - a.y()) as i128
            - (b.y() - a.y()) as i128 * (p.x() - a.x()) as i128;
        cross == 0
            && p.x() >= a.x().min(b.x())
            && p.x() <= a.x().max(b.x())
            && p.y() >= a.y().min(b.y())
            && p.y() <= a.y().max(b.y())
    }

    /// 一个外轮廓及其孔。
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Outline {
        pub contour: Contour,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        pub holes: Vec<Contour>,
    }

    impl Outline {
        pub fn new(contour: Contour) -> Self {
            Self {
                contour,
                holes: Vec::new(),
            }
        }

        pub fn contains(&self, point: Point) -> bool {
            self.contour.contains(point)
                && !self
                    .holes
                    .iter()
                    .any(|hole| hole.contains(point) && !on_contour_edge(hole, point))
        }
    }

    fn on_contour_edge(contour: &Contour, point: Point) -> bool {
        contour
            .segments()
            .any(|(a, b)| on_segment(point, a, b))
    }

    /// 引擎的输出：带孔多边形集合。
    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    pub struct PolygonWithHoles {
        outlines: Vec<Outline>,
    }

    impl PolygonWithHoles {
        pub fn new() -> Self {
            Self::default()
        }

        /// 由四个角点构成的单一矩形外轮廓。
        pub fn rectangle(bounds: &Bounds) -> Self {
            let mut polygon = Self::new();
            polygon.add_outline(Contour::from_points(bounds.corners()));
            polygon
        }

        /// 新增外轮廓，返回其序号。
        pub fn add_outline(&mut self, contour: Contour) -> usize {
            self.outlines.push(Outline::new(contour));
            self.outlines.len() - 1
        }

        /// 为指定外轮廓追加孔；外轮廓不存在时返回 false。
        pub fn add_hole(&mut self, outline: usize, hole: Contour) -> bool {
            match self.outlines.get_mut(outline) {
                Some(target) => {
                    target.holes.push(hole);
                    true
                }
                None => false,
            }
        }

        #[inline]
        pub fn outline_count(&self) -> usize {
            self.outlines.len()
        }

        #[inline]
        pub fn hole_count(&self, outline: usize) -> usize {
            self.outlines.get(outline).map_or(0, |o| o.holes.len())
        }

        #[inline]
        pub fn outline(&self, index: usize) -> Option<&Outline> {
            self.outlines.get(index)
        }

        #[inline]
        pub fn outlines(&self) -> impl Iterator<Item = &Outline> {
            self.outlines.iter()
        }

        #[inline]
        pub fn is_empty(&self) -> bool {
            self.outlines.is_empty()
        }

        /// 依次遍历所有外轮廓与孔。
        pub fn contours(&self) -> impl Iterator<Item = &Contour> {
            self.outlines
                .iter()
                .flat_map(|outline| std::iter::once(&outline.contour).chain(outline.holes.iter()))
        }

        pub fn point_count(&self) -> usize {
            self.contours().map(Contour::len).sum()
        }

        pub fn is_fully_closed(&self) -> bool {
            self.contours().all(Contour::is_closed)
        }

        pub fn contains(&self, point: Point) -> bool {
            self.outlines.iter().any(|outline| outline.contains(point))
        }

        pub fn bounds(&self) -> Bounds {
            let mut bounds = Bounds::empty();
            for outline in &self.outlines {
                bounds.include_bounds(&outline.contour.bounds());
            }
            bounds
        }
    }

}

pub mod document {
    use serde::{Deserialize, Serialize};

    use crate::geometry::{Bounds, Placement, Point};
    use crate::shape::{PolygonShape, Primitive};

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct ItemId(u64);

    impl ItemId {
        #[inline]
        pub fn new(raw: u64) -> Self {
            Self(raw)
        }

        /// 提供原始数值，便于序列化或日志输出。
        #[inline]
        pub fn get(self) -> u64 {
            self.0
        }
    }

    /// 铜皮区域（焊盘或填充），以闭合点环表示。
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct CopperRegion {
        pub layer: String,
        pub outline: Vec<Point>,
    }

    /// 轮廓引擎读取图元的来源。
    pub trait ItemSource {
        /// 指定轮廓层上的全部图元，按存储顺序返回。
        fn outline_primitives(&self, layer: &str) -> Vec<&Primitive>;

        /// 轮廓层图元的包围盒。
        fn edge_bounds(&self, layer: &str) -> Bounds {
            let mut bounds = Bounds::empty();
            for primitive in self.outline_primitives(layer) {
                bounds.include_bounds(&primitive.bounds());
            }
            bounds
        }

        /// 全部条目的包围盒。
        fn item_bounds(&self) -> Bounds;

        /// 铜皮区域的点环。
        fn copper_regions(&self) -> Vec<&[Point]>;
    }

    #[derive(Debug, Default, Clone, Serialize, Deserialize)]
    pub struct Board {
        graphics: Vec<(ItemId, Primitive)>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        copper: Vec<(ItemId, CopperRegion)>,
        next_item_id: u64,
    }

    impl Board {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn add_primitive(&mut self, primitive: Primitive) -> ItemId {
            let id = self.next_id();
            self.graphics.push((id, primitive));
            id
        }

        pub fn add_segment(&mut self, start: Point, end: Point, layer: impl Into<String>) -> ItemId {
            self.add_primitive(Primitive::segment(start, end, layer))
        }

        pub fn add_arc(
            &mut self,
            center: Point,
            start: Point,
            sweep: f64,
            layer: impl Into<String>,
        ) -> ItemId {
            self.add_primitive(Primitive::arc(center, start, sweep, layer))
        }

        pub fn add_circle(&mut self, center: Point, radius: i64, layer: impl Into<String>) -> ItemId {
            self.add_primitive(Primitive::circle(center, radius, layer))
        }

        pub fn add_rectangle(
            &mut self,
            start: Point,
            end: Point,
            layer: impl Into<String>,
        ) -> ItemId {
            self.add_primitive(Primitive::rectangle(start, end, layer))
        }

        pub fn add_curve(
            &mut self,
            start: Point,
            control1: Point,
            control2: Point,
            end: Point,
            width: i64,
            layer: impl Into<String>,
        ) -> ItemId {
            self.add_primitive(Primitive::curve(start, control1, control2, end, width, layer))
        }

        pub fn add_polygon<I>(&mut self, outline: I, layer: impl Into<String>) -> ItemId
        where
            I: IntoIterator<Item = Point>,
        {
            let shape = PolygonShape::new(outline.into_iter().collect());
            self.add_primitive(Primitive::polygon(shape, layer))
        }

        pub fn add_copper_region<I>(&mut self, outline: I, layer: impl Into<String>) -> ItemId
        where
            I: IntoIterator<Item = Point>,
        {
            let id = self.next_id();
            self.copper.push((
                id,
                CopperRegion {
                    layer: layer.into(),
                    outline: outline.into_iter().collect(),
                },
            ));
            id
        }

        #[inline]
        pub fn graphics(&self) -> impl Iterator<Item = &(ItemId, Primitive)> {
            self.graphics.iter()
        }

        #[inline]
        pub fn copper(&self) -> impl Iterator<Item = &(ItemId, CopperRegion)> {
            self.copper.iter()
        }

        pub fn item(&self, id: ItemId) -> Option<&Primitive> {
            self.graphics
                .iter()
                .find_map(|(item_id, primitive)| (*item_id == id).then_some(primitive))
        }

        /// 下一个待分配的条目编号。
        #[inline]
        pub fn next_item_id(&self) -> u64 {
            self.next_item_id
        }

        #[inline]
        fn next_id(&mut self) -> ItemId {
            let id = self.next_item_id;
            self.next_item_id += 1;
            ItemId(id)
        }
    }

    impl ItemSource for Board {
        fn outline_primitives(&self, layer: &str) -> Vec<&Primitive> {
            self.graphics
                .iter()
                .filter(|(_, primitive)| primitive.layer == layer)
                .map(|(_, primitive)| primitive)
                .collect()
        }

        fn item_bounds(&self) -> Bounds {
            let mut bounds = Bounds::empty();
            for (_, primitive) in &self.graphics {
                bounds.include_bounds(&primitive.bounds());
            }
            for (_, region) in &self.copper {
                for point in &region.outline {
                    bounds.include_point(*point);
                }
            }
            bounds
        }

        fn copper_regions(&self) -> Vec<&[Point]> {
            self.copper
                .iter()
                .map(|(_, region)| region.outline.as_slice())
                .collect()
        }
    }

    /// 单个器件：自带摆放，图元与铜皮均为板坐标；多边形图元在读取时应用摆放。
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Footprint {
        pub reference: String,
        pub placement: Placement,
        items: Board,
    }

    impl Footprint {
        pub fn new(reference: impl Into<String>, placement: Placement) -> Self {
            Self {
                reference: reference.into(),
                placement,
                items: Board::new(),
            }
        }

        #[inline]
        pub fn items(&self) -> &Board {
            &self.items
        }

        /// 直接访问条目容器，用于添加不受摆放影响的图元。
        #[inline]
        pub fn items_mut(&mut self) -> &mut Board {
            &mut self.items
        }

        /// 添加以器件局部坐标表示的多边形，读取时按器件摆放变换。
        pub fn add_polygon<I>(&mut self, outline: I, layer: impl Into<String>) -> ItemId
        where
            I: IntoIterator<Item = Point>,
        {
            let shape = PolygonShape::with_placement(outline.into_iter().collect(), self.placement);
            self.items.add_primitive(Primitive::polygon(shape, layer))
        }
    }

    impl ItemSource for Footprint {
        fn outline_primitives(&self, layer: &str) -> Vec<&Primitive> {
            self.items.outline_primitives(layer)
        }

        fn item_bounds(&self) -> Bounds {
            self.items.item_bounds()
        }

        fn copper_regions(&self) -> Vec<&[Point]> {
            self.items.copper_regions()
        }
    }

}
