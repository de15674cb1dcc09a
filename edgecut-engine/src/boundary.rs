//! 板框与器件边界的构建：转换轮廓层图元，失败时退回包围盒矩形。

use edgecut_core::document::ItemSource;
use edgecut_core::geometry::{Bounds, Point};
use edgecut_core::polygon::PolygonWithHoles;
use edgecut_core::units::mm_to_iu;
use tracing::{debug, info, warn};

use crate::convert::{ConvertOptions, OutlineConversion, convert_outline_to_polygon_with};
use crate::errors::{ErrorReport, OutlineError};

/// 默认轮廓层名称。
pub const DEFAULT_EDGE_LAYER: &str = "Edge.Cuts";

#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryOptions {
    pub edge_layer: String,
    pub convert: ConvertOptions,
    /// 包围盒退化时的外扩量（内部单位）。
    pub fallback_margin: i64,
}

impl Default for BoundaryOptions {
    fn default() -> Self {
        Self {
            edge_layer: DEFAULT_EDGE_LAYER.to_string(),
            convert: ConvertOptions::default(),
            fallback_margin: mm_to_iu(1.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryKind {
    /// 由轮廓层图元构建。
    Outline,
    /// 铜皮落在构建结果之外：结果为包围盒，原轮廓作为孔。
    Inverted,
    /// 使用包围盒矩形替代。
    Fallback,
}

impl BoundaryKind {
    pub fn name(self) -> &'static str {
        match self {
            BoundaryKind::Outline => "outline",
            BoundaryKind::Inverted => "inverted",
            BoundaryKind::Fallback => "fallback",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Boundary {
    pub polygon: PolygonWithHoles,
    pub kind: BoundaryKind,
    pub errors: Vec<OutlineError>,
}

impl Boundary {
    pub fn report(&self) -> Option<ErrorReport> {
        ErrorReport::from_errors(&self.errors)
    }

    #[inline]
    pub fn is_fallback(&self) -> bool {
        self.kind == BoundaryKind::Fallback
    }
}

/// 构建整板边界。轮廓层为空、转换失败或没有得到外轮廓时使用退化矩形，从不失败。
pub fn build_board_boundary<S>(source: &S, options: &BoundaryOptions) -> Boundary
where
    S: ItemSource + ?Sized,
{
    let primitives = source.outline_primitives(&options.edge_layer);
    if primitives.is_empty() {
        warn!(layer = %options.edge_layer, "轮廓层没有图元，使用包围盒替代");
        return Boundary {
            polygon: fallback_rectangle(source, &options.edge_layer, options.fallback_margin),
            kind: BoundaryKind::Fallback,
            errors: vec![OutlineError::NoEdges {
                layer: options.edge_layer.clone(),
            }],
        };
    }

    let conversion = convert_outline_to_polygon_with(&primitives, &options.convert);
    if conversion.is_usable() {
        info!(
            outlines = conversion.polygon.outline_count(),
            points = conversion.polygon.point_count(),
            "板框轮廓构建完成"
        );
        return Boundary {
            polygon: conversion.polygon,
            kind: BoundaryKind::Outline,
            errors: conversion.errors,
        };
    }

    warn!(
        errors = conversion.errors.len(),
        "板框轮廓不可用，使用包围盒替代"
    );
    Boundary {
        polygon: fallback_rectangle(source, &options.edge_layer, options.fallback_margin),
        kind: BoundaryKind::Fallback,
        errors: conversion.errors,
    }
}

/// 构建单个器件的边界。
///
/// 成功时检查铜皮：若有铜皮顶点落在结果之外，说明得到的是内孔而非外轮廓，
/// 此时以器件包围盒为外轮廓、原结果全部作为孔。轮廓未闭合时结果与包围盒
/// 合并，即包围盒本身。
pub fn build_part_boundary<S>(source: &S, options: &BoundaryOptions) -> Boundary
where
    S: ItemSource + ?Sized,
{
    let primitives = source.outline_primitives(&options.edge_layer);
    let conversion = convert_outline_to_polygon_with(&primitives, &options.convert);

    if conversion.is_usable() {
        if copper_outside(&conversion.polygon, &source.copper_regions()) {
            debug!("铜皮位于轮廓之外，按内孔处理");
            return Boundary {
                polygon: invert_into_box(source, &conversion, options.fallback_margin),
                kind: BoundaryKind::Inverted,
                errors: conversion.errors,
            };
        }
        return Boundary {
            polygon: conversion.polygon,
            kind: BoundaryKind::Outline,
            errors: conversion.errors,
        };
    }

    let mut errors = conversion.errors;
    if primitives.is_empty() {
        errors.push(OutlineError::NoEdges {
            layer: options.edge_layer.clone(),
        });
    }
    warn!(errors = errors.len(), "器件轮廓不可用，使用包围盒替代");
    Boundary {
        polygon: bounding_box_rectangle(source, options.fallback_margin),
        kind: BoundaryKind::Fallback,
        errors,
    }
}

/// 退化矩形：先取轮廓层包围盒，退化时改用全部条目包围盒，仍退化则外扩 `margin`。
pub fn fallback_rectangle<S>(source: &S, layer: &str, margin: i64) -> PolygonWithHoles
where
    S: ItemSource + ?Sized,
{
    let mut bounds = source.edge_bounds(layer);
    if bounds.is_degenerate() {
        bounds = source.item_bounds();
    }
    PolygonWithHoles::rectangle(&non_degenerate(bounds, margin))
}

/// 仅基于条目包围盒的矩形，用于器件边界。
pub fn bounding_box_rectangle<S>(source: &S, margin: i64) -> PolygonWithHoles
where
    S: ItemSource + ?Sized,
{
    PolygonWithHoles::rectangle(&non_degenerate(source.item_bounds(), margin))
}

fn non_degenerate(bounds: Bounds, margin: i64) -> Bounds {
    if bounds.is_degenerate() {
        warn!(margin, "包围盒退化，按最小外扩量处理");
        bounds.inflate(margin.max(1))
    } else {
        bounds
    }
}

/// 任一铜皮区域存在不在多边形内的顶点时返回 true。
pub fn copper_outside(polygon: &PolygonWithHoles, regions: &[&[Point]]) -> bool {
    regions
        .iter()
        .flat_map(|region| region.iter())
        .any(|point| !polygon.contains(*point))
}

fn invert_into_box<S>(source: &S, conversion: &OutlineConversion, margin: i64) -> PolygonWithHoles
where
    S: ItemSource + ?Sized,
{
    let mut bounds = source.item_bounds();
    bounds.include_bounds(&conversion.polygon.bounds());
    let mut inverted = PolygonWithHoles::rectangle(&non_degenerate(bounds, margin));
    for contour in conversion.polygon.contours() {
        inverted.add_hole(0, contour.clone());
    }
    inverted
}
