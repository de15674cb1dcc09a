use edgecut_core::units::iu_to_mm;
use edgecut_engine::Boundary;

use crate::loader::DocumentSource;

/// 打印边界概览：类型、轮廓与孔的数量、点数以及错误报告。
pub fn print_boundary(title: &str, source: &DocumentSource, boundary: &Boundary) {
    let polygon = &boundary.polygon;
    println!("{title}");
    println!("来源：{}", source.describe());
    println!("边界类型：{}", boundary.kind.name());

    let holes: usize = (0..polygon.outline_count())
        .map(|index| polygon.hole_count(index))
        .sum();
    println!(
        "outlines={} holes={} points={}",
        polygon.outline_count(),
        holes,
        polygon.point_count()
    );
    println!(
        "完整：{}",
        if boundary.errors.is_empty() && polygon.is_fully_closed() {
            "是"
        } else {
            "否"
        }
    );

    for (index, outline) in polygon.outlines().enumerate() {
        let bounds = outline.contour.bounds();
        println!(
            "  - 外轮廓 #{index}: 顶点数={}, 孔={}, 范围=({:.3}, {:.3})..({:.3}, {:.3}) mm",
            outline.contour.len(),
            outline.holes.len(),
            iu_to_mm(bounds.min().x()),
            iu_to_mm(bounds.min().y()),
            iu_to_mm(bounds.max().x()),
            iu_to_mm(bounds.max().y())
        );
    }

    if let Some(report) = boundary.report() {
        println!("错误：");
        for line in report.message.lines() {
            println!("  - {line}");
        }
        if let Some(location) = report.location {
            println!(
                "错误位置：({:.4}, {:.4}) mm",
                iu_to_mm(location.x()),
                iu_to_mm(location.y())
            );
        }
    }
}
