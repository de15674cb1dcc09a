use std::f64::consts::FRAC_PI_2;
use std::path::{Path, PathBuf};

use edgecut_core::document::{Board, Footprint};
use edgecut_core::geometry::{Placement, Point, Vector};
use edgecut_core::units::mm_to_iu;
use edgecut_io::{BoardLoader, IoError, JsonFacade};
use tracing::info;

/// 文档来源，便于输出加载信息。
#[derive(Debug, Clone)]
pub enum DocumentSource {
    Json(PathBuf),
    Demo,
}

impl DocumentSource {
    pub fn describe(&self) -> String {
        match self {
            DocumentSource::Json(path) => format!("文件 {}", path.display()),
            DocumentSource::Demo => "内置示例".to_string(),
        }
    }
}

#[derive(Debug)]
pub struct LoadedBoard {
    pub board: Board,
    pub source: DocumentSource,
}

#[derive(Debug)]
pub struct LoadedPart {
    pub footprint: Footprint,
    pub source: DocumentSource,
}

/// 读取整板；未指定路径时构建内置示例。
pub fn load_board(path: Option<&Path>, edge_layer: &str) -> Result<LoadedBoard, IoError> {
    match path {
        Some(path) => {
            let board = JsonFacade::new().load(path)?;
            info!(path = %path.display(), items = board.graphics().count(), "从 JSON 加载板卡成功");
            Ok(LoadedBoard {
                board,
                source: DocumentSource::Json(path.to_path_buf()),
            })
        }
        None => Ok(LoadedBoard {
            board: demo_board(edge_layer),
            source: DocumentSource::Demo,
        }),
    }
}

/// 读取单个器件；未指定路径时构建内置示例。
pub fn load_part(path: Option<&Path>, edge_layer: &str) -> Result<LoadedPart, IoError> {
    match path {
        Some(path) => {
            let footprint = JsonFacade::new().load_footprint(path)?;
            info!(path = %path.display(), reference = %footprint.reference, "从 JSON 加载器件成功");
            Ok(LoadedPart {
                footprint,
                source: DocumentSource::Json(path.to_path_buf()),
            })
        }
        None => Ok(LoadedPart {
            footprint: demo_part(edge_layer),
            source: DocumentSource::Demo,
        }),
    }
}

/// 40 x 30 mm 圆角板：四角 R3 圆弧，一个安装孔与一个矩形开窗。
pub fn demo_board(edge_layer: &str) -> Board {
    let w = mm_to_iu(40.0);
    let h = mm_to_iu(30.0);
    let r = mm_to_iu(3.0);
    let p = Point::new;

    let mut board = Board::new();
    board.add_segment(p(r, 0), p(w - r, 0), edge_layer);
    board.add_arc(p(w - r, r), p(w - r, 0), FRAC_PI_2, edge_layer);
    board.add_segment(p(w, r), p(w, h - r), edge_layer);
    board.add_arc(p(w - r, h - r), p(w, h - r), FRAC_PI_2, edge_layer);
    board.add_segment(p(w - r, h), p(r, h), edge_layer);
    board.add_arc(p(r, h - r), p(r, h), FRAC_PI_2, edge_layer);
    board.add_segment(p(0, h - r), p(0, r), edge_layer);
    board.add_arc(p(r, r), p(0, r), FRAC_PI_2, edge_layer);

    board.add_circle(p(mm_to_iu(6.0), mm_to_iu(6.0)), mm_to_iu(1.6), edge_layer);
    board.add_rectangle(
        p(mm_to_iu(20.0), mm_to_iu(10.0)),
        p(mm_to_iu(30.0), mm_to_iu(20.0)),
        edge_layer,
    );

    board.add_circle(p(mm_to_iu(34.0), mm_to_iu(24.0)), mm_to_iu(2.0), "F.SilkS");
    board.add_copper_region(
        [
            p(mm_to_iu(10.0), mm_to_iu(20.0)),
            p(mm_to_iu(14.0), mm_to_iu(20.0)),
            p(mm_to_iu(14.0), mm_to_iu(24.0)),
            p(mm_to_iu(10.0), mm_to_iu(24.0)),
        ],
        "F.Cu",
    );
    board
}

/// 旋转 90° 放置的连接器：轮廓层上为一个缺口多边形，两个焊盘在其内部。
pub fn demo_part(edge_layer: &str) -> Footprint {
    let placement = Placement::new(Vector::new(mm_to_iu(50.0), mm_to_iu(20.0)), FRAC_PI_2);
    let mut footprint = Footprint::new("J1", placement);
    let p = |x: f64, y: f64| Point::new(mm_to_iu(x), mm_to_iu(y));

    footprint.add_polygon(
        [
            p(-4.0, -2.0),
            p(4.0, -2.0),
            p(4.0, 2.0),
            p(1.0, 2.0),
            p(1.0, 1.0),
            p(-1.0, 1.0),
            p(-1.0, 2.0),
            p(-4.0, 2.0),
        ],
        edge_layer,
    );

    // 焊盘直接以板坐标给出。
    for (x, y) in [(49.0, 17.0), (49.0, 23.0)] {
        footprint.items_mut().add_copper_region(
            [
                p(x, y - 0.5),
                p(x + 1.0, y - 0.5),
                p(x + 1.0, y + 0.5),
                p(x, y + 0.5),
            ],
            "F.Cu",
        );
    }
    footprint
}

#[cfg(test)]
mod tests {
    use super::*;
    use edgecut_engine::{BoundaryKind, BoundaryOptions, build_board_boundary, build_part_boundary};

    #[test]
    fn demo_board_builds_outline_with_two_holes() {
        let board = demo_board("Edge.Cuts");
        let boundary = build_board_boundary(&board, &BoundaryOptions::default());
        assert_eq!(boundary.kind, BoundaryKind::Outline, "{:?}", boundary.errors);
        assert_eq!(boundary.polygon.outline_count(), 1);
        assert_eq!(boundary.polygon.hole_count(0), 2);
    }

    #[test]
    fn demo_part_keeps_its_outline() {
        let part = demo_part("Edge.Cuts");
        let boundary = build_part_boundary(&part, &BoundaryOptions::default());
        assert_eq!(boundary.kind, BoundaryKind::Outline, "{:?}", boundary.errors);
        assert_eq!(boundary.polygon.point_count(), 8);
    }
}
