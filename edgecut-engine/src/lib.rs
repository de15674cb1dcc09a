pub mod boundary;
pub mod chain;
pub mod convert;
pub mod flatten;
pub mod pool;
pub mod proximity;
pub mod validate;

pub use boundary::{
    Boundary, BoundaryKind, BoundaryOptions, DEFAULT_EDGE_LAYER, bounding_box_rectangle,
    build_board_boundary, build_part_boundary, copper_outside, fallback_rectangle,
};
pub use convert::{
    ConvertOptions, OutlineConversion, convert_outline_to_polygon,
    convert_outline_to_polygon_with,
};
pub use errors::{ErrorReport, OutlineError};

pub mod errors {
    use edgecut_core::geometry::Point;
    use edgecut_core::shape::ShapeKind;
    use edgecut_core::units::iu_to_mm;
    use thiserror::Error;

    fn mm(point: &Point) -> String {
        format!(
            "({:.4}, {:.4}) mm",
            iu_to_mm(point.x()),
            iu_to_mm(point.y())
        )
    }

    #[derive(Debug, Clone, PartialEq, Eq, Error)]
    pub enum OutlineError {
        #[error("unsupported primitive type {kind} inside an outline chain at {}", mm(.location))]
        UnsupportedPrimitive { kind: ShapeKind, location: Point },
        #[error("unable to find edge with an endpoint of {}", mm(.location))]
        UnclosedChain { location: Point },
        #[error("duplicate outline edge at {}", mm(.location))]
        DuplicateEdge { location: Point },
        #[error("outline edges intersect at {}", mm(.location))]
        SelfIntersection { location: Point },
        #[error("no edges found on layer {layer}")]
        NoEdges { layer: String },
    }

    impl OutlineError {
        /// 错误发生的位置，供调用方绘制标记。
        pub fn location(&self) -> Option<Point> {
            match self {
                OutlineError::UnsupportedPrimitive { location, .. }
                | OutlineError::UnclosedChain { location }
                | OutlineError::DuplicateEdge { location }
                | OutlineError::SelfIntersection { location } => Some(*location),
                OutlineError::NoEdges { .. } => None,
            }
        }

        /// 未闭合链只影响单条轮廓，其余错误使整个结果失效。
        pub fn is_fatal(&self) -> bool {
            !matches!(
                self,
                OutlineError::UnclosedChain { .. } | OutlineError::NoEdges { .. }
            )
        }
    }

    /// 面向用户的错误汇总：逐行消息加首个故障坐标。
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct ErrorReport {
        pub message: String,
        pub location: Option<Point>,
    }

    impl ErrorReport {
        pub fn from_errors(errors: &[OutlineError]) -> Option<Self> {
            if errors.is_empty() {
                return None;
            }
            let message = errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("\n");
            let location = errors.iter().find_map(OutlineError::location);
            Some(Self { message, location })
        }
    }

}
