use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use edgecut_config::{AppConfig, ConfigError, OutlineConfig};
use edgecut_engine::{
    Boundary, BoundaryOptions, ConvertOptions, build_board_boundary, build_part_boundary,
};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

mod loader;
mod report;

/// 从轮廓层图元重建板框或器件边界。
#[derive(Debug, Parser)]
#[command(name = "edgecut", version)]
struct Args {
    /// 配置文件路径，缺省时按 EDGECUT_CONFIG 与 ./config/default.toml 查找。
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// 覆盖配置中的端点连接容差（毫米）。
    #[arg(long, value_name = "MM")]
    tolerance_mm: Option<f64>,

    /// 将输入视为单个器件文档。
    #[arg(long)]
    part: bool,

    /// 使用内置示例，忽略输入文件。
    #[arg(long, conflicts_with = "file")]
    demo: bool,

    /// JSON 文档路径。
    file: Option<PathBuf>,
}

const EXIT_IO: u8 = 1;
const EXIT_FALLBACK: u8 = 2;

fn main() -> ExitCode {
    let args = Args::parse();

    let config = match load_configuration(args.config.as_ref()) {
        Ok(config) => config,
        Err(err) => {
            init_logging(&AppConfig::default());
            error!(error = %err, "加载指定配置失败");
            return ExitCode::from(EXIT_IO);
        }
    };
    init_logging(&config);
    info!("启动 edgecut");

    let mut outline = config.outline.clone();
    if let Some(tolerance) = args.tolerance_mm {
        outline.tolerance_mm = tolerance;
    }
    let options = boundary_options(&outline);
    let path = if args.demo { None } else { args.file.as_deref() };

    let boundary = if args.part {
        match loader::load_part(path, &options.edge_layer) {
            Ok(loaded) => {
                let boundary = build_part_boundary(&loaded.footprint, &options);
                report::print_boundary(
                    &format!("器件 {} 边界", loaded.footprint.reference),
                    &loaded.source,
                    &boundary,
                );
                boundary
            }
            Err(err) => {
                error!(error = %err, "读取器件文档失败");
                return ExitCode::from(EXIT_IO);
            }
        }
    } else {
        match loader::load_board(path, &options.edge_layer) {
            Ok(loaded) => {
                let boundary = build_board_boundary(&loaded.board, &options);
                report::print_boundary("板框边界", &loaded.source, &boundary);
                boundary
            }
            Err(err) => {
                error!(error = %err, "读取板卡文档失败");
                return ExitCode::from(EXIT_IO);
            }
        }
    };

    exit_code_for(&boundary)
}

fn exit_code_for(boundary: &Boundary) -> ExitCode {
    if boundary.is_fallback() {
        warn!("未能由轮廓层构建边界，已使用包围盒");
        ExitCode::from(EXIT_FALLBACK)
    } else {
        ExitCode::SUCCESS
    }
}

/// 显式指定的配置加载失败时返回错误；自动发现失败时退回默认配置。
fn load_configuration(override_path: Option<&PathBuf>) -> Result<AppConfig, ConfigError> {
    match override_path {
        Some(path) => AppConfig::from_file(path),
        None => match AppConfig::discover() {
            Ok(cfg) => Ok(cfg),
            Err(err) => {
                match &err {
                    ConfigError::Io { path, .. } | ConfigError::Parse { path, .. } => {
                        eprintln!("加载默认配置 {} 失败，使用内建默认值: {err}", path.display());
                    }
                    ConfigError::Context { .. } => {
                        eprintln!("加载默认配置失败，使用内建默认值: {err}");
                    }
                }
                Ok(AppConfig::default())
            }
        },
    }
}

fn boundary_options(config: &OutlineConfig) -> BoundaryOptions {
    BoundaryOptions {
        edge_layer: config.edge_layer.clone(),
        convert: ConvertOptions {
            tolerance: config.tolerance_iu(),
            chord_error: config.chord_error_iu(),
            allow_reverse_duplicates: config.allow_reverse_duplicates,
        },
        fallback_margin: config.fallback_margin_iu(),
    }
}

fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_new(config.logging.level.clone()).unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt().with_env_filter(filter);
    if subscriber.try_init().is_err() {
        // 已初始化，忽略
    }
}
