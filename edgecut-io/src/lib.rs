use std::fs;
use std::path::Path;

use edgecut_core::document::{Board, Footprint, ItemId};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const BOARD_FORMAT: &str = "edgecut-board";
const FOOTPRINT_FORMAT: &str = "edgecut-footprint";
const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("unsupported feature: {0}")]
    UnsupportedFeature(String),
    #[error("failed to read file {path:?}: {source}")]
    ReadError {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write file {path:?}: {source}")]
    WriteError {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid document structure: {0}")]
    InvalidDocument(String),
}

pub trait BoardLoader {
    fn load(&self, path: &Path) -> Result<Board, IoError>;
}

pub trait BoardSaver {
    fn save(&self, board: &Board, path: &Path) -> Result<(), IoError>;
}

/// 整板文档：`format` 区分整板与单个器件，`version` 用于拒绝未来格式。
#[derive(Debug, Serialize, Deserialize)]
struct BoardFile<B> {
    format: String,
    version: u32,
    board: B,
}

#[derive(Debug, Serialize, Deserialize)]
struct FootprintFile<F> {
    format: String,
    version: u32,
    footprint: F,
}

/// 以 JSON 保存与读取板卡文档。
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonFacade;

impl JsonFacade {
    pub fn new() -> Self {
        Self
    }

    /// 读取单个器件文档。
    pub fn load_footprint(&self, path: &Path) -> Result<Footprint, IoError> {
        let file: FootprintFile<Footprint> = read_json(path)?;
        check_header(&file.format, file.version, FOOTPRINT_FORMAT)?;
        let footprint = file.footprint;
        check_item_ids(footprint.items())?;
        Ok(footprint)
    }

    pub fn save_footprint(&self, footprint: &Footprint, path: &Path) -> Result<(), IoError> {
        write_json(
            path,
            &FootprintFile {
                format: FOOTPRINT_FORMAT.to_string(),
                version: FORMAT_VERSION,
                footprint,
            },
        )
    }
}

impl BoardLoader for JsonFacade {
    fn load(&self, path: &Path) -> Result<Board, IoError> {
        let file: BoardFile<Board> = read_json(path)?;
        check_header(&file.format, file.version, BOARD_FORMAT)?;
        let board = file.board;
        check_item_ids(&board)?;
        Ok(board)
    }
}

impl BoardSaver for JsonFacade {
    fn save(&self, board: &Board, path: &Path) -> Result<(), IoError> {
        write_json(
            path,
            &BoardFile {
                format: BOARD_FORMAT.to_string(),
                version: FORMAT_VERSION,
                board,
            },
        )
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, IoError> {
    let data = fs::read_to_string(path).map_err(|source| IoError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&data).map_err(|err| IoError::InvalidDocument(format!("{path:?}: {err}")))
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), IoError> {
    let data = serde_json::to_string_pretty(value)
        .map_err(|err| IoError::InvalidDocument(err.to_string()))?;
    fs::write(path, data).map_err(|source| IoError::WriteError {
        path: path.to_path_buf(),
        source,
    })
}

fn check_header(format: &str, version: u32, expected: &str) -> Result<(), IoError> {
    if format != expected {
        return Err(IoError::InvalidDocument(format!(
            "expected format {expected}, found {format}"
        )));
    }
    if version > FORMAT_VERSION {
        return Err(IoError::UnsupportedFeature(format!(
            "document version {version} (supported up to {FORMAT_VERSION})"
        )));
    }
    Ok(())
}

/// 条目编号必须唯一，且都小于下一个待分配编号。
fn check_item_ids(board: &Board) -> Result<(), IoError> {
    let next = board.next_item_id();
    let mut seen: Vec<ItemId> = board
        .graphics()
        .map(|(id, _)| *id)
        .chain(board.copper().map(|(id, _)| *id))
        .collect();
    if let Some(id) = seen.iter().find(|id| id.get() >= next) {
        return Err(IoError::InvalidDocument(format!(
            "item id {} is not below next_item_id {next}",
            id.get()
        )));
    }
    seen.sort_by_key(|id| id.get());
    if let Some(pair) = seen.windows(2).find(|pair| pair[0] == pair[1]) {
        return Err(IoError::InvalidDocument(format!(
            "duplicate item id {}",
            pair[0].get()
        )));
    }
    Ok(())
}
