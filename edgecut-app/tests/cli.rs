use std::fs;
use std::path::Path;

use assert_cmd::Command;
use edgecut_core::document::{Board, Footprint};
use edgecut_core::geometry::{Placement, Point};
use edgecut_core::units::mm_to_iu;
use edgecut_io::{BoardSaver, JsonFacade};
use predicates::prelude::*;

fn edgecut(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("edgecut").expect("找不到 edgecut 可执行文件");
    cmd.current_dir(dir)
        .env_remove("EDGECUT_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

/// 10 mm 方形板，左边留出 0.005 mm 的缺口。
fn write_gapped_board(path: &Path) {
    let size = mm_to_iu(10.0);
    let gap = mm_to_iu(0.005);
    let mut board = Board::new();
    board.add_segment(Point::new(0, 0), Point::new(size, 0), "Edge.Cuts");
    board.add_segment(Point::new(size, 0), Point::new(size, size), "Edge.Cuts");
    board.add_segment(Point::new(size, size), Point::new(0, size), "Edge.Cuts");
    board.add_segment(Point::new(0, size), Point::new(0, gap), "Edge.Cuts");
    JsonFacade::new().save(&board, path).expect("写入板卡失败");
}

#[test]
fn demo_board_builds_outline() {
    let dir = tempfile::tempdir().expect("创建临时目录失败");
    edgecut(dir.path())
        .arg("--demo")
        .assert()
        .success()
        .stdout(predicate::str::contains("边界类型：outline"))
        .stdout(predicate::str::contains("outlines=1 holes=2"));
}

#[test]
fn gapped_board_falls_back_with_exit_code_two() {
    let dir = tempfile::tempdir().expect("创建临时目录失败");
    let board = dir.path().join("gapped.json");
    write_gapped_board(&board);

    edgecut(dir.path())
        .arg(&board)
        .assert()
        .code(2)
        .stdout(predicate::str::contains("边界类型：fallback"))
        .stdout(predicate::str::contains("unable to find edge"))
        .stdout(predicate::str::contains("错误位置：(0.0000, 0.0000) mm"));
}

#[test]
fn tolerance_override_closes_small_gap() {
    let dir = tempfile::tempdir().expect("创建临时目录失败");
    let board = dir.path().join("gapped.json");
    write_gapped_board(&board);

    edgecut(dir.path())
        .args(["--tolerance-mm", "0.01"])
        .arg(&board)
        .assert()
        .success()
        .stdout(predicate::str::contains("边界类型：outline"))
        .stdout(predicate::str::contains("outlines=1 holes=0 points=4"));
}

#[test]
fn tolerance_from_environment_config() {
    let dir = tempfile::tempdir().expect("创建临时目录失败");
    let board = dir.path().join("gapped.json");
    write_gapped_board(&board);
    let config = dir.path().join("edgecut.toml");
    fs::write(&config, "[outline]\ntolerance_mm = 0.01\n").expect("写入配置失败");

    edgecut(dir.path())
        .env("EDGECUT_CONFIG", &config)
        .arg(&board)
        .assert()
        .success();
}

#[test]
fn part_with_copper_outside_is_inverted() {
    let dir = tempfile::tempdir().expect("创建临时目录失败");
    let path = dir.path().join("part.json");
    let p = |x: f64, y: f64| Point::new(mm_to_iu(x), mm_to_iu(y));

    let mut part = Footprint::new("H1", Placement::identity());
    part.add_polygon([p(4.0, 4.0), p(6.0, 4.0), p(6.0, 6.0), p(4.0, 6.0)], "Edge.Cuts");
    part.items_mut()
        .add_copper_region([p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0)], "F.Cu");
    part.items_mut()
        .add_copper_region([p(9.0, 9.0), p(10.0, 9.0), p(10.0, 10.0)], "F.Cu");
    JsonFacade::new()
        .save_footprint(&part, &path)
        .expect("写入器件失败");

    edgecut(dir.path())
        .arg("--part")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("器件 H1 边界"))
        .stdout(predicate::str::contains("边界类型：inverted"))
        .stdout(predicate::str::contains("outlines=1 holes=1"));
}

#[test]
fn missing_inputs_exit_with_code_one() {
    let dir = tempfile::tempdir().expect("创建临时目录失败");
    edgecut(dir.path())
        .arg(dir.path().join("absent.json"))
        .assert()
        .code(1);

    edgecut(dir.path())
        .args(["--config", "absent.toml", "--demo"])
        .assert()
        .code(1);
}
