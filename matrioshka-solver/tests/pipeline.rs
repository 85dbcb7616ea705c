//! Solve, dump, reload and verify, as the binaries do.

use std::path::PathBuf;

use matrioshka_core::{Board, GameState, PieceSet, Record, Solver, Value};
use matrioshka_solver::dump::{self, Format};
use matrioshka_solver::verify;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir()
        .join(format!("matrioshka_pipeline_{}", std::process::id()))
        .join(name)
}

fn middlegame() -> GameState {
    GameState::new(
        Board([-3, 0, 1, 0, 3, 0, 0, -1, 0]),
        PieceSet([1, 2, 1]),
        PieceSet([1, 2, 1]),
        4,
    )
    .expect("valid position")
}

fn solve_records(root: GameState) -> Vec<Record> {
    let mut solver = Solver::new();
    solver.solve(root).expect("not cancelled");
    Record::from_table(&solver.table)
}

#[test]
fn binary_dump_survives_reload_and_verification() {
    let records = solve_records(middlegame());
    assert_eq!(records.len(), 16609);

    let path = temp_path("middlegame.dat");
    let summary = dump::save(&path, Format::Bin, &records).unwrap();
    assert_eq!(summary.records, records.len());
    assert_eq!(
        std::fs::metadata(&path).unwrap().len() as usize,
        records.len() * dump::RECORD_SIZE
    );
    assert_eq!(dump::checksum_file(&path).unwrap(), summary.checksum);

    let loaded = dump::load_binary(&path).unwrap();
    assert_eq!(loaded, records);

    let report = verify::check(&loaded);
    assert!(report.is_ok(), "{:?}", &report.problems[..report.problems.len().min(5)]);
    assert_eq!(report.by_depth.keys().next(), Some(&4));
    assert_eq!(loaded[0].value, Value::Win);

    std::fs::remove_file(&path).ok();
}

#[test]
fn identical_solves_write_identical_files() {
    let root = middlegame();
    let first = temp_path("first.dat");
    let second = temp_path("second.dat");

    let a = dump::save(&first, Format::Bin, &solve_records(root)).unwrap();
    let b = dump::save(&second, Format::Bin, &solve_records(root)).unwrap();
    assert_eq!(a, b);
    assert_eq!(std::fs::read(&first).unwrap(), std::fs::read(&second).unwrap());

    std::fs::remove_file(&first).ok();
    std::fs::remove_file(&second).ok();
}

#[test]
fn json_dump_matches_binary_records() {
    let records = solve_records(middlegame());
    let path = temp_path("middlegame.json");
    dump::save(&path, Format::Json, &records).unwrap();

    let file = std::fs::File::open(&path).unwrap();
    let entries = dump::read_json(std::io::BufReader::new(file)).unwrap();
    assert_eq!(entries.len(), records.len());
    for (entry, record) in entries.iter().zip(&records) {
        assert_eq!(entry.0, record.depth());
        assert_eq!(Value::from_i32(entry.1), Some(record.value));
        assert_eq!(entry.2, record.board.0);
        assert_eq!(entry.3, record.best.0);
    }

    std::fs::remove_file(&path).ok();
}
