//! SQLite tablebase built from a solution dump.
//!
//! One row per stored position, keyed by its canonical board and both
//! inventories packed into integers:
//! - board: base-7 digits `cell + 3`, cell 0 least significant
//! - pieces: base-3 digits, size 1 least significant

use rusqlite::{params, Connection, OptionalExtension};
use thiserror::Error;

use matrioshka_core::board::CELLS;
use matrioshka_core::{Board, GameState, PieceSet, Record, Value};

#[derive(Error, Debug)]
pub enum TablebaseError {
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("stored {field} {raw} is out of range")]
    Corrupt { field: &'static str, raw: i64 },
}

pub fn board_code(board: &Board) -> i64 {
    board
        .cells()
        .iter()
        .rev()
        .fold(0, |code, &cell| code * 7 + (cell as i64 + 3))
}

pub fn board_from_code(mut code: i64) -> Result<Board, TablebaseError> {
    let raw = code;
    let mut cells = [0i8; CELLS];
    for cell in cells.iter_mut() {
        *cell = (code % 7) as i8 - 3;
        code /= 7;
    }
    if code != 0 || raw < 0 {
        return Err(TablebaseError::Corrupt { field: "board", raw });
    }
    Ok(Board(cells))
}

pub fn pieces_code(pieces: &PieceSet) -> i64 {
    pieces.0.iter().rev().fold(0, |code, &count| code * 3 + count as i64)
}

/// Create the `positions` table.
pub fn create(conn: &Connection) -> Result<(), TablebaseError> {
    conn.execute(
        "CREATE TABLE positions (
            board INTEGER NOT NULL,
            pieces_a INTEGER NOT NULL,
            pieces_b INTEGER NOT NULL,
            depth INTEGER NOT NULL,
            value INTEGER NOT NULL,
            best INTEGER NOT NULL,
            PRIMARY KEY (board, pieces_a, pieces_b)
        ) WITHOUT ROWID",
        [],
    )?;
    Ok(())
}

/// Insert `records` in one transaction. `progress` is called with the
/// number of rows inserted after every `batch` rows.
pub fn insert(
    conn: &mut Connection,
    records: &[Record],
    batch: usize,
    mut progress: impl FnMut(usize),
) -> Result<usize, TablebaseError> {
    let tx = conn.transaction()?;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO positions (board, pieces_a, pieces_b, depth, value, best)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )?;
        for (i, record) in records.iter().enumerate() {
            stmt.execute(params![
                board_code(&record.board),
                pieces_code(&record.max_pieces),
                pieces_code(&record.min_pieces),
                record.depth(),
                record.value.to_i32(),
                board_code(&record.best),
            ])?;
            if batch > 0 && (i + 1) % batch == 0 {
                progress(i + 1);
            }
        }
    }
    tx.commit()?;
    Ok(records.len())
}

/// Value and best successor board of `state`, if stored.
pub fn lookup(conn: &Connection, state: &GameState) -> Result<Option<(Value, Board)>, TablebaseError> {
    let row: Option<(i64, i64)> = conn
        .query_row(
            "SELECT value, best FROM positions
             WHERE board = ?1 AND pieces_a = ?2 AND pieces_b = ?3",
            params![
                board_code(&state.board()),
                pieces_code(&state.max_pieces()),
                pieces_code(&state.min_pieces()),
            ],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;

    let Some((raw, best)) = row else {
        return Ok(None);
    };
    let value = i32::try_from(raw)
        .ok()
        .and_then(Value::from_i32)
        .ok_or(TablebaseError::Corrupt { field: "value", raw })?;
    Ok(Some((value, board_from_code(best)?)))
}

/// Row count per value, as (wins, draws, losses).
pub fn value_counts(conn: &Connection) -> Result<(u64, u64, u64), TablebaseError> {
    let count = |value: i32| -> Result<u64, TablebaseError> {
        let n: i64 = conn.query_row(
            "SELECT COUNT(*) FROM positions WHERE value = ?1",
            params![value],
            |row| row.get(0),
        )?;
        Ok(n as u64)
    };
    Ok((count(1)?, count(0)?, count(-1)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use matrioshka_core::Solver;

    #[test]
    fn test_board_code_roundtrip() {
        for board in [
            Board::new(),
            Board([-3, -3, -3, -3, -3, -3, -3, -3, -3]),
            Board([3, 3, 3, 3, 3, 3, 3, 3, 3]),
            Board([1, -2, 3, 0, -1, 2, -3, 0, 1]),
        ] {
            assert_eq!(board_from_code(board_code(&board)).unwrap(), board);
        }
        assert_eq!(board_code(&Board([-3, -3, -3, -3, -3, -3, -3, -3, -3])), 0);
        assert_eq!(board_code(&Board([-2, -3, -3, -3, -3, -3, -3, -3, -3])), 1);
        assert!(board_from_code(7i64.pow(9)).is_err());
        assert!(board_from_code(-1).is_err());
    }

    #[test]
    fn test_pieces_code() {
        assert_eq!(pieces_code(&PieceSet([0, 0, 0])), 0);
        assert_eq!(pieces_code(&PieceSet([1, 0, 0])), 1);
        assert_eq!(pieces_code(&PieceSet([0, 0, 1])), 9);
        assert_eq!(pieces_code(&PieceSet::start()), 26);
    }

    #[test]
    fn test_export_and_lookup() {
        let root = GameState::new(
            Board([-3, 0, -3, 0, 2, 0, 3, -2, 3]),
            PieceSet([2, 1, 0]),
            PieceSet([2, 1, 0]),
            6,
        )
        .unwrap();
        let mut solver = Solver::new();
        let solution = solver.solve(root).unwrap();
        let records = Record::from_table(&solver.table);

        let mut conn = Connection::open_in_memory().unwrap();
        create(&conn).unwrap();
        let mut batches = Vec::new();
        let inserted = insert(&mut conn, &records, 10, |n| batches.push(n)).unwrap();
        assert_eq!(inserted, records.len());
        assert_eq!(batches, vec![10, 20]);

        assert_eq!(
            lookup(&conn, &root).unwrap(),
            Some((solution.value, solution.best.unwrap()))
        );
        for record in &records {
            let state = record.state().unwrap();
            assert_eq!(lookup(&conn, &state).unwrap(), Some((record.value, record.best)));
        }
        assert_eq!(lookup(&conn, &GameState::start()).unwrap(), None);

        let (wins, draws, losses) = value_counts(&conn).unwrap();
        assert_eq!((wins + draws + losses) as usize, records.len());
    }

    #[test]
    fn test_duplicate_rows_rejected() {
        let start = GameState::start();
        let record = Record {
            board: start.board(),
            max_pieces: start.max_pieces(),
            min_pieces: start.min_pieces(),
            value: Value::Win,
            best: Board([0, 0, 0, 0, 3, 0, 0, 0, 0]),
        };
        let mut conn = Connection::open_in_memory().unwrap();
        create(&conn).unwrap();
        assert!(insert(&mut conn, &[record, record], 0, |_| {}).is_err());
        // The failed transaction leaves nothing behind
        assert_eq!(value_counts(&conn).unwrap(), (0, 0, 0));
    }
}
