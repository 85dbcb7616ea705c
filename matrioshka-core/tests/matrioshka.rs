//! Matrioshka solves against known results.

use std::collections::HashSet;

use matrioshka_core::{Board, GameState, PieceSet, Record, SearchConfig, Solution, Solver, Value};

fn state(cells: [i8; 9], max: [u8; 3], min: [u8; 3]) -> GameState {
    let max = PieceSet(max);
    let min = PieceSet(min);
    let depth = max.placed() + min.placed();
    GameState::new(Board(cells), max, min, depth).expect("valid position")
}

fn solve(state: GameState) -> (Solution, Solver<GameState>) {
    let mut solver = Solver::new();
    let solution = solver.solve(state).expect("not cancelled");
    (solution, solver)
}

#[test]
fn endgame_win() {
    let (solution, solver) = solve(state([-3, -3, 0, 0, 2, 3, -2, 0, 3], [2, 1, 0], [2, 1, 0]));
    assert_eq!(solution.value, Value::Win);
    assert_eq!(solution.best, Some(Board([-3, -3, 0, 1, 2, 3, -2, 0, 3])));
    assert_eq!(solver.table.len(), 4);
}

#[test]
fn endgame_loss() {
    let (solution, solver) = solve(state([-3, -3, 0, 3, -2, 2, 3, 0, 0], [2, 1, 0], [2, 1, 0]));
    assert_eq!(solution.value, Value::Loss);
    assert_eq!(solution.best, Some(Board([-3, -3, 0, 3, -2, 2, 3, 0, 1])));
    assert_eq!(solver.table.len(), 7);
}

#[test]
fn endgame_draw() {
    let (solution, solver) = solve(state([-3, 0, -3, 0, 2, 0, 3, -2, 3], [2, 1, 0], [2, 1, 0]));
    assert_eq!(solution.value, Value::Draw);
    assert_eq!(solution.best, Some(Board([-3, 0, 3, 2, 2, -2, -3, 0, 3])));
    assert_eq!(solver.table.len(), 23);
}

#[test]
fn middlegame_win() {
    let root = state([-3, 0, 1, 0, 3, 0, 0, -1, 0], [1, 2, 1], [1, 2, 1]);
    assert_eq!(root.board(), Board([-3, 0, 0, 0, 3, -1, 1, 0, 0]));

    let (solution, solver) = solve(root);
    assert_eq!(solution.value, Value::Win);
    assert_eq!(solution.best, Some(Board([-3, 0, 0, 0, 3, -1, 1, 0, 1])));
    assert_eq!(solver.table.len(), 16609);
}

#[test]
fn memoization_is_transparent() {
    for root in [
        state([-3, 0, 1, 0, 3, 0, 0, -1, 0], [1, 2, 1], [1, 2, 1]),
        state([-3, -3, 0, 3, -2, 2, 3, 0, 0], [2, 1, 0], [2, 1, 0]),
        state([-3, 0, -3, 0, 2, 0, 3, -2, 3], [2, 1, 0], [2, 1, 0]),
    ] {
        let memo = Solver::new().solve(root);
        let mut plain = Solver::with_config(SearchConfig { memoize: false });
        assert_eq!(plain.solve(root), memo, "{:?}", root);
        assert!(plain.table.is_empty());
    }
}

#[test]
fn large_center_opening_wins() {
    let root = GameState::start().place(3, 4).unwrap();
    let (solution, solver) = solve(root);
    assert_eq!(solution.value, Value::Win);
    assert_eq!(solution.best, Some(Board([-3, 0, 0, 0, 3, 0, 0, 0, 0])));
    assert_eq!(solver.table.len(), 355_837);

    // One record per canonical position, and only canonical boards stored
    let records = Record::from_table(&solver.table);
    let keys: HashSet<_> = records
        .iter()
        .map(|r| (r.board, r.max_pieces, r.min_pieces))
        .collect();
    assert_eq!(keys.len(), records.len());
    assert!(records.iter().all(|r| r.board.is_canonical() && r.best.is_canonical()));
    assert!(records.iter().all(|r| r.state().is_ok()));
}

#[test]
fn repeated_solves_agree() {
    let root = state([-3, 0, 0, 0, 3, 0, 0, 0, 0], [2, 2, 1], [2, 2, 1]);
    let (first, first_solver) = solve(root);
    let (second, second_solver) = solve(root);
    assert_eq!(first, second);
    assert_eq!(first.value, Value::Win);
    assert_eq!(first.best, Some(Board([-3, 0, 0, 0, 3, 0, 0, 0, 1])));
    assert_eq!(first_solver.table.len(), 135_513);
    assert_eq!(
        Record::from_table(&first_solver.table),
        Record::from_table(&second_solver.table)
    );
}

#[test]
fn best_replies_follow_the_value() {
    let root = state([-3, 0, 1, 0, 3, 0, 0, -1, 0], [1, 2, 1], [1, 2, 1]);
    let (_, solver) = solve(root);

    let line = solver.principal_variation(root);
    assert!(line.len() > 1);
    for pair in line.windows(2) {
        assert!(pair[0].successors().contains(&pair[1]));
    }
    // Every stored position on the line has the root's value
    for position in &line {
        if let Some(entry) = solver.table.get(position) {
            assert_eq!(entry.value, Value::Win);
        }
    }
    // The line ends in A's completed line
    assert_eq!(line.last().unwrap().score().value(), Some(Value::Win));
}

/// Full solve from the empty board: about three million positions.
#[test]
#[ignore] // run manually with: cargo test --release full_solve -- --ignored
fn full_solve() {
    let (solution, solver) = solve(GameState::start());
    assert_eq!(solution.value, Value::Win);
    assert_eq!(solution.best, Some(Board([0, 0, 0, 0, 3, 0, 0, 0, 0])));
    assert_eq!(solver.table.len(), 3_008_206);

    let records = Record::from_table(&solver.table);
    let count = |value| records.iter().filter(|r| r.value == value).count();
    assert_eq!(count(Value::Win), 1_579_909);
    assert_eq!(count(Value::Loss), 1_235_225);
    assert_eq!(count(Value::Draw), 193_072);

    // Only the large center opening wins; small pieces on a corner or edge
    // hold the draw, everything else loses.
    for opening in GameState::start().successors() {
        let entry = solver.table.get(&opening).unwrap();
        let expected = match opening.board().cells().iter().find(|&&c| c != 0) {
            Some(3) if opening.board().get(4) == 3 => Value::Win,
            Some(1) if opening.board().get(4) == 0 => Value::Draw,
            _ => Value::Loss,
        };
        assert_eq!(entry.value, expected, "\n{}", opening.board());
    }
}
