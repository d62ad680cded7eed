//! Tests for the match state machine.

use gamerzo::{
    Board, Cell, GameEngine, GameStatus, Mark, MoveError, Position, Transition,
    evaluate_termination,
};

/// Every legal move order that never completes a line before the 9th move.
fn full_orders_without_early_line() -> Vec<Vec<usize>> {
    fn extend(engine: &GameEngine, order: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
        if order.len() == 9 {
            out.push(order.clone());
            return;
        }
        for index in 0..9 {
            let Ok(next) = engine.apply_move(index) else {
                continue;
            };
            order.push(index);
            match next.status() {
                GameStatus::InProgress => extend(&next, order, out),
                _ if order.len() == 9 => out.push(order.clone()),
                _ => {}
            }
            order.pop();
        }
    }

    let mut out = Vec::new();
    extend(&GameEngine::new_game(), &mut Vec::new(), &mut out);
    out
}

#[test]
fn test_repeat_index_is_cell_occupied_and_leaves_board() {
    for index in 0..9 {
        let first = GameEngine::new_game().apply_move(index).expect("Valid move");
        let second = first.apply_move(index);

        let pos = Position::from_index(index).unwrap();
        assert_eq!(second, Err(MoveError::CellOccupied(pos)));
        assert_eq!(first.board().get(pos), Cell::Marked(Mark::X));
        assert_eq!(first.board().filled(), 1);
        assert_eq!(first.turn(), Mark::O);
    }
}

#[test]
fn test_out_of_range() {
    let engine = GameEngine::new_game();
    assert_eq!(engine.apply_move(9), Err(MoveError::OutOfRange(9)));
    assert_eq!(
        engine.apply_move(usize::MAX),
        Err(MoveError::OutOfRange(usize::MAX))
    );
}

#[test]
fn test_full_board_is_never_in_progress() {
    let orders = full_orders_without_early_line();
    assert!(!orders.is_empty());

    for order in orders {
        let engine = GameEngine::replay(&order).expect("Valid replay");
        let line_on_last = engine.board().cells().iter().all(|c| *c != Cell::Empty)
            && gamerzo_tictactoe::rules::check_winner(engine.board()).is_some();

        match engine.status() {
            GameStatus::Draw => assert!(!line_on_last, "order {:?}", order),
            // Only X places a 9th mark.
            GameStatus::WonBy(mark) => assert_eq!(mark, Mark::X, "order {:?}", order),
            GameStatus::InProgress => panic!("Full board still in progress: {:?}", order),
        }
    }
}

#[test]
fn test_draw_scenario() {
    let moves = [0, 4, 8, 1, 7, 6, 2, 5, 3];
    let before_last = GameEngine::replay(&moves[..8]).expect("Valid replay");
    assert_eq!(before_last.status(), GameStatus::InProgress);

    let last = before_last.play(3).expect("Valid move");
    assert_eq!(last.ended(), Some(GameStatus::Draw));
}

#[test]
fn test_diagonal_ends_match_before_board_fills() {
    // X holds 2, 4 and 6 after the 7th move.
    let engine = GameEngine::replay(&[0, 1, 2, 3, 4, 5, 6]).expect("Valid replay");
    assert_eq!(engine.status(), GameStatus::WonBy(Mark::X));

    assert_eq!(engine.apply_move(8), Err(MoveError::GameAlreadyOver));
    assert_eq!(
        GameEngine::replay(&[0, 1, 2, 3, 4, 5, 6, 8, 7]),
        Err(MoveError::GameAlreadyOver)
    );
}

#[test]
fn test_top_row_scenario() {
    let engine = GameEngine::replay(&[0, 4, 1, 5, 2]).expect("Valid replay");

    assert_eq!(engine.status(), GameStatus::WonBy(Mark::X));
    // No flip after the winning move.
    assert_eq!(engine.turn(), Mark::X);
    for index in 0..9 {
        assert_eq!(engine.apply_move(index), Err(MoveError::GameAlreadyOver));
    }
}

#[test]
fn test_line_on_ninth_move_is_win() {
    // X: 0 2 4 7, O: 1 3 5 8, then X takes 6 completing 2-4-6 on a full board.
    let engine = GameEngine::replay(&[0, 1, 2, 3, 4, 5, 7, 8]).expect("Valid replay");
    assert_eq!(engine.status(), GameStatus::InProgress);

    let last = engine.apply_move(6).expect("Valid move");
    assert_eq!(last.board().filled(), 9);
    assert_eq!(last.status(), GameStatus::WonBy(Mark::X));
}

#[test]
fn test_each_line_wins_for_both_marks() {
    let lines = [
        [0, 1, 2],
        [3, 4, 5],
        [6, 7, 8],
        [0, 3, 6],
        [1, 4, 7],
        [2, 5, 8],
        [0, 4, 8],
        [2, 4, 6],
    ];

    for line in lines {
        let filler: Vec<usize> = (0..9).filter(|i| !line.contains(i)).collect();

        // X takes the line, O plays two harmless filler cells.
        let x_order = [line[0], filler[0], line[1], filler[1], line[2]];
        let engine = GameEngine::replay(&x_order).expect("Valid replay");
        assert_eq!(engine.status(), GameStatus::WonBy(Mark::X), "line {:?}", line);

        // O takes the line after X plays three filler cells that avoid a line of their own.
        let x_cells = harmless_triple(&filler);
        let o_order = [x_cells[0], line[0], x_cells[1], line[1], x_cells[2], line[2]];
        let engine = GameEngine::replay(&o_order).expect("Valid replay");
        assert_eq!(engine.status(), GameStatus::WonBy(Mark::O), "line {:?}", line);
    }
}

/// Three cells from `cells` that do not form a line.
fn harmless_triple(cells: &[usize]) -> [usize; 3] {
    for a in 0..cells.len() {
        for b in a + 1..cells.len() {
            for c in b + 1..cells.len() {
                let mut scratch = [Cell::Empty; 9];
                for i in [cells[a], cells[b], cells[c]] {
                    scratch[i] = Cell::Marked(Mark::X);
                }
                if evaluate_termination(&Board::from_cells(scratch)) == GameStatus::InProgress {
                    return [cells[a], cells[b], cells[c]];
                }
            }
        }
    }
    panic!("No harmless triple in {:?}", cells);
}

#[test]
fn test_turn_parity() {
    let order = [4, 0, 8, 2, 1, 7];
    let mut engine = GameEngine::new_game();
    for (n, index) in order.iter().enumerate() {
        let expected = if n % 2 == 0 { Mark::X } else { Mark::O };
        assert_eq!(engine.turn(), expected, "before move {}", n);
        let (xs, os) = (engine.board().count(Mark::X), engine.board().count(Mark::O));
        assert_eq!(xs - os, n % 2, "before move {}", n);
        engine = engine.apply_move(*index).expect("Valid move");
    }
    assert_eq!(engine.status(), GameStatus::InProgress);
    assert_eq!(engine.turn(), Mark::X);
}

#[test]
fn test_board_is_monotonic() {
    let order = [4, 0, 8, 2, 1, 7, 3, 5, 6];
    let mut engine = GameEngine::new_game();
    for index in order {
        let next = engine.apply_move(index).expect("Valid move");
        for (before, after) in engine.board().cells().iter().zip(next.board().cells()) {
            if *before != Cell::Empty {
                assert_eq!(before, after);
            }
        }
        assert_eq!(next.board().filled(), engine.board().filled() + 1);
        engine = next;
    }
}

#[test]
fn test_transition_wraps_engine() {
    let transition = GameEngine::new_game().play(4).expect("Valid move");
    assert!(matches!(transition, Transition::Continued(_)));
    assert_eq!(
        transition.engine().board().get(Position::Center),
        Cell::Marked(Mark::X)
    );
}

#[test]
fn test_reset_after_win() {
    let engine = GameEngine::replay(&[0, 4, 1, 5, 2]).expect("Valid replay");
    let fresh = engine.reset();
    assert_eq!(fresh, GameEngine::new_game());
    assert!(fresh.apply_move(0).is_ok());
}
