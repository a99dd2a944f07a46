//! Performance benchmarks for the board engine and the authority path

use server::client_manager::ClientManager;
use server::game::GameState;
use server::lifecycle::GameController;
use server::protocol::{decode_intent, handle_intent, Roster};
use shared::{evaluate_win, Board, ClientMessage, WinningLines, MAX_SIDE};
use std::time::Instant;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;

/// Benchmarks win evaluation on a default board with no completed line
#[test]
fn benchmark_win_evaluation() {
    let lines = WinningLines::for_side(5).unwrap();
    let mut board = Board::with_side(5).unwrap();
    // Checkerboard of 1s and 2s with an empty centre: no line is uniform
    for index in (0..25).filter(|&index| index != 12) {
        let (row, column) = (index / 5, index % 5);
        let value = if (row + column) % 2 == 0 { 1 } else { 2 };
        for _ in 0..value {
            board = board.incremented(index).unwrap();
        }
    }

    let iterations = 100_000;
    let start = Instant::now();

    for _ in 0..iterations {
        assert!(evaluate_win(&board, &lines).is_none());
    }

    let duration = start.elapsed();
    println!(
        "Win evaluation (5x5): {} iterations in {:?} ({:.2} ns/iter)",
        iterations,
        duration,
        duration.as_nanos() as f64 / iterations as f64
    );

    // Should complete in under 1 second for 100k iterations
    assert!(duration.as_millis() < 1000);
}

/// Benchmarks win evaluation on the largest supported board
#[test]
fn benchmark_win_evaluation_largest_board() {
    let lines = WinningLines::for_side(MAX_SIDE).unwrap();
    let board = Board::with_side(MAX_SIDE).unwrap();

    let iterations = 10_000;
    let start = Instant::now();

    for _ in 0..iterations {
        assert!(evaluate_win(&board, &lines).is_none());
    }

    let duration = start.elapsed();
    println!(
        "Win evaluation ({}x{}): {} iterations in {:?}",
        MAX_SIDE, MAX_SIDE, iterations, duration
    );

    assert!(duration.as_millis() < 1000);
}

/// Benchmarks intent decoding and handling for a long game
#[test]
fn benchmark_intent_pipeline() {
    let lines = WinningLines::for_side(5).unwrap();
    let roster = Roster {
        both_roles_filled: true,
    };
    let mut state = GameState::new(5).unwrap().started();

    // Cycling through the cells completes a row quickly; restart each time
    let iterations = 50_000;
    let start = Instant::now();

    for i in 0..iterations {
        let json = format!(r#"{{"type":"INCREMENT","square":{}}}"#, i % 25);
        let intent = decode_intent(&json).unwrap();
        let transition = handle_intent(&state, &lines, roster, intent);
        state = transition.state;
        if state.is_over() {
            state = handle_intent(&state, &lines, roster, ClientMessage::Reset).state;
        }
    }

    let duration = start.elapsed();
    println!(
        "Intent pipeline: {} intents in {:?} ({:.2} μs/intent)",
        iterations,
        duration,
        duration.as_micros() as f64 / iterations as f64
    );

    assert!(duration.as_secs() < 5);
}

/// Benchmarks registry admission and release churn
#[test]
fn benchmark_registry_churn() {
    let addr = "127.0.0.1:9000".parse().unwrap();
    let mut manager = ClientManager::new();

    let iterations = 20_000;
    let start = Instant::now();

    for _ in 0..iterations {
        let (tx, _rx) = mpsc::channel(1);
        let id = manager.allocate_id();
        manager.admit(id, addr, tx).unwrap();
        manager.release(id);
    }

    let duration = start.elapsed();
    println!("Registry churn: {} cycles in {:?}", iterations, duration);

    assert!(manager.is_empty());
    assert!(duration.as_millis() < 2000);
}

/// Benchmarks the full authority path including event fan-out
#[test]
fn benchmark_controller_fan_out() {
    let addr = "127.0.0.1:9000".parse().unwrap();
    let mut controller = GameController::new(5).unwrap();
    let (tx1, mut rx1) = mpsc::channel(1024);
    let (tx2, mut rx2) = mpsc::channel(1024);
    let odd = controller.on_connect(addr, tx1).unwrap();
    controller.on_connect(addr, tx2).unwrap();

    let iterations = 10_000;
    let start = Instant::now();

    for i in 0..iterations {
        let frame = format!(r#"{{"type":"INCREMENT","square":{}}}"#, (i * 7) % 25);
        controller.on_message(odd, Message::Text(frame));
        if controller.game().is_over() {
            controller.on_message(
                odd,
                Message::Text(r#"{"type":"RESET"}"#.to_string()),
            );
        }
        while rx1.try_recv().is_ok() {}
        while rx2.try_recv().is_ok() {}
    }

    let duration = start.elapsed();
    println!(
        "Controller fan-out: {} intents in {:?} ({:.2} μs/intent)",
        iterations,
        duration,
        duration.as_micros() as f64 / iterations as f64
    );

    assert!(duration.as_secs() < 5);
}
