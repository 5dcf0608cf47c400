//! Performance benchmarks for the state engine

use server::{apply_move, Grid, MoveOutcome, Roster, StateStore};
use shared::Direction;
use std::collections::HashSet;
use std::time::Instant;

fn open_map(width: usize, height: usize) -> Grid {
    let mut text = String::new();
    for y in 0..height {
        for x in 0..width {
            let wall = x == 0 || y == 0 || x == width - 1 || y == height - 1;
            text.push(if wall { '▤' } else { ' ' });
        }
        text.push('\n');
    }
    Grid::parse(&text)
}

/// Benchmarks raw move validation and application
#[test]
fn benchmark_apply_move() {
    let grid = open_map(80, 25);
    let mut roster = Roster::new((2, 12));
    let id = roster.admit(tokio::time::Instant::now());

    let iterations = 100_000;
    let start = Instant::now();

    for sequence in 1..=iterations {
        let direction = if sequence % 2 == 0 {
            Direction::Up
        } else {
            Direction::Down
        };
        let outcome = apply_move(&grid, &mut roster, id, sequence, direction).unwrap();
        assert!(matches!(outcome, MoveOutcome::Applied { .. }));
    }

    let duration = start.elapsed();
    println!(
        "apply_move: {} iterations in {:?} ({:.2} ns/iter)",
        iterations,
        duration,
        duration.as_nanos() as f64 / iterations as f64
    );

    // Should complete in under 1 second
    assert!(duration.as_millis() < 1000);
}

/// Benchmarks occupancy checks with a crowded roster
#[test]
fn benchmark_moves_with_many_participants() {
    let grid = open_map(80, 25);
    let mut roster = Roster::new((1, 1));
    let mut ids = Vec::new();

    // walk each newcomer down and then right until blocked, clearing the spawn cell
    for _ in 0..100 {
        let id = roster.admit(tokio::time::Instant::now());
        let mut sequence = 0;
        for direction in [Direction::Down, Direction::Right] {
            loop {
                sequence += 1;
                if !apply_move(&grid, &mut roster, id, sequence, direction)
                    .unwrap()
                    .success()
                {
                    break;
                }
            }
        }
        assert!(roster.occupant_at(1, 1).is_none());
        ids.push((id, sequence));
    }

    let iterations = 20_000;
    let start = Instant::now();

    for i in 0..iterations {
        let (id, sequence) = &mut ids[i % 100];
        *sequence += 1;
        let direction = [Direction::Up, Direction::Left, Direction::Down, Direction::Right][i % 4];
        let _ = apply_move(&grid, &mut roster, *id, *sequence, direction).unwrap();
    }

    let duration = start.elapsed();
    println!(
        "crowded apply_move: {} iterations in {:?} ({:.2} μs/iter)",
        iterations,
        duration,
        duration.as_micros() as f64 / iterations as f64
    );

    let cells: HashSet<(i32, i32)> = roster.iter().map(|p| (p.x, p.y)).collect();
    assert_eq!(cells.len(), roster.len());

    // Should complete in under 1 second
    assert!(duration.as_millis() < 1000);
}

/// Benchmarks snapshot export of a full map
#[tokio::test]
async fn benchmark_snapshot() {
    let store = StateStore::new(open_map(80, 25), (2, 12));
    for _ in 0..50 {
        store.connect().await;
    }

    let iterations = 1_000;
    let start = Instant::now();

    for _ in 0..iterations {
        let state = store.get_state().await;
        assert_eq!(state.participants.len(), 50);
    }

    let duration = start.elapsed();
    println!(
        "snapshot: {} iterations in {:?} ({:.2} μs/iter)",
        iterations,
        duration,
        duration.as_micros() as f64 / iterations as f64
    );

    // Should complete in under 2 seconds
    assert!(duration.as_millis() < 2000);
}

/// Benchmarks lock contention with concurrent movers
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn benchmark_concurrent_moves() {
    let store = StateStore::new(open_map(80, 25), (2, 12));
    let tasks = 16;
    let moves_per_task = 2_000;

    let start = Instant::now();
    let mut handles = Vec::new();
    for _ in 0..tasks {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            let (id, _) = store.connect().await;
            for sequence in 1..=moves_per_task {
                let direction = match sequence % 4 {
                    0 => Direction::Right,
                    1 => Direction::Down,
                    2 => Direction::Left,
                    _ => Direction::Up,
                };
                store.move_participant(id, sequence, direction).await.unwrap();
            }
        }));
    }

    for handle in handles {
        handle.await.unwrap();
    }

    let duration = start.elapsed();
    println!(
        "concurrent moves: {} in {:?}",
        tasks * moves_per_task,
        duration
    );

    let state = store.get_state().await;
    assert_eq!(state.participants.len(), tasks as usize);

    let mut cells = HashSet::new();
    for p in state.participants.values() {
        assert!(store.grid().is_passable(p.x, p.y));
        // spawn placement is the only way to stack
        if (p.x, p.y) != (2, 12) {
            assert!(cells.insert((p.x, p.y)), "shared cell ({}, {})", p.x, p.y);
        }
    }

    // Should complete in under 2 seconds
    assert!(duration.as_millis() < 2000);
}
