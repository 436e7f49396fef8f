use std::hint::black_box;
use std::time::{Duration, Instant};

use arena_overlay::{BackgroundAnimator, BackgroundGrid, InMemoryOverlay, OverlayConfig};

fn bench_rebuild(columns: u32, rows: u32, iterations: usize) {
    let config = OverlayConfig {
        columns,
        rows,
        ..OverlayConfig::default()
    };
    let mut animator = BackgroundAnimator::new(Some(InMemoryOverlay::new()), config);

    let start = Instant::now();
    for i in 0..iterations {
        // Alternate sizes so every pass really resizes the cells.
        let width = 1000 + (i % 2) as u32 * 280;
        let _ = black_box(animator.rebuild(columns, rows, black_box(width), 800));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  rebuild ({columns}x{rows}, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn bench_stagger(columns: u32, rows: u32, iterations: usize) {
    let grid = match BackgroundGrid::compute(columns, rows, 1920, 1080) {
        Ok(grid) => grid,
        Err(e) => {
            println!("  stagger ({columns}x{rows}): skipped, {e}");
            return;
        }
    };

    let start = Instant::now();
    for _ in 0..iterations {
        let _ = black_box(grid.stagger_delays(black_box(Duration::from_millis(50))));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  stagger ({columns}x{rows}, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn bench_coalesced_resizes(bursts: usize, burst_len: u32) {
    let mut animator =
        BackgroundAnimator::new(Some(InMemoryOverlay::new()), OverlayConfig::default());

    let start = Instant::now();
    for _ in 0..bursts {
        for step in 0..burst_len {
            animator.request_rebuild(800 + step, 600 + step);
        }
        let _ = black_box(animator.flush());
    }
    let elapsed = start.elapsed();
    println!(
        "  coalesced resizes ({bursts} bursts of {burst_len}): {:?}/burst, total {elapsed:?}",
        elapsed / bursts as u32
    );
}

fn main() {
    println!("=== Overlay Benchmarks ===\n");

    println!("Full rebuild:");
    bench_rebuild(20, 50, 1000);
    bench_rebuild(40, 100, 200);
    bench_rebuild(80, 200, 50);

    println!("\nCenter-out stagger:");
    bench_stagger(20, 50, 10000);
    bench_stagger(80, 200, 1000);

    println!("\nResize bursts:");
    bench_coalesced_resizes(100, 30);

    println!("\n=== Done ===");
}
