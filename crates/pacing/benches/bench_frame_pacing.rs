use std::hint::black_box;
use std::time::{Duration, Instant};

use flythrough_camera::CameraState;
use flythrough_input::{Command, CommandSet};
use flythrough_pacing::{FrameScheduler, FrameTimer};

fn frame_stamps(count: usize, frame_ms: u64) -> Vec<Duration> {
    (0..count as u64)
        .map(|i| Duration::from_millis(i * frame_ms))
        .collect()
}

fn bench_scheduler_tick(frame_ms: u64, iterations: usize) {
    let stamps = frame_stamps(iterations, frame_ms);
    let mut scheduler = FrameScheduler::default();

    let start = Instant::now();
    for &t in &stamps {
        black_box(scheduler.tick(black_box(t)));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  scheduler tick ({frame_ms} ms frames, {iterations} iters): {per_iter:?}/iter, final scale {:.2}",
        scheduler.scale()
    );
}

fn bench_camera_update(active: &[Command], iterations: usize) {
    let inputs: CommandSet = active.iter().copied().collect();
    let mut camera = CameraState::default();

    let start = Instant::now();
    for _ in 0..iterations {
        camera.update(black_box(0.016), black_box(&inputs));
        black_box(camera.derive_vectors());
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  camera update ({} commands, {iterations} iters): {per_iter:?}/iter",
        active.len()
    );
}

fn bench_frame_timer(capacity: usize, iterations: usize) {
    let mut timer = FrameTimer::new(capacity);

    let start = Instant::now();
    for i in 0..iterations {
        timer.record(Duration::from_micros(16_000 + (i % 500) as u64));
        black_box(timer.average());
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!("  frame timer (capacity {capacity}, {iterations} iters): {per_iter:?}/iter");
}

fn main() {
    println!("=== Frame Pacing Benchmarks ===\n");

    println!("Scheduler:");
    bench_scheduler_tick(16, 100_000);
    bench_scheduler_tick(40, 100_000);

    println!("\nCamera:");
    bench_camera_update(&[Command::Forward], 100_000);
    bench_camera_update(
        &[
            Command::Forward,
            Command::Right,
            Command::PitchUp,
            Command::YawLeft,
            Command::RollRight,
        ],
        100_000,
    );

    println!("\nFrame timer:");
    bench_frame_timer(120, 100_000);
    bench_frame_timer(1000, 100_000);

    println!("\n=== Done ===");
}
