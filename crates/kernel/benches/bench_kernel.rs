use std::hint::black_box;
use std::time::Instant;

use fieldscape_kernel::FieldKernel;

fn bench_height_grid(segments: usize, iterations: usize) {
    let kernel = FieldKernel::default();
    let side = segments + 1;
    let step = 20.0 / segments as f32;

    let start = Instant::now();
    let mut acc = 0.0f32;
    for frame in 0..iterations {
        let t = frame as f32 / 60.0;
        for i in 0..side * side {
            let x = -10.0 + (i % side) as f32 * step;
            let z = -10.0 + (i / side) as f32 * step;
            acc += kernel.height(black_box(x), black_box(z), black_box(t));
        }
    }
    black_box(acc);
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  height grid ({side}x{side} vertices, {iterations} frames): {per_iter:?}/frame, total {elapsed:?}"
    );
}

fn bench_spiral(count: usize, iterations: usize) {
    let kernel = FieldKernel::default();

    let start = Instant::now();
    for frame in 0..iterations {
        let t = frame as f32 / 60.0;
        for i in 0..count {
            let p = kernel.spiral_position(black_box(i), black_box(count), black_box(t));
            let _ = black_box(p.map(|p| kernel.color(p)));
        }
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  spiral + color ({count} particles, {iterations} frames): {per_iter:?}/frame, total {elapsed:?}"
    );
}

fn bench_noise(samples: usize, iterations: usize) {
    let kernel = FieldKernel::default();

    let start = Instant::now();
    let mut acc = 0.0f32;
    for _ in 0..iterations {
        for i in 0..samples {
            acc += kernel.value_noise(black_box(i as f32 * 0.37), black_box(1.0));
        }
    }
    black_box(acc);
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!("  value noise ({samples} samples, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}");
}

fn main() {
    println!("=== Field Kernel Benchmarks ===\n");

    println!("Height field:");
    bench_height_grid(40, 1000);
    bench_height_grid(200, 100);
    bench_height_grid(1000, 10);

    println!("\nSpiral trajectory:");
    bench_spiral(150, 10000);
    bench_spiral(10_000, 100);

    println!("\nValue noise:");
    bench_noise(1000, 1000);

    println!("\n=== Done ===");
}
