use std::hint::black_box;
use std::time::Instant;

use glam::DVec3;
use gravsim_common::Body;
use gravsim_kernel::Universe;

fn make_universe(body_count: usize, spacing: f64) -> Universe {
    let mut universe = Universe::new();
    let side = (body_count as f64).cbrt().ceil() as usize;
    for i in 0..body_count {
        let x = (i % side) as f64 * spacing;
        let y = ((i / side) % side) as f64 * spacing;
        let z = (i / (side * side)) as f64 * spacing;
        let body = Body::at(DVec3::new(x, y, z), 1.0, 1.0e12)
            .with_velocity(DVec3::new(0.0, 1.0, 0.0));
        universe
            .add_body(format!("body-{i:05}"), body)
            .expect("generated names are non-empty");
    }
    universe
}

fn bench_step(body_count: usize, iterations: usize) {
    let mut universe = make_universe(body_count, 1000.0);

    let start = Instant::now();
    for _ in 0..iterations {
        black_box(universe.step());
    }
    let elapsed = start.elapsed();
    let per_tick = elapsed / iterations as u32;
    let pairs = body_count * body_count.saturating_sub(1);

    println!(
        "step: bodies={body_count:>5} pairs={pairs:>8} iterations={iterations:>5} per_tick={per_tick:?}"
    );
}

fn main() {
    println!("=== integrator benchmarks ===");
    for (count, iterations) in [(10, 2000), (100, 200), (500, 20), (1000, 5)] {
        bench_step(count, iterations);
    }
}
