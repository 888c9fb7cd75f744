//! Basic adaptive EWMA monitoring example

use nalgebra::{DMatrix, DVector};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, StandardNormal};
use robust_control::{
    ChartParameters, ChartProperties, EwmaChart, OnlineMonitor, PhaseOneOptions, ScoreFunction,
    SimulationConfig,
};

fn normal_rows(n: usize, p: usize, rng: &mut ChaCha8Rng) -> DMatrix<f64> {
    DMatrix::from_fn(n, p, |_, _| StandardNormal.sample(rng))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Adaptive EWMA Control Chart ===\n");
    let mut rng = ChaCha8Rng::seed_from_u64(2024);

    // Phase I: five in-control sequences of 200 rows
    println!("1. Phase I fit");
    let x_ic = normal_rows(1000, 3, &mut rng);
    let idx_ic = DVector::from_fn(1000, |i, _| (i / 200) as f64);
    let params = ChartParameters::uniform(3, 0.2, 2.5, ScoreFunction::Huber);
    let chart = EwmaChart::fit(&x_ic, &idx_ic, &params, &PhaseOneOptions::default())?;
    println!("  Statistic: {}", chart.algorithm_name());
    println!("  Components kept: {}", chart.model().components());
    println!("  Control limit: {:.3}", chart.control_limit());

    // Phase II: two sequences, the second shifted by one unit
    println!("\n2. Phase II run lengths");
    let mut x2 = normal_rows(200, 3, &mut rng);
    for r in 100..200 {
        for c in 0..3 {
            x2[(r, c)] += 1.0;
        }
    }
    let idx2 = DVector::from_fn(200, |i, _| if i < 100 { 0.0 } else { 1.0 });
    let result = chart.run_length(&x2, &idx2, &x_ic, &idx_ic)?;
    print!("{result}");

    // Online monitoring of a stream that drifts after 50 rows
    println!("\n3. Online monitoring");
    let mut monitor = chart.online();
    let stream: Vec<DVector<f64>> = (0..150)
        .map(|t| {
            let drift = if t < 50 { 0.0 } else { 0.03 * (t - 50) as f64 };
            DVector::from_fn(3, |_, _| { let z: f64 = StandardNormal.sample(&mut rng); z + drift })
        })
        .collect();
    match monitor.run_until_signal(&stream)? {
        Some(rl) => println!("  Signal after {rl} observations"),
        None => println!("  No signal in {} observations", stream.len()),
    }

    // Monte Carlo ARL, in control and under a shift
    println!("\n4. Simulated average run length");
    let config = SimulationConfig::default()
        .with_replicates(200)
        .with_warmup(50)
        .with_max_length(1000)
        .with_seed(7);
    for shift in [0.0, 0.5, 1.0] {
        let config = config.clone().with_shift(vec![shift; 3]);
        let summary = chart.simulate(&x_ic, &config)?.summary();
        println!(
            "  shift {:.1}: ARL {:.1}, SDRL {:.1}, censored {}",
            shift, summary.arl, summary.sdrl, summary.censored
        );
    }

    Ok(())
}
