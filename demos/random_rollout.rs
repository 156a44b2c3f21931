//! Collect episodes from several environments in parallel with a uniform random policy
//! and write per-episode statistics to CSV.
//!
//! Each worker owns its environment and pattern set outright, seeded from the worker
//! index, so runs are reproducible.

use std::{error::Error, thread};

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use scribe::{
    env::{DiscreteActionSpace, Environment, WritingEnv},
    pattern::{pattern_set, PatternSetConfig},
    util::trailing_mean,
};

const NUM_WORKERS: u64 = 4;
const EPISODES_PER_WORKER: usize = 250;
const MAX_STEPS: u32 = 100;

struct EpisodeStats {
    worker: u64,
    episode: usize,
    ret: f64,
    steps: f64,
    correct: f64,
}

fn run_worker(worker: u64) -> scribe::Result<Vec<EpisodeStats>> {
    let config = PatternSetConfig {
        name: String::from("3x3"),
        rotate: true,
        seed: Some(worker),
        ..Default::default()
    };
    let mut env = WritingEnv::new(pattern_set(&config)?);
    let mut rng = StdRng::seed_from_u64(1000 + worker);
    let actions = env.actions();

    let mut stats = Vec::with_capacity(EPISODES_PER_WORKER);
    for episode in 0..EPISODES_PER_WORKER {
        env.reset()?;
        while env.is_active() && env.steps() < MAX_STEPS {
            let action = *actions.choose(&mut rng).expect("action space is not empty");
            env.step(action)?;
        }

        stats.push(EpisodeStats {
            worker,
            episode,
            ret: env.report["reward"],
            steps: env.report["steps"],
            correct: env.report["correct"],
        });
        env.report.take();
    }

    Ok(stats)
}

fn main() -> Result<(), Box<dyn Error>> {
    let results = thread::scope(|s| {
        let handles: Vec<_> = (0..NUM_WORKERS)
            .map(|worker| s.spawn(move || run_worker(worker)))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("worker panicked"))
            .collect::<Result<Vec<_>, _>>()
    })?;

    let path = std::env::temp_dir().join("scribe_random_rollout.csv");
    let mut wtr = csv::Writer::from_path(&path)?;
    wtr.write_record(["worker", "episode", "return", "steps", "correct"])?;

    let mut returns = Vec::new();
    let mut correct = 0.0;
    for s in results.iter().flatten() {
        wtr.write_record(&[
            s.worker.to_string(),
            s.episode.to_string(),
            s.ret.to_string(),
            s.steps.to_string(),
            s.correct.to_string(),
        ])?;
        returns.push(s.ret);
        correct += s.correct;
    }
    wtr.flush()?;

    println!(
        "{} episodes - Return Moving Avg.: {:.2} - Accuracy: {:.4} - written to {}",
        returns.len(),
        trailing_mean(&returns, 100),
        correct / returns.len() as f64,
        path.display()
    );

    Ok(())
}
