#![allow(dead_code)]

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const HEADER: &str = "age,num_medications,medication_complexity,days_since_start,missed_doses_last_week,snooze_frequency,chronic_conditions,previous_adherence_rate,adherence_rate";

/// One synthetic patient row (features then target): a linear adherence
/// rule plus small noise. Targets are left unclipped so the rule stays
/// linear.
pub fn synthetic_row(rng: &mut StdRng) -> [f64; 9] {
    let age = rng.gen_range(18..=120) as f64;
    let meds = rng.gen_range(1..=20) as f64;
    let complexity = rng.gen_range(1.0..5.0);
    let days = rng.gen_range(0..=3650) as f64;
    let missed = rng.gen_range(0..=50) as f64;
    let snooze = rng.gen_range(0.0..1.0);
    let conditions = rng.gen_range(0..=10) as f64;
    let previous = rng.gen_range(0.0..100.0);

    let target = 75.0 + 0.15 * (age - 18.0)
        - 5.0 * (complexity - 1.0)
        - 1.5 * (meds - 1.0)
        - 0.002 * days
        - 2.0 * missed
        - 15.0 * snooze
        + conditions
        + 0.4 * (previous - 75.0)
        + rng.gen_range(-2.0..2.0);

    [
        age,
        meds,
        complexity,
        days,
        missed,
        snooze,
        conditions,
        previous,
        target,
    ]
}

/// `n` synthetic rows split into feature rows and targets.
pub fn training_rows(n: usize, seed: u64) -> (Vec<[f64; 8]>, Vec<f64>) {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let row = synthetic_row(&mut rng);
            let mut features = [0.0; 8];
            features.copy_from_slice(&row[..8]);
            (features, row[8])
        })
        .unzip()
}

/// Write `n` synthetic rows, blanking one cell in every `gap_every`-th row.
pub fn write_dataset(dir: &Path, n: usize, seed: u64, gap_every: Option<usize>) -> PathBuf {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut csv = String::from(HEADER);
    csv.push('\n');

    for i in 0..n {
        let row = synthetic_row(&mut rng);
        let cells: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(col, v)| match gap_every {
                Some(every) if i % every == 0 && col == i % 9 => String::new(),
                _ => v.to_string(),
            })
            .collect();
        writeln!(csv, "{}", cells.join(",")).unwrap();
    }

    let path = dir.join("adherence_data.csv");
    std::fs::write(&path, csv).unwrap();
    path
}

pub fn write_csv(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}
