#![allow(dead_code)]

use medmind_core::{N_FEATURES, PatientFeatures};
use medmind_model::model::LinearModel;
use medmind_model::{AdherencePipeline, ScalerState};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Noise-free linear adherence rule. Unclipped, so a model fit on it
/// extrapolates outside [0, 100] for extreme patients.
pub fn linear_adherence(p: &PatientFeatures) -> f64 {
    75.0 + 0.15 * (p.age as f64 - 18.0)
        - 5.0 * (p.medication_complexity - 1.0)
        - 1.5 * (p.num_medications as f64 - 1.0)
        - 0.002 * p.days_since_start as f64
        - 2.0 * p.missed_doses_last_week as f64
        - 15.0 * p.snooze_frequency
        + 1.0 * p.chronic_conditions as f64
        + 0.4 * (p.previous_adherence_rate - 75.0)
}

pub fn random_patients(n: usize, seed: u64) -> Vec<PatientFeatures> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| PatientFeatures {
            age: rng.gen_range(18..=120),
            num_medications: rng.gen_range(1..=20),
            medication_complexity: rng.gen_range(1.0..5.0),
            days_since_start: rng.gen_range(0..=3650),
            missed_doses_last_week: rng.gen_range(0..=50),
            snooze_frequency: rng.gen_range(0.0..1.0),
            chronic_conditions: rng.gen_range(0..=10),
            previous_adherence_rate: rng.gen_range(0.0..100.0),
        })
        .collect()
}

pub fn training_set(n: usize, seed: u64) -> (ScalerState, Vec<[f64; N_FEATURES]>, Vec<f64>) {
    let patients = random_patients(n, seed);
    let scaler = ScalerState::fit(&patients).unwrap();
    let x = patients.iter().map(|p| scaler.transform(p)).collect();
    let y = patients.iter().map(linear_adherence).collect();
    (scaler, x, y)
}

pub fn linear_pipeline() -> AdherencePipeline {
    let (scaler, x, y) = training_set(300, 42);
    let model = LinearModel::fit(&x, &y).unwrap();
    AdherencePipeline::new(scaler, Box::new(model))
}

pub fn example_patient() -> PatientFeatures {
    PatientFeatures {
        age: 45,
        num_medications: 3,
        medication_complexity: 2.5,
        days_since_start: 120,
        missed_doses_last_week: 1,
        snooze_frequency: 0.2,
        chronic_conditions: 2,
        previous_adherence_rate: 85.5,
    }
}

/// Valid at the serving boundary, but far below anything the model saw.
pub fn struggling_patient() -> PatientFeatures {
    PatientFeatures {
        age: 0,
        num_medications: 20,
        medication_complexity: 5.0,
        days_since_start: 3650,
        missed_doses_last_week: 50,
        snooze_frequency: 1.0,
        chronic_conditions: 0,
        previous_adherence_rate: 0.0,
    }
}

/// Valid at the serving boundary, linear rule lands above 100.
pub fn model_patient() -> PatientFeatures {
    PatientFeatures {
        age: 120,
        num_medications: 1,
        medication_complexity: 1.0,
        days_since_start: 0,
        missed_doses_last_week: 0,
        snooze_frequency: 0.0,
        chronic_conditions: 10,
        previous_adherence_rate: 100.0,
    }
}
