use std::path::PathBuf;

use clap::{Parser, Subcommand};
use eyre::Result;
use tracing_subscriber::EnvFilter;

use medmind_train::training::{DEFAULT_SEED, DEFAULT_TEST_FRACTION};
use medmind_train::{TrainingConfig, batch, run_training};

#[derive(Parser)]
#[command(name = "medmind")]
#[command(about = "Train and run medication adherence models")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train the candidate models and persist the best one
    Train {
        /// Training CSV with the 8 feature columns and `adherence_rate`
        #[arg(long)]
        data: PathBuf,

        /// Directory for the model, scaler and selection report
        #[arg(long, default_value = "models")]
        out_dir: PathBuf,

        /// Seed for the train/test shuffle and the random forest
        #[arg(long, default_value_t = DEFAULT_SEED)]
        seed: u64,

        /// Share of rows held out for testing
        #[arg(long, default_value_t = DEFAULT_TEST_FRACTION)]
        test_fraction: f64,
    },

    /// Predict adherence for every row of a CSV file
    Predict {
        /// Model artifact
        #[arg(long, default_value = "models/model.json")]
        model: PathBuf,

        /// Scaler artifact from the same training run
        #[arg(long, default_value = "models/scaler.json")]
        scaler: PathBuf,

        /// CSV with the 8 feature columns
        #[arg(long)]
        input: PathBuf,

        /// Reject rows outside the serving ranges instead of predicting them
        #[arg(long)]
        strict: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Train {
            data,
            out_dir,
            seed,
            test_fraction,
        } => {
            let config = TrainingConfig {
                seed,
                test_fraction,
                ..TrainingConfig::new(data, out_dir)
            };
            let outcome = run_training(&config)?;
            let winner = outcome.report.winner();
            println!(
                "selected {} (test MSE {:.4}, test R2 {:.4})",
                winner.kind, winner.test.mse, winner.test.r2
            );
            println!("model:     {}", outcome.model_path.display());
            println!("scaler:    {}", outcome.scaler_path.display());
            println!("report:    {}", outcome.report_path.display());
            println!("rationale: {}", outcome.rationale_path.display());
        }
        Commands::Predict {
            model,
            scaler,
            input,
            strict,
        } => {
            for value in batch::predict_file(&model, &scaler, &input, strict)? {
                println!("{value}");
            }
        }
    }

    Ok(())
}
