use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;

use sadewa_lib::config::AnalyzerConfig;
use sadewa_lib::models::AnalysisRequest;
use sadewa_lib::pipeline::interaction::AnalysisError;
use sadewa_lib::records::{JsonRecordStore, RecordStore};
use sadewa_lib::{build_analyzer, health, init_tracing};

/// Exit code when the requested patient does not exist.
const EXIT_NOT_FOUND: u8 = 2;

#[derive(Parser)]
#[command(name = "sadewa")]
#[command(about = "Sadewa drug and evidence warning assistant", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check new medications against a patient's record
    Analyze {
        /// Patient identifier, e.g. P001
        patient_id: String,
        /// Medications to prescribe, e.g. "Ibuprofen 400mg"
        #[arg(required = true)]
        medications: Vec<String>,
        /// Free-text clinical notes
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// Send a liveness prompt to the inference service
    Probe,
    /// Report service health
    Health,
    /// List patients, optionally filtered by name
    Patients {
        #[arg(long)]
        search: Option<String>,
    },
    /// Show one patient
    Patient { patient_id: String },
}

fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    let config = match AnalyzerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    match run(cli.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(AnalysisError::PatientNotFound(id)) => {
            eprintln!("Patient {id} not found");
            ExitCode::from(EXIT_NOT_FOUND)
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands, config: &AnalyzerConfig) -> Result<(), AnalysisError> {
    match command {
        Commands::Analyze {
            patient_id,
            medications,
            notes,
        } => {
            let analyzer = build_analyzer(config)?;
            let request = AnalysisRequest {
                patient_id,
                new_medications: medications,
                notes,
            };
            print_json(&analyzer.analyze(&request)?);
        }
        Commands::Probe => {
            let analyzer = build_analyzer(config)?;
            print_json(&analyzer.probe_connection());
        }
        Commands::Health => {
            let analyzer = build_analyzer(config)?;
            print_json(&health::check(analyzer.probe_connection(), &config.llm_model));
        }
        Commands::Patients { search } => {
            let store = JsonRecordStore::new(config.data_dir.clone());
            let patients = match search {
                Some(name) => store.search_patients(&name)?,
                None => store.list_patients()?,
            };
            print_json(&patients);
        }
        Commands::Patient { patient_id } => {
            let store = JsonRecordStore::new(config.data_dir.clone());
            let patient = store
                .find_patient(&patient_id)?
                .ok_or(AnalysisError::PatientNotFound(patient_id))?;
            print_json(&patient);
        }
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("Failed to encode output: {e}"),
    }
}
