use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use triage_core::config::data_dir_from_env_value;
use triage_core::constants::ENV_DATA_DIR;
use triage_core::followup::CategoryFlags;
use triage_core::{
    classify, select_follow_up, AssessmentStore, CoreConfig, FollowUp, ProfileForm, Transcript,
};

#[derive(Parser)]
#[command(name = "triage")]
#[command(about = "Patient intake and keyword triage CLI")]
struct Cli {
    /// Directory holding the saved assessment (defaults to $TRIAGE_DATA_DIR or ./triage_data)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a transcript; each argument is one user turn
    Classify {
        #[arg(required = true)]
        turns: Vec<String>,
    },
    /// Show the question the assistant would ask after these turns
    NextQuestion {
        #[arg(required = true)]
        turns: Vec<String>,
        /// Also print which information categories are covered
        #[arg(long)]
        flags: bool,
    },
    /// Validate a patient profile and print it as JSON
    Profile {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        age: String,
        /// male, female or other
        #[arg(long, default_value = "")]
        gender: String,
        #[arg(long, default_value = "")]
        phone: String,
        #[arg(long, default_value = "")]
        address: String,
        #[arg(long, default_value = "")]
        emergency_contact: String,
        #[arg(long, default_value = "")]
        medical_history: String,
        #[arg(long, default_value = "")]
        current_medications: String,
        #[arg(long, default_value = "")]
        allergies: String,
        #[arg(long, default_value_t = 0)]
        previous_visits: u32,
    },
    /// Print the latest saved assessment
    Show,
    /// Remove the latest saved assessment
    Clear,
}

fn store(data_dir: Option<PathBuf>) -> Result<AssessmentStore, Box<dyn std::error::Error>> {
    let data_dir =
        data_dir.unwrap_or_else(|| data_dir_from_env_value(std::env::var(ENV_DATA_DIR).ok()));
    let cfg = CoreConfig::with_data_dir(data_dir)?.without_delays();
    Ok(AssessmentStore::new(Arc::new(cfg)))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    run(Cli::parse())
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Some(Commands::Classify { turns }) => {
            let transcript: Transcript = turns.into_iter().collect();
            let result = classify(&transcript);
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Some(Commands::NextQuestion { turns, flags }) => {
            let transcript: Transcript = turns.into_iter().collect();
            let latest = transcript.last().unwrap_or_default().to_string();

            if flags {
                let flags = CategoryFlags::from_transcript(&transcript);
                println!("{}", serde_json::to_string_pretty(&flags)?);
            }

            match select_follow_up(&latest, &transcript) {
                FollowUp::Ask(question) => println!("{}", question),
                FollowUp::Complete(message) => println!("[complete] {}", message),
            }
        }
        Some(Commands::Profile {
            name,
            age,
            gender,
            phone,
            address,
            emergency_contact,
            medical_history,
            current_medications,
            allergies,
            previous_visits,
        }) => {
            let form = ProfileForm {
                name,
                age,
                gender,
                phone,
                address,
                emergency_contact,
                medical_history,
                current_medications,
                allergies,
                previous_visits,
            };
            match form.validate() {
                Ok(profile) => println!("{}", serde_json::to_string_pretty(&profile)?),
                Err(e) => {
                    eprintln!("{}", e.notice());
                    eprintln!("{}", e);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Show) => match store(cli.data_dir)?.load_latest()? {
            Some(assessment) => {
                println!(
                    "Assessment {} saved {}",
                    assessment.assessment_id,
                    assessment
                        .timestamp
                        .with_timezone(&chrono::Local)
                        .format("%Y-%m-%d %H:%M")
                );
                println!("{}", serde_json::to_string_pretty(&assessment)?);
            }
            None => println!("No saved assessment."),
        },
        Some(Commands::Clear) => {
            if store(cli.data_dir)?.clear()? {
                println!("Cleared saved assessment.");
            } else {
                println!("No saved assessment.");
            }
        }
        None => {
            println!("Use 'triage --help' for commands");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn classify_requires_at_least_one_turn() {
        assert!(Cli::try_parse_from(["triage", "classify"]).is_err());
        assert!(Cli::try_parse_from(["triage", "classify", "chest pain"]).is_ok());
    }

    #[test]
    fn profile_fields_default_to_blank() {
        let cli = Cli::try_parse_from(["triage", "profile", "--name", "Asha"]).unwrap();
        match cli.command {
            Some(Commands::Profile {
                name,
                phone,
                previous_visits,
                ..
            }) => {
                assert_eq!(name, "Asha");
                assert_eq!(phone, "");
                assert_eq!(previous_visits, 0);
            }
            _ => panic!("expected profile command"),
        }
    }

    #[test]
    fn show_fails_on_unreadable_assessment() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let data_dir = temp_dir.path().to_str().unwrap();
        fs::write(temp_dir.path().join("latestAssessment.json"), "not json").unwrap();

        let cli = Cli::try_parse_from(["triage", "--data-dir", data_dir, "show"]).unwrap();
        assert!(run(cli).is_err());
    }

    #[test]
    fn clear_on_empty_store_succeeds() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let data_dir = temp_dir.path().to_str().unwrap();

        let cli = Cli::try_parse_from(["triage", "--data-dir", data_dir, "clear"]).unwrap();
        assert!(run(cli).is_ok());
    }
}
