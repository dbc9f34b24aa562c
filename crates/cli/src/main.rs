use clap::{Parser, Subcommand};
use crms_core::{
    core_config_from_lookup, format_patient_context, NewPatient, PatientForm, PatientRecord,
    PatientService, Upload,
};
use crms_files::{extract_text_from_path, inspect_upload};
use crms_llm::OpenAiCompatibleClient;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "crms")]
#[command(about = "Clinical records management CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that a file would be accepted as a medical history upload
    Inspect {
        /// Path to the PDF
        pdf: PathBuf,
        /// Largest accepted upload in bytes
        #[arg(long, default_value_t = crms_files::DEFAULT_MAX_UPLOAD_BYTES)]
        max_bytes: u64,
    },
    /// Print the text extracted from a PDF, one page per line group
    Extract {
        /// Path to the PDF
        pdf: PathBuf,
    },
    /// Summarise a PDF with the configured model (reads GROQ_API_KEY)
    Summarise {
        /// Path to the PDF
        pdf: PathBuf,
    },
    /// Print the assistant context block for a patient whose history is in a PDF
    Context {
        /// Path to the PDF
        pdf: PathBuf,
        /// Patient name
        #[arg(long)]
        name: String,
        /// Patient ID
        #[arg(long)]
        id: String,
        /// Age in years
        #[arg(long, default_value_t = 0)]
        age: u32,
        /// Male, Female or Other
        #[arg(long)]
        gender: String,
        /// Summary text to include (optional)
        #[arg(long)]
        summary: Option<String>,
        /// Current prescription (optional)
        #[arg(long)]
        prescription: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Inspect { pdf, max_bytes }) => {
            let bytes = std::fs::read(&pdf)?;
            match inspect_upload(&file_name(&pdf), &bytes, max_bytes) {
                Ok(meta) => println!(
                    "Accepted {} ({} bytes, {}): {} {}",
                    meta.original_filename,
                    meta.size_bytes,
                    meta.media_type,
                    meta.hash_algorithm,
                    meta.sha256
                ),
                Err(e) => eprintln!("Rejected {}: {}", pdf.display(), e),
            }
        }
        Some(Commands::Extract { pdf }) => match extract_text_from_path(&pdf) {
            Ok(text) => print!("{}", text),
            Err(e) => eprintln!("Error extracting text from PDF: {}", e),
        },
        Some(Commands::Summarise { pdf }) => {
            dotenvy::dotenv().ok();
            let cfg = core_config_from_lookup(|name| std::env::var(name).ok())?;
            let model = OpenAiCompatibleClient::new(cfg.llm().clone())?;
            let service = PatientService::new(Arc::new(cfg), Arc::new(model));

            let text = service.extract_text(std::fs::read(&pdf)?).await?;
            match service.generate_summary(&text).await {
                Ok(summary) => println!("{}", summary),
                Err(e) => eprintln!("{}", e),
            }
        }
        Some(Commands::Context {
            pdf,
            name,
            id,
            age,
            gender,
            summary,
            prescription,
        }) => {
            let form = PatientForm {
                name,
                id,
                age,
                gender,
                history: Some(Upload {
                    filename: file_name(&pdf),
                    bytes: std::fs::read(&pdf)?,
                }),
            };
            let patient = NewPatient::from_form(form)?;
            let text = extract_text_from_path(&pdf)?;
            let mut record = PatientRecord::new(
                &patient,
                text,
                summary.unwrap_or_default(),
                chrono::Local::now().naive_local(),
            );
            record.prescription = prescription;
            print!("{}", format_patient_context(&record));
        }
        None => {
            println!("Use 'crms --help' for commands");
        }
    }

    Ok(())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
