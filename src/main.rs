use std::path::PathBuf;
use std::process::ExitCode;
use student_registry::config::{self, AppConfig};
use student_registry::core::db::schema;
use student_registry::repl;
use student_registry::repository::StudentRepository;
use tracing::{error, info};

enum Mode {
    Init(Option<PathBuf>),
    Shell(Option<PathBuf>),
}

fn parse_args(args: &[String]) -> Mode {
    match args.get(1).map(String::as_str) {
        Some("init") => Mode::Init(args.get(2).map(PathBuf::from)),
        Some(path) => Mode::Shell(Some(PathBuf::from(path))),
        None => Mode::Shell(None),
    }
}

fn load(path: Option<&PathBuf>) -> Option<AppConfig> {
    match config::load(path.map(PathBuf::as_path)) {
        Ok(config) => Some(config),
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            eprintln!("{}", e);
            None
        }
    }
}

fn main() -> ExitCode {
    // Logs go to stderr so the shell's output stays clean
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    info!("Starting student-registry...");

    let args: Vec<String> = std::env::args().collect();
    match parse_args(&args) {
        Mode::Init(path) => {
            let Some(config) = load(path.as_ref()) else {
                return ExitCode::FAILURE;
            };
            match schema::initialize(&config.database) {
                Ok(()) => {
                    println!("Database ready at {}", config.database.path.display());
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("Failed to initialize database: {}", e);
                    ExitCode::FAILURE
                }
            }
        }
        Mode::Shell(path) => {
            let Some(config) = load(path.as_ref()) else {
                return ExitCode::FAILURE;
            };
            let repo = StudentRepository::from_config(&config);
            if !repo.ping() {
                eprintln!(
                    "Database connection failed. Check that {} exists (run `student-registry init`).",
                    config.database.path.display()
                );
                return ExitCode::FAILURE;
            }
            match repl::run_repl(&repo) {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    error!("Shell terminated: {}", e);
                    ExitCode::FAILURE
                }
            }
        }
    }
}
