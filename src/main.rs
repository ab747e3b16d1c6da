//! University CLI - seed and query a departments/students SQLite database

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use university::config;
use university::ui::{self, Icons};
use university::{Session, SqliteStore, StoreOptions};

#[derive(Parser)]
#[command(name = "university")]
#[command(version)]
#[command(about = "Departments and students over a single-file SQLite database")]
#[command(long_about = r#"
With no subcommand, runs the demo: creates university.db if needed, seeds
two departments and three students, and prints what was stored.

Example usage:
  university
  university --database /tmp/campus.db stats
  university students --department 1
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the database file (overrides the config file)
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    /// Path to the config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Emit JSON instead of human-readable output
    #[arg(long, global = true)]
    json: bool,

    /// Do not enforce students.department_id -> departments.id
    #[arg(long, global = true)]
    no_foreign_keys: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed sample rows and print departments, students and one relationship
    Demo,

    /// Create the database file and schema without inserting rows
    Init,

    /// List all departments
    Departments,

    /// List students
    Students {
        /// Only students of this department id
        #[arg(long)]
        department: Option<i64>,
    },

    /// Show row counts
    Stats,

    /// Delete every department and student, keeping the schema
    Reset,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging; stdout is reserved for command output
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    if let Err(e) = run(cli) {
        ui::error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = config::load_config(cli.config.as_deref())
        .context("reading config file")?
        .unwrap_or_default()
        .with_overrides(cli.database.clone(), cli.no_foreign_keys);

    let database = settings.database_path();
    let options = settings.store_options();

    match cli.command.unwrap_or(Commands::Demo) {
        Commands::Demo => {
            let store = open_store(&database, &options)?;
            let mut session = Session::new(store);

            let report = if cli.json {
                let report = university::run_demo(&mut session, &mut std::io::sink())?;
                println!("{}", serde_json::to_string_pretty(&report)?);
                report
            } else {
                university::run_demo(&mut session, &mut std::io::stdout().lock())?
            };
            tracing::info!(
                "demo wrote {} departments, {} students",
                report.departments.len(),
                report.students.len()
            );

            session.close();
        }

        Commands::Init => {
            let store = open_store(&database, &options)?;
            let definitions = store.schema_definitions()?;

            if cli.json {
                let data = serde_json::json!({
                    "database": database.display().to_string(),
                    "schema": definitions,
                });
                println!("{}", serde_json::to_string_pretty(&data)?);
            } else {
                ui::header(Icons::DATABASE, &format!("Database: {}", database.display()));
                ui::section("Schema");
                for sql in &definitions {
                    println!("{}", sql);
                }
                println!();
                ui::success("Schema ready");
            }
        }

        Commands::Departments => {
            let store = open_store(&database, &options)?;
            let departments = store.all_departments()?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&departments)?);
            } else if departments.is_empty() {
                ui::info("Departments", "none");
            } else {
                ui::header(Icons::SCHOOL, "Departments");
                println!("{}", ui::department_table(&departments));
            }
        }

        Commands::Students { department } => {
            let store = open_store(&database, &options)?;
            let students = match department {
                Some(id) => {
                    if store.get_department(id)?.is_none() {
                        ui::warn(&format!("No department with id {}", id));
                    }
                    store.students_in_department(id)?
                }
                None => store.all_students()?,
            };

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&students)?);
            } else if students.is_empty() {
                ui::info("Students", "none");
            } else {
                ui::header(Icons::PERSON, "Students");
                println!("{}", ui::student_table(&students));
            }
        }

        Commands::Stats => {
            let store = open_store(&database, &options)?;
            let stats = store.stats()?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                ui::header(Icons::STATS, &format!("University Statistics ({})", database.display()));
                println!("{}", ui::stats_table(&stats));
                ui::summary_row("Database:", &database.display().to_string());
            }
        }

        Commands::Reset => {
            let store = open_store(&database, &options)?;
            let before = store.stats()?;
            store.clear_all()?;
            tracing::info!("cleared {} departments, {} students", before.departments, before.students);

            if cli.json {
                let data = serde_json::json!({
                    "database": database.display().to_string(),
                    "removed": before,
                });
                println!("{}", serde_json::to_string_pretty(&data)?);
            } else {
                ui::success(&format!(
                    "Removed {} departments and {} students",
                    before.departments, before.students
                ));
            }
        }
    }

    Ok(())
}

fn open_store(database: &Path, options: &StoreOptions) -> anyhow::Result<SqliteStore> {
    config::ensure_db_dir(database)?;
    SqliteStore::open_with(database, options)
        .with_context(|| format!("opening database {}", database.display()))
}
