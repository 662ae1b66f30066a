// RosterSleuth - main.rs
//
// Command-line front end. Handles:
// 1. CLI argument parsing
// 2. Config loading and logging initialisation (debug mode support)
// 3. Caller-side validation of user input
// 4. One roster operation per invocation, loading and saving the roster file

use clap::{Parser, Subcommand, ValueEnum};
use rostersleuth::app::{storage, validate};
use rostersleuth::core::manager::StudentManager;
use rostersleuth::core::model::Student;
use rostersleuth::platform::config::{self, AppConfig, PlatformPaths};
use rostersleuth::util;
use rostersleuth::util::error::{RecordError, Result};
use std::path::{Path, PathBuf};

/// RosterSleuth - student roster with grades, searching, sorting, and CSV files.
#[derive(Parser, Debug)]
#[command(name = "RosterSleuth", version, about)]
struct Cli {
    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug", global = true)]
    debug: bool,

    /// Directory containing config.toml (defaults to the platform config dir).
    #[arg(short = 'c', long = "config", value_name = "DIR", global = true)]
    config_dir: Option<PathBuf>,

    /// Read and write student files in the summary format (no grades).
    #[arg(short = 's', long = "summary", global = true)]
    summary: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the roster, optionally sorted first.
    List {
        file: PathBuf,
        #[arg(long, value_enum)]
        sort: Option<SortKey>,
    },
    /// Look a student up by id (case-insensitive).
    Find {
        file: PathBuf,
        id: String,
        /// Use binary search (sorts the roster by id first).
        #[arg(long)]
        binary: bool,
    },
    /// Add a student; creates the file if it does not exist.
    Add {
        file: PathBuf,
        id: String,
        name: String,
        cgpa: f64,
    },
    /// Change a student's CGPA.
    SetCgpa { file: PathBuf, id: String, cgpa: f64 },
    /// Remove a student (no-op for unknown ids).
    Remove { file: PathBuf, id: String },
    /// Apply an `id,code,name,credits,score` results file to the roster.
    ImportResults { file: PathBuf, results: PathBuf },
    /// Write every recorded score as `id,code,score`.
    ExportResults { file: PathBuf, out: PathBuf },
    /// Mean score for a course.
    Average { file: PathBuf, course: String },
    /// Best student by CGPA or by mean score.
    Top {
        file: PathBuf,
        #[arg(long, value_enum, default_value_t = TopBy::Cgpa)]
        by: TopBy,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SortKey {
    /// Quicksort by name, ascending.
    Name,
    /// Bubble sort by CGPA, descending.
    Cgpa,
    /// Insertion sort by id, ascending.
    Id,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum TopBy {
    Cgpa,
    Score,
}

fn main() {
    let cli = Cli::parse();

    let platform_paths = PlatformPaths::resolve();
    let config_dir = cli
        .config_dir
        .clone()
        .unwrap_or(platform_paths.config_dir);
    let (app_config, config_warnings) = config::load_config(&config_dir);

    util::logging::init(cli.debug, app_config.log_level.as_deref());

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        "RosterSleuth starting"
    );
    for warning in &config_warnings {
        tracing::warn!(error = %warning, "Configuration warning");
    }

    if let Err(e) = run(&cli, &app_config) {
        tracing::error!(error = %e, "Command failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli, app_config: &AppConfig) -> Result<()> {
    let files = RosterFiles {
        summary: cli.summary,
        config: app_config,
    };

    match &cli.command {
        Command::List { file, sort } => {
            let mut roster = files.load(file)?;
            match sort {
                Some(SortKey::Name) => roster.sort_by_name_quick(),
                Some(SortKey::Cgpa) => roster.sort_by_cgpa_bubble_desc(),
                Some(SortKey::Id) => roster.sort_by_id_insertion(),
                None => {}
            }
            for student in roster.iter() {
                print_student(student);
            }
        }
        Command::Find { file, id, binary } => {
            let mut roster = files.load(file)?;
            let found = if *binary {
                roster.binary_search(id)
            } else {
                roster.linear_search(id)
            };
            match found {
                Some(student) => print_student(student),
                None => {
                    return Err(RecordError::NotFound { id: id.clone() }.into());
                }
            }
        }
        Command::Add {
            file,
            id,
            name,
            cgpa,
        } => {
            let cgpa = validate::check_cgpa(*cgpa, app_config.max_cgpa)?;
            let mut roster = if files.resolve(file).exists() {
                files.load(file)?
            } else {
                StudentManager::new()
            };
            roster.add_new_student(id.as_str(), name.as_str(), cgpa)?;
            files.save(&roster, file)?;
            println!("Added {id}");
        }
        Command::SetCgpa { file, id, cgpa } => {
            let cgpa = validate::check_cgpa(*cgpa, app_config.max_cgpa)?;
            let mut roster = files.load(file)?;
            roster.update_student_cgpa(id, cgpa)?;
            files.save(&roster, file)?;
            println!("Updated {id}");
        }
        Command::Remove { file, id } => {
            let mut roster = files.load(file)?;
            match roster.remove_student(id) {
                Some(_) => {
                    files.save(&roster, file)?;
                    println!("Removed {id}");
                }
                None => println!("No student with ID {id}; nothing removed"),
            }
        }
        Command::ImportResults { file, results } => {
            let mut roster = files.load(file)?;
            let applied = storage::load_results(&mut roster, &app_config.resolve_path(results))?;
            files.save(&roster, file)?;
            println!("Applied {applied} results");
        }
        Command::ExportResults { file, out } => {
            let roster = files.load(file)?;
            let written = storage::save_results(&roster, &app_config.resolve_path(out))?;
            println!("Wrote {written} results");
        }
        Command::Average { file, course } => {
            let roster = files.load(file)?;
            println!("{course}: {:.2}", roster.class_average(course)?);
        }
        Command::Top { file, by } => {
            let roster = files.load(file)?;
            let top = match by {
                TopBy::Cgpa => roster.top_performer_by_cgpa(),
                TopBy::Score => roster.top_performer_by_avg_score(),
            };
            match top {
                Some(student) => print_student(student),
                None => println!("Roster is empty"),
            }
        }
    }
    Ok(())
}

/// Student-file access in the dialect selected on the command line.
struct RosterFiles<'a> {
    summary: bool,
    config: &'a AppConfig,
}

impl RosterFiles<'_> {
    fn resolve(&self, file: &Path) -> PathBuf {
        self.config.resolve_path(file)
    }

    fn load(&self, file: &Path) -> Result<StudentManager> {
        let path = self.resolve(file);
        let mut roster = StudentManager::new();
        if self.summary {
            storage::load_students(&mut roster, &path)?;
        } else {
            storage::load_students_full(&mut roster, &path)?;
        }
        Ok(roster)
    }

    fn save(&self, roster: &StudentManager, file: &Path) -> Result<()> {
        let path = self.resolve(file);
        if self.summary {
            storage::save_students(roster, &path)?;
        } else {
            storage::save_students_full(roster, &path)?;
        }
        Ok(())
    }
}

fn print_student(student: &Student) {
    println!("{student}");
    for (code, score) in student.grades() {
        println!("    {code} {} : {score}", student.course_name(code));
    }
}
