//! `academy` - CLI for the academy attendance kiosk and records
//!
//! This binary clocks students in and out and manages the roster stored in
//! the local academy database.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::{NaiveDate, TimeZone, Utc};
use clap::Parser;

use academy::attendance::AttendanceEngine;
use academy::cli::{
    AttendanceCommand, Cli, Command, ConfigCommand, EnrollCommand, GradesCommand, OutputFormat,
    StudentsCommand,
};
use academy::enrollment::{enroll, NewStudent};
use academy::model::{Address, AttendanceRecord, EmergencyContact, Grade, Program, Student};
use academy::programs::CATALOG;
use academy::stats::DashboardStats;
use academy::store::Backend;
use academy::{auth, init_logging, kiosk, Config, Store, SystemClock};

type AppStore = Store<Box<dyn Backend>>;

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let domain = err.downcast_ref::<academy::Error>();
            if domain.is_some_and(academy::Error::is_auth_error) {
                eprintln!("Login failed: {err:#}");
            } else {
                eprintln!("Error: {err:#}");
                if domain.is_some_and(academy::Error::is_data_error) {
                    eprintln!("The stored records need repair before this can continue.");
                }
            }
            ExitCode::from(domain.map_or(1, academy::Error::exit_code))
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load_from(cli.config.clone()).context("failed to load configuration")?;

    match cli.command {
        Command::Clock(cmd) => handle_clock(&config, &cmd.student_id, cmd.json),
        Command::Status(cmd) => handle_status(&config, cmd.json),
        Command::Students(cmd) => handle_students(&config, cmd),
        Command::Attendance(cmd) => handle_attendance(&config, &cmd),
        Command::Grades(cmd) => handle_grades(&config, &cmd),
        Command::Programs => {
            handle_programs();
            Ok(())
        }
        Command::Login(cmd) => {
            let store = open_store(&config)?;
            let user = auth::login(&store, &config.auth, &cmd.email, &cmd.password)?;
            println!("Signed in as {} ({})", user.name, user.role);
            Ok(())
        }
        Command::Logout => {
            auth::logout(&open_store(&config)?)?;
            println!("Signed out.");
            Ok(())
        }
        Command::Whoami => {
            match open_store(&config)?.current_user()? {
                Some(user) => println!("{} <{}> ({})", user.name, user.email, user.role),
                None => println!("Not signed in."),
            }
            Ok(())
        }
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

fn open_store(config: &Config) -> Result<AppStore> {
    AppStore::from_config(config).with_context(|| {
        format!(
            "failed to open {} store at {}",
            config.storage.backend,
            config.database_path().display()
        )
    })
}

fn handle_clock(config: &Config, student_id: &str, json: bool) -> Result<()> {
    let store = open_store(config)?;
    let engine = AttendanceEngine::new(&store, SystemClock).with_location(config.kiosk.location);
    let outcome = engine.toggle_clock(student_id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        println!("{outcome}");
    }
    Ok(())
}

fn handle_status(config: &Config, json: bool) -> Result<()> {
    let store = open_store(config)?;
    let stats = DashboardStats::collect(&store)?;
    let signed_in = store.current_user()?.map(|u| u.email);
    let size_bytes = store.backend().size_bytes();

    if json {
        let status = serde_json::json!({
            "backend": config.storage.backend,
            "database_path": config.database_path(),
            "database_size_bytes": size_bytes,
            "signed_in": signed_in,
            "stats": stats,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("academy status");
        println!("--------------");
        println!("Backend:          {}", config.storage.backend);
        println!("Database:         {}", config.database_path().display());
        println!("Database size:    {size_bytes} bytes");
        println!("Signed in:        {}", signed_in.as_deref().unwrap_or("-"));
        println!();
        println!("Total students:   {}", stats.total_students);
        println!("Active students:  {}", stats.active_students);
        println!("Hours logged:     {:.2}", stats.total_hours_logged);
        println!("On campus now:    {}", stats.on_campus);
    }
    Ok(())
}

fn handle_students(config: &Config, cmd: StudentsCommand) -> Result<()> {
    let store = open_store(config)?;
    match cmd {
        StudentsCommand::List { format } => {
            let students: Vec<Student> = store.get()?;
            print_students(&students, format)
        }
        StudentsCommand::Search {
            query,
            limit,
            format,
        } => {
            let limit = limit.unwrap_or(config.kiosk.search_limit);
            let hits = kiosk::search_store(&store, &query, limit)?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&hits)?),
                OutputFormat::Plain | OutputFormat::Table => {
                    if hits.is_empty() {
                        println!("No students found matching \"{query}\"");
                    }
                    for hit in hits {
                        let state = if hit.clocked_in { "CLOCKED IN" } else { "CLOCKED OUT" };
                        println!(
                            "{:<24} {:<28} {:<26} {state}",
                            hit.student.id,
                            hit.student.full_name(),
                            hit.student.program.to_string()
                        );
                    }
                }
            }
            Ok(())
        }
        StudentsCommand::Enroll(cmd) => handle_enroll(&store, cmd),
    }
}

fn handle_enroll(store: &AppStore, cmd: EnrollCommand) -> Result<()> {
    let program: Program = cmd.program.parse()?;
    let date_of_birth = cmd
        .date_of_birth
        .as_deref()
        .map(|raw| -> Result<_> {
            let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .with_context(|| format!("invalid date of birth: {raw}"))?;
            let midnight = date
                .and_hms_opt(0, 0, 0)
                .with_context(|| format!("invalid date of birth: {raw}"))?;
            Ok(Utc.from_utc_datetime(&midnight))
        })
        .transpose()?;

    let student = enroll(
        store,
        &SystemClock,
        NewStudent {
            first_name: cmd.first_name,
            last_name: cmd.last_name,
            email: cmd.email,
            phone: cmd.phone,
            date_of_birth,
            address: Address::default(),
            emergency_contact: EmergencyContact::default(),
            program,
        },
    )?;

    println!(
        "{} successfully enrolled in {} ({} hours). Student id: {}",
        student.full_name(),
        student.program,
        student.total_hours_required,
        student.id
    );
    Ok(())
}

fn print_students(students: &[Student], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(students)?),
        OutputFormat::Plain => {
            for s in students {
                println!("{} {}", s.id, s.full_name());
            }
        }
        OutputFormat::Table => {
            println!(
                "{:<24} {:<28} {:<26} {:>10} {:>10} {:>10}",
                "ID", "NAME", "PROGRAM", "HOURS", "REQUIRED", "REMAINING"
            );
            for s in students {
                println!(
                    "{:<24} {:<28} {:<26} {:>10.2} {:>10.0} {:>10.2}",
                    s.id,
                    s.full_name(),
                    s.program.to_string(),
                    s.hours_completed,
                    s.total_hours_required,
                    s.hours_remaining()
                );
            }
        }
    }
    Ok(())
}

fn handle_attendance(config: &Config, cmd: &AttendanceCommand) -> Result<()> {
    let store = open_store(config)?;
    let mut records: Vec<AttendanceRecord> = store.get()?;
    if let Some(student) = &cmd.student {
        records.retain(|r| &r.student_id == student);
    }
    if cmd.open {
        records.retain(AttendanceRecord::is_open);
    }
    records.sort_by_key(|r| r.clock_in);

    match cmd.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&records)?),
        OutputFormat::Plain | OutputFormat::Table => {
            if records.is_empty() {
                println!("No attendance records.");
            }
            for r in &records {
                let clock_out = r
                    .clock_out
                    .map_or_else(|| "(open)".to_string(), |t| t.to_rfc3339());
                println!(
                    "{:<32} {:<24} {} -> {:<25} {:>6.2}h {}",
                    r.id,
                    r.student_id,
                    r.clock_in.to_rfc3339(),
                    clock_out,
                    r.hours_worked,
                    r.location
                );
            }
        }
    }
    Ok(())
}

fn handle_grades(config: &Config, cmd: &GradesCommand) -> Result<()> {
    let store = open_store(config)?;
    let mut grades: Vec<Grade> = store.get()?;
    if let Some(student) = &cmd.student {
        grades.retain(|g| &g.student_id == student);
    }

    match cmd.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&grades)?),
        OutputFormat::Plain | OutputFormat::Table => {
            for g in &grades {
                let percent = g
                    .percentage()
                    .map_or_else(|| "-".to_string(), |p| format!("{p:.0}%"));
                println!(
                    "{:<12} {:<24} {:<28} {:>6}/{:<6} {:>5} {}",
                    g.student_id,
                    g.subject,
                    g.assessment_name,
                    g.score,
                    g.max_score,
                    percent,
                    g.instructor
                );
            }
        }
    }
    Ok(())
}

fn handle_programs() {
    println!("{:<26} {:>6} {:>9}  DESCRIPTION", "PROGRAM", "HOURS", "TUITION");
    for info in &CATALOG {
        println!(
            "{:<26} {:>6} {:>9}  {}",
            info.program.to_string(),
            info.hours,
            format!("${:.0}", info.price),
            info.description
        );
    }
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Backend:            {}", config.storage.backend);
                println!("  Database path:      {}", config.database_path().display());
                println!();
                println!("[Kiosk]");
                println!("  Search limit:       {}", config.kiosk.search_limit);
                println!("  Location:           {}", config.kiosk.location);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
