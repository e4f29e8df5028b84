/// Next Session: generates the next game setup from the previous one.
///
/// Usage: next_session [--previous <file>] [--out <file>] [--catalog <file>]
///                     [--config <file>] [--seed <n>] [--bots <1|2>]
///                     [--no-hirelings] [--no-landmarks]
///
/// Records ending in `.json` are read and written as JSON, anything else as
/// RON. A missing previous file is treated as the first session ever.

use session_setup::schema::session::{RecordError, SessionRecord};
use session_setup::{Catalog, GenerationConfig, SessionGenerator};
use std::path::Path;
use std::process;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let mut previous_path = None;
    let mut out_path = None;
    let mut catalog_path = None;
    let mut config_path = None;
    let mut seed = None;
    let mut bots = None;
    let mut use_hirelings = true;
    let mut use_landmarks = true;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--previous" if i + 1 < args.len() => {
                i += 1;
                previous_path = Some(args[i].clone());
            }
            "--out" if i + 1 < args.len() => {
                i += 1;
                out_path = Some(args[i].clone());
            }
            "--catalog" if i + 1 < args.len() => {
                i += 1;
                catalog_path = Some(args[i].clone());
            }
            "--config" if i + 1 < args.len() => {
                i += 1;
                config_path = Some(args[i].clone());
            }
            "--seed" if i + 1 < args.len() => {
                i += 1;
                seed = Some(args[i].parse().unwrap_or_else(|_| {
                    eprintln!("Error: --seed must be an unsigned integer");
                    process::exit(1);
                }));
            }
            "--bots" if i + 1 < args.len() => {
                i += 1;
                bots = Some(args[i].parse().unwrap_or_else(|_| {
                    eprintln!("Error: --bots must be 1 or 2");
                    process::exit(1);
                }));
            }
            "--no-hirelings" => use_hirelings = false,
            "--no-landmarks" => use_landmarks = false,
            "--help" | "-h" => {
                print_usage();
                return;
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    let catalog = match catalog_path {
        Some(ref path) => Catalog::load_from_ron(Path::new(path)),
        None => Catalog::root(),
    }
    .unwrap_or_else(|e| {
        eprintln!("Error loading catalog: {}", e);
        process::exit(1);
    });

    let mut config = match config_path {
        Some(ref path) => GenerationConfig::load_from_ron(Path::new(path)).unwrap_or_else(|e| {
            eprintln!("Error loading config '{}': {}", path, e);
            process::exit(1);
        }),
        None => GenerationConfig::default(),
    };
    let hirelings = config.use_hirelings && use_hirelings;
    let landmarks = config.use_landmarks && use_landmarks;
    config = config.with_hirelings(hirelings).with_landmarks(landmarks);
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }
    if let Some(bots) = bots {
        config = config.with_bot_enemies(bots);
    }

    let previous = match previous_path {
        Some(ref path) if Path::new(path).exists() => {
            read_record(Path::new(path)).unwrap_or_else(|e| {
                eprintln!("Error reading previous session '{}': {}", path, e);
                process::exit(1);
            })
        }
        Some(ref path) => {
            println!("No previous session at '{}', starting fresh.", path);
            SessionRecord::empty(config.bot_enemies)
        }
        None => SessionRecord::empty(config.bot_enemies),
    };

    let generator = SessionGenerator::new(&catalog, config);
    let record = generator.generate_seeded(&previous).unwrap_or_else(|e| {
        eprintln!("Error generating session: {}", e);
        process::exit(1);
    });

    println!("{}", record);

    if let Some(ref path) = out_path {
        if let Err(e) = write_record(&record, Path::new(path)) {
            eprintln!("Error writing session to '{}': {}", path, e);
            process::exit(1);
        }
        println!("\nSession saved to '{}'", path);
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some("json")
}

fn read_record(path: &Path) -> Result<SessionRecord, RecordError> {
    if is_json(path) {
        SessionRecord::load_from_json(path)
    } else {
        SessionRecord::load_from_ron(path)
    }
}

fn write_record(record: &SessionRecord, path: &Path) -> Result<(), RecordError> {
    let contents = if is_json(path) {
        record.to_json()?
    } else {
        record.to_ron()?
    };
    std::fs::write(path, contents)?;
    Ok(())
}

fn print_usage() {
    println!("Usage: next_session [--previous <file>] [--out <file>] [--catalog <file>]");
    println!("                    [--config <file>] [--seed <n>] [--bots <1|2>]");
    println!("                    [--no-hirelings] [--no-landmarks]");
}
