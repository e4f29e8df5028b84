/// Catalog Linter: validates a catalog file before it is used for generation.
///
/// Usage: catalog_linter <catalog.ron> [--bots <1|2>]

use session_setup::core::config::MAX_BOT_ENEMIES;
use session_setup::schema::catalog::Catalog;
use session_setup::schema::session::{HIRELING_SLOTS, LANDMARK_SLOTS};
use std::path::Path;
use std::process;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        println!("Usage: catalog_linter <catalog.ron> [--bots <1|2>]");
        process::exit(0);
    }

    let catalog_path = &args[1];
    let mut bots = MAX_BOT_ENEMIES;

    let mut i = 2;
    while i < args.len() {
        if args[i] == "--bots" && i + 1 < args.len() {
            i += 1;
            bots = match args[i].parse() {
                Ok(n) if (1..=MAX_BOT_ENEMIES).contains(&n) => n,
                _ => {
                    eprintln!("Error: --bots must be 1 or 2");
                    process::exit(1);
                }
            };
        }
        i += 1;
    }

    let catalog = match Catalog::load_from_ron(Path::new(catalog_path)) {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("ERROR: Failed to load catalog: {}", e);
            process::exit(1);
        }
    };

    println!(
        "Loaded {} factions, {} maps, {} landmarks",
        catalog.factions.len(),
        catalog.maps.len(),
        catalog.landmarks.len()
    );

    let (errors, warnings) = lint_catalog(&catalog, bots);

    println!("\n=== Catalog Lint Report ===\n");

    if errors.is_empty() && warnings.is_empty() {
        println!("All checks passed!");
    }

    for warning in &warnings {
        println!("WARNING: {}", warning);
    }

    for error in &errors {
        println!("ERROR: {}", error);
    }

    println!(
        "\nSummary: {} errors, {} warnings",
        errors.len(),
        warnings.len()
    );

    if errors.is_empty() {
        process::exit(0);
    } else {
        process::exit(1);
    }
}

/// Checks that can make a generation run fail, reported as errors, plus
/// oddities that are legal but likely mistakes, reported as warnings.
fn lint_catalog(catalog: &Catalog, bots: usize) -> (Vec<String>, Vec<String>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if catalog.player_factions.is_empty() {
        errors.push("no player factions".to_string());
    }
    if catalog.maps.is_empty() {
        errors.push("no maps".to_string());
    }

    // The player may take any bot faction, so one spare is needed.
    let bot_only = catalog
        .bot_factions
        .iter()
        .filter(|id| !catalog.player_factions.contains(id))
        .count();
    let shared = catalog.bot_factions.len() - bot_only;
    let worst_case_bots = catalog.bot_factions.len() - shared.min(1);
    if worst_case_bots < bots {
        errors.push(format!(
            "{} bot slots but only {} bot factions are guaranteed after the player pick",
            bots, worst_case_bots
        ));
    }

    let worst_case_hirelings = catalog.hirelings.len().saturating_sub(1 + bots);
    if worst_case_hirelings < HIRELING_SLOTS {
        errors.push(format!(
            "{} hireling slots but as few as {} hireling factions may remain",
            HIRELING_SLOTS, worst_case_hirelings
        ));
    }

    if catalog.landmarks.len() < LANDMARK_SLOTS {
        errors.push(format!(
            "{} landmark slots but only {} landmarks",
            LANDMARK_SLOTS,
            catalog.landmarks.len()
        ));
    }

    for bot in &catalog.bot_factions {
        if !catalog.player_factions.contains(bot) {
            warnings.push(format!(
                "bot faction {:?} ({}) is not player-eligible",
                bot,
                catalog.faction_name(*bot).unwrap_or("?")
            ));
        }
    }

    for hireling in &catalog.hirelings {
        if hireling.variants[0] == hireling.variants[1] {
            warnings.push(format!(
                "hireling {:?} has identical variants '{}'",
                hireling.faction, hireling.variants[0]
            ));
        }
    }

    for faction in &catalog.factions {
        if catalog.hireling(faction.id).is_none()
            && !catalog.player_factions.contains(&faction.id)
            && !catalog.bot_factions.contains(&faction.id)
        {
            warnings.push(format!("faction '{}' is never used", faction.name));
        }
    }

    (errors, warnings)
}
