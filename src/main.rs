use std::env;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use log::warn;

use spinwheel::roster;
use spinwheel::{effective_weight, Roster, Wheel, WheelCommand, WheelConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut title = "Spin Wheel".to_string();
    let mut store: Option<PathBuf> = None;
    let mut font: Option<PathBuf> = None;
    let mut duration_ms: Option<u64> = None;
    let mut csv: Option<PathBuf> = None;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--title" => {
                if let Some(value) = args.next() {
                    title = value;
                }
            }
            "--store" => store = args.next().map(PathBuf::from),
            "--font" => font = args.next().map(PathBuf::from),
            "--duration" => {
                if let Some(value) = args.next() {
                    match value.parse::<u64>() {
                        Ok(ms) => duration_ms = Some(ms),
                        Err(_) => warn!("ignoring bad --duration value {value:?}"),
                    }
                }
            }
            "--csv" => csv = args.next().map(PathBuf::from),
            "--help" | "-h" => {
                print_usage();
                return Ok(());
            }
            other => warn!("ignoring unknown argument {other:?}"),
        }
    }

    let config = WheelConfig::builder()
        .title(title)
        .maybe_font_path(font)
        .maybe_storage_path(store)
        .maybe_duration_ms(duration_ms)
        .build();
    let mut wheel = Wheel::new(config)?;

    if let Some(path) = csv {
        wheel.import_csv_file(&path)?;
    }

    print_roster(&wheel);

    // Commands also arrive on stdin so the wheel can be driven from a
    // pipe: spin / exclude / reset / csv <path> / export <path>.
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let line = line.trim();
            let command = match line.split_once(' ') {
                None if line == "spin" => Some(WheelCommand::Spin),
                None if line == "exclude" => Some(WheelCommand::ExcludeWinner),
                None if line == "reset" => Some(WheelCommand::Reset),
                Some(("csv", path)) => match std::fs::read_to_string(path.trim()) {
                    Ok(text) => Some(WheelCommand::ImportCsv(text)),
                    Err(err) => {
                        warn!("could not read {path:?}: {err}");
                        None
                    }
                },
                Some(("export", path)) => {
                    Some(WheelCommand::ExportCsv(PathBuf::from(path.trim())))
                }
                _ => {
                    if !line.is_empty() {
                        warn!("unknown command {line:?}");
                    }
                    None
                }
            };
            if let Some(command) = command {
                if tx.send(command).is_err() {
                    break;
                }
            }
        }
    });

    wheel.run_with_commands(rx)?;
    Ok(())
}

fn print_roster(wheel: &Wheel) {
    let items = wheel.session().items();
    let roster = Roster::new();
    println!("{}", roster.display_range(items));
    for (index, item) in roster.page_items(items) {
        println!(
            "  {:>3}. {:<20} {:>6.1}%  {}",
            index + 1,
            item.label,
            roster::percentage(items, index),
            item.color
        );
    }
    let total: f64 = items.iter().map(effective_weight).sum();
    println!("total weight {total}");
}

fn print_usage() {
    println!("usage: spinwheel [options]");
    println!("  --title <text>     window title");
    println!("  --store <path>     item persistence file");
    println!("  --font <path>      TTF/OTF font for labels");
    println!("  --duration <ms>    spin duration in milliseconds");
    println!("  --csv <path>       replace items from a CSV file at startup");
    println!();
    println!("keys: space spins, e excludes the winner, r resets the items");
    println!("stdin: spin | exclude | reset | csv <path> | export <path>");
}
