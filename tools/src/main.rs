//! shift-runner: headless driver for the process path assignment desk.
//!
//! Usage:
//!   shift-runner --seed 12345 --days 5 --workers 60 --db desk.db
//!   shift-runner --config desk.json --ipc-mode

use anyhow::Result;
use pathdesk_core::{
    clock::ShiftClock,
    command::DeskCommand,
    config::DeskConfig,
    desk::{AssignmentDesk, ScanOutcome},
    drill::Drill,
    roster::Roster,
    snapshot::{StaffingSnapshot, StaffingStatus},
    store::DeskStore,
};
use std::env;
use std::io::{self, BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcRequest {
    GetState,
    Command { command: DeskCommand },
    Quit,
}

#[derive(serde::Serialize)]
struct IpcResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    scan: Option<ScanOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    state: StaffingSnapshot,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let days = parse_arg(&args, "--days", 5u64);
    let workers = parse_arg(&args, "--workers", 60usize);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let db = flag_value(&args, "--db").unwrap_or(":memory:");
    let config = match flag_value(&args, "--config") {
        Some(path) => DeskConfig::load(path)?,
        None => DeskConfig::default_test(),
    };

    if !ipc_mode {
        println!("Process Path Desk: shift-runner");
        println!("  seed:     {seed}");
        println!("  days:     {days}");
        println!("  workers:  {workers}");
        println!("  db:       {db}");
        println!();
    }

    let store = DeskStore::open(db)?;
    store.migrate()?;

    // Reuse a saved roster; otherwise seed the demo roster and save it.
    let drill = Drill::new(seed);
    let mut roster = store.load_roster()?;
    if roster.is_empty() {
        let generated = drill.demo_roster(&config.catalog, workers);
        store.replace_roster(&generated)?;
        roster = Roster::new(generated);
    }

    let clock = if ipc_mode {
        ShiftClock::local()
    } else {
        ShiftClock::pinned(chrono::Local::now().date_naive())
    };
    let mut desk = AssignmentDesk::open(config, roster, store, clock)?;

    if ipc_mode {
        run_ipc_loop(&mut desk)?;
    } else {
        let summaries = drill.run(&mut desk, days)?;
        println!("=== DRILL SUMMARY ===");
        println!("  session:  {}", desk.session_id);
        for s in &summaries {
            println!(
                "  {} | assigned {:>3} | rejected {:>3} | repeats {:>3} | under-min {}",
                s.date,
                s.assigned,
                s.rejected,
                s.repeats_of_previous_day,
                s.understaffed_roles.len()
            );
        }
        println!();
        print_staffing(&StaffingSnapshot::capture(&desk));
    }

    Ok(())
}

fn run_ipc_loop(desk: &mut AssignmentDesk) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let request: IpcRequest = match serde_json::from_str(&buffer) {
            Ok(r) => r,
            Err(e) => {
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{err_json}")?;
                stdout.flush()?;
                continue;
            }
        };

        let response = match request {
            IpcRequest::Quit => break,
            IpcRequest::GetState => IpcResponse {
                scan: None,
                error: None,
                state: StaffingSnapshot::capture(desk),
            },
            IpcRequest::Command { command } => {
                // Admin mistakes are reported to the client, not fatal.
                let (scan, error) = match desk.apply(command) {
                    Ok(scan) => (scan, None),
                    Err(e) => {
                        log::warn!("ipc: command failed: {e}");
                        (None, Some(e.to_string()))
                    }
                };
                IpcResponse {
                    scan,
                    error,
                    state: StaffingSnapshot::capture(desk),
                }
            }
        };
        writeln!(stdout, "{}", serde_json::to_string(&response)?)?;
        stdout.flush()?;
    }
    Ok(())
}

fn print_staffing(snapshot: &StaffingSnapshot) {
    println!("=== STAFFING ({}) ===", snapshot.date);
    println!(
        "  rotation: {}   assigned: {}",
        if snapshot.rotation_enabled { "on" } else { "off" },
        snapshot.assigned
    );
    for row in &snapshot.rows {
        let status = match row.status {
            StaffingStatus::Under => "UNDER",
            StaffingStatus::Good => "ok",
            StaffingStatus::Over => "OVER",
        };
        println!(
            "  {:<18} {:>2} / min {:>2} max {:>2} prio {:>2}  {status}",
            row.role, row.current, row.requirement.min, row.requirement.max, row.requirement.priority
        );
    }
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
