//! Command-line entry point.
//!
//! Expected empty states (missing directories, no files) and extraction
//! failures exit 0 with details on the log stream; this is background
//! maintenance tooling where "did nothing this run" is success. Only usage
//! errors exit nonzero.

use serde_json::json;

use vaultdex::bridge;
use vaultdex::config::Config;

const USAGE: &str = "\
Usage: vaultdex <command>

Commands:
  refresh [--rebuild]        Refresh the meeting cache incrementally
  tasks [all|open|overdue|p0]  List tasks from the task document
  summary                    Task counts (open/total/overdue/P0)
  find <text...>             Find tasks referenced by free text
  meetings                   List cached meetings, newest first

Environment:
  VAULTDEX_ROOT              Vault root (defaults to config file, then cwd)
  RUST_LOG                   Log filter, e.g. RUST_LOG=info";

fn main() {
    env_logger::init();
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = Config::resolve();
    std::process::exit(run(&config, &args));
}

fn run(config: &Config, args: &[String]) -> i32 {
    let Some(command) = args.first() else {
        eprintln!("{}", USAGE);
        return 2;
    };

    let (action, params) = match command.as_str() {
        "refresh" => (
            "refresh",
            json!({ "rebuild": args.iter().any(|a| a == "--rebuild") }),
        ),
        "tasks" => {
            let filter = args.get(1).map(String::as_str).unwrap_or("open");
            ("list_tasks", json!({ "filter": filter }))
        }
        "summary" => ("task_summary", json!({})),
        "find" => {
            let text = args[1..].join(" ");
            if text.trim().is_empty() {
                eprintln!("Usage: vaultdex find <text...>");
                return 2;
            }
            ("find_tasks", json!({ "text": text }))
        }
        "meetings" => ("list_meetings", json!({})),
        _ => {
            eprintln!("{}", USAGE);
            return 2;
        }
    };

    match bridge::dispatch(config, action, &params) {
        Ok(text) => {
            println!("{}", text);
            0
        }
        Err(e) => {
            log::error!("{} failed: {}", command, e);
            0
        }
    }
}
