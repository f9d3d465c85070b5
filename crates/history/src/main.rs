use std::io::Read;

use fig_history_lib::command::{execute_json, execute_json_batch, CommandResponse};
use fig_history_lib::harness::TestHarness;
use fig_history_lib::state::HistorySettings;

fn main() {
    let settings = HistorySettings::load();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| settings.log_filter.clone().into()),
        )
        .init();

    if std::env::args().any(|arg| arg == "--save-settings") {
        match settings.save() {
            Ok(path) => tracing::info!("Saved settings to {}", path.display()),
            Err(e) => {
                tracing::error!("Failed to save settings: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    let input = match read_script() {
        Ok(input) => input,
        Err(e) => {
            tracing::error!("Failed to read commands: {e}");
            std::process::exit(1);
        }
    };

    let mut harness = TestHarness::with_settings(settings);
    for response in run_script(&mut harness, &input) {
        match serde_json::to_string(&response) {
            Ok(line) => println!("{line}"),
            Err(e) => tracing::error!("Failed to encode response: {e}"),
        }
    }
}

/// Commands from `--script <path>`, or stdin when no script is given
fn read_script() -> std::io::Result<String> {
    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;
    while i < args.len() {
        if args[i] == "--script" && i + 1 < args.len() {
            let path = &args[i + 1];
            let script = std::fs::read_to_string(path)?;
            tracing::info!("Loaded script from {path}");
            return Ok(script);
        }
        i += 1;
    }
    let mut script = String::new();
    std::io::stdin().read_to_string(&mut script)?;
    Ok(script)
}

/// A JSON array runs as one batch; anything else is one command per line
fn run_script(harness: &mut TestHarness, input: &str) -> Vec<CommandResponse> {
    if input.trim_start().starts_with('[') {
        return execute_json_batch(harness, input).unwrap_or_else(|e| vec![failure(e)]);
    }
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| execute_json(harness, line).unwrap_or_else(failure))
        .collect()
}

fn failure(message: String) -> CommandResponse {
    CommandResponse {
        success: false,
        error: Some(message),
        data: None,
    }
}
