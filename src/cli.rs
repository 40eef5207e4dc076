use std::env;
use std::sync::Arc;

use crate::balance::run_batch_parallel;
use crate::combat::generator::DifficultyMultipliers;
use crate::data::pilot::ModuleKind;
use crate::data::registry::GameData;
use crate::data::run_state::RunState;
use crate::data::validate::validate_game_data;
use crate::server;
use crate::sim::engine::CombatConfig;
use crate::sim::headless::{run_headless, DEFAULT_MAX_TICKS};
use crate::sim::state::Mission;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Serve,
    Simulate,
    Batch,
    Validate,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("serve") => Some(Command::Serve),
        Some("simulate") => Some(Command::Simulate),
        Some("batch") => Some(Command::Batch),
        Some("validate") => Some(Command::Validate),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    match parse_command(args) {
        Some(Command::Serve) => handle_serve(),
        Some(Command::Simulate) => handle_simulate(args),
        Some(Command::Batch) => handle_batch(args),
        Some(Command::Validate) => handle_validate(),
        None => {
            eprintln!("usage: scrapfall <serve|simulate|batch|validate>");
            2
        }
    }
}

fn handle_serve() -> i32 {
    let bind_addr = env::var("SCRAPFALL_BIND").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
    let data = GameData::load();
    match server::run_server(&bind_addr, data) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("server error: {err}");
            1
        }
    }
}

fn scenario(args: &[String]) -> Option<(Arc<GameData>, CombatConfig, RunState)> {
    let data = GameData::load();
    let pilot_id = args.get(2).cloned().unwrap_or_else(|| "vanguard".to_string());
    let Some(pilot) = data.pilot(&pilot_id) else {
        eprintln!("unknown pilot '{pilot_id}'");
        return None;
    };
    let stage = parse_u32_arg(args.get(3), "stage", 1).max(1);
    let seed = parse_u64_arg(args.get(4), "seed", 7);
    let module = args
        .get(5)
        .and_then(|value| ModuleKind::parse(value))
        .unwrap_or(ModuleKind::Balanced);

    let run = RunState::new(pilot.base_hp);
    let config = CombatConfig {
        pilot_id,
        module,
        stage,
        difficulty: DifficultyMultipliers::default(),
        difficulty_name: "normal".to_string(),
        mission: Mission::Standard,
        hazard: None,
        daily: None,
        seed,
    };
    Some((data, config, run))
}

fn handle_simulate(args: &[String]) -> i32 {
    let Some((data, config, run)) = scenario(args) else {
        return 2;
    };
    match run_headless(data, config, run, DEFAULT_MAX_TICKS) {
        Ok(replay) => match serde_json::to_string_pretty(&replay) {
            Ok(payload) => {
                println!("{payload}");
                0
            }
            Err(err) => {
                eprintln!("failed to serialize replay: {err}");
                1
            }
        },
        Err(err) => {
            eprintln!("simulation failed: {err}");
            1
        }
    }
}

fn handle_batch(args: &[String]) -> i32 {
    let Some((data, config, run)) = scenario(args) else {
        return 2;
    };
    let iterations = parse_u32_arg(args.get(6), "iterations", 1000) as usize;
    match run_batch_parallel(data, &config, &run, iterations, DEFAULT_MAX_TICKS) {
        Ok(summary) => match serde_json::to_string_pretty(&summary) {
            Ok(payload) => {
                println!("{payload}");
                0
            }
            Err(err) => {
                eprintln!("failed to serialize batch summary: {err}");
                1
            }
        },
        Err(err) => {
            eprintln!("batch failed: {err}");
            1
        }
    }
}

fn handle_validate() -> i32 {
    let data = GameData::load();
    let report = validate_game_data(&data);
    if report.diagnostics.is_empty() {
        println!("validation passed: {} pilots, {} enemy templates, {} boss templates",
            data.pilots.len(),
            data.enemy_templates.len(),
            data.boss_templates.len()
        );
        return 0;
    }
    for diag in &report.diagnostics {
        eprintln!("[{}] {}: {}", diag.severity, diag.context, diag.message);
    }
    if report.has_errors() {
        eprintln!("validation failed");
        1
    } else {
        println!("validation passed with warnings");
        0
    }
}

fn parse_u32_arg(raw: Option<&String>, name: &str, default: u32) -> u32 {
    raw.and_then(|value| value.parse::<u32>().ok())
        .unwrap_or_else(|| {
            if let Some(value) = raw {
                eprintln!("invalid {name} '{value}', defaulting to {default}");
            }
            default
        })
}

fn parse_u64_arg(raw: Option<&String>, name: &str, default: u64) -> u64 {
    raw.and_then(|value| value.parse::<u64>().ok())
        .unwrap_or_else(|| {
            if let Some(value) = raw {
                eprintln!("invalid {name} '{value}', defaulting to {default}");
            }
            default
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parse_command_recognizes_subcommands() {
        assert_eq!(parse_command(&args(&["scrapfall", "serve"])), Some(Command::Serve));
        assert_eq!(parse_command(&args(&["scrapfall", "batch"])), Some(Command::Batch));
        assert_eq!(parse_command(&args(&["scrapfall", "nope"])), None);
        assert_eq!(parse_command(&args(&["scrapfall"])), None);
    }

    #[test]
    fn missing_command_exits_with_usage_code() {
        assert_eq!(run_with_args(&args(&["scrapfall"])), 2);
    }

    #[test]
    fn bad_numeric_args_fall_back_to_defaults() {
        assert_eq!(parse_u32_arg(Some(&"abc".to_string()), "stage", 1), 1);
        assert_eq!(parse_u64_arg(Some(&"12".to_string()), "seed", 7), 12);
        assert_eq!(parse_u64_arg(None, "seed", 7), 7);
    }
}
