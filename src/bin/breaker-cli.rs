use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde_json::json;

use circuit_breaker::config::load_config;
use circuit_breaker::observability::logging;
use circuit_breaker::{BreakerRegistry, ManualClock};

#[derive(Parser)]
#[command(name = "breaker-cli")]
#[command(about = "Inspect circuit breaker configs and replay outcome scripts", long_about = None)]
struct Cli {
    /// Path to the breaker configuration (TOML).
    #[arg(short, long, default_value = "breakers.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the configuration and list breakers
    Check,
    /// Replay an outcome script against one breaker on virtual time.
    ///
    /// Steps are whitespace or comma separated: `s` success, `f` failure,
    /// `+<n>s` / `+<n>ms` advance the clock.
    Simulate {
        #[arg(short, long)]
        breaker: String,

        script: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Success,
    Failure,
    Advance(Duration),
}

fn parse_script(script: &str) -> Result<Vec<Step>, String> {
    script
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(parse_step)
        .collect()
}

fn parse_step(token: &str) -> Result<Step, String> {
    match token {
        "s" | "S" => return Ok(Step::Success),
        "f" | "F" => return Ok(Step::Failure),
        _ => {}
    }

    let amount = token
        .strip_prefix('+')
        .ok_or_else(|| format!("unknown step '{}'", token))?;
    let (digits, unit) = if let Some(ms) = amount.strip_suffix("ms") {
        (ms, Duration::from_millis(1))
    } else if let Some(secs) = amount.strip_suffix('s') {
        (secs, Duration::from_secs(1))
    } else {
        return Err(format!("missing unit in '{}'", token));
    };
    let n: u32 = digits
        .parse()
        .map_err(|e| format!("bad duration '{}': {}", token, e))?;
    Ok(Step::Advance(unit * n))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = logging::init(logging::DEFAULT_FILTER);
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    match cli.command {
        Commands::Check => {
            for breaker in &config.breakers {
                println!("{}", serde_json::to_string(breaker)?);
            }
            tracing::info!(count = config.breakers.len(), "Configuration valid");
        }
        Commands::Simulate { breaker, script } => {
            let steps = parse_script(&script)?;
            let clock = ManualClock::new();
            let registry = BreakerRegistry::from_config_with_clock(&config, Arc::new(clock.clone()));
            let cb = registry
                .get(&breaker)
                .ok_or_else(|| format!("no breaker named '{}'", breaker))?;

            for (i, step) in steps.into_iter().enumerate() {
                let outcome = match step {
                    Step::Advance(by) => {
                        clock.advance(by);
                        format!("advanced {:?}", by)
                    }
                    Step::Success | Step::Failure => {
                        let result = cb.execute(|| {
                            if step == Step::Success {
                                Ok(())
                            } else {
                                Err(std::io::Error::new(std::io::ErrorKind::Other, "simulated failure"))
                            }
                        });
                        match result {
                            Ok(()) => "success".to_string(),
                            Err(e) if e.is_rejected() => format!("rejected: {}", e),
                            Err(e) => format!("failure: {}", e),
                        }
                    }
                };
                println!(
                    "{}",
                    json!({
                        "step": i + 1,
                        "outcome": outcome,
                        "state": cb.state(),
                        "generation": cb.generation(),
                        "counts": cb.counts(),
                    })
                );
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_script() {
        let steps = parse_script("f f,f +61s s +250ms").unwrap();
        assert_eq!(
            steps,
            vec![
                Step::Failure,
                Step::Failure,
                Step::Failure,
                Step::Advance(Duration::from_secs(61)),
                Step::Success,
                Step::Advance(Duration::from_millis(250)),
            ]
        );
    }

    #[test]
    fn test_parse_script_errors() {
        assert!(parse_script("x").is_err());
        assert!(parse_script("+10").is_err());
        assert!(parse_script("+abcs").is_err());
    }
}
