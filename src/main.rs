use anyhow::{Context, Result};
use clap::Parser;
use harvest_diner::simulation::{
    Command, GameSession, ManualClock, SessionBuilder, SimConfig, HELP_TEXT,
};
use log::{info, warn};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "harvest_diner")]
#[command(about = "Farm and diner simulation with a headless runner and a console")]
struct Cli {
    /// Run a fixed number of ticks on a simulated clock (the default)
    #[arg(long)]
    headless: bool,

    /// Read commands from stdin on the wall clock
    #[arg(long, conflicts_with = "headless")]
    interactive: bool,

    /// Number of simulation ticks to run in headless mode
    #[arg(long, default_value = "600")]
    ticks: u32,

    /// Time delta per tick in seconds
    #[arg(long, default_value = "0.1")]
    delta: f32,

    /// Command script for headless mode; `@<tick>` schedules a line
    #[arg(long)]
    script: Option<PathBuf>,

    /// Print the final snapshot as JSON instead of the text summary
    #[arg(long)]
    json: bool,

    /// Seed for customers and harvest rolls
    #[arg(long)]
    seed: Option<u64>,

    /// RON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Simulated seconds between progress summaries (0 disables them)
    #[arg(long, default_value = "10")]
    report_every: u32,
}

/// A script line scheduled to run once `tick` ticks have completed
#[derive(Debug, Clone, PartialEq)]
struct ScriptLine {
    tick: u32,
    line_no: usize,
    command: String,
}

fn main() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn,harvest_diner=info"),
    )
    .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };
    let mut builder = SessionBuilder::new().config(config);
    if let Some(seed) = cli.seed {
        builder = builder.seed(seed);
    }

    if cli.interactive {
        run_interactive(builder.build())
    } else {
        let script = match &cli.script {
            Some(path) => load_script(path)?,
            None => Vec::new(),
        };
        run_headless(builder, &cli, script)
    }
}

fn load_script(path: &Path) -> Result<Vec<ScriptLine>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read script {}", path.display()))?;
    parse_script(&text).with_context(|| format!("Invalid script {}", path.display()))
}

/// Lines without an `@<tick>` prefix run at the same tick as the line before
fn parse_script(text: &str) -> Result<Vec<ScriptLine>> {
    let mut lines = Vec::new();
    let mut tick = 0;
    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let command = match line.strip_prefix('@') {
            Some(rest) => {
                let (at, command) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                tick = at
                    .parse::<u32>()
                    .with_context(|| format!("line {}: bad tick '{}'", index + 1, at))?;
                command.trim()
            }
            None => line,
        };
        if command.is_empty() {
            continue;
        }
        lines.push(ScriptLine {
            tick,
            line_no: index + 1,
            command: command.to_string(),
        });
    }
    lines.sort_by_key(|line| line.tick);
    Ok(lines)
}

/// Run the simulation in headless mode (no console input)
fn run_headless(builder: SessionBuilder, cli: &Cli, script: Vec<ScriptLine>) -> Result<()> {
    let clock = ManualClock::new();
    let mut session = builder.clock(clock.clone()).build();
    let verbose = !cli.json;

    if verbose {
        println!("Running farm simulation in headless mode...");
        println!("Ticks: {}, Delta: {}s", cli.ticks, cli.delta);
        println!();
        println!("Initial state:");
        let snapshot = session.snapshot();
        snapshot.print_summary();
        snapshot.draw_map();
    }

    let ticks_per_report = if cli.report_every == 0 || cli.delta <= 0.0 {
        0
    } else {
        ((cli.report_every as f32) / cli.delta).ceil() as u32
    };

    let mut pending = script.into_iter().peekable();
    let mut tick = 0;
    loop {
        while let Some(line) = pending.next_if(|line| line.tick <= tick) {
            if !execute_script_line(&mut session, &line, verbose) {
                info!("Script requested quit at tick {}", tick);
                return finish(&session, cli.json);
            }
        }
        if tick >= cli.ticks {
            break;
        }

        clock.advance_secs_f32(cli.delta);
        let report = session.tick();
        tick += 1;

        for id in &report.spawned {
            if verbose {
                println!("[tick {}] Customer {} arrived", tick, id);
            }
        }
        for id in &report.expired {
            if verbose {
                println!("[tick {}] Customer {} gave up and left", tick, id);
            }
        }
        if verbose && ticks_per_report > 0 && tick % ticks_per_report == 0 {
            println!(
                "--- After tick {} ({:.1}s simulated time) ---",
                tick,
                tick as f32 * cli.delta
            );
            report.snapshot.print_summary();
        }
    }

    for line in pending {
        warn!(
            "Script line {} scheduled after the last tick was not run: {}",
            line.line_no, line.command
        );
    }
    finish(&session, cli.json)
}

/// Returns false when the line asked to quit
fn execute_script_line(session: &mut GameSession, line: &ScriptLine, verbose: bool) -> bool {
    if matches!(line.command.parse::<Command>(), Ok(Command::Quit)) {
        return false;
    }
    let result = session.execute_line(&line.command);
    if verbose {
        println!("[tick {}] > {}", line.tick, line.command);
        println!("{}", result.message);
    }
    true
}

fn finish(session: &GameSession, json: bool) -> Result<()> {
    for line in session.summary_lines() {
        info!("{}", line);
    }

    let snapshot = session.snapshot();
    if json {
        let text =
            serde_json::to_string_pretty(&snapshot).context("Failed to serialize snapshot")?;
        println!("{}", text);
    } else {
        println!("=== Final State ===");
        snapshot.print_summary();
        snapshot.draw_map();
    }
    Ok(())
}

/// Line-based console on the system clock
fn run_interactive(mut session: GameSession) -> Result<()> {
    println!("Welcome to the farm! Customers will start arriving soon.");
    println!("{}", HELP_TEXT);

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    print!("> ");
    stdout.flush().context("Failed to flush stdout")?;

    for line in stdin.lock().lines() {
        let line = line.context("Failed to read from stdin")?;
        session.pump();

        let trimmed = line.trim();
        if !trimmed.is_empty() {
            if matches!(trimmed.parse::<Command>(), Ok(Command::Quit)) {
                println!("Exiting game... Goodbye!");
                break;
            }
            let result = session.execute_line(trimmed);
            println!("{}", result.message);
        }

        print!("> ");
        stdout.flush().context("Failed to flush stdout")?;
    }

    for line in session.summary_lines() {
        info!("{}", line);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_script_schedules_lines() {
        let script = "till 0\n# comment\n@50 harvest 0\nplayer\n\n@10 plant 0 onion\n";
        let lines = parse_script(script).unwrap();
        let scheduled: Vec<(u32, &str)> = lines
            .iter()
            .map(|line| (line.tick, line.command.as_str()))
            .collect();
        assert_eq!(
            scheduled,
            vec![
                (0, "till 0"),
                (10, "plant 0 onion"),
                (50, "harvest 0"),
                (50, "player"),
            ]
        );
    }

    #[test]
    fn test_parse_script_rejects_bad_tick() {
        assert!(parse_script("@soon till 0").is_err());
    }
}
