//! ExoQuest CLI
//!
//! Usage:
//!   exoquest --classify --mass 300 --radius 12 --temperature 1500   # One classification
//!   exoquest --interactive                                          # Guessing session REPL
//!   exoquest --serve                                                # HTTP API server
//!   exoquest --classify --json                                      # JSON output

use clap::Parser;
use colored::Colorize;
use lazy_static::lazy_static;
use regex::Regex;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::error;
use tracing_subscriber::EnvFilter;

use exoquest::config::EngineConfig;
use exoquest::core::{
    run_server, AppState, ArchetypeCatalog, FallbackOrchestrator, GameSession, RandomSource, RngSource,
};
use exoquest::types::{AttemptOutput, Classification, Dimension, ParameterVector};
use exoquest::VERSION;

#[derive(Parser, Debug)]
#[command(
    name = "exoquest",
    version = VERSION,
    about = "ExoQuest - classify planet parameters into exoplanet archetypes",
    long_about = "ExoQuest classifies a 7-dimensional planet description into a ranked\n\
                  distribution over exoplanet archetypes, using a remote model when\n\
                  reachable and a local range classifier otherwise.\n\n\
                  Modes:\n  \
                  --classify     One-shot classification of the given parameters\n  \
                  --interactive  Guessing session: tune parameters until you match the target\n  \
                  --serve        HTTP API server mode\n\n\
                  States:\n  \
                  IDLE       - No attempt yet\n  \
                  EVALUATED  - At least one attempt, target not matched\n  \
                  WON        - Target matched, sticky until restart"
)]
struct Args {
    /// Classify the given parameters once and exit
    #[arg(short, long)]
    classify: bool,

    /// Interactive guessing session
    #[arg(short, long)]
    interactive: bool,

    /// Run as HTTP API server
    #[arg(short, long)]
    serve: bool,

    /// Server address (default: 127.0.0.1:3000)
    #[arg(long, default_value = "127.0.0.1:3000")]
    addr: String,

    /// Mass in Earth masses
    #[arg(long)]
    mass: Option<f64>,

    /// Radius in Earth radii
    #[arg(long)]
    radius: Option<f64>,

    /// Equilibrium temperature in Kelvin
    #[arg(long)]
    temperature: Option<f64>,

    /// Orbital distance in AU
    #[arg(long)]
    orbital_distance: Option<f64>,

    /// Relative atmospheric density
    #[arg(long)]
    atmosphere: Option<f64>,

    /// Rocky/water composition percentage
    #[arg(long)]
    composition: Option<f64>,

    /// Host star brightness
    #[arg(long)]
    brightness: Option<f64>,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Disable colors in output
    #[arg(long)]
    no_color: bool,

    /// JSON config file
    #[arg(long)]
    config: Option<String>,

    /// Remote service base URL (overrides config)
    #[arg(long)]
    remote_url: Option<String>,

    /// Never call the remote service
    #[arg(long)]
    offline: bool,

    /// Seed for reproducible target draws
    #[arg(long)]
    seed: Option<u64>,
}

impl Args {
    /// Default guess with any per-dimension flags applied
    fn guess(&self) -> Result<ParameterVector, exoquest::error::SessionError> {
        let mut guess = ParameterVector::default();
        let flags = [
            (Dimension::Mass, self.mass),
            (Dimension::Radius, self.radius),
            (Dimension::Temperature, self.temperature),
            (Dimension::OrbitalDistance, self.orbital_distance),
            (Dimension::Atmosphere, self.atmosphere),
            (Dimension::Composition, self.composition),
            (Dimension::Brightness, self.brightness),
        ];
        for (dim, value) in flags {
            if let Some(value) = value {
                guess.set(dim, value)?;
            }
        }
        Ok(guess)
    }

    fn engine_config(&self) -> Result<EngineConfig, exoquest::error::ConfigError> {
        let mut config = match &self.config {
            Some(path) => EngineConfig::load(path)?,
            None => EngineConfig::default(),
        };
        if let Some(url) = &self.remote_url {
            config.remote.base_url = url.clone();
            config.remote.enabled = true;
        }
        if self.offline {
            config.remote.enabled = false;
        }
        Ok(config)
    }

    fn random(&self) -> Box<dyn RandomSource> {
        match self.seed {
            Some(seed) => Box::new(RngSource::seeded(seed)),
            None => Box::new(RngSource::from_entropy()),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.serve);

    if args.no_color {
        colored::control::set_override(false);
    }

    let config = match args.engine_config() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "failed to load config");
            return ExitCode::FAILURE;
        }
    };

    let result = if args.serve {
        run_serve(&args, config).await
    } else if args.classify {
        run_classify(&args, &config).await
    } else {
        // Default to interactive if no mode specified
        run_interactive(&args, &config).await
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

/// RUST_LOG wins; otherwise the server logs at info and the terminal modes only warn
fn init_tracing(serve: bool) {
    let default = if serve { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(io::stderr)
        .init();
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Run the API server
async fn run_serve(args: &Args, config: EngineConfig) -> CliResult {
    let state = AppState::from_config(config)?;
    run_server(&args.addr, state).await
}

/// Classify one parameter vector and print the ranked distribution
async fn run_classify(args: &Args, config: &EngineConfig) -> CliResult {
    let catalog = ArchetypeCatalog::builtin();
    let orchestrator = FallbackOrchestrator::from_config(config, Arc::clone(&catalog))?;
    let guess = args.guess()?;
    let classification = orchestrator.classify(&guess).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&classification)?);
    } else {
        print_classification(&classification, &catalog);
    }
    Ok(())
}

// =============================================================================
// INTERACTIVE SESSION
// =============================================================================

lazy_static! {
    static ref SET_CMD: Regex =
        Regex::new(r"(?i)^set\s+([a-z_\-]+)\s*(?:=\s*)?(-?(?:\d+\.?\d*|\.\d+)(?:e[-+]?\d+)?)$").unwrap();
    static ref SHOW_CMD: Regex = Regex::new(r"(?i)^(show|status)$").unwrap();
    static ref CLASSIFY_CMD: Regex = Regex::new(r"(?i)^(classify|go|c)$").unwrap();
    static ref RESTART_CMD: Regex = Regex::new(r"(?i)^(restart|new)$").unwrap();
    static ref QUIT_CMD: Regex = Regex::new(r"(?i)^(quit|exit|q)$").unwrap();
    static ref HELP_CMD: Regex = Regex::new(r"(?i)^(help|\?)$").unwrap();
}

/// One parsed REPL line
#[derive(Debug, Clone, PartialEq)]
enum Command {
    Set(String, f64),
    Show,
    Classify,
    Restart,
    Quit,
    Help,
    Unknown(String),
}

fn parse_command(line: &str) -> Command {
    let line = line.trim();
    if let Some(caps) = SET_CMD.captures(line) {
        return match caps[2].parse::<f64>() {
            Ok(value) => Command::Set(caps[1].to_string(), value),
            Err(_) => Command::Unknown(line.to_string()),
        };
    }
    if SHOW_CMD.is_match(line) {
        Command::Show
    } else if CLASSIFY_CMD.is_match(line) {
        Command::Classify
    } else if RESTART_CMD.is_match(line) {
        Command::Restart
    } else if QUIT_CMD.is_match(line) {
        Command::Quit
    } else if HELP_CMD.is_match(line) {
        Command::Help
    } else {
        Command::Unknown(line.to_string())
    }
}

/// Guessing session REPL
async fn run_interactive(args: &Args, config: &EngineConfig) -> CliResult {
    let catalog = ArchetypeCatalog::builtin();
    let orchestrator = FallbackOrchestrator::from_config(config, Arc::clone(&catalog))?;
    let mut session = GameSession::new(catalog, config.win, config.feedback, args.random());
    session.replace_guess(args.guess()?);

    print_header(orchestrator.has_remote());
    print_target(&session);
    print_help();

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{}", format_prompt(&session));
        stdout.flush()?;

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(_) => break,
        }
        if line.trim().is_empty() {
            continue;
        }

        match parse_command(&line) {
            Command::Set(name, value) => match name.parse::<Dimension>() {
                Ok(dim) => match session.set_guess(dim, value) {
                    Ok(stored) => println!("  {} = {}", dim, stored),
                    Err(e) => println!("{}", format!("  {}", e).yellow()),
                },
                Err(e) => println!("{}", format!("  {}", e).yellow()),
            },
            Command::Show => print_guess(session.current_guess()),
            Command::Classify => {
                let output = session.attempt(&orchestrator).await?;
                print_attempt(&output, args.json)?;
            }
            Command::Restart => {
                session.restart();
                println!("{}", "  New target drawn, session reset.".cyan());
                print_target(&session);
            }
            Command::Quit => {
                println!("\nSession ended. Attempts: {}", session.attempts());
                break;
            }
            Command::Help => print_help(),
            Command::Unknown(text) => {
                println!("{}", format!("  Unrecognized command: {} (type 'help')", text).yellow());
            }
        }
    }
    Ok(())
}

// =============================================================================
// PRINTING
// =============================================================================

fn print_header(remote: bool) {
    println!("{}", "========================================".bold());
    println!("{}", format!("  ExoQuest v{}", VERSION).bold());
    println!("{}", "========================================".bold());
    let source = if remote { "remote model with local fallback" } else { "local classifier" };
    println!("  Classifier: {}", source);
    println!();
}

fn print_target(session: &GameSession) {
    println!("  Target: {}", session.target_archetype().description_key.bright_white());
    println!("  Goal: make the classifier rank the target archetype first or second with high probability");
    println!();
}

fn print_help() {
    println!("  Commands:");
    println!("    set <dimension> <value>   e.g. 'set mass 2.5', 'set orbital_distance 0.05'");
    println!("    show                      current guess");
    println!("    classify                  run one attempt");
    println!("    restart                   new target, reset attempts");
    println!("    quit");
    println!();
}

fn print_guess(guess: &ParameterVector) {
    for dim in Dimension::ALL {
        let bounds = dim.bounds();
        println!(
            "  {:<17} {:>10.3}   [{} .. {}]",
            dim.name(),
            guess.get(dim),
            bounds.min,
            bounds.max
        );
    }
}

fn format_prompt(session: &GameSession) -> String {
    let state = session.state();
    format!("{} [{}]", state.emoji(), state).color(state.color()).to_string() + " > "
}

fn print_attempt(output: &AttemptOutput, json: bool) -> CliResult {
    if json {
        println!("{}", serde_json::to_string(output)?);
        return Ok(());
    }
    if colored::control::SHOULD_COLORIZE.should_colorize() {
        println!("{}", output.to_terminal_string());
    } else {
        println!("{}", output.to_parseable_string());
    }
    println!("  {} {}", output.feedback, format!("[{}]", output.message_key).dimmed());
    if output.newly_won {
        println!("{}", "  Target matched! Type 'restart' for a new planet.".green().bold());
    } else if output.state.is_terminal() {
        println!("{}", "  Already won; attempts still count until you restart.".green());
    }
    Ok(())
}

fn print_classification(classification: &Classification, catalog: &ArchetypeCatalog) {
    println!("Source: {}", classification.source);
    if let Some(confidence) = classification.confidence {
        println!("Confidence: {:.1}%", confidence * 100.0);
    }
    for result in &classification.results {
        let line = format!(
            "  {}. {:<14} {:>6.1}%",
            result.rank + 1,
            result.archetype_id,
            result.probability * 100.0
        );
        if result.rank == 0 {
            println!("{}", line.bold());
        } else {
            println!("{}", line);
        }
    }
    if let Some(visual) = catalog.top_visual_config(&classification.results) {
        println!("Texture: {}", visual.texture_url);
    }
}
