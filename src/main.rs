//! Sovereign CLI
//!
//! Usage:
//!   sovereign --text "is coke worth it?"     # Single exchange
//!   sovereign --interactive                  # Chat loop with operator commands
//!   sovereign --serve                        # HTTP API server
//!   sovereign --text "text" --json           # JSON output

use clap::Parser;
use colored::Colorize;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use sovereign::core::{
    run_server, GeminiClient, GenerationService, OfflineService, Preset, ResponseComposer,
    ScanNarrator, Session,
};
use sovereign::types::{ExchangeOutput, LogEntry, LogType, Phase, PsychologyPatch};
use sovereign::{Config, Result, VERSION};

#[derive(Parser, Debug)]
#[command(
    name = "sovereign",
    version = VERSION,
    about = "Sovereign Agent - a shopping assistant that drifts from salesman to truth-teller",
    long_about = "Sovereign answers product questions through a live generation service,\n\
                  shifting persona as the user's receptivity score rises.\n\n\
                  Phases:\n  \
                  1 CONSUMER   - enthusiastic salesman\n  \
                  2 FRICTION   - hidden costs surface\n  \
                  3 REVEAL     - system truths, alternatives\n  \
                  4 SOVEREIGN  - minimalist mentor\n\n\
                  Operator commands (interactive):\n  \
                  /unlock <code>  /lock  /shadow  /boost  /redpill  /sovereign\n  \
                  /set score=<n> phase=<n> trust=<n>  /reset  /follow <text>"
)]
struct Args {
    /// Text to send (single mode)
    #[arg(short, long)]
    text: Option<String>,

    /// Interactive chat mode - read lines from stdin
    #[arg(short, long)]
    interactive: bool,

    /// Run as HTTP API server
    #[arg(short, long)]
    serve: bool,

    /// Server address (default: 127.0.0.1:3000)
    #[arg(long, default_value = "127.0.0.1:3000")]
    addr: String,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Disable colors in output
    #[arg(long)]
    no_color: bool,

    /// Show phase and score after each reply
    #[arg(long)]
    verbose: bool,

    /// Never call the generation service; always use the local script
    #[arg(long)]
    offline: bool,

    /// Initial product context (iphone, coke, nike)
    #[arg(long)]
    product: Option<String>,

    /// Override the model name
    #[arg(long)]
    model: Option<String>,

    /// Hold each scan step for its display duration
    #[arg(long)]
    scan_delay: bool,
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    let args = Args::parse();
    init_tracing(args.verbose);

    if args.no_color {
        colored::control::set_override(false);
    }

    if let Err(e) = run(args).await {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "sovereign=debug" } else { "sovereign=info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(std::io::stderr)
        .init();
}

async fn run(args: Args) -> Result<()> {
    let mut config = Config::from_env()?;
    if let Some(model) = &args.model {
        config.model = model.clone();
    }

    let composer = Arc::new(ResponseComposer::new(build_service(&args, &config)));
    let narrator = if args.scan_delay { ScanNarrator::realtime() } else { ScanNarrator::instant() };

    if args.serve {
        print_header("API Server");
        println!("  Generator: {}", composer.service_label());
        println!("  Listening: {}", args.addr);
        println!("  Narration: {}", if narrator.is_realtime() { "realtime" } else { "instant" });
        println!();
        return run_server(&args.addr, composer, config.passcode.clone(), narrator).await;
    }

    let mut session = Session::new(config.passcode.clone()).with_narrator(narrator);
    if let Some(product) = &args.product {
        session.set_active_product(Some(product.to_lowercase()));
    }

    match &args.text {
        Some(text) if !args.interactive => {
            let output = session.exchange(&composer, text).await;
            print_exchange(&output, &args)
        }
        _ => run_interactive(&mut session, &composer, &args).await,
    }
}

/// Live Gemini client, or the offline service when unavailable
fn build_service(args: &Args, config: &Config) -> Arc<dyn GenerationService> {
    if args.offline {
        return Arc::new(OfflineService);
    }
    match GeminiClient::new(config) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            warn!(error = %e, "generation service unavailable, replies use the local script");
            Arc::new(OfflineService)
        }
    }
}

/// Run interactive chat mode
async fn run_interactive(session: &mut Session, composer: &ResponseComposer, args: &Args) -> Result<()> {
    print_header("Interactive");
    println!("Ask about a product and press Enter. Type 'quit' to exit.");
    println!("Generator: {}", composer.service_label().dimmed());
    println!();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{} ", "you >".bold());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
            println!("\nSession ended. Messages: {}", session.messages().len());
            break;
        }
        if line.is_empty() {
            continue;
        }

        if let Some(command) = line.strip_prefix('/') {
            run_command(session, command);
            continue;
        }

        let output = session.exchange(composer, line).await;
        print_exchange(&output, args)?;
    }
    Ok(())
}

/// Operator commands; gated ones require an unlocked shadow monitor
fn run_command(session: &mut Session, command: &str) {
    let (name, rest) = command.split_once(' ').unwrap_or((command, ""));
    let rest = rest.trim();

    match name {
        "unlock" => {
            if session.unlock(rest) {
                println!("{}", "Shadow Monitor Access Granted".yellow());
            } else {
                println!("{}", "Access Denied".red().bold());
            }
            return;
        }
        "lock" => {
            session.lock();
            println!("Shadow monitor hidden.");
            return;
        }
        "follow" => {
            match session.follow_up(rest) {
                Some(answer) => println!("{}", answer),
                None => println!("{}", "No scripted follow-up.".dimmed()),
            }
            return;
        }
        _ => {}
    }

    if !session.is_unlocked() {
        println!("{}", "Locked. Use /unlock <code> first.".red());
        return;
    }

    match name {
        "shadow" => print_shadow(session),
        "boost" => report(session.apply_preset(Preset::Boost).current.receptivity_score, session),
        "redpill" => report(session.apply_preset(Preset::RedPill).current.receptivity_score, session),
        "sovereign" => report(session.apply_preset(Preset::Sovereign).current.receptivity_score, session),
        "set" => match parse_patch(rest) {
            Ok(patch) => {
                let score = session.apply_override(&patch).current.receptivity_score;
                report(score, session);
            }
            Err(e) => println!("{}", e.red()),
        },
        "reset" => {
            session.reset();
            println!("{}", "SYSTEM_RESET_COMPLETE".dimmed());
        }
        other => println!("Unknown command: /{}", other),
    }
}

fn report(score: u8, session: &Session) {
    let phase = session.psychology().current_phase;
    println!("{}", phase.paint(&format!("score={} phase={}", score, phase)));
}

/// Parse `score=<n> phase=<n|name> trust=<n>`
fn parse_patch(input: &str) -> std::result::Result<PsychologyPatch, String> {
    let mut patch = PsychologyPatch::default();
    for pair in input.split_whitespace() {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| format!("expected key=value, got '{}'", pair))?;
        match key {
            "score" => {
                patch.receptivity_score =
                    Some(value.parse().map_err(|_| format!("bad score '{}'", value))?)
            }
            "trust" => {
                patch.trust_level = Some(value.parse().map_err(|_| format!("bad trust '{}'", value))?)
            }
            "phase" => patch.current_phase = Some(value.parse::<Phase>()?),
            other => return Err(format!("unknown field '{}'", other)),
        }
    }
    if patch.is_empty() {
        return Err("usage: /set score=<n> phase=<n> trust=<n>".to_string());
    }
    Ok(patch)
}

fn print_exchange(output: &ExchangeOutput, args: &Args) -> Result<()> {
    if args.json {
        println!("{}", serde_json::to_string(output)?);
        return Ok(());
    }

    let message = &output.message;
    println!();
    println!("{}", output.phase.paint(&message.text));
    if !message.sources.is_empty() {
        println!("{}", "  Sources:".dimmed());
        for (i, source) in message.sources.iter().enumerate() {
            println!("{}", format!("  [{}] {} - {}", i + 1, source.title, source.uri).dimmed());
        }
    }
    for suggestion in &message.suggestions {
        println!("  {} {}", "->".cyan(), suggestion);
    }
    if args.verbose {
        if args.no_color {
            println!("{}", output.to_parseable_string());
        } else {
            println!("{}", output.to_terminal_string());
        }
    }
    println!();
    Ok(())
}

fn print_shadow(session: &Session) {
    let report = session.shadow_report();
    let phase = report.psychology.current_phase;
    println!("{}", "=== SHADOW MONITOR ===".bold());
    println!("{}", phase.paint(&report.phase_title));
    println!(
        "  receptivity={} trust={} logic_gate={}",
        report.psychology.receptivity_score, report.psychology.trust_level, report.logic_gate
    );
    if let Some(product) = &report.active_product {
        println!("  target={}", product.to_uppercase());
    }
    for entry in &report.logs {
        print_log_entry(entry);
    }
}

fn print_log_entry(entry: &LogEntry) {
    let line = entry.to_parseable_string();
    let painted = match entry.kind {
        LogType::Info => line.dimmed(),
        LogType::Warn => line.yellow(),
        LogType::Critical => line.red().bold(),
        LogType::Analysis => line.cyan(),
    };
    println!("  {}", painted);
}

fn print_header(mode: &str) {
    println!("{}", "========================================".bold());
    println!("{}", format!("  Sovereign Agent v{} - {}", VERSION, mode).bold());
    println!("{}", "========================================".bold());
    println!();
}
