//! BirdGuard CLI
//!
//! Usage:
//!   birdguard --import chat.txt             # Import a conversation export
//!   birdguard --interactive                 # Paste conversation lines
//!   birdguard --timeline [--filter money]   # Projected timeline
//!   birdguard --learn                       # Complete today's learning
//!   birdguard --serve                       # HTTP API server
//!   birdguard --import chat.txt --json      # JSON output

use clap::Parser;
use colored::Colorize;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

use birdguard::core::{
    bird_state_for_uploads, complete_learning, learn_sentences, project, today_seoul_key,
    ConversationParser,
    DayRecordStore, JsonFileStorage, PlainTextFileSource, Storage, TimelineStore,
};
use birdguard::types::{BirdState, DayRecord, FlagKind, ImportDraft, ImportError, TimelineItem};
use birdguard::VERSION;

#[derive(Parser, Debug)]
#[command(
    name = "birdguard",
    version = VERSION,
    about = "BirdGuard - scan imported conversations for risk signals",
    long_about = "BirdGuard ingests exported chat conversations, classifies them\n\
                  into risk flags (money, favor, praise, link, image) and tracks a\n\
                  per-day record whose bird state escalates with repeated uploads.\n\n\
                  Modes:\n  \
                  --import FILE  Import one conversation export into today\n  \
                  --interactive  Paste conversation lines by hand\n  \
                  --timeline     Show the projected timeline\n  \
                  --learn        Complete today's learning\n  \
                  --serve        HTTP API server mode\n\n\
                  Bird states:\n  \
                  HEALTHY    - At most one upload today\n  \
                  UNEASY     - Two or three uploads\n  \
                  DISTORTED  - Four or five uploads\n  \
                  CRITICAL   - Six or more uploads"
)]
struct Args {
    /// Import a conversation text file into today's record
    #[arg(short, long)]
    import: Option<String>,

    /// Interactive mode - paste lines, finish with an empty line
    #[arg(short = 'I', long)]
    interactive: bool,

    /// Show the projected timeline
    #[arg(short, long)]
    timeline: bool,

    /// Timeline filter: money, favor, praise, link or image
    #[arg(long)]
    filter: Option<String>,

    /// Complete today's learning
    #[arg(short, long)]
    learn: bool,

    /// Run as HTTP API server
    #[arg(short, long)]
    serve: bool,

    /// Server address (default: 127.0.0.1:3000)
    #[arg(long, default_value = "127.0.0.1:3000")]
    addr: String,

    /// Directory for persisted collections
    #[arg(long, default_value = "./birdguard-data")]
    data_dir: String,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Disable colors in output
    #[arg(long)]
    no_color: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if args.no_color {
        colored::control::set_override(false);
    }

    let result = if args.serve {
        run_serve(&args).await
    } else if let Some(ref path) = args.import {
        run_import(path, &args)
    } else if args.learn {
        run_learn(&args)
    } else if args.timeline {
        run_timeline(&args)
    } else if args.interactive {
        run_interactive(&args)
    } else {
        // Default to interactive if no mode specified
        run_interactive(&args)
    };

    if let Err(e) = result {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn open_stores(args: &Args) -> Result<(DayRecordStore, TimelineStore), Box<dyn std::error::Error>> {
    let storage: Arc<dyn Storage> = Arc::new(JsonFileStorage::new(&args.data_dir));
    let records = DayRecordStore::open(storage.clone())?;
    let timeline = TimelineStore::open(storage)?;
    Ok((records, timeline))
}

/// Import one conversation file into today's record
fn run_import(path: &str, args: &Args) -> CliResult {
    let parser = ConversationParser::new();
    let source = PlainTextFileSource;

    let parsed = match parser.parse_from(&source, path) {
        Ok(parsed) => parsed,
        Err(ImportError::Extraction(name)) => {
            eprintln!(
                "{} could not read a text member from {}; re-export the chat as plain text",
                "error:".red().bold(),
                name
            );
            std::process::exit(1);
        }
        Err(err) => return Err(Box::new(err)),
    };

    let (mut records, _) = open_stores(args)?;
    let today = today_seoul_key();
    let record = records.add_or_update(
        &today,
        ImportDraft {
            source_file_name: Some(path.to_string()),
            ..ImportDraft::from_parsed(&parsed)
        },
    )?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        print_record_line(&record);
        if !parsed.tags.is_empty() {
            println!("  tags: {}", parsed.tags.join(", "));
        }
        if record.needs_risk_overlay() {
            for label in record.immediate_risk.labels() {
                println!("  {} {}", "!".red().bold(), label);
            }
        }
    }
    Ok(())
}

/// Interactive mode: paste lines, an empty line imports them as one batch
fn run_interactive(args: &Args) -> CliResult {
    let parser = ConversationParser::new();
    let (mut records, _) = open_stores(args)?;
    let today = today_seoul_key();

    print_header("Interactive Mode");
    println!("Paste conversation lines; an empty line imports the batch.");
    println!("Type 'quit' to exit.");
    println!();

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut batch: Vec<String> = Vec::new();

    loop {
        let bird = records
            .get(&today)
            .map(|record| bird_state_for_uploads(record.upload_count))
            .unwrap_or(BirdState::Healthy);
        print!("{} ", format_prompt(bird));
        stdout.flush()?;

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(_) => break,
        }

        let line = line.trim();
        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
            println!("\nSession ended.");
            break;
        }

        if !line.is_empty() {
            batch.push(line.to_string());
            continue;
        }
        if batch.is_empty() {
            continue;
        }

        let text = batch.join("\n");
        batch.clear();
        let parsed = parser.parse(&text);
        let record = records.add_or_update(&today, ImportDraft::from_parsed(&parsed))?;

        if args.json {
            println!("{}", serde_json::to_string(&record)?);
        } else {
            print_record_line(&record);
            if !parsed.tags.is_empty() {
                println!("  tags: {}", parsed.tags.join(", "));
            }
        }
    }
    Ok(())
}

/// Show the projected timeline
fn run_timeline(args: &Args) -> CliResult {
    let filter = match args.filter.as_deref() {
        None | Some("all") => None,
        Some(key) => match FlagKind::from_filter_key(key) {
            Some(kind) => Some(kind),
            None => {
                eprintln!(
                    "{} unknown filter '{}'; use money, favor, praise, link or image",
                    "error:".red().bold(),
                    key
                );
                std::process::exit(1);
            }
        },
    };

    let (records, _) = open_stores(args)?;
    let items = project(records.records(), filter);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    if items.is_empty() {
        println!("No records yet.");
        return Ok(());
    }
    for item in &items {
        print_timeline_item(item);
    }
    Ok(())
}

/// Complete today's learning
fn run_learn(args: &Args) -> CliResult {
    let (mut records, mut timeline) = open_stores(args)?;
    let today = today_seoul_key();

    match complete_learning(&mut records, &mut timeline, &today)? {
        None => {
            println!("No record for today ({}) - import a conversation first.", today);
        }
        Some(outcome) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&outcome.entry)?);
            } else {
                println!(
                    "{} Learning complete for {} ({})",
                    "✓".green(),
                    outcome.record.date,
                    outcome.risk_level
                );
                for sentence in learn_sentences(&outcome.record) {
                    println!("  - {}", sentence);
                }
                println!("  summary: {}", outcome.entry.summary);
                if !outcome.entry.tags.is_empty() {
                    println!("  tags: {}", outcome.entry.tags.join(", "));
                }
            }
        }
    }
    Ok(())
}

/// Run HTTP API server
async fn run_serve(args: &Args) -> CliResult {
    println!();
    println!("╔════════════════════════════════════╗");
    println!("║  🐦 BirdGuard API Server           ║");
    println!("║  Version: {}                    ║", VERSION);
    println!("╚════════════════════════════════════╝");
    println!();

    let storage: Arc<dyn Storage> = Arc::new(JsonFileStorage::new(&args.data_dir));
    birdguard::core::run_server(&args.addr, storage).await
}

/// Print header
fn print_header(mode: &str) {
    println!("{}", format!("BirdGuard v{} - {}", VERSION, mode).bold());
    println!("{}", "=".repeat(40));
}

/// Prompt carries today's bird state
fn format_prompt(bird: BirdState) -> String {
    format!("{} [{}] >", bird.emoji(), colorize_state(bird))
}

fn colorize_state(bird: BirdState) -> colored::ColoredString {
    match bird {
        BirdState::Healthy => bird.to_string().green(),
        BirdState::Uneasy => bird.to_string().yellow(),
        BirdState::Distorted => bird.to_string().magenta(),
        BirdState::Critical => bird.to_string().red().bold(),
    }
}

fn print_record_line(record: &DayRecord) {
    let bird = bird_state_for_uploads(record.upload_count);
    println!(
        "{} {} | uploads={} | flags={} | state={}",
        bird.emoji(),
        record.date,
        record.upload_count,
        record.flags.count(),
        colorize_state(bird)
    );
}

fn print_timeline_item(item: &TimelineItem) {
    let learned = if item.learned { "✓" } else { " " };
    println!(
        "{} {} {} {} | {}",
        item.bird.emoji(),
        item.date_label,
        learned,
        colorize_state(item.bird),
        item.title
    );
    if let Some(ref subtitle) = item.subtitle {
        println!("    {}", subtitle);
    }
    if !item.tags.is_empty() {
        println!("    tags: {}", item.tags.join(", "));
    }
}
