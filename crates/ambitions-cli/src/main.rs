//! Ambitions CLI - ambition data builder and browser.
//!
//! Single binary that provides:
//! - `ambitions build` - normalize reference records into the JSON document
//! - `ambitions query` - rank ambitions for a set of filter selections,
//!   once or interactively from stdin
//! - `ambitions init` - write a default configuration

use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Instant;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use ambitions_core::config::CONFIG_PATH;
use ambitions_core::engine::{class_options, nation_options, Section};
use ambitions_core::pipeline::{self, read_document};
use ambitions_core::{
    AmbitionDocument, AvailabilityEngine, CompletedBucket, FilterContext, FilterEvent,
    PipelineConfig, RankedView, Session,
};

#[derive(Parser)]
#[command(name = "ambitions")]
#[command(about = "Ambition data builder and browser", version)]
struct Cli {
    /// Project root directory
    #[arg(short, long, global = true)]
    project: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the ambition document from reference XML
    Build {
        /// Reference XML directory (overrides config)
        #[arg(long)]
        reference: Option<PathBuf>,

        /// Output JSON file (overrides config)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Rank ambitions for a set of filter selections
    Query(QueryArgs),

    /// Initialize a new project
    Init,
}

#[derive(clap::Args)]
struct QueryArgs {
    /// Ambition document (defaults to the configured output)
    #[arg(long)]
    data: Option<PathBuf>,

    /// Selected nation id, e.g. NATION_ROME
    #[arg(long)]
    nation: Option<String>,

    /// Selected family class id (repeatable)
    #[arg(long = "family")]
    families: Vec<String>,

    /// Completed ambitions: `all` or 0-9
    #[arg(long, default_value = "all")]
    completed: CompletedBucket,

    /// Ambition class id
    #[arg(long)]
    category: Option<i64>,

    /// Free-text search
    #[arg(long, default_value = "")]
    search: String,

    /// Keep unavailable ambitions in the listing
    #[arg(long)]
    show_unavailable: bool,

    /// Print the ranking as JSON
    #[arg(long)]
    json: bool,

    /// List selectable nations and classes instead of ranking
    #[arg(long)]
    options: bool,

    /// Read filter commands from stdin and re-rank after each change
    #[arg(short, long, conflicts_with_all = ["json", "options"])]
    interactive: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Find project root
    let project_root = match cli.project {
        Some(path) => path,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Some(Commands::Build { reference, output }) => build(&project_root, reference, output),
        Some(Commands::Query(args)) => query(&project_root, args),
        Some(Commands::Init) => init_project(&project_root),
        None => {
            println!("Ambitions - ambition data builder and browser");
            println!();
            println!("Usage: ambitions <COMMAND>");
            println!();
            println!("Commands:");
            println!("  build     Build the ambition document");
            println!("  query     Rank ambitions for filter selections");
            println!("  init      Initialize a new project");
            println!();
            println!("Run 'ambitions --help' for more information.");
            Ok(())
        }
    }
}

fn load_config(project_root: &Path) -> Result<PipelineConfig> {
    let mut config = PipelineConfig::load_from_project(project_root)?;
    config.resolve_paths(project_root);
    Ok(config)
}

fn build(project_root: &Path, reference: Option<PathBuf>, output: Option<PathBuf>) -> Result<()> {
    let mut config = load_config(project_root)?;
    if let Some(reference) = reference {
        config.reference_dir = project_root.join(reference);
    }
    if let Some(output) = output {
        config.output = project_root.join(output);
    }

    let report = pipeline::run(&config)?;

    println!("Wrote {}", report.output.display());
    println!("  Ambitions:      {}", report.ambitions);
    println!("  National:       {}", report.national);
    println!("  Event-only:     {}", report.event_only);
    println!("  Nations:        {}", report.nations);
    println!("  Family classes: {}", report.family_classes);
    Ok(())
}

fn query(project_root: &Path, args: QueryArgs) -> Result<()> {
    let config = load_config(project_root)?;
    let data = match &args.data {
        Some(path) => project_root.join(path),
        None => config.output.clone(),
    };
    let document = read_document(&data)?;
    tracing::debug!(
        path = %data.display(),
        ambitions = document.ambitions.len(),
        "Loaded ambition document"
    );

    if args.options {
        print_options(&document);
        return Ok(());
    }

    let ctx = filter_context(&document, &args);

    if args.interactive {
        return interactive(Session::with_config(document, &config.engine).with_context(ctx));
    }

    let view = AvailabilityEngine::rank(&document.ambitions, &ctx);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&view_json(&view))?);
    } else {
        print_view(&view);
    }
    Ok(())
}

fn filter_context(document: &AmbitionDocument, args: &QueryArgs) -> FilterContext {
    let mut ctx = FilterContext {
        completed: args.completed,
        category: args.category,
        search: args.search.clone(),
        show_unavailable: args.show_unavailable,
        ..FilterContext::default()
    };
    for family in &args.families {
        if !ctx.has_family(family) {
            ctx.toggle_family(document, family);
        }
    }
    ctx.select_nation(document, args.nation.clone());
    ctx
}

const INTERACTIVE_HELP: &str = "\
Commands:
  nation [ID]          select a nation, or clear it
  family ID            toggle a family class
  completed N|all      completed ambitions
  category [N]         select an ambition class, or clear it
  search [TEXT]        search text (applied after the search delay)
  unavailable on|off   show or hide unavailable ambitions
  families             list family classes for the current nation
  show                 print the current ranking
  help                 this message
  quit                 exit";

/// Line-driven session. Stdin is read on a helper thread; pending search
/// text is committed once its deadline passes.
fn interactive(mut session: Session) -> Result<()> {
    tracing::debug!(delay = ?session.search_delay(), "Starting interactive session");

    let (tx, rx) = mpsc::channel::<String>();
    thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    println!("{INTERACTIVE_HELP}");
    println!();
    print_view(&session.view());

    loop {
        let received = match session.next_deadline() {
            Some(deadline) => rx.recv_timeout(deadline.saturating_duration_since(Instant::now())),
            None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };

        let line = match received {
            Ok(line) => line,
            Err(RecvTimeoutError::Timeout) => {
                if let Some(view) = session.tick(Instant::now()) {
                    print_view(&view);
                }
                continue;
            }
            Err(RecvTimeoutError::Disconnected) => break,
        };

        let line = line.trim_end();
        match line.trim() {
            "" => continue,
            "quit" | "exit" => break,
            "help" => println!("{INTERACTIVE_HELP}"),
            "show" => print_view(&session.view()),
            "families" => {
                for option in session.family_options() {
                    let mark = if option.checked { 'x' } else { ' ' };
                    let note = if option.enabled { "" } else { " (not offered)" };
                    println!("  [{mark}] {:<24} {}{note}", option.id, option.name);
                }
            }
            _ => match line.parse::<FilterEvent>() {
                Ok(event) => {
                    if let Some(view) = session.apply(event, Instant::now()) {
                        print_view(&view);
                    }
                }
                Err(err) => eprintln!("{err} (try `help`)"),
            },
        }
    }

    // input closed with search text still pending
    if let Some(deadline) = session.next_deadline() {
        if let Some(view) = session.tick(deadline) {
            print_view(&view);
        }
    }
    Ok(())
}

fn print_options(document: &AmbitionDocument) {
    println!("Nations:");
    for nation in nation_options(document) {
        match &nation.dlc {
            Some(dlc) => println!("  {:<24} {} ({})", nation.id, nation.name, dlc),
            None => println!("  {:<24} {}", nation.id, nation.name),
        }
    }
    println!();
    println!("Classes:");
    for (id, name) in class_options(document) {
        println!("  {id:>3}  {name}");
    }
}

fn print_view(view: &RankedView<'_>) {
    println!("{}", view.summary());

    if view.is_empty() {
        println!();
        println!("No ambitions match your filters.");
        return;
    }

    print_section("Ambitions", &view.regular);
    print_section("National Ambitions", &view.national);
}

fn print_section(title: &str, section: &Section<'_>) {
    if section.entries.is_empty() {
        return;
    }

    println!();
    println!("{title}");
    println!("{}", "=".repeat(title.len()));
    for entry in &section.entries {
        let ambition = entry.ambition;
        let marker = if entry.availability.available { ' ' } else { 'x' };
        println!(
            "{marker} [T{}-{}] {} ({})",
            ambition.min_tier, ambition.max_tier, ambition.name, ambition.ambition_class_name
        );
        for line in ambition.requirements.describe() {
            println!("      - {line}");
        }
        if let Some(event) = &ambition.event_source {
            let name = event.event_name.as_deref().unwrap_or("Unused");
            println!("      event: {name} ({})", event.trigger);
        }
        for reason in &entry.availability.reasons {
            println!("      ! {reason}");
        }
    }
}

fn view_json(view: &RankedView<'_>) -> serde_json::Value {
    let section = |section: &Section<'_>| {
        serde_json::json!({
            "available": section.available,
            "total": section.total,
            "entries": section.entries.iter().map(|entry| serde_json::json!({
                "id": entry.ambition.id,
                "name": entry.ambition.name,
                "minTier": entry.ambition.min_tier,
                "available": entry.availability.available,
                "reasons": entry.availability.reasons,
            })).collect::<Vec<_>>(),
        })
    };

    serde_json::json!({
        "summary": view.summary(),
        "targetTier": view.target_tier,
        "regular": section(&view.regular),
        "national": section(&view.national),
    })
}

fn init_project(project_root: &Path) -> Result<()> {
    let config_path = project_root.join(CONFIG_PATH);
    if config_path.exists() {
        println!("Config already exists at {}", config_path.display());
        return Ok(());
    }

    PipelineConfig::default().save(&config_path)?;

    println!("Initialized ambitions project at {}", project_root.display());
    println!();
    println!("Created:");
    println!("  {CONFIG_PATH} - pipeline configuration");
    println!();
    println!("Next steps:");
    println!("  1. Point reference_dir at the game's Reference/XML/Infos directory");
    println!("  2. Run: ambitions build");
    println!("  3. Run: ambitions query --completed 0");
    println!("  4. Run: ambitions query --interactive");
    Ok(())
}
