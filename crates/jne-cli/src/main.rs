use clap::{Args as ClapArgs, Parser, Subcommand};
use jne_core::{
    DocumentStore, EditSession, EditValue, FileStore, MemoryStore, Path, SaveOutcome, StoreOptions,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "jne",
    about = "Inspect and edit the scalar fields of a single node in a JSON document",
    version
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Print the node's path and its editable fields
    Show(ShowArgs),
    /// Print the display form of a path
    Path(NodeArgs),
    /// Apply field edits to a node; commits in place unless --out or --dry-run
    Edit(EditArgs),
}

#[derive(ClapArgs, Debug)]
struct NodeArgs {
    /// Path as a JSON array, e.g. '["users",0]'
    #[arg(long, conflicts_with = "ptr")]
    path: Option<String>,
    /// Path as a JSON Pointer, e.g. /users/0
    #[arg(long)]
    ptr: Option<String>,
}

#[derive(ClapArgs, Debug)]
struct ShowArgs {
    /// JSON document to read
    file: PathBuf,
    #[command(flatten)]
    node: NodeArgs,
}

#[derive(ClapArgs, Debug)]
struct EditArgs {
    /// JSON document to edit
    file: PathBuf,
    #[command(flatten)]
    node: NodeArgs,
    /// Set a field to a string: key=value (repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE")]
    set: Vec<String>,
    /// Set a field to a scalar given as raw JSON: key=123, key=true, key=null (repeatable)
    #[arg(long = "set-json", value_name = "KEY=JSON")]
    set_json: Vec<String>,
    /// Convert --set text to each field's original kind where it parses
    #[arg(long, default_value_t = false)]
    coerce: bool,
    /// Write the updated document here instead of replacing the input
    #[arg(long)]
    out: Option<PathBuf>,
    /// Print the updated document instead of writing it
    #[arg(long, default_value_t = false, conflicts_with = "out")]
    dry_run: bool,
    /// Do not zip the previous contents before replacing the input
    #[arg(long, default_value_t = false)]
    no_backup: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Cmd::Show(a) => cmd_show(a),
        Cmd::Path(a) => cmd_path(a),
        Cmd::Edit(a) => cmd_edit(a),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// Absent --path/--ptr means no node is selected.
fn node_path(args: &NodeArgs) -> Option<Path> {
    let parsed = match (&args.path, &args.ptr) {
        (Some(p), _) => jne_core::parse_path(p),
        (None, Some(ptr)) => jne_core::parse_pointer(ptr),
        (None, None) => return None,
    };
    Some(parsed.unwrap_or_else(|e| {
        eprintln!("error: {}", e);
        std::process::exit(3);
    }))
}

fn split_assignment(arg: &str) -> (&str, &str) {
    arg.split_once('=').unwrap_or_else(|| {
        eprintln!("invalid assignment (expected KEY=VALUE): {}", arg);
        std::process::exit(3);
    })
}

fn cmd_show(args: ShowArgs) {
    let store = FileStore::new(&args.file, StoreOptions::default());
    let path = node_path(&args.node).unwrap_or_default();
    let session = EditSession::open(&store, Some(path)).unwrap_or_else(|e| {
        eprintln!("error: {}", e);
        std::process::exit(2);
    });
    println!("{}", session.path_display());
    for row in session.fields() {
        println!(
            "{}\t{}\t{}",
            row.key.as_deref().unwrap_or_default(),
            row.kind,
            row.value.as_ref().map(|v| v.to_string()).unwrap_or_default()
        );
    }
}

fn cmd_path(args: NodeArgs) {
    let path = node_path(&args);
    println!("{}", jne_core::format_path(path.as_deref()));
}

fn cmd_edit(args: EditArgs) {
    let path = node_path(&args.node);
    let mut file_store = FileStore::new(
        &args.file,
        StoreOptions { backup_on_save: !args.no_backup },
    );
    // --out and --dry-run work on a copy so the input file is never touched.
    let mut copy = if args.out.is_some() || args.dry_run {
        let text = file_store.load().unwrap_or_else(|e| {
            eprintln!("error: {}", e);
            std::process::exit(2);
        });
        Some(MemoryStore::new(text))
    } else {
        None
    };
    let store: &mut dyn DocumentStore = match copy.as_mut() {
        Some(m) => m,
        None => &mut file_store,
    };

    let mut session = EditSession::open(&*store, path)
        .unwrap_or_else(|e| {
            eprintln!("error: {}", e);
            std::process::exit(2);
        })
        .with_coercion(args.coerce);
    for arg in &args.set {
        let (key, value) = split_assignment(arg);
        session.set_text(key, value);
    }
    for arg in &args.set_json {
        let (key, raw) = split_assignment(arg);
        let value = serde_json::from_str::<serde_json::Value>(raw)
            .ok()
            .as_ref()
            .and_then(EditValue::from_scalar)
            .unwrap_or_else(|| {
                eprintln!("invalid --set-json value for {} (expected a JSON scalar): {}", key, raw);
                std::process::exit(3);
            });
        session.set(key, value);
    }

    match session.save(store) {
        SaveOutcome::Saved { fields } => tracing::info!(fields, "saved"),
        SaveOutcome::NoNode => {
            eprintln!("no node selected (pass --path or --ptr); nothing saved");
            return;
        }
        SaveOutcome::Failed(e) => {
            eprintln!("error: {}", e);
            std::process::exit(4);
        }
    }

    if let Some(copy) = copy {
        if let Some(out) = args.out {
            std::fs::write(&out, copy.text()).unwrap_or_else(|e| {
                eprintln!("error writing: {}", e);
                std::process::exit(2);
            });
        } else {
            println!("{}", copy.text());
        }
    } else if let Some(backup) = file_store.last_backup() {
        eprintln!("backup: {}", backup.display());
    }
}
