use clap::{Args as ClapArgs, Parser, Subcommand};
use npatch_core::{
    DocumentSource, DocumentStyle, EditSession, EditorOptions, FileDocument, MemoryBuffer, MemoryDocument, Node,
    NodePath,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "npatch",
    about = "View and patch a single node of a JSON document",
    version
)]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Print the flat (editable) projection of a node
    Show(NodeArgs),
    /// List the child rows of a node
    List(NodeArgs),
    /// Print the full value at a node
    Get(NodeArgs),
    /// Merge an edited projection back into the document
    Commit(CommitArgs),
}

#[derive(ClapArgs, Debug)]
struct Target {
    /// Path expression, e.g. $["customer"][0]
    #[arg(long, conflicts_with = "ptr")]
    path: Option<String>,
    /// JSON Pointer, e.g. /customer/0
    #[arg(long)]
    ptr: Option<String>,
}

impl Target {
    fn node_path(&self) -> Result<NodePath, npatch_core::PatchError> {
        match (&self.path, &self.ptr) {
            (Some(expr), _) => NodePath::parse_expression(expr),
            (None, Some(ptr)) => NodePath::from_pointer(ptr),
            (None, None) => Ok(NodePath::root()),
        }
    }
}

#[derive(ClapArgs, Debug)]
struct NodeArgs {
    /// JSON file to load
    file: PathBuf,
    #[command(flatten)]
    target: Target,
}

#[derive(ClapArgs, Debug)]
struct CommitArgs {
    /// JSON file to load
    file: PathBuf,
    #[command(flatten)]
    target: Target,
    /// Edited projection as raw JSON (e.g. {"age":31}, [1,2], 5)
    #[arg(long, conflicts_with = "draft_file")]
    draft: Option<String>,
    /// Read the edited projection from a file
    #[arg(long)]
    draft_file: Option<PathBuf>,
    /// Write the new document here; otherwise prints to stdout
    #[arg(long, conflicts_with = "in_place")]
    out: Option<PathBuf>,
    /// Overwrite the input file
    #[arg(long, default_value_t = false)]
    in_place: bool,
    /// Zip the file about to be overwritten first
    #[arg(long, default_value_t = false)]
    backup: bool,
    /// Write the document on one line
    #[arg(long, default_value_t = false)]
    compact: bool,
    /// Indentation width for pretty output
    #[arg(long, default_value_t = 2)]
    indent: usize,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Show(a) => cmd_show(a),
        Cmd::List(a) => cmd_list(a),
        Cmd::Get(a) => cmd_get(a),
        Cmd::Commit(a) => cmd_commit(a),
    }
}

fn load(file: &Path) -> serde_json::Value {
    let text = FileDocument::new(file).read().unwrap_or_else(|e| {
        eprintln!("error: {}", e);
        std::process::exit(2);
    });
    serde_json::from_str(&text).unwrap_or_else(|e| {
        eprintln!("invalid JSON in {}: {}", file.display(), e);
        std::process::exit(2);
    })
}

fn target_path(target: &Target) -> NodePath {
    target.node_path().unwrap_or_else(|e| {
        eprintln!("error: {}", e);
        std::process::exit(3);
    })
}

fn select(args: &NodeArgs) -> Node {
    let root = load(&args.file);
    let path = target_path(&args.target);
    Node::from_document(&root, &path).unwrap_or_else(|| {
        eprintln!("not found: {}", path);
        std::process::exit(3);
    })
}

fn cmd_show(args: NodeArgs) {
    let node = select(&args);
    println!("{}", npatch_core::project(Some(&node)));
}

fn cmd_list(args: NodeArgs) {
    let node = select(&args);
    println!("{}", node.path);
    for row in &node.rows {
        println!("{}\t{:?}", row.key.as_deref().unwrap_or("-"), row.kind);
    }
}

fn cmd_get(args: NodeArgs) {
    let root = load(&args.file);
    let path = target_path(&args.target);
    match npatch_core::lookup(&root, &path) {
        Some(v) => println!("{}", EditorOptions::default().serialize(v)),
        None => {
            eprintln!("not found: {}", path);
            std::process::exit(3);
        }
    }
}

fn cmd_commit(args: CommitArgs) {
    let draft = match (&args.draft, &args.draft_file) {
        (Some(d), _) => d.clone(),
        (None, Some(f)) => std::fs::read_to_string(f).unwrap_or_else(|e| {
            eprintln!("error reading draft: {}", e);
            std::process::exit(2);
        }),
        (None, None) => {
            eprintln!("error: one of --draft or --draft-file is required");
            std::process::exit(2);
        }
    };
    let options = EditorOptions {
        style: if args.compact { DocumentStyle::Compact } else { DocumentStyle::Pretty },
        indent: args.indent,
    };
    let path = target_path(&args.target);
    let output = match (&args.out, args.in_place) {
        (Some(out), _) => Some(out.clone()),
        (None, true) => Some(args.file.clone()),
        (None, false) => None,
    };

    // An unparseable document still gets a session; commit replaces it.
    let text = FileDocument::new(&args.file).read().unwrap_or_else(|e| {
        eprintln!("error: {}", e);
        std::process::exit(2);
    });
    let node = serde_json::from_str::<serde_json::Value>(&text)
        .ok()
        .and_then(|root| Node::from_document(&root, &path))
        .unwrap_or_else(|| Node::new(path.clone(), Vec::new()));
    let mut session = EditSession::with_options(Some(node), options);
    session.enter_edit();
    session.set_draft(draft);

    match commit_session(&mut session, &args.file, text, output, args.backup) {
        Ok(done) => {
            if let Some(zip) = &done.backup {
                eprintln!("backup: {}", zip.display());
            }
            if let Some(doc) = &done.stdout {
                println!("{}", doc);
            }
            eprintln!("{}", session.baseline());
        }
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(exit_code(&e));
        }
    }
}

#[derive(Debug, Default)]
struct CommitOutput {
    /// New document, when it is not written to a file.
    stdout: Option<String>,
    backup: Option<PathBuf>,
}

/// Commits to `output` when given, otherwise to an in-memory copy of `text`
/// that is handed back for printing.
fn commit_session(
    session: &mut EditSession,
    file: &Path,
    text: String,
    output: Option<PathBuf>,
    backup: bool,
) -> Result<CommitOutput, npatch_core::PatchError> {
    let mut buffer = MemoryBuffer::default();
    match output {
        Some(out) => {
            let mut store = FileDocument::new(file).with_output(out).with_backup(backup);
            let res = session.commit(&mut store, &mut buffer);
            let backup = store.backup_path().map(Path::to_path_buf);
            res.map(|_| CommitOutput { stdout: None, backup })
        }
        None => {
            let mut store = MemoryDocument::new(text);
            session.commit(&mut store, &mut buffer)?;
            Ok(CommitOutput {
                stdout: Some(store.text().to_string()),
                backup: None,
            })
        }
    }
}

fn exit_code(e: &npatch_core::PatchError) -> i32 {
    match e {
        npatch_core::PatchError::Store(_) => 5,
        _ => 4,
    }
}
