//! objtree command-line tool.
//!
//! Provides the `objtree` binary with subcommands for working with extracted
//! object trees: `render` turns a serialized tree into a Graphviz DOT digraph,
//! `check` validates one, `stats` summarizes one, and `demo` extracts a
//! built-in sample object graph.
//!
//! Exit codes: 0 = success, 1 = invalid input, 3 = I/O error.

mod demo;

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, Level};

use objtree_core::Tree;
use objtree_dot::{Palette, RenderOptions, Renderer};

/// Object graph extraction and rendering tools.
#[derive(Parser)]
#[command(name = "objtree", about = "Object graph extraction and rendering tools")]
struct Cli {
    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Render a serialized tree as a Graphviz DOT digraph.
    Render {
        /// Tree JSON file, or `-` for stdin.
        input: String,

        /// Output file (default: stdout).
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// JSON palette overriding the default colors.
        #[arg(long)]
        palette: Option<PathBuf>,

        /// Name of the emitted digraph.
        #[arg(long, default_value = "objtree")]
        name: String,
    },

    /// Validate a serialized tree.
    Check {
        /// Tree JSON file, or `-` for stdin.
        input: String,
    },

    /// Print statistics of a serialized tree as JSON.
    Stats {
        /// Tree JSON file, or `-` for stdin.
        input: String,
    },

    /// Extract the built-in sample object graph.
    Demo {
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Dot,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    let exit_code = match cli.command {
        Commands::Render {
            input,
            output,
            palette,
            name,
        } => run_render(&input, output.as_deref(), palette.as_deref(), name),
        Commands::Check { input } => run_check(&input),
        Commands::Stats { input } => run_stats(&input),
        Commands::Demo { format } => run_demo(format),
    };
    process::exit(exit_code);
}

/// Reads `input` (`-` = stdin) and parses it as a validated tree.
///
/// Returns the exit code on failure.
fn load_tree(input: &str) -> Result<Tree, i32> {
    let text = if input == "-" {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text).map(|_| text)
    } else {
        fs::read_to_string(input)
    };
    let text = match text {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error: failed to read '{}': {}", input, e);
            return Err(3);
        }
    };

    match Tree::from_json(&text) {
        Ok(tree) => {
            debug!(values = tree.values.len(), types = tree.types.len(), "loaded tree");
            Ok(tree)
        }
        Err(e) => {
            eprintln!("Error: {}: {}", input, e);
            Err(1)
        }
    }
}

/// Writes `text` to `output`, or stdout when none is given.
fn emit(text: &str, output: Option<&Path>) -> i32 {
    match output {
        Some(path) => match fs::write(path, text) {
            Ok(()) => 0,
            Err(e) => {
                eprintln!("Error: failed to write '{}': {}", path.display(), e);
                3
            }
        },
        None => {
            print!("{}", text);
            0
        }
    }
}

/// Execute the render subcommand.
fn run_render(input: &str, output: Option<&Path>, palette: Option<&Path>, name: String) -> i32 {
    let palette = match palette {
        Some(path) => match load_palette(path) {
            Ok(palette) => palette,
            Err(code) => return code,
        },
        None => Palette::default(),
    };
    let tree = match load_tree(input) {
        Ok(tree) => tree,
        Err(code) => return code,
    };

    let renderer = Renderer::new(RenderOptions {
        graph_name: name,
        palette,
    });
    match renderer.render(&tree) {
        Ok(dot) => emit(&dot, output),
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn load_palette(path: &Path) -> Result<Palette, i32> {
    let text = fs::read_to_string(path).map_err(|e| {
        eprintln!("Error: failed to read palette '{}': {}", path.display(), e);
        3
    })?;
    serde_json::from_str(&text).map_err(|e| {
        eprintln!("Error: invalid palette '{}': {}", path.display(), e);
        1
    })
}

/// Execute the check subcommand.
fn run_check(input: &str) -> i32 {
    match load_tree(input) {
        Ok(tree) => {
            println!("ok: {} values, {} types", tree.values.len(), tree.types.len());
            0
        }
        Err(code) => code,
    }
}

/// Execute the stats subcommand.
fn run_stats(input: &str) -> i32 {
    let tree = match load_tree(input) {
        Ok(tree) => tree,
        Err(code) => return code,
    };

    let mut json = match serde_json::to_value(tree.stats()) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Error: failed to serialize stats: {}", e);
            return 1;
        }
    };
    if let Some(object) = json.as_object_mut() {
        object.insert(
            "fingerprint".into(),
            serde_json::Value::String(tree.fingerprint().to_hex().to_string()),
        );
    }
    let text = serde_json::to_string_pretty(&json).unwrap_or_else(|e| {
        format!("{{\"error\": \"failed to serialize stats: {}\"}}", e)
    });
    println!("{}", text);
    0
}

/// Execute the demo subcommand.
fn run_demo(format: Format) -> i32 {
    let tree = demo::extract_demo();
    let text = match format {
        Format::Json => tree.to_json_pretty().map_err(|e| e.to_string()),
        Format::Dot => objtree_dot::render(&tree).map_err(|e| e.to_string()),
    };
    match text {
        Ok(text) => {
            println!("{}", text.trim_end());
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}
