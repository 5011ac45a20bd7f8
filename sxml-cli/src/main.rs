//! sxml command line tool
//!
//! Checks XML documents and rewrites them through the sxml tree model.

use std::fs::File;
use std::io::{self, BufWriter, Write};

use clap::{Parser, Subcommand};
use sxml::{EncodeOptions, Namespace, Node, TreeCodec, TreeEncoder};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

/// sxml document tool
#[derive(Parser)]
#[command(name = "sxml")]
#[command(version)]
#[command(about = "Check and reformat XML documents with the sxml tree model", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a file and report its size
    #[command(visible_alias = "c")]
    Check {
        /// Input file
        input: String,
    },

    /// Decode a file, tag every element with a namespace and encode it again
    #[command(visible_alias = "r")]
    Reformat {
        /// Input file
        input: String,

        /// Prefix written on every element
        #[arg(short, long)]
        prefix: String,

        /// Value of the xmlns declaration for the prefix
        #[arg(short, long)]
        namespace: String,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<String>,

        /// Write everything on one line
        #[arg(long)]
        compact: bool,
    },
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Check { input } => run_check(&input),
        Commands::Reformat {
            input,
            prefix,
            namespace,
            output,
            compact,
        } => run_reformat(&input, &prefix, &namespace, output.as_deref(), compact),
    };

    match result {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            let mut source = e.source();
            while let Some(cause) = source {
                error!("  caused by: {}", cause);
                source = cause.source();
            }
            std::process::ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Decodes a file and reports how many elements it holds.
fn run_check(input_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    debug!("Decoding: {}", input_path);
    let root = TreeCodec::decode_file(input_path)?;

    let root_name = root.borrow().name().to_string();
    info!(
        "{}: root element {} with {} elements",
        input_path,
        root_name,
        Node::subtree_size(&root)
    );
    Ok(())
}

/// Re-encodes a file with a namespace assigned to every element.
fn run_reformat(
    input_path: &str,
    prefix: &str,
    namespace: &str,
    output_path: Option<&str>,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    debug!("Decoding: {}", input_path);
    let root = TreeCodec::decode_file(input_path)?;
    Node::assign_namespace(&root, &Namespace::new(prefix, namespace));

    let options = EncodeOptions {
        pretty_print: !compact,
        ..Default::default()
    };

    // Get output writer
    let output: Box<dyn Write> = match output_path {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout()),
    };

    TreeEncoder::with_options(options).encode_to_writer(&root, output)?;

    info!("Reformat complete.");
    Ok(())
}
