use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use pl0asm::{assemble_expansion, assemble_with, macros, Config, Reachability};

#[derive(Debug, Parser)]
#[clap(author, version, about = "Assembler for the PL/0 stack machine")]
struct Args {
    /// Source file
    input: PathBuf,

    /// Binary output file [default: INPUT with a .bin extension]
    #[clap(short, long)]
    output: Option<PathBuf>,

    /// Maximum number of words to emit
    #[clap(long, default_value_t = pl0asm::DEFAULT_MAX_WORDS)]
    max_words: usize,

    /// Maximum number of labels
    #[clap(long, default_value_t = pl0asm::DEFAULT_LABEL_CAPACITY)]
    labels: usize,

    /// Drop instructions between an unconditional jump and the next label
    #[clap(long)]
    prune: bool,

    /// Assemble the input as-is, without macro expansion
    #[clap(long)]
    no_macros: bool,

    /// Also write a JSON symbol map to OUTPUT.sym
    #[clap(long)]
    symbols: bool,

    /// Print a listing of the generated code
    #[clap(short, long)]
    listing: bool,

    /// Log each pass (same as RUST_LOG=debug)
    #[clap(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let program_text = fs::read_to_string(&args.input)
        .with_context(|| format!("Couldn't read {}", args.input.display()))?;

    let config = Config {
        max_words: args.max_words,
        label_capacity: args.labels,
        reachability: if args.prune {
            Reachability::PruneAfterJump
        } else {
            Reachability::Keep
        },
    };
    let assembly = if args.no_macros {
        assemble_with(&program_text, &config)
    } else {
        assemble_expansion(&macros::expand(&program_text)?, &config)
    }
    .with_context(|| format!("Couldn't assemble {}", args.input.display()))?;

    let output = args
        .output
        .unwrap_or_else(|| args.input.with_extension("bin"));
    fs::write(&output, assembly.to_bytes())
        .with_context(|| format!("Couldn't write {}", output.display()))?;
    log::info!("wrote {} words to {}", assembly.len(), output.display());

    if args.symbols {
        let mut sym_name = output.clone().into_os_string();
        sym_name.push(".sym");
        fs::write(&sym_name, assembly.symbols().to_string()?)
            .with_context(|| format!("Couldn't write {}", PathBuf::from(&sym_name).display()))?;
    }

    if args.listing {
        print!("{}", assembly.listing());
    }

    Ok(())
}
