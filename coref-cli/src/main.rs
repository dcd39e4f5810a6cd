//! Command-line interface for coref
//! This binary converts coreference annotations between CoNLL-U, marked-up text and cluster JSON.
//!
//! Usage:
//!   coref conllu2text `<file>` [-o `<out>`] [-z] [-b] [-s] [-x]
//!   coref conllu2json `<file>` [-o `<out>`] [-z] [-b] [--no-empty-node-form]
//!   coref text2conllu `<file>` `<skeleton>` [-o `<out>`] [-z] [-x]
//!   coref json2conllu `<file>` `<skeleton>` [-o `<out>`] [-g]
//!
//! Settings come from the embedded defaults, then `coref.toml` in the working directory,
//! then `--config <file>`, then the flags above.

mod commands;

use clap::{Arg, ArgAction, Command};
use tracing_subscriber::EnvFilter;

fn output_arg() -> Arg {
    Arg::new("output")
        .long("output")
        .short('o')
        .help("Output path (default: the input path with the target extension)")
}

fn flag(name: &'static str, short: char, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .short(short)
        .help(help)
        .action(ArgAction::SetTrue)
}

fn build_cli() -> Command {
    Command::new("coref")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert coreference annotations between CoNLL-U, text and JSON")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .help("Configuration file layered over the defaults")
                .global(true),
        )
        .subcommand(
            Command::new("conllu2text")
                .about("Render CoNLL-U coreference as marked-up text, one document per line")
                .arg(Arg::new("file").help("CoNLL-U input").required(true).index(1))
                .arg(output_arg())
                .arg(flag("zero-mentions", 'z', "Include empty tokens and their mentions"))
                .arg(flag("blind", 'b', "Discard coreference annotations"))
                .arg(flag("sequential-ids", 's', "Renumber entity ids starting from e1"))
                .arg(flag("xml-like", 'x', "Use <e1>…</e1> tags instead of brackets")),
        )
        .subcommand(
            Command::new("conllu2json")
                .about("Render CoNLL-U coreference as token-offset clusters")
                .arg(Arg::new("file").help("CoNLL-U input").required(true).index(1))
                .arg(output_arg())
                .arg(flag("zero-mentions", 'z', "Include empty tokens and their mentions"))
                .arg(flag("blind", 'b', "Discard coreference annotations"))
                .arg(
                    Arg::new("no-empty-node-form")
                        .long("no-empty-node-form")
                        .help("Render every empty token as a bare ##")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("text2conllu")
                .about("Apply marked-up text to a CoNLL-U skeleton")
                .arg(Arg::new("file").help("Marked-up text input").required(true).index(1))
                .arg(Arg::new("skeleton").help("CoNLL-U skeleton").required(true).index(2))
                .arg(output_arg())
                .arg(
                    flag("use-gold-empty-nodes", 'z', "Keep the skeleton's empty tokens")
                        .visible_alias("zero-mentions"),
                )
                .arg(flag("xml-like", 'x', "Read <e1>…</e1> tags instead of brackets")),
        )
        .subcommand(
            Command::new("json2conllu")
                .about("Apply token-offset clusters to a CoNLL-U skeleton")
                .arg(Arg::new("file").help("Cluster JSON input").required(true).index(1))
                .arg(Arg::new("skeleton").help("CoNLL-U skeleton").required(true).index(2))
                .arg(output_arg())
                .arg(flag("use-gold-empty-nodes", 'g', "Keep the skeleton's empty tokens")),
        )
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();
    let matches = build_cli().get_matches();
    if let Err(e) = commands::run(&matches) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
