//! Subcommand handlers
//!
//! Each handler resolves its settings (defaults, config files, flags), picks the input and
//! output paths and hands over to the matching `coref_babel` pipeline.

use std::error::Error;
use std::path::{Path, PathBuf};

use clap::ArgMatches;
use coref_babel::{
    conllu_to_json, conllu_to_text, default_output_path, json_to_conllu, text_to_conllu, Format,
    JsonFormat, TextFormat,
};
use coref_config::{CorefConfig, Loader, LOCAL_CONFIG};
use tracing::debug;

type CliResult<T> = Result<T, Box<dyn Error>>;

/// Dispatch the selected subcommand.
pub fn run(matches: &ArgMatches) -> CliResult<()> {
    match matches.subcommand() {
        Some(("conllu2text", sub)) => handle_conllu2text(sub),
        Some(("conllu2json", sub)) => handle_conllu2json(sub),
        Some(("text2conllu", sub)) => handle_text2conllu(sub),
        Some(("json2conllu", sub)) => handle_json2conllu(sub),
        _ => Err("no subcommand given".into()),
    }
}

/// Layer the config files, then switch on the settings key of every flag that was given.
/// `flags` pairs an argument id with its settings key.
fn load_config(
    matches: &ArgMatches,
    flags: &[(&str, &str)],
    tags: bool,
) -> CliResult<CorefConfig> {
    let mut loader = Loader::new().with_optional_file(LOCAL_CONFIG);
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }
    for (flag, key) in flags {
        if matches.get_flag(flag) {
            loader = loader.set_override(key, true)?;
        }
    }
    if tags {
        loader = loader.set_override("text.marker_style", "tags")?;
    }
    let config = loader.build()?;
    debug!(?config, "resolved configuration");
    Ok(config)
}

fn input(matches: &ArgMatches, name: &str) -> CliResult<PathBuf> {
    matches
        .get_one::<String>(name)
        .map(PathBuf::from)
        .ok_or_else(|| format!("missing argument <{name}>").into())
}

fn output(matches: &ArgMatches, input: &Path, extension: &str) -> PathBuf {
    matches
        .get_one::<String>("output")
        .map(PathBuf::from)
        .unwrap_or_else(|| default_output_path(input, extension))
}

/// Preferred file extension of a format.
fn extension(format: &dyn Format) -> &str {
    format.file_extensions().first().copied().unwrap_or(format.name())
}

fn handle_conllu2text(matches: &ArgMatches) -> CliResult<()> {
    let config = load_config(
        matches,
        &[
            ("zero-mentions", "text.zero_mentions"),
            ("blind", "text.blind"),
            ("sequential-ids", "text.sequential_ids"),
        ],
        matches.get_flag("xml-like"),
    )?;
    let file = input(matches, "file")?;
    let options = config.text_options();
    let target = output(matches, &file, extension(&TextFormat::new(options.marker_style)));
    conllu_to_text(&file, &target, &options)?;
    Ok(())
}

fn handle_conllu2json(matches: &ArgMatches) -> CliResult<()> {
    let mut config = load_config(
        matches,
        &[("zero-mentions", "json.zero_mentions"), ("blind", "json.blind")],
        false,
    )?;
    if matches.get_flag("no-empty-node-form") {
        config.json.empty_node_form = false;
    }
    let file = input(matches, "file")?;
    conllu_to_json(&file, &output(matches, &file, extension(&JsonFormat)), &config.json_options())?;
    Ok(())
}

fn handle_text2conllu(matches: &ArgMatches) -> CliResult<()> {
    let config = load_config(
        matches,
        &[("use-gold-empty-nodes", "conllu.use_gold_empty_nodes")],
        matches.get_flag("xml-like"),
    )?;
    let file = input(matches, "file")?;
    let skeleton = input(matches, "skeleton")?;
    let format = TextFormat::new(config.text.marker_style);
    text_to_conllu(
        &file,
        &skeleton,
        &output(matches, &file, "conllu"),
        &format,
        &config.decode_options(),
    )?;
    Ok(())
}

fn handle_json2conllu(matches: &ArgMatches) -> CliResult<()> {
    let config = load_config(
        matches,
        &[("use-gold-empty-nodes", "conllu.use_gold_empty_nodes")],
        false,
    )?;
    let file = input(matches, "file")?;
    let skeleton = input(matches, "skeleton")?;
    json_to_conllu(
        &file,
        &skeleton,
        &output(matches, &file, "conllu"),
        &config.decode_options(),
    )?;
    Ok(())
}
