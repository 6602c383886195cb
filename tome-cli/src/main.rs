// Command-line interface for tome
//
// The tome program feeds already-merged record text through the markup engine and prints
// Markdown. Tags are resolved against the frames given on the command line (source, table,
// trait), footnotes are collected at the end, and the result can be wrapped in an admonition.
//
// Usage:
//  tome <input> [options]                  - Render a file (default)
//  tome render <input|-> [options]         - Same as above (explicit)
//  tome embed <input|-> [--indent STR]     - Re-fence a rendered note for list embedding
//  tome --list-tags                        - List recognized tags
//
// Configuration is read from the built-in defaults, then ./tome.toml, then --config PATH.
// Warnings never change the exit status; --strict turns error diagnostics into exit code 2.

use tome_cli::commands::{self, RenderReport, RenderSettings, TableKind};

use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use tome_config::{Loader, TomeConfig};

const SUBCOMMANDS: &[&str] = &["render", "embed", "help"];

const ROLLER_MODES: &[&str] = &["disabled", "enabled", "enabled-using-fs"];

fn build_cli() -> Command {
    Command::new("tome")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Render inline {@tag} markup to Markdown")
        .long_about(
            "tome resolves inline tags such as {@dice 1d6}, {@hit +4} and {@footnote ...}\n\
            into Markdown, optionally using dice roller plugin markers.\n\n\
            Commands:\n  \
            - render: Render a text file (default command)\n  \
            - embed:  Re-fence a rendered note so it can be nested in a list\n\n\
            Examples:\n  \
            tome goblin.txt                              # Render to stdout\n  \
            tome goblin.txt --roller enabled             # Emit roller markers\n  \
            tome render cell.txt --table markdown        # Render a table cell\n  \
            tome render - --format json < goblin.txt     # JSON report from stdin",
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
        .arg(
            Arg::new("list-tags")
                .long("list-tags")
                .help("List recognized tags")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a tome.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("strict")
                .long("strict")
                .help("Exit with status 2 when error diagnostics were reported")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("render")
                .about("Render a text file to Markdown (default command)")
                .long_about(
                    "Render a text file to Markdown.\n\n\
                    Paragraphs (separated by blank lines) are rendered one at a time under\n\
                    the frames selected by the options below. Footnotes are appended at the\n\
                    end, followed by a source line when --source is given.\n\n\
                    Examples:\n  \
                    tome render goblin.txt --source MM --page 166\n  \
                    tome render trait.txt --trait --roller enabled-using-fs --admonition statblock",
                )
                .arg(
                    Arg::new("input")
                        .help("Input file path, or - for stdin")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("roller")
                        .long("roller")
                        .help("Dice roller mode (overrides dice.roller from config)")
                        .value_parser(clap::builder::PossibleValuesParser::new(ROLLER_MODES)),
                )
                .arg(
                    Arg::new("source")
                        .long("source")
                        .value_name("ID")
                        .help("Source the text comes from, cited at the end"),
                )
                .arg(
                    Arg::new("page")
                        .long("page")
                        .value_name("N")
                        .help("Page within the source")
                        .value_parser(clap::value_parser!(u32))
                        .default_value("0"),
                )
                .arg(
                    Arg::new("table")
                        .long("table")
                        .help("Render as the content of a table cell")
                        .value_parser(clap::builder::PossibleValuesParser::new(
                            commands::TABLE_KINDS,
                        )),
                )
                .arg(
                    Arg::new("trait")
                        .long("trait")
                        .help("Render as a statblock trait embedded in YAML")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("admonition")
                        .long("admonition")
                        .value_name("KIND")
                        .help("Wrap the output in an ad-<KIND> admonition"),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .help("Output format")
                        .value_parser(clap::builder::PossibleValuesParser::new(
                            commands::OUTPUT_FORMATS,
                        ))
                        .default_value("markdown"),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file path (defaults to stdout)")
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("embed")
                .about("Re-fence a rendered note for embedding under a list item")
                .arg(
                    Arg::new("input")
                        .help("Input file path, or - for stdin")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("indent")
                        .long("indent")
                        .value_name("STR")
                        .help("Indentation prefixed to every line (defaults to render.list_indent)"),
                ),
        )
}

/// Insert `render` when the first argument is a path rather than a subcommand.
fn with_default_subcommand(args: &[String]) -> Option<Vec<String>> {
    let first = args.get(1)?;
    if first.starts_with('-') && first != "-" {
        return None;
    }
    if SUBCOMMANDS.contains(&first.as_str()) {
        return None;
    }
    let mut injected = vec![args[0].clone(), "render".to_string()];
    injected.extend_from_slice(&args[1..]);
    Some(injected)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().collect();

    let cli = build_cli();
    let matches = match cli.clone().try_get_matches_from(&args) {
        Ok(m) => m,
        Err(e) => match with_default_subcommand(&args) {
            Some(injected) => match cli.try_get_matches_from(&injected) {
                Ok(m) => m,
                Err(e2) => e2.exit(),
            },
            None => e.exit(),
        },
    };

    if matches.get_flag("list-tags") {
        handle_list_tags_command();
        return;
    }

    let strict = matches.get_flag("strict");
    let config_path = matches.get_one::<String>("config").map(|s| s.as_str());

    match matches.subcommand() {
        Some(("render", sub_matches)) => {
            let config = load_cli_config(config_path, sub_matches.get_one::<String>("roller"));
            handle_render_command(sub_matches, &config, strict);
        }
        Some(("embed", sub_matches)) => {
            let config = load_cli_config(config_path, None);
            handle_embed_command(sub_matches, &config, strict);
        }
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

fn handle_render_command(matches: &ArgMatches, config: &TomeConfig, strict: bool) {
    let input = matches
        .get_one::<String>("input")
        .expect("input is required");
    let text = read_input(input);

    let table = matches
        .get_one::<String>("table")
        .map(|raw| raw.parse::<TableKind>())
        .transpose()
        .unwrap_or_else(|e| {
            eprintln!("Error: {e}");
            std::process::exit(1);
        });
    let settings = RenderSettings {
        source: matches.get_one::<String>("source").cloned(),
        document: document_name(input),
        page: matches.get_one::<u32>("page").copied().unwrap_or(0),
        table,
        in_trait: matches.get_flag("trait"),
        admonition: matches.get_one::<String>("admonition").cloned(),
    };

    let report = commands::render_document(&text, config.render_options(), &settings);
    let format = matches
        .get_one::<String>("format")
        .map(|s| s.as_str())
        .unwrap_or("markdown");
    let output = match format {
        "json" => serde_json::to_string_pretty(&report).unwrap_or_else(|e| {
            eprintln!("Serialization error: {e}");
            std::process::exit(1);
        }) + "\n",
        _ => report.markdown.clone(),
    };

    write_output(matches.get_one::<String>("output").map(|s| s.as_str()), &output);
    finish(&report, strict);
}

fn handle_embed_command(matches: &ArgMatches, config: &TomeConfig, strict: bool) {
    let input = matches
        .get_one::<String>("input")
        .expect("input is required");
    let text = read_input(input);
    let indent = matches
        .get_one::<String>("indent")
        .cloned()
        .unwrap_or_else(|| config.render.list_indent.clone());

    let report = commands::embed_document(&text, config.render_options(), &indent);
    write_output(None, &report.markdown);
    finish(&report, strict);
}

fn handle_list_tags_command() {
    println!("Recognized tags:");
    for (family, names) in commands::known_tags() {
        println!("\n{family}:");
        for name in names {
            println!("  {{@{name}}}");
        }
    }
}

fn finish(report: &RenderReport, strict: bool) {
    if strict && report.has_errors() {
        std::process::exit(2);
    }
}

/// Source frame used when no `--source` is given
fn document_name(input: &str) -> String {
    if input == "-" {
        return "stdin".to_string();
    }
    Path::new(input)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| input.to_string())
}

fn read_input(input: &str) -> String {
    if input == "-" {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text).unwrap_or_else(|e| {
            eprintln!("Error reading stdin: {e}");
            std::process::exit(1);
        });
        return text;
    }
    fs::read_to_string(input).unwrap_or_else(|e| {
        eprintln!("Error reading file '{input}': {e}");
        std::process::exit(1);
    })
}

fn write_output(path: Option<&str>, text: &str) {
    match path {
        Some(path) => fs::write(path, text).unwrap_or_else(|e| {
            eprintln!("Error writing file '{path}': {e}");
            std::process::exit(1);
        }),
        None => print!("{text}"),
    }
}

fn load_cli_config(explicit_path: Option<&str>, roller: Option<&String>) -> TomeConfig {
    let loader = Loader::new().with_optional_file("tome.toml");
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };
    let loader = match roller {
        Some(mode) => loader.set_override("dice.roller", mode.as_str()),
        None => Ok(loader),
    };

    loader.and_then(Loader::build).unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {err}");
        std::process::exit(1);
    })
}
