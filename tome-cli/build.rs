use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of the value lists from src/main.rs and src/commands.rs
// We need to duplicate them here since build scripts can't access src/ modules
const ROLLER_MODES: &[&str] = &["disabled", "enabled", "enabled-using-fs"];
const TABLE_KINDS: &[&str] = &["markdown", "html"];
const OUTPUT_FORMATS: &[&str] = &["markdown", "json"];

fn input_arg() -> Arg {
    Arg::new("input")
        .help("Input file path, or - for stdin")
        .required(true)
        .index(1)
        .value_hint(ValueHint::FilePath)
}

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = Command::new("tome")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Render inline {@tag} markup to Markdown")
        .arg_required_else_help(true)
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
                .about("Render a text file to Markdown")
                .arg(input_arg())
                .arg(
                    Arg::new("roller")
                        .long("roller")
                        .value_parser(clap::builder::PossibleValuesParser::new(ROLLER_MODES)),
                )
                .arg(Arg::new("source").long("source"))
                .arg(Arg::new("page").long("page"))
                .arg(
                    Arg::new("table")
                        .long("table")
                        .value_parser(clap::builder::PossibleValuesParser::new(TABLE_KINDS)),
                )
                .arg(Arg::new("trait").long("trait").action(ArgAction::SetTrue))
                .arg(Arg::new("admonition").long("admonition"))
                .arg(
                    Arg::new("format")
                        .long("format")
                        .value_parser(clap::builder::PossibleValuesParser::new(OUTPUT_FORMATS)),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("embed")
                .about("Re-fence a rendered note for embedding under a list item")
                .arg(input_arg())
                .arg(Arg::new("indent").long("indent")),
        );

    // Generate completions for bash
    generate_to(Bash, &mut cmd, "tome", &outdir)?;

    // Generate completions for zsh
    generate_to(Zsh, &mut cmd, "tome", &outdir)?;

    // Generate completions for fish
    generate_to(Fish, &mut cmd, "tome", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
