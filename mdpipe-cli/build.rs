use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of the inspect targets from src/inspect.rs
// We need to duplicate this here since build scripts can't access src/ modules
const AVAILABLE_TARGETS: &[&str] = &[
    "mdast", "hast", "parse", "toc", "to-html", "sanitize", "format",
];

fn input_arg() -> Arg {
    Arg::new("input")
        .help("Markdown file to read ('-' for stdin)")
        .required(true)
        .index(1)
        .value_hint(ValueHint::FilePath)
}

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = Command::new("mdpipe")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Render markdown to formatted HTML")
        .arg_required_else_help(true)
        .arg(
            Arg::new("list-stages")
                .long("list-stages")
                .help("List the configured pipeline stages")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .action(ArgAction::Count),
        )
        .subcommand(
            Command::new("convert").arg(input_arg()).arg(
                Arg::new("output")
                    .long("output")
                    .short('o')
                    .value_hint(ValueHint::FilePath),
            ),
        )
        .subcommand(
            Command::new("inspect").arg(input_arg()).arg(
                Arg::new("target")
                    .value_parser(clap::builder::PossibleValuesParser::new(AVAILABLE_TARGETS))
                    .index(2)
                    .value_hint(ValueHint::Other),
            ),
        )
        .subcommand(
            Command::new("bench")
                .arg(input_arg())
                .arg(Arg::new("iterations").long("iterations").short('n'))
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_hint(ValueHint::FilePath),
                ),
        );

    // Generate completions for bash
    generate_to(Bash, &mut cmd, "mdpipe", &outdir)?;

    // Generate completions for zsh
    generate_to(Zsh, &mut cmd, "mdpipe", &outdir)?;

    // Generate completions for fish
    generate_to(Fish, &mut cmd, "mdpipe", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
