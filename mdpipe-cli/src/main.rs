// Command-line interface for mdpipe
//
// This binary renders markdown files to HTML with the mdpipe pipeline, and offers a couple of
// tools around it: printing intermediate trees and timing repeated renders.
//
// Usage:
//  mdpipe <input> [--output <file>]                 - Render to HTML (default)
//  mdpipe convert <input> [--output <file>]         - Same as above (explicit)
//  mdpipe inspect <input> [<target>]                - Print an intermediate tree as JSON
//  mdpipe bench <input> [--iterations <n>]          - Time reading, building and rendering
//  mdpipe --list-stages                             - Show the configured stage order
//
// The input `-` reads from stdin.
//
// Configuration:
//
// Options come from the embedded defaults, then `mdpipe.toml` in the working directory if
// present, then the file given with --config.
//
// Extra Parameters:
//
// Settings can be overridden for a single run with --extra-<parameter-name> [value].
// The CLI layer strips the "extra-" prefix and applies known keys to the loaded configuration;
// whatever is left is passed on to the command.
// Example:
//  mdpipe README.md --extra-gfm --extra-toc-max-depth 3

mod bench;
mod inspect;

use clap::{Arg, ArgAction, Command, ValueHint};
use mdpipe::{Pipeline, PipelineOptions, ProcessError, VFile, WorkingDirectory};
use mdpipe_config::{Loader, MdpipeConfig, LOCAL_CONFIG_FILE};
use std::collections::HashMap;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::Arc;

const SUBCOMMANDS: &[&str] = &["convert", "inspect", "bench", "help"];

/// Working directory captured once at startup.
#[derive(Debug, Clone)]
struct CurrentDirectory(PathBuf);

impl CurrentDirectory {
    fn capture() -> Self {
        Self(std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/")))
    }
}

impl WorkingDirectory for CurrentDirectory {
    fn cwd(&self) -> PathBuf {
        self.0.clone()
    }
}

/// Parse extra-* arguments from command line args
/// Returns (cleaned_args_without_extras, extra_params_map)
///
/// Supports both:
/// - `--extra-<key> <value>` (explicit value)
/// - `--extra-<key>` (boolean flag, defaults to "true")
/// - `--extras-<key>` (alias for `--extra-<key>`)
fn parse_extra_args(args: &[String]) -> (Vec<String>, HashMap<String, String>) {
    let mut cleaned_args = Vec::new();
    let mut extra_params = HashMap::new();
    let mut i = 0;

    while i < args.len() {
        let arg = &args[i];

        let key_opt = if let Some(key) = arg.strip_prefix("--extra-") {
            Some(key)
        } else {
            arg.strip_prefix("--extras-")
        };

        if let Some(key) = key_opt {
            // A following argument that is not a flag is the value
            let has_value = i + 1 < args.len() && !args[i + 1].starts_with('-');

            if has_value {
                extra_params.insert(key.to_string(), args[i + 1].clone());
                i += 2;
            } else {
                extra_params.insert(key.to_string(), "true".to_string());
                i += 1;
            }
            continue;
        }

        cleaned_args.push(arg.clone());
        i += 1;
    }

    (cleaned_args, extra_params)
}

fn input_arg() -> Arg {
    Arg::new("input")
        .help("Markdown file to read ('-' for stdin)")
        .required(true)
        .index(1)
        .value_hint(ValueHint::FilePath)
}

fn output_arg() -> Arg {
    Arg::new("output")
        .long("output")
        .short('o')
        .help("Output file path (defaults to stdout)")
        .value_hint(ValueHint::FilePath)
}

fn build_cli() -> Command {
    Command::new("mdpipe")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Render markdown to formatted HTML")
        .long_about(
            "mdpipe renders markdown to HTML through a fixed chain of stages:\n\
            parse, toc, to-html, sanitize (off by default), format, stringify.\n\n\
            Commands:\n  \
            - convert: Render a file to HTML (default command)\n  \
            - inspect: Print the markdown or HTML tree as JSON\n  \
            - bench:   Time repeated renders of a file\n\n\
            Extra Parameters:\n  \
            Use --extra-<name> [value] to override a configuration value.\n  \
            Boolean flags can omit the value (defaults to 'true').\n\n\
            Examples:\n  \
            mdpipe README.md                        # Render to stdout\n  \
            mdpipe README.md -o README.html         # Render to a file\n  \
            mdpipe README.md --extra-gfm            # Enable GitHub extensions\n  \
            mdpipe inspect README.md hast           # Show the HTML tree",
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
        .arg(
            Arg::new("list-stages")
                .long("list-stages")
                .help("List the configured pipeline stages")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to an mdpipe.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Increase log verbosity (-v debug, -vv trace)")
                .action(ArgAction::Count)
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .about("Render markdown to HTML (default command)")
                .long_about(
                    "Render a markdown file to formatted HTML.\n\n\
                    Output goes to stdout by default, or use -o to specify a file.\n\n\
                    Examples:\n  \
                    mdpipe convert doc.md                 # Render to stdout\n  \
                    mdpipe convert doc.md -o doc.html     # Render to a file\n  \
                    cat doc.md | mdpipe convert -         # Read from stdin\n  \
                    mdpipe doc.md                         # 'convert' is optional",
                )
                .arg(input_arg())
                .arg(output_arg()),
        )
        .subcommand(
            Command::new("inspect")
                .about("Print an intermediate tree as JSON")
                .long_about(
                    "Run the pipeline part of the way and print the tree it holds.\n\n\
                    Targets:\n  \
                    - mdast:  markdown tree after the last markdown stage (default)\n  \
                    - hast:   HTML tree after the last HTML stage\n  \
                    - <stage>: tree right after the named stage\n\n\
                    Extra Parameters:\n  \
                    --extra-compact    Single-line JSON",
                )
                .arg(input_arg())
                .arg(
                    Arg::new("target")
                        .help("Tree or stage to show. Defaults to 'mdast'")
                        .required(false)
                        .value_parser(clap::builder::PossibleValuesParser::new(
                            inspect::AVAILABLE_TARGETS,
                        ))
                        .index(2)
                        .value_hint(ValueHint::Other),
                ),
        )
        .subcommand(
            Command::new("bench")
                .about("Time reading, pipeline construction and repeated renders")
                .arg(input_arg())
                .arg(
                    Arg::new("iterations")
                        .long("iterations")
                        .short('n')
                        .help("Number of repeated renders (defaults to bench.iterations)")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(output_arg().help("Also write the rendered HTML to this file")),
        )
}

fn main() {
    // Try to parse args. If no subcommand is provided, inject "convert"
    let args: Vec<String> = std::env::args().collect();

    let (cleaned_args, mut extra_params) = parse_extra_args(&args);

    let cli = build_cli();
    let matches = match cli.clone().try_get_matches_from(&cleaned_args) {
        Ok(m) => m,
        Err(e) => {
            // A first argument that is not a flag or subcommand is an input file
            if cleaned_args.len() > 1
                && (!cleaned_args[1].starts_with('-') || cleaned_args[1] == "-")
                && !SUBCOMMANDS.contains(&cleaned_args[1].as_str())
            {
                let mut new_args = vec![cleaned_args[0].clone(), "convert".to_string()];
                new_args.extend_from_slice(&cleaned_args[1..]);

                match cli.try_get_matches_from(&new_args) {
                    Ok(m) => m,
                    Err(e2) => e2.exit(),
                }
            } else {
                e.exit();
            }
        }
    };

    init_tracing(matches.get_count("verbose"));

    let mut config = load_cli_config(matches.get_one::<String>("config").map(|s| s.as_str()));
    apply_config_overrides(&mut config, &mut extra_params);
    let options = PipelineOptions::from(&config);
    let directory: Arc<dyn WorkingDirectory> = Arc::new(CurrentDirectory::capture());

    if matches.get_flag("list-stages") {
        handle_list_stages_command(&options, directory);
        return;
    }

    match matches.subcommand() {
        Some(("convert", sub_matches)) => {
            let Some(input) = sub_matches.get_one::<String>("input") else {
                exit_with("input is required");
            };
            let output = sub_matches.get_one::<String>("output").map(|s| s.as_str());
            handle_convert_command(input, output, &options, directory);
        }
        Some(("inspect", sub_matches)) => {
            let Some(input) = sub_matches.get_one::<String>("input") else {
                exit_with("input is required");
            };
            let target = sub_matches
                .get_one::<String>("target")
                .map(|s| s.as_str())
                .unwrap_or(inspect::DEFAULT_TARGET);
            handle_inspect_command(input, target, &extra_params, &options, directory);
        }
        Some(("bench", sub_matches)) => {
            let Some(input) = sub_matches.get_one::<String>("input") else {
                exit_with("input is required");
            };
            let iterations = sub_matches
                .get_one::<usize>("iterations")
                .copied()
                .unwrap_or(config.bench.iterations);
            let output = sub_matches.get_one::<String>("output").map(|s| s.as_str());
            handle_bench_command(input, iterations, output, &options, directory);
        }
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

fn init_tracing(verbose: u8) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = match verbose {
        0 => "mdpipe=warn,mdpipe_cli=warn",
        1 => "mdpipe=debug,mdpipe_cli=debug",
        _ => "mdpipe=trace,mdpipe_cli=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn exit_with(message: &str) -> ! {
    eprintln!("Error: {message}");
    std::process::exit(1);
}

/// Read the input as UTF-8 text. `-` reads stdin.
fn read_input(input: &str) -> Result<(String, Option<PathBuf>), String> {
    let bytes = if input == "-" {
        let mut buffer = Vec::new();
        io::stdin()
            .read_to_end(&mut buffer)
            .map_err(|e| format!("Error reading stdin: {e}"))?;
        buffer
    } else {
        fs::read(input).map_err(|e| format!("Error reading file '{input}': {e}"))?
    };

    let text = String::from_utf8(bytes)
        .map_err(|e| ProcessError::from(e.utf8_error()))
        .map_err(|e| format!("Processing error in '{input}': {e}"))?;
    let path = (input != "-").then(|| PathBuf::from(input));
    Ok((text, path))
}

fn input_file(pipeline: &Pipeline, input: &str) -> VFile {
    let (source, path) = read_input(input).unwrap_or_else(|e| exit_with(&e));
    let file = pipeline.file(source);
    match path {
        Some(path) => file.with_path(path),
        None => file,
    }
}

fn report_messages(file: &VFile) {
    for message in &file.messages {
        eprintln!("warning: {}: {message}", file.label());
    }
}

/// Handle the convert command
fn handle_convert_command(
    input: &str,
    output: Option<&str>,
    options: &PipelineOptions,
    directory: Arc<dyn WorkingDirectory>,
) {
    let pipeline = Pipeline::standard(options, directory);
    let file = input_file(&pipeline, input);

    let file = pipeline.process(file).unwrap_or_else(|e| {
        eprintln!("Processing error: {e}");
        std::process::exit(1);
    });
    report_messages(&file);

    match output {
        Some(path) => {
            fs::write(path, file.value.as_bytes()).unwrap_or_else(|e| {
                eprintln!("Error writing file '{path}': {e}");
                std::process::exit(1);
            });
        }
        None => print!("{file}"),
    }
}

/// Handle the inspect command
fn handle_inspect_command(
    input: &str,
    target: &str,
    extra_params: &HashMap<String, String>,
    options: &PipelineOptions,
    directory: Arc<dyn WorkingDirectory>,
) {
    let pipeline = Pipeline::standard(options, directory);
    let file = input_file(&pipeline, input);

    let output = inspect::execute_inspect(&pipeline, file, target, extra_params)
        .unwrap_or_else(|e| {
            eprintln!("Inspect error: {e}");
            std::process::exit(1);
        });

    print!("{output}");
}

/// Handle the bench command
fn handle_bench_command(
    input: &str,
    iterations: usize,
    output: Option<&str>,
    options: &PipelineOptions,
    directory: Arc<dyn WorkingDirectory>,
) {
    let report = bench::run_bench(input, options, directory, iterations).unwrap_or_else(|e| {
        eprintln!("{e}");
        std::process::exit(1);
    });

    if let Some(path) = output {
        fs::write(path, report.output.as_bytes()).unwrap_or_else(|e| {
            eprintln!("Error writing file '{path}': {e}");
            std::process::exit(1);
        });
    }

    print!("{report}");
}

/// Handle the list-stages command
fn handle_list_stages_command(options: &PipelineOptions, directory: Arc<dyn WorkingDirectory>) {
    let pipeline = Pipeline::standard(options, directory);
    println!("Pipeline stages:\n");
    for (index, stage) in pipeline.stages().iter().enumerate() {
        let label = stage.to_string();
        println!(
            "  {}. {label:<20} {} -> {}",
            index + 1,
            stage.input(),
            stage.output()
        );
    }
}

fn load_cli_config(explicit_path: Option<&str>) -> MdpipeConfig {
    let loader = Loader::new().with_optional_file(LOCAL_CONFIG_FILE);
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };

    loader.build().unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {err}");
        std::process::exit(1);
    })
}

fn apply_config_overrides(config: &mut MdpipeConfig, extra_params: &mut HashMap<String, String>) {
    if let Some(raw) = extra_params.remove("gfm") {
        config.parse.gfm = parse_bool_arg("gfm", &raw);
    }
    if let Some(raw) = extra_params.remove("smart") {
        config.parse.smart = parse_bool_arg("smart", &raw);
    }
    if let Some(raw) = take_override(extra_params, &["max-nesting"]) {
        config.parse.max_nesting = parse_number_arg("max-nesting", &raw);
    }

    if let Some(raw) = extra_params.remove("toc") {
        config.toc.enabled = parse_bool_arg("toc", &raw);
    }
    if let Some(raw) = take_override(extra_params, &["toc-heading", "heading"]) {
        config.toc.heading = raw;
    }
    if let Some(raw) = extra_params.remove("toc-min-depth") {
        config.toc.min_depth = parse_number_arg("toc-min-depth", &raw);
    }
    if let Some(raw) = extra_params.remove("toc-max-depth") {
        config.toc.max_depth = parse_number_arg("toc-max-depth", &raw);
    }
    if let Some(raw) = extra_params.remove("toc-skip") {
        config.toc.skip = raw;
    }
    if let Some(raw) = extra_params.remove("toc-tight") {
        config.toc.tight = parse_bool_arg("toc-tight", &raw);
    }
    if let Some(raw) = extra_params.remove("toc-ordered") {
        config.toc.ordered = parse_bool_arg("toc-ordered", &raw);
    }
    if let Some(raw) = extra_params.remove("toc-prefix") {
        config.toc.prefix = raw;
    }

    if let Some(raw) = take_override(extra_params, &["allow-dangerous-html", "raw"]) {
        config.html.allow_dangerous_html = parse_bool_arg("allow-dangerous-html", &raw);
    }
    if let Some(raw) = extra_params.remove("heading-ids") {
        config.html.heading_ids = parse_bool_arg("heading-ids", &raw);
    }

    if let Some(raw) = extra_params.remove("sanitize") {
        config.sanitize.enabled = parse_bool_arg("sanitize", &raw);
    }

    if let Some(raw) = extra_params.remove("format") {
        config.format.enabled = parse_bool_arg("format", &raw);
    }
    if let Some(raw) = take_override(extra_params, &["indent", "format-indent"]) {
        config.format.indent = raw;
    }

    if let Some(raw) = extra_params.remove("iterations") {
        config.bench.iterations = parse_number_arg("iterations", &raw);
    }
}

fn take_override(map: &mut HashMap<String, String>, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(value) = map.remove(*key) {
            return Some(value);
        }
    }
    None
}

fn parse_bool_arg(flag: &str, raw: &str) -> bool {
    match raw.to_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => true,
        "false" | "0" | "no" | "n" => false,
        other => {
            eprintln!("Invalid boolean value '{other}' for --extra-{flag}");
            std::process::exit(1);
        }
    }
}

fn parse_number_arg<T: std::str::FromStr>(flag: &str, raw: &str) -> T {
    raw.parse().unwrap_or_else(|_| {
        eprintln!("Invalid number '{raw}' for --extra-{flag}");
        std::process::exit(1);
    })
}
