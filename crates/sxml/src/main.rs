//! sxml - print the tree of an XML file
//!
//! Usage: sxml [OPTIONS] <FILE>

mod json;

use std::env;
use std::process::ExitCode;

use sxml_dom::{to_xml, Queryable};
use sxml_parser::{
    parse_with_options, Document, MismatchPolicy, ParseOptions, ParsedDocument, QuoteStyle,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// How the parsed tree is written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Outline,
    Json,
    Xml,
}

#[derive(Debug)]
struct Args {
    path: String,
    mode: OutputMode,
    options: ParseOptions,
}

fn main() -> ExitCode {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let argv: Vec<String> = env::args().collect();
    let program = argv.first().map(String::as_str).unwrap_or("sxml");

    let args = match parse_args(program, argv.get(1..).unwrap_or_default()) {
        Ok(Some(args)) => args,
        Ok(None) => return ExitCode::SUCCESS,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            print_usage(program);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// `Ok(None)` when the arguments asked for help or version only
fn parse_args(program: &str, argv: &[String]) -> Result<Option<Args>, String> {
    let mut path = None;
    let mut mode = OutputMode::Outline;
    let mut options = ParseOptions::default();

    for arg in argv {
        match arg.as_str() {
            "--help" | "-h" => {
                print_usage(program);
                return Ok(None);
            }
            "--version" | "-V" => {
                println!("sxml {}", VERSION);
                return Ok(None);
            }
            "--json" => mode = OutputMode::Json,
            "--xml" => mode = OutputMode::Xml,
            "--lenient" => options = options.mismatch(MismatchPolicy::Lenient),
            "--matching-quotes" => options = options.quotes(QuoteStyle::Matching),
            flag if flag.starts_with('-') => return Err(format!("Unknown option: {}", flag)),
            file => {
                if path.replace(file.to_string()).is_some() {
                    return Err("Only one file can be given".to_string());
                }
            }
        }
    }

    let path = path.ok_or_else(|| "No input file given".to_string())?;
    Ok(Some(Args { path, mode, options }))
}

fn print_usage(program: &str) {
    println!(
        r#"sxml {} - a minimal XML reader

USAGE:
    {} [OPTIONS] <FILE>

OPTIONS:
    -h, --help           Print this help message
    -V, --version        Print version information
    --json               Dump the tree as JSON
    --xml                Write the tree back as XML
    --lenient            Return the partial tree on mismatched close tags
    --matching-quotes    Only the opening quote character closes a value

EXAMPLES:
    {} test.xml
    {} --json test.xml
"#,
        VERSION, program, program, program
    );
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let document = Document::load(&args.path)?;
    let parsed = parse_with_options(document, args.options)?;

    match args.mode {
        OutputMode::Outline => print_outline(&parsed),
        OutputMode::Json => println!("{}", json::to_json(&parsed)?),
        OutputMode::Xml => println!("{}", to_xml(&parsed.arena, parsed.root)),
    }

    let released = parsed.release();
    log::debug!("Released {} entities", released.total());
    Ok(())
}

fn print_outline(parsed: &ParsedDocument) {
    let declaration = parsed.declaration();
    if !declaration.is_empty() {
        let attrs: Vec<String> = declaration
            .iter()
            .map(|attr| match attr.value() {
                Some(value) => format!("{}=\"{}\"", attr.key, value),
                None => attr.key.clone(),
            })
            .collect();
        println!("<?xml {}?>", attrs.join(" "));
    }

    print!("{}", parsed.arena.pretty_print(parsed.root));

    println!("\n=== Stats ===");
    // The synthetic root is registered but never part of the tree.
    println!("Node count: {}", parsed.arena.node_count().saturating_sub(1));
    println!("Attribute count: {}", parsed.arena.attribute_count());
    println!("Text count: {}", parsed.arena.text_count());

    let mut tags: Vec<(String, usize)> = parsed.arena.tag_histogram(parsed.root).into_iter().collect();
    tags.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    println!("Elements: {:?}", tags);
}
