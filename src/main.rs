//! CLI for the scilex styling engine.
//!
//! Usage:
//!   scilex <FILE>                          Style a file, language from its extension
//!   scilex --language ruby --code "<CODE>" Style inline code
//!   scilex --list                          Show the registered languages

mod logging;

use std::fs;
use std::io;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use serde::Serialize;

use scilex::language::{language_for_path, Lexer};
use scilex::lexers::ruby;
use scilex::{
    fold_depth, Document, LexerError, PropSetSimple, Registry, Result, StyleRun, TextDocument,
    FOLD_LEVEL_HEADER_FLAG, FOLD_LEVEL_WHITE_FLAG,
};

use crate::logging::LogArgs;

/// Style a document and print its style runs and fold levels.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// File to style.
    #[arg(required_unless_present_any = ["code", "list"], conflicts_with = "code")]
    file: Option<PathBuf>,

    /// Style inline code instead of a file.
    #[arg(short, long)]
    code: Option<String>,

    /// Language name; detected from the file name when absent.
    #[arg(short, long)]
    language: Option<String>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Pretty)]
    output: OutputFormat,

    /// Also print per-line fold levels.
    #[arg(long)]
    fold: bool,

    /// List registered languages and exit.
    #[arg(long)]
    list: bool,

    /// Keywords for word list 0.
    #[arg(short, long)]
    keywords: Option<String>,

    /// Set a lexer property.
    #[arg(short = 'p', long = "property", value_name = "KEY=VALUE")]
    properties: Vec<String>,

    /// Read lexer properties from a properties file.
    #[arg(long, value_name = "PATH")]
    props_file: Option<PathBuf>,

    #[command(flatten)]
    logging: LogArgs,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum OutputFormat {
    Pretty,
    Json,
    Debug,
}

#[derive(Serialize)]
struct RunReport<'a> {
    name: &'a str,
    text: String,
    #[serde(flatten)]
    run: StyleRun,
}

#[derive(Serialize, Debug)]
struct FoldReport {
    line: usize,
    level: i32,
    depth: i32,
    header: bool,
    white: bool,
}

#[derive(Serialize)]
struct Report<'a> {
    language: &'a str,
    status: i32,
    runs: Vec<RunReport<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    folds: Option<Vec<FoldReport>>,
}

fn main() {
    let args = Args::parse();
    if let Err(e) = args.logging.setup_logging(1) {
        eprintln!("Error: cannot set up logging: {}", e);
    }

    match run(&args) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    }
}

fn run(args: &Args) -> Result<i32> {
    let registry = Registry::standard();
    if args.list {
        print_list(&registry);
        return Ok(0);
    }

    let source = match (&args.code, &args.file) {
        (Some(code), _) => code.clone().into_bytes(),
        (None, Some(path)) => fs::read(path)?,
        (None, None) => {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "no input provided").into())
        }
    };

    let language = match (&args.language, &args.file) {
        (Some(name), _) => name.clone(),
        (None, Some(path)) => language_for_path(path)
            .map(str::to_string)
            .ok_or_else(|| LexerError::UnknownLanguage(path.display().to_string()))?,
        (None, None) => return Err(LexerError::UnknownLanguage("<inline code>".to_string())),
    };

    let mut lexer = registry.create_by_name(&language)?;
    configure(lexer.as_mut(), args)?;

    let mut doc = TextDocument::new(&source);
    let len = doc.len();
    lexer.lex(0, len, 0, &mut doc);
    if args.fold {
        lexer.fold(0, len, 0, &mut doc);
    }

    let runs = doc.style_runs();
    match args.output {
        OutputFormat::Pretty => print_pretty(lexer.as_ref(), &doc, &runs, args.fold),
        OutputFormat::Json => print_json(lexer.as_ref(), &doc, &runs, args.fold)?,
        OutputFormat::Debug => print_debug(&doc, &runs, args.fold),
    }

    let error_styles: Vec<u8> = lexer
        .named_styles()
        .iter()
        .filter(|class| class.tags.split_whitespace().any(|tag| tag == "error"))
        .map(|class| class.value)
        .collect();
    let error_runs = runs
        .iter()
        .filter(|run| error_styles.contains(&run.style))
        .count();

    if doc.status().is_failure() {
        eprintln!("\n--- Errors ---");
        eprintln!("  lexer reported {}", doc.status());
        return Ok(1);
    }
    if error_runs > 0 {
        eprintln!("\n--- Errors ---");
        for run in runs.iter().filter(|run| error_styles.contains(&run.style)) {
            eprintln!("  {}: {:?}", run.span, text_of(&doc, run));
        }
        return Ok(1);
    }
    Ok(0)
}

/// Apply the properties file, `--property` and `--keywords` to `lexer`.
fn configure(lexer: &mut dyn Lexer, args: &Args) -> Result<()> {
    let mut props = PropSetSimple::new();
    if let Some(path) = &args.props_file {
        props.set_multiple(&fs::read_to_string(path)?);
    }
    for assignment in &args.properties {
        props.set_assignment(assignment)?;
    }
    for (key, value) in props.iter() {
        lexer.property_set(key, value);
    }

    match &args.keywords {
        Some(words) => {
            lexer.word_list_set(0, words);
        }
        None if lexer.name() == ruby::MODULE.name() => {
            lexer.word_list_set(0, ruby::style::DEFAULT_KEYWORDS);
        }
        None => {}
    }
    Ok(())
}

fn text_of(doc: &TextDocument, run: &StyleRun) -> String {
    String::from_utf8_lossy(&doc.text()[run.span.start..run.span.end]).into_owned()
}

fn fold_reports(doc: &TextDocument) -> Vec<FoldReport> {
    doc.levels()
        .iter()
        .enumerate()
        .map(|(line, &level)| FoldReport {
            line: line + 1,
            level,
            depth: fold_depth(level),
            header: level & FOLD_LEVEL_HEADER_FLAG != 0,
            white: level & FOLD_LEVEL_WHITE_FLAG != 0,
        })
        .collect()
}

fn print_list(registry: &Registry) {
    for module in registry.modules() {
        println!("{:<8} {:>3}", module.name(), module.language());
        for (i, description) in module.word_list_descriptions().iter().enumerate() {
            println!("    word list {}: {}", i, description);
        }
    }
}

fn print_pretty(lexer: &dyn Lexer, doc: &TextDocument, runs: &[StyleRun], fold: bool) {
    for run in runs {
        let name = lexer.name_of_style(run.style).unwrap_or("?");
        println!("{:<10} {:<24} {:?}", run.span.start_loc.to_string(), name, text_of(doc, run));
    }

    if fold {
        println!("\n--- Folds ---");
        for report in fold_reports(doc) {
            let line = doc.line_start(report.line as isize - 1) as usize;
            let end = doc.line_end(report.line as isize - 1) as usize;
            println!(
                "{:>5} {:>3} {}{} {}",
                report.line,
                report.depth,
                if report.header { 'H' } else { ' ' },
                if report.white { 'W' } else { ' ' },
                String::from_utf8_lossy(&doc.text()[line..end.max(line)])
            );
        }
    }
}

fn print_json(lexer: &dyn Lexer, doc: &TextDocument, runs: &[StyleRun], fold: bool) -> Result<()> {
    let report = Report {
        language: lexer.name(),
        status: doc.status().code(),
        runs: runs
            .iter()
            .map(|run| RunReport {
                name: lexer.name_of_style(run.style).unwrap_or("?"),
                text: text_of(doc, run),
                run: *run,
            })
            .collect(),
        folds: fold.then(|| fold_reports(doc)),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn print_debug(doc: &TextDocument, runs: &[StyleRun], fold: bool) {
    for run in runs {
        println!("{:#?}", run);
    }
    if fold {
        for report in fold_reports(doc) {
            println!("{:?}", report);
        }
    }
}
