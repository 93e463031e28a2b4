//! Benchmarks for the styling engine.
//!
//! Run with: `cargo bench`
//! View reports: `open target/criterion/report/index.html`

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use scilex::lexers::ruby::style::DEFAULT_KEYWORDS;
use scilex::{Document, Edit, IncrementalStyler, Lexer, Registry, TextDocument};

// =============================================================================
// Input Generators
// =============================================================================

/// Generate a Ruby file of `classes` small classes.
fn generate_ruby(classes: usize) -> String {
    (0..classes)
        .map(|i| {
            format!(
                r##"# Class number {i}
class Widget{i} < Base
  attr_reader :name, :size

  def initialize(name, size = {i})
    @name = name
    @size = size * 0x{i:X}
  end

  def describe
    items = %w(alpha beta gamma)
    items.each do |item|
      puts "#{{@name}}: #{{item}} (#{{@size}})" if item =~ /a+/i
    end
    <<~TEXT
      widget {i}
    TEXT
  end
end

"##
            )
        })
        .collect()
}

/// Generate a LaTeX document with `sections` sections.
fn generate_latex(sections: usize) -> String {
    let mut out = String::from("\\documentclass{article}\n\\begin{document}\n");
    for i in 0..sections {
        out.push_str(&format!(
            "\\section{{Part {i}}}\n\
             Text with $x_{i}^2$ inline and \\textbf{{bold}} words. % remark\n\
             \\subsection{{Detail {i}}}\n\
             \\begin{{equation}}\n  E_{i} = mc^2\n\\end{{equation}}\n\
             \\begin{{verbatim}}\nraw \\text {i}\n\\end{{verbatim}}\n\
             \\[ a + b \\]\n"
        ));
    }
    out.push_str("\\end{document}\n");
    out
}

/// Generate a properties file with `sections` sections of eight keys.
fn generate_props(sections: usize) -> String {
    let mut out = String::new();
    for i in 0..sections {
        out.push_str(&format!("# Section {i}\n[section.{i}]\n"));
        for k in 0..8 {
            out.push_str(&format!("key.{k}=value {i} {k}\n"));
        }
        out.push_str("@=default\n\n");
    }
    out
}

fn corpus(language: &str, size: usize) -> String {
    match language {
        "ruby" => generate_ruby(size),
        "latex" => generate_latex(size),
        _ => generate_props(size),
    }
}

fn lexer(language: &str) -> Box<dyn Lexer> {
    let mut lexer = Registry::standard()
        .create_by_name(language)
        .expect("standard language");
    if language == "ruby" {
        lexer.word_list_set(0, DEFAULT_KEYWORDS);
    }
    lexer
}

// =============================================================================
// Benchmark Helpers
// =============================================================================

fn bench_lex(lexer: &mut dyn Lexer, doc: &mut TextDocument) -> u8 {
    let len = doc.len();
    lexer.lex(0, black_box(len), 0, doc);
    doc.styles().last().copied().unwrap_or(0)
}

fn bench_lex_and_fold(lexer: &mut dyn Lexer, doc: &mut TextDocument) -> i32 {
    let len = doc.len();
    lexer.lex(0, black_box(len), 0, doc);
    lexer.fold(0, len, 0, doc);
    doc.levels().last().copied().unwrap_or(0)
}

// =============================================================================
// Benchmarks
// =============================================================================

/// Full styling of each language at growing document sizes.
fn bench_full_lex(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_lex");

    for language in ["ruby", "latex", "props"] {
        for size in [10, 100, 1000] {
            let input = corpus(language, size);
            let mut lexer = lexer(language);
            let mut doc = TextDocument::new(&input);
            group.throughput(Throughput::Bytes(input.len() as u64));
            group.bench_with_input(BenchmarkId::new(language, size), &input, |b, _| {
                b.iter(|| bench_lex(lexer.as_mut(), &mut doc))
            });
        }
    }

    group.finish();
}

/// Styling followed by folding.
fn bench_lex_and_fold_group(c: &mut Criterion) {
    let mut group = c.benchmark_group("lex_and_fold");

    for language in ["ruby", "latex", "props"] {
        let input = corpus(language, 100);
        let mut lexer = lexer(language);
        let mut doc = TextDocument::new(&input);
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(BenchmarkId::new(language, 100), &input, |b, _| {
            b.iter(|| bench_lex_and_fold(lexer.as_mut(), &mut doc))
        });
    }

    group.finish();
}

/// Single-character edits near the start, middle and end of a document.
fn bench_incremental(c: &mut Criterion) {
    let mut group = c.benchmark_group("incremental_edit");

    for language in ["ruby", "latex", "props"] {
        let input = corpus(language, 200);
        for (label, at) in [
            ("start", 0),
            ("middle", input.len() / 2),
            ("end", input.len().saturating_sub(1)),
        ] {
            let at = input[..at].rfind('\n').map_or(0, |nl| nl + 1);
            let mut styler = IncrementalStyler::new(&input, lexer(language));
            group.bench_function(BenchmarkId::new(language, label), |b| {
                b.iter(|| {
                    styler.apply_edit(Edit::insert(at, "x")).ok();
                    styler.apply_edit(Edit::delete(at, at + 1)).ok();
                    black_box(styler.last_stats())
                })
            });
        }
    }

    group.finish();
}

/// Registry lookup and lexer construction.
fn bench_registry(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry");
    let registry = Registry::standard();

    group.bench_function("create_by_name", |b| {
        b.iter(|| registry.create_by_name(black_box("ruby")).is_ok())
    });
    group.bench_function("standard", |b| b.iter(|| Registry::standard().modules().len()));

    group.finish();
}

/// Pathological inputs.
fn bench_edge_cases(c: &mut Criterion) {
    let mut group = c.benchmark_group("edge_cases");

    let long_heredoc = format!("x = <<~EOF\n{}EOF\n", "  line of text\n".repeat(2000));
    let deep_nesting = format!("{}{}", "def a\n  if b\n".repeat(200), "  end\nend\n".repeat(200));
    let long_math = format!("${}$\n", "a + b \\cdot ".repeat(2000));
    let unterminated = format!("s = \"{}", "open string ".repeat(2000));

    for (name, language, input) in [
        ("ruby_long_heredoc", "ruby", &long_heredoc),
        ("ruby_deep_nesting", "ruby", &deep_nesting),
        ("ruby_unterminated_string", "ruby", &unterminated),
        ("latex_long_math", "latex", &long_math),
    ] {
        let mut lexer = lexer(language);
        let mut doc = TextDocument::new(input);
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_function(name, |b| b.iter(|| bench_lex_and_fold(lexer.as_mut(), &mut doc)));
    }

    group.finish();
}

// =============================================================================
// Criterion Configuration
// =============================================================================

criterion_group!(
    benches,
    bench_full_lex,
    bench_lex_and_fold_group,
    bench_incremental,
    bench_registry,
    bench_edge_cases,
);

criterion_main!(benches);
