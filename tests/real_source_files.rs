//! Integration tests that style realistic Ruby, LaTeX and properties files.
//!
//! These tests check exact style bytes and fold levels on documents of the
//! kind an editor actually shows, going through the registry the way a host
//! would.

use scilex::lexers::ruby::style::{self as rb, DEFAULT_KEYWORDS};
use scilex::lexers::{latex, props};
use scilex::{
    fold_depth, Document, Edit, IncrementalStyler, Lexer, Registry, Status, TextDocument,
    FOLD_LEVEL_BASE, FOLD_LEVEL_HEADER_FLAG, FOLD_LEVEL_WHITE_FLAG,
};

// ============================================================================
// Test Helpers
// ============================================================================

fn lexer(language: &str) -> Box<dyn Lexer> {
    let mut lexer = Registry::standard()
        .create_by_name(language)
        .expect("standard language");
    if language == "ruby" {
        lexer.word_list_set(0, DEFAULT_KEYWORDS);
    }
    lexer
}

fn style_and_fold(language: &str, text: &str) -> TextDocument {
    let mut lexer = lexer(language);
    let mut doc = TextDocument::new(text);
    let len = doc.len();
    lexer.lex(0, len, 0, &mut doc);
    lexer.fold(0, len, 0, &mut doc);
    assert_eq!(doc.status(), Status::Ok);
    doc
}

/// Style of the first byte of `needle` in `text`.
fn style_of(doc: &TextDocument, text: &str, needle: &str) -> u8 {
    let at = text
        .find(needle)
        .unwrap_or_else(|| panic!("{:?} not found", needle));
    doc.styles()[at]
}

/// Asserts every byte of `needle` has `style`.
fn assert_run(doc: &TextDocument, text: &str, needle: &str, style: u8) {
    let at = text
        .find(needle)
        .unwrap_or_else(|| panic!("{:?} not found", needle));
    let styles = &doc.styles()[at..at + needle.len()];
    assert!(
        styles.iter().all(|&s| s == style),
        "expected {:?} in style {}, got {:?}",
        needle,
        style,
        styles
    );
}

fn depths(doc: &TextDocument) -> Vec<i32> {
    doc.levels().iter().map(|&l| fold_depth(l)).collect()
}

fn headers(doc: &TextDocument) -> Vec<usize> {
    doc.levels()
        .iter()
        .enumerate()
        .filter(|(_, &l)| l & FOLD_LEVEL_HEADER_FLAG != 0)
        .map(|(line, _)| line)
        .collect()
}

// ============================================================================
// Ruby Source Files
// ============================================================================

const RUBY_GREETER: &str = r#"# A small class
class Greeter
  attr_reader :name

  def initialize(name)
    @name = name
  end

  def greet(times = 1)
    times.times do |i|
      puts "Hello, #{@name} (#{i})"
    end
  end
end
"#;

#[test]
fn test_ruby_class_styles() {
    let doc = style_and_fold("ruby", RUBY_GREETER);
    assert_run(&doc, RUBY_GREETER, "# A small class", rb::COMMENTLINE);
    assert_eq!(style_of(&doc, RUBY_GREETER, "class Greeter"), rb::WORD);
    assert_run(&doc, RUBY_GREETER, "Greeter", rb::CLASSNAME);
    assert_run(&doc, RUBY_GREETER, ":name", rb::SYMBOL);
    assert_run(&doc, RUBY_GREETER, "initialize", rb::DEFNAME);
    assert_run(&doc, RUBY_GREETER, "@name", rb::INSTANCE_VAR);
    assert_run(&doc, RUBY_GREETER, "\"Hello, ", rb::STRING);
    assert_run(&doc, RUBY_GREETER, "#{", rb::OPERATOR);
    assert_eq!(style_of(&doc, RUBY_GREETER, "do |i|"), rb::WORD);
    assert_eq!(style_of(&doc, RUBY_GREETER, "puts"), rb::IDENTIFIER);
}

#[test]
fn test_ruby_class_folds() {
    let doc = style_and_fold("ruby", RUBY_GREETER);
    assert_eq!(
        &depths(&doc)[..14],
        &[0, 0, 1, 1, 1, 2, 1, 1, 1, 2, 3, 2, 1, 0]
    );
    assert_eq!(headers(&doc), vec![1, 4, 8, 9]);
    assert_ne!(doc.levels()[3] & FOLD_LEVEL_WHITE_FLAG, 0);
}

/// `%w(a (b) c)` is one word array; nested brackets do not end it.
#[test]
fn test_ruby_word_array_quote_balance() {
    let text = "list = %w(a (b) c)\nnext_line\n";
    let doc = style_and_fold("ruby", text);
    assert_run(&doc, text, "%w(a (b) c)", rb::STRING_QW);
    assert_eq!(style_of(&doc, text, "next_line"), rb::IDENTIFIER);
}

/// The delimiter line, body and terminator of an indented heredoc.
#[test]
fn test_ruby_heredoc_transitions() {
    let text = "x = <<~EOF\n  hello\nEOF\n";
    let doc = style_and_fold("ruby", text);
    let styles = doc.styles();
    assert_eq!(&styles[4..6], &[rb::OPERATOR; 2]);
    assert_eq!(&styles[6..10], &[rb::HERE_DELIM; 4]);
    assert_eq!(&styles[10..19], &[rb::HERE_Q; 9]);
    assert_eq!(&styles[19..22], &[rb::HERE_DELIM; 3]);
    assert_eq!(styles[22], rb::DEFAULT);
}

#[test]
fn test_ruby_nested_fold_levels() {
    let doc = style_and_fold("ruby", "def foo\n  if x\n  end\nend\n");
    let levels = doc.levels();
    assert_eq!(levels[0] & 0xFFFF, FOLD_LEVEL_BASE | FOLD_LEVEL_HEADER_FLAG);
    assert_eq!(levels[1] & 0xFFFF, (FOLD_LEVEL_BASE + 1) | FOLD_LEVEL_HEADER_FLAG);
    assert_eq!(levels[2] & 0xFFFF, FOLD_LEVEL_BASE + 1);
    assert_eq!(levels[3] & 0xFFFF, FOLD_LEVEL_BASE);
}

/// An oversized heredoc delimiter ends in ERROR without touching what came
/// before it.
#[test]
fn test_ruby_heredoc_delimiter_overflow() {
    let text = format!("y = 1\nx = <<~{}\nbody\n", "A".repeat(300));
    let mut lexer = lexer("ruby");
    let mut doc = TextDocument::new(&text);
    let len = doc.len();
    lexer.lex(0, len, rb::DEFAULT, &mut doc);
    assert_eq!(doc.status(), Status::Ok);

    let clean = style_and_fold("ruby", "y = 1\nx = 1\n");
    assert_eq!(&doc.styles()[..10], &clean.styles()[..10]);

    let delim = text.find('~').unwrap_or(0);
    assert!(doc.styles()[delim..delim + 255]
        .iter()
        .all(|&s| s == rb::HERE_DELIM));
    assert_eq!(doc.styles()[delim + 255], rb::ERROR);
}

#[test]
fn test_ruby_edit_inside_method() {
    let mut styler = IncrementalStyler::new(RUBY_GREETER, lexer("ruby"));
    let at = RUBY_GREETER.find("@name = name").unwrap_or(0);
    styler
        .apply_edit(Edit::insert(at, "@count = 0\n    "))
        .unwrap();
    let full = style_and_fold("ruby", &String::from_utf8_lossy(styler.document().text()));
    assert_eq!(styler.styles(), full.styles());
    assert_eq!(styler.document().levels(), full.levels());
}

// ============================================================================
// LaTeX Source Files
// ============================================================================

const LATEX_PAPER: &str = "\\documentclass{article}
\\begin{document}
\\section{Intro}
Text with $a+b$ math. % note
\\subsection{Detail}
\\begin{equation}
  E = mc^2
\\end{equation}
\\section{End}
\\end{document}
";

#[test]
fn test_latex_paper_styles() {
    let doc = style_and_fold("latex", LATEX_PAPER);
    assert_run(&doc, LATEX_PAPER, "\\documentclass", latex::COMMAND);
    assert_eq!(style_of(&doc, LATEX_PAPER, "document}"), latex::TAG);
    assert_run(&doc, LATEX_PAPER, "a+b", latex::MATH);
    assert_eq!(style_of(&doc, LATEX_PAPER, "$a"), latex::SHORTCMD);
    assert_run(&doc, LATEX_PAPER, "% note", latex::COMMENT);
    assert_run(&doc, LATEX_PAPER, "E = mc^2", latex::MATH2);
    let end_tag = LATEX_PAPER.find("\\end{equation}").unwrap_or(0) + 5;
    assert_eq!(doc.styles()[end_tag + 1], latex::TAG2);
}

#[test]
fn test_latex_paper_line_states() {
    let doc = style_and_fold("latex", LATEX_PAPER);
    // display math is open through the equation body only
    assert_eq!(doc.line_states()[6], 2);
    assert_eq!(doc.line_states()[7], 0);
    assert_eq!(doc.line_states()[3], 0);
}

#[test]
fn test_latex_paper_folds() {
    let doc = style_and_fold("latex", LATEX_PAPER);
    assert_eq!(&depths(&doc)[..11], &[0, 0, 3, 4, 4, 5, 6, 6, 3, 1, 0]);
    assert_eq!(headers(&doc), vec![1, 2, 4, 5, 8]);
}

#[test]
fn test_latex_edit_opens_math() {
    let mut styler = IncrementalStyler::new(LATEX_PAPER, lexer("latex"));
    let at = LATEX_PAPER.find("Text with").unwrap_or(0);
    styler.apply_edit(Edit::insert(at, "\\[\n")).unwrap();
    let full = style_and_fold("latex", &String::from_utf8_lossy(styler.document().text()));
    assert_eq!(styler.styles(), full.styles());
    assert_eq!(styler.document().line_states(), full.line_states());
}

// ============================================================================
// Properties Files
// ============================================================================

const EDITOR_PROPERTIES: &str = "# Editor settings
[editor]
font.size=12
theme: dark

[files]
@=default
  indent = 4
";

#[test]
fn test_properties_styles() {
    let text = EDITOR_PROPERTIES;
    let doc = style_and_fold("props", text);
    assert_run(&doc, text, "# Editor settings\n", props::COMMENT);
    assert_run(&doc, text, "[editor]\n", props::SECTION);
    assert_run(&doc, text, "font.size", props::KEY);
    assert_eq!(style_of(&doc, text, "=12"), props::ASSIGNMENT);
    assert_run(&doc, text, "12\n", props::DEFAULT);
    assert_run(&doc, text, "theme", props::KEY);
    assert_eq!(style_of(&doc, text, ": dark"), props::ASSIGNMENT);
    assert_eq!(style_of(&doc, text, "@="), props::DEFVAL);
    assert_eq!(style_of(&doc, text, "=default"), props::ASSIGNMENT);
    assert_run(&doc, text, "  ", props::DEFAULT);
    assert_run(&doc, text, "indent ", props::KEY);
    assert_eq!(style_of(&doc, text, "= 4"), props::ASSIGNMENT);
}

#[test]
fn test_properties_folds() {
    let doc = style_and_fold("props", EDITOR_PROPERTIES);
    let levels = doc.levels();
    let section = FOLD_LEVEL_BASE | FOLD_LEVEL_HEADER_FLAG;
    let body = FOLD_LEVEL_BASE + 1;
    assert_eq!(
        &levels[..9],
        &[
            FOLD_LEVEL_BASE,
            section,
            body,
            body,
            body | FOLD_LEVEL_WHITE_FLAG,
            section,
            body,
            body,
            body | FOLD_LEVEL_WHITE_FLAG,
        ]
    );
}

#[test]
fn test_properties_crlf() {
    let text = "a=1\r\n[b]\r\n";
    let doc = style_and_fold("props", text);
    assert_eq!(
        doc.styles(),
        &[
            props::KEY,
            props::ASSIGNMENT,
            props::DEFAULT,
            props::DEFAULT,
            props::DEFAULT,
            props::SECTION,
            props::SECTION,
            props::SECTION,
            props::SECTION,
            props::SECTION,
        ]
    );
    assert_eq!(doc.levels()[1], FOLD_LEVEL_BASE | FOLD_LEVEL_HEADER_FLAG);
}

#[test]
fn test_properties_loaded_as_lexer_configuration() {
    let mut props = scilex::PropSetSimple::new();
    props.set_multiple("# generated\nfold.compact=0\nlexer.props.allow.initial.spaces=0\n");

    let mut lexer = lexer("props");
    for (key, value) in props.iter() {
        lexer.property_set(key, value);
    }
    let mut doc = TextDocument::new("[s]\n\n  k=v\n");
    let len = doc.len();
    lexer.lex(0, len, 0, &mut doc);
    lexer.fold(0, len, 0, &mut doc);
    assert_eq!(doc.levels()[1] & FOLD_LEVEL_WHITE_FLAG, 0);
    assert!(doc.styles()[5..].iter().all(|&s| s == props::DEFAULT));
}
