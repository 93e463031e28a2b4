//! Ruby style bytes.

use crate::language::LexicalClass;

pub const DEFAULT: u8 = 0;
pub const ERROR: u8 = 1;
pub const COMMENTLINE: u8 = 2;
pub const POD: u8 = 3;
pub const NUMBER: u8 = 4;
pub const WORD: u8 = 5;
pub const STRING: u8 = 6;
pub const CHARACTER: u8 = 7;
pub const CLASSNAME: u8 = 8;
pub const DEFNAME: u8 = 9;
pub const OPERATOR: u8 = 10;
pub const IDENTIFIER: u8 = 11;
pub const REGEX: u8 = 12;
pub const GLOBAL: u8 = 13;
pub const SYMBOL: u8 = 14;
pub const MODULE_NAME: u8 = 15;
pub const INSTANCE_VAR: u8 = 16;
pub const CLASS_VAR: u8 = 17;
pub const BACKTICKS: u8 = 18;
pub const DATASECTION: u8 = 19;
pub const HERE_DELIM: u8 = 20;
pub const HERE_Q: u8 = 21;
pub const HERE_QQ: u8 = 22;
pub const HERE_QX: u8 = 23;
pub const STRING_Q: u8 = 24;
pub const STRING_QQ: u8 = 25;
pub const STRING_QX: u8 = 26;
pub const STRING_QR: u8 = 27;
pub const STRING_QW: u8 = 28;
pub const WORD_DEMOTED: u8 = 29;
pub const STDIN: u8 = 30;
pub const STDOUT: u8 = 31;
pub const STDERR: u8 = 40;
pub const STRING_W: u8 = 41;
pub const STRING_I: u8 = 42;
pub const STRING_QI: u8 = 43;
pub const STRING_QS: u8 = 44;

/// Bits of a style byte that carry the style proper.
pub const STYLE_MASK: u8 = 63;

/// Strip indicator bits from a committed style.
#[inline]
pub fn actual_style(style: u8) -> u8 {
    style & STYLE_MASK
}

pub const STYLES: &[LexicalClass] = &[
    LexicalClass::new(DEFAULT, "SCE_RB_DEFAULT", "default", "White space"),
    LexicalClass::new(ERROR, "SCE_RB_ERROR", "error", "Lexing error"),
    LexicalClass::new(COMMENTLINE, "SCE_RB_COMMENTLINE", "comment line", "Line comment"),
    LexicalClass::new(POD, "SCE_RB_POD", "comment documentation", "=begin ... =end block"),
    LexicalClass::new(NUMBER, "SCE_RB_NUMBER", "literal numeric", "Number or ?c character code"),
    LexicalClass::new(WORD, "SCE_RB_WORD", "keyword", "Keyword"),
    LexicalClass::new(STRING, "SCE_RB_STRING", "literal string", "Double quoted string"),
    LexicalClass::new(CHARACTER, "SCE_RB_CHARACTER", "literal string", "Single quoted string"),
    LexicalClass::new(CLASSNAME, "SCE_RB_CLASSNAME", "identifier class", "Name after class"),
    LexicalClass::new(DEFNAME, "SCE_RB_DEFNAME", "identifier function", "Name after def"),
    LexicalClass::new(OPERATOR, "SCE_RB_OPERATOR", "operator", "Operator"),
    LexicalClass::new(IDENTIFIER, "SCE_RB_IDENTIFIER", "identifier", "Identifier"),
    LexicalClass::new(REGEX, "SCE_RB_REGEX", "literal regex", "Regular expression"),
    LexicalClass::new(GLOBAL, "SCE_RB_GLOBAL", "identifier global", "Global variable"),
    LexicalClass::new(SYMBOL, "SCE_RB_SYMBOL", "literal symbol", "Symbol"),
    LexicalClass::new(MODULE_NAME, "SCE_RB_MODULE_NAME", "identifier module", "Name after module"),
    LexicalClass::new(INSTANCE_VAR, "SCE_RB_INSTANCE_VAR", "identifier instance", "@instance variable"),
    LexicalClass::new(CLASS_VAR, "SCE_RB_CLASS_VAR", "identifier class-variable", "@@class variable"),
    LexicalClass::new(BACKTICKS, "SCE_RB_BACKTICKS", "literal string command", "Backtick command"),
    LexicalClass::new(DATASECTION, "SCE_RB_DATASECTION", "data", "Text after __END__"),
    LexicalClass::new(HERE_DELIM, "SCE_RB_HERE_DELIM", "here-doc delimiter", "Heredoc delimiter"),
    LexicalClass::new(HERE_Q, "SCE_RB_HERE_Q", "here-doc literal string", "Heredoc body"),
    LexicalClass::new(HERE_QQ, "SCE_RB_HERE_QQ", "here-doc literal string interpolated", "Interpolating heredoc body"),
    LexicalClass::new(HERE_QX, "SCE_RB_HERE_QX", "here-doc literal string command", "Command heredoc body"),
    LexicalClass::new(STRING_Q, "SCE_RB_STRING_Q", "literal string", "%q string"),
    LexicalClass::new(STRING_QQ, "SCE_RB_STRING_QQ", "literal string interpolated", "%Q string"),
    LexicalClass::new(STRING_QX, "SCE_RB_STRING_QX", "literal string command", "%x command"),
    LexicalClass::new(STRING_QR, "SCE_RB_STRING_QR", "literal regex", "%r regular expression"),
    LexicalClass::new(STRING_QW, "SCE_RB_STRING_QW", "literal string list", "%w word list"),
    LexicalClass::new(WORD_DEMOTED, "SCE_RB_WORD_DEMOTED", "keyword modifier", "Keyword used as a modifier"),
    LexicalClass::new(STDIN, "SCE_RB_STDIN", "stdin", "Standard input"),
    LexicalClass::new(STDOUT, "SCE_RB_STDOUT", "stdout", "Standard output"),
    LexicalClass::new(STDERR, "SCE_RB_STDERR", "stderr", "Standard error"),
    LexicalClass::new(STRING_W, "SCE_RB_STRING_W", "literal string list interpolated", "%W word list"),
    LexicalClass::new(STRING_I, "SCE_RB_STRING_I", "literal symbol list", "%i symbol list"),
    LexicalClass::new(STRING_QI, "SCE_RB_STRING_QI", "literal symbol list interpolated", "%I symbol list"),
    LexicalClass::new(STRING_QS, "SCE_RB_STRING_QS", "literal symbol", "%s symbol"),
];

/// Keywords a host usually installs as word list 0.
pub const DEFAULT_KEYWORDS: &str = "__FILE__ __LINE__ __ENCODING__ BEGIN END alias and begin \
break case class def defined? do else elsif end ensure false for if in module next nil not \
or redo rescue retry return self super then true undef unless until when while yield";
