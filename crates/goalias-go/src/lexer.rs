//! Go lexer - tokenizes Go source code
//!
//! Tokens are produced with `logos`. Newlines and comments are dropped after
//! applying Go's semicolon insertion rule: a newline following an
//! identifier, literal, one of `break continue fallthrough return ++ --`, or
//! a closing bracket terminates the statement.
//!
//! Only the distinctions the declaration parser needs are kept; operators are
//! lumped together since expressions are carried as source text.

use logos::Logos;
use std::fmt;
use std::ops::Range;

use crate::error::ParseError;

/// Token type for Go source code
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(skip r"[ \t\r\f]+")]
pub enum Token {
    #[token("\n")]
    Newline,
    #[regex(r"//[^\n]*", allow_greedy = true)]
    LineComment,
    #[regex(r"/\*([^*]|\*+[^*/])*\*+/", allow_greedy = true)]
    BlockComment,

    // Keywords
    #[token("package")]
    Package,
    #[token("import")]
    Import,
    #[token("type")]
    Type,
    #[token("const")]
    Const,
    #[token("var")]
    Var,
    #[token("func")]
    Func,
    #[token("struct")]
    Struct,
    #[token("interface")]
    Interface,
    #[token("map")]
    Map,
    #[token("chan")]
    Chan,
    #[token("break")]
    Break,
    #[token("continue")]
    Continue,
    #[token("fallthrough")]
    Fallthrough,
    #[token("return")]
    Return,

    // Identifiers and literals
    #[regex(r"[\p{L}_][\p{L}\p{Nd}_]*", |lex| lex.slice().to_string())]
    Ident(String),
    #[regex(r"[0-9]([0-9a-zA-Z_.]|[eEpP][+-])*")]
    #[regex(r"\.[0-9]([0-9a-zA-Z_.]|[eEpP][+-])*")]
    Number,
    #[regex(r#""([^"\\\n]|\\.)*""#, allow_greedy = true)]
    String,
    #[regex(r"`[^`]*`", allow_greedy = true)]
    RawString,
    #[regex(r"'([^'\\\n]|\\.)*'", allow_greedy = true)]
    Rune,

    // Punctuation
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token(".")]
    Dot,
    #[token("...")]
    Ellipsis,
    #[token("=")]
    Assign,
    #[token("*")]
    Star,

    /// Any other operator (`==`, `:=`, `<-`, `~`, ...). A lone `=` or `*`
    /// is [`Token::Assign`] or [`Token::Star`].
    #[regex(r"[-+*/%&|^<>=!:~]+", |lex| lex.slice().to_string(), priority = 1)]
    Operator(String),
}

impl Token {
    /// Whether a newline after this token ends the statement
    fn ends_statement(&self) -> bool {
        match self {
            Token::Ident(_)
            | Token::Number
            | Token::String
            | Token::RawString
            | Token::Rune
            | Token::Break
            | Token::Continue
            | Token::Fallthrough
            | Token::Return
            | Token::RParen
            | Token::RBracket
            | Token::RBrace => true,
            Token::Operator(op) => op == "++" || op == "--",
            _ => false,
        }
    }

    pub(crate) fn is_bracket(&self) -> bool {
        matches!(
            self,
            Token::LParen
                | Token::RParen
                | Token::LBracket
                | Token::RBracket
                | Token::LBrace
                | Token::RBrace
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Token::Newline => "newline",
            Token::LineComment | Token::BlockComment => "comment",
            Token::Package => "package",
            Token::Import => "import",
            Token::Type => "type",
            Token::Const => "const",
            Token::Var => "var",
            Token::Func => "func",
            Token::Struct => "struct",
            Token::Interface => "interface",
            Token::Map => "map",
            Token::Chan => "chan",
            Token::Break => "break",
            Token::Continue => "continue",
            Token::Fallthrough => "fallthrough",
            Token::Return => "return",
            Token::Ident(name) => return write!(f, "identifier {name}"),
            Token::Number => "number",
            Token::String | Token::RawString => "string",
            Token::Rune => "rune",
            Token::LParen => "(",
            Token::RParen => ")",
            Token::LBracket => "[",
            Token::RBracket => "]",
            Token::LBrace => "{",
            Token::RBrace => "}",
            Token::Comma => ",",
            Token::Semicolon => ";",
            Token::Dot => ".",
            Token::Ellipsis => "...",
            Token::Assign => "=",
            Token::Star => "*",
            Token::Operator(op) => op.as_str(),
        };
        f.write_str(text)
    }
}

/// Span type for tracking source positions
pub type Span = Range<usize>;

/// Token with span information
pub type SpannedToken = (Token, Span);

/// Tokenize Go source, inserting the implicit semicolons.
pub fn tokenize(file: &str, source: &str) -> Result<Vec<SpannedToken>, ParseError> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer(source);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let token = result.map_err(|()| ParseError::invalid_token(file, source, span.start))?;
        match token {
            Token::Newline => insert_semicolon(&mut tokens, span),
            Token::LineComment => {}
            Token::BlockComment => {
                if source[span.clone()].contains('\n') {
                    insert_semicolon(&mut tokens, span);
                }
            }
            token => tokens.push((token, span)),
        }
    }
    insert_semicolon(&mut tokens, source.len()..source.len());

    Ok(tokens)
}

fn insert_semicolon(tokens: &mut Vec<SpannedToken>, span: Span) {
    if tokens.last().is_some_and(|(token, _)| token.ends_statement()) {
        tokens.push((Token::Semicolon, span));
    }
}
