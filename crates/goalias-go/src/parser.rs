//! Go parser - top-level declarations only
//!
//! `chumsky` combinators over the `logos` token stream. The grammar knows the
//! shape of `package`, `import`, `type`, `const`, `var` and `func`
//! declarations; everything below that level (types, values, bodies) is
//! matched as balanced token trees and kept as source text.

use chumsky::input::ValueInput;
use chumsky::prelude::*;
use chumsky::select;

use goalias_core::{
    ConstBlock, Declaration, FunctionDecl, Ident, OtherDecl, OtherKind, Param, Signature,
    TypeBlock, TypeExpr, TypeParam, TypeSpec, ValueExpr, ValueSpec,
};

use crate::error::{ParseError, span_to_line_column};
use crate::lexer::{Token, tokenize};

type Extra<'t> = extra::Err<Rich<'t, Token>>;

/// Top-level contents of one source file
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    pub package: String,
    pub declarations: Vec<Declaration>,
}

/// Parse the top-level declarations of a Go source file.
pub fn parse_file(file: &str, source: &str) -> Result<SourceFile, ParseError> {
    let tokens: Vec<(Token, SimpleSpan)> = tokenize(file, source)?
        .into_iter()
        .map(|(token, span)| (token, span.into()))
        .collect();
    let eoi = SimpleSpan::from(source.len()..source.len());

    file_parser(source)
        .parse(tokens.as_slice().map(eoi, |(token, span)| (token, span)))
        .into_result()
        .map_err(|errors| to_parse_error(file, source, errors))
}

/// Convert the first chumsky error to a ParseError
fn to_parse_error(file: &str, source: &str, errors: Vec<Rich<'_, Token>>) -> ParseError {
    let Some(err) = errors.into_iter().next() else {
        return ParseError::UnexpectedEof {
            file: file.to_string(),
            expected: "declaration".to_string(),
        };
    };

    let expected: Vec<String> = err.expected().map(ToString::to_string).collect();
    let expected = if expected.is_empty() {
        "declaration".to_string()
    } else {
        expected.join(" or ")
    };

    match err.found() {
        Some(_) => {
            let span = err.span();
            let (line, column) = span_to_line_column(source, span.start);
            let found = match source.get(span.start..span.end).map(str::trim) {
                None | Some("") => "newline".to_string(),
                Some(text) => format!("`{text}`"),
            };
            ParseError::Unexpected {
                file: file.to_string(),
                line,
                column,
                expected,
                found,
            }
        }
        None => ParseError::UnexpectedEof {
            file: file.to_string(),
            expected,
        },
    }
}

// ============================================================================
// Token trees
// ============================================================================

/// One balanced token tree at the top level of a capture: a single token or
/// a bracketed group, identified by its first token
#[derive(Debug, Clone)]
struct Item {
    token: Token,
    span: SimpleSpan,
}

/// Source text covered by a run of items
fn text<'s>(source: &'s str, items: &[Item]) -> Option<&'s str> {
    let (first, last) = (items.first()?, items.last()?);
    source.get(first.span.start..last.span.end)
}

fn is_closer(token: &Token) -> bool {
    matches!(token, Token::RParen | Token::RBracket | Token::RBrace)
}

fn semicolon(token: &Token) -> bool {
    *token == Token::Semicolon
}

fn comma(token: &Token) -> bool {
    *token == Token::Comma
}

fn comma_or_semicolon(token: &Token) -> bool {
    matches!(token, Token::Comma | Token::Semicolon)
}

fn assign_or_semicolon(token: &Token) -> bool {
    matches!(token, Token::Assign | Token::Semicolon)
}

fn body_or_semicolon(token: &Token) -> bool {
    matches!(token, Token::LBrace | Token::Semicolon)
}

/// A single non-bracket token or a bracketed group with anything inside
fn token_tree<'t, I>() -> impl Parser<'t, I, (), Extra<'t>> + Clone
where
    I: ValueInput<'t, Token = Token, Span = SimpleSpan>,
{
    recursive(|tree| {
        let body = tree.repeated();
        choice((
            body.clone()
                .delimited_by(just(Token::LParen), just(Token::RParen)),
            body.clone()
                .delimited_by(just(Token::LBracket), just(Token::RBracket)),
            body.delimited_by(just(Token::LBrace), just(Token::RBrace)),
            any().filter(|token: &Token| !token.is_bracket()).ignored(),
        ))
    })
}

/// One [`Item`] that does not start with a `stop` token. `struct {..}` and
/// `interface {..}` form a single item, so a `{` stop never splits them.
fn item<'t, I>(stop: fn(&Token) -> bool) -> impl Parser<'t, I, Item, Extra<'t>> + Clone
where
    I: ValueInput<'t, Token = Token, Span = SimpleSpan>,
{
    let type_body = one_of([Token::Struct, Token::Interface])
        .then_ignore(just(Token::LBrace).rewind())
        .then_ignore(token_tree());
    let other = any()
        .filter(move |token: &Token| !stop(token) && !is_closer(token))
        .rewind()
        .then_ignore(token_tree());

    type_body
        .or(other)
        .map_with(|token, e| Item {
            token,
            span: e.span(),
        })
}

/// Items up to a `stop` token or an unmatched closing bracket, at least one
fn capture<'t, I>(stop: fn(&Token) -> bool) -> impl Parser<'t, I, Vec<Item>, Extra<'t>> + Clone
where
    I: ValueInput<'t, Token = Token, Span = SimpleSpan>,
{
    item(stop).repeated().at_least(1).collect::<Vec<_>>()
}

// ============================================================================
// Shared pieces
// ============================================================================

fn ident<'t, I>() -> impl Parser<'t, I, String, Extra<'t>> + Clone
where
    I: ValueInput<'t, Token = Token, Span = SimpleSpan>,
{
    select! { Token::Ident(name) => name }.labelled("identifier")
}

fn ident_list<'t, I>() -> impl Parser<'t, I, Vec<String>, Extra<'t>> + Clone
where
    I: ValueInput<'t, Token = Token, Span = SimpleSpan>,
{
    ident()
        .separated_by(just(Token::Comma))
        .at_least(1)
        .collect::<Vec<_>>()
}

fn semicolons<'t, I>() -> impl Parser<'t, I, (), Extra<'t>> + Clone
where
    I: ValueInput<'t, Token = Token, Span = SimpleSpan>,
{
    just(Token::Semicolon).repeated()
}

/// End of a declaration: `;` (possibly implicit) or end of file
fn terminator<'t, I>() -> impl Parser<'t, I, (), Extra<'t>> + Clone
where
    I: ValueInput<'t, Token = Token, Span = SimpleSpan>,
{
    just(Token::Semicolon).ignored().or(end())
}

/// Either one spec or a parenthesized group of specs
fn group<'t, I, O>(
    spec: impl Parser<'t, I, O, Extra<'t>> + Clone,
) -> impl Parser<'t, I, Vec<O>, Extra<'t>> + Clone
where
    I: ValueInput<'t, Token = Token, Span = SimpleSpan>,
{
    let grouped = semicolons()
        .ignore_then(
            spec.clone()
                .separated_by(just(Token::Semicolon).repeated().at_least(1))
                .allow_trailing()
                .collect::<Vec<_>>(),
        )
        .delimited_by(just(Token::LParen), just(Token::RParen));

    grouped
        .or(spec.map(|spec| vec![spec]))
        .then_ignore(terminator())
}

// ============================================================================
// Type parameters
// ============================================================================

/// Names sharing one constraint, e.g. `K, V comparable`
type ParamGroup = (Vec<String>, Vec<Item>);

/// `[K comparable, V any]`, and whether a trailing comma closes the list
fn type_param_groups<'t, I>() -> impl Parser<'t, I, (Vec<ParamGroup>, bool), Extra<'t>> + Clone
where
    I: ValueInput<'t, Token = Token, Span = SimpleSpan>,
{
    ident_list()
        .then(capture(comma))
        .separated_by(just(Token::Comma))
        .at_least(1)
        .collect::<Vec<_>>()
        .then(just(Token::Comma).or_not().map(|comma| comma.is_some()))
        .delimited_by(just(Token::LBracket), just(Token::RBracket))
}

fn to_type_params(source: &str, groups: Vec<ParamGroup>) -> Vec<TypeParam> {
    groups
        .into_iter()
        .map(|(names, constraint)| TypeParam {
            names,
            constraint: TypeExpr::new(text(source, &constraint).unwrap_or_default()),
        })
        .collect()
}

/// Whether the bracket after a declared type name is an array length rather
/// than a type parameter list.
///
/// A constraint never starts with `.` or a binary operator. `[P *C]` and
/// `[a[0]]` are valid length expressions and read as arrays unless a second
/// parameter or a trailing comma follows.
fn reads_as_array_length(groups: &[ParamGroup], trailing_comma: bool) -> bool {
    let impossible_constraint = groups.iter().any(|(_, constraint)| {
        constraint.first().is_some_and(|item| match &item.token {
            Token::Dot => true,
            Token::Operator(op) => !op.starts_with('~') && op != "<-",
            _ => false,
        })
    });
    if impossible_constraint {
        return true;
    }

    match groups {
        [(names, constraint)] if names.len() == 1 && !trailing_comma => {
            match constraint.as_slice() {
                [first, ..] if first.token == Token::Star => true,
                [single] => matches!(single.token, Token::LBracket | Token::LParen),
                _ => false,
            }
        }
        _ => false,
    }
}

// ============================================================================
// Specs
// ============================================================================

fn type_spec<'t, I>(source: &str) -> impl Parser<'t, I, TypeSpec, Extra<'t>> + Clone
where
    I: ValueInput<'t, Token = Token, Span = SimpleSpan>,
{
    let type_params = type_param_groups()
        .try_map(|(groups, trailing_comma), span| {
            if reads_as_array_length(&groups, trailing_comma) {
                Err(Rich::custom(span, "array length, not type parameters"))
            } else {
                Ok(groups)
            }
        })
        .map(move |groups| to_type_params(source, groups));

    ident()
        .then(type_params.or_not())
        .then(just(Token::Assign).or_not())
        .then(capture(semicolon).or_not())
        .map(move |(((name, type_params), assign), ty)| TypeSpec {
            name: Ident::new(name),
            type_params: type_params.unwrap_or_default(),
            ty: ty.and_then(|items| text(source, &items)).map(TypeExpr::new),
            is_alias: assign.is_some(),
        })
}

/// `const` spec: names, optional type, optional values
fn value_spec<'t, I>(source: &str) -> impl Parser<'t, I, ValueSpec, Extra<'t>> + Clone
where
    I: ValueInput<'t, Token = Token, Span = SimpleSpan>,
{
    let values = capture(comma_or_semicolon)
        .separated_by(just(Token::Comma))
        .at_least(1)
        .collect::<Vec<_>>();

    ident_list()
        .then(capture(assign_or_semicolon).or_not())
        .then(just(Token::Assign).ignore_then(values).or_not())
        .map(move |((names, ty), values)| ValueSpec {
            names: names.into_iter().map(Ident::new).collect(),
            ty: ty.and_then(|items| text(source, &items)).map(TypeExpr::new),
            values: values
                .unwrap_or_default()
                .iter()
                .filter_map(|items| text(source, items))
                .map(ValueExpr::new)
                .collect(),
        })
}

fn var_spec<'t, I>() -> impl Parser<'t, I, Vec<Ident>, Extra<'t>> + Clone
where
    I: ValueInput<'t, Token = Token, Span = SimpleSpan>,
{
    ident_list()
        .then_ignore(capture(semicolon).or_not())
        .map(|names| names.into_iter().map(Ident::new).collect())
}

// ============================================================================
// Functions
// ============================================================================

/// How one entry of a parameter list reads on its own
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryShape {
    /// `name T`
    Named,
    /// `Name[..]`: an instantiated generic type, unless the list is named
    Instantiated,
    /// A type on its own, or a name sharing the type of a later entry
    Bare,
}

impl EntryShape {
    fn of(items: &[Item]) -> Self {
        match items {
            [first, second, rest @ ..] if matches!(first.token, Token::Ident(_)) => {
                match second.token {
                    Token::Dot => EntryShape::Bare,
                    Token::LBracket if rest.is_empty() => EntryShape::Instantiated,
                    _ => EntryShape::Named,
                }
            }
            _ => EntryShape::Bare,
        }
    }
}

/// Resolve a parameter list. Either every entry carries a name
/// (`a, b int, c string`) or none does (`int, error`).
fn resolve_params(source: &str, entries: &[Vec<Item>]) -> Vec<Param> {
    let shapes: Vec<EntryShape> = entries.iter().map(|items| EntryShape::of(items)).collect();

    if !shapes.contains(&EntryShape::Named) {
        return entries
            .iter()
            .filter_map(|items| text(source, items))
            .map(Param::unnamed)
            .collect();
    }

    let mut params = Vec::new();
    let mut pending = Vec::new();
    for (items, shape) in entries.iter().zip(shapes) {
        let split = (shape != EntryShape::Bare)
            .then(|| text(source, &items[..1]).zip(text(source, &items[1..])))
            .flatten();
        match split {
            Some((name, ty)) => {
                pending.push(name);
                params.extend(pending.drain(..).map(|name| Param::named(name, ty)));
            }
            None => pending.extend(text(source, items)),
        }
    }
    // Trailing names without a type are malformed; keep them as types.
    params.extend(pending.into_iter().map(Param::unnamed));
    params
}

/// Parenthesized parameter, result or receiver list
fn params<'t, I>(source: &str) -> impl Parser<'t, I, Vec<Param>, Extra<'t>> + Clone
where
    I: ValueInput<'t, Token = Token, Span = SimpleSpan>,
{
    capture(comma)
        .separated_by(just(Token::Comma))
        .allow_trailing()
        .collect::<Vec<_>>()
        .delimited_by(just(Token::LParen), just(Token::RParen))
        .map(move |entries| resolve_params(source, &entries))
}

fn function<'t, I>(source: &str) -> impl Parser<'t, I, FunctionDecl, Extra<'t>> + Clone
where
    I: ValueInput<'t, Token = Token, Span = SimpleSpan>,
{
    let type_params = type_param_groups().map(move |(groups, _)| to_type_params(source, groups));
    let single_result = capture(body_or_semicolon).map(move |items| {
        text(source, &items)
            .map(Param::unnamed)
            .into_iter()
            .collect::<Vec<_>>()
    });
    let results = params(source)
        .or(single_result)
        .or_not()
        .map(Option::unwrap_or_default);
    let body = just(Token::LBrace).rewind().ignore_then(token_tree());

    just(Token::Func)
        .ignore_then(params(source).or_not())
        .then(ident())
        .then(type_params.or_not())
        .then(params(source))
        .then(results)
        .then_ignore(body.or_not())
        .then_ignore(terminator())
        .map(
            |((((receiver, name), type_params), params), results)| FunctionDecl {
                name: Ident::new(name),
                receiver: receiver.and_then(|receiver| receiver.into_iter().next()),
                type_params: type_params.unwrap_or_default(),
                signature: Signature { params, results },
            },
        )
}

// ============================================================================
// File
// ============================================================================

fn file_parser<'t, I>(source: &str) -> impl Parser<'t, I, SourceFile, Extra<'t>> + Clone
where
    I: ValueInput<'t, Token = Token, Span = SimpleSpan>,
{
    let package = just(Token::Package)
        .labelled("package clause")
        .ignore_then(ident())
        .then_ignore(terminator());

    let import = just(Token::Import)
        .ignore_then(group(capture(semicolon).ignored()))
        .to(Declaration::Other(OtherDecl {
            kind: OtherKind::Import,
            names: vec![],
        }));
    let types = just(Token::Type)
        .ignore_then(group(type_spec(source)))
        .map(|specs| Declaration::Type(TypeBlock { specs }));
    let constants = just(Token::Const)
        .ignore_then(group(value_spec(source)))
        .map(|specs| Declaration::Constant(ConstBlock { specs }));
    let vars = just(Token::Var)
        .ignore_then(group(var_spec()))
        .map(|names| {
            Declaration::Other(OtherDecl {
                kind: OtherKind::Var,
                names: names.concat(),
            })
        });
    let functions = function(source).map(Declaration::Function);

    let declaration =
        choice((import, types, constants, vars, functions)).labelled("declaration");

    semicolons()
        .ignore_then(package)
        .then(
            semicolons()
                .ignore_then(declaration)
                .repeated()
                .collect::<Vec<_>>(),
        )
        .then_ignore(semicolons())
        .then_ignore(end())
        .map(|(package, declarations)| SourceFile {
            package,
            declarations,
        })
}
