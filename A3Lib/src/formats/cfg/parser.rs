//! Config text parser
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT
//!
//! Recursive descent over the token list from [`tokenize`]. The input is
//! expected to be preprocessed already: `#include`/`#define` are not handled.
//!
//! The parser is strict. Anything it cannot place is a
//! [`Error::ConfigSyntax`] with a line and column, `delete` and `enum`
//! statements are [`Error::UnsupportedConstruct`], and a second class with
//! the same name is [`Error::DuplicateDefinition`]. A repeated property is
//! the one exception: the first definition is kept and the rest are dropped.

use super::document::{ClassId, Config, ConfigArray, ConfigValue};
use super::tokenizer::{Token, TokenKind, tokenize};
use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

/// Options for [`parse_cfg`].
#[derive(Debug, Clone)]
pub struct CfgParseOptions {
    /// Name given to the implicit root class.
    pub root_name: String,
}

impl Default for CfgParseOptions {
    fn default() -> Self {
        Self {
            root_name: "config".to_string(),
        }
    }
}

/// Read and parse a text config file.
///
/// # Errors
/// Returns an error if the file cannot be read or does not parse.
pub fn read_cfg<P: AsRef<Path>>(path: P) -> Result<Config> {
    let source = fs::read_to_string(path)?;
    parse_cfg(&source, &CfgParseOptions::default())
}

/// Parse config source text.
///
/// # Errors
/// Returns the first syntax, inheritance or duplicate-class error.
pub fn parse_cfg(source: &str, options: &CfgParseOptions) -> Result<Config> {
    let mut parser = Parser::new(source, Config::new(options.root_name.clone()));
    let root = parser.config.root_id();
    parser.parse_body(root, false)?;
    tracing::debug!(
        "Parsed config '{}' with {} classes",
        options.root_name,
        parser.config.class_count()
    );
    Ok(parser.config)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    end_location: (usize, usize),
    config: Config,
}

impl Parser {
    fn new(source: &str, config: Config) -> Self {
        Self {
            tokens: tokenize(source),
            pos: 0,
            end_location: end_location(source),
            config,
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> Option<&TokenKind> {
        self.peek().map(|t| &t.kind)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn seek(&mut self, pos: usize) {
        self.pos = pos.min(self.tokens.len());
    }

    fn location(&self) -> (usize, usize) {
        self.peek()
            .map_or(self.end_location, |t| (t.line, t.column))
    }

    fn syntax_error(&self, message: impl Into<String>) -> Error {
        let (line, column) = self.location();
        Error::ConfigSyntax {
            message: message.into(),
            line,
            column,
        }
    }

    fn describe_next(&self) -> String {
        self.peek()
            .map_or_else(|| "end of input".to_string(), |t| format!("'{}'", t.lexeme))
    }

    fn expect(&mut self, kind: &TokenKind, what: &str) -> Result<Token> {
        if self.peek_kind() == Some(kind)
            && let Some(token) = self.advance()
        {
            return Ok(token);
        }
        Err(self.syntax_error(format!("expected {what}, found {}", self.describe_next())))
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek_kind() == Some(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn parse_body(&mut self, class: ClassId, nested: bool) -> Result<()> {
        loop {
            let Some(token) = self.peek().cloned() else {
                if nested {
                    return Err(self.syntax_error("unexpected end of input, expected '}'"));
                }
                return Ok(());
            };

            match &token.kind {
                TokenKind::RightBrace if nested => return Ok(()),
                TokenKind::Class => self.parse_class(class)?,
                TokenKind::Delete | TokenKind::Enum => {
                    return Err(Error::UnsupportedConstruct {
                        construct: token.lexeme,
                        line: token.line,
                        column: token.column,
                    });
                }
                TokenKind::Semicolon => self.pos += 1,
                TokenKind::Identifier(_) | TokenKind::Long(_) | TokenKind::Float(_) => {
                    self.parse_property(class)?;
                }
                _ => {
                    return Err(self.syntax_error(format!(
                        "unexpected {} in class body",
                        self.describe_next()
                    )));
                }
            }
        }
    }

    /// Identifier, glued together from touching identifier and number tokens.
    fn parse_identifier(&mut self, what: &str) -> Result<String> {
        let first = match self.peek() {
            Some(t) if is_name_part(&t.kind) => t.clone(),
            _ => {
                return Err(self.syntax_error(format!(
                    "expected {what}, found {}",
                    self.describe_next()
                )));
            }
        };
        self.pos += 1;

        let mut name = first.lexeme.clone();
        let mut last = first;
        while let Some(next) = self.peek() {
            if !is_name_part(&next.kind) || !last.touches(next) {
                break;
            }
            name.push_str(&next.lexeme);
            last = next.clone();
            self.pos += 1;
        }
        Ok(name)
    }

    fn parse_class(&mut self, container: ClassId) -> Result<()> {
        self.expect(&TokenKind::Class, "'class'")?;
        let name = self.parse_identifier("class name")?;

        if self.eat(&TokenKind::Semicolon) {
            self.config.add_class(container, &name, None, true)?;
            return Ok(());
        }

        let parent = if self.eat(&TokenKind::Colon) {
            Some(self.parse_identifier("parent class name")?)
        } else {
            None
        };

        if self.eat(&TokenKind::Semicolon) {
            self.config
                .add_class(container, &name, parent.as_deref(), true)?;
            return Ok(());
        }

        self.expect(&TokenKind::LeftBrace, "'{'")?;
        let id = self
            .config
            .add_class(container, &name, parent.as_deref(), false)?;
        self.parse_body(id, true)?;
        self.expect(&TokenKind::RightBrace, "'}'")?;
        self.eat(&TokenKind::Semicolon);
        Ok(())
    }

    fn parse_property(&mut self, class: ClassId) -> Result<()> {
        let (line, column) = self.location();
        let name = self.parse_identifier("property name")?;

        let value = if self.eat(&TokenKind::LeftBracket) {
            self.expect(&TokenKind::RightBracket, "']'")?;
            let extends = self.eat(&TokenKind::Plus);
            self.expect(&TokenKind::Equals, "'='")?;
            let mut array = self.parse_array()?;
            array.extends = extends;
            ConfigValue::Array(array)
        } else {
            self.expect(&TokenKind::Equals, "'='")?;
            self.parse_literal(&[TokenKind::Semicolon, TokenKind::RightBrace])?
        };
        self.expect(&TokenKind::Semicolon, "';'")?;

        if !self.config.insert_property(class, &name, value) {
            tracing::warn!(
                "Ignoring duplicate property '{}' at line {}, column {}",
                name,
                line,
                column
            );
        }
        Ok(())
    }

    fn parse_array(&mut self) -> Result<ConfigArray> {
        self.expect(&TokenKind::LeftBrace, "'{'")?;
        let mut array = ConfigArray::default();

        if self.eat(&TokenKind::RightBrace) {
            return Ok(array);
        }

        loop {
            let item = if self.peek_kind() == Some(&TokenKind::LeftBrace) {
                ConfigValue::Array(self.parse_array()?)
            } else {
                self.parse_literal(&[TokenKind::Comma, TokenKind::RightBrace])?
            };
            array.items.push(item);

            if self.eat(&TokenKind::Comma) {
                // trailing comma
                if self.eat(&TokenKind::RightBrace) {
                    break;
                }
                continue;
            }
            self.expect(&TokenKind::RightBrace, "',' or '}'")?;
            break;
        }
        Ok(array)
    }

    /// Scalar value: every token up to one of `stops`, folded into one value.
    fn parse_literal(&mut self, stops: &[TokenKind]) -> Result<ConfigValue> {
        let start = self.pos;
        while let Some(kind) = self.peek_kind() {
            if stops.contains(kind) {
                break;
            }
            if matches!(kind, TokenKind::LeftBrace) {
                return Err(self.syntax_error("unexpected '{' in value"));
            }
            self.pos += 1;
        }
        if self.peek().is_none() {
            return Err(self.syntax_error("unexpected end of input in value"));
        }

        let end = self.pos;
        if start == end {
            self.seek(start);
            return Err(self.syntax_error(format!("expected value, found {}", self.describe_next())));
        }
        Ok(fold_literal(&self.tokens[start..end]))
    }
}

fn is_name_part(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Identifier(_) | TokenKind::Long(_) | TokenKind::Float(_)
    )
}

fn fold_literal(tokens: &[Token]) -> ConfigValue {
    match tokens {
        [single] => match &single.kind {
            TokenKind::Long(v) => ConfigValue::Long(*v),
            TokenKind::Float(v) => ConfigValue::Float(*v),
            TokenKind::String(s) => ConfigValue::String(s.clone()),
            _ => ConfigValue::String(single.lexeme.clone()),
        },
        [sign, number] if matches!(sign.kind, TokenKind::Minus | TokenKind::Plus) => {
            let negative = sign.kind == TokenKind::Minus;
            match number.kind {
                TokenKind::Long(v) => ConfigValue::Long(if negative { v.wrapping_neg() } else { v }),
                TokenKind::Float(v) => ConfigValue::Float(if negative { -v } else { v }),
                _ => concatenate(tokens),
            }
        }
        _ => concatenate(tokens),
    }
}

fn concatenate(tokens: &[Token]) -> ConfigValue {
    let mut text = String::new();
    let mut previous: Option<&Token> = None;
    for token in tokens {
        if previous.is_some_and(|p| !p.touches(token)) {
            text.push(' ');
        }
        match &token.kind {
            TokenKind::String(s) => text.push_str(s),
            _ => text.push_str(&token.lexeme),
        }
        previous = Some(token);
    }
    ConfigValue::String(text)
}

fn end_location(source: &str) -> (usize, usize) {
    let line = source.matches('\n').count() + 1;
    let column = source
        .rsplit('\n')
        .next()
        .map_or(0, |last| last.chars().count())
        + 1;
    (line, column)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> Result<Config> {
        parse_cfg(source, &CfgParseOptions::default())
    }

    #[test]
    fn test_item_scenario() {
        let config = parse(r#"class Item { value = 5; tags[] = {"a","b"}; };"#).unwrap();
        let item = config.root().get_class("Item").unwrap();
        assert_eq!(item.name(), "Item");
        assert_eq!(item.get_prop("value"), Some(&ConfigValue::Long(5)));
        assert_eq!(
            item.get_prop("tags"),
            Some(&ConfigValue::from(vec![
                ConfigValue::from("a"),
                ConfigValue::from("b")
            ]))
        );
    }

    #[test]
    fn test_inheritance() {
        let config = parse("class A { x = 1; }; class B: A { };").unwrap();
        let root = config.root();
        assert_eq!(root.get_prop("B/x"), Some(&ConfigValue::Long(1)));

        let config = parse("class A { x = 1; }; class B: A { x = 2; };").unwrap();
        let root = config.root();
        assert_eq!(root.get_prop("B/x"), Some(&ConfigValue::Long(2)));
        assert_eq!(root.get_prop("A/x"), Some(&ConfigValue::Long(1)));
    }

    #[test]
    fn test_signed_numbers_and_concatenation() {
        let config = parse(
            "a = -5; b = +2.5; c = \\A3\\data_f\\box.p3d; d = Hello World; e = \"x\"\"y\";",
        )
        .unwrap();
        let root = config.root();
        assert_eq!(root.get_prop("a"), Some(&ConfigValue::Long(-5)));
        assert_eq!(root.get_prop("b"), Some(&ConfigValue::Float(2.5)));
        assert_eq!(
            root.get_prop("c"),
            Some(&ConfigValue::from("\\A3\\data_f\\box.p3d"))
        );
        assert_eq!(root.get_prop("d"), Some(&ConfigValue::from("Hello World")));
        assert_eq!(root.get_prop("e"), Some(&ConfigValue::from("x\"y")));
    }

    #[test]
    fn test_nested_and_extended_arrays() {
        let config = parse("class A { list[] = {1, {2, 3}, }; }; class B: A { list[] += {4}; };")
            .unwrap();
        let a = config.root().get_prop("A/list").and_then(ConfigValue::as_array).unwrap();
        assert!(!a.extends);
        assert_eq!(a.items.len(), 2);
        assert_eq!(
            a.items[1],
            ConfigValue::from(vec![ConfigValue::Long(2), ConfigValue::Long(3)])
        );
        let b = config.root().get_prop("B/list").and_then(ConfigValue::as_array).unwrap();
        assert!(b.extends);
    }

    #[test]
    fn test_glued_identifiers() {
        let config = parse("class 30mm_HE { caliber = 30; };").unwrap();
        assert!(config.root().get_class("30mm_HE").is_some());
    }

    #[test]
    fn test_reference_class() {
        let config = parse("class Base; class Derived: Base {};").unwrap();
        let base = config.root().get_class("Base").unwrap();
        assert!(base.is_reference());
        let derived = config.root().get_class("Derived").unwrap();
        assert_eq!(derived.parent().unwrap().name(), "Base");
    }

    #[test]
    fn test_unresolved_parent_is_error() {
        let err = parse("class B: A {};").unwrap_err();
        assert!(matches!(err, Error::UnresolvedParent { .. }));
    }

    #[test]
    fn test_duplicate_property_keeps_first() {
        let config = parse("x = 1; X = 2;").unwrap();
        assert_eq!(config.root().get_prop("x"), Some(&ConfigValue::Long(1)));
    }

    #[test]
    fn test_duplicate_class_is_error() {
        let err = parse("class A {}; class a {};").unwrap_err();
        assert!(matches!(err, Error::DuplicateDefinition { .. }));
    }

    // Text configs reject delete/enum while rapified configs discard them.
    #[test]
    fn test_delete_and_enum_are_unsupported() {
        let err = parse("class A {};\ndelete A;").unwrap_err();
        assert!(matches!(
            err,
            Error::UnsupportedConstruct { ref construct, line: 2, column: 1 } if construct == "delete"
        ));
        let err = parse("enum { a = 1 };").unwrap_err();
        assert!(matches!(err, Error::UnsupportedConstruct { .. }));
    }

    #[test]
    fn test_syntax_error_location() {
        let err = parse("class A\n{\n  x = 1\n};").unwrap_err();
        match err {
            Error::ConfigSyntax { line, column, .. } => assert_eq!((line, column), (4, 1)),
            other => panic!("expected syntax error, got {other:?}"),
        }
    }

    #[test]
    fn test_unterminated_class() {
        let err = parse("class A { x = 1;").unwrap_err();
        assert!(matches!(err, Error::ConfigSyntax { .. }));
    }
}
