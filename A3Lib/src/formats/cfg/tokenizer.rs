//! Config text tokenizer
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT
//!
//! Comments and whitespace are dropped. Every other character ends up in
//! some token; characters with no meaning in the grammar become
//! [`TokenKind::Unknown`], so tokenizing never fails.

/// Token categories.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Class,
    Delete,
    Enum,
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    LeftParen,
    RightParen,
    Comma,
    Semicolon,
    Colon,
    Equals,
    Plus,
    Minus,
    Hash,
    Long(i64),
    Float(f64),
    /// Quoted string with `""` escapes already collapsed.
    String(String),
    Identifier(String),
    Unknown(char),
}

/// A token with its source location.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Exact source text, quotes included for strings.
    pub lexeme: String,
    /// Byte offset of the first character.
    pub offset: usize,
    /// 1-based line.
    pub line: usize,
    /// 1-based column, counted in characters.
    pub column: usize,
}

impl Token {
    /// Byte offset just past the last character.
    pub fn end(&self) -> usize {
        self.offset + self.lexeme.len()
    }

    /// Whether `next` starts exactly where this token ends.
    pub fn touches(&self, next: &Token) -> bool {
        self.end() == next.offset
    }
}

/// Single-pass scanner over config source text.
pub struct Tokenizer<'a> {
    source: &'a str,
    pos: usize,
    line: usize,
    column: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    /// Current line and column (1-based).
    pub fn location(&self) -> (usize, usize) {
        (self.line, self.column)
    }

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.source[self.pos..].chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn bump_while(&mut self, pred: impl Fn(char) -> bool) {
        while self.peek().is_some_and(&pred) {
            self.bump();
        }
    }

    fn skip_trivia(&mut self) {
        loop {
            match (self.peek(), self.peek_nth(1)) {
                (Some(c), _) if c.is_whitespace() => {
                    self.bump();
                }
                (Some('/'), Some('/')) => {
                    self.bump_while(|c| c != '\n');
                }
                (Some('/'), Some('*')) => {
                    self.bump();
                    self.bump();
                    loop {
                        match self.bump() {
                            None => break,
                            Some('*') if self.peek() == Some('/') => {
                                self.bump();
                                break;
                            }
                            Some(_) => {}
                        }
                    }
                }
                _ => break,
            }
        }
    }

    fn lex_string(&mut self) -> TokenKind {
        self.bump(); // opening quote
        let mut value = String::new();
        while let Some(c) = self.bump() {
            if c == '"' {
                if self.peek() == Some('"') {
                    self.bump();
                    value.push('"');
                } else {
                    break;
                }
            } else {
                value.push(c);
            }
        }
        TokenKind::String(value)
    }

    fn exponent_follows(&self) -> bool {
        match (self.peek(), self.peek_nth(1), self.peek_nth(2)) {
            (Some('e' | 'E' | 'd' | 'D'), Some(d), _) if d.is_ascii_digit() => true,
            (Some('e' | 'E' | 'd' | 'D'), Some('+' | '-'), Some(d)) => d.is_ascii_digit(),
            _ => false,
        }
    }

    fn lex_number(&mut self, start: usize) -> TokenKind {
        if self.peek() == Some('0')
            && matches!(self.peek_nth(1), Some('x' | 'X'))
            && self.peek_nth(2).is_some_and(|c| c.is_ascii_hexdigit())
        {
            self.bump();
            self.bump();
            let digits_start = self.pos;
            self.bump_while(|c| c.is_ascii_hexdigit());
            let digits = &self.source[digits_start..self.pos];
            return match u64::from_str_radix(digits, 16) {
                Ok(v) => TokenKind::Long(v as i64),
                Err(_) => TokenKind::Unknown('0'),
            };
        }

        let mut is_float = false;
        self.bump_while(|c| c.is_ascii_digit());
        if self.peek() == Some('.') {
            is_float = true;
            self.bump();
            self.bump_while(|c| c.is_ascii_digit());
        }
        if self.exponent_follows() {
            is_float = true;
            self.bump();
            if matches!(self.peek(), Some('+' | '-')) {
                self.bump();
            }
            self.bump_while(|c| c.is_ascii_digit());
        }

        let text = &self.source[start..self.pos];
        if !is_float && let Ok(v) = text.parse::<i64>() {
            return TokenKind::Long(v);
        }
        let normalized: String = text
            .chars()
            .map(|c| if matches!(c, 'd' | 'D') { 'e' } else { c })
            .collect();
        // Digit-only text that overflowed i64 still parses as a float.
        normalized
            .parse::<f64>()
            .map_or(TokenKind::Unknown('.'), TokenKind::Float)
    }

    /// Scan the next token, or `None` at end of input.
    pub fn next_token(&mut self) -> Option<Token> {
        self.skip_trivia();
        let start = self.pos;
        let (line, column) = self.location();
        let c = self.peek()?;

        let kind = match c {
            '"' => self.lex_string(),
            '0'..='9' => self.lex_number(start),
            '.' if self.peek_nth(1).is_some_and(|d| d.is_ascii_digit()) => self.lex_number(start),
            c if c.is_alphanumeric() || c == '_' => {
                self.bump_while(|c| c.is_alphanumeric() || c == '_');
                let word = &self.source[start..self.pos];
                match word {
                    "class" => TokenKind::Class,
                    "delete" => TokenKind::Delete,
                    "enum" => TokenKind::Enum,
                    _ => TokenKind::Identifier(word.to_string()),
                }
            }
            _ => {
                self.bump();
                match c {
                    '{' => TokenKind::LeftBrace,
                    '}' => TokenKind::RightBrace,
                    '[' => TokenKind::LeftBracket,
                    ']' => TokenKind::RightBracket,
                    '(' => TokenKind::LeftParen,
                    ')' => TokenKind::RightParen,
                    ',' => TokenKind::Comma,
                    ';' => TokenKind::Semicolon,
                    ':' => TokenKind::Colon,
                    '=' => TokenKind::Equals,
                    '+' => TokenKind::Plus,
                    '-' => TokenKind::Minus,
                    '#' => TokenKind::Hash,
                    other => TokenKind::Unknown(other),
                }
            }
        };

        Some(Token {
            kind,
            lexeme: self.source[start..self.pos].to_string(),
            offset: start,
            line,
            column,
        })
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.next_token()
    }
}

/// Tokenize a whole source text.
pub fn tokenize(source: &str) -> Vec<Token> {
    Tokenizer::new(source).collect()
}
