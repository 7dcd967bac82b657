use std::iter::Peekable;
use std::str::CharIndices;

use crate::error::ExprError;

#[derive(Debug, Clone, PartialEq)]
pub(super) enum TokenKind {
    Int(i64),
    Float(f64),
    Str(String),
    Ident(String),
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Dot,
    Question,
    Colon,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Bang,
    EqEq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
    AndAnd,
    OrOr,
    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub(super) struct Token {
    pub(super) kind: TokenKind,
    pub(super) position: usize,
}

pub(super) fn tokenize(source: &str) -> Result<Vec<Token>, ExprError> {
    let mut lexer = Lexer {
        source,
        chars: source.char_indices().peekable(),
    };
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            return Ok(tokens);
        }
    }
}

struct Lexer<'src> {
    source: &'src str,
    chars: Peekable<CharIndices<'src>>,
}

impl Lexer<'_> {
    fn next_token(&mut self) -> Result<Token, ExprError> {
        while self.chars.next_if(|(_, ch)| ch.is_whitespace()).is_some() {}

        let Some((position, ch)) = self.chars.next() else {
            return Ok(Token {
                kind: TokenKind::Eof,
                position: self.source.len(),
            });
        };

        let kind = match ch {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            ',' => TokenKind::Comma,
            '?' => TokenKind::Question,
            ':' => TokenKind::Colon,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            '.' if !self.peek_is_digit() => TokenKind::Dot,
            '!' => self.pair('=', TokenKind::NotEq, TokenKind::Bang),
            '<' => self.pair('=', TokenKind::Le, TokenKind::Lt),
            '>' => self.pair('=', TokenKind::Ge, TokenKind::Gt),
            '=' => self.required('=', TokenKind::EqEq, position, "expected '=='")?,
            '&' => self.required('&', TokenKind::AndAnd, position, "expected '&&'")?,
            '|' => self.required('|', TokenKind::OrOr, position, "expected '||'")?,
            '"' | '\'' => TokenKind::Str(self.string(ch, position)?),
            '0'..='9' | '.' => self.number(position)?,
            ch if ch.is_alphabetic() || ch == '_' => self.ident(position),
            other => {
                return Err(ExprError::Syntax {
                    position,
                    message: format!("unexpected character '{other}'"),
                });
            }
        };
        Ok(Token { kind, position })
    }

    fn peek_is_digit(&mut self) -> bool {
        self.chars.peek().is_some_and(|(_, ch)| ch.is_ascii_digit())
    }

    fn pair(&mut self, next: char, matched: TokenKind, single: TokenKind) -> TokenKind {
        if self.chars.next_if(|(_, ch)| *ch == next).is_some() {
            matched
        } else {
            single
        }
    }

    fn required(
        &mut self,
        next: char,
        matched: TokenKind,
        position: usize,
        message: &str,
    ) -> Result<TokenKind, ExprError> {
        if self.chars.next_if(|(_, ch)| *ch == next).is_some() {
            Ok(matched)
        } else {
            Err(ExprError::Syntax {
                position,
                message: message.to_owned(),
            })
        }
    }

    fn string(&mut self, quote: char, start: usize) -> Result<String, ExprError> {
        let mut value = String::new();
        while let Some((position, ch)) = self.chars.next() {
            match ch {
                ch if ch == quote => return Ok(value),
                '\\' => {
                    let Some((_, escaped)) = self.chars.next() else {
                        break;
                    };
                    match escaped {
                        'n' => value.push('\n'),
                        't' => value.push('\t'),
                        'r' => value.push('\r'),
                        '0' => value.push('\0'),
                        '\\' | '"' | '\'' => value.push(escaped),
                        other => {
                            return Err(ExprError::Syntax {
                                position,
                                message: format!("unknown escape '\\{other}'"),
                            });
                        }
                    }
                }
                other => value.push(other),
            }
        }
        Err(ExprError::Syntax {
            position: start,
            message: "unterminated string".to_owned(),
        })
    }

    fn number(&mut self, start: usize) -> Result<TokenKind, ExprError> {
        let bytes = self.source.as_bytes();
        let digits_from = |mut index: usize| {
            while bytes.get(index).is_some_and(|byte| byte.is_ascii_digit() || *byte == b'_') {
                index = index.saturating_add(1);
            }
            index
        };
        let is_digit = |index: usize| bytes.get(index).is_some_and(u8::is_ascii_digit);

        let mut is_float = bytes.get(start) == Some(&b'.');
        let mut end = digits_from(start.saturating_add(1));
        if !is_float && bytes.get(end) == Some(&b'.') && is_digit(end.saturating_add(1)) {
            is_float = true;
            end = digits_from(end.saturating_add(1));
        }
        if matches!(bytes.get(end), Some(b'e' | b'E')) {
            let mut exponent = end.saturating_add(1);
            if matches!(bytes.get(exponent), Some(b'+' | b'-')) {
                exponent = exponent.saturating_add(1);
            }
            if is_digit(exponent) {
                is_float = true;
                end = digits_from(exponent);
            }
        }
        while self.chars.next_if(|(position, _)| *position < end).is_some() {}

        let text: String = self
            .source
            .get(start..end)
            .unwrap_or_default()
            .chars()
            .filter(|ch| *ch != '_')
            .collect();
        let invalid = |message: String| ExprError::Syntax {
            position: start,
            message,
        };
        if is_float {
            let value: f64 = text
                .parse()
                .map_err(|err| invalid(format!("invalid number '{text}': {err}")))?;
            if !value.is_finite() {
                return Err(invalid(format!("number '{text}' is out of range")));
            }
            Ok(TokenKind::Float(value))
        } else {
            text.parse::<i64>()
                .map(TokenKind::Int)
                .map_err(|err| invalid(format!("invalid integer '{text}': {err}")))
        }
    }

    fn ident(&mut self, start: usize) -> TokenKind {
        let mut end = start;
        if let Some(first) = self.source.get(start..).and_then(|rest| rest.chars().next()) {
            end = start.saturating_add(first.len_utf8());
        }
        while let Some((position, ch)) = self
            .chars
            .next_if(|(_, ch)| ch.is_alphanumeric() || *ch == '_')
        {
            end = position.saturating_add(ch.len_utf8());
        }
        TokenKind::Ident(self.source.get(start..end).unwrap_or_default().to_owned())
    }
}
