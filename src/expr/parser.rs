use serde_json::{Number, Value};

use crate::error::ExprError;

use super::ast::{BinaryOp, Expr, UnaryOp};
use super::functions::Function;
use super::lexer::{Token, TokenKind};

static EOF_TOKEN: Token = Token {
    kind: TokenKind::Eof,
    position: 0,
};

const KEYWORDS: [&str; 7] = [
    "and",
    "or",
    "not",
    "in",
    "contains",
    "startsWith",
    "endsWith",
];

const EQUALITY_OPS: [(TokenKind, BinaryOp); 2] = [
    (TokenKind::EqEq, BinaryOp::Eq),
    (TokenKind::NotEq, BinaryOp::Ne),
];
const COMPARISON_OPS: [(TokenKind, BinaryOp); 4] = [
    (TokenKind::Lt, BinaryOp::Lt),
    (TokenKind::Le, BinaryOp::Le),
    (TokenKind::Gt, BinaryOp::Gt),
    (TokenKind::Ge, BinaryOp::Ge),
];
const ADDITIVE_OPS: [(TokenKind, BinaryOp); 2] = [
    (TokenKind::Plus, BinaryOp::Add),
    (TokenKind::Minus, BinaryOp::Sub),
];
const MULTIPLICATIVE_OPS: [(TokenKind, BinaryOp); 3] = [
    (TokenKind::Star, BinaryOp::Mul),
    (TokenKind::Slash, BinaryOp::Div),
    (TokenKind::Percent, BinaryOp::Rem),
];

pub(super) fn parse(tokens: Vec<Token>) -> Result<Expr, ExprError> {
    let mut parser = Parser { tokens, cursor: 0 };
    let expr = parser.conditional()?;
    let trailing = parser.peek();
    if trailing.kind != TokenKind::Eof {
        return Err(parser.unexpected(trailing));
    }
    Ok(expr)
}

struct Parser {
    tokens: Vec<Token>,
    cursor: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        self.tokens.get(self.cursor).unwrap_or(&EOF_TOKEN)
    }

    fn peek_second(&self) -> &Token {
        self.tokens
            .get(self.cursor.saturating_add(1))
            .unwrap_or(&EOF_TOKEN)
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        self.cursor = self.cursor.saturating_add(1);
        token
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if &self.peek().kind == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        if is_ident(self.peek(), keyword) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn eat_op(&mut self, table: &[(TokenKind, BinaryOp)]) -> Option<BinaryOp> {
        let next = &self.peek().kind;
        let op = table
            .iter()
            .find_map(|(kind, op)| (kind == next).then_some(*op))?;
        self.advance();
        Some(op)
    }

    fn expect(&mut self, kind: &TokenKind, what: &str) -> Result<(), ExprError> {
        if self.eat(kind) {
            Ok(())
        } else {
            let token = self.peek();
            Err(ExprError::Syntax {
                position: token.position,
                message: format!("expected {what}, found {}", describe(&token.kind)),
            })
        }
    }

    fn unexpected(&self, token: &Token) -> ExprError {
        let position = if token.kind == TokenKind::Eof {
            self.tokens.last().map_or(0, |last| last.position)
        } else {
            token.position
        };
        ExprError::Syntax {
            position,
            message: format!("unexpected {}", describe(&token.kind)),
        }
    }

    fn conditional(&mut self) -> Result<Expr, ExprError> {
        let condition = self.or()?;
        if !self.eat(&TokenKind::Question) {
            return Ok(condition);
        }
        let then = self.conditional()?;
        self.expect(&TokenKind::Colon, "':'")?;
        let otherwise = self.conditional()?;
        Ok(Expr::Conditional {
            condition: Box::new(condition),
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        })
    }

    fn or(&mut self) -> Result<Expr, ExprError> {
        let mut left = self.and()?;
        while self.eat(&TokenKind::OrOr) || self.eat_keyword("or") {
            let right = self.and()?;
            left = binary(BinaryOp::Or, left, right);
        }
        Ok(left)
    }

    fn and(&mut self) -> Result<Expr, ExprError> {
        let mut left = self.equality()?;
        while self.eat(&TokenKind::AndAnd) || self.eat_keyword("and") {
            let right = self.equality()?;
            left = binary(BinaryOp::And, left, right);
        }
        Ok(left)
    }

    fn equality(&mut self) -> Result<Expr, ExprError> {
        let mut left = self.relational()?;
        while let Some(op) = self.eat_op(&EQUALITY_OPS) {
            let right = self.relational()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn relational(&mut self) -> Result<Expr, ExprError> {
        let mut left = self.additive()?;
        while let Some(op) = self.eat_relational_op() {
            let right = self.additive()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn eat_relational_op(&mut self) -> Option<BinaryOp> {
        if let Some(op) = self.eat_op(&COMPARISON_OPS) {
            return Some(op);
        }
        let TokenKind::Ident(word) = &self.peek().kind else {
            return None;
        };
        let op = match word.as_str() {
            "in" => BinaryOp::In,
            "contains" => BinaryOp::Contains,
            "startsWith" => BinaryOp::StartsWith,
            "endsWith" => BinaryOp::EndsWith,
            "not" if is_ident(self.peek_second(), "in") => BinaryOp::NotIn,
            _ => return None,
        };
        if op == BinaryOp::NotIn {
            self.advance();
        }
        self.advance();
        Some(op)
    }

    fn additive(&mut self) -> Result<Expr, ExprError> {
        let mut left = self.multiplicative()?;
        while let Some(op) = self.eat_op(&ADDITIVE_OPS) {
            let right = self.multiplicative()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn multiplicative(&mut self) -> Result<Expr, ExprError> {
        let mut left = self.unary()?;
        while let Some(op) = self.eat_op(&MULTIPLICATIVE_OPS) {
            let right = self.unary()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn unary(&mut self) -> Result<Expr, ExprError> {
        let op = if self.eat(&TokenKind::Bang) || self.eat_keyword("not") {
            UnaryOp::Not
        } else if self.eat(&TokenKind::Minus) {
            UnaryOp::Neg
        } else {
            return self.postfix();
        };
        let operand = self.unary()?;
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    fn postfix(&mut self) -> Result<Expr, ExprError> {
        let mut expr = self.primary()?;
        loop {
            if self.eat(&TokenKind::Dot) {
                let token = self.advance();
                let TokenKind::Ident(field) = token.kind else {
                    return Err(self.unexpected(&token));
                };
                expr = Expr::Member {
                    target: Box::new(expr),
                    field,
                };
            } else if self.eat(&TokenKind::LBracket) {
                let index = self.conditional()?;
                self.expect(&TokenKind::RBracket, "']'")?;
                expr = Expr::Index {
                    target: Box::new(expr),
                    index: Box::new(index),
                };
            } else if self.peek().kind == TokenKind::LParen {
                return Err(ExprError::Syntax {
                    position: self.peek().position,
                    message: "only built-in functions can be called".to_owned(),
                });
            } else {
                return Ok(expr);
            }
        }
    }

    fn primary(&mut self) -> Result<Expr, ExprError> {
        let token = self.advance();
        match token.kind {
            TokenKind::Int(value) => Ok(Expr::Literal(Value::from(value))),
            TokenKind::Float(value) => Number::from_f64(value)
                .map(|number| Expr::Literal(Value::Number(number)))
                .ok_or_else(|| ExprError::Syntax {
                    position: token.position,
                    message: format!("invalid number {value}"),
                }),
            TokenKind::Str(value) => Ok(Expr::Literal(Value::String(value))),
            TokenKind::LParen => {
                let inner = self.conditional()?;
                self.expect(&TokenKind::RParen, "')'")?;
                Ok(inner)
            }
            TokenKind::LBracket => {
                let items = self.list(&TokenKind::RBracket, "']'")?;
                Ok(Expr::Array(items))
            }
            TokenKind::Ident(name) => match name.as_str() {
                "true" => Ok(Expr::Literal(Value::Bool(true))),
                "false" => Ok(Expr::Literal(Value::Bool(false))),
                "nil" | "null" => Ok(Expr::Literal(Value::Null)),
                keyword if KEYWORDS.contains(&keyword) => Err(ExprError::Syntax {
                    position: token.position,
                    message: format!("unexpected keyword '{keyword}'"),
                }),
                _ if self.peek().kind == TokenKind::LParen => {
                    self.advance();
                    self.call(name)
                }
                _ => Ok(Expr::Name(name)),
            },
            TokenKind::RParen
            | TokenKind::RBracket
            | TokenKind::Comma
            | TokenKind::Dot
            | TokenKind::Question
            | TokenKind::Colon
            | TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Star
            | TokenKind::Slash
            | TokenKind::Percent
            | TokenKind::Bang
            | TokenKind::EqEq
            | TokenKind::NotEq
            | TokenKind::Lt
            | TokenKind::Le
            | TokenKind::Gt
            | TokenKind::Ge
            | TokenKind::AndAnd
            | TokenKind::OrOr
            | TokenKind::Eof => Err(self.unexpected(&token)),
        }
    }

    fn call(&mut self, name: String) -> Result<Expr, ExprError> {
        let function =
            Function::lookup(&name).ok_or(ExprError::UnknownFunction { name: name.clone() })?;
        let args = self.list(&TokenKind::RParen, "')'")?;
        if args.len() != function.arity() {
            return Err(ExprError::Arity {
                function: name,
                expected: function.arity(),
                actual: args.len(),
            });
        }
        Ok(Expr::Call { function, args })
    }

    fn list(&mut self, close: &TokenKind, what: &str) -> Result<Vec<Expr>, ExprError> {
        let mut items = Vec::new();
        if self.eat(close) {
            return Ok(items);
        }
        loop {
            items.push(self.conditional()?);
            if self.eat(close) {
                return Ok(items);
            }
            self.expect(&TokenKind::Comma, &format!("',' or {what}"))?;
            if self.eat(close) {
                return Ok(items);
            }
        }
    }
}

fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    Expr::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}

fn is_ident(token: &Token, word: &str) -> bool {
    matches!(&token.kind, TokenKind::Ident(name) if name == word)
}

fn describe(kind: &TokenKind) -> String {
    match kind {
        TokenKind::Int(value) => format!("number {value}"),
        TokenKind::Float(value) => format!("number {value}"),
        TokenKind::Str(value) => format!("string {value:?}"),
        TokenKind::Ident(name) => format!("'{name}'"),
        TokenKind::Eof => "end of expression".to_owned(),
        TokenKind::LParen
        | TokenKind::RParen
        | TokenKind::LBracket
        | TokenKind::RBracket
        | TokenKind::Comma
        | TokenKind::Dot
        | TokenKind::Question
        | TokenKind::Colon
        | TokenKind::Plus
        | TokenKind::Minus
        | TokenKind::Star
        | TokenKind::Slash
        | TokenKind::Percent
        | TokenKind::Bang
        | TokenKind::EqEq
        | TokenKind::NotEq
        | TokenKind::Lt
        | TokenKind::Le
        | TokenKind::Gt
        | TokenKind::Ge
        | TokenKind::AndAnd
        | TokenKind::OrOr => format!("'{}'", symbol(kind)),
    }
}

const fn symbol(kind: &TokenKind) -> &'static str {
    match kind {
        TokenKind::LParen => "(",
        TokenKind::RParen => ")",
        TokenKind::LBracket => "[",
        TokenKind::RBracket => "]",
        TokenKind::Comma => ",",
        TokenKind::Dot => ".",
        TokenKind::Question => "?",
        TokenKind::Colon => ":",
        TokenKind::Plus => "+",
        TokenKind::Minus => "-",
        TokenKind::Star => "*",
        TokenKind::Slash => "/",
        TokenKind::Percent => "%",
        TokenKind::Bang => "!",
        TokenKind::EqEq => "==",
        TokenKind::NotEq => "!=",
        TokenKind::Lt => "<",
        TokenKind::Le => "<=",
        TokenKind::Gt => ">",
        TokenKind::Ge => ">=",
        TokenKind::AndAnd => "&&",
        TokenKind::OrOr => "||",
        TokenKind::Int(_)
        | TokenKind::Float(_)
        | TokenKind::Str(_)
        | TokenKind::Ident(_)
        | TokenKind::Eof => "",
    }
}
