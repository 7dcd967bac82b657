use std::collections::BTreeSet;

use serde_json::Value;

use crate::error::ExprError;

use super::functions::Function;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum UnaryOp {
    Not,
    Neg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum BinaryOp {
    Or,
    And,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    In,
    NotIn,
    Contains,
    StartsWith,
    EndsWith,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl BinaryOp {
    pub(super) const fn symbol(self) -> &'static str {
        match self {
            Self::Or => "||",
            Self::And => "&&",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::In => "in",
            Self::NotIn => "not in",
            Self::Contains => "contains",
            Self::StartsWith => "startsWith",
            Self::EndsWith => "endsWith",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Rem => "%",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(super) enum Expr {
    Literal(Value),
    Array(Vec<Expr>),
    Name(String),
    Member {
        target: Box<Expr>,
        field: String,
    },
    Index {
        target: Box<Expr>,
        index: Box<Expr>,
    },
    Call {
        function: Function,
        args: Vec<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Conditional {
        condition: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
}

impl Expr {
    pub(super) fn check_names(&self, known: &BTreeSet<&str>) -> Result<(), ExprError> {
        match self {
            Self::Literal(_) => Ok(()),
            Self::Name(name) => {
                if known.contains(name.as_str()) {
                    Ok(())
                } else {
                    Err(ExprError::UnknownName { name: name.clone() })
                }
            }
            Self::Array(items) | Self::Call { args: items, .. } => items
                .iter()
                .try_for_each(|item| item.check_names(known)),
            Self::Member { target, .. } => target.check_names(known),
            Self::Index { target, index } => {
                target.check_names(known)?;
                index.check_names(known)
            }
            Self::Unary { operand, .. } => operand.check_names(known),
            Self::Binary { left, right, .. } => {
                left.check_names(known)?;
                right.check_names(known)
            }
            Self::Conditional {
                condition,
                then,
                otherwise,
            } => {
                condition.check_names(known)?;
                then.check_names(known)?;
                otherwise.check_names(known)
            }
        }
    }
}
