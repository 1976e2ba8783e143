//! Restricted arithmetic expression evaluator for calculated fields.
//!
//! Calculated-field expressions are never executed as code. They are lexed
//! and parsed with a recursive-descent parser over a deliberately small
//! grammar — `+ - * / ( )`, numeric literals, and column-name identifiers —
//! then evaluated against a row's numeric bindings:
//!
//! ```text
//! expr   := term (("+" | "-") term)*
//! term   := factor (("*" | "/") factor)*
//! factor := ("+" | "-") factor | NUMBER | IDENT | "(" expr ")"
//! ```
//!
//! Failures are explicit and classifiable ([`ExprError`]): a parse error is
//! a configuration mistake; unknown identifiers, non-numeric operands and
//! division by zero are per-row evaluation failures the calculate operator
//! turns into a null derived value.

use std::collections::HashMap;

use thiserror::Error;

/// Errors from parsing or evaluating a calculated-field expression.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExprError {
    /// A character outside the grammar was encountered.
    #[error("Unexpected character {found:?} at position {position}")]
    UnexpectedChar {
        /// Byte offset of the character.
        position: usize,
        /// The offending character.
        found: char,
    },

    /// A token appeared where the grammar does not allow it.
    #[error("Unexpected token {found:?} at position {position}")]
    UnexpectedToken {
        /// Byte offset of the token.
        position: usize,
        /// The offending token text.
        found: String,
    },

    /// The expression ended mid-production.
    #[error("Unexpected end of expression")]
    UnexpectedEnd,

    /// An identifier had no binding at evaluation time.
    #[error("Unknown identifier {name:?}")]
    UnknownIdentifier {
        /// The unbound identifier.
        name: String,
    },

    /// A referenced column held a value that does not coerce to a number.
    #[error("Non-numeric operand in column {column:?}")]
    NonNumericOperand {
        /// The offending column.
        column: String,
    },

    /// Division by zero.
    #[error("Division by zero")]
    DivisionByZero,
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Number(f64),
    Ident(String),
    Neg(Box<Node>),
    Binary {
        op: BinOp,
        lhs: Box<Node>,
        rhs: Box<Node>,
    },
}

/// A parsed, reusable arithmetic expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    root: Node,
    identifiers: Vec<String>,
}

impl Expr {
    /// Parse an expression.
    ///
    /// # Errors
    ///
    /// Returns an error if the text does not match the grammar.
    pub fn parse(text: &str) -> Result<Self, ExprError> {
        let tokens = lex(text)?;
        let mut parser = Parser { tokens, pos: 0 };
        let root = parser.expr()?;
        if let Some((position, token)) = parser.peek_with_pos() {
            return Err(ExprError::UnexpectedToken {
                position,
                found: token_text(token),
            });
        }
        let mut identifiers = Vec::new();
        collect_identifiers(&root, &mut identifiers);
        Ok(Self { root, identifiers })
    }

    /// The distinct identifiers referenced, in first-appearance order.
    #[must_use]
    pub fn identifiers(&self) -> &[String] {
        &self.identifiers
    }

    /// Evaluate against numeric bindings.
    ///
    /// # Errors
    ///
    /// Returns an error for unbound identifiers or division by zero.
    pub fn eval(&self, bindings: &HashMap<String, f64>) -> Result<f64, ExprError> {
        eval_node(&self.root, bindings)
    }
}

fn collect_identifiers(node: &Node, out: &mut Vec<String>) {
    match node {
        Node::Number(_) => {}
        Node::Ident(name) => {
            if !out.iter().any(|n| n == name) {
                out.push(name.clone());
            }
        }
        Node::Neg(inner) => collect_identifiers(inner, out),
        Node::Binary { lhs, rhs, .. } => {
            collect_identifiers(lhs, out);
            collect_identifiers(rhs, out);
        }
    }
}

fn eval_node(node: &Node, bindings: &HashMap<String, f64>) -> Result<f64, ExprError> {
    match node {
        Node::Number(n) => Ok(*n),
        Node::Ident(name) => bindings
            .get(name)
            .copied()
            .ok_or_else(|| ExprError::UnknownIdentifier { name: name.clone() }),
        Node::Neg(inner) => Ok(-eval_node(inner, bindings)?),
        Node::Binary { op, lhs, rhs } => {
            let a = eval_node(lhs, bindings)?;
            let b = eval_node(rhs, bindings)?;
            match op {
                BinOp::Add => Ok(a + b),
                BinOp::Sub => Ok(a - b),
                BinOp::Mul => Ok(a * b),
                BinOp::Div => {
                    if b == 0.0 {
                        Err(ExprError::DivisionByZero)
                    } else {
                        Ok(a / b)
                    }
                }
            }
        }
    }
}

fn token_text(token: &Token) -> String {
    match token {
        Token::Number(n) => format!("{n}"),
        Token::Ident(name) => name.clone(),
        Token::Plus => "+".into(),
        Token::Minus => "-".into(),
        Token::Star => "*".into(),
        Token::Slash => "/".into(),
        Token::LParen => "(".into(),
        Token::RParen => ")".into(),
    }
}

fn lex(text: &str) -> Result<Vec<(usize, Token)>, ExprError> {
    let mut tokens = Vec::new();
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut i = 0;
    while i < chars.len() {
        let (position, c) = chars[i];
        match c {
            c if c.is_whitespace() => i += 1,
            '+' => {
                tokens.push((position, Token::Plus));
                i += 1;
            }
            '-' => {
                tokens.push((position, Token::Minus));
                i += 1;
            }
            '*' => {
                tokens.push((position, Token::Star));
                i += 1;
            }
            '/' => {
                tokens.push((position, Token::Slash));
                i += 1;
            }
            '(' => {
                tokens.push((position, Token::LParen));
                i += 1;
            }
            ')' => {
                tokens.push((position, Token::RParen));
                i += 1;
            }
            c if c.is_ascii_digit() || c == '.' => {
                let start = i;
                while i < chars.len() && (chars[i].1.is_ascii_digit() || chars[i].1 == '.') {
                    i += 1;
                }
                let literal: String = chars[start..i].iter().map(|(_, c)| *c).collect();
                let value = literal
                    .parse::<f64>()
                    .map_err(|_| ExprError::UnexpectedToken {
                        position,
                        found: literal.clone(),
                    })?;
                tokens.push((position, Token::Number(value)));
            }
            c if c.is_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].1.is_alphanumeric() || chars[i].1 == '_') {
                    i += 1;
                }
                let name: String = chars[start..i].iter().map(|(_, c)| *c).collect();
                tokens.push((position, Token::Ident(name)));
            }
            _ => return Err(ExprError::UnexpectedChar { position, found: c }),
        }
    }
    Ok(tokens)
}

struct Parser {
    tokens: Vec<(usize, Token)>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(_, t)| t)
    }

    fn peek_with_pos(&self) -> Option<(usize, &Token)> {
        self.tokens.get(self.pos).map(|(p, t)| (*p, t))
    }

    fn advance(&mut self) -> Option<(usize, Token)> {
        let item = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        item
    }

    fn expr(&mut self) -> Result<Node, ExprError> {
        let mut node = self.term()?;
        while let Some(op) = match self.peek() {
            Some(Token::Plus) => Some(BinOp::Add),
            Some(Token::Minus) => Some(BinOp::Sub),
            _ => None,
        } {
            self.pos += 1;
            let rhs = self.term()?;
            node = Node::Binary {
                op,
                lhs: Box::new(node),
                rhs: Box::new(rhs),
            };
        }
        Ok(node)
    }

    fn term(&mut self) -> Result<Node, ExprError> {
        let mut node = self.factor()?;
        while let Some(op) = match self.peek() {
            Some(Token::Star) => Some(BinOp::Mul),
            Some(Token::Slash) => Some(BinOp::Div),
            _ => None,
        } {
            self.pos += 1;
            let rhs = self.factor()?;
            node = Node::Binary {
                op,
                lhs: Box::new(node),
                rhs: Box::new(rhs),
            };
        }
        Ok(node)
    }

    fn factor(&mut self) -> Result<Node, ExprError> {
        match self.advance() {
            Some((_, Token::Plus)) => self.factor(),
            Some((_, Token::Minus)) => Ok(Node::Neg(Box::new(self.factor()?))),
            Some((_, Token::Number(n))) => Ok(Node::Number(n)),
            Some((_, Token::Ident(name))) => Ok(Node::Ident(name)),
            Some((_, Token::LParen)) => {
                let inner = self.expr()?;
                match self.advance() {
                    Some((_, Token::RParen)) => Ok(inner),
                    Some((position, token)) => Err(ExprError::UnexpectedToken {
                        position,
                        found: token_text(&token),
                    }),
                    None => Err(ExprError::UnexpectedEnd),
                }
            }
            Some((position, token)) => Err(ExprError::UnexpectedToken {
                position,
                found: token_text(&token),
            }),
            None => Err(ExprError::UnexpectedEnd),
        }
    }
}
