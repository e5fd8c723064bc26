//! Output-column expression engine for csvjoin
//!
//! An output-column spec is either a bare column reference ("pass-through",
//! emitting the raw cell text unmodified) or an arithmetic formula embedding
//! zero or more references in operator/literal text. Formulas are compiled
//! once, at setup time, into a small expression tree holding a typed slot for
//! each embedded reference; evaluation fills the slots from the matched rows
//! without re-parsing anything.
//!
//! The grammar is deliberately restricted: integer and float literals,
//! addition, subtraction, multiplication, true (non-truncating) division,
//! exponentiation (`**`), bitwise-xor (`^`, integers only, binding looser
//! than addition), unary minus, and parentheses. Nothing else evaluates.
//!
//! Two reference syntaxes feed the same grammar: `<i>:<name>` tokens for
//! joined output columns, and `$n` (1-based) tokens for the single-file
//! column-append tool.

use std::fmt;

use regex::Regex;

use crate::error::{CsvJoinError, CsvJoinResult};
use crate::resolver::{self, ColumnRef};
use crate::table::Table;

/// A numeric value produced by formula evaluation
///
/// Integer arithmetic stays integral where the operation allows it and
/// promotes to float on overflow or mixed operands. Division always yields
/// a float.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// 64-bit signed integer
    Integer(i64),
    /// 64-bit floating point number
    Float(f64),
}

impl Number {
    fn as_f64(self) -> f64 {
        match self {
            Number::Integer(i) => i as f64,
            Number::Float(f) => f,
        }
    }

    fn is_zero(self) -> bool {
        match self {
            Number::Integer(i) => i == 0,
            Number::Float(f) => f == 0.0,
        }
    }

    fn add(self, other: Number) -> Number {
        match (self, other) {
            (Number::Integer(a), Number::Integer(b)) => match a.checked_add(b) {
                Some(v) => Number::Integer(v),
                None => Number::Float(a as f64 + b as f64),
            },
            _ => Number::Float(self.as_f64() + other.as_f64()),
        }
    }

    fn subtract(self, other: Number) -> Number {
        match (self, other) {
            (Number::Integer(a), Number::Integer(b)) => match a.checked_sub(b) {
                Some(v) => Number::Integer(v),
                None => Number::Float(a as f64 - b as f64),
            },
            _ => Number::Float(self.as_f64() - other.as_f64()),
        }
    }

    fn multiply(self, other: Number) -> Number {
        match (self, other) {
            (Number::Integer(a), Number::Integer(b)) => match a.checked_mul(b) {
                Some(v) => Number::Integer(v),
                None => Number::Float(a as f64 * b as f64),
            },
            _ => Number::Float(self.as_f64() * other.as_f64()),
        }
    }

    /// True division: always a float, never truncating
    fn divide(self, other: Number) -> CsvJoinResult<Number> {
        if other.is_zero() {
            return Err(CsvJoinError::DivideByZero);
        }
        Ok(Number::Float(self.as_f64() / other.as_f64()))
    }

    fn power(self, other: Number) -> Number {
        match (self, other) {
            (Number::Integer(base), Number::Integer(exp)) if exp >= 0 => u32::try_from(exp)
                .ok()
                .and_then(|e| base.checked_pow(e))
                .map(Number::Integer)
                .unwrap_or_else(|| Number::Float((base as f64).powf(exp as f64))),
            _ => Number::Float(self.as_f64().powf(other.as_f64())),
        }
    }

    fn xor(self, other: Number) -> CsvJoinResult<Number> {
        match (self, other) {
            (Number::Integer(a), Number::Integer(b)) => Ok(Number::Integer(a ^ b)),
            _ => Err(CsvJoinError::EvaluationError(
                "bitwise xor requires integer operands".to_string(),
            )),
        }
    }

    fn negate(self) -> Number {
        match self {
            Number::Integer(i) => match i.checked_neg() {
                Some(v) => Number::Integer(v),
                None => Number::Float(-(i as f64)),
            },
            Number::Float(f) => Number::Float(-f),
        }
    }
}

/// Canonical text form: integers carry no decimal point, floats always do
impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(i) => write!(f, "{i}"),
            Number::Float(x) if x.is_finite() && x.fract() == 0.0 => write!(f, "{x:.1}"),
            Number::Float(x) => write!(f, "{x}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Number(Number),
    Slot(usize),
    Plus,
    Minus,
    Star,
    DoubleStar,
    Slash,
    Caret,
    LeftParen,
    RightParen,
}

#[derive(Debug, Clone, Copy)]
enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
    Xor,
}

/// Compiled formula tree; slots index into the expression's reference list
#[derive(Debug, Clone)]
enum Ast {
    Literal(Number),
    Slot(usize),
    Negate(Box<Ast>),
    Binary {
        op: BinaryOp,
        left: Box<Ast>,
        right: Box<Ast>,
    },
}

fn invalid(spec: &str, reason: String) -> CsvJoinError {
    CsvJoinError::InvalidExpression {
        spec: spec.to_string(),
        reason,
    }
}

/// Tokenize a spec string, mapping embedded reference tokens to slots
///
/// `reference` matches the reference syntax; everything between matches is
/// lexed as arithmetic. `resolve` turns one reference's text into a slot
/// index, failing compilation if the reference does not resolve.
fn lex(
    spec: &str,
    reference: &Regex,
    mut resolve: impl FnMut(&str) -> CsvJoinResult<usize>,
) -> CsvJoinResult<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut last = 0;

    for found in reference.find_iter(spec) {
        lex_fragment(&spec[last..found.start()], spec, &mut tokens)?;
        tokens.push(Token::Slot(resolve(found.as_str())?));
        last = found.end();
    }
    lex_fragment(&spec[last..], spec, &mut tokens)?;

    Ok(tokens)
}

fn lex_fragment(fragment: &str, spec: &str, tokens: &mut Vec<Token>) -> CsvJoinResult<()> {
    let bytes = fragment.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b' ' | b'\t' => i += 1,
            b'+' => {
                tokens.push(Token::Plus);
                i += 1;
            }
            b'-' => {
                tokens.push(Token::Minus);
                i += 1;
            }
            b'*' => {
                if bytes.get(i + 1) == Some(&b'*') {
                    tokens.push(Token::DoubleStar);
                    i += 2;
                } else {
                    tokens.push(Token::Star);
                    i += 1;
                }
            }
            b'/' => {
                tokens.push(Token::Slash);
                i += 1;
            }
            b'^' => {
                tokens.push(Token::Caret);
                i += 1;
            }
            b'(' => {
                tokens.push(Token::LeftParen);
                i += 1;
            }
            b')' => {
                tokens.push(Token::RightParen);
                i += 1;
            }
            b'0'..=b'9' | b'.' => {
                let start = i;
                while i < bytes.len() && matches!(bytes[i], b'0'..=b'9' | b'.') {
                    i += 1;
                }
                // optional exponent part
                if i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
                    let mut j = i + 1;
                    if j < bytes.len() && matches!(bytes[j], b'+' | b'-') {
                        j += 1;
                    }
                    if j < bytes.len() && bytes[j].is_ascii_digit() {
                        i = j;
                        while i < bytes.len() && bytes[i].is_ascii_digit() {
                            i += 1;
                        }
                    }
                }
                tokens.push(Token::Number(parse_literal(&fragment[start..i], spec)?));
            }
            _ => {
                let unexpected = fragment[i..].chars().next().unwrap_or('?');
                return Err(invalid(
                    spec,
                    format!("unexpected character '{unexpected}'"),
                ));
            }
        }
    }

    Ok(())
}

fn parse_literal(text: &str, spec: &str) -> CsvJoinResult<Number> {
    if !text.contains(|c| matches!(c, '.' | 'e' | 'E')) {
        if let Ok(i) = text.parse::<i64>() {
            return Ok(Number::Integer(i));
        }
    }
    text.parse::<f64>()
        .map(Number::Float)
        .map_err(|_| invalid(spec, format!("bad numeric literal '{text}'")))
}

/// Recursive-descent parser over the token stream
///
/// Precedence, loosest first: `^`, then `+ -`, then `* /`, then unary
/// minus, then `**`. Exponentiation binds tighter than unary minus on its
/// left and allows a signed exponent on its right, so `-2**2` is `-4` and
/// `2**-1` is `0.5`.
struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    spec: &'a str,
}

impl<'a> Parser<'a> {
    fn parse(tokens: &'a [Token], spec: &'a str) -> CsvJoinResult<Ast> {
        if tokens.is_empty() {
            return Err(invalid(spec, "empty expression".to_string()));
        }
        let mut parser = Parser {
            tokens,
            pos: 0,
            spec,
        };
        let ast = parser.expression()?;
        if parser.pos != parser.tokens.len() {
            return Err(invalid(spec, "trailing input after expression".to_string()));
        }
        Ok(ast)
    }

    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn expression(&mut self) -> CsvJoinResult<Ast> {
        let mut left = self.additive()?;
        while self.peek() == Some(Token::Caret) {
            self.advance();
            let right = self.additive()?;
            left = Ast::Binary {
                op: BinaryOp::Xor,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn additive(&mut self) -> CsvJoinResult<Ast> {
        let mut left = self.multiplicative()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Subtract,
                _ => break,
            };
            self.advance();
            let right = self.multiplicative()?;
            left = Ast::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn multiplicative(&mut self) -> CsvJoinResult<Ast> {
        let mut left = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Multiply,
                Some(Token::Slash) => BinaryOp::Divide,
                _ => break,
            };
            self.advance();
            let right = self.unary()?;
            left = Ast::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn unary(&mut self) -> CsvJoinResult<Ast> {
        if self.peek() == Some(Token::Minus) {
            self.advance();
            return Ok(Ast::Negate(Box::new(self.unary()?)));
        }
        self.power()
    }

    fn power(&mut self) -> CsvJoinResult<Ast> {
        let base = self.atom()?;
        if self.peek() == Some(Token::DoubleStar) {
            self.advance();
            let exponent = self.unary()?;
            return Ok(Ast::Binary {
                op: BinaryOp::Power,
                left: Box::new(base),
                right: Box::new(exponent),
            });
        }
        Ok(base)
    }

    fn atom(&mut self) -> CsvJoinResult<Ast> {
        match self.peek() {
            Some(Token::Number(n)) => {
                self.advance();
                Ok(Ast::Literal(n))
            }
            Some(Token::Slot(slot)) => {
                self.advance();
                Ok(Ast::Slot(slot))
            }
            Some(Token::LeftParen) => {
                self.advance();
                let inner = self.expression()?;
                if self.peek() != Some(Token::RightParen) {
                    return Err(invalid(self.spec, "missing closing parenthesis".to_string()));
                }
                self.advance();
                Ok(inner)
            }
            _ => Err(invalid(
                self.spec,
                "expected a number, column reference, or parenthesized expression".to_string(),
            )),
        }
    }
}

fn eval(ast: &Ast, slots: &[Number]) -> CsvJoinResult<Number> {
    match ast {
        Ast::Literal(n) => Ok(*n),
        Ast::Slot(slot) => Ok(slots[*slot]),
        Ast::Negate(inner) => Ok(eval(inner, slots)?.negate()),
        Ast::Binary { op, left, right } => {
            let l = eval(left, slots)?;
            let r = eval(right, slots)?;
            match op {
                BinaryOp::Add => Ok(l.add(r)),
                BinaryOp::Subtract => Ok(l.subtract(r)),
                BinaryOp::Multiply => Ok(l.multiply(r)),
                BinaryOp::Divide => l.divide(r),
                BinaryOp::Power => Ok(l.power(r)),
                BinaryOp::Xor => l.xor(r),
            }
        }
    }
}

fn parse_operand(cell: &str, spec: &str) -> CsvJoinResult<Number> {
    if let Ok(i) = cell.parse::<i64>() {
        return Ok(Number::Integer(i));
    }
    if let Ok(f) = cell.parse::<f64>() {
        return Ok(Number::Float(f));
    }
    Err(CsvJoinError::EvaluationError(format!(
        "non-numeric value '{cell}' in expression '{spec}'"
    )))
}

fn missing_cell(column_ref: &ColumnRef) -> CsvJoinError {
    CsvJoinError::EvaluationError(format!(
        "row of file {} has no column {}",
        column_ref.file, column_ref.column
    ))
}

#[derive(Debug)]
enum ExpressionKind {
    PassThrough(ColumnRef),
    Formula {
        spec: String,
        slots: Vec<ColumnRef>,
        ast: Ast,
    },
}

/// A compiled output-column expression
///
/// Compilation resolves every embedded column reference and parses the
/// arithmetic grammar, so a dangling or malformed reference fails before any
/// row is processed; formulas are never partially valid.
#[derive(Debug)]
pub struct Expression {
    kind: ExpressionKind,
}

impl Expression {
    /// Compile a joined-output column spec
    ///
    /// A spec that is exactly one `<i>:<name>` token becomes a pass-through;
    /// anything else is parsed as a formula with its embedded references
    /// resolved against the loaded tables.
    ///
    /// # Arguments
    /// * `spec` - The output-column spec string
    /// * `tables` - All loaded input tables, in file order
    ///
    /// # Returns
    /// * `Ok(Expression)` - The compiled expression
    /// * `Err` - `UnknownColumn` for an unresolvable reference,
    ///   `InvalidExpression` for text outside the grammar
    pub fn compile(spec: &str, tables: &[Table]) -> CsvJoinResult<Expression> {
        if resolver::is_column_ref(spec) {
            let column_ref = resolver::resolve_column_ref(spec, tables)?;
            return Ok(Expression {
                kind: ExpressionKind::PassThrough(column_ref),
            });
        }

        let mut slots = Vec::new();
        let tokens = lex(spec, &resolver::column_ref_regex(), |token| {
            let column_ref = resolver::resolve_column_ref(token, tables)?;
            slots.push(column_ref);
            Ok(slots.len() - 1)
        })?;
        let ast = Parser::parse(&tokens, spec)?;

        Ok(Expression {
            kind: ExpressionKind::Formula {
                spec: spec.to_string(),
                slots,
                ast,
            },
        })
    }

    /// Compile a single-file equation with `$n` column references
    ///
    /// `$n` names the n-th data column, counting from 1; `$0` or a reference
    /// past `column_count` fails with `UnknownColumn`. The equation is always
    /// a formula, never a pass-through.
    pub fn compile_equation(equation: &str, column_count: usize) -> CsvJoinResult<Expression> {
        let reference = Regex::new(r"\$[0-9]+").expect("column reference pattern is valid");

        let mut slots = Vec::new();
        let tokens = lex(equation, &reference, |token| {
            let n: usize = token[1..]
                .parse()
                .map_err(|_| CsvJoinError::UnknownColumn(token.to_string()))?;
            if n == 0 || n > column_count {
                return Err(CsvJoinError::UnknownColumn(token.to_string()));
            }
            slots.push(ColumnRef {
                file: 0,
                column: n - 1,
            });
            Ok(slots.len() - 1)
        })?;
        let ast = Parser::parse(&tokens, equation)?;

        Ok(Expression {
            kind: ExpressionKind::Formula {
                spec: equation.to_string(),
                slots,
                ast,
            },
        })
    }

    /// Evaluate against one matched row per input file
    ///
    /// Pass-through returns the exact cell string, unmodified. Formulas
    /// parse each referenced cell as a number, fill the slots, walk the
    /// tree, and render the result in canonical form. Any failure aborts
    /// the run; rows are never skipped.
    pub fn evaluate(&self, rows: &[&[String]]) -> CsvJoinResult<String> {
        match &self.kind {
            ExpressionKind::PassThrough(column_ref) => rows[column_ref.file]
                .get(column_ref.column)
                .cloned()
                .ok_or_else(|| missing_cell(column_ref)),
            ExpressionKind::Formula { spec, slots, ast } => {
                let mut values = Vec::with_capacity(slots.len());
                for column_ref in slots {
                    let cell = rows[column_ref.file]
                        .get(column_ref.column)
                        .ok_or_else(|| missing_cell(column_ref))?;
                    values.push(parse_operand(cell, spec)?);
                }
                Ok(eval(ast, &values)?.to_string())
            }
        }
    }
}
