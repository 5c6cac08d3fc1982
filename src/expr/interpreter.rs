//! One-pass precedence-climbing interpreter.
//!
//! Parsing and evaluation happen together: each sub-expression is evaluated
//! as soon as it is recognized, so no tree is built. Both operands of every
//! binary operator are always evaluated, including `&&` and `||`.

use smallvec::SmallVec;

use crate::core::RandomSource;

use super::builtins;
use super::error::ExprError;
use super::token::{tokenize, Operator, Token, TokenKind};
use super::value::Value;
use super::QueryContext;

/// Nesting limit for parentheses, unary chains and call arguments.
const MAX_DEPTH: usize = 64;

/// Evaluate an expression against a query context and random source.
///
/// An empty (or all-whitespace) expression evaluates to `0`.
///
/// ```
/// use quest_rules::core::FixedRandom;
/// use quest_rules::expr::{evaluate, EmptyContext, Value};
///
/// let mut rng = FixedRandom(0.0);
/// assert_eq!(evaluate("2 + 3 * 4", &EmptyContext, &mut rng), Ok(Value::Number(14.0)));
/// assert_eq!(evaluate("1 === '1'", &EmptyContext, &mut rng), Ok(Value::Bool(false)));
/// ```
pub fn evaluate(
    expression: &str,
    ctx: &dyn QueryContext,
    rng: &mut dyn RandomSource,
) -> Result<Value, ExprError> {
    let tokens = tokenize(expression)?;
    let mut interpreter = Interpreter {
        tokens,
        pos: 0,
        depth: 0,
        ctx,
        rng,
    };

    if interpreter.peek().kind == TokenKind::End {
        return Ok(Value::Number(0.0));
    }

    let value = interpreter.expression(0)?;

    let trailing = interpreter.peek();
    if trailing.kind != TokenKind::End {
        return Err(ExprError::syntax(
            format!("unexpected {}", trailing.kind),
            trailing.position,
        ));
    }
    Ok(value)
}

struct Interpreter<'a> {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
    ctx: &'a dyn QueryContext,
    rng: &'a mut dyn RandomSource,
}

impl Interpreter<'_> {
    fn peek(&self) -> &Token {
        // `tokenize` always terminates the stream with `End`.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn enter(&mut self) -> Result<(), ExprError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(ExprError::syntax("expression nested too deeply", self.peek().position));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    /// `unary (binop unary)*`, folding operators that bind at least `min_precedence`.
    fn expression(&mut self, min_precedence: u8) -> Result<Value, ExprError> {
        self.enter()?;
        let mut left = self.unary()?;

        loop {
            let token = self.peek();
            let TokenKind::Op(op) = token.kind else {
                break;
            };
            let position = token.position;

            let precedence = op.precedence();
            if precedence < min_precedence {
                break;
            }

            self.advance();
            let right = self.expression(precedence + 1)?;
            left = apply_binary(op, left, right, position)?;
        }

        self.leave();
        Ok(left)
    }

    fn unary(&mut self) -> Result<Value, ExprError> {
        let op = match self.peek().kind {
            TokenKind::Op(op) => Some(op),
            _ => None,
        };
        let value = match op {
            Some(Operator::Not) => {
                self.advance();
                self.enter()?;
                let operand = self.unary()?;
                self.leave();
                Value::Bool(!operand.truthy())
            }
            Some(Operator::Sub) => {
                self.advance();
                self.enter()?;
                let operand = self.unary()?;
                self.leave();
                Value::Number(-operand.to_number()?)
            }
            _ => self.primary()?,
        };
        Ok(value)
    }

    fn primary(&mut self) -> Result<Value, ExprError> {
        let token = self.advance();

        match token.kind {
            TokenKind::Number(n) => Ok(Value::Number(n)),
            TokenKind::Str(s) => Ok(Value::Str(s)),
            TokenKind::Ident(name) => {
                if self.peek().kind == TokenKind::LParen {
                    return self.call(&name, token.position);
                }
                match name.as_str() {
                    "true" => Ok(Value::Bool(true)),
                    "false" => Ok(Value::Bool(false)),
                    _ => Ok(Value::Number(self.ctx.variable(&name))),
                }
            }
            TokenKind::LParen => {
                let value = self.expression(0)?;
                let closing = self.peek();
                if closing.kind != TokenKind::RParen {
                    return Err(ExprError::syntax(
                        format!("expected ')' but found {}", closing.kind),
                        closing.position,
                    ));
                }
                self.advance();
                Ok(value)
            }
            other => Err(ExprError::syntax(format!("unexpected {}", other), token.position)),
        }
    }

    /// Arguments are evaluated left to right before dispatch.
    fn call(&mut self, name: &str, position: usize) -> Result<Value, ExprError> {
        self.advance(); // (

        let mut args: SmallVec<[Value; 3]> = SmallVec::new();
        if self.peek().kind == TokenKind::RParen {
            self.advance();
        } else {
            loop {
                args.push(self.expression(0)?);
                let next = self.advance();
                match next.kind {
                    TokenKind::Comma => continue,
                    TokenKind::RParen => break,
                    other => {
                        return Err(ExprError::syntax(
                            format!("expected ',' or ')' in call to {} but found {}", name, other),
                            next.position,
                        ))
                    }
                }
            }
        }

        builtins::call(name, &args, position, self.ctx, &mut *self.rng)
    }
}

fn apply_binary(op: Operator, left: Value, right: Value, position: usize) -> Result<Value, ExprError> {
    let value = match op {
        Operator::Add => Value::Number(left.to_number()? + right.to_number()?),
        Operator::Sub => Value::Number(left.to_number()? - right.to_number()?),
        Operator::Mul => Value::Number(left.to_number()? * right.to_number()?),
        Operator::Div => {
            let (a, b) = (left.to_number()?, right.to_number()?);
            Value::Number(if b == 0.0 { 0.0 } else { a / b })
        }
        Operator::Rem => {
            let (a, b) = (left.to_number()?, right.to_number()?);
            Value::Number(if b == 0.0 { 0.0 } else { floored_rem(a, b) })
        }
        Operator::Lt => Value::Bool(left.to_number()? < right.to_number()?),
        Operator::Gt => Value::Bool(left.to_number()? > right.to_number()?),
        Operator::Le => Value::Bool(left.to_number()? <= right.to_number()?),
        Operator::Ge => Value::Bool(left.to_number()? >= right.to_number()?),
        Operator::StrictEq => Value::Bool(left == right),
        Operator::StrictNe => Value::Bool(left != right),
        Operator::And => Value::Bool(left.truthy() && right.truthy()),
        Operator::Or => Value::Bool(left.truthy() || right.truthy()),
        Operator::Not => {
            return Err(ExprError::UnknownOperator {
                op: op.symbol().to_string(),
                position,
            })
        }
    };
    Ok(value)
}

/// Remainder with the sign of the divisor.
fn floored_rem(a: f64, b: f64) -> f64 {
    let r = a % b;
    if r != 0.0 && (r < 0.0) != (b < 0.0) {
        r + b
    } else {
        r
    }
}
