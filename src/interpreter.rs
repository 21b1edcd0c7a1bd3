use crate::ast::{BinaryOperator, Node, UnaryOperator};
use crate::context::{Context, Lookup};
use crate::error::{Error, RuntimeErrorKind};
use crate::position::Span;
use crate::value::{Number, Value, ValueKind};

/// Evaluate `node` against `context`.
///
/// Operands are evaluated left to right and the first error stops
/// evaluation. Every returned value is tagged with the span of the node
/// that produced it.
///
/// # Errors
///
/// Returns a runtime error (with a traceback through `context`) for
/// division by zero, undefined names and out-of-range results, or
/// `NoOverload` when an operator has no definition for its operands.
pub fn evaluate(node: &Node, context: &Context) -> Result<Value, Error> {
    match node {
        Node::NumberLiteral { value, span } => Ok(Value::number(*value).with_span(span.clone())),
        Node::UnaryOp { op, operand, span } => {
            let value = evaluate(operand, context)?;
            let result = match op {
                UnaryOperator::Plus => value,
                UnaryOperator::Minus => {
                    let minus_one = Value::number(Number::Int(-1));
                    let operands = Operands {
                        left: &value,
                        left_span: operand.span(),
                        right: &minus_one,
                        right_span: operand.span(),
                    };
                    apply(BinaryOperator::Mul, &operands, span, context)?
                }
            };
            Ok(result.with_span(span.clone()))
        }
        Node::BinaryOp {
            left,
            op,
            right,
            span,
        } => {
            let lhs = evaluate(left, context)?;
            let rhs = evaluate(right, context)?;
            let operands = Operands {
                left: &lhs,
                left_span: left.span(),
                right: &rhs,
                right_span: right.span(),
            };
            Ok(apply(*op, &operands, span, context)?.with_span(span.clone()))
        }
        Node::VarAccess { name, span } => match context.lookup(name) {
            Lookup::Found(value) => Ok(value.with_span(span.clone())),
            Lookup::NotFound => Err(Error::runtime(
                RuntimeErrorKind::Undefined { name: name.clone() },
                span.clone(),
                context,
            )),
        },
        Node::VarAssign { name, value, .. } => {
            let value = evaluate(value, context)?;
            context.assign(name, value.clone());
            Ok(value)
        }
    }
}

struct Operands<'v> {
    left: &'v Value,
    left_span: &'v Span,
    right: &'v Value,
    right_span: &'v Span,
}

/// Apply a binary operator. Division by zero is reported at the right
/// operand, other arithmetic failures at the whole expression.
fn apply(
    op: BinaryOperator,
    operands: &Operands<'_>,
    span: &Span,
    context: &Context,
) -> Result<Value, Error> {
    match (&operands.left.kind, &operands.right.kind) {
        (ValueKind::Number(a), ValueKind::Number(b)) => {
            let result = match op {
                BinaryOperator::Add => a.add(*b),
                BinaryOperator::Sub => a.sub(*b),
                BinaryOperator::Mul => a.mul(*b),
                BinaryOperator::Div => a.div(*b),
                BinaryOperator::Pow => a.pow(*b),
            };
            result.map(Value::number).map_err(|kind| {
                let at = match kind {
                    RuntimeErrorKind::DivisionByZero => operands.right_span,
                    _ => span,
                };
                Error::runtime(kind, at.clone(), context)
            })
        }
        // Only reachable once `ValueKind` has more than one variant.
        #[allow(unreachable_patterns)]
        (ValueKind::Number(_), other) => {
            Err(Error::no_overload(other.type_name(), operands.right_span.clone()))
        }
        #[allow(unreachable_patterns)]
        (other, _) => Err(Error::no_overload(other.type_name(), operands.left_span.clone())),
    }
}
