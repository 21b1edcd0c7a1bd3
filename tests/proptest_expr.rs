//! Property-based tests with proptest.
//!
//! Generate small integer expressions, evaluate them, and compare with
//! the same computation done directly in Rust.

use basic_expr::{Node, Number, Session, Value, parse, tokenize};
use proptest::prelude::*;

fn eval_int(session: &Session, input: &str) -> Option<Number> {
    session
        .run(input, "<prop>")
        .ok()
        .as_ref()
        .and_then(Value::as_number)
}

proptest! {
    #[test]
    fn integer_literal_parses_to_itself(n in 0..=i64::MAX) {
        let tokens = tokenize("<prop>", &n.to_string()).expect("tokenize");
        let node = parse(&tokens).expect("parse");
        prop_assert!(
            matches!(node, Node::NumberLiteral { value: Number::Int(v), .. } if v == n),
            "unexpected tree for {}", n
        );
    }

    #[test]
    fn sum_of_products(a in -1000i64..1000, b in -1000i64..1000, c in -1000i64..1000) {
        let session = Session::new();
        prop_assert_eq!(
            eval_int(&session, &format!("{a} + {b} * {c}")),
            Some(Number::Int(a + b * c))
        );
        prop_assert_eq!(
            eval_int(&session, &format!("({a} + {b}) * {c}")),
            Some(Number::Int((a + b) * c))
        );
        prop_assert_eq!(
            eval_int(&session, &format!("{a} - {b} - {c}")),
            Some(Number::Int(a - b - c))
        );
    }

    #[test]
    fn power_tower(a in 1i64..=3, b in 0u32..=3, c in 0u32..=3) {
        let session = Session::new();
        let expected = a.pow(b.pow(c));
        prop_assert_eq!(
            eval_int(&session, &format!("{a}^{b}^{c}")),
            Some(Number::Int(expected))
        );
    }

    #[test]
    fn negation_is_an_involution(a in -1_000_000i64..1_000_000) {
        let session = Session::new();
        prop_assert_eq!(eval_int(&session, &format!("--{a}")), Some(Number::Int(a)));
    }

    #[test]
    fn repeated_runs_are_idempotent(a in -100i64..100, b in 1i64..100) {
        let session = Session::new();
        session.run(&format!("var x = {a}"), "<prop>").expect("declare");
        let input = format!("x / {b} + x ^ 2");
        let first = session.run(&input, "<prop>").ok().as_ref().map(ToString::to_string);
        let second = session.run(&input, "<prop>").ok().as_ref().map(ToString::to_string);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn arbitrary_input_never_panics(input in "\\PC{0,40}") {
        if let Ok(tokens) = tokenize("<prop>", &input) {
            prop_assert!(tokens.last().is_some_and(|t| t.kind == basic_expr::TokenKind::Eof));
            if let Ok(node) = parse(&tokens) {
                let _ = Session::new().run(&input, "<prop>");
                prop_assert!(!node.to_string().is_empty());
            }
        }
    }
}
