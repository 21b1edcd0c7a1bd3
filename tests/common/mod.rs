#![allow(dead_code)]

use basic_expr::{Error, Node, Session, Value, parse, tokenize};

pub const SOURCE: &str = "<stdin>";

/// Helper: evaluate in a fresh session, panicking with the rendered
/// diagnostic on failure.
pub fn eval(input: &str) -> Value {
    Session::new()
        .run(input, SOURCE)
        .unwrap_or_else(|e| panic!("evaluation of {input:?} failed:\n{}", e.render()))
}

pub fn eval_str(input: &str) -> String {
    eval(input).to_string()
}

/// Helper: evaluate in an existing session and display the result.
pub fn run_str(session: &Session, input: &str) -> String {
    session
        .run(input, SOURCE)
        .unwrap_or_else(|e| panic!("evaluation of {input:?} failed:\n{}", e.render()))
        .to_string()
}

pub fn eval_err(input: &str) -> Error {
    match Session::new().run(input, SOURCE) {
        Ok(value) => panic!("evaluation of {input:?} should fail, got {value}"),
        Err(e) => e,
    }
}

pub fn parse_str(input: &str) -> Node {
    let tokens = tokenize(SOURCE, input).expect("tokenize failed");
    parse(&tokens).unwrap_or_else(|e| panic!("parse of {input:?} failed:\n{}", e.render()))
}

pub fn parse_err(input: &str) -> Error {
    let tokens = tokenize(SOURCE, input).expect("tokenize failed");
    match parse(&tokens) {
        Ok(node) => panic!("parse of {input:?} should fail, got {node}"),
        Err(e) => e,
    }
}
