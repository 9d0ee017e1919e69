use std::cell::Cell;

use cue_ir::build;
use pretty_assertions::assert_eq;

use super::*;

#[test]
fn parses_are_cached_by_source() {
    let calls = Rc::new(Cell::new(0u32));
    let counter = Rc::clone(&calls);
    let parser = CachedParser::new(Rc::new(move |_source| {
        counter.set(counter.get() + 1);
        Ok(build::program(vec![build::expr_stmt(build::number(1.0))]))
    }));

    let first = parser.parse("1").expect("parses");
    let second = parser.parse("1").expect("parses");
    assert_eq!(calls.get(), 1);
    assert!(Rc::ptr_eq(&first, &second));

    parser.parse("2").expect("parses");
    assert_eq!(calls.get(), 2);
    assert_eq!(parser.len(), 2);
}

#[test]
fn failures_are_not_cached() {
    let calls = Rc::new(Cell::new(0u32));
    let counter = Rc::clone(&calls);
    let parser = CachedParser::new(Rc::new(move |_source| {
        counter.set(counter.get() + 1);
        Err(ParseError::new("unexpected token"))
    }));

    assert!(parser.parse("x").is_err());
    assert!(parser.parse("x").is_err());
    assert_eq!(calls.get(), 2);
    assert!(parser.is_empty());
}

#[test]
fn parse_errors_surface_as_syntax_errors() {
    let signal = Signal::from(ParseError::new("unexpected token"));
    assert_eq!(signal.type_tag(), "SyntaxError");
    assert_eq!(signal.message(), "SyntaxError: unexpected token");
}
