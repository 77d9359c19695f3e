//! Evaluator tests: programs parsed from equation text and reduced through
//! the public API.

use galaxy_eval::{
    Color, Drawing, EvalError, Evaluator, Point, RecordingRenderer, TransportError, MAX_DEPTH,
};
use galaxy_parser::parse_source;
use galaxy_types::{SourceFile, Term, Value};
use pretty_assertions::assert_eq;
use std::cell::RefCell;
use std::rc::Rc;

fn load(source: &str) -> Evaluator {
    let mut ev = Evaluator::new();
    let file = SourceFile::new("test.txt", source);
    let program = parse_source(&file, ev.store_mut()).unwrap();
    for eq in program.equations {
        ev.define(&eq.name, eq.term);
    }
    ev
}

fn number(ev: &mut Evaluator, name: &str) -> Result<i64, EvalError> {
    let term = ev.resolve(name)?;
    ev.number(term)
}

fn value(ev: &mut Evaluator, name: &str) -> Result<Value, EvalError> {
    let term = ev.resolve(name)?;
    ev.to_value(term)
}

fn n(v: i64) -> Value {
    Value::Number(v)
}

// ══════════════════════════════════════════════════════════════════════════
// Arithmetic and references
// ══════════════════════════════════════════════════════════════════════════

#[test]
fn add_of_literals() {
    let mut ev = load("f = ap ap add 1 2");
    assert_eq!(number(&mut ev, "f"), Ok(3));
}

#[test]
fn forward_reference_resolves_lazily() {
    let mut ev = load("a = ap inc b\nb = 41");
    assert_eq!(number(&mut ev, "a"), Ok(42));
}

#[test]
fn back_references_are_names() {
    let mut ev = load(":1 = 10\n:2 = ap ap mul :1 :1");
    assert_eq!(number(&mut ev, ":2"), Ok(100));
}

#[test]
fn recursive_definition_through_combinators() {
    let mut ev = load(
        "fact = ap ap s ap ap c ap eq 0 1 ap ap s mul ap ap b fact dec\n\
         result = ap fact 5",
    );
    assert_eq!(number(&mut ev, "result"), Ok(120));
}

#[test]
fn unbound_name_is_fatal() {
    let mut ev = load("f = ap inc missing");
    assert_eq!(
        number(&mut ev, "f"),
        Err(EvalError::UnboundName("missing".to_string()))
    );
}

#[test]
fn arithmetic_on_a_function_is_a_type_mismatch() {
    let mut ev = load("f = ap inc inc");
    assert!(matches!(
        number(&mut ev, "f"),
        Err(EvalError::TypeMismatch(_))
    ));
}

#[test]
fn division_truncates_and_rejects_zero() {
    let mut ev = load("q = ap ap div -7 2\nz = ap ap div 1 0");
    assert_eq!(number(&mut ev, "q"), Ok(-3));
    assert_eq!(number(&mut ev, "z"), Err(EvalError::DivisionByZero));
}

#[test]
fn arithmetic_wraps() {
    let mut ev = load("f = ap inc 9223372036854775807");
    assert_eq!(number(&mut ev, "f"), Ok(i64::MIN));
}

#[test]
fn number_applied_is_stuck() {
    let mut ev = load("f = ap 1 2");
    assert!(matches!(
        number(&mut ev, "f"),
        Err(EvalError::StuckApplication(_))
    ));
}

#[test]
fn deep_operand_chain_evaluates() {
    let mut ev = load(&format!("x = {}0", "ap inc ".repeat(5_000)));
    assert_eq!(number(&mut ev, "x"), Ok(5_000));
}

#[test]
fn nesting_past_the_limit_is_an_error() {
    let mut ev = load(&format!("x = {}0", "ap inc ".repeat(20_000)));
    assert_eq!(
        number(&mut ev, "x"),
        Err(EvalError::DepthExceeded(MAX_DEPTH))
    );
    // The evaluator stays usable afterwards.
    let shallow = ev.resolve("inc").unwrap();
    assert!(ev.evaluate(shallow).is_ok());
}

// ══════════════════════════════════════════════════════════════════════════
// Laws
// ══════════════════════════════════════════════════════════════════════════

#[test]
fn s_combinator_law() {
    let mut ev = load(
        "lhs = ap ap ap s add inc 1\n\
         rhs = ap ap add 1 ap inc 1",
    );
    assert_eq!(number(&mut ev, "lhs"), Ok(3));
    assert_eq!(number(&mut ev, "rhs"), Ok(3));
}

#[test]
fn c_and_b_combinator_laws() {
    let mut ev = load(
        "flipped = ap ap ap c add 1 2\n\
         composed = ap ap ap b inc dec 5",
    );
    assert_eq!(number(&mut ev, "flipped"), Ok(3));
    assert_eq!(number(&mut ev, "composed"), Ok(5));
}

#[test]
fn car_and_cdr_select_components() {
    let mut ev = load(
        "head = ap car ap ap cons 5 ap inc inc\n\
         tail = ap cdr ap ap cons ap inc inc 6",
    );
    assert_eq!(number(&mut ev, "head"), Ok(5));
    assert_eq!(number(&mut ev, "tail"), Ok(6));
}

#[test]
fn isnil_and_if0_branch() {
    let mut ev = load(
        "empty = ap ap ap isnil nil 1 2\n\
         full = ap ap ap isnil ap ap cons 0 nil 1 2\n\
         zero = ap ap ap if0 0 10 ap 1 1\n\
         other = ap ap ap if0 3 ap 1 1 20",
    );
    assert_eq!(number(&mut ev, "empty"), Ok(1));
    assert_eq!(number(&mut ev, "full"), Ok(2));
    assert_eq!(number(&mut ev, "zero"), Ok(10));
    assert_eq!(number(&mut ev, "other"), Ok(20));
}

#[test]
fn list_literal_lowers_to_cons_chain() {
    let mut ev = load("l = ( 1 , ( 2 ) , nil )\nv = ap ap vec 3 4");
    assert_eq!(
        value(&mut ev, "l"),
        Ok(Value::list([n(1), Value::list([n(2)]), Value::Nil]))
    );
    assert_eq!(value(&mut ev, "v"), Ok(Value::point(3, 4)));
}

// ══════════════════════════════════════════════════════════════════════════
// Memoization
// ══════════════════════════════════════════════════════════════════════════

#[test]
fn shared_definition_reduces_once() {
    let mut ev = load("big = ap ap mul 3 4\ntwice = ap ap add big big");
    assert_eq!(number(&mut ev, "twice"), Ok(24));
    assert_eq!(ev.stats().primitive_calls, 2);

    assert_eq!(number(&mut ev, "twice"), Ok(24));
    assert_eq!(ev.stats().primitive_calls, 2);
}

#[test]
fn send_fires_once_per_node() {
    let mut ev = load("x = ap send ( 0 )\ny = ap ap cons x x");
    let requests = Rc::new(RefCell::new(Vec::new()));
    let seen = requests.clone();
    ev.host_mut().set_transport(move |body: &str| -> Result<String, TransportError> {
        seen.borrow_mut().push(body.to_string());
        Ok(" 110000\n".to_string())
    });

    let pair = Value::pair(Value::Nil, Value::Nil);
    assert_eq!(value(&mut ev, "y"), Ok(Value::pair(pair.clone(), pair)));
    assert_eq!(*requests.borrow(), vec!["1101000".to_string()]);
}

#[test]
fn transport_failure_surfaces() {
    let mut ev = load("x = ap send 1");
    ev.host_mut()
        .set_transport(|_: &str| -> Result<String, TransportError> {
            Err(TransportError::Status(500))
        });
    assert_eq!(
        value(&mut ev, "x"),
        Err(EvalError::Transport(TransportError::Status(500)))
    );
}

#[test]
fn send_without_transport() {
    let mut ev = load("x = ap send 1");
    assert_eq!(value(&mut ev, "x"), Err(EvalError::NoTransport));
}

// ══════════════════════════════════════════════════════════════════════════
// Codec primitives
// ══════════════════════════════════════════════════════════════════════════

#[test]
fn mod_produces_bits() {
    let mut ev = load("m = ap mod ( 1 , 2 )");
    let term = ev.resolve("m").unwrap();
    let whnf = ev.evaluate(term).unwrap();
    assert_eq!(
        ev.store().term(whnf),
        &Term::Bits("1101100001110110001000".into())
    );
}

#[test]
fn dem_inverts_mod() {
    let mut ev = load(
        "a = ap dem ap mod -5\n\
         b = ap modem ( 1 , ap ap cons 2 3 , nil )",
    );
    assert_eq!(number(&mut ev, "a"), Ok(-5));
    assert_eq!(
        value(&mut ev, "b"),
        Ok(Value::list([n(1), Value::point(2, 3), Value::Nil]))
    );
}

// ══════════════════════════════════════════════════════════════════════════
// Drawing
// ══════════════════════════════════════════════════════════════════════════

#[test]
fn multipledraw_draws_tail_first() {
    let mut ev = load(
        "pics = ap multipledraw ( ( ap ap vec 1 1 ) , ( ap ap vec 2 2 , ap ap vec 3 3 ) )",
    );
    let recorder = RecordingRenderer::new();
    ev.host_mut().set_renderer(recorder.clone());

    assert_eq!(
        value(&mut ev, "pics"),
        Ok(Value::list([Value::list([Value::Nil])]))
    );
    assert_eq!(
        recorder.drawings(),
        vec![
            Drawing {
                points: vec![Point::new(2, 2), Point::new(3, 3)],
                color: Color::BASE,
            },
            Drawing {
                points: vec![Point::new(1, 1)],
                color: Color::BASE.brighter(),
            },
        ]
    );
}

#[test]
fn draw_requires_vectors() {
    let mut ev = load("d = ap draw ( 1 )");
    assert!(matches!(
        value(&mut ev, "d"),
        Err(EvalError::TypeMismatch(_))
    ));
}

#[test]
fn checkerboard_cells_are_drawable() {
    let mut ev = load("d = ap draw ap ap checkerboard 3 0");
    let recorder = RecordingRenderer::new();
    ev.host_mut().set_renderer(recorder.clone());
    assert_eq!(value(&mut ev, "d"), Ok(Value::Nil));
    let drawings = recorder.drawings();
    assert_eq!(drawings.len(), 1);
    assert_eq!(
        drawings[0].points,
        vec![
            Point::new(0, 0),
            Point::new(0, 2),
            Point::new(1, 1),
            Point::new(2, 0),
            Point::new(2, 2),
        ]
    );
}

// ══════════════════════════════════════════════════════════════════════════
// Interaction combinators
// ══════════════════════════════════════════════════════════════════════════

#[test]
fn interact_with_flag_zero_finishes_locally() {
    // ap ap proto s v = ( 0 , ap ap cons v s , ( ap ap cons v s ) )
    let mut ev = load(
        "proto = ap ap b ap b ap ap s ap ap b ap b ap cons 0 ap ap c ap ap b b cons ap ap c cons nil ap ap c cons nil ap c cons\n\
         run = ap ap ap interact proto nil ap ap vec 2 3",
    );
    let recorder = RecordingRenderer::new();
    ev.host_mut().set_renderer(recorder.clone());
    let result = value(&mut ev, "run").unwrap();
    let items = result.as_list().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0], &Value::list([Value::point(2, 3)]));
    assert_eq!(
        recorder.drawings(),
        vec![Drawing {
            points: vec![Point::new(2, 3)],
            color: Color::BASE,
        }]
    );
}
