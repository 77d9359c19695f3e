//! Wire-level values: the numeric and pair subset of terms.
//!
//! Values can be arbitrarily deep (a demodulated list of a million items is
//! a million nested pairs), so cloning, comparison, formatting and dropping
//! all walk the structure with explicit stacks.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::mem;

/// A fully evaluated term built only from numbers, `nil` and pairs.
///
/// This is what crosses the wire and what a session persists as its state.
/// In JSON, `Nil` is `null`, numbers are integers and a pair is a
/// two-element array `[head, tail]`.
#[derive(Debug, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Nil,
    Number(i64),
    Pair(Box<Value>, Box<Value>),
}

impl Value {
    pub fn pair(head: Value, tail: Value) -> Value {
        Value::Pair(Box::new(head), Box::new(tail))
    }

    /// Build a proper list ending in `Nil`.
    pub fn list<I>(items: I) -> Value
    where
        I: IntoIterator<Item = Value>,
        I::IntoIter: DoubleEndedIterator,
    {
        items
            .into_iter()
            .rev()
            .fold(Value::Nil, |tail, head| Value::pair(head, tail))
    }

    /// A 2D vector `ap ap cons x y`.
    pub fn point(x: i64, y: i64) -> Value {
        Value::pair(Value::Number(x), Value::Number(y))
    }

    pub fn as_number(&self) -> Option<i64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_pair(&self) -> Option<(&Value, &Value)> {
        match self {
            Value::Pair(head, tail) => Some((head, tail)),
            _ => None,
        }
    }

    /// The elements of a proper list, or `None` if the chain does not end in `Nil`.
    pub fn as_list(&self) -> Option<Vec<&Value>> {
        let mut items = Vec::new();
        let mut cursor = self;
        loop {
            match cursor {
                Value::Nil => return Some(items),
                Value::Pair(head, tail) => {
                    items.push(head.as_ref());
                    cursor = tail;
                }
                Value::Number(_) => return None,
            }
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n)
    }
}

impl Clone for Value {
    fn clone(&self) -> Self {
        enum Task<'a> {
            Visit(&'a Value),
            Join,
        }
        let mut tasks = vec![Task::Visit(self)];
        let mut done: Vec<Value> = Vec::new();
        while let Some(task) = tasks.pop() {
            match task {
                Task::Visit(Value::Nil) => done.push(Value::Nil),
                Task::Visit(Value::Number(n)) => done.push(Value::Number(*n)),
                Task::Visit(Value::Pair(head, tail)) => {
                    tasks.push(Task::Join);
                    tasks.push(Task::Visit(tail.as_ref()));
                    tasks.push(Task::Visit(head.as_ref()));
                }
                Task::Join => {
                    let tail = done.pop().unwrap_or(Value::Nil);
                    let head = done.pop().unwrap_or(Value::Nil);
                    done.push(Value::pair(head, tail));
                }
            }
        }
        done.pop().unwrap_or(Value::Nil)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        let mut stack = vec![(self, other)];
        while let Some(pair) = stack.pop() {
            match pair {
                (Value::Nil, Value::Nil) => {}
                (Value::Number(a), Value::Number(b)) if a == b => {}
                (Value::Pair(h1, t1), Value::Pair(h2, t2)) => {
                    stack.push((t1.as_ref(), t2.as_ref()));
                    stack.push((h1.as_ref(), h2.as_ref()));
                }
                _ => return false,
            }
        }
        true
    }
}

impl Drop for Value {
    fn drop(&mut self) {
        let mut detached = Vec::new();
        detach_pairs(self, &mut detached);
        while let Some(mut value) = detached.pop() {
            detach_pairs(&mut value, &mut detached);
        }
    }
}

/// Move the pair children of `value` onto `detached`, leaving `Nil` behind,
/// so no drop ever recurses more than one level.
fn detach_pairs(value: &mut Value, detached: &mut Vec<Value>) {
    if let Value::Pair(head, tail) = value {
        for child in [head, tail] {
            if matches!(**child, Value::Pair(..)) {
                detached.push(mem::replace(&mut **child, Value::Nil));
            }
        }
    }
}

impl fmt::Display for Value {
    /// Proper lists print as `(a, b, c)`, other pairs as `ap ap cons a b`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        enum Piece<'a> {
            Any(&'a Value),
            /// A pair whose tail chain is known not to end in `Nil`.
            Improper(&'a Value),
            Text(&'static str),
        }
        let mut pieces = vec![Piece::Any(self)];
        while let Some(piece) = pieces.pop() {
            match piece {
                Piece::Text(text) => f.write_str(text)?,
                Piece::Any(Value::Nil) => f.write_str("nil")?,
                Piece::Any(Value::Number(n)) => write!(f, "{n}")?,
                Piece::Any(pair) => match pair.as_list() {
                    Some(items) => {
                        pieces.push(Piece::Text(")"));
                        for (i, item) in items.into_iter().enumerate().rev() {
                            pieces.push(Piece::Any(item));
                            if i > 0 {
                                pieces.push(Piece::Text(", "));
                            }
                        }
                        pieces.push(Piece::Text("("));
                    }
                    None => pieces.push(Piece::Improper(pair)),
                },
                Piece::Improper(Value::Pair(head, tail)) => {
                    pieces.push(match tail.as_ref() {
                        pair @ Value::Pair(..) => Piece::Improper(pair),
                        other => Piece::Any(other),
                    });
                    pieces.push(Piece::Text(" "));
                    pieces.push(Piece::Any(head.as_ref()));
                    pieces.push(Piece::Text("ap ap cons "));
                }
                Piece::Improper(other) => pieces.push(Piece::Any(other)),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_list_builds_right_fold() {
        let list = Value::list([Value::from(1), Value::from(2)]);
        assert_eq!(
            list,
            Value::pair(Value::from(1), Value::pair(Value::from(2), Value::Nil))
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Nil.to_string(), "nil");
        assert_eq!(Value::point(1, 2).to_string(), "ap ap cons 1 2");
        let nested = Value::list([
            Value::from(1),
            Value::list([Value::from(2), Value::from(3)]),
            Value::from(4),
        ]);
        assert_eq!(nested.to_string(), "(1, (2, 3), 4)");
        assert_eq!(Value::list([Value::Nil]).to_string(), "(nil)");
    }

    #[test]
    fn test_as_list_rejects_improper_chain() {
        assert!(Value::point(3, 4).as_list().is_none());
        assert_eq!(Value::Nil.as_list(), Some(vec![]));
    }

    #[test]
    fn test_json_shape() {
        let state = Value::list([Value::from(-7), Value::point(0, 1)]);
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, "[-7,[[0,1],null]]");
        let back: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn test_improper_chain_display() {
        let chain = Value::pair(Value::from(1), Value::point(2, 3));
        assert_eq!(chain.to_string(), "ap ap cons 1 ap ap cons 2 3");
        let mixed = Value::list([Value::pair(Value::Nil, Value::from(4))]);
        assert_eq!(mixed.to_string(), "(ap ap cons nil 4)");
    }

    #[test]
    fn test_equality_compares_structure() {
        assert_ne!(Value::point(1, 2), Value::point(1, 3));
        assert_ne!(Value::list([Value::Nil]), Value::Nil);
        assert_eq!(Value::point(1, 2).clone(), Value::point(1, 2));
    }

    #[test]
    fn test_deep_values_need_no_deep_stack() {
        let long = Value::list((0..1_000_000).map(Value::from).collect::<Vec<_>>());
        let copy = long.clone();
        assert_eq!(copy, long);
        assert!(long.to_string().ends_with("999999)"));

        let mut nested = Value::Nil;
        for _ in 0..1_000_000 {
            nested = Value::pair(nested, Value::Nil);
        }
        assert_eq!(nested.clone(), nested);
        drop(nested);
        drop(copy);
    }
}
