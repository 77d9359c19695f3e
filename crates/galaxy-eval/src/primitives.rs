//! Rewrite laws of the built-in operators.
//!
//! Every law receives its operands unevaluated and forces only the ones it
//! inspects; the rest are rearranged into new application nodes.

use crate::error::{EvalError, EvalResult};
use crate::evaluator::Evaluator;
use crate::host::Point;
use galaxy_codec::{demodulate, modulate};
use galaxy_types::{Primitive, Term, TermId, Value};

impl Evaluator {
    /// Apply a saturated primitive. `args.len()` equals `p.arity()`.
    pub(crate) fn apply_primitive(&mut self, p: Primitive, args: &[TermId]) -> EvalResult<TermId> {
        self.stats.primitive_calls += 1;
        log::trace!("apply {p}/{}", args.len());
        match (p, args) {
            // ── Integers ──
            (Primitive::Inc, &[x]) => self.unary(x, |n| Ok(n.wrapping_add(1))),
            (Primitive::Dec, &[x]) => self.unary(x, |n| Ok(n.wrapping_sub(1))),
            (Primitive::Neg, &[x]) => self.unary(x, |n| Ok(n.wrapping_neg())),
            (Primitive::Pwr2, &[x]) => self.unary(x, |n| match n {
                n if n < 0 => Err(EvalError::NegativeExponent(n)),
                n if n >= 63 => Err(EvalError::Overflow(format!("pwr2 {n}"))),
                n => Ok(1i64 << n),
            }),
            (Primitive::Add, &[x, y]) => self.binary(x, y, |a, b| Ok(a.wrapping_add(b))),
            (Primitive::Mul, &[x, y]) => self.binary(x, y, |a, b| Ok(a.wrapping_mul(b))),
            (Primitive::Div, &[x, y]) => self.binary(x, y, |a, b| {
                if b == 0 {
                    Err(EvalError::DivisionByZero)
                } else {
                    Ok(a.wrapping_div(b))
                }
            }),
            (Primitive::Eq, &[x, y]) => {
                let equal = self.number(x)? == self.number(y)?;
                Ok(self.boolean(equal))
            }
            (Primitive::Lt, &[x, y]) => {
                let less = self.number(x)? < self.number(y)?;
                Ok(self.boolean(less))
            }

            // ── Selectors and combinators ──
            (Primitive::True, &[x, _]) => Ok(x),
            (Primitive::False, &[_, y]) => Ok(y),
            (Primitive::I, &[x]) => Ok(x),
            // ap ap ap s x y z = ap ap x z ap y z
            (Primitive::S, &[x, y, z]) => {
                let yz = self.store.app(y, z)?;
                Ok(self.store.app2(x, z, yz)?)
            }
            // ap ap ap c x y z = ap ap x z y
            (Primitive::C, &[x, y, z]) => Ok(self.store.app2(x, z, y)?),
            // ap ap ap b x y z = ap x ap y z
            (Primitive::B, &[x, y, z]) => {
                let yz = self.store.app(y, z)?;
                Ok(self.store.app(x, yz)?)
            }
            (Primitive::If0, &[x, y, z]) => Ok(if self.number(x)? == 0 { y } else { z }),

            // ── Pairs ──
            // ap ap ap cons x y z = ap ap z x y
            (Primitive::Cons | Primitive::Vec, &[x, y, z]) => Ok(self.store.app2(z, x, y)?),
            (Primitive::Car, &[x]) => {
                let t = self.store.primitive(Primitive::True);
                Ok(self.store.app(x, t)?)
            }
            (Primitive::Cdr, &[x]) => {
                let f = self.store.primitive(Primitive::False);
                Ok(self.store.app(x, f)?)
            }
            // ap isnil x = ap x ap t ap t f
            (Primitive::IsNil, &[x]) => {
                let f = self.store.primitive(Primitive::False);
                let tf = self.store.call1(Primitive::True, f)?;
                let selector = self.store.call1(Primitive::True, tf)?;
                Ok(self.store.app(x, selector)?)
            }

            // ── Pictures ──
            (Primitive::Draw, &[x]) => {
                let points = self.points(x)?;
                self.host.draw(&points);
                Ok(self.store.nil())
            }
            // ap multipledraw nil = nil
            // ap multipledraw ap ap cons x y = ap ap cons ap multipledraw y ap draw x
            (Primitive::MultipleDraw, &[x]) => {
                let list = self.evaluate(x)?;
                if matches!(self.store.term(list), Term::Nil) {
                    return Ok(list);
                }
                let head = self.store.call1(Primitive::Car, list)?;
                let tail = self.store.call1(Primitive::Cdr, list)?;
                let rest = self.store.call1(Primitive::MultipleDraw, tail)?;
                let picture = self.store.call1(Primitive::Draw, head)?;
                Ok(self.store.cons(rest, picture)?)
            }
            (Primitive::Checkerboard, &[x, _]) => {
                let size = self.number(x)?;
                let cells = (0..size)
                    .flat_map(|cx| (0..size).map(move |cy| (cx, cy)))
                    .filter(|(cx, cy)| (cx + cy) % 2 == 0)
                    .map(|(cx, cy)| Value::point(cx, cy))
                    .collect::<Vec<_>>();
                self.from_value(&Value::list(cells))
            }

            // ── Wire ──
            (Primitive::Mod, &[x]) => {
                let value = self.to_value(x)?;
                Ok(self.store.bits(&modulate(&value))?)
            }
            (Primitive::Dem, &[x]) => {
                let bits = self.evaluate(x)?;
                let value = match self.store.term(bits) {
                    Term::Bits(bits) => demodulate(bits)?,
                    _ => {
                        return Err(EvalError::TypeMismatch(format!(
                            "dem expects a modulated bit string, found {}",
                            self.describe(bits)
                        )))
                    }
                };
                self.from_value(&value)
            }
            // ap modem x = ap dem ap mod x
            (Primitive::Modem, &[x]) => {
                let modulated = self.store.call1(Primitive::Mod, x)?;
                Ok(self.store.call1(Primitive::Dem, modulated)?)
            }
            (Primitive::Send, &[x]) => {
                let request = self.to_value(x)?;
                let response = self.host.send(&modulate(&request))?;
                let value = demodulate(response.trim())?;
                self.from_value(&value)
            }

            // ── Interaction ──
            // ap ap f38 p r = ap ap ap if0 ap car r
            //     ( ap modem ap car ap cdr r , ap multipledraw ap car ap cdr ap cdr r )
            //     ap ap ap interact p ap modem ap car ap cdr r ap send ap car ap cdr ap cdr r
            (Primitive::F38, &[protocol, result]) => {
                let flag = self.store.call1(Primitive::Car, result)?;
                let rest = self.store.call1(Primitive::Cdr, result)?;
                let new_state = self.store.call1(Primitive::Car, rest)?;
                let rest = self.store.call1(Primitive::Cdr, rest)?;
                let data = self.store.call1(Primitive::Car, rest)?;

                let state = self.store.call1(Primitive::Modem, new_state)?;
                let pictures = self.store.call1(Primitive::MultipleDraw, data)?;
                let done = self.store.list(vec![state, pictures])?;

                let request = self.store.call1(Primitive::Send, data)?;
                let again = self.store.call3(Primitive::Interact, protocol, state, request)?;

                Ok(self.store.call3(Primitive::If0, flag, done, again)?)
            }
            // ap ap ap interact p s v = ap ap f38 p ap ap p s v
            (Primitive::Interact, &[protocol, state, vector]) => {
                let result = self.store.app2(protocol, state, vector)?;
                Ok(self.store.call2(Primitive::F38, protocol, result)?)
            }

            (p, args) => Err(EvalError::TypeMismatch(format!(
                "{p} takes {} arguments, got {}",
                p.arity(),
                args.len()
            ))),
        }
    }

    fn unary(&mut self, x: TermId, op: impl FnOnce(i64) -> EvalResult<i64>) -> EvalResult<TermId> {
        let n = op(self.number(x)?)?;
        Ok(self.store.number(n)?)
    }

    fn binary(
        &mut self,
        x: TermId,
        y: TermId,
        op: impl FnOnce(i64, i64) -> EvalResult<i64>,
    ) -> EvalResult<TermId> {
        let a = self.number(x)?;
        let b = self.number(y)?;
        Ok(self.store.number(op(a, b)?)?)
    }

    fn boolean(&self, b: bool) -> TermId {
        let selector = if b { Primitive::True } else { Primitive::False };
        self.store.primitive(selector)
    }

    /// Force a list of `(x, y)` vectors for `draw`. Vectors with a `nil`
    /// coordinate are skipped.
    fn points(&mut self, x: TermId) -> EvalResult<Vec<Point>> {
        let value = self.to_value(x)?;
        let items = value
            .as_list()
            .ok_or_else(|| EvalError::TypeMismatch(format!("draw expects a list, found {value}")))?;
        let mut points = Vec::with_capacity(items.len());
        for item in items {
            match item.as_pair() {
                Some((Value::Number(px), Value::Number(py))) => points.push(Point::new(*px, *py)),
                Some((Value::Nil, _) | (_, Value::Nil)) => {}
                _ => {
                    return Err(EvalError::TypeMismatch(format!(
                        "draw expects (x, y) vectors, found {item}"
                    )))
                }
            }
        }
        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_arithmetic_laws() {
        let mut ev = Evaluator::new();
        let seven = ev.store.number(7).unwrap();
        let minus_two = ev.store.number(-2).unwrap();
        let cases = [
            (Primitive::Add, 5),
            (Primitive::Mul, -14),
            (Primitive::Div, -3),
        ];
        for (p, expected) in cases {
            let term = ev.store.call2(p, seven, minus_two).unwrap();
            assert_eq!(ev.number(term), Ok(expected), "{p}");
        }
        let term = ev.store.call1(Primitive::Neg, seven).unwrap();
        assert_eq!(ev.number(term), Ok(-7));
    }

    #[test]
    fn test_div_truncates_toward_zero() {
        let mut ev = Evaluator::new();
        let a = ev.store.number(-5).unwrap();
        let b = ev.store.number(3).unwrap();
        let term = ev.store.call2(Primitive::Div, a, b).unwrap();
        assert_eq!(ev.number(term), Ok(-1));
    }

    #[test]
    fn test_pwr2_bounds() {
        let mut ev = Evaluator::new();
        let cases = [(0, Ok(1)), (62, Ok(1i64 << 62))];
        for (n, expected) in cases {
            let x = ev.store.number(n).unwrap();
            let term = ev.store.call1(Primitive::Pwr2, x).unwrap();
            assert_eq!(ev.number(term), expected);
        }
        let x = ev.store.number(-1).unwrap();
        let term = ev.store.call1(Primitive::Pwr2, x).unwrap();
        assert_eq!(ev.number(term), Err(EvalError::NegativeExponent(-1)));
        let x = ev.store.number(63).unwrap();
        let term = ev.store.call1(Primitive::Pwr2, x).unwrap();
        assert!(matches!(ev.number(term), Err(EvalError::Overflow(_))));
    }

    #[test]
    fn test_comparisons_select() {
        let mut ev = Evaluator::new();
        let one = ev.store.number(1).unwrap();
        let two = ev.store.number(2).unwrap();
        let lt = ev.store.call2(Primitive::Lt, one, two).unwrap();
        let pick = ev.store.app2(lt, one, two).unwrap();
        assert_eq!(ev.number(pick), Ok(1));
        let eq = ev.store.call2(Primitive::Eq, one, two).unwrap();
        let pick = ev.store.app2(eq, one, two).unwrap();
        assert_eq!(ev.number(pick), Ok(2));
    }

    #[test]
    fn test_checkerboard_cells() {
        let mut ev = Evaluator::new();
        let two = ev.store.number(2).unwrap();
        let nil = ev.store.nil();
        let term = ev.store.call2(Primitive::Checkerboard, two, nil).unwrap();
        assert_eq!(
            ev.to_value(term),
            Ok(Value::list([Value::point(0, 0), Value::point(1, 1)]))
        );
    }

    #[test]
    fn test_draw_skips_nil_coordinates() {
        let mut ev = Evaluator::new();
        let value = Value::list([
            Value::point(1, 2),
            Value::pair(Value::Nil, Value::from(3)),
        ]);
        let points = ev.from_value(&value).unwrap();
        assert_eq!(ev.points(points), Ok(vec![Point::new(1, 2)]));
    }

    #[test]
    fn test_dem_rejects_numbers() {
        let mut ev = Evaluator::new();
        let one = ev.store.number(1).unwrap();
        let term = ev.store.call1(Primitive::Dem, one).unwrap();
        assert!(matches!(ev.evaluate(term), Err(EvalError::TypeMismatch(_))));
    }
}
