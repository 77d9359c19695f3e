//! Core graph reducer.

use crate::env::Definitions;
use crate::error::{EvalError, EvalResult};
use crate::host::Host;
use galaxy_types::{Primitive, Term, TermId, TermStore, Value};
use std::fmt::Write as _;

/// Token budget for [`Evaluator::describe`].
const DESCRIBE_BUDGET: usize = 48;

/// Deepest nesting of [`Evaluator::evaluate`] calls before giving up with
/// [`EvalError::DepthExceeded`].
pub const MAX_DEPTH: usize = 10_000;

/// When less than this much stack is left, nested evaluation continues on a
/// freshly allocated segment of [`STACK_GROW_SIZE`] bytes.
const STACK_RED_ZONE: usize = 256 * 1024;
const STACK_GROW_SIZE: usize = 4 * 1024 * 1024;

/// Counters exposing how much work the reducer has done.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvalStats {
    /// Reduction steps taken (reference lookups, list lowerings and
    /// application attempts).
    pub steps: u64,
    /// Primitive invocations.
    pub primitive_calls: u64,
}

/// The reducer: owns the term graph, the definition table and the host.
#[derive(Debug)]
pub struct Evaluator {
    pub(crate) store: TermStore,
    defs: Definitions,
    pub(crate) host: Host,
    pub(crate) stats: EvalStats,
    /// Nested `evaluate` calls currently on the stack.
    depth: usize,
}

impl Evaluator {
    /// Create an evaluator whose table holds `nil` and every primitive.
    pub fn new() -> Self {
        Self::with_store(TermStore::new())
    }

    /// Create an evaluator over an existing store, binding its primitive
    /// leaves.
    pub fn with_store(store: TermStore) -> Self {
        let defs = Definitions::with_primitives(&store);
        Self {
            store,
            defs,
            host: Host::new(),
            stats: EvalStats::default(),
            depth: 0,
        }
    }

    pub fn store(&self) -> &TermStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut TermStore {
        &mut self.store
    }

    pub fn definitions(&self) -> &Definitions {
        &self.defs
    }

    /// Bind `name` to `term`, returning the previous binding.
    pub fn define(&mut self, name: &str, term: TermId) -> Option<TermId> {
        self.defs.define(name, term)
    }

    /// Look up a name in the definition table.
    pub fn resolve(&self, name: &str) -> EvalResult<TermId> {
        self.defs
            .get(name)
            .ok_or_else(|| EvalError::UnboundName(name.to_string()))
    }

    pub fn host(&self) -> &Host {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut Host {
        &mut self.host
    }

    pub fn stats(&self) -> EvalStats {
        self.stats
    }

    // ══════════════════════════════════════════════════════════════════════
    // Reduction
    // ══════════════════════════════════════════════════════════════════════

    /// Reduce `id` to weak head normal form.
    ///
    /// Every node visited on the way shares the final result as its memo, so
    /// a later evaluation of any of them is a single lookup.
    ///
    /// Forcing a function position or a primitive operand nests another
    /// call; past [`MAX_DEPTH`] levels this fails with
    /// [`EvalError::DepthExceeded`].
    pub fn evaluate(&mut self, id: TermId) -> EvalResult<TermId> {
        if let Some(done) = self.store.memo(id) {
            return Ok(done);
        }
        if self.depth >= MAX_DEPTH {
            return Err(EvalError::DepthExceeded(MAX_DEPTH));
        }
        self.depth += 1;
        let result = stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || self.force(id));
        self.depth -= 1;
        result
    }

    fn force(&mut self, id: TermId) -> EvalResult<TermId> {
        let mut visited = Vec::new();
        let mut current = id;
        let result = loop {
            if let Some(done) = self.store.memo(current) {
                break done;
            }
            visited.push(current);
            match self.step(current)? {
                Some(next) => current = next,
                None => break current,
            }
        };
        for node in visited {
            self.store.set_memo(node, result);
        }
        Ok(result)
    }

    /// One rewrite of `id`, or `None` if it is already irreducible.
    fn step(&mut self, id: TermId) -> EvalResult<Option<TermId>> {
        self.stats.steps += 1;
        match self.store.term(id) {
            Term::Number(_) | Term::Nil | Term::Primitive(_) | Term::Bits(_) => Ok(None),
            Term::Reference(name) => {
                let name = name.clone();
                self.resolve(&name).map(Some)
            }
            Term::List(items) => {
                let items = items.clone();
                Ok(Some(self.store.cons_chain(&items)?))
            }
            &Term::Application(function, argument) => self.reduce_application(function, argument),
        }
    }

    /// Fire the primitive at the bottom of an application spine once it has
    /// exactly as many arguments as its arity.
    ///
    /// The function position is evaluated first; an irreducible result is
    /// peeled one application layer at a time, collecting the pending
    /// arguments, for at most three layers.
    fn reduce_application(
        &mut self,
        function: TermId,
        argument: TermId,
    ) -> EvalResult<Option<TermId>> {
        let mut pending = vec![argument];
        let mut cursor = self.evaluate(function)?;
        loop {
            match *self.store.term(cursor) {
                Term::Primitive(p) => {
                    if p.arity() != pending.len() {
                        return Ok(None);
                    }
                    pending.reverse();
                    return self.apply_primitive(p, &pending).map(Some);
                }
                // `ap nil x = t`
                Term::Nil => {
                    let t = self.store.primitive(Primitive::True);
                    return Ok((pending.len() == 1).then_some(t));
                }
                Term::Application(inner, arg) => {
                    if pending.len() == 3 {
                        return Ok(None);
                    }
                    pending.push(arg);
                    cursor = self.evaluate(inner)?;
                }
                Term::Number(_) | Term::Bits(_) => {
                    return Err(EvalError::StuckApplication(self.describe(cursor)));
                }
                // `evaluate` never stops on these.
                Term::Reference(_) | Term::List(_) => {
                    return Err(EvalError::StuckApplication(self.describe(cursor)));
                }
            }
        }
    }

    /// Evaluate `id` and require a number.
    pub fn number(&mut self, id: TermId) -> EvalResult<i64> {
        let whnf = self.evaluate(id)?;
        match self.store.term(whnf) {
            Term::Number(n) => Ok(*n),
            _ => Err(EvalError::TypeMismatch(format!(
                "expected a number, found {}",
                self.describe(whnf)
            ))),
        }
    }

    /// The head and tail of a `cons` (or `vec`) pair in normal form.
    fn pair_parts(&mut self, whnf: TermId) -> EvalResult<Option<(TermId, TermId)>> {
        let Term::Application(outer, tail) = *self.store.term(whnf) else {
            return Ok(None);
        };
        let outer = self.evaluate(outer)?;
        let Term::Application(constructor, head) = *self.store.term(outer) else {
            return Ok(None);
        };
        let constructor = self.evaluate(constructor)?;
        match self.store.term(constructor) {
            Term::Primitive(Primitive::Cons | Primitive::Vec) => Ok(Some((head, tail))),
            _ => Ok(None),
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Values
    // ══════════════════════════════════════════════════════════════════════

    /// Force `id` completely into a [`Value`].
    ///
    /// Walks the structure with an explicit stack, forcing the head of every
    /// pair before its tail. Anything other than numbers, `nil` and pairs is
    /// an [`EvalError::UnsupportedShape`].
    pub fn to_value(&mut self, id: TermId) -> EvalResult<Value> {
        // Each open pair holds its finished head (once known) and its tail term.
        let mut open: Vec<(Option<Value>, TermId)> = Vec::new();
        let mut current = id;
        loop {
            let whnf = self.evaluate(current)?;
            let mut value = match *self.store.term(whnf) {
                Term::Number(n) => Value::Number(n),
                Term::Nil => Value::Nil,
                _ => match self.pair_parts(whnf)? {
                    Some((head, tail)) => {
                        open.push((None, tail));
                        current = head;
                        continue;
                    }
                    None => return Err(EvalError::UnsupportedShape(self.describe(whnf))),
                },
            };
            loop {
                match open.pop() {
                    None => return Ok(value),
                    Some((None, tail)) => {
                        open.push((Some(value), tail));
                        current = tail;
                        break;
                    }
                    Some((Some(head), _)) => value = Value::pair(head, value),
                }
            }
        }
    }

    /// Build a term graph for `value`.
    pub fn from_value(&mut self, value: &Value) -> EvalResult<TermId> {
        enum Task<'a> {
            Visit(&'a Value),
            Join,
        }
        let nil = self.store.nil();
        let mut tasks = vec![Task::Visit(value)];
        let mut built: Vec<TermId> = Vec::new();
        while let Some(task) = tasks.pop() {
            match task {
                Task::Visit(Value::Nil) => built.push(nil),
                Task::Visit(Value::Number(n)) => built.push(self.store.number(*n)?),
                Task::Visit(Value::Pair(head, tail)) => {
                    tasks.push(Task::Join);
                    tasks.push(Task::Visit(tail.as_ref()));
                    tasks.push(Task::Visit(head.as_ref()));
                }
                Task::Join => {
                    let tail = built.pop().unwrap_or(nil);
                    let head = built.pop().unwrap_or(nil);
                    built.push(self.store.cons(head, tail)?);
                }
            }
        }
        Ok(built.pop().unwrap_or(nil))
    }

    /// Render `id` in `ap` notation without evaluating it, truncated after a
    /// fixed number of tokens.
    pub fn describe(&self, id: TermId) -> String {
        let mut out = String::new();
        let mut stack = vec![id];
        let mut tokens = 0;
        while let Some(next) = stack.pop() {
            if tokens == DESCRIBE_BUDGET {
                out.push_str(" ...");
                break;
            }
            if tokens > 0 {
                out.push(' ');
            }
            tokens += 1;
            match self.store.term(next) {
                Term::Number(n) => {
                    let _ = write!(out, "{n}");
                }
                Term::Nil => out.push_str("nil"),
                Term::Primitive(p) => out.push_str(p.name()),
                Term::Reference(name) => out.push_str(name),
                Term::Bits(bits) => {
                    let _ = write!(out, "[{bits}]");
                }
                Term::List(items) => {
                    let _ = write!(out, "(list of {})", items.len());
                }
                &Term::Application(function, argument) => {
                    out.push_str("ap");
                    stack.push(argument);
                    stack.push(function);
                }
            }
        }
        out
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}
