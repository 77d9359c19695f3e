//! Program loading and named evaluation.

use galaxy_eval::{EvalError, Evaluator, Renderer, Transport};
use galaxy_parser::parse_source;
use galaxy_types::{SourceFile, Value};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::error::{VmError, VmResult};

/// Equations every machine starts with: the two reference drawing
/// protocols.
///
/// ```text
/// ap ap statelessdraw s v = ( 0 , nil , ( ( v ) ) )
/// ap ap statefuldraw s v  = ( 0 , ap ap cons v s , ( ap ap cons v s ) )
/// ```
pub const PRELUDE: &str = "\
statelessdraw = ap ap c ap ap b b ap ap b ap b ap cons 0 ap ap c ap ap b b cons ap ap c cons nil ap ap c ap ap b cons ap ap c cons nil nil
statefuldraw = ap ap b ap b ap ap s ap ap b ap b ap cons 0 ap ap c ap ap b b cons ap ap c cons nil ap ap c cons nil ap c cons
";

/// What a named definition evaluated to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Evaluation {
    /// A number, `nil` or a structure of pairs, fully forced.
    Value(Value),
    /// Anything else, described in its weak head normal form.
    Normal(String),
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Evaluation::Value(value) => write!(f, "{value}"),
            Evaluation::Normal(term) => f.write_str(term),
        }
    }
}

/// An evaluator together with the programs loaded into it.
///
/// Terms allocated after the last load are scratch: [`reclaim`](Self::reclaim)
/// drops them and keeps the loaded program.
pub struct Machine {
    evaluator: Evaluator,
    hasher: Sha256,
    loaded: Vec<String>,
    /// Store length right after the last successful bind.
    watermark: usize,
}

impl Machine {
    /// A machine holding the primitives and the [`PRELUDE`].
    pub fn new() -> VmResult<Self> {
        let mut machine = Self::bare();
        machine.bind(&SourceFile::new("<prelude>", PRELUDE))?;
        Ok(machine)
    }

    /// A machine holding only the primitives.
    pub fn bare() -> Self {
        let evaluator = Evaluator::new();
        let watermark = evaluator.store().len();
        Self {
            evaluator,
            hasher: Sha256::new(),
            loaded: Vec::new(),
            watermark,
        }
    }

    /// Parse `file` and bind its equations. Nothing is bound if any line
    /// fails to parse. Returns the number of equations loaded.
    pub fn load(&mut self, file: &SourceFile) -> VmResult<usize> {
        let count = self.bind(file)?;
        self.hasher.update(file.source.as_bytes());
        self.loaded.push(file.name.clone());
        log::debug!(
            "loaded {} equations from {}, fingerprint {}",
            count,
            file.name,
            self.fingerprint()
        );
        Ok(count)
    }

    fn bind(&mut self, file: &SourceFile) -> VmResult<usize> {
        let program = parse_source(file, self.evaluator.store_mut())?;
        for equation in &program.equations {
            if self.evaluator.define(&equation.name, equation.term).is_some() {
                log::warn!(
                    "{}:{}: '{}' rebinds an earlier definition",
                    program.file,
                    equation.span,
                    equation.name
                );
            }
        }
        self.watermark = self.evaluator.store().len();
        Ok(program.len())
    }

    /// Drop every term allocated since the last load, along with memos
    /// pointing at them.
    pub fn reclaim(&mut self) {
        let before = self.evaluator.store().len();
        self.evaluator.store_mut().truncate(self.watermark);
        log::trace!(
            "reclaimed {} terms",
            before - self.evaluator.store().len()
        );
    }

    /// Names of the files loaded so far, in order.
    pub fn loaded(&self) -> &[String] {
        &self.loaded
    }

    /// Hex SHA-256 of every loaded source, in load order.
    pub fn fingerprint(&self) -> String {
        self.hasher
            .clone()
            .finalize()
            .iter()
            .map(|byte| format!("{byte:02x}"))
            .collect()
    }

    /// Evaluate the definition bound to `name`.
    pub fn evaluate(&mut self, name: &str) -> VmResult<Evaluation> {
        let term = self.evaluator.resolve(name)?;
        let whnf = self
            .evaluator
            .evaluate(term)
            .map_err(VmError::from_eval)?;
        match self.evaluator.to_value(whnf) {
            Ok(value) => Ok(Evaluation::Value(value)),
            Err(EvalError::UnsupportedShape(_)) => {
                Ok(Evaluation::Normal(self.evaluator.describe(whnf)))
            }
            Err(err) => Err(VmError::from_eval(err)),
        }
    }

    pub fn set_transport(&mut self, transport: impl Transport + 'static) {
        self.evaluator.host_mut().set_transport(transport);
    }

    pub fn set_renderer(&mut self, renderer: impl Renderer + 'static) {
        self.evaluator.host_mut().set_renderer(renderer);
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    pub fn evaluator_mut(&mut self) -> &mut Evaluator {
        &mut self.evaluator
    }
}

impl fmt::Debug for Machine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Machine")
            .field("loaded", &self.loaded)
            .field("definitions", &self.evaluator.definitions().len())
            .field("terms", &self.evaluator.store().len())
            .finish()
    }
}
