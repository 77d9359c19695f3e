//! Value → bit string.

use galaxy_types::Value;

/// Modulate a value into its `0`/`1` string.
pub fn modulate(value: &Value) -> String {
    let mut modulator = Modulator::new();
    modulator.write_value(value);
    modulator.finish()
}

/// Incremental modulator; values appended one after another share one buffer.
#[derive(Debug, Default)]
pub struct Modulator {
    out: String,
}

impl Modulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one value. Nested pairs are walked with an explicit stack,
    /// heads before tails.
    pub fn write_value(&mut self, value: &Value) {
        let mut stack = vec![value];
        while let Some(value) = stack.pop() {
            match value {
                Value::Nil => self.out.push_str("00"),
                Value::Number(n) => self.write_number(*n),
                Value::Pair(head, tail) => {
                    self.out.push_str("11");
                    stack.push(tail);
                    stack.push(head);
                }
            }
        }
    }

    /// Sign header, unary nibble count, then the zero-padded magnitude.
    pub fn write_number(&mut self, n: i64) {
        self.out.push_str(if n >= 0 { "01" } else { "10" });
        if n == 0 {
            self.out.push('0');
            return;
        }
        let magnitude = n.unsigned_abs();
        let width = (u64::BITS - magnitude.leading_zeros()) as usize;
        let nibbles = width.div_ceil(4);
        self.out.extend(std::iter::repeat('1').take(nibbles));
        self.out.push('0');
        self.out
            .push_str(&format!("{magnitude:0width$b}", width = nibbles * 4));
    }

    pub fn finish(self) -> String {
        self.out
    }
}
