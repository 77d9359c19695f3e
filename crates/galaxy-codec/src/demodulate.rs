//! Bit string → value.

use galaxy_types::Value;

use crate::error::{CodecError, CodecResult};

/// Demodulate a complete bit string. Bits left over after the value are an
/// error.
pub fn demodulate(bits: &str) -> CodecResult<Value> {
    let mut demodulator = Demodulator::new(bits)?;
    let value = demodulator.read_value()?;
    let remaining = demodulator.remaining();
    if remaining > 0 {
        return Err(CodecError::TrailingBits {
            position: demodulator.position(),
            count: remaining,
        });
    }
    Ok(value)
}

/// Cursor over a bit string shared by every nested read.
#[derive(Debug)]
pub struct Demodulator<'a> {
    bits: &'a [u8],
    pos: usize,
}

impl<'a> Demodulator<'a> {
    /// Validate that `bits` holds only `0`/`1` characters.
    pub fn new(bits: &'a str) -> CodecResult<Self> {
        if let Some((position, found)) = bits.char_indices().find(|&(_, c)| c != '0' && c != '1') {
            return Err(CodecError::InvalidCharacter { position, found });
        }
        Ok(Self {
            bits: bits.as_bytes(),
            pos: 0,
        })
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.bits.len() - self.pos
    }

    /// Read one value. Pairs are assembled with an explicit stack: each open
    /// slot holds either nothing yet or the finished head awaiting its tail.
    pub fn read_value(&mut self) -> CodecResult<Value> {
        let mut open: Vec<Option<Value>> = Vec::new();
        loop {
            let mut value = match self.take(2)? {
                b"00" => Value::Nil,
                b"11" => {
                    open.push(None);
                    continue;
                }
                b"01" => Value::Number(self.read_number(false)?),
                _ => Value::Number(self.read_number(true)?),
            };
            loop {
                match open.pop() {
                    None => return Ok(value),
                    Some(None) => {
                        open.push(Some(value));
                        break;
                    }
                    Some(Some(head)) => value = Value::pair(head, value),
                }
            }
        }
    }

    /// Read the unary nibble count and magnitude following a sign header.
    fn read_number(&mut self, negative: bool) -> CodecResult<i64> {
        let start = self.pos;
        let mut nibbles = 0;
        loop {
            match self.bits.get(self.pos) {
                Some(b'1') => nibbles += 1,
                Some(_) => break,
                None => return Err(CodecError::UnterminatedLength { position: start }),
            }
            self.pos += 1;
        }
        self.pos += 1;

        let mut magnitude: u64 = 0;
        for &bit in self.take(nibbles * 4)? {
            magnitude = magnitude
                .checked_mul(2)
                .and_then(|m| m.checked_add(u64::from(bit - b'0')))
                .ok_or(CodecError::Overflow { position: start })?;
        }

        let value = if negative {
            0i64.checked_sub_unsigned(magnitude)
        } else {
            i64::try_from(magnitude).ok()
        };
        value.ok_or(CodecError::Overflow { position: start })
    }

    fn take(&mut self, count: usize) -> CodecResult<&'a [u8]> {
        let available = self.remaining();
        if available < count {
            return Err(CodecError::Truncated {
                position: self.pos,
                needed: count - available,
            });
        }
        let slice = &self.bits[self.pos..self.pos + count];
        self.pos += count;
        Ok(slice)
    }
}
