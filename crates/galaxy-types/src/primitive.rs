//! The fixed set of built-in operators and their arities.

use std::fmt;

/// A built-in operator.
///
/// Every primitive has a fixed arity between 1 and 3. The reducer fires a
/// primitive only once its application spine carries exactly that many
/// arguments; with fewer it stays a partial application in normal form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Primitive {
    // ── Integer arithmetic ──
    Inc,
    Dec,
    Neg,
    Add,
    Mul,
    Div,
    Eq,
    Lt,
    Pwr2,

    // ── Selectors & combinators ──
    True,
    False,
    S,
    C,
    B,
    I,
    If0,

    // ── Pairs & lists ──
    Cons,
    Vec,
    Car,
    Cdr,
    IsNil,

    // ── Rendering ──
    Draw,
    MultipleDraw,
    Checkerboard,

    // ── Wire ──
    Mod,
    Dem,
    Modem,
    Send,

    // ── Interaction protocol ──
    F38,
    Interact,
}

impl Primitive {
    /// Every primitive, in declaration order.
    pub const ALL: &'static [Primitive] = &[
        Primitive::Inc,
        Primitive::Dec,
        Primitive::Neg,
        Primitive::Add,
        Primitive::Mul,
        Primitive::Div,
        Primitive::Eq,
        Primitive::Lt,
        Primitive::Pwr2,
        Primitive::True,
        Primitive::False,
        Primitive::S,
        Primitive::C,
        Primitive::B,
        Primitive::I,
        Primitive::If0,
        Primitive::Cons,
        Primitive::Vec,
        Primitive::Car,
        Primitive::Cdr,
        Primitive::IsNil,
        Primitive::Draw,
        Primitive::MultipleDraw,
        Primitive::Checkerboard,
        Primitive::Mod,
        Primitive::Dem,
        Primitive::Modem,
        Primitive::Send,
        Primitive::F38,
        Primitive::Interact,
    ];

    /// The name this primitive is bound to in the definition table.
    pub fn name(self) -> &'static str {
        match self {
            Self::Inc => "inc",
            Self::Dec => "dec",
            Self::Neg => "neg",
            Self::Add => "add",
            Self::Mul => "mul",
            Self::Div => "div",
            Self::Eq => "eq",
            Self::Lt => "lt",
            Self::Pwr2 => "pwr2",
            Self::True => "t",
            Self::False => "f",
            Self::S => "s",
            Self::C => "c",
            Self::B => "b",
            Self::I => "i",
            Self::If0 => "if0",
            Self::Cons => "cons",
            Self::Vec => "vec",
            Self::Car => "car",
            Self::Cdr => "cdr",
            Self::IsNil => "isnil",
            Self::Draw => "draw",
            Self::MultipleDraw => "multipledraw",
            Self::Checkerboard => "checkerboard",
            Self::Mod => "mod",
            Self::Dem => "dem",
            Self::Modem => "modem",
            Self::Send => "send",
            Self::F38 => "f38",
            Self::Interact => "interact",
        }
    }

    /// Number of arguments needed before the primitive fires.
    pub fn arity(self) -> usize {
        match self {
            Self::Inc
            | Self::Dec
            | Self::Neg
            | Self::Pwr2
            | Self::I
            | Self::Car
            | Self::Cdr
            | Self::IsNil
            | Self::Draw
            | Self::MultipleDraw
            | Self::Mod
            | Self::Dem
            | Self::Modem
            | Self::Send => 1,
            Self::Add
            | Self::Mul
            | Self::Div
            | Self::Eq
            | Self::Lt
            | Self::True
            | Self::False
            | Self::Checkerboard
            | Self::F38 => 2,
            Self::S | Self::C | Self::B | Self::If0 | Self::Cons | Self::Vec | Self::Interact => 3,
        }
    }

    /// Look a primitive up by its bound name.
    pub fn from_name(name: &str) -> Option<Primitive> {
        Self::ALL.iter().copied().find(|p| p.name() == name)
    }

    /// Position of this primitive in [`Primitive::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
