//! Host collaborators: the rendering surface and the wire transport.
//!
//! The evaluator owns a [`Host`] holding whatever the embedding program
//! installed. `draw` plots through the [`Renderer`]; `send` and the
//! interaction driver talk to the peer through the [`Transport`].

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

use crate::error::{EvalError, EvalResult};

// ── Rendering ─────────────────────────────────────────────────────────────

/// An integer point in picture coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}]", self.x, self.y)
    }
}

/// RGB drawing color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    /// Starting color of every round: a darkened gray.
    pub const BASE: Color = Color::rgb(89, 89, 89);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// One brightening step: each channel divided by 0.7 and clamped at
    /// 255. Non-zero channels below 3 are lifted to 3 first so they keep
    /// growing, and black becomes `(3, 3, 3)`.
    pub fn brighter(self) -> Color {
        const MIN: u8 = 3;
        if self == Color::rgb(0, 0, 0) {
            return Color::rgb(MIN, MIN, MIN);
        }
        let step = |c: u8| {
            let c = if c > 0 && c < MIN { MIN } else { c };
            (f64::from(c) / 0.7).min(255.0) as u8
        };
        Color::rgb(step(self.r), step(self.g), step(self.b))
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BASE
    }
}

/// The pixel surface the `draw` primitive plots on.
pub trait Renderer {
    /// Plot every point in `color`.
    fn draw_points(&mut self, points: &[Point], color: Color);

    /// Wipe the surface before a new round is rendered.
    fn clear(&mut self) {}
}

/// One recorded `draw` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Drawing {
    pub points: Vec<Point>,
    pub color: Color,
}

/// A renderer that keeps every draw call in memory.
///
/// Clones share the same recording, so a handle kept by the caller sees
/// the draws made through the copy installed in a [`Host`].
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    drawings: Rc<RefCell<Vec<Drawing>>>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the draws recorded since the last clear.
    pub fn drawings(&self) -> Vec<Drawing> {
        self.drawings.borrow().clone()
    }
}

impl Renderer for RecordingRenderer {
    fn draw_points(&mut self, points: &[Point], color: Color) {
        self.drawings.borrow_mut().push(Drawing {
            points: points.to_vec(),
            color,
        });
    }

    fn clear(&mut self) {
        self.drawings.borrow_mut().clear();
    }
}

// ── Transport ─────────────────────────────────────────────────────────────

/// Failure reported by a transport.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The peer answered with a non-success status.
    #[error("peer answered with status {0}")]
    Status(u16),

    /// The request could not be delivered or the answer not read.
    #[error("{0}")]
    Io(String),
}

/// Carries one modulated request to the peer and returns its answer body.
///
/// Implementations block until the answer arrives; timeouts and retries are
/// theirs to decide.
pub trait Transport {
    fn send(&mut self, body: &str) -> Result<String, TransportError>;
}

impl<F> Transport for F
where
    F: FnMut(&str) -> Result<String, TransportError>,
{
    fn send(&mut self, body: &str) -> Result<String, TransportError> {
        self(body)
    }
}

// ── Host ──────────────────────────────────────────────────────────────────

/// The collaborators installed in an evaluator, plus the drawing color.
#[derive(Default)]
pub struct Host {
    transport: Option<Box<dyn Transport>>,
    renderer: Option<Box<dyn Renderer>>,
    color: Color,
}

impl Host {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_transport(&mut self, transport: impl Transport + 'static) {
        self.transport = Some(Box::new(transport));
    }

    pub fn set_renderer(&mut self, renderer: impl Renderer + 'static) {
        self.renderer = Some(Box::new(renderer));
    }

    /// The color the next draw will use.
    pub fn color(&self) -> Color {
        self.color
    }

    /// Send one request body through the transport.
    pub fn send(&mut self, body: &str) -> EvalResult<String> {
        let transport = self.transport.as_mut().ok_or(EvalError::NoTransport)?;
        log::trace!("send: {body}");
        let response = transport.send(body)?;
        log::trace!("receive: {response}");
        Ok(response)
    }

    /// Plot `points` in the current color, then brighten it for the next draw.
    /// Without a renderer only the color advances.
    pub fn draw(&mut self, points: &[Point]) {
        log::trace!("draw {} points in {:?}", points.len(), self.color);
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.draw_points(points, self.color);
        }
        self.color = self.color.brighter();
    }

    /// Wipe the surface and reset the color for a new round.
    pub fn begin_frame(&mut self, color: Color) {
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.clear();
        }
        self.color = color;
    }
}

impl fmt::Debug for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Host")
            .field("transport", &self.transport.is_some())
            .field("renderer", &self.renderer.is_some())
            .field("color", &self.color)
            .finish()
    }
}
