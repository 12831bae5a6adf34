//! Coordinate spaces shared by the layout engine and the viewport
//!
//! Positions produced by the layout live in graph space. Pointer events and
//! rendering happen in screen space. Keeping the two as distinct euclid units
//! makes mixing them a type error instead of a visual glitch.

use euclid::{Point2D, Scale, Size2D, Vector2D};

/// Unit tag for layout coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphSpace;

/// Unit tag for pixel coordinates on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenSpace;

pub type GraphPoint = Point2D<f64, GraphSpace>;
pub type GraphVector = Vector2D<f64, GraphSpace>;
pub type ScreenPoint = Point2D<f64, ScreenSpace>;
pub type ScreenVector = Vector2D<f64, ScreenSpace>;
pub type CanvasSize = Size2D<f64, ScreenSpace>;

/// Zoom factor mapping graph units to screen pixels
pub type ZoomScale = Scale<f64, GraphSpace, ScreenSpace>;
