//! Viewport: zoom, pan and coordinate transforms
//!
//! `ViewportController` owns the scale and offset that map graph space onto
//! the canvas. It never touches the graph and never triggers a fetch; data
//! arriving from the service does not move the view.
//!
//! Panning is a two-state machine (`Idle`, `Panning`). Click and double-click
//! detection lives separately in [`gesture`].

pub mod gesture;

use crate::geometry::{GraphPoint, ScreenPoint, ScreenVector, ZoomScale};
use crate::graph::NodeId;
use tracing::warn;

pub use gesture::{ClickDetector, ClickKind};

/// Zoom and hit-test tunables
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportConfig {
    /// Multiplier applied by one zoom step
    pub zoom_factor: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    /// Click tolerance around node centers, in screen pixels at every zoom level
    pub hit_radius: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            zoom_factor: 1.2,
            min_scale: 0.3,
            max_scale: 3.0,
            hit_radius: 12.0,
        }
    }
}

impl ViewportConfig {
    /// Repair values the controller cannot zoom with. Reversed scale bounds
    /// are swapped; non-positive or non-finite bounds, a zoom factor that does
    /// not enlarge, and a negative hit radius fall back to the defaults.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let mut config = self;
        let usable = |v: f64| v.is_finite() && v > 0.0;

        if !(usable(config.min_scale) && usable(config.max_scale)) {
            warn!(
                "Unusable scale bounds [{}, {}], using [{}, {}]",
                config.min_scale, config.max_scale, defaults.min_scale, defaults.max_scale
            );
            config.min_scale = defaults.min_scale;
            config.max_scale = defaults.max_scale;
        } else if config.min_scale > config.max_scale {
            warn!("Scale bounds [{}, {}] are reversed", config.min_scale, config.max_scale);
            std::mem::swap(&mut config.min_scale, &mut config.max_scale);
        }
        if !(config.zoom_factor.is_finite() && config.zoom_factor > 1.0) {
            warn!("Unusable zoom factor {}, using {}", config.zoom_factor, defaults.zoom_factor);
            config.zoom_factor = defaults.zoom_factor;
        }
        if !(config.hit_radius.is_finite() && config.hit_radius >= 0.0) {
            warn!("Unusable hit radius {}, using {}", config.hit_radius, defaults.hit_radius);
            config.hit_radius = defaults.hit_radius;
        }
        config
    }
}

/// Drag-to-pan state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanState {
    Idle,
    /// `anchor` is the pointer position minus the offset at drag start
    Panning { anchor: ScreenPoint },
}

/// Owns `scale` and `offset`; converts between screen and graph space
#[derive(Debug, Clone)]
pub struct ViewportController {
    config: ViewportConfig,
    scale: f64,
    offset: ScreenVector,
    pan: PanState,
}

impl ViewportController {
    pub fn new(config: ViewportConfig) -> Self {
        Self {
            config: config.sanitized(),
            scale: 1.0,
            offset: ScreenVector::zero(),
            pan: PanState::Idle,
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn offset(&self) -> ScreenVector {
        self.offset
    }

    pub fn pan_state(&self) -> PanState {
        self.pan
    }

    pub fn is_panning(&self) -> bool {
        matches!(self.pan, PanState::Panning { .. })
    }

    /// Multiply the scale by the zoom factor, clamped to the allowed range
    pub fn zoom_in(&mut self) {
        self.scale = self.clamp_scale(self.scale * self.config.zoom_factor);
    }

    /// Divide the scale by the zoom factor, clamped to the allowed range
    pub fn zoom_out(&mut self) {
        self.scale = self.clamp_scale(self.scale / self.config.zoom_factor);
    }

    /// Zoom by `factor` while keeping the graph point under `screen_point`
    /// fixed on screen (mouse-wheel zoom).
    pub fn zoom_at(&mut self, screen_point: ScreenPoint, factor: f64) {
        if !(factor.is_finite() && factor > 0.0) {
            return;
        }
        let pinned = self.to_graph(screen_point);
        self.scale = self.clamp_scale(self.scale * factor);
        self.offset = screen_point - pinned * self.zoom();
    }

    /// Recenter: scale 1, no offset. Not a bounding-box fit.
    pub fn fit(&mut self) {
        self.scale = 1.0;
        self.offset = ScreenVector::zero();
    }

    /// `Idle -> Panning`. Restarting a drag mid-pan re-anchors it.
    pub fn begin_pan(&mut self, screen_point: ScreenPoint) {
        self.pan = PanState::Panning {
            anchor: screen_point - self.offset,
        };
    }

    /// Move the view with the pointer. No-op while `Idle`; returns whether the
    /// offset was updated.
    pub fn update_pan(&mut self, screen_point: ScreenPoint) -> bool {
        match self.pan {
            PanState::Panning { anchor } => {
                self.offset = screen_point - anchor;
                true
            }
            PanState::Idle => false,
        }
    }

    /// `Panning -> Idle`
    pub fn end_pan(&mut self) {
        self.pan = PanState::Idle;
    }

    /// `graph_point × scale + offset`
    pub fn to_screen(&self, graph_point: GraphPoint) -> ScreenPoint {
        graph_point * self.zoom() + self.offset
    }

    /// `(screen_point − offset) / scale`
    pub fn to_graph(&self, screen_point: ScreenPoint) -> GraphPoint {
        (screen_point - self.offset) / self.zoom()
    }

    /// Nearest node whose center is within the hit radius of `screen_point`.
    ///
    /// Distances are measured in screen space so targets keep a usable size
    /// when zoomed out.
    pub fn hit_test<'a, I>(&self, screen_point: ScreenPoint, positions: I) -> Option<&'a NodeId>
    where
        I: IntoIterator<Item = (&'a NodeId, &'a GraphPoint)>,
    {
        let radius_sq = self.config.hit_radius * self.config.hit_radius;
        positions
            .into_iter()
            .map(|(id, p)| (id, (self.to_screen(*p) - screen_point).square_length()))
            .filter(|(_, dist_sq)| *dist_sq <= radius_sq)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    fn zoom(&self) -> ZoomScale {
        ZoomScale::new(self.scale)
    }

    fn clamp_scale(&self, scale: f64) -> f64 {
        scale.max(self.config.min_scale).min(self.config.max_scale)
    }
}

impl Default for ViewportController {
    fn default() -> Self {
        Self::new(ViewportConfig::default())
    }
}
