//! Headless visibility checks that produce paint signals.
//!
//! A layout pass hands each tracker the geometry it observed; the tracker
//! decides whether its completion condition holds and, if so, reports its
//! signal. Trackers fire on every qualifying pass and rely on
//! [`PaintReporter`] to keep only the first one.

use crate::config::{validate_threshold, DEFAULT_VISIBILITY_THRESHOLD};
use crate::error::ConfigResult;
use crate::signal::{PaintReporter, PaintSignal};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// An axis-aligned rectangle in window coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub left: f32,
    /// Top edge
    pub top: f32,
    /// Right edge (exclusive)
    pub right: f32,
    /// Bottom edge (exclusive)
    pub bottom: f32,
}

impl Rect {
    /// A rectangle from its four edges.
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self { left, top, right, bottom }
    }

    /// A rectangle from an origin and a size.
    pub fn from_origin(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    /// Horizontal extent; negative if the edges are inverted.
    #[inline]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    /// Vertical extent; negative if the edges are inverted.
    #[inline]
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Width times height.
    #[inline]
    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// Area shared with `other`, zero if they do not overlap.
    pub fn intersection_area(&self, other: &Rect) -> f32 {
        let w = (self.right.min(other.right) - self.left.max(other.left)).max(0.0);
        let h = (self.bottom.min(other.bottom) - self.top.max(other.top)).max(0.0);
        w * h
    }
}

/// Fraction of `element` that lies inside `viewport`, in [0, 1].
///
/// Zero-area elements are never visible.
pub fn visible_fraction(element: &Rect, viewport: &Rect) -> f32 {
    let area = element.area();
    if area > 0.0 {
        (element.intersection_area(viewport) / area).min(1.0)
    } else {
        0.0
    }
}

/// Outcome of one visibility check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Visibility {
    /// At or above the threshold, with the visible fraction
    Visible(f32),
    /// Below the threshold
    Hidden,
}

/// Reports a signal when an element first crosses a visibility threshold.
#[derive(Debug, Clone)]
pub struct VisibilityTracker {
    signal: PaintSignal,
    threshold: f32,
    reporter: Arc<PaintReporter>,
}

impl VisibilityTracker {
    /// Track with the default 30% threshold.
    pub fn new(signal: PaintSignal, reporter: Arc<PaintReporter>) -> Self {
        Self {
            signal,
            threshold: DEFAULT_VISIBILITY_THRESHOLD,
            reporter,
        }
    }

    /// Track with a custom threshold in (0, 1].
    pub fn with_threshold(signal: PaintSignal, threshold: f32, reporter: Arc<PaintReporter>) -> ConfigResult<Self> {
        Ok(Self {
            signal,
            threshold: validate_threshold(threshold)?,
            reporter,
        })
    }

    /// Minimum visible fraction that counts as painted.
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Check the element after a layout pass and report if visible.
    pub fn on_layout(&self, element: &Rect, viewport: &Rect) -> Visibility {
        let fraction = visible_fraction(element, viewport);
        if fraction >= self.threshold {
            if let Some(ms) = self.reporter.report(self.signal) {
                tracing::debug!(target: "startup", signal = %self.signal, fraction, duration_ms = ms, "visibility threshold reached");
            }
            Visibility::Visible(fraction)
        } else {
            Visibility::Hidden
        }
    }
}

/// Reports full paint once a list viewport shows any item.
#[derive(Debug, Clone)]
pub struct ListViewportTracker {
    reporter: Arc<PaintReporter>,
}

impl ListViewportTracker {
    /// Report [`PaintSignal::FullyPainted`] through `reporter`.
    pub fn new(reporter: Arc<PaintReporter>) -> Self {
        Self { reporter }
    }

    /// Observe the indices currently laid out in the viewport.
    ///
    /// Returns `true` if any item is visible.
    pub fn on_visible_items(&self, visible: &[usize]) -> bool {
        if visible.is_empty() {
            return false;
        }
        if let Some(ms) = self.reporter.report(PaintSignal::FullyPainted) {
            tracing::debug!(target: "startup", visible_items = visible.len(), duration_ms = ms, "list painted");
        }
        true
    }
}
