//! Cold-Start Instrumentation
//!
//! Measures how long a process takes to create its main page, show its first
//! meaningful content and finish painting its content list. Built on
//! [`perftrace::Trace`]:
//!
//! - [`StartupTraces`]: the three traces, owned by the process root
//! - [`PaintReporter`]: the single stop entry point every producer calls
//! - [`VisibilityTracker`] / [`ListViewportTracker`]: headless producers
//! - [`StartupConfig`]: thresholds, budget and sink options
//!
//! # Example
//!
//! ```rust
//! use startup::{Rect, StartupConfig, StartupInstrumentation};
//!
//! let startup = StartupInstrumentation::new(&StartupConfig::default()).unwrap();
//! startup.begin();
//! startup.page_created();
//!
//! let screen = Rect::from_origin(0.0, 0.0, 400.0, 800.0);
//! startup.header.on_layout(&Rect::from_origin(16.0, 40.0, 200.0, 32.0), &screen);
//! startup.list.on_visible_items(&[0, 1, 2]);
//!
//! assert!(startup.traces.is_complete());
//! ```

mod config;
mod error;
mod instrumentation;
mod signal;
mod traces;
mod visibility;

pub use config::{validate_threshold, StartupConfig, DEFAULT_VISIBILITY_THRESHOLD};
pub use error::{ConfigError, ConfigResult};
pub use instrumentation::StartupInstrumentation;
pub use signal::{PaintReporter, PaintSignal};
pub use traces::StartupTraces;
pub use visibility::{visible_fraction, ListViewportTracker, Rect, Visibility, VisibilityTracker};
