//! Client side of the jsdrop upload pipeline.
//!
//! [`UploadClient`] packages one selected file, sends it to the upload endpoint
//! and interprets the answer; [`AlertPresenter`] turns the outcome into a
//! transient notification that removes itself after a minute. The CLI renders
//! notifications on a terminal through its own [`AlertSink`].

pub mod alerts;
pub mod upload;

pub use alerts::{Alert, AlertId, AlertPresenter, AlertSink, AlertStyle, Severity};
pub use upload::{ClientOutcome, SelectedFile, UploadClient};
