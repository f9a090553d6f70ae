//! wgpu device and surface.
//!
//! Stands in for the GL context and function loader: the instance and
//! surface are the context bound to the window, adapter + device acquisition
//! is the loader. Validation errors are routed into a [`DiagnosticSink`] so
//! shader and pipeline failures can be reported as compiler output.

mod diagnostics;
mod gpu;
mod init;
mod surface;

pub use diagnostics::DiagnosticSink;
pub(crate) use diagnostics::join_diagnostics;
pub use gpu::{Gpu, GpuFrame};
pub use init::{GpuInit, SurfaceOptions};
pub use surface::SurfaceErrorAction;
