// Copyright 2026 the Coppice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pretty-printing and Chrome trace export for Coppice diagnostics.
//!
//! This crate provides [`TraceSink`](coppice_core::trace::TraceSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`] — human-readable one-line-per-event output.
//! - [`chrome::ChromeTraceExporter`] — writes Chrome Trace Event Format JSON
//!   for chrome://tracing or Perfetto.

pub mod chrome;
pub mod pretty;
