//! # shotvault-core
//!
//! Core library for shotvault: publishes a rendered asset (a single file or
//! an image sequence) into a versioned, convention-governed directory layout
//! and computes the payload needed to register that publish with an external
//! tracking service.
//!
//! ## Overview
//!
//! - **Sequence normalization**: discover an image sequence on disk, validate
//!   its padding and consecutiveness, and remap it onto the canonical
//!   1001-anchored frame range ([`sequence`])
//! - **Version resolution**: derive the next 3-digit version number from what
//!   already exists on disk ([`version`])
//! - **Path building**: compose collision-free, convention-compliant output
//!   directories and filenames ([`paths`])
//! - **Publish orchestration**: classify the submission, optionally encode a
//!   preview proxy, copy source material into the version directory, and emit
//!   the tracking payload ([`publish`])
//! - **Tracking contract**: the narrow request/response trait the tracking
//!   layer implements, plus the driver that feeds a finished publish through
//!   it ([`tracking`])
//!
//! The per-task naming conventions ([`convention`]) are plain immutable data,
//! loaded once from configuration (see the `shotvault-config` crate) and
//! passed by reference into every component.

/// Per-task naming/layout conventions and extension checks
pub mod convention;

/// Error types and the crate-wide Result alias
pub mod error;

/// Extension to MIME-type lookup
pub mod mime;

/// Output directory and filename composition
pub mod paths;

/// External-transcoder boundary for preview proxies
pub mod proxy;

/// The top-level publish operation
pub mod publish;

/// User-input path cleanup
pub mod sanitize;

/// Image-sequence discovery and normalization
pub mod sequence;

/// Tracking-service contract and registration driver
pub mod tracking;

/// Next-version resolution from on-disk state
pub mod version;

pub use convention::{ConventionTable, FileKind, KindRole, VersionConvention, match_extension};
pub use error::{PublishError, Result};
pub use mime::mime_type;
pub use paths::{PublishPathBuilder, sequence_code};
pub use proxy::ProxyEncoder;
pub use publish::{PublishOrchestrator, PublishRequest, PublishResult};
pub use sanitize::sanitize_path;
pub use sequence::{SequenceDescriptor, normalize_sequence};
pub use tracking::{TrackingService, register_publish};
pub use version::next_version;
