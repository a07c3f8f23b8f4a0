//! Compositor-side implementation of the attached-surface protocol extension
//!
//! An attached surface is a client surface glued to a toplevel window and
//! positioned relative to it, either at an explicit offset or anchored to one
//! of the toplevel's edges with a server-negotiated size. This crate contains
//! the whole compositor-side state machine of the extension:
//!
//! - the [`AttachedSurfaceManager`], which validates creation requests, owns
//!   the registry of live surfaces and the configure serial counter, and
//!   repositions anchored surfaces when their parents move or resize;
//! - the per-object [`AttachedSurface`] with its double-buffered properties
//!   and the configure/ack_configure handshake;
//! - the pure sizing and positioning rules of anchoring ([`anchor`]).
//!
//! Everything else the extension touches is reached through narrow seams: the
//! rendering scene graph through the [`scene::SceneGraph`] trait, output
//! geometry through [`compositor::OutputLayout`], and the surrounding
//! compositor's surface and window objects through the concrete types in
//! [`compositor`], which notify this crate of commits and destructions via
//! [`signal::Signal`]s. The crate does no I/O of its own: protocol messages
//! enter as the typed requests of [`attached_surface_protocol`] and leave as
//! its typed events.
//!
//! Everything here is single threaded. The compositor thread owns all state;
//! objects are shared with `Rc` and mutated through cells.
//!
//! ## Logging
//!
//! This crate can generate some runtime error messages (notably when a client
//! acknowledges the wrong serial). By default those messages are printed to
//! stderr. If you activate the `log` cargo feature, they will instead be
//! piped through the `log` crate.

#![warn(missing_docs, missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

// internal imports for dispatching logging depending on the `log` feature
#[cfg(feature = "log")]
#[allow(unused_imports)]
use log::{debug as log_debug, error as log_error, info as log_info, warn as log_warn};
#[cfg(not(feature = "log"))]
#[allow(unused_imports)]
use std::{
    eprintln as log_error, eprintln as log_warn, eprintln as log_info, eprintln as log_debug,
};

pub mod anchor;
pub mod compositor;
pub mod geometry;
pub mod manager;
pub mod scene;
pub mod serial;
pub mod signal;
pub mod surface;

pub use attached_surface_protocol as protocol;

pub use manager::{AttachedSurfaceId, AttachedSurfaceManager, CreateError};
pub use surface::{AttachedSurface, ROLE};
