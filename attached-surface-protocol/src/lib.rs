//! Message-level definition of the attached-surface protocol extension
//!
//! An attached surface is a client surface glued to a toplevel window of
//! (possibly) another client: the compositor positions it relative to that
//! toplevel, either at an explicit offset or anchored to one of the
//! toplevel's edges, and negotiates its size through a configure/ack cycle.
//!
//! This crate describes the two interfaces of the extension,
//! `zext_attached_surface_manager_v1` ([`manager`]) and
//! `zext_attached_surface_v1` ([`surface`]), as typed requests and events
//! together with their wire metadata ([`protocol::Interface`] and
//! [`protocol::MessageDesc`] tables). It performs no I/O: converting between
//! the typed enums and [`protocol::Message`] values is the job of whatever
//! transport carries them, and the compositor-side state machine lives in the
//! `attached-surface-server` crate.

#![warn(missing_docs, missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

/// Reexport of the `smallvec` crate, which is part of this crate's public API.
pub extern crate smallvec;

/// Helper macro for quickly making a [`Message`][crate::protocol::Message]
#[macro_export]
macro_rules! message {
    ($sender_id: expr, $opcode: expr, [$($args: expr),* $(,)?] $(,)?) => {
        $crate::protocol::Message {
            sender_id: $sender_id,
            opcode: $opcode,
            args: $crate::smallvec::smallvec![$($args),*],
        }
    }
}

pub mod manager;
pub mod protocol;
pub mod surface;

pub use surface::Anchor;
