//! The `zext_attached_surface_manager_v1` interface
//!
//! Global entry point of the extension. A client creates one attached surface
//! object per (drawable, parent toplevel) pair through
//! [`get_attached_surface`][Request::GetAttachedSurface]; destroying the
//! manager does not affect surfaces already created through it.

use crate::protocol::{
    check_for_signature, AllowNull, Argument, ArgumentType, Interface, InvalidMessage, Message,
    MessageDesc, ANONYMOUS_INTERFACE,
};
use crate::surface;

/// Interface `zext_attached_surface_manager_v1`
pub static INTERFACE: Interface = Interface {
    name: "zext_attached_surface_manager_v1",
    version: 1,
    requests: &[
        MessageDesc {
            name: "get_attached_surface",
            since: 1,
            is_destructor: false,
            signature: &[
                ArgumentType::NewId,
                ArgumentType::Object(AllowNull::No),
                ArgumentType::Object(AllowNull::No),
            ],
            child_interface: Some(&surface::INTERFACE),
            arg_interfaces: &[&ANONYMOUS_INTERFACE, &ANONYMOUS_INTERFACE],
        },
        MessageDesc {
            name: "destroy",
            since: 1,
            is_destructor: true,
            signature: &[],
            child_interface: None,
            arg_interfaces: &[],
        },
    ],
    events: &[],
};

/// A request received on the manager interface
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request<Id> {
    /// Attach a drawable to a toplevel window
    ///
    /// Creates a new `zext_attached_surface_v1` object controlling `drawable`,
    /// positioned relative to `parent`. The drawable gains the attached
    /// surface role; attaching a drawable that already has a role is a
    /// protocol error.
    GetAttachedSurface {
        /// id of the attached surface object to create
        id: Id,
        /// the surface whose content is being attached
        drawable: Id,
        /// the toplevel window to attach to
        parent: Id,
    },
    /// Destroy the manager object
    Destroy,
}

impl<Id: Clone> Request<Id> {
    /// Parse a message received on the manager interface
    pub fn from_message(msg: Message<Id>) -> Result<Self, InvalidMessage> {
        match msg.opcode {
            0 => match &msg.args[..] {
                [Argument::NewId(id), Argument::Object(drawable), Argument::Object(parent)] => {
                    Ok(Request::GetAttachedSurface {
                        id: id.clone(),
                        drawable: drawable.clone(),
                        parent: parent.clone(),
                    })
                }
                _ => Err(InvalidMessage::BadSignature {
                    interface: INTERFACE.name,
                    message: "get_attached_surface",
                }),
            },
            1 => {
                if msg.args.is_empty() {
                    Ok(Request::Destroy)
                } else {
                    Err(InvalidMessage::BadSignature {
                        interface: INTERFACE.name,
                        message: "destroy",
                    })
                }
            }
            opcode => Err(InvalidMessage::UnknownOpcode { interface: INTERFACE.name, opcode }),
        }
    }

    /// Serialize this request into a message sent by object `sender_id`
    pub fn into_message(self, sender_id: Id) -> Message<Id> {
        let msg = match self {
            Request::GetAttachedSurface { id, drawable, parent } => crate::message!(
                sender_id,
                0,
                [Argument::NewId(id), Argument::Object(drawable), Argument::Object(parent)],
            ),
            Request::Destroy => crate::message!(sender_id, 1, []),
        };
        debug_assert!(check_for_signature(
            INTERFACE.requests[msg.opcode as usize].signature,
            &msg.args
        ));
        msg
    }
}

/// Protocol errors the compositor may raise on the manager
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum Error {
    /// the drawable cannot back an attached surface or already has a role
    InvalidDrawable = 0,
    /// the parent is not a toplevel window with a backing scene node
    InvalidParent = 1,
}

impl TryFrom<u32> for Error {
    type Error = ();

    fn try_from(val: u32) -> Result<Self, ()> {
        match val {
            0 => Ok(Error::InvalidDrawable),
            1 => Ok(Error::InvalidParent),
            _ => Err(()),
        }
    }
}

impl From<Error> for u32 {
    fn from(val: Error) -> u32 {
        val as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::same_interface;

    #[test]
    fn get_attached_surface_roundtrip() {
        let req = Request::GetAttachedSurface { id: 7u32, drawable: 2, parent: 3 };
        let msg = req.clone().into_message(1);
        assert_eq!(msg.opcode, 0);
        assert_eq!(Request::from_message(msg), Ok(req));
    }

    #[test]
    fn destroy_roundtrip() {
        let msg = Request::<u32>::Destroy.into_message(1);
        assert_eq!(msg.opcode, 1);
        assert!(INTERFACE.requests[1].is_destructor);
        assert_eq!(Request::from_message(msg), Ok(Request::Destroy));
    }

    #[test]
    fn malformed_messages_are_rejected() {
        let bad_arity = crate::message!(1u32, 0, [Argument::NewId(7)]);
        assert!(matches!(
            Request::from_message(bad_arity),
            Err(InvalidMessage::BadSignature { message: "get_attached_surface", .. })
        ));
        let bad_types = crate::message!(1u32, 0, [
            Argument::Uint(7),
            Argument::Object(2),
            Argument::Object(3),
        ]);
        assert!(matches!(
            Request::from_message(bad_types),
            Err(InvalidMessage::BadSignature { .. })
        ));
        let bad_opcode = crate::message!(1u32, 9, []);
        assert!(matches!(
            Request::from_message(bad_opcode),
            Err(InvalidMessage::UnknownOpcode { opcode: 9, .. })
        ));
    }

    #[test]
    fn creation_points_at_the_surface_interface() {
        let child = INTERFACE.requests[0].child_interface.unwrap();
        assert!(same_interface(child, &surface::INTERFACE));
    }

    #[test]
    fn error_codes() {
        assert_eq!(u32::from(Error::InvalidDrawable), 0);
        assert_eq!(u32::from(Error::InvalidParent), 1);
        assert_eq!(Error::try_from(1), Ok(Error::InvalidParent));
        assert_eq!(Error::try_from(2), Err(()));
    }
}
