//! The `zext_attached_surface_v1` interface
//!
//! Controls a single attached surface. Position, size and anchoring are
//! double buffered: requests accumulate in a pending set that the compositor
//! applies when the underlying drawable commits new content. Sizing is
//! negotiated through [`configure`][Event::Configure] /
//! [`ack_configure`][Request::AckConfigure]: the compositor proposes a size
//! fitting the space around the parent, and the client must acknowledge the
//! proposal by its serial before the surface is mapped.

use crate::protocol::{
    check_for_signature, Argument, ArgumentType, Interface, InvalidMessage, Message, MessageDesc,
    WEnum,
};

/// Interface `zext_attached_surface_v1`
pub static INTERFACE: Interface = Interface {
    name: "zext_attached_surface_v1",
    version: 1,
    requests: &[
        MessageDesc {
            name: "set_anchor",
            since: 1,
            is_destructor: false,
            signature: &[ArgumentType::Uint, ArgumentType::Int, ArgumentType::Int],
            child_interface: None,
            arg_interfaces: &[],
        },
        MessageDesc {
            name: "set_position",
            since: 1,
            is_destructor: false,
            signature: &[ArgumentType::Int, ArgumentType::Int],
            child_interface: None,
            arg_interfaces: &[],
        },
        MessageDesc {
            name: "set_size",
            since: 1,
            is_destructor: false,
            signature: &[ArgumentType::Uint, ArgumentType::Uint],
            child_interface: None,
            arg_interfaces: &[],
        },
        MessageDesc {
            name: "ack_configure",
            since: 1,
            is_destructor: false,
            signature: &[ArgumentType::Uint],
            child_interface: None,
            arg_interfaces: &[],
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
    events: &[
        MessageDesc {
            name: "configure",
            since: 1,
            is_destructor: false,
            signature: &[ArgumentType::Uint, ArgumentType::Uint, ArgumentType::Uint],
            child_interface: None,
            arg_interfaces: &[],
        },
        MessageDesc {
            name: "closed",
            since: 1,
            is_destructor: false,
            signature: &[],
            child_interface: None,
            arg_interfaces: &[],
        },
    ],
};

/// The parent edge an attached surface is anchored to
///
/// An anchored surface is laid out against one edge of its parent and keeps
/// tracking that edge when the parent moves or resizes. [`Anchor::None`]
/// disables anchoring; the surface then sits at the position set by
/// [`set_position`][Request::SetPosition].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum Anchor {
    /// free positioning, no edge tracking
    None = 0,
    /// above the parent's top edge
    Top = 1,
    /// below the parent's bottom edge
    Bottom = 2,
    /// left of the parent's left edge
    Left = 3,
    /// right of the parent's right edge
    Right = 4,
}

impl TryFrom<u32> for Anchor {
    type Error = ();

    fn try_from(val: u32) -> Result<Self, ()> {
        match val {
            0 => Ok(Anchor::None),
            1 => Ok(Anchor::Top),
            2 => Ok(Anchor::Bottom),
            3 => Ok(Anchor::Left),
            4 => Ok(Anchor::Right),
            _ => Err(()),
        }
    }
}

impl From<Anchor> for u32 {
    fn from(val: Anchor) -> u32 {
        val as u32
    }
}

/// A request received on an attached surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    /// Anchor the surface to one of the parent's edges
    ///
    /// `margin` is the gap between the parent edge and the surface; `offset`
    /// slides the surface along that edge. Takes effect on the next commit of
    /// the drawable.
    SetAnchor {
        /// the edge to anchor to
        anchor: WEnum<Anchor>,
        /// distance from the parent edge
        margin: i32,
        /// displacement along the parent edge
        offset: i32,
    },
    /// Set the position relative to the parent
    ///
    /// Only meaningful while the anchor is [`Anchor::None`]. Takes effect on
    /// the next commit of the drawable.
    SetPosition {
        /// horizontal position
        x: i32,
        /// vertical position
        y: i32,
    },
    /// Request a size for the surface
    ///
    /// The compositor replies with a [`configure`][Event::Configure] carrying
    /// the size it actually grants, which may be smaller if the anchored space
    /// is limited.
    SetSize {
        /// requested width
        width: u32,
        /// requested height
        height: u32,
    },
    /// Acknowledge a configure event
    ///
    /// The serial must be the one carried by the configure being acknowledged;
    /// any other value is ignored.
    AckConfigure {
        /// serial of the configure event
        serial: u32,
    },
    /// Destroy the attached surface object
    Destroy,
}

impl Request {
    /// Parse a message received on an attached surface
    pub fn from_message<Id>(msg: Message<Id>) -> Result<Self, InvalidMessage> {
        let bad = |message| InvalidMessage::BadSignature { interface: INTERFACE.name, message };
        match msg.opcode {
            0 => match msg.args[..] {
                [Argument::Uint(anchor), Argument::Int(margin), Argument::Int(offset)] => {
                    Ok(Request::SetAnchor { anchor: WEnum::from(anchor), margin, offset })
                }
                _ => Err(bad("set_anchor")),
            },
            1 => match msg.args[..] {
                [Argument::Int(x), Argument::Int(y)] => Ok(Request::SetPosition { x, y }),
                _ => Err(bad("set_position")),
            },
            2 => match msg.args[..] {
                [Argument::Uint(width), Argument::Uint(height)] => {
                    Ok(Request::SetSize { width, height })
                }
                _ => Err(bad("set_size")),
            },
            3 => match msg.args[..] {
                [Argument::Uint(serial)] => Ok(Request::AckConfigure { serial }),
                _ => Err(bad("ack_configure")),
            },
            4 => {
                if msg.args.is_empty() {
                    Ok(Request::Destroy)
                } else {
                    Err(bad("destroy"))
                }
            }
            opcode => Err(InvalidMessage::UnknownOpcode { interface: INTERFACE.name, opcode }),
        }
    }

    /// Serialize this request into a message sent by object `sender_id`
    pub fn into_message<Id>(self, sender_id: Id) -> Message<Id> {
        let msg = match self {
            Request::SetAnchor { anchor, margin, offset } => crate::message!(
                sender_id,
                0,
                [Argument::Uint(anchor.into()), Argument::Int(margin), Argument::Int(offset)],
            ),
            Request::SetPosition { x, y } => {
                crate::message!(sender_id, 1, [Argument::Int(x), Argument::Int(y)])
            }
            Request::SetSize { width, height } => {
                crate::message!(sender_id, 2, [Argument::Uint(width), Argument::Uint(height)])
            }
            Request::AckConfigure { serial } => {
                crate::message!(sender_id, 3, [Argument::Uint(serial)])
            }
            Request::Destroy => crate::message!(sender_id, 4, []),
        };
        debug_assert!(check_for_signature(
            INTERFACE.requests[msg.opcode as usize].signature,
            &msg.args
        ));
        msg
    }
}

/// An event sent by the compositor on an attached surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Propose a size for the surface
    ///
    /// The client must [`ack_configure`][Request::AckConfigure] with the same
    /// serial and then commit the drawable for the surface to be mapped.
    Configure {
        /// serial identifying this configure
        serial: u32,
        /// granted width
        width: u32,
        /// granted height
        height: u32,
    },
    /// The parent toplevel was destroyed
    ///
    /// The surface will no longer be shown; the client should destroy the
    /// object.
    Closed,
}

impl Event {
    /// Parse a message received on an attached surface
    pub fn from_message<Id>(msg: Message<Id>) -> Result<Self, InvalidMessage> {
        match msg.opcode {
            0 => match msg.args[..] {
                [Argument::Uint(serial), Argument::Uint(width), Argument::Uint(height)] => {
                    Ok(Event::Configure { serial, width, height })
                }
                _ => Err(InvalidMessage::BadSignature {
                    interface: INTERFACE.name,
                    message: "configure",
                }),
            },
            1 => {
                if msg.args.is_empty() {
                    Ok(Event::Closed)
                } else {
                    Err(InvalidMessage::BadSignature {
                        interface: INTERFACE.name,
                        message: "closed",
                    })
                }
            }
            opcode => Err(InvalidMessage::UnknownOpcode { interface: INTERFACE.name, opcode }),
        }
    }

    /// Serialize this event into a message sent by object `sender_id`
    pub fn into_message<Id>(self, sender_id: Id) -> Message<Id> {
        let msg = match self {
            Event::Configure { serial, width, height } => crate::message!(
                sender_id,
                0,
                [Argument::Uint(serial), Argument::Uint(width), Argument::Uint(height)],
            ),
            Event::Closed => crate::message!(sender_id, 1, []),
        };
        debug_assert!(check_for_signature(
            INTERFACE.events[msg.opcode as usize].signature,
            &msg.args
        ));
        msg
    }
}
