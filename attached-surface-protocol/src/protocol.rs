//! Types and utilities for manipulating protocol messages

/// Describes whether an argument may have a null value.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AllowNull {
    /// Null values are allowed.
    Yes,
    /// Null values are forbidden.
    No,
}

/// Enum of possible argument types as recognized by the wire
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ArgumentType {
    /// An integer argument. Represented by a [`i32`].
    Int,
    /// An unsigned integer argument. Represented by a [`u32`].
    Uint,
    /// Id of a protocol object
    Object(AllowNull),
    /// Id of a newly created protocol object
    NewId,
}

impl ArgumentType {
    /// Returns true if the type of the argument is the same.
    pub fn same_type(self, other: Self) -> bool {
        std::mem::discriminant(&self) == std::mem::discriminant(&other)
    }
}

/// Enum of possible argument of the protocol
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Argument<Id> {
    /// An integer argument. Represented by a [`i32`].
    Int(i32),
    /// An unsigned integer argument. Represented by a [`u32`].
    Uint(u32),
    /// Id of a protocol object
    Object(Id),
    /// Id of a newly created protocol object
    NewId(Id),
}

impl<Id> Argument<Id> {
    /// Retrieve the type of a given argument instance
    pub fn get_type(&self) -> ArgumentType {
        match *self {
            Self::Int(_) => ArgumentType::Int,
            Self::Uint(_) => ArgumentType::Uint,
            Self::Object(_) => ArgumentType::Object(AllowNull::Yes),
            Self::NewId(_) => ArgumentType::NewId,
        }
    }
}

/// Description of a protocol interface.
///
/// An interface describes the possible requests and events that a client and the
/// compositor use to communicate.
#[derive(Debug)]
pub struct Interface {
    /// The name of the interface.
    pub name: &'static str,
    /// The maximum supported version of the interface.
    pub version: u32,
    /// A list that describes every request this interface supports.
    pub requests: &'static [MessageDesc],
    /// A list that describes every event this interface supports.
    pub events: &'static [MessageDesc],
}

/// Wire metadata of a given message
#[derive(Copy, Clone, Debug)]
pub struct MessageDesc {
    /// Name of this message
    pub name: &'static str,
    /// Signature of the message
    pub signature: &'static [ArgumentType],
    /// Minimum required version of the interface
    pub since: u32,
    /// Whether this message is a destructor
    pub is_destructor: bool,
    /// The child interface created from this message.
    pub child_interface: Option<&'static Interface>,
    /// The interfaces passed into this message as arguments.
    pub arg_interfaces: &'static [&'static Interface],
}

/// Special interface representing an anonymous object
pub static ANONYMOUS_INTERFACE: Interface =
    Interface { name: "<anonymous>", version: 0, requests: &[], events: &[] };

/// Number of arguments that are stocked inline in a `Message` before allocating
pub const INLINE_ARGS: usize = 4;

/// Represents a message that has been sent from some object.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message<Id> {
    /// The id of the object that sent the message.
    pub sender_id: Id,
    /// The opcode of the message.
    pub opcode: u16,
    /// The arguments of the message.
    pub args: smallvec::SmallVec<[Argument<Id>; INLINE_ARGS]>,
}

/// Returns true if the two interfaces are the same.
#[inline]
pub fn same_interface(a: &'static Interface, b: &'static Interface) -> bool {
    std::ptr::eq(a, b) || a.name == b.name
}

pub(crate) fn check_for_signature<Id>(signature: &[ArgumentType], args: &[Argument<Id>]) -> bool {
    if signature.len() != args.len() {
        return false;
    }
    for (typ, arg) in signature.iter().copied().zip(args.iter()) {
        if !arg.get_type().same_type(typ) {
            return false;
        }
    }
    true
}

/// Error generated when a message does not fit the interface it was sent on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidMessage {
    /// The opcode does not exist on this interface
    UnknownOpcode {
        /// The name of the interface
        interface: &'static str,
        /// The offending opcode
        opcode: u16,
    },
    /// The arguments do not match the signature of the message
    BadSignature {
        /// The name of the interface
        interface: &'static str,
        /// The name of the message
        message: &'static str,
    },
}

impl std::error::Error for InvalidMessage {}

impl std::fmt::Display for InvalidMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownOpcode { interface, opcode } => {
                write!(f, "Unknown opcode {opcode} for interface {interface}")
            }
            Self::BadSignature { interface, message } => {
                write!(f, "Bad signature for message {interface}.{message}")
            }
        }
    }
}

/// An enum value in the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WEnum<T> {
    /// The interpreted value
    Value(T),
    /// The stored value does not match one defined by the protocol file
    Unknown(u32),
}

/// Error representing an unknown numeric variant for a [`WEnum`]
#[derive(Debug, Copy, Clone)]
pub struct WEnumError {
    typ: &'static str,
    value: u32,
}

impl std::error::Error for WEnumError {}

impl std::fmt::Display for WEnumError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Unknown numeric value {} for enum {}", self.value, self.typ)
    }
}

impl<T> WEnum<T> {
    /// Convert this [`WEnum`] into a result
    ///
    /// This can be used to take advantage of the numerous helper methods on [`Result`] if you
    /// don't plan to handle the unknown case of this enum.
    ///
    /// You can also use the [`From`] and [`Into`] traits to perform the same conversion.
    #[inline]
    pub fn into_result(self) -> Result<T, WEnumError> {
        match self {
            Self::Value(v) => Ok(v),
            Self::Unknown(value) => Err(WEnumError { typ: std::any::type_name::<T>(), value }),
        }
    }
}

impl<T> From<WEnum<T>> for Result<T, WEnumError> {
    fn from(me: WEnum<T>) -> Self {
        me.into_result()
    }
}

impl<T: TryFrom<u32>> From<u32> for WEnum<T> {
    /// Constructs an enum from the integer format used by the wire.
    fn from(v: u32) -> Self {
        match T::try_from(v) {
            Ok(t) => Self::Value(t),
            Err(_) => Self::Unknown(v),
        }
    }
}

impl<T: Into<u32>> From<WEnum<T>> for u32 {
    /// Converts an enum into the numerical form used by the wire.
    fn from(enu: WEnum<T>) -> u32 {
        match enu {
            WEnum::Unknown(u) => u,
            WEnum::Value(t) => t.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Anchor;

    #[test]
    fn signature_mismatch_is_detected() {
        let sig = &[ArgumentType::Uint, ArgumentType::Int];
        assert!(check_for_signature::<u32>(sig, &[Argument::Uint(1), Argument::Int(-2)]));
        assert!(!check_for_signature::<u32>(sig, &[Argument::Int(1), Argument::Int(-2)]));
        assert!(!check_for_signature::<u32>(sig, &[Argument::Uint(1)]));
    }

    #[test]
    fn object_args_compare_by_discriminant() {
        assert!(ArgumentType::Object(AllowNull::Yes)
            .same_type(ArgumentType::Object(AllowNull::No)));
        assert!(!ArgumentType::Object(AllowNull::Yes).same_type(ArgumentType::NewId));
    }

    #[test]
    fn wenum_roundtrip() {
        assert_eq!(WEnum::<Anchor>::from(4u32), WEnum::Value(Anchor::Right));
        assert_eq!(WEnum::<Anchor>::from(17u32), WEnum::Unknown(17));
        assert!(WEnum::<Anchor>::from(17u32).into_result().is_err());
        assert_eq!(u32::from(WEnum::Value(Anchor::Left)), 3);
        assert_eq!(u32::from(WEnum::<Anchor>::Unknown(17)), 17);
    }
}
