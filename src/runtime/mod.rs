//! A minimal single-inheritance type runtime for parsed entities.
//!
//! Parsers expose heterogeneous structures (images, load commands, segments, symbols) through
//! the [`TypedEntity`] trait, so generic code can compare, name and print them without knowing
//! their concrete types. Each entity points at a static [`TypeDescriptor`]; descriptors link to
//! their parent and form a chain that always ends at [`BASE_TYPE`].
//!
//! # Dispatch
//!
//! Every operation resolves by walking the chain from the entity's own descriptor towards the
//! root and using the first descriptor that supplies an implementation:
//!
//! | Operation | Slot | Root behavior |
//! |---|---|---|
//! | [`name_of`] | name | `""` |
//! | [`context_of`] | `get_context` | no context |
//! | [`equal`] | `equal` | identity |
//! | [`copy_description`] | `describe` | `<name address>` |
//!
//! [`is_exactly`] compares descriptors without walking, [`is_kind_of`] walks the whole chain.
//!
//! Equality is dispatched on the first operand only: `equal(a, b)` uses `a`'s chain and may
//! disagree with `equal(b, a)` if the two types override equality inconsistently.
//!
//! # Examples
//!
//! ```rust
//! use machkit::runtime::{self, TypeDescriptor, BASE_TYPE};
//!
//! static SEGMENT: TypeDescriptor = TypeDescriptor::subclass(&BASE_TYPE).named("segment");
//! static TEXT_SEGMENT: TypeDescriptor = TypeDescriptor::subclass(&SEGMENT);
//!
//! struct TextSegment {
//!     vmaddr: u64,
//! }
//!
//! machkit::typed_entity!(TextSegment => TEXT_SEGMENT);
//!
//! let text = TextSegment { vmaddr: 0x1_0000_0000 };
//! assert!(runtime::is_exactly(&text, &TEXT_SEGMENT));
//! assert!(runtime::is_kind_of(&text, &SEGMENT));
//! assert_eq!(runtime::name_of(&text), "segment");
//! assert!(runtime::description(&text).starts_with("<segment 0x"));
//! assert!(runtime::downcast::<TextSegment>(&text).is_some_and(|t| t.vmaddr == 0x1_0000_0000));
//! ```
//!
//! # Thread Safety
//!
//! Descriptors are immutable statics. The runtime only reads an entity's descriptor and hands
//! the entity to slot implementations; it never mutates or retains entities.

mod context;
mod describe;
mod descriptor;

pub use context::Context;
pub use describe::format_bounded;
pub use descriptor::{DescribeFn, EqualFn, GetContextFn, TypeDescriptor, BASE_TYPE};

use std::{any::Any, fmt, ptr};

/// A runtime-visible entity tagged with a [`TypeDescriptor`].
///
/// Implement it with [`typed_entity!`](crate::typed_entity) unless the descriptor depends on
/// the instance.
pub trait TypedEntity: Any {
    /// The descriptor of this entity's concrete type.
    fn descriptor(&self) -> &'static TypeDescriptor;

    /// The entity as [`Any`], for slot implementations that need concrete fields.
    fn as_any(&self) -> &dyn Any;
}

/// Returns the concrete entity behind `entity` if it is a `T`.
#[must_use]
pub fn downcast<T: TypedEntity>(entity: &dyn TypedEntity) -> Option<&T> {
    entity.as_any().downcast_ref::<T>()
}

/// Returns `true` if `entity`'s own descriptor is `descriptor`. Ancestors are not considered.
#[must_use]
pub fn is_exactly(entity: &dyn TypedEntity, descriptor: &TypeDescriptor) -> bool {
    ptr::eq(entity.descriptor(), descriptor)
}

/// Returns `true` if `descriptor` appears anywhere in `entity`'s chain.
///
/// Always `true` for [`BASE_TYPE`].
#[must_use]
pub fn is_kind_of(entity: &dyn TypedEntity, descriptor: &TypeDescriptor) -> bool {
    entity.descriptor().inherits_from(descriptor)
}

/// The name of the nearest descriptor in the chain that declares one.
#[must_use]
pub fn name_of(entity: &dyn TypedEntity) -> &'static str {
    entity.descriptor().resolve_name()
}

/// The diagnostic context `entity` is attached to, if any.
#[must_use]
pub fn context_of(entity: &dyn TypedEntity) -> Option<&Context> {
    (entity.descriptor().resolve_get_context())(entity)
}

/// Compares `entity` with `other` using the equality of `entity`'s chain.
///
/// The root equality is identity: same address and same concrete type. Zero-sized entities
/// carry no address of their own, so distinct values of one zero-sized type may compare
/// equal.
#[must_use]
pub fn equal(entity: &dyn TypedEntity, other: &dyn TypedEntity) -> bool {
    (entity.descriptor().resolve_equal())(entity, other)
}

/// Writes the description of `entity` into `output` and returns its untruncated length.
///
/// Truncation follows [`format_bounded`]: a call with an empty buffer writes nothing and
/// returns the size needed (excluding the terminator).
pub fn copy_description(entity: &dyn TypedEntity, output: &mut [u8]) -> usize {
    (entity.descriptor().resolve_describe())(entity, output)
}

/// Returns the full description of `entity`, sized with a pre-flight pass.
#[must_use]
pub fn description(entity: &dyn TypedEntity) -> String {
    let len = copy_description(entity, &mut []);
    let mut buffer = vec![0u8; len + 1];
    let written = copy_description(entity, &mut buffer);

    buffer.truncate(written.min(len));
    String::from_utf8_lossy(&buffer).into_owned()
}

impl fmt::Display for dyn TypedEntity + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&description(self))
    }
}

impl fmt::Debug for dyn TypedEntity + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&description(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ContextConfig;
    use std::sync::LazyLock;

    static COMMAND: TypeDescriptor = TypeDescriptor::subclass(&BASE_TYPE).named("command");
    static UUID_COMMAND: TypeDescriptor = TypeDescriptor::subclass(&COMMAND)
        .named("uuid_command")
        .with_equal(uuid_equal)
        .with_context(uuid_context);
    static OTHER: TypeDescriptor = TypeDescriptor::subclass(&BASE_TYPE).named("other");

    static CONTEXT: LazyLock<Context> =
        LazyLock::new(|| Context::new("test image", ContextConfig::quiet()));

    #[allow(dead_code)]
    struct Command {
        cmd: u32,
    }
    struct UuidCommand {
        uuid: [u8; 16],
    }
    #[allow(dead_code)]
    struct Other {
        id: u32,
    }

    static HEADER: TypeDescriptor = TypeDescriptor::subclass(&BASE_TYPE).named("header");
    static MARKER: TypeDescriptor = TypeDescriptor::subclass(&BASE_TYPE).named("marker");

    #[allow(dead_code)]
    #[repr(C)]
    struct Header {
        cmd: u32,
    }
    #[allow(dead_code)]
    #[repr(C)]
    struct Framed {
        header: Header,
        size: u32,
    }
    struct Marker;
    struct OtherMarker;

    crate::typed_entity!(Header => HEADER);
    crate::typed_entity!(Framed => COMMAND);
    crate::typed_entity!(Marker => MARKER);
    crate::typed_entity!(OtherMarker => MARKER);

    crate::typed_entity!(Command => COMMAND);
    crate::typed_entity!(UuidCommand => UUID_COMMAND);
    crate::typed_entity!(Other => OTHER);

    fn uuid_equal(entity: &dyn TypedEntity, other: &dyn TypedEntity) -> bool {
        match (downcast::<UuidCommand>(entity), downcast::<UuidCommand>(other)) {
            (Some(a), Some(b)) => a.uuid == b.uuid,
            _ => false,
        }
    }

    fn uuid_context(_entity: &dyn TypedEntity) -> Option<&Context> {
        Some(&*CONTEXT)
    }

    #[test]
    fn identity_checks() {
        let command = Command { cmd: 0x19 };
        assert!(is_exactly(&command, &COMMAND));
        assert!(!is_exactly(&command, &BASE_TYPE));
        assert!(is_kind_of(&command, &COMMAND));
        assert!(is_kind_of(&command, &BASE_TYPE));
        assert!(!is_kind_of(&command, &UUID_COMMAND));
        assert!(!is_kind_of(&command, &OTHER));

        let uuid = UuidCommand { uuid: [0; 16] };
        assert!(is_kind_of(&uuid, &COMMAND));
    }

    #[test]
    fn default_equality_is_identity() {
        let a = Command { cmd: 0x19 };
        let b = Other { id: 0x19 };
        assert!(equal(&a, &a));
        assert!(!equal(&a, &b));

        let boxed: Vec<Box<dyn TypedEntity>> =
            vec![Box::new(Other { id: 1 }), Box::new(Other { id: 1 })];
        assert!(equal(boxed[0].as_ref(), boxed[0].as_ref()));
        assert!(!equal(boxed[0].as_ref(), boxed[1].as_ref()));
    }

    #[test]
    fn identity_requires_same_type() {
        let framed = Framed {
            header: Header { cmd: 0x19 },
            size: 0x48,
        };
        assert_eq!(
            ptr::from_ref(&framed).cast::<()>(),
            ptr::from_ref(&framed.header).cast::<()>()
        );
        assert!(!equal(&framed, &framed.header));
        assert!(!equal(&framed.header, &framed));
        assert!(equal(&framed.header, &framed.header));

        let a: Box<dyn TypedEntity> = Box::new(Marker);
        let b: Box<dyn TypedEntity> = Box::new(OtherMarker);
        assert!(!equal(a.as_ref(), b.as_ref()));
        assert!(!equal(b.as_ref(), a.as_ref()));
        assert!(equal(a.as_ref(), a.as_ref()));
    }

    #[test]
    fn overridden_equality() {
        let a = UuidCommand { uuid: [1; 16] };
        let b = UuidCommand { uuid: [1; 16] };
        let c = UuidCommand { uuid: [2; 16] };
        assert!(equal(&a, &b));
        assert!(!equal(&a, &c));
    }

    #[test]
    fn equality_dispatches_on_first_operand() {
        let uuid = UuidCommand { uuid: [1; 16] };
        let command = Command { cmd: 0x19 };
        // Both directions resolve to different implementations.
        assert!(!equal(&uuid, &command));
        assert!(!equal(&command, &uuid));
        assert!(equal(&uuid, &uuid));
    }

    #[test]
    fn context_lookup() {
        assert!(context_of(&Command { cmd: 1 }).is_none());

        let uuid = UuidCommand { uuid: [0; 16] };
        let context = context_of(&uuid).expect("override supplies a context");
        assert_eq!(context.name(), "test image");
    }

    #[test]
    fn describe_uses_root_format() {
        let command = Command { cmd: 0x19 };
        let expected = format!(
            "<command {:p}>",
            ptr::from_ref(&command).cast::<()>()
        );
        assert_eq!(description(&command), expected);

        let entity: &dyn TypedEntity = &command;
        assert_eq!(entity.to_string(), expected);
        assert_eq!(format!("{entity:?}"), expected);
    }

    #[test]
    fn describe_preflight() {
        let command = Command { cmd: 0x19 };
        let len = copy_description(&command, &mut []);
        assert_eq!(len, description(&command).len());

        let mut small = [0u8; 4];
        assert_eq!(copy_description(&command, &mut small), len);
        assert_eq!(&small, b"<co\0");
    }
}
