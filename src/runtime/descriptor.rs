//! Static type descriptors and the root of every descriptor chain.

use std::{any::Any, fmt, iter, ptr};

use crate::runtime::{format_bounded, name_of, Context, TypedEntity};

/// Returns the diagnostic context an entity is attached to, if any.
pub type GetContextFn = fn(&dyn TypedEntity) -> Option<&Context>;

/// Compares an entity (the receiver, whose chain supplied the function) against another.
pub type EqualFn = fn(&dyn TypedEntity, &dyn TypedEntity) -> bool;

/// Writes a description into a bounded buffer and returns the untruncated length.
///
/// Implementations should go through [`format_bounded`] so the truncation rules match the
/// root implementation.
pub type DescribeFn = fn(&dyn TypedEntity, &mut [u8]) -> usize;

/// The static description of a runtime type.
///
/// Descriptors form a single-inheritance chain through their parent link. Each dispatchable
/// slot (name, context lookup, equality, description) is optional; an operation walks from an
/// entity's own descriptor towards the root and uses the first descriptor that fills the slot.
/// [`BASE_TYPE`] fills every slot, and it is the only descriptor without a parent, so every
/// walk terminates with an answer.
///
/// Descriptors are compared by address. Declare them as `static` items, never `const`, so each
/// type has exactly one descriptor instance.
///
/// # Examples
///
/// ```rust
/// use machkit::runtime::{TypeDescriptor, BASE_TYPE};
///
/// static LOAD_COMMAND: TypeDescriptor = TypeDescriptor::subclass(&BASE_TYPE).named("load_command");
/// static SEGMENT_COMMAND: TypeDescriptor =
///     TypeDescriptor::subclass(&LOAD_COMMAND).named("segment_command");
///
/// assert!(SEGMENT_COMMAND.inherits_from(&BASE_TYPE));
/// assert_eq!(SEGMENT_COMMAND.depth(), 2);
/// ```
pub struct TypeDescriptor {
    parent: Option<&'static TypeDescriptor>,
    name: Option<&'static str>,
    get_context: Option<GetContextFn>,
    equal: Option<EqualFn>,
    describe: Option<DescribeFn>,
}

impl TypeDescriptor {
    /// Creates a descriptor deriving from `parent` that inherits every slot.
    #[must_use]
    pub const fn subclass(parent: &'static TypeDescriptor) -> Self {
        TypeDescriptor {
            parent: Some(parent),
            name: None,
            get_context: None,
            equal: None,
            describe: None,
        }
    }

    /// Sets the type name.
    ///
    /// Name lookup stops at the nearest descriptor that declares one, so `named("")` hides the
    /// names of all ancestors.
    #[must_use]
    pub const fn named(self, name: &'static str) -> Self {
        TypeDescriptor {
            name: Some(name),
            ..self
        }
    }

    /// Overrides the context lookup.
    #[must_use]
    pub const fn with_context(self, get_context: GetContextFn) -> Self {
        TypeDescriptor {
            get_context: Some(get_context),
            ..self
        }
    }

    /// Overrides equality.
    #[must_use]
    pub const fn with_equal(self, equal: EqualFn) -> Self {
        TypeDescriptor {
            equal: Some(equal),
            ..self
        }
    }

    /// Overrides the description.
    #[must_use]
    pub const fn with_describe(self, describe: DescribeFn) -> Self {
        TypeDescriptor {
            describe: Some(describe),
            ..self
        }
    }

    /// The parent descriptor; `None` only for [`BASE_TYPE`].
    #[must_use]
    pub fn parent(&self) -> Option<&'static TypeDescriptor> {
        self.parent
    }

    /// The name declared by this descriptor itself, without walking the chain.
    #[must_use]
    pub fn own_name(&self) -> Option<&'static str> {
        self.name
    }

    /// Iterates over this descriptor and then each ancestor up to the root.
    pub fn ancestors(&'static self) -> impl Iterator<Item = &'static TypeDescriptor> {
        iter::successors(Some(self), |descriptor| descriptor.parent)
    }

    /// Returns `true` if `other` is this descriptor or one of its ancestors.
    #[must_use]
    pub fn inherits_from(&'static self, other: &TypeDescriptor) -> bool {
        self.ancestors().any(|descriptor| ptr::eq(descriptor, other))
    }

    /// Number of links between this descriptor and the root.
    #[must_use]
    pub fn depth(&'static self) -> usize {
        self.ancestors().count() - 1
    }

    pub(crate) fn resolve_name(&'static self) -> &'static str {
        self.ancestors()
            .find_map(|descriptor| descriptor.name)
            .unwrap_or(BASE_NAME)
    }

    pub(crate) fn resolve_get_context(&'static self) -> GetContextFn {
        self.ancestors()
            .find_map(|descriptor| descriptor.get_context)
            .unwrap_or(base_get_context)
    }

    pub(crate) fn resolve_equal(&'static self) -> EqualFn {
        self.ancestors()
            .find_map(|descriptor| descriptor.equal)
            .unwrap_or(base_equal)
    }

    pub(crate) fn resolve_describe(&'static self) -> DescribeFn {
        self.ancestors()
            .find_map(|descriptor| descriptor.describe)
            .unwrap_or(base_describe)
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .field("parent", &self.parent.map(|parent| parent.name))
            .field("get_context", &self.get_context.is_some())
            .field("equal", &self.equal.is_some())
            .field("describe", &self.describe.is_some())
            .finish()
    }
}

const BASE_NAME: &str = "";

/// The root of every descriptor chain.
///
/// Its name is the empty string. It answers every slot: no context, identity equality, and a
/// `<name address>` description.
pub static BASE_TYPE: TypeDescriptor = TypeDescriptor {
    parent: None,
    name: Some(BASE_NAME),
    get_context: Some(base_get_context),
    equal: Some(base_equal),
    describe: Some(base_describe),
};

/// The data address of an entity, used for identity and in descriptions.
pub(crate) fn address(entity: &dyn TypedEntity) -> *const () {
    ptr::from_ref(entity).cast::<()>()
}

fn base_get_context(_entity: &dyn TypedEntity) -> Option<&Context> {
    None
}

// A struct and its first field can share an address, so the concrete type must match too.
fn base_equal(entity: &dyn TypedEntity, other: &dyn TypedEntity) -> bool {
    address(entity) == address(other)
        && Any::type_id(entity.as_any()) == Any::type_id(other.as_any())
}

fn base_describe(entity: &dyn TypedEntity, output: &mut [u8]) -> usize {
    format_bounded(
        output,
        format_args!("<{} {:p}>", name_of(entity), address(entity)),
    )
}
