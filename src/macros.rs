/// Implements [`TypedEntity`](crate::runtime::TypedEntity) for a type with a fixed descriptor.
///
/// ```rust
/// use machkit::runtime::{self, TypeDescriptor, BASE_TYPE};
///
/// static SYMBOL: TypeDescriptor = TypeDescriptor::subclass(&BASE_TYPE).named("symbol");
///
/// struct Symbol {
///     value: u64,
/// }
///
/// machkit::typed_entity!(Symbol => SYMBOL);
///
/// assert_eq!(runtime::name_of(&Symbol { value: 0x1000 }), "symbol");
/// ```
#[macro_export]
macro_rules! typed_entity {
    ($entity:ty => $descriptor:path) => {
        impl $crate::runtime::TypedEntity for $entity {
            fn descriptor(&self) -> &'static $crate::runtime::TypeDescriptor {
                &$descriptor
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }
        }
    };
}
