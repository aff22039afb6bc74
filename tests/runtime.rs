//! Integration tests for the type runtime.
//!
//! Builds a small image / load command / segment hierarchy the way a format parser would and
//! drives every runtime operation through it.

use machkit::{
    config::ContextConfig,
    runtime::{self, format_bounded, Context, TypeDescriptor, TypedEntity, BASE_TYPE},
    vm::VmRange,
};
use std::sync::Arc;

static IMAGE: TypeDescriptor = TypeDescriptor::subclass(&BASE_TYPE)
    .named("image")
    .with_context(image_context);
static LOAD_COMMAND: TypeDescriptor = TypeDescriptor::subclass(&BASE_TYPE)
    .named("load_command")
    .with_context(command_context)
    .with_equal(command_equal);
static SEGMENT: TypeDescriptor = TypeDescriptor::subclass(&LOAD_COMMAND)
    .named("segment")
    .with_describe(segment_describe);
static SEGMENT_64: TypeDescriptor = TypeDescriptor::subclass(&SEGMENT).named("segment_64");
static UUID: TypeDescriptor = TypeDescriptor::subclass(&LOAD_COMMAND);

struct Image {
    context: Context,
}

struct Segment {
    image: Arc<Image>,
    name: &'static str,
    range: VmRange,
}

struct Segment64 {
    image: Arc<Image>,
    range: VmRange,
}

struct Uuid {
    image: Arc<Image>,
    bytes: [u8; 16],
}

machkit::typed_entity!(Image => IMAGE);
machkit::typed_entity!(Segment => SEGMENT);
machkit::typed_entity!(Segment64 => SEGMENT_64);
machkit::typed_entity!(Uuid => UUID);

fn image_context(entity: &dyn TypedEntity) -> Option<&Context> {
    runtime::downcast::<Image>(entity).map(|image| &image.context)
}

fn command_context(entity: &dyn TypedEntity) -> Option<&Context> {
    let any = entity.as_any();
    let image = if let Some(segment) = any.downcast_ref::<Segment>() {
        &segment.image
    } else if let Some(segment) = any.downcast_ref::<Segment64>() {
        &segment.image
    } else {
        &any.downcast_ref::<Uuid>()?.image
    };
    Some(&image.context)
}

fn command_equal(entity: &dyn TypedEntity, other: &dyn TypedEntity) -> bool {
    match (
        runtime::downcast::<Uuid>(entity),
        runtime::downcast::<Uuid>(other),
    ) {
        (Some(a), Some(b)) => a.bytes == b.bytes,
        _ => std::ptr::addr_eq(entity, other),
    }
}

fn segment_describe(entity: &dyn TypedEntity, output: &mut [u8]) -> usize {
    match runtime::downcast::<Segment>(entity) {
        Some(segment) => format_bounded(
            output,
            format_args!("<{} {} {}>", runtime::name_of(entity), segment.name, segment.range),
        ),
        None => format_bounded(
            output,
            format_args!("<{} ?>", runtime::name_of(entity)),
        ),
    }
}

/// Routes the crate's trace records through the test harness; set `RUST_LOG=trace` to see them.
fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn image() -> Arc<Image> {
    Arc::new(Image {
        context: Context::new("/usr/lib/dyld", ContextConfig::quiet()),
    })
}

/// Every entity is a kind of the root, whatever its concrete type.
#[test]
fn test_root_in_every_chain() {
    init_logging();
    let image = image();
    let entities: Vec<Box<dyn TypedEntity>> = vec![
        Box::new(Segment {
            image: image.clone(),
            name: "__TEXT",
            range: VmRange::new(0x1000, 0x1000),
        }),
        Box::new(Segment64 {
            image: image.clone(),
            range: VmRange::new(0, 0x4000),
        }),
        Box::new(Uuid {
            image: image.clone(),
            bytes: [7; 16],
        }),
    ];

    for entity in &entities {
        assert!(runtime::is_kind_of(entity.as_ref(), &BASE_TYPE));
        assert!(runtime::is_kind_of(entity.as_ref(), &LOAD_COMMAND));
        assert!(!runtime::is_kind_of(entity.as_ref(), &IMAGE));
        assert!(!runtime::is_exactly(entity.as_ref(), &LOAD_COMMAND));
    }
    assert!(runtime::is_kind_of(image.as_ref(), &BASE_TYPE));
}

/// Exact checks do not walk the chain.
#[test]
fn test_exact_type() {
    init_logging();
    let segment = Segment64 {
        image: image(),
        range: VmRange::new(0, 0x4000),
    };
    assert!(runtime::is_exactly(&segment, &SEGMENT_64));
    assert_eq!(segment.range.length(), 0x4000);
    assert!(!runtime::is_exactly(&segment, &SEGMENT));
    assert!(runtime::is_kind_of(&segment, &SEGMENT));
}

/// Names resolve to the nearest named descriptor.
#[test]
fn test_names() {
    init_logging();
    let image = image();
    let uuid = Uuid {
        image: image.clone(),
        bytes: [0; 16],
    };
    let segment = Segment64 {
        image: image.clone(),
        range: VmRange::new(0, 0x4000),
    };

    assert_eq!(runtime::name_of(image.as_ref()), "image");
    assert_eq!(runtime::name_of(&uuid), "load_command");
    assert_eq!(runtime::name_of(&segment), "segment_64");
}

/// Context lookups are inherited from the nearest override.
#[test]
fn test_context_inherited() {
    init_logging();
    let image = image();
    let segment = Segment64 {
        image: image.clone(),
        range: VmRange::new(0, 0x4000),
    };

    let context = runtime::context_of(&segment).expect("segments report their image");
    assert_eq!(context.name(), "/usr/lib/dyld");
    assert!(std::ptr::eq(
        context,
        runtime::context_of(image.as_ref()).unwrap()
    ));
}

/// Equality overrides apply to every subtype, identity otherwise.
#[test]
fn test_equality() {
    init_logging();
    let image = image();
    let a = Uuid {
        image: image.clone(),
        bytes: [1; 16],
    };
    let b = Uuid {
        image: image.clone(),
        bytes: [1; 16],
    };
    let c = Uuid {
        image: image.clone(),
        bytes: [2; 16],
    };
    assert!(runtime::equal(&a, &b));
    assert!(runtime::equal(&b, &a));
    assert!(!runtime::equal(&a, &c));

    let s1 = Segment64 {
        image: image.clone(),
        range: VmRange::new(0, 0x10),
    };
    let s2 = Segment64 {
        image: image.clone(),
        range: VmRange::new(0, 0x10),
    };
    assert!(runtime::equal(&s1, &s1));
    assert!(!runtime::equal(&s1, &s2));

    // The image inherits identity equality from the root.
    assert!(runtime::equal(image.as_ref(), image.as_ref()));
    assert!(!runtime::equal(image.as_ref(), &a));
}

/// A subtype without its own description uses the nearest override.
#[test]
fn test_description_override() {
    init_logging();
    let segment = Segment {
        image: image(),
        name: "__TEXT",
        range: VmRange::new(0x1000, 0x1000),
    };
    assert_eq!(
        runtime::description(&segment),
        "<segment __TEXT [0x1000, 0x2000)>"
    );

    let segment64 = Segment64 {
        image: image(),
        range: VmRange::new(0, 0x4000),
    };
    assert_eq!(runtime::description(&segment64), "<segment_64 ?>");
}

/// With only the root describing, the output is the root format with the leaf's name.
#[test]
fn test_description_root_format() {
    init_logging();
    let uuid = Uuid {
        image: image(),
        bytes: [0; 16],
    };
    let expected = format!(
        "<{} {:p}>",
        runtime::name_of(&uuid),
        std::ptr::from_ref(&uuid).cast::<()>()
    );
    assert_eq!(runtime::description(&uuid), expected);

    let image = image();
    assert!(runtime::description(image.as_ref()).starts_with("<image 0x"));
}

/// Bounded descriptions truncate, terminate, and report the full length.
#[test]
fn test_description_truncation() {
    init_logging();
    let segment = Segment {
        image: image(),
        name: "__DATA",
        range: VmRange::new(0x4000, 0x100),
    };
    let full = runtime::description(&segment);

    let mut buffer = [0xAAu8; 10];
    let len = runtime::copy_description(&segment, &mut buffer);
    assert_eq!(len, full.len());
    assert_eq!(&buffer[..9], &full.as_bytes()[..9]);
    assert_eq!(buffer[9], 0);

    assert_eq!(runtime::copy_description(&segment, &mut []), full.len());
}

/// Entities can be shared across threads; descriptors are plain statics.
#[test]
fn test_concurrent_reads() {
    init_logging();
    let image = image();
    let segment = Arc::new(Segment {
        image: image.clone(),
        name: "__LINKEDIT",
        range: VmRange::new(0x8000, 0x200),
    });

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let segment = Arc::clone(&segment);
            std::thread::spawn(move || {
                assert!(runtime::is_kind_of(segment.as_ref(), &LOAD_COMMAND));
                runtime::description(segment.as_ref())
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(
            handle.join().unwrap(),
            "<segment __LINKEDIT [0x8000, 0x8200)>"
        );
    }
}
