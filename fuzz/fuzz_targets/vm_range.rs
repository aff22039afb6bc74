#![no_main]

use libfuzzer_sys::fuzz_target;
use machkit::{vm, vm::VmRange, ErrorCode};

fn word(data: &[u8], index: usize) -> u64 {
    let mut bytes = [0u8; 8];
    if let Some(chunk) = data.get(index * 8..index * 8 + 8) {
        bytes.copy_from_slice(chunk);
    }
    u64::from_le_bytes(bytes)
}

fn fits(location: u64, length: u64) -> bool {
    u128::from(location) + u128::from(length) <= u128::from(u64::MAX)
}

fuzz_target!(|data: &[u8]| {
    let (a, b, c, d, e) = (word(data, 0), word(data, 1), word(data, 2), word(data, 3), word(data, 4));
    let partial = data.last().is_some_and(|x| x & 1 == 1);

    assert_eq!(vm::add(a, b).ok(), a.checked_add(b));
    assert_eq!(vm::apply_offset(a, b).ok(), a.checked_add(b));
    assert_eq!(vm::subtract(a, b).ok(), a.checked_sub(b));
    assert_eq!(vm::check_length(a, b).is_ok(), fits(a, b));

    let outer = VmRange::new(a, b);
    let inner = VmRange::new(c, d);

    match outer.contains_address(e, c) {
        Ok(()) => {
            let address = u128::from(c) + u128::from(e);
            assert!(address >= u128::from(a) && address < u128::from(a) + u128::from(b));
        }
        Err(err) => assert!(matches!(err.code(), ErrorCode::Overflow | ErrorCode::NotFound)),
    }

    let full = outer.contains_range(inner, false);
    if full.is_ok() {
        assert!(c >= a && u128::from(c) + u128::from(d) <= u128::from(a) + u128::from(b));
        assert!(outer.contains_range(inner, true).is_ok());
    }

    if !fits(a, b) || !fits(c, d) {
        assert_eq!(
            outer.contains_range(inner, partial).unwrap_err().code(),
            ErrorCode::Overflow
        );
    }
});
