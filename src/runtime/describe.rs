use std::fmt::{self, Write};

/// Writes into a fixed-capacity byte buffer, keeping one byte free for a NUL terminator,
/// while counting the full length of everything it was asked to write.
struct BoundedWriter<'a> {
    output: &'a mut [u8],
    written: usize,
    total: usize,
}

impl Write for BoundedWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let capacity = self.output.len().saturating_sub(1);
        let take = capacity.saturating_sub(self.written).min(s.len());

        self.output[self.written..self.written + take].copy_from_slice(&s.as_bytes()[..take]);
        self.written += take;
        self.total += s.len();
        Ok(())
    }
}

/// Formats `args` into `output` with bounded-format (`snprintf`) semantics.
///
/// At most `output.len() - 1` bytes are written, followed by a NUL terminator; nothing is
/// written into an empty buffer. The return value is the length the full text would have had,
/// so a caller can size a buffer with a first call on an empty slice.
///
/// # Examples
///
/// ```rust
/// use machkit::runtime::format_bounded;
///
/// let mut buf = [0u8; 6];
/// let len = format_bounded(&mut buf, format_args!("<{} {}>", "segment", 7));
/// assert_eq!(len, 11);
/// assert_eq!(&buf, b"<segm\0");
///
/// assert_eq!(format_bounded(&mut [], format_args!("{}", "abc")), 3);
/// ```
pub fn format_bounded(output: &mut [u8], args: fmt::Arguments<'_>) -> usize {
    let mut writer = BoundedWriter {
        output,
        written: 0,
        total: 0,
    };

    // BoundedWriter never fails; an error can only come from a Display impl, and the
    // text produced up to that point is kept.
    let _ = writer.write_fmt(args);

    if !writer.output.is_empty() {
        writer.output[writer.written] = 0;
    }

    writer.total
}
