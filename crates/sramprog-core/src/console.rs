//! Serial console collaborator trait
//!
//! Commands arrive as full text lines over a line-buffered serial
//! transport; status messages and the formatted dump go back out the
//! same way.

/// Maximum accepted input line length in bytes; longer lines are
/// truncated by the transport.
pub const LINE_LEN: usize = 64;

/// One input line, bounded to [`LINE_LEN`]
pub type Line = heapless::String<LINE_LEN>;

/// Line-oriented serial console
pub trait Console {
    /// Whether a full input line can still be obtained.
    ///
    /// `true` means a call to [`read_line`](Self::read_line) will yield
    /// a line, blocking if necessary. `false` means the input side is
    /// exhausted (host transports report EOF here; embedded transports
    /// never do).
    fn line_available(&mut self) -> bool;

    /// Read the next input line, without its terminator
    fn read_line(&mut self) -> Line;

    /// Write one line of output
    fn write_line(&mut self, line: &str);
}
