use core::fmt;

/// Error number reported by a driver operation.
///
/// Stored as the positive errno value using the Zephyr numbering the console output has
/// always used; [`Errno::code`] gives the negative result code that ends up in
/// `ERROR: ... Update failed: <code>` lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Errno(u16);

impl Errno {
    pub const EIO: Errno = Errno(5);
    pub const ENODEV: Errno = Errno(19);
    pub const EINVAL: Errno = Errno(22);
    pub const ENOSPC: Errno = Errno(28);
    pub const ENODATA: Errno = Errno(61);
    pub const EBADMSG: Errno = Errno(77);
    pub const ENOTSUP: Errno = Errno(134);

    /// Negative result code, as returned by the C style driver API.
    pub const fn code(self) -> i32 {
        -(self.0 as i32)
    }
}

impl fmt::Display for Errno {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
