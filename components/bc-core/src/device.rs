use core::fmt;

use crate::errno::Errno;

/// Outcome of an operation on a peripheral handle that did not succeed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The handle was never bound; the operation was skipped.
    Absent,
    /// The driver reported an error code.
    Errno(Errno),
}

impl From<Errno> for Error {
    fn from(err: Errno) -> Self {
        Error::Errno(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Absent => write!(f, "absent"),
            Error::Errno(errno) => write!(f, "{}", errno),
        }
    }
}

/// A peripheral handle bound to a fixed label.
///
/// A handle is bound once at acquisition. If the lookup failed it stays absent for the
/// rest of the program: there is deliberately no way to rebind it.
pub struct Device<T> {
    label: &'static str,
    inner: Option<T>,
}

impl<T> Device<T> {
    pub fn bind(label: &'static str, inner: Option<T>) -> Self {
        match inner {
            Some(_) => debug!("Device[{}] bound", label),
            None => warn!("Device[{}] not available", label),
        }
        Self { label, inner }
    }

    pub fn absent(label: &'static str) -> Self {
        Self::bind(label, None)
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn is_ready(&self) -> bool {
        self.inner.is_some()
    }

    pub fn get(&self) -> Result<&T, Error> {
        self.inner.as_ref().ok_or(Error::Absent)
    }

    pub fn get_mut(&mut self) -> Result<&mut T, Error> {
        self.inner.as_mut().ok_or(Error::Absent)
    }

    pub(crate) fn into_inner(self) -> Option<T> {
        self.inner
    }
}
