//! Operational errors of the rill library.
//!
//! An `Error` is what a fallible Rust call returns. The same information is
//! mirrored into the calling thread's error slot (see `errno`) before the call
//! returns, so foreign callers that only see a NULL/status can fetch it.
//!
//! Contract violations (out-of-range `Pairs::get`) are NOT errors: they panic.

use std::fmt;
use std::io;
use std::panic::Location;

/// Error category, ABI-stable (`repr(C)`); `None` marks an empty error slot.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub enum ErrorKind {
    None = 0,
    /// Allocation refused by the allocator.
    NoMem = 1,
    /// Pairs buffer already at its configured maximum capacity.
    CapExceeded = 2,
    /// A required pointer argument was NULL.
    NullArg = 3,
    InvalidArg = 4,
    /// OS-level I/O failure, `errno` carries the OS error number.
    Io = 5,
    /// A panic was caught at the C boundary.
    Panicked = 6,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::None => "none",
            ErrorKind::NoMem => "out of memory",
            ErrorKind::CapExceeded => "capacity exceeded",
            ErrorKind::NullArg => "null argument",
            ErrorKind::InvalidArg => "invalid argument",
            ErrorKind::Io => "i/o error",
            ErrorKind::Panicked => "panicked",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
    errno: i32,
    msg: String,
    location: &'static Location<'static>,
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// New error located at the caller.
    #[track_caller]
    pub fn new(kind: ErrorKind, msg: impl Into<String>) -> Self {
        Self {
            kind,
            errno: 0,
            msg: msg.into(),
            location: Location::caller(),
        }
    }

    /// Wrap an `io::Error`, keeping its raw OS error number (0 if none).
    #[track_caller]
    pub fn from_io(e: &io::Error, msg: impl fmt::Display) -> Self {
        Self {
            kind: ErrorKind::Io,
            errno: e.raw_os_error().unwrap_or(0),
            msg: format!("{}: {}", msg, e),
            location: Location::caller(),
        }
    }

    pub fn with_errno(mut self, errno: i32) -> Self {
        self.errno = errno;
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn errno(&self) -> i32 {
        self.errno
    }

    pub fn message(&self) -> &str {
        &self.msg
    }

    pub fn file(&self) -> &'static str {
        self.location.file()
    }

    pub fn line(&self) -> u32 {
        self.location.line()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.msg)?;
        if self.errno != 0 {
            write!(f, " (errno {})", self.errno)?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_discriminants_are_stable() {
        assert_eq!(ErrorKind::None as i32, 0);
        assert_eq!(ErrorKind::NoMem as i32, 1);
        assert_eq!(ErrorKind::CapExceeded as i32, 2);
        assert_eq!(ErrorKind::NullArg as i32, 3);
        assert_eq!(ErrorKind::InvalidArg as i32, 4);
        assert_eq!(ErrorKind::Io as i32, 5);
        assert_eq!(ErrorKind::Panicked as i32, 6);
    }

    #[test]
    fn new_captures_caller_location() {
        let line = line!() + 1;
        let e = Error::new(ErrorKind::InvalidArg, "bad");
        assert_eq!(e.line(), line);
        assert!(e.file().ends_with("error.rs"), "{}", e.file());
        assert_eq!(e.errno(), 0);
    }

    #[test]
    fn from_io_keeps_os_errno() {
        let io = io::Error::from_raw_os_error(2);
        let e = Error::from_io(&io, "open x");
        assert_eq!(e.kind(), ErrorKind::Io);
        assert_eq!(e.errno(), 2);
        assert!(e.message().starts_with("open x: "), "{}", e.message());
    }

    #[test]
    fn display_includes_kind_and_errno() {
        let e = Error::new(ErrorKind::NoMem, "grow to 8").with_errno(12);
        assert_eq!(e.to_string(), "out of memory: grow to 8 (errno 12)");

        let e = Error::new(ErrorKind::CapExceeded, "full");
        assert_eq!(e.to_string(), "capacity exceeded: full");
    }

    #[test]
    fn error_is_send_sync_for_anyhow() {
        fn assert_send_sync<T: Send + Sync + 'static>() {}
        assert_send_sync::<Error>();
        let _: anyhow::Error = Error::new(ErrorKind::InvalidArg, "x").into();
    }
}
