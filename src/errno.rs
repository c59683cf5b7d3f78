//! Per-thread error slot.
//!
//! Every thread owns exactly one `ErrorRecord`. Fallible operations write it
//! through `fail()` before returning `Err`, so a caller that only observed a
//! NULL/false at the C boundary can fetch the details on the same thread.
//!
//! Правила:
//! - слот пишется ДО сигнала об ошибке (fail() = record + Err);
//! - чтение без предшествующей ошибки вернёт то, что лежит в слоте
//!   (пустой sentinel или устаревшую запись), это ответственность вызывающего;
//! - другие потоки слот не видят никогда (thread_local!).

use std::cell::RefCell;
use std::fmt;
use std::io;
use std::os::raw::c_int;

use crate::consts::{ERR_FILE_CAP, ERR_MSG_CAP, ERR_NONE_TEXT};
use crate::error::{Error, ErrorKind, Result};

/// C-layout error record. Strings are NUL-terminated UTF-8, truncated on a
/// character boundary when they do not fit.
#[repr(C)]
#[derive(Clone, PartialEq, Eq)]
pub struct ErrorRecord {
    pub kind: ErrorKind,
    pub errno: c_int,
    pub line: u32,
    file: [u8; ERR_FILE_CAP],
    msg: [u8; ERR_MSG_CAP],
}

impl ErrorRecord {
    /// The "no error" sentinel.
    pub const EMPTY: ErrorRecord = ErrorRecord {
        kind: ErrorKind::None,
        errno: 0,
        line: 0,
        file: [0; ERR_FILE_CAP],
        msg: [0; ERR_MSG_CAP],
    };

    pub fn from_error(e: &Error) -> Self {
        let mut rec = Self::EMPTY;
        rec.kind = e.kind();
        rec.errno = e.errno();
        rec.line = e.line();
        copy_truncated(&mut rec.file, e.file());
        copy_truncated(&mut rec.msg, e.message());
        rec
    }

    pub fn is_empty(&self) -> bool {
        self.kind == ErrorKind::None
    }

    pub fn message(&self) -> &str {
        field_str(&self.msg)
    }

    pub fn file(&self) -> &str {
        field_str(&self.file)
    }

    /// snprintf-like rendering into `dst`.
    ///
    /// Writes at most `dst.len() - 1` bytes followed by NUL and returns the
    /// length of the full text, so `ret >= dst.len()` means truncation.
    /// An empty `dst` only measures.
    pub fn strerror(&self, dst: &mut [u8]) -> usize {
        let text = self.to_string();
        let bytes = text.as_bytes();
        if let Some(room) = dst.len().checked_sub(1) {
            let n = bytes.len().min(room);
            dst[..n].copy_from_slice(&bytes[..n]);
            dst[n] = 0;
        }
        bytes.len()
    }
}

impl Default for ErrorRecord {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str(ERR_NONE_TEXT);
        }
        write!(f, "<{}:{}> {}", self.file(), self.line, self.message())?;
        if self.errno != 0 {
            write!(f, " - {}", io::Error::from_raw_os_error(self.errno))?;
        }
        Ok(())
    }
}

impl fmt::Debug for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorRecord")
            .field("kind", &self.kind)
            .field("errno", &self.errno)
            .field("file", &self.file())
            .field("line", &self.line)
            .field("msg", &self.message())
            .finish()
    }
}

impl serde::Serialize for ErrorRecord {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut st = s.serialize_struct("ErrorRecord", 5)?;
        st.serialize_field("kind", &self.kind)?;
        st.serialize_field("errno", &self.errno)?;
        st.serialize_field("file", self.file())?;
        st.serialize_field("line", &self.line)?;
        st.serialize_field("msg", self.message())?;
        st.end()
    }
}

fn copy_truncated(dst: &mut [u8], s: &str) {
    let mut n = s.len().min(dst.len() - 1);
    while !s.is_char_boundary(n) {
        n -= 1;
    }
    dst[..n].copy_from_slice(&s.as_bytes()[..n]);
    dst[n..].fill(0);
}

fn field_str(buf: &[u8]) -> &str {
    let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    std::str::from_utf8(&buf[..end]).unwrap_or_default()
}

// -------- slot (TLS) --------

thread_local! {
    static SLOT: RefCell<ErrorRecord> = const { RefCell::new(ErrorRecord::EMPTY) };
}

/// Overwrite the calling thread's slot with `e`.
pub fn record(e: &Error) {
    log::debug!("errno: {} at {}:{}", e, e.file(), e.line());
    crate::metrics::record_error();
    SLOT.with(|slot| *slot.borrow_mut() = ErrorRecord::from_error(e));
}

/// Record `e` in the calling thread's slot, then signal it.
pub(crate) fn fail<T>(e: Error) -> Result<T> {
    record(&e);
    Err(e)
}

/// Reset the calling thread's slot to the sentinel.
pub fn clear() {
    SLOT.with(|slot| *slot.borrow_mut() = ErrorRecord::EMPTY);
}

/// Borrow the calling thread's slot.
pub fn with_current<R>(f: impl FnOnce(&ErrorRecord) -> R) -> R {
    SLOT.with(|slot| f(&slot.borrow()))
}

/// Copy of the calling thread's slot.
pub fn current() -> ErrorRecord {
    with_current(ErrorRecord::clone)
}

/// Address of the calling thread's slot; stays valid until the thread exits
/// and always shows the latest record written on this thread.
pub fn thread_slot() -> *const ErrorRecord {
    SLOT.with(|slot| slot.as_ptr() as *const ErrorRecord)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_thread_sees_empty_slot() {
        let rec = std::thread::spawn(current).join().unwrap();
        assert!(rec.is_empty());
        assert_eq!(rec.to_string(), ERR_NONE_TEXT);
    }

    #[test]
    fn fail_writes_slot_before_returning() {
        clear();
        let r: Result<()> = fail(Error::new(ErrorKind::CapExceeded, "cap 4 reached"));
        let err = r.unwrap_err();

        let rec = current();
        assert_eq!(rec.kind, ErrorKind::CapExceeded);
        assert_eq!(rec.message(), "cap 4 reached");
        assert_eq!(rec.line, err.line());
        assert_eq!(rec.file(), err.file());
    }

    #[test]
    fn clear_resets_to_sentinel() {
        record(&Error::new(ErrorKind::InvalidArg, "x"));
        assert!(!current().is_empty());
        clear();
        assert!(current().is_empty());
    }

    #[test]
    fn slots_are_isolated_between_threads() {
        clear();
        std::thread::spawn(|| {
            record(&Error::new(ErrorKind::NoMem, "from other thread"));
            assert_eq!(current().kind, ErrorKind::NoMem);
        })
        .join()
        .unwrap();
        assert!(current().is_empty(), "other thread's error leaked: {:?}", current());
    }

    #[test]
    fn thread_slot_pointer_is_stable_and_live() {
        clear();
        let p = thread_slot();
        assert_eq!(p, thread_slot());
        record(&Error::new(ErrorKind::InvalidArg, "live"));
        let rec = unsafe { &*p };
        assert_eq!(rec.kind, ErrorKind::InvalidArg);
        assert_eq!(rec.message(), "live");
    }

    #[test]
    fn long_message_truncated_on_char_boundary() {
        // 'я' = 2 байта, граница ERR_MSG_CAP-1 попадает в середину символа
        let msg = "я".repeat(ERR_MSG_CAP);
        let rec = ErrorRecord::from_error(&Error::new(ErrorKind::InvalidArg, msg));
        let got = rec.message();
        assert!(got.len() <= ERR_MSG_CAP - 1);
        assert_eq!(got.len() % 2, 0);
        assert!(got.chars().all(|c| c == 'я'));
    }

    #[test]
    fn strerror_formats_and_truncates() {
        let e = Error::new(ErrorKind::Io, "open data").with_errno(2);
        let rec = ErrorRecord::from_error(&e);
        let full = rec.to_string();
        assert!(full.starts_with('<'), "{full}");
        assert!(full.contains(&format!(":{}> open data - ", e.line())), "{full}");

        let mut big = [0xFFu8; 512];
        let n = rec.strerror(&mut big);
        assert_eq!(n, full.len());
        assert_eq!(&big[..n], full.as_bytes());
        assert_eq!(big[n], 0);

        let mut small = [0xFFu8; 4];
        assert_eq!(rec.strerror(&mut small), full.len());
        assert_eq!(&small[..3], &full.as_bytes()[..3]);
        assert_eq!(small[3], 0);

        assert_eq!(rec.strerror(&mut []), full.len());
    }

    #[test]
    fn serializes_as_flat_json() {
        let rec = ErrorRecord::from_error(&Error::new(ErrorKind::NullArg, "pairs is null"));
        let v = serde_json::to_value(&rec).unwrap();
        assert_eq!(v["kind"], "NullArg");
        assert_eq!(v["msg"], "pairs is null");
        assert_eq!(v["errno"], 0);
    }
}
