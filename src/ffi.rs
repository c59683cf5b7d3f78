//! C ABI (FFI) для rill.
//!
//! Модель:
//! - `RillPairs` — opaque-хэндл буфера пар (Box<Pairs>), освобождается rill_pairs_free().
//! - Чтение: rill_pairs_cap / rill_pairs_len / rill_pairs_get, без доступа к раскладке.
//! - Ошибки: функции-производители возвращают NULL; детали лежат в слоте потока,
//!   который отдаёт rill_errno_thread() (запись делается ДО возврата NULL).
//!
//! Контракт:
//! - NULL-хэндл или index >= len в читающих функциях — баг вызывающего: лог + abort().
//! - Указатель из rill_pairs_get живёт пока жив буфер и пока его не мутируют.
//! - Указатель из rill_errno_thread живёт пока жив поток.
//!
//! Генерация заголовка C (cbindgen):
//!   cbindgen --crate rill --output rill.h

use std::fmt;
use std::os::raw::c_char;
use std::panic::{self, AssertUnwindSafe};
use std::ptr;
use std::slice;

use libc::size_t;
use log::{error, warn};

use crate::errno::{self, ErrorRecord};
use crate::error::{Error, ErrorKind};
use crate::pairs::{Key, Kv, Pairs, Val};

pub type RillPairs = Pairs;
pub type RillKv = Kv;
pub type RillError = ErrorRecord;

// ---------- Helpers ----------

/// Boundary misuse: never returns.
fn contract_violation(what: fmt::Arguments<'_>) -> ! {
    error!("rill: contract violation: {}", what);
    eprintln!("rill: contract violation: {}", what);
    std::process::abort()
}

/// Run `f`, turning a panic into a `Panicked` record in the thread slot + `fallback`.
fn guard<T>(fallback: T, f: impl FnOnce() -> T) -> T {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(v) => v,
        Err(payload) => {
            let msg = if let Some(s) = payload.downcast_ref::<&str>() {
                (*s).to_string()
            } else if let Some(s) = payload.downcast_ref::<String>() {
                s.clone()
            } else {
                "unknown panic".to_string()
            };
            errno::record(&Error::new(ErrorKind::Panicked, msg));
            fallback
        }
    }
}

// ---------- Pairs: producer ----------

/// Allocate a buffer of capacity `cap` (raised to the configured minimum).
/// NULL on failure.
#[no_mangle]
pub extern "C" fn rill_pairs_new(cap: size_t) -> *mut RillPairs {
    guard(ptr::null_mut(), || match Pairs::new(cap) {
        Ok(p) => Box::into_raw(Box::new(p)),
        Err(_) => ptr::null_mut(),
    })
}

#[no_mangle]
pub unsafe extern "C" fn rill_pairs_free(pairs: *mut RillPairs) {
    if pairs.is_null() {
        return;
    }
    drop(Box::from_raw(pairs));
}

#[no_mangle]
pub unsafe extern "C" fn rill_pairs_clear(pairs: *mut RillPairs) {
    if let Some(p) = pairs.as_mut() {
        p.clear();
    }
}

/// Append a record. Returns `pairs` on success (the handle never moves),
/// NULL on failure; the buffer is unchanged on failure.
#[no_mangle]
pub unsafe extern "C" fn rill_pairs_push(
    pairs: *mut RillPairs,
    key: Key,
    val: Val,
) -> *mut RillPairs {
    guard(ptr::null_mut(), || {
        let p = match pairs.as_mut() {
            Some(p) => p,
            None => {
                warn!("rill_pairs_push: pairs is null");
                errno::record(&Error::new(ErrorKind::NullArg, "rill_pairs_push: pairs is null"));
                return ptr::null_mut();
            }
        };
        match p.push(key, val) {
            Ok(()) => pairs,
            Err(_) => ptr::null_mut(),
        }
    })
}

// ---------- Pairs: read side ----------

#[no_mangle]
pub unsafe extern "C" fn rill_pairs_cap(pairs: *const RillPairs) -> size_t {
    match pairs.as_ref() {
        Some(p) => p.capacity(),
        None => contract_violation(format_args!("rill_pairs_cap: pairs is null")),
    }
}

#[no_mangle]
pub unsafe extern "C" fn rill_pairs_len(pairs: *const RillPairs) -> size_t {
    match pairs.as_ref() {
        Some(p) => p.len(),
        None => contract_violation(format_args!("rill_pairs_len: pairs is null")),
    }
}

/// Record at `index`. Aborts the process if `index >= rill_pairs_len(pairs)`.
#[no_mangle]
pub unsafe extern "C" fn rill_pairs_get(pairs: *const RillPairs, index: size_t) -> *const RillKv {
    let p = match pairs.as_ref() {
        Some(p) => p,
        None => contract_violation(format_args!("rill_pairs_get: pairs is null")),
    };
    if index >= p.len() {
        contract_violation(format_args!(
            "rill_pairs_get: index={} out of range, len={}",
            index,
            p.len()
        ));
    }
    p.get(index) as *const RillKv
}

// ---------- Errors ----------

/// The calling thread's error slot. Never NULL, never fails.
#[no_mangle]
pub extern "C" fn rill_errno_thread() -> *const RillError {
    errno::thread_slot()
}

#[no_mangle]
pub extern "C" fn rill_errno_clear() {
    errno::clear();
}

/// snprintf-like: render `err` (NULL = calling thread's slot) into `dst`.
/// Returns the untruncated length; NULL `dst` or `len == 0` only measures.
#[no_mangle]
pub unsafe extern "C" fn rill_strerror(
    err: *const RillError,
    dst: *mut c_char,
    len: size_t,
) -> size_t {
    let buf: &mut [u8] = if dst.is_null() || len == 0 {
        &mut []
    } else {
        slice::from_raw_parts_mut(dst as *mut u8, len)
    };
    match err.as_ref() {
        Some(rec) => rec.strerror(buf),
        None => errno::with_current(|rec| rec.strerror(buf)),
    }
}

// ---------- Misc ----------

#[no_mangle]
pub extern "C" fn rill_version() -> *const c_char {
    // статическая NUL-терминированная строка
    static S: &str = concat!(env!("CARGO_PKG_VERSION"), "\0");
    S.as_ptr() as *const c_char
}
