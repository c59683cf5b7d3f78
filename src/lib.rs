// Базовые модули
pub mod consts;
pub mod config;
pub mod metrics;

// Пары и ошибки
pub mod pairs;  // src/pairs.rs — PairBuffer
pub mod error;  // src/error.rs — Error/ErrorKind/Result
pub mod errno;  // src/errno.rs — per-thread error slot

// Утилиты (env_usize, parse_kv_line)
pub mod util;   // src/util/mod.rs

// FFI (C ABI) — включается фичей "ffi" (по умолчанию включена)
#[cfg(feature = "ffi")]
pub mod ffi;

// Удобные реэкспорты
pub use config::{PairsBuilder, RillConfig};
pub use errno::ErrorRecord;
pub use error::{Error, ErrorKind, Result};
pub use pairs::{Key, Kv, Pairs, Val};
