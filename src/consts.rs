//! Общие константы ABI (error record, pairs, env).

// -------- Error record --------
/// Capacity of `ErrorRecord::msg`, NUL terminator included.
pub const ERR_MSG_CAP: usize = 1024;
/// Capacity of `ErrorRecord::file`, NUL terminator included.
pub const ERR_FILE_CAP: usize = 128;
/// Text produced by `strerror` for the empty slot.
pub const ERR_NONE_TEXT: &str = "no error";

// -------- Pairs --------
pub const PAIRS_DEFAULT_MIN_CAP: usize = 1;
// Верхняя граница: Vec<Kv> не может занимать больше isize::MAX байт.
pub const PAIRS_HARD_MAX_CAP: usize = isize::MAX as usize / std::mem::size_of::<crate::pairs::Kv>();
pub const PAIRS_GROWTH_FACTOR: usize = 2;

// -------- Env --------
pub const ENV_PAIRS_MIN_CAP: &str = "RILL_PAIRS_MIN_CAP";
pub const ENV_PAIRS_MAX_CAP: &str = "RILL_PAIRS_MAX_CAP";
