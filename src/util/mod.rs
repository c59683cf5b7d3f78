//! util — общие утилиты.
//!
//! Содержит:
//! - env_usize(): чтение числового env-параметра (мусор игнорируется).
//! - parse_kv_line(): разбор строки `key val` для CLI/загрузчиков.

use crate::pairs::{Key, Val};

/// Прочитать env-переменную как usize. None если переменной нет или она не парсится.
#[inline]
pub fn env_usize(name: &str) -> Option<usize> {
    std::env::var(name).ok()?.trim().parse::<usize>().ok()
}

/// Разобрать строку вида `key val` (десятичные u64, разделитель — пробелы/табы).
///
/// Возвращает:
/// - Ok(None) для пустой строки и комментария (`# ...`);
/// - Ok(Some((key, val))) при успехе;
/// - Err(описание) если полей не два или они не числа.
pub fn parse_kv_line(line: &str) -> Result<Option<(Key, Val)>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut it = line.split_whitespace();
    let (k, v) = match (it.next(), it.next(), it.next()) {
        (Some(k), Some(v), None) => (k, v),
        _ => return Err(format!("expected `key val`, got {:?}", line)),
    };
    let key = k.parse::<Key>().map_err(|e| format!("bad key {:?}: {}", k, e))?;
    let val = v.parse::<Val>().map_err(|e| format!("bad val {:?}: {}", v, e))?;
    Ok(Some((key, val)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_kv_line_ok() {
        assert_eq!(parse_kv_line("10 20").unwrap(), Some((10, 20)));
        assert_eq!(parse_kv_line("  1\t2  ").unwrap(), Some((1, 2)));
    }

    #[test]
    fn parse_kv_line_skips_blank_and_comments() {
        assert_eq!(parse_kv_line("").unwrap(), None);
        assert_eq!(parse_kv_line("   ").unwrap(), None);
        assert_eq!(parse_kv_line("# header").unwrap(), None);
    }

    #[test]
    fn parse_kv_line_bad() {
        assert!(parse_kv_line("1").is_err());
        assert!(parse_kv_line("1 2 3").is_err());
        assert!(parse_kv_line("a 2").is_err());
        assert!(parse_kv_line("1 -2").is_err());
    }

    #[test]
    fn env_usize_missing_is_none() {
        assert_eq!(env_usize("RILL_TEST_SURELY_UNSET_VAR"), None);
    }
}
