//! Pairs — owned, capacity-bounded, insertion-ordered buffer of key/value records.
//!
//! Read side (что видит граница):
//! - capacity() / len() — чистые чтения;
//! - get(i) — ссылка на запись i; i >= len() это баг вызывающего → panic
//!   (на C ABI — abort), никаких default-значений.
//!
//! Producer side: new/with_config, push (рост удвоением до pairs_max_cap),
//! clear, load_lines. Все ошибки сначала пишутся в errno-слот потока.

use std::io::BufRead;
use std::ops::Index;

use log::{debug, warn};
use serde::Serialize;

use crate::config::{self, RillConfig};
use crate::consts::PAIRS_GROWTH_FACTOR;
use crate::errno::fail;
use crate::error::{Error, ErrorKind, Result};
use crate::metrics;

pub type Key = u64;
pub type Val = u64;

/// One fixed-size key/value record (C layout: two u64).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Kv {
    pub key: Key,
    pub val: Val,
}

impl Kv {
    pub const fn new(key: Key, val: Val) -> Self {
        Self { key, val }
    }
}

impl From<(Key, Val)> for Kv {
    fn from((key, val): (Key, Val)) -> Self {
        Self { key, val }
    }
}

/// Invariant: `data.len() <= cap <= max_cap` and `data.capacity() >= cap`.
#[derive(Debug)]
pub struct Pairs {
    cap: usize,
    max_cap: usize,
    data: Vec<Kv>,
}

impl Pairs {
    /// Allocate with the process-wide config (see `config::global`).
    pub fn new(cap: usize) -> Result<Pairs> {
        Self::with_config(cap, config::global())
    }

    pub fn with_config(cap: usize, cfg: &RillConfig) -> Result<Pairs> {
        // pub fields / with_* can skip build()
        let cfg = cfg.clone().build();
        let cap = cap.max(cfg.pairs_min_cap);
        if cap > cfg.pairs_max_cap {
            return fail(Error::new(
                ErrorKind::CapExceeded,
                format!("unable to allocate pairs: cap={} above max={}", cap, cfg.pairs_max_cap),
            ));
        }

        let mut data = Vec::new();
        if let Err(e) = data.try_reserve_exact(cap) {
            return fail(
                Error::new(
                    ErrorKind::NoMem,
                    format!("unable to allocate pairs: cap={}: {}", cap, e),
                )
                .with_errno(libc::ENOMEM),
            );
        }

        metrics::record_pairs_alloc();
        debug!("pairs: alloc cap={} max_cap={}", cap, cfg.pairs_max_cap);
        Ok(Pairs {
            cap,
            max_cap: cfg.pairs_max_cap,
            data,
        })
    }

    pub fn capacity(&self) -> usize {
        self.cap
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Record at insertion position `index`.
    ///
    /// Panics if `index >= len()`.
    pub fn get(&self, index: usize) -> &Kv {
        assert!(
            index < self.data.len(),
            "pairs index out of bounds: index={} len={}",
            index,
            self.data.len()
        );
        &self.data[index]
    }

    /// Append a record, growing capacity if needed. On error the buffer is unchanged.
    pub fn push(&mut self, key: Key, val: Val) -> Result<()> {
        if self.data.len() == self.cap {
            self.grow()?;
        }
        self.data.push(Kv { key, val });
        metrics::record_pairs_push();
        Ok(())
    }

    fn grow(&mut self) -> Result<()> {
        if self.cap >= self.max_cap {
            warn!("pairs: push refused, cap={} is max", self.cap);
            return fail(Error::new(
                ErrorKind::CapExceeded,
                format!("unable to push to pairs: cap={} is max", self.cap),
            ));
        }

        let new_cap = self
            .cap
            .saturating_mul(PAIRS_GROWTH_FACTOR)
            .max(self.cap + 1)
            .min(self.max_cap);
        if let Err(e) = self.data.try_reserve_exact(new_cap - self.data.len()) {
            return fail(
                Error::new(
                    ErrorKind::NoMem,
                    format!("unable to grow pairs: {} -> {}: {}", self.cap, new_cap, e),
                )
                .with_errno(libc::ENOMEM),
            );
        }

        debug!("pairs: grow {} -> {}", self.cap, new_cap);
        metrics::record_pairs_grow();
        self.cap = new_cap;
        Ok(())
    }

    /// Drop all records, keep capacity.
    pub fn clear(&mut self) {
        self.data.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Kv> {
        self.data.iter()
    }

    pub fn as_slice(&self) -> &[Kv] {
        &self.data
    }

    /// Append `key val` lines from `r` (blank lines and `#` comments skipped).
    /// Returns the number of records pushed. Stops at the first bad line;
    /// records pushed before it stay in the buffer.
    pub fn load_lines<R: BufRead>(&mut self, r: R) -> Result<usize> {
        let mut pushed = 0usize;
        for (i, line) in r.lines().enumerate() {
            let lineno = i + 1;
            let line = match line {
                Ok(l) => l,
                Err(e) => return fail(Error::from_io(&e, format!("read line {}", lineno))),
            };
            match crate::util::parse_kv_line(&line) {
                Ok(None) => {}
                Ok(Some((key, val))) => {
                    self.push(key, val)?;
                    pushed += 1;
                }
                Err(msg) => {
                    return fail(Error::new(
                        ErrorKind::InvalidArg,
                        format!("line {}: {}", lineno, msg),
                    ))
                }
            }
        }
        Ok(pushed)
    }
}

impl Index<usize> for Pairs {
    type Output = Kv;

    fn index(&self, index: usize) -> &Kv {
        self.get(index)
    }
}

impl<'a> IntoIterator for &'a Pairs {
    type Item = &'a Kv;
    type IntoIter = std::slice::Iter<'a, Kv>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Drop for Pairs {
    fn drop(&mut self) {
        metrics::record_pairs_free();
    }
}
