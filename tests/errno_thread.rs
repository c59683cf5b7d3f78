use std::sync::{Arc, Barrier};
use std::thread;

use anyhow::Result;

use rill::{errno, ErrorKind, Pairs, PairsBuilder, RillConfig};

#[test]
fn errno_empty_on_new_thread_then_kind_after_failure() -> Result<()> {
    let h = thread::spawn(|| -> Result<()> {
        assert!(errno::current().is_empty(), "fresh thread must see the sentinel");

        let cfg = PairsBuilder::from_default().max_cap(1).build();
        let mut pairs = Pairs::with_config(1, &cfg)?;
        pairs.push(1, 1)?;
        let err = pairs.push(2, 2).unwrap_err();

        let rec = errno::current();
        assert_eq!(rec.kind, ErrorKind::CapExceeded);
        assert_eq!(rec.kind, err.kind());
        assert_eq!(rec.message(), err.message());
        assert_eq!(rec.file(), err.file());
        Ok(())
    });
    h.join().expect("thread panicked")
}

#[test]
fn errno_failure_on_one_thread_not_visible_on_another() {
    let barrier = Arc::new(Barrier::new(2));

    let b = barrier.clone();
    let failing = thread::spawn(move || {
        let cfg = RillConfig::default().with_pairs_max_cap(2).build();
        let err = Pairs::with_config(8, &cfg).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CapExceeded);
        b.wait(); // A записал ошибку
        b.wait(); // B проверил свой слот
        assert_eq!(errno::current().kind, ErrorKind::CapExceeded);
    });

    let b = barrier.clone();
    let observer = thread::spawn(move || {
        b.wait();
        let rec = errno::current();
        b.wait();
        rec
    });

    failing.join().unwrap();
    let rec = observer.join().unwrap();
    assert!(rec.is_empty(), "thread B observed thread A's error: {:?}", rec);
}

#[test]
fn errno_many_threads_each_see_own_record() {
    let handles: Vec<_> = (0..8u32)
        .map(|i| {
            thread::spawn(move || {
                let cfg = RillConfig::default().with_pairs_max_cap(i as usize + 1).build();
                // запрошенная ёмкость больше max → CapExceeded, сообщение содержит max
                let _ = Pairs::with_config(100, &cfg);
                thread::yield_now();
                let rec = errno::current();
                assert_eq!(rec.kind, ErrorKind::CapExceeded);
                assert!(
                    rec.message().ends_with(&format!("max={}", i + 1)),
                    "thread {} got {:?}",
                    i,
                    rec.message()
                );
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
}

#[test]
fn errno_is_stale_until_overwritten_or_cleared() -> Result<()> {
    thread::spawn(|| -> Result<()> {
        let cfg = RillConfig::default().with_pairs_max_cap(1).build();
        let _ = Pairs::with_config(2, &cfg);
        assert_eq!(errno::current().kind, ErrorKind::CapExceeded);

        // Успешная операция слот не трогает: запись устаревшая, но остаётся.
        let mut ok = Pairs::with_config(1, &RillConfig::default())?;
        ok.push(1, 1)?;
        assert_eq!(errno::current().kind, ErrorKind::CapExceeded);

        // Новая ошибка перезаписывает.
        let _ = ok.load_lines("oops\n".as_bytes());
        assert_eq!(errno::current().kind, ErrorKind::InvalidArg);

        errno::clear();
        assert!(errno::current().is_empty());
        Ok(())
    })
    .join()
    .expect("thread panicked")
}

#[test]
fn errno_with_current_borrows_without_copy() {
    thread::spawn(|| {
        let _ = Pairs::with_config(9, &RillConfig::default().with_pairs_max_cap(3).build());
        let (kind, len) = errno::with_current(|rec| (rec.kind, rec.message().len()));
        assert_eq!(kind, ErrorKind::CapExceeded);
        assert!(len > 0);
    })
    .join()
    .unwrap();
}
