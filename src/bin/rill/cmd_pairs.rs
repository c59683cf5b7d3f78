use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use rill::{metrics, Kv, Pairs, PairsBuilder};

pub fn exec(
    input: Option<PathBuf>,
    cap: usize,
    max_cap: Option<usize>,
    json: bool,
    with_metrics: bool,
) -> Result<()> {
    // Счётчики только этого запуска.
    metrics::reset();

    let mut builder = PairsBuilder::new();
    if let Some(m) = max_cap {
        builder = builder.max_cap(m);
    }
    let cfg = builder.build();

    let mut pairs = Pairs::with_config(cap, &cfg).context("allocate pairs")?;

    let loaded = match &input {
        Some(path) => {
            let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
            pairs
                .load_lines(BufReader::new(f))
                .with_context(|| format!("load {}", path.display()))?
        }
        None => pairs.load_lines(io::stdin().lock()).context("load stdin")?,
    };
    log::info!("loaded {} pairs (cap={})", loaded, pairs.capacity());

    if json {
        let records: Vec<Kv> = pairs.iter().copied().collect();
        let mut v = serde_json::json!({
            "cap": pairs.capacity(),
            "len": pairs.len(),
            "pairs": records,
        });
        if with_metrics {
            let m = metrics::snapshot();
            v["metrics"] = serde_json::to_value(&m)?;
            v["metrics"]["pairs_live"] = m.pairs_live().into();
        }
        println!("{}", serde_json::to_string_pretty(&v)?);
        return Ok(());
    }

    println!("cap: {}", pairs.capacity());
    println!("len: {}", pairs.len());
    for i in 0..pairs.len() {
        let kv = pairs.get(i);
        println!("kv[{}]: key={}, val={}", i, kv.key, kv.val);
    }
    if with_metrics {
        let m = metrics::snapshot();
        println!(
            "metrics: allocated={} freed={} live={} grown={} pushes={} errors={}",
            m.pairs_allocated,
            m.pairs_freed,
            m.pairs_live(),
            m.pairs_grown,
            m.pairs_pushes,
            m.errors_recorded
        );
    }
    Ok(())
}
