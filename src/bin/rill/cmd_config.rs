use anyhow::Result;

use rill::RillConfig;

pub fn exec(json: bool) -> Result<()> {
    let cfg = RillConfig::from_env();
    if json {
        let v = serde_json::json!({
            "pairs_min_cap": cfg.pairs_min_cap,
            "pairs_max_cap": cfg.pairs_max_cap,
        });
        println!("{}", serde_json::to_string_pretty(&v)?);
    } else {
        println!("{}", cfg);
    }
    Ok(())
}
