//! `dump-data`: print the raw store without touching it.

use super::{open_store, GlobalOptions};
use crate::error::Result;
use crate::output::emit_success;

pub fn run(globals: &GlobalOptions) -> Result<()> {
    let (_config, store) = open_store(globals)?;
    let raw = store.read_raw()?;

    if globals.json {
        return emit_success(globals.output(), "dump-data", &raw, None);
    }
    println!("{}", serde_json::to_string_pretty(&raw)?);
    Ok(())
}
