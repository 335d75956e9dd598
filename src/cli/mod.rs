//! CLI subcommand implementations for the dktool binary.

pub mod fix_target_cmd;
pub mod output;
pub mod scrape_cmd;
