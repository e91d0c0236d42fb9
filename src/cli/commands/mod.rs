mod check;
mod details;
mod genres;
mod history;
mod purge;
mod searches;
mod stats;

pub use check::cmd_check;
pub use details::cmd_details;
pub use genres::cmd_genres;
pub use history::cmd_history;
pub use purge::cmd_purge;
pub use searches::{cmd_popular, cmd_recent};
pub use stats::cmd_stats;

use anyhow::Context;
use serde::Serialize;

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{text}");
    Ok(())
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{line}");
    }
}
