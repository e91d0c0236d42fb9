use std::io::{self, BufRead, Write};

use tracing::warn;

use super::render;
use crate::models::{MovieRecord, SearchParams};
use crate::services::{CatalogError, SearchConsole};

/// Prints `prompt`, then reads one trimmed line. `None` once input is closed.
pub fn prompt_line<R: BufRead>(input: &mut R, prompt: &str) -> io::Result<Option<String>> {
    print!("{prompt}");
    io::stdout().flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Only "y" in any case counts as yes.
#[must_use]
pub fn is_affirmative(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("y")
}

/// Renders searches to stdout and reads the paging answer from `input`.
pub struct StdConsole<R> {
    input: R,
}

impl<R: BufRead> StdConsole<R> {
    pub const fn new(input: R) -> Self {
        Self { input }
    }

    pub fn input(&mut self) -> &mut R {
        &mut self.input
    }
}

impl<R: BufRead> SearchConsole for StdConsole<R> {
    fn show_page(&mut self, _params: &SearchParams, offset: u64, movies: &[MovieRecord]) {
        println!();
        for line in render::movie_page(offset, movies) {
            println!("{line}");
        }
    }

    fn show_no_results(&mut self, params: &SearchParams) {
        println!("No movies found for {params}.");
    }

    fn show_end_of_results(&mut self) {
        println!("No more results.");
    }

    fn confirm_next_page(&mut self, page_size: u64) -> bool {
        let prompt = format!("\nShow the next {page_size}? (y/n): ");
        match prompt_line(&mut self.input, &prompt) {
            Ok(Some(answer)) => is_affirmative(&answer),
            Ok(None) => false,
            Err(err) => {
                warn!(error = %err, "Failed to read paging answer");
                false
            }
        }
    }

    fn show_interrupted(&mut self, error: &CatalogError) {
        println!("Could not load more results: {error}");
        println!("Results shown so far are unaffected.");
    }
}
