pub mod loader;
pub mod output;
pub mod writers;

pub use loader::{load_table, save_table, save_users, LoadOptions};
pub use output::{create_writer, open_destination, OutputFormat, OutputWriter};
pub use writers::DominanceHtmlWriter;

use anyhow::Result;
use std::fs;
use std::path::Path;

pub fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content)?;
    Ok(())
}

pub fn file_exists(path: &Path) -> bool {
    path.exists() && path.is_file()
}
