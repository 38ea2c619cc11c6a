//! Input table and output report handling

mod input;
mod output;

pub use input::{LoadedFile, UpgradeRow, load_rows};
#[allow(unused_imports)]
pub use output::{ReportWriter, output_path};
