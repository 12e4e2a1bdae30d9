use anyhow::Result;

use crate::catalog::SharedCatalog;

#[derive(Clone, Debug, Default)]
pub struct TuiRunOptions {
    /// `fitment_pairs` string to restore before the first frame.
    pub pairs: Option<String>,
}

/// Runs the selector until the user quits. Returns the search URL when the
/// user asked for it with `s`.
pub fn run(catalog: SharedCatalog) -> Result<Option<String>> {
    crate::tui_shell::run_with_options(catalog, TuiRunOptions::default())
}

pub fn run_with_options(catalog: SharedCatalog, opts: TuiRunOptions) -> Result<Option<String>> {
    crate::tui_shell::run_with_options(catalog, opts)
}
