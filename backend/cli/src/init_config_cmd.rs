//! `asmodeus init-config`: write a config file holding every default.

use std::path::Path;

use anyhow::Result;
use asmodeus_config::{apply_all_defaults, write_config, AsmodeusConfig};

use crate::terminal_output::{note_success, note_warn};

pub async fn run(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        note_warn(&format!("{} already exists; use --force to overwrite", path.display()));
        return Ok(());
    }
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let config = apply_all_defaults(AsmodeusConfig::default(), base_dir);
    write_config(&config, path).await?;
    note_success(&format!("Wrote {}", path.display()));
    Ok(())
}
