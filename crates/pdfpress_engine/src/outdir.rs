use std::path::{Path, PathBuf};

use chrono::Local;

use crate::persist::{ensure_output_dir, PersistError};

/// Folder under the output root that collects every dated run.
pub const OUTPUT_DIR_NAME: &str = "AutoGeneratePDF";

/// Dated folder for the current job, `<root>/AutoGeneratePDF/<YYMMDD>`,
/// created on demand. Resolved from the local clock at call time, once per
/// job, so a run crossing midnight files into two folders.
pub fn dated_output_dir(root: &Path) -> Result<PathBuf, PersistError> {
    let date = Local::now().format("%y%m%d").to_string();
    let dir = root.join(OUTPUT_DIR_NAME).join(date);
    ensure_output_dir(&dir)?;
    Ok(dir)
}
