use std::fs;
use std::io::{BufWriter, IntoInnerError};
use std::path::{Path, PathBuf};

use la_adjacency::{ScanStats, WriteSummary, scan_volume, write_adjacency_list};
use la_volume::open_volume;
use log::info;
use tempfile::NamedTempFile;

use crate::{AtlasConfig, ToolError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub output: PathBuf,
    pub stats: ScanStats,
    pub write: WriteSummary,
}

/// Scans the configured volume and writes its adjacency list.
///
/// The destination is checked for writability before the volume is opened.
/// On any error the temporary output is removed and the destination is left
/// untouched.
pub fn generate_adjacencies(cfg: &AtlasConfig) -> Result<RunSummary, ToolError> {
    let output = cfg.adjacencies_path();

    fs::create_dir_all(&cfg.models_directory)
        .map_err(|e| ToolError::output(&cfg.models_directory, e))?;
    let out_dir = output.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(out_dir).map_err(|e| ToolError::output(&output, e))?;

    let tmp = NamedTempFile::new_in(out_dir).map_err(|e| ToolError::output(&output, e))?;

    let volume_err = |source| ToolError::VolumeRead {
        path: cfg.label_file.clone(),
        source,
    };
    let mut volume = open_volume(&cfg.label_file).map_err(volume_err)?;
    let scanned = scan_volume(volume.as_mut(), &cfg.scan_config()).map_err(volume_err)?;
    drop(volume);

    let mut writer = BufWriter::new(tmp);
    let write = write_adjacency_list(&scanned.registry, &mut writer, &cfg.write_options())
        .map_err(|e| ToolError::output(&output, e))?;
    let tmp = writer
        .into_inner()
        .map_err(|e| ToolError::output(&output, IntoInnerError::into_error(e)))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| ToolError::output(&output, e))?;
    tmp.persist(&output)
        .map_err(|e| ToolError::output(&output, e.error))?;

    info!(
        "wrote {} labels to {} ({} above max_label skipped)",
        write.lines,
        output.display(),
        write.skipped
    );

    Ok(RunSummary {
        output,
        stats: scanned.stats,
        write,
    })
}
