//! Run artifacts: `report.json`, `report.md`, `patch.diff`.

use crate::coordinator::TransformOutcome;
use crate::ports::WritePort;
use anyhow::Context;
use camino::Utf8Path;

/// Write all run artifacts to `out_dir`.
pub fn write_artifacts(
    outcome: &TransformOutcome,
    out_dir: &Utf8Path,
    writer: &dyn WritePort,
) -> anyhow::Result<()> {
    writer.create_dir_all(out_dir)?;

    let report_json =
        serde_json::to_string_pretty(&outcome.report).context("serialize report")?;
    writer.write_file(&out_dir.join("report.json"), report_json.as_bytes())?;

    #[cfg(feature = "reporting")]
    {
        let md = tomlfix_render::render_report_md(&outcome.report);
        writer.write_file(&out_dir.join("report.md"), md.as_bytes())?;
    }

    writer.write_file(&out_dir.join("patch.diff"), outcome.patch.as_bytes())?;
    Ok(())
}
