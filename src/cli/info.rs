//! Info command handler.
//!
//! Dumps the header section and the raw part/relation records of a file,
//! followed by a few structural statistics.

use crate::hlr::forest;
use crate::model::{PartIndex, StepFile};
use crate::pipeline::{build_forest, exit_codes, load_step_file, write_output, OutputTarget};
use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Run the info command, returning the desired exit code.
pub fn run_info(path: &Path, output: Option<PathBuf>, quiet: bool) -> Result<i32> {
    let file = load_step_file(path, quiet)?;
    let text = render_info(&file)?;
    write_output(&text, &OutputTarget::from_option(output), quiet)?;
    Ok(exit_codes::SUCCESS)
}

/// Human-readable dump of a file's header, records and forest statistics.
pub fn render_info(file: &StepFile) -> Result<String> {
    let mut out = String::new();
    write_records(&mut out, file).context("Failed to format records")?;

    let index = PartIndex::from_file(file).context("Failed to index records")?;
    let rows = build_forest(file, true)?;

    writeln!(out, "\nSTRUCTURE -----------------------------")?;
    writeln!(out, "Root parts:           {}", index.isolated_parts().count())?;
    writeln!(
        out,
        "Resolved relations:   {} of {}",
        index.resolvable_relation_count(),
        index.relation_count()
    )?;
    writeln!(out, "Instances:            {}", rows.len())?;
    writeln!(out, "Fingerprint:          {:016x}", forest::fingerprint(&rows))?;
    Ok(out)
}

fn write_records(out: &mut String, file: &StepFile) -> std::fmt::Result {
    writeln!(out, "File name: {}", file.display_name())?;

    let header = file.header.clone().unwrap_or_default();
    writeln!(out, "\nHEADER --------------------------------")?;
    writeln!(out, "File_Description:")?;
    writeln!(out, "   description:          {}", header.file_description.description)?;
    writeln!(
        out,
        "   implementation_level: {}",
        header.file_description.implementation_level
    )?;
    writeln!(out, "File_Name:")?;
    let name = &header.file_name;
    writeln!(out, "   name:                 {}", name.name)?;
    writeln!(out, "   time_stamp:           {}", name.time_stamp)?;
    writeln!(out, "   author:               {}", name.author)?;
    writeln!(out, "   organization:         {}", name.organization)?;
    writeln!(out, "   preprocessor_version: {}", name.preprocessor_version)?;
    writeln!(out, "   originating_system:   {}", name.originating_system)?;
    writeln!(out, "   authorisation:        {}", name.authorisation)?;
    writeln!(out, "File_Schema:")?;
    writeln!(out, "   schema:               {}", header.file_schema)?;

    writeln!(out, "\nDATA ----------------------------------")?;
    for part in &file.parts {
        writeln!(out, "Part: #{} {} '{}'", part.step_id, part.kind, part.name)?;
    }
    for relation in &file.relations {
        writeln!(
            out,
            "Relation: #{} {} '{},{}' for #{} --> #{}",
            relation.step_id,
            relation.kind,
            relation.id,
            relation.name,
            relation.relating_id,
            relation.related_id
        )?;
    }
    Ok(())
}
