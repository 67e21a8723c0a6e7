use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Local};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Table};
use encoding_rs::Encoding;
use engine_logging::{engine_info, engine_warn};
use harvester_core::ResultSet;
use harvester_engine::{AtomicFileWriter, Mode};

use crate::config::OutputTarget;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

pub fn emit(rows: &ResultSet, mode: Mode, target: &OutputTarget) -> Result<()> {
    match target {
        OutputTarget::Stdout => {
            for row in rows.iter_all() {
                println!("{row}");
            }
        }
        OutputTarget::Pretty => println!("{}", pretty_table(rows)),
        OutputTarget::File { dir, encoding } => {
            let path = write_csv(rows, mode, dir, Local::now(), *encoding)?;
            engine_info!("Results saved to {:?}", path);
        }
    }
    Ok(())
}

pub fn pretty_table(rows: &ResultSet) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(
            rows.header()
                .fields()
                .iter()
                .map(|field| Cell::new(field).add_attribute(Attribute::Bold)),
        );
    for row in rows.rows() {
        table.add_row(row.fields());
    }
    table
}

/// `<mode>_<local timestamp>.csv`
pub fn results_file_name(mode: Mode, now: DateTime<Local>) -> String {
    format!("{}_{}.csv", mode, now.format(TIMESTAMP_FORMAT))
}

pub fn write_csv(
    rows: &ResultSet,
    mode: Mode,
    dir: &Path,
    now: DateTime<Local>,
    encoding: &'static Encoding,
) -> Result<PathBuf> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    for row in rows.iter_all() {
        writer.write_record(row.fields()).context("formatting csv row")?;
    }
    let buffer = writer
        .into_inner()
        .map_err(|err| anyhow!("flushing csv buffer: {}", err.error()))?;
    let text = String::from_utf8(buffer).context("csv output is not utf-8")?;

    let (bytes, used, unmappable) = encoding.encode(&text);
    if unmappable {
        engine_warn!(
            "Some characters cannot be represented in {}; they were written as numeric references",
            used.name()
        );
    }

    let file_name = results_file_name(mode, now);
    AtomicFileWriter::new(dir)
        .write(&file_name, &bytes)
        .with_context(|| format!("writing {}", dir.join(&file_name).display()))
}
