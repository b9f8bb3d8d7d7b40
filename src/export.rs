//! The `export` command: serializes the rendering-collaborator payload as
//! JSON, either to a file or to stdout.

use std::{
    fs::File,
    io::{BufWriter, Write},
};

use anyhow::{Context, Result};
use log::info;

use crate::{cli::ExportArgs, filter, loader, render};

pub fn execute(args: &ExportArgs) -> Result<()> {
    let delimiter = loader::resolve_input_delimiter(&args.input.input, args.input.delimiter);
    let encoding = loader::resolve_encoding(args.input.input_encoding.as_deref())?;
    let dataset = loader::load_cached(&args.input.input, delimiter, encoding)?;

    let criteria = args.filter.to_criteria(&dataset);
    let (subset, aggregates) = filter::apply(&dataset, &criteria);
    let model = render::build(&subset, &aggregates, args.measure);

    let mut writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Creating output file {path:?}"))?,
        )),
        None => Box::new(std::io::stdout().lock()),
    };
    if args.pretty {
        serde_json::to_writer_pretty(&mut writer, &model)
    } else {
        serde_json::to_writer(&mut writer, &model)
    }
    .context("Serializing render payload")?;
    writeln!(writer)?;
    writer.flush()?;

    info!(
        "Exported {} point(s) from {:?}",
        model.points.len(),
        args.input.input
    );
    Ok(())
}
