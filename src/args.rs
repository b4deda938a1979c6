use clap::Parser;
use std::{collections::HashMap, path::PathBuf};
use survey2geojson::{ConvertOptions, SourceFormat, csv_loops::CsvOptions, encoder::output_path};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Input *.csv or *.dxf file, can be repeated. Output is written beside it as *.json
    #[arg(long = "source-file", required = true)]
    pub source_files: Vec<PathBuf>,

    /// Source SRS, EPSG code (32610, EPSG:32610) or any PROJ definition
    #[arg(long)]
    pub source_srs: String,

    /// Input format [default: guessed from file extension]
    #[arg(long, value_enum)]
    pub format: Option<SourceFormat>,

    /// CSV field delimiter
    #[arg(long, default_value_t = ',')]
    pub delimiter: char,

    /// CSV has no header line
    #[arg(long, default_value_t = false)]
    pub no_header: bool,

    /// Treat the last CSV row as data instead of a footer
    #[arg(long, default_value_t = false)]
    pub keep_last_row: bool,

    /// Print map preview payload (center, zoom and features) to stdout
    #[arg(long, default_value_t = false)]
    pub preview: bool,

    /// Number of threads for parallel processing [default: available parallelism]
    #[arg(long)]
    pub num_threads: Option<u16>,

    /// Debug
    #[arg(long, default_value_t = false)]
    pub debug: bool,
}

impl Args {
    pub fn convert_options(&self) -> Result<ConvertOptions, String> {
        if !self.delimiter.is_ascii() {
            return Err(format!("Delimiter {:?} is not an ASCII character", self.delimiter));
        }

        Ok(ConvertOptions {
            format: self.format,
            csv: CsvOptions {
                delimiter: self.delimiter as u8,
                has_header: !self.no_header,
                skip_last_row: !self.keep_last_row,
            },
        })
    }

    /// Fails when two inputs would be written to the same `*.json`.
    pub fn check_output_collisions(&self) -> Result<(), String> {
        let mut targets = HashMap::new();

        for source_file in &self.source_files {
            let target_file = output_path(source_file);

            if let Some(previous) = targets.insert(target_file.clone(), source_file) {
                return Err(format!(
                    "{} and {} would both be written to {}",
                    previous.display(),
                    source_file.display(),
                    target_file.display()
                ));
            }
        }

        Ok(())
    }
}
