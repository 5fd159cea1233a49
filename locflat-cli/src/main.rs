use clap::Parser;
use locflat::{Conversion, ConvertOptions, Error, JsonLayout, convert};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Conversion to run: json-to-csv, csv-to-json, xml-to-csv, csv-to-xml,
    /// json-to-xml or xml-to-json (camelCase such as `jsonToCsv` also works)
    command: Option<String>,

    /// The source file to convert
    #[arg(short = 'f', long = "file")]
    file: Option<String>,

    /// The destination file to write
    #[arg(short, long)]
    output: Option<String>,

    /// Optional translation source joined by key into `translated_value` (CSV output only)
    #[arg(short, long)]
    translation: Option<String>,

    /// CSV column that supplies values when reading a table
    #[arg(short = 'v', long = "value-column")]
    value_column: Option<String>,

    /// Read null, booleans and numbers in CSV/XML cells as typed JSON values.
    /// Without it they come back as strings, so a JSON → CSV → JSON trip turns
    /// `3` into `"3"`
    #[arg(long)]
    infer_types: bool,

    /// Write JSON as a `module.exports = …;` CommonJS module
    #[arg(long)]
    module_exports: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let args = Args::parse();
    debug!(?args, "parsed arguments");
    if let Err(e) = run(args) {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Error> {
    let source = args.file.ok_or(Error::MissingArgument("source"))?;
    let output = args.output.ok_or(Error::MissingArgument("destination"))?;
    let conversion: Conversion = args.command.unwrap_or_default().parse()?;

    let options = ConvertOptions::new()
        .with_translation(args.translation.map(Into::into))
        .with_value_column(args.value_column)
        .with_infer_scalars(args.infer_types)
        .with_json_layout(if args.module_exports {
            JsonLayout::CommonJs
        } else {
            JsonLayout::Plain
        });

    println!("Converting {} to {} ({})...", source, output, conversion);
    let summary = convert(conversion, &source, &output, &options)?;

    if options.translation.is_some() && summary.translated > 0 {
        println!(
            "✅ Successfully wrote {} entries ({} translated) to {}",
            summary.entries, summary.translated, output
        );
    } else {
        println!("✅ Successfully wrote {} entries to {}", summary.entries, output);
    }
    Ok(())
}
