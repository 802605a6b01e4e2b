use gpkg_geojson::{Convert, ConvertOptions, Converter};
use std::io::Write;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run() {
        eprintln!("gpkg_to_geojson failed: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args()
        .nth(1)
        .ok_or("Usage: gpkg_to_geojson <path-to-gpkg | ->")?;
    let converter = Converter::new(ConvertOptions::default());

    let geojson = if path == "-" {
        converter.convert(&mut std::io::stdin().lock())?
    } else {
        converter.convert(&mut std::fs::File::open(&path)?)?
    };

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&geojson)?;
    stdout.flush()?;
    Ok(())
}
