//! GeoPackage to GeoJSON conversion strategies.
//!
//! [`LibraryConverter`] reads the GeoPackage in process and reprojects with an
//! embedded [`CrsEngine`]. [`ProcessConverter`] hands the file to an external
//! `ogr2ogr`-compatible program. [`Converter`] picks one of the two on every
//! call, depending on whether its [`EngineProbe`] finds an engine.

mod library;
mod process;
mod scratch;

pub use library::LibraryConverter;
pub use process::ProcessConverter;

use crate::error::Result;
use crate::reproject::CrsEngine;
use std::ffi::OsString;
use std::fmt;
use std::io::Read;
use std::path::PathBuf;
use tracing::debug;

/// A way of turning GeoPackage bytes into GeoJSON FeatureCollection bytes.
pub trait Convert {
    fn convert(&self, source: &mut dyn Read) -> Result<Vec<u8>>;
}

/// Program and leading arguments used to run the external converter.
///
/// The converter is invoked as
/// `<program> [args...] -f GeoJSON /vsistdout/ <path>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConverterCommand {
    pub program: OsString,
    pub args: Vec<OsString>,
}

impl ConverterCommand {
    pub fn new<S: Into<OsString>>(program: S) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append an argument placed before the conversion arguments.
    pub fn arg<S: Into<OsString>>(mut self, arg: S) -> Self {
        self.args.push(arg.into());
        self
    }

    pub(crate) fn program_name(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }
}

impl Default for ConverterCommand {
    fn default() -> Self {
        Self::new("ogr2ogr")
    }
}

/// Options shared by both conversion paths.
#[derive(Clone, Debug)]
pub struct ConvertOptions {
    /// Keep a feature's original geometry when it cannot be reprojected,
    /// instead of failing the conversion.
    pub best_effort_reprojection: bool,
    pub converter: ConverterCommand,
    /// Directory for the temporary `.gpkg` copy. `None` uses the system
    /// temporary directory.
    pub temp_dir: Option<PathBuf>,
    /// Rows fetched per query while reading features.
    pub batch_size: u32,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            best_effort_reprojection: true,
            converter: ConverterCommand::default(),
            temp_dir: None,
            batch_size: 1024,
        }
    }
}

/// Looks for an embedded reprojection engine.
///
/// Called once per conversion; `None` routes the call to the external
/// converter.
pub trait EngineProbe {
    fn probe(&self) -> Option<Box<dyn CrsEngine>>;
}

impl<F> EngineProbe for F
where
    F: Fn() -> Option<Box<dyn CrsEngine>>,
{
    fn probe(&self) -> Option<Box<dyn CrsEngine>> {
        self()
    }
}

/// Probe for the engine compiled into this build.
///
/// Finds PROJ when built with the `reproject` feature and PROJ can create a
/// transformation at runtime.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemProbe;

impl EngineProbe for SystemProbe {
    #[cfg(feature = "reproject")]
    fn probe(&self) -> Option<Box<dyn CrsEngine>> {
        crate::reproject::ProjEngine::probe().map(|engine| Box::new(engine) as Box<dyn CrsEngine>)
    }

    #[cfg(not(feature = "reproject"))]
    fn probe(&self) -> Option<Box<dyn CrsEngine>> {
        None
    }
}

/// The conversion path chosen for a single call.
pub enum Backend {
    Library(LibraryConverter),
    Process(ProcessConverter),
}

impl Backend {
    /// Use the embedded library when `probe` finds an engine, the external
    /// converter otherwise.
    pub fn select<P: EngineProbe + ?Sized>(probe: &P, options: &ConvertOptions) -> Self {
        match probe.probe() {
            Some(engine) => {
                debug!("embedded engine available, converting in process");
                Self::Library(LibraryConverter::new(engine, options.clone()))
            }
            None => {
                debug!(
                    program = %options.converter.program_name(),
                    "no embedded engine, using external converter"
                );
                Self::Process(ProcessConverter::from_options(options))
            }
        }
    }
}

impl fmt::Debug for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Library(_) => f.write_str("Backend::Library"),
            Self::Process(converter) => f.debug_tuple("Backend::Process").field(converter).finish(),
        }
    }
}

impl Convert for Backend {
    fn convert(&self, source: &mut dyn Read) -> Result<Vec<u8>> {
        match self {
            Self::Library(converter) => converter.convert(source),
            Self::Process(converter) => converter.convert(source),
        }
    }
}

/// Converter that selects its [`Backend`] on every call.
///
/// A failed in-process conversion is returned as is; it is never retried
/// with the external converter.
#[derive(Debug)]
pub struct Converter<P = SystemProbe> {
    probe: P,
    options: ConvertOptions,
}

impl Converter<SystemProbe> {
    pub fn new(options: ConvertOptions) -> Self {
        Self::with_probe(SystemProbe, options)
    }
}

impl<P: EngineProbe> Converter<P> {
    pub fn with_probe(probe: P, options: ConvertOptions) -> Self {
        Self { probe, options }
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }
}

impl<P: EngineProbe> Convert for Converter<P> {
    fn convert(&self, source: &mut dyn Read) -> Result<Vec<u8>> {
        Backend::select(&self.probe, &self.options).convert(source)
    }
}

/// Convert a GeoPackage to GeoJSON with default options.
///
/// ```no_run
/// let file = std::fs::File::open("parcels.gpkg")?;
/// let geojson = gpkg_geojson::gpkg_to_geojson(file)?;
/// println!("{}", String::from_utf8_lossy(&geojson));
/// # Ok::<(), gpkg_geojson::ConvertError>(())
/// ```
pub fn gpkg_to_geojson<R: Read>(mut source: R) -> Result<Vec<u8>> {
    Converter::new(ConvertOptions::default()).convert(&mut source)
}
