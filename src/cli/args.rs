use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "insarchive",
    version,
    about = "Create archival HDF5 interferogram products from InSAR processor output"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,

    /// Enable logging
    #[arg(long, global = true, default_value_t = false)]
    pub log: bool,

    /// Directory the container is written into
    #[arg(long, global = true, default_value = ".")]
    pub output_dir: PathBuf,
}

#[derive(Subcommand)]
pub enum Command {
    /// Convert ROI_PAC output (geo_*.unw/int/cor plus rsc sidecars)
    Roipac(RoipacArgs),
    /// Convert GMTSAR output (geocoded _ll.grd rasters plus PRM sidecars)
    Gmtsar(GmtsarArgs),
    /// Convert ISCE output (geocoded rasters plus XML property trees)
    Isce(IsceArgs),
}

/// Recommended archival metadata, shared by all converters. Anything set
/// here beats the values recovered from the processing sidecars.
#[derive(Args)]
pub struct OverrideArgs {
    /// Name of the mission
    #[arg(long)]
    pub mission: Option<String>,

    /// Type of processing: INTERFEROGRAM, LOS_VELOCITY, ...
    #[arg(long, default_value = "INTERFEROGRAM")]
    pub processing_type: String,

    /// Beam mode of the acquisition
    #[arg(long)]
    pub beam_mode: Option<String>,

    /// Frame number
    #[arg(long)]
    pub frame: Option<i64>,

    /// Polarization (VV, HH, ...)
    #[arg(long)]
    pub polarization: Option<String>,

    /// Flight direction (A or D)
    #[arg(long)]
    pub flight: Option<String>,

    /// Look direction (R or L)
    #[arg(long)]
    pub look: Option<String>,

    /// Processing software name
    #[arg(long)]
    pub software: Option<String>,

    /// Processing software version
    #[arg(long)]
    pub software_version: Option<String>,

    /// Atmospheric correction method applied, if any
    #[arg(long)]
    pub atmos_correct_method: Option<String>,

    /// Institution that produced the product
    #[arg(long)]
    pub institution: Option<String>,
}

#[derive(Args)]
pub struct RoipacArgs {
    /// SLC rsc file of the first (master) acquisition
    #[arg(long)]
    pub rsc1: PathBuf,

    /// SLC rsc file of the second (slave) acquisition
    #[arg(long)]
    pub rsc2: PathBuf,

    /// Swath name without underscores
    #[arg(long)]
    pub swath: String,

    /// Baseline rsc file (default: <first>_<last>_baseline.rsc)
    #[arg(long)]
    pub baseline: Option<PathBuf>,

    /// Unwrapped interferogram (default: geo_<first>-<last>.unw)
    #[arg(long)]
    pub unw: Option<PathBuf>,

    /// Wrapped interferogram (default: geo_<first>-<last>.int)
    #[arg(long)]
    pub int: Option<PathBuf>,

    /// Correlation raster (default: geo_<first>-<last>.cor)
    #[arg(long)]
    pub cor: Option<PathBuf>,

    /// Incidence-angle raster (default: geo_incidence.unw)
    #[arg(long)]
    pub incidence: Option<PathBuf>,

    /// DEM raster (default: ../DEM/roipac.dem)
    #[arg(long)]
    pub dem: Option<PathBuf>,

    /// Directory the default raster names resolve under
    #[arg(long, default_value = ".")]
    pub work_dir: PathBuf,

    #[command(flatten)]
    pub overrides: OverrideArgs,
}

#[derive(Args)]
pub struct GmtsarArgs {
    /// PRM file of the first (master) acquisition
    #[arg(long, default_value = "master.PRM")]
    pub prm1: PathBuf,

    /// PRM file of the second (slave) acquisition
    #[arg(long, default_value = "slave.PRM")]
    pub prm2: PathBuf,

    /// Relative orbit / track / path number
    #[arg(long)]
    pub relative_orbit: i64,

    /// WKT polygon covering the swath
    #[arg(long)]
    pub footprint: String,

    /// Swath name without underscores
    #[arg(long)]
    pub swath: String,

    /// Wrapped-phase grid
    #[arg(long, default_value = "phase_ll.grd")]
    pub wrapped: PathBuf,

    /// Unwrapped-phase grid
    #[arg(long, default_value = "unwrap_ll.grd")]
    pub unwrapped: PathBuf,

    /// Filtered wrapped-phase grid
    #[arg(long, default_value = "phasefilt_ll.grd")]
    pub filtered: PathBuf,

    /// Correlation grid
    #[arg(long, default_value = "corr_ll.grd")]
    pub correlation: PathBuf,

    #[command(flatten)]
    pub overrides: OverrideArgs,
}

#[derive(Args)]
pub struct IsceArgs {
    /// Property tree of the geocoded wrapped interferogram
    #[arg(long, default_value = "filt_topophase.flat.geo.xml")]
    pub xml: PathBuf,

    /// Geocoded wrapped interferogram
    #[arg(long, default_value = "filt_topophase.flat.geo")]
    pub int: PathBuf,

    /// Geocoded unwrapped interferogram
    #[arg(long, default_value = "filt_topophase.flat.unw.geo")]
    pub unw: PathBuf,

    /// Geocoded correlation raster
    #[arg(long, default_value = "phsig.cor.geo")]
    pub cor: PathBuf,

    /// Geocoded line-of-sight raster
    #[arg(long, default_value = "los.rdr.geo")]
    pub los: PathBuf,

    /// Run-level processing tree
    #[arg(long, default_value = "insarProc.xml")]
    pub proc_xml: PathBuf,

    /// Processing log used for the footprint fallback
    #[arg(long, default_value = "isce.log")]
    pub processing_log: PathBuf,

    /// WKT polygon covering the swath (skips the log fallback)
    #[arg(long)]
    pub footprint: Option<String>,

    /// Swath name without underscores
    #[arg(long)]
    pub swath: String,

    #[command(flatten)]
    pub overrides: OverrideArgs,
}
