use std::path::PathBuf;

use tracing::info;

use insarchive::api::{
    GmtsarJob, IsceJob, RoipacJob, SceneOverrides, convert_gmtsar, convert_isce, convert_roipac,
};

use super::args::{CliArgs, Command, OverrideArgs};

// Per-dialect defaults matching the legacy converter scripts; explicit
// flags always win.
fn scene_overrides(
    args: OverrideArgs,
    software: &str,
    version: &str,
    institution: Option<&str>,
) -> SceneOverrides {
    SceneOverrides {
        mission: args.mission,
        processing_type: args.processing_type,
        beam_mode: args.beam_mode,
        frame: args.frame,
        polarization: args.polarization,
        flight_direction: args.flight,
        look_direction: args.look,
        processing_software: args.software.or_else(|| Some(software.to_string())),
        processing_software_version: args
            .software_version
            .or_else(|| Some(version.to_string())),
        processing_atmos_correct_method: args.atmos_correct_method,
        processing_facility: args.institution.or_else(|| institution.map(str::to_string)),
    }
}

pub fn run(args: CliArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.log {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .init();
    }

    let output_dir: PathBuf = args.output_dir;

    let written = match args.command {
        Command::Roipac(a) => {
            let overrides = scene_overrides(a.overrides, "ROI_PAC", "3.1", Some("UNAVCO"));
            let job = RoipacJob {
                rsc1: a.rsc1,
                rsc2: a.rsc2,
                beam_swath: a.swath,
                baseline_rsc: a.baseline,
                unwrapped: a.unw,
                wrapped: a.int,
                correlation: a.cor,
                incidence: a.incidence,
                dem: a.dem,
                work_dir: a.work_dir,
                output_dir,
            };
            convert_roipac(&job, &overrides)?
        }
        Command::Gmtsar(a) => {
            let overrides = scene_overrides(a.overrides, "GMTSAR", "9.4", Some("UNAVCO"));
            let job = GmtsarJob {
                prm1: a.prm1,
                prm2: a.prm2,
                relative_orbit: a.relative_orbit,
                footprint: a.footprint,
                beam_swath: a.swath,
                wrapped: a.wrapped,
                unwrapped: a.unwrapped,
                filtered: a.filtered,
                correlation: a.correlation,
                output_dir,
            };
            convert_gmtsar(&job, &overrides)?
        }
        Command::Isce(a) => {
            let overrides = scene_overrides(a.overrides, "ISCE", "2.0.0", None);
            let job = IsceJob {
                raster_xml: a.xml,
                wrapped: a.int,
                unwrapped: a.unw,
                correlation: a.cor,
                los: a.los,
                proc_xml: a.proc_xml,
                processing_log: a.processing_log,
                footprint: a.footprint,
                beam_swath: a.swath,
                output_dir,
            };
            convert_isce(&job, &overrides)?
        }
    };

    info!("Successfully archived: {:?}", written);
    Ok(())
}
