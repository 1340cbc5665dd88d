//! Wiresphere viewer binary.
//!
//! ```text
//! wiresphere [--options <file.toml> | --preset <name>] [--save-options <file.toml>]
//!            [--headless [--frames <n>]]
//! ```
//!
//! Without `--headless` a window opens and runs until closed. Headless runs
//! render offscreen at the configured target frame rate.

use std::path::{Path, PathBuf};

use wiresphere::{
    bootstrap, CancelHandle, IntervalScheduler, Options, RenderContext,
    SphereError, Viewer,
};

/// Directory searched by `--preset`.
const PRESET_DIR: &str = "assets/view_presets";
/// Offscreen size for headless runs.
const HEADLESS_SIZE: (u32, u32) = (1280, 720);
/// Frames rendered headless when `--frames` is not given.
const DEFAULT_HEADLESS_FRAMES: u64 = 300;

#[derive(Debug, Default, PartialEq)]
struct Args {
    options: Option<PathBuf>,
    save_options: Option<PathBuf>,
    headless: bool,
    frames: Option<u64>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut parsed = Args::default();
    while let Some(arg) = args.next() {
        let mut value = |flag: &str| {
            args.next()
                .ok_or_else(|| format!("{flag} expects a value"))
        };
        match arg.as_str() {
            "--options" => parsed.options = Some(PathBuf::from(value("--options")?)),
            "--preset" => {
                let name = value("--preset")?;
                parsed.options =
                    Some(Path::new(PRESET_DIR).join(format!("{name}.toml")));
            }
            "--save-options" => {
                parsed.save_options = Some(PathBuf::from(value("--save-options")?));
            }
            "--headless" => parsed.headless = true,
            "--frames" => {
                let raw = value("--frames")?;
                let frames = raw
                    .parse()
                    .map_err(|_| format!("--frames expects a count, got `{raw}`"))?;
                parsed.frames = Some(frames);
            }
            other => return Err(format!("unknown argument `{other}`")),
        }
    }
    Ok(parsed)
}

fn load_options(args: &Args) -> Result<Options, SphereError> {
    let Some(path) = &args.options else {
        return Ok(Options::default());
    };
    if !path.exists() {
        let presets = Options::list_presets(Path::new(PRESET_DIR));
        log::warn!(
            "{} not found (available presets: {})",
            path.display(),
            presets.join(", ")
        );
    }
    let options = Options::load(path)?;
    log::info!("loaded options from {}", path.display());
    Ok(options)
}

fn run_headless(options: &Options, frames: u64) -> Result<(), SphereError> {
    let context = pollster::block_on(RenderContext::new_headless(HEADLESS_SIZE))?;
    let mut engine = bootstrap(context, options)?;
    let mut scheduler =
        IntervalScheduler::new(options.display.target_fps).with_frame_limit(frames);
    let ran = scheduler.run(&mut engine, &CancelHandle::new())?;
    log::info!("rendered {ran} headless frames ({:.1} fps)", scheduler.fps());
    Ok(())
}

fn run(args: &Args) -> Result<(), SphereError> {
    let options = load_options(args)?;
    if let Some(path) = &args.save_options {
        options.save(path)?;
        log::info!("saved options to {}", path.display());
    }

    if args.headless {
        return run_headless(&options, args.frames.unwrap_or(DEFAULT_HEADLESS_FRAMES));
    }
    Viewer::builder().with_options(options).build().run()
}

fn main() {
    env_logger::init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            log::error!("{e}");
            std::process::exit(2);
        }
    };

    if let Err(e) = run(&args) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, String> {
        parse_args(args.iter().map(|s| (*s).to_owned()))
    }

    #[test]
    fn no_arguments_opens_a_window_with_defaults() {
        assert_eq!(parse(&[]).unwrap(), Args::default());
    }

    #[test]
    fn preset_resolves_to_the_preset_dir() {
        let args = parse(&["--preset", "glow"]).unwrap();
        assert_eq!(
            args.options,
            Some(Path::new(PRESET_DIR).join("glow.toml"))
        );
    }

    #[test]
    fn headless_with_frame_count() {
        let args = parse(&["--headless", "--frames", "12"]).unwrap();
        assert!(args.headless);
        assert_eq!(args.frames, Some(12));
    }

    #[test]
    fn bad_arguments_are_reported() {
        assert!(parse(&["--frames", "many"]).is_err());
        assert!(parse(&["--options"]).is_err());
        assert!(parse(&["--fullscreen"]).is_err());
    }

    #[test]
    fn missing_options_file_is_an_io_error() {
        let args = Args {
            options: Some(PathBuf::from("does/not/exist.toml")),
            ..Args::default()
        };
        assert!(matches!(load_options(&args), Err(SphereError::Io(_))));
    }
}
