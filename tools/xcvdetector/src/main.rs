use anyhow::Result;
use clap::Parser;
use std::env;
use std::path::PathBuf;
use std::process;
use xcvdetector_pbxproj::{
    detect, find_project, Configuration, FsReader, OutputFormat, OutputMode, Platform, Request,
};

const AFTER_HELP: &str = "\
Examples:
  $ xcvdetector -p ../demo/demoApp.xcodeproj -b com.companyName.demo -f dot
  > 1.0.0.1
  $ xcvdetector -p ../demo/demoApp.xcodeproj -b com.companyName.demo
  > 1.0.0_1
  $ xcvdetector -p ../demo/demoAppMac.xcodeproj -b com.companyName.demo -platform macos -f brackets
  > 1.0 (2)

Formats (full mode only):
  dot: 1.0.0.1    brackets: 1.0.0 (1)    line: 1.0.0_1

Modes:
  version: 1.0.0    build: 1    full: 1.0.0_1

MARKETING_VERSION and CURRENT_PROJECT_VERSION are read from project.pbxproj.
Either may be missing if it was never changed in the target's General settings.
In that case the target's Info.plist is searched for CFBundleShortVersionString
and CFBundleVersion, but a result is not guaranteed.

The bundle id matches any PRODUCT_BUNDLE_IDENTIFIER containing it, so
com.company.app also matches com.company.app-dev. The first matching target wins.

Set XCVDETECTOR_LOG=debug (or pass -v) to trace the scan.";

#[derive(Parser, Debug)]
#[command(
    name = "xcvdetector",
    disable_version_flag = true,
    about = "Extract marketing and build version numbers from an Xcode project",
    after_help = AFTER_HELP
)]
struct Cli {
    /// Path to the .xcodeproj (or its project.pbxproj). Defaults to the first
    /// project in the current directory
    #[arg(short = 'p', long)]
    path: Option<PathBuf>,

    /// Target bundle id
    #[arg(short = 'b', long)]
    bundle: Option<String>,

    /// Version/build separator in full mode: dot, brackets or line
    #[arg(short = 'f', long, default_value_t = OutputFormat::Line)]
    format: OutputFormat,

    /// What to print: version, build or full
    #[arg(short = 'm', long, default_value_t = OutputMode::Full)]
    mode: OutputMode,

    /// Build configuration: debug or release
    #[arg(short = 'c', long, default_value_t = Configuration::Release)]
    configuration: Configuration,

    /// Target platform: ios, macos or tvos
    #[arg(long, default_value_t = Platform::Ios)]
    platform: Platform,

    /// Log the scan to stderr
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Print the bare version number and exit
    #[arg(long)]
    version: bool,
}

impl Cli {
    /// Resolve the request, falling back to `discover` for the project path.
    fn into_request(self, discover: impl FnOnce() -> Option<PathBuf>) -> Result<Request> {
        let path = self.path.or_else(discover);
        let request = Request::from_inputs(path, self.bundle)?
            .with_configuration(self.configuration)
            .with_platform(self.platform)
            .with_mode(self.mode)
            .with_format(self.format);
        Ok(request)
    }
}

/// Trim arguments and accept the single-dash `-platform` spelling.
fn normalize_args<I>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    args.into_iter()
        .map(|arg| {
            let arg = arg.trim();
            if arg.eq_ignore_ascii_case("-platform") {
                "--platform".to_string()
            } else {
                arg.to_string()
            }
        })
        .collect()
}

fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::new().filter_or("XCVDETECTOR_LOG", "warn"));
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder
        .format_timestamp(None)
        .target(env_logger::Target::Stderr)
        .init();
}

fn run(cli: Cli) -> Result<String> {
    if cli.version {
        return Ok(env!("CARGO_PKG_VERSION").to_string());
    }
    let request = cli.into_request(|| env::current_dir().ok().and_then(|cwd| find_project(&cwd)))?;
    log::debug!(
        "looking for {} ({}, {}) in {}",
        request.bundle_id,
        request.configuration.name(),
        request.platform,
        request.project_path.display()
    );
    Ok(detect(&request, &FsReader, &FsReader)?)
}

fn main() {
    let cli = Cli::parse_from(normalize_args(env::args()));
    init_logging(cli.verbose);

    match run(cli) {
        Ok(output) => println!("{output}"),
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(1);
        }
    }
}
