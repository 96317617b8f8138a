//! Line scanner over the `XCBuildConfiguration` section of a pbxproj.
//!
//! The project text is not parsed as a property list. Each build
//! configuration block starts at a line carrying the `/* <Configuration> */`
//! marker and ends at its `name = <Configuration>;` line. Settings seen in
//! between are collected, and a block is accepted once it names the
//! requested bundle id, targets the requested SDK, and carries the fields
//! the output mode needs. A rejected block may still be rescued by the
//! target's Info.plist.

use crate::error::DetectError;
use crate::project::{PlistResolver, ProjectLocation};
use crate::request::{OutputFormat, OutputMode, Platform, Request};
use crate::setting::Setting;
use log::{debug, info};
use std::mem;
use std::path::Path;

const SDKROOT: &str = "SDKROOT";
const PRODUCT_BUNDLE_IDENTIFIER: &str = "PRODUCT_BUNDLE_IDENTIFIER";
const CURRENT_PROJECT_VERSION: &str = "CURRENT_PROJECT_VERSION";
const MARKETING_VERSION: &str = "MARKETING_VERSION";
const INFOPLIST_FILE: &str = "INFOPLIST_FILE";
const CONFIGURATION_NAME: &str = "name";

/// A marketing version and build number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Version {
    pub version: String,
    pub build: String,
}

impl Version {
    /// Format for output. The format only applies to [`OutputMode::Full`].
    pub fn render(&self, mode: OutputMode, format: OutputFormat) -> String {
        match mode {
            OutputMode::Version => self.version.clone(),
            OutputMode::Build => self.build.clone(),
            OutputMode::Full => match format {
                OutputFormat::Dot => format!("{}.{}", self.version, self.build),
                OutputFormat::Brackets => format!("{} ({})", self.version, self.build),
                OutputFormat::Line => format!("{}_{}", self.version, self.build),
            },
        }
    }
}

#[derive(Debug, Default)]
struct ScanState {
    in_block: bool,
    bundle_matched: bool,
    sdk_root: Option<String>,
    inferred_sdk: Option<&'static str>,
    version: String,
    build: String,
    info_plist: String,
}

impl ScanState {
    fn open() -> ScanState {
        ScanState {
            in_block: true,
            ..ScanState::default()
        }
    }

    /// An explicit `SDKROOT` wins over a deployment target.
    fn sdk(&self) -> Option<&str> {
        self.sdk_root.as_deref().or(self.inferred_sdk)
    }

    fn sdk_matches(&self, platform: Platform) -> bool {
        self.sdk() == Some(platform.sdk())
    }

    fn has_fields(&self, mode: OutputMode) -> bool {
        match mode {
            OutputMode::Build => !self.build.is_empty(),
            OutputMode::Version => !self.version.is_empty(),
            OutputMode::Full => !self.version.is_empty() && !self.build.is_empty(),
        }
    }

    fn accepts(&self, request: &Request) -> bool {
        self.bundle_matched && self.sdk_matches(request.platform) && self.has_fields(request.mode)
    }

    fn apply(&mut self, setting: &Setting<'_>, bundle_id: &str) {
        match setting.name {
            SDKROOT => self.sdk_root = Some(setting.value.to_string()),
            PRODUCT_BUNDLE_IDENTIFIER => {
                if setting.value.contains(bundle_id) {
                    self.bundle_matched = true;
                }
            }
            CURRENT_PROJECT_VERSION => self.build = setting.value.to_string(),
            MARKETING_VERSION => self.version = setting.value.to_string(),
            INFOPLIST_FILE => self.info_plist = setting.unquoted(),
            name => {
                if let Some(platform) = Platform::from_deployment_target(name) {
                    self.inferred_sdk = Some(platform.sdk());
                }
            }
        }
    }

    fn take_version(&mut self) -> Version {
        Version {
            version: mem::take(&mut self.version),
            build: mem::take(&mut self.build),
        }
    }
}

/// Scan project text for the version and build of the requested target.
///
/// Stops at the first accepted block. `resolver` is only consulted for
/// blocks on the requested platform that name an Info.plist, and its
/// failures are ignored.
pub fn extract<R>(text: &str, request: &Request, resolver: &R) -> Result<Version, DetectError>
where
    R: PlistResolver + ?Sized,
{
    let marker = request.configuration.marker();
    let configuration = request.configuration.name();
    let source_root = ProjectLocation::new(&request.project_path).source_root();
    let mut state = ScanState::default();

    for (index, line) in text.lines().enumerate() {
        if line.contains(&marker) {
            debug!("line {}: {configuration} block starts", index + 1);
            state = ScanState::open();
        }

        if !state.in_block {
            continue;
        }

        let Some(setting) = Setting::parse(line) else {
            continue;
        };

        if setting.name == CONFIGURATION_NAME && setting.value == configuration {
            debug!("line {}: {configuration} block ends", index + 1);
            state.in_block = false;
            if let Some(version) = close_block(&mut state, request, &source_root, resolver) {
                return Ok(version);
            }
            continue;
        }

        state.apply(&setting, &request.bundle_id);
    }

    // A block truncated by the end of the text still counts if it is
    // complete on its own.
    if state.in_block && state.accepts(request) {
        info!("accepted unterminated {configuration} block for {}", request.bundle_id);
        return Ok(state.take_version());
    }

    Err(unresolved(&state, request))
}

fn close_block<R>(
    state: &mut ScanState,
    request: &Request,
    source_root: &Path,
    resolver: &R,
) -> Option<Version>
where
    R: PlistResolver + ?Sized,
{
    if state.accepts(request) {
        info!(
            "accepted {} block for {}",
            request.configuration.name(),
            request.bundle_id
        );
        return Some(state.take_version());
    }

    if state.sdk_matches(request.platform) && !state.info_plist.is_empty() {
        let path = source_root.join(&state.info_plist);
        match resolver.resolve(&path) {
            Ok(plist) => {
                state.version = plist.version.unwrap_or_default();
                state.build = plist.build.unwrap_or_default();
                if state.accepts(request) {
                    info!(
                        "accepted {} block for {} using {}",
                        request.configuration.name(),
                        request.bundle_id,
                        path.display()
                    );
                    return Some(state.take_version());
                }
            }
            Err(err) => debug!("ignoring {}: {err}", path.display()),
        }
    }

    debug!(
        "rejected block (bundle matched: {}, sdk: {:?})",
        state.bundle_matched,
        state.sdk()
    );
    state.version.clear();
    state.build.clear();
    None
}

fn unresolved(state: &ScanState, request: &Request) -> DetectError {
    let not_found = || DetectError::NotFound {
        bundle_id: request.bundle_id.clone(),
        path: request.project_path.clone(),
        platform: request.platform,
    };

    if state.version.is_empty() && state.build.is_empty() {
        not_found()
    } else if state.version.is_empty() && request.mode != OutputMode::Build {
        DetectError::MissingVersion
    } else if state.build.is_empty() && request.mode != OutputMode::Version {
        DetectError::MissingBuild
    } else {
        not_found()
    }
}
