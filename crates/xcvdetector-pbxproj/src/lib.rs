//! Marketing version and build number detection for Xcode projects.

mod error;
mod project;
mod request;
mod scan;
mod setting;

pub use error::DetectError;
pub use project::{find_project, FileReader, FsReader, PlistResolver, ProjectLocation};
pub use request::{Configuration, OutputFormat, OutputMode, Platform, Request};
pub use scan::{extract, Version};
pub use setting::Setting;
pub use xcvdetector_plist::{InfoPlist, PlistError};

/// Read the request's project and render its version per mode and format.
pub fn detect<F, R>(request: &Request, reader: &F, resolver: &R) -> Result<String, DetectError>
where
    F: FileReader + ?Sized,
    R: PlistResolver + ?Sized,
{
    let location = ProjectLocation::new(&request.project_path);
    log::debug!("reading {}", location.pbxproj.display());

    let text = reader
        .read_to_string(&location.pbxproj)
        .map_err(|source| DetectError::ReadFailure {
            path: location.pbxproj.clone(),
            source,
        })?;

    let version = extract(&text, request, resolver)?;
    Ok(version.render(request.mode, request.format))
}
