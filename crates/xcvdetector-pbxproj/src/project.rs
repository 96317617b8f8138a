use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use xcvdetector_plist::{InfoPlist, PlistError};

/// Where an Xcode project lives on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLocation {
    /// The `.xcodeproj` bundle.
    pub xcodeproj: PathBuf,
    /// The `project.pbxproj` file inside it.
    pub pbxproj: PathBuf,
}

impl ProjectLocation {
    /// Accepts either the `.xcodeproj` directory or the `.pbxproj` file.
    pub fn new(path: &Path) -> ProjectLocation {
        if path.extension().is_some_and(|ext| ext == "pbxproj") {
            let xcodeproj = path.parent().unwrap_or_else(|| Path::new("")).to_path_buf();
            return ProjectLocation {
                xcodeproj,
                pbxproj: path.to_path_buf(),
            };
        }

        ProjectLocation {
            xcodeproj: path.to_path_buf(),
            pbxproj: path.join("project.pbxproj"),
        }
    }

    /// Directory containing the `.xcodeproj`. `INFOPLIST_FILE` values are
    /// relative to it.
    pub fn source_root(&self) -> PathBuf {
        self.xcodeproj
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .to_path_buf()
    }
}

/// Find the first `.xcodeproj` in a directory, by name. Unreadable
/// directories yield nothing.
pub fn find_project(dir: &Path) -> Option<PathBuf> {
    let entries = fs::read_dir(dir).ok()?;
    let mut projects: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "xcodeproj"))
        .collect();
    projects.sort();
    projects.into_iter().next()
}

/// Reads the project text.
pub trait FileReader {
    fn read_to_string(&self, path: &Path) -> io::Result<String>;
}

/// Loads an Info.plist for the fallback lookup.
pub trait PlistResolver {
    fn resolve(&self, path: &Path) -> Result<InfoPlist, PlistError>;
}

/// Reads from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsReader;

impl FileReader for FsReader {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }
}

impl PlistResolver for FsReader {
    fn resolve(&self, path: &Path) -> Result<InfoPlist, PlistError> {
        xcvdetector_plist::read_info_plist(path)
    }
}

impl<F> FileReader for F
where
    F: Fn(&Path) -> io::Result<String>,
{
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self(path)
    }
}

impl<F> PlistResolver for F
where
    F: Fn(&Path) -> Result<InfoPlist, PlistError>,
{
    fn resolve(&self, path: &Path) -> Result<InfoPlist, PlistError> {
        self(path)
    }
}
