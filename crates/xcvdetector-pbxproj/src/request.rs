use crate::error::DetectError;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Target platform, with the SDK root and deployment-target setting that
/// identify it in a build configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Platform {
    #[default]
    Ios,
    Macos,
    Tvos,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Ios, Platform::Macos, Platform::Tvos];

    /// Short name used on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Platform::Ios => "ios",
            Platform::Macos => "macos",
            Platform::Tvos => "tvos",
        }
    }

    /// Value of `SDKROOT` for this platform.
    pub fn sdk(&self) -> &'static str {
        match self {
            Platform::Ios => "iphoneos",
            Platform::Macos => "macosx",
            Platform::Tvos => "appletvos",
        }
    }

    pub fn deployment_target_setting(&self) -> &'static str {
        match self {
            Platform::Ios => "IPHONEOS_DEPLOYMENT_TARGET",
            Platform::Macos => "MACOSX_DEPLOYMENT_TARGET",
            Platform::Tvos => "TVOS_DEPLOYMENT_TARGET",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(name.trim()))
    }

    /// The platform implied by a deployment-target setting name.
    pub fn from_deployment_target(setting: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.deployment_target_setting() == setting)
    }
}

/// Build configuration to read settings from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Configuration {
    Debug,
    #[default]
    Release,
}

impl Configuration {
    pub const ALL: [Configuration; 2] = [Configuration::Debug, Configuration::Release];

    /// Capitalized spelling used by Xcode in `name = ...;` lines.
    pub fn name(&self) -> &'static str {
        match self {
            Configuration::Debug => "Debug",
            Configuration::Release => "Release",
        }
    }

    /// Comment tag attached to the configuration's object identifier.
    pub fn marker(&self) -> String {
        format!("/* {} */", self.name())
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(name.trim()))
    }
}

/// Which fields the result must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputMode {
    Version,
    Build,
    #[default]
    Full,
}

impl OutputMode {
    pub const ALL: [OutputMode; 3] = [OutputMode::Version, OutputMode::Build, OutputMode::Full];

    pub fn name(&self) -> &'static str {
        match self {
            OutputMode::Version => "version",
            OutputMode::Build => "build",
            OutputMode::Full => "full",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(name.trim()))
    }
}

/// Separator between version and build in [`OutputMode::Full`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputFormat {
    Dot,
    Brackets,
    #[default]
    Line,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [OutputFormat::Dot, OutputFormat::Brackets, OutputFormat::Line];

    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::Dot => "dot",
            OutputFormat::Brackets => "brackets",
            OutputFormat::Line => "line",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(name.trim()))
    }
}

macro_rules! impl_name_traits {
    ($($ty:ident => $what:literal),* $(,)?) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.name())
                }
            }

            impl FromStr for $ty {
                type Err = String;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    $ty::parse(s).ok_or_else(|| {
                        let expected: Vec<&str> = $ty::ALL.iter().map(|v| v.name()).collect();
                        format!(
                            "unknown {} '{}' (expected one of: {})",
                            $what,
                            s.trim(),
                            expected.join(", ")
                        )
                    })
                }
            }
        )*
    };
}

impl_name_traits! {
    Platform => "platform",
    OutputMode => "mode",
    OutputFormat => "format",
}

// Displayed lowercase on the command line, unlike `name()`.
impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Configuration::Debug => f.write_str("debug"),
            Configuration::Release => f.write_str("release"),
        }
    }
}

impl FromStr for Configuration {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Configuration::parse(s).ok_or_else(|| {
            format!(
                "unknown configuration '{}' (expected one of: debug, release)",
                s.trim()
            )
        })
    }
}

/// Resolved inputs for one detection run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub project_path: PathBuf,
    pub bundle_id: String,
    pub configuration: Configuration,
    pub platform: Platform,
    pub mode: OutputMode,
    pub format: OutputFormat,
}

impl Request {
    pub fn new(project_path: impl Into<PathBuf>, bundle_id: impl Into<String>) -> Request {
        Request {
            project_path: project_path.into(),
            bundle_id: bundle_id.into(),
            configuration: Configuration::default(),
            platform: Platform::default(),
            mode: OutputMode::default(),
            format: OutputFormat::default(),
        }
    }

    /// Build a request from optional user inputs. Empty strings count as
    /// missing.
    pub fn from_inputs(
        project_path: Option<PathBuf>,
        bundle_id: Option<String>,
    ) -> Result<Request, DetectError> {
        let project_path = project_path.filter(|p| !p.as_os_str().is_empty());
        let bundle_id = bundle_id
            .map(|b| b.trim().to_string())
            .filter(|b| !b.is_empty());

        match (project_path, bundle_id) {
            (None, None) => Err(DetectError::MissingPathOrBundle),
            (None, Some(_)) => Err(DetectError::MissingPath),
            (Some(_), None) => Err(DetectError::MissingBundle),
            (Some(path), Some(bundle_id)) => Ok(Request::new(path, bundle_id)),
        }
    }

    pub fn with_configuration(mut self, configuration: Configuration) -> Self {
        self.configuration = configuration;
        self
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn with_mode(mut self, mode: OutputMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }
}
