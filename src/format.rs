//! Target formats and the static format → backend capability table.

use crate::error::PcmforgeError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Output container/codec requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatTag {
    Wav,
    Au,
    Aiff,
    Mp3,
    Ogg,
    Flac,
    Aac,
    M4a,
}

impl FormatTag {
    pub const ALL: [FormatTag; 8] = [
        FormatTag::Wav,
        FormatTag::Au,
        FormatTag::Aiff,
        FormatTag::Mp3,
        FormatTag::Ogg,
        FormatTag::Flac,
        FormatTag::Aac,
        FormatTag::M4a,
    ];

    /// Canonical lowercase name, also used as the file extension.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Au => "au",
            Self::Aiff => "aiff",
            Self::Mp3 => "mp3",
            Self::Ogg => "ogg",
            Self::Flac => "flac",
            Self::Aac => "aac",
            Self::M4a => "m4a",
        }
    }

    pub fn extension(&self) -> &'static str {
        self.as_str()
    }

    /// Backend kinds able to produce this format, in priority order.
    pub fn capable_backends(&self) -> &'static [BackendKind] {
        use BackendKind::*;
        match self {
            Self::Wav => &[Native, External],
            Self::Au | Self::Aiff => &[Native],
            Self::Mp3 | Self::Ogg | Self::Flac => &[Library, External],
            Self::Aac | Self::M4a => &[External],
        }
    }

    pub fn is_capable(&self, kind: BackendKind) -> bool {
        self.capable_backends().contains(&kind)
    }
}

impl fmt::Display for FormatTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormatTag {
    type Err = PcmforgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        FormatTag::ALL
            .into_iter()
            .find(|tag| tag.as_str() == lower)
            .ok_or(PcmforgeError::UnsupportedFormat { format: lower })
    }
}

/// Conversion strategy, ordered by dispatch priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// In-process container writer (wav, au, aiff).
    Native,
    /// Attribute-driven transcoding library fed a WAV intermediate.
    Library,
    /// Command-line transcoder fed raw PCM.
    External,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Native => "native",
            Self::Library => "library",
            Self::External => "external",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const PREFERRED_IN_PROCESS: &str = "Native encoder / transcoding library";
pub const PREFERRED_EXTERNAL: &str = "FFmpeg";
pub const NOT_SUPPORTED: &str = "Not supported";

/// Which conversion paths can handle a format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionInfo {
    pub format: String,
    /// Native encoder or transcoding library can produce the format.
    pub library_supported: bool,
    pub external_supported: bool,
}

impl ConversionInfo {
    /// Capability lookup for a raw tag; unknown tags report nothing supported.
    pub fn for_format(format: &str) -> Self {
        let lower = format.trim().to_lowercase();
        match lower.parse::<FormatTag>() {
            Ok(tag) => Self {
                format: lower,
                library_supported: tag.is_capable(BackendKind::Native)
                    || tag.is_capable(BackendKind::Library),
                external_supported: tag.is_capable(BackendKind::External),
            },
            Err(_) => Self {
                format: lower,
                library_supported: false,
                external_supported: false,
            },
        }
    }

    pub fn is_supported(&self) -> bool {
        self.library_supported || self.external_supported
    }

    pub fn preferred_method(&self) -> &'static str {
        if self.library_supported {
            PREFERRED_IN_PROCESS
        } else if self.external_supported {
            PREFERRED_EXTERNAL
        } else {
            NOT_SUPPORTED
        }
    }
}

impl fmt::Display for ConversionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ConversionInfo{{format='{}', library={}, external={}, preferred='{}'}}",
            self.format,
            self.library_supported,
            self.external_supported,
            self.preferred_method()
        )
    }
}

/// Rough cost of converting to a format along its preferred path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PerformanceInfo {
    pub speed: &'static str,
    pub resource_usage: &'static str,
    pub dependencies: &'static str,
}

impl PerformanceInfo {
    pub fn for_format(format: &str) -> Self {
        let info = ConversionInfo::for_format(format);
        if info.library_supported {
            if is_native_supported(format) {
                Self {
                    speed: "Fastest",
                    resource_usage: "Very Low",
                    dependencies: "None",
                }
            } else {
                Self {
                    speed: "Fast",
                    resource_usage: "Low",
                    dependencies: "Native libraries required",
                }
            }
        } else if info.external_supported {
            Self {
                speed: "Slower",
                resource_usage: "High",
                dependencies: "FFmpeg binary required",
            }
        } else {
            Self {
                speed: "Not supported",
                resource_usage: "N/A",
                dependencies: "Format not supported",
            }
        }
    }
}

impl fmt::Display for PerformanceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Performance{{speed='{}', resources='{}', deps='{}'}}",
            self.speed, self.resource_usage, self.dependencies
        )
    }
}

/// True when the format needs nothing outside this process.
pub fn is_native_supported(format: &str) -> bool {
    format
        .parse::<FormatTag>()
        .map(|tag| tag.is_capable(BackendKind::Native))
        .unwrap_or(false)
}
