//! Unity version parsing and player-version dispatch
//!
//! Bundles record the player version that wrote them. The node directory
//! layout differs between the 5.3.3 patch line and everything from 5.3.4p0
//! on, so the version string decides which decoder runs.

use crate::error::{BinaryError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unity version type (release channel)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum UnityVersionType {
    /// Alpha release
    A = 0,
    /// Beta release
    B = 1,
    /// China release
    C = 2,
    /// Final release
    #[default]
    F = 3,
    /// Patch release
    P = 4,
    /// Experimental release
    X = 5,
    /// Unknown/Custom release
    U = 6,
}

impl fmt::Display for UnityVersionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            UnityVersionType::A => "a",
            UnityVersionType::B => "b",
            UnityVersionType::C => "c",
            UnityVersionType::F => "f",
            UnityVersionType::P => "p",
            UnityVersionType::X => "x",
            UnityVersionType::U => "u",
        };
        f.write_str(letter)
    }
}

impl UnityVersionType {
    fn from_letter(letter: &str) -> Self {
        match letter.to_ascii_lowercase().as_str() {
            "a" => UnityVersionType::A,
            "b" => UnityVersionType::B,
            "c" => UnityVersionType::C,
            "" | "f" => UnityVersionType::F,
            "p" => UnityVersionType::P,
            "x" => UnityVersionType::X,
            _ => UnityVersionType::U,
        }
    }
}

/// Unity version such as `5.3.4p1` or `2017.4.40f1`
///
/// A bare `5.6.0` orders as `5.6.0f0` but displays without the suffix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnityVersion {
    pub major: u16,
    pub minor: u16,
    pub build: u16,
    pub version_type: UnityVersionType,
    pub type_number: u8,
    /// Whether the source text carried a release letter or number
    #[serde(default = "default_has_suffix")]
    pub has_suffix: bool,
}

fn default_has_suffix() -> bool {
    true
}

fn version_regex() -> Result<Regex> {
    Regex::new(r"^(\d+)\.(\d+)\.(\d+)([a-zA-Z]?)(\d*)")
        .map_err(|e| BinaryError::invalid_data(format!("Regex error: {}", e)))
}

fn parse_component<T: FromStr>(text: &str, what: &str, version: &str) -> Result<T> {
    text.parse::<T>().map_err(|_| {
        BinaryError::invalid_data(format!("Invalid {} in version '{}'", what, version))
    })
}

impl UnityVersion {
    /// Create a new Unity version
    pub fn new(
        major: u16,
        minor: u16,
        build: u16,
        version_type: UnityVersionType,
        type_number: u8,
    ) -> Self {
        Self {
            major,
            minor,
            build,
            version_type,
            type_number,
            has_suffix: true,
        }
    }

    /// First player version whose node directory layout is decoded
    pub fn first_supported() -> Self {
        Self::new(5, 3, 4, UnityVersionType::P, 0)
    }

    /// Parse a version string; trailing text after the type number is ignored
    pub fn parse_version(version: &str) -> Result<Self> {
        let regex = version_regex()?;
        let captures = regex.captures(version).ok_or_else(|| {
            BinaryError::invalid_data(format!("Invalid version format: {}", version))
        })?;
        let group = |i: usize| captures.get(i).map(|m| m.as_str()).unwrap_or("");

        let type_number = match group(5) {
            "" => 0,
            digits => parse_component(digits, "type number", version)?,
        };

        Ok(Self {
            has_suffix: !group(4).is_empty() || !group(5).is_empty(),
            ..Self::new(
                parse_component(group(1), "major version", version)?,
                parse_component(group(2), "minor version", version)?,
                parse_component(group(3), "build version", version)?,
                UnityVersionType::from_letter(group(4)),
                type_number,
            )
        })
    }

    /// Convert to tuple for comparison
    pub fn as_tuple(&self) -> (u16, u16, u16, u8, u8) {
        (
            self.major,
            self.minor,
            self.build,
            self.version_type as u8,
            self.type_number,
        )
    }
}

impl FromStr for UnityVersion {
    type Err = BinaryError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_version(s)
    }
}

impl fmt::Display for UnityVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.build)?;
        if self.has_suffix {
            write!(f, "{}{}", self.version_type, self.type_number)?;
        }
        Ok(())
    }
}

impl PartialEq for UnityVersion {
    fn eq(&self, other: &Self) -> bool {
        self.as_tuple() == other.as_tuple()
    }
}

impl Eq for UnityVersion {}

impl std::hash::Hash for UnityVersion {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.as_tuple().hash(state);
    }
}

impl PartialOrd for UnityVersion {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for UnityVersion {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.as_tuple().cmp(&other.as_tuple())
    }
}

/// Node directory layout selected by the bundle's player version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DirectoryLayout {
    /// 5.3.3 patch releases; recognized but not decoded
    Legacy,
    /// 5.3.4p0 and later
    Current,
}

impl DirectoryLayout {
    /// Select the directory layout for a player version string
    ///
    /// Only [`DirectoryLayout::Current`] is returned; the legacy layout and
    /// unrecognized versions fail with [`BinaryError::UnsupportedPlayerVersion`].
    pub fn for_player_version(player_version: &str) -> Result<Self> {
        match Self::classify(player_version) {
            Some(DirectoryLayout::Current) => Ok(DirectoryLayout::Current),
            _ => Err(BinaryError::unsupported_player_version(player_version)),
        }
    }

    /// Classify without failing; `None` means the version is not recognized
    pub fn classify(player_version: &str) -> Option<Self> {
        if player_version.starts_with("5.3.3p") {
            return Some(DirectoryLayout::Legacy);
        }
        if player_version.starts_with("5.3.4p") {
            return Some(DirectoryLayout::Current);
        }
        match UnityVersion::parse_version(player_version) {
            Ok(version) if version >= UnityVersion::first_supported() => {
                Some(DirectoryLayout::Current)
            }
            _ => None,
        }
    }
}
