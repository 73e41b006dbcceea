/*!
 Contains data structures used to describe backup platforms
*/

use std::fmt::Display;

/// Represents the platform that created a message backup
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Platform {
    /// Android-sourced backups
    Android,
    /// Windows 10 Mobile-sourced backups
    Win10,
}

impl Platform {
    /// Given user's input, return a variant if the input matches one
    pub fn from_cli(platform: &str) -> Option<Self> {
        match platform.to_lowercase().as_str() {
            "android" => Some(Self::Android),
            "win10" => Some(Self::Win10),
            _ => None,
        }
    }
}

impl Display for Platform {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::Android => write!(fmt, "Android"),
            Platform::Win10 => write!(fmt, "Windows 10"),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::util::platform::Platform;

    #[test]
    fn can_parse_android_any_case() {
        assert!(matches!(Platform::from_cli("android"), Some(Platform::Android)));
        assert!(matches!(Platform::from_cli("ANDROID"), Some(Platform::Android)));
        assert!(matches!(Platform::from_cli("Android"), Some(Platform::Android)));
    }

    #[test]
    fn can_parse_win10_any_case() {
        assert!(matches!(Platform::from_cli("win10"), Some(Platform::Win10)));
        assert!(matches!(Platform::from_cli("WIN10"), Some(Platform::Win10)));
        assert!(matches!(Platform::from_cli("Win10"), Some(Platform::Win10)));
    }

    #[test]
    fn cant_parse_invalid() {
        assert!(matches!(Platform::from_cli("windows"), None));
        assert!(matches!(Platform::from_cli("ios"), None));
        assert!(matches!(Platform::from_cli(""), None));
    }
}
