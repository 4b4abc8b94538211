//! File references and icons.

use chrono::{DateTime, TimeDelta, Utc};

use crate::model::enums::closed_enum;
use crate::model::value::Timestamp;

closed_enum! {
    /// Discriminant of a file reference.
    pub enum FileKind as "FileKind" {
        File => "file",
        External => "external",
    }
}

closed_enum! {
    /// Discriminant of an icon.
    pub enum IconKind as "IconKind" {
        Emoji => "emoji",
        File => "file",
        External => "external",
    }
}

/// A file hosted by the service.
///
/// The URL is only valid until `expiry_time` (about an hour after it was
/// issued). It must not be persisted past that instant; fetch the owning
/// object again for a fresh URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HostedFile {
    pub url: String,
    pub expiry_time: Timestamp,
}

impl HostedFile {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiry_time.to_utc() <= now
    }

    /// Time left before the URL expires; zero once it has.
    pub fn expires_in(&self, now: DateTime<Utc>) -> TimeDelta {
        self.expiry_time.remaining_at(now).max(TimeDelta::zero())
    }
}

/// A file at a stable external URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExternalFile {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FileReference {
    Hosted(HostedFile),
    External(ExternalFile),
}

impl FileReference {
    pub fn external(url: impl Into<String>) -> Self {
        FileReference::External(ExternalFile { url: url.into() })
    }

    pub fn kind(&self) -> FileKind {
        match self {
            FileReference::Hosted(_) => FileKind::File,
            FileReference::External(_) => FileKind::External,
        }
    }

    pub fn url(&self) -> &str {
        match self {
            FileReference::Hosted(f) => &f.url,
            FileReference::External(f) => &f.url,
        }
    }

    /// Expiry of a hosted URL; `None` for external files.
    pub fn expiry_time(&self) -> Option<&Timestamp> {
        match self {
            FileReference::Hosted(f) => Some(&f.expiry_time),
            FileReference::External(_) => None,
        }
    }

    /// Whether the URL may be stored and used later.
    pub fn is_durable(&self) -> bool {
        matches!(self, FileReference::External(_))
    }
}

/// Page or database icon.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Icon {
    Emoji(String),
    File(FileReference),
}

impl Icon {
    pub fn kind(&self) -> IconKind {
        match self {
            Icon::Emoji(_) => IconKind::Emoji,
            Icon::File(FileReference::Hosted(_)) => IconKind::File,
            Icon::File(FileReference::External(_)) => IconKind::External,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn hosted(expiry: &str) -> HostedFile {
        HostedFile {
            url: "https://s3.us-west-2.amazonaws.com/secure/doc.pdf".to_string(),
            expiry_time: Timestamp::parse(expiry).unwrap(),
        }
    }

    #[test]
    fn test_hosted_expiry() {
        let file = hosted("2020-03-17T20:10:04.968Z");
        let before = Utc.with_ymd_and_hms(2020, 3, 17, 19, 10, 4).unwrap();
        let after = Utc.with_ymd_and_hms(2020, 3, 17, 21, 0, 0).unwrap();

        assert!(!file.is_expired_at(before));
        assert!(file.is_expired_at(after));
        assert!(file.expires_in(before) > TimeDelta::minutes(59));
        assert_eq!(file.expires_in(after), TimeDelta::zero());
    }

    #[test]
    fn test_file_reference_accessors() {
        let external = FileReference::external("https://example.com/a.png");
        assert_eq!(external.kind(), FileKind::External);
        assert_eq!(external.url(), "https://example.com/a.png");
        assert!(external.is_durable());
        assert!(external.expiry_time().is_none());

        let file = FileReference::Hosted(hosted("2020-03-17T20:10:04.968Z"));
        assert_eq!(file.kind().as_str(), "file");
        assert!(!file.is_durable());
        assert!(file.expiry_time().is_some());
    }

    #[test]
    fn test_icon_kind() {
        assert_eq!(Icon::Emoji("🎉".to_string()).kind(), IconKind::Emoji);
        assert_eq!(
            Icon::File(FileReference::external("https://example.com/i.png")).kind(),
            IconKind::External
        );
    }
}
