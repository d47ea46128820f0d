//! RPM package filenames and version ordering.
//!
//! Package files are named `name-version-release.arch.rpm`. Versions and
//! releases compare segment by segment the way `rpmvercmp` does: numeric
//! segments numerically, alphabetic segments lexically, a numeric segment
//! is newer than an alphabetic one, and `~` sorts before everything.

use std::cmp::Ordering;

/// Extension of package files.
pub const RPM_EXTENSION: &str = ".rpm";

/// The parts of a package filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RpmFilename<'a> {
    pub name: &'a str,
    pub version: &'a str,
    pub release: &'a str,
    pub arch: &'a str,
}

impl<'a> RpmFilename<'a> {
    /// Split `name-version-release.arch.rpm`. Returns `None` for anything
    /// else.
    pub fn parse(filename: &'a str) -> Option<Self> {
        let stem = filename.strip_suffix(RPM_EXTENSION)?;
        let (nvr, arch) = stem.rsplit_once('.')?;
        let (nv, release) = nvr.rsplit_once('-')?;
        let (name, version) = nv.rsplit_once('-')?;

        if [name, version, release, arch].iter().any(|part| part.is_empty()) {
            return None;
        }
        Some(Self {
            name,
            version,
            release,
            arch,
        })
    }

    /// Order by version, then release.
    pub fn compare_evr(&self, other: &Self) -> Ordering {
        compare_versions(self.version, other.version)
            .then_with(|| compare_versions(self.release, other.release))
    }
}

/// Newest package called `name` among `filenames`.
pub fn latest_rpm<'a, I>(name: &str, filenames: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    filenames
        .into_iter()
        .filter_map(|filename| RpmFilename::parse(filename).map(|rpm| (filename, rpm)))
        .filter(|(_, rpm)| rpm.name == name)
        .max_by(|(_, a), (_, b)| a.compare_evr(b))
        .map(|(filename, _)| filename)
}

/// Compare two version (or release) strings.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let (mut a, mut b) = (a.as_bytes(), b.as_bytes());

    loop {
        a = skip_separators(a);
        b = skip_separators(b);

        match (a.first() == Some(&b'~'), b.first() == Some(&b'~')) {
            (true, true) => {
                a = &a[1..];
                b = &b[1..];
                continue;
            }
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            (false, false) => {}
        }

        let (Some(&first), false) = (a.first(), b.is_empty()) else {
            return a.len().cmp(&b.len());
        };

        let numeric = first.is_ascii_digit();
        let (segment_a, rest_a) = split_segment(a, numeric);
        let (segment_b, rest_b) = split_segment(b, numeric);

        // Segments of different kinds: numeric wins.
        if segment_b.is_empty() {
            return if numeric {
                Ordering::Greater
            } else {
                Ordering::Less
            };
        }

        let ordering = if numeric {
            compare_numeric(segment_a, segment_b)
        } else {
            segment_a.cmp(segment_b)
        };
        if ordering != Ordering::Equal {
            return ordering;
        }

        a = rest_a;
        b = rest_b;
    }
}

fn skip_separators(s: &[u8]) -> &[u8] {
    let start = s
        .iter()
        .position(|&c| c.is_ascii_alphanumeric() || c == b'~')
        .unwrap_or(s.len());
    &s[start..]
}

fn split_segment(s: &[u8], numeric: bool) -> (&[u8], &[u8]) {
    let end = s
        .iter()
        .position(|c| {
            if numeric {
                !c.is_ascii_digit()
            } else {
                !c.is_ascii_alphabetic()
            }
        })
        .unwrap_or(s.len());
    s.split_at(end)
}

fn compare_numeric(a: &[u8], b: &[u8]) -> Ordering {
    let trim = |s: &[u8]| -> usize { s.iter().take_while(|&&c| c == b'0').count() };
    let (a, b) = (&a[trim(a)..], &b[trim(b)..]);
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_filename() {
        let rpm = RpmFilename::parse("package-name-1-2-5.noarch.rpm").unwrap();
        assert_eq!(rpm.name, "package-name-1");
        assert_eq!(rpm.version, "2");
        assert_eq!(rpm.release, "5");
        assert_eq!(rpm.arch, "noarch");

        let rpm = RpmFilename::parse("tool-libs-1.10.2-3.el9.x86_64.rpm").unwrap();
        assert_eq!(rpm.name, "tool-libs");
        assert_eq!(rpm.version, "1.10.2");
        assert_eq!(rpm.release, "3.el9");
        assert_eq!(rpm.arch, "x86_64");
    }

    #[test]
    fn test_parse_rejects_other_names() {
        assert!(RpmFilename::parse("repomd.xml").is_none());
        assert!(RpmFilename::parse("tool.rpm").is_none());
        assert!(RpmFilename::parse("tool-1.0.noarch.rpm").is_none());
        assert!(RpmFilename::parse("-1.0-1.noarch.rpm").is_none());
    }

    #[test]
    fn test_version_ordering() {
        use Ordering::*;

        assert_eq!(compare_versions("1.0", "1.0"), Equal);
        assert_eq!(compare_versions("1.10", "1.9"), Greater);
        assert_eq!(compare_versions("1.0", "1.0.1"), Less);
        assert_eq!(compare_versions("2.0", "2_0"), Equal);
        assert_eq!(compare_versions("1.01", "1.1"), Equal);
        assert_eq!(compare_versions("1.0a", "1.0"), Greater);
        assert_eq!(compare_versions("1.a", "1.1"), Less);
        assert_eq!(compare_versions("1.0~rc1", "1.0"), Less);
        assert_eq!(compare_versions("1.0~rc1", "1.0~rc2"), Less);
        assert_eq!(compare_versions("abc", "abd"), Less);
    }

    #[test]
    fn test_latest_rpm() {
        let files = [
            "tool-1.9-1.noarch.rpm",
            "tool-1.10-1.noarch.rpm",
            "tool-1.10-2.noarch.rpm",
            "tool-libs-9.0-1.noarch.rpm",
            "repomd.xml",
        ];

        assert_eq!(latest_rpm("tool", files), Some("tool-1.10-2.noarch.rpm"));
        assert_eq!(latest_rpm("tool-libs", files), Some("tool-libs-9.0-1.noarch.rpm"));
        assert_eq!(latest_rpm("missing", files), None);
    }
}
