//! Font discovery for the report renderer.
//!
//! `genpdf` needs TrueType files for text metrics even when the output only uses
//! a handful of glyphs. The search order is:
//!
//! 1. the directory named by [`FONTS_DIR_ENV`],
//! 2. `assets/fonts` next to the running binary,
//! 3. `assets/fonts` inside the crate manifest directory,
//! 4. well-known system font directories on Linux, macOS and Windows.
//!
//! Each directory is checked against every entry of [`KNOWN_FAMILIES`]; the
//! first directory that contains all four styles of a family wins.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use genpdf::error::{Error, ErrorKind};
use genpdf::fonts::{FontData, FontFamily};
use log::{debug, warn};

/// Environment variable that points at a directory with the report fonts.
pub const FONTS_DIR_ENV: &str = "WINNERS_CIRCLE_FONTS_DIR";

/// File names of the four styles of one font family.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FamilyFiles {
    /// Display name used in log messages.
    pub name: &'static str,
    pub regular: &'static str,
    pub bold: &'static str,
    pub italic: &'static str,
    pub bold_italic: &'static str,
}

impl FamilyFiles {
    fn paths(&self, directory: &Path) -> [PathBuf; 4] {
        [
            directory.join(self.regular),
            directory.join(self.bold),
            directory.join(self.italic),
            directory.join(self.bold_italic),
        ]
    }

    fn missing_in(&self, directory: &Path) -> Vec<&'static str> {
        [self.regular, self.bold, self.italic, self.bold_italic]
            .into_iter()
            .filter(|name| !directory.join(name).is_file())
            .collect()
    }
}

/// Sans-serif families that are metrically close to Helvetica, in preference order.
pub const KNOWN_FAMILIES: &[FamilyFiles] = &[
    FamilyFiles {
        name: "Liberation Sans",
        regular: "LiberationSans-Regular.ttf",
        bold: "LiberationSans-Bold.ttf",
        italic: "LiberationSans-Italic.ttf",
        bold_italic: "LiberationSans-BoldItalic.ttf",
    },
    FamilyFiles {
        name: "Roboto",
        regular: "Roboto-Regular.ttf",
        bold: "Roboto-Bold.ttf",
        italic: "Roboto-Italic.ttf",
        bold_italic: "Roboto-BoldItalic.ttf",
    },
    FamilyFiles {
        name: "Arial",
        regular: "arial.ttf",
        bold: "arialbd.ttf",
        italic: "ariali.ttf",
        bold_italic: "arialbi.ttf",
    },
    FamilyFiles {
        name: "Arial",
        regular: "Arial.ttf",
        bold: "Arial Bold.ttf",
        italic: "Arial Italic.ttf",
        bold_italic: "Arial Bold Italic.ttf",
    },
    FamilyFiles {
        name: "DejaVu Sans",
        regular: "DejaVuSans.ttf",
        bold: "DejaVuSans-Bold.ttf",
        italic: "DejaVuSans-Oblique.ttf",
        bold_italic: "DejaVuSans-BoldOblique.ttf",
    },
];

/// A font family located on disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedFontFamily {
    directory: PathBuf,
    files: FamilyFiles,
}

impl ResolvedFontFamily {
    /// Directory the family was found in.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Display name of the family.
    pub fn name(&self) -> &'static str {
        self.files.name
    }

    /// Path of the regular style.
    pub fn regular_path(&self) -> PathBuf {
        self.directory.join(self.files.regular)
    }

    /// Path of the bold style.
    pub fn bold_path(&self) -> PathBuf {
        self.directory.join(self.files.bold)
    }

    /// Loads all four styles into a `genpdf` font family.
    pub fn load(&self) -> Result<FontFamily<FontData>, Error> {
        let [regular, bold, italic, bold_italic] = self.files.paths(&self.directory);
        Ok(FontFamily {
            regular: load_font(&regular, "regular")?,
            bold: load_font(&bold, "bold")?,
            italic: load_font(&italic, "italic")?,
            bold_italic: load_font(&bold_italic, "bold italic")?,
        })
    }
}

fn env_path(var: &str) -> Option<PathBuf> {
    env::var_os(var).and_then(|value| {
        let path = PathBuf::from(value);
        if path.as_os_str().is_empty() {
            None
        } else {
            Some(path)
        }
    })
}

fn push_unique(candidates: &mut Vec<PathBuf>, candidate: PathBuf) {
    if !candidates.iter().any(|existing| existing == &candidate) {
        candidates.push(candidate);
    }
}

/// Returns the directories that are searched for fonts, in order.
pub fn font_directory_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Some(path) = env_path(FONTS_DIR_ENV) {
        candidates.push(path);
    }

    if let Ok(current_exe) = env::current_exe() {
        if let Some(bin_dir) = current_exe.parent() {
            push_unique(&mut candidates, bin_dir.join("assets/fonts"));
        }
    }

    push_unique(
        &mut candidates,
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/fonts"),
    );

    for directory in system_font_directories() {
        push_unique(&mut candidates, directory);
    }

    candidates
}

fn system_font_directories() -> Vec<PathBuf> {
    let mut directories = Vec::new();

    #[cfg(target_os = "linux")]
    {
        for path in [
            "/usr/share/fonts/truetype/liberation",
            "/usr/share/fonts/truetype/liberation2",
            "/usr/share/fonts/liberation-sans",
            "/usr/share/fonts/liberation",
            "/usr/share/fonts/TTF",
            "/usr/share/fonts/truetype/dejavu",
            "/usr/share/fonts/dejavu-sans-fonts",
            "/usr/share/fonts/truetype/msttcorefonts",
        ] {
            directories.push(PathBuf::from(path));
        }
        if let Some(home) = env_path("HOME") {
            directories.push(home.join(".local/share/fonts"));
            directories.push(home.join(".fonts"));
        }
    }

    #[cfg(target_os = "macos")]
    {
        directories.push(PathBuf::from("/System/Library/Fonts/Supplemental"));
        directories.push(PathBuf::from("/Library/Fonts"));
        if let Some(home) = env_path("HOME") {
            directories.push(home.join("Library/Fonts"));
        }
    }

    #[cfg(windows)]
    {
        for var in ["WINDIR", "SystemRoot"] {
            if let Some(root) = env_path(var) {
                directories.push(root.join("Fonts"));
            }
        }
    }

    directories
}

fn load_font(path: &Path, style: &str) -> Result<FontData, Error> {
    FontData::load(path, None).map_err(|err| {
        let io_kind = if path.is_file() {
            io::ErrorKind::Other
        } else {
            io::ErrorKind::NotFound
        };
        Error::new(
            format!(
                "Failed to load {} font at {}: {}",
                style,
                path.display(),
                err
            ),
            io::Error::new(io_kind, err.to_string()),
        )
    })
}

/// Locates the first complete font family in the search directories.
pub fn resolve_font_family() -> Result<ResolvedFontFamily, Error> {
    let mut attempts = Vec::new();

    for directory in font_directory_candidates() {
        if !directory.is_dir() {
            attempts.push(format!("{} (directory missing)", directory.display()));
            continue;
        }

        let mut partial = Vec::new();
        for files in KNOWN_FAMILIES {
            let missing = files.missing_in(&directory);
            if missing.is_empty() {
                debug!(
                    "Using font family '{}' from {}",
                    files.name,
                    directory.display()
                );
                return Ok(ResolvedFontFamily {
                    directory,
                    files: *files,
                });
            }
            if missing.len() < 4 {
                partial.push(format!("{} missing [{}]", files.name, missing.join(", ")));
            }
        }

        let reason = if partial.is_empty() {
            "no known font family".to_owned()
        } else {
            partial.join("; ")
        };
        attempts.push(format!("{} ({})", directory.display(), reason));
    }

    Err(Error::new(
        format!(
            "Unable to locate a usable font family. Checked: {}. Set {} to a directory containing LiberationSans-*.ttf or Roboto-*.ttf.",
            attempts.join(", "),
            FONTS_DIR_ENV
        ),
        io::Error::new(io::ErrorKind::NotFound, "no font family found"),
    ))
}

/// Reads the raw bytes of the regular and bold styles, used by the raster chart helper.
pub fn raster_font_bytes() -> Result<(Vec<u8>, Vec<u8>), Error> {
    let family = resolve_font_family()?;
    let read = |path: PathBuf| {
        fs::read(&path).map_err(|err| {
            Error::new(
                format!("Failed to read font file {}", path.display()),
                err,
            )
        })
    };
    Ok((read(family.regular_path())?, read(family.bold_path())?))
}

/// Returns whether the error was caused by missing or unreadable font files.
pub fn fonts_missing(err: &Error) -> bool {
    matches!(
        err.kind(),
        ErrorKind::IoError(io_err)
            if io_err.kind() == io::ErrorKind::NotFound
                || io_err.kind() == io::ErrorKind::PermissionDenied
    )
}

/// Indicates whether any supported font family is present on disk.
pub fn default_fonts_available() -> bool {
    match resolve_font_family() {
        Ok(_) => true,
        Err(err) => {
            warn!("{}", err);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_directory_is_searched_first() {
        let candidates = font_directory_candidates();
        let manifest = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/fonts");
        assert!(candidates.contains(&manifest));
        if let Some(path) = env_path(FONTS_DIR_ENV) {
            assert_eq!(candidates.first(), Some(&path));
        }
    }

    #[test]
    fn candidates_have_no_duplicates() {
        let candidates = font_directory_candidates();
        for (index, candidate) in candidates.iter().enumerate() {
            assert!(!candidates[index + 1..].contains(candidate));
        }
    }

    #[test]
    fn missing_files_are_reported_per_style() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let family = KNOWN_FAMILIES[0];
        fs::write(dir.path().join(family.regular), b"not a font").expect("write stub");
        let missing = family.missing_in(dir.path());
        assert_eq!(
            missing,
            vec![family.bold, family.italic, family.bold_italic]
        );
    }

    #[test]
    fn not_found_errors_count_as_missing_fonts() {
        let err = Error::new(
            "no fonts",
            io::Error::new(io::ErrorKind::NotFound, "not found"),
        );
        assert!(fonts_missing(&err));
        let other = Error::new("bad data", ErrorKind::InvalidData);
        assert!(!fonts_missing(&other));
    }
}
