use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::slide::Slide;
use crate::texture_loader::is_image_path;

#[derive(Debug, Error)]
pub enum DeckError {
    #[error("deck path {0:?} does not exist")]
    NotFound(PathBuf),
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed deck manifest {path:?}: {source}")]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BannerVariant {
    #[default]
    Info,
    Warning,
}

/// Call-out box shown above the carousel.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Banner {
    #[serde(default)]
    pub variant: BannerVariant,
    #[serde(default = "default_banner_title")]
    pub title: String,              // Empty hides the heading
    pub text: String,
}

fn default_banner_title() -> String {
    "Note".to_string()
}

/// One part of a post: optional sub-heading, prose and call-out, followed by
/// a carousel of its slides.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct Section {
    pub heading: Option<String>,
    pub text: Option<String>,
    pub banner: Option<Banner>,
    pub initial_index: i64,
    pub slides: Vec<Slide>,
}

/// A post page: heading, optional intro and banner, then its sections.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Deck {
    pub title: String,
    pub intro: Option<String>,
    pub banner: Option<Banner>,
    pub sections: Vec<Section>,
}

/// On-disk manifest. Top-level `slides` are shorthand for a leading section
/// without a heading.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Manifest {
    title: String,
    intro: Option<String>,
    banner: Option<Banner>,
    initial_index: i64,
    slides: Vec<Slide>,
    sections: Vec<Section>,
}

impl From<Manifest> for Deck {
    fn from(manifest: Manifest) -> Self {
        let mut sections = Vec::with_capacity(manifest.sections.len() + 1);
        if !manifest.slides.is_empty() {
            sections.push(Section {
                initial_index: manifest.initial_index,
                slides: manifest.slides,
                ..Section::default()
            });
        }
        sections.extend(manifest.sections);
        Deck {
            title: manifest.title,
            intro: manifest.intro,
            banner: manifest.banner,
            sections,
        }
    }
}

const CODE_EXTENSIONS: &[&str] = &[
    "rs", "sh", "bash", "yml", "yaml", "toml", "tf", "hcl", "js", "ts", "json", "py", "go", "txt",
    "conf", "ini", "env", "sql", "md",
];
const CODE_FILE_NAMES: &[&str] = &["Dockerfile", "Makefile", ".dockerignore", ".gitignore"];

impl Deck {
    /// Load a JSON manifest, or scan a directory of images and code files.
    pub fn load(path: &Path) -> Result<Deck, DeckError> {
        if !path.exists() {
            return Err(DeckError::NotFound(path.to_path_buf()));
        }
        let deck = if path.is_dir() {
            Self::from_directory(path)?
        } else {
            Self::from_manifest(path)?
        };
        info!(path = ?path, sections = deck.sections.len(), slides = deck.slide_count(), "deck loaded");
        Ok(deck)
    }

    pub fn from_manifest(path: &Path) -> Result<Deck, DeckError> {
        let text = fs::read_to_string(path).map_err(|source| DeckError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let manifest: Manifest = serde_json::from_str(&text).map_err(|source| DeckError::Manifest {
            path: path.to_path_buf(),
            source,
        })?;
        let mut deck = Deck::from(manifest);

        if deck.title.is_empty() {
            deck.title = file_label(path);
        }
        if let Some(base) = path.parent() {
            for slide in deck.sections.iter_mut().flat_map(|s| s.slides.iter_mut()) {
                if let Some(image) = slide.image.as_mut() {
                    *image = resolve_image_ref(base, image);
                }
            }
        }
        Ok(deck)
    }

    pub fn from_directory(dir: &Path) -> Result<Deck, DeckError> {
        let io_err = |source| DeckError::Io { path: dir.to_path_buf(), source };

        let mut paths = Vec::new();
        for entry in fs::read_dir(dir).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            if path.is_file() {
                paths.push(path);
            }
        }
        paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        let mut slides = Vec::new();
        for path in paths {
            let name = file_label(&path);
            if is_image_path(&path) {
                slides.push(Slide::image(name, path.to_string_lossy()));
            } else if is_code_path(&path) {
                match fs::read_to_string(&path) {
                    Ok(code) => slides.push(Slide::code(name, code)),
                    Err(e) => warn!(path = ?path, error = %e, "skipping unreadable code file"),
                }
            } else {
                debug!(path = ?path, "skipping file with unknown type");
            }
        }

        Ok(Deck {
            title: file_label(dir),
            sections: vec![Section { slides, ..Section::default() }],
            ..Deck::default()
        })
    }

    pub fn slide_count(&self) -> usize {
        self.sections.iter().map(|s| s.slides.len()).sum()
    }

    /// Override where the first carousel starts.
    pub fn set_initial_index(&mut self, index: i64) {
        if let Some(section) = self.sections.first_mut() {
            section.initial_index = index;
        }
    }
}

fn is_code_path(path: &Path) -> bool {
    let name = path.file_name().and_then(|s| s.to_str()).unwrap_or("");
    if CODE_FILE_NAMES.contains(&name) {
        return true;
    }
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| CODE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn resolve_image_ref(base: &Path, image: &str) -> String {
    if image.contains("://") || Path::new(image).is_absolute() {
        image.to_string()
    } else {
        base.join(image).to_string_lossy().into_owned()
    }
}
