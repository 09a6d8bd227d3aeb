//! Icon and background image directories
//!
//! Records only store file names; these helpers turn them into paths and
//! manage the image directory contents.

use anyhow::{Context, Result, bail};
use std::path::{Component, Path, PathBuf};

use crate::models::{DEFAULT_ICON, Tool};

/// File name of the icon shown for tools without one of their own
pub const DEFAULT_ICON_FILE: &str = "default_icon.png";

/// Extensions accepted as background images
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp"];

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// True when `name` is one plain file name: no separators, no `.` or `..`
fn is_plain_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(components.next(), Some(Component::Normal(first)) if first == name)
        && components.next().is_none()
}

/// Icon and background image directories
#[derive(Debug, Clone)]
pub struct AssetDirs {
    icons: PathBuf,
    images: PathBuf,
}

impl AssetDirs {
    /// Use `icons` and `images`, creating both if missing
    pub fn open(icons: impl Into<PathBuf>, images: impl Into<PathBuf>) -> Result<Self> {
        let dirs = Self {
            icons: icons.into(),
            images: images.into(),
        };
        std::fs::create_dir_all(&dirs.icons).context("Failed to create icon directory")?;
        std::fs::create_dir_all(&dirs.images).context("Failed to create image directory")?;
        Ok(dirs)
    }

    pub fn icons_dir(&self) -> &Path {
        &self.icons
    }

    pub fn images_dir(&self) -> &Path {
        &self.images
    }

    fn default_icon(&self) -> PathBuf {
        self.icons.join(DEFAULT_ICON_FILE)
    }

    /// Path of the icon to show for `tool`.
    ///
    /// Absolute icon paths are used as-is, bare names are looked up in the
    /// icon directory. Anything missing falls back to the default icon.
    pub fn resolve_icon(&self, tool: &Tool) -> PathBuf {
        let Some(icon) = tool.icon.as_deref().map(str::trim) else {
            return self.default_icon();
        };
        if icon.is_empty() || icon == DEFAULT_ICON {
            return self.default_icon();
        }

        let candidate = Path::new(icon);
        let path = if candidate.is_absolute() {
            candidate.to_path_buf()
        } else {
            self.icons.join(candidate)
        };

        if path.is_file() {
            path
        } else {
            tracing::debug!(icon, "icon not found, using default");
            self.default_icon()
        }
    }

    /// Path of a stored background image, if it exists.
    ///
    /// Names that would leave the image directory resolve to nothing.
    pub fn resolve_background(&self, name: &str) -> Option<PathBuf> {
        if !is_plain_file_name(name) {
            tracing::warn!(name, "rejected background image name");
            return None;
        }
        let path = self.images.join(name);
        path.is_file().then_some(path)
    }

    /// Image file names in the image directory, sorted
    pub fn list_images(&self) -> Result<Vec<String>> {
        let entries = std::fs::read_dir(&self.images).context("Failed to read image directory")?;

        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && is_image(path))
            .filter_map(|path| path.file_name().and_then(|n| n.to_str()).map(String::from))
            .collect();
        names.sort();
        Ok(names)
    }

    /// Copy `source` into the image directory, returning the stored file name.
    ///
    /// `name` overrides the stored name; otherwise the source file name is kept.
    pub fn import_image(&self, source: &Path, name: Option<&str>) -> Result<String> {
        if !is_image(source) {
            bail!("'{}' is not a supported image file", source.display());
        }

        let stored = match name {
            Some(name) => name.to_string(),
            None => source
                .file_name()
                .and_then(|n| n.to_str())
                .map(String::from)
                .context("Image path has no file name")?,
        };
        if !is_plain_file_name(&stored) {
            bail!("Invalid image name '{}'", stored);
        }

        std::fs::copy(source, self.images.join(&stored))
            .with_context(|| format!("Failed to copy {}", source.display()))?;
        tracing::info!(name = %stored, "imported background image");
        Ok(stored)
    }

    /// Delete a stored image; false if it was not there
    pub fn delete_image(&self, name: &str) -> Result<bool> {
        let Some(path) = self.resolve_background(name) else {
            return Ok(false);
        };
        std::fs::remove_file(&path).context("Failed to delete image")?;
        tracing::info!(name, "deleted background image");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn assets() -> (TempDir, AssetDirs) {
        let dir = TempDir::new().expect("temp dir");
        let assets = AssetDirs::open(dir.path().join("icons"), dir.path().join("images"))
            .expect("asset dirs");
        (dir, assets)
    }

    // ==================== Icons ====================

    #[test]
    fn test_open_creates_dirs() {
        let (_dir, assets) = assets();
        assert!(assets.icons_dir().is_dir());
        assert!(assets.images_dir().is_dir());
    }

    #[test]
    fn test_resolve_icon_fallbacks() {
        let (_dir, assets) = assets();
        let default = assets.icons_dir().join(DEFAULT_ICON_FILE);

        assert_eq!(assets.resolve_icon(&Tool::new("a", "/a")), default);
        assert_eq!(
            assets.resolve_icon(&Tool::new("a", "/a").with_icon(DEFAULT_ICON)),
            default
        );
        assert_eq!(
            assets.resolve_icon(&Tool::new("a", "/a").with_icon("missing.png")),
            default
        );
    }

    #[test]
    fn test_resolve_icon_relative_and_absolute() -> anyhow::Result<()> {
        let (dir, assets) = assets();
        std::fs::write(assets.icons_dir().join("nmap.png"), b"png")?;
        let outside = dir.path().join("burp.ico");
        std::fs::write(&outside, b"ico")?;

        let nmap = Tool::new("nmap", "/usr/bin/nmap").with_icon("nmap.png");
        assert_eq!(assets.resolve_icon(&nmap), assets.icons_dir().join("nmap.png"));

        let burp = Tool::new("burp", "/opt/burp").with_icon(outside.to_string_lossy());
        assert_eq!(assets.resolve_icon(&burp), outside);
        Ok(())
    }

    // ==================== Images ====================

    #[test]
    fn test_list_images_filters_and_sorts() -> anyhow::Result<()> {
        let (_dir, assets) = assets();
        for name in ["b.PNG", "a.jpg", "notes.txt", "c.bmp"] {
            std::fs::write(assets.images_dir().join(name), b"x")?;
        }
        std::fs::create_dir(assets.images_dir().join("nested.png"))?;

        assert_eq!(assets.list_images()?, vec!["a.jpg", "b.PNG", "c.bmp"]);
        Ok(())
    }

    #[test]
    fn test_import_and_delete_image() -> anyhow::Result<()> {
        let (dir, assets) = assets();
        let source = dir.path().join("wallpaper.jpg");
        std::fs::write(&source, b"jpg")?;

        assert_eq!(assets.import_image(&source, None)?, "wallpaper.jpg");
        assert_eq!(assets.import_image(&source, Some("kali.jpg"))?, "kali.jpg");
        assert!(assets.resolve_background("kali.jpg").is_some());
        assert_eq!(assets.list_images()?.len(), 2);

        assert!(assets.delete_image("kali.jpg")?);
        assert!(!assets.delete_image("kali.jpg")?);
        assert!(assets.resolve_background("kali.jpg").is_none());
        Ok(())
    }

    #[test]
    fn test_import_rejects_bad_input() -> anyhow::Result<()> {
        let (dir, assets) = assets();
        let text = dir.path().join("notes.txt");
        std::fs::write(&text, b"x")?;
        assert!(assets.import_image(&text, None).is_err());

        let image = dir.path().join("a.png");
        std::fs::write(&image, b"x")?;
        assert!(assets.import_image(&image, Some("../escape.png")).is_err());
        assert!(assets.import_image(&image, Some("..")).is_err());
        assert!(assets.import_image(&image, Some("sub/a.png")).is_err());
        Ok(())
    }

    #[test]
    fn test_image_names_stay_inside_image_dir() -> anyhow::Result<()> {
        let (dir, assets) = assets();
        let sibling = dir.path().join("tools.json");
        std::fs::write(&sibling, b"[]")?;
        let absolute = assets.images_dir().join("..").join("tools.json");

        for name in ["../tools.json", absolute.to_str().expect("utf-8 path"), ".", ""] {
            assert!(assets.resolve_background(name).is_none(), "{name}");
            assert!(!assets.delete_image(name)?, "{name}");
        }
        assert!(sibling.is_file());
        Ok(())
    }
}
