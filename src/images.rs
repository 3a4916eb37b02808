// Daily theme image management
// Images are staged into the managed directory, then looked up by today's date

use chrono::{Local, NaiveDate};
use image::DynamicImage;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{DockError, Result};
use crate::storage::AppPaths;

/// Folder shipped next to the executable holding the theme images
pub const BUNDLED_IMAGES_DIR: &str = "daily_images";

const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

type CacheKey = (PathBuf, Option<(u32, u32)>);

/// A decoded image plus the file it came from
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub image: DynamicImage,
    pub path: PathBuf,
}

pub struct ImageManager {
    images_dir: PathBuf,
    default_image: String,
    cache: HashMap<CacheKey, DynamicImage>,
}

impl ImageManager {
    pub fn new(paths: &AppPaths, default_image: String) -> Result<Self> {
        fs::create_dir_all(&paths.images_dir)?;
        Ok(Self {
            images_dir: paths.images_dir.clone(),
            default_image,
            cache: HashMap::new(),
        })
    }

    pub fn images_dir(&self) -> &Path {
        &self.images_dir
    }

    pub fn set_default_image(&mut self, name: String) {
        if name != self.default_image {
            self.default_image = name;
            self.clear_cache();
        }
    }

    /// File names tried for `date`, in priority order
    pub fn candidate_names(&self, date: NaiveDate) -> Vec<String> {
        let day = date.format("%m-%d");
        vec![
            format!("{day}.png"),
            format!("{day}.jpg"),
            self.default_image.clone(),
        ]
    }

    /// Copy every image file from `src_dir` into the managed directory.
    /// Returns how many files were copied. Cached decodes are dropped when anything was copied.
    pub fn copy_images_from(&mut self, src_dir: &Path) -> Result<usize> {
        if !src_dir.is_dir() {
            return Err(DockError::NotFound(src_dir.to_path_buf()));
        }

        let mut copied = 0;
        for entry in fs::read_dir(src_dir)?.filter_map(|e| e.ok()) {
            let path = entry.path();
            if !path.is_file() || !is_image_file(&path) {
                continue;
            }
            fs::copy(&path, self.images_dir.join(entry.file_name()))?;
            copied += 1;
        }

        if copied > 0 {
            self.clear_cache();
        }
        tracing::debug!("[copy_images_from] Copied {} images from {}", copied, src_dir.display());
        Ok(copied)
    }

    /// First existing candidate for today
    pub fn image_path(&self) -> Option<PathBuf> {
        self.image_path_for(Local::now().date_naive())
    }

    pub fn image_path_for(&self, date: NaiveDate) -> Option<PathBuf> {
        self.images_for(date).into_iter().next()
    }

    /// Every existing candidate for today, for prev/next navigation
    pub fn today_images(&self) -> Vec<PathBuf> {
        self.images_for(Local::now().date_naive())
    }

    pub fn images_for(&self, date: NaiveDate) -> Vec<PathBuf> {
        self.candidate_names(date)
            .into_iter()
            .map(|name| self.images_dir.join(name))
            .filter(|path| path.is_file())
            .collect()
    }

    /// Load today's image, scaled down to fit `max_size`.
    /// `Ok(None)` means no candidate file exists.
    pub fn load(&mut self, max_size: Option<(u32, u32)>) -> Result<Option<LoadedImage>> {
        self.load_for(Local::now().date_naive(), max_size)
    }

    pub fn load_for(&mut self, date: NaiveDate, max_size: Option<(u32, u32)>) -> Result<Option<LoadedImage>> {
        let Some(path) = self.image_path_for(date) else {
            return Ok(None);
        };
        let image = self.load_path(&path, max_size)?;
        Ok(Some(LoadedImage { image, path }))
    }

    /// Decode and scale a specific file, going through the cache
    pub fn load_path(&mut self, path: &Path, max_size: Option<(u32, u32)>) -> Result<DynamicImage> {
        let key = (path.to_path_buf(), max_size);
        if let Some(cached) = self.cache.get(&key) {
            return Ok(cached.clone());
        }

        let mut image = image::open(path).map_err(|e| {
            tracing::error!("[load_image] Failed to load {}: {}", path.display(), e);
            e
        })?;
        if let Some((max_w, max_h)) = max_size {
            // Shrink only, like a thumbnail
            if image.width() > max_w || image.height() > max_h {
                image = image.thumbnail(max_w, max_h);
            }
        }

        self.cache.insert(key, image.clone());
        Ok(image)
    }

    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// User-facing hint listing the file names that would have matched
    pub fn missing_image_message(&self, date: NaiveDate) -> String {
        format!(
            "Could not load the theme image. Make sure one of these files exists in {}:\n{}",
            self.images_dir.display(),
            self.candidate_names(date).join(", ")
        )
    }
}

fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Locate the bundled image folder for an executable in `exe_dir`,
/// falling back one directory up for packaged layouts
pub fn resolve_bundled_dir(exe_dir: &Path) -> Option<PathBuf> {
    let direct = exe_dir.join(BUNDLED_IMAGES_DIR);
    if direct.is_dir() {
        return Some(direct);
    }
    let parent = exe_dir.parent()?.join(BUNDLED_IMAGES_DIR);
    parent.is_dir().then_some(parent)
}

/// Bundled image folder for the running executable
pub fn bundled_images_dir() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    resolve_bundled_dir(exe.parent()?)
}
