// Image commands for the theme viewer

use std::path::{Path, PathBuf};

use crate::dock::windows::image_viewer_rect;
use crate::images::bundled_images_dir;
use crate::models::Point;
use crate::storage::AppState;

#[derive(Debug, Clone, serde::Serialize)]
pub struct ThemeImageInfo {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    /// Every existing candidate for today, for prev/next navigation
    pub images: Vec<PathBuf>,
    pub viewer_position: Point,
    pub viewer_size: (i32, i32),
}

/// Copy the bundled image folder into the managed directory.
/// Returns 0 when no bundled folder ships with the executable.
pub fn stage_bundled_images(state: &AppState) -> Result<usize, String> {
    let Some(src) = bundled_images_dir() else {
        tracing::info!("[stage_bundled_images] No bundled image folder found");
        return Ok(0);
    };
    stage_images_from(state, &src)
}

pub fn stage_images_from(state: &AppState, src: &Path) -> Result<usize, String> {
    tracing::info!("[stage_images_from] Copying from {}", src.display());
    let copied = state
        .images
        .lock()
        .copy_images_from(src)
        .map_err(|e| format!("Failed to copy images from {}: {}", src.display(), e))?;
    tracing::info!("[stage_images_from] Copied {} images", copied);
    Ok(copied)
}

/// Load the image for the store's current date, scaled for a `screen` of the given size,
/// along with where the viewer window should go
pub fn show_theme_image(state: &AppState, screen: (i32, i32)) -> Result<ThemeImageInfo, String> {
    let (screen_width, screen_height) = screen;
    let fraction = state.settings.read().image_display_fraction;
    let max_size = (
        (screen_width as f64 * fraction).max(1.0) as u32,
        (screen_height as f64 * fraction).max(1.0) as u32,
    );
    let date = state.tasks.current_date();

    let mut images = state.images.lock();
    let loaded = images
        .load_for(date, Some(max_size))
        .map_err(|e| format!("An error occurred while showing the image: {}", e))?;
    let Some(loaded) = loaded else {
        return Err(images.missing_image_message(date));
    };
    let all = images.images_for(date);

    let (width, height) = (loaded.image.width(), loaded.image.height());
    let (viewer_position, viewer_size) =
        image_viewer_rect(width, height, all.len(), screen_width, screen_height);
    tracing::info!("[show_theme_image] {} at {}x{}", loaded.path.display(), width, height);

    Ok(ThemeImageInfo {
        path: loaded.path,
        width,
        height,
        images: all,
        viewer_position,
        viewer_size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::AppPaths;
    use chrono::NaiveDate;
    use image::{Rgb, RgbImage};

    fn state(root: &Path) -> AppState {
        AppState::open_at(AppPaths::under(root), NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()).unwrap()
    }

    #[test]
    fn test_missing_image_lists_candidates() {
        let dir = tempfile::tempdir().unwrap();
        let err = show_theme_image(&state(dir.path()), (1920, 1080)).unwrap_err();
        assert!(err.contains("03-05.png, 03-05.jpg, daily-theme.png"));
    }

    #[test]
    fn test_stage_then_show_scales_to_screen_fraction() {
        let dir = tempfile::tempdir().unwrap();
        let bundled = dir.path().join("bundle");
        std::fs::create_dir_all(&bundled).unwrap();
        RgbImage::from_pixel(2000, 1000, Rgb([10, 20, 30]))
            .save(bundled.join("03-05.png"))
            .unwrap();

        let state = state(dir.path());
        assert_eq!(stage_images_from(&state, &bundled).unwrap(), 1);

        let info = show_theme_image(&state, (1000, 800)).unwrap();
        assert_eq!((info.width, info.height), (800, 400));
        assert_eq!(info.images.len(), 1);
        assert_eq!(info.viewer_size, (840, 420));
        assert_eq!(info.viewer_position, Point::new(80, 190));
    }

    #[test]
    fn test_stage_from_missing_folder_fails() {
        let dir = tempfile::tempdir().unwrap();
        let state = state(dir.path());
        assert!(stage_images_from(&state, &dir.path().join("nope")).is_err());
    }
}
