//! `CloudApp`: the top-level egui application state.
//!
//! This module declares the `CloudApp` struct, its constructor and the
//! mount/teardown bookkeeping. Drawing is split across sibling sub-modules:
//!
//! - `toolbar`: title, view-mode toggle, batch summary
//! - `content`: cloud viewport and ranked list

pub mod content;
pub mod toolbar;

use std::rc::Rc;
use std::time::Instant;

use interest_cloud::cloud::{CloudCache, CloudData, InterestBatch};
use interest_cloud::config::CloudConfig;
use interest_cloud::render::animator::AnimationController;
use interest_cloud::render::camera::CameraParams;
use interest_cloud::render::cursor::{CursorCell, CursorSurface};
use interest_cloud::render::style::{Palette, VisualCache};
use interest_cloud::render::ViewMode;
use interest_cloud::CloudError;

// ─── Application state ───────────────────────────────────────────────────────

pub struct CloudApp {
    pub config: CloudConfig,
    pub palette: Palette,
    pub batch: Option<Rc<InterestBatch>>,
    pub cache: CloudCache,
    pub visual_cache: VisualCache,
    pub data: Option<Rc<CloudData>>,
    /// Config and data problems found at startup; never cleared
    pub load_errors: Vec<String>,
    /// Failure of the latest batch build
    pub error: Option<String>,
    pub view_mode: ViewMode,
    /// Mounted only while the cloud view is shown
    pub controller: Option<AnimationController>,
    pub cursor: Rc<CursorCell>,
    /// Item currently under the pointer
    pub hovered: Option<usize>,
    // Camera state
    pub camera: CameraParams,
    pub cam_dragging: bool,
    pub last_frame_time: Instant,
}

impl CloudApp {
    pub fn new(
        config: Result<CloudConfig, CloudError>,
        batch: Result<InterestBatch, CloudError>,
    ) -> Self {
        let mut errors = Vec::new();

        let config = config.unwrap_or_else(|e| {
            log::error!("Config rejected, using defaults: {e}");
            errors.push(format!("config: {e}"));
            CloudConfig::default()
        });
        let palette = config.palette().unwrap_or_else(|e| {
            errors.push(format!("palette: {e}"));
            Palette::default()
        });
        let batch = match batch {
            Ok(b) => Some(Rc::new(b)),
            Err(e) => {
                log::error!("Could not load interests: {e}");
                errors.push(format!("data: {e}"));
                None
            }
        };

        let mut app = Self {
            config,
            palette,
            batch,
            cache: CloudCache::new(),
            visual_cache: VisualCache::new(),
            data: None,
            load_errors: errors,
            error: None,
            view_mode: ViewMode::Cloud,
            controller: None,
            cursor: Rc::new(CursorCell::new()),
            hovered: None,
            camera: CameraParams::default(),
            cam_dragging: false,
            last_frame_time: Instant::now(),
        };
        app.sync_data();
        app
    }

    /// Everything worth showing in the toolbar: startup problems, then the
    /// current build failure.
    pub fn error_summary(&self) -> Option<String> {
        let parts: Vec<&str> = self
            .load_errors
            .iter()
            .map(String::as_str)
            .chain(self.error.as_deref())
            .collect();
        (!parts.is_empty()).then(|| parts.join("; "))
    }

    /// Replace the input batch. The cloud is rebuilt and remounted on the
    /// next frame.
    pub fn set_batch(&mut self, batch: InterestBatch) {
        self.batch = Some(Rc::new(batch));
        self.sync_data();
    }

    /// Resolve the current batch through the cache; tear down a controller
    /// that animates a stale item set.
    pub fn sync_data(&mut self) {
        let Some(batch) = self.batch.clone() else {
            self.data = None;
            self.unmount();
            return;
        };
        match self.cache.resolve(&batch) {
            Ok(data) => {
                if self.controller.as_ref().is_some_and(|c| !c.is_for(&data)) {
                    self.unmount();
                }
                self.data = Some(data);
                self.error = None;
            }
            Err(e) => {
                log::error!("Cloud build failed: {e}");
                self.error = Some(e.to_string());
                self.data = None;
                self.unmount();
            }
        }
    }

    /// Mount the animation controller for the current data, if needed.
    pub fn ensure_mounted(&mut self) {
        if self.controller.is_some() {
            return;
        }
        if let Some(data) = &self.data {
            let cursor: Rc<dyn CursorSurface> = self.cursor.clone();
            let visuals = self.visual_cache.resolve(data, &self.config, &self.palette);
            self.controller = Some(AnimationController::mount(
                Rc::clone(data),
                visuals,
                &self.config,
                &self.palette,
                cursor,
            ));
            self.last_frame_time = Instant::now();
        }
    }

    /// Tear the cloud down: stops ticking and releases the cursor.
    pub fn unmount(&mut self) {
        if let Some(controller) = self.controller.take() {
            controller.teardown();
        }
        self.hovered = None;
    }

    /// Flip Cloud ⇄ List. Leaving the cloud unmounts it; ranks, positions
    /// and icons stay cached.
    pub fn toggle_view(&mut self) {
        self.view_mode = self.view_mode.toggle();
        log::info!("View mode: {}", self.view_mode.label());
        if self.view_mode == ViewMode::List {
            self.unmount();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use interest_cloud::render::cursor::CursorStyle;

    fn example() -> InterestBatch {
        InterestBatch::new(
            ["chess", "poker", "tea"],
            [("chess", 9), ("poker", 8), ("tea", 7)],
            ["a.png", "b.png", "c.png"],
        )
    }

    #[test]
    fn test_toggle_reuses_cached_build() {
        let mut app = CloudApp::new(Ok(CloudConfig::default()), Ok(example()));
        app.ensure_mounted();
        app.toggle_view();
        app.sync_data();
        app.toggle_view();
        app.sync_data();
        app.ensure_mounted();
        assert_eq!(app.cache.builds(), 1);
        assert_eq!(app.visual_cache.builds(), 1);
        assert!(app.controller.is_some());
    }

    #[test]
    fn test_toggle_keeps_positions_allocation() {
        let mut app = CloudApp::new(Ok(CloudConfig::default()), Ok(example()));
        app.ensure_mounted();
        let before = app.controller.as_ref().map(|c| c.visuals().as_ptr());
        app.toggle_view();
        app.sync_data();
        app.toggle_view();
        app.sync_data();
        app.ensure_mounted();
        let after = app.controller.as_ref().map(|c| c.visuals().as_ptr());
        assert!(before.is_some());
        assert_eq!(before, after);
    }

    #[test]
    fn test_load_errors_survive_frame_sync() {
        let bad = CloudConfig::from_json_str(r#"{ "palette": { "gold": "nope" } }"#);
        let mut app = CloudApp::new(bad, Ok(example()));
        assert!(app.data.is_some());
        app.sync_data();
        app.sync_data();
        let summary = app.error_summary();
        assert!(summary.as_deref().is_some_and(|e| e.contains("nope")));
        assert!(app.error.is_none());
    }

    #[test]
    fn test_build_error_clears_on_good_batch() {
        let batch = InterestBatch::new(["chess"], [("chess", 1)], Vec::<&str>::new());
        let mut app = CloudApp::new(Ok(CloudConfig::default()), Ok(batch));
        assert!(app.error.is_some());
        app.set_batch(example());
        assert!(app.error.is_none());
        assert!(app.error_summary().is_none());
    }

    #[test]
    fn test_toggle_to_list_releases_cursor() {
        let mut app = CloudApp::new(Ok(CloudConfig::default()), Ok(example()));
        app.ensure_mounted();
        if let Some(c) = app.controller.as_mut() {
            c.pointer_enter(0);
        }
        assert_eq!(app.cursor.style(), CursorStyle::Pointer);
        app.toggle_view();
        assert!(app.controller.is_none());
        assert_eq!(app.cursor.style(), CursorStyle::Default);
    }

    #[test]
    fn test_new_batch_remounts() {
        let mut app = CloudApp::new(Ok(CloudConfig::default()), Ok(example()));
        app.ensure_mounted();
        if let Some(c) = app.controller.as_mut() {
            c.pointer_enter(1);
        }
        app.set_batch(example());
        assert!(app.controller.is_none());
        assert_eq!(app.cursor.style(), CursorStyle::Default);
        assert_eq!(app.cache.builds(), 2);
    }

    #[test]
    fn test_empty_icon_pool_surfaces_error() {
        let batch = InterestBatch::new(["chess"], [("chess", 1)], Vec::<&str>::new());
        let app = CloudApp::new(Ok(CloudConfig::default()), Ok(batch));
        assert!(app.data.is_none());
        assert!(app.error.as_deref().is_some_and(|e| e.contains("icon pool")));
        assert!(app.load_errors.is_empty());
    }
}
