//! Scroll progress source.
//!
//! Scroll events and frames run at unrelated rates. Events overwrite a single
//! shared value; the frame driver samples whatever is latest. Older samples
//! are simply superseded, so there is no queue.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use crate::params::ScrollConfig;
use crate::stages::clamp_progress;

/// Shared latest-progress cell (f32 bits in an atomic)
#[derive(Debug, Clone, Default)]
pub struct ProgressHandle {
    bits: Arc<AtomicU32>,
}

impl ProgressHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new progress value, clamped into [0,1]
    pub fn publish(&self, progress: f32) {
        if !(0.0..=1.0).contains(&progress) {
            log::warn!("Progress {} outside [0,1], clamping", progress);
        }
        self.bits
            .store(clamp_progress(progress).to_bits(), Ordering::Release);
    }

    pub fn latest(&self) -> f32 {
        f32::from_bits(self.bits.load(Ordering::Acquire))
    }
}

/// `clamp(scroll_top / (scroll_height - viewport_height), 0, 1)`
///
/// A document no taller than the viewport has nothing to scroll and reports 0.
pub fn progress_for(scroll_top: f32, scroll_height: f32, viewport_height: f32) -> f32 {
    let range = scroll_height - viewport_height;
    if range <= 0.0 {
        log::warn!(
            "Nothing to scroll (height {} <= viewport {}), progress stays 0",
            scroll_height,
            viewport_height
        );
        return 0.0;
    }
    clamp_progress(scroll_top / range)
}

/// Virtual scroll document that publishes progress on every scroll event
#[derive(Debug, Clone)]
pub struct ScrollObserver {
    handle: ProgressHandle,
    config: ScrollConfig,
    scroll_top: f32,
    viewport_height: f32,
}

impl ScrollObserver {
    pub fn new(handle: ProgressHandle, config: ScrollConfig, viewport_height: f32) -> Self {
        let observer = Self {
            handle,
            config,
            scroll_top: 0.0,
            viewport_height,
        };
        observer.publish();
        observer
    }

    pub fn scroll_height(&self) -> f32 {
        self.viewport_height * self.config.page_count
    }

    fn max_scroll(&self) -> f32 {
        (self.scroll_height() - self.viewport_height).max(0.0)
    }

    pub fn scroll_top(&self) -> f32 {
        self.scroll_top
    }

    pub fn progress(&self) -> f32 {
        progress_for(self.scroll_top, self.scroll_height(), self.viewport_height)
    }

    /// Scroll by a pixel delta (positive scrolls down the page)
    pub fn scroll_by(&mut self, delta_px: f32) {
        self.scroll_top = (self.scroll_top + delta_px).clamp(0.0, self.max_scroll());
        self.publish();
    }

    /// Mouse-wheel lines; positive lines scroll up, like winit's LineDelta
    pub fn scroll_lines(&mut self, lines: f32) {
        self.scroll_by(-lines * self.config.pixels_per_line);
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll_top = 0.0;
        self.publish();
    }

    /// Keep the same progress fraction across a viewport resize
    pub fn resize_viewport(&mut self, viewport_height: f32) {
        if viewport_height <= 0.0 {
            log::warn!("Ignoring viewport height {}", viewport_height);
            return;
        }
        let progress = self.progress();
        self.viewport_height = viewport_height;
        self.scroll_top = progress * self.max_scroll();
        self.publish();
    }

    fn publish(&self) {
        self.handle.publish(self.progress());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_formula_clamps() {
        assert_eq!(progress_for(0.0, 6000.0, 1000.0), 0.0);
        assert_eq!(progress_for(2500.0, 6000.0, 1000.0), 0.5);
        assert_eq!(progress_for(5200.0, 6000.0, 1000.0), 1.0);
        assert_eq!(progress_for(-40.0, 6000.0, 1000.0), 0.0);
        assert_eq!(progress_for(100.0, 800.0, 1000.0), 0.0);
    }

    #[test]
    fn test_handle_keeps_only_latest() {
        let handle = ProgressHandle::new();
        let writer = handle.clone();
        writer.publish(0.1);
        writer.publish(0.7);
        writer.publish(0.35);
        assert_eq!(handle.latest(), 0.35);
        writer.publish(1.3);
        assert_eq!(handle.latest(), 1.0);
    }

    #[test]
    fn test_handle_clamps_out_of_range_and_nan() {
        let handle = ProgressHandle::new();
        handle.publish(-0.25);
        assert_eq!(handle.latest(), 0.0);
        handle.publish(f32::NAN);
        assert_eq!(handle.latest(), 0.0);
        handle.publish(f32::INFINITY);
        assert_eq!(handle.latest(), 1.0);
    }

    #[test]
    fn test_zero_scroll_range_reports_top() {
        assert_eq!(progress_for(300.0, 1000.0, 1000.0), 0.0);
        assert_eq!(progress_for(300.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn test_handle_crosses_threads() {
        let handle = ProgressHandle::new();
        let writer = handle.clone();
        std::thread::spawn(move || writer.publish(0.42))
            .join()
            .unwrap();
        assert_eq!(handle.latest(), 0.42);
    }

    #[test]
    fn test_observer_wheel_and_overscroll() {
        let handle = ProgressHandle::new();
        let mut observer = ScrollObserver::new(handle.clone(), ScrollConfig::default(), 720.0);
        assert_eq!(handle.latest(), 0.0);

        // 720 * 6 - 720 = 3600 px of travel; 45 lines of 40 px is halfway
        observer.scroll_lines(-45.0);
        assert!((handle.latest() - 0.5).abs() < 1e-6);

        observer.scroll_by(1e6);
        assert_eq!(handle.latest(), 1.0);
        assert_eq!(observer.scroll_top(), 3600.0);

        observer.scroll_to_top();
        assert_eq!(handle.latest(), 0.0);
    }

    #[test]
    fn test_resize_preserves_progress() {
        let handle = ProgressHandle::new();
        let mut observer = ScrollObserver::new(handle.clone(), ScrollConfig::default(), 720.0);
        observer.scroll_by(900.0);
        let before = handle.latest();

        observer.resize_viewport(1080.0);
        assert!((handle.latest() - before).abs() < 1e-6);

        observer.resize_viewport(0.0);
        assert!((handle.latest() - before).abs() < 1e-6);
    }
}
