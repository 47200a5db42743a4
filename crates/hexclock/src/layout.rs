use crate::config::Config;
use hexclock_core::{Category, ClockFace, ClockPosition, Point};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

const MAX_ENTRIES: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SizeKey {
    pub width: u32,
    pub height: u32,
}

impl SizeKey {
    /// Sizes are cached at whole-pixel granularity.
    pub fn new(width: f64, height: f64) -> Option<Self> {
        if !(width.is_finite() && height.is_finite()) || width < 1.0 || height < 1.0 {
            return None;
        }
        Some(Self {
            width: width.round() as u32,
            height: height.round() as u32,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryMarker {
    pub category: Category,
    pub position: ClockPosition,
}

/// Everything about the face that depends only on the container size.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FaceLayout {
    pub face: ClockFace,
    pub track_radius: f64,
    pub hour_marks: Vec<ClockPosition>,
    pub categories: Vec<CategoryMarker>,
}

impl FaceLayout {
    pub fn compute(key: SizeKey, config: &Config) -> Self {
        let (w, h) = (key.width as f64, key.height as f64);
        let radius = w.min(h) / 2.0 * config.face.radius_ratio;
        let face = ClockFace::new(Point::new(w / 2.0, h / 2.0), radius);

        Self {
            face,
            track_radius: radius * config.drag.track_ratio,
            hour_marks: (1..=12).map(|hour| ClockPosition::new(hour, 0, &face)).collect(),
            categories: Category::all()
                .map(|category| CategoryMarker {
                    category,
                    position: ClockPosition::new(category.clock_hour(), 0, &face),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Default)]
pub struct LayoutCache {
    entries: HashMap<SizeKey, Arc<FaceLayout>>,
}

impl LayoutCache {
    pub fn get(&mut self, key: SizeKey, config: &Config) -> Arc<FaceLayout> {
        if let Some(layout) = self.entries.get(&key) {
            return layout.clone();
        }

        if self.entries.len() >= MAX_ENTRIES {
            log::debug!("Layout cache full, clearing {} entries", self.entries.len());
            self.entries.clear();
        }

        let layout = Arc::new(FaceLayout::compute(key, config));
        self.entries.insert(key, layout.clone());
        layout
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_size_key_rejects_empty_containers() {
        assert!(SizeKey::new(0.0, 300.0).is_none());
        assert!(SizeKey::new(300.0, f64::NAN).is_none());
        assert_eq!(
            SizeKey::new(399.6, 300.2),
            Some(SizeKey { width: 400, height: 300 })
        );
    }

    #[test]
    fn test_face_fits_smaller_side() {
        let layout = FaceLayout::compute(SizeKey { width: 400, height: 300 }, &Config::default());
        assert_eq!(layout.face.center, Point::new(200.0, 150.0));
        assert!((layout.face.radius - 120.0).abs() < EPS);
        assert!((layout.track_radius - 102.0).abs() < EPS);

        let twelve = layout.hour_marks.last().unwrap();
        assert_eq!(twelve.hour, 12);
        assert!((twelve.y - 30.0).abs() < EPS);
        assert_eq!(layout.categories.len(), 6);
    }

    #[test]
    fn test_cache_reuses_layouts() {
        let config = Config::default();
        let mut cache = LayoutCache::default();
        let key = SizeKey { width: 400, height: 400 };

        let a = cache.get(key, &config);
        let b = cache.get(key, &config);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);

        cache.get(SizeKey { width: 200, height: 400 }, &config);
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(cache.is_empty());
        assert!(!Arc::ptr_eq(&a, &cache.get(key, &config)));
    }

    #[test]
    fn test_cache_is_bounded() {
        let config = Config::default();
        let mut cache = LayoutCache::default();
        for width in 1..=(MAX_ENTRIES as u32 + 1) {
            cache.get(SizeKey { width, height: 100 }, &config);
        }
        assert!(cache.len() <= MAX_ENTRIES);
    }
}
