use crate::config::{self, Config};
use crate::events::AppEvent;
use crate::layout::{LayoutCache, SizeKey};
use crate::output::{JsonHost, LogHaptics, Output};
use hexclock_core::{CategoryValue, ChartMode, ClockEngine, ClockFace, Point, hexagon_vertices};
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Size {
    width: f64,
    height: f64,
}

pub struct App<W: Write> {
    engine: ClockEngine<JsonHost<W>>,
    config: Config,
    config_path: Option<PathBuf>,
    layouts: LayoutCache,
    size: Option<SizeKey>,
    pending_resize: Option<Size>,
    chart: Option<(ChartMode, Vec<CategoryValue>)>,
}

impl<W: Write> App<W> {
    pub fn new(config: Config, config_path: Option<PathBuf>, out: W) -> Self {
        let engine = ClockEngine::new(config.engine(), JsonHost::new(out))
            .with_haptics(Box::new(LogHaptics));
        Self {
            engine,
            config,
            config_path,
            layouts: LayoutCache::default(),
            size: None,
            pending_resize: None,
            chart: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn engine(&self) -> &ClockEngine<JsonHost<W>> {
        &self.engine
    }

    pub fn output(&self) -> &W {
        self.engine.host().get_ref()
    }

    pub fn handle(&mut self, event: AppEvent) {
        if let AppEvent::Resize { width, height } = event {
            self.pending_resize = Some(Size { width, height });
            return;
        }
        self.flush();

        match event {
            AppEvent::PointerDown { x, y } => {
                self.engine.pointer_down(Point::new(x, y));
            }
            AppEvent::PointerMove { x, y } => self.engine.pointer_move(Point::new(x, y)),
            AppEvent::PointerUp { x, y } => self.engine.pointer_up(Point::new(x, y)),
            AppEvent::PointerCancel => self.engine.pointer_cancel(),
            AppEvent::TouchStart { touches } => self.engine.touch_start(&touches),
            AppEvent::TouchMove { touches } => self.engine.touch_move(&touches),
            AppEvent::TouchEnd { touches } => self.engine.touch_end(&touches),
            AppEvent::TouchCancel => self.engine.touch_cancel(),
            AppEvent::Blocks { blocks } => {
                log::debug!("Received {} blocks", blocks.len());
                self.engine.set_blocks(blocks);
                self.emit_layout();
            }
            AppEvent::Chart { mode, values } => {
                self.chart = Some((mode, values));
                self.emit_layout();
            }
            AppEvent::ConfigReload => self.reload_config(),
            AppEvent::Resize { .. } => {}
        }
    }

    /// Applies a pending resize, if any.
    pub fn flush(&mut self) {
        let Some(size) = self.pending_resize.take() else {
            return;
        };

        let key = SizeKey::new(size.width, size.height);
        if key == self.size {
            return;
        }
        self.size = key;
        self.apply_face();
        self.emit_layout();
    }

    pub fn apply_config(&mut self, config: Config) {
        self.layouts.clear();
        self.engine.set_config(config.engine());
        self.config = config;
        self.apply_face();
        self.emit_layout();
    }

    fn reload_config(&mut self) {
        let path = match config::resolve_config_path(self.config_path.as_deref()) {
            Ok(p) => p,
            Err(e) => {
                log::error!("Failed to reload configuration: {}", e);
                return;
            }
        };

        match config::load_config(&path) {
            Ok(config) => {
                self.apply_config(config);
                log::info!("Configuration reloaded");
            }
            Err(e) => log::error!("Failed to reload configuration: {}", e),
        }
    }

    fn apply_face(&mut self) {
        let face = match self.size {
            Some(key) => self.layouts.get(key, &self.config).face,
            None => ClockFace::default(),
        };
        self.engine.set_face(face);
    }

    fn emit_layout(&mut self) {
        let Some(key) = self.size else {
            log::debug!("No container size yet, skipping layout");
            return;
        };

        let face = self.layouts.get(key, &self.config);
        let blocks = self.engine.layout();
        let hexagon = self
            .chart
            .as_ref()
            .map(|(mode, values)| hexagon_vertices(values, *mode, &face.face))
            .unwrap_or_default();

        self.engine.host_mut().emit(&Output::Layout {
            face: &face,
            blocks: &blocks,
            hexagon: &hexagon,
        });
    }
}
