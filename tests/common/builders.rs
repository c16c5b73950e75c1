//! Test doubles and builders for panes and app construction

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;

use mdma_viewer::types::{AxisRange, PaneKind, SweepData};
use mdma_viewer::{PlotSurface, Result, UiSessionState, ViewerApp, ViewerConfig};

/// What a fake pane currently shows
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaneView {
    pub x: (f64, f64),
    pub y: (f64, f64),
    pub applied: Option<(AxisRange, AxisRange)>,
    pub data_rows: usize,
}

impl Default for PaneView {
    fn default() -> Self {
        Self {
            x: (0.0, 1.0),
            y: (0.0, 1.0),
            applied: None,
            data_rows: 0,
        }
    }
}

/// Shared view state for every fake pane, keyed by pane kind.
///
/// Tests "zoom" a pane by writing its extents here.
#[derive(Clone, Default)]
pub struct FakeScene {
    views: Rc<RefCell<HashMap<PaneKind, PaneView>>>,
    built: Rc<RefCell<Vec<String>>>,
}

impl FakeScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn zoom(&self, kind: PaneKind, x: (f64, f64), y: (f64, f64)) {
        let mut views = self.views.borrow_mut();
        let view = views.entry(kind).or_default();
        view.x = x;
        view.y = y;
    }

    pub fn view(&self, kind: PaneKind) -> PaneView {
        self.views.borrow().get(&kind).copied().unwrap_or_default()
    }

    /// Titles of every pane built so far, in build order
    pub fn built(&self) -> Vec<String> {
        self.built.borrow().clone()
    }

    pub fn factory(&self) -> impl FnMut(PaneKind, &str) -> Result<Box<dyn PlotSurface>> {
        let scene = self.clone();
        move |kind: PaneKind, title: &str| -> Result<Box<dyn PlotSurface>> {
            scene.built.borrow_mut().push(title.to_string());
            Ok(Box::new(FakePane {
                kind,
                title: title.to_string(),
                scene: scene.clone(),
            }))
        }
    }

    fn update(&self, kind: PaneKind, f: impl FnOnce(&mut PaneView)) {
        f(self.views.borrow_mut().entry(kind).or_default());
    }
}

/// A pane whose extents come from a [`FakeScene`]
pub struct FakePane {
    kind: PaneKind,
    title: String,
    scene: FakeScene,
}

impl PlotSurface for FakePane {
    fn title(&self) -> String {
        self.title.clone()
    }

    fn x_lim(&self) -> (f64, f64) {
        self.scene.view(self.kind).x
    }

    fn y_lim(&self) -> (f64, f64) {
        self.scene.view(self.kind).y
    }

    fn set_limits(&mut self, x: AxisRange, y: AxisRange) {
        // a redrawn plot shows the limits it was given
        self.scene.update(self.kind, |view| {
            view.applied = Some((x, y));
            view.x = (x.start, x.stop);
            view.y = (y.start, y.stop);
        });
    }

    fn set_data(&mut self, data: &SweepData) {
        let rows = data.y.len();
        self.scene.update(self.kind, |view| view.data_rows = rows);
    }

    fn draw(&mut self, _ui: &mut egui::Ui) {}

    fn save_figure(&self, path: &Path) -> Result<()> {
        std::fs::write(path, &self.title)?;
        Ok(())
    }
}

/// Builder for a [`ViewerApp`] backed by fake panes
pub struct AppBuilder {
    config: ViewerConfig,
    session: UiSessionState,
    scene: FakeScene,
}

impl AppBuilder {
    pub fn new() -> Self {
        Self {
            config: ViewerConfig::default(),
            session: UiSessionState::default(),
            scene: FakeScene::new(),
        }
    }

    pub fn session(mut self, session: UiSessionState) -> Self {
        self.session = session;
        self
    }

    pub fn config(mut self, config: ViewerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn scene(mut self, scene: FakeScene) -> Self {
        self.scene = scene;
        self
    }

    pub fn build(self) -> (ViewerApp, FakeScene) {
        let app = ViewerApp::with_factory(self.config, self.session, self.scene.factory())
            .expect("fake panes always build");
        (app, self.scene)
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}
