use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use anyhow::Result;
use concept_atlas::{
    ConceptGraph, LayoutConfig, LayoutError, LayoutSession, RunMode, Viewport,
    create_layout_session, load_graph, parse_graph,
};
use eframe::egui::{self, Context, Vec2};

mod graph;
mod render_utils;
mod ui;

const BUNDLED_GRAPH: &str = include_str!("../../demos/concepts.json");

#[derive(Clone, Debug)]
pub enum GraphSource {
    Bundled,
    File(PathBuf),
}

impl GraphSource {
    fn load(&self) -> Result<ConceptGraph> {
        match self {
            Self::Bundled => parse_graph(BUNDLED_GRAPH),
            Self::File(path) => load_graph(path),
        }
    }

    fn label(&self) -> String {
        match self {
            Self::Bundled => "bundled calculus graph".to_owned(),
            Self::File(path) => path.display().to_string(),
        }
    }
}

pub struct ConceptAtlasApp {
    source: GraphSource,
    config: LayoutConfig,
    viewport: Viewport,
    run_mode: RunMode,
    state: AppState,
    reload_rx: Option<Receiver<Result<ConceptGraph, String>>>,
}

enum AppState {
    Loading {
        rx: Receiver<Result<ConceptGraph, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    session: LayoutSession,
    source_label: String,
    pan: Vec2,
    zoom: f32,
    hovered: Option<String>,
    show_rings: bool,
    show_labels: bool,
    last_tick_secs: Option<f64>,
    fps_current: f32,
    fps_samples: VecDeque<f32>,
}

impl ConceptAtlasApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        source: GraphSource,
        config: LayoutConfig,
        viewport: Viewport,
        run_mode: RunMode,
    ) -> Self {
        let state = Self::start_load(source.clone());
        Self {
            source,
            config,
            viewport,
            run_mode,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(source: GraphSource) -> Receiver<Result<ConceptGraph, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = source.load().map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(source: GraphSource) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(source),
        }
    }

    fn ready_state(&self, graph: ConceptGraph) -> AppState {
        let viewport = match &self.state {
            AppState::Ready(model) => model.session.viewport(),
            _ => self.viewport,
        };
        match ViewModel::new(
            graph,
            self.config.clone(),
            viewport,
            self.run_mode,
            self.source.label(),
        ) {
            Ok(model) => AppState::Ready(Box::new(model)),
            Err(error) => AppState::Error(error.to_string()),
        }
    }
}

impl eframe::App for ConceptAtlasApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;
        let mut retry = false;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(result) => transition = Some(result),
                    Err(TryRecvError::Empty) => {}
                    Err(TryRecvError::Disconnected) => {
                        transition = Some(Err("Background load worker disconnected".to_owned()));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading concept graph...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
                ctx.request_repaint();
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load concept graph");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    retry = ui.button("Retry").clicked();
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(self.source.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => transition = Some(result),
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                            ctx.request_repaint();
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition =
                                Some(Err("Background load worker disconnected".to_owned()));
                        }
                    }
                }
            }
        }

        if retry {
            self.state = Self::start_load(self.source.clone());
            return;
        }

        if let Some(result) = transition {
            self.reload_rx = None;
            self.state = match result {
                Ok(graph) => self.ready_state(graph),
                Err(error) => AppState::Error(error),
            };
        }
    }
}

impl ViewModel {
    fn new(
        graph: ConceptGraph,
        config: LayoutConfig,
        viewport: Viewport,
        run_mode: RunMode,
        source_label: String,
    ) -> Result<Self, LayoutError> {
        let session = create_layout_session(graph, viewport, config)?.with_run_mode(run_mode);

        Ok(Self {
            session,
            source_label,
            pan: Vec2::ZERO,
            zoom: 1.0,
            hovered: None,
            show_rings: true,
            show_labels: true,
            last_tick_secs: None,
            fps_current: 0.0,
            fps_samples: VecDeque::new(),
        })
    }
}
