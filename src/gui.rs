//! Native GUI viewer using egui
//!
//! Paints scene frames onto an egui canvas. Click the canvas to toggle
//! labels. The canvas repaints on input only once the data has arrived.

use eframe::egui;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::color::Rgba;
use crate::config::Config;
use crate::draw::{flatten, DrawCommand, Primitive, TextAlign};
use crate::loader::{load_all, DataSource};
use crate::scene::{initialize, render_frame, InputEvent, RedrawMode, SceneState};

/// Number lists handed over from the loader task
type Pending = Arc<Mutex<Option<HashMap<String, Vec<String>>>>>;

/// Run the native GUI viewer
pub fn run_viewer(config: Config, preset: Option<String>) -> anyhow::Result<()> {
    let mut scene = initialize(&config)?;
    if let Some(name) = preset.as_deref() {
        scene.select_preset(name)?;
    }
    let (width, height) = scene.size();

    let runtime = tokio::runtime::Handle::current();
    let source = DataSource::parse(&config.data_source);
    let languages = config.language_codes();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([width as f32, height as f32 + 60.0])
            .with_title("Numeral Order"),
        ..Default::default()
    };

    eframe::run_native(
        "Numeral Order",
        options,
        Box::new(move |cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::dark());

            let pending: Pending = Arc::new(Mutex::new(None));
            let slot = pending.clone();
            let ctx = cc.egui_ctx.clone();
            runtime.spawn(async move {
                let lists = load_all(&source, &languages).await;
                if let Ok(mut guard) = slot.lock() {
                    *guard = Some(lists);
                }
                ctx.request_repaint();
            });

            Ok(Box::new(NumeralApp::new(scene, pending)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("GUI error: {}", e))
}

struct NumeralApp {
    scene: SceneState,
    pending: Pending,
    frame: Vec<DrawCommand>,
    events: Vec<InputEvent>,
    dirty: bool,
}

impl NumeralApp {
    fn new(scene: SceneState, pending: Pending) -> Self {
        Self {
            scene,
            pending,
            frame: Vec::new(),
            events: Vec::new(),
            dirty: true,
        }
    }

    /// Move finished number lists into the scene
    fn take_pending(&mut self) {
        let lists = match self.pending.lock() {
            Ok(mut guard) => guard.take(),
            Err(e) => {
                warn!("Loader state poisoned: {}", e);
                None
            }
        };
        if let Some(lists) = lists {
            info!("Number lists arrived for {} languages", lists.len());
            self.scene.attach(lists);
            self.dirty = true;
        }
    }

    fn paint(&self, painter: &egui::Painter, origin: egui::Pos2) {
        let at = |(x, y): (f64, f64)| origin + egui::vec2(x as f32, y as f32);

        for prim in flatten(&self.frame) {
            match prim {
                Primitive::Background(c) => {
                    painter.rect_filled(painter.clip_rect(), 0.0, color32(c));
                }
                Primitive::Line { from, to, color, weight } => {
                    painter.line_segment([at(from), at(to)], egui::Stroke::new(weight as f32, color32(color)));
                }
                Primitive::Circle { center, radius, fill } => {
                    painter.circle_filled(at(center), radius as f32, color32(fill));
                }
                Primitive::Text { pos, text, size, align, fill } => {
                    let anchor = match align {
                        TextAlign::Left => egui::Align2::LEFT_BOTTOM,
                        TextAlign::Right => egui::Align2::RIGHT_BOTTOM,
                    };
                    painter.text(at(pos), anchor, text, egui::FontId::proportional(size as f32), color32(fill));
                }
            }
        }
    }
}

impl eframe::App for NumeralApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.take_pending();

        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let current = self.scene.preset().name.clone();
                let mut selected = current.clone();
                egui::ComboBox::from_id_salt("preset")
                    .selected_text(&selected)
                    .show_ui(ui, |ui| {
                        for preset in self.scene.presets() {
                            ui.selectable_value(&mut selected, preset.name.clone(), &preset.name);
                        }
                    });
                if selected != current {
                    self.events.push(InputEvent::SelectPreset(selected));
                }

                if ui.button("Dots").clicked() {
                    self.events.push(InputEvent::ToggleDots);
                }

                let mode = if self.scene.show_labels() { "labels" } else { "points" };
                ui.label(format!("Click the canvas to toggle labels ({mode})"));

                ui.separator();
                for (language, rgb) in self.scene.legend() {
                    ui.colored_label(color32(rgb.opaque()), language);
                }
            });
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                let (width, height) = self.scene.size();
                let (response, painter) =
                    ui.allocate_painter(egui::vec2(width as f32, height as f32), egui::Sense::click());
                if response.clicked() {
                    self.events.push(InputEvent::Click);
                }

                if self.dirty || !self.events.is_empty() {
                    let events = std::mem::take(&mut self.events);
                    let frame = render_frame(&mut self.scene, &events);
                    debug!("Rendered frame: {} commands", frame.commands.len());
                    self.frame = frame.commands;
                    self.dirty = frame.redraw == RedrawMode::Continuous;

                    if self.dirty {
                        let fps = self.scene.frame_rate().max(1);
                        ctx.request_repaint_after(Duration::from_millis(1000 / fps as u64));
                    }
                }

                self.paint(&painter, response.rect.min);
            });
    }
}

fn color32(c: Rgba) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(c.r, c.g, c.b, c.a)
}
