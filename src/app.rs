use std::time::{Duration, Instant};

use eframe::egui;
use n_queens_rust::settings::{Settings, SpeedPreset, MAX_SPEED_MS};
use n_queens_rust::{Event, Move, RunHandle, Snapshot, Solution, Solver};
use rand::Rng;

use crate::theme::Theme;

const FADE_IN: Duration = Duration::from_millis(150);

struct Particle {
    pos: egui::Pos2,
    vel: egui::Vec2,
    color: egui::Color32,
    life: f32, // 1.0 down to 0.0
    size: f32,
}

/// Consumer side of the solver: draws what it is told and acknowledges
/// solutions.
pub struct QueensApp {
    settings: Settings,
    theme: Theme,
    solver: Solver,
    run: Option<RunHandle>,

    snapshot: Snapshot,
    last_move: Option<(Move, Instant)>,
    transcript: String,
    pending: Option<Solution>,
    status: String,

    particles: Vec<Particle>,
}

impl QueensApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::dark());
        let settings: Settings = cc
            .storage
            .and_then(|s| eframe::get_value(s, eframe::APP_KEY))
            .unwrap_or_default();
        let theme = Theme::named(&settings.theme);
        let size = settings.board_size().unwrap_or(8);

        let solver = Solver::default();
        solver.presentation_ready();

        Self {
            settings,
            theme,
            solver,
            run: None,
            snapshot: Snapshot::empty(size),
            last_move: None,
            transcript: String::new(),
            pending: None,
            status: "Enter a board size and press Start.".to_owned(),
            particles: Vec::new(),
        }
    }

    fn start(&mut self) {
        let Some(size) = self.settings.board_size() else {
            self.status = "Please enter a positive number for the board size.".to_owned();
            return;
        };
        match self.solver.start_run(size, self.settings.effective_speed()) {
            Ok(run) => {
                self.run = Some(run);
                self.snapshot = Snapshot::empty(size);
                self.last_move = None;
                self.transcript.clear();
                self.pending = None;
                self.status = format!("Solving {size}×{size}…");
            }
            Err(e) => {
                log::warn!("could not start run: {e}");
                self.status = e.to_string();
            }
        }
    }

    fn set_speed(&mut self, speed_ms: u64) {
        self.settings.speed_ms = speed_ms;
        self.solver.set_speed(self.settings.effective_speed());
    }

    fn drain_events(&mut self, ctx: &egui::Context) {
        let events: Vec<Event> = match &self.run {
            Some(run) => run.events().try_iter().collect(),
            None => return,
        };
        for event in events {
            match event {
                Event::BoardChanged { snapshot, change } => {
                    self.snapshot = snapshot;
                    self.last_move = Some((change, Instant::now()));
                }
                Event::SolutionFound(solution) => {
                    self.transcript.push_str(&solution.transcript());
                    self.transcript.push('\n');
                    self.spawn_particles(ctx.screen_rect().center(), self.theme.accent);
                    self.pending = Some(solution);
                }
                Event::RunComplete { solutions } => {
                    self.status = format!("Done: {solutions} solution(s).");
                    if let Some(run) = self.run.take() {
                        if run.join().is_err() {
                            log::error!("solver thread panicked");
                        }
                    }
                }
            }
        }
    }

    fn spawn_particles(&mut self, pos: egui::Pos2, color: egui::Color32) {
        let mut rng = rand::thread_rng();
        for _ in 0..30 {
            let angle: f32 = rng.gen_range(0.0..std::f32::consts::TAU);
            let speed: f32 = rng.gen_range(100.0..500.0);
            self.particles.push(Particle {
                pos,
                vel: egui::vec2(angle.cos() * speed, angle.sin() * speed - 200.0),
                color,
                life: 1.0,
                size: rng.gen_range(3.0..7.0),
            });
        }
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        let running = self.solver.is_running();

        ui.vertical_centered(|ui| {
            ui.add_space(8.0);
            ui.label(
                egui::RichText::new("♛ N-Queens")
                    .size(24.0)
                    .strong()
                    .color(self.theme.text),
            );
        });
        ui.add_space(20.0);
        ui.label(egui::RichText::new("Board").strong().color(self.theme.text));
        ui.separator();
        ui.horizontal(|ui| {
            ui.label("Board Size:");
            ui.add_enabled(
                !running,
                egui::TextEdit::singleline(&mut self.settings.size_input).desired_width(50.0),
            );
            if ui.add_enabled(!running, egui::Button::new("Start")).clicked() {
                self.start();
            }
        });

        ui.add_space(15.0);
        ui.label(egui::RichText::new("Speed").strong().color(self.theme.text));
        ui.separator();
        ui.horizontal(|ui| {
            for preset in SpeedPreset::ALL {
                if ui.button(preset.label()).clicked() {
                    self.set_speed(preset.millis());
                }
            }
        });
        let mut speed_ms = self.settings.speed_ms;
        if ui
            .add(egui::Slider::new(&mut speed_ms, 1..=MAX_SPEED_MS).text("ms / step"))
            .changed()
        {
            self.set_speed(speed_ms);
        }

        ui.add_space(10.0);
        ui.checkbox(&mut self.settings.show_threats, "Show Threatened Squares");
        ui.horizontal(|ui| {
            ui.label("Theme:");
            egui::ComboBox::from_id_salt("theme_picker")
                .selected_text(self.theme.name)
                .show_ui(ui, |ui| {
                    for preset in Theme::presets() {
                        let name = preset.name;
                        ui.selectable_value(&mut self.theme, preset, name);
                    }
                });
        });
        self.settings.theme = self.theme.name.to_owned();

        ui.add_space(20.0);
        ui.label(
            egui::RichText::new(format!(
                "Solutions Found: {}",
                self.solver.solution_count()
            ))
            .strong()
            .size(16.0),
        );
        ui.label(&self.status);

        ui.add_space(10.0);
        ui.label(egui::RichText::new("Solutions").strong().color(self.theme.text));
        ui.separator();
        egui::ScrollArea::vertical()
            .max_height(300.0)
            .stick_to_bottom(true)
            .show(ui, |ui| {
                ui.label(egui::RichText::new(&self.transcript).monospace().size(12.0));
            });
    }

    fn solution_dialog(&mut self, ctx: &egui::Context) {
        let Some(solution) = &self.pending else {
            return;
        };
        let mut acknowledged = false;
        egui::Window::new("Solution found!")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(format!("Solution #{}: {}", solution.count, solution));
                ui.vertical_centered(|ui| {
                    acknowledged = ui.button("OK").clicked();
                });
            });
        if acknowledged {
            self.solver.acknowledge_solution();
            self.pending = None;
        }
    }

    fn draw_board(&self, ui: &mut egui::Ui) {
        let available_rect = ui.available_rect_before_wrap();
        let margin = 60.0;
        let size = (available_rect.height() - margin)
            .min(available_rect.width() - margin)
            .max(0.0);
        let board_rect =
            egui::Rect::from_center_size(available_rect.center(), egui::vec2(size, size));

        let painter = ui.painter();
        painter.rect_filled(
            board_rect.expand(5.0),
            5.0,
            self.theme.text.linear_multiply(0.2),
        );

        let n = self.snapshot.size();
        let cell_size = size / n as f32;
        let fresh = match self.last_move {
            Some((Move::Placed { row, col }, at)) => {
                let t = (at.elapsed().as_secs_f32() / FADE_IN.as_secs_f32()).min(1.0);
                Some((row, col, t))
            }
            _ => None,
        };

        for row in 0..n {
            for col in 0..n {
                let cell_rect = egui::Rect::from_min_size(
                    egui::pos2(
                        board_rect.min.x + col as f32 * cell_size,
                        board_rect.min.y + row as f32 * cell_size,
                    ),
                    egui::vec2(cell_size, cell_size),
                );
                let color = if (row + col) % 2 == 0 {
                    self.theme.light_square
                } else {
                    self.theme.dark_square
                };
                painter.rect_filled(cell_rect, 0.0, color);

                if self.settings.show_threats
                    && !self.snapshot.has_queen(row, col)
                    && self.snapshot.is_attacked(row, col)
                {
                    painter.rect_filled(cell_rect.shrink(2.0), 2.0, self.theme.threat);
                }

                if self.snapshot.has_queen(row, col) {
                    let alpha = match fresh {
                        Some((r, c, t)) if r == row && c == col => t,
                        _ => 1.0,
                    };
                    painter.text(
                        cell_rect.center(),
                        egui::Align2::CENTER_CENTER,
                        "♛",
                        egui::FontId::proportional(cell_size * 0.7),
                        self.theme.queen.linear_multiply(alpha),
                    );
                }
            }
        }

        for p in &self.particles {
            painter.circle_filled(p.pos, p.size, p.color.linear_multiply(p.life));
        }

        let font_id = egui::FontId::proportional((cell_size * 0.15).max(10.0));
        for i in 0..n {
            let label = (i + 1).to_string();
            painter.text(
                egui::pos2(
                    board_rect.min.x + i as f32 * cell_size + cell_size / 2.0,
                    board_rect.max.y + 10.0,
                ),
                egui::Align2::CENTER_TOP,
                &label,
                font_id.clone(),
                self.theme.text,
            );
            painter.text(
                egui::pos2(
                    board_rect.min.x - 10.0,
                    board_rect.min.y + i as f32 * cell_size + cell_size / 2.0,
                ),
                egui::Align2::RIGHT_CENTER,
                label,
                font_id.clone(),
                self.theme.text,
            );
        }
    }
}

impl eframe::App for QueensApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_events(ctx);

        let dt = ctx.input(|i| i.stable_dt);
        self.particles.retain_mut(|p| {
            p.pos += p.vel * dt;
            p.vel.y += 800.0 * dt; // Gravity
            p.life -= dt * 1.5;
            p.life > 0.0
        });

        let panel_frame = egui::Frame::none()
            .fill(self.theme.panel)
            .inner_margin(12.0)
            .rounding(10.0)
            .stroke(egui::Stroke::new(1.0, egui::Color32::from_white_alpha(20)));

        egui::SidePanel::right("controls")
            .frame(panel_frame)
            .min_width(320.0)
            .resizable(true)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| self.controls(ui));
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(self.theme.background))
            .show(ctx, |ui| self.draw_board(ui));

        self.solution_dialog(ctx);

        if self.run.is_some() || !self.particles.is_empty() {
            ctx.request_repaint_after(Duration::from_millis(16));
        }
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, &self.settings);
    }
}
