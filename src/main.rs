mod app;
mod theme;

use eframe::egui;

fn main() -> eframe::Result<()> {
    let env = env_logger::Env::new()
        .filter("NQUEENS_LOG")
        .write_style("NQUEENS_LOG_STYLE");
    env_logger::init_from_env(env);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1100.0, 750.0]),
        ..Default::default()
    };
    eframe::run_native(
        "N-Queens Solver (Rust)",
        options,
        Box::new(|cc| Ok(Box::new(app::QueensApp::new(cc)))),
    )
}
