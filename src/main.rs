use interest_cloud::cloud::InterestBatch;
use interest_cloud::config::CloudConfig;

mod app;

use app::CloudApp;

fn main() -> Result<(), eframe::Error> {
    env_logger::init();

    let config = CloudConfig::load();
    let batch = InterestBatch::load();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1100.0, 760.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Interest Cloud",
        options,
        Box::new(move |cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::dark());
            Ok(Box::new(CloudApp::new(config, batch)))
        }),
    )
}

impl eframe::App for CloudApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            self.draw_toolbar(ui);
        });

        let ctx_clone = ctx.clone();
        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                self.draw_content(ui, &ctx_clone);
            });
    }
}
