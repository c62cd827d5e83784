use eframe;

fn main() -> eframe::Result<()> {
    env_logger::init();

    let options = eframe::NativeOptions::default();

    eframe::run_native(
        "Wayfarer",
        options,
        Box::new(|_cc| {
            Ok(Box::new(wayfarer::ui::app::App::new()))
        }),
    )
}
