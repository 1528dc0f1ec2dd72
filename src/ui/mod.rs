use eframe::egui;

pub mod panels;
pub mod plot;

/// Callback for draw workers: repaint once their result is queued.
pub fn waker(ctx: &egui::Context) -> impl Fn() + Send + 'static {
    let ctx = ctx.clone();
    move || ctx.request_repaint()
}
