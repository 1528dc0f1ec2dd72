use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::SummaryField;

// ---------------------------------------------------------------------------
// Series colours
// ---------------------------------------------------------------------------

pub const STEEL_BLUE: Color32 = Color32::from_rgb(0x46, 0x82, 0xb4);
pub const HUMIDITY_GREEN: Color32 = Color32::from_rgb(0x69, 0xb3, 0xa2);
pub const WIND_ORANGE: Color32 = Color32::from_rgb(0xd8, 0x87, 0x71);

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            from_hsl(Hsl::new(hue, 0.75, 0.55))
        })
        .collect()
}

/// Fixed colour for a summary field's series.
pub fn series_color(field: SummaryField) -> Color32 {
    match field {
        SummaryField::AvgHumidity => HUMIDITY_GREEN,
        SummaryField::AvgWindSpeed => WIND_ORANGE,
        SummaryField::AvgTemp | SummaryField::Total => STEEL_BLUE,
        SummaryField::MinTemp => temperature_palette()[0],
        SummaryField::MaxTemp => temperature_palette()[1],
    }
}

/// Cool/warm pair for minimum and maximum temperatures, spread from blue.
fn temperature_palette() -> [Color32; 2] {
    let palette = generate_palette(3);
    [palette[2], palette[0]]
}

/// Washed-out version of `color`, used for legend entries of hidden series.
pub fn muted(color: Color32) -> Color32 {
    let rgb = Srgb::new(
        color.r() as f32 / 255.0,
        color.g() as f32 / 255.0,
        color.b() as f32 / 255.0,
    );
    let mut hsl: Hsl = rgb.into_color();
    hsl.saturation *= 0.2;
    hsl.lightness = 0.8;
    from_hsl(hsl)
}

fn from_hsl(hsl: Hsl) -> Color32 {
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0) as u8,
    )
}
