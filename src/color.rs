use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Mix, Srgb};

// ---------------------------------------------------------------------------
// Bar colour gradients
// ---------------------------------------------------------------------------

/// One gradient per chart so neighbouring charts are easy to tell apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gradient {
    Viridis,
    Magma,
    Coolwarm,
    Plasma,
}

impl Gradient {
    /// Endpoints in HSL (hue degrees, saturation, lightness).
    fn endpoints(self) -> (Hsl, Hsl) {
        match self {
            Gradient::Viridis => (Hsl::new(280.0, 0.55, 0.30), Hsl::new(60.0, 0.85, 0.55)),
            Gradient::Magma => (Hsl::new(260.0, 0.60, 0.20), Hsl::new(30.0, 0.95, 0.70)),
            Gradient::Coolwarm => (Hsl::new(220.0, 0.65, 0.55), Hsl::new(5.0, 0.70, 0.55)),
            Gradient::Plasma => (Hsl::new(250.0, 0.75, 0.35), Hsl::new(50.0, 0.95, 0.55)),
        }
    }

    /// `n` colours sampled evenly from the gradient, first bar first.
    pub fn colors(self, n: usize) -> Vec<Color32> {
        if n == 0 {
            return Vec::new();
        }
        let (from, to) = self.endpoints();
        (0..n)
            .map(|i| {
                let t = if n == 1 { 0.0 } else { i as f32 / (n - 1) as f32 };
                let rgb: Srgb = from.mix(to, t).into_color();
                Color32::from_rgb(
                    (rgb.red.clamp(0.0, 1.0) * 255.0) as u8,
                    (rgb.green.clamp(0.0, 1.0) * 255.0) as u8,
                    (rgb.blue.clamp(0.0, 1.0) * 255.0) as u8,
                )
            })
            .collect()
    }
}
