use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

use crate::report::chart::ChartPalette;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let rgb: Srgb = Hsl::new(hue, 0.75, 0.55).into_color();
            to_color32(rgb)
        })
        .collect()
}

/// `n` colours sampled evenly along a piecewise-linear gradient.
pub fn gradient(n: usize, stops: &[Srgb<u8>]) -> Vec<Color32> {
    let stops: Vec<LinSrgb> = stops
        .iter()
        .map(|c| c.into_format::<f32>().into_linear())
        .collect();
    if stops.is_empty() {
        return vec![Color32::GRAY; n];
    }
    let segments = (stops.len() - 1).max(1) as f32;

    (0..n)
        .map(|i| {
            let t = if n > 1 { i as f32 / (n - 1) as f32 } else { 0.5 };
            let pos = t * segments;
            let idx = (pos.floor() as usize).min(stops.len().saturating_sub(2));
            let next = (idx + 1).min(stops.len() - 1);
            let mixed = stops[idx].mix(stops[next], pos - idx as f32);
            to_color32(Srgb::from_linear(mixed))
        })
        .collect()
}

fn to_color32(rgb: Srgb) -> Color32 {
    let rgb: Srgb<u8> = rgb.into_format();
    Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
}

const COOL_WARM: [Srgb<u8>; 3] = [
    Srgb::new(59, 76, 192),
    Srgb::new(221, 221, 221),
    Srgb::new(180, 4, 38),
];

const VIRIDIS: [Srgb<u8>; 4] = [
    Srgb::new(68, 1, 84),
    Srgb::new(49, 104, 142),
    Srgb::new(53, 183, 121),
    Srgb::new(253, 231, 37),
];

// ---------------------------------------------------------------------------
// Colours for one chart
// ---------------------------------------------------------------------------

/// Hue palettes colour each series; gradients colour each category of a
/// single-series chart.
#[derive(Debug, Clone)]
pub struct ChartColors {
    pub per_series: Vec<Color32>,
    pub per_category: Option<Vec<Color32>>,
}

impl ChartColors {
    pub fn new(palette: ChartPalette, series: usize, categories: usize) -> Self {
        match palette {
            ChartPalette::Hue => ChartColors {
                per_series: generate_palette(series),
                per_category: None,
            },
            ChartPalette::CoolWarm => Self::graded(series, gradient(categories, &COOL_WARM)),
            ChartPalette::Viridis => Self::graded(series, gradient(categories, &VIRIDIS)),
        }
    }

    fn graded(series: usize, per_category: Vec<Color32>) -> Self {
        ChartColors {
            per_series: generate_palette(series),
            per_category: Some(per_category),
        }
    }

    /// Colour of one bar or point.
    pub fn color_for(&self, series: usize, category: usize) -> Color32 {
        self.per_category
            .as_ref()
            .and_then(|c| c.get(category))
            .or_else(|| self.per_series.get(series))
            .copied()
            .unwrap_or(Color32::LIGHT_BLUE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_sizes_match_request() {
        assert!(generate_palette(0).is_empty());
        assert_eq!(generate_palette(7).len(), 7);
        assert_eq!(gradient(12, &VIRIDIS).len(), 12);
    }

    #[test]
    fn gradient_hits_both_ends() {
        let colors = gradient(5, &COOL_WARM);
        assert_eq!(colors[0], Color32::from_rgb(59, 76, 192));
        assert_eq!(colors[4], Color32::from_rgb(180, 4, 38));
    }

    #[test]
    fn category_colours_win_over_series_colours() {
        let colors = ChartColors::new(ChartPalette::Viridis, 1, 3);
        assert_eq!(colors.color_for(0, 0), Color32::from_rgb(68, 1, 84));
        let hue = ChartColors::new(ChartPalette::Hue, 2, 3);
        assert_eq!(hue.color_for(1, 2), hue.per_series[1]);
    }
}
