use std::collections::HashMap;

use crate::error::{QueryError, Result};
use crate::types::PlaceType;

pub type Rgba = [u8; 4];

pub fn lerp_f32(a: f32, b: f32, s: f32) -> f32 {
    a + (b - a) * s
}

pub fn lerp_color(a: &Rgba, b: &Rgba, s: f32) -> Rgba {
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = lerp_f32(a[i] as f32, b[i] as f32, s)
            .round()
            .clamp(0.0, 255.0) as u8;
    }
    out
}

/// Piecewise-linear colour ramp over evenly spaced stops, `s` in `[0, 1]`.
pub fn gradient_at(stops: &[Rgba], s: f32) -> Rgba {
    match stops.len() {
        0 => [0, 0, 0, 255],
        1 => stops[0],
        n => {
            let scaled = s.clamp(0.0, 1.0) * (n - 1) as f32;
            let i = (scaled.floor() as usize).min(n - 2);
            lerp_color(&stops[i], &stops[i + 1], scaled - i as f32)
        }
    }
}

pub fn parse_hex(hex: &str) -> Result<Rgba> {
    let digits = hex.trim().trim_start_matches('#');
    let channel = |i: usize| {
        digits
            .get(i..i + 2)
            .and_then(|c| u8::from_str_radix(c, 16).ok())
            .ok_or_else(|| QueryError::Config(format!("invalid colour '{hex}'")))
    };
    match digits.len() {
        6 => Ok([channel(0)?, channel(2)?, channel(4)?, 255]),
        8 => Ok([channel(0)?, channel(2)?, channel(4)?, channel(6)?]),
        _ => Err(QueryError::Config(format!("invalid colour '{hex}'"))),
    }
}

pub fn to_hex(color: &Rgba) -> String {
    format!("#{:02x}{:02x}{:02x}", color[0], color[1], color[2])
}

/// Colour for one regional bar, darker for larger counts.
pub fn heat_color(count: usize, max: usize, stops: &[Rgba]) -> Rgba {
    if max == 0 {
        return gradient_at(stops, 0.0);
    }
    gradient_at(stops, count as f32 / max as f32)
}

/// Fixed colour per place type so a category keeps its colour across queries.
#[derive(Debug, Clone)]
pub struct CategoryPalette {
    colors: HashMap<PlaceType, Rgba>,
}

impl CategoryPalette {
    /// Configured colours win. Every other category gets a colour sampled from
    /// `gradient`, spaced by its position in `place_types`.
    pub fn new(
        place_types: &[PlaceType],
        configured: &HashMap<PlaceType, Rgba>,
        gradient: &[Rgba],
    ) -> Self {
        let unassigned: Vec<&PlaceType> = place_types
            .iter()
            .filter(|p| !configured.contains_key(*p))
            .collect();

        let mut colors = configured.clone();
        for (i, place_type) in unassigned.iter().enumerate() {
            let s = if unassigned.len() > 1 {
                i as f32 / (unassigned.len() - 1) as f32
            } else {
                0.0
            };
            colors.insert((*place_type).clone(), gradient_at(gradient, s));
        }
        CategoryPalette { colors }
    }

    pub fn color_of(&self, place_type: &PlaceType) -> Rgba {
        self.colors
            .get(place_type)
            .copied()
            .unwrap_or([128, 128, 128, 255])
    }

    pub fn hex_of(&self, place_type: &PlaceType) -> String {
        to_hex(&self.color_of(place_type))
    }
}

#[cfg(test)]
#[path = "./colors_test.rs"]
mod colors_test;
