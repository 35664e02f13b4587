//! Map styles understood by the canvas engine.

use eframe::egui::Color32;

/// Built-in styles, keyed by the trailing part of a style URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapStyle {
    Light,
    Dark,
    Streets,
    Outdoors,
    Satellite,
}

/// Colors used to paint one style.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: Color32,
    pub graticule: Color32,
    pub marker: Color32,
    pub marker_outline: Color32,
    pub text: Color32,
}

impl MapStyle {
    pub fn all() -> &'static [MapStyle] {
        &[
            MapStyle::Light,
            MapStyle::Dark,
            MapStyle::Streets,
            MapStyle::Outdoors,
            MapStyle::Satellite,
        ]
    }

    /// Style identifier, e.g. `light-v11`.
    pub fn id(&self) -> &'static str {
        match self {
            MapStyle::Light => "light-v11",
            MapStyle::Dark => "dark-v11",
            MapStyle::Streets => "streets-v12",
            MapStyle::Outdoors => "outdoors-v12",
            MapStyle::Satellite => "satellite-v9",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MapStyle::Light => "Light",
            MapStyle::Dark => "Dark",
            MapStyle::Streets => "Streets",
            MapStyle::Outdoors => "Outdoors",
            MapStyle::Satellite => "Satellite",
        }
    }

    /// Full style URL as a host would bind it.
    pub fn url(&self) -> String {
        format!("mapbox://styles/mapbox/{}", self.id())
    }

    /// Resolves a style URL or bare identifier.
    pub fn parse(style: &str) -> Option<MapStyle> {
        let id = style.trim().rsplit('/').next().unwrap_or_default();
        MapStyle::all().iter().copied().find(|s| s.id() == id)
    }

    /// Like [`MapStyle::parse`], falling back to light with a warning.
    pub fn resolve(style: &str) -> MapStyle {
        MapStyle::parse(style).unwrap_or_else(|| {
            log::warn!("Unknown map style '{}', using {}", style, MapStyle::Light.id());
            MapStyle::Light
        })
    }

    pub fn palette(&self) -> Palette {
        match self {
            MapStyle::Light => Palette {
                background: Color32::from_rgb(242, 242, 238),
                graticule: Color32::from_rgb(210, 210, 205),
                marker: Color32::from_rgb(60, 130, 230),
                marker_outline: Color32::WHITE,
                text: Color32::from_rgb(90, 90, 90),
            },
            MapStyle::Dark => Palette {
                background: Color32::from_rgb(30, 32, 38),
                graticule: Color32::from_rgb(55, 58, 66),
                marker: Color32::from_rgb(100, 180, 255),
                marker_outline: Color32::from_rgb(20, 20, 25),
                text: Color32::from_rgb(170, 170, 180),
            },
            MapStyle::Streets => Palette {
                background: Color32::from_rgb(246, 240, 228),
                graticule: Color32::from_rgb(225, 205, 170),
                marker: Color32::from_rgb(220, 70, 60),
                marker_outline: Color32::WHITE,
                text: Color32::from_rgb(100, 85, 70),
            },
            MapStyle::Outdoors => Palette {
                background: Color32::from_rgb(226, 236, 214),
                graticule: Color32::from_rgb(190, 208, 175),
                marker: Color32::from_rgb(200, 110, 40),
                marker_outline: Color32::WHITE,
                text: Color32::from_rgb(70, 90, 60),
            },
            MapStyle::Satellite => Palette {
                background: Color32::from_rgb(28, 44, 34),
                graticule: Color32::from_rgb(52, 72, 58),
                marker: Color32::from_rgb(255, 200, 60),
                marker_outline: Color32::BLACK,
                text: Color32::from_rgb(200, 210, 200),
            },
        }
    }
}

/// Parses a `#rrggbb` color with the given opacity.
pub fn fill_color(hex: &str, opacity: f32) -> Option<Color32> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();
    let alpha = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;

    Some(Color32::from_rgba_unmultiplied(
        channel(0)?,
        channel(2)?,
        channel(4)?,
        alpha,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_style_urls() {
        assert_eq!(
            MapStyle::parse("mapbox://styles/mapbox/dark-v11"),
            Some(MapStyle::Dark)
        );
        assert_eq!(MapStyle::parse("satellite-v9"), Some(MapStyle::Satellite));
        assert_eq!(MapStyle::parse("mapbox://styles/someone/custom"), None);
        assert_eq!(MapStyle::resolve("nonsense"), MapStyle::Light);
    }

    #[test]
    fn test_url_round_trip() {
        for style in MapStyle::all() {
            assert_eq!(MapStyle::parse(&style.url()), Some(*style));
        }
    }

    #[test]
    fn test_fill_color() {
        let color = fill_color("#0080ff", 0.5).unwrap();
        assert_eq!(color, Color32::from_rgba_unmultiplied(0, 128, 255, 128));
        assert!(fill_color("0080ff", 0.5).is_none());
        assert!(fill_color("#08f", 0.5).is_none());
        assert!(fill_color("#zz80ff", 0.5).is_none());
    }
}
