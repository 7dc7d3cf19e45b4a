use crate::config::{ColorConfig, HexColor};
use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use palette::{Srgba, WithAlpha};

const DARK_TONE_ALPHA: f64 = 0.35;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThemeColors {
    pub background: Srgba<f64>,
    pub light: Srgba<f64>,
    pub dark: Srgba<f64>,
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            background: Srgba::new(0.106, 0.106, 0.106, 1.0),
            light: Srgba::new(1.0, 1.0, 1.0, 1.0),
            dark: Srgba::new(1.0, 1.0, 1.0, DARK_TONE_ALPHA),
        }
    }
}

impl ThemeColors {
    /// Config colors win; anything left unset comes from the GTK theme.
    pub fn from_context(context: &gtk::StyleContext, config: &ColorConfig) -> Self {
        let fallback = Self::default();
        Self {
            background: config.background.map(to_srgba).unwrap_or_else(|| {
                Self::lookup_color(context, "theme_bg_color", fallback.background, None)
            }),
            light: config.light.map(to_srgba).unwrap_or_else(|| {
                Self::lookup_color(context, "theme_fg_color", fallback.light, None)
            }),
            dark: config.dark.map(to_srgba).unwrap_or_else(|| {
                Self::lookup_color(
                    context,
                    "theme_fg_color",
                    fallback.dark,
                    Some(DARK_TONE_ALPHA),
                )
            }),
        }
    }

    pub fn from_config(config: &ColorConfig) -> Self {
        let fallback = Self::default();
        Self {
            background: config.background.map(to_srgba).unwrap_or(fallback.background),
            light: config.light.map(to_srgba).unwrap_or(fallback.light),
            dark: config.dark.map(to_srgba).unwrap_or(fallback.dark),
        }
    }

    fn lookup_color(
        context: &gtk::StyleContext,
        name: &str,
        fallback: Srgba<f64>,
        alpha_override: Option<f64>,
    ) -> Srgba<f64> {
        context
            .lookup_color(name)
            .map(|c| {
                let (r, g, b, a) = (
                    c.red() as f64,
                    c.green() as f64,
                    c.blue() as f64,
                    c.alpha() as f64,
                );
                Srgba::new(r, g, b, alpha_override.unwrap_or(a))
            })
            .unwrap_or(fallback)
    }
}

fn to_srgba(color: HexColor) -> Srgba<f64> {
    color.rgb().into_format::<f64>().with_alpha(1.0)
}

pub fn load_css() {
    let provider = gtk::CssProvider::new();
    let css_data = "
.ringtimer-drawing-area {
    background: none;
    background-color: transparent;
}
";
    provider.load_from_data(css_data);

    if let Some(display) = gdk::Display::default() {
        gtk::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_colors_override_defaults() {
        let config = ColorConfig {
            background: Some("#000000".parse().unwrap()),
            light: None,
            dark: Some("#ff0000".parse().unwrap()),
        };
        let colors = ThemeColors::from_config(&config);

        assert_eq!(colors.background, Srgba::new(0.0, 0.0, 0.0, 1.0));
        assert_eq!(colors.light, ThemeColors::default().light);
        assert_eq!(colors.dark, Srgba::new(1.0, 0.0, 0.0, 1.0));
    }
}
