//! Named colour schemes.
//!
//! Every scheme is a fixed list of hex colours cycled by point or series
//! index. Unknown names resolve to the default scheme.

use crate::constants::DEFAULT_COLOR_SCHEME;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Highly distinct colours for categorical data
const DEFAULT: &[&str] = &[
    "#2b6cee", // Bright Blue
    "#1dc956", // Green
    "#f98c1f", // Orange
    "#8c36e2", // Violet
    "#e83030", // Red
    "#1dc9bb", // Teal
    "#f2df0d", // Yellow
    "#e236a9", // Magenta
];

const VIRIDIS: &[&str] = &[
    "#440154", "#482878", "#3e4989", "#31688e", "#26828e", "#1f9e89", "#35b779", "#6ece58",
    "#b5de2b", "#fde725",
];

const PLASMA: &[&str] = &[
    "#0d0887", "#46039f", "#7201a8", "#9c179e", "#bd3786", "#d8576b", "#ed7953", "#fb9f3a",
    "#fdca26", "#f0f921",
];

const COOL: &[&str] = &[
    "#1f3a93", "#2c6fbb", "#3a9ad9", "#45b5c4", "#4cc9a4", "#6fd3c1",
];

const WARM: &[&str] = &[
    "#9e0142", "#d53e4f", "#f46d43", "#fdae61", "#fee08b", "#e6a532",
];

const PASTEL: &[&str] = &[
    "#a1c9f4", "#ffb482", "#8de5a1", "#ff9f9b", "#d0bbff", "#debb9b", "#fab0e4", "#cfcfcf",
];

static PALETTES: Lazy<HashMap<&'static str, &'static [&'static str]>> = Lazy::new(|| {
    HashMap::from([
        ("default", DEFAULT),
        ("viridis", VIRIDIS),
        ("plasma", PLASMA),
        ("cool", COOL),
        ("warm", WARM),
        ("pastel", PASTEL),
    ])
});

/// Colours for a scheme name (case-insensitive), falling back to the default
pub fn palette(name: &str) -> &'static [&'static str] {
    let key = name.trim().to_lowercase();
    match PALETTES.get(key.as_str()) {
        Some(colors) => colors,
        None => {
            tracing::debug!(scheme = name, "Unknown color scheme, using {}", DEFAULT_COLOR_SCHEME);
            DEFAULT
        }
    }
}

/// Colour for the `index`-th point or series, cycling through the scheme
pub fn color_at(name: &str, index: usize) -> &'static str {
    let colors = palette(name);
    colors[index % colors.len()]
}

/// Known scheme names, sorted
pub fn scheme_names() -> Vec<&'static str> {
    let mut names: Vec<_> = PALETTES.keys().copied().collect();
    names.sort_unstable();
    names
}

pub fn is_known_scheme(name: &str) -> bool {
    PALETTES.contains_key(name.trim().to_lowercase().as_str())
}
