//! Central place for all default values.
//! Update these and the whole app picks them up.

use crossterm::style::Color;

pub struct Defaults;

impl Defaults {
    /* Storage */
    pub const DB_PATH: &'static str = "gpu_catalog.json";

    /* Logging */
    pub const LOG_FILTER: &'static str = "warn";

    /* Menu engine */
    pub const HIGHLIGHT_COLOR: Color = Color::Green;
    pub const HIGHLIGHT_BOLD: bool = true;
    pub const FOOTER: &'static str =
        "Use j, k, arrow keys or number keys to navigate, enter to select, and q or esc to quit";
    /// How long "Registered ..., id: N" stays on screen.
    pub const REGISTER_PAUSE_MS: u64 = 1500;
    /// How long to wait for the rest of an escape sequence after a lone ESC byte.
    pub const ESC_SEQUENCE_WAIT_MS: u64 = 30;

    /* Sample data written to a fresh catalog */
    pub const SEED_ARCHITECTURE: &'static str = "Ada Lovelace";
    pub const SEED_PROCESSOR: &'static str = "AD102";
    pub const SEED_SERIES: &'static str = "RTX 4000";
    pub const SEED_SERIES_YEAR: i64 = 2022;
    pub const SEED_MANUFACTURER: &'static str = "Nvidia";
    pub const SEED_MANUFACTURER_FOUNDED: i64 = 1993;
    pub const SEED_GPU: &'static str = "RTX 4090";
    pub const SEED_GPU_CLOCK_MHZ: i64 = 2235;
    pub const SEED_GPU_VRAM_GB: i64 = 24;
    pub const SEED_GPU_PRICE_CENTS: i64 = 159900;
}
