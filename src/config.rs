//! Startup configuration for the installation.
//!
//! One immutable [`InstallationConfig`] is built at startup (defaults, optionally overlaid by a
//! JSON file and CLI flags), validated once, and then shared by the layout generator, the
//! animation state machine, the strand compositor and the streaming client.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context as _;

use crate::animation::mode::Mode;
use crate::compose::strands::{STRAND_COUNT, STRAND_LEN};
use crate::foundation::core::TickRate;
use crate::foundation::error::{BoatError, BoatResult};

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct InstallationConfig {
    pub geometry: Geometry,
    pub animation: AnimationConfig,
    pub stream: StreamConfig,
}

/// Largest preview canvas side, in pixels.
pub const MAX_CANVAS: u32 = 16_384;

/// Physical layout constants. Counts are in LEDs, coordinates in preview pixels.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Geometry {
    pub led_size: f64,
    pub led_gap: f64,
    /// LEDs along one side of the hull, scanner included.
    pub rail_len: usize,
    /// LEDs per side given to the bow scanner.
    pub scanner_len: usize,
    /// Rail index where the stern corner turns toward the bow.
    pub stern_len: usize,
    /// Length of the curved nose section at the bow end.
    pub nose_len: usize,
    pub wave_len: usize,
    /// Wave edge offset from the top, in LED pitches.
    pub wave_row: usize,
    /// Wave edge offset from the stern, in LED pitches.
    pub wave_column: usize,
    pub spinner_len: usize,
    pub tail_len: usize,
    pub spinner_x: f64,
    pub spinner_top: f64,
    pub spinner_bottom: f64,
    pub tail_x: f64,
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            led_size: 8.0,
            led_gap: 2.0,
            rail_len: 120,
            scanner_len: 20,
            stern_len: 15,
            nose_len: 30,
            wave_len: 30,
            wave_row: 12,
            wave_column: 30,
            spinner_len: 16,
            tail_len: 8,
            spinner_x: 550.0,
            spinner_top: 200.0,
            spinner_bottom: 350.0,
            tail_x: 350.0,
        }
    }
}

impl Geometry {
    /// Distance between neighbouring LED origins.
    pub fn pitch(&self) -> f64 {
        self.led_size + self.led_gap
    }

    /// Cells in each rail fixture (the scanner takes the rest).
    pub fn rail_cells(&self) -> usize {
        self.rail_len.saturating_sub(self.scanner_len)
    }

    /// Rail index where the hull starts curving in toward the nose.
    pub fn prow(&self) -> usize {
        self.rail_len.saturating_sub(self.nose_len)
    }

    /// Rail index where the stern strands end and the bow strands begin.
    pub fn strand_split(&self) -> usize {
        self.rail_len / 2
    }

    /// Upper bound of the scanner's travel; the lower bound is 1.
    pub fn scanner_travel(&self) -> usize {
        self.scanner_len.saturating_sub(2) * 2
    }

    /// Y coordinate of the bottom (starboard) rail baseline.
    pub fn bottom(&self) -> f64 {
        self.pitch() * (self.nose_len * 2) as f64 - self.pitch()
    }

    pub fn nacelle_len(&self) -> usize {
        self.spinner_len + self.tail_len
    }

    /// Preview canvas size in pixels.
    pub fn canvas_size(&self) -> (u32, u32) {
        let w = self.pitch() * self.rail_len.saturating_sub(self.stern_len) as f64;
        let h = self.pitch() * (self.nose_len * 2) as f64;
        (w.max(1.0).ceil() as u32, h.max(1.0).ceil() as u32)
    }

    pub fn validate(&self) -> BoatResult<()> {
        for (name, v) in [
            ("led_size", self.led_size),
            ("led_gap", self.led_gap),
            ("spinner_x", self.spinner_x),
            ("spinner_top", self.spinner_top),
            ("spinner_bottom", self.spinner_bottom),
            ("tail_x", self.tail_x),
        ] {
            if !v.is_finite() {
                return Err(BoatError::config(format!("{name} must be finite")));
            }
        }
        if !(self.led_size >= 1.0) {
            return Err(BoatError::config("led_size must be >= 1"));
        }
        if !(self.led_gap >= 0.0) {
            return Err(BoatError::config("led_gap must be >= 0"));
        }
        if self.scanner_len < 3 {
            return Err(BoatError::config("scanner_len must be >= 3"));
        }
        if self.rail_len <= self.scanner_len || self.scanner_len > self.strand_split() {
            return Err(BoatError::config(
                "scanner_len must be at most half of rail_len",
            ));
        }
        if self.rail_cells() < 7 {
            return Err(BoatError::config("rails need at least 7 LEDs beside the scanner"));
        }
        if self.nose_len <= self.scanner_len {
            return Err(BoatError::config("nose_len must exceed scanner_len"));
        }
        if self.prow() < 2 {
            return Err(BoatError::config("nose_len leaves no room for the bow lights"));
        }
        if self.stern_len + 3 > self.rail_cells() {
            return Err(BoatError::config("stern_len leaves no room for the stern lights"));
        }
        if self.spinner_len == 0 || self.spinner_len % 4 != 0 {
            return Err(BoatError::config(
                "spinner_len must be a positive multiple of 4",
            ));
        }
        if self.tail_len == 0 || self.tail_len % 2 != 0 {
            return Err(BoatError::config("tail_len must be positive and even"));
        }
        if self.wave_len == 0 {
            return Err(BoatError::config("wave_len must be > 0"));
        }

        let p = self.pitch();
        let w = p * self.rail_len.saturating_sub(self.stern_len) as f64;
        let h = p * (self.nose_len * 2) as f64;
        if w > f64::from(MAX_CANVAS) || h > f64::from(MAX_CANVAS) {
            return Err(BoatError::config(format!(
                "preview canvas {w}x{h} exceeds {MAX_CANVAS} pixels per side"
            )));
        }

        for (strand, len) in self.strand_lengths().into_iter().enumerate() {
            if len > STRAND_LEN {
                return Err(BoatError::config(format!(
                    "strand {strand} needs {len} LEDs but strands hold {STRAND_LEN}"
                )));
            }
        }
        Ok(())
    }

    /// Payload length of each strand before padding.
    pub fn strand_lengths(&self) -> [usize; STRAND_COUNT] {
        let split = self.strand_split();
        let stern = split.min(self.rail_cells());
        let bow = self.rail_cells().saturating_sub(split) + self.scanner_len;
        [
            stern,
            bow,
            stern,
            bow,
            self.wave_len * 2,
            self.nacelle_len(),
            self.nacelle_len(),
            0,
        ]
    }
}

/// Per-mode tick rates in ticks per second.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ModeRates {
    pub boat: TickRate,
    pub fast_boat: TickRate,
    pub speed_boat: TickRate,
    pub disco: TickRate,
    pub slow: TickRate,
    pub panic: TickRate,
    pub debug: TickRate,
    pub bright: TickRate,
    pub off: TickRate,
    pub america: TickRate,
    pub space: TickRate,
}

impl Default for ModeRates {
    fn default() -> Self {
        Self {
            boat: TickRate(20),
            fast_boat: TickRate(60),
            speed_boat: TickRate(120),
            disco: TickRate(5),
            slow: TickRate(1),
            panic: TickRate(200),
            debug: TickRate(10),
            bright: TickRate(10),
            off: TickRate(10),
            america: TickRate(50),
            space: TickRate(20),
        }
    }
}

impl ModeRates {
    pub fn get(&self, mode: Mode) -> TickRate {
        match mode {
            Mode::Boat => self.boat,
            Mode::FastBoat => self.fast_boat,
            Mode::SpeedBoat => self.speed_boat,
            Mode::Disco => self.disco,
            Mode::Slow => self.slow,
            Mode::Panic => self.panic,
            Mode::Debug => self.debug,
            Mode::Bright => self.bright,
            Mode::Off => self.off,
            Mode::America => self.america,
            Mode::Space => self.space,
        }
    }

    pub fn validate(&self) -> BoatResult<()> {
        for mode in Mode::ALL {
            self.get(mode)
                .validate()
                .map_err(|e| BoatError::config(format!("rate for '{mode}': {e}")))?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Mode at startup and the substitute for unknown mode requests.
    pub default_mode: Mode,
    pub rates: ModeRates,
    pub brightness_step: f64,
    /// Nacelle pulse frequency; the brightness table uses `nacelle_freq / PI`.
    pub nacelle_freq: f64,
    pub rotations_per_second: f64,
    /// Chance per tick and rail of a new speckle.
    pub speckle_probability: f64,
    /// Fixed RNG seed; entropy when absent.
    pub seed: Option<u64>,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            default_mode: Mode::Space,
            rates: ModeRates::default(),
            brightness_step: 0.1,
            nacelle_freq: 1.0,
            rotations_per_second: 1.0 / std::f64::consts::PI,
            speckle_probability: 0.13,
            seed: None,
        }
    }
}

impl AnimationConfig {
    pub fn validate(&self) -> BoatResult<()> {
        self.rates.validate()?;
        if !(self.brightness_step > 0.0 && self.brightness_step <= 1.0) {
            return Err(BoatError::config("brightness_step must be in (0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.speckle_probability) {
            return Err(BoatError::config("speckle_probability must be in [0, 1]"));
        }
        if !self.nacelle_freq.is_finite() || !self.rotations_per_second.is_finite() {
            return Err(BoatError::config("nacelle settings must be finite"));
        }
        Ok(())
    }
}

/// Open Pixel Control endpoint settings.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    pub host: String,
    pub port: u16,
    pub channel: u8,
    /// Retransmit every frame once to defeat the controller's temporal dithering.
    pub send_twice: bool,
    /// Hold time for each step of the shutdown fade.
    pub fade_ms: u64,
    pub connect_timeout_ms: u64,
    /// Minimum time between reconnect attempts.
    pub retry_ms: u64,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_owned(),
            port: 7890,
            channel: 0,
            send_twice: false,
            fade_ms: 1000,
            connect_timeout_ms: 50,
            retry_ms: 1000,
        }
    }
}

impl StreamConfig {
    /// `host:port` address string.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn validate(&self) -> BoatResult<()> {
        if self.host.trim().is_empty() {
            return Err(BoatError::config("stream host must not be empty"));
        }
        if self.port < 1024 {
            return Err(BoatError::config("stream port must be in 1024..=65535"));
        }
        Ok(())
    }
}

impl InstallationConfig {
    /// Read a JSON config file; missing fields take their defaults.
    pub fn load(path: &Path) -> BoatResult<Self> {
        let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_reader(BufReader::new(f))
            .map_err(|e| BoatError::serde(format!("parse config '{}': {e}", path.display())))?;
        Ok(cfg)
    }

    pub fn validate(&self) -> BoatResult<()> {
        self.geometry.validate()?;
        self.animation.validate()?;
        self.stream.validate()?;
        Ok(())
    }

    pub fn rate(&self, mode: Mode) -> TickRate {
        self.animation.rates.get(mode)
    }
}
