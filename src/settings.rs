//! Typed per-effect parameter records and the active effect chain.
//!
//! Every effect kind carries its own strongly typed settings struct; the only
//! mutation entry point is [`EffectSettings::set_parameter`], which
//! pattern-matches on `(effect, key)` instead of dynamic property indexing.
//! Declared ranges from the control surface are available through
//! [`declared_range`]; the setter itself does not clamp (out-of-range values
//! are the caller's responsibility, only pixel output is clamped).

use crate::foundation::error::{RetroError, RetroResult};

/// Closed set of effect tags.
///
/// `sepia` and `grayscale` are the legacy single-transform effects kept for
/// compatibility with older control surfaces; `film` supersedes them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EffectKind {
    FilmGrain,
    Dithering,
    Ascii,
    Pixelate,
    Crt,
    Vintage,
    Invert,
    Film,
    LightLeak,
    Frame,
    Sepia,
    Grayscale,
}

/// Dithering algorithm selector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DitherMethod {
    #[default]
    FloydSteinberg,
    Atkinson,
    Bayer,
    Ordered,
    Random,
}

impl DitherMethod {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "floyd-steinberg" => Some(Self::FloydSteinberg),
            "atkinson" => Some(Self::Atkinson),
            "bayer" => Some(Self::Bayer),
            "ordered" => Some(Self::Ordered),
            "random" => Some(Self::Random),
            _ => None,
        }
    }
}

/// Film stock emulation selector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilmStock {
    TMax,
    #[default]
    Portra,
    Ektar,
    Provia,
    TriX,
    Hp5,
}

impl FilmStock {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "tmax" => Some(Self::TMax),
            "portra" => Some(Self::Portra),
            "ektar" => Some(Self::Ektar),
            "provia" => Some(Self::Provia),
            "trix" => Some(Self::TriX),
            "hp5" => Some(Self::Hp5),
            _ => None,
        }
    }
}

/// Light leak gradient color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeakColor {
    #[default]
    Orange,
    Purple,
    Blue,
    Green,
    Pink,
}

impl LeakColor {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "orange" => Some(Self::Orange),
            "purple" => Some(Self::Purple),
            "blue" => Some(Self::Blue),
            "green" => Some(Self::Green),
            "pink" => Some(Self::Pink),
            _ => None,
        }
    }
}

/// Light leak gradient center position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LeakPosition {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    #[default]
    Center,
}

impl LeakPosition {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "top-left" => Some(Self::TopLeft),
            "top-right" => Some(Self::TopRight),
            "bottom-left" => Some(Self::BottomLeft),
            "bottom-right" => Some(Self::BottomRight),
            "center" => Some(Self::Center),
            _ => None,
        }
    }
}

/// Background the ASCII painter clears to before drawing glyphs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AsciiBackground {
    #[default]
    Black,
    White,
}

impl AsciiBackground {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "black" => Some(Self::Black),
            "white" => Some(Self::White),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilmGrainSettings {
    pub intensity: f32,
    pub grain_size: u32,
}

impl Default for FilmGrainSettings {
    fn default() -> Self {
        Self {
            intensity: 0.15,
            grain_size: 1,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DitherSettings {
    pub method: DitherMethod,
    /// Quantization levels per channel when no palette is active. Must be >= 2.
    pub colors: u32,
    /// Cell size in pixels; all pixels of a cell share one output color.
    pub scale: u32,
    /// Palette name, or "none" for per-channel quantization. Unknown names
    /// degrade to quantization.
    pub palette: String,
}

impl Default for DitherSettings {
    fn default() -> Self {
        Self {
            method: DitherMethod::FloydSteinberg,
            colors: 8,
            scale: 4,
            palette: "gameboy".to_string(),
        }
    }
}

/// Character ramp presets offered by the control surface, densest glyph
/// first. Any other ramp string is accepted as well.
pub const ASCII_CHARSETS: &[(&str, &str)] = &[
    ("classic", "@%#*+=-:. "),
    ("blocks", "\u{2588}\u{2593}\u{2592}\u{2591} "),
    ("alphanumeric", "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789"),
    ("shades", "\u{2588}\u{2589}\u{258a}\u{258b}\u{258c}\u{258d}\u{258e}\u{258f} "),
    ("geometric", "\u{25a0}\u{25a1}\u{25aa}\u{25ab} "),
];

/// Border color presets offered by the control surface; any RGB value is
/// accepted through the hex `color` parameter.
pub const FRAME_COLORS: &[(&str, [u8; 3])] = &[
    ("white", [0xff, 0xff, 0xff]),
    ("black", [0x00, 0x00, 0x00]),
    ("brown", [0x8b, 0x45, 0x13]),
    ("gold", [0xda, 0xa5, 0x20]),
    ("silver", [0xc0, 0xc0, 0xc0]),
    ("red", [0xff, 0x6b, 0x6b]),
    ("teal", [0x4e, 0xcd, 0xc4]),
];

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AsciiSettings {
    pub font_size: u32,
    /// Character ramp ordered dense to sparse.
    pub characters: String,
    pub invert: bool,
    pub background: AsciiBackground,
}

impl Default for AsciiSettings {
    fn default() -> Self {
        Self {
            font_size: 32,
            characters: "@%#*+=-:. ".to_string(),
            invert: false,
            background: AsciiBackground::Black,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PixelateSettings {
    pub pixel_size: u32,
}

impl Default for PixelateSettings {
    fn default() -> Self {
        Self { pixel_size: 10 }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CrtSettings {
    pub scanline_intensity: f32,
    pub curvature: f32,
}

impl Default for CrtSettings {
    fn default() -> Self {
        Self {
            scanline_intensity: 0.3,
            curvature: 0.1,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VintageSettings {
    pub vignette: f32,
    /// Probability per frame of drawing one random scratch line.
    pub scratch: f32,
}

impl Default for VintageSettings {
    fn default() -> Self {
        Self {
            vignette: 0.5,
            scratch: 0.3,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InvertSettings {
    pub intensity: f32,
}

impl Default for InvertSettings {
    fn default() -> Self {
        Self { intensity: 1.0 }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilmSettings {
    pub mode: FilmStock,
    pub intensity: f32,
}

impl Default for FilmSettings {
    fn default() -> Self {
        Self {
            mode: FilmStock::Portra,
            intensity: 1.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LightLeakSettings {
    pub intensity: f32,
    pub color: LeakColor,
    pub position: LeakPosition,
}

impl Default for LightLeakSettings {
    fn default() -> Self {
        Self {
            intensity: 0.5,
            color: LeakColor::Orange,
            position: LeakPosition::Center,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FrameSettings {
    pub thickness: u32,
    pub color: [u8; 3],
}

impl Default for FrameSettings {
    fn default() -> Self {
        Self {
            thickness: 10,
            color: [255, 255, 255],
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SepiaSettings {
    pub intensity: f32,
}

impl Default for SepiaSettings {
    fn default() -> Self {
        Self { intensity: 1.0 }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GrayscaleSettings {
    pub intensity: f32,
}

impl Default for GrayscaleSettings {
    fn default() -> Self {
        Self { intensity: 1.0 }
    }
}

/// One parameter record per effect kind.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EffectSettings {
    pub film_grain: FilmGrainSettings,
    pub dithering: DitherSettings,
    pub ascii: AsciiSettings,
    pub pixelate: PixelateSettings,
    pub crt: CrtSettings,
    pub vintage: VintageSettings,
    pub invert: InvertSettings,
    pub film: FilmSettings,
    pub light_leak: LightLeakSettings,
    pub frame: FrameSettings,
    pub sepia: SepiaSettings,
    pub grayscale: GrayscaleSettings,
}

/// A value accepted by [`EffectSettings::set_parameter`].
#[derive(Clone, Debug, PartialEq)]
pub enum ParamValue {
    Number(f64),
    Text(String),
    Flag(bool),
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        Self::Flag(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl ParamValue {
    fn as_number(&self, key: &str) -> RetroResult<f64> {
        match self {
            ParamValue::Number(v) => Ok(*v),
            _ => Err(RetroError::validation(format!(
                "parameter '{key}' expects a number"
            ))),
        }
    }

    fn as_text(&self, key: &str) -> RetroResult<&str> {
        match self {
            ParamValue::Text(v) => Ok(v),
            _ => Err(RetroError::validation(format!(
                "parameter '{key}' expects a string"
            ))),
        }
    }

    fn as_flag(&self, key: &str) -> RetroResult<bool> {
        match self {
            ParamValue::Flag(v) => Ok(*v),
            _ => Err(RetroError::validation(format!(
                "parameter '{key}' expects a boolean"
            ))),
        }
    }
}

impl EffectSettings {
    /// Single mutation contract for the control surface.
    ///
    /// Matches on `(effect, key)`; keys use the control surface's camelCase
    /// names. Enumerated fields reject unknown option values, except the
    /// dithering palette, which is resolved (and degraded) at apply time.
    pub fn set_parameter(
        &mut self,
        effect: EffectKind,
        key: &str,
        value: ParamValue,
    ) -> RetroResult<()> {
        match (effect, key) {
            (EffectKind::FilmGrain, "intensity") => {
                self.film_grain.intensity = value.as_number(key)? as f32;
            }
            (EffectKind::FilmGrain, "grainSize") => {
                self.film_grain.grain_size = value.as_number(key)?.round() as u32;
            }
            (EffectKind::Dithering, "method") => {
                let s = value.as_text(key)?;
                self.dithering.method = DitherMethod::parse(s)
                    .ok_or_else(|| RetroError::validation(format!("unknown dither method '{s}'")))?;
            }
            (EffectKind::Dithering, "colors") => {
                self.dithering.colors = value.as_number(key)?.round() as u32;
            }
            (EffectKind::Dithering, "scale") => {
                self.dithering.scale = value.as_number(key)?.round() as u32;
            }
            (EffectKind::Dithering, "palette") => {
                self.dithering.palette = value.as_text(key)?.to_string();
            }
            (EffectKind::Ascii, "fontSize") => {
                self.ascii.font_size = value.as_number(key)?.round() as u32;
            }
            (EffectKind::Ascii, "characters") => {
                let s = value.as_text(key)?;
                if s.is_empty() {
                    return Err(RetroError::validation("ascii character ramp must be non-empty"));
                }
                self.ascii.characters = s.to_string();
            }
            (EffectKind::Ascii, "invert") => {
                self.ascii.invert = value.as_flag(key)?;
            }
            (EffectKind::Ascii, "background") => {
                let s = value.as_text(key)?;
                self.ascii.background = AsciiBackground::parse(s).ok_or_else(|| {
                    RetroError::validation(format!("unknown ascii background '{s}'"))
                })?;
            }
            (EffectKind::Pixelate, "pixelSize") => {
                self.pixelate.pixel_size = value.as_number(key)?.round() as u32;
            }
            (EffectKind::Crt, "scanlineIntensity") => {
                self.crt.scanline_intensity = value.as_number(key)? as f32;
            }
            (EffectKind::Crt, "curvature") => {
                self.crt.curvature = value.as_number(key)? as f32;
            }
            (EffectKind::Vintage, "vignette") => {
                self.vintage.vignette = value.as_number(key)? as f32;
            }
            (EffectKind::Vintage, "scratch") => {
                self.vintage.scratch = value.as_number(key)? as f32;
            }
            (EffectKind::Invert, "intensity") => {
                self.invert.intensity = value.as_number(key)? as f32;
            }
            (EffectKind::Film, "mode") => {
                let s = value.as_text(key)?;
                self.film.mode = FilmStock::parse(s)
                    .ok_or_else(|| RetroError::validation(format!("unknown film stock '{s}'")))?;
            }
            (EffectKind::Film, "intensity") => {
                self.film.intensity = value.as_number(key)? as f32;
            }
            (EffectKind::LightLeak, "intensity") => {
                self.light_leak.intensity = value.as_number(key)? as f32;
            }
            (EffectKind::LightLeak, "color") => {
                let s = value.as_text(key)?;
                self.light_leak.color = LeakColor::parse(s)
                    .ok_or_else(|| RetroError::validation(format!("unknown leak color '{s}'")))?;
            }
            (EffectKind::LightLeak, "position") => {
                let s = value.as_text(key)?;
                self.light_leak.position = LeakPosition::parse(s)
                    .ok_or_else(|| RetroError::validation(format!("unknown leak position '{s}'")))?;
            }
            (EffectKind::Frame, "thickness") => {
                self.frame.thickness = value.as_number(key)?.round() as u32;
            }
            (EffectKind::Frame, "color") => {
                self.frame.color = parse_hex_rgb(value.as_text(key)?)?;
            }
            (EffectKind::Sepia, "intensity") => {
                self.sepia.intensity = value.as_number(key)? as f32;
            }
            (EffectKind::Grayscale, "intensity") => {
                self.grayscale.intensity = value.as_number(key)? as f32;
            }
            _ => {
                return Err(RetroError::validation(format!(
                    "unknown parameter '{key}' for effect {effect:?}"
                )));
            }
        }
        Ok(())
    }
}

/// Declared `[min, max]` range for a numeric parameter, as published by the
/// control surface. `None` for non-numeric or unknown keys.
pub fn declared_range(effect: EffectKind, key: &str) -> Option<(f64, f64)> {
    match (effect, key) {
        (EffectKind::FilmGrain, "intensity") => Some((0.0, 0.5)),
        (EffectKind::FilmGrain, "grainSize") => Some((1.0, 10.0)),
        (EffectKind::Dithering, "colors") => Some((2.0, 16.0)),
        (EffectKind::Dithering, "scale") => Some((4.0, 10.0)),
        (EffectKind::Ascii, "fontSize") => Some((12.0, 128.0)),
        (EffectKind::Pixelate, "pixelSize") => Some((2.0, 30.0)),
        (EffectKind::Crt, "scanlineIntensity") => Some((0.0, 0.8)),
        (EffectKind::Crt, "curvature") => Some((0.0, 0.5)),
        (EffectKind::Vintage, "vignette") => Some((0.0, 1.0)),
        (EffectKind::Vintage, "scratch") => Some((0.0, 1.0)),
        (EffectKind::Invert, "intensity") => Some((0.0, 1.0)),
        (EffectKind::Film, "intensity") => Some((0.0, 1.0)),
        (EffectKind::LightLeak, "intensity") => Some((0.0, 1.0)),
        (EffectKind::Frame, "thickness") => Some((5.0, 50.0)),
        (EffectKind::Sepia, "intensity") => Some((0.0, 1.0)),
        (EffectKind::Grayscale, "intensity") => Some((0.0, 1.0)),
        _ => None,
    }
}

fn parse_hex_rgb(s: &str) -> RetroResult<[u8; 3]> {
    let hex = s.strip_prefix('#').unwrap_or(s);
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(RetroError::validation(format!("invalid hex color '{s}'")));
    }
    let parse = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
    Ok([
        parse(0).map_err(|_| RetroError::validation("invalid hex color"))?,
        parse(2).map_err(|_| RetroError::validation("invalid hex color"))?,
        parse(4).map_err(|_| RetroError::validation("invalid hex color"))?,
    ])
}

/// Order-preserving set of enabled effects.
///
/// Iteration order is insertion order and determines composition order.
/// "none" is not a member; it is the empty state produced by [`Self::clear`].
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EffectChain {
    effects: Vec<EffectKind>,
}

impl EffectChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle membership: a present effect is removed, an absent one is
    /// appended after the existing members. Returns `true` when the effect is
    /// active afterwards.
    pub fn toggle(&mut self, kind: EffectKind) -> bool {
        if let Some(pos) = self.effects.iter().position(|&k| k == kind) {
            self.effects.remove(pos);
            false
        } else {
            self.effects.push(kind);
            true
        }
    }

    /// Selecting "none": empties the set regardless of prior contents.
    pub fn clear(&mut self) {
        self.effects.clear();
    }

    pub fn contains(&self, kind: EffectKind) -> bool {
        self.effects.contains(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = EffectKind> + '_ {
        self.effects.iter().copied()
    }

    pub fn as_slice(&self) -> &[EffectKind] {
        &self.effects
    }
}
