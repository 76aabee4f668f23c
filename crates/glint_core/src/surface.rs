//! Surface (material) coefficients for Whitted-style shading.
//!
//! A surface carries the classic ambient/diffuse/specular triple, a Phong
//! exponent, and reflection/transmission coefficients whose usage flag is
//! decided once at assignment time.

use glint_math::{Color, THRESHOLD};

/// Number of texture slots a surface can reference.
pub const TEXTURE_SLOTS: usize = 8;

/// A shading coefficient together with its "worth evaluating" flag.
///
/// The flag is true when any channel exceeds [`THRESHOLD`]; it is the
/// early-exit gate for recursive reflection tracing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coef {
    k: Color,
    in_use: bool,
}

impl Coef {
    /// Coefficient with nothing in it.
    pub const ZERO: Coef = Coef {
        k: Color::ZERO,
        in_use: false,
    };

    /// Create a coefficient from a color value.
    pub fn new(k: Color) -> Self {
        Self {
            k,
            in_use: k.x > THRESHOLD || k.y > THRESHOLD || k.z > THRESHOLD,
        }
    }

    /// Create a gray coefficient.
    pub fn splat(value: f64) -> Self {
        Self::new(Color::splat(value))
    }

    /// Replace the value and recompute the usage flag.
    pub fn set(&mut self, k: Color) {
        *self = Self::new(k);
    }

    /// Coefficient value.
    #[inline]
    pub fn k(&self) -> Color {
        self.k
    }

    /// Whether the coefficient is large enough to matter.
    #[inline]
    pub fn in_use(&self) -> bool {
        self.in_use
    }

    /// Largest channel.
    pub fn max_component(&self) -> f64 {
        self.k.max_element()
    }
}

impl Default for Coef {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<Color> for Coef {
    fn from(k: Color) -> Self {
        Self::new(k)
    }
}

/// Material coefficients of a shape.
#[derive(Clone, Debug, PartialEq)]
pub struct Surface {
    /// Ambient
    pub ka: Color,
    /// Diffuse
    pub kd: Color,
    /// Specular
    pub ks: Color,
    /// Phong exponent
    pub ph: f64,
    /// Reflected
    pub kr: Coef,
    /// Transmitted
    pub kt: Coef,
    /// Texture registry indices, `None` for an empty slot
    pub textures: [Option<usize>; TEXTURE_SLOTS],
}

/// Reflectivity of surfaces built from explicit coefficients.
const EXPLICIT_KR: f64 = 0.5;

/// Reflectivity of surfaces taken from the library.
const LIBRARY_KR: f64 = 0.1;

impl Surface {
    /// Create a surface from explicit coefficients.
    pub fn new(ka: Color, kd: Color, ks: Color, ph: f64) -> Self {
        Self {
            ka,
            kd,
            ks,
            ph,
            kr: Coef::splat(EXPLICIT_KR),
            kt: Coef::ZERO,
            textures: [None; TEXTURE_SLOTS],
        }
    }

    /// Look up a surface in the built-in library.
    pub fn from_library(name: &str) -> Option<Self> {
        SURFACE_LIBRARY
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.surface())
    }

    /// Look up a surface by name, falling back to the library default.
    pub fn named(name: &str) -> Self {
        Self::from_library(name).unwrap_or_else(|| {
            log::warn!("Unknown surface '{}', using default", name);
            DEFAULT_LIBRARY_ENTRY.surface()
        })
    }

    /// Gold, the default surface of every shape.
    pub fn gold() -> Self {
        let gold = &SURFACE_LIBRARY[GOLD_INDEX];
        Self::new(gold.ka.into(), gold.kd.into(), gold.ks.into(), gold.ph)
    }

    /// Set the reflection coefficient.
    pub fn with_reflection(mut self, kr: Color) -> Self {
        self.kr.set(kr);
        self
    }

    /// Set the transmission coefficient.
    pub fn with_transmission(mut self, kt: Color) -> Self {
        self.kt.set(kt);
        self
    }

    /// Bind a texture to a slot. Slots past the last one are ignored.
    pub fn with_texture(mut self, slot: usize, texture: usize) -> Self {
        if let Some(s) = self.textures.get_mut(slot) {
            *s = Some(texture);
        }
        self
    }

    /// Texture bound to a slot.
    pub fn texture(&self, slot: usize) -> Option<usize> {
        self.textures.get(slot).copied().flatten()
    }
}

impl Default for Surface {
    fn default() -> Self {
        Self::gold()
    }
}

/// One named entry of the surface library.
#[derive(Clone, Copy, Debug)]
pub struct LibraryEntry {
    pub name: &'static str,
    pub ka: [f64; 3],
    pub kd: [f64; 3],
    pub ks: [f64; 3],
    pub ph: f64,
}

impl LibraryEntry {
    /// Build the surface for this entry.
    pub fn surface(&self) -> Surface {
        let mut surface = Surface::new(self.ka.into(), self.kd.into(), self.ks.into(), self.ph);
        surface.kr = Coef::splat(LIBRARY_KR);
        surface
    }
}

const fn entry(name: &'static str, ka: [f64; 3], kd: [f64; 3], ks: [f64; 3], ph: f64) -> LibraryEntry {
    LibraryEntry { name, ka, kd, ks, ph }
}

const GOLD_INDEX: usize = 5;

const DEFAULT_LIBRARY_ENTRY: LibraryEntry = entry(
    "Obsidian",
    [0.05375, 0.05, 0.06625],
    [0.18275, 0.17, 0.22525],
    [0.332741, 0.328634, 0.346435],
    38.4,
);

/// Classic OpenGL material table.
pub const SURFACE_LIBRARY: &[LibraryEntry] = &[
    entry("Black Plastic", [0.0, 0.0, 0.0], [0.01, 0.01, 0.01], [0.5, 0.5, 0.5], 32.0),
    entry("Brass", [0.329412, 0.223529, 0.027451], [0.780392, 0.568627, 0.113725], [0.992157, 0.941176, 0.807843], 27.8974),
    entry("Bronze", [0.2125, 0.1275, 0.054], [0.714, 0.4284, 0.18144], [0.393548, 0.271906, 0.166721], 25.6),
    entry("Chrome", [0.25, 0.25, 0.25], [0.4, 0.4, 0.4], [0.774597, 0.774597, 0.774597], 76.8),
    entry("Copper", [0.19125, 0.0735, 0.0225], [0.7038, 0.27048, 0.0828], [0.256777, 0.137622, 0.086014], 12.8),
    entry("Gold", [0.24725, 0.1995, 0.0745], [0.75164, 0.60648, 0.22648], [0.628281, 0.555802, 0.366065], 51.2),
    entry("Peweter", [0.10588, 0.058824, 0.113725], [0.427451, 0.470588, 0.541176], [0.3333, 0.3333, 0.521569], 9.84615),
    entry("Silver", [0.19225, 0.19225, 0.19225], [0.50754, 0.50754, 0.50754], [0.508273, 0.508273, 0.508273], 51.2),
    entry("Polished Silver", [0.23125, 0.23125, 0.23125], [0.2775, 0.2775, 0.2775], [0.773911, 0.773911, 0.773911], 89.6),
    entry("Turquoise", [0.1, 0.18725, 0.1745], [0.396, 0.74151, 0.69102], [0.297254, 0.30829, 0.306678], 12.8),
    entry("Ruby", [0.1745, 0.01175, 0.01175], [0.61424, 0.04136, 0.04136], [0.727811, 0.626959, 0.626959], 76.8),
    entry("Polished Gold", [0.24725, 0.2245, 0.0645], [0.34615, 0.3143, 0.0903], [0.797357, 0.723991, 0.208006], 83.2),
    entry("Polished Bronze", [0.25, 0.148, 0.06475], [0.4, 0.2368, 0.1036], [0.774597, 0.458561, 0.200621], 76.8),
    entry("Polished Copper", [0.2295, 0.08825, 0.0275], [0.5508, 0.2118, 0.066], [0.580594, 0.223257, 0.0695701], 51.2),
    entry("Jade", [0.135, 0.2225, 0.1575], [0.135, 0.2225, 0.1575], [0.316228, 0.316228, 0.316228], 12.8),
    DEFAULT_LIBRARY_ENTRY,
    entry("Pearl", [0.25, 0.20725, 0.20725], [1.0, 0.829, 0.829], [0.296648, 0.296648, 0.296648], 11.264),
    entry("Emerald", [0.0215, 0.1745, 0.0215], [0.07568, 0.61424, 0.07568], [0.633, 0.727811, 0.633], 76.8),
    entry("Black Rubber", [0.02, 0.02, 0.02], [0.01, 0.01, 0.01], [0.4, 0.4, 0.4], 10.0),
];
