// Format-agnostic repository of textures. Decoding is the host's job; the
// engine only ever borrows `&Texture` through map cells and sprites.

use std::collections::HashMap;

use crate::renderer::Rgba;

/// Runtime handle for a texture in a [`TextureBank`].
///
/// *Guaranteed* to remain stable for the lifetime of the bank.
pub type TextureId = u16;

/// `TextureId` whose pixels are the checkerboard fallback.
/// Always = 0 because `TextureBank::new()` inserts it first.
pub const NO_TEXTURE: TextureId = 0;

/// Fully transparent pixel; skipped by every canvas.
pub const TRANSPARENT: Rgba = 0x00_000000;

/// CPU-side storage: 32-bit **ARGB** (0xAARRGGBB) in row-major order.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    pub name: String,
    pub w: usize,
    pub h: usize,
    pub pixels: Vec<Rgba>,
}

/// Convenience checkerboard 8×8 (dark/light grey).
impl Default for Texture {
    fn default() -> Self {
        Texture::checker("CHECKER", 8, 8, 0xFF_A0A0A0, 0xFF_505050)
    }
}

impl Texture {
    /// Single-colour texture.
    pub fn solid<S: Into<String>>(name: S, w: usize, h: usize, colour: Rgba) -> Self {
        Self {
            name: name.into(),
            w,
            h,
            pixels: vec![colour; w * h],
        }
    }

    /// One-texel checkerboard alternating `a` / `b`.
    pub fn checker<S: Into<String>>(name: S, w: usize, h: usize, a: Rgba, b: Rgba) -> Self {
        let mut pixels = Vec::with_capacity(w * h);
        for y in 0..h {
            for x in 0..w {
                pixels.push(if (x ^ y) & 1 == 0 { a } else { b });
            }
        }
        Self {
            name: name.into(),
            w,
            h,
            pixels,
        }
    }

    /// Running-bond brick pattern: `brick` rows separated by `mortar` lines.
    pub fn bricks<S: Into<String>>(name: S, w: usize, h: usize, brick: Rgba, mortar: Rgba) -> Self {
        let course = (h / 4).max(2);
        let run = (w / 2).max(2);
        let mut pixels = Vec::with_capacity(w * h);
        for y in 0..h {
            let row = y / course;
            let shift = if row % 2 == 0 { 0 } else { run / 2 };
            for x in 0..w {
                let joint = y % course == 0 || (x + shift) % run == 0;
                pixels.push(if joint { mortar } else { brick });
            }
        }
        Self {
            name: name.into(),
            w,
            h,
            pixels,
        }
    }

    /// Texel at `(x, y)`; callers keep coordinates in range.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Rgba {
        self.pixels[y * self.w + x]
    }

    /// `true` if the texel has any alpha.
    #[inline]
    pub fn opaque(px: Rgba) -> bool {
        px >> 24 != 0
    }
}

/// Things that can go wrong when using the bank.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextureError {
    /// Attempted to insert a second texture with an existing name.
    #[error("texture name `{0}` already present in bank")]
    Duplicate(String),

    /// Requested ID is outside `0 .. bank.len()`.
    #[error("texture id {0} out of range")]
    BadId(TextureId),
}

/// A format-agnostic cache of textures.
///
/// * Stores exactly one copy of every name.
/// * ID **0** is always the “missing” checkerboard.
///
/// Map providers hand out `&Texture` borrowed from here, so the bank must
/// outlive every frame that references it.
pub struct TextureBank {
    by_name: HashMap<String, TextureId>,
    data: Vec<Texture>,
}

impl TextureBank {
    /// Create an empty bank with a mandatory *missing* texture used as
    /// fallback. It is registered under `"MISSING"` with handle **0**.
    pub fn new(missing_tex: Texture) -> Self {
        let mut by_name = HashMap::new();
        by_name.insert("MISSING".into(), NO_TEXTURE);
        Self {
            by_name,
            data: vec![missing_tex],
        }
    }

    pub fn default_with_checker() -> Self {
        Self::new(Texture::default())
    }

    /// Number of textures stored (including the “missing” one).
    #[allow(clippy::len_without_is_empty)] // never empty: id 0 always exists
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Obtain the id for a loaded texture by name.
    pub fn id(&self, name: &str) -> Option<TextureId> {
        self.by_name.get(name).copied()
    }

    /// Fallback-safe query: unknown names resolve to the checkerboard id.
    pub fn id_or_missing(&self, name: &str) -> TextureId {
        self.id(name).unwrap_or(NO_TEXTURE)
    }

    /// Borrow a texture by id, with bounds-checking.
    pub fn texture(&self, id: TextureId) -> Result<&Texture, TextureError> {
        self.data.get(id as usize).ok_or(TextureError::BadId(id))
    }

    /// Insert a texture under `name`.
    ///
    /// * Returns the newly assigned `TextureId`.
    /// * Fails if the name already exists (`Duplicate`).
    pub fn insert<S: Into<String>>(
        &mut self,
        name: S,
        tex: Texture,
    ) -> Result<TextureId, TextureError> {
        let name = name.into();
        if self.by_name.contains_key(&name) {
            return Err(TextureError::Duplicate(name));
        }
        let id = self.data.len() as TextureId;
        self.data.push(tex);
        self.by_name.insert(name, id);
        Ok(id)
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    fn dummy_tex(color: Rgba) -> Texture {
        Texture::solid("Dummy", 2, 2, color)
    }

    #[test]
    fn insert_and_lookup() {
        let mut bank = TextureBank::default_with_checker();
        let red = bank.insert("RED", dummy_tex(0xFF_FF0000)).unwrap();
        let blue = bank.insert("BLUE", dummy_tex(0xFF_0000FF)).unwrap();

        assert_ne!(red, NO_TEXTURE);
        assert_ne!(blue, red);
        assert_eq!(bank.id("RED"), Some(red));
        assert_eq!(bank.id_or_missing("NOPE"), NO_TEXTURE);

        assert_eq!(bank.texture(red).unwrap().pixel(1, 1), 0xFF_FF0000);
        assert_eq!(bank.texture(blue).unwrap().pixel(0, 0), 0xFF_0000FF);
    }

    #[test]
    fn duplicate_name_rejected() {
        let mut bank = TextureBank::default_with_checker();
        bank.insert("WOOD", dummy_tex(1)).unwrap();
        let err = bank.insert("WOOD", dummy_tex(2)).unwrap_err();
        assert_eq!(err, TextureError::Duplicate("WOOD".into()));
        assert_eq!(bank.len(), 2);
    }

    #[test]
    fn bad_id_guard() {
        let bank = TextureBank::default_with_checker();
        let bad = TextureId::MAX;
        assert_eq!(bank.texture(bad).unwrap_err(), TextureError::BadId(bad));
    }

    #[test]
    fn bricks_have_mortar_joints() {
        let t = Texture::bricks("B", 16, 16, 0xFF_AA3322, 0xFF_CCCCCC);
        assert_eq!(t.pixels.len(), 256);
        assert_eq!(t.pixel(3, 0), 0xFF_CCCCCC); // top joint
        assert_eq!(t.pixel(3, 2), 0xFF_AA3322);
        assert!(Texture::opaque(t.pixel(5, 5)));
        assert!(!Texture::opaque(TRANSPARENT));
    }
}
