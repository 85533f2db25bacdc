//! Bundled 32×32 avatar shown next to the player name.

/// Edge length of the avatar in pixels.
pub const AVATAR_SIZE: u32 = 32;

static AVATAR_PNG: &[u8] = include_bytes!("../assets/avatar.png");

/// PNG bytes of the avatar.
pub fn avatar() -> &'static [u8] {
    AVATAR_PNG
}
