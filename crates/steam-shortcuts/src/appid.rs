//! App-id derivation for non-Steam shortcuts.
//!
//! Steam keys a shortcut's grid art by the shortcut's app id, so the id must
//! be stable across runs for the same app: re-adding the same bundle updates
//! its entry instead of duplicating it, and previously written icons keep
//! matching.

use crc32fast::Hasher as Crc32;

/// Ids are kept below 2^31 so that readers unpacking the field as a signed
/// 32-bit integer never see it overflow. Historically, unclamped values
/// corrupted the shortcuts file on write.
const APP_ID_MASK: u32 = 0x7FFF_FFFF;

/// Derive a stable app id from an absolute bundle path.
///
/// The input is the unquoted path string exactly as stored in the entry's
/// `exe` field (minus the quotes). The result is always in `[0, 2^31 - 1]`,
/// so encoding can never fail on integer range.
pub fn shortcut_app_id(bundle_path: &str) -> u32 {
    let mut hasher = Crc32::new();
    hasher.update(bundle_path.as_bytes());
    hasher.finalize() & APP_ID_MASK
}
