//! Profile image URLs derived from an identity's email.

/// Derives an external avatar URL. Implementations must be pure: the same
/// email and size always yield the same URL.
pub trait AvatarResolver: Send + Sync {
  fn avatar_url(&self, email: &str, size: u32) -> String;
}

/// Gravatar: MD5 of the trimmed, lower-cased email, with the "mystery man"
/// fallback image.
#[derive(Debug, Clone, Copy, Default)]
pub struct Gravatar;

impl AvatarResolver for Gravatar {
  fn avatar_url(&self, email: &str, size: u32) -> String {
    let normalized = email.trim().to_lowercase();
    let hash = md5::compute(normalized.as_bytes());
    format!("http://www.gravatar.com/avatar/{hash:x}?d=mm&s={size}")
  }
}
