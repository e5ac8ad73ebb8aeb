//! Nickname collision resolution.
//!
//! Resolution only reads the identity store; nothing is reserved. Two callers
//! racing on the same base can both be handed the same nickname, and the
//! second `create` then fails with a nickname constraint violation.

use crate::{Error, Result, identity::NICKNAME_MAX, store::IdentityStore};

/// Return `candidate` if no identity holds it, otherwise the first free name
/// of `candidate2`, `candidate3`, … in that order. When a suffix would push
/// the name past [`NICKNAME_MAX`], the candidate is cut to make room for it.
pub async fn make_unique_nickname<I>(store: &I, candidate: &str) -> Result<String>
where
  I: IdentityStore,
{
  let mut nickname = candidate.to_owned();
  let mut suffix: u64 = 1;
  loop {
    let taken = store
      .find_by_nickname(&nickname)
      .await
      .map_err(Error::from_store)?
      .is_some();
    if !taken {
      return Ok(nickname);
    }
    suffix += 1;
    nickname = with_suffix(candidate, suffix);
  }
}

fn with_suffix(candidate: &str, suffix: u64) -> String {
  let suffix = suffix.to_string();
  let room = NICKNAME_MAX.saturating_sub(suffix.len());
  let head: String = candidate.chars().take(room).collect();
  head + &suffix
}

/// Derive a registration nickname from a login assertion: the asserted
/// nickname when it has content, otherwise the local part of the email.
/// The result is cut short enough to leave room for a numeric suffix.
pub fn base_nickname(asserted: Option<&str>, email: &str) -> String {
  let raw = asserted
    .map(str::trim)
    .filter(|n| !n.is_empty())
    .unwrap_or_else(|| email.split('@').next().unwrap_or(email).trim());
  let raw = if raw.is_empty() { "user" } else { raw };
  raw
    .chars()
    .take(NICKNAME_MAX - 6)
    .map(|c| if is_reserved(c) { '_' } else { c })
    .collect()
}

/// Characters that would stop a nickname from addressing its own profile
/// URL.
pub fn is_reserved(c: char) -> bool { matches!(c, '/' | '?' | '#') }

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn base_prefers_asserted_nickname() {
    assert_eq!(base_nickname(Some("Bob"), "robert@example.com"), "Bob");
  }

  #[test]
  fn base_falls_back_to_email_local_part() {
    assert_eq!(base_nickname(None, "robert@example.com"), "robert");
    assert_eq!(base_nickname(Some("  "), "robert@example.com"), "robert");
  }

  #[test]
  fn base_never_empty() {
    assert_eq!(base_nickname(None, "@example.com"), "user");
  }

  #[test]
  fn base_replaces_reserved_characters() {
    assert_eq!(base_nickname(None, "a/b?c#d@example.com"), "a_b_c_d");
  }

  #[test]
  fn suffix_fits_within_max() {
    let full = "n".repeat(NICKNAME_MAX);
    let next = with_suffix(&full, 2);
    assert_eq!(next.chars().count(), NICKNAME_MAX);
    assert!(next.ends_with("n2"));
    assert_eq!(with_suffix(&full, 10).chars().count(), NICKNAME_MAX);
    assert_eq!(with_suffix("bob", 4), "bob4");
  }

  #[test]
  fn base_leaves_room_for_suffix() {
    let long = "x".repeat(200);
    assert_eq!(base_nickname(Some(&long), "a@b.c").chars().count(), NICKNAME_MAX - 6);
  }
}
