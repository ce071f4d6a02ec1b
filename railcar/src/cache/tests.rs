//! Validates key parsing, token revocation, and option defaults.
use rstest::rstest;

use super::store::{EntryOptions, EntryPriority};
use super::{CacheKey, DEFAULT_TTL, GenerationToken, InvalidCacheKey};

#[rstest]
#[case("")]
#[case("   ")]
#[case("\t\n")]
fn keys_without_visible_characters_are_invalid(#[case] value: &str) {
    assert_eq!(CacheKey::new(value), Err(InvalidCacheKey::Empty));
}

#[rstest]
#[case(" oauth:token")]
#[case("oauth:token ")]
#[case("\toauth:token\n")]
fn padded_keys_are_invalid(#[case] value: &str) {
    assert_eq!(
        CacheKey::new(value),
        Err(InvalidCacheKey::SurroundingWhitespace)
    );
}

#[rstest]
fn a_valid_key_keeps_its_text_everywhere_it_is_shown() {
    let key = CacheKey::new("oauth:token").expect("key accepted");
    assert_eq!(key.as_str(), "oauth:token");
    assert_eq!(key.to_string(), "oauth:token");
    let borrowed: &str = key.as_ref();
    assert_eq!(borrowed, "oauth:token");
}

#[rstest]
fn fresh_tokens_are_unrevoked() {
    assert!(!GenerationToken::new().is_revoked());
}

#[rstest]
fn revocation_is_shared_across_clones() {
    let token = GenerationToken::new();
    let clone = token.clone();
    token.revoke();
    assert!(clone.is_revoked());
}

#[rstest]
fn revocation_is_idempotent() {
    let token = GenerationToken::new();
    token.revoke();
    token.revoke();
    assert!(token.is_revoked());
}

#[rstest]
fn independent_tokens_do_not_share_state() {
    let revoked = GenerationToken::new();
    let live = GenerationToken::new();
    revoked.revoke();
    assert!(!live.is_revoked());
}

#[rstest]
fn entry_options_default_to_normal_priority() {
    let options = EntryOptions::new(DEFAULT_TTL, GenerationToken::new());
    assert_eq!(options.priority(), EntryPriority::Normal);
    assert_eq!(options.ttl(), DEFAULT_TTL);

    let options = options.with_priority(EntryPriority::High);
    assert_eq!(options.priority(), EntryPriority::High);
}
