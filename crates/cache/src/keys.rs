//! Key layout in Redis.
//!
//! Id parts are encoded so they never contain the `:` separator; two
//! different (user, location) or (user, merchant) pairs always map to
//! different keys.

/// Counter bucket for one (user, location) pair.
pub fn velocity(user_id: &str, location: &str) -> String {
    format!("velocity:{}:{}", encode_part(user_id), encode_part(location))
}

/// `SCAN MATCH` pattern selecting every velocity bucket of a user.
pub fn velocity_pattern(user_id: &str) -> String {
    format!("velocity:{}:*", escape_glob(&encode_part(user_id)))
}

pub fn user_stats(user_id: &str) -> String {
    format!("user_stats:{}", encode_part(user_id))
}

pub fn risk_verdict(user_id: &str, merchant: &str) -> String {
    format!("ai_risk:{}:{}", encode_part(user_id), encode_part(merchant))
}

/// Percent-encode `%` and `:` so a part cannot spill into the next one.
fn encode_part(raw: &str) -> String {
    let mut encoded = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '%' => encoded.push_str("%25"),
            ':' => encoded.push_str("%3A"),
            c => encoded.push(c),
        }
    }
    encoded
}

/// Escape glob metacharacters so an id is matched literally.
fn escape_glob(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
