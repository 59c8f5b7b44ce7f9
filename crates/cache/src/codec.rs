//! Value encodings stored under the cache keys.

use radar_core::UserStats;

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("Malformed stats value: {0:?}")]
    MalformedStats(String),
}

/// Stats are stored as `"<max>|<avg>"` with two decimals.
pub fn encode_stats(stats: UserStats) -> String {
    format!("{:.2}|{:.2}", stats.max_amount, stats.avg_amount)
}

pub fn decode_stats(raw: &str) -> Result<UserStats, CodecError> {
    let malformed = || CodecError::MalformedStats(raw.to_string());
    let (max, avg) = raw.split_once('|').ok_or_else(malformed)?;
    let max_amount = max.trim().parse::<f64>().map_err(|_| malformed())?;
    let avg_amount = avg.trim().parse::<f64>().map_err(|_| malformed())?;
    Ok(UserStats {
        max_amount,
        avg_amount,
    })
}
