use std::time::{SystemTime, UNIX_EPOCH};
use xxhash_rust::xxh3::xxh3_64;

/// Milliseconds since the Unix epoch; 0 if the clock is before it.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

pub fn hex_hash(parts: &[&str]) -> String {
    let joined = parts.join("\u{0}");
    format!("{:016x}", xxh3_64(joined.as_bytes()))
}

pub const HOSTNAME_OVERRIDES: [&str; 2] = ["HOSTNAME", "COMPUTERNAME"];

/// Host name from the operating system; `HOSTNAME`/`COMPUTERNAME` override it.
pub fn hostname() -> Option<String> {
    hostname_with(|key| std::env::var(key).ok())
}

fn hostname_with(lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    HOSTNAME_OVERRIDES
        .iter()
        .find_map(|key| non_blank(lookup(key)))
        .or_else(|| non_blank(sysinfo::System::host_name()))
}

fn non_blank(name: Option<String>) -> Option<String> {
    name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())
}
