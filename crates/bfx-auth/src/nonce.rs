//! Nonce generation
//!
//! Bitfinex rejects any signed request whose nonce is not greater than the
//! last one it saw for the key, so nonces are strictly increasing within
//! the process.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Last nonce handed out
static LAST_NONCE: AtomicU64 = AtomicU64::new(0);

fn now_micros() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_micros() as u64)
        .unwrap_or(0)
}

/// Generate a nonce from the current time in microseconds
///
/// Two calls never return the same value: if the clock has not advanced
/// (or went backwards) the previous nonce plus one is used instead.
pub fn generate_nonce() -> String {
    let now = now_micros();
    let previous = LAST_NONCE
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
            Some(now.max(last + 1))
        })
        .unwrap_or_else(|last| last);

    now.max(previous + 1).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nonce_generation() {
        let nonce1 = generate_nonce();
        let nonce2 = generate_nonce();
        assert_ne!(nonce1, nonce2);
    }

    #[test]
    fn test_nonce_is_numeric() {
        let nonce = generate_nonce();
        assert!(nonce.chars().all(|c| c.is_ascii_digit()));
        // microseconds since epoch
        assert!(nonce.len() >= 16);
    }

    #[test]
    fn test_nonce_strictly_increasing() {
        let mut last = 0u64;
        for _ in 0..10_000 {
            let nonce: u64 = generate_nonce().parse().unwrap();
            assert!(nonce > last);
            last = nonce;
        }
    }

    #[test]
    fn test_nonce_unique_across_threads() {
        let handles: Vec<_> = (0..4)
            .map(|_| std::thread::spawn(|| (0..1000).map(|_| generate_nonce()).collect::<Vec<_>>()))
            .collect();

        let mut all: Vec<String> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        let total = all.len();
        all.sort();
        all.dedup();
        assert_eq!(all.len(), total);
    }
}
