/// Record locators and ticket numbers.
use rand::Rng;

/// Locator alphabet: no `I`, `O`, `0` or `1`, so locators read back unambiguously.
const LOCATOR_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
const LOCATOR_LEN: usize = 6;
const TICKET_SERIAL_DIGITS: usize = 10;

/// A fresh six-character record locator.
pub fn generate_locator() -> String {
    let mut rng = rand::thread_rng();
    (0..LOCATOR_LEN)
        .map(|_| LOCATOR_ALPHABET[rng.gen_range(0..LOCATOR_ALPHABET.len())] as char)
        .collect()
}

/// `176-0123456789`: airline prefix plus a ten-digit serial.
pub fn generate_ticket_number(prefix: &str) -> String {
    let mut rng = rand::thread_rng();
    let serial: String = (0..TICKET_SERIAL_DIGITS)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect();
    format!("{prefix}-{serial}")
}
