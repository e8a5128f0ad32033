//! Random test-data helpers.
//!
//! These all draw from the thread-local RNG; fixture generation is
//! deliberately non-deterministic except for the reference instant, which
//! the factories let callers pin.

use rand::seq::SliceRandom;
use rand::Rng;

pub const MILLIS_PER_DAY: i64 = 86_400_000;

/// Technical jargon used for generated names and plugin ids.
const WORDS: &[&str] = &[
    "alarm",
    "array",
    "bandwidth",
    "bus",
    "capacitor",
    "card",
    "circuit",
    "driver",
    "feed",
    "firewall",
    "interface",
    "matrix",
    "microchip",
    "monitor",
    "panel",
    "pixel",
    "port",
    "program",
    "protocol",
    "sensor",
    "system",
    "transmitter",
];

const PATH_ROOTS: &[&str] = &[
    "/dev/disk",
    "/etc/volumes",
    "/mnt",
    "/opt/data",
    "/srv",
    "/usr/lib",
    "/var/lib",
];

const PATH_EXTENSIONS: &[&str] = &["bak", "bin", "dat", "img", "raw"];

/// Generate a random single word from the technical word list.
pub fn random_word() -> String {
    WORDS[rand::thread_rng().gen_range(0..WORDS.len())].to_string()
}

/// Generate a plausible absolute filesystem path.
///
/// # Examples
///
/// ```
/// let path = hostmock::utils::random_file_path();
/// assert!(path.starts_with('/'));
/// ```
pub fn random_file_path() -> String {
    let mut rng = rand::thread_rng();
    let root = PATH_ROOTS[rng.gen_range(0..PATH_ROOTS.len())];
    let ext = PATH_EXTENSIONS[rng.gen_range(0..PATH_EXTENSIONS.len())];
    format!("{}/{}.{}", root, random_word(), ext)
}

/// Generate a random v4 UUID string.
pub fn random_uuid() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Pick a uniformly random instant, in milliseconds since the epoch, from
/// the `window_millis`-wide interval ending at `reference_millis`.
pub fn past_millis(window_millis: i64, reference_millis: i64) -> i64 {
    rand::thread_rng().gen_range(reference_millis - window_millis..=reference_millis)
}

/// Pick a uniformly random element, or `None` if the slice is empty.
pub fn pick_one<T>(items: &[T]) -> Option<&T> {
    items.choose(&mut rand::thread_rng())
}
