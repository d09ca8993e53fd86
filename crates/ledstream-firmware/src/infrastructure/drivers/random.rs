use esp_hal::rng::Rng;

/// Seed for the network stack's TCP sequence numbers
pub(crate) fn get_seed() -> u64 {
    let rng = Rng::new();
    u64::from(rng.random()) << 32 | u64::from(rng.random())
}
