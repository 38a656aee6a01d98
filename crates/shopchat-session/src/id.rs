use rand::Rng;

/// Source of fresh session identifiers
pub trait IdSource: Send + Sync {
    fn next_id(&self) -> String;
}

/// Fills a buffer from the operating system's secure random generator
pub type EntropyFill = fn(&mut [u8]) -> Result<(), getrandom::Error>;

/// Random v4 UUIDs; the preferred generator.
///
/// When the secure generator fails, ids come from [`TimestampIdSource`].
#[derive(Debug, Clone, Copy)]
pub struct UuidIdSource {
    fill: EntropyFill,
}

impl UuidIdSource {
    pub fn new() -> Self {
        Self::with_entropy(getrandom::getrandom)
    }

    pub fn with_entropy(fill: EntropyFill) -> Self {
        Self { fill }
    }
}

impl Default for UuidIdSource {
    fn default() -> Self {
        Self::new()
    }
}

impl IdSource for UuidIdSource {
    fn next_id(&self) -> String {
        let mut bytes = [0u8; 16];
        match (self.fill)(&mut bytes) {
            Ok(()) => uuid::Builder::from_random_bytes(bytes).into_uuid().to_string(),
            Err(e) => {
                log::warn!("Secure random generator unavailable ({}), using a timestamp id", e);
                TimestampIdSource.next_id()
            }
        }
    }
}

/// `sess-<unix millis>-<hex>` identifiers for targets without a secure
/// random generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct TimestampIdSource;

impl TimestampIdSource {
    pub fn new() -> Self {
        Self
    }
}

impl IdSource for TimestampIdSource {
    fn next_id(&self) -> String {
        let millis = chrono::Utc::now().timestamp_millis();
        format!("sess-{}-{:x}", millis, rand::rng().random::<u64>())
    }
}
