#[cfg(feature = "random-ids")]
use rand::Rng;

#[cfg(feature = "random-ids")]
const TOKEN_LEN: usize = 10;

/// Source of fallback ids for nodes that carry neither an id nor a value.
///
/// Any `FnMut() -> String` closure works as a source.
pub trait IdSource {
    fn next_id(&mut self) -> String;
}

impl<F> IdSource for F
where
    F: FnMut() -> String,
{
    fn next_id(&mut self) -> String {
        self()
    }
}

/// Random base-36 tokens. Output differs between runs.
#[cfg(feature = "random-ids")]
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIds;

#[cfg(feature = "random-ids")]
impl IdSource for RandomIds {
    fn next_id(&mut self) -> String {
        let mut rng = rand::rng();
        (0..TOKEN_LEN)
            .map(|_| char::from_digit(rng.random_range(0..36u32), 36).unwrap_or('0'))
            .collect()
    }
}

/// Deterministic `{prefix}{n}` ids, counting from zero.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: usize,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 0,
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new("id-")
    }
}

impl IdSource for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = format!("{}{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}
