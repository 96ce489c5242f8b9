/// Source of ids for utterances that arrive without one.
///
/// Ids only need to be unique within a transcript. Segments cut out of an
/// utterance do not draw from the generator; they derive their id from the
/// source via [`derive_segment_id`].
pub trait IdGenerator: Send + Sync {
    fn next_id(&mut self) -> String;
}

/// Random v4 UUIDs, stable across edits and sessions once persisted.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIdGen;

impl IdGenerator for UuidIdGen {
    fn next_id(&mut self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// `u0`, `u1`, ... in arrival order. Normalizing the same input twice yields
/// the same ids, which keeps snapshots and CLI output diffable.
#[derive(Debug, Clone)]
pub struct SequentialIdGen {
    prefix: &'static str,
    next: u64,
}

impl SequentialIdGen {
    pub fn new() -> Self {
        Self::with_prefix("u")
    }

    pub fn with_prefix(prefix: &'static str) -> Self {
        Self { prefix, next: 0 }
    }
}

impl Default for SequentialIdGen {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SequentialIdGen {
    fn next_id(&mut self) -> String {
        let id = format!("{}{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}

const PART_SEPARATOR: char = '#';

/// Id of the `part`-th (1-based) piece cut out of `source_id`.
pub fn derive_segment_id(source_id: &str, part: usize) -> String {
    format!("{source_id}{PART_SEPARATOR}{part}")
}

/// The utterance a segment was originally cut from. Ids that were never
/// split are returned as-is.
pub fn source_id_of(segment_id: &str) -> &str {
    segment_id
        .split_once(PART_SEPARATOR)
        .map_or(segment_id, |(source, _)| source)
}
