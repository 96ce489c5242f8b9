#![allow(dead_code)]

mod fake_source;

pub use fake_source::{FakeHandle, FakeSource, PlayOutcome, fake_source};
