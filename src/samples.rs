use include_dir::{include_dir, Dir};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;

use crate::error::SampleError;
use crate::session::split_words;

static SAMPLES_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/samples");

pub const DEFAULT_SAMPLE_SET: &str = "english";

/// Built-in practice passages used when no custom text is given.
#[derive(Deserialize, Clone, Debug)]
pub struct SampleSet {
    pub name: String,
    pub texts: Vec<String>,
}

impl SampleSet {
    pub fn builtin() -> Result<Self, SampleError> {
        Self::load(DEFAULT_SAMPLE_SET)
    }

    pub fn load(name: &str) -> Result<Self, SampleError> {
        let file = SAMPLES_DIR
            .get_file(format!("{name}.json"))
            .ok_or_else(|| SampleError::Missing(name.to_string()))?;

        let contents = file
            .contents_utf8()
            .ok_or_else(|| SampleError::NotUtf8(name.to_string()))?;

        let set: SampleSet = serde_json::from_str(contents)?;
        set.validated()
    }

    /// Every text must yield at least one word, so a fallback can never
    /// produce an empty session.
    fn validated(mut self) -> Result<Self, SampleError> {
        self.texts.retain(|text| !split_words(text).is_empty());
        if self.texts.is_empty() {
            return Err(SampleError::Empty(self.name));
        }
        Ok(self)
    }

    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        // validated() guarantees at least one entry
        self.texts
            .choose(rng)
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Returns `custom` unless it is blank, in which case a random built-in passage.
    pub fn resolve<'a, R: Rng + ?Sized>(&'a self, custom: &'a str, rng: &mut R) -> &'a str {
        if custom.trim().is_empty() {
            self.choose(rng)
        } else {
            custom
        }
    }
}
