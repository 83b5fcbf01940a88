//! Dictionary and translation collaborators.
//!
//! Only the contracts live here. The core never calls them; the card editor
//! uses them to prefill card text, and a failed lookup leaves decks untouched.

use crate::{CoreError, LanguagePair};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Phonetic {
    pub text: Option<String>,
    pub audio: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Definition {
    pub definition: String,
    pub example: Option<String>,
    #[serde(default)]
    pub synonyms: Vec<String>,
    #[serde(default)]
    pub antonyms: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Meaning {
    pub part_of_speech: String,
    pub definitions: Vec<Definition>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DictionaryEntry {
    pub word: String,
    #[serde(default)]
    pub phonetics: Vec<Phonetic>,
    #[serde(default)]
    pub meanings: Vec<Meaning>,
}

impl DictionaryEntry {
    /// First definition of the first meaning, the usual card back.
    pub fn primary_definition(&self) -> Option<&str> {
        self.meanings
            .iter()
            .flat_map(|m| m.definitions.iter())
            .map(|d| d.definition.as_str())
            .next()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Translation {
    pub translated_text: String,
    pub from: String,
    pub to: String,
}

#[async_trait]
pub trait Dictionary: Send + Sync {
    async fn lookup(&self, word: &str, language: &str) -> Result<Vec<DictionaryEntry>, CoreError>;
}

#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, pair: &LanguagePair) -> Result<Translation, CoreError>;
}
