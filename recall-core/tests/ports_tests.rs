use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use recall_core::{
    language_name, Clock, CoreError, Definition, Dictionary, DictionaryEntry, IdGenerator,
    LanguagePair, ManualClock, Meaning, RandomIds, Translation, Translator, SUPPORTED_LANGUAGES,
};
use std::collections::HashSet;

struct CannedDictionary;

#[async_trait]
impl Dictionary for CannedDictionary {
    async fn lookup(&self, word: &str, _language: &str) -> Result<Vec<DictionaryEntry>, CoreError> {
        if word != "serendipity" {
            return Ok(Vec::new());
        }
        Ok(vec![DictionaryEntry {
            word: word.to_string(),
            phonetics: Vec::new(),
            meanings: vec![Meaning {
                part_of_speech: "noun".into(),
                definitions: vec![Definition {
                    definition: "finding something good without looking for it".into(),
                    ..Definition::default()
                }],
            }],
        }])
    }
}

struct OfflineTranslator;

#[async_trait]
impl Translator for OfflineTranslator {
    async fn translate(&self, _text: &str, _pair: &LanguagePair) -> Result<Translation, CoreError> {
        Err(CoreError::Storage("translation service unreachable"))
    }
}

#[test]
fn language_pairs_validate_codes() {
    assert_eq!(SUPPORTED_LANGUAGES.len(), 24);
    assert_eq!(language_name("ko"), Some("Korean"));
    assert_eq!(language_name("xx"), None);

    let pair = LanguagePair::new("EN", " es").unwrap();
    assert_eq!(pair.from(), "en");
    assert_eq!(pair.to(), "es");
    assert_eq!(pair.to_string(), "en|es");

    assert!(matches!(
        LanguagePair::new("en", "klingon"),
        Err(CoreError::Invalid(_))
    ));
}

#[test]
fn dictionary_entries_deserialize_from_lookup_payload() {
    let payload = r#"[{
        "word": "hello",
        "phonetics": [{"text": "/həˈləʊ/"}],
        "meanings": [{
            "partOfSpeech": "exclamation",
            "definitions": [{"definition": "used as a greeting", "synonyms": ["hi"]}]
        }]
    }]"#;
    let entries: Vec<DictionaryEntry> = serde_json::from_str(payload).unwrap();
    assert_eq!(entries[0].meanings[0].part_of_speech, "exclamation");
    assert_eq!(entries[0].primary_definition(), Some("used as a greeting"));
    assert_eq!(entries[0].meanings[0].definitions[0].synonyms, vec!["hi"]);
}

#[tokio::test]
async fn lookups_go_through_the_ports() {
    let dict: Box<dyn Dictionary> = Box::new(CannedDictionary);
    let hits = dict.lookup("serendipity", "en").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert!(dict.lookup("nothing", "en").await.unwrap().is_empty());

    let translator: Box<dyn Translator> = Box::new(OfflineTranslator);
    let pair = LanguagePair::new("en", "fr").unwrap();
    assert!(translator.translate("hello", &pair).await.is_err());
}

#[test]
fn manual_clock_moves_only_when_told() {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let clock = ManualClock::new(start);
    assert_eq!(clock.now(), start);
    clock.advance(Duration::hours(3));
    assert_eq!(clock.now(), start + Duration::hours(3));
    clock.set(start);
    assert_eq!(clock.now(), start);
}

#[test]
fn random_ids_are_unique() {
    let ids = RandomIds;
    let set: HashSet<_> = (0..100).map(|_| ids.next_id()).collect();
    assert_eq!(set.len(), 100);
}
