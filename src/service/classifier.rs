//! Coarse intent classification
//!
//! The rule engine only consumes an [`IntentClass`]; how it is derived is up
//! to the [`IntentClassifier`] plugged into the pipeline.

use crate::model::intent::{EnrichedIntent, IntentClass};
use crate::model::taxonomy::Category;

/// Derives the coarse intent class of a request
pub trait IntentClassifier: Send + Sync {
    fn classify(&self, user_text: &str, intent: &EnrichedIntent) -> IntentClass;
}

/// Cue lists checked in order; the first class with a matching cue wins
const CUES: &[(IntentClass, &[&str])] = &[
    (
        IntentClass::Active,
        &[
            "뛰", "달리", "조깅", "러닝", "운동", "땀", "공놀이", "축구", "배드민턴", "활발",
            "체력",
        ],
    ),
    (
        IntentClass::Brain,
        &["머리 쓰", "머리쓰", "두뇌", "추리", "전략", "퍼즐", "보드게임", "방탈출"],
    ),
    (
        IntentClass::HandsOn,
        &["만들", "창작", "공방", "그림", "요리", "베이킹", "손으로"],
    ),
    (
        IntentClass::Quiet,
        &["조용", "힐링", "쉬고", "여유", "편하게", "머리 비우", "차분"],
    ),
];

/// Lexical classifier over the request text and parsed keywords
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordIntentClassifier;

impl IntentClassifier for KeywordIntentClassifier {
    fn classify(&self, user_text: &str, intent: &EnrichedIntent) -> IntentClass {
        let mut haystack = user_text.to_lowercase();
        for keyword in &intent.intent.keywords {
            haystack.push(' ');
            haystack.push_str(&keyword.to_lowercase());
        }

        if let Some((class, _)) = CUES
            .iter()
            .find(|(_, cues)| cues.iter().any(|cue| haystack.contains(cue)))
        {
            return *class;
        }

        match intent.intent.category {
            Some(Category::Sports) => IntentClass::Active,
            Some(Category::Hobby) => IntentClass::HandsOn,
            Some(Category::Cafe) => IntentClass::Quiet,
            _ => IntentClass::Neutral,
        }
    }
}
