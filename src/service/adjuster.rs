//! Intent-based score adjustment
//!
//! Maps (intent class, candidate category/subcategory, keywords, location
//! type) to an additive delta. Deltas of every matching rule stack.
//!
//! Evaluation order:
//! 1. `NEUTRAL`: only the weak location-type term (+3.0 / -3.0) applies.
//! 2. Otherwise every matching class rule and keyword rule is summed.
//! 3. Then the location-type correction (+6.0 / -10.0).

use thiserror::Error;

use crate::model::intent::{EnrichedIntent, IntentClass};
use crate::model::meeting::Meeting;
use crate::model::taxonomy::Category;

/// Location-type term applied for `NEUTRAL` requests
const NEUTRAL_LOCATION_MATCH: f64 = 3.0;
const NEUTRAL_LOCATION_MISMATCH: f64 = -3.0;

/// Location-type correction applied for every other class
const LOCATION_MATCH: f64 = 6.0;
const LOCATION_MISMATCH: f64 = -10.0;

/// Error raised when a rule does not fit the taxonomy
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RuleTableError {
    #[error("rule {index}: subcategory '{subcategory}' is not part of {category}")]
    UnknownSubcategory {
        index: usize,
        category: Category,
        subcategory: &'static str,
    },

    #[error("rule {index}: subcategory filters need a positive category match")]
    SubcategoryOnNegatedCategory { index: usize },

    #[error("rule {index}: empty subcategory list")]
    EmptySubcategoryList { index: usize },
}

/// Which requests a rule applies to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Trigger {
    /// Requests of the given class
    Class(IntentClass),
    /// Requests whose keywords contain the token, any non-neutral class
    Keyword(&'static str),
}

/// Category side of a rule
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CategoryMatch {
    Is(Category),
    /// Anything else, including a missing or unknown category
    IsNot(Category),
}

/// Subcategory side of a rule
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SubcategoryMatch {
    Any,
    OneOf(&'static [&'static str]),
    /// Anything outside the list, including a missing subcategory
    NoneOf(&'static [&'static str]),
}

/// One row of the rule table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdjustmentRule {
    pub trigger: Trigger,
    pub category: CategoryMatch,
    pub subcategory: SubcategoryMatch,
    pub delta: f64,
}

const fn rule(
    trigger: Trigger,
    category: CategoryMatch,
    subcategory: SubcategoryMatch,
    delta: f64,
) -> AdjustmentRule {
    AdjustmentRule {
        trigger,
        category,
        subcategory,
        delta,
    }
}

use CategoryMatch::{Is, IsNot};
use IntentClass::{Active, Brain, HandsOn, Quiet};
use SubcategoryMatch::{Any, NoneOf, OneOf};
use Trigger::{Class, Keyword};

const ACTIVE_TOP: &[&str] = &["축구"];
const ACTIVE_MID: &[&str] = &["러닝", "클라이밍", "배드민턴"];
const ACTIVE_SPORTS: &[&str] = &["축구", "러닝", "클라이밍", "배드민턴"];
const ACTIVE_SOCIAL: &[&str] = &["볼링", "당구", "탁구"];
const HANDS_ON_SOCIAL_PENALTY: &[&str] = &["당구", "볼링", "기타", "노래방", "보드게임"];
const BRAIN_SOCIAL_BOOST: &[&str] = &["보드게임", "방탈출"];
const BRAIN_SOCIAL_PENALTY: &[&str] = &["당구", "볼링", "와인바", "노래방"];
const BALL_GAME_KEYWORD: &str = "공놀이";

/// Standard rule table
pub const STANDARD_RULES: &[AdjustmentRule] = &[
    // ACTIVE
    rule(Class(Active), Is(Category::Sports), OneOf(ACTIVE_TOP), 18.0),
    rule(Class(Active), Is(Category::Sports), OneOf(ACTIVE_MID), 10.0),
    rule(Class(Active), Is(Category::Sports), NoneOf(ACTIVE_SPORTS), 8.0),
    rule(Class(Active), IsNot(Category::Sports), Any, -6.0),
    rule(Class(Active), Is(Category::Cafe), Any, -6.0),
    rule(Class(Active), Is(Category::CultureArts), Any, -6.0),
    rule(Class(Active), Is(Category::Social), OneOf(ACTIVE_SOCIAL), 3.0),
    rule(Class(Active), Is(Category::Social), NoneOf(ACTIVE_SOCIAL), -6.0),
    // HANDS_ON
    rule(Class(HandsOn), Is(Category::Hobby), Any, 12.0),
    rule(Class(HandsOn), Is(Category::CultureArts), Any, 6.0),
    rule(
        Class(HandsOn),
        Is(Category::Social),
        OneOf(HANDS_ON_SOCIAL_PENALTY),
        -18.0,
    ),
    // BRAIN
    rule(Class(Brain), Is(Category::Social), OneOf(BRAIN_SOCIAL_BOOST), 22.0),
    rule(Class(Brain), Is(Category::Social), OneOf(BRAIN_SOCIAL_PENALTY), -18.0),
    rule(Class(Brain), Is(Category::Cafe), Any, 0.0),
    rule(Class(Brain), Is(Category::CultureArts), Any, 0.0),
    // QUIET
    rule(Class(Quiet), Is(Category::Sports), Any, -30.0),
    rule(Class(Quiet), Is(Category::Cafe), Any, 15.0),
    rule(Class(Quiet), Is(Category::CultureArts), Any, 12.0),
    // Ball-game keyword
    rule(Keyword(BALL_GAME_KEYWORD), Is(Category::Sports), OneOf(&["러닝"]), -20.0),
    rule(
        Keyword(BALL_GAME_KEYWORD),
        Is(Category::Sports),
        OneOf(&["축구", "배드민턴"]),
        10.0,
    ),
];

impl AdjustmentRule {
    fn triggered_by(&self, class: IntentClass, intent: Option<&EnrichedIntent>) -> bool {
        match self.trigger {
            Trigger::Class(c) => c == class,
            Trigger::Keyword(token) => intent.is_some_and(|i| i.intent.has_keyword(token)),
        }
    }

    fn matches_candidate(&self, category: Option<Category>, subcategory: Option<&str>) -> bool {
        let category_ok = match self.category {
            CategoryMatch::Is(c) => category == Some(c),
            CategoryMatch::IsNot(c) => category != Some(c),
        };
        category_ok
            && match self.subcategory {
                SubcategoryMatch::Any => true,
                SubcategoryMatch::OneOf(list) => subcategory.is_some_and(|s| list.contains(&s)),
                SubcategoryMatch::NoneOf(list) => !subcategory.is_some_and(|s| list.contains(&s)),
            }
    }

    fn validate(&self, index: usize) -> Result<(), RuleTableError> {
        let list = match self.subcategory {
            SubcategoryMatch::Any => return Ok(()),
            SubcategoryMatch::OneOf(list) | SubcategoryMatch::NoneOf(list) => list,
        };
        if list.is_empty() {
            return Err(RuleTableError::EmptySubcategoryList { index });
        }
        let category = match self.category {
            CategoryMatch::Is(c) => c,
            CategoryMatch::IsNot(_) => {
                return Err(RuleTableError::SubcategoryOnNegatedCategory { index });
            }
        };
        match list.iter().copied().find(|s| !category.has_subcategory(s)) {
            Some(subcategory) => Err(RuleTableError::UnknownSubcategory {
                index,
                category,
                subcategory,
            }),
            None => Ok(()),
        }
    }
}

/// Deterministic rule engine producing per-candidate deltas
#[derive(Debug, Clone)]
pub struct IntentAdjuster {
    rules: Vec<AdjustmentRule>,
}

impl IntentAdjuster {
    /// Build an adjuster over the standard rule table
    pub fn new() -> Result<Self, RuleTableError> {
        Self::with_rules(STANDARD_RULES.to_vec())
    }

    /// Build an adjuster over a custom table, validated against the taxonomy
    pub fn with_rules(rules: Vec<AdjustmentRule>) -> Result<Self, RuleTableError> {
        for (index, rule) in rules.iter().enumerate() {
            rule.validate(index)?;
        }
        Ok(Self { rules })
    }

    /// Additive delta for one candidate
    pub fn adjust(
        &self,
        class: IntentClass,
        meeting: &Meeting,
        intent: Option<&EnrichedIntent>,
    ) -> f64 {
        let location = location_match(meeting, intent);

        if class == IntentClass::Neutral {
            return match location {
                Some(true) => NEUTRAL_LOCATION_MATCH,
                Some(false) => NEUTRAL_LOCATION_MISMATCH,
                None => 0.0,
            };
        }

        let category = meeting.category();
        let subcategory = meeting.subcategory();

        let mut delta: f64 = self
            .rules
            .iter()
            .filter(|r| r.triggered_by(class, intent) && r.matches_candidate(category, subcategory))
            .map(|r| r.delta)
            .sum();

        match location {
            Some(true) => delta += LOCATION_MATCH,
            Some(false) => delta += LOCATION_MISMATCH,
            None => {}
        }

        delta
    }
}

/// Whether the requested and candidate location types agree, `None` when
/// either side is missing
fn location_match(meeting: &Meeting, intent: Option<&EnrichedIntent>) -> Option<bool> {
    let requested = intent?.intent.location_type?;
    let offered = meeting.location_type()?;
    Some(requested.matches(offered))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::intent::Intent;
    use crate::model::taxonomy::LocationType;

    fn meeting(category: &str, subcategory: &str) -> Meeting {
        Meeting {
            category: Some(category.to_string()),
            subcategory: Some(subcategory.to_string()),
            ..Default::default()
        }
    }

    fn intent_with(location_type: Option<LocationType>, keywords: &[&str]) -> EnrichedIntent {
        EnrichedIntent::from(Intent {
            location_type,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            confidence: 0.8,
            ..Default::default()
        })
    }

    fn adjuster() -> IntentAdjuster {
        IntentAdjuster::new().unwrap()
    }

    #[test]
    fn test_standard_table_is_valid() {
        assert_eq!(adjuster().rules.len(), STANDARD_RULES.len());
    }

    #[test]
    fn test_neutral_without_location_is_zero() {
        let adjuster = adjuster();
        let intent = intent_with(None, &["공놀이"]);
        for m in [
            meeting("스포츠", "러닝"),
            meeting("카페", "브런치"),
            meeting("소셜", "보드게임"),
            Meeting::default(),
        ] {
            assert_eq!(adjuster.adjust(IntentClass::Neutral, &m, Some(&intent)), 0.0);
            assert_eq!(adjuster.adjust(IntentClass::Neutral, &m, None), 0.0);
        }
    }

    #[test]
    fn test_neutral_weak_location_term() {
        let adjuster = adjuster();
        let intent = intent_with(Some(LocationType::Indoor), &[]);
        let mut m = meeting("카페", "브런치");

        m.location_type = Some("indoor".to_string());
        assert_eq!(adjuster.adjust(IntentClass::Neutral, &m, Some(&intent)), 3.0);

        m.location_type = Some("OUTDOOR".to_string());
        assert_eq!(adjuster.adjust(IntentClass::Neutral, &m, Some(&intent)), -3.0);
    }

    #[test]
    fn test_active_soccer() {
        let delta = adjuster().adjust(IntentClass::Active, &meeting("스포츠", "축구"), None);
        assert_eq!(delta, 18.0);
    }

    #[test]
    fn test_active_rule_rows() {
        let adjuster = adjuster();
        let cases = [
            (meeting("스포츠", "러닝"), 10.0),
            (meeting("스포츠", "클라이밍"), 10.0),
            (meeting("스포츠", "배드민턴"), 10.0),
            (meeting("스포츠", "요가"), 8.0),
            (meeting("맛집", "한식"), -6.0),
            (meeting("카페", "브런치"), -12.0),
            (meeting("문화예술", "전시회"), -12.0),
            (meeting("소셜", "볼링"), -3.0),
            (meeting("소셜", "노래방"), -12.0),
            (Meeting::default(), -6.0),
        ];
        for (m, expected) in cases {
            assert_eq!(
                adjuster.adjust(IntentClass::Active, &m, None),
                expected,
                "{:?}/{:?}",
                m.category,
                m.subcategory
            );
        }
    }

    #[test]
    fn test_hands_on_rule_rows() {
        let adjuster = adjuster();
        assert_eq!(adjuster.adjust(IntentClass::HandsOn, &meeting("취미활동", "베이킹"), None), 12.0);
        assert_eq!(adjuster.adjust(IntentClass::HandsOn, &meeting("문화예술", "공방체험"), None), 6.0);
        assert_eq!(adjuster.adjust(IntentClass::HandsOn, &meeting("소셜", "기타"), None), -18.0);
        assert_eq!(adjuster.adjust(IntentClass::HandsOn, &meeting("소셜", "방탈출"), None), 0.0);
    }

    #[test]
    fn test_brain_board_game() {
        let adjuster = adjuster();
        assert_eq!(adjuster.adjust(IntentClass::Brain, &meeting("소셜", "보드게임"), None), 22.0);
        assert_eq!(adjuster.adjust(IntentClass::Brain, &meeting("소셜", "와인바"), None), -18.0);
        assert_eq!(adjuster.adjust(IntentClass::Brain, &meeting("카페", "브런치"), None), 0.0);
    }

    #[test]
    fn test_quiet_rule_rows() {
        let adjuster = adjuster();
        assert_eq!(adjuster.adjust(IntentClass::Quiet, &meeting("스포츠", "요가"), None), -30.0);
        assert_eq!(adjuster.adjust(IntentClass::Quiet, &meeting("문화예술", "갤러리"), None), 12.0);
    }

    #[test]
    fn test_quiet_cafe_with_matching_location() {
        let intent = intent_with(Some(LocationType::Indoor), &[]);
        let m: Meeting = serde_json::from_str(
            r#"{"category": "카페", "subcategory": "브런치", "meeting_location_type": "INDOOR"}"#,
        )
        .unwrap();
        let delta = adjuster().adjust(IntentClass::Quiet, &m, Some(&intent));
        assert_eq!(delta, 21.0);
    }

    #[test]
    fn test_location_mismatch_correction() {
        let intent = intent_with(Some(LocationType::Outdoor), &[]);
        let mut m = meeting("스포츠", "축구");
        m.location_type = Some("INDOOR".to_string());
        assert_eq!(adjuster().adjust(IntentClass::Active, &m, Some(&intent)), 8.0);
    }

    #[test]
    fn test_ball_game_keyword_penalizes_running() {
        let adjuster = adjuster();
        let running = meeting("스포츠", "러닝");
        let with_keyword = intent_with(None, &["공놀이"]);
        let without_keyword = intent_with(None, &["운동"]);

        for class in [
            IntentClass::Active,
            IntentClass::HandsOn,
            IntentClass::Brain,
            IntentClass::Quiet,
        ] {
            let with = adjuster.adjust(class, &running, Some(&with_keyword));
            let without = adjuster.adjust(class, &running, Some(&without_keyword));
            assert!(with < without, "{class}: {with} vs {without}");
            assert_eq!(with - without, -20.0);
        }
    }

    #[test]
    fn test_ball_game_keyword_boosts_ball_sports() {
        let intent = intent_with(None, &["공놀이"]);
        let delta = adjuster().adjust(IntentClass::Active, &meeting("스포츠", "배드민턴"), Some(&intent));
        assert_eq!(delta, 20.0);
    }

    #[test]
    fn test_adjust_is_deterministic() {
        let adjuster = adjuster();
        let intent = intent_with(Some(LocationType::Indoor), &["공놀이"]);
        let m = meeting("소셜", "볼링");
        let first = adjuster.adjust(IntentClass::Active, &m, Some(&intent));
        for _ in 0..10 {
            assert_eq!(adjuster.adjust(IntentClass::Active, &m, Some(&intent)), first);
        }
    }

    #[test]
    fn test_rule_with_unknown_subcategory_is_rejected() {
        let rules = vec![rule(
            Class(IntentClass::Active),
            Is(Category::Sports),
            OneOf(&["축귀"]),
            1.0,
        )];
        assert!(matches!(
            IntentAdjuster::with_rules(rules),
            Err(RuleTableError::UnknownSubcategory { index: 0, .. })
        ));
    }

    #[test]
    fn test_rule_with_negated_category_filter_is_rejected() {
        let rules = vec![rule(
            Class(IntentClass::Quiet),
            IsNot(Category::Cafe),
            OneOf(&["브런치"]),
            1.0,
        )];
        assert!(matches!(
            IntentAdjuster::with_rules(rules),
            Err(RuleTableError::SubcategoryOnNegatedCategory { index: 0 })
        ));
    }
}
