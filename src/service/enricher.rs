//! Merge of a parsed intent with the user's profile defaults

use crate::model::intent::{EnrichedIntent, Intent, UserContext, UserLocation};

/// Attach profile defaults to an intent.
///
/// Pure merge: the intent's own fields are carried over untouched and every
/// profile value goes into its own `user_*` field.
pub fn enrich(intent: Intent, context: &UserContext) -> EnrichedIntent {
    let user_location = match (context.latitude, context.longitude) {
        (Some(latitude), Some(longitude)) => Some(UserLocation {
            latitude,
            longitude,
        }),
        _ => None,
    };

    EnrichedIntent {
        intent,
        user_location,
        user_time_preference: present(&context.time_preference),
        user_budget_type: present(&context.budget_type),
        user_interests: present(&context.interests),
    }
}

fn present(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|s| !s.trim().is_empty()).cloned()
}
