//! Topic Provider: draws debate prompts for the room's topic mode.
//!
//! Draws never return the excluded prompt (normally the current one) when
//! the list they draw from has another entry to offer.

pub mod builtin;

pub use builtin::STANDARD_TOPICS;

use rand::Rng;

use crate::state::{GameState, TopicMode};

/// Shown in `custom` mode when the room has no custom prompts.
pub const EMPTY_CUSTOM_PLACEHOLDER: &str = "Add your own topics when creating the room";

/// Uniform draw from `topics`, avoiding `exclude` when anything else is available.
///
/// Returns `None` only for an empty list.
pub fn draw_from<'a, S: AsRef<str>>(
    topics: &'a [S],
    exclude: Option<&str>,
    rng: &mut impl Rng,
) -> Option<&'a str> {
    if topics.is_empty() {
        return None;
    }

    let candidates: Vec<&str> = topics
        .iter()
        .map(|t| t.as_ref())
        .filter(|t| Some(*t) != exclude)
        .collect();

    if candidates.is_empty() {
        // Every entry equals the excluded prompt.
        return Some(topics[0].as_ref());
    }
    Some(candidates[rng.random_range(0..candidates.len())])
}

/// Draw from the built-in list.
pub fn standard_topic(exclude: Option<&str>, rng: &mut impl Rng) -> String {
    draw_from(STANDARD_TOPICS, exclude, rng)
        .unwrap_or_default()
        .to_string()
}

/// Draw a prompt for the given mode and custom list.
pub fn draw_topic(
    mode: TopicMode,
    custom_topics: &[String],
    exclude: Option<&str>,
    rng: &mut impl Rng,
) -> String {
    match mode {
        TopicMode::Standard => standard_topic(exclude, rng),
        TopicMode::Custom => draw_from(custom_topics, exclude, rng)
            .map(str::to_string)
            .unwrap_or_else(|| EMPTY_CUSTOM_PLACEHOLDER.to_string()),
        TopicMode::Hybrid => {
            if custom_topics.is_empty() || rng.random_bool(0.5) {
                standard_topic(exclude, rng)
            } else {
                draw_from(custom_topics, exclude, rng)
                    .map(str::to_string)
                    .unwrap_or_else(|| standard_topic(exclude, rng))
            }
        }
    }
}

/// Draw a prompt using the state's topic configuration.
pub fn topic_for_state(state: &GameState, exclude: Option<&str>, rng: &mut impl Rng) -> String {
    draw_topic(state.topic_mode, &state.custom_topics, exclude, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_standard_never_returns_excluded() {
        let mut rng = StdRng::seed_from_u64(7);
        let excluded = STANDARD_TOPICS[3];
        for _ in 0..2000 {
            let topic = standard_topic(Some(excluded), &mut rng);
            assert_ne!(topic, excluded);
            assert!(STANDARD_TOPICS.contains(&topic.as_str()));
        }
    }

    #[test]
    fn test_custom_mode_uses_custom_list() {
        let mut rng = StdRng::seed_from_u64(1);
        let custom = vec!["Tabs beat spaces".to_string(), "Vim beats Emacs".to_string()];
        for _ in 0..200 {
            let topic = draw_topic(TopicMode::Custom, &custom, Some("Tabs beat spaces"), &mut rng);
            assert_eq!(topic, "Vim beats Emacs");
        }
    }

    #[test]
    fn test_custom_mode_empty_list_gives_placeholder() {
        let mut rng = StdRng::seed_from_u64(1);
        let topic = draw_topic(TopicMode::Custom, &[], None, &mut rng);
        assert_eq!(topic, EMPTY_CUSTOM_PLACEHOLDER);
    }

    #[test]
    fn test_single_entry_list_returns_it_even_when_excluded() {
        let mut rng = StdRng::seed_from_u64(1);
        let custom = vec!["Only one topic here".to_string()];
        let topic = draw_topic(TopicMode::Custom, &custom, Some("Only one topic here"), &mut rng);
        assert_eq!(topic, "Only one topic here");
    }

    #[test]
    fn test_hybrid_without_custom_falls_back_to_standard() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..100 {
            let topic = draw_topic(TopicMode::Hybrid, &[], None, &mut rng);
            assert!(STANDARD_TOPICS.contains(&topic.as_str()));
        }
    }

    #[test]
    fn test_hybrid_mixes_both_sources() {
        let mut rng = StdRng::seed_from_u64(9);
        let custom = vec!["Our office needs a karaoke room".to_string()];
        let mut saw_custom = false;
        let mut saw_standard = false;
        for _ in 0..200 {
            let topic = draw_topic(TopicMode::Hybrid, &custom, None, &mut rng);
            if topic == custom[0] {
                saw_custom = true;
            } else {
                assert!(STANDARD_TOPICS.contains(&topic.as_str()));
                saw_standard = true;
            }
        }
        assert!(saw_custom && saw_standard);
    }
}
