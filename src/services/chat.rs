//! Canned chat replies built from static knowledge and personality tables.
//!
//! Nothing here is learned or stored: every reply is picked from the tables
//! below, with a random modifier and random phrase where a table offers
//! several. The random source is passed in so callers can seed it.

use rand::seq::IndexedRandom;
use rand::Rng;
use strum::{Display, EnumString};

use crate::models::chat::{ChatDetails, ChatRequest, ChatResponse};

/// Word budget for the memories echoed back in the response details.
pub const MEMORY_WORD_LIMIT: usize = 500;

// ── Knowledge base ───────────────────────────────────────────────────

const FACTS: &[(&str, &str)] = &[
    ("meaning of life", "42"),
    ("capital of france", "Paris"),
    ("speed of light", "299,792 kilometers per second"),
];

const GREETINGS: &[&str] = &["Hello!", "Hi there!", "Greetings!"];
const FAREWELLS: &[&str] = &["Goodbye!", "See you later!", "Farewell!"];
const HELP: &[&str] = &[
    "How can I assist you today?",
    "What can I help you with?",
    "I'm here to help!",
];

/// General categories, matched by name when the message mentions them.
const GENERAL: &[(&str, &[&str])] = &[
    ("greetings", GREETINGS),
    ("farewells", FAREWELLS),
    ("help", HELP),
];

const GREETING_WORDS: &[&str] = &["hello", "hi", "hey", "greetings"];
const FAREWELL_WORDS: &[&str] = &["bye", "goodbye", "see you", "farewell"];
const HELP_WORDS: &[&str] = &["help", "assist", "support"];

const RHYMES: &[(&str, &str)] = &[
    ("life", "strife"),
    ("you", "blue"),
    ("day", "way"),
    ("cat", "hat"),
    ("fun", "sun"),
];

// ── Personalities ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Personality {
    #[default]
    Friendly,
    Professional,
    Humorous,
}

struct PersonalityTemplate {
    default: &'static str,
    unknown: &'static str,
    modifiers: &'static [&'static str],
}

const FRIENDLY: PersonalityTemplate = PersonalityTemplate {
    default: "I'd be happy to help with that!",
    unknown: "I'm not sure about that, but I'm eager to learn!",
    modifiers: &["😊", "✨", "👍"],
};

const PROFESSIONAL: PersonalityTemplate = PersonalityTemplate {
    default: "Certainly, here's the information you requested:",
    unknown: "I don't have that information in my records.",
    modifiers: &["•", "✓", "→"],
};

const HUMOROUS: PersonalityTemplate = PersonalityTemplate {
    default: "Oh boy, here's the answer you didn't know you needed:",
    unknown: "My circuits are drawing a blank on that one! 🤖",
    modifiers: &["😂", "🤔", "🎭"],
};

impl Personality {
    /// Resolve a requested personality; unknown names fall back to friendly.
    pub fn resolve(requested: Option<&str>) -> Self {
        requested
            .and_then(|name| name.trim().parse().ok())
            .unwrap_or_default()
    }

    fn template(self) -> &'static PersonalityTemplate {
        match self {
            Self::Friendly => &FRIENDLY,
            Self::Professional => &PROFESSIONAL,
            Self::Humorous => &HUMOROUS,
        }
    }
}

/// Build the reply and details for one chat request.
pub fn respond<R: Rng + ?Sized>(request: &ChatRequest, rng: &mut R) -> ChatResponse {
    let personality = Personality::resolve(request.personality.as_deref());
    let template = personality.template();
    let context = format!("As {}, I should respond accordingly. ", request.bio);
    let content = request.content.trim().to_lowercase();

    let answer = match request.prompt.as_deref() {
        Some(prompt) => special_prompt(prompt, &content, template),
        None => answer_for(&content, template, rng),
    };

    let modifier = pick(template.modifiers, rng);

    ChatResponse {
        response: format!("{context}{modifier} {answer} {modifier}"),
        details: ChatDetails {
            personality: request
                .personality
                .clone()
                .unwrap_or_else(|| "default".to_string()),
            bio: request.bio.clone(),
            prompt_used: request.prompt.clone(),
            memories: request
                .memories
                .as_deref()
                .map(|memories| limit_words(memories, MEMORY_WORD_LIMIT)),
        },
    }
}

fn special_prompt(prompt: &str, content: &str, template: &PersonalityTemplate) -> String {
    let prompt = prompt.to_lowercase();
    if prompt.contains("haiku") {
        haiku(content)
    } else if prompt.contains("rhyme") {
        rhyme(content)
    } else {
        format!("{} {}", template.default, content)
    }
}

fn answer_for<R: Rng + ?Sized>(
    content: &str,
    template: &PersonalityTemplate,
    rng: &mut R,
) -> String {
    if let Some(answer) = search_knowledge_base(content, rng) {
        return answer.to_string();
    }

    let canned = if mentions_any(content, GREETING_WORDS) {
        Some(GREETINGS)
    } else if mentions_any(content, FAREWELL_WORDS) {
        Some(FAREWELLS)
    } else if mentions_any(content, HELP_WORDS) {
        Some(HELP)
    } else {
        None
    };

    match canned {
        Some(phrases) => pick(phrases, rng).to_string(),
        None => template.unknown.to_string(),
    }
}

/// Facts win over general categories; both match by substring.
fn search_knowledge_base<R: Rng + ?Sized>(query: &str, rng: &mut R) -> Option<&'static str> {
    if let Some((_, fact)) = FACTS.iter().find(|(key, _)| query.contains(key)) {
        return Some(*fact);
    }

    GENERAL
        .iter()
        .find(|(category, _)| query.contains(category))
        .map(|(_, phrases)| pick(phrases, rng))
}

fn mentions_any(text: &str, words: &[&str]) -> bool {
    words.iter().any(|word| text.contains(word))
}

fn pick<R: Rng + ?Sized>(items: &[&'static str], rng: &mut R) -> &'static str {
    items.choose(rng).copied().unwrap_or_default()
}

fn haiku(topic: &str) -> String {
    let topic = if topic.is_empty() { "life" } else { topic };
    format!("About {topic}\nA simple three-line form\nSeventeen syllables")
}

fn rhyme(word: &str) -> String {
    let rhyme = RHYMES
        .iter()
        .find(|(key, _)| *key == word.to_lowercase())
        .map(|(_, rhyme)| *rhyme)
        .unwrap_or("...actually, I can't rhyme that!");
    format!("You said \"{word}\", how about \"{rhyme}\"?")
}

/// Keep at most `limit` whitespace-separated words, marking a cut with `...`.
pub fn limit_words(text: &str, limit: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= limit {
        return text.to_string();
    }
    format!("{}...", words[..limit].join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn request(content: &str) -> ChatRequest {
        ChatRequest {
            content: content.to_string(),
            bio: "a pirate".to_string(),
            personality: None,
            prompt: None,
            memories: None,
        }
    }

    fn reply(request: &ChatRequest) -> String {
        respond(request, &mut StdRng::seed_from_u64(7)).response
    }

    #[test]
    fn test_reply_is_wrapped_in_context_and_modifiers() {
        let response = reply(&request("What is the capital of France?"));
        assert!(response.starts_with("As a pirate, I should respond accordingly. "));
        assert!(response.contains(" Paris "));

        let modifier = FRIENDLY
            .modifiers
            .iter()
            .find(|m| response.ends_with(*m))
            .expect("reply ends with a friendly modifier");
        assert!(response.contains(&format!("{modifier} Paris {modifier}")));
    }

    #[test]
    fn test_facts_take_priority() {
        let response = reply(&request("hello, what is the meaning of life"));
        assert!(response.contains(" 42 "));
    }

    #[test]
    fn test_greeting_keywords() {
        let response = reply(&request("  HEY there "));
        assert!(GREETINGS.iter().any(|g| response.contains(g)));
    }

    #[test]
    fn test_category_name_match() {
        let response = reply(&request("farewells please"));
        assert!(FAREWELLS.iter().any(|f| response.contains(f)));
    }

    #[test]
    fn test_unknown_uses_personality_line() {
        let mut req = request("quantum chromodynamics");
        req.personality = Some("Professional".to_string());
        let response = respond(&req, &mut StdRng::seed_from_u64(1));
        assert!(response.response.contains(PROFESSIONAL.unknown));
        assert_eq!(response.details.personality, "Professional");
    }

    #[test]
    fn test_unknown_personality_falls_back_to_friendly() {
        assert_eq!(Personality::resolve(Some("grumpy")), Personality::Friendly);
        assert_eq!(Personality::resolve(Some("HUMOROUS")), Personality::Humorous);
        assert_eq!(Personality::resolve(None), Personality::Friendly);
    }

    #[test]
    fn test_details_default_personality() {
        let response = respond(&request("hi"), &mut StdRng::seed_from_u64(1));
        assert_eq!(response.details.personality, "default");
        assert_eq!(response.details.prompt_used, None);
    }

    #[test]
    fn test_haiku_prompt() {
        let mut req = request("Autumn");
        req.prompt = Some("Write a HAIKU".to_string());
        let response = reply(&req);
        assert!(response.contains("About autumn\nA simple three-line form\nSeventeen syllables"));
    }

    #[test]
    fn test_haiku_defaults_to_life() {
        assert!(haiku("").starts_with("About life\n"));
    }

    #[test]
    fn test_rhyme_prompt() {
        let mut req = request("Cat");
        req.prompt = Some("rhyme time".to_string());
        assert!(reply(&req).contains(r#"You said "cat", how about "hat"?"#));

        assert_eq!(
            rhyme("orange"),
            r#"You said "orange", how about "...actually, I can't rhyme that!"?"#
        );
    }

    #[test]
    fn test_other_prompt_uses_default_line() {
        let mut req = request("Tell Me");
        req.prompt = Some("summarize".to_string());
        assert!(reply(&req).contains("I'd be happy to help with that! tell me"));
    }

    #[test]
    fn test_seeded_replies_are_reproducible() {
        let req = request("hello");
        assert_eq!(reply(&req), reply(&req));
    }

    #[test]
    fn test_memories_are_truncated() {
        let long: String = (0..600).map(|i| format!("w{i} ")).collect();
        let mut req = request("hi");
        req.memories = Some(long);
        let memories = respond(&req, &mut StdRng::seed_from_u64(1))
            .details
            .memories
            .unwrap();
        assert!(memories.ends_with("w499..."));
        assert_eq!(memories.split_whitespace().count(), MEMORY_WORD_LIMIT);
    }

    #[test]
    fn test_limit_words_keeps_short_text() {
        assert_eq!(limit_words("a  b c", 3), "a  b c");
        assert_eq!(limit_words("a b c d", 2), "a b...");
    }
}
