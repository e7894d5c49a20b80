#[cfg(test)]
#[path = "classifier_test.rs"]
mod tests;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::models::Modality;

const AUDIO_PATTERNS: &[&str] = &[
    r"\b(say|speak|read|recite|sing)\b.*\b(aloud|out loud)\b",
    r"\b(text[- ]to[- ]speech|tts)\b",
    r"\b(voice|audio|speech|narrat(e|ion)|pronounce|pronunciation)\b",
    r"\bhow (does|do|would|will|did)?\s*.*\bsounds?\b",
    r"\b(speak|sing|say) (it|this|that|something)\b",
];

const IMAGE_PATTERNS: &[&str] = &[
    r"\b(draw|paint|sketch|illustrate|doodle)\b",
    r"\b(generate|create|make|show|produce|render|design)\b.*\b(image|picture|photo|drawing|illustration|painting|logo|icon|portrait|wallpaper|art(work)?)\b",
    r"\b(image|picture|photo|pic|drawing|illustration|painting) of\b",
    r"\bwhat does .* look like\b",
];

/// Pattern groups in evaluation order. Audio comes first so an utterance
/// matching both groups is answered with speech.
static INTENTS: Lazy<Vec<(Modality, Vec<Regex>)>> = Lazy::new(|| {
    return vec![
        (Modality::Audio, compile(AUDIO_PATTERNS)),
        (Modality::Image, compile(IMAGE_PATTERNS)),
    ];
});

fn compile(patterns: &[&str]) -> Vec<Regex> {
    return patterns
        .iter()
        .filter_map(|pattern| {
            let res = Regex::new(pattern);
            if let Err(err) = &res {
                tracing::error!(error = ?err, pattern = pattern, "Invalid intent pattern");
            }
            return res.ok();
        })
        .collect();
}

/// Decides which modality the user is asking for.
pub fn classify(text: &str) -> Modality {
    let lowered = text.to_lowercase();
    for (modality, patterns) in INTENTS.iter() {
        if patterns.iter().any(|re| return re.is_match(&lowered)) {
            return *modality;
        }
    }

    return Modality::Text;
}
