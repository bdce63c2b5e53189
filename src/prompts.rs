use crate::models::GratitudePrompt;

/// Fixed gratitude prompt catalog. Order matters: the selector indexes into
/// this slice, so appending keeps existing date-to-prompt assignments stable
/// only when the length changes are accepted as a reshuffle.
pub const PROMPT_CATALOG: &[GratitudePrompt] = &[
    GratitudePrompt {
        id: "small-win",
        text: "What small win from today are you grateful for?",
    },
    GratitudePrompt {
        id: "person",
        text: "Who made your day a little better, and how?",
    },
    GratitudePrompt {
        id: "place",
        text: "What place brought you a sense of calm today?",
    },
    GratitudePrompt {
        id: "challenge",
        text: "What challenge are you grateful to have faced?",
    },
    GratitudePrompt {
        id: "body",
        text: "What did your body let you do today that you appreciate?",
    },
    GratitudePrompt {
        id: "learning",
        text: "What did you learn recently that you're thankful for?",
    },
    GratitudePrompt {
        id: "comfort",
        text: "What simple comfort did you enjoy today?",
    },
    GratitudePrompt {
        id: "nature",
        text: "What did you notice outdoors that made you pause?",
    },
    GratitudePrompt {
        id: "past-self",
        text: "What decision by your past self are you grateful for?",
    },
    GratitudePrompt {
        id: "ordinary",
        text: "What ordinary moment felt quietly special today?",
    },
];

/// Deterministic rotation over the prompt list: fold
/// `(acc + char_code * 31) mod len` across the key's characters. Stability
/// across machines and runs is the contract, not distribution quality.
pub fn prompt_index(date_key: &str, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let modulus = len as u64;
    let mut acc: u64 = 0;
    for ch in date_key.chars() {
        acc = (acc + u64::from(ch as u32) * 31) % modulus;
    }
    acc as usize
}

pub fn select_prompt(date_key: &str) -> &'static GratitudePrompt {
    &PROMPT_CATALOG[prompt_index(date_key, PROMPT_CATALOG.len())]
}

pub fn find_prompt(prompt_id: &str) -> Option<&'static GratitudePrompt> {
    PROMPT_CATALOG.iter().find(|prompt| prompt.id == prompt_id)
}
