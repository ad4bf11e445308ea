//! Prebuilt voice and output-language catalogs for the TTS provider.
//!
//! Both tables are fixed by the provider: 30 prebuilt voices and the GA
//! output locales. Config validation and the CLI listings read from here.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Female,
    Male,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Female => "Female",
            Gender::Male => "Male",
        }
    }
}

/// A prebuilt provider voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Voice {
    pub name: &'static str,
    pub gender: Gender,
}

pub const VOICES: &[Voice] = &[
    Voice { name: "Achernar", gender: Gender::Female },
    Voice { name: "Achird", gender: Gender::Male },
    Voice { name: "Algenib", gender: Gender::Male },
    Voice { name: "Algieba", gender: Gender::Male },
    Voice { name: "Alnilam", gender: Gender::Male },
    Voice { name: "Aoede", gender: Gender::Female },
    Voice { name: "Autonoe", gender: Gender::Female },
    Voice { name: "Callirrhoe", gender: Gender::Female },
    Voice { name: "Charon", gender: Gender::Male },
    Voice { name: "Despina", gender: Gender::Female },
    Voice { name: "Enceladus", gender: Gender::Male },
    Voice { name: "Erinome", gender: Gender::Female },
    Voice { name: "Fenrir", gender: Gender::Male },
    Voice { name: "Gacrux", gender: Gender::Female },
    Voice { name: "Iapetus", gender: Gender::Male },
    Voice { name: "Kore", gender: Gender::Female },
    Voice { name: "Laomedeia", gender: Gender::Female },
    Voice { name: "Leda", gender: Gender::Female },
    Voice { name: "Orus", gender: Gender::Male },
    Voice { name: "Pulcherrima", gender: Gender::Female },
    Voice { name: "Puck", gender: Gender::Male },
    Voice { name: "Rasalgethi", gender: Gender::Male },
    Voice { name: "Sadachbia", gender: Gender::Male },
    Voice { name: "Sadaltager", gender: Gender::Male },
    Voice { name: "Schedar", gender: Gender::Male },
    Voice { name: "Sulafat", gender: Gender::Female },
    Voice { name: "Umbriel", gender: Gender::Male },
    Voice { name: "Vindemiatrix", gender: Gender::Female },
    Voice { name: "Zephyr", gender: Gender::Female },
    Voice { name: "Zubenelgenubi", gender: Gender::Male },
];

/// Look up a voice by its exact name.
pub fn find_voice(name: &str) -> Option<&'static Voice> {
    VOICES.iter().find(|v| v.name == name)
}

/// A supported output language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    pub name: &'static str,
    pub tag: &'static str,
}

pub const LANGUAGES: &[Language] = &[
    Language { name: "Arabic (Egypt)", tag: "ar-EG" },
    Language { name: "Bangla (Bangladesh)", tag: "bn-BD" },
    Language { name: "Dutch (Netherlands)", tag: "nl-NL" },
    Language { name: "English (India)", tag: "en-IN" },
    Language { name: "English (United States)", tag: "en-US" },
    Language { name: "English (United Kingdom)", tag: "en-GB" },
    Language { name: "French (France)", tag: "fr-FR" },
    Language { name: "German (Germany)", tag: "de-DE" },
    Language { name: "Hindi (India)", tag: "hi-IN" },
    Language { name: "Indonesian (Indonesia)", tag: "id-ID" },
    Language { name: "Italian (Italy)", tag: "it-IT" },
    Language { name: "Japanese (Japan)", tag: "ja-JP" },
    Language { name: "Korean (South Korea)", tag: "ko-KR" },
    Language { name: "Marathi (India)", tag: "mr-IN" },
    Language { name: "Polish (Poland)", tag: "pl-PL" },
    Language { name: "Portuguese (Brazil)", tag: "pt-BR" },
    Language { name: "Romanian (Romania)", tag: "ro-RO" },
    Language { name: "Russian (Russia)", tag: "ru-RU" },
    Language { name: "Spanish (Spain)", tag: "es-ES" },
    Language { name: "Tamil (India)", tag: "ta-IN" },
    Language { name: "Telugu (India)", tag: "te-IN" },
    Language { name: "Thai (Thailand)", tag: "th-TH" },
    Language { name: "Turkish (Turkey)", tag: "tr-TR" },
    Language { name: "Ukrainian (Ukraine)", tag: "uk-UA" },
    Language { name: "Vietnamese (Vietnam)", tag: "vi-VN" },
];

/// Look up a language by its locale tag (case-insensitive).
pub fn find_language(tag: &str) -> Option<&'static Language> {
    LANGUAGES.iter().find(|l| l.tag.eq_ignore_ascii_case(tag))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_sizes() {
        assert_eq!(VOICES.len(), 30);
        assert_eq!(LANGUAGES.len(), 25);
    }

    #[test]
    fn test_find_voice() {
        let voice = find_voice("Zephyr").unwrap();
        assert_eq!(voice.gender, Gender::Female);
        let voice = find_voice("Puck").unwrap();
        assert_eq!(voice.gender, Gender::Male);
        assert!(find_voice("zephyr").is_none()); // names are exact
        assert!(find_voice("Nonexistent").is_none());
    }

    #[test]
    fn test_find_language() {
        assert_eq!(find_language("en-US").unwrap().name, "English (United States)");
        assert_eq!(find_language("EN-us").unwrap().tag, "en-US");
        assert!(find_language("xx-XX").is_none());
    }

    #[test]
    fn test_voice_names_unique() {
        let mut names: Vec<&str> = VOICES.iter().map(|v| v.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), VOICES.len());
    }
}
