//! Transcript format validation and parsing.
//!
//! A podcast transcript is loosely structured hand-typed text: an optional
//! block of free-text style instructions followed by `Speaker N:` dialogue
//! lines. Validation runs in two phases — classify every line in order, then
//! apply the structural gates — so the precedence of errors and warnings is
//! fixed regardless of where a problem appears in the input.

use serde::{Deserialize, Serialize};

/// One of the two podcast speakers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Speaker {
    #[serde(rename = "1")]
    One,
    #[serde(rename = "2")]
    Two,
}

impl Speaker {
    pub fn as_str(&self) -> &'static str {
        match self {
            Speaker::One => "1",
            Speaker::Two => "2",
        }
    }

    /// Tag form used in transcripts and voice assignment ("Speaker 1").
    pub fn label(&self) -> &'static str {
        match self {
            Speaker::One => "Speaker 1",
            Speaker::Two => "Speaker 2",
        }
    }
}

/// A single dialogue turn extracted from the transcript.
///
/// Invariant: `text` is non-empty and whitespace-trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueTurn {
    pub speaker: Speaker,
    pub text: String,
}

/// Outcome of validating a transcript.
///
/// At most one error is ever set (the first fatal condition encountered);
/// a warning may coexist with a valid result and never blocks generation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub error: Option<String>,
    pub warning: Option<String>,
    /// Resolved style instructions (user-provided or the caller's default).
    pub style: String,
    pub has_style: bool,
    pub turns: Vec<DialogueTurn>,
    pub speaker_1_count: usize,
    pub speaker_2_count: usize,
}

/// Validate and parse a transcript, falling back to `default_style` when the
/// text carries no style instructions of its own.
///
/// Expected format:
/// ```text
/// {Style instructions} (optional)
/// Speaker 1: dialogue
/// Speaker 2: dialogue
/// ...
/// ```
pub fn validate_transcript(text: &str, default_style: &str) -> ValidationReport {
    let mut report = ValidationReport::default();

    if text.trim().is_empty() {
        report.error = Some("Transcript is empty".into());
        return report;
    }

    // Anchored speaker-tag pattern: the content capture may be empty so that
    // a tagged line with no dialogue is a diagnosable error, not a stray line.
    let speaker_re = regex::Regex::new(r"^Speaker ([12]):\s*(.*)$").unwrap();

    let mut style_lines: Vec<&str> = Vec::new();
    let mut turns: Vec<DialogueTurn> = Vec::new();
    let mut warning: Option<String> = None;
    let mut first_speaker_found = false;

    for (idx, raw) in text.trim().lines().enumerate() {
        let line_num = idx + 1;
        let line = raw.trim();

        if line.is_empty() {
            continue;
        }

        if let Some(caps) = speaker_re.captures(line) {
            first_speaker_found = true;
            let speaker = match &caps[1] {
                "1" => Speaker::One,
                _ => Speaker::Two,
            };
            let content = caps[2].trim();

            if content.is_empty() {
                report.error =
                    Some(format!("Line {line_num}: {} has no dialogue", speaker.label()));
                return report;
            }

            turns.push(DialogueTurn {
                speaker,
                text: content.to_string(),
            });
        } else if !first_speaker_found {
            // Before the first speaker line = style instructions.
            style_lines.push(line);
        } else if warning.is_none() {
            // After speakers started = malformed; first warning wins.
            let preview: String = line.chars().take(50).collect();
            warning = Some(format!(
                "Line {line_num}: Unexpected text after speakers started: '{preview}...'"
            ));
        }
    }

    let speaker_1_count = turns.iter().filter(|t| t.speaker == Speaker::One).count();
    let speaker_2_count = turns.iter().filter(|t| t.speaker == Speaker::Two).count();
    report.speaker_1_count = speaker_1_count;
    report.speaker_2_count = speaker_2_count;

    // Structural gates, in fixed order; the first failure is terminal.
    if turns.is_empty() {
        report.error = Some(
            "No speaker dialogues found. Expected format:\nSpeaker 1: text\nSpeaker 2: text"
                .into(),
        );
        return report;
    }

    if turns.len() < 2 {
        report.error = Some(format!(
            "Need at least 2 speaker lines for a conversation, found only {}. \
             Expected alternating Speaker 1 / Speaker 2 lines",
            turns.len()
        ));
        return report;
    }

    if speaker_1_count == 0 {
        report.error = Some("Missing Speaker 1 lines".into());
        return report;
    }

    if speaker_2_count == 0 {
        report.error = Some("Missing Speaker 2 lines".into());
        return report;
    }

    if !style_lines.is_empty() {
        report.style = style_lines.join("\n");
    } else {
        if warning.is_none() {
            warning = Some(
                "No style instructions found. Consider adding tone/style guidance \
                 before speaker lines to set the tone of the conversation"
                    .into(),
            );
        }
        report.style = default_style.to_string();
    }

    report.has_style = true;
    report.warning = warning;
    report.valid = true;
    report.turns = turns;
    report
}
