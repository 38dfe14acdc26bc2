use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const MIN_SPLIT_PANELS: usize = 2;
pub const MAX_SPLIT_PANELS: usize = 4;
const MAX_SPLIT_LABEL_CHARS: usize = 39;

const DEFAULT_BEFORE_LABEL: &str = "Before";
const DEFAULT_AFTER_LABEL: &str = "After";

const QUOTE_CHARS: &[char] = &['\'', '"', '‘', '’', '“', '”'];

/// Layout cues that can trail a label list; never panel labels themselves.
const LAYOUT_WORDS: &[&str] = &[
    "vertical",
    "vertically",
    "horizontal",
    "horizontally",
    "grid",
    "stacked",
    "layout",
    "side",
    "by",
    "split",
    "screen",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DirectionKind {
    BeforeAfter,
    Pip,
    SplitScreen,
    Unknown,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionStyle {
    #[default]
    Slider,
    Fade,
    Wipe,
    Flip,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PipPosition {
    TopLeft,
    TopRight,
    BottomLeft,
    #[default]
    BottomRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SplitLayout {
    #[serde(rename = "horizontal")]
    Horizontal,
    #[serde(rename = "vertical")]
    Vertical,
    #[serde(rename = "3-horizontal")]
    ThreeHorizontal,
    #[serde(rename = "3-vertical")]
    ThreeVertical,
    #[serde(rename = "4-grid")]
    FourGrid,
}

impl SplitLayout {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
            Self::ThreeHorizontal => "3-horizontal",
            Self::ThreeVertical => "3-vertical",
            Self::FourGrid => "4-grid",
        }
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Self::Vertical | Self::ThreeVertical)
    }

    /// Layout for `panel_count` panels given the direction's cues.
    pub fn for_panels(panel_count: usize, vertical: bool, grid: bool) -> Self {
        match panel_count {
            0..=2 if vertical => Self::Vertical,
            0..=2 => Self::Horizontal,
            3 if grid => Self::FourGrid,
            3 if vertical => Self::ThreeVertical,
            3 => Self::ThreeHorizontal,
            _ => Self::FourGrid,
        }
    }
}

/// Panel and transition intent read from a visual direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectionIntent {
    #[serde(rename = "type")]
    pub kind: DirectionKind,
    pub panel_count: usize,
    pub labels: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<SplitLayout>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition_style: Option<TransitionStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pip_position: Option<PipPosition>,
}

impl DirectionIntent {
    fn unknown() -> Self {
        Self {
            kind: DirectionKind::Unknown,
            panel_count: 0,
            labels: Vec::new(),
            layout: None,
            transition_style: None,
            pip_position: None,
        }
    }
}

/// Reads panel intent from free text. Before/after wins over
/// picture-in-picture, which wins over split screen.
pub fn parse_direction(text: &str) -> DirectionIntent {
    let lower = text.to_lowercase();

    let intent = if has_word(&lower, "before") && has_word(&lower, "after") {
        before_after_intent(text, &lower)
    } else if is_pip(&lower) {
        pip_intent(&lower)
    } else if is_split(&lower) {
        split_intent(text, &lower)
    } else {
        DirectionIntent::unknown()
    };

    debug!(kind = ?intent.kind, panels = intent.panel_count, "parsed visual direction");
    intent
}

fn before_after_intent(text: &str, lower: &str) -> DirectionIntent {
    let transition_style = if has_word(lower, "fade") {
        TransitionStyle::Fade
    } else if has_word(lower, "wipe") {
        TransitionStyle::Wipe
    } else if has_word(lower, "flip") {
        TransitionStyle::Flip
    } else {
        TransitionStyle::Slider
    };

    DirectionIntent {
        kind: DirectionKind::BeforeAfter,
        panel_count: 2,
        labels: before_after_labels(text),
        layout: None,
        transition_style: Some(transition_style),
        pip_position: None,
    }
}

fn before_after_labels(text: &str) -> Vec<String> {
    static PAIR_RE: OnceLock<Regex> = OnceLock::new();
    static BEFORE_RE: OnceLock<Regex> = OnceLock::new();
    static AFTER_RE: OnceLock<Regex> = OnceLock::new();

    let pair = PAIR_RE.get_or_init(|| {
        Regex::new(
            r#"(?i)['"‘“]([^'"‘’“”]{1,60})['"’”]\s*(?:vs\.?|versus|to|and|->|→)\s*['"‘“]([^'"‘’“”]{1,60})['"’”]"#,
        )
        .expect("before/after pair regex should compile")
    });
    if let Some(capture) = pair.captures(text) {
        let before = capture.get(1).and_then(|value| tidy_label(value.as_str()));
        let after = capture.get(2).and_then(|value| tidy_label(value.as_str()));
        if let (Some(before), Some(after)) = (before, after) {
            return vec![before, after];
        }
    }

    let keyed = |re: &Regex| {
        re.captures(text)
            .and_then(|capture| capture.get(1))
            .and_then(|value| tidy_label(value.as_str()))
    };
    let before = keyed(BEFORE_RE.get_or_init(|| {
        Regex::new(r#"(?i)\bbefore\s*:\s*['"‘“]([^'"‘’“”]{1,60})['"’”]"#)
            .expect("before label regex should compile")
    }));
    let after = keyed(AFTER_RE.get_or_init(|| {
        Regex::new(r#"(?i)\bafter\s*:\s*['"‘“]([^'"‘’“”]{1,60})['"’”]"#)
            .expect("after label regex should compile")
    }));

    vec![
        before.unwrap_or_else(|| DEFAULT_BEFORE_LABEL.to_owned()),
        after.unwrap_or_else(|| DEFAULT_AFTER_LABEL.to_owned()),
    ]
}

fn is_pip(lower: &str) -> bool {
    lower.contains("picture in picture")
        || lower.contains("picture-in-picture")
        || has_word(lower, "pip")
        || has_word(lower, "overlay")
}

fn pip_intent(lower: &str) -> DirectionIntent {
    let top = has_word(lower, "top");
    let bottom = has_word(lower, "bottom");
    let left = has_word(lower, "left");
    let right = has_word(lower, "right");

    let position = match (top, bottom, left, right) {
        (true, _, true, _) => PipPosition::TopLeft,
        (true, _, _, true) => PipPosition::TopRight,
        (_, true, true, _) => PipPosition::BottomLeft,
        _ => PipPosition::BottomRight,
    };

    DirectionIntent {
        kind: DirectionKind::Pip,
        panel_count: 2,
        labels: Vec::new(),
        layout: None,
        transition_style: None,
        pip_position: Some(position),
    }
}

fn is_split(lower: &str) -> bool {
    has_word(lower, "split")
        || lower.contains("side by side")
        || lower.contains("side-by-side")
        || has_word(lower, "comparison")
        || has_word(lower, "grid")
}

fn split_intent(text: &str, lower: &str) -> DirectionIntent {
    let (count, counted_in_rows) = split_panel_count(lower);
    let panel_count = count.clamp(MIN_SPLIT_PANELS, MAX_SPLIT_PANELS);
    let vertical = counted_in_rows
        || has_word(lower, "vertical")
        || has_word(lower, "stacked")
        || lower.contains("top and bottom");
    let layout = SplitLayout::for_panels(panel_count, vertical, has_word(lower, "grid"));

    DirectionIntent {
        kind: DirectionKind::SplitScreen,
        panel_count,
        labels: split_labels(text, panel_count),
        layout: Some(layout),
        transition_style: None,
        pip_position: None,
    }
}

/// Panel count from `"<N> panel|way|screen|part|column|row"`, defaulting to
/// two. The flag reports whether the count was given in rows.
fn split_panel_count(lower: &str) -> (usize, bool) {
    static COUNT_RE: OnceLock<Regex> = OnceLock::new();
    let re = COUNT_RE.get_or_init(|| {
        Regex::new(r"\b(\d+|two|three|four)\s*-?\s*(panel|way|screen|part|column|row)s?\b")
            .expect("panel count regex should compile")
    });

    let Some(capture) = re.captures(lower) else {
        return (MIN_SPLIT_PANELS, false);
    };
    let count = capture
        .get(1)
        .and_then(|value| match value.as_str() {
            "two" => Some(2),
            "three" => Some(3),
            "four" => Some(4),
            digits => digits.parse::<usize>().ok(),
        })
        .unwrap_or(MIN_SPLIT_PANELS);
    let rows = capture.get(2).is_some_and(|unit| unit.as_str() == "row");
    (count, rows)
}

/// Labels from a `showing/comparing/displaying/with` clause, at most one per
/// panel.
fn split_labels(text: &str, panel_count: usize) -> Vec<String> {
    static CLAUSE_RE: OnceLock<Regex> = OnceLock::new();
    static SEPARATOR_RE: OnceLock<Regex> = OnceLock::new();

    let clause = CLAUSE_RE.get_or_init(|| {
        Regex::new(r"(?i)\b(?:showing|comparing|displaying|with)\b\s*:?\s*([^.;\n]+)")
            .expect("split label clause regex should compile")
    });
    let separator = SEPARATOR_RE.get_or_init(|| {
        Regex::new(r"(?i)\s*,\s*|\s+(?:and|vs\.?|versus)\s+")
            .expect("split label separator regex should compile")
    });

    let Some(list) = clause.captures(text).and_then(|capture| capture.get(1)) else {
        return Vec::new();
    };

    separator
        .split(list.as_str())
        .filter_map(tidy_label)
        .filter(|label| label.chars().count() <= MAX_SPLIT_LABEL_CHARS)
        .filter(|label| !is_layout_cue(label))
        .take(panel_count)
        .collect()
}

fn is_layout_cue(label: &str) -> bool {
    label
        .to_lowercase()
        .split(|ch: char| !ch.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .all(|word| LAYOUT_WORDS.contains(&word))
}

fn tidy_label(raw: &str) -> Option<String> {
    let label = raw.trim().trim_matches(QUOTE_CHARS).trim();
    (!label.is_empty()).then(|| label.to_owned())
}

fn has_word(lower: &str, word: &str) -> bool {
    lower
        .split(|ch: char| !ch.is_alphanumeric())
        .any(|candidate| candidate == word)
}
