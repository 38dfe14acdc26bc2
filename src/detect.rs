use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::entities::{
    parse_progress, parse_stats, parse_steps, ProcessStepEntity, ProgressEntity, StatEntity,
};

const STEP_KEYWORDS: [&str; 8] = [
    "step",
    "first",
    "second",
    "third",
    "fourth",
    "process",
    "procedure",
    "how to",
];

const PERCENT_KEYWORDS: [&str; 5] = ["percent", "%", "progress", "completion", "rate"];

/// Template families that narration alone can select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NarrationTemplate {
    ProcessFlow,
    ProgressBar,
    StatCounter,
}

impl NarrationTemplate {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::ProcessFlow => "process-flow",
            Self::ProgressBar => "progress-bar",
            Self::StatCounter => "stat-counter",
        }
    }
}

impl fmt::Display for NarrationTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Picks at most one narration template.
///
/// Priority is process flow, then progress bar, then stat counter. A family
/// wins on two or more parsed entities, or on a single entity backed by one of
/// its keywords.
pub fn detect_type(text: &str) -> Option<NarrationTemplate> {
    let lower = text.to_lowercase();

    let steps = parse_steps(text).len();
    if steps >= 3 || (steps >= 2 && contains_any(&lower, &STEP_KEYWORDS)) {
        debug!(steps, "narration detected as process flow");
        return Some(NarrationTemplate::ProcessFlow);
    }

    let progress = parse_progress(text).len();
    if progress >= 2 || (progress >= 1 && contains_any(&lower, &PERCENT_KEYWORDS)) {
        debug!(progress, "narration detected as progress bar");
        return Some(NarrationTemplate::ProgressBar);
    }

    let stats = parse_stats(text).len();
    if stats >= 2 || (stats >= 1 && has_number_keyword(text)) {
        debug!(stats, "narration detected as stat counter");
        return Some(NarrationTemplate::StatCounter);
    }

    debug!(steps, progress, stats, "no narration template detected");
    None
}

/// Detected family plus every entity list parsed from the same text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectionReport {
    pub detected: Option<NarrationTemplate>,
    pub stats: Vec<StatEntity>,
    pub progress: Vec<ProgressEntity>,
    pub steps: Vec<ProcessStepEntity>,
}

pub fn detection_report(text: &str) -> DetectionReport {
    DetectionReport {
        detected: detect_type(text),
        stats: parse_stats(text),
        progress: parse_progress(text),
        steps: parse_steps(text),
    }
}

fn has_number_keyword(text: &str) -> bool {
    static NUMBER_KEYWORD_RE: OnceLock<Regex> = OnceLock::new();
    let re = NUMBER_KEYWORD_RE.get_or_init(|| {
        Regex::new(r"(?i)million|billion|thousand|\d+\s*(?:users|customers|sales|revenue|growth)")
            .expect("number keyword regex should compile")
    });
    re.is_match(text)
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}
