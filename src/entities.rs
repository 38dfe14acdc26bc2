use std::collections::HashSet;
use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

pub const MAX_STATS: usize = 4;
pub const MAX_PROGRESS_ITEMS: usize = 5;
pub const MAX_STEPS: usize = 6;

/// Words dropped from the front of an extracted label.
const LEADING_FILLER: &[&str] = &[
    "in", "of", "for", "the", "a", "an", "our", "new", "more", "total",
];

/// Words that end an extracted label. A label that starts with one of these
/// belongs to the next clause, so the quantity goes unlabelled.
const LABEL_BREAKS: &[&str] = &[
    "and", "or", "with", "while", "but", "in", "to", "from", "for", "over", "by", "this", "last",
    "per", "the", "at", "on", "of", "is", "was", "are", "were", "so", "as", "after", "before",
    "since", "than", "across", "during", "into", "among", "each", "every", "who", "that", "which",
    "signed", "joined", "grew", "increased", "decreased", "dropped", "rose", "reached", "using",
];

const UNIT_WORDS: &[&str] = &["percent", "million", "billion", "thousand", "k", "m", "b"];

const MAX_LABEL_WORDS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatEntity {
    pub value: f64,
    pub label: String,
    pub prefix: String,
    pub suffix: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEntity {
    pub label: String,
    /// Percentage in `0..=100`.
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessStepEntity {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Lower-cased labels already emitted by one parse call.
#[derive(Debug, Default)]
struct SeenLabels(HashSet<String>);

impl SeenLabels {
    fn insert(&mut self, label: &str) -> bool {
        self.0.insert(label.to_lowercase())
    }
}

/// Extracts up to [`MAX_STATS`] numeric facts from narration.
///
/// Three passes run in order over the whole text: dollar amounts, bare
/// numbers with an optional unit, then spelled-out percentages. All passes
/// share one label set, so a label is reported once.
pub fn parse_stats(text: &str) -> Vec<StatEntity> {
    let mut seen = SeenLabels::default();
    let mut stats = Vec::new();

    for pass in [monetary_stats, numeric_stats, word_number_stats] {
        for stat in pass(text) {
            if seen.insert(&stat.label) {
                stats.push(stat);
            }
        }
    }

    stats.truncate(MAX_STATS);
    stats
}

fn monetary_stats(text: &str) -> Vec<StatEntity> {
    static MONETARY_RE: OnceLock<Regex> = OnceLock::new();
    let re = MONETARY_RE.get_or_init(|| {
        Regex::new(
            r"(?i)\$\s?(\d+(?:,\d{3})*(?:\.\d+)?)\s*(million|billion|thousand|k|m|b)?\b\s+([a-z][a-z'\-]*(?:\s+[a-z][a-z'\-]*){0,5})",
        )
        .expect("monetary regex should compile")
    });

    captures_resuming(re, text, &[1, 2])
        .into_iter()
        .filter_map(|capture| {
            let value = parse_amount(capture.get(1)?.as_str())?;
            let suffix = capture
                .get(2)
                .map(|unit| multiplier_suffix(unit.as_str()))
                .unwrap_or_default();
            let label = clean_label(capture.get(3)?.as_str())?;
            let display_value = format!("${}{}", format_amount(value), suffix);
            Some(StatEntity {
                value,
                label,
                prefix: "$".to_owned(),
                suffix: suffix.to_owned(),
                display_value: Some(display_value),
            })
        })
        .collect()
}

fn numeric_stats(text: &str) -> Vec<StatEntity> {
    static NUMERIC_RE: OnceLock<Regex> = OnceLock::new();
    let re = NUMERIC_RE.get_or_init(|| {
        Regex::new(
            r"(?i)(\d+(?:,\d{3})*(?:\.\d+)?)\s*(%|\+|(?:percent|million|billion|thousand|k|m|b)\b)?\s*([a-z][a-z'\-]*(?:\s+[a-z][a-z'\-]*){0,5})",
        )
        .expect("numeric stat regex should compile")
    });

    captures_resuming(re, text, &[1, 2])
        .into_iter()
        .filter_map(|capture| {
            let number = capture.get(1)?;
            // Dollar amounts belong to the monetary pass; digits glued to a
            // word ("Q4", "mp4") are not quantities.
            let before = &text[..number.start()];
            if before.trim_end().ends_with('$')
                || before
                    .chars()
                    .next_back()
                    .is_some_and(|ch| ch.is_alphanumeric())
            {
                return None;
            }

            let value = parse_amount(number.as_str())?;
            let suffix = capture
                .get(2)
                .map(|unit| unit_suffix(unit.as_str()))
                .unwrap_or_default();
            let label = clean_label(capture.get(3)?.as_str())?;
            Some(StatEntity {
                value,
                label,
                prefix: String::new(),
                suffix: suffix.to_owned(),
                display_value: None,
            })
        })
        .collect()
}

fn word_number_stats(text: &str) -> Vec<StatEntity> {
    static WORD_NUMBER_RE: OnceLock<Regex> = OnceLock::new();
    let re = WORD_NUMBER_RE.get_or_init(|| {
        Regex::new(
            r"(?i)\b((?:twenty|thirty|forty|fifty|sixty|seventy|eighty|ninety)(?:[\s\-]+(?:one|two|three|four|five|six|seven|eight|nine)\b)?|one|two|three|four|five|six|seven|eight|nine|ten)\s*(percent\b|%)\s*([a-z][a-z'\-]*(?:\s+[a-z][a-z'\-]*){0,5})",
        )
        .expect("word number regex should compile")
    });

    captures_resuming(re, text, &[2])
        .into_iter()
        .filter_map(|capture| {
            let value = word_number_value(capture.get(1)?.as_str())?;
            let label = clean_label(capture.get(3)?.as_str())?;
            Some(StatEntity {
                value,
                label,
                prefix: String::new(),
                suffix: "%".to_owned(),
                display_value: None,
            })
        })
        .collect()
}

/// Like `captures_iter`, but the next search resumes right after the listed
/// groups instead of after the whole match, so a greedy trailing label cannot
/// swallow the next quantity.
fn captures_resuming<'t>(re: &Regex, text: &'t str, resume_groups: &[usize]) -> Vec<Captures<'t>> {
    let mut found = Vec::new();
    let mut start = 0;
    while start < text.len() {
        let Some(capture) = re.captures_at(text, start) else {
            break;
        };
        let Some(whole) = capture.get(0) else {
            break;
        };
        let resume = resume_groups
            .iter()
            .filter_map(|group| capture.get(*group))
            .map(|group| group.end())
            .max()
            .filter(|end| *end > whole.start())
            .unwrap_or_else(|| whole.end());
        if resume <= start {
            break;
        }
        start = resume;
        found.push(capture);
    }
    found
}

/// Extracts up to [`MAX_PROGRESS_ITEMS`] labelled percentages.
///
/// `label: NN%` is tried first; `NN% of label` only when the first form finds
/// nothing. Forms are never mixed.
pub fn parse_progress(text: &str) -> Vec<ProgressEntity> {
    const STRATEGIES: [fn(&str) -> Vec<ProgressEntity>; 2] =
        [colon_progress_items, percent_of_progress_items];

    for strategy in STRATEGIES {
        let mut seen = SeenLabels::default();
        let mut items = strategy(text)
            .into_iter()
            .filter(|item| seen.insert(&item.label))
            .collect::<Vec<_>>();
        if !items.is_empty() {
            items.truncate(MAX_PROGRESS_ITEMS);
            return items;
        }
    }
    Vec::new()
}

fn colon_progress_items(text: &str) -> Vec<ProgressEntity> {
    static COLON_RE: OnceLock<Regex> = OnceLock::new();
    let re = COLON_RE.get_or_init(|| {
        Regex::new(r"(?i)([a-z][a-z&/'\-]*(?:\s+[a-z&/'\-]+)?)\s*:\s*(\d{1,3}(?:\.\d+)?)\s*%")
            .expect("colon progress regex should compile")
    });

    re.captures_iter(text)
        .filter_map(|capture| {
            let value = percent_value(capture.get(2)?.as_str())?;
            let label = clean_progress_label(capture.get(1)?.as_str())?;
            Some(ProgressEntity { label, value })
        })
        .collect()
}

fn percent_of_progress_items(text: &str) -> Vec<ProgressEntity> {
    static PERCENT_OF_RE: OnceLock<Regex> = OnceLock::new();
    let re = PERCENT_OF_RE.get_or_init(|| {
        Regex::new(
            r"(?i)(\d{1,3}(?:\.\d+)?)\s*(?:%|percent\b)\s*of\s+([a-z][a-z'\-]*(?:\s+[a-z][a-z'\-]*){0,5})",
        )
        .expect("percent-of progress regex should compile")
    });

    re.captures_iter(text)
        .filter_map(|capture| {
            let value = percent_value(capture.get(1)?.as_str())?;
            let label = clean_label(capture.get(2)?.as_str())?;
            Some(ProgressEntity { label, value })
        })
        .collect()
}

/// Extracts up to [`MAX_STEPS`] process steps.
///
/// Forms are tried in order (`step N:`, numbered list, ordinal lead-ins,
/// bullets) and accumulate until at least two steps are known.
pub fn parse_steps(text: &str) -> Vec<ProcessStepEntity> {
    const STRATEGIES: [fn(&str) -> Vec<String>; 4] = [
        explicit_step_lines,
        numbered_list_lines,
        ordinal_lines,
        bullet_lines,
    ];

    let mut seen = SeenLabels::default();
    let mut steps = Vec::new();
    for strategy in STRATEGIES {
        for raw in strategy(text) {
            if steps.len() >= MAX_STEPS {
                break;
            }
            let Some(step) = split_step(&raw) else {
                continue;
            };
            if seen.insert(&step.title) {
                steps.push(step);
            }
        }
        if steps.len() >= 2 {
            break;
        }
    }
    steps
}

fn explicit_step_lines(text: &str) -> Vec<String> {
    static STEP_RE: OnceLock<Regex> = OnceLock::new();
    let re = STEP_RE.get_or_init(|| {
        Regex::new(r"(?i)\bstep\s*(\d+)\s*[:.)\-]\s*([^.;\n]+)")
            .expect("explicit step regex should compile")
    });
    capture_group(re, text, 2)
}

/// `1. text 2. text` or `1) text 2) text`, inline or one per line. Markers
/// must count up from 1; each item runs until the next marker.
fn numbered_list_lines(text: &str) -> Vec<String> {
    static MARKER_RE: OnceLock<Regex> = OnceLock::new();
    let re = MARKER_RE.get_or_init(|| {
        Regex::new(r"(?:^|\s)(\d{1,2})[.)]\s+").expect("numbered list regex should compile")
    });

    let mut markers = Vec::new();
    for capture in re.captures_iter(text) {
        let (Some(whole), Some(number)) = (capture.get(0), capture.get(1)) else {
            continue;
        };
        if number.as_str().parse::<usize>().ok() == Some(markers.len() + 1) {
            markers.push((number.start(), whole.end()));
        }
    }
    if markers.len() < 2 {
        return Vec::new();
    }

    markers
        .iter()
        .enumerate()
        .map(|(index, &(_, body_start))| {
            let body_end = markers.get(index + 1).map_or(text.len(), |next| next.0);
            first_clause(&text[body_start..body_end]).to_owned()
        })
        .collect()
}

fn ordinal_lines(text: &str) -> Vec<String> {
    static ORDINAL_RE: OnceLock<Regex> = OnceLock::new();
    let re = ORDINAL_RE.get_or_init(|| {
        Regex::new(r"(?i)\b(first|second|third|fourth|fifth|sixth|finally)\b[,:]?\s+([^.;\n]+)")
            .expect("ordinal step regex should compile")
    });
    capture_group(re, text, 2)
}

/// `•` bullets anywhere in a line; `-` and `*` only at the start of one.
fn bullet_lines(text: &str) -> Vec<String> {
    let mut items = Vec::new();
    for line in text.lines() {
        if line.contains('•') {
            items.extend(line.split('•').skip(1).map(|item| first_clause(item).to_owned()));
            continue;
        }
        let trimmed = line.trim_start();
        if let Some(item) = trimmed
            .strip_prefix("- ")
            .or_else(|| trimmed.strip_prefix("* "))
        {
            items.push(item.trim().to_owned());
        }
    }
    items
}

/// Text up to the first line break or sentence end.
fn first_clause(raw: &str) -> &str {
    static CLAUSE_END_RE: OnceLock<Regex> = OnceLock::new();
    let re = CLAUSE_END_RE.get_or_init(|| {
        Regex::new(r"\n|[.!?;](?:\s|$)").expect("clause end regex should compile")
    });
    let end = re.find(raw).map_or(raw.len(), |found| found.start());
    raw[..end].trim()
}

fn capture_group(re: &Regex, text: &str, group: usize) -> Vec<String> {
    re.captures_iter(text)
        .filter_map(|capture| capture.get(group))
        .map(|value| value.as_str().to_owned())
        .collect()
}

fn split_step(raw: &str) -> Option<ProcessStepEntity> {
    let raw = raw.trim();
    let (title, description) = [" - ", " – ", " — ", ": "]
        .iter()
        .find_map(|separator| raw.split_once(separator))
        .map_or((raw, None), |(title, rest)| (title, Some(rest)));

    let title = tidy_sentence(title)?;
    let description = description.and_then(tidy_sentence);
    Some(ProcessStepEntity { title, description })
}

fn tidy_sentence(raw: &str) -> Option<String> {
    let trimmed = raw
        .trim()
        .trim_end_matches(|ch: char| matches!(ch, '.' | ',' | ';' | ':' | '!' | '?'))
        .trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(capitalize(trimmed))
}

fn clean_label(raw: &str) -> Option<String> {
    let words = raw
        .split_whitespace()
        .map(|word| word.trim_matches(|ch: char| ch == '\'' || ch == '-'))
        .filter(|word| !word.is_empty())
        .skip_while(|word| LEADING_FILLER.contains(&word.to_ascii_lowercase().as_str()))
        .take_while(|word| !LABEL_BREAKS.contains(&word.to_ascii_lowercase().as_str()))
        .take(MAX_LABEL_WORDS)
        .collect::<Vec<_>>();

    let first = words.first()?.to_ascii_lowercase();
    if UNIT_WORDS.contains(&first.as_str()) {
        return None;
    }
    Some(capitalize(&words.join(" ")))
}

fn clean_progress_label(raw: &str) -> Option<String> {
    let words = raw
        .split_whitespace()
        .skip_while(|word| LABEL_BREAKS.contains(&word.to_ascii_lowercase().as_str()))
        .collect::<Vec<_>>();
    if words.is_empty() {
        return None;
    }
    Some(capitalize(&words.join(" ")))
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn parse_amount(raw: &str) -> Option<f64> {
    raw.replace(',', "").parse::<f64>().ok()
}

fn percent_value(raw: &str) -> Option<f64> {
    parse_amount(raw).filter(|value| (0.0..=100.0).contains(value))
}

fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

fn multiplier_suffix(unit: &str) -> &'static str {
    match unit.to_ascii_lowercase().as_str() {
        "thousand" | "k" => "K",
        "million" | "m" => "M",
        "billion" | "b" => "B",
        _ => "",
    }
}

fn unit_suffix(unit: &str) -> &'static str {
    match unit.to_ascii_lowercase().as_str() {
        "%" | "percent" => "%",
        "+" => "+",
        other => multiplier_suffix(other),
    }
}

fn word_number_value(raw: &str) -> Option<f64> {
    let mut total = 0u32;
    for word in raw
        .split(|ch: char| ch.is_whitespace() || ch == '-')
        .filter(|word| !word.is_empty())
    {
        total += match word.to_ascii_lowercase().as_str() {
            "one" => 1,
            "two" => 2,
            "three" => 3,
            "four" => 4,
            "five" => 5,
            "six" => 6,
            "seven" => 7,
            "eight" => 8,
            "nine" => 9,
            "ten" => 10,
            "twenty" => 20,
            "thirty" => 30,
            "forty" => 40,
            "fifty" => 50,
            "sixty" => 60,
            "seventy" => 70,
            "eighty" => 80,
            "ninety" => 90,
            _ => return None,
        };
    }
    (total > 0).then_some(f64::from(total))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monetary_amounts_carry_prefix_suffix_and_display_value() {
        let stats = parse_stats("We closed $2 million in revenue this quarter.");
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].value, 2.0);
        assert_eq!(stats[0].prefix, "$");
        assert_eq!(stats[0].suffix, "M");
        assert_eq!(stats[0].label, "Revenue");
        assert_eq!(stats[0].display_value.as_deref(), Some("$2M"));
    }

    #[test]
    fn generic_numbers_pick_up_units() {
        let stats = parse_stats("We saw 40% growth and 500+ customers joined.");
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].value, 40.0);
        assert_eq!(stats[0].suffix, "%");
        assert_eq!(stats[0].label, "Growth");
        assert_eq!(stats[1].value, 500.0);
        assert_eq!(stats[1].suffix, "+");
        assert_eq!(stats[1].label, "Customers");
    }

    #[test]
    fn dollar_amounts_are_not_reported_twice() {
        let stats = parse_stats("Revenue hit $3.5 billion revenue after 12 million users signed up.");
        let labels = stats.iter().map(|stat| stat.label.as_str()).collect::<Vec<_>>();
        assert_eq!(labels, vec!["Revenue", "Users"]);
        assert_eq!(stats[0].display_value.as_deref(), Some("$3.5B"));
        assert_eq!(stats[1].suffix, "M");
    }

    #[test]
    fn spelled_out_percentages_are_parsed() {
        let stats = parse_stats("Nearly seventy five percent of teams and ten percent adoption.");
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].value, 75.0);
        assert_eq!(stats[0].label, "Teams");
        assert_eq!(stats[1].value, 10.0);
        assert_eq!(stats[1].label, "Adoption");
    }

    #[test]
    fn labels_never_come_from_the_next_clause() {
        let stats = parse_stats("Revenue grew 40% while churn fell 12% and NPS hit 70 points.");
        let labels = stats.iter().map(|stat| stat.label.as_str()).collect::<Vec<_>>();
        assert_eq!(labels, vec!["Points"]);
        assert_eq!(stats[0].value, 70.0);
    }

    #[test]
    fn stats_are_capped_at_four() {
        let stats = parse_stats("10 apples, 20 pears, 30 plums, 40 figs, 50 limes and 60 dates.");
        assert_eq!(stats.len(), MAX_STATS);
    }

    #[test]
    fn digits_inside_words_are_ignored() {
        assert!(parse_stats("Export the mp4 files for Q4 planning.").is_empty());
    }

    #[test]
    fn colon_progress_items_are_parsed_in_order() {
        let items = parse_progress("Marketing: 40% Sales: 30% Support: 20%");
        assert_eq!(
            items,
            vec![
                ProgressEntity {
                    label: "Marketing".to_owned(),
                    value: 40.0
                },
                ProgressEntity {
                    label: "Sales".to_owned(),
                    value: 30.0
                },
                ProgressEntity {
                    label: "Support".to_owned(),
                    value: 20.0
                },
            ]
        );
    }

    #[test]
    fn percent_of_form_is_the_fallback() {
        let items = parse_progress("We reached 85% of goal and 60% of budget so far.");
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].label, "Goal");
        assert_eq!(items[1].label, "Budget");
    }

    #[test]
    fn progress_forms_are_not_merged() {
        let items = parse_progress("Design: 90% done, while 50% of testing remains.");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].label, "Design");
    }

    #[test]
    fn progress_values_above_one_hundred_are_rejected() {
        let items = parse_progress("Quota: 140% Pipeline: 70%");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].label, "Pipeline");
    }

    #[test]
    fn explicit_steps_are_parsed() {
        let steps = parse_steps("Step 1: Sign up. Step 2: Configure. Step 3: Launch.");
        let titles = steps.iter().map(|step| step.title.as_str()).collect::<Vec<_>>();
        assert_eq!(titles, vec!["Sign up", "Configure", "Launch"]);
    }

    #[test]
    fn numbered_lists_split_descriptions() {
        let steps = parse_steps("1. Plan - outline the goals\n2) Build - ship the code\n3. Review");
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[0].title, "Plan");
        assert_eq!(steps[0].description.as_deref(), Some("Outline the goals"));
        assert_eq!(steps[2].description, None);
    }

    #[test]
    fn inline_numbered_items_end_at_the_next_marker() {
        let steps = parse_steps("1. Gather data 2. Clean it 3. Train the model");
        let titles = steps.iter().map(|step| step.title.as_str()).collect::<Vec<_>>();
        assert_eq!(titles, vec!["Gather data", "Clean it", "Train the model"]);

        let steps = parse_steps("Here is how to do it: 1) plan 2) build 3) ship. Then celebrate.");
        let titles = steps.iter().map(|step| step.title.as_str()).collect::<Vec<_>>();
        assert_eq!(titles, vec!["Plan", "Build", "Ship"]);
    }

    #[test]
    fn numbers_out_of_sequence_are_not_a_list() {
        assert!(parse_steps("Chapter 3. Then we moved on to 7. Done").is_empty());
        assert!(parse_steps("We shipped 1. Nothing else").is_empty());
    }

    #[test]
    fn inline_bullets_are_split() {
        let steps = parse_steps("Pack list: • tent • stove • map");
        let titles = steps.iter().map(|step| step.title.as_str()).collect::<Vec<_>>();
        assert_eq!(titles, vec!["Tent", "Stove", "Map"]);
    }

    #[test]
    fn ordinal_lead_ins_are_parsed() {
        let steps = parse_steps("First, gather your data. Second, clean it. Finally, publish the report.");
        let titles = steps.iter().map(|step| step.title.as_str()).collect::<Vec<_>>();
        assert_eq!(titles, vec!["Gather your data", "Clean it", "Publish the report"]);
    }

    #[test]
    fn bullets_are_the_last_resort() {
        let steps = parse_steps("• Wash\n• Rinse\n* Repeat");
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[2].title, "Repeat");
    }

    #[test]
    fn steps_are_deduplicated_and_capped() {
        let steps = parse_steps(
            "1. Open\n2. open\n3. Edit\n4. Save\n5. Close\n6. Share\n7. Archive\n8. Delete",
        );
        assert_eq!(steps.len(), MAX_STEPS);
        assert_eq!(steps[1].title, "Edit");
    }

    #[test]
    fn plain_prose_yields_nothing() {
        let text = "A quiet afternoon by the lake.";
        assert!(parse_stats(text).is_empty());
        assert!(parse_progress(text).is_empty());
        assert!(parse_steps(text).is_empty());
    }
}
