//! Candidate route models
//!
//! Routes are produced by an external routing provider and are immutable once
//! fetched. A route is made of legs, each leg of steps.

use serde::{Deserialize, Serialize};

/// Instruction text used for the synthetic route when no alternatives exist
pub const PLACEHOLDER_INSTRUCTION: &str = "Direct route";

/// Text shown for distances and durations that are not known
pub const NOT_AVAILABLE: &str = "N/A";

/// A single navigation step
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Step {
    /// Step returned by a routing provider
    Rich {
        instruction: String,
        distance: String,
        duration: String,
    },
    /// Bare instruction without distance or duration
    Plain { text: String },
}

impl Step {
    pub fn rich(
        instruction: impl Into<String>,
        distance: impl Into<String>,
        duration: impl Into<String>,
    ) -> Self {
        Step::Rich {
            instruction: instruction.into(),
            distance: distance.into(),
            duration: duration.into(),
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Step::Plain { text: text.into() }
    }

    /// Raw instruction text, possibly containing provider markup
    pub fn instruction(&self) -> &str {
        match self {
            Step::Rich { instruction, .. } => instruction,
            Step::Plain { text } => text,
        }
    }

    /// Instruction with provider markup removed
    pub fn clean_instruction(&self) -> String {
        strip_html(self.instruction())
    }

    pub fn distance(&self) -> &str {
        match self {
            Step::Rich { distance, .. } => distance,
            Step::Plain { .. } => NOT_AVAILABLE,
        }
    }

    pub fn duration(&self) -> &str {
        match self {
            Step::Rich { duration, .. } => duration,
            Step::Plain { .. } => NOT_AVAILABLE,
        }
    }

    /// Human readable line, numbered from 1
    pub fn render(&self, index: usize) -> String {
        match self {
            Step::Rich {
                instruction,
                distance,
                duration,
            } => format!(
                "Step {}: {} ({}, {})",
                index,
                strip_html(instruction),
                distance,
                duration
            ),
            Step::Plain { text } => format!("Step {}: {}", index, text),
        }
    }
}

/// One leg of a route
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Leg {
    pub distance_text: String,
    pub duration_text: String,
    pub duration_seconds: u64,
    pub distance_meters: u64,
    pub steps: Vec<Step>,
}

/// A candidate route between origin and destination
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CandidateRoute {
    #[serde(default)]
    pub summary: String,
    pub legs: Vec<Leg>,
}

impl CandidateRoute {
    pub fn new(legs: Vec<Leg>) -> Self {
        Self {
            summary: String::new(),
            legs,
        }
    }

    /// Synthetic single-leg, single-step route used when the provider
    /// returned no alternatives
    pub fn placeholder() -> Self {
        Self {
            summary: PLACEHOLDER_INSTRUCTION.to_string(),
            legs: vec![Leg {
                distance_text: NOT_AVAILABLE.to_string(),
                duration_text: NOT_AVAILABLE.to_string(),
                duration_seconds: 0,
                distance_meters: 0,
                steps: vec![Step::plain(PLACEHOLDER_INSTRUCTION)],
            }],
        }
    }

    /// Total travel time across all legs
    pub fn duration_seconds(&self) -> u64 {
        self.legs.iter().map(|l| l.duration_seconds).sum()
    }

    pub fn steps(&self) -> impl Iterator<Item = &Step> {
        self.legs.iter().flat_map(|l| l.steps.iter())
    }

    /// Cleaned instruction text of every step, in order
    pub fn instructions(&self) -> Vec<String> {
        self.steps().map(Step::clean_instruction).collect()
    }

    /// Numbered, human readable steps
    pub fn rendered_steps(&self) -> Vec<String> {
        self.steps()
            .enumerate()
            .map(|(i, step)| step.render(i + 1))
            .collect()
    }

    pub fn total_distance_text(&self) -> String {
        join_leg_texts(self.legs.iter().map(|l| l.distance_text.as_str()))
    }

    pub fn total_duration_text(&self) -> String {
        join_leg_texts(self.legs.iter().map(|l| l.duration_text.as_str()))
    }
}

fn join_leg_texts<'a>(texts: impl Iterator<Item = &'a str>) -> String {
    let joined: Vec<&str> = texts.collect();
    if joined.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        joined.join(" + ")
    }
}

/// Remove markup tags from provider instructions.
///
/// `<div>` boundaries become a single space so that trailing notes such as
/// "Toll road" stay separated from the main instruction.
pub fn strip_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut tag = String::new();
    let mut in_tag = false;

    for c in input.chars() {
        match (in_tag, c) {
            (false, '<') => {
                in_tag = true;
                tag.clear();
            }
            (false, _) => out.push(c),
            (true, '>') => {
                in_tag = false;
                if tag.trim_start().to_ascii_lowercase().starts_with("div") {
                    out.push(' ');
                }
            }
            (true, _) => tag.push(c),
        }
    }

    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_bold_tags() {
        assert_eq!(
            strip_html("Turn <b>left</b> onto <b>Main Rd</b>"),
            "Turn left onto Main Rd"
        );
    }

    #[test]
    fn test_strip_div_keeps_separation() {
        let raw = "Take the ramp onto <b>N1</b><div style=\"font-size:0.9em\">Toll road</div>";
        assert_eq!(strip_html(raw), "Take the ramp onto N1 Toll road");
    }

    #[test]
    fn test_placeholder_shape() {
        let route = CandidateRoute::placeholder();
        assert_eq!(route.legs.len(), 1);
        assert_eq!(route.legs[0].steps, vec![Step::plain("Direct route")]);
        assert_eq!(route.duration_seconds(), 0);
        assert_eq!(route.rendered_steps(), vec!["Step 1: Direct route"]);
    }

    #[test]
    fn test_render_rich_step() {
        let step = Step::rich("Head <b>north</b>", "1.2 km", "3 mins");
        assert_eq!(step.render(2), "Step 2: Head north (1.2 km, 3 mins)");
    }

    #[test]
    fn test_totals_join_legs() {
        let leg = |d: &str, t: &str, s: u64| Leg {
            distance_text: d.to_string(),
            duration_text: t.to_string(),
            duration_seconds: s,
            distance_meters: 0,
            steps: Vec::new(),
        };
        let route = CandidateRoute::new(vec![leg("5 km", "6 mins", 360), leg("2 km", "3 mins", 180)]);
        assert_eq!(route.duration_seconds(), 540);
        assert_eq!(route.total_distance_text(), "5 km + 2 km");
        assert_eq!(route.total_duration_text(), "6 mins + 3 mins");
    }
}
