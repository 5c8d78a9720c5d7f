// Device line classification for free-form model names
use std::fmt;

use serde::Serialize;

/// Device lines shown on the board, declared in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum DeviceLine {
    Iphone17ProMax,
    Iphone17Pro,
    Iphone17Air,
    Iphone17,
    Iphone16ProMax,
    Iphone16Plus,
    Iphone16,
    Iphone16e,
}

enum Rule {
    Contains(&'static str),
    Exact(&'static str),
}

impl Rule {
    fn matches(&self, model: &str) -> bool {
        match self {
            Rule::Contains(needle) => model.contains(needle),
            Rule::Exact(name) => model.trim() == *name,
        }
    }
}

// Evaluated top to bottom. "17 Pro Max" has to come before "17 Pro".
const RULES: &[(Rule, DeviceLine)] = &[
    (Rule::Contains("17 Pro Max"), DeviceLine::Iphone17ProMax),
    (Rule::Contains("17 Pro"), DeviceLine::Iphone17Pro),
    (Rule::Contains("17 Air"), DeviceLine::Iphone17Air),
    (Rule::Exact("iPhone 17"), DeviceLine::Iphone17),
    (Rule::Contains("16 Pro Max"), DeviceLine::Iphone16ProMax),
    (Rule::Contains("16 Plus"), DeviceLine::Iphone16Plus),
    (Rule::Exact("iPhone 16"), DeviceLine::Iphone16),
    (Rule::Contains("16e"), DeviceLine::Iphone16e),
];

impl DeviceLine {
    pub const ALL: [DeviceLine; 8] = [
        DeviceLine::Iphone17ProMax,
        DeviceLine::Iphone17Pro,
        DeviceLine::Iphone17Air,
        DeviceLine::Iphone17,
        DeviceLine::Iphone16ProMax,
        DeviceLine::Iphone16Plus,
        DeviceLine::Iphone16,
        DeviceLine::Iphone16e,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DeviceLine::Iphone17ProMax => "iPhone 17 Pro Max",
            DeviceLine::Iphone17Pro => "iPhone 17 Pro",
            DeviceLine::Iphone17Air => "iPhone 17 Air",
            DeviceLine::Iphone17 => "iPhone 17",
            DeviceLine::Iphone16ProMax => "iPhone 16 Pro Max",
            DeviceLine::Iphone16Plus => "iPhone 16 Plus",
            DeviceLine::Iphone16 => "iPhone 16",
            DeviceLine::Iphone16e => "iPhone 16e",
        }
    }

    /// Returns the first line whose rule matches, or `None` for models the
    /// board does not list (e.g. "iPhone 16 Pro", "iPhone 15").
    pub fn classify(model: &str) -> Option<DeviceLine> {
        RULES
            .iter()
            .find(|(rule, _)| rule.matches(model))
            .map(|(_, line)| *line)
    }
}

impl fmt::Display for DeviceLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
