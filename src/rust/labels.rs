//! The seven output classes of the classifier and their display metadata.
//!
//! Index order matches the output head of the model artifact and must never
//! change.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Number of output classes the model produces.
pub const NUM_LABELS: usize = 7;

/// A mental-health category predicted by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Label {
    Anxiety,
    Bipolar,
    Depression,
    Normal,
    PersonalityDisorder,
    Stress,
    Suicidal,
}

/// Coping tips and external links shown alongside a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Resources {
    /// Marks labels that should surface crisis-support information. This is
    /// static metadata, not a risk assessment.
    pub is_crisis: bool,
    pub tips: &'static [&'static str],
    pub links: &'static [(&'static str, &'static str)],
}

/// A crisis support line: name, contact URL and short instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CrisisLine {
    pub name: &'static str,
    pub url: &'static str,
    pub instruction: &'static str,
}

pub const CRISIS_TITLE: &str = "Crisis Support";

pub const CRISIS_LINES: &[CrisisLine] = &[
    CrisisLine {
        name: "988 Suicide & Crisis Lifeline (US)",
        url: "tel:988",
        instruction: "Call or text 988",
    },
    CrisisLine {
        name: "Crisis Text Line",
        url: "https://www.crisistextline.org",
        instruction: "Text HOME to 741741",
    },
    CrisisLine {
        name: "International Crisis Centres",
        url: "https://www.iasp.info/resources/Crisis_Centres/",
        instruction: "Find support near you",
    },
];

impl Label {
    /// All labels in model index order.
    pub const ALL: [Label; NUM_LABELS] = [
        Label::Anxiety,
        Label::Bipolar,
        Label::Depression,
        Label::Normal,
        Label::PersonalityDisorder,
        Label::Stress,
        Label::Suicidal,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Looks a label up by its display name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|label| label.name().eq_ignore_ascii_case(name))
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Anxiety => "Anxiety",
            Self::Bipolar => "Bipolar",
            Self::Depression => "Depression",
            Self::Normal => "Normal",
            Self::PersonalityDisorder => "Personality Disorder",
            Self::Stress => "Stress",
            Self::Suicidal => "Suicidal",
        }
    }

    /// Display color as a hex string.
    pub fn color(self) -> &'static str {
        match self {
            Self::Anxiety => "#FFD166",
            Self::Bipolar => "#F4A261",
            Self::Depression => "#E76F91",
            Self::Normal => "#06D6A0",
            Self::PersonalityDisorder => "#9B72CF",
            Self::Stress => "#FF9E6D",
            Self::Suicidal => "#EF233C",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Anxiety => "😰",
            Self::Bipolar => "🔄",
            Self::Depression => "😔",
            Self::Normal => "😊",
            Self::PersonalityDisorder => "🧩",
            Self::Stress => "😤",
            Self::Suicidal => "🆘",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Anxiety => {
                "Anxiety is characterised by persistent worry, tension, and a sense of unease. \
                 The text shows signs of fear, nervousness, or excessive concern about everyday situations."
            }
            Self::Bipolar => {
                "Bipolar disorder involves episodes of extreme mood swings, from manic highs to depressive lows. \
                 The text reflects shifting energy levels, grandiosity, or intense emotional states."
            }
            Self::Depression => {
                "Depression is marked by persistent sadness, loss of interest, and low energy. \
                 The text expresses hopelessness, fatigue, or a lack of motivation."
            }
            Self::Normal => {
                "The text reflects a balanced and healthy emotional state. \
                 No significant mental health indicators were detected."
            }
            Self::PersonalityDisorder => {
                "Personality disorders affect how a person thinks, feels, and relates to others. \
                 The text may reflect unstable self-image, impulsivity, or turbulent relationships."
            }
            Self::Stress => {
                "Stress is the body's reaction to challenging situations. \
                 The text shows signs of being overwhelmed, pressured, or burned out."
            }
            Self::Suicidal => {
                "The text contains indicators associated with suicidal ideation: thoughts of self-harm or ending one's life. \
                 If this reflects your current state, please reach out for help immediately."
            }
        }
    }

    pub fn is_crisis(self) -> bool {
        matches!(self, Self::Depression | Self::Suicidal)
    }

    pub fn resources(self) -> Resources {
        match self {
            Self::Anxiety => Resources {
                is_crisis: false,
                tips: &[
                    "Box breathing: inhale 4s, hold 4s, exhale 4s, hold 4s",
                    "Practice the 5-4-3-2-1 grounding technique to stay present",
                    "Limit caffeine and social media before bed",
                    "Take a short walk; physical movement reduces cortisol",
                    "Write down your worries to externalize and examine them",
                ],
                links: &[
                    ("ADAA - Anxiety & Depression Association", "https://adaa.org"),
                    ("MindTools - Stress & Anxiety Resources", "https://www.mindtools.com/"),
                    ("Calm App", "https://www.calm.com"),
                ],
            },
            Self::Bipolar => Resources {
                is_crisis: false,
                tips: &[
                    "Maintain a consistent sleep schedule; irregular sleep can trigger episodes",
                    "Keep a mood log to identify triggers and patterns",
                    "Regular moderate exercise stabilises mood",
                    "Do not skip prescribed medications without consultation",
                    "Join a bipolar support group to share experiences",
                ],
                links: &[
                    ("DBSA - Depression & Bipolar Support Alliance", "https://www.dbsalliance.org"),
                    (
                        "NAMI Bipolar Disorder",
                        "https://www.nami.org/About-Mental-Illness/Mental-Health-Conditions/Bipolar-Disorder",
                    ),
                    ("Headspace", "https://www.headspace.com"),
                ],
            },
            Self::Depression => Resources {
                is_crisis: true,
                tips: &[
                    "Get sunlight exposure within 1 hour of waking; it boosts serotonin",
                    "Journaling your feelings for 10 minutes daily can provide relief",
                    "Reach out to one trusted person today; isolation worsens depression",
                    "Even 20 minutes of exercise has antidepressant effects",
                    "Set one small, achievable goal for the day",
                ],
                links: &[
                    (
                        "NAMI Depression Resources",
                        "https://www.nami.org/About-Mental-Illness/Mental-Health-Conditions/Depression",
                    ),
                    ("7 Cups - Free Emotional Support Chat", "https://www.7cups.com"),
                    ("BetterHelp Online Therapy", "https://www.betterhelp.com"),
                ],
            },
            Self::Normal => Resources {
                is_crisis: false,
                tips: &[
                    "Keep nurturing your mental wellness with regular self-check-ins",
                    "Prioritise 7-9 hours of quality sleep each night",
                    "Practice mindfulness or meditation for 5-10 minutes daily",
                    "Maintain meaningful social connections",
                    "Engage in a creative hobby that brings you joy",
                ],
                links: &[
                    ("WHO Mental Health", "https://www.who.int/health-topics/mental-health"),
                    ("Headspace", "https://www.headspace.com"),
                    ("Mental Health America", "https://www.mhanational.org"),
                ],
            },
            Self::PersonalityDisorder => Resources {
                is_crisis: false,
                tips: &[
                    "Look into DBT (Dialectical Behaviour Therapy)",
                    "Practise mindfulness to observe emotions without reacting impulsively",
                    "Keep a diary card to track emotions and urges",
                    "Seek support from a trained mental health professional",
                    "Recovery is possible with consistency and professional support",
                ],
                links: &[
                    ("TARA for BPD", "https://www.tara4bpd.org"),
                    ("DBT Self-Help", "https://www.dbtselfhelp.com"),
                    (
                        "Psychology Today - Find a Therapist",
                        "https://www.psychologytoday.com/us/therapists",
                    ),
                ],
            },
            Self::Stress => Resources {
                is_crisis: false,
                tips: &[
                    "Make a priority list and tackle the most critical task first",
                    "Use the Pomodoro Technique: 25 min focus, 5 min break",
                    "Learn to say no to protect your time and energy",
                    "Stay hydrated and eat balanced meals",
                    "Listen to music or nature sounds to wind down",
                ],
                links: &[
                    ("APA Stress Management", "https://www.apa.org/topics/stress"),
                    ("Insight Timer - Free Meditation", "https://insighttimer.com"),
                    ("Stress Management Society", "https://www.stress.org.uk"),
                ],
            },
            Self::Suicidal => Resources {
                is_crisis: true,
                tips: &[
                    "Please call or text 988 (Suicide & Crisis Lifeline) right now",
                    "Go to your nearest emergency room if you are in immediate danger",
                    "Tell someone you trust how you are feeling",
                    "Remove access to means of self-harm if possible",
                    "A trained counsellor is available 24/7; your life has value",
                ],
                links: &[
                    ("988 Suicide & Crisis Lifeline (Call/Text 988)", "https://988lifeline.org"),
                    ("Crisis Text Line - Text HOME to 741741", "https://www.crisistextline.org"),
                    (
                        "International Association for Suicide Prevention",
                        "https://www.iasp.info/resources/Crisis_Centres/",
                    ),
                ],
            },
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown label: {0}")]
pub struct UnknownLabel(pub String);

impl FromStr for Label {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| UnknownLabel(s.to_string()))
    }
}

// String-keyed accessors for callers holding label names (CSV columns,
// history records). Unknown names yield empty metadata instead of failing.

pub fn label_name(index: usize) -> Option<&'static str> {
    Label::from_index(index).map(Label::name)
}

pub fn label_color(name: &str) -> &'static str {
    Label::from_name(name).map_or("", Label::color)
}

pub fn label_icon(name: &str) -> &'static str {
    Label::from_name(name).map_or("", Label::icon)
}

pub fn label_description(name: &str) -> &'static str {
    Label::from_name(name).map_or("", Label::description)
}

pub fn label_resources(name: &str) -> Resources {
    Label::from_name(name).map(Label::resources).unwrap_or_default()
}
