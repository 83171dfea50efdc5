//! Grade and assessment of a checked certificate

use serde::Serialize;

/// Overall grade for a certificate, best first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Grade {
    #[serde(rename = "A+")]
    APlus,
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    /// Get the display string for this grade
    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }

    /// The worse of two grades
    pub fn worst(self, other: Grade) -> Grade {
        self.max(other)
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Overall assessment, least severe first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Assessment {
    Secure,
    Monitor,
    UrgentAttention,
    CriticalIssue,
}

impl Assessment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Assessment::Secure => "SECURE",
            Assessment::Monitor => "MONITOR",
            Assessment::UrgentAttention => "URGENT_ATTENTION",
            Assessment::CriticalIssue => "CRITICAL_ISSUE",
        }
    }

    /// The more severe of two assessments
    pub fn most_severe(self, other: Assessment) -> Assessment {
        self.max(other)
    }
}

impl std::fmt::Display for Assessment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_ordering() {
        assert!(Grade::APlus < Grade::A);
        assert!(Grade::D < Grade::F);
        assert_eq!(Grade::B.worst(Grade::D), Grade::D);
        assert_eq!(Grade::A.worst(Grade::APlus), Grade::A);
    }

    #[test]
    fn test_assessment_ordering() {
        assert_eq!(
            Assessment::Monitor.most_severe(Assessment::UrgentAttention),
            Assessment::UrgentAttention
        );
        assert_eq!(
            Assessment::CriticalIssue.most_severe(Assessment::Secure),
            Assessment::CriticalIssue
        );
    }

    #[test]
    fn test_grade_serializes_as_letter() {
        assert_eq!(serde_json::to_string(&Grade::APlus).unwrap(), "\"A+\"");
        assert_eq!(
            serde_json::to_string(&Assessment::UrgentAttention).unwrap(),
            "\"URGENT_ATTENTION\""
        );
    }
}
