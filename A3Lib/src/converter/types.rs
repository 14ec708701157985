//! Types for conversion progress tracking
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT

// ============================================================================
// Progress Types
// ============================================================================

/// Progress callback type for file conversions
pub type ConvertProgressCallback<'a> = &'a (dyn Fn(&ConvertProgress) + Sync + Send);

/// Progress information during a file conversion
#[derive(Debug, Clone)]
pub struct ConvertProgress {
    /// Current operation phase
    pub phase: ConvertPhase,
    /// Current step number (1-indexed)
    pub current: usize,
    /// Total number of steps
    pub total: usize,
    /// Description of the current step (if applicable)
    pub current_file: Option<String>,
}

impl ConvertProgress {
    /// Create a new progress update
    #[must_use]
    pub fn new(phase: ConvertPhase, current: usize, total: usize) -> Self {
        Self {
            phase,
            current,
            total,
            current_file: None,
        }
    }

    /// Create a progress update with a step description
    #[must_use]
    pub fn with_file(
        phase: ConvertPhase,
        current: usize,
        total: usize,
        file: impl Into<String>,
    ) -> Self {
        Self {
            phase,
            current,
            total,
            current_file: Some(file.into()),
        }
    }

    /// Get the progress percentage (0.0 - 1.0)
    #[must_use]
    pub fn percentage(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            self.current as f32 / self.total as f32
        }
    }
}

/// Phase of a conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvertPhase {
    /// Reading and decoding the source file
    ReadingSource,
    /// Transforming between representations
    Converting,
    /// Writing the output file
    WritingOutput,
}

impl ConvertPhase {
    /// Get a human-readable description of this phase
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ReadingSource => "Reading source",
            Self::Converting => "Converting",
            Self::WritingOutput => "Writing output",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage() {
        assert_eq!(ConvertProgress::new(ConvertPhase::Converting, 2, 4).percentage(), 0.5);
        assert_eq!(ConvertProgress::new(ConvertPhase::ReadingSource, 0, 0).percentage(), 1.0);
        let step = ConvertProgress::with_file(ConvertPhase::WritingOutput, 3, 3, "out.cpp");
        assert_eq!(step.current_file.as_deref(), Some("out.cpp"));
        assert_eq!(step.phase.as_str(), "Writing output");
    }
}
