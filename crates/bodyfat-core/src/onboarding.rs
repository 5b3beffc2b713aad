//! First-launch onboarding carousel.

/// One carousel slide
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slide {
    /// Heading
    pub title: &'static str,
    /// Body text
    pub description: &'static str,
}

/// The fixed carousel content
pub const SLIDES: [Slide; 3] = [
    Slide {
        title: "Track Your Progress",
        description: "Upload your photos and see how your body composition changes over time. Our AI analyzes your progress accurately.",
    },
    Slide {
        title: "Get Accurate Results",
        description: "Receive precise body fat percentage calculations. See real transformations from high to low body fat percentages.",
    },
    Slide {
        title: "Achieve Your Goals",
        description: "Get personalized nutrition plans and workout recommendations. Join thousands who have successfully transformed their bodies.",
    },
];

/// Result of pressing "Next"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnboardingStep {
    /// Now showing the slide at this index
    Slide(usize),
    /// The last slide was confirmed
    Complete,
}

/// Carousel position
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Onboarding {
    current: usize,
}

impl Onboarding {
    /// Start at the first slide
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the visible slide
    pub fn current(&self) -> usize {
        self.current
    }

    /// Visible slide
    pub fn slide(&self) -> &'static Slide {
        &SLIDES[self.current]
    }

    /// True on the last slide, where the button reads "Start"
    pub fn is_last(&self) -> bool {
        self.current == SLIDES.len() - 1
    }

    /// Advance, or complete when already on the last slide
    pub fn next(&mut self) -> OnboardingStep {
        if self.is_last() {
            OnboardingStep::Complete
        } else {
            self.current += 1;
            OnboardingStep::Slide(self.current)
        }
    }

    /// Jump to a slide (dot press). Out-of-range indices are ignored.
    pub fn go_to(&mut self, index: usize) -> bool {
        if index < SLIDES.len() {
            self.current = index;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_walks_then_completes() {
        let mut onboarding = Onboarding::new();
        assert_eq!(onboarding.next(), OnboardingStep::Slide(1));
        assert_eq!(onboarding.next(), OnboardingStep::Slide(2));
        assert!(onboarding.is_last());
        assert_eq!(onboarding.next(), OnboardingStep::Complete);
        assert_eq!(onboarding.current(), 2);
    }

    #[test]
    fn test_dot_press() {
        let mut onboarding = Onboarding::new();
        assert!(onboarding.go_to(2));
        assert_eq!(onboarding.slide().title, "Achieve Your Goals");
        assert!(!onboarding.go_to(3));
        assert_eq!(onboarding.current(), 2);
    }
}
