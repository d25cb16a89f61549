use crate::engine::{Alert, ProbabilityEstimate};
use crate::extract::SpinState;
use crate::types::GameVariant;

const SPINS_HEADER: &str = "=== Spins Since Last Hit ===";
const PROBABILITY_HEADER: &str = "=== Adjusted Next-Spin Probability ===";

/// One cycle's message, assembled from derived state.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub spins: Vec<(GameVariant, String)>,
    pub alerts: Vec<Alert>,
    pub record_line: Option<String>,
    pub probabilities: Option<Vec<ProbabilityEstimate>>,
}

impl Report {
    pub fn compose(
        spins: &SpinState,
        alerts: Vec<Alert>,
        record_line: Option<String>,
        probabilities: Option<Vec<ProbabilityEstimate>>,
    ) -> Self {
        Self {
            spins: GameVariant::ALL
                .iter()
                .map(|&g| (g, spins.display_text(g).to_string()))
                .collect(),
            alerts,
            record_line,
            probabilities,
        }
    }

    /// Sections: spins, then alerts and record (if any), then probabilities (if enabled).
    pub fn render(&self) -> String {
        let mut sections = Vec::new();

        let mut spins = vec![SPINS_HEADER.to_string()];
        spins.extend(self.spins.iter().map(|(g, text)| format!("{g}: {text}")));
        sections.push(spins.join("\n"));

        let notices: Vec<String> = self
            .alerts
            .iter()
            .map(Alert::line)
            .chain(self.record_line.clone())
            .collect();
        if !notices.is_empty() {
            sections.push(notices.join("\n"));
        }

        if let Some(probabilities) = &self.probabilities {
            let mut block = vec![PROBABILITY_HEADER.to_string()];
            block.extend(probabilities.iter().map(ProbabilityEstimate::line));
            sections.push(block.join("\n"));
        }

        sections.join("\n\n")
    }
}

/// Print the message to stdout for local inspection.
pub fn print_report(message: &str) {
    println!("{message}");
}
