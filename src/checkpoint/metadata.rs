use std::fmt;

use crate::ai::Knowledge;

/// Summary of a saved model, printed by `mnk --status`.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelReport {
    pub iterations: u64,
    pub learned_states: usize,
    /// Greatest value in the table, never below 0.
    pub max_value: f64,
    /// Smallest value in the table, never above 0.
    pub min_value: f64,
    pub random_dispersion: Vec<u64>,
}

impl ModelReport {
    pub fn from_knowledge(knowledge: &Knowledge) -> Self {
        let (max_value, min_value) = knowledge
            .values
            .values()
            .fold((0.0_f64, 0.0_f64), |(max, min), &v| (max.max(v), min.min(v)));
        ModelReport {
            iterations: knowledge.iterations,
            learned_states: knowledge.learned_states(),
            max_value,
            min_value,
            random_dispersion: knowledge.random_dispersion.clone(),
        }
    }
}

impl fmt::Display for ModelReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Iterations: {}", self.iterations)?;
        writeln!(f, "Learned states: {}", self.learned_states)?;
        writeln!(f, "Maximum value: {:.6}", self.max_value)?;
        write!(f, "Minimum value: {:.6}", self.min_value)?;
        if !self.random_dispersion.is_empty() {
            let counts: Vec<String> = self
                .random_dispersion
                .iter()
                .map(u64::to_string)
                .collect();
            write!(f, "\nRandom dispersion: [{}]", counts.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_from_knowledge() {
        let mut knowledge = Knowledge::new();
        knowledge.iterations = 12;
        knowledge.values.insert("a".into(), 0.5);
        knowledge.values.insert("b".into(), -0.25);
        knowledge.values.insert("c".into(), 0.16);

        let report = ModelReport::from_knowledge(&knowledge);
        assert_eq!(report.iterations, 12);
        assert_eq!(report.learned_states, 3);
        assert_eq!(report.max_value, 0.5);
        assert_eq!(report.min_value, -0.25);
    }

    #[test]
    fn test_report_extremes_start_at_zero() {
        let mut knowledge = Knowledge::new();
        knowledge.values.insert("a".into(), 0.3);
        knowledge.values.insert("b".into(), 0.7);
        let report = ModelReport::from_knowledge(&knowledge);
        assert_eq!((report.max_value, report.min_value), (0.7, 0.0));

        let empty = ModelReport::from_knowledge(&Knowledge::new());
        assert_eq!((empty.max_value, empty.min_value), (0.0, 0.0));
    }

    #[test]
    fn test_report_display() {
        let mut knowledge = Knowledge::new();
        knowledge.iterations = 3;
        knowledge.values.insert("a".into(), 1.0);
        knowledge.random_dispersion = vec![2, 0, 1];
        let text = ModelReport::from_knowledge(&knowledge).to_string();
        assert_eq!(
            text,
            "Iterations: 3\nLearned states: 1\nMaximum value: 1.000000\n\
             Minimum value: 0.000000\nRandom dispersion: [2, 0, 1]"
        );
    }
}
