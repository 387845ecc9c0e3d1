use serde::{Deserialize, Serialize};

/// Hyper-parameters of the [`QLearningAgent`](crate::QLearningAgent).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QLearningParams {
    /// Step size `α` of the Bellman update.
    pub learning_rate: f32,
    /// Discount `γ` applied to the best future value.
    pub discount_factor: f32,
    /// Exploration rate the agent starts from.
    pub exploration_rate: f32,
    /// Factor applied to the exploration rate on every action choice.
    pub exploration_decay: f32,
    /// Floor the exploration rate never decays below.
    pub min_exploration_rate: f32,
}

impl Default for QLearningParams {
    fn default() -> Self {
        Self {
            learning_rate: 0.2,
            discount_factor: 0.95,
            exploration_rate: 0.4,
            exploration_decay: 0.999,
            min_exploration_rate: 0.05,
        }
    }
}

/// Parameters of the genetic solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneticParams {
    pub population_size: usize,
    pub max_generations: usize,
    /// Probability that a child gets two of its genes swapped.
    pub mutation_rate: f64,
}

impl Default for GeneticParams {
    fn default() -> Self {
        Self {
            population_size: 100,
            max_generations: 1000,
            mutation_rate: 0.1,
        }
    }
}

/// A configuration value outside its allowed range.
#[derive(Debug, Clone, Copy, PartialEq, derive_more::Display, derive_more::Error)]
#[display("{field} must be within [0, 1], got {value}")]
pub struct InvalidConfigError {
    pub field: &'static str,
    pub value: f64,
}

/// Settings shared by every solver, loadable from a JSON file.
///
/// Missing fields take their default values. Loaded files should be checked
/// with [`SolverConfig::validate`] before solving:
///
/// ```
/// use nqueens_solver::SolverConfig;
///
/// let config: SolverConfig = serde_json::from_str(r#"{ "genetic": { "population_size": 50 } }"#).unwrap();
/// assert_eq!(config.genetic.population_size, 50);
/// assert_eq!(config.genetic.max_generations, 1000);
/// assert_eq!(config.max_steps, 1000);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub q_learning: QLearningParams,
    pub genetic: GeneticParams,
    /// Step cap of the Q-learning solve loop.
    pub max_steps: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            q_learning: QLearningParams::default(),
            genetic: GeneticParams::default(),
            max_steps: 1000,
        }
    }
}

impl SolverConfig {
    /// Checks that every rate and probability lies within `[0, 1]`.
    pub fn validate(&self) -> Result<(), InvalidConfigError> {
        let QLearningParams {
            learning_rate,
            discount_factor,
            exploration_rate,
            exploration_decay,
            min_exploration_rate,
        } = self.q_learning;
        let unit_fields = [
            ("q_learning.learning_rate", f64::from(learning_rate)),
            ("q_learning.discount_factor", f64::from(discount_factor)),
            ("q_learning.exploration_rate", f64::from(exploration_rate)),
            ("q_learning.exploration_decay", f64::from(exploration_decay)),
            ("q_learning.min_exploration_rate", f64::from(min_exploration_rate)),
            ("genetic.mutation_rate", self.genetic.mutation_rate),
        ];
        for (field, value) in unit_fields {
            if !(0.0..=1.0).contains(&value) {
                return Err(InvalidConfigError { field, value });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(SolverConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_out_of_range_mutation_rate_is_rejected() {
        let config: SolverConfig = serde_json::from_str(r#"{ "genetic": { "mutation_rate": 1.5 } }"#).unwrap();
        let err = config.validate().unwrap_err();
        assert_eq!(err.field, "genetic.mutation_rate");
        assert!((err.value - 1.5).abs() < f64::EPSILON);
        assert_eq!(err.to_string(), "genetic.mutation_rate must be within [0, 1], got 1.5");
    }

    #[test]
    fn test_nan_and_negative_rates_are_rejected() {
        let mut config = SolverConfig::default();
        config.q_learning.exploration_rate = -0.1;
        assert_eq!(config.validate().unwrap_err().field, "q_learning.exploration_rate");

        let mut config = SolverConfig::default();
        config.genetic.mutation_rate = f64::NAN;
        assert_eq!(config.validate().unwrap_err().field, "genetic.mutation_rate");
    }
}
