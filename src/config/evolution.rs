use super::traits::{ConfigSection, FieldSpec, Rule};
use serde::{Deserialize, Serialize};

/// Parameters for the NEAT-style neuroevolution loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlgorithmParameters {
    pub pop_size: usize,
    pub max_generations: usize,
    pub fitness_threshold: f64,
    #[serde(flatten)]
    pub mutation: MutationRates,
    pub crossover_rate: f64,
    #[serde(flatten)]
    pub topology: NetworkTopology,
    #[serde(flatten)]
    pub speciation: Speciation,
    #[serde(flatten)]
    pub novelty: NoveltySearch,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationRates {
    #[serde(rename = "activation_mutation_rate")]
    pub activation: f64,
    #[serde(rename = "connection_mutation_rate")]
    pub connection: f64,
    #[serde(rename = "node_mutation_rate")]
    pub node: f64,
    #[serde(rename = "weight_mutation_rate")]
    pub weight: f64,
    #[serde(rename = "weight_mutation_strength")]
    pub weight_strength: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkTopology {
    #[serde(rename = "input_nodes")]
    pub inputs: usize,
    pub hidden_layers: Vec<usize>,
    #[serde(rename = "output_nodes")]
    pub outputs: usize,
    pub activation_functions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Speciation {
    pub compatibility_threshold: f64,
    #[serde(rename = "species_elitism")]
    pub elitism: usize,
    #[serde(rename = "stagnation_threshold")]
    pub stagnation_generations: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoveltySearch {
    #[serde(rename = "use_novelty_search")]
    pub enabled: bool,
    #[serde(rename = "novelty_k_nearest")]
    pub k_nearest: usize,
    #[serde(rename = "novelty_threshold")]
    pub threshold: f64,
}

const SCHEMA: &[FieldSpec] = &[
    FieldSpec::new("pop_size", Rule::Count, "Genomes per generation"),
    FieldSpec::new("max_generations", Rule::Count, "Generation limit for a run"),
    FieldSpec::new("fitness_threshold", Rule::Probability, "Fitness that ends a run early"),
    FieldSpec::new("activation_mutation_rate", Rule::Probability, "Chance to swap a node activation"),
    FieldSpec::new("connection_mutation_rate", Rule::Probability, "Chance to add a connection"),
    FieldSpec::new("node_mutation_rate", Rule::Probability, "Chance to split a connection with a node"),
    FieldSpec::new("weight_mutation_rate", Rule::Probability, "Chance to perturb a weight"),
    FieldSpec::new("weight_mutation_strength", Rule::NonNegative, "Scale of weight perturbation"),
    FieldSpec::new("crossover_rate", Rule::Probability, "Chance offspring come from crossover"),
    FieldSpec::new("input_nodes", Rule::Count, "Indicator and market features fed to the network"),
    FieldSpec::new("hidden_layers", Rule::Widths, "Initial hidden layer widths"),
    FieldSpec::new("output_nodes", Rule::Count, "Action outputs (buy, sell, hold)"),
    FieldSpec::new("activation_functions", Rule::Names, "Activations available to mutation"),
    FieldSpec::new("compatibility_threshold", Rule::Positive, "Genomic distance that splits species"),
    FieldSpec::new("species_elitism", Rule::Count, "Champions kept per species"),
    FieldSpec::new("stagnation_threshold", Rule::Count, "Generations without progress before a species is culled"),
    FieldSpec::new("use_novelty_search", Rule::Flag, "Reward behavioural novelty alongside fitness"),
    FieldSpec::new("novelty_k_nearest", Rule::Count, "Neighbours used for the novelty score"),
    FieldSpec::new("novelty_threshold", Rule::Probability, "Novelty needed to enter the archive"),
];

impl Default for AlgorithmParameters {
    fn default() -> Self {
        Self {
            pop_size: 200,
            max_generations: 500,
            fitness_threshold: 0.95,
            mutation: MutationRates {
                activation: 0.3,
                connection: 0.5,
                node: 0.2,
                weight: 0.8,
                weight_strength: 0.5,
            },
            crossover_rate: 0.75,
            topology: NetworkTopology {
                inputs: 30,
                hidden_layers: vec![20, 15, 10],
                outputs: 3,
                activation_functions: vec![
                    "relu".to_string(),
                    "sigmoid".to_string(),
                    "tanh".to_string(),
                ],
            },
            speciation: Speciation {
                compatibility_threshold: 3.0,
                elitism: 2,
                stagnation_generations: 15,
            },
            novelty: NoveltySearch {
                enabled: true,
                k_nearest: 15,
                threshold: 0.3,
            },
        }
    }
}

impl ConfigSection for AlgorithmParameters {
    fn section_name() -> &'static str {
        "algorithm"
    }

    fn schema() -> &'static [FieldSpec] {
        SCHEMA
    }
}
