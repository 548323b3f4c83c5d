use std::collections::HashMap;

use serde::{Serialize, Deserialize};

use crate::Datatype;

pub type DatasetId = String;
pub type AlgorithmId = String;

// An integer i represents the percentage value i/PERCENT_F (from 0.0 to 1.0)
pub const PERCENT: u32 = 10000;
pub const PERCENT_F: f64 = PERCENT as f64;

#[derive(Serialize, Deserialize, Debug)]
pub struct Experiment {
    pub experiment: Vec<ExperimentEntry>,
    pub dataset: Vec<DatasetInfo>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ExperimentEntry {
    pub name: String,
    pub title: String,
    pub dataset: DatasetId,
    pub algorithms: Vec<AlgorithmId>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct DatasetInfo {
    pub name: DatasetId,
    pub vary: Parameter,
    pub to: u32,
    pub step: u32,
    pub gen_count: usize,
    pub seed: u64,
    #[serde(default)]
    pub datatype: Datatype,
    #[serde(flatten)]
    pub props: PartitionInfo,
}

/// Shape of one generated slice of two sorted partitions.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct PartitionInfo {
    /// log2 of the slice length.
    pub size: u32,
    /// log2 of the ratio between the first and second partition lengths.
    pub skew: u32,
    /// Share of the value domain given up to repeats, in PERCENT units.
    /// 0 draws from a domain as large as the slice.
    pub duplicates: u32,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum Parameter {
    Size,
    Skew,
    Duplicates,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct Results {
    pub experiments: Vec<ExperimentEntry>,
    pub datasets: HashMap<DatasetId, DatasetResults>,
}

pub type AlgorithmResults = HashMap<AlgorithmId, Vec<ResultRun>>;

#[derive(Serialize, Deserialize, Debug)]
pub struct DatasetResults {
    pub info: DatasetInfo,
    pub algos: AlgorithmResults
}

#[derive(Serialize, Deserialize, Debug, Default)]
pub struct ResultRun {
    pub x: u32,
    // Nanoseconds
    pub times: Vec<u64>,
    // Predicate calls
    pub comparisons: Vec<u64>,
}

impl ResultRun {
    pub fn new(x: u32) -> Self {
        Self { x, ..Default::default() }
    }
}
