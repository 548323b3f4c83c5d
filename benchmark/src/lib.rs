pub mod format;
pub mod generators;
pub mod harness;
pub mod schema;

use std::{io, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::schema::{DatasetInfo, Parameter, PartitionInfo};

#[derive(Debug, Error)]
pub enum BenchError {
    #[error("unable to open {path}: {source}")]
    Open { path: String, source: io::Error },
    #[error("invalid toml file {path}: {source}")]
    Toml { path: String, source: toml::de::Error },
    #[error("failed to write {path}: {source}")]
    Write { path: String, source: serde_json::Error },
    #[error("unknown algorithm `{0}`")]
    UnknownAlgorithm(String),
    #[error("experiment {experiment} refers to unknown dataset `{dataset}`")]
    UnknownDataset { experiment: String, dataset: String },
    #[error("no algorithm matches found")]
    NoMatches,
    #[error("invalid dataset {name}: {reason}")]
    InvalidDataset { name: String, reason: String },
    #[error("value {value} does not fit in {datatype:?}")]
    ValueRange { value: u64, datatype: Datatype },
    #[error("{algorithm} produced an unsorted result")]
    Unsorted { algorithm: String },
}

pub fn path_str(path: &Path) -> &str {
    path.to_str().unwrap_or("<unknown path>")
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum Datatype {
    #[default]
    U32,
    U64,
    I32,
    I64,
}

impl Datatype {
    pub fn bytes(&self) -> usize {
        match self {
            Datatype::U32 => 4,
            Datatype::U64 => 8,
            Datatype::I32 => 4,
            Datatype::I64 => 8,
        }
    }

    pub fn max(&self) -> u64 {
        match self {
            Datatype::U32 => u32::MAX as u64,
            Datatype::U64 => u64::MAX,
            Datatype::I32 => i32::MAX as u64,
            Datatype::I64 => i64::MAX as u64,
        }
    }
}

/// The x values a dataset is generated for, from the base value of the
/// varied parameter up to `to` inclusive.
pub fn xvalues(info: &DatasetInfo) -> impl Iterator<Item = u32> {
    let start = param_value(&info.props, info.vary);
    (start..=info.to).step_by(info.step.max(1) as usize)
}

pub fn props_at_x(info: &DatasetInfo, x: u32) -> PartitionInfo {
    let mut props = info.props.clone();
    let prop = match info.vary {
        Parameter::Size       => &mut props.size,
        Parameter::Skew       => &mut props.skew,
        Parameter::Duplicates => &mut props.duplicates,
    };
    *prop = x;

    props
}

fn param_value(props: &PartitionInfo, parameter: Parameter) -> u32 {
    match parameter {
        Parameter::Size       => props.size,
        Parameter::Skew       => props.skew,
        Parameter::Duplicates => props.duplicates,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(vary: Parameter, to: u32, step: u32) -> DatasetInfo {
        DatasetInfo {
            name: "test".to_string(),
            vary,
            to,
            step,
            gen_count: 1,
            seed: 0,
            datatype: Datatype::U32,
            props: PartitionInfo { size: 10, skew: 0, duplicates: 0 },
        }
    }

    #[test]
    fn xvalues_start_at_base() {
        let info = dataset(Parameter::Size, 16, 2);
        let xs: Vec<u32> = xvalues(&info).collect();
        assert_eq!(xs, [10, 12, 14, 16]);
    }

    #[test]
    fn props_at_x_replaces_varied_parameter() {
        let info = dataset(Parameter::Duplicates, 5000, 1000);
        let props = props_at_x(&info, 3000);
        assert_eq!(props, PartitionInfo { size: 10, skew: 0, duplicates: 3000 });
    }
}
