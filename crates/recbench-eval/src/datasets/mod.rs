//! Dataset loading for evaluation.

mod loader;

pub use loader::{load_interactions, DatasetError};

use recbench_core::types::{InteractionLog, ItemId};
use std::collections::HashSet;
use std::path::Path;

/// A loaded evaluation dataset ready for use.
#[derive(Debug)]
pub struct EvalDataset {
    /// Dataset name for reporting
    pub name: String,
    /// Held-out interactions the recommenders are scored against
    pub test: InteractionLog,
    /// Interactions the baselines and the novelty table are built from
    pub train: InteractionLog,
}

impl EvalDataset {
    /// Number of test interactions
    pub fn num_test_rows(&self) -> usize {
        self.test.len()
    }

    /// Number of training interactions
    pub fn num_train_rows(&self) -> usize {
        self.train.len()
    }

    /// Number of distinct users in the test log
    pub fn num_test_users(&self) -> usize {
        self.test.users().len()
    }

    /// Every item seen in either log
    pub fn item_universe(&self) -> HashSet<ItemId> {
        let mut items = self.train.items();
        items.extend(self.test.items());
        items
    }
}

/// Loads the test and training logs from `data_dir`.
///
/// The dataset is named after the directory.
pub fn load_dataset(
    data_dir: &Path,
    test_file: &str,
    train_file: &str,
) -> Result<EvalDataset, DatasetError> {
    let test = load_interactions(&data_dir.join(test_file))?;
    let train = load_interactions(&data_dir.join(train_file))?;

    let name = data_dir
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("dataset")
        .to_string();

    Ok(EvalDataset { name, test, train })
}
