use std::{collections::BTreeMap, ops::Index};

/// A set of named per-episode metrics accumulated by an environment
///
/// Keys are fixed at construction. Values start at zero and are reset by [`Report::take`].
#[derive(Debug, Clone, Default)]
pub struct Report {
    keys: Vec<&'static str>,
    values: BTreeMap<&'static str, f64>,
}

impl Report {
    pub fn new(keys: Vec<&'static str>) -> Self {
        let values = keys.iter().map(|&k| (k, 0.0)).collect();
        Self { keys, values }
    }

    /// The metric names in the order they were declared
    pub fn keys(&self) -> &[&'static str] {
        &self.keys
    }

    /// Mutable access to a metric
    ///
    /// **Panics** if `key` was not declared
    pub fn entry(&mut self, key: &str) -> &mut f64 {
        self.values
            .get_mut(key)
            .unwrap_or_else(|| panic!("Report has no metric named `{key}`"))
    }

    /// Returns the current values in declaration order and zeroes them
    pub fn take(&mut self) -> Vec<f64> {
        self.keys
            .iter()
            .map(|k| {
                let v = self.values.get_mut(k).expect("declared keys are always present");
                std::mem::take(v)
            })
            .collect()
    }
}

impl Index<&str> for Report {
    type Output = f64;

    fn index(&self, key: &str) -> &Self::Output {
        &self.values[key]
    }
}
