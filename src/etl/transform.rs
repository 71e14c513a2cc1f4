//! Transformer trait for reshaping extracted data

use eyre::Result;

/// Transformer trait for reshaping one item into another
///
/// Transformers are pure: they never touch the network or the filesystem,
/// so a failure always means the input did not have the expected shape.
///
/// # Example
/// ```
/// use sf_report_metadata::etl::Transformer;
/// use eyre::{Result, eyre};
/// use serde_json::{Value, json};
///
/// struct LabelPicker;
///
/// impl Transformer for LabelPicker {
///     type Input = Value;
///     type Output = String;
///
///     fn transform(&self, input: Self::Input) -> Result<Self::Output> {
///         input["label"]
///             .as_str()
///             .map(str::to_string)
///             .ok_or_else(|| eyre!("missing label"))
///     }
/// }
///
/// let label = LabelPicker.transform(json!({"label": "Opportunities"})).unwrap();
/// assert_eq!(label, "Opportunities");
/// ```
pub trait Transformer: Send + Sync {
    /// Input item type
    type Input: Send;

    /// Output item type after transformation
    type Output: Send;

    /// Transform a single item
    ///
    /// # Errors
    /// Returns an error if the input is missing required data
    fn transform(&self, input: Self::Input) -> Result<Self::Output>;
}
