use crate::common::error::KitError;

/// Result alias used across the crate
///
/// # Examples
///
/// ```
/// use vcskit::common::result::KitResult;
/// use vcskit::common::config::ToolConfig;
///
/// fn load() -> KitResult<ToolConfig> {
///     ToolConfig::from_yaml_str("default_branch: main")
/// }
///
/// assert_eq!(load().unwrap().default_branch, "main");
/// ```
pub type KitResult<T> = Result<T, KitError>;
