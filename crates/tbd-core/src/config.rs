//! Configuration for a running story.

use crate::identity::ElementAddress;

/// Fixed regions the host page provides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Regions {
    /// Root that receives every passage.
    pub output: ElementAddress,
    /// Scrollable element wrapping `output`.
    pub output_container: ElementAddress,
    /// Download link for the exported session.
    pub export: ElementAddress,
    /// File picker used to import a session.
    pub import: ElementAddress,
    /// Button opening the reset confirmation.
    pub reset: ElementAddress,
    /// Optional overlay hosting the reset confirmation. When absent the
    /// confirmation replaces the output log until it is dismissed.
    pub dialog: Option<ElementAddress>,
}

impl Default for Regions {
    fn default() -> Self {
        Self {
            output: ElementAddress::fixed("output"),
            output_container: ElementAddress::fixed("output-container"),
            export: ElementAddress::fixed("export"),
            import: ElementAddress::fixed("import"),
            reset: ElementAddress::fixed("reset"),
            dialog: None,
        }
    }
}

/// Configuration for a game session.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Prefix of every generated element address.
    pub namespace: String,
    /// Number of passages kept in the scrollback log.
    pub max_history: usize,
    /// Storage key the session is saved under.
    pub storage_key: String,
    /// File name offered for session downloads.
    pub export_filename: String,
    /// Host regions.
    pub regions: Regions,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            namespace: "troubadour".to_string(),
            max_history: 15,
            storage_key: "troubadour_state".to_string(),
            export_filename: "troubadour.json".to_string(),
            regions: Regions::default(),
        }
    }
}

impl EngineConfig {
    /// Set the address namespace.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Set the history length (at least 1).
    pub fn with_max_history(mut self, max_history: usize) -> Self {
        self.max_history = max_history.max(1);
        self
    }

    /// Set the storage key.
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Set the export file name.
    pub fn with_export_filename(mut self, filename: impl Into<String>) -> Self {
        self.export_filename = filename.into();
        self
    }

    /// Set the host regions.
    pub fn with_regions(mut self, regions: Regions) -> Self {
        self.regions = regions;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.max_history, 15);
        assert_eq!(cfg.storage_key, "troubadour_state");
        assert_eq!(cfg.export_filename, "troubadour.json");
        assert_eq!(cfg.regions.output.as_str(), "output");
        assert!(cfg.regions.dialog.is_none());
    }

    #[test]
    fn builder_methods() {
        let cfg = EngineConfig::default()
            .with_namespace("tale")
            .with_max_history(10)
            .with_storage_key("slot1")
            .with_export_filename("save.json");
        assert_eq!(cfg.namespace, "tale");
        assert_eq!(cfg.max_history, 10);
        assert_eq!(cfg.storage_key, "slot1");
        assert_eq!(cfg.export_filename, "save.json");
    }

    #[test]
    fn history_clamped() {
        let cfg = EngineConfig::default().with_max_history(0);
        assert_eq!(cfg.max_history, 1);
    }
}
