//! JSON layer configuration files.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::LayerSet;
use crate::error::ConfigError;
use crate::noise::NoiseBackend;

/// Contents of a layer configuration file.
///
/// Accepts either a bare JSON array of layers or an object with a `layers`
/// field and optional overrides for the seed, noise backend and base radius:
///
/// ```json
/// { "seed": 7, "backend": "perlin", "base_radius": 5.0,
///   "layers": [ { "num_octaves": 6, "strength": 0.4 } ] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayerSetFile {
    pub seed: Option<u32>,
    pub backend: Option<NoiseBackend>,
    pub base_radius: Option<f32>,
    pub layers: LayerSet,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FileShape {
    Bare(LayerSet),
    Full(LayerSetFile),
}

impl LayerSetFile {
    /// Wraps a layer set with no overrides.
    pub fn from_layers(layers: LayerSet) -> Self {
        Self {
            layers,
            ..Default::default()
        }
    }

    /// Parses and validates a layer configuration.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let file = match serde_json::from_str::<FileShape>(text)? {
            FileShape::Bare(layers) => Self::from_layers(layers),
            FileShape::Full(file) => file,
        };
        file.layers.validate()?;
        Ok(file)
    }

    /// Reads and validates a layer configuration from disk.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let file = Self::from_json_str(&text)?;
        tracing::debug!(
            path = %path.display(),
            layers = file.layers.len(),
            "loaded layer config"
        );
        Ok(file)
    }

    /// Renders the configuration as pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DeformError;
    use crate::noise::NoiseLayerParams;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_bare_array() {
        let file = LayerSetFile::from_json_str(
            r#"[ { "num_octaves": 2 }, { "strength": 0.1, "min_value": 0.0 } ]"#,
        )
        .unwrap();
        assert_eq!(file.layers.len(), 2);
        assert_eq!(file.layers.get(0).unwrap().num_octaves, 2);
        assert_eq!(file.layers.get(1).unwrap().strength, 0.1);
        assert_eq!(file.seed, None);
    }

    #[test]
    fn test_object_with_overrides() {
        let file = LayerSetFile::from_json_str(
            r#"{ "seed": 7, "backend": "perlin", "base_radius": 3.5, "layers": [ {} ] }"#,
        )
        .unwrap();
        assert_eq!(file.seed, Some(7));
        assert_eq!(file.backend, Some(NoiseBackend::Perlin));
        assert_eq!(file.base_radius, Some(3.5));
        assert_eq!(*file.layers.get(0).unwrap(), NoiseLayerParams::default());
    }

    #[test]
    fn test_misspelled_keys_are_rejected() {
        for text in [
            r#"{ "Layers": [ {} ] }"#,
            r#"{ "layer": [ { "num_octaves": 3 } ] }"#,
            r#"[ { "octaves": 3 } ]"#,
            r#"{ "layers": [ { "strenght": 0.2 } ] }"#,
        ] {
            let err = LayerSetFile::from_json_str(text).unwrap_err();
            assert!(matches!(err, ConfigError::Json(_)), "{} gave {:?}", text, err);
        }
    }

    #[test]
    fn test_invalid_layer_is_rejected() {
        let err = LayerSetFile::from_json_str(r#"[ {}, { "num_octaves": 0 } ]"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid(DeformError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_malformed_json() {
        let err = LayerSetFile::from_json_str("[ { ").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_load_from_disk_round_trips_printed_config() {
        let mut layers = LayerSet::new();
        layers.push(NoiseLayerParams::smooth());
        layers.push(NoiseLayerParams::rugged());
        let before = LayerSetFile {
            seed: Some(42),
            ..LayerSetFile::from_layers(layers)
        };

        let mut tmp = NamedTempFile::new().unwrap();
        tmp.write_all(before.to_json_string().unwrap().as_bytes()).unwrap();

        let loaded = LayerSetFile::load(tmp.path()).unwrap();
        assert_eq!(loaded, before);
    }

    #[test]
    fn test_missing_file() {
        let err = LayerSetFile::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
