use owf_scenario::error::{OwfError, Result};
use serde_json::Value;

/// One polygon feature of the basin map.
///
/// The geometry is carried opaquely for the rendering collaborator; this
/// crate never interprets it.
#[derive(Debug, Clone, PartialEq)]
pub struct BasinFeature {
    /// Basin identifier as spelled by the feature file: a human-readable
    /// name or a numeric code, depending on the dataset family.
    pub basin_id: String,
    pub geometry: Value,
}

/// Parse a GeoJSON FeatureCollection body, reading the basin identifier
/// from `id_property` of each feature's properties.
///
/// Numeric identifiers are kept as their decimal text form so the
/// resolver can treat names and codes uniformly.
pub fn parse_features(body: &str, id_property: &str) -> Result<Vec<BasinFeature>> {
    let root: Value = serde_json::from_str(body)
        .map_err(|e| OwfError::FeatureParse(e.to_string()))?;
    let features = root
        .get("features")
        .and_then(Value::as_array)
        .ok_or_else(|| OwfError::FeatureParse("missing features array".to_string()))?;

    let mut parsed = Vec::with_capacity(features.len());
    for (position, feature) in features.iter().enumerate() {
        let id_value = feature
            .get("properties")
            .and_then(|properties| properties.get(id_property))
            .ok_or_else(|| {
                OwfError::FeatureParse(format!(
                    "feature {position} has no property {id_property:?}"
                ))
            })?;
        let basin_id = match id_value {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            other => {
                return Err(OwfError::FeatureParse(format!(
                    "feature {position} property {id_property:?} is not a string or number: {other}"
                )))
            }
        };
        let geometry = feature.get("geometry").cloned().unwrap_or(Value::Null);
        parsed.push(BasinFeature { basin_id, geometry });
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEATURES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {"NOMBRE": "Cusiana", "CODIGO": 4},
                "geometry": {"type": "Polygon", "coordinates": []}
            },
            {
                "type": "Feature",
                "properties": {"NOMBRE": "Pauto", "CODIGO": 24},
                "geometry": {"type": "Polygon", "coordinates": []}
            }
        ]
    }"#;

    #[test]
    fn test_parse_features_by_name_property() {
        let features = parse_features(FEATURES, "NOMBRE").unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(features[0].basin_id, "Cusiana");
        assert_eq!(features[1].basin_id, "Pauto");
    }

    #[test]
    fn test_parse_features_numeric_property() {
        let features = parse_features(FEATURES, "CODIGO").unwrap();
        assert_eq!(features[0].basin_id, "4");
        assert_eq!(features[1].basin_id, "24");
    }

    #[test]
    fn test_parse_features_missing_property_is_an_error() {
        assert!(parse_features(FEATURES, "NAME").is_err());
    }

    #[test]
    fn test_parse_features_rejects_non_collection() {
        assert!(parse_features("{\"type\": \"Feature\"}", "NOMBRE").is_err());
        assert!(parse_features("not json", "NOMBRE").is_err());
    }
}
