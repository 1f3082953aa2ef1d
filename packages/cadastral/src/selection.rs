//! Layer selection parameters for highlighting a single object.

use serde::{Deserialize, Serialize};

use crate::{CadastralId, ObjectType};

/// Parameters that restrict a map service to one cadastral object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionQuery {
    /// Object kind being selected.
    #[serde(rename = "type")]
    pub object_type: ObjectType,
    /// Identifier embedded in the filter expressions.
    pub cid: String,
    /// `MapServer` URL serving the layers.
    pub url: String,
    /// `show:<ids>` layer visibility parameter.
    pub layers: String,
    /// JSON object mapping each layer id to an `id = '<cid>'` filter.
    pub layer_defs: String,
}

impl SelectionQuery {
    /// Builds the selection for `cid` on the layers of `object_type`.
    #[must_use]
    pub fn new(object_type: ObjectType, cid: &CadastralId, layers_api_url: &str) -> Self {
        Self {
            object_type,
            cid: cid.to_string(),
            url: object_type.service_url(layers_api_url),
            layers: layers_param(object_type),
            layer_defs: layer_defs(object_type, cid),
        }
    }

    /// Query parameters for the selected-object image request.
    #[must_use]
    pub fn image_params(&self, bbox: &str) -> Vec<(&'static str, String)> {
        vec![
            ("bbox", bbox.to_string()),
            ("id", self.cid.clone()),
            ("type", self.object_type.to_string()),
            ("layerDefs", self.layer_defs.clone()),
        ]
    }
}

/// `show:6,7,8,9` for the object type's layers.
#[must_use]
pub fn layers_param(object_type: ObjectType) -> String {
    let ids: Vec<String> = object_type
        .layers()
        .iter()
        .map(ToString::to_string)
        .collect();
    format!("show:{}", ids.join(","))
}

/// Per-layer filter definitions, e.g. `{"6":"id = '50:41:30401:1'"}`.
///
/// Single quotes in the id are doubled so the value stays one SQL string
/// literal even for hand-built [`CadastralId`]s.
#[must_use]
pub fn layer_defs(object_type: ObjectType, cid: &CadastralId) -> String {
    let literal = sql_string_literal(&cid.to_string());
    let defs: serde_json::Map<String, serde_json::Value> = object_type
        .layers()
        .iter()
        .map(|layer| (layer.to_string(), format!("id = {literal}").into()))
        .collect();
    serde_json::Value::Object(defs).to_string()
}

fn sql_string_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAYERS_API: &str = "https://egrn.click/next/api/layers";

    fn cid(s: &str) -> CadastralId {
        s.parse().unwrap()
    }

    #[test]
    fn parcel_selection() {
        let query = SelectionQuery::new(ObjectType::Zu, &cid("50:41:0030401:1"), LAYERS_API);
        assert_eq!(query.layers, "show:6,7,8,9");
        assert_eq!(
            query.layer_defs,
            r#"{"6":"id = '50:41:30401:1'","7":"id = '50:41:30401:1'","8":"id = '50:41:30401:1'","9":"id = '50:41:30401:1'"}"#
        );
        assert!(query.url.ends_with("/PKK6/CadastreSelected/MapServer"));
    }

    #[test]
    fn single_layer_selection() {
        assert_eq!(layers_param(ObjectType::Zouit), "show:0");
        assert_eq!(
            layer_defs(ObjectType::Zone, &cid("77:1:1:1")),
            r#"{"6":"id = '77:1:1:1'"}"#
        );
    }

    #[test]
    fn image_params_carry_bbox_and_type() {
        let query = SelectionQuery::new(ObjectType::Oks, &cid("1:2:3:4"), LAYERS_API);
        let params = query.image_params("0,0,10,4");
        assert_eq!(params[0], ("bbox", "0,0,10,4".to_string()));
        assert_eq!(params[1], ("id", "1:2:3:4".to_string()));
        assert_eq!(params[2], ("type", "oks".to_string()));
        assert_eq!(params[3].0, "layerDefs");
    }

    #[test]
    fn quotes_in_hand_built_ids_stay_inside_the_literal() {
        let id = CadastralId {
            district: "1' OR '1'='1".to_string(),
            block: "1".to_string(),
            parcel: "1".to_string(),
            sub_parcel: "1".to_string(),
        };
        let defs: serde_json::Value =
            serde_json::from_str(&layer_defs(ObjectType::Zone, &id)).unwrap();
        assert_eq!(defs["6"], "id = '1'' OR ''1''=''1:1:1:1'");
    }
}
