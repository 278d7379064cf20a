//! JSON sanitizing of parsed AST trees.

use pagehook_types::Payload;
use serde_json::Value;

/// Keys removed from AST trees before serialization
pub const KEYS_TO_REMOVE: &[&str] = &["position"];

/// Delete every key in `keys` at any depth, in place
pub fn remove_keys(node: &mut Value, keys: &[&str]) {
    match node {
        Value::Object(map) => {
            map.retain(|key, _| !keys.contains(&key.as_str()));
            for value in map.values_mut() {
                remove_keys(value, keys);
            }
        }
        Value::Array(items) => {
            for item in items {
                remove_keys(item, keys);
            }
        }
        _ => {}
    }
}

/// Delete every `position` key at any depth, in place
pub fn remove_positions(node: &mut Value) {
    remove_keys(node, KEYS_TO_REMOVE);
}

/// Drop `body`/`html`, strip positions and serialize the payload.
///
/// The JSON string is stored in `payload.json` and returned.
pub fn sanitize_payload(payload: &mut Payload) -> Result<String, serde_json::Error> {
    if let Some(resource) = payload.resource.as_mut() {
        resource.body = None;
        resource.html = None;

        let trees = [
            resource.mdast.as_mut(),
            resource.htast.as_mut(),
            resource.metadata.as_mut(),
        ];
        for tree in trees.into_iter().flatten() {
            remove_positions(tree);
        }
        for list in [resource.children.as_mut(), resource.nav.as_mut()]
            .into_iter()
            .flatten()
        {
            list.iter_mut().for_each(remove_positions);
        }
        resource.extra.retain(|key, _| !KEYS_TO_REMOVE.contains(&key.as_str()));
        resource.extra.values_mut().for_each(remove_positions);
    }

    payload.extra.retain(|key, _| !KEYS_TO_REMOVE.contains(&key.as_str()));
    payload.extra.values_mut().for_each(remove_positions);

    // A previous serialization is replaced, not nested
    payload.json = None;
    let json = serde_json::to_string(payload)?;
    payload.json = Some(json.clone());
    Ok(json)
}
