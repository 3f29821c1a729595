//! # Template Normalization
//!
//! Tolerant ingestion of template JSON at the boundary. Stored templates come
//! from many app versions; this module absorbs the drift so the rest of the
//! engine only ever sees a well-formed [`Template`]. Unknown block kinds
//! become content blocks, missing fields take their defaults, and broken
//! orders are rewritten sequentially — each with a warning, none an error.

use serde_json::Value;
use tracing::warn;

use crate::model::{BlockKind, ContentConfig, Template, TemplateBlock, TemplateSettings};

/// Known block kind tags, matching the serde tag values of [`BlockKind`].
const KNOWN_KINDS: [&str; 5] = ["header", "program", "resources", "content", "footer"];

/// Normalize raw template JSON into a [`Template`].
///
/// Never fails: a value that is not even an object yields the default
/// template (no blocks, default settings).
pub fn normalize(raw: Value) -> Template {
    let Value::Object(mut map) = raw else {
        warn!("template root is not an object, using default template");
        return Template::default();
    };

    let settings = match map.remove("settings") {
        Some(value) => match serde_json::from_value::<TemplateSettings>(value) {
            Ok(settings) => settings,
            Err(err) => {
                warn!(%err, "unreadable template settings, using defaults");
                TemplateSettings::default()
            }
        },
        None => TemplateSettings::default(),
    };

    let raw_blocks = match map.remove("blocks") {
        Some(Value::Array(blocks)) => blocks,
        Some(_) => {
            warn!("template blocks field is not an array, ignoring");
            vec![]
        }
        None => vec![],
    };

    let mut blocks: Vec<TemplateBlock> = raw_blocks
        .into_iter()
        .enumerate()
        .filter_map(|(i, value)| normalize_block(i, value))
        .collect();

    // Ids key the solved-layout map; a duplicate would silently collapse
    // two blocks onto one rectangle. Rename later occurrences.
    let mut seen = std::collections::BTreeSet::new();
    for (i, block) in blocks.iter_mut().enumerate() {
        if !seen.insert(block.id.clone()) {
            let mut suffix = i;
            let fresh = loop {
                let candidate = format!("{}-{suffix}", block.id);
                if seen.insert(candidate.clone()) {
                    break candidate;
                }
                suffix += 1;
            };
            warn!(index = i, old = %block.id, new = %fresh, "duplicate block id, renaming");
            block.id = fresh;
        }
    }

    // Orders must be strictly increasing and duplicate-free for the solver's
    // top-to-bottom stacking to be deterministic. Sort by whatever was
    // stored, then rewrite sequentially.
    blocks.sort_by_key(|b| b.order);
    let mut rewrote = false;
    for (i, block) in blocks.iter_mut().enumerate() {
        if block.order != i as u32 {
            rewrote = true;
            block.order = i as u32;
        }
    }
    if rewrote {
        warn!("template block orders were not sequential, rewrote them");
    }

    Template { blocks, settings }
}

fn normalize_block(index: usize, mut value: Value) -> Option<TemplateBlock> {
    let Some(obj) = value.as_object_mut() else {
        warn!(index, "dropping non-object template block");
        return None;
    };

    // Blocks need a stable id; synthesize one when missing.
    if !obj.get("id").map(Value::is_string).unwrap_or(false) {
        warn!(index, "template block has no id, synthesizing one");
        obj.insert("id".to_string(), Value::String(format!("block-{index}")));
    }

    // An unknown or absent kind tag becomes a content block rather than
    // dropping stored data on the floor.
    let kind_ok = obj
        .get("type")
        .and_then(Value::as_str)
        .map(|t| KNOWN_KINDS.contains(&t))
        .unwrap_or(false);
    if !kind_ok {
        let seen = obj.get("type").and_then(Value::as_str).unwrap_or("<none>");
        warn!(index, kind = seen, "unknown block kind, treating as content");
        obj.insert("type".to_string(), Value::String("content".to_string()));
        obj.remove("config");
    }

    match serde_json::from_value::<TemplateBlock>(value) {
        Ok(block) => Some(block),
        Err(err) => {
            // Config shape drifted beyond what defaults absorb; keep the
            // block as an unconfigured content block.
            warn!(index, %err, "block config unreadable, keeping as bare content block");
            Some(TemplateBlock {
                id: format!("block-{index}"),
                order: index as u32,
                kind: BlockKind::Content {
                    config: ContentConfig::default(),
                },
                content: None,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_well_formed_template_passes_through() {
        let raw = json!({
            "blocks": [
                {"id": "h", "order": 0, "type": "header"},
                {"id": "p", "order": 1, "type": "program"}
            ],
            "settings": {"fontFamily": "Georgia", "fontSize": 11.0}
        });
        let template = normalize(raw);
        assert_eq!(template.blocks.len(), 2);
        assert_eq!(template.settings.font_family, "Georgia");
        assert!(matches!(template.blocks[0].kind, BlockKind::Header { .. }));
    }

    #[test]
    fn test_unknown_kind_becomes_content() {
        let raw = json!({
            "blocks": [{"id": "x", "order": 0, "type": "hologram"}]
        });
        let template = normalize(raw);
        assert_eq!(template.blocks.len(), 1);
        assert!(matches!(template.blocks[0].kind, BlockKind::Content { .. }));
        assert_eq!(template.blocks[0].id, "x");
    }

    #[test]
    fn test_orders_rewritten_sequentially() {
        let raw = json!({
            "blocks": [
                {"id": "a", "order": 7, "type": "footer"},
                {"id": "b", "order": 7, "type": "header"},
                {"id": "c", "order": 2, "type": "program"}
            ]
        });
        let template = normalize(raw);
        let orders: Vec<u32> = template.blocks.iter().map(|b| b.order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
        // Stored order 2 sorts first.
        assert_eq!(template.blocks[0].id, "c");
    }

    #[test]
    fn test_duplicate_ids_renamed() {
        let raw = json!({
            "blocks": [
                {"id": "dup", "order": 0, "type": "header"},
                {"id": "dup", "order": 1, "type": "program"},
                {"id": "dup-1", "order": 2, "type": "footer"}
            ]
        });
        let template = normalize(raw);
        let mut ids: Vec<&str> = template.blocks.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids.len(), 3);
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 3, "ids must be unique after normalization");
        // The first occurrence keeps its id.
        assert_eq!(template.blocks[0].id, "dup");
    }

    #[test]
    fn test_missing_id_synthesized() {
        let raw = json!({"blocks": [{"order": 0, "type": "header"}]});
        let template = normalize(raw);
        assert_eq!(template.blocks[0].id, "block-0");
    }

    #[test]
    fn test_garbage_root_yields_default() {
        let template = normalize(json!("not a template"));
        assert!(template.blocks.is_empty());
        assert_eq!(template.settings.font_family, "Helvetica");
    }

    #[test]
    fn test_non_object_blocks_dropped() {
        let raw = json!({"blocks": [42, {"id": "ok", "order": 0, "type": "content"}]});
        let template = normalize(raw);
        assert_eq!(template.blocks.len(), 1);
        assert_eq!(template.blocks[0].id, "ok");
    }
}
