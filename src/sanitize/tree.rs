use std::collections::HashSet;

use serde_json::Value;

use super::StepRejection;
use super::coerce::{canonical_id, is_truthy, present};
use super::ids::IdSource;
use crate::ir::{TreeData, TreeNode};

pub(super) fn sanitize_tree(
    data: &Value,
    max_depth: usize,
    ids: &mut dyn IdSource,
) -> Result<TreeData, StepRejection> {
    let raw_root = present(data.get("tree"))
        .or_else(|| present(data.get("root")))
        .filter(|root| is_truthy(root))
        .ok_or(StepRejection::MissingRoot)?;

    let mut builder = TreeBuilder {
        ids,
        used: HashSet::new(),
        max_depth: max_depth.max(1),
        truncated: 0,
    };
    let tree = builder.node(raw_root, 0).ok_or(StepRejection::MissingRoot)?;
    if builder.truncated > 0 {
        tracing::warn!(
            max_depth = builder.max_depth,
            truncated = builder.truncated,
            "tree deeper than the depth limit; subtrees dropped"
        );
    }
    Ok(TreeData { tree: *tree })
}

struct TreeBuilder<'a> {
    ids: &'a mut dyn IdSource,
    used: HashSet<String>,
    max_depth: usize,
    truncated: usize,
}

impl TreeBuilder<'_> {
    fn node(&mut self, raw: &Value, depth: usize) -> Option<Box<TreeNode>> {
        if !is_truthy(raw) {
            return None;
        }
        if depth >= self.max_depth {
            self.truncated += 1;
            return None;
        }

        let Value::Object(fields) = raw else {
            // A bare scalar in a child slot is a leaf holding that value.
            let id = canonical_id(Some(raw), self.ids);
            let id = self.claim(id);
            return Some(Box::new(TreeNode::leaf(id, raw.clone())));
        };

        let base = canonical_id(
            present(fields.get("id")).or_else(|| present(fields.get("value"))),
            self.ids,
        );
        let value = present(fields.get("value"))
            .cloned()
            .unwrap_or_else(|| Value::String(base.clone()));
        let id = self.claim(base);

        let left = child(fields.get("left"), fields.get("leftChild"))
            .and_then(|raw_child| self.node(raw_child, depth + 1));
        let right = child(fields.get("right"), fields.get("rightChild"))
            .and_then(|raw_child| self.node(raw_child, depth + 1));

        Some(Box::new(TreeNode {
            id,
            value,
            left,
            right,
        }))
    }

    /// Reserve `base`, suffixing `-2`, `-3`, ... when it is already taken.
    fn claim(&mut self, base: String) -> String {
        if self.used.insert(base.clone()) {
            return base;
        }
        let mut suffix = 2usize;
        loop {
            let candidate = format!("{base}-{suffix}");
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
            suffix += 1;
        }
    }
}

fn child<'v>(primary: Option<&'v Value>, alias: Option<&'v Value>) -> Option<&'v Value> {
    present(primary).or_else(|| present(alias))
}
