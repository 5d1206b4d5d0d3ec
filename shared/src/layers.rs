//! Layer tree and the interaction state of the layers panel.
//!
//! The tree itself only changes through renames. Everything the panel
//! shows on top of it (expansion, selection, visibility, the rename in
//! progress) lives in [`LayerPanelState`], which is plain data so the
//! frontend Actor can own it and tests can drive it without a browser.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    Group,
    Leaf,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LayerNode {
    pub id: String,
    pub name: String,
    pub kind: LayerKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<LayerNode>,
}

impl LayerNode {
    pub fn group(id: impl Into<String>, name: impl Into<String>, children: Vec<LayerNode>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: LayerKind::Group,
            children,
        }
    }

    pub fn leaf(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: LayerKind::Leaf,
            children: Vec::new(),
        }
    }

    pub fn is_group(&self) -> bool {
        self.kind == LayerKind::Group
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayerTreeError {
    #[error("duplicate layer id '{0}'")]
    DuplicateId(String),
    #[error("leaf layer '{0}' cannot have children")]
    LeafWithChildren(String),
}

/// Validated layer hierarchy. Ids are unique across the whole tree.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerTree {
    roots: Vec<LayerNode>,
}

impl LayerTree {
    pub fn new(roots: Vec<LayerNode>) -> Result<Self, LayerTreeError> {
        let mut seen = HashSet::new();
        validate_nodes(&roots, &mut seen)?;
        Ok(Self { roots })
    }

    /// The structure the configurator starts with.
    pub fn seed() -> Result<Self, LayerTreeError> {
        Self::new(seed_layers())
    }

    pub fn empty() -> Self {
        Self { roots: Vec::new() }
    }

    pub fn roots(&self) -> &[LayerNode] {
        &self.roots
    }

    pub fn find(&self, id: &str) -> Option<&LayerNode> {
        find_node(&self.roots, id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// Replaces the name of a single node. Returns `false` for unknown ids.
    pub fn rename(&mut self, id: &str, name: &str) -> bool {
        match find_node_mut(&mut self.roots, id) {
            Some(node) => {
                node.name = name.to_string();
                true
            }
            None => false,
        }
    }

    /// Node ids in render order: every node, followed by its children only
    /// when it is an expanded group.
    pub fn visible_order(&self, expanded: &IndexSet<String>) -> Vec<String> {
        let mut order = Vec::new();
        push_visible_ids(&self.roots, expanded, &mut order);
        order
    }
}

pub fn seed_layers() -> Vec<LayerNode> {
    vec![
        LayerNode::group("r1", "R1 Keycaps", Vec::new()),
        LayerNode::group("r2", "R2 Keycaps", vec![LayerNode::leaf("r2-text-a", "Text A")]),
        LayerNode::group(
            "r3",
            "R3 Keycaps",
            vec![
                LayerNode::leaf("r3-text-w", "Text W"),
                LayerNode::leaf("r3-text-q", "Text Q"),
            ],
        ),
    ]
}

/// Groups expanded when the panel first renders.
pub const SEED_EXPANDED: [&str; 2] = ["r2", "r3"];

fn validate_nodes(nodes: &[LayerNode], seen: &mut HashSet<String>) -> Result<(), LayerTreeError> {
    for node in nodes {
        if !seen.insert(node.id.clone()) {
            return Err(LayerTreeError::DuplicateId(node.id.clone()));
        }
        if node.kind == LayerKind::Leaf && !node.children.is_empty() {
            return Err(LayerTreeError::LeafWithChildren(node.id.clone()));
        }
        validate_nodes(&node.children, seen)?;
    }
    Ok(())
}

fn find_node<'a>(nodes: &'a [LayerNode], id: &str) -> Option<&'a LayerNode> {
    for node in nodes {
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = find_node(&node.children, id) {
            return Some(found);
        }
    }
    None
}

fn find_node_mut<'a>(nodes: &'a mut [LayerNode], id: &str) -> Option<&'a mut LayerNode> {
    for node in nodes {
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = find_node_mut(&mut node.children, id) {
            return Some(found);
        }
    }
    None
}

fn push_visible_ids(nodes: &[LayerNode], expanded: &IndexSet<String>, order: &mut Vec<String>) {
    for node in nodes {
        order.push(node.id.clone());
        if node.is_group() && expanded.contains(&node.id) {
            push_visible_ids(&node.children, expanded, order);
        }
    }
}

// ===== INTERACTION STATE =====

/// Keyboard modifiers held during a row click.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        meta: false,
    };

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::NONE
        }
    }

    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::NONE
        }
    }

    pub fn meta() -> Self {
        Self {
            meta: true,
            ..Self::NONE
        }
    }

    fn toggles(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Layer tree plus everything the panel tracks about it.
///
/// Every operation accepts any id. Ids that are not in the tree are
/// ignored, because rendered rows and this state can briefly disagree.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerPanelState {
    tree: LayerTree,
    expanded: IndexSet<String>,
    selected: IndexSet<String>,
    hidden: IndexSet<String>,
    last_selected: Option<String>,
    renaming: Option<String>,
}

impl LayerPanelState {
    pub fn new(tree: LayerTree, expanded: impl IntoIterator<Item = String>) -> Self {
        let expanded = expanded
            .into_iter()
            .filter(|id| tree.contains(id))
            .collect();
        Self {
            tree,
            expanded,
            selected: IndexSet::new(),
            hidden: IndexSet::new(),
            last_selected: None,
            renaming: None,
        }
    }

    pub fn seeded() -> Result<Self, LayerTreeError> {
        Ok(Self::new(
            LayerTree::seed()?,
            SEED_EXPANDED.iter().map(|id| id.to_string()),
        ))
    }

    pub fn tree(&self) -> &LayerTree {
        &self.tree
    }

    pub fn expanded(&self) -> &IndexSet<String> {
        &self.expanded
    }

    pub fn selected(&self) -> &IndexSet<String> {
        &self.selected
    }

    pub fn hidden(&self) -> &IndexSet<String> {
        &self.hidden
    }

    pub fn last_selected(&self) -> Option<&str> {
        self.last_selected.as_deref()
    }

    pub fn renaming(&self) -> Option<&str> {
        self.renaming.as_deref()
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn is_hidden(&self, id: &str) -> bool {
        self.hidden.contains(id)
    }

    pub fn is_renaming(&self, id: &str) -> bool {
        self.renaming.as_deref() == Some(id)
    }

    /// Recomputed on every call; expansion may have changed since the last one.
    pub fn visible_order(&self) -> Vec<String> {
        self.tree.visible_order(&self.expanded)
    }

    pub fn toggle_expand(&mut self, id: &str) {
        if self.tree.contains(id) {
            toggle_membership(&mut self.expanded, id);
        }
    }

    pub fn select(&mut self, id: &str, modifiers: Modifiers) {
        if self.renaming.is_some() || !self.tree.contains(id) {
            return;
        }

        if modifiers.toggles() {
            toggle_membership(&mut self.selected, id);
            self.last_selected = Some(id.to_string());
        } else if let (true, Some(anchor)) = (modifiers.shift, self.last_selected.as_deref()) {
            let order = self.visible_order();
            let anchor_index = order.iter().position(|visible| visible == anchor);
            let target_index = order.iter().position(|visible| visible == id);
            if let (Some(a), Some(b)) = (anchor_index, target_index) {
                let (from, to) = if a <= b { (a, b) } else { (b, a) };
                self.selected = order[from..=to].iter().cloned().collect();
            }
        } else {
            self.selected = IndexSet::from([id.to_string()]);
            self.last_selected = Some(id.to_string());
        }
    }

    pub fn toggle_visibility(&mut self, id: &str) {
        if self.tree.contains(id) {
            toggle_membership(&mut self.hidden, id);
        }
    }

    /// No depth or kind restriction here; the panel decides which rows
    /// offer renaming.
    pub fn start_rename(&mut self, id: &str) {
        if self.tree.contains(id) {
            self.renaming = Some(id.to_string());
        }
    }

    pub fn commit_rename(&mut self, id: &str, proposed_name: &str) {
        let name = trim_name(proposed_name);
        if !name.is_empty() {
            self.tree.rename(id, name);
        }
        self.renaming = None;
    }

    pub fn cancel_rename(&mut self) {
        self.renaming = None;
    }

    pub fn clear_selection(&mut self) {
        if self.renaming.is_none() {
            self.selected.clear();
        }
    }
}

/// Unicode whitespace plus the byte order mark, which typed or pasted
/// names can carry.
fn trim_name(name: &str) -> &str {
    name.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

fn toggle_membership(set: &mut IndexSet<String>, id: &str) {
    if !set.shift_remove(id) {
        set.insert(id.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[&str]) -> IndexSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn sorted(set: &IndexSet<String>) -> Vec<String> {
        let mut values: Vec<String> = set.iter().cloned().collect();
        values.sort();
        values
    }

    fn nested_tree() -> LayerTree {
        LayerTree::new(vec![
            LayerNode::group("a", "A", vec![
                LayerNode::group("a1", "A1", vec![LayerNode::leaf("a1x", "A1 X")]),
                LayerNode::leaf("a2", "A2"),
            ]),
            LayerNode::group("b", "B", vec![
                LayerNode::group("b1", "B1", vec![
                    LayerNode::leaf("b1x", "B1 X"),
                    LayerNode::leaf("b1y", "B1 Y"),
                ]),
            ]),
            LayerNode::leaf("c", "C"),
        ])
        .expect("valid tree")
    }

    fn ancestors<'a>(nodes: &'a [LayerNode], id: &str, path: &mut Vec<&'a str>) -> bool {
        for node in nodes {
            if node.id == id {
                return true;
            }
            path.push(&node.id);
            if ancestors(&node.children, id, path) {
                return true;
            }
            path.pop();
        }
        false
    }

    fn all_ids(nodes: &[LayerNode], out: &mut Vec<String>) {
        for node in nodes {
            out.push(node.id.clone());
            all_ids(&node.children, out);
        }
    }

    #[test]
    fn seed_tree_is_valid() {
        assert!(LayerTree::seed().is_ok());
    }

    #[test]
    fn rejects_duplicate_ids() {
        let result = LayerTree::new(vec![
            LayerNode::group("r1", "R1", vec![LayerNode::leaf("dup", "One")]),
            LayerNode::group("r2", "R2", vec![LayerNode::leaf("dup", "Two")]),
        ]);
        assert_eq!(result, Err(LayerTreeError::DuplicateId("dup".to_string())));
    }

    #[test]
    fn rejects_leaf_with_children() {
        let mut leaf = LayerNode::leaf("text", "Text");
        leaf.children.push(LayerNode::leaf("inner", "Inner"));
        let result = LayerTree::new(vec![leaf]);
        assert_eq!(result, Err(LayerTreeError::LeafWithChildren("text".to_string())));
    }

    #[test]
    fn seeded_visible_order() {
        let state = LayerPanelState::seeded().unwrap();
        assert_eq!(
            state.visible_order(),
            vec!["r1", "r2", "r2-text-a", "r3", "r3-text-w", "r3-text-q"]
        );
    }

    #[test]
    fn collapsing_group_hides_its_children() {
        let mut state = LayerPanelState::seeded().unwrap();
        state.toggle_expand("r3");
        assert_eq!(state.visible_order(), vec!["r1", "r2", "r2-text-a", "r3"]);
        state.toggle_expand("r3");
        assert!(state.is_expanded("r3"));
    }

    #[test]
    fn visibility_follows_every_ancestor_for_all_expansion_sets() {
        let tree = nested_tree();
        let groups = ["a", "a1", "b", "b1"];
        let mut every_id = Vec::new();
        all_ids(tree.roots(), &mut every_id);

        for mask in 0..(1u32 << groups.len()) {
            let mut state = LayerPanelState::new(tree.clone(), Vec::new());
            for (bit, group) in groups.iter().enumerate() {
                if mask & (1 << bit) != 0 {
                    state.toggle_expand(group);
                }
            }
            let order = state.visible_order();
            for id in &every_id {
                let mut path = Vec::new();
                assert!(ancestors(tree.roots(), id, &mut path));
                let expected = path.iter().all(|ancestor| state.is_expanded(ancestor));
                assert_eq!(order.contains(id), expected, "id {id} with mask {mask:04b}");
            }
        }
    }

    #[test]
    fn toggle_expand_ignores_unknown_ids() {
        let mut state = LayerPanelState::seeded().unwrap();
        state.toggle_expand("missing");
        assert_eq!(state.expanded(), &ids(&["r2", "r3"]));
    }

    #[test]
    fn plain_click_selects_single_row() {
        let mut state = LayerPanelState::seeded().unwrap();
        state.select("r2", Modifiers::NONE);
        state.select("r3-text-w", Modifiers::NONE);
        assert_eq!(state.selected(), &ids(&["r3-text-w"]));
        assert_eq!(state.last_selected(), Some("r3-text-w"));
    }

    #[test]
    fn ctrl_click_twice_restores_selection() {
        let mut state = LayerPanelState::seeded().unwrap();
        state.select("r1", Modifiers::NONE);
        state.select("r2-text-a", Modifiers::ctrl());
        let before = state.selected().clone();

        state.select("r3", Modifiers::ctrl());
        assert_eq!(sorted(state.selected()), vec!["r1", "r2-text-a", "r3"]);
        state.select("r3", Modifiers::ctrl());
        assert_eq!(state.selected(), &before);
        assert_eq!(state.last_selected(), Some("r3"));
    }

    #[test]
    fn meta_click_toggles_like_ctrl() {
        let mut state = LayerPanelState::seeded().unwrap();
        state.select("r1", Modifiers::meta());
        state.select("r2", Modifiers::meta());
        assert_eq!(sorted(state.selected()), vec!["r1", "r2"]);
    }

    #[test]
    fn shift_click_selects_range_in_either_direction() {
        let mut forward = LayerPanelState::seeded().unwrap();
        forward.select("r2", Modifiers::NONE);
        forward.select("r3-text-w", Modifiers::shift());

        let mut backward = LayerPanelState::seeded().unwrap();
        backward.select("r3-text-w", Modifiers::NONE);
        backward.select("r2", Modifiers::shift());

        assert_eq!(sorted(forward.selected()), vec!["r2", "r2-text-a", "r3", "r3-text-w"]);
        assert_eq!(sorted(forward.selected()), sorted(backward.selected()));
        // Range selection keeps the original anchor.
        assert_eq!(forward.last_selected(), Some("r2"));
    }

    #[test]
    fn shift_click_with_collapsed_anchor_keeps_selection() {
        let mut state = LayerPanelState::seeded().unwrap();
        state.select("r3-text-q", Modifiers::NONE);
        state.toggle_expand("r3");
        state.select("r1", Modifiers::shift());
        assert_eq!(state.selected(), &ids(&["r3-text-q"]));
    }

    #[test]
    fn shift_click_without_anchor_selects_single_row() {
        let mut state = LayerPanelState::seeded().unwrap();
        state.select("r2", Modifiers::shift());
        assert_eq!(state.selected(), &ids(&["r2"]));
        assert_eq!(state.last_selected(), Some("r2"));
    }

    #[test]
    fn selection_ignores_unknown_ids() {
        let mut state = LayerPanelState::seeded().unwrap();
        state.select("r1", Modifiers::NONE);
        state.select("ghost", Modifiers::ctrl());
        state.select("ghost", Modifiers::NONE);
        assert_eq!(state.selected(), &ids(&["r1"]));
    }

    #[test]
    fn selection_is_suppressed_while_renaming() {
        let mut state = LayerPanelState::seeded().unwrap();
        state.select("r1", Modifiers::NONE);
        state.start_rename("r2-text-a");
        state.select("r3", Modifiers::NONE);
        state.select("r3", Modifiers::ctrl());
        assert_eq!(state.selected(), &ids(&["r1"]));
    }

    #[test]
    fn commit_rename_trims_name() {
        let mut state = LayerPanelState::seeded().unwrap();
        state.start_rename("r3-text-w");
        state.commit_rename("r3-text-w", " New Name ");
        assert_eq!(state.tree().find("r3-text-w").map(|n| n.name.as_str()), Some("New Name"));
        assert_eq!(state.renaming(), None);
    }

    #[test]
    fn whitespace_rename_keeps_name() {
        let mut state = LayerPanelState::seeded().unwrap();
        state.start_rename("r2-text-a");
        state.commit_rename("r2-text-a", "  ");
        assert_eq!(state.tree().find("r2-text-a").map(|n| n.name.as_str()), Some("Text A"));
        assert_eq!(state.renaming(), None);
    }

    #[test]
    fn byte_order_mark_only_rename_keeps_name() {
        let mut state = LayerPanelState::seeded().unwrap();
        state.start_rename("r1");
        state.commit_rename("r1", "\u{feff}");
        assert_eq!(state.tree().find("r1").map(|n| n.name.as_str()), Some("R1 Keycaps"));

        state.start_rename("r1");
        state.commit_rename("r1", "\u{feff} Top Row\u{a0}");
        assert_eq!(state.tree().find("r1").map(|n| n.name.as_str()), Some("Top Row"));
        assert_eq!(state.renaming(), None);
    }

    #[test]
    fn rename_preserves_structure() {
        let mut state = LayerPanelState::seeded().unwrap();
        let order = state.visible_order();
        state.start_rename("r3");
        state.commit_rename("r3", "Bottom Row");
        assert_eq!(state.visible_order(), order);
        assert_eq!(state.tree().find("r3").map(|n| n.children.len()), Some(2));
    }

    #[test]
    fn cancel_rename_keeps_name() {
        let mut state = LayerPanelState::seeded().unwrap();
        state.start_rename("r1");
        assert!(state.is_renaming("r1"));
        state.cancel_rename();
        assert_eq!(state.renaming(), None);
        assert_eq!(state.tree().find("r1").map(|n| n.name.as_str()), Some("R1 Keycaps"));
    }

    #[test]
    fn start_rename_ignores_unknown_ids() {
        let mut state = LayerPanelState::seeded().unwrap();
        state.start_rename("ghost");
        assert_eq!(state.renaming(), None);
    }

    #[test]
    fn clear_selection_is_blocked_while_renaming() {
        let mut state = LayerPanelState::seeded().unwrap();
        state.select("r2", Modifiers::NONE);
        state.start_rename("r2-text-a");
        state.clear_selection();
        assert_eq!(state.selected(), &ids(&["r2"]));

        state.cancel_rename();
        state.clear_selection();
        assert!(state.selected().is_empty());
    }

    #[test]
    fn sets_are_independent() {
        let mut state = LayerPanelState::seeded().unwrap();
        state.select("r3", Modifiers::NONE);
        state.toggle_visibility("r3");
        assert!(state.is_selected("r3"));
        assert!(state.is_hidden("r3"));
        assert!(state.is_expanded("r3"));

        state.toggle_visibility("r3");
        state.toggle_visibility("ghost");
        assert!(state.hidden().is_empty());
        assert!(state.is_selected("r3"));
    }

    #[test]
    fn layer_node_json_shape() {
        let json = serde_json::to_value(LayerNode::group("r2", "R2 Keycaps", vec![
            LayerNode::leaf("r2-text-a", "Text A"),
        ]))
        .expect("serializable");
        assert_eq!(json["kind"], "group");
        assert_eq!(json["children"][0]["kind"], "leaf");
        assert!(json["children"][0].get("children").is_none());
    }
}
