//! Knobs shared by the encoders and decoders

use serde::Deserialize;

/// How mention markers are attached to tokens in the text format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarkerStyle {
    /// `form|[e1,e2]`
    #[default]
    Brackets,
    /// `<e1>form</e1>`
    Tags,
}

/// Options for graph → text / JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Shift empty tokens to their governors and render them (`##` tokens).
    pub zero_mentions: bool,
    /// Drop all coreference: no markers, `null` clusters.
    pub blind: bool,
    /// Rename entities `e1, e2, …` in first-appearance order (text only).
    pub sequential_ids: bool,
    pub marker_style: MarkerStyle,
    /// Keep an empty token's own form after `##` (JSON only).
    pub empty_node_form: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        EncodeOptions {
            zero_mentions: false,
            blind: false,
            sequential_ids: false,
            marker_style: MarkerStyle::Brackets,
            empty_node_form: true,
        }
    }
}

/// Options for text / JSON → graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Keep the skeleton's empty tokens (shifted to their governors) instead of rebuilding
    /// them from the `##` tokens of the reference.
    pub use_gold_empty_nodes: bool,
}
