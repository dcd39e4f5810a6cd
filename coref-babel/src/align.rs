//! Token alignment
//!
//!     Decoding attaches mentions read from a flat word list to the tokens of a skeleton
//!     graph, so both must first agree token for token.
//!
//!     Without gold empty nodes the skeleton's empty tokens are discarded and rebuilt from
//!     the `##` words of the reference: each one goes right after the ordinary token
//!     preceding it (word 0 of the first sentence when nothing precedes it), in reference
//!     order. With gold empty nodes they are kept and shifted behind their governors, which
//!     reproduces the order the encoder rendered them in.
//!
//!     Differing forms are logged and tolerated. Differing lengths are fatal.

use coref_conllu::{Document, TokenId};
use tracing::warn;

use crate::error::AlignmentError;
use crate::render::{forms_agree, render_form, EMPTY_PREFIX};

/// Align `doc` with `words` and return the token of every word, in order.
pub fn align(
    doc: &mut Document,
    words: &[String],
    use_gold_empty_nodes: bool,
) -> Result<Vec<TokenId>, AlignmentError> {
    if use_gold_empty_nodes {
        doc.shift_empty_tokens();
    } else {
        rebuild_empty_tokens(doc, words);
    }

    let aligned = doc.token_ids().to_vec();
    if aligned.len() != words.len() {
        return Err(AlignmentError::TokenCount {
            doc: doc.id.clone(),
            expected: aligned.len(),
            found: words.len(),
        });
    }
    for (position, (word, id)) in words.iter().zip(&aligned).enumerate() {
        let token = &doc[*id];
        if !forms_agree(word, token) {
            warn!(
                doc = %doc.id,
                position,
                reference = %word,
                graph = %render_form(token, true),
                "token forms do not match"
            );
        }
    }
    Ok(aligned)
}

fn rebuild_empty_tokens(doc: &mut Document, words: &[String]) {
    for id in doc.empty_ids() {
        doc.remove_empty(id);
    }
    let ordinary = doc.word_ids();
    let mut next = 0;
    let mut previous: Option<TokenId> = None;
    for word in words {
        if word.starts_with(EMPTY_PREFIX) {
            match previous {
                Some(after) => {
                    doc.insert_empty_after(after);
                }
                None => {
                    doc.insert_empty_at_start(0);
                }
            }
        } else if let Some(id) = ordinary.get(next) {
            previous = Some(*id);
            next += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coref_conllu::{HeadRef, Ordinal};

    fn words(line: &str) -> Vec<String> {
        line.split(' ').map(str::to_string).collect()
    }

    fn layout(doc: &Document) -> Vec<String> {
        doc.tokens().map(|(_, t)| format!("{}:{}", t.ord, t.form)).collect()
    }

    #[test]
    fn rebuilds_empty_tokens_from_reference() {
        let mut doc = Document::new("d");
        let ids = doc.push_sentence(&["she", "said", "left"]);
        // a gold empty token that the reference does not have
        doc.insert_empty_after(ids[2]).unwrap();

        let aligned = align(&mut doc, &words("she said ## ## left"), false).unwrap();
        assert_eq!(aligned.len(), 5);
        assert_eq!(
            layout(&doc),
            vec!["1:she", "2:said", "2.1:_", "2.2:_", "3:left"]
        );
        assert_eq!(doc[aligned[2]].deps[0].head, HeadRef::Token(ids[1]));
    }

    #[test]
    fn leading_empty_tokens_go_to_word_zero() {
        let mut doc = Document::new("d");
        doc.push_sentence(&["left", "early"]);
        let aligned = align(&mut doc, &words("## left early"), false).unwrap();
        assert_eq!(doc[aligned[0]].ord, Ordinal::new(0, 1));
        assert_eq!(doc[aligned[0]].deps[0].head, HeadRef::Root);
    }

    #[test]
    fn gold_empty_tokens_are_shifted_not_rebuilt() {
        let mut doc = Document::new("d");
        let ids = doc.push_sentence(&["she", "said", "left"]);
        let zero = doc.insert_empty_after(ids[0]).unwrap();
        doc.get_mut(zero).unwrap().deps[0].head = HeadRef::Token(ids[2]);

        let aligned = align(&mut doc, &words("she said left ##"), true).unwrap();
        assert_eq!(aligned[3], zero);
        assert_eq!(doc[zero].ord, Ordinal::new(3, 1));
    }

    #[test]
    fn length_mismatch_is_fatal() {
        let mut doc = Document::new("d");
        doc.push_sentence(&["a", "b"]);
        let err = align(&mut doc, &words("a b c"), false).unwrap_err();
        assert_eq!(
            err,
            AlignmentError::TokenCount {
                doc: "d".into(),
                expected: 2,
                found: 3
            }
        );
    }

    #[test]
    fn form_mismatch_is_tolerated() {
        let mut doc = Document::new("d");
        doc.push_sentence(&["a", "b"]);
        assert!(align(&mut doc, &words("a x"), false).is_ok());
    }
}
