use crate::classifier::{ClassifierError, EmotionClassifier, LabelScore};
use crate::models::CommentRecord;
use log::debug;

pub const BATCH_SIZE: usize = 16;

/// Scores `comments` in order-preserving batches of [`BATCH_SIZE`] and keeps
/// the highest scoring label of each comment.
pub async fn classify_comments(
    classifier: &dyn EmotionClassifier,
    comments: Vec<String>,
) -> Result<Vec<CommentRecord>, ClassifierError> {
    let mut records = Vec::with_capacity(comments.len());

    for (batch_index, batch) in comments.chunks(BATCH_SIZE).enumerate() {
        let scores = classifier.classify_batch(batch).await?;
        if scores.len() != batch.len() {
            return Err(ClassifierError::LengthMismatch {
                expected: batch.len(),
                actual: scores.len(),
            });
        }

        for (text, candidates) in batch.iter().zip(scores) {
            let top = top_label(candidates).ok_or_else(|| {
                ClassifierError::Malformed(format!("no scores in batch {batch_index}"))
            })?;
            records.push(CommentRecord {
                text: text.clone(),
                label: top.label,
                score: top.score,
            });
        }
    }

    debug!(
        "Classified {} comments in {} batch(es)",
        records.len(),
        comments.len().div_ceil(BATCH_SIZE)
    );
    Ok(records)
}

// Earliest candidate wins a tie.
fn top_label(candidates: Vec<LabelScore>) -> Option<LabelScore> {
    candidates
        .into_iter()
        .reduce(|best, next| if next.score > best.score { next } else { best })
}
