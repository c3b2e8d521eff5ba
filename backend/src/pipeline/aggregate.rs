use crate::models::{AnalysisResult, CommentRecord, Emotion, EmotionTally, TopExemplars, VideoDetails};

pub const EXEMPLARS_PER_EMOTION: usize = 2;

/// Counts records per known emotion. Every emotion is present, unknown labels
/// are not counted.
pub fn tally(records: &[CommentRecord]) -> EmotionTally {
    let mut emotions: EmotionTally = Emotion::ALL.into_iter().map(|e| (e, 0)).collect();
    for record in records {
        if let Some(count) = Emotion::from_label(&record.label).and_then(|e| emotions.get_mut(&e)) {
            *count += 1;
        }
    }
    emotions
}

/// Records ordered by descending score. Equal scores keep their input order.
pub fn rank_by_score(records: &[CommentRecord]) -> Vec<&CommentRecord> {
    let mut ranked: Vec<&CommentRecord> = records.iter().collect();
    // `sort_by` is stable.
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked
}

pub fn top_exemplars(records: &[CommentRecord]) -> TopExemplars {
    let mut top: TopExemplars = Emotion::ALL.into_iter().map(|e| (e, Vec::new())).collect();
    for record in rank_by_score(records) {
        let Some(exemplars) = Emotion::from_label(&record.label).and_then(|e| top.get_mut(&e)) else {
            continue;
        };
        if exemplars.len() < EXEMPLARS_PER_EMOTION {
            exemplars.push(record.text.clone());
        }
    }
    top
}

pub fn aggregate(records: &[CommentRecord], video_details: VideoDetails) -> AnalysisResult {
    AnalysisResult {
        emotions: tally(records),
        video_details,
        top_comments_by_emotion: top_exemplars(records),
        total_comments_analyzed: records.len(),
    }
}
