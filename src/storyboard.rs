//! Text rendering of the video concept preview: selections summary plus the
//! per-scene storyboard with B-roll suggestions.

use crate::analysis::AnalyzedScript;
use crate::catalog::{Avatar, Voice};

/// At most this many B-roll suggestions are rendered per scene.
const MAX_BROLL_PER_SCENE: usize = 2;

/// Placeholder image URL for a B-roll keyword. The index varies the image
/// when the same keyword appears in more than one scene.
pub fn broll_image_url(keyword: &str, index: usize) -> String {
    let seed: String = url::form_urlencoded::byte_serialize(keyword.as_bytes()).collect();
    format!("https://picsum.photos/seed/{}{}/300/180", seed, index)
}

pub fn render_storyboard(analysis: &AnalyzedScript, avatar: &Avatar, voice: &Voice) -> String {
    let mut out = String::new();
    out.push_str("Video Concept Preview\n");
    out.push_str("=====================\n\n");
    out.push_str(&format!("Avatar: {} - {}\n", avatar.name, avatar.description));
    out.push_str(&format!("Voice:  {} - {}\n\n", voice.name, voice.description));
    out.push_str("Storyboard & Script Analysis\n");
    out.push_str("----------------------------\n");

    if analysis.segments.is_empty() {
        out.push_str("\nNo segments were identified in this script.\n");
        return out;
    }

    for (index, segment) in analysis.segments.iter().enumerate() {
        out.push_str(&format!("\nScene {}: {}\n", index + 1, segment.topic));
        out.push_str(&format!("Tone: {}\n", segment.tone));
        out.push_str(&format!("{}\n", segment.paragraph_text));

        if segment.keywords.is_empty() {
            out.push_str("Suggested B-roll: no specific keywords identified.\n");
        } else {
            out.push_str("Suggested B-roll:\n");
            for (kw_index, keyword) in segment
                .keywords
                .iter()
                .take(MAX_BROLL_PER_SCENE)
                .enumerate()
            {
                out.push_str(&format!(
                    "  [{}] {}\n",
                    keyword,
                    broll_image_url(keyword, index * 10 + kw_index)
                ));
            }
        }
    }

    out
}
