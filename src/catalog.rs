//! Static catalogs: presenter avatars, narration voices, and app-level
//! constants. Catalog entries are process-wide constants with no lifecycle.

pub const APP_TITLE: &str = "Script2Video Studio";

/// Default model used for script analysis.
pub const GEMINI_MODEL_NAME: &str = "gemini-2.5-flash-preview-04-17";

/// Script length bounds, counted in characters after trimming. Enforced by
/// the wizard before analysis, never by the analysis service itself.
pub const SCRIPT_MIN_CHARS: usize = 50;
pub const SCRIPT_MAX_CHARS: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Avatar {
    pub id: &'static str,
    pub name: &'static str,
    pub image_url: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Voice {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

pub static AVATARS: [Avatar; 4] = [
    Avatar {
        id: "avatar1",
        name: "Alex - Professional",
        image_url: "https://picsum.photos/seed/AlexProfessional/200/200",
        description: "Crisp, clear, and business-ready.",
    },
    Avatar {
        id: "avatar2",
        name: "Mia - Casual Presenter",
        image_url: "https://picsum.photos/seed/MiaCasual/200/200",
        description: "Friendly, engaging, and relatable.",
    },
    Avatar {
        id: "avatar3",
        name: "Dr. Evelyn Reed - Expert",
        image_url: "https://picsum.photos/seed/DrEvelynExpert/200/200",
        description: "Authoritative, knowledgeable, and trustworthy.",
    },
    Avatar {
        id: "avatar4",
        name: "Sparky - Animated Sidekick",
        image_url: "https://picsum.photos/seed/SparkyAnimated/200/200",
        description: "Fun, quirky, and eye-catching for dynamic content.",
    },
];

pub static VOICES: [Voice; 4] = [
    Voice {
        id: "voice1",
        name: "Narrator Pro (Male)",
        description: "Deep, smooth, and authoritative for narration.",
    },
    Voice {
        id: "voice2",
        name: "Engaging Speaker (Female)",
        description: "Warm, clear, and persuasive for presentations.",
    },
    Voice {
        id: "voice3",
        name: "Friendly Guide (Unisex)",
        description: "Approachable and calm for tutorials and explainers.",
    },
    Voice {
        id: "voice4",
        name: "Upbeat Animator (Female)",
        description: "Energetic and expressive for animated or vibrant content.",
    },
];

pub fn find_avatar(id: &str) -> Option<&'static Avatar> {
    AVATARS.iter().find(|a| a.id == id)
}

pub fn find_voice(id: &str) -> Option<&'static Voice> {
    VOICES.iter().find(|v| v.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_ids_are_unique() {
        let avatar_ids: HashSet<_> = AVATARS.iter().map(|a| a.id).collect();
        assert_eq!(avatar_ids.len(), AVATARS.len());

        let voice_ids: HashSet<_> = VOICES.iter().map(|v| v.id).collect();
        assert_eq!(voice_ids.len(), VOICES.len());
    }

    #[test]
    fn test_find_by_id() {
        assert_eq!(find_avatar("avatar3").unwrap().name, "Dr. Evelyn Reed - Expert");
        assert!(find_avatar("avatar99").is_none());

        assert_eq!(find_voice("voice2").unwrap().name, "Engaging Speaker (Female)");
        assert!(find_voice("nope").is_none());
    }
}
