//! Interactive wizard: script input, avatar and voice selection, one
//! analysis per voice selection, and the storyboard preview. Thin glue
//! around the analysis service; all validation it owns is the script
//! length check.

use anyhow::{bail, Context, Result};
use indicatif::ProgressBar;
use inquire::{Editor, Select};
use log::error;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::analysis::{AnalyzedScript, ScriptAnalyzer};
use crate::catalog::{self, Avatar, Voice, APP_TITLE, SCRIPT_MAX_CHARS, SCRIPT_MIN_CHARS};
use crate::config::Config;
use crate::storyboard::render_storyboard;

/// Wizard steps, in presentation order.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Step {
    ScriptInput,
    AvatarSelection,
    VoiceSelection,
    Preview,
    Generating,
    Complete,
}

pub struct Wizard {
    analyzer: ScriptAnalyzer,
    model: String,
    script_file: Option<PathBuf>,
    script: String,
    avatar: Option<&'static Avatar>,
    voice: Option<&'static Voice>,
    analysis: Option<AnalyzedScript>,
}

impl Wizard {
    pub fn new(config: &Config, script_file: Option<PathBuf>) -> Self {
        Self {
            analyzer: ScriptAnalyzer::new(config.llm.api_key.clone()),
            model: config.llm.model.clone(),
            script_file,
            script: String::new(),
            avatar: None,
            voice: None,
            analysis: None,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        println!("{}", APP_TITLE);
        println!("Automated Video Creation Concept\n");

        let mut step = Step::ScriptInput;
        loop {
            let next = match step {
                Step::ScriptInput => self.script_input()?,
                Step::AvatarSelection => self.avatar_selection()?,
                Step::VoiceSelection => self.voice_selection().await?,
                Step::Preview => self.preview()?,
                Step::Generating => self.generating().await?,
                Step::Complete => self.complete()?,
            };
            match next {
                Some(s) => step = s,
                None => return Ok(()),
            }
        }
    }

    fn script_input(&mut self) -> Result<Option<Step>> {
        // A script file argument skips the editor, once
        if let Some(path) = self.script_file.take() {
            let script = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read script file {}", path.display()))?;
            if let Err(message) = validate_script_length(&script) {
                bail!("{}: {}", path.display(), message);
            }
            self.script = script;
            return Ok(Some(Step::AvatarSelection));
        }

        loop {
            let script = Editor::new("Enter your video script (min 50, max 10,000 characters):")
                .with_predefined_text(&self.script)
                .prompt()?;
            match validate_script_length(&script) {
                Ok(()) => {
                    self.script = script;
                    return Ok(Some(Step::AvatarSelection));
                }
                Err(message) => println!("{}", message),
            }
        }
    }

    fn avatar_selection(&mut self) -> Result<Option<Step>> {
        let mut options: Vec<String> = catalog::AVATARS
            .iter()
            .map(|a| format!("{} - {}", a.name, a.description))
            .collect();
        options.push("Back to script input".to_string());

        let choice = Select::new("Choose a presenter avatar:", options).raw_prompt()?;
        if choice.index == catalog::AVATARS.len() {
            return Ok(Some(Step::ScriptInput));
        }

        self.avatar = Some(&catalog::AVATARS[choice.index]);
        Ok(Some(Step::VoiceSelection))
    }

    async fn voice_selection(&mut self) -> Result<Option<Step>> {
        let mut options: Vec<String> = catalog::VOICES
            .iter()
            .map(|v| format!("{} - {}", v.name, v.description))
            .collect();
        options.push("Back to avatar selection".to_string());

        let choice = Select::new("Choose a narration voice:", options).raw_prompt()?;
        if choice.index == catalog::VOICES.len() {
            return Ok(Some(Step::AvatarSelection));
        }
        self.voice = Some(&catalog::VOICES[choice.index]);

        // Exactly one analysis per voice selection
        self.analysis = None;
        let spinner = ProgressBar::new_spinner();
        spinner.set_message("Analyzing script with AI...");
        spinner.enable_steady_tick(Duration::from_millis(100));
        let result = self.analyzer.analyze(&self.script, &self.model).await;
        spinner.finish_and_clear();

        match result {
            Ok(analysis) => {
                self.analysis = Some(analysis);
                Ok(Some(Step::Preview))
            }
            Err(e) => {
                error!("script analysis failed: {}", e);
                println!("\nAn error occurred: {}\n", e);

                let retry = Select::new(
                    "What would you like to do?",
                    vec![
                        "Try again".to_string(),
                        "Back to avatar selection".to_string(),
                        "Quit".to_string(),
                    ],
                )
                .raw_prompt()?;
                match retry.index {
                    0 => Ok(Some(Step::VoiceSelection)),
                    1 => Ok(Some(Step::AvatarSelection)),
                    _ => Ok(None),
                }
            }
        }
    }

    fn preview(&mut self) -> Result<Option<Step>> {
        let (Some(analysis), Some(avatar), Some(voice)) =
            (&self.analysis, self.avatar, self.voice)
        else {
            bail!("Missing data for preview. Please go back and complete previous steps.");
        };

        println!("\n{}", render_storyboard(analysis, avatar, voice));

        let choice = Select::new(
            "Ready to generate?",
            vec![
                "Generate video concept".to_string(),
                "Back to voice selection".to_string(),
                "Start over".to_string(),
            ],
        )
        .raw_prompt()?;
        match choice.index {
            0 => Ok(Some(Step::Generating)),
            1 => {
                self.analysis = None;
                Ok(Some(Step::VoiceSelection))
            }
            _ => {
                self.start_over();
                Ok(Some(Step::ScriptInput))
            }
        }
    }

    async fn generating(&mut self) -> Result<Option<Step>> {
        let spinner = ProgressBar::new_spinner();
        spinner.set_message("Generating your video concept...");
        spinner.enable_steady_tick(Duration::from_millis(100));
        // Simulated generation; no actual video is produced
        tokio::time::sleep(Duration::from_secs(3)).await;
        spinner.finish_and_clear();
        Ok(Some(Step::Complete))
    }

    fn complete(&mut self) -> Result<Option<Step>> {
        println!("\nVideo Concept Ready!");
        println!("Your AI-generated video concept has been processed.");
        println!("(This is a simulation. In a full version, your video would be available for download.)\n");

        let choice = Select::new(
            "What next?",
            vec!["Create another video".to_string(), "Quit".to_string()],
        )
        .raw_prompt()?;
        if choice.index == 0 {
            self.start_over();
            Ok(Some(Step::ScriptInput))
        } else {
            Ok(None)
        }
    }

    fn start_over(&mut self) {
        self.script.clear();
        self.avatar = None;
        self.voice = None;
        self.analysis = None;
    }
}

fn validate_script_length(script: &str) -> Result<(), String> {
    let chars = script.trim().chars().count();
    if chars < SCRIPT_MIN_CHARS {
        return Err("Script is too short. Please enter at least 50 characters.".to_string());
    }
    if chars > SCRIPT_MAX_CHARS {
        return Err("Script is too long. Please limit to 10,000 characters for this demo.".to_string());
    }
    Ok(())
}
