/*!
 * Prompt assembly shared by all provider implementations.
 *
 * The instruction is built deterministically from the session's settings
 * snapshot: base template, optional story metadata, the custom dictionary,
 * and the processing requirements, followed by the content block.
 */

use crate::app_config::TranslationConfig;

/// Build the instruction part of the request (everything before the content).
pub fn build_instruction(config: &TranslationConfig) -> String {
    let mut instruction = format!("{}\n\n---", config.prompt_settings.prompt);

    if !config.prompt_settings.story_name.is_empty() {
        instruction.push_str(&format!("\nStory name: {}", config.prompt_settings.story_name));
    }
    if !config.prompt_settings.author.is_empty() {
        instruction.push_str(&format!("\nAuthor: {}", config.prompt_settings.author));
    }
    if !config.prompt_settings.genre.is_empty() {
        instruction.push_str(&format!("\nGenre: {}", config.prompt_settings.genre));
    }
    if !config.prompt_settings.source_language.is_empty() {
        instruction.push_str(&format!(
            "\nSource language: {}",
            config.prompt_settings.source_language
        ));
    }

    if !config.dictionary.is_empty() {
        let mappings = config
            .dictionary
            .iter()
            .map(|d| format!("- \"{}\": \"{}\"", d.original, d.translation))
            .collect::<Vec<_>>()
            .join("\n");
        instruction.push_str(&format!(
            "\n\nIMPORTANT: Use the following custom dictionary for the listed terms. \
             Translate them exactly as given:\n{}",
            mappings
        ));
    }

    let mut processing = Vec::new();
    if config.processing_settings.check_and_redo {
        processing.push(
            "- After translating, re-check the result for any remaining untranslated \
             characters (e.g. 中, 日, 한, р) and translate them as well.",
        );
    }
    if config.processing_settings.fix_grammar {
        processing.push(
            "- After translating, correct spelling, grammar and sentence structure so \
             the final text reads naturally.",
        );
    }
    if !processing.is_empty() {
        instruction.push_str(&format!(
            "\n\nADDITIONAL PROCESSING REQUIREMENTS:\n{}",
            processing.join("\n")
        ));
    }

    instruction
}

/// Build the full request prompt for one chunk.
pub fn build_prompt(text: &str, config: &TranslationConfig) -> String {
    format!(
        "{}\n---\n\nCONTENT TO TRANSLATE:\n\n{}",
        build_instruction(config),
        text
    )
}
