//! Article prompt composition.
//!
//! An [`ArticlePrompt`] pairs a title with an [`ArticleStyle`] and renders
//! the instruction text sent to the model.

use std::fmt;
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{RequestError, TypewriterError, TypewriterResult};
use crate::source::Prompt;

/// Tone of a generated article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ArticleStyle {
    /// Natural, everyday writing.
    #[default]
    Plain,
    /// Light humor in a casual voice.
    Comedy,
    /// Witty, stand-up style sarcasm.
    Sarcastic,
    /// Uplifting encouragement.
    Motivational,
    /// A short personal story.
    Storytelling,
    /// Humor drawn from everyday struggles.
    FunnyRealistic,
    /// Warm and heartfelt.
    Emotional,
    /// Advice and tips.
    Practical,
    /// A friendly, honest rant.
    Rant,
    /// Cozy and comforting.
    Wholesome,
}

impl ArticleStyle {
    /// Every style.
    pub const ALL: [ArticleStyle; 10] = [
        ArticleStyle::Plain,
        ArticleStyle::Comedy,
        ArticleStyle::Sarcastic,
        ArticleStyle::Motivational,
        ArticleStyle::Storytelling,
        ArticleStyle::FunnyRealistic,
        ArticleStyle::Emotional,
        ArticleStyle::Practical,
        ArticleStyle::Rant,
        ArticleStyle::Wholesome,
    ];

    /// Picks a style uniformly at random.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL.choose(rng).copied().unwrap_or_default()
    }

    /// Identifier used in configuration and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            ArticleStyle::Plain => "plain",
            ArticleStyle::Comedy => "comedy",
            ArticleStyle::Sarcastic => "sarcastic",
            ArticleStyle::Motivational => "motivational",
            ArticleStyle::Storytelling => "storytelling",
            ArticleStyle::FunnyRealistic => "funny-realistic",
            ArticleStyle::Emotional => "emotional",
            ArticleStyle::Practical => "practical",
            ArticleStyle::Rant => "rant",
            ArticleStyle::Wholesome => "wholesome",
        }
    }

    /// Tone instructions, one per line.
    pub fn instructions(self) -> &'static [&'static str] {
        match self {
            ArticleStyle::Plain => &[
                "Write it in a natural, human tone.",
                "Keep it simple, humble, and relatable.",
                "Avoid fancy or complex words.",
                "Make it sound like everyday writing, as if a person is sharing their thoughts.",
                "Use short sentences and clear examples.",
            ],
            ArticleStyle::Comedy => &[
                "Make it sound human, not AI.",
                "Keep it simple, humble, and relatable.",
                "Add light comedy and humor where natural.",
                "Avoid fancy or complex words.",
                "Make it feel like a casual conversation with a friend.",
                "Use short sentences and real-life examples.",
            ],
            ArticleStyle::Sarcastic => &[
                "Make it funny in a sarcastic, witty way (like stand-up comedy).",
                "Use humor about daily struggles, small annoyances, and life's ironies.",
                "Keep the language simple and relatable, no big words.",
                "Sound like a human joking with friends, not an AI.",
            ],
            ArticleStyle::Motivational => &[
                "Make it sound uplifting and positive, but in simple words.",
                "No big or poetic vocabulary.",
                "Make it humble and relatable, like friendly encouragement.",
                "Give small, practical examples anyone can connect to.",
            ],
            ArticleStyle::Storytelling => &[
                "Write it like a short personal story or diary entry.",
                "Keep the tone human, warm, and real.",
                "Simple words, relatable situations, small details from daily life.",
            ],
            ArticleStyle::FunnyRealistic => &[
                "Make it humorous but realistic, like everyday struggles we all face.",
                "Keep it light, casual, and human.",
                "Avoid big words, just use relatable funny examples from daily life.",
            ],
            ArticleStyle::Emotional => &[
                "Make it emotional and heart-touching.",
                "Use a warm, gentle, human tone.",
                "Keep it simple and humble, no heavy or poetic words.",
                "Write it like a person opening up honestly about life.",
            ],
            ArticleStyle::Practical => &[
                "Make it sound like useful advice from a friend.",
                "Keep it human, simple, and easy to follow.",
                "Give clear, everyday examples and practical tips people can apply.",
            ],
            ArticleStyle::Rant => &[
                "Make it sound like a casual rant: honest, a little funny, and very human.",
                "Use simple words, small complaints, and relatable frustrations.",
                "Make the tone like someone talking freely with a friend.",
            ],
            ArticleStyle::Wholesome => &[
                "Make it cozy, warm, and comforting.",
                "Simple words, soft tone, and relatable feelings.",
                "Make it sound like a caring friend reminding you of the small joys of life.",
            ],
        }
    }
}

impl fmt::Display for ArticleStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ArticleStyle {
    type Err = TypewriterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        let wanted = if wanted == "funnyrealistic" { "funny-realistic".to_string() } else { wanted };
        Self::ALL
            .into_iter()
            .find(|style| style.name() == wanted)
            .ok_or_else(|| RequestError::validation(format!("unknown article style: {s}")).into())
    }
}

/// "Write an article about ..." prompt.
///
/// ```
/// use integrations_typewriter::prompt::{ArticlePrompt, ArticleStyle};
///
/// let prompt = ArticlePrompt::new("Morning coffee").unwrap().with_style(ArticleStyle::Rant);
/// assert!(prompt.text().starts_with("Write an article about: Morning coffee."));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticlePrompt {
    title: String,
    style: ArticleStyle,
}

impl ArticlePrompt {
    /// A prompt for `title` in a randomly chosen style.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the title is blank.
    pub fn new(title: impl Into<String>) -> TypewriterResult<Self> {
        let title = title.into().trim().to_string();
        if title.is_empty() {
            return Err(RequestError::validation("Please enter a title first.").into());
        }
        Ok(Self {
            title,
            style: ArticleStyle::random(&mut rand::thread_rng()),
        })
    }

    /// Uses `style` instead of the random one.
    pub fn with_style(mut self, style: ArticleStyle) -> Self {
        self.style = style;
        self
    }

    /// The trimmed title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The chosen style.
    pub fn style(&self) -> ArticleStyle {
        self.style
    }

    /// The instruction text.
    pub fn text(&self) -> String {
        let mut text = format!("Write an article about: {}.\n", self.title);
        for line in self.style.instructions() {
            text.push_str(line);
            text.push('\n');
        }
        text
    }

    /// Converts into a sendable prompt.
    pub fn into_prompt(self) -> Prompt {
        Prompt::text(self.text())
    }
}

impl From<ArticlePrompt> for Prompt {
    fn from(article: ArticlePrompt) -> Self {
        article.into_prompt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_blank_title_rejected() {
        for title in ["", "   ", "\n\t"] {
            let err = ArticlePrompt::new(title).unwrap_err();
            assert!(matches!(
                err,
                TypewriterError::Request(RequestError::ValidationError { .. })
            ));
        }
    }

    #[test]
    fn test_title_trimmed() {
        let prompt = ArticlePrompt::new("  Rainy days \n").unwrap();
        assert_eq!(prompt.title(), "Rainy days");
    }

    #[test]
    fn test_text_layout() {
        let prompt = ArticlePrompt::new("Rainy days")
            .unwrap()
            .with_style(ArticleStyle::Storytelling);
        assert_eq!(
            prompt.text(),
            "Write an article about: Rainy days.\n\
             Write it like a short personal story or diary entry.\n\
             Keep the tone human, warm, and real.\n\
             Simple words, relatable situations, small details from daily life.\n"
        );
    }

    #[test]
    fn test_every_style_has_instructions() {
        for style in ArticleStyle::ALL {
            assert!(!style.instructions().is_empty(), "{style} has no instructions");
        }
    }

    #[test]
    fn test_style_names_round_trip() {
        for style in ArticleStyle::ALL {
            assert_eq!(style.name().parse::<ArticleStyle>().unwrap(), style);
        }
        assert_eq!("FunnyRealistic".parse::<ArticleStyle>().unwrap(), ArticleStyle::FunnyRealistic);
        assert!("shouty".parse::<ArticleStyle>().is_err());
    }

    #[test]
    fn test_random_covers_styles() {
        let mut rng = StdRng::seed_from_u64(7);
        let seen: HashSet<ArticleStyle> = (0..500).map(|_| ArticleStyle::random(&mut rng)).collect();
        assert_eq!(seen.len(), ArticleStyle::ALL.len());
    }

    #[test]
    fn test_into_prompt() {
        let article = ArticlePrompt::new("Owls").unwrap().with_style(ArticleStyle::Plain);
        let expected = article.text();
        let prompt: Prompt = article.into();
        assert_eq!(prompt.joined_text(), expected);
    }
}
