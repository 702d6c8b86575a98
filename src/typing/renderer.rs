//! Paced, incrementally formatted rendering of a text stream.

use std::collections::VecDeque;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use futures::{Stream, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;
use uuid::Uuid;

use super::pacing::{Jitter, RandomJitter};
use super::session::TypingSession;
use crate::config::{TypewriterConfig, TypingSpeed};
use crate::error::{TypewriterError, TypewriterResult};
use crate::format::{format_or_escape, MarkdownFormatter, PulldownFormatter};
use crate::source::{GeminiTextSource, Prompt, TextSource};
use crate::streaming::FragmentStream;

/// Where a snapshot sits in the life of a generation.
#[derive(Debug, Clone)]
pub enum RenderState {
    /// More snapshots follow.
    Typing,
    /// The stream ended; the markup covers every fragment.
    Complete,
    /// The stream failed; the markup covers what arrived before the failure.
    Failed(TypewriterError),
    /// The caller cancelled; the markup covers what was typed so far.
    Cancelled,
}

impl RenderState {
    /// Whether this is the last snapshot of a generation.
    pub fn is_final(&self) -> bool {
        !matches!(self, RenderState::Typing)
    }

    /// The failure, for a `Failed` state.
    pub fn error(&self) -> Option<&TypewriterError> {
        match self {
            RenderState::Failed(e) => Some(e),
            _ => None,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            RenderState::Typing => "typing",
            RenderState::Complete => "complete",
            RenderState::Failed(_) => "failed",
            RenderState::Cancelled => "cancelled",
        }
    }
}

/// Formatted markup of the render buffer at one render boundary.
#[derive(Debug, Clone)]
pub struct RenderSnapshot {
    /// Markup for everything typed so far.
    pub markup: String,
    /// Generation state at this snapshot.
    pub state: RenderState,
}

impl RenderSnapshot {
    /// Whether this is the last snapshot of a generation.
    pub fn is_final(&self) -> bool {
        self.state.is_final()
    }
}

/// Lazy sequence of snapshots for one generation, ending with a final one.
pub type RenderStream = Pin<Box<dyn Stream<Item = RenderSnapshot> + Send>>;

/// Summary returned by [`TypingRenderer::generate`].
#[derive(Debug, Clone)]
pub struct RenderOutcome {
    /// The final snapshot.
    pub last: RenderSnapshot,
    /// Snapshots delivered to the sink, the final one included.
    pub snapshots: usize,
}

impl RenderOutcome {
    /// The final markup.
    pub fn markup(&self) -> &str {
        &self.last.markup
    }

    /// The final state.
    pub fn state(&self) -> &RenderState {
        &self.last.state
    }

    /// Whether the generation ran to completion.
    pub fn is_complete(&self) -> bool {
        matches!(self.last.state, RenderState::Complete)
    }
}

/// Turns a [`TextSource`] into a typed-out, re-rendered document.
///
/// Each character of each fragment is appended to a render buffer and
/// followed by a short sleep; at natural breaks and whenever the current word
/// grows past the chunk threshold, the whole buffer is formatted and
/// emitted. The speed is read from a shared [`TypingSpeed`] for every
/// character, so changes apply mid-generation.
///
/// ```no_run
/// use futures::StreamExt;
/// use integrations_typewriter::config::SpeedPreset;
/// use integrations_typewriter::source::Prompt;
/// use integrations_typewriter::typing::TypingRenderer;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn run() -> Result<(), integrations_typewriter::TypewriterError> {
/// let renderer = TypingRenderer::from_env()?;
/// renderer.speed().set_preset(SpeedPreset::Senior);
///
/// let mut snapshots = renderer.stream(Prompt::text("Write about tides"), CancellationToken::new());
/// while let Some(snapshot) = snapshots.next().await {
///     println!("{}", snapshot.markup);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct TypingRenderer {
    source: Arc<dyn TextSource>,
    formatter: Arc<dyn MarkdownFormatter>,
    speed: TypingSpeed,
    jitter: Arc<dyn Jitter>,
}

impl TypingRenderer {
    /// Creates a renderer with the default formatter, speed and jitter.
    pub fn new(source: Arc<dyn TextSource>) -> Self {
        Self {
            source,
            formatter: Arc::new(PulldownFormatter::new()),
            speed: TypingSpeed::default(),
            jitter: Arc::new(RandomJitter),
        }
    }

    /// Creates a Gemini-backed renderer starting at the configured speed.
    pub fn from_config(config: TypewriterConfig) -> TypewriterResult<Self> {
        let speed = config.typing_speed();
        let source = GeminiTextSource::new(config)?;
        Ok(Self::new(Arc::new(source)).with_speed(speed))
    }

    /// Creates a Gemini-backed renderer from environment configuration.
    pub fn from_env() -> TypewriterResult<Self> {
        Self::from_config(TypewriterConfig::from_env()?)
    }

    /// Replaces the formatter.
    pub fn with_formatter(mut self, formatter: Arc<dyn MarkdownFormatter>) -> Self {
        self.formatter = formatter;
        self
    }

    /// Uses `speed` (and every other handle cloned from it).
    pub fn with_speed(mut self, speed: TypingSpeed) -> Self {
        self.speed = speed;
        self
    }

    /// Replaces the jitter source.
    pub fn with_jitter(mut self, jitter: Arc<dyn Jitter>) -> Self {
        self.jitter = jitter;
        self
    }

    /// The live speed handle.
    pub fn speed(&self) -> &TypingSpeed {
        &self.speed
    }

    /// Starts a generation and returns its snapshots.
    ///
    /// Nothing is requested until the stream is first polled. The stream
    /// always ends with exactly one final snapshot: `Complete`, `Failed` or
    /// `Cancelled`.
    pub fn stream(&self, prompt: Prompt, cancel: CancellationToken) -> RenderStream {
        let id = Uuid::new_v4();
        let span = tracing::info_span!("generation", generation_id = %id);
        let generation = Generation {
            source: Arc::clone(&self.source),
            formatter: Arc::clone(&self.formatter),
            speed: self.speed.clone(),
            jitter: Arc::clone(&self.jitter),
            cancel,
            prompt: Some(prompt),
            fragments: None,
            pending: VecDeque::new(),
            session: TypingSession::new(),
            delay: None,
            emitted: 0,
            done: false,
        };

        Box::pin(futures::stream::unfold(generation, move |mut generation| {
            let span = span.clone();
            async move {
                let snapshot = generation.next_snapshot().await?;
                Some((snapshot, generation))
            }
            .instrument(span)
        }))
    }

    /// Runs a generation to the end, handing every snapshot to `sink`.
    pub async fn generate<F>(&self, prompt: Prompt, cancel: CancellationToken, mut sink: F) -> RenderOutcome
    where
        F: FnMut(&RenderSnapshot),
    {
        let mut stream = self.stream(prompt, cancel);
        let mut snapshots = 0;
        let mut last = None;

        while let Some(snapshot) = stream.next().await {
            sink(&snapshot);
            snapshots += 1;
            last = Some(snapshot);
        }

        RenderOutcome {
            last: last.unwrap_or_else(|| RenderSnapshot {
                markup: String::new(),
                state: RenderState::Complete,
            }),
            snapshots,
        }
    }

    /// Fetches the whole text at once and formats it, without pacing.
    pub async fn render_once(&self, prompt: Prompt, cancel: CancellationToken) -> RenderSnapshot {
        let id = Uuid::new_v4();
        let span = tracing::info_span!("generation", generation_id = %id, mode = "once");

        async {
            tracing::info!("Starting single-shot generation");
            let result = tokio::select! {
                biased;
                () = cancel.cancelled() => None,
                result = self.source.complete_text(&prompt) => Some(result),
            };

            let (text, state) = match result {
                None => (String::new(), RenderState::Cancelled),
                Some(Ok(text)) => (text, RenderState::Complete),
                Some(Err(error)) => {
                    tracing::warn!(error = %error, "Single-shot generation failed");
                    (String::new(), RenderState::Failed(error))
                }
            };

            tracing::info!(chars = text.chars().count(), state = state.label(), "Generation finished");
            RenderSnapshot {
                markup: format_or_escape(self.formatter.as_ref(), &text),
                state,
            }
        }
        .instrument(span)
        .await
    }
}

/// State of one running generation, driven by `unfold`.
struct Generation {
    source: Arc<dyn TextSource>,
    formatter: Arc<dyn MarkdownFormatter>,
    speed: TypingSpeed,
    jitter: Arc<dyn Jitter>,
    cancel: CancellationToken,
    prompt: Option<Prompt>,
    fragments: Option<FragmentStream>,
    pending: VecDeque<char>,
    session: TypingSession,
    delay: Option<Duration>,
    emitted: usize,
    done: bool,
}

enum Pull {
    Fragment(String),
    Failed(TypewriterError),
    Ended,
    Cancelled,
}

impl Generation {
    async fn next_snapshot(&mut self) -> Option<RenderSnapshot> {
        if self.done {
            return None;
        }
        let cancel = self.cancel.clone();

        loop {
            if let Some(delay) = self.delay.take() {
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => return Some(self.finish(RenderState::Cancelled)),
                    () = tokio::time::sleep(delay) => {}
                }
            }

            if cancel.is_cancelled() {
                return Some(self.finish(RenderState::Cancelled));
            }

            if let Some(c) = self.pending.pop_front() {
                let keystroke = self.session.type_char(c, self.speed.get(), self.jitter.sample());
                self.delay = Some(keystroke.delay);
                if keystroke.render {
                    return Some(self.snapshot(RenderState::Typing));
                }
                continue;
            }

            match self.pull().await {
                Pull::Fragment(fragment) => self.pending.extend(fragment.chars()),
                Pull::Failed(error) => {
                    tracing::warn!(
                        error = %error,
                        chars = self.session.typed(),
                        "Generation stream failed"
                    );
                    return Some(self.finish(RenderState::Failed(error)));
                }
                Pull::Ended => return Some(self.finish(RenderState::Complete)),
                Pull::Cancelled => return Some(self.finish(RenderState::Cancelled)),
            }
        }
    }

    /// Next fragment, opening the source stream on first use.
    async fn pull(&mut self) -> Pull {
        let cancel = self.cancel.clone();

        if self.fragments.is_none() {
            let Some(prompt) = self.prompt.take() else {
                return Pull::Ended;
            };
            tracing::info!(speed_ms = self.speed.get(), "Starting generation");

            let opened = tokio::select! {
                biased;
                () = cancel.cancelled() => return Pull::Cancelled,
                opened = self.source.stream_text(&prompt) => opened,
            };
            match opened {
                Ok(fragments) => self.fragments = Some(fragments),
                Err(error) => return Pull::Failed(error),
            }
        }

        let Some(fragments) = self.fragments.as_mut() else {
            return Pull::Ended;
        };

        tokio::select! {
            biased;
            () = cancel.cancelled() => Pull::Cancelled,
            item = fragments.next() => match item {
                Some(Ok(fragment)) => Pull::Fragment(fragment),
                Some(Err(error)) => Pull::Failed(error),
                None => Pull::Ended,
            },
        }
    }

    fn snapshot(&mut self, state: RenderState) -> RenderSnapshot {
        self.emitted += 1;
        RenderSnapshot {
            markup: format_or_escape(self.formatter.as_ref(), self.session.text()),
            state,
        }
    }

    fn finish(&mut self, state: RenderState) -> RenderSnapshot {
        self.done = true;
        self.fragments = None;
        self.pending.clear();
        let snapshot = self.snapshot(state);

        tracing::info!(
            chars = self.session.typed(),
            renders = self.session.renders(),
            snapshots = self.emitted,
            state = snapshot.state.label(),
            "Generation finished"
        );
        snapshot
    }
}
