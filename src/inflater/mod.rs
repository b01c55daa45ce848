//! Overlay inflater
//!
//! Turns a line-oriented overlay config into a list of [`Overlay`]s:
//!
//! ```text
//! @accent=#80FF4081
//!
//! # Material baseline
//! grid-lines direction=horizontal step=8dp
//!
//! keyline from=left distance=16dp
//!     color=@accent
//! ```
//!
//! Variables (`@name=value`, or a bare `name=value` at column 0) are declared
//! before the first block. A title
//! (`# text`) starts a new overlay; blocks before any title land in one
//! untitled overlay. A block is a header line `type [key[=value]...]` plus
//! continuation lines that are indented or start with `key=value`, and ends at
//! a blank line or end of input. Comments (`// text`) are skipped. Markers come
//! from [`InflaterConfig`].
//!
//! Inflation is all or nothing: the first error aborts the run. Errors carry
//! the 0-based number of the line that caused them; errors raised while
//! building a layer carry the line of its header.

mod lexer;
mod variables;

use std::io::BufRead;
use std::sync::Arc;

use rhythm_core::{
    ArgumentsBundle, ErrorKind, InflationError, LayerError, LayerFactory, LayerRegistry,
};
use rhythm_layers::{builtin_registry, SpecLayer};
use tracing::{debug, trace};

use crate::config::{DuplicatePolicy, InflaterConfig};
use crate::overlay::Overlay;
use lexer::{classify, split_token, tokenize, Line};
use variables::VariableTable;

/// Parses overlay configs, building layers with factories from a shared registry.
pub struct OverlayInflater<L> {
    registry: Arc<LayerRegistry<L>>,
    config: InflaterConfig,
}

impl<L> OverlayInflater<L> {
    /// Create an inflater with the default grammar.
    pub fn new(registry: Arc<LayerRegistry<L>>) -> Self {
        Self {
            registry,
            config: InflaterConfig::default(),
        }
    }

    pub fn with_config(mut self, config: InflaterConfig) -> Self {
        self.config = config;
        self
    }

    pub fn registry(&self) -> &Arc<LayerRegistry<L>> {
        &self.registry
    }

    pub fn config(&self) -> &InflaterConfig {
        &self.config
    }

    /// Inflate a whole config held in memory.
    pub fn inflate_str(&self, text: &str) -> Result<Vec<Overlay<L>>, InflationError> {
        self.inflate_lines(text.lines())
    }

    /// Inflate a sequence of lines. Line numbers are indexes into `lines`.
    pub fn inflate_lines<I, S>(&self, lines: I) -> Result<Vec<Overlay<L>>, InflationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut run = Inflation::new(&self.registry, &self.config);
        for (number, line) in lines.into_iter().enumerate() {
            run.feed(number, line.as_ref())?;
        }
        run.finish()
    }

    /// Inflate from a reader. A read failure aborts with `GENERIC` wrapping
    /// the I/O error, at the line that could not be read.
    pub fn inflate_reader<R: BufRead>(
        &self,
        reader: R,
    ) -> Result<Vec<Overlay<L>>, InflationError> {
        let mut run = Inflation::new(&self.registry, &self.config);
        for (number, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| {
                InflationError::with_cause(ErrorKind::Generic, e, vec![]).at_line(number)
            })?;
            run.feed(number, &line)?;
        }
        run.finish()
    }
}

impl OverlayInflater<SpecLayer> {
    /// Inflater backed by a fresh registry of the built-in layer types.
    pub fn with_builtins() -> Self {
        Self::new(Arc::new(builtin_registry()))
    }
}

/// Parser position relative to blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    /// No block seen yet; variables and titles allowed.
    BeforeBlocks,
    /// Header line read, no continuation yet.
    InBlockHeader,
    /// At least one continuation line read.
    InBlockBody,
    /// Between blocks.
    Blank,
}

/// A block whose header has been read but that hasn't been built yet.
struct OpenBlock<L> {
    header_line: usize,
    factory: Arc<dyn LayerFactory<L>>,
    args: ArgumentsBundle,
}

/// State of one inflation run.
struct Inflation<'a, L> {
    registry: &'a LayerRegistry<L>,
    config: &'a InflaterConfig,
    state: ParseState,
    variables: VariableTable,
    block: Option<OpenBlock<L>>,
    overlays: Vec<Overlay<L>>,
}

impl<'a, L> Inflation<'a, L> {
    fn new(registry: &'a LayerRegistry<L>, config: &'a InflaterConfig) -> Self {
        Self {
            registry,
            config,
            state: ParseState::BeforeBlocks,
            variables: VariableTable::new(&config.variable_marker),
            block: None,
            overlays: Vec::new(),
        }
    }

    fn feed(&mut self, number: usize, raw: &str) -> Result<(), InflationError> {
        let line = classify(raw, self.config);
        trace!(line = number, state = ?self.state, kind = ?line, "classified line");

        self.apply(number, line).map_err(|e| e.at_line(number))
    }

    fn apply(&mut self, number: usize, line: Line<'_>) -> Result<(), InflationError> {
        match (self.state, line) {
            (_, Line::Comment) => {}

            (ParseState::InBlockHeader | ParseState::InBlockBody, Line::Blank) => {
                self.close_block()?;
                self.state = ParseState::Blank;
            }
            (_, Line::Blank) => {}

            (ParseState::BeforeBlocks, Line::Variable(declaration)) => {
                let (name, value) = self.variables.declare(declaration)?;
                debug!(name, value, "declared variable");
            }
            (_, Line::Variable(_)) => {
                return Err(InflationError::unexpected_variable_declaration());
            }

            (ParseState::InBlockHeader | ParseState::InBlockBody, Line::Title(_)) => {
                return Err(InflationError::unexpected_title_declaration());
            }
            (_, Line::Title(title)) => {
                debug!(title, "starting overlay");
                let title = (!title.is_empty()).then(|| title.to_string());
                self.overlays.push(Overlay::new(title));
            }

            // a layer type never contains '='
            (ParseState::BeforeBlocks, Line::Content { text, indented: false })
                if first_token_has_value(text) =>
            {
                let (name, value) = self.variables.declare_unmarked(text)?;
                debug!(name, value, "declared variable");
            }
            (ParseState::Blank, Line::Content { text, indented: false })
                if first_token_has_value(text) =>
            {
                return Err(InflationError::unexpected_variable_declaration());
            }

            (ParseState::BeforeBlocks | ParseState::Blank, Line::Content { text, .. }) => {
                self.open_block(number, text)?;
                self.state = ParseState::InBlockHeader;
            }
            (_, Line::Content { text, indented }) => {
                if !indented && !first_token_has_value(text) {
                    return Err(InflationError::malformed_list_syntax(text));
                }
                self.continue_block(text)?;
                self.state = ParseState::InBlockBody;
            }
        }
        Ok(())
    }

    /// Read a header line and look up its factory.
    fn open_block(&mut self, number: usize, text: &str) -> Result<(), InflationError> {
        let mut tokens = self.variables.substitute(tokenize(text))?.into_iter();
        let layer_type = tokens
            .next()
            .ok_or_else(|| InflationError::malformed_layer_declaration("missing layer type"))?;
        if layer_type.contains('=') {
            return Err(InflationError::malformed_layer_declaration(format!(
                "expected a layer type before '{}'",
                layer_type
            )));
        }

        let factory = self.registry.get(&layer_type).ok_or_else(|| {
            InflationError::unknown_layer_type(&layer_type, &self.registry.known_types())
        })?;

        let mut args = ArgumentsBundle::new(layer_type);
        for token in tokens {
            push_argument(&mut args, &token, self.config.duplicate_arguments)?;
        }

        self.block = Some(OpenBlock {
            header_line: number,
            factory,
            args,
        });
        Ok(())
    }

    fn continue_block(&mut self, text: &str) -> Result<(), InflationError> {
        let tokens = self.variables.substitute(tokenize(text))?;
        let policy = self.config.duplicate_arguments;
        let block = self.block.as_mut().ok_or_else(|| {
            InflationError::malformed_layer_declaration("arguments without a header")
        })?;
        for token in tokens {
            push_argument(&mut block.args, &token, policy)?;
        }
        Ok(())
    }

    /// Build the open block's layer and append it to the current overlay.
    fn close_block(&mut self) -> Result<(), InflationError> {
        let Some(block) = self.block.take() else {
            return Ok(());
        };

        let layer = block
            .factory
            .build(&block.args)
            .map_err(|e| tag_layer_error(e).at_line(block.header_line))?;
        debug!(
            layer_type = block.args.layer_type(),
            line = block.header_line,
            args = block.args.len(),
            "inflated layer"
        );

        if self.overlays.is_empty() {
            self.overlays.push(Overlay::new(None));
        }
        if let Some(overlay) = self.overlays.last_mut() {
            overlay.push(layer);
        }
        Ok(())
    }

    fn finish(mut self) -> Result<Vec<Overlay<L>>, InflationError> {
        self.close_block()?;
        debug!(
            overlays = self.overlays.len(),
            variables = self.variables.len(),
            "inflation complete"
        );
        Ok(self.overlays)
    }
}

/// Factory errors that are already tagged pass through; anything else is
/// wrapped as `INFLATING_LAYER_GENERIC`.
fn tag_layer_error(err: LayerError) -> InflationError {
    match err.downcast::<InflationError>() {
        Ok(tagged) => *tagged,
        Err(other) => InflationError::inflating_layer(other),
    }
}

fn first_token_has_value(text: &str) -> bool {
    tokenize(text)
        .first()
        .is_some_and(|token| token.contains('='))
}

fn push_argument(
    args: &mut ArgumentsBundle,
    token: &str,
    policy: DuplicatePolicy,
) -> Result<(), InflationError> {
    let (key, value) = split_token(token)?;
    if policy == DuplicatePolicy::Reject && args.contains_key(key) {
        return Err(InflationError::malformed_layer_declaration(format!(
            "duplicate argument '{}' for layer '{}'",
            key,
            args.layer_type()
        )));
    }
    args.push(key, value.map(str::to_owned));
    Ok(())
}
